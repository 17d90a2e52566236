use super::*;

/// Tests storing a new unit.
///
/// Expected: Ok with the unit retrievable by its key
#[tokio::test]
async fn creates_unit() -> Result<(), AppError> {
    let test = TestBuilder::new().build().await.unwrap();
    let store = JsonStore::new(test.data_dir());
    let repo = TimedUnitRepository::new(&store);
    let unit = schedule_unit(1, 100, 10);

    repo.create(&unit).await?;

    assert_eq!(repo.get(unit.key()).await?, Some(unit));

    Ok(())
}

/// Tests that creating a unit keeps the other units of the guild.
///
/// Expected: Ok with both units stored
#[tokio::test]
async fn create_keeps_existing_units() -> Result<(), AppError> {
    let guild_id = factory::helpers::next_snowflake();
    let test = TestBuilder::new()
        .with_record("schedules.json", factory::create_schedule(guild_id))
        .build()
        .await
        .unwrap();
    let store = JsonStore::new(test.data_dir());
    let repo = TimedUnitRepository::new(&store);

    repo.create(&schedule_unit(guild_id, 5, 10)).await?;

    assert_eq!(repo.get_by_guild(UnitKind::Schedule, guild_id).await?.len(), 2);

    Ok(())
}

/// Tests that a synthesized id already in use is bumped to the next free value.
///
/// Expected: Ok with ids 1000, 1001 and 1002 for three units created with id 1000
#[tokio::test]
async fn create_with_free_id_bumps_on_collision() -> Result<(), AppError> {
    let test = TestBuilder::new().build().await.unwrap();
    let store = JsonStore::new(test.data_dir());
    let repo = TimedUnitRepository::new(&store);

    let first = repo.create_with_free_id(schedule_unit(1, 1000, 5)).await?;
    let second = repo.create_with_free_id(schedule_unit(1, 1000, 5)).await?;
    let third = repo.create_with_free_id(schedule_unit(1, 1000, 5)).await?;

    assert_eq!((first.id, second.id, third.id), (1000, 1001, 1002));
    assert_eq!(repo.get_by_guild(UnitKind::Schedule, 1).await?.len(), 3);

    Ok(())
}

/// Tests that ids are only unique per guild.
///
/// Expected: Ok with the same id kept in two different guilds
#[tokio::test]
async fn create_with_free_id_is_scoped_to_guild() -> Result<(), AppError> {
    let test = TestBuilder::new().build().await.unwrap();
    let store = JsonStore::new(test.data_dir());
    let repo = TimedUnitRepository::new(&store);

    let first = repo.create_with_free_id(schedule_unit(1, 1000, 5)).await?;
    let second = repo.create_with_free_id(schedule_unit(2, 1000, 5)).await?;

    assert_eq!(first.id, 1000);
    assert_eq!(second.id, 1000);

    Ok(())
}
