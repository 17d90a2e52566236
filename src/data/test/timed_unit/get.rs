use super::*;

/// Tests getting a unit that does not exist.
///
/// Expected: Ok(None)
#[tokio::test]
async fn returns_none_for_unknown_key() -> Result<(), AppError> {
    let test = TestBuilder::new().build().await.unwrap();
    let store = JsonStore::new(test.data_dir());
    let repo = TimedUnitRepository::new(&store);

    let result = repo.get(UnitKey::new(UnitKind::Giveaway, 1, 2)).await?;

    assert!(result.is_none());

    Ok(())
}

/// Tests that units of one guild are ordered by due time.
///
/// Expected: Ok with the soonest unit first and other guilds excluded
#[tokio::test]
async fn get_by_guild_orders_by_due_time() -> Result<(), AppError> {
    let test = TestBuilder::new().build().await.unwrap();
    let store = JsonStore::new(test.data_dir());
    let repo = TimedUnitRepository::new(&store);

    repo.create(&schedule_unit(1, 10, 90)).await?;
    repo.create(&schedule_unit(1, 11, 5)).await?;
    repo.create(&schedule_unit(1, 12, 30)).await?;
    repo.create(&schedule_unit(2, 13, 1)).await?;

    let ids: Vec<u64> = repo
        .get_by_guild(UnitKind::Schedule, 1)
        .await?
        .into_iter()
        .map(|unit| unit.id)
        .collect();

    assert_eq!(ids, vec![11, 12, 10]);

    Ok(())
}

/// Tests that only active units are returned across guilds.
///
/// Expected: Ok with the ended giveaway excluded
#[tokio::test]
async fn get_all_active_skips_ended_units() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_record(
            "giveaways.json",
            factory::giveaway::GiveawayFactory::new().id(1).guild_id(100).build(),
        )
        .with_record(
            "giveaways.json",
            factory::giveaway::GiveawayFactory::new().id(2).guild_id(200).build(),
        )
        .with_record(
            "giveaways.json",
            factory::giveaway::GiveawayFactory::new()
                .id(3)
                .guild_id(200)
                .ended_with_winners(&[42])
                .build(),
        )
        .build()
        .await
        .unwrap();
    let store = JsonStore::new(test.data_dir());
    let repo = TimedUnitRepository::new(&store);

    let mut ids: Vec<u64> = repo
        .get_all_active(UnitKind::Giveaway)
        .await?
        .into_iter()
        .map(|unit| unit.id)
        .collect();
    ids.sort();

    assert_eq!(ids, vec![1, 2]);

    Ok(())
}
