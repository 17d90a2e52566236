use super::*;

/// Tests deleting a stored unit.
///
/// Expected: Ok(Some) with the removed unit and the guild entry dropped
#[tokio::test]
async fn deletes_unit_and_empty_guild() -> Result<(), AppError> {
    let test = TestBuilder::new().build().await.unwrap();
    let store = JsonStore::new(test.data_dir());
    let repo = TimedUnitRepository::new(&store);
    let unit = schedule_unit(1, 10, 5);
    repo.create(&unit).await?;

    let removed = repo.delete(unit.key()).await?;

    assert_eq!(removed.map(|u| u.id), Some(10));
    let raw = test.read_json("schedules.json").unwrap();
    assert!(raw.get("1").is_none());

    Ok(())
}

/// Tests that deleting one unit leaves its siblings alone.
///
/// Expected: Ok with the other unit of the guild still stored
#[tokio::test]
async fn keeps_other_units_in_guild() -> Result<(), AppError> {
    let test = TestBuilder::new().build().await.unwrap();
    let store = JsonStore::new(test.data_dir());
    let repo = TimedUnitRepository::new(&store);
    repo.create(&schedule_unit(1, 10, 5)).await?;
    repo.create(&schedule_unit(1, 11, 5)).await?;

    repo.delete(UnitKey::new(UnitKind::Schedule, 1, 10)).await?;

    let remaining = repo.get_by_guild(UnitKind::Schedule, 1).await?;
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, 11);

    Ok(())
}

/// Tests deleting a unit that does not exist.
///
/// Expected: Ok(None)
#[tokio::test]
async fn returns_none_for_unknown_key() -> Result<(), AppError> {
    let test = TestBuilder::new().build().await.unwrap();
    let store = JsonStore::new(test.data_dir());
    let repo = TimedUnitRepository::new(&store);

    assert!(repo
        .delete(UnitKey::new(UnitKind::Poll, 1, 1))
        .await?
        .is_none());

    Ok(())
}
