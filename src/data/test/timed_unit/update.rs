use super::*;

/// Tests mutating a stored unit.
///
/// Expected: Ok(Some) with the change persisted
#[tokio::test]
async fn updates_existing_unit() -> Result<(), AppError> {
    let test = TestBuilder::new().build().await.unwrap();
    let store = JsonStore::new(test.data_dir());
    let repo = TimedUnitRepository::new(&store);
    let unit = schedule_unit(1, 10, 5);
    repo.create(&unit).await?;

    let updated = repo.update(unit.key(), TimedUnit::end).await?;

    assert_eq!(updated.map(|u| u.state), Some(UnitState::Ended));
    assert_eq!(
        repo.get(unit.key()).await?.map(|u| u.state),
        Some(UnitState::Ended)
    );

    Ok(())
}

/// Tests that updating a unit deleted in the meantime does not bring it back.
///
/// Expected: Ok(None) and the unit still absent
#[tokio::test]
async fn does_not_resurrect_deleted_unit() -> Result<(), AppError> {
    let test = TestBuilder::new().build().await.unwrap();
    let store = JsonStore::new(test.data_dir());
    let repo = TimedUnitRepository::new(&store);
    let unit = schedule_unit(1, 10, 5);
    repo.create(&unit).await?;
    repo.delete(unit.key()).await?;

    let updated = repo.update(unit.key(), TimedUnit::end).await?;

    assert!(updated.is_none());
    assert!(repo.get(unit.key()).await?.is_none());

    Ok(())
}
