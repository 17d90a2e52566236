use crate::{
    data::{store::JsonStore, timed_unit::TimedUnitRepository},
    error::{validation::ValidationError, AppError},
    model::unit::{TimedUnit, UnitKey, UnitKind},
    scheduler::Scheduler,
};

/// Operations that have to keep the store and the timer registry in step.
pub struct UnitLifecycle<'a> {
    store: &'a JsonStore,
    scheduler: &'a Scheduler,
}

impl<'a> UnitLifecycle<'a> {
    pub fn new(store: &'a JsonStore, scheduler: &'a Scheduler) -> Self {
        Self { store, scheduler }
    }

    /// Persists a freshly announced unit and arms its timer.
    ///
    /// Scheduled messages carry synthesized ids and are stored under the first free
    /// id; giveaways and polls keep their message id.
    ///
    /// # Returns
    /// - `Ok(TimedUnit)` - The stored unit with its final id
    /// - `Err(AppError)` - Store error; nothing was armed
    pub async fn create_unit(&self, unit: TimedUnit) -> Result<TimedUnit, AppError> {
        let repo = TimedUnitRepository::new(self.store);

        let stored = match unit.kind() {
            UnitKind::Schedule => repo.create_with_free_id(unit).await?,
            UnitKind::Giveaway | UnitKind::Poll => {
                repo.create(&unit).await?;
                unit
            }
        };

        self.scheduler.arm_unit(&stored).await;
        tracing::info!("Created {} due at {}", stored.key(), stored.due_at());

        Ok(stored)
    }

    /// Cancels a unit's timer and deletes its record.
    ///
    /// # Returns
    /// - `Ok(TimedUnit)` - The deleted unit
    /// - `Err(AppError::ValidationErr)` - No unit with that key
    /// - `Err(AppError)` - Store error
    pub async fn cancel_unit(&self, key: UnitKey) -> Result<TimedUnit, AppError> {
        let repo = TimedUnitRepository::new(self.store);

        if repo.get(key).await?.is_none() {
            return Err(ValidationError::UnitNotFound(key.kind.label()).into());
        }

        self.scheduler.cancel(key).await;
        let removed = repo
            .delete(key)
            .await?
            .ok_or(ValidationError::UnitNotFound(key.kind.label()))?;

        tracing::info!("Cancelled {}", key);

        Ok(removed)
    }

    /// Fires an active unit now instead of at its due time.
    ///
    /// The run happens on the scheduler's task; this returns as soon as it is armed.
    ///
    /// # Returns
    /// - `Ok(())` - The unit will fire immediately
    /// - `Err(AppError::ValidationErr)` - Unknown unit, already ended, or already firing
    /// - `Err(AppError)` - Store error
    pub async fn end_unit_early(&self, key: UnitKey) -> Result<(), AppError> {
        let unit = TimedUnitRepository::new(self.store)
            .get(key)
            .await?
            .ok_or(ValidationError::UnitNotFound(key.kind.label()))?;

        if !unit.is_active() {
            return Err(ValidationError::AlreadyEnded.into());
        }
        if !self.scheduler.fire_now(key).await {
            return Err(ValidationError::AlreadyFiring.into());
        }

        tracing::info!("Ending {} early", key);

        Ok(())
    }
}
