use crate::{
    data::store::JsonStore,
    error::AppError,
    model::unit::{TimedUnit, UnitKey, UnitKind},
};

pub struct TimedUnitRepository<'a> {
    store: &'a JsonStore,
}

impl<'a> TimedUnitRepository<'a> {
    pub fn new(store: &'a JsonStore) -> Self {
        Self { store }
    }

    /// Stores a new unit, replacing any record with the same key.
    ///
    /// # Returns
    /// - `Ok(())`: The unit was written to disk
    /// - `Err(AppError)`: Store I/O error
    pub async fn create(&self, unit: &TimedUnit) -> Result<(), AppError> {
        let record = unit.clone();
        self.store
            .update(unit.kind(), move |units| {
                units
                    .entry(record.guild_id)
                    .or_default()
                    .insert(record.id, record);
            })
            .await
    }

    /// Stores a new unit under the first free id at or above `unit.id`.
    ///
    /// Used for synthesized ids where two units may be created in the same second.
    ///
    /// # Returns
    /// - `Ok(TimedUnit)`: The stored unit with its final id
    /// - `Err(AppError)`: Store I/O error
    pub async fn create_with_free_id(&self, mut unit: TimedUnit) -> Result<TimedUnit, AppError> {
        self.store
            .update(unit.kind(), move |units| {
                let guild_units = units.entry(unit.guild_id).or_default();
                while guild_units.contains_key(&unit.id) {
                    unit.id += 1;
                }
                guild_units.insert(unit.id, unit.clone());
                unit
            })
            .await
    }

    /// Gets a unit by key
    ///
    /// # Returns
    /// - `Ok(Some(TimedUnit))`: The unit if found
    /// - `Ok(None)`: No unit with that key
    /// - `Err(AppError)`: Store error
    pub async fn get(&self, key: UnitKey) -> Result<Option<TimedUnit>, AppError> {
        let mut units = self.store.load_all(key.kind).await?;

        Ok(units
            .get_mut(&key.guild_id)
            .and_then(|guild_units| guild_units.remove(&key.unit_id)))
    }

    /// Gets all units of a kind in a guild, ordered by due time
    pub async fn get_by_guild(
        &self,
        kind: UnitKind,
        guild_id: u64,
    ) -> Result<Vec<TimedUnit>, AppError> {
        let mut units = self.store.load_all(kind).await?;

        let mut guild_units: Vec<TimedUnit> = units
            .remove(&guild_id)
            .map(|guild_units| guild_units.into_values().collect())
            .unwrap_or_default();
        guild_units.sort_by_key(|unit| (unit.due_at(), unit.id));

        Ok(guild_units)
    }

    /// Gets every active unit of a kind across all guilds
    pub async fn get_all_active(&self, kind: UnitKind) -> Result<Vec<TimedUnit>, AppError> {
        let units = self.store.load_all(kind).await?;

        Ok(units
            .into_values()
            .flat_map(|guild_units| guild_units.into_values())
            .filter(TimedUnit::is_active)
            .collect())
    }

    /// Applies `mutate` to a stored unit if it still exists.
    ///
    /// A unit deleted in the meantime (for example by a cancel) is left deleted rather
    /// than written back.
    ///
    /// # Returns
    /// - `Ok(Some(TimedUnit))`: The unit after mutation
    /// - `Ok(None)`: No unit with that key; nothing was written back
    /// - `Err(AppError)`: Store error
    pub async fn update<F>(&self, key: UnitKey, mutate: F) -> Result<Option<TimedUnit>, AppError>
    where
        F: FnOnce(&mut TimedUnit),
    {
        self.store
            .update(key.kind, move |units| {
                let unit = units
                    .get_mut(&key.guild_id)
                    .and_then(|guild_units| guild_units.get_mut(&key.unit_id))?;
                mutate(unit);
                Some(unit.clone())
            })
            .await
    }

    /// Deletes a unit, dropping its guild entry when it was the last one
    ///
    /// # Returns
    /// - `Ok(Some(TimedUnit))`: The deleted unit
    /// - `Ok(None)`: No unit with that key
    /// - `Err(AppError)`: Store error
    pub async fn delete(&self, key: UnitKey) -> Result<Option<TimedUnit>, AppError> {
        self.store
            .update(key.kind, move |units| {
                let guild_units = units.get_mut(&key.guild_id)?;
                let removed = guild_units.remove(&key.unit_id);
                if guild_units.is_empty() {
                    units.remove(&key.guild_id);
                }
                removed
            })
            .await
    }
}
