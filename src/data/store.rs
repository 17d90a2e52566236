//! Flat JSON file store, one file per timed-unit kind.
//!
//! Each file maps guild id → unit id → record, with every id written as a decimal
//! string and every instant as RFC 3339 text:
//!
//! ```json
//! {
//!   "81384788765712384": {
//!     "1190000000000000001": { "id": "1190000000000000001", "state": "active", ... }
//!   }
//! }
//! ```
//!
//! Reads and writes always cover the whole collection. Writes go to a temporary
//! sibling file that is then renamed over the target, so readers never observe a
//! half-written file. `update` holds the kind's lock across load → mutate → save so
//! concurrent read-modify-write sequences on the same collection never interleave.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use tokio::sync::Mutex;

use crate::error::AppError;
use crate::model::unit::{TimedUnit, UnitKind};

/// guild id → unit id → record.
pub type UnitCollection = HashMap<u64, HashMap<u64, TimedUnit>>;

pub struct JsonStore {
    dir: PathBuf,
    giveaways: Mutex<()>,
    polls: Mutex<()>,
    schedules: Mutex<()>,
}

impl JsonStore {
    /// Creates a store rooted at `dir`. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            giveaways: Mutex::new(()),
            polls: Mutex::new(()),
            schedules: Mutex::new(()),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file backing `kind`.
    pub fn path_for(&self, kind: UnitKind) -> PathBuf {
        self.dir.join(kind.file_name())
    }

    fn lock_for(&self, kind: UnitKind) -> &Mutex<()> {
        match kind {
            UnitKind::Giveaway => &self.giveaways,
            UnitKind::Poll => &self.polls,
            UnitKind::Schedule => &self.schedules,
        }
    }

    /// Loads the whole collection for `kind`.
    ///
    /// # Returns
    /// - `Ok(UnitCollection)` - The stored units; empty if the file does not exist yet
    /// - `Err(AppError::Io)` - The file exists but could not be read
    /// - `Err(AppError::Json)` - The file is not a valid collection
    pub async fn load_all(&self, kind: UnitKind) -> Result<UnitCollection, AppError> {
        let path = self.path_for(kind);

        let text = match tokio::fs::read_to_string(&path).await {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(UnitCollection::new())
            }
            Err(e) => return Err(e.into()),
        };

        if text.trim().is_empty() {
            return Ok(UnitCollection::new());
        }

        Ok(serde_json::from_str(&text)?)
    }

    /// Replaces the whole collection for `kind`.
    pub async fn save_all(&self, kind: UnitKind, units: &UnitCollection) -> Result<(), AppError> {
        let _guard = self.lock_for(kind).lock().await;
        self.write_file(kind, units).await
    }

    /// Runs a read-modify-write cycle on the collection for `kind`.
    ///
    /// The collection is loaded, handed to `mutate`, and written back, all while
    /// holding the kind's lock. The write happens even if `mutate` changed nothing.
    ///
    /// # Returns
    /// - `Ok(R)` - Whatever `mutate` returned, after the write succeeded
    /// - `Err(AppError)` - Loading or writing failed; on a write failure the change is lost
    pub async fn update<F, R>(&self, kind: UnitKind, mutate: F) -> Result<R, AppError>
    where
        F: FnOnce(&mut UnitCollection) -> R,
    {
        let _guard = self.lock_for(kind).lock().await;

        let mut units = self.load_all(kind).await?;
        let result = mutate(&mut units);
        self.write_file(kind, &units).await?;

        Ok(result)
    }

    async fn write_file(&self, kind: UnitKind, units: &UnitCollection) -> Result<(), AppError> {
        tokio::fs::create_dir_all(&self.dir).await?;

        // Sorted output keeps the files diff-friendly.
        let ordered: BTreeMap<u64, BTreeMap<u64, &TimedUnit>> = units
            .iter()
            .filter(|(_, guild_units)| !guild_units.is_empty())
            .map(|(guild_id, guild_units)| {
                (
                    *guild_id,
                    guild_units.iter().map(|(id, unit)| (*id, unit)).collect(),
                )
            })
            .collect();
        let json = serde_json::to_string_pretty(&ordered)?;

        let path = self.path_for(kind);
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, &path).await?;

        tracing::debug!(
            "Saved {} {} record(s) to {}",
            units.values().map(HashMap::len).sum::<usize>(),
            kind.label().to_lowercase(),
            path.display()
        );

        Ok(())
    }
}
