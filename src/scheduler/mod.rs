//! Timer management for timed units.
//!
//! The `Scheduler` owns one deferred task per armed unit and guarantees at most one
//! in-flight resolver per `UnitKey`. Timers carry only the key; the `FireHandler`
//! loads the record and decides what firing means at fire time. `sweep` adds the
//! once-a-minute safety net that arms overdue units nobody is tracking.

pub mod registry;
pub mod sweep;

#[cfg(test)]
mod test;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serenity::async_trait;
use tokio::sync::Mutex;

use crate::{
    data::{store::JsonStore, timed_unit::TimedUnitRepository},
    error::{internal::InternalError, AppError},
    model::unit::{FireOutcome, TimedUnit, UnitKey, UnitKind},
    scheduler::registry::{Preempt, Registry},
};

/// Fire-time behaviour plugged into the scheduler.
#[async_trait]
pub trait FireHandler: Send + Sync {
    /// Runs the unit's outcome.
    ///
    /// # Returns
    /// - `Ok(FireOutcome::Retired)` - The unit is done; nothing is re-armed
    /// - `Ok(FireOutcome::Rearm(at))` - Arm the unit again for `at`
    /// - `Err(AppError)` - The run failed; the scheduler logs it and calls `retire`
    async fn fire(&self, key: UnitKey) -> Result<FireOutcome, AppError>;

    /// Takes a unit out of service after a failed run.
    async fn retire(&self, key: UnitKey) -> Result<(), AppError>;
}

struct Inner {
    registry: Mutex<Registry>,
    store: Arc<JsonStore>,
    handler: Arc<dyn FireHandler>,
}

/// Cheaply cloneable handle to the shared timer registry.
#[derive(Clone)]
pub struct Scheduler {
    inner: Arc<Inner>,
}

impl Scheduler {
    pub fn new(store: Arc<JsonStore>, handler: Arc<dyn FireHandler>) -> Self {
        Self {
            inner: Arc::new(Inner {
                registry: Mutex::new(Registry::default()),
                store,
                handler,
            }),
        }
    }

    /// Arms a timer that fires `key` at `due`, or immediately if `due` has passed.
    ///
    /// Never runs the resolver on the caller's task.
    ///
    /// # Returns
    /// - `true` - A new timer was armed
    /// - `false` - The key already has a pending timer or a running resolver
    pub async fn arm(&self, key: UnitKey, due: DateTime<Utc>) -> bool {
        let mut registry = self.inner.registry.lock().await;
        if registry.contains(&key) {
            return false;
        }

        arm_locked(&self.inner, &mut registry, key, due);
        true
    }

    /// Arms a timer for a unit at its current due time.
    pub async fn arm_unit(&self, unit: &TimedUnit) -> bool {
        self.arm(unit.key(), unit.due_at()).await
    }

    /// Cancels the timer for `key`.
    ///
    /// A pending timer is dropped. A running resolver finishes, but its unit is not
    /// re-armed. Unknown keys are ignored.
    pub async fn cancel(&self, key: UnitKey) {
        if self.inner.registry.lock().await.cancel(key) {
            tracing::debug!("Cancelled timer for {}", key);
        }
    }

    /// Runs `key` now instead of at its due time.
    ///
    /// # Returns
    /// - `true` - An immediate run was armed, replacing any pending timer
    /// - `false` - The resolver for this key is already running
    pub async fn fire_now(&self, key: UnitKey) -> bool {
        let mut registry = self.inner.registry.lock().await;

        match registry.preempt(key) {
            Preempt::Busy => false,
            Preempt::Idle | Preempt::Replaced => {
                arm_locked(&self.inner, &mut registry, key, Utc::now());
                true
            }
        }
    }

    /// Whether `key` has a pending timer or a running resolver.
    #[cfg(test)]
    pub async fn is_tracked(&self, key: UnitKey) -> bool {
        self.inner.registry.lock().await.contains(&key)
    }

    /// Number of keys with a pending timer or a running resolver.
    pub async fn tracked_count(&self) -> usize {
        self.inner.registry.lock().await.len()
    }

    /// Arms every persisted active unit of every kind.
    ///
    /// Called once at startup. Units whose due time passed while the bot was offline
    /// fire immediately.
    ///
    /// # Returns
    /// - `Ok(usize)` - Number of timers armed
    /// - `Err(AppError)` - A store file could not be read
    pub async fn resume_all(&self) -> Result<usize, AppError> {
        let repo = TimedUnitRepository::new(&self.inner.store);
        let mut armed = 0;

        for kind in UnitKind::ALL {
            for unit in repo.get_all_active(kind).await? {
                if self.arm_unit(&unit).await {
                    armed += 1;
                }
            }
        }

        tracing::info!(
            "Resumed {} timed unit(s) from the store, {} tracked in total",
            armed,
            self.tracked_count().await
        );

        Ok(armed)
    }

    /// Arms every active unit that is due at `now` and has no timer.
    ///
    /// # Returns
    /// - `Ok(usize)` - Number of timers armed
    /// - `Err(AppError)` - A store file could not be read
    pub async fn arm_overdue(&self, now: DateTime<Utc>) -> Result<usize, AppError> {
        let repo = TimedUnitRepository::new(&self.inner.store);
        let mut armed = 0;

        for kind in UnitKind::ALL {
            for unit in repo.get_all_active(kind).await? {
                if unit.due_at() <= now && self.arm_unit(&unit).await {
                    tracing::warn!("Sweep armed overdue {}", unit.key());
                    armed += 1;
                }
            }
        }

        Ok(armed)
    }
}

/// Spawns the timer task for `key` and records it. The caller holds the registry lock,
/// so the task cannot reach `begin_firing` before its slot exists.
fn arm_locked(inner: &Arc<Inner>, registry: &mut Registry, key: UnitKey, due: DateTime<Utc>) {
    let generation = registry.next_generation();
    let delay = (due - Utc::now()).to_std().unwrap_or_default();

    let task_inner = inner.clone();
    let handle = tokio::spawn(async move {
        tokio::time::sleep(delay).await;

        if !task_inner.registry.lock().await.begin_firing(key, generation) {
            return;
        }

        run(task_inner, key).await;
    });

    registry.insert_armed(key, handle.abort_handle(), generation);
    tracing::debug!("Armed {} to fire in {:?}", key, delay);
}

/// Runs the handler for `key`, retires the unit on failure and re-arms it when asked.
async fn run(inner: Arc<Inner>, key: UnitKey) {
    let handler = inner.handler.clone();

    // A panicking resolver only takes down its own task.
    let result = match tokio::spawn(async move { handler.fire(key).await }).await {
        Ok(result) => result,
        Err(e) => Err(InternalError::ResolverTaskFailed {
            unit: key.to_string(),
            reason: e.to_string(),
        }
        .into()),
    };

    let rearm_at = match result {
        Ok(FireOutcome::Rearm(at)) => Some(at),
        Ok(FireOutcome::Retired) => None,
        Err(AppError::GatewayErr(e)) if e.is_missing_target() => {
            tracing::warn!("Target of {} is gone, retiring it: {}", key, e);
            retire(&inner, key).await;
            None
        }
        Err(e) => {
            tracing::error!("Failed to fire {}: {}", key, e);
            retire(&inner, key).await;
            None
        }
    };

    let mut registry = inner.registry.lock().await;
    let may_rearm = registry.finish_firing(key);

    if let Some(at) = rearm_at {
        if may_rearm {
            arm_locked(&inner, &mut registry, key, at);
        } else {
            tracing::debug!("Not re-arming cancelled {}", key);
        }
    }
}

async fn retire(inner: &Inner, key: UnitKey) {
    if let Err(e) = inner.handler.retire(key).await {
        tracing::error!("Failed to retire {} after error: {}", key, e);
    }
}
