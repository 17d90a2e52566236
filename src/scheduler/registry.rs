//! In-memory bookkeeping of which units have a live timer or a running resolver.
//!
//! A key is in the registry from the moment it is armed until its run finishes or it
//! is cancelled. The registry never touches durable state.

use std::collections::HashMap;

use tokio::task::AbortHandle;

use crate::model::unit::UnitKey;

#[derive(Debug)]
enum Slot {
    /// A timer task is sleeping until the due time.
    Armed { handle: AbortHandle, generation: u64 },
    /// The resolver is running. `cancelled` blocks the re-arm of repeating units.
    Firing { cancelled: bool },
}

/// What `fire_now` found for a key.
#[derive(Debug)]
pub enum Preempt {
    /// Nothing was registered.
    Idle,
    /// A pending timer was removed; its task has been aborted.
    Replaced,
    /// The resolver is already running; nothing changed.
    Busy,
}

#[derive(Debug, Default)]
pub struct Registry {
    slots: HashMap<UnitKey, Slot>,
    next_generation: u64,
}

impl Registry {
    pub fn contains(&self, key: &UnitKey) -> bool {
        self.slots.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Hands out the generation for the next timer.
    pub fn next_generation(&mut self) -> u64 {
        self.next_generation += 1;
        self.next_generation
    }

    pub fn insert_armed(&mut self, key: UnitKey, handle: AbortHandle, generation: u64) {
        self.slots.insert(key, Slot::Armed { handle, generation });
    }

    /// Moves a slot from Armed to Firing when the waking timer still owns it.
    ///
    /// # Returns
    /// - `true` - The caller owns the run and must call `finish_firing` afterwards
    /// - `false` - The timer is stale (cancelled or replaced) and must not fire
    pub fn begin_firing(&mut self, key: UnitKey, generation: u64) -> bool {
        match self.slots.get(&key) {
            Some(Slot::Armed {
                generation: current,
                ..
            }) if *current == generation => {
                self.slots.insert(key, Slot::Firing { cancelled: false });
                true
            }
            _ => false,
        }
    }

    /// Removes a finished run's slot.
    ///
    /// # Returns
    /// - `true` - No cancel arrived during the run; a repeating unit may be re-armed
    /// - `false` - The run was cancelled or the slot was not firing
    pub fn finish_firing(&mut self, key: UnitKey) -> bool {
        match self.slots.remove(&key) {
            Some(Slot::Firing { cancelled }) => !cancelled,
            Some(armed @ Slot::Armed { .. }) => {
                self.slots.insert(key, armed);
                false
            }
            None => false,
        }
    }

    /// Cancels whatever is registered for `key`.
    ///
    /// A pending timer is aborted and removed. A running resolver cannot be stopped;
    /// it is flagged so its unit is not re-armed when it finishes.
    ///
    /// # Returns
    /// - `true` - Something was registered for the key
    /// - `false` - Unknown or already finished key
    pub fn cancel(&mut self, key: UnitKey) -> bool {
        match self.slots.get_mut(&key) {
            Some(Slot::Armed { handle, .. }) => {
                handle.abort();
                self.slots.remove(&key);
                true
            }
            Some(Slot::Firing { cancelled }) => {
                *cancelled = true;
                true
            }
            None => false,
        }
    }

    /// Clears a pending timer so the caller can arm an immediate run in its place.
    pub fn preempt(&mut self, key: UnitKey) -> Preempt {
        match self.slots.get(&key) {
            Some(Slot::Firing { .. }) => Preempt::Busy,
            Some(Slot::Armed { handle, .. }) => {
                handle.abort();
                self.slots.remove(&key);
                Preempt::Replaced
            }
            None => Preempt::Idle,
        }
    }
}
