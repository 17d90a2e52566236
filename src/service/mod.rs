//! Business logic for the timed features.
//!
//! - `giveaway`, `poll`, `schedule` - Announcing units and resolving them at fire time
//! - `resolver` - `FireHandler` that dispatches a firing unit to its feature service
//! - `lifecycle` - Create, cancel and end-early operations that span store and scheduler

pub mod giveaway;
pub mod lifecycle;
pub mod poll;
pub mod resolver;
pub mod schedule;

/// Display format for instants in cards and replies.
pub(crate) const UTC_DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";
