//! Domain models and operation-specific parameter types.
//!
//! `unit` holds the envelope every timed feature shares; the other modules hold the
//! per-feature payloads and the parameter structs the command layer builds.

pub mod giveaway;
pub mod poll;
pub mod schedule;
pub mod unit;
