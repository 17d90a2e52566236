//! Persistence layer for timed units.
//!
//! `store` owns the on-disk JSON files and whole-collection reads and writes;
//! `timed_unit` is the repository the service layer and scheduler go through for
//! per-unit operations.

pub mod store;
pub mod timed_unit;

#[cfg(test)]
mod test;
