//! Test factories for creating Serenity API objects.
//!
//! These factories create valid Serenity structs by deserializing JSON, simulating
//! what Discord's API would return. They are used to test the code that turns raw
//! reaction data into participant sets and vote counts.
//!
//! # Usage
//!
//! ```rust,ignore
//! use test_utils::serenity::{create_test_reaction, create_test_user};
//!
//! let users = vec![create_test_user(1, "alice"), create_test_user(2, "bob")];
//! let reactions = vec![create_test_reaction("👍", 3, true)];
//! ```

pub mod reaction;
pub mod user;

pub use reaction::create_test_reaction;
pub use user::create_test_user;
