//! Factory methods for creating test data.
//!
//! Each factory produces a `serde_json::Value` record in the exact format the store
//! writes to disk, so seeded files exercise the real decoding path. Defaults are
//! sensible for a unit that is active and due one hour from now.
//!
//! # Basic Usage
//!
//! ```rust,ignore
//! use test_utils::factory;
//!
//! let giveaway = factory::giveaway::create_giveaway(guild_id);
//! let poll = factory::poll::PollFactory::new()
//!     .guild_id(guild_id)
//!     .options(&["Red", "Blue"])
//!     .due_in_minutes(-5)
//!     .build();
//! ```

pub mod giveaway;
pub mod helpers;
pub mod poll;
pub mod schedule;

pub use giveaway::create_giveaway;
pub use poll::create_poll;
pub use schedule::create_schedule;
