//! Herald Test Utils
//!
//! Provides shared testing utilities for the herald bot. This crate offers a builder
//! pattern for creating test contexts backed by a temporary data directory that can be
//! seeded with store files before the code under test opens them.
//!
//! # Overview
//!
//! The test utilities consist of these main components:
//! - **TestBuilder**: Fluent builder for seeding store files
//! - **TestContext**: Test environment owning the temporary data directory
//! - **TestError**: Error types that can occur during test setup
//! - **factory**: JSON record factories in the exact on-disk store format
//! - **serenity**: Serenity API objects for gateway-level tests
//!
//! # Usage
//!
//! ```rust,ignore
//! use test_utils::{builder::TestBuilder, factory::giveaway::GiveawayFactory};
//!
//! #[tokio::test]
//! async fn loads_seeded_giveaway() -> Result<(), TestError> {
//!     let test = TestBuilder::new()
//!         .with_record("giveaways.json", GiveawayFactory::new().prize("Nitro").build())
//!         .build()
//!         .await?;
//!
//!     let store = JsonStore::new(test.data_dir());
//!     // Exercise the store...
//!
//!     Ok(())
//! }
//! ```

pub mod builder;
pub mod context;
pub mod error;
pub mod factory;
pub mod serenity;
