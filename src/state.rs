//! Shared state handed to the Discord event handler.
//!
//! Built once in `main` and cloned into every command invocation. All fields are
//! reference counted, so cloning is cheap.

use std::sync::Arc;

use crate::{data::store::JsonStore, gateway::Gateway, scheduler::Scheduler};

#[derive(Clone)]
pub struct AppState {
    /// Durable home of every timed unit.
    pub store: Arc<JsonStore>,

    /// Chat platform used to post, edit and read announcements.
    pub gateway: Arc<dyn Gateway>,

    /// Timer registry; the same instance the minute sweep runs against.
    pub scheduler: Scheduler,
}

impl AppState {
    /// Creates the application state.
    ///
    /// # Arguments
    /// - `store` - Store for all timed units
    /// - `gateway` - Chat platform adapter
    /// - `scheduler` - Scheduler built over the same store
    pub fn new(store: Arc<JsonStore>, gateway: Arc<dyn Gateway>, scheduler: Scheduler) -> Self {
        Self {
            store,
            gateway,
            scheduler,
        }
    }
}
