//! Application state shared with the Discord event handler.

use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::{config::Config, scheduler::SyncScheduler};

/// Shared resources handed to the bot.
///
/// Cheap to clone: the connection is a pool and the rest is reference counted.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: Arc<Config>,
    /// Same scheduler the weekly timer uses, so both triggers share one run-active flag.
    pub scheduler: Arc<SyncScheduler>,
}

impl AppState {
    pub fn new(db: DatabaseConnection, config: Arc<Config>, scheduler: Arc<SyncScheduler>) -> Self {
        Self {
            db,
            config,
            scheduler,
        }
    }
}
