use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::error::{mapping::MappingError, platform::PlatformError};

/// Errors that abort a whole sync run.
///
/// A run that fails with one of these is reported as aborted with zero processed members.
#[derive(Error, Debug)]
pub enum SyncError {
    /// The role mapping store is misconfigured.
    #[error(transparent)]
    Mapping(#[from] MappingError),

    /// Members could not be enumerated.
    #[error("Failed to enumerate members: {0}")]
    Platform(#[from] PlatformError),

    /// The mapping store could not be read.
    #[error(transparent)]
    Database(#[from] sea_orm::DbErr),
}

/// A trigger was refused by the scheduler.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TriggerError {
    /// A run is already in progress. The in-flight run is unaffected.
    #[error("Sync run #{run_id} started by {initiator} at {started_at} is still active")]
    RunAlreadyActive {
        run_id: u64,
        initiator: String,
        started_at: DateTime<Utc>,
    },
}
