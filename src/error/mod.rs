//! Error types for the sync service.
//!
//! `AppError` is the top-level error returned from startup and wiring code. Each concern
//! has its own enum: configuration, the role mapping store, the external game API, the
//! chat platform and run-level sync failures. Per-member errors never escape a run; they
//! are folded into outcome rows by the queue.

pub mod config;
pub mod external;
pub mod mapping;
pub mod platform;
pub mod sync;

use thiserror::Error;

use crate::error::{
    config::ConfigError, external::ExternalError, mapping::MappingError, platform::PlatformError,
    sync::SyncError,
};

/// Top-level application error type.
///
/// Aggregates the error types that can occur while starting and running the service. Most
/// variants use `#[from]` for automatic conversion with `?`.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration error during startup or environment variable loading.
    #[error(transparent)]
    ConfigErr(#[from] ConfigError),

    /// Role mapping store failed validation.
    #[error(transparent)]
    MappingErr(#[from] MappingError),

    /// Database operation error from SeaORM.
    #[error(transparent)]
    DbErr(#[from] sea_orm::DbErr),

    /// HTTP client request error from reqwest.
    #[error(transparent)]
    ReqwestErr(#[from] reqwest::Error),

    /// Discord API error from Serenity.
    ///
    /// Boxed due to large size.
    #[error(transparent)]
    DiscordErr(#[from] Box<serenity::Error>),

    /// Cron scheduler error.
    #[error(transparent)]
    SchedulerErr(#[from] tokio_cron_scheduler::JobSchedulerError),

    /// External game API error outside of a sync run.
    #[error(transparent)]
    ExternalErr(#[from] ExternalError),

    /// Chat platform error outside of a sync run.
    #[error(transparent)]
    PlatformErr(#[from] PlatformError),

    /// Run-level sync failure.
    #[error(transparent)]
    SyncErr(#[from] SyncError),

    /// Filesystem error, e.g. while preparing the export directory.
    #[error(transparent)]
    IoErr(#[from] std::io::Error),

    /// Writing a tabular export failed.
    #[error(transparent)]
    CsvErr(#[from] csv::Error),

    /// Tracing subscriber could not be installed.
    #[error("{0}")]
    InternalError(String),
}

/// Manual conversion from serenity::Error to AppError.
///
/// Boxes the error to reduce the size of the AppError enum, as serenity::Error
/// is very large and would make all AppError variants larger if not boxed.
impl From<serenity::Error> for AppError {
    fn from(err: serenity::Error) -> Self {
        AppError::DiscordErr(Box::new(err))
    }
}
