//! The sync pipeline.
//!
//! - `reconciler` - Pure role diff computation
//! - `task` - One attempt at syncing one member
//! - `queue` - Throttled worker pool with retry and backoff
//! - `pipeline` - A whole run, from enumeration to report

pub mod pipeline;
pub mod queue;
pub mod reconciler;
pub mod task;

pub use pipeline::SyncPipeline;
