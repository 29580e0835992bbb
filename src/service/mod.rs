//! Business logic of the sync pipeline.
//!
//! - `mapping` - Per-run snapshot of the role mapping store
//! - `external` - Game API client boundary
//! - `platform` - Discord boundary
//! - `sync` - Reconciler, worker queue and the run pipeline
//! - `report` - Tabular export and run digest
//! - `audit` - Fire-and-forget audit records

pub mod audit;
pub mod external;
pub mod mapping;
pub mod platform;
pub mod report;
pub mod sync;

#[cfg(test)]
pub(crate) mod fake;
