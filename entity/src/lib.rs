//! SeaORM entity models for the role mapping store, the linked account cache, and the
//! audit log.
//!
//! Discord snowflakes are stored as strings and parsed into `u64` at the repository
//! boundary.

pub mod prelude;

pub mod alliance;
pub mod audit_log;
pub mod linked_account;
pub mod managed_role;
pub mod nation_role;
pub mod sync_exception;
pub mod sync_target_role;
pub mod town_role;
