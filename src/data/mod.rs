//! Database repository layer for the role mapping store and its collaborators.
//!
//! Repositories use SeaORM entity models internally and return domain models so the sync
//! pipeline stays independent of the storage layer. Every query against the store goes
//! through one of these structs.

pub mod alliance;
pub mod audit_log;
pub mod linked_account;
pub mod managed_role;
pub mod nation_role;
pub mod sync_exception;
pub mod sync_target_role;
pub mod town_role;

#[cfg(test)]
mod test;
