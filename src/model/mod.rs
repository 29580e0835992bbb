//! Domain models shared by the repositories, services and the scheduler.
//!
//! Repositories convert SeaORM entities into these types at the data boundary so the
//! sync pipeline never depends on entity models directly.

pub mod affiliation;
pub mod audit;
pub mod mapping;
pub mod member;
pub mod report;
pub mod role_diff;
pub mod sync;
