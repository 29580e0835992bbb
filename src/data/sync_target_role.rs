//! Sync target role repository.

use sea_orm::{DatabaseConnection, DbErr, EntityTrait};
use std::collections::BTreeSet;

use crate::util::parse::parse_u64_from_string;

/// Read access to the roles whose holders make up a run's population.
pub struct SyncTargetRoleRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> SyncTargetRoleRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Gets the ids of every target role.
    ///
    /// # Returns
    /// - `Ok(BTreeSet<u64>)` - Target role ids
    /// - `Err(DbErr)` - Database error, or a stored role id that is not a valid u64
    pub async fn get_all_ids(&self) -> Result<BTreeSet<u64>, DbErr> {
        let entities = entity::prelude::SyncTargetRole::find().all(self.db).await?;

        entities
            .into_iter()
            .map(|e| parse_u64_from_string("role_id", e.role_id))
            .collect()
    }
}
