//! Managed role history repository.

use chrono::Utc;
use migration::OnConflict;
use sea_orm::{ActiveValue, DatabaseConnection, DbErr, EntityTrait};

use crate::util::parse::parse_u64_from_string;

/// Repository for the append-only history of managed role ids.
///
/// A role that was once used by a mapping stays in the managed namespace, so members
/// still holding it after the mapping changed get it removed.
pub struct ManagedRoleRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> ManagedRoleRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Records role ids in the history. Ids already present are left untouched.
    ///
    /// # Arguments
    /// - `role_ids` - Role ids to record
    ///
    /// # Returns
    /// - `Ok(())` - All ids are now recorded
    /// - `Err(DbErr)` - Database error during insert
    pub async fn record(&self, role_ids: &[u64]) -> Result<(), DbErr> {
        for role_id in role_ids {
            entity::prelude::ManagedRole::insert(entity::managed_role::ActiveModel {
                role_id: ActiveValue::Set(role_id.to_string()),
                first_seen_at: ActiveValue::Set(Utc::now()),
            })
            .on_conflict(
                OnConflict::column(entity::managed_role::Column::RoleId)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(self.db)
            .await?;
        }

        Ok(())
    }

    /// Gets every role id in the history.
    ///
    /// # Returns
    /// - `Ok(Vec<u64>)` - Recorded role ids
    /// - `Err(DbErr)` - Database error, or a stored id that is not a valid u64
    pub async fn get_all_ids(&self) -> Result<Vec<u64>, DbErr> {
        let entities = entity::prelude::ManagedRole::find().all(self.db).await?;

        entities
            .into_iter()
            .map(|e| parse_u64_from_string("role_id", e.role_id))
            .collect()
    }
}
