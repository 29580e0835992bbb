//! Managed role history factory.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Records a role id in the managed role history.
///
/// # Arguments
/// - `db` - Database connection
/// - `role_id` - Discord role id
///
/// # Returns
/// - `Ok(entity::managed_role::Model)` - Created entry
/// - `Err(DbErr)` - Database error during insert
pub async fn create_managed_role(
    db: &DatabaseConnection,
    role_id: u64,
) -> Result<entity::managed_role::Model, DbErr> {
    entity::managed_role::ActiveModel {
        role_id: ActiveValue::Set(role_id.to_string()),
        first_seen_at: ActiveValue::Set(Utc::now()),
    }
    .insert(db)
    .await
}
