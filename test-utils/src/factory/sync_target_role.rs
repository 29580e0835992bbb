//! Target role factory.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Marks a role as a sync target.
///
/// # Arguments
/// - `db` - Database connection
/// - `role_id` - Discord role id
///
/// # Returns
/// - `Ok(entity::sync_target_role::Model)` - Created entry
/// - `Err(DbErr)` - Database error during insert
pub async fn create_target_role(
    db: &DatabaseConnection,
    role_id: u64,
) -> Result<entity::sync_target_role::Model, DbErr> {
    entity::sync_target_role::ActiveModel {
        role_id: ActiveValue::Set(role_id.to_string()),
        created_at: ActiveValue::Set(Utc::now()),
    }
    .insert(db)
    .await
}
