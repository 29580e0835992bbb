//! Exception list factory.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Adds a member to the exception list.
///
/// # Arguments
/// - `db` - Database connection
/// - `member_id` - Discord member id
/// - `reason` - Why the member is skipped
///
/// # Returns
/// - `Ok(entity::sync_exception::Model)` - Created entry
/// - `Err(DbErr)` - Database error during insert
pub async fn create_exception(
    db: &DatabaseConnection,
    member_id: u64,
    reason: &str,
) -> Result<entity::sync_exception::Model, DbErr> {
    entity::sync_exception::ActiveModel {
        member_id: ActiveValue::Set(member_id.to_string()),
        reason: ActiveValue::Set(reason.to_string()),
        created_at: ActiveValue::Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
}
