//! Alliance factory for creating directed alliance edges.

use crate::factory::helpers::normalize_nation;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Creates an alliance edge where `nation` lists `allied_nation` as an ally.
///
/// Both names are normalized before they are stored.
///
/// # Arguments
/// - `db` - Database connection
/// - `nation` - Nation that declares the alliance
/// - `allied_nation` - Nation listed as ally
///
/// # Returns
/// - `Ok(entity::alliance::Model)` - Created edge
/// - `Err(DbErr)` - Database error during insert
pub async fn create_alliance(
    db: &DatabaseConnection,
    nation: &str,
    allied_nation: &str,
) -> Result<entity::alliance::Model, DbErr> {
    entity::alliance::ActiveModel {
        nation: ActiveValue::Set(normalize_nation(nation)),
        allied_nation: ActiveValue::Set(normalize_nation(allied_nation)),
        created_at: ActiveValue::Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
}
