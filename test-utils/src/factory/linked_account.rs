//! Linked account factory for caching external identities.

use crate::factory::helpers::next_id;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Factory for creating linked account rows.
pub struct LinkedAccountFactory<'a> {
    db: &'a DatabaseConnection,
    member_id: String,
    external_uuid: String,
    external_name: String,
}

impl<'a> LinkedAccountFactory<'a> {
    /// Creates a new LinkedAccountFactory with default values.
    ///
    /// Defaults:
    /// - member_id: `"{id}"`
    /// - external_uuid: `"uuid-{id}"`
    /// - external_name: `"player{id}"`
    pub fn new(db: &'a DatabaseConnection) -> Self {
        let id = next_id();
        Self {
            db,
            member_id: id.to_string(),
            external_uuid: format!("uuid-{}", id),
            external_name: format!("player{}", id),
        }
    }

    pub fn member_id(mut self, member_id: u64) -> Self {
        self.member_id = member_id.to_string();
        self
    }

    pub fn external_uuid(mut self, external_uuid: impl Into<String>) -> Self {
        self.external_uuid = external_uuid.into();
        self
    }

    pub fn external_name(mut self, external_name: impl Into<String>) -> Self {
        self.external_name = external_name.into();
        self
    }

    /// Builds and inserts the linked account.
    ///
    /// # Returns
    /// - `Ok(entity::linked_account::Model)` - Created row
    /// - `Err(DbErr)` - Database error during insert
    pub async fn build(self) -> Result<entity::linked_account::Model, DbErr> {
        entity::linked_account::ActiveModel {
            member_id: ActiveValue::Set(self.member_id),
            external_uuid: ActiveValue::Set(self.external_uuid),
            external_name: ActiveValue::Set(self.external_name),
            linked_at: ActiveValue::Set(Utc::now()),
            last_synced_at: ActiveValue::Set(None),
        }
        .insert(self.db)
        .await
    }
}

/// Creates a linked account with default external identity for the member.
///
/// # Arguments
/// - `db` - Database connection
/// - `member_id` - Discord member id
///
/// # Returns
/// - `Ok(entity::linked_account::Model)` - Created row
/// - `Err(DbErr)` - Database error during insert
pub async fn create_linked_account(
    db: &DatabaseConnection,
    member_id: u64,
) -> Result<entity::linked_account::Model, DbErr> {
    LinkedAccountFactory::new(db).member_id(member_id).build().await
}
