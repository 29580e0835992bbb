//! Town role factory for creating town id to role mappings.

use crate::factory::helpers::next_id;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Factory for creating town role mappings with customizable fields.
pub struct TownRoleFactory<'a> {
    db: &'a DatabaseConnection,
    town_id: String,
    town_name: String,
    nation: String,
    role_id: String,
}

impl<'a> TownRoleFactory<'a> {
    /// Creates a new TownRoleFactory with default values.
    ///
    /// Defaults:
    /// - town_id: `"town-{id}"`
    /// - town_name: `"Town {id}"`
    /// - nation: `""`
    /// - role_id: `"{id}"`
    ///
    /// # Arguments
    /// - `db` - Database connection for inserting the entity
    ///
    /// # Returns
    /// - `TownRoleFactory` - New factory instance with defaults
    pub fn new(db: &'a DatabaseConnection) -> Self {
        let id = next_id();
        Self {
            db,
            town_id: format!("town-{}", id),
            town_name: format!("Town {}", id),
            nation: String::new(),
            role_id: id.to_string(),
        }
    }

    pub fn town_id(mut self, town_id: impl Into<String>) -> Self {
        self.town_id = town_id.into();
        self
    }

    pub fn town_name(mut self, town_name: impl Into<String>) -> Self {
        self.town_name = town_name.into();
        self
    }

    pub fn nation(mut self, nation: impl Into<String>) -> Self {
        self.nation = nation.into();
        self
    }

    pub fn role_id(mut self, role_id: impl Into<String>) -> Self {
        self.role_id = role_id.into();
        self
    }

    /// Builds and inserts the town role mapping.
    ///
    /// # Returns
    /// - `Ok(entity::town_role::Model)` - Created mapping
    /// - `Err(DbErr)` - Database error during insert
    pub async fn build(self) -> Result<entity::town_role::Model, DbErr> {
        entity::town_role::ActiveModel {
            town_id: ActiveValue::Set(self.town_id),
            town_name: ActiveValue::Set(self.town_name),
            nation: ActiveValue::Set(self.nation),
            role_id: ActiveValue::Set(self.role_id),
            created_at: ActiveValue::Set(Utc::now()),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }
}

/// Creates a town role mapping for the given town id and role.
///
/// # Arguments
/// - `db` - Database connection
/// - `town_id` - Stable external town identifier
/// - `role_id` - Discord role id as string
///
/// # Returns
/// - `Ok(entity::town_role::Model)` - Created mapping
/// - `Err(DbErr)` - Database error during insert
pub async fn create_town_role(
    db: &DatabaseConnection,
    town_id: impl Into<String>,
    role_id: impl Into<String>,
) -> Result<entity::town_role::Model, DbErr> {
    TownRoleFactory::new(db)
        .town_id(town_id)
        .role_id(role_id)
        .build()
        .await
}
