//! Nation role factory for creating nation to role mappings.

use crate::factory::helpers::{next_id, normalize_nation};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Factory for creating nation role mappings with customizable fields.
///
/// # Example
///
/// ```rust,ignore
/// let mapping = NationRoleFactory::new(&db)
///     .nation("Avalon")
///     .role_id("100")
///     .build()
///     .await?;
/// ```
pub struct NationRoleFactory<'a> {
    db: &'a DatabaseConnection,
    nation: String,
    role_id: String,
    allied_role_id: Option<String>,
}

impl<'a> NationRoleFactory<'a> {
    /// Creates a new NationRoleFactory with default values.
    ///
    /// Defaults:
    /// - nation: `"Nation {id}"`
    /// - role_id: `"{id}"`
    /// - allied_role_id: `None`
    ///
    /// # Arguments
    /// - `db` - Database connection for inserting the entity
    ///
    /// # Returns
    /// - `NationRoleFactory` - New factory instance with defaults
    pub fn new(db: &'a DatabaseConnection) -> Self {
        let id = next_id();
        Self {
            db,
            nation: format!("Nation {}", id),
            role_id: id.to_string(),
            allied_role_id: None,
        }
    }

    /// Sets the nation name. The stored lookup key is normalized.
    pub fn nation(mut self, nation: impl Into<String>) -> Self {
        self.nation = nation.into();
        self
    }

    /// Sets the role granted to members of the nation.
    pub fn role_id(mut self, role_id: impl Into<String>) -> Self {
        self.role_id = role_id.into();
        self
    }

    /// Sets the role granted to members of nations allied with this one.
    pub fn allied_role_id(mut self, allied_role_id: impl Into<String>) -> Self {
        self.allied_role_id = Some(allied_role_id.into());
        self
    }

    /// Builds and inserts the nation role mapping.
    ///
    /// # Returns
    /// - `Ok(entity::nation_role::Model)` - Created mapping
    /// - `Err(DbErr)` - Database error during insert
    pub async fn build(self) -> Result<entity::nation_role::Model, DbErr> {
        entity::nation_role::ActiveModel {
            nation: ActiveValue::Set(normalize_nation(&self.nation)),
            display_name: ActiveValue::Set(self.nation),
            role_id: ActiveValue::Set(self.role_id),
            allied_role_id: ActiveValue::Set(self.allied_role_id),
            created_at: ActiveValue::Set(Utc::now()),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }
}

/// Creates a nation role mapping for the given nation and role.
///
/// # Arguments
/// - `db` - Database connection
/// - `nation` - Nation name
/// - `role_id` - Discord role id as string
///
/// # Returns
/// - `Ok(entity::nation_role::Model)` - Created mapping
/// - `Err(DbErr)` - Database error during insert
pub async fn create_nation_role(
    db: &DatabaseConnection,
    nation: impl Into<String>,
    role_id: impl Into<String>,
) -> Result<entity::nation_role::Model, DbErr> {
    NationRoleFactory::new(db)
        .nation(nation)
        .role_id(role_id)
        .build()
        .await
}
