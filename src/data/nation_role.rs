//! Nation role mapping repository.

use sea_orm::{DatabaseConnection, DbErr, EntityTrait, QueryOrder};

use crate::model::mapping::NationRoleMapping;

/// Repository providing database operations for nation to role mappings.
pub struct NationRoleRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> NationRoleRepository<'a> {
    /// Creates a new NationRoleRepository instance.
    ///
    /// # Arguments
    /// - `db` - Reference to the database connection
    ///
    /// # Returns
    /// - `NationRoleRepository` - New repository instance
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Gets every nation mapping ordered by nation name.
    ///
    /// # Returns
    /// - `Ok(Vec<NationRoleMapping>)` - All mappings
    /// - `Err(DbErr)` - Database error, or a stored role id that is not a valid u64
    pub async fn get_all(&self) -> Result<Vec<NationRoleMapping>, DbErr> {
        let entities = entity::prelude::NationRole::find()
            .order_by_asc(entity::nation_role::Column::Nation)
            .all(self.db)
            .await?;

        entities
            .into_iter()
            .map(NationRoleMapping::from_entity)
            .collect()
    }
}
