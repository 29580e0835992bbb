//! Town role mapping repository.

use sea_orm::{DatabaseConnection, DbErr, EntityTrait, QueryOrder};

use crate::model::mapping::TownRoleMapping;

/// Repository providing database operations for town to role mappings.
///
/// Towns are keyed by their stable external id, never by display name, so renaming a
/// town in-game does not break its mapping.
pub struct TownRoleRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> TownRoleRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Gets every town mapping ordered by town id.
    ///
    /// # Returns
    /// - `Ok(Vec<TownRoleMapping>)` - All mappings
    /// - `Err(DbErr)` - Database error, or a stored role id that is not a valid u64
    pub async fn get_all(&self) -> Result<Vec<TownRoleMapping>, DbErr> {
        let entities = entity::prelude::TownRole::find()
            .order_by_asc(entity::town_role::Column::TownId)
            .all(self.db)
            .await?;

        entities
            .into_iter()
            .map(TownRoleMapping::from_entity)
            .collect()
    }
}
