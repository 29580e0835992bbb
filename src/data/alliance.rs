//! Alliance repository.

use sea_orm::{DatabaseConnection, DbErr, EntityTrait, QueryOrder};

use crate::model::mapping::Alliance;

/// Read access to the directed alliance edges.
///
/// Alliances are maintained by the admin tooling; the sync pipeline only reads them.
pub struct AllianceRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> AllianceRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Gets every alliance edge.
    ///
    /// # Returns
    /// - `Ok(Vec<Alliance>)` - All edges ordered by declaring nation
    /// - `Err(DbErr)` - Database error during query
    pub async fn get_all(&self) -> Result<Vec<Alliance>, DbErr> {
        let entities = entity::prelude::Alliance::find()
            .order_by_asc(entity::alliance::Column::Nation)
            .order_by_asc(entity::alliance::Column::AlliedNation)
            .all(self.db)
            .await?;

        Ok(entities.into_iter().map(Alliance::from_entity).collect())
    }
}
