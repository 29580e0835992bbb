//! Exception list repository.

use sea_orm::{DatabaseConnection, DbErr, EntityTrait, QueryOrder};

use crate::model::mapping::SyncException;

/// Read access to the exception list.
pub struct SyncExceptionRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> SyncExceptionRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Gets every exception list entry, oldest first.
    ///
    /// # Returns
    /// - `Ok(Vec<SyncException>)` - All entries
    /// - `Err(DbErr)` - Database error, or a stored member id that is not a valid u64
    pub async fn get_all(&self) -> Result<Vec<SyncException>, DbErr> {
        let entities = entity::prelude::SyncException::find()
            .order_by_asc(entity::sync_exception::Column::CreatedAt)
            .all(self.db)
            .await?;

        entities
            .into_iter()
            .map(SyncException::from_entity)
            .collect()
    }
}
