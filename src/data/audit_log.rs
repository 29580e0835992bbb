//! Audit log repository.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr, EntityTrait, QueryOrder, QuerySelect};

use crate::model::audit::{AuditLogEntry, CreateAuditLogParam};

/// Repository for persisted audit records.
pub struct AuditLogRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> AuditLogRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Stores one audit record.
    ///
    /// # Arguments
    /// - `param` - Level, category, message and JSON context
    ///
    /// # Returns
    /// - `Ok(AuditLogEntry)` - The stored record
    /// - `Err(DbErr)` - Database error during insert
    pub async fn create(&self, param: CreateAuditLogParam) -> Result<AuditLogEntry, DbErr> {
        let entity = entity::audit_log::ActiveModel {
            level: ActiveValue::Set(param.level.as_str().to_string()),
            category: ActiveValue::Set(param.category.as_str().to_string()),
            message: ActiveValue::Set(param.message),
            context: ActiveValue::Set(param.context.to_string()),
            created_at: ActiveValue::Set(Utc::now()),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        Ok(AuditLogEntry::from_entity(entity))
    }

    /// Gets the most recent audit records, newest first.
    ///
    /// # Arguments
    /// - `limit` - Maximum number of records to return
    ///
    /// # Returns
    /// - `Ok(Vec<AuditLogEntry>)` - Up to `limit` records
    /// - `Err(DbErr)` - Database error during query
    pub async fn get_recent(&self, limit: u64) -> Result<Vec<AuditLogEntry>, DbErr> {
        let entities = entity::prelude::AuditLog::find()
            .order_by_desc(entity::audit_log::Column::Id)
            .limit(limit)
            .all(self.db)
            .await?;

        Ok(entities.into_iter().map(AuditLogEntry::from_entity).collect())
    }
}
