//! Fire-and-forget audit records.
//!
//! Recording never blocks the caller and never fails it: the database sink spawns the
//! insert and only logs when it fails.

use sea_orm::DatabaseConnection;

use crate::{
    data::audit_log::AuditLogRepository,
    model::audit::{AuditCategory, AuditLevel, CreateAuditLogParam},
};

/// Destination for audit records.
pub trait AuditSink: Send + Sync {
    /// Records one entry. Returns immediately.
    fn record(
        &self,
        level: AuditLevel,
        category: AuditCategory,
        message: String,
        context: serde_json::Value,
    );
}

/// Audit sink writing to the `audit_log` table.
#[derive(Clone)]
pub struct DatabaseAuditSink {
    db: DatabaseConnection,
}

impl DatabaseAuditSink {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl AuditSink for DatabaseAuditSink {
    fn record(
        &self,
        level: AuditLevel,
        category: AuditCategory,
        message: String,
        context: serde_json::Value,
    ) {
        let db = self.db.clone();
        let param = CreateAuditLogParam {
            level,
            category,
            message,
            context,
        };

        tokio::spawn(async move {
            if let Err(e) = AuditLogRepository::new(&db).create(param).await {
                tracing::warn!("Failed to write audit record: {:?}", e);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use test_utils::builder::TestBuilder;

    #[tokio::test]
    async fn writes_record_in_background() {
        let test = TestBuilder::new()
            .with_table(entity::prelude::AuditLog)
            .build()
            .await
            .unwrap();
        let db = test.db.clone().unwrap();

        let sink = DatabaseAuditSink::new(db.clone());
        sink.record(
            AuditLevel::Warning,
            AuditCategory::Queue,
            "Retries exhausted".to_string(),
            serde_json::json!({ "member_id": 9 }),
        );

        let repo = AuditLogRepository::new(&db);
        let mut entries = Vec::new();
        for _ in 0..50 {
            entries = repo.get_recent(1).await.unwrap();
            if !entries.is_empty() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].level, "warning");
        assert_eq!(entries[0].category, "queue");
    }
}
