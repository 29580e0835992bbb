use super::*;

/// Tests storing an audit record and reading it back.
///
/// Verifies that level and category are stored by name and the JSON context
/// round-trips.
///
/// Expected: Ok with the record returned newest first
#[tokio::test]
async fn stores_record_with_context() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::AuditLog)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = AuditLogRepository::new(db);
    repo.create(CreateAuditLogParam {
        level: AuditLevel::Info,
        category: AuditCategory::Scheduler,
        message: "Sync run #1 started".to_string(),
        context: serde_json::json!({ "run_id": 1 }),
    })
    .await?;
    repo.create(CreateAuditLogParam {
        level: AuditLevel::Error,
        category: AuditCategory::Role,
        message: "Role update refused".to_string(),
        context: serde_json::json!({ "member_id": 42 }),
    })
    .await?;

    let recent = repo.get_recent(10).await?;

    assert_eq!(recent.len(), 2);
    assert_eq!(recent[0].level, "error");
    assert_eq!(recent[0].category, "role");
    assert_eq!(recent[0].context["member_id"], 42);
    assert_eq!(recent[1].message, "Sync run #1 started");

    Ok(())
}
