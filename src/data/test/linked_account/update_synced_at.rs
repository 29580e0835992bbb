use super::*;

/// Tests stamping the last sync time on a subset of members.
///
/// Expected: Ok with only the given members stamped
#[tokio::test]
async fn stamps_only_given_members() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::LinkedAccount)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    factory::create_linked_account(db, 31).await?;
    factory::create_linked_account(db, 32).await?;

    let repo = LinkedAccountRepository::new(db);
    repo.update_synced_at(&[31], Utc::now()).await?;

    let accounts = repo.find_by_member_ids(&[31, 32]).await?;
    assert!(accounts[&31].last_synced_at.is_some());
    assert!(accounts[&32].last_synced_at.is_none());

    Ok(())
}
