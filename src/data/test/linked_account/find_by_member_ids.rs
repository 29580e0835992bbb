use super::*;

/// Tests finding cached accounts for a mix of linked and unlinked members.
///
/// Expected: Ok with only linked members present in the map
#[tokio::test]
async fn returns_only_cached_members() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::LinkedAccount)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let cached = factory::create_linked_account(db, 11).await?;

    let accounts = LinkedAccountRepository::new(db)
        .find_by_member_ids(&[11, 12])
        .await?;

    assert_eq!(accounts.len(), 1);
    assert_eq!(accounts[&11].identity.uuid, cached.external_uuid);
    assert!(!accounts.contains_key(&12));

    Ok(())
}

/// Tests finding accounts with no member ids.
///
/// Expected: Ok with empty map
#[tokio::test]
async fn returns_empty_for_no_ids() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::LinkedAccount)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let accounts = LinkedAccountRepository::new(db)
        .find_by_member_ids(&[])
        .await?;

    assert!(accounts.is_empty());

    Ok(())
}
