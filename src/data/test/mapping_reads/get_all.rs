use super::*;

/// Tests reading alliance edges.
///
/// Expected: Ok with normalized, directed edges
#[tokio::test]
async fn reads_directed_alliances() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_mapping_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    factory::create_alliance(db, "Avalon", "Brightwater").await?;

    let alliances = AllianceRepository::new(db).get_all().await?;

    assert_eq!(alliances.len(), 1);
    assert_eq!(alliances[0].nation, "avalon");
    assert_eq!(alliances[0].allied_nation, "brightwater");

    Ok(())
}

/// Tests reading the exception list.
///
/// Expected: Ok with member ids parsed
#[tokio::test]
async fn reads_exceptions() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_mapping_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    factory::create_exception(db, 77, "server owner").await?;

    let exceptions = SyncExceptionRepository::new(db).get_all().await?;

    assert_eq!(exceptions.len(), 1);
    assert_eq!(exceptions[0].member_id, 77);
    assert_eq!(exceptions[0].reason, "server owner");

    Ok(())
}

/// Tests reading target role ids.
///
/// Expected: Ok with every configured target role
#[tokio::test]
async fn reads_target_roles() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_mapping_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    factory::create_target_role(db, 500).await?;
    factory::create_target_role(db, 501).await?;

    let ids = SyncTargetRoleRepository::new(db).get_all_ids().await?;

    assert_eq!(ids.into_iter().collect::<Vec<_>>(), vec![500, 501]);

    Ok(())
}
