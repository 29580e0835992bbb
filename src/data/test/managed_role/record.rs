use super::*;

/// Tests recording role ids that are partly known already.
///
/// Verifies that already recorded ids are skipped without error.
///
/// Expected: Ok with each id stored once
#[tokio::test]
async fn skips_already_recorded_ids() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_mapping_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    factory::create_managed_role(db, 100).await?;

    let repo = ManagedRoleRepository::new(db);
    repo.record(&[100, 200]).await?;

    let mut ids = repo.get_all_ids().await?;
    ids.sort();
    assert_eq!(ids, vec![100, 200]);

    Ok(())
}

/// Tests recording an empty slice.
///
/// Expected: Ok with nothing stored
#[tokio::test]
async fn accepts_empty_slice() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_mapping_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = ManagedRoleRepository::new(db);
    repo.record(&[]).await?;

    assert!(repo.get_all_ids().await?.is_empty());

    Ok(())
}
