use super::*;

/// Tests fetching all nation mappings.
///
/// Verifies that mappings come back ordered by normalized nation name.
///
/// Expected: Ok with mappings sorted by nation
#[tokio::test]
async fn returns_mappings_ordered_by_nation() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_mapping_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    factory::create_nation_role(db, "Cinderfall", "300").await?;
    factory::create_nation_role(db, "Avalon", "100").await?;

    let mappings = NationRoleRepository::new(db).get_all().await?;

    let nations: Vec<&str> = mappings.iter().map(|m| m.nation.as_str()).collect();
    assert_eq!(nations, vec!["avalon", "cinderfall"]);

    Ok(())
}

/// Tests fetching mappings when a stored role id is corrupt.
///
/// Expected: Err with DbErr::Custom naming the column
#[tokio::test]
async fn fails_for_unparseable_role_id() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_mapping_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    factory::create_nation_role(db, "Avalon", "not-a-role").await?;

    let result = NationRoleRepository::new(db).get_all().await;

    assert!(matches!(result, Err(DbErr::Custom(ref msg)) if msg.contains("role_id")));

    Ok(())
}
