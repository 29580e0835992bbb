use super::*;

/// Tests caching a newly resolved identity and replacing it later.
///
/// Expected: Ok with the latest identity stored for the member
#[tokio::test]
async fn replaces_previous_link() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::LinkedAccount)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = LinkedAccountRepository::new(db);
    repo.upsert(
        21,
        &LinkedIdentity {
            uuid: "uuid-old".to_string(),
            name: "OldName".to_string(),
        },
    )
    .await?;
    let account = repo
        .upsert(
            21,
            &LinkedIdentity {
                uuid: "uuid-new".to_string(),
                name: "NewName".to_string(),
            },
        )
        .await?;

    assert_eq!(account.member_id, 21);
    assert_eq!(account.identity.uuid, "uuid-new");

    let accounts = repo.find_by_member_ids(&[21]).await?;
    assert_eq!(accounts[&21].identity.name, "NewName");

    Ok(())
}
