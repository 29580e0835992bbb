//! Linked account cache repository.

use chrono::{DateTime, Utc};
use migration::OnConflict;
use sea_orm::{ActiveValue, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter};
use std::collections::HashMap;

use crate::model::member::{LinkedAccount, LinkedIdentity};

/// Repository for the Discord id to game account cache.
///
/// Cached identities let a run skip the identity lookup against the game API.
pub struct LinkedAccountRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> LinkedAccountRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds cached accounts for the given members.
    ///
    /// # Arguments
    /// - `member_ids` - Discord ids to look up
    ///
    /// # Returns
    /// - `Ok(HashMap<u64, LinkedAccount>)` - Cached accounts keyed by member id; members
    ///   without a cached account are absent
    /// - `Err(DbErr)` - Database error during query
    pub async fn find_by_member_ids(
        &self,
        member_ids: &[u64],
    ) -> Result<HashMap<u64, LinkedAccount>, DbErr> {
        if member_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let ids: Vec<String> = member_ids.iter().map(|id| id.to_string()).collect();
        let mut accounts = HashMap::with_capacity(ids.len());

        // SQLite caps bound parameters per statement
        for chunk in ids.chunks(500) {
            let entities = entity::prelude::LinkedAccount::find()
                .filter(entity::linked_account::Column::MemberId.is_in(chunk.to_vec()))
                .all(self.db)
                .await?;

            for entity in entities {
                let account = LinkedAccount::from_entity(entity)?;
                accounts.insert(account.member_id, account);
            }
        }

        Ok(accounts)
    }

    /// Caches the game account linked to a member, replacing any previous link.
    ///
    /// # Arguments
    /// - `member_id` - Discord id of the member
    /// - `identity` - Linked game account
    ///
    /// # Returns
    /// - `Ok(LinkedAccount)` - The stored account
    /// - `Err(DbErr)` - Database error during insert or update
    pub async fn upsert(
        &self,
        member_id: u64,
        identity: &LinkedIdentity,
    ) -> Result<LinkedAccount, DbErr> {
        let entity = entity::prelude::LinkedAccount::insert(entity::linked_account::ActiveModel {
            member_id: ActiveValue::Set(member_id.to_string()),
            external_uuid: ActiveValue::Set(identity.uuid.clone()),
            external_name: ActiveValue::Set(identity.name.clone()),
            linked_at: ActiveValue::Set(Utc::now()),
            last_synced_at: ActiveValue::Set(None),
        })
        .on_conflict(
            OnConflict::column(entity::linked_account::Column::MemberId)
                .update_columns([
                    entity::linked_account::Column::ExternalUuid,
                    entity::linked_account::Column::ExternalName,
                    entity::linked_account::Column::LinkedAt,
                ])
                .to_owned(),
        )
        .exec_with_returning(self.db)
        .await?;

        LinkedAccount::from_entity(entity)
    }

    /// Sets the last sync timestamp for multiple members at once.
    ///
    /// # Arguments
    /// - `member_ids` - Discord ids of synced members
    /// - `synced_at` - Timestamp to store
    ///
    /// # Returns
    /// - `Ok(())` - Timestamps updated (returns early if slice is empty)
    /// - `Err(DbErr)` - Database error during update
    pub async fn update_synced_at(
        &self,
        member_ids: &[u64],
        synced_at: DateTime<Utc>,
    ) -> Result<(), DbErr> {
        if member_ids.is_empty() {
            return Ok(());
        }

        let ids: Vec<String> = member_ids.iter().map(|id| id.to_string()).collect();
        for chunk in ids.chunks(500) {
            entity::prelude::LinkedAccount::update_many()
                .filter(entity::linked_account::Column::MemberId.is_in(chunk.to_vec()))
                .col_expr(
                    entity::linked_account::Column::LastSyncedAt,
                    sea_orm::sea_query::Expr::value(synced_at),
                )
                .exec(self.db)
                .await?;
        }

        Ok(())
    }
}
