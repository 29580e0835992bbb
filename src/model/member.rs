use chrono::{DateTime, Utc};
use sea_orm::DbErr;
use std::collections::BTreeSet;

use crate::util::parse::parse_u64_from_string;

/// In-game account linked to a Discord member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkedIdentity {
    /// Stable account uuid used for resident lookups.
    pub uuid: String,
    /// In-game name at the time of linking.
    pub name: String,
}

/// A guild member taking part in a sync run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub id: u64,
    pub display_name: String,
    /// Cached linked identity, resolved lazily by the worker when absent.
    pub linked: Option<LinkedIdentity>,
    pub current_roles: BTreeSet<u64>,
    pub last_synced_at: Option<DateTime<Utc>>,
}

impl Member {
    /// Whether the member holds at least one of the given roles.
    pub fn holds_any(&self, roles: &BTreeSet<u64>) -> bool {
        !self.current_roles.is_disjoint(roles)
    }
}

/// Linked account row as stored in the cache table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkedAccount {
    pub member_id: u64,
    pub identity: LinkedIdentity,
    pub linked_at: DateTime<Utc>,
    pub last_synced_at: Option<DateTime<Utc>>,
}

impl LinkedAccount {
    /// Converts an entity model to a domain model at the repository boundary.
    ///
    /// # Returns
    /// - `Ok(LinkedAccount)` - Converted model
    /// - `Err(DbErr::Custom)` - Stored member id is not a valid u64
    pub fn from_entity(entity: entity::linked_account::Model) -> Result<Self, DbErr> {
        Ok(Self {
            member_id: parse_u64_from_string("member_id", entity.member_id)?,
            identity: LinkedIdentity {
                uuid: entity.external_uuid,
                name: entity.external_name,
            },
            linked_at: entity.linked_at,
            last_synced_at: entity.last_synced_at,
        })
    }
}
