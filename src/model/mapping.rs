//! Role mapping store models and the per-run mapping snapshot.
//!
//! `RoleMappings` is built once per run from the stored mappings, validated eagerly and
//! then shared read-only by every task of that run.

use chrono::{DateTime, Utc};
use sea_orm::DbErr;
use std::collections::{BTreeSet, HashMap};

use crate::{error::mapping::MappingError, util::parse::parse_u64_from_string};

/// Normalizes a nation name for lookups: trimmed and lowercased.
pub fn normalize_nation_name(name: &str) -> String {
    name.trim().to_lowercase()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NationRoleMapping {
    pub id: i32,
    /// Normalized nation name.
    pub nation: String,
    pub display_name: String,
    pub role_id: u64,
    /// Granted to members of nations that list this nation as an ally.
    pub allied_role_id: Option<u64>,
}

impl NationRoleMapping {
    /// Converts an entity model to a domain model at the repository boundary.
    ///
    /// # Returns
    /// - `Ok(NationRoleMapping)` - Converted model
    /// - `Err(DbErr::Custom)` - A stored role id is not a valid u64
    pub fn from_entity(entity: entity::nation_role::Model) -> Result<Self, DbErr> {
        Ok(Self {
            id: entity.id,
            nation: entity.nation,
            display_name: entity.display_name,
            role_id: parse_u64_from_string("role_id", entity.role_id)?,
            allied_role_id: entity
                .allied_role_id
                .map(|id| parse_u64_from_string("allied_role_id", id))
                .transpose()?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TownRoleMapping {
    pub id: i32,
    pub town_id: String,
    pub town_name: String,
    pub nation: String,
    pub role_id: u64,
}

impl TownRoleMapping {
    /// Converts an entity model to a domain model at the repository boundary.
    pub fn from_entity(entity: entity::town_role::Model) -> Result<Self, DbErr> {
        Ok(Self {
            id: entity.id,
            town_id: entity.town_id,
            town_name: entity.town_name,
            nation: entity.nation,
            role_id: parse_u64_from_string("role_id", entity.role_id)?,
        })
    }
}

/// Directed alliance edge between two normalized nation names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alliance {
    pub nation: String,
    pub allied_nation: String,
}

impl Alliance {
    pub fn from_entity(entity: entity::alliance::Model) -> Self {
        Self {
            nation: entity.nation,
            allied_nation: entity.allied_nation,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncException {
    pub member_id: u64,
    pub reason: String,
    pub created_at: DateTime<Utc>,
}

impl SyncException {
    pub fn from_entity(entity: entity::sync_exception::Model) -> Result<Self, DbErr> {
        Ok(Self {
            member_id: parse_u64_from_string("member_id", entity.member_id)?,
            reason: entity.reason,
            created_at: entity.created_at,
        })
    }
}

/// Citizen/foreigner status roles.
///
/// Members of the home nation or of a nation the home nation lists as ally receive the
/// citizen role; any other resolved resident receives the foreigner role.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusRoleConfig {
    pub home_nation: Option<String>,
    pub citizen_role_id: Option<u64>,
    pub foreigner_role_id: Option<u64>,
}

/// Everything loaded from the store for one snapshot, before validation.
#[derive(Debug, Clone, Default)]
pub struct MappingSource {
    pub nations: Vec<NationRoleMapping>,
    pub towns: Vec<TownRoleMapping>,
    pub alliances: Vec<Alliance>,
    pub exceptions: Vec<SyncException>,
    pub managed_history: Vec<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct StatusRoles {
    home_nation: String,
    citizen_role_id: Option<u64>,
    foreigner_role_id: Option<u64>,
}

/// Immutable, validated view of every mapping used by one run.
#[derive(Debug, Clone, Default)]
pub struct RoleMappings {
    nations: HashMap<String, NationRoleMapping>,
    towns: HashMap<String, u64>,
    alliances: HashMap<String, BTreeSet<String>>,
    exceptions: HashMap<u64, String>,
    status: Option<StatusRoles>,
    managed: BTreeSet<u64>,
}

impl RoleMappings {
    /// Validates the raw store rows and builds the lookup tables.
    ///
    /// The managed namespace is the union of every live mapping role, the status roles and
    /// the historical managed role ids.
    ///
    /// # Arguments
    /// - `source` - Rows loaded from the mapping store
    /// - `status` - Citizen/foreigner configuration
    ///
    /// # Returns
    /// - `Ok(RoleMappings)` - Validated snapshot
    /// - `Err(MappingError)` - The store contains a configuration error
    pub fn build(source: MappingSource, status: &StatusRoleConfig) -> Result<Self, MappingError> {
        let mut mappings = RoleMappings::default();

        for row in source.nations {
            let nation = normalize_nation_name(&row.nation);
            if nation.is_empty() {
                return Err(MappingError::EmptyNationName { id: row.id });
            }
            check_role("nation_role", row.role_id)?;
            if let Some(allied_role_id) = row.allied_role_id {
                check_role("nation_role", allied_role_id)?;
                mappings.managed.insert(allied_role_id);
            }
            mappings.managed.insert(row.role_id);

            let mapping = NationRoleMapping {
                nation: nation.clone(),
                ..row
            };
            if mappings.nations.insert(nation.clone(), mapping).is_some() {
                return Err(MappingError::DuplicateNation { nation });
            }
        }

        for row in source.towns {
            let town_id = row.town_id.trim().to_string();
            if town_id.is_empty() {
                return Err(MappingError::EmptyTownId { id: row.id });
            }
            check_role("town_role", row.role_id)?;
            mappings.managed.insert(row.role_id);
            if mappings.towns.insert(town_id.clone(), row.role_id).is_some() {
                return Err(MappingError::DuplicateTown { town_id });
            }
        }

        for alliance in source.alliances {
            mappings
                .alliances
                .entry(normalize_nation_name(&alliance.nation))
                .or_default()
                .insert(normalize_nation_name(&alliance.allied_nation));
        }

        for exception in source.exceptions {
            mappings
                .exceptions
                .insert(exception.member_id, exception.reason);
        }

        let has_status_roles =
            status.citizen_role_id.is_some() || status.foreigner_role_id.is_some();
        match status.home_nation.as_deref().map(normalize_nation_name) {
            Some(home_nation) if !home_nation.is_empty() => {
                mappings.managed.extend(status.citizen_role_id);
                mappings.managed.extend(status.foreigner_role_id);
                mappings.status = Some(StatusRoles {
                    home_nation,
                    citizen_role_id: status.citizen_role_id,
                    foreigner_role_id: status.foreigner_role_id,
                });
            }
            _ if has_status_roles => return Err(MappingError::StatusRolesWithoutHomeNation),
            _ => {}
        }

        mappings.managed.extend(source.managed_history);

        Ok(mappings)
    }

    /// Role granted to members of `nation`, matched case-insensitively.
    pub fn nation_role(&self, nation: &str) -> Option<u64> {
        self.nations
            .get(&normalize_nation_name(nation))
            .map(|m| m.role_id)
    }

    /// Role granted to members of nations that list `nation` as an ally.
    pub fn allied_role(&self, nation: &str) -> Option<u64> {
        self.nations
            .get(&normalize_nation_name(nation))
            .and_then(|m| m.allied_role_id)
    }

    pub fn town_role(&self, town_id: &str) -> Option<u64> {
        self.towns.get(town_id.trim()).copied()
    }

    /// Nations that `nation` lists as allies. Directed: the reverse edge is not implied.
    pub fn allies(&self, nation: &str) -> impl Iterator<Item = &str> {
        self.alliances
            .get(&normalize_nation_name(nation))
            .into_iter()
            .flat_map(|allies| allies.iter().map(String::as_str))
    }

    pub fn is_exception(&self, member_id: u64) -> bool {
        self.exceptions.contains_key(&member_id)
    }

    pub fn exception_reason(&self, member_id: u64) -> Option<&str> {
        self.exceptions.get(&member_id).map(String::as_str)
    }

    pub fn is_managed(&self, role_id: u64) -> bool {
        self.managed.contains(&role_id)
    }

    pub fn managed_roles(&self) -> &BTreeSet<u64> {
        &self.managed
    }

    /// Status role for a resident of `nation`, or of no nation when `None`.
    pub fn status_role(&self, nation: Option<&str>) -> Option<u64> {
        let status = self.status.as_ref()?;
        let is_citizen = nation
            .map(normalize_nation_name)
            .is_some_and(|nation| {
                nation == status.home_nation || self.allies(&status.home_nation).any(|a| a == nation)
            });

        if is_citizen {
            status.citizen_role_id
        } else {
            status.foreigner_role_id
        }
    }

    pub fn nation_count(&self) -> usize {
        self.nations.len()
    }

    pub fn town_count(&self) -> usize {
        self.towns.len()
    }
}

fn check_role(source_table: &'static str, role_id: u64) -> Result<(), MappingError> {
    if role_id == 0 {
        return Err(MappingError::InvalidRoleId {
            source_table,
            role_id,
        });
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn nation(id: i32, nation: &str, role_id: u64, allied: Option<u64>) -> NationRoleMapping {
        NationRoleMapping {
            id,
            nation: normalize_nation_name(nation),
            display_name: nation.to_string(),
            role_id,
            allied_role_id: allied,
        }
    }

    pub fn town(id: i32, town_id: &str, role_id: u64) -> TownRoleMapping {
        TownRoleMapping {
            id,
            town_id: town_id.to_string(),
            town_name: format!("Town {}", id),
            nation: String::new(),
            role_id,
        }
    }

    pub fn exception(member_id: u64) -> SyncException {
        SyncException {
            member_id,
            reason: "staff".to_string(),
            created_at: Utc::now(),
        }
    }

    pub fn alliance(nation: &str, allied: &str) -> Alliance {
        Alliance {
            nation: normalize_nation_name(nation),
            allied_nation: normalize_nation_name(allied),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn looks_up_nations_case_insensitively() {
        let source = MappingSource {
            nations: vec![nation(1, "Avalon", 100, None)],
            ..Default::default()
        };

        let mappings = RoleMappings::build(source, &StatusRoleConfig::default()).unwrap();

        assert_eq!(mappings.nation_role("AVALON"), Some(100));
        assert_eq!(mappings.nation_role(" avalon "), Some(100));
        assert_eq!(mappings.nation_role("Brightwater"), None);
    }

    #[test]
    fn rejects_duplicate_normalized_nations() {
        let source = MappingSource {
            nations: vec![nation(1, "Avalon", 100, None), nation(2, "AVALON ", 101, None)],
            ..Default::default()
        };

        let err = RoleMappings::build(source, &StatusRoleConfig::default()).unwrap_err();

        assert_eq!(
            err,
            MappingError::DuplicateNation {
                nation: "avalon".to_string()
            }
        );
    }

    #[test]
    fn rejects_zero_role_ids() {
        let source = MappingSource {
            nations: vec![nation(1, "Avalon", 0, None)],
            ..Default::default()
        };

        let err = RoleMappings::build(source, &StatusRoleConfig::default()).unwrap_err();

        assert_eq!(
            err,
            MappingError::InvalidRoleId {
                source_table: "nation_role",
                role_id: 0
            }
        );
    }

    #[test]
    fn rejects_empty_town_ids() {
        let source = MappingSource {
            towns: vec![town(4, "  ", 200)],
            ..Default::default()
        };

        let err = RoleMappings::build(source, &StatusRoleConfig::default()).unwrap_err();

        assert_eq!(err, MappingError::EmptyTownId { id: 4 });
    }

    #[test]
    fn rejects_status_roles_without_home_nation() {
        let status = StatusRoleConfig {
            home_nation: None,
            citizen_role_id: Some(900),
            foreigner_role_id: None,
        };

        let err = RoleMappings::build(MappingSource::default(), &status).unwrap_err();

        assert_eq!(err, MappingError::StatusRolesWithoutHomeNation);
    }

    #[test]
    fn managed_namespace_includes_history_and_status_roles() {
        let source = MappingSource {
            nations: vec![nation(1, "Avalon", 100, Some(101))],
            towns: vec![town(1, "town-a", 200)],
            managed_history: vec![150],
            ..Default::default()
        };
        let status = StatusRoleConfig {
            home_nation: Some("Avalon".to_string()),
            citizen_role_id: Some(900),
            foreigner_role_id: Some(901),
        };

        let mappings = RoleMappings::build(source, &status).unwrap();

        let expected: BTreeSet<u64> = [100, 101, 150, 200, 900, 901].into_iter().collect();
        assert_eq!(mappings.managed_roles(), &expected);
    }

    #[test]
    fn alliances_are_directed() {
        let source = MappingSource {
            alliances: vec![alliance("Avalon", "Brightwater")],
            ..Default::default()
        };

        let mappings = RoleMappings::build(source, &StatusRoleConfig::default()).unwrap();

        assert_eq!(mappings.allies("avalon").collect::<Vec<_>>(), vec!["brightwater"]);
        assert_eq!(mappings.allies("Brightwater").count(), 0);
    }

    #[test]
    fn status_role_covers_home_allies_and_foreigners() {
        let source = MappingSource {
            alliances: vec![alliance("Avalon", "Brightwater")],
            ..Default::default()
        };
        let status = StatusRoleConfig {
            home_nation: Some("Avalon".to_string()),
            citizen_role_id: Some(900),
            foreigner_role_id: Some(901),
        };

        let mappings = RoleMappings::build(source, &status).unwrap();

        assert_eq!(mappings.status_role(Some("Avalon")), Some(900));
        assert_eq!(mappings.status_role(Some("brightwater")), Some(900));
        assert_eq!(mappings.status_role(Some("Cinderfall")), Some(901));
        assert_eq!(mappings.status_role(None), Some(901));
    }

    #[test]
    fn exception_lookup_by_member_id() {
        let source = MappingSource {
            exceptions: vec![exception(42)],
            ..Default::default()
        };

        let mappings = RoleMappings::build(source, &StatusRoleConfig::default()).unwrap();

        assert!(mappings.is_exception(42));
        assert_eq!(mappings.exception_reason(42), Some("staff"));
        assert!(!mappings.is_exception(43));
    }
}
