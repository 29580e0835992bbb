//! Role mapping snapshot service.

use sea_orm::DatabaseConnection;
use std::{collections::BTreeSet, sync::Arc};

use crate::{
    data::{
        alliance::AllianceRepository, managed_role::ManagedRoleRepository,
        nation_role::NationRoleRepository, sync_exception::SyncExceptionRepository,
        sync_target_role::SyncTargetRoleRepository, town_role::TownRoleRepository,
    },
    error::{mapping::MappingError, sync::SyncError},
    model::mapping::{MappingSource, RoleMappings, StatusRoleConfig},
};

/// Mapping snapshot plus the roles that define the run's population.
#[derive(Debug, Clone)]
pub struct MappingSnapshot {
    pub mappings: Arc<RoleMappings>,
    pub target_roles: BTreeSet<u64>,
}

/// Loads and validates the role mapping store at the start of a run.
pub struct RoleMappingService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> RoleMappingService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Takes an immutable snapshot of every mapping.
    ///
    /// All tasks of a run share this snapshot, so edits made to the store while a run is
    /// in progress only apply to the next run. Every managed role seen here is added to the
    /// managed role history.
    ///
    /// # Arguments
    /// - `status` - Citizen/foreigner configuration
    ///
    /// # Returns
    /// - `Ok(MappingSnapshot)` - Validated mappings and target roles
    /// - `Err(SyncError::Mapping)` - The store is misconfigured
    /// - `Err(SyncError::Database)` - The store could not be read
    pub async fn snapshot(&self, status: &StatusRoleConfig) -> Result<MappingSnapshot, SyncError> {
        let target_roles = SyncTargetRoleRepository::new(self.db).get_all_ids().await?;
        if target_roles.is_empty() {
            return Err(MappingError::NoTargetRoles.into());
        }

        let history_repo = ManagedRoleRepository::new(self.db);
        let history = history_repo.get_all_ids().await?;
        let known: BTreeSet<u64> = history.iter().copied().collect();

        let source = MappingSource {
            nations: NationRoleRepository::new(self.db).get_all().await?,
            towns: TownRoleRepository::new(self.db).get_all().await?,
            alliances: AllianceRepository::new(self.db).get_all().await?,
            exceptions: SyncExceptionRepository::new(self.db).get_all().await?,
            managed_history: history,
        };

        let mappings = RoleMappings::build(source, status)?;

        // Roles stay managed after their mapping row is edited or removed.
        let unrecorded: Vec<u64> = mappings
            .managed_roles()
            .difference(&known)
            .copied()
            .collect();
        history_repo.record(&unrecorded).await?;

        tracing::debug!(
            "Loaded mapping snapshot: {} nations, {} towns, {} managed roles",
            mappings.nation_count(),
            mappings.town_count(),
            mappings.managed_roles().len()
        );

        Ok(MappingSnapshot {
            mappings: Arc::new(mappings),
            target_roles,
        })
    }
}
