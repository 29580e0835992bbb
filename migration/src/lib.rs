pub use sea_orm_migration::prelude::*;

mod m20260301_000001_create_nation_role_table;
mod m20260301_000002_create_town_role_table;
mod m20260301_000003_create_alliance_table;
mod m20260301_000004_create_sync_exception_table;
mod m20260301_000005_create_sync_target_role_table;
mod m20260301_000006_create_managed_role_table;
mod m20260302_000007_create_linked_account_table;
mod m20260302_000008_create_audit_log_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260301_000001_create_nation_role_table::Migration),
            Box::new(m20260301_000002_create_town_role_table::Migration),
            Box::new(m20260301_000003_create_alliance_table::Migration),
            Box::new(m20260301_000004_create_sync_exception_table::Migration),
            Box::new(m20260301_000005_create_sync_target_role_table::Migration),
            Box::new(m20260301_000006_create_managed_role_table::Migration),
            Box::new(m20260302_000007_create_linked_account_table::Migration),
            Box::new(m20260302_000008_create_audit_log_table::Migration),
        ]
    }
}
