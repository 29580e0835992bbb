pub use super::alliance::Entity as Alliance;
pub use super::audit_log::Entity as AuditLog;
pub use super::linked_account::Entity as LinkedAccount;
pub use super::managed_role::Entity as ManagedRole;
pub use super::nation_role::Entity as NationRole;
pub use super::sync_exception::Entity as SyncException;
pub use super::sync_target_role::Entity as SyncTargetRole;
pub use super::town_role::Entity as TownRole;
