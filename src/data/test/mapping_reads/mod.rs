use crate::data::{
    alliance::AllianceRepository, sync_exception::SyncExceptionRepository,
    sync_target_role::SyncTargetRoleRepository,
};
use sea_orm::DbErr;
use test_utils::{builder::TestBuilder, factory};

mod get_all;
