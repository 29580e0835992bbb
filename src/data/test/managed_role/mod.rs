use crate::data::managed_role::ManagedRoleRepository;
use sea_orm::DbErr;
use test_utils::{builder::TestBuilder, factory};

mod record;
