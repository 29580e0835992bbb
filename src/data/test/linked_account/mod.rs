use crate::{data::linked_account::LinkedAccountRepository, model::member::LinkedIdentity};
use chrono::Utc;
use sea_orm::DbErr;
use test_utils::{builder::TestBuilder, factory};

mod find_by_member_ids;
mod update_synced_at;
mod upsert;
