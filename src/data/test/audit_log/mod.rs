use crate::{
    data::audit_log::AuditLogRepository,
    model::audit::{AuditCategory, AuditLevel, CreateAuditLogParam},
};
use sea_orm::DbErr;
use test_utils::builder::TestBuilder;

mod create;
