//! Tabular run export.
//!
//! Column order follows the field order of `ExportRow` and never changes between runs.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::{
    collections::BTreeSet,
    fs::{self, File},
    io,
    path::{Path, PathBuf},
};

use crate::{
    error::AppError,
    model::sync::{MemberOutcome, SyncRun},
};

/// One export line per processed member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportRow {
    pub run_id: u64,
    pub sequence: usize,
    pub member_id: u64,
    pub member_name: String,
    pub external_name: Option<String>,
    pub external_uuid: Option<String>,
    pub nation: Option<String>,
    pub town: Option<String>,
    pub town_id: Option<String>,
    pub last_online: Option<String>,
    pub days_offline: Option<i64>,
    pub previous_roles: String,
    pub roles_added: String,
    pub roles_removed: String,
    pub status: &'static str,
    pub attempts: u32,
    pub error: Option<String>,
}

impl ExportRow {
    /// Builds a row, computing days offline relative to the end of the run.
    pub fn from_outcome(run_id: u64, outcome: &MemberOutcome, now: DateTime<Utc>) -> Self {
        let affiliation = outcome.affiliation.as_ref();
        Self {
            run_id,
            sequence: outcome.sequence,
            member_id: outcome.member_id,
            member_name: outcome.member_name.clone(),
            external_name: outcome.identity.as_ref().map(|i| i.name.clone()),
            external_uuid: outcome.identity.as_ref().map(|i| i.uuid.clone()),
            nation: affiliation.and_then(|a| a.nation.clone()),
            town: affiliation.and_then(|a| a.town.clone()),
            town_id: affiliation.and_then(|a| a.town_id.clone()),
            last_online: affiliation
                .and_then(|a| a.last_online)
                .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string()),
            days_offline: affiliation.and_then(|a| a.days_offline(now)),
            previous_roles: join_roles(&outcome.previous_roles),
            roles_added: join_roles(&outcome.diff.to_add),
            roles_removed: join_roles(&outcome.diff.to_remove),
            status: outcome.status.as_str(),
            attempts: outcome.attempts,
            error: outcome.error.clone(),
        }
    }
}

fn join_roles(roles: &BTreeSet<u64>) -> String {
    roles
        .iter()
        .map(u64::to_string)
        .collect::<Vec<_>>()
        .join(";")
}

/// `sync_run_{id}_{YYYYMMDD_HHMMSS}.csv`, stamped with the run's end time.
pub fn export_file_name(run: &SyncRun) -> String {
    format!(
        "sync_run_{}_{}.csv",
        run.run_id,
        run.finished_at.format("%Y%m%d_%H%M%S")
    )
}

/// Writes every outcome of `run` as CSV, header first.
pub fn write_export<W: io::Write>(writer: W, run: &SyncRun) -> Result<(), csv::Error> {
    let mut out = csv::Writer::from_writer(writer);

    if run.outcomes.is_empty() {
        out.write_record(HEADER)?;
    }
    for outcome in &run.outcomes {
        out.serialize(ExportRow::from_outcome(run.run_id, outcome, run.finished_at))?;
    }

    out.flush()?;
    Ok(())
}

/// Writes the export of `run` into `dir`, creating it if needed.
///
/// # Returns
/// - `Ok(PathBuf)` - Path of the written file
/// - `Err(AppError::IoErr)` - The directory or file could not be created
/// - `Err(AppError::CsvErr)` - Writing a row failed
pub fn write_export_file(dir: &Path, run: &SyncRun) -> Result<PathBuf, AppError> {
    fs::create_dir_all(dir)?;
    let path = dir.join(export_file_name(run));
    let file = File::create(&path)?;
    write_export(file, run)?;
    Ok(path)
}

/// Header used when there are no rows to derive it from.
const HEADER: [&str; 17] = [
    "run_id",
    "sequence",
    "member_id",
    "member_name",
    "external_name",
    "external_uuid",
    "nation",
    "town",
    "town_id",
    "last_online",
    "days_offline",
    "previous_roles",
    "roles_added",
    "roles_removed",
    "status",
    "attempts",
    "error",
];
