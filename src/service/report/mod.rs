//! Run report: tabular export plus digest delivery.

pub mod digest;
pub mod export;

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use crate::{
    model::{
        report::Digest,
        sync::{RunStatus, SyncRun},
    },
    service::platform::ChatPlatform,
};

/// Export and digest compiled for one run.
#[derive(Debug, Clone)]
pub struct CompiledReport {
    pub digest: Digest,
    /// Missing for aborted runs or when the export could not be written.
    pub export: Option<PathBuf>,
}

/// Compiles run reports and delivers them to the success or failure channel.
pub struct ReportService<P> {
    platform: Arc<P>,
    success_channel_id: u64,
    failure_channel_id: u64,
    export_dir: PathBuf,
}

impl<P: ChatPlatform> ReportService<P> {
    pub fn new(
        platform: Arc<P>,
        success_channel_id: u64,
        failure_channel_id: u64,
        export_dir: impl AsRef<Path>,
    ) -> Self {
        Self {
            platform,
            success_channel_id,
            failure_channel_id,
            export_dir: export_dir.as_ref().to_path_buf(),
        }
    }

    /// Fully successful runs go to the success channel, everything else to the failure
    /// channel.
    pub fn channel_for(&self, status: RunStatus) -> u64 {
        match status {
            RunStatus::AllSucceeded => self.success_channel_id,
            _ => self.failure_channel_id,
        }
    }

    /// Builds the digest and writes the export of a drained run.
    pub fn compile(&self, run: &SyncRun) -> CompiledReport {
        let digest = digest::build_digest(run);

        let export = if run.abort_reason.is_some() {
            None
        } else {
            match export::write_export_file(&self.export_dir, run) {
                Ok(path) => Some(path),
                Err(e) => {
                    tracing::error!("Failed to write export for run #{}: {:?}", run.run_id, e);
                    None
                }
            }
        };

        CompiledReport { digest, export }
    }

    /// Posts exactly one digest for the run, then uploads the export.
    ///
    /// Delivery errors are logged and never propagated.
    pub async fn deliver(&self, run: &SyncRun) -> CompiledReport {
        let report = self.compile(run);
        let channel_id = self.channel_for(run.status());

        if let Err(e) = self.platform.post_message(channel_id, &report.digest).await {
            tracing::error!("Failed to post digest for run #{}: {:?}", run.run_id, e);
        }

        if let Some(path) = &report.export {
            if let Err(e) = self.platform.upload_file(channel_id, path).await {
                tracing::error!("Failed to upload export for run #{}: {:?}", run.run_id, e);
            }
        }

        tracing::info!(
            "Delivered report for run #{} to channel {}",
            run.run_id,
            channel_id
        );

        report
    }
}
