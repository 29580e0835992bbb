//! Run scheduling.
//!
//! `SyncScheduler` owns the only run-active flag. The weekly timer and the manual command
//! both go through `trigger_now`, which calls `begin_run` and hands the run to the
//! `RunExecutor` on a background task.

pub mod weekly;

use chrono::Utc;
use serde_json::json;
use serenity::async_trait;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::task::JoinHandle;

use crate::{
    error::sync::TriggerError,
    model::{
        audit::{AuditCategory, AuditLevel},
        sync::{Initiator, RunContext, RunStatus, SyncRun},
    },
    service::audit::AuditSink,
};

/// Executes one complete run, from member enumeration to report delivery.
#[async_trait]
pub trait RunExecutor: Send + Sync {
    async fn execute(&self, context: RunContext) -> SyncRun;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Running(RunContext),
}

#[derive(Debug)]
struct Inner {
    state: SchedulerState,
    last_run_id: u64,
}

/// Releases the run-active flag when dropped, including when the run task panics.
pub struct RunGuard {
    inner: Arc<Mutex<Inner>>,
    context: RunContext,
}

impl RunGuard {
    pub fn context(&self) -> &RunContext {
        &self.context
    }
}

impl Drop for RunGuard {
    fn drop(&mut self) {
        let mut inner = lock(&self.inner);
        if matches!(&inner.state, SchedulerState::Running(ctx) if ctx.run_id == self.context.run_id)
        {
            inner.state = SchedulerState::Idle;
        }
    }
}

/// A started run.
pub struct RunHandle {
    pub run_id: u64,
    pub handle: JoinHandle<SyncRun>,
}

pub struct SyncScheduler {
    inner: Arc<Mutex<Inner>>,
    executor: Arc<dyn RunExecutor>,
    audit: Arc<dyn AuditSink>,
}

impl SyncScheduler {
    pub fn new(executor: Arc<dyn RunExecutor>, audit: Arc<dyn AuditSink>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                state: SchedulerState::Idle,
                last_run_id: 0,
            })),
            executor,
            audit,
        }
    }

    pub fn state(&self) -> SchedulerState {
        lock(&self.inner).state.clone()
    }

    /// Moves the scheduler from idle to running under a fresh run id.
    ///
    /// # Returns
    /// - `Ok(RunGuard)` - The run is active until the guard is dropped
    /// - `Err(TriggerError::RunAlreadyActive)` - Another run holds the flag; it is unaffected
    pub fn begin_run(&self, initiator: Initiator) -> Result<RunGuard, TriggerError> {
        let mut inner = lock(&self.inner);

        if let SchedulerState::Running(active) = &inner.state {
            return Err(TriggerError::RunAlreadyActive {
                run_id: active.run_id,
                initiator: active.initiator.to_string(),
                started_at: active.started_at,
            });
        }

        inner.last_run_id += 1;
        let context = RunContext {
            run_id: inner.last_run_id,
            initiator,
            started_at: Utc::now(),
        };
        inner.state = SchedulerState::Running(context.clone());

        Ok(RunGuard {
            inner: self.inner.clone(),
            context,
        })
    }

    /// Starts a run immediately on a background task.
    ///
    /// # Arguments
    /// - `initiator` - Weekly timer or the admin who issued the command
    ///
    /// # Returns
    /// - `Ok(RunHandle)` - Run id and a handle resolving to the finished run
    /// - `Err(TriggerError::RunAlreadyActive)` - A run is already in progress
    pub fn trigger_now(&self, initiator: Initiator) -> Result<RunHandle, TriggerError> {
        let category = match initiator {
            Initiator::Weekly => AuditCategory::Scheduler,
            Initiator::Manual { .. } => AuditCategory::Admin,
        };

        let guard = match self.begin_run(initiator.clone()) {
            Ok(guard) => guard,
            Err(e) => {
                tracing::warn!("Rejected sync trigger from {}: {}", initiator, e);
                self.audit.record(
                    AuditLevel::Warning,
                    category,
                    format!("Rejected sync trigger from {}", initiator),
                    json!({ "reason": e.to_string() }),
                );
                return Err(e);
            }
        };

        let context = guard.context().clone();
        tracing::info!(
            "Sync run #{} started by {}",
            context.run_id,
            context.initiator
        );
        self.audit.record(
            AuditLevel::Info,
            category,
            format!("Sync run #{} started by {}", context.run_id, context.initiator),
            json!({ "run_id": context.run_id }),
        );

        let executor = self.executor.clone();
        let audit = self.audit.clone();
        let run_id = context.run_id;

        let handle = tokio::spawn(async move {
            let run = executor.execute(context).await;
            record_run_end(audit.as_ref(), &run);
            drop(guard);
            run
        });

        Ok(RunHandle { run_id, handle })
    }
}

fn record_run_end(audit: &dyn AuditSink, run: &SyncRun) {
    let status = run.status();
    let level = match status {
        RunStatus::AllSucceeded => AuditLevel::Info,
        RunStatus::PartialFailure => AuditLevel::Warning,
        RunStatus::AllFailed | RunStatus::Aborted => AuditLevel::Error,
    };

    tracing::info!(
        "Sync run #{} finished: {} ({} succeeded, {} failed, {} exempt)",
        run.run_id,
        status.as_str(),
        run.succeeded(),
        run.failed(),
        run.exempt.len()
    );

    audit.record(
        level,
        AuditCategory::Scheduler,
        format!("Sync run #{} finished: {}", run.run_id, status.as_str()),
        json!({
            "run_id": run.run_id,
            "total": run.total(),
            "succeeded": run.succeeded(),
            "failed": run.failed(),
            "exempt": run.exempt.len(),
            "duration_secs": run.duration().num_seconds(),
            "abort_reason": run.abort_reason,
        }),
    );
}

fn lock(inner: &Mutex<Inner>) -> MutexGuard<'_, Inner> {
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::fake::RecordingAuditSink;
    use tokio::sync::Notify;

    /// Executor that blocks until released.
    struct GatedExecutor {
        gate: Arc<Notify>,
    }

    #[async_trait]
    impl RunExecutor for GatedExecutor {
        async fn execute(&self, context: RunContext) -> SyncRun {
            self.gate.notified().await;
            SyncRun::completed(context, Vec::new(), Vec::new(), Utc::now())
        }
    }

    struct PanickingExecutor;

    #[async_trait]
    impl RunExecutor for PanickingExecutor {
        async fn execute(&self, _context: RunContext) -> SyncRun {
            panic!("executor crashed");
        }
    }

    fn manual() -> Initiator {
        Initiator::Manual {
            user_id: 42,
            name: "admin".to_string(),
        }
    }

    /// Expected: second trigger is rejected and the first run completes normally
    #[tokio::test]
    async fn rejects_trigger_while_run_is_active() {
        let gate = Arc::new(Notify::new());
        let audit = Arc::new(RecordingAuditSink::default());
        let scheduler = SyncScheduler::new(
            Arc::new(GatedExecutor { gate: gate.clone() }),
            audit.clone(),
        );

        let first = scheduler.trigger_now(Initiator::Weekly).unwrap();
        let second = scheduler.trigger_now(manual());

        match second {
            Err(TriggerError::RunAlreadyActive { run_id, initiator, .. }) => {
                assert_eq!(run_id, first.run_id);
                assert_eq!(initiator, "weekly schedule");
            }
            Ok(_) => panic!("expected rejection"),
        }
        assert!(matches!(scheduler.state(), SchedulerState::Running(ref ctx) if ctx.run_id == 1));

        gate.notify_one();
        let run = first.handle.await.unwrap();

        assert_eq!(run.run_id, 1);
        assert_eq!(scheduler.state(), SchedulerState::Idle);
        assert_eq!(audit.count(AuditCategory::Admin), 1);
    }

    /// Expected: run ids increase across runs
    #[tokio::test]
    async fn assigns_increasing_run_ids() {
        let gate = Arc::new(Notify::new());
        let scheduler = SyncScheduler::new(
            Arc::new(GatedExecutor { gate: gate.clone() }),
            Arc::new(RecordingAuditSink::default()),
        );

        gate.notify_one();
        let first = scheduler.trigger_now(Initiator::Weekly).unwrap();
        first.handle.await.unwrap();

        gate.notify_one();
        let second = scheduler.trigger_now(manual()).unwrap();
        let run = second.handle.await.unwrap();

        assert_eq!(run.run_id, 2);
        assert_eq!(run.initiator, manual());
    }

    /// Expected: a crashed run leaves the scheduler idle
    #[tokio::test]
    async fn crashed_run_releases_flag() {
        let scheduler = SyncScheduler::new(
            Arc::new(PanickingExecutor),
            Arc::new(RecordingAuditSink::default()),
        );

        let run = scheduler.trigger_now(Initiator::Weekly).unwrap();
        assert!(run.handle.await.is_err());

        assert_eq!(scheduler.state(), SchedulerState::Idle);
        assert!(scheduler.trigger_now(Initiator::Weekly).is_ok());
    }

    /// Expected: start and end of a run are both audited
    #[tokio::test]
    async fn audits_run_start_and_end() {
        let gate = Arc::new(Notify::new());
        let audit = Arc::new(RecordingAuditSink::default());
        let scheduler = SyncScheduler::new(Arc::new(GatedExecutor { gate: gate.clone() }), audit.clone());

        gate.notify_one();
        scheduler
            .trigger_now(Initiator::Weekly)
            .unwrap()
            .handle
            .await
            .unwrap();

        let records = audit.records();
        assert_eq!(records.len(), 2);
        assert!(records[0].2.contains("started"));
        assert_eq!(records[1].0, AuditLevel::Info);
        assert!(records[1].2.contains("all succeeded"));
    }
}
