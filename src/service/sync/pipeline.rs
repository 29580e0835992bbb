use chrono::Utc;
use sea_orm::DatabaseConnection;
use serde_json::json;
use serenity::async_trait;
use std::sync::Arc;

use crate::{
    config::QueueConfig,
    data::linked_account::LinkedAccountRepository,
    error::sync::SyncError,
    model::{
        audit::{AuditCategory, AuditLevel},
        mapping::StatusRoleConfig,
        member::Member,
        sync::{
            ExemptMember, FailureReason, MemberOutcome, OutcomeStatus, RunContext, SyncRun,
        },
    },
    scheduler::RunExecutor,
    service::{
        audit::AuditSink,
        external::AffiliationClient,
        mapping::RoleMappingService,
        platform::ChatPlatform,
        report::ReportService,
        sync::{queue::QueueManager, task::MemberSyncer},
    },
};

/// Executes complete sync runs.
pub struct SyncPipeline<C, P> {
    db: DatabaseConnection,
    client: Arc<C>,
    platform: Arc<P>,
    audit: Arc<dyn AuditSink>,
    queue: QueueManager,
    status_roles: StatusRoleConfig,
    report: ReportService<P>,
}

impl<C, P> SyncPipeline<C, P>
where
    C: AffiliationClient,
    P: ChatPlatform,
{
    pub fn new(
        db: DatabaseConnection,
        client: Arc<C>,
        platform: Arc<P>,
        audit: Arc<dyn AuditSink>,
        queue: QueueConfig,
        status_roles: StatusRoleConfig,
        report: ReportService<P>,
    ) -> Self {
        Self {
            db,
            client,
            platform,
            audit,
            queue: QueueManager::new(queue),
            status_roles,
            report,
        }
    }

    /// Snapshots the mappings, enumerates the target members and drains the queue.
    ///
    /// # Returns
    /// - `Ok(SyncRun)` - Every member reached a terminal outcome
    /// - `Err(SyncError)` - Configuration or infrastructure error before any dispatch
    async fn run(&self, context: &RunContext) -> Result<SyncRun, SyncError> {
        let snapshot = RoleMappingService::new(&self.db)
            .snapshot(&self.status_roles)
            .await?;
        let mappings = snapshot.mappings;

        let mut targets: Vec<Member> = self
            .platform
            .list_members()
            .await?
            .into_iter()
            .filter(|m| m.holds_any(&snapshot.target_roles))
            .collect();

        let ids: Vec<u64> = targets.iter().map(|m| m.id).collect();
        let accounts = LinkedAccountRepository::new(&self.db)
            .find_by_member_ids(&ids)
            .await?;
        for member in &mut targets {
            if let Some(account) = accounts.get(&member.id) {
                member.linked = Some(account.identity.clone());
                member.last_synced_at = account.last_synced_at;
            }
        }

        let (exempt, queued): (Vec<Member>, Vec<Member>) = targets
            .into_iter()
            .partition(|m| mappings.is_exception(m.id));
        let exempt: Vec<ExemptMember> = exempt
            .into_iter()
            .map(|m| ExemptMember {
                reason: mappings.exception_reason(m.id).unwrap_or_default().to_string(),
                member_id: m.id,
                member_name: m.display_name,
            })
            .collect();

        tracing::info!(
            "Sync run #{}: {} members queued, {} exempt",
            context.run_id,
            queued.len(),
            exempt.len()
        );

        let syncer = Arc::new(MemberSyncer::new(
            self.client.clone(),
            self.platform.clone(),
            mappings.clone(),
        ));
        let outcomes = self.queue.enqueue_all(syncer, queued).await;

        self.persist_links(&outcomes).await;
        self.audit_failures(context, &outcomes);

        Ok(SyncRun::completed(
            context.clone(),
            outcomes,
            exempt,
            Utc::now(),
        ))
    }

    /// Caches newly resolved identities and stamps successful members as synced.
    ///
    /// Failures are logged; the run result does not depend on the cache.
    async fn persist_links(&self, outcomes: &[MemberOutcome]) {
        let repo = LinkedAccountRepository::new(&self.db);

        for outcome in outcomes.iter().filter(|o| o.newly_linked) {
            if let Some(identity) = &outcome.identity {
                if let Err(e) = repo.upsert(outcome.member_id, identity).await {
                    tracing::warn!(
                        "Failed to cache linked account for member {}: {:?}",
                        outcome.member_id,
                        e
                    );
                }
            }
        }

        let synced: Vec<u64> = outcomes
            .iter()
            .filter(|o| o.status.is_success() && o.identity.is_some())
            .map(|o| o.member_id)
            .collect();
        if let Err(e) = repo.update_synced_at(&synced, Utc::now()).await {
            tracing::warn!("Failed to update sync timestamps: {:?}", e);
        }
    }

    fn audit_failures(&self, context: &RunContext, outcomes: &[MemberOutcome]) {
        for outcome in outcomes.iter().filter(|o| !o.status.is_success()) {
            let (level, category) = match (outcome.status, outcome.failure) {
                (OutcomeStatus::RetryExhausted, _) | (_, Some(FailureReason::Interrupted)) => {
                    (AuditLevel::Error, AuditCategory::Queue)
                }
                _ => (AuditLevel::Warning, AuditCategory::Role),
            };
            let reason = outcome.failure.map(|f| f.as_str()).unwrap_or("unknown");

            self.audit.record(
                level,
                category,
                format!(
                    "Sync failed for {} ({}): {}",
                    outcome.member_name, outcome.member_id, reason
                ),
                json!({
                    "run_id": context.run_id,
                    "member_id": outcome.member_id,
                    "reason": reason,
                    "error": outcome.error,
                    "attempts": outcome.attempts,
                }),
            );
        }
    }
}

#[async_trait]
impl<C, P> RunExecutor for SyncPipeline<C, P>
where
    C: AffiliationClient,
    P: ChatPlatform,
{
    /// Runs the pipeline and always delivers exactly one report.
    async fn execute(&self, context: RunContext) -> SyncRun {
        let run = match self.run(&context).await {
            Ok(run) => run,
            Err(e) => {
                tracing::error!("Sync run #{} aborted: {}", context.run_id, e);
                self.audit.record(
                    AuditLevel::Error,
                    AuditCategory::System,
                    format!("Sync run #{} aborted", context.run_id),
                    json!({ "run_id": context.run_id, "error": e.to_string() }),
                );
                SyncRun::aborted(context, e.to_string(), Utc::now())
            }
        };

        self.report.deliver(&run).await;

        run
    }
}
