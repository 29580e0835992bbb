//! One attempt at syncing one member.

use std::{collections::BTreeSet, sync::Arc, time::Duration};
use tokio::sync::Semaphore;

use crate::{
    error::{external::ExternalError, platform::PlatformError},
    model::{
        affiliation::Affiliation,
        mapping::RoleMappings,
        member::{LinkedIdentity, Member},
        role_diff::RoleDiff,
        sync::{FailureReason, MemberOutcome, OutcomeStatus, SyncTask},
    },
    service::{external::AffiliationClient, platform::ChatPlatform, sync::reconciler},
};

const LIMITER_CLOSED: &str = "Dispatch limiter closed";

/// Result of a single attempt.
#[derive(Debug)]
pub enum AttemptResult {
    /// The task reached a terminal state.
    Done(MemberOutcome),
    /// A transient failure; the queue decides whether to try again.
    Retry {
        error: String,
        retry_after: Option<Duration>,
        /// Identity resolved by this attempt, kept so the next attempt skips the lookup.
        resolved: Option<LinkedIdentity>,
    },
}

/// Runs the fetch, reconcile and apply steps for a member against one mapping snapshot.
pub struct MemberSyncer<C, P> {
    client: Arc<C>,
    platform: Arc<P>,
    mappings: Arc<RoleMappings>,
}

/// State gathered so far by an attempt, turned into an outcome once terminal.
struct Progress<'a> {
    task: &'a SyncTask,
    identity: Option<LinkedIdentity>,
    newly_linked: bool,
    affiliation: Option<Affiliation>,
    previous_roles: BTreeSet<u64>,
}

impl Progress<'_> {
    fn finish(
        self,
        diff: RoleDiff,
        failure: Option<FailureReason>,
        error: Option<String>,
    ) -> AttemptResult {
        let status = match failure {
            Some(_) => OutcomeStatus::DefinitiveFailure,
            None if diff.is_empty() => OutcomeStatus::NoOp,
            None => OutcomeStatus::Applied,
        };

        AttemptResult::Done(MemberOutcome {
            sequence: self.task.sequence,
            member_id: self.task.member.id,
            member_name: self.task.member.display_name.clone(),
            identity: self.identity,
            newly_linked: self.newly_linked,
            affiliation: self.affiliation,
            previous_roles: self.previous_roles,
            diff,
            status,
            failure,
            error,
            attempts: self.task.attempts,
        })
    }

    fn fail(self, reason: FailureReason, error: String) -> AttemptResult {
        let member_id = self.task.member.id;
        self.finish(RoleDiff::empty(member_id), Some(reason), Some(error))
    }

    fn retry(self, error: String, retry_after: Option<Duration>) -> AttemptResult {
        let resolved = match self.task.member.linked {
            Some(_) => None,
            None => self.identity,
        };
        AttemptResult::Retry {
            error,
            retry_after,
            resolved,
        }
    }
}

impl<C, P> MemberSyncer<C, P>
where
    C: AffiliationClient,
    P: ChatPlatform,
{
    pub fn new(client: Arc<C>, platform: Arc<P>, mappings: Arc<RoleMappings>) -> Self {
        Self {
            client,
            platform,
            mappings,
        }
    }

    /// Performs one attempt for `task`.
    ///
    /// Game API calls hold a permit from `permits` for their duration only.
    ///
    /// # Arguments
    /// - `task` - Task with its attempt counter already incremented
    /// - `permits` - Concurrency cap on external calls shared by every worker
    ///
    /// # Returns
    /// - `AttemptResult::Done` - Applied, no-op or a definitive failure
    /// - `AttemptResult::Retry` - A transient error worth another attempt
    pub async fn attempt(&self, task: &SyncTask, permits: &Semaphore) -> AttemptResult {
        let member = &task.member;
        let mut progress = Progress {
            task,
            identity: member.linked.clone(),
            newly_linked: task.newly_linked,
            affiliation: None,
            previous_roles: member.current_roles.clone(),
        };

        let identity = match member.linked.clone() {
            Some(identity) => identity,
            None => {
                let resolved = {
                    let Ok(_permit) = permits.acquire().await else {
                        return progress.retry(LIMITER_CLOSED.to_string(), None);
                    };
                    self.client.resolve_identity(member.id).await
                };

                match resolved {
                    Ok(Some(identity)) => {
                        progress.identity = Some(identity.clone());
                        progress.newly_linked = true;
                        identity
                    }
                    Ok(None) | Err(ExternalError::NotLinked) => {
                        return self
                            .strip_managed(progress, FailureReason::NotLinked, "No linked game account")
                            .await;
                    }
                    Err(e) => return external_failure(progress, e),
                }
            }
        };

        let lookup = {
            let Ok(_permit) = permits.acquire().await else {
                return progress.retry(LIMITER_CLOSED.to_string(), None);
            };
            self.client.lookup_affiliation(&identity).await
        };

        match lookup {
            Ok(affiliation) => progress.affiliation = Some(affiliation),
            Err(ExternalError::NotFound) => {
                return self
                    .strip_managed(progress, FailureReason::NotFound, "Game account not found")
                    .await;
            }
            Err(ExternalError::NotLinked) => {
                return self
                    .strip_managed(progress, FailureReason::NotLinked, "No linked game account")
                    .await;
            }
            Err(e) => return external_failure(progress, e),
        }

        self.apply(progress, None).await
    }

    /// Removes every managed role the member holds and records a definitive failure.
    async fn strip_managed(
        &self,
        progress: Progress<'_>,
        reason: FailureReason,
        error: &str,
    ) -> AttemptResult {
        self.apply(progress, Some((reason, error.to_string()))).await
    }

    /// Re-reads the member's roles, reconciles them and applies the diff.
    async fn apply(
        &self,
        mut progress: Progress<'_>,
        failure: Option<(FailureReason, String)>,
    ) -> AttemptResult {
        let member_id = progress.task.member.id;

        match self.platform.current_roles(member_id).await {
            Ok(roles) => progress.previous_roles = roles,
            Err(e) => return platform_failure(progress, e),
        }

        let current = Member {
            current_roles: progress.previous_roles.clone(),
            ..progress.task.member.clone()
        };
        let diff = reconciler::reconcile(&current, progress.affiliation.as_ref(), &self.mappings);

        if !diff.is_empty() {
            if let Err(e) = self.platform.apply_role_diff(&diff).await {
                return platform_failure(progress, e);
            }
            tracing::debug!(
                "Updated roles for member {}: +{:?} -{:?}",
                member_id,
                diff.to_add,
                diff.to_remove
            );
        }

        match failure {
            Some((reason, error)) => progress.finish(diff, Some(reason), Some(error)),
            None => progress.finish(diff, None, None),
        }
    }
}

fn external_failure(progress: Progress<'_>, err: ExternalError) -> AttemptResult {
    if err.is_transient() {
        return progress.retry(err.to_string(), err.retry_after());
    }
    progress.fail(FailureReason::Rejected, err.to_string())
}

fn platform_failure(progress: Progress<'_>, err: PlatformError) -> AttemptResult {
    if err.is_transient() {
        return progress.retry(err.to_string(), err.retry_after());
    }
    match err {
        PlatformError::MemberNotFound(_) => {
            progress.fail(FailureReason::MemberLeft, err.to_string())
        }
        _ => progress.fail(FailureReason::RoleUpdateFailed, err.to_string()),
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        model::mapping::{fixtures::nation, MappingSource, StatusRoleConfig},
        service::fake::{FakeAffiliationClient, FakePlatform},
    };

    const AVALON: u64 = 101;
    const UNRELATED: u64 = 900;

    fn mappings() -> Arc<RoleMappings> {
        Arc::new(
            RoleMappings::build(
                MappingSource {
                    nations: vec![nation(1, "Avalon", AVALON, None)],
                    ..Default::default()
                },
                &StatusRoleConfig::default(),
            )
            .unwrap(),
        )
    }

    fn task(member: Member) -> SyncTask {
        let mut task = SyncTask::new(0, member);
        task.attempts = 1;
        task
    }

    fn syncer(
        client: FakeAffiliationClient,
        platform: FakePlatform,
    ) -> (
        MemberSyncer<FakeAffiliationClient, FakePlatform>,
        Arc<FakePlatform>,
    ) {
        let platform = Arc::new(platform);
        (
            MemberSyncer::new(Arc::new(client), platform.clone(), mappings()),
            platform,
        )
    }

    /// Expected: resolved identity is flagged as newly linked and the nation role applied
    #[tokio::test]
    async fn resolves_identity_and_applies_nation_role() {
        let member = FakePlatform::member(1, &[UNRELATED]);
        let client = FakeAffiliationClient::new()
            .with_identity(1, "uuid-1")
            .with_lookup("uuid-1", Ok(FakeAffiliationClient::nation("Avalon")));
        let (syncer, platform) = syncer(client, FakePlatform::new(vec![member.clone()]));

        let result = syncer.attempt(&task(member), &Semaphore::new(1)).await;

        let AttemptResult::Done(outcome) = result else {
            panic!("expected terminal outcome");
        };
        assert_eq!(outcome.status, OutcomeStatus::Applied);
        assert!(outcome.newly_linked);
        assert_eq!(outcome.diff.to_add, BTreeSet::from([AVALON]));
        assert_eq!(platform.roles_of(1), BTreeSet::from([AVALON, UNRELATED]));
    }

    /// Expected: unlinked member loses managed roles and fails definitively
    #[tokio::test]
    async fn unlinked_member_loses_managed_roles() {
        let member = FakePlatform::member(1, &[AVALON, UNRELATED]);
        let (syncer, platform) = syncer(
            FakeAffiliationClient::new(),
            FakePlatform::new(vec![member.clone()]),
        );

        let result = syncer.attempt(&task(member), &Semaphore::new(1)).await;

        let AttemptResult::Done(outcome) = result else {
            panic!("expected terminal outcome");
        };
        assert_eq!(outcome.status, OutcomeStatus::DefinitiveFailure);
        assert_eq!(outcome.failure, Some(FailureReason::NotLinked));
        assert_eq!(outcome.diff.to_remove, BTreeSet::from([AVALON]));
        assert_eq!(platform.roles_of(1), BTreeSet::from([UNRELATED]));
    }

    /// Expected: unreachable API asks for a retry without touching roles
    #[tokio::test]
    async fn transient_lookup_error_requests_retry() {
        let member = FakePlatform::member(1, &[AVALON]);
        let client = FakeAffiliationClient::new()
            .with_identity(1, "uuid-1")
            .with_lookup("uuid-1", Err(ExternalError::Unreachable("timeout".to_string())));
        let (syncer, platform) = syncer(client, FakePlatform::new(vec![member.clone()]));

        let result = syncer.attempt(&task(member), &Semaphore::new(1)).await;

        let AttemptResult::Retry { resolved, .. } = result else {
            panic!("expected retry");
        };
        assert_eq!(resolved.map(|identity| identity.uuid), Some("uuid-1".to_string()));
        assert!(platform.applied().is_empty());
    }

    /// Expected: an identity cached from an earlier attempt is reused and stays newly linked
    #[tokio::test]
    async fn reuses_identity_from_earlier_attempt() {
        let member = FakePlatform::member(1, &[]);
        let client = FakeAffiliationClient::new()
            .with_lookup("uuid-1", Ok(FakeAffiliationClient::nation("Avalon")));
        let (syncer, _) = syncer(client, FakePlatform::new(vec![member.clone()]));
        let mut retried = task(Member {
            linked: Some(LinkedIdentity {
                uuid: "uuid-1".to_string(),
                name: "player1".to_string(),
            }),
            ..member
        });
        retried.newly_linked = true;

        let result = syncer.attempt(&retried, &Semaphore::new(1)).await;

        let AttemptResult::Done(outcome) = result else {
            panic!("expected terminal outcome");
        };
        assert_eq!(outcome.status, OutcomeStatus::Applied);
        assert!(outcome.newly_linked);
        assert_eq!(syncer.client.resolve_calls(), 0);
    }

    /// Expected: a member who left the guild fails definitively as member-left
    #[tokio::test]
    async fn member_left_is_definitive() {
        let member = FakePlatform::member(1, &[]);
        let client = FakeAffiliationClient::new()
            .with_identity(1, "uuid-1")
            .with_lookup("uuid-1", Ok(FakeAffiliationClient::nation("Avalon")));
        let (syncer, _) = syncer(client, FakePlatform::new(Vec::new()));

        let result = syncer.attempt(&task(member), &Semaphore::new(1)).await;

        let AttemptResult::Done(outcome) = result else {
            panic!("expected terminal outcome");
        };
        assert_eq!(outcome.failure, Some(FailureReason::MemberLeft));
    }

    /// Expected: refused role change is reported without retry
    #[tokio::test]
    async fn forbidden_role_change_fails_definitively() {
        let member = FakePlatform::member(1, &[]);
        let client = FakeAffiliationClient::new()
            .with_identity(1, "uuid-1")
            .with_lookup("uuid-1", Ok(FakeAffiliationClient::nation("Avalon")));
        let (syncer, _) = syncer(
            client,
            FakePlatform::new(vec![member.clone()]).forbid(1),
        );

        let result = syncer.attempt(&task(member), &Semaphore::new(1)).await;

        let AttemptResult::Done(outcome) = result else {
            panic!("expected terminal outcome");
        };
        assert_eq!(outcome.status, OutcomeStatus::DefinitiveFailure);
        assert_eq!(outcome.failure, Some(FailureReason::RoleUpdateFailed));
    }

    /// Expected: matching roles produce a no-op with no platform mutation
    #[tokio::test]
    async fn up_to_date_member_is_no_op() {
        let member = FakePlatform::member(1, &[AVALON]);
        let client = FakeAffiliationClient::new()
            .with_lookup("uuid-1", Ok(FakeAffiliationClient::nation("Avalon")));
        let member = Member {
            linked: Some(LinkedIdentity {
                uuid: "uuid-1".to_string(),
                name: "player1".to_string(),
            }),
            ..member
        };
        let (syncer, platform) = syncer(client, FakePlatform::new(vec![member.clone()]));

        let result = syncer.attempt(&task(member), &Semaphore::new(1)).await;

        let AttemptResult::Done(outcome) = result else {
            panic!("expected terminal outcome");
        };
        assert_eq!(outcome.status, OutcomeStatus::NoOp);
        assert!(!outcome.newly_linked);
        assert!(platform.applied().is_empty());
    }
}
