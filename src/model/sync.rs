use chrono::{DateTime, Utc};
use std::{
    collections::{BTreeMap, BTreeSet},
    fmt,
};

use crate::model::{
    affiliation::Affiliation,
    member::{LinkedIdentity, Member},
    role_diff::RoleDiff,
};

/// Who or what started a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Initiator {
    Weekly,
    Manual { user_id: u64, name: String },
}

impl fmt::Display for Initiator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Weekly => f.write_str("weekly schedule"),
            Self::Manual { user_id, name } => write!(f, "{} ({})", name, user_id),
        }
    }
}

/// Identity of an active run, handed out by the scheduler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunContext {
    pub run_id: u64,
    pub initiator: Initiator,
    pub started_at: DateTime<Utc>,
}

/// One member's unit of work inside a run. Lives only as long as the run.
#[derive(Debug, Clone)]
pub struct SyncTask {
    /// Position in enqueue order; outcomes are reported sorted by it.
    pub sequence: usize,
    pub member: Member,
    pub enqueued_at: DateTime<Utc>,
    /// Attempts started so far.
    pub attempts: u32,
    pub last_error: Option<String>,
    /// `member.linked` was resolved by an earlier attempt of this run.
    pub newly_linked: bool,
}

impl SyncTask {
    pub fn new(sequence: usize, member: Member) -> Self {
        Self {
            sequence,
            member,
            enqueued_at: Utc::now(),
            attempts: 0,
            last_error: None,
            newly_linked: false,
        }
    }
}

/// Terminal status of a member task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OutcomeStatus {
    /// A non-empty diff was applied.
    Applied,
    /// Nothing to change.
    NoOp,
    /// Failed in a way a retry will not fix.
    DefinitiveFailure,
    /// Every attempt failed transiently.
    RetryExhausted,
}

impl OutcomeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Applied => "applied",
            Self::NoOp => "no-op",
            Self::DefinitiveFailure => "definitive-failure",
            Self::RetryExhausted => "retry-exhausted",
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Applied | Self::NoOp)
    }
}

/// Why a member task failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FailureReason {
    /// No linked game account.
    NotLinked,
    /// Linked account unknown to the game API.
    NotFound,
    /// Member left the guild during the run.
    MemberLeft,
    /// The game API refused the request.
    Rejected,
    /// Discord refused the role change.
    RoleUpdateFailed,
    /// Transient failures until the attempt ceiling.
    Transient,
    /// The worker running the task stopped before it finished.
    Interrupted,
}

impl FailureReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotLinked => "not-linked",
            Self::NotFound => "not-found",
            Self::MemberLeft => "member-left",
            Self::Rejected => "rejected",
            Self::RoleUpdateFailed => "role-update-failed",
            Self::Transient => "transient",
            Self::Interrupted => "interrupted",
        }
    }

    pub fn describe(&self) -> &'static str {
        match self {
            Self::NotLinked => "No linked game account",
            Self::NotFound => "Game account not found",
            Self::MemberLeft => "Left the server",
            Self::Rejected => "Game API rejected the lookup",
            Self::RoleUpdateFailed => "Role update refused",
            Self::Transient => "Retries exhausted",
            Self::Interrupted => "Sync interrupted",
        }
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terminal result of one member task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberOutcome {
    pub sequence: usize,
    pub member_id: u64,
    pub member_name: String,
    pub identity: Option<LinkedIdentity>,
    /// Identity was resolved during this run and is not cached yet.
    pub newly_linked: bool,
    pub affiliation: Option<Affiliation>,
    pub previous_roles: BTreeSet<u64>,
    pub diff: RoleDiff,
    pub status: OutcomeStatus,
    pub failure: Option<FailureReason>,
    pub error: Option<String>,
    pub attempts: u32,
}

impl MemberOutcome {
    /// Outcome for a task whose attempts all failed transiently.
    pub fn retry_exhausted(task: &SyncTask, error: String) -> Self {
        Self {
            sequence: task.sequence,
            member_id: task.member.id,
            member_name: task.member.display_name.clone(),
            identity: task.member.linked.clone(),
            newly_linked: task.newly_linked,
            affiliation: None,
            previous_roles: task.member.current_roles.clone(),
            diff: RoleDiff::empty(task.member.id),
            status: OutcomeStatus::RetryExhausted,
            failure: Some(FailureReason::Transient),
            error: Some(error),
            attempts: task.attempts,
        }
    }

    /// Outcome for a task left unfinished because its worker stopped.
    pub fn interrupted(task: &SyncTask, error: String) -> Self {
        Self {
            status: OutcomeStatus::DefinitiveFailure,
            failure: Some(FailureReason::Interrupted),
            ..Self::retry_exhausted(task, error)
        }
    }
}

/// Member skipped because of the exception list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExemptMember {
    pub member_id: u64,
    pub member_name: String,
    pub reason: String,
}

/// Overall result of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    AllSucceeded,
    PartialFailure,
    AllFailed,
    /// Failed before any member was dispatched.
    Aborted,
}

impl RunStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AllSucceeded => "all succeeded",
            Self::PartialFailure => "partial failure",
            Self::AllFailed => "all failed",
            Self::Aborted => "aborted",
        }
    }
}

/// Completed sync run. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncRun {
    pub run_id: u64,
    pub initiator: Initiator,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Per-member outcomes in enqueue order.
    pub outcomes: Vec<MemberOutcome>,
    pub exempt: Vec<ExemptMember>,
    pub abort_reason: Option<String>,
}

impl SyncRun {
    pub fn completed(
        context: RunContext,
        mut outcomes: Vec<MemberOutcome>,
        exempt: Vec<ExemptMember>,
        finished_at: DateTime<Utc>,
    ) -> Self {
        outcomes.sort_by_key(|o| o.sequence);
        Self {
            run_id: context.run_id,
            initiator: context.initiator,
            started_at: context.started_at,
            finished_at,
            outcomes,
            exempt,
            abort_reason: None,
        }
    }

    /// Run that failed before dispatching any member.
    pub fn aborted(context: RunContext, reason: String, finished_at: DateTime<Utc>) -> Self {
        Self {
            run_id: context.run_id,
            initiator: context.initiator,
            started_at: context.started_at,
            finished_at,
            outcomes: Vec::new(),
            exempt: Vec::new(),
            abort_reason: Some(reason),
        }
    }

    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn succeeded(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| o.status.is_success())
            .count()
    }

    pub fn failed(&self) -> usize {
        self.total() - self.succeeded()
    }

    pub fn count(&self, status: OutcomeStatus) -> usize {
        self.outcomes.iter().filter(|o| o.status == status).count()
    }

    pub fn status(&self) -> RunStatus {
        if self.abort_reason.is_some() {
            RunStatus::Aborted
        } else if self.failed() == 0 {
            RunStatus::AllSucceeded
        } else if self.succeeded() == 0 {
            RunStatus::AllFailed
        } else {
            RunStatus::PartialFailure
        }
    }

    pub fn duration(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }

    /// Failed outcomes grouped by reason, each group in enqueue order.
    pub fn failures_by_reason(&self) -> BTreeMap<FailureReason, Vec<&MemberOutcome>> {
        let mut groups: BTreeMap<FailureReason, Vec<&MemberOutcome>> = BTreeMap::new();
        for outcome in &self.outcomes {
            if let Some(reason) = outcome.failure.filter(|_| !outcome.status.is_success()) {
                groups.entry(reason).or_default().push(outcome);
            }
        }
        groups
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn context(run_id: u64) -> RunContext {
        RunContext {
            run_id,
            initiator: Initiator::Weekly,
            started_at: Utc::now(),
        }
    }

    pub fn outcome(sequence: usize, status: OutcomeStatus, failure: Option<FailureReason>) -> MemberOutcome {
        let member_id = 1000 + sequence as u64;
        MemberOutcome {
            sequence,
            member_id,
            member_name: format!("member{}", sequence),
            identity: None,
            newly_linked: false,
            affiliation: None,
            previous_roles: BTreeSet::new(),
            diff: RoleDiff::empty(member_id),
            status,
            failure,
            error: failure.map(|f| f.describe().to_string()),
            attempts: 1,
        }
    }
}
