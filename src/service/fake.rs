//! In-memory collaborators for service tests.

use serenity::async_trait;
use std::{
    collections::{BTreeSet, HashMap, VecDeque},
    path::{Path, PathBuf},
    sync::{
        atomic::{AtomicUsize, Ordering},
        Mutex,
    },
    time::Duration,
};
use tokio::time::Instant;

use crate::{
    error::{external::ExternalError, platform::PlatformError},
    model::{
        affiliation::Affiliation,
        audit::{AuditCategory, AuditLevel},
        member::{LinkedIdentity, Member},
        report::Digest,
        role_diff::RoleDiff,
    },
    service::{audit::AuditSink, external::AffiliationClient, platform::ChatPlatform},
};

/// Scripted game API.
///
/// Lookups pop scripted responses per uuid; the last one repeats. Unknown uuids resolve to
/// an empty affiliation. Tracks the highest number of concurrent calls.
#[derive(Default)]
pub struct FakeAffiliationClient {
    identities: HashMap<u64, String>,
    lookups: Mutex<HashMap<String, VecDeque<Result<Affiliation, ExternalError>>>>,
    panicking: BTreeSet<u64>,
    latency: Duration,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    calls: AtomicUsize,
    resolve_calls: AtomicUsize,
    lookup_log: Mutex<Vec<(String, Instant)>>,
}

impl FakeAffiliationClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn nation(nation: &str) -> Affiliation {
        Affiliation {
            nation: Some(nation.to_string()),
            ..Default::default()
        }
    }

    pub fn with_identity(mut self, member_id: u64, uuid: &str) -> Self {
        self.identities.insert(member_id, uuid.to_string());
        self
    }

    pub fn with_lookup(self, uuid: &str, response: Result<Affiliation, ExternalError>) -> Self {
        self.lookups
            .lock()
            .unwrap()
            .entry(uuid.to_string())
            .or_default()
            .push_back(response);
        self
    }

    /// Resolving `member_id` panics, as a bug inside a worker would.
    pub fn panic_on(mut self, member_id: u64) -> Self {
        self.panicking.insert(member_id);
        self
    }

    /// Every call sleeps for `latency`, so concurrent calls overlap.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn resolve_calls(&self) -> usize {
        self.resolve_calls.load(Ordering::SeqCst)
    }

    /// Uuid and start time of every lookup, in call order.
    pub fn lookup_log(&self) -> Vec<(String, Instant)> {
        self.lookup_log.lock().unwrap().clone()
    }

    /// Start times of the lookups for `uuid`.
    pub fn lookups_of(&self, uuid: &str) -> Vec<Instant> {
        self.lookup_log()
            .into_iter()
            .filter(|(u, _)| u == uuid)
            .map(|(_, at)| at)
            .collect()
    }

    async fn track<T>(&self, response: T) -> T {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        self.calls.fetch_add(1, Ordering::SeqCst);

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        response
    }
}

#[async_trait]
impl AffiliationClient for FakeAffiliationClient {
    async fn resolve_identity(&self, member_id: u64) -> Result<Option<LinkedIdentity>, ExternalError> {
        if self.panicking.contains(&member_id) {
            panic!("resolve_identity blew up for member {}", member_id);
        }
        self.resolve_calls.fetch_add(1, Ordering::SeqCst);
        let identity = self.identities.get(&member_id).map(|uuid| LinkedIdentity {
            uuid: uuid.clone(),
            name: format!("player{}", member_id),
        });
        self.track(Ok(identity)).await
    }

    async fn lookup_affiliation(&self, identity: &LinkedIdentity) -> Result<Affiliation, ExternalError> {
        self.lookup_log
            .lock()
            .unwrap()
            .push((identity.uuid.clone(), Instant::now()));
        let response = {
            let mut lookups = self.lookups.lock().unwrap();
            match lookups.get_mut(&identity.uuid) {
                Some(queue) if queue.len() > 1 => queue.pop_front().unwrap(),
                Some(queue) => queue.front().cloned().unwrap(),
                None => Ok(Affiliation::default()),
            }
        };
        self.track(response).await
    }
}

/// In-memory guild.
#[derive(Default)]
pub struct FakePlatform {
    members: Vec<Member>,
    roles: Mutex<HashMap<u64, BTreeSet<u64>>>,
    forbidden: BTreeSet<u64>,
    fail_listing: bool,
    applied: Mutex<Vec<RoleDiff>>,
    messages: Mutex<Vec<(u64, Digest)>>,
    uploads: Mutex<Vec<(u64, PathBuf)>>,
}

impl FakePlatform {
    pub fn new(members: Vec<Member>) -> Self {
        let roles = members
            .iter()
            .map(|m| (m.id, m.current_roles.clone()))
            .collect();
        Self {
            members,
            roles: Mutex::new(roles),
            ..Default::default()
        }
    }

    pub fn member(id: u64, roles: &[u64]) -> Member {
        Member {
            id,
            display_name: format!("member{}", id),
            linked: None,
            current_roles: roles.iter().copied().collect(),
            last_synced_at: None,
        }
    }

    /// Role changes for `member_id` fail with `Forbidden`.
    pub fn forbid(mut self, member_id: u64) -> Self {
        self.forbidden.insert(member_id);
        self
    }

    /// Member listing fails with a server error.
    pub fn failing_listing(mut self) -> Self {
        self.fail_listing = true;
        self
    }

    pub fn roles_of(&self, member_id: u64) -> BTreeSet<u64> {
        self.roles
            .lock()
            .unwrap()
            .get(&member_id)
            .cloned()
            .unwrap_or_default()
    }

    pub fn applied(&self) -> Vec<RoleDiff> {
        self.applied.lock().unwrap().clone()
    }

    pub fn messages(&self) -> Vec<(u64, Digest)> {
        self.messages.lock().unwrap().clone()
    }

    pub fn uploads(&self) -> Vec<(u64, PathBuf)> {
        self.uploads.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatPlatform for FakePlatform {
    async fn list_members(&self) -> Result<Vec<Member>, PlatformError> {
        if self.fail_listing {
            return Err(PlatformError::Unavailable {
                status: 503,
                retry_after: None,
            });
        }
        Ok(self.members.clone())
    }

    async fn current_roles(&self, member_id: u64) -> Result<BTreeSet<u64>, PlatformError> {
        self.roles
            .lock()
            .unwrap()
            .get(&member_id)
            .cloned()
            .ok_or(PlatformError::MemberNotFound(member_id))
    }

    async fn apply_role_diff(&self, diff: &RoleDiff) -> Result<(), PlatformError> {
        if self.forbidden.contains(&diff.member_id) {
            return Err(PlatformError::Forbidden("role above bot".to_string()));
        }

        let mut roles = self.roles.lock().unwrap();
        let current = roles
            .get_mut(&diff.member_id)
            .ok_or(PlatformError::MemberNotFound(diff.member_id))?;
        *current = diff.apply_to(current);
        self.applied.lock().unwrap().push(diff.clone());
        Ok(())
    }

    async fn post_message(&self, channel_id: u64, digest: &Digest) -> Result<(), PlatformError> {
        self.messages
            .lock()
            .unwrap()
            .push((channel_id, digest.clone()));
        Ok(())
    }

    async fn upload_file(&self, channel_id: u64, path: &Path) -> Result<(), PlatformError> {
        self.uploads
            .lock()
            .unwrap()
            .push((channel_id, path.to_path_buf()));
        Ok(())
    }
}

/// Audit sink keeping records in memory.
#[derive(Default)]
pub struct RecordingAuditSink {
    records: Mutex<Vec<(AuditLevel, AuditCategory, String)>>,
}

impl RecordingAuditSink {
    pub fn records(&self) -> Vec<(AuditLevel, AuditCategory, String)> {
        self.records.lock().unwrap().clone()
    }

    pub fn count(&self, category: AuditCategory) -> usize {
        self.records
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, c, _)| *c == category)
            .count()
    }
}

impl AuditSink for RecordingAuditSink {
    fn record(
        &self,
        level: AuditLevel,
        category: AuditCategory,
        message: String,
        _context: serde_json::Value,
    ) {
        self.records
            .lock()
            .unwrap()
            .push((level, category, message));
    }
}
