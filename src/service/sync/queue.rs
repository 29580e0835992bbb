//! Bounded worker pool draining a run's member tasks.
//!
//! Worker slots pull tasks from one shared channel and pace their own dispatches. A
//! semaphore caps in-flight game API calls across every slot. A task that fails
//! transiently is handed to a detached timer which re-enqueues it after the backoff, so no
//! slot waits out a backoff delay.

use rand::Rng;
use std::{collections::HashSet, sync::Arc, time::Duration};
use tokio::{
    sync::{mpsc, Mutex, Semaphore},
    task::JoinSet,
    time::{sleep, sleep_until, Instant},
};

use crate::{
    config::QueueConfig,
    model::{
        member::Member,
        sync::{MemberOutcome, SyncTask},
    },
    service::{
        external::AffiliationClient,
        platform::ChatPlatform,
        sync::task::{AttemptResult, MemberSyncer},
    },
};

/// Shared state of the workers of one `enqueue_all` call.
struct Workers<C, P> {
    tasks: Mutex<mpsc::UnboundedReceiver<SyncTask>>,
    requeue: mpsc::UnboundedSender<SyncTask>,
    outcomes: mpsc::UnboundedSender<MemberOutcome>,
    syncer: Arc<MemberSyncer<C, P>>,
    permits: Semaphore,
    config: QueueConfig,
}

pub struct QueueManager {
    config: QueueConfig,
}

impl QueueManager {
    pub fn new(config: QueueConfig) -> Self {
        Self { config }
    }

    /// Runs one task per member until every task is terminal.
    ///
    /// # Arguments
    /// - `syncer` - Per-member sync logic bound to the run's mapping snapshot
    /// - `members` - Target members in enqueue order
    ///
    /// # Returns
    /// - `Vec<MemberOutcome>` - One outcome per member, in enqueue order
    pub async fn enqueue_all<C, P>(
        &self,
        syncer: Arc<MemberSyncer<C, P>>,
        members: Vec<Member>,
    ) -> Vec<MemberOutcome>
    where
        C: AffiliationClient,
        P: ChatPlatform,
    {
        let total = members.len();
        if total == 0 {
            return Vec::new();
        }

        let (task_tx, task_rx) = mpsc::unbounded_channel();
        let (outcome_tx, mut outcome_rx) = mpsc::unbounded_channel();

        let tasks: Vec<SyncTask> = members
            .into_iter()
            .enumerate()
            .map(|(sequence, member)| SyncTask::new(sequence, member))
            .collect();
        for task in &tasks {
            let _ = task_tx.send(task.clone());
        }

        let workers = Arc::new(Workers {
            tasks: Mutex::new(task_rx),
            requeue: task_tx,
            outcomes: outcome_tx,
            syncer,
            permits: Semaphore::new(self.config.max_in_flight),
            config: self.config.clone(),
        });

        let mut slots = JoinSet::new();
        for slot in 0..self.config.workers.max(1) {
            slots.spawn(run_worker(slot, workers.clone()));
        }
        drop(workers);

        let mut outcomes = Vec::with_capacity(total);
        while outcomes.len() < total {
            tokio::select! {
                received = outcome_rx.recv() => match received {
                    Some(outcome) => outcomes.push(outcome),
                    None => break,
                },
                joined = slots.join_next() => match joined {
                    Some(Ok(())) => {}
                    Some(Err(e)) => {
                        tracing::error!("Queue worker stopped unexpectedly: {:?}", e);
                        break;
                    }
                    None => break,
                },
            }
        }

        // Idle workers block on the shared channel forever; every task is terminal here.
        slots.shutdown().await;
        while let Ok(outcome) = outcome_rx.try_recv() {
            outcomes.push(outcome);
        }

        if outcomes.len() < total {
            tracing::error!(
                "Queue drained with {} of {} outcomes",
                outcomes.len(),
                total
            );
            let finished: HashSet<usize> = outcomes.iter().map(|o| o.sequence).collect();
            outcomes.extend(
                tasks
                    .iter()
                    .filter(|task| !finished.contains(&task.sequence))
                    .map(|task| {
                        MemberOutcome::interrupted(task, "Sync worker stopped".to_string())
                    }),
            );
        }

        outcomes.sort_by_key(|o| o.sequence);
        outcomes
    }
}

async fn run_worker<C, P>(slot: usize, workers: Arc<Workers<C, P>>)
where
    C: AffiliationClient,
    P: ChatPlatform,
{
    let mut last_dispatch: Option<Instant> = None;

    loop {
        let next = workers.tasks.lock().await.recv().await;
        let Some(mut task) = next else {
            break;
        };

        if let Some(last) = last_dispatch {
            sleep_until(last + workers.config.dispatch_interval).await;
        }
        last_dispatch = Some(Instant::now());

        task.attempts += 1;
        tracing::debug!(
            "Slot {} dispatching member {} (attempt {})",
            slot,
            task.member.id,
            task.attempts
        );

        match workers.syncer.attempt(&task, &workers.permits).await {
            AttemptResult::Done(outcome) => {
                let _ = workers.outcomes.send(outcome);
            }
            AttemptResult::Retry {
                error,
                retry_after,
                resolved,
            } => {
                if let Some(identity) = resolved {
                    task.member.linked = Some(identity);
                    task.newly_linked = true;
                }

                if task.attempts >= workers.config.max_attempts {
                    tracing::warn!(
                        "Member {} failed after {} attempts: {}",
                        task.member.id,
                        task.attempts,
                        error
                    );
                    let _ = workers
                        .outcomes
                        .send(MemberOutcome::retry_exhausted(&task, error));
                    continue;
                }

                let delay = with_jitter(backoff_delay(
                    &workers.config,
                    task.attempts,
                    retry_after,
                ));
                tracing::debug!(
                    "Retrying member {} in {:?}: {}",
                    task.member.id,
                    delay,
                    error
                );
                task.last_error = Some(error);

                let requeue = workers.requeue.clone();
                tokio::spawn(async move {
                    sleep(delay).await;
                    let _ = requeue.send(task);
                });
            }
        }
    }
}

/// Delay before the attempt after `attempt`.
///
/// `base * 2^(attempt - 1)` capped at the configured maximum, raised to `retry_after` when
/// the remote side asked for a longer wait. A requested wait is capped at the maximum too.
pub fn backoff_delay(config: &QueueConfig, attempt: u32, retry_after: Option<Duration>) -> Duration {
    let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
    let delay = config
        .backoff_base
        .saturating_mul(factor)
        .min(config.backoff_max);

    match retry_after {
        Some(requested) => delay.max(requested.min(config.backoff_max)),
        None => delay,
    }
}

/// Adds up to 10% random jitter so retries of one burst spread out.
fn with_jitter(delay: Duration) -> Duration {
    let spread = delay.as_millis() as u64 / 10;
    if spread == 0 {
        return delay;
    }
    delay + Duration::from_millis(rand::rng().random_range(0..=spread))
}
