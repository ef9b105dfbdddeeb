use crate::dispute::{DisputeOutcome, DisputeTally};
use crate::events::{EventBus, LedgerEvent};
use crate::{metrics, LedgerError, Result};
use bounty_types::{Ballot, DisputeVote, RewardAmount, Task, TaskId, TaskStatus, WalletAddress};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};
use tracing::{debug, info};

/// Configuration for the task board
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardConfig {
    /// Default claim deadline in seconds, applied when a task is created
    /// without an explicit deadline. `None` disables default deadlines.
    pub default_deadline_secs: Option<i64>,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            default_deadline_secs: Some(7 * 24 * 3600), // 7 days
        }
    }
}

/// In-memory task/vote ledger.
///
/// The board is the exclusive owner of task and vote mutation; readers get
/// cloned snapshots. The vote collection starts "not yet loaded" (`None`)
/// and becomes loaded on [`TaskBoard::load_votes`] or the first recorded
/// vote.
///
/// # Event Emission
/// Every state change emits a [`LedgerEvent`]:
/// - create_task() → TaskCreated
/// - claim_task() → TaskClaimed
/// - submit_task() → TaskSubmitted
/// - approve_task() → TaskCompleted
/// - dispute_task() → TaskDisputed
/// - cast_dispute_vote() → VoteCast
/// - finalize_dispute() → DisputeFinalized (+ TaskCompleted when upheld)
/// - reopen_expired() → TaskReopened
/// - load_votes() → VotesLoaded
pub struct TaskBoard {
    config: BoardConfig,
    tasks: Arc<RwLock<HashMap<TaskId, Task>>>,
    /// `None` until votes are loaded; distinct from loaded-but-empty.
    votes: Arc<RwLock<Option<Vec<DisputeVote>>>>,
    next_task_id: AtomicU64,
    events: EventBus,
}

impl TaskBoard {
    /// Create an empty board
    pub fn new(config: BoardConfig) -> Self {
        Self {
            config,
            tasks: Arc::new(RwLock::new(HashMap::new())),
            votes: Arc::new(RwLock::new(None)),
            next_task_id: AtomicU64::new(1),
            events: EventBus::new(),
        }
    }

    /// Subscribe to board state changes
    pub fn subscribe(&self) -> broadcast::Receiver<LedgerEvent> {
        self.events.subscribe()
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    // ---- lifecycle operations ----

    /// Post a new open task. Without an explicit deadline the configured
    /// default is applied, when one is set.
    pub async fn create_task(
        &self,
        creator: WalletAddress,
        reward: RewardAmount,
        deadline: Option<DateTime<Utc>>,
    ) -> TaskId {
        let id = TaskId::new(self.next_task_id.fetch_add(1, Ordering::SeqCst));
        let deadline = deadline.or_else(|| {
            self.config
                .default_deadline_secs
                .map(|secs| Utc::now() + chrono::Duration::seconds(secs))
        });

        let mut tasks = self.tasks.write().await;
        tasks.insert(id, Task::new(id, creator.clone(), reward, deadline));
        drop(tasks);

        metrics::TASKS_CREATED.inc();
        info!(task_id = %id, creator = %creator, reward = %reward, "📋 Task created");
        self.events.emit(LedgerEvent::TaskCreated {
            task_id: id,
            creator,
            timestamp: Utc::now(),
        });

        id
    }

    /// Claim an open task
    pub async fn claim_task(&self, id: TaskId, claimant: WalletAddress) -> Result<()> {
        let mut tasks = self.tasks.write().await;
        let task = tasks.get_mut(&id).ok_or(LedgerError::TaskNotFound(id))?;

        Self::ensure_status(task, TaskStatus::Open)?;

        task.claimant = Some(claimant.clone());
        Self::apply_transition(task, TaskStatus::Claimed);
        drop(tasks);

        info!(task_id = %id, claimant = %claimant, "🤝 Task claimed");
        self.events.emit(LedgerEvent::TaskClaimed {
            task_id: id,
            claimant,
            timestamp: Utc::now(),
        });

        Ok(())
    }

    /// Hand in work for a claimed task. Only the claimant may submit.
    pub async fn submit_task(
        &self,
        id: TaskId,
        claimant: &WalletAddress,
        proof: Option<String>,
    ) -> Result<()> {
        let mut tasks = self.tasks.write().await;
        let task = tasks.get_mut(&id).ok_or(LedgerError::TaskNotFound(id))?;

        Self::ensure_status(task, TaskStatus::Claimed)?;
        if !task.is_claimed_by(claimant) {
            return Err(LedgerError::NotClaimant {
                task_id: id,
                identity: claimant.to_string(),
            });
        }

        task.proof = proof;
        Self::apply_transition(task, TaskStatus::Submitted);
        drop(tasks);

        info!(task_id = %id, claimant = %claimant, "📤 Work submitted");
        self.events.emit(LedgerEvent::TaskSubmitted {
            task_id: id,
            claimant: claimant.clone(),
            timestamp: Utc::now(),
        });

        Ok(())
    }

    /// Approve submitted work. Only the creator may approve.
    pub async fn approve_task(&self, id: TaskId, approver: &WalletAddress) -> Result<()> {
        let mut tasks = self.tasks.write().await;
        let task = tasks.get_mut(&id).ok_or(LedgerError::TaskNotFound(id))?;

        Self::ensure_status(task, TaskStatus::Submitted)?;
        if &task.creator != approver {
            return Err(LedgerError::NotCreator {
                task_id: id,
                identity: approver.to_string(),
            });
        }

        Self::apply_transition(task, TaskStatus::Completed);
        let claimant = task.claimant.clone();
        drop(tasks);

        info!(task_id = %id, approver = %approver, "✅ Task approved");
        self.events.emit(LedgerEvent::TaskCompleted {
            task_id: id,
            claimant,
            timestamp: Utc::now(),
        });

        Ok(())
    }

    /// Contest a submission, opening a dispute vote. Only the claimant or
    /// the creator may raise a dispute.
    pub async fn dispute_task(&self, id: TaskId, raised_by: &WalletAddress) -> Result<()> {
        let mut tasks = self.tasks.write().await;
        let task = tasks.get_mut(&id).ok_or(LedgerError::TaskNotFound(id))?;

        Self::ensure_status(task, TaskStatus::Submitted)?;
        if &task.creator != raised_by && !task.is_claimed_by(raised_by) {
            return Err(LedgerError::NotAuthorized {
                task_id: id,
                identity: raised_by.to_string(),
            });
        }

        Self::apply_transition(task, TaskStatus::Disputed);
        drop(tasks);

        info!(task_id = %id, raised_by = %raised_by, "⚖️ Dispute raised");
        self.events.emit(LedgerEvent::TaskDisputed {
            task_id: id,
            raised_by: raised_by.clone(),
            timestamp: Utc::now(),
        });

        Ok(())
    }

    /// Cast a vote on an active dispute. One vote per voter per task.
    pub async fn cast_dispute_vote(
        &self,
        id: TaskId,
        voter: WalletAddress,
        ballot: Ballot,
    ) -> Result<()> {
        {
            let tasks = self.tasks.read().await;
            let task = tasks.get(&id).ok_or(LedgerError::TaskNotFound(id))?;
            Self::ensure_status(task, TaskStatus::Disputed)?;
        }

        let mut votes = self.votes.write().await;
        let entries = votes.get_or_insert_with(Vec::new);
        if entries
            .iter()
            .any(|vote| vote.task_id == id && vote.voter == voter)
        {
            return Err(LedgerError::DuplicateVote(voter.to_string()));
        }
        entries.push(DisputeVote::new(id, voter.clone(), ballot));
        drop(votes);

        metrics::VOTES_CAST.with_label_values(&[ballot.as_label()]).inc();
        info!(task_id = %id, voter = %voter, ballot = ?ballot, "🗳️ Dispute vote cast");
        self.events.emit(LedgerEvent::VoteCast {
            task_id: id,
            voter,
            ballot,
            timestamp: Utc::now(),
        });

        Ok(())
    }

    /// Tally the dispute vote and resolve the task. Only the creator may
    /// finalize. A strict yes-majority upholds the submission; a tie or
    /// no-majority reopens the task with the claim cleared.
    pub async fn finalize_dispute(
        &self,
        id: TaskId,
        caller: &WalletAddress,
    ) -> Result<DisputeOutcome> {
        let mut tasks = self.tasks.write().await;
        let task = tasks.get_mut(&id).ok_or(LedgerError::TaskNotFound(id))?;

        Self::ensure_status(task, TaskStatus::Disputed)?;
        if &task.creator != caller {
            return Err(LedgerError::NotCreator {
                task_id: id,
                identity: caller.to_string(),
            });
        }

        let votes = self.votes.read().await;
        let tally = DisputeTally::count(votes.as_deref().unwrap_or_default(), id);
        drop(votes);

        let outcome = tally.outcome();
        let claimant = task.claimant.clone();
        match outcome {
            DisputeOutcome::Upheld => {
                Self::apply_transition(task, TaskStatus::Completed);
            }
            DisputeOutcome::Rejected => {
                Self::apply_transition(task, TaskStatus::Open);
                task.claimant = None;
                task.proof = None;
            }
        }
        drop(tasks);

        metrics::DISPUTES_FINALIZED
            .with_label_values(&[outcome.as_label()])
            .inc();
        info!(
            task_id = %id,
            outcome = ?outcome,
            yes = tally.yes,
            no = tally.no,
            "📊 Dispute finalized"
        );
        self.events.emit(LedgerEvent::DisputeFinalized {
            task_id: id,
            outcome,
            yes: tally.yes,
            no: tally.no,
            timestamp: Utc::now(),
        });
        if outcome == DisputeOutcome::Upheld {
            self.events.emit(LedgerEvent::TaskCompleted {
                task_id: id,
                claimant,
                timestamp: Utc::now(),
            });
        }

        Ok(outcome)
    }

    /// Reopen a claimed or submitted task whose deadline has passed,
    /// clearing the claim so the task can be reassigned.
    pub async fn reopen_expired(&self, id: TaskId, now: DateTime<Utc>) -> Result<()> {
        let mut tasks = self.tasks.write().await;
        let task = tasks.get_mut(&id).ok_or(LedgerError::TaskNotFound(id))?;

        if !matches!(task.status, TaskStatus::Claimed | TaskStatus::Submitted) {
            return Err(LedgerError::InvalidStatus {
                expected: "Claimed or Submitted".to_string(),
                found: format!("{:?}", task.status),
            });
        }
        if !task.deadline_passed(now) {
            return Err(LedgerError::DeadlineNotPassed(id));
        }

        Self::apply_transition(task, TaskStatus::Open);
        task.claimant = None;
        task.proof = None;
        drop(tasks);

        info!(task_id = %id, "🔄 Task reopened after deadline");
        self.events.emit(LedgerEvent::TaskReopened {
            task_id: id,
            reason: "deadline".to_string(),
            timestamp: Utc::now(),
        });

        Ok(())
    }

    /// Load the vote collection, replacing the "not yet loaded" state. An
    /// empty `initial` is a valid loaded state.
    pub async fn load_votes(&self, initial: Vec<DisputeVote>) {
        let count = initial.len();
        let mut votes = self.votes.write().await;
        *votes = Some(initial);
        drop(votes);

        debug!(count, "Votes loaded");
        self.events.emit(LedgerEvent::VotesLoaded {
            count,
            timestamp: Utc::now(),
        });
    }

    // ---- read interface (consumed by the stats aggregation) ----

    /// Full task collection. Order is unspecified.
    pub async fn all_tasks(&self) -> Vec<Task> {
        let tasks = self.tasks.read().await;
        tasks.values().cloned().collect()
    }

    /// Tasks claimed by `identity`, in any status. Empty when the identity
    /// is absent or has no claims; never an error.
    pub async fn claimed_tasks_for(&self, identity: Option<&WalletAddress>) -> Vec<Task> {
        let Some(identity) = identity else {
            return Vec::new();
        };

        let tasks = self.tasks.read().await;
        tasks
            .values()
            .filter(|task| task.is_claimed_by(identity))
            .cloned()
            .collect()
    }

    /// All recorded dispute votes, or `None` while not yet loaded
    pub async fn votes(&self) -> Option<Vec<DisputeVote>> {
        let votes = self.votes.read().await;
        votes.clone()
    }

    /// Look up a single task
    pub async fn task(&self, id: TaskId) -> Option<Task> {
        let tasks = self.tasks.read().await;
        tasks.get(&id).cloned()
    }

    pub async fn task_count(&self) -> usize {
        self.tasks.read().await.len()
    }

    // ---- helpers ----

    fn ensure_status(task: &Task, expected: TaskStatus) -> Result<()> {
        if task.status != expected {
            return Err(LedgerError::InvalidStatus {
                expected: format!("{:?}", expected),
                found: format!("{:?}", task.status),
            });
        }
        Ok(())
    }

    fn apply_transition(task: &mut Task, next: TaskStatus) {
        debug_assert!(
            task.status.can_transition_to(&next),
            "invalid transition {:?} -> {:?}",
            task.status,
            next
        );
        metrics::TASK_TRANSITIONS
            .with_label_values(&[task.status.as_label(), next.as_label()])
            .inc();
        task.status = next;
    }
}
