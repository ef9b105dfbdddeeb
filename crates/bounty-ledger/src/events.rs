//! Event system for task board state changes
//!
//! This module provides an event bus for notifying consumers (the stats
//! tracker, UI bridges) about state changes on the board without polling.

use crate::dispute::DisputeOutcome;
use bounty_types::{Ballot, TaskId, WalletAddress};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::debug;

/// Maximum number of events buffered per subscriber before old events are
/// dropped
const EVENT_BUFFER: usize = 256;

/// Types of events that can be emitted by the task board
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum LedgerEvent {
    /// A new task was posted
    TaskCreated {
        task_id: TaskId,
        creator: WalletAddress,
        #[serde(with = "chrono::serde::ts_seconds")]
        timestamp: DateTime<Utc>,
    },

    /// An open task was claimed
    TaskClaimed {
        task_id: TaskId,
        claimant: WalletAddress,
        #[serde(with = "chrono::serde::ts_seconds")]
        timestamp: DateTime<Utc>,
    },

    /// Work was handed in for review
    TaskSubmitted {
        task_id: TaskId,
        claimant: WalletAddress,
        #[serde(with = "chrono::serde::ts_seconds")]
        timestamp: DateTime<Utc>,
    },

    /// A task reached its terminal state
    TaskCompleted {
        task_id: TaskId,
        claimant: Option<WalletAddress>,
        #[serde(with = "chrono::serde::ts_seconds")]
        timestamp: DateTime<Utc>,
    },

    /// A submission was contested
    TaskDisputed {
        task_id: TaskId,
        raised_by: WalletAddress,
        #[serde(with = "chrono::serde::ts_seconds")]
        timestamp: DateTime<Utc>,
    },

    /// A dispute vote was recorded
    VoteCast {
        task_id: TaskId,
        voter: WalletAddress,
        ballot: Ballot,
        #[serde(with = "chrono::serde::ts_seconds")]
        timestamp: DateTime<Utc>,
    },

    /// A dispute vote was tallied and the task resolved
    DisputeFinalized {
        task_id: TaskId,
        outcome: DisputeOutcome,
        yes: usize,
        no: usize,
        #[serde(with = "chrono::serde::ts_seconds")]
        timestamp: DateTime<Utc>,
    },

    /// A stalled claim was released after its deadline
    TaskReopened {
        task_id: TaskId,
        reason: String,
        #[serde(with = "chrono::serde::ts_seconds")]
        timestamp: DateTime<Utc>,
    },

    /// The vote collection transitioned from "not yet loaded" to loaded
    VotesLoaded {
        count: usize,
        #[serde(with = "chrono::serde::ts_seconds")]
        timestamp: DateTime<Utc>,
    },
}

impl LedgerEvent {
    /// Get the event type as a string (for downstream event routing)
    pub fn event_type(&self) -> &'static str {
        match self {
            LedgerEvent::TaskCreated { .. } => "task.created",
            LedgerEvent::TaskClaimed { .. } => "task.claimed",
            LedgerEvent::TaskSubmitted { .. } => "task.submitted",
            LedgerEvent::TaskCompleted { .. } => "task.completed",
            LedgerEvent::TaskDisputed { .. } => "task.disputed",
            LedgerEvent::VoteCast { .. } => "vote.cast",
            LedgerEvent::DisputeFinalized { .. } => "dispute.finalized",
            LedgerEvent::TaskReopened { .. } => "task.reopened",
            LedgerEvent::VotesLoaded { .. } => "votes.loaded",
        }
    }

    /// Get the timestamp of the event
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            LedgerEvent::TaskCreated { timestamp, .. } => *timestamp,
            LedgerEvent::TaskClaimed { timestamp, .. } => *timestamp,
            LedgerEvent::TaskSubmitted { timestamp, .. } => *timestamp,
            LedgerEvent::TaskCompleted { timestamp, .. } => *timestamp,
            LedgerEvent::TaskDisputed { timestamp, .. } => *timestamp,
            LedgerEvent::VoteCast { timestamp, .. } => *timestamp,
            LedgerEvent::DisputeFinalized { timestamp, .. } => *timestamp,
            LedgerEvent::TaskReopened { timestamp, .. } => *timestamp,
            LedgerEvent::VotesLoaded { timestamp, .. } => *timestamp,
        }
    }
}

/// Event bus for broadcasting board state changes
///
/// If no subscribers are listening the event is dropped; a subscriber that
/// falls behind the buffer loses the oldest events first. Both cases are
/// harmless for state-based consumers that re-read the board on every
/// wakeup.
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<LedgerEvent>,
}

impl EventBus {
    /// Create a new event bus
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(EVENT_BUFFER);
        Self { tx }
    }

    /// Subscribe to board events
    pub fn subscribe(&self) -> broadcast::Receiver<LedgerEvent> {
        self.tx.subscribe()
    }

    /// Emit an event to all subscribers
    pub fn emit(&self, event: LedgerEvent) {
        let event_type = event.event_type();
        match self.tx.send(event) {
            Ok(subscribers) => {
                debug!(event_type, subscribers, "Event emitted");
            }
            Err(_) => {
                // No subscribers, this is normal and not an error
                debug!(event_type, "Event emitted but no subscribers listening");
            }
        }
    }

    /// Get the number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
