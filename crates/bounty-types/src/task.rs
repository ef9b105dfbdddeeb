use crate::WalletAddress;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique task identifier, assigned sequentially by the board.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct TaskId(u64);

impl TaskId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "task-{}", self.0)
    }
}

/// Bounty reward in base units.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct RewardAmount(u64);

impl RewardAmount {
    pub const ZERO: Self = Self(0);

    pub fn from_base_units(units: u64) -> Self {
        Self(units)
    }

    pub fn to_base_units(&self) -> u64 {
        self.0
    }

    pub fn checked_add(&self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    pub fn saturating_mul(&self, quantity: u64) -> Self {
        Self(self.0.saturating_mul(quantity))
    }
}

impl fmt::Display for RewardAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} units", self.0)
    }
}

/// Task lifecycle status.
///
/// Only `Completed` is significant to the metrics aggregation; the rest of
/// the machine drives the bounty lifecycle on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskStatus {
    /// Available for claiming
    Open,
    /// An identity holds the claim
    Claimed,
    /// Work handed in, awaiting approval
    Submitted,
    /// Approved, directly or via dispute vote
    Completed,
    /// Submission contested, dispute vote in progress
    Disputed,
}

impl TaskStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed)
    }

    pub fn can_transition_to(&self, next: &Self) -> bool {
        use TaskStatus::*;
        match (self, next) {
            // From Open
            (Open, Claimed) => true,

            // From Claimed
            (Claimed, Submitted) => true,
            (Claimed, Open) => true, // deadline reopen

            // From Submitted
            (Submitted, Completed) => true,
            (Submitted, Disputed) => true,
            (Submitted, Open) => true, // deadline reopen

            // From Disputed
            (Disputed, Completed) => true, // vote upholds the work
            (Disputed, Open) => true,      // vote rejects it

            // Terminal state cannot transition
            (Completed, _) => false,

            // All other transitions are invalid
            _ => false,
        }
    }

    /// Lowercase label for metrics and event payloads.
    pub fn as_label(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Claimed => "claimed",
            Self::Submitted => "submitted",
            Self::Completed => "completed",
            Self::Disputed => "disputed",
        }
    }
}

/// A unit of work on the board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub creator: WalletAddress,
    /// Absent while unclaimed; cleared again when a task reopens.
    pub claimant: Option<WalletAddress>,
    pub status: TaskStatus,
    pub reward: RewardAmount,
    pub deadline: Option<DateTime<Utc>>,
    /// Content reference handed in with the work.
    pub proof: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Task {
    pub fn new(
        id: TaskId,
        creator: WalletAddress,
        reward: RewardAmount,
        deadline: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id,
            creator,
            claimant: None,
            status: TaskStatus::Open,
            reward,
            deadline,
            proof: None,
            created_at: Utc::now(),
        }
    }

    /// Whether `identity` currently holds the claim.
    pub fn is_claimed_by(&self, identity: &WalletAddress) -> bool {
        self.claimant.as_ref() == Some(identity)
    }

    /// Whether the deadline lies strictly in the past. Tasks without a
    /// deadline never expire.
    pub fn deadline_passed(&self, now: DateTime<Utc>) -> bool {
        self.deadline.map(|deadline| now > deadline).unwrap_or(false)
    }
}

#[cfg(test)]
mod status_tests {
    use super::*;

    #[test]
    fn test_terminal_states() {
        assert!(TaskStatus::Completed.is_terminal());

        assert!(!TaskStatus::Open.is_terminal());
        assert!(!TaskStatus::Claimed.is_terminal());
        assert!(!TaskStatus::Submitted.is_terminal());
        assert!(!TaskStatus::Disputed.is_terminal());
    }

    #[test]
    fn test_valid_transitions() {
        // Open → Claimed
        assert!(TaskStatus::Open.can_transition_to(&TaskStatus::Claimed));

        // Claimed → Submitted or back to Open
        assert!(TaskStatus::Claimed.can_transition_to(&TaskStatus::Submitted));
        assert!(TaskStatus::Claimed.can_transition_to(&TaskStatus::Open));

        // Submitted → Completed, Disputed, or back to Open
        assert!(TaskStatus::Submitted.can_transition_to(&TaskStatus::Completed));
        assert!(TaskStatus::Submitted.can_transition_to(&TaskStatus::Disputed));
        assert!(TaskStatus::Submitted.can_transition_to(&TaskStatus::Open));

        // Disputed → Completed or Open
        assert!(TaskStatus::Disputed.can_transition_to(&TaskStatus::Completed));
        assert!(TaskStatus::Disputed.can_transition_to(&TaskStatus::Open));
    }

    #[test]
    fn test_invalid_transitions() {
        // Cannot skip states
        assert!(!TaskStatus::Open.can_transition_to(&TaskStatus::Submitted));
        assert!(!TaskStatus::Open.can_transition_to(&TaskStatus::Completed));
        assert!(!TaskStatus::Claimed.can_transition_to(&TaskStatus::Completed));
        assert!(!TaskStatus::Claimed.can_transition_to(&TaskStatus::Disputed));

        // Cannot dispute unclaimed or unsubmitted work
        assert!(!TaskStatus::Open.can_transition_to(&TaskStatus::Disputed));

        // Cannot transition from the terminal state
        assert!(!TaskStatus::Completed.can_transition_to(&TaskStatus::Open));
        assert!(!TaskStatus::Completed.can_transition_to(&TaskStatus::Claimed));
        assert!(!TaskStatus::Completed.can_transition_to(&TaskStatus::Disputed));

        // Cannot go backwards
        assert!(!TaskStatus::Submitted.can_transition_to(&TaskStatus::Claimed));
        assert!(!TaskStatus::Disputed.can_transition_to(&TaskStatus::Submitted));
    }

    #[test]
    fn test_happy_path() {
        // Open → Claimed → Submitted → Completed
        let open = TaskStatus::Open;
        assert!(open.can_transition_to(&TaskStatus::Claimed));

        let claimed = TaskStatus::Claimed;
        assert!(claimed.can_transition_to(&TaskStatus::Submitted));

        let submitted = TaskStatus::Submitted;
        assert!(submitted.can_transition_to(&TaskStatus::Completed));

        let completed = TaskStatus::Completed;
        assert!(completed.is_terminal());
    }

    #[test]
    fn test_dispute_paths() {
        // Dispute upheld: Submitted → Disputed → Completed
        assert!(TaskStatus::Submitted.can_transition_to(&TaskStatus::Disputed));
        assert!(TaskStatus::Disputed.can_transition_to(&TaskStatus::Completed));

        // Dispute rejected: Submitted → Disputed → Open
        assert!(TaskStatus::Disputed.can_transition_to(&TaskStatus::Open));
    }
}
