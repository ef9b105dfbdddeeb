use bounty_types::{Ballot, DisputeVote, TaskId};
use serde::{Deserialize, Serialize};

/// Tally of dispute votes for a single task
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisputeTally {
    pub yes: usize,
    pub no: usize,
}

/// Final dispute outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DisputeOutcome {
    /// Submitted work accepted, the task completes
    Upheld,
    /// Work rejected, the task reopens
    Rejected,
}

impl DisputeOutcome {
    /// Lowercase label for metrics and event payloads.
    pub fn as_label(&self) -> &'static str {
        match self {
            Self::Upheld => "upheld",
            Self::Rejected => "rejected",
        }
    }
}

impl DisputeTally {
    /// Tally the votes belonging to `task_id`. Votes for other tasks are
    /// skipped, not an error.
    pub fn count(votes: &[DisputeVote], task_id: TaskId) -> Self {
        let mut tally = Self::default();

        for vote in votes {
            if vote.task_id != task_id {
                continue;
            }
            match vote.ballot {
                Ballot::Yes => tally.yes += 1,
                Ballot::No => tally.no += 1,
            }
        }

        tally
    }

    pub fn total(&self) -> usize {
        self.yes + self.no
    }

    /// A strict yes-majority upholds the work; a tie rejects it.
    pub fn outcome(&self) -> DisputeOutcome {
        if self.yes > self.no {
            DisputeOutcome::Upheld
        } else {
            DisputeOutcome::Rejected
        }
    }
}
