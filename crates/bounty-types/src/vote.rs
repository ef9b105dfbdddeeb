use crate::{TaskId, WalletAddress};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Vote choice in a dispute. `Yes` upholds the submitted work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Ballot {
    Yes,
    No,
}

impl Ballot {
    /// Lowercase label for metrics and event payloads.
    pub fn as_label(&self) -> &'static str {
        match self {
            Self::Yes => "yes",
            Self::No => "no",
        }
    }
}

/// One DAO governance vote cast by an identity against a disputed task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisputeVote {
    pub task_id: TaskId,
    pub voter: WalletAddress,
    pub ballot: Ballot,
    pub timestamp: DateTime<Utc>,
}

impl DisputeVote {
    pub fn new(task_id: TaskId, voter: WalletAddress, ballot: Ballot) -> Self {
        Self {
            task_id,
            voter,
            ballot,
            timestamp: Utc::now(),
        }
    }
}
