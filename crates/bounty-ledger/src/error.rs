use bounty_types::TaskId;
use thiserror::Error;

/// Ledger operation result type
pub type Result<T> = std::result::Result<T, LedgerError>;

/// Task board errors
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Task not found: {0}")]
    TaskNotFound(TaskId),

    #[error("Task in wrong status: expected {expected}, found {found}")]
    InvalidStatus { expected: String, found: String },

    #[error("{identity} does not hold the claim on {task_id}")]
    NotClaimant { task_id: TaskId, identity: String },

    #[error("{identity} is not the creator of {task_id}")]
    NotCreator { task_id: TaskId, identity: String },

    #[error("{identity} may not raise a dispute on {task_id}")]
    NotAuthorized { task_id: TaskId, identity: String },

    #[error("Duplicate vote from voter: {0}")]
    DuplicateVote(String),

    #[error("Deadline has not passed for {0}")]
    DeadlineNotPassed(TaskId),
}
