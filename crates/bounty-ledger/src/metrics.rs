//! Prometheus metrics for the task board
//!
//! Tracks task lifecycle transitions, dispute voting, and vote tallies.

use once_cell::sync::Lazy;
use prometheus::{
    register_int_counter, register_int_counter_vec, IntCounter, IntCounterVec,
};

/// Tasks created
pub static TASKS_CREATED: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "bounty_ledger_tasks_created_total",
        "Total tasks posted on the board"
    )
    .unwrap()
});

/// Task lifecycle transitions
pub static TASK_TRANSITIONS: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "bounty_ledger_task_transitions_total",
        "Total task lifecycle transitions",
        &["from_status", "to_status"]
    )
    .unwrap()
});

/// Dispute votes cast
pub static VOTES_CAST: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "bounty_ledger_votes_cast_total",
        "Total dispute votes cast",
        &["ballot"]
    )
    .unwrap()
});

/// Disputes finalized
pub static DISPUTES_FINALIZED: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "bounty_ledger_disputes_finalized_total",
        "Total disputes finalized",
        &["outcome"]
    )
    .unwrap()
});
