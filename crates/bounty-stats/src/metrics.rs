//! Prometheus metrics for the stats tracker

use once_cell::sync::Lazy;
use prometheus::{register_histogram, register_int_counter, Histogram, IntCounter};

/// Snapshot recomputations
pub static REFRESHES: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "bounty_stats_refreshes_total",
        "Total contributor stats recomputations"
    )
    .unwrap()
});

/// Recomputation time
pub static REFRESH_DURATION: Lazy<Histogram> = Lazy::new(|| {
    register_histogram!(
        "bounty_stats_refresh_seconds",
        "Time to recompute a contributor stats snapshot",
        vec![0.000001, 0.00001, 0.0001, 0.001, 0.01]
    )
    .unwrap()
});
