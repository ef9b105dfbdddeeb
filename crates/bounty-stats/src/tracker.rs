use crate::aggregator::{aggregate, ContributorStats};
use crate::metrics;
use crate::sources::{IdentitySource, LedgerSource};
use bounty_types::WalletAddress;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// A statistics snapshot paired with the identity it was computed for.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    /// The identity the snapshot was derived for; `None` while disconnected.
    pub identity: Option<WalletAddress>,
    pub stats: ContributorStats,
}

/// Recomputes contributor statistics whenever the wallet session or the
/// task board changes, and exposes the latest snapshot to consumers.
///
/// Each refresh reads the identity once and queries the ledger with that
/// same identity, so a published snapshot never pairs claimed tasks with a
/// different identity than the one it carries. Snapshots go out over a
/// watch channel: last write wins, and a stale snapshot is never
/// re-delivered after a newer one exists.
pub struct StatsTracker {
    identity: Arc<dyn IdentitySource>,
    ledger: Arc<dyn LedgerSource>,
    latest: watch::Sender<StatsSnapshot>,
}

impl StatsTracker {
    pub fn new(identity: Arc<dyn IdentitySource>, ledger: Arc<dyn LedgerSource>) -> Self {
        let (latest, _) = watch::channel(StatsSnapshot::default());
        Self {
            identity,
            ledger,
            latest,
        }
    }

    /// Read both sources and publish a fresh snapshot.
    ///
    /// Always recomputes: the aggregation is linear in record count, so no
    /// caching across changes is needed.
    pub async fn refresh(&self) -> StatsSnapshot {
        let timer = metrics::REFRESH_DURATION.start_timer();

        let identity = self.identity.current_identity().await;
        let all_tasks = self.ledger.all_tasks().await;
        let claimed = self.ledger.claimed_tasks_for(identity.as_ref()).await;
        let votes = self.ledger.votes().await;

        let stats = aggregate(identity.as_ref(), &all_tasks, &claimed, votes.as_deref());
        let snapshot = StatsSnapshot { identity, stats };

        self.latest.send_replace(snapshot.clone());

        metrics::REFRESHES.inc();
        timer.observe_duration();
        debug!(
            identity = snapshot
                .identity
                .as_ref()
                .map(|address| address.as_str())
                .unwrap_or("-"),
            created = snapshot.stats.created_count,
            claimed = snapshot.stats.claimed_count,
            completed = snapshot.stats.completed_count,
            rate = snapshot.stats.completion_rate,
            votes = snapshot.stats.vote_count,
            "Stats refreshed"
        );

        snapshot
    }

    /// The latest published snapshot.
    pub fn current(&self) -> StatsSnapshot {
        self.latest.borrow().clone()
    }

    /// Observe snapshot updates.
    pub fn subscribe(&self) -> watch::Receiver<StatsSnapshot> {
        self.latest.subscribe()
    }

    /// Drive the tracker: recompute on every identity or ledger change
    /// until both sources close.
    ///
    /// Abort the returned handle to tear the consumer down; an in-flight
    /// recomputation is discarded with it — the aggregation has no side
    /// effects to undo.
    pub fn run(self: Arc<Self>) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut identity_rx = self.identity.subscribe();
            let mut ledger_rx = self.ledger.subscribe();

            // Initial snapshot so consumers never observe the default
            self.refresh().await;

            loop {
                tokio::select! {
                    changed = identity_rx.changed() => {
                        if changed.is_err() {
                            debug!("Identity source closed, stopping tracker");
                            break;
                        }
                    }
                    event = ledger_rx.recv() => {
                        match event {
                            Ok(_) => {}
                            Err(broadcast::error::RecvError::Lagged(missed)) => {
                                // Recomputation reads current state, so the
                                // missed events are absorbed by this refresh
                                warn!(missed, "Ledger event receiver lagged");
                            }
                            Err(broadcast::error::RecvError::Closed) => {
                                debug!("Ledger source closed, stopping tracker");
                                break;
                            }
                        }
                    }
                }
                self.refresh().await;
            }
        })
    }
}
