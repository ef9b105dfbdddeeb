//! Read interfaces over the wallet session and the task board.
//!
//! The aggregation core consumes its collaborators through these narrow
//! traits; the concrete [`WalletSession`] and [`TaskBoard`] implementations
//! live in their own crates and are adapted here.

use async_trait::async_trait;
use bounty_ledger::{LedgerEvent, TaskBoard};
use bounty_types::{DisputeVote, Task, WalletAddress};
use bounty_wallet::WalletSession;
use tokio::sync::{broadcast, watch};

/// Supplies the currently active wallet address.
#[async_trait]
pub trait IdentitySource: Send + Sync {
    /// The active wallet address, or `None` when disconnected. Idempotent
    /// and side-effect free.
    async fn current_identity(&self) -> Option<WalletAddress>;

    /// Observe identity changes.
    fn subscribe(&self) -> watch::Receiver<Option<WalletAddress>>;
}

/// Supplies the task and vote collections.
///
/// The collections are owned and mutated exclusively by the implementor;
/// every method hands out an independent snapshot, so callers never observe
/// mutation in flight.
#[async_trait]
pub trait LedgerSource: Send + Sync {
    /// Full task collection. Order is unspecified.
    async fn all_tasks(&self) -> Vec<Task>;

    /// Tasks claimed by `identity`. Empty — never an error — when the
    /// identity is absent or has no claims. Pre-filtering is this
    /// collaborator's contract obligation.
    async fn claimed_tasks_for(&self, identity: Option<&WalletAddress>) -> Vec<Task>;

    /// All recorded votes; `None` signals "not yet loaded", distinct from
    /// loaded but empty.
    async fn votes(&self) -> Option<Vec<DisputeVote>>;

    /// Observe ledger changes.
    fn subscribe(&self) -> broadcast::Receiver<LedgerEvent>;
}

#[async_trait]
impl IdentitySource for WalletSession {
    async fn current_identity(&self) -> Option<WalletAddress> {
        self.current()
    }

    fn subscribe(&self) -> watch::Receiver<Option<WalletAddress>> {
        WalletSession::subscribe(self)
    }
}

#[async_trait]
impl LedgerSource for TaskBoard {
    async fn all_tasks(&self) -> Vec<Task> {
        TaskBoard::all_tasks(self).await
    }

    async fn claimed_tasks_for(&self, identity: Option<&WalletAddress>) -> Vec<Task> {
        TaskBoard::claimed_tasks_for(self, identity).await
    }

    async fn votes(&self) -> Option<Vec<DisputeVote>> {
        TaskBoard::votes(self).await
    }

    fn subscribe(&self) -> broadcast::Receiver<LedgerEvent> {
        TaskBoard::subscribe(self)
    }
}
