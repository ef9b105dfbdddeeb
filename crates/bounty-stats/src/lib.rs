/*!
# Bounty Stats

Contributor metrics aggregation over the bounty board.

Given the active wallet identity and the current ledger contents, this crate
derives a fixed-shape statistics snapshot — tasks created, tasks claimed,
tasks completed, completion rate, and dispute votes recorded — and keeps it
current as either source changes.

## Core Principles

- **Pure aggregation**: [`aggregate`] is a total, side-effect-free function;
  it never errors, never mutates its inputs, and never divides by zero.
- **Claim matching lives upstream**: the aggregator trusts the ledger's
  pre-filtered claimed-task collection instead of re-filtering by identity.
- **Consistent pairs**: the [`StatsTracker`] reads the identity once per
  refresh and queries the ledger with that same identity, so a published
  snapshot never mixes collections scoped to different identities.
- **Last write wins**: snapshots are published over a watch channel; stale
  snapshots are never re-delivered after a newer one exists.

## Module Structure

- **aggregator**: the pure projection and the [`ContributorStats`] shape
- **sources**: read interfaces over the wallet session and the task board
- **tracker**: the reactive binding publishing the latest snapshot

## Example Usage

```rust
use bounty_stats::aggregate;
use bounty_types::{RewardAmount, Task, TaskId, WalletAddress};

let alice = WalletAddress::from("0xAA");
let task = Task::new(
    TaskId::new(1),
    alice.clone(),
    RewardAmount::from_base_units(100),
    None,
);

let stats = aggregate(Some(&alice), &[task], &[], None);
assert_eq!(stats.created_count, 1);
assert_eq!(stats.claimed_count, 0);
assert_eq!(stats.completion_rate, 0);
```
*/

pub mod aggregator;
pub mod metrics;
pub mod sources;
pub mod tracker;

pub use aggregator::{aggregate, ContributorStats};
pub use sources::{IdentitySource, LedgerSource};
pub use tracker::{StatsSnapshot, StatsTracker};
