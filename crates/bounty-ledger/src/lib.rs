/*!
# Bounty Ledger

In-memory task/vote ledger for the bounty board:
- Task lifecycle: create → claim → submit → approve, with deadline-based
  reopening of stalled claims
- DAO dispute resolution: contested submissions are settled by a yes/no vote
- Change notification: every state change is broadcast as a [`LedgerEvent`]

The ledger is the exclusive owner of task and vote mutation. Readers get
cloned snapshots; consumers that derive values from the ledger (such as the
contributor statistics aggregation) re-read on every change notification.

## Module Structure

- **board**: the [`TaskBoard`] lifecycle manager and read interface
- **dispute**: pure vote tallying for disputed tasks
- **events**: event bus broadcasting board state changes
- **error**: ledger-specific errors
*/

pub mod board;
pub mod dispute;
pub mod error;
pub mod events;
pub mod metrics;

pub use board::{BoardConfig, TaskBoard};
pub use dispute::{DisputeOutcome, DisputeTally};
pub use error::{LedgerError, Result};
pub use events::{EventBus, LedgerEvent};
