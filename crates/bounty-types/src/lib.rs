pub mod address;
pub mod task;
pub mod vote;

pub use address::WalletAddress;
pub use task::{RewardAmount, Task, TaskId, TaskStatus};
pub use vote::{Ballot, DisputeVote};
