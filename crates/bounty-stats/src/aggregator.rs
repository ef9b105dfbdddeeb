use bounty_types::{DisputeVote, Task, TaskStatus, WalletAddress};
use serde::{Deserialize, Serialize};

/// Per-contributor statistics snapshot.
///
/// A derived, disposable value: recomputed (never mutated) on every observed
/// change of the wallet session or the task board.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributorStats {
    pub created_count: usize,
    pub claimed_count: usize,
    pub completed_count: usize,
    /// Percentage in [0, 100]; 0 when nothing has been claimed.
    pub completion_rate: u8,
    pub vote_count: usize,
}

/// Compute contributor statistics from the identity and ledger contents.
///
/// Total over its input domain: no error paths, no mutation of inputs.
/// `claimed_tasks` is trusted to be pre-filtered to the identity's claims by
/// the ledger — claim matching lives once, upstream — so an absent identity
/// zeroes only `created_count` while the other counts follow whatever the
/// ledger supplied.
pub fn aggregate(
    identity: Option<&WalletAddress>,
    all_tasks: &[Task],
    claimed_tasks: &[Task],
    votes: Option<&[DisputeVote]>,
) -> ContributorStats {
    // An absent identity matches nothing; it is never a wildcard.
    let created_count = match identity {
        Some(identity) => all_tasks
            .iter()
            .filter(|task| &task.creator == identity)
            .count(),
        None => 0,
    };

    let claimed_count = claimed_tasks.len();
    let completed_count = claimed_tasks
        .iter()
        .filter(|task| task.status == TaskStatus::Completed)
        .count();

    ContributorStats {
        created_count,
        claimed_count,
        completed_count,
        completion_rate: completion_rate(completed_count, claimed_count),
        vote_count: votes.map_or(0, |votes| votes.len()),
    }
}

/// Round-half-up percentage of completed over claimed; 0 when nothing is
/// claimed.
fn completion_rate(completed: usize, claimed: usize) -> u8 {
    if claimed == 0 {
        return 0;
    }
    ((200 * completed + claimed) / (2 * claimed)) as u8
}
