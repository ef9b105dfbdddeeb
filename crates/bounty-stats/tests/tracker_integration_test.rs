//! Integration tests driving the stats tracker with a real wallet session
//! and task board, including the spawned run loop.

use bounty_ledger::{BoardConfig, TaskBoard};
use bounty_stats::{aggregate, StatsSnapshot, StatsTracker};
use bounty_types::{Ballot, DisputeVote, RewardAmount, TaskId, WalletAddress};
use bounty_wallet::WalletSession;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

fn addr(s: &str) -> WalletAddress {
    WalletAddress::from(s)
}

fn setup() -> (Arc<WalletSession>, Arc<TaskBoard>, Arc<StatsTracker>) {
    let session = Arc::new(WalletSession::new());
    let board = Arc::new(TaskBoard::new(BoardConfig::default()));
    let tracker = Arc::new(StatsTracker::new(session.clone(), board.clone()));
    (session, board, tracker)
}

/// Wait until the published snapshot satisfies `predicate`.
async fn wait_for_snapshot(
    tracker: &Arc<StatsTracker>,
    predicate: impl FnMut(&StatsSnapshot) -> bool,
) -> StatsSnapshot {
    let mut rx = tracker.subscribe();
    let guard = timeout(Duration::from_secs(2), rx.wait_for(predicate))
        .await
        .expect("timed out waiting for snapshot")
        .expect("tracker closed");
    (*guard).clone()
}

#[tokio::test]
async fn test_manual_refresh_matches_board_state() {
    let (session, board, tracker) = setup();

    let alice = addr("0xAA");
    let bob = addr("0xBB");

    let t1 = board.create_task(alice.clone(), RewardAmount::ZERO, None).await;
    let t2 = board.create_task(bob.clone(), RewardAmount::ZERO, None).await;
    let _t3 = board.create_task(alice.clone(), RewardAmount::ZERO, None).await;

    board.claim_task(t1, bob.clone()).await.unwrap();
    board.claim_task(t2, bob.clone()).await.unwrap();
    board.submit_task(t1, &bob, None).await.unwrap();
    board.approve_task(t1, &alice).await.unwrap();

    session.connect(bob.clone());
    let snapshot = tracker.refresh().await;

    assert_eq!(snapshot.identity, Some(bob));
    assert_eq!(snapshot.stats.created_count, 1);
    assert_eq!(snapshot.stats.claimed_count, 2);
    assert_eq!(snapshot.stats.completed_count, 1);
    assert_eq!(snapshot.stats.completion_rate, 50);
    // Votes were never loaded: counted as zero, not an error
    assert_eq!(snapshot.stats.vote_count, 0);
}

#[tokio::test]
async fn test_run_loop_reacts_to_identity_changes() {
    let (session, board, tracker) = setup();

    let alice = addr("0xAA");
    let t1 = board.create_task(alice.clone(), RewardAmount::ZERO, None).await;
    board.claim_task(t1, alice.clone()).await.unwrap();

    let handle = tracker.clone().run();

    session.connect(alice.clone());
    let snapshot = wait_for_snapshot(&tracker, |snapshot| {
        snapshot.identity == Some(addr("0xAA"))
    })
    .await;
    assert_eq!(snapshot.stats.created_count, 1);
    assert_eq!(snapshot.stats.claimed_count, 1);

    session.disconnect();
    let snapshot =
        wait_for_snapshot(&tracker, |snapshot| snapshot.identity.is_none()).await;
    assert_eq!(snapshot.stats.created_count, 0);
    assert_eq!(snapshot.stats.claimed_count, 0);

    handle.abort();
}

#[tokio::test]
async fn test_run_loop_reacts_to_ledger_changes() {
    let (session, board, tracker) = setup();

    let alice = addr("0xAA");
    let bob = addr("0xBB");
    session.connect(bob.clone());

    let handle = tracker.clone().run();

    let id = board.create_task(alice.clone(), RewardAmount::ZERO, None).await;
    board.claim_task(id, bob.clone()).await.unwrap();
    board.submit_task(id, &bob, None).await.unwrap();
    board.approve_task(id, &alice).await.unwrap();

    let snapshot = wait_for_snapshot(&tracker, |snapshot| {
        snapshot.stats.completed_count == 1
    })
    .await;
    assert_eq!(snapshot.stats.claimed_count, 1);
    assert_eq!(snapshot.stats.completion_rate, 100);

    handle.abort();
}

#[tokio::test]
async fn test_vote_count_follows_loaded_collection() {
    let (session, board, tracker) = setup();
    session.connect(addr("0xAA"));

    let snapshot = tracker.refresh().await;
    assert_eq!(snapshot.stats.vote_count, 0);

    board
        .load_votes(vec![
            DisputeVote::new(TaskId::new(9), addr("0xBB"), Ballot::Yes),
            DisputeVote::new(TaskId::new(9), addr("0xCC"), Ballot::No),
        ])
        .await;

    let snapshot = tracker.refresh().await;
    assert_eq!(snapshot.stats.vote_count, 2);
}

#[tokio::test]
async fn test_snapshots_never_mix_identities() {
    let (session, board, tracker) = setup();

    let alice = addr("0xAA");
    let bob = addr("0xBB");
    let creator = addr("0xEE");

    // Fixed board: alice claims two tasks, bob claims one
    for claimant in [&alice, &alice, &bob] {
        let id = board
            .create_task(creator.clone(), RewardAmount::ZERO, None)
            .await;
        board.claim_task(id, claimant.clone()).await.unwrap();
    }

    // Flip the identity concurrently with the recomputations
    let flipper = {
        let session = session.clone();
        let alice = alice.clone();
        let bob = bob.clone();
        tokio::spawn(async move {
            for round in 0..100 {
                if round % 2 == 0 {
                    session.connect(alice.clone());
                } else {
                    session.connect(bob.clone());
                }
                tokio::task::yield_now().await;
            }
        })
    };

    // Whatever identity a refresh happened to read, the claimed count it
    // publishes must belong to that identity, never the other one's
    for _ in 0..100 {
        let snapshot = tracker.refresh().await;
        let expected = match &snapshot.identity {
            Some(identity) if identity == &alice => 2,
            Some(identity) if identity == &bob => 1,
            Some(other) => panic!("unknown identity in snapshot: {}", other),
            None => 0,
        };
        assert_eq!(snapshot.stats.claimed_count, expected);
        assert_eq!(snapshot.stats.created_count, 0);
    }

    flipper.await.unwrap();
}

#[tokio::test]
async fn test_tracker_agrees_with_direct_aggregation() {
    let (session, board, tracker) = setup();

    let alice = addr("0xAA");
    let bob = addr("0xBB");

    let t1 = board.create_task(alice.clone(), RewardAmount::ZERO, None).await;
    let t2 = board.create_task(bob.clone(), RewardAmount::ZERO, None).await;
    board.claim_task(t1, bob.clone()).await.unwrap();
    board.claim_task(t2, bob.clone()).await.unwrap();
    board.submit_task(t2, &bob, None).await.unwrap();
    board.approve_task(t2, &bob).await.unwrap(); // bob created t2 himself

    session.connect(bob.clone());
    let snapshot = tracker.refresh().await;

    let all = board.all_tasks().await;
    let claimed = board.claimed_tasks_for(Some(&bob)).await;
    let votes = board.votes().await;
    let direct = aggregate(Some(&bob), &all, &claimed, votes.as_deref());

    assert_eq!(snapshot.stats, direct);
}
