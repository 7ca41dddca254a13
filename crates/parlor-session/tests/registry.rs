//! Integration tests for the session registry and table actors.

use std::time::Duration;

use parlor_games::tictactoe::Placement;
use parlor_games::{Action, GameSession};
use parlor_session::{SessionError, SessionRegistry};
use parlor_types::{ParticipantId, SessionId};
use tokio::sync::mpsc;

fn pid(id: u64) -> ParticipantId {
    ParticipantId(id)
}

fn releases() -> (
    mpsc::UnboundedSender<SessionId>,
    mpsc::UnboundedReceiver<SessionId>,
) {
    mpsc::unbounded_channel()
}

fn friendly_game(a: u64, b: u64) -> GameSession {
    GameSession::tic_tac_toe([pid(a), pid(b)], 0)
}

// =========================================================================
// Reservation invariants
// =========================================================================

#[tokio::test]
async fn test_open_allocates_unique_session_ids() {
    let mut registry = SessionRegistry::new();
    let (tx, _rx) = releases();

    let h1 = registry.open(friendly_game(1, 2), None, tx.clone()).unwrap();
    let h2 = registry.open(friendly_game(3, 4), None, tx).unwrap();

    assert_ne!(h1.session_id(), h2.session_id());
    assert_eq!(registry.session_count(), 2);
}

#[tokio::test]
async fn test_overlapping_reservation_fails_all_or_nothing() {
    let mut registry = SessionRegistry::new();
    let (tx, _rx) = releases();

    registry.open(friendly_game(1, 2), None, tx.clone()).unwrap();

    // B is taken, so [B, C] must fail — and C must stay free.
    let result = registry.open(friendly_game(2, 3), None, tx.clone());
    assert!(matches!(result, Err(SessionError::AlreadyInSession(p)) if p == pid(2)));
    assert_eq!(registry.participant_session(&pid(3)), None);

    // C is free for a non-overlapping pair.
    registry.open(friendly_game(3, 4), None, tx).unwrap();
}

#[tokio::test]
async fn test_release_frees_participants_for_new_sessions() {
    let mut registry = SessionRegistry::new();
    let (tx, _rx) = releases();

    let h1 = registry.open(friendly_game(1, 2), None, tx.clone()).unwrap();
    registry.release(h1.session_id());

    // [B, C] now succeeds.
    registry.open(friendly_game(2, 3), None, tx).unwrap();
}

#[tokio::test]
async fn test_release_is_idempotent() {
    let mut registry = SessionRegistry::new();
    let (tx, _rx) = releases();

    let handle = registry.open(friendly_game(1, 2), None, tx).unwrap();
    registry.release(handle.session_id());
    registry.release(handle.session_id());

    assert_eq!(registry.session_count(), 0);
    assert_eq!(registry.participant_session(&pid(1)), None);
}

#[tokio::test]
async fn test_participant_session_lookup() {
    let mut registry = SessionRegistry::new();
    let (tx, _rx) = releases();

    let handle = registry.open(friendly_game(1, 2), None, tx).unwrap();

    assert_eq!(
        registry.participant_session(&pid(1)),
        Some(handle.session_id())
    );
    assert_eq!(
        registry.participant_session(&pid(2)),
        Some(handle.session_id())
    );
    assert_eq!(registry.participant_session(&pid(9)), None);
}

#[tokio::test]
async fn test_handle_lookup_after_release_is_none() {
    let mut registry = SessionRegistry::new();
    let (tx, _rx) = releases();

    let handle = registry.open(friendly_game(1, 2), None, tx).unwrap();
    let session_id = handle.session_id();
    assert!(registry.handle(session_id).is_some());

    registry.release(session_id);
    assert!(registry.handle(session_id).is_none());
}

// =========================================================================
// Acting through the handle
// =========================================================================

#[tokio::test]
async fn test_submit_applies_an_action() {
    let mut registry = SessionRegistry::new();
    let (tx, _rx) = releases();
    let handle = registry.open(friendly_game(1, 2), None, tx).unwrap();

    let reply = handle
        .submit(pid(1), Action::TicTacToe(Placement { row: 0, col: 0 }))
        .await
        .unwrap();

    assert_eq!(reply.snapshot.turn, Some(pid(2)));
    assert!(reply.outcome.is_none());
}

#[tokio::test]
async fn test_submit_from_wrong_actor_is_rejected() {
    let mut registry = SessionRegistry::new();
    let (tx, _rx) = releases();
    let handle = registry.open(friendly_game(1, 2), None, tx).unwrap();

    let result = handle
        .submit(pid(2), Action::TicTacToe(Placement { row: 0, col: 0 }))
        .await;

    assert!(matches!(result, Err(SessionError::Turn(_))));

    // The session is untouched: player 1 can still act.
    let reply = handle
        .submit(pid(1), Action::TicTacToe(Placement { row: 0, col: 0 }))
        .await
        .unwrap();
    assert_eq!(reply.snapshot.turn, Some(pid(2)));
}

#[tokio::test]
async fn test_snapshot_through_the_handle() {
    let mut registry = SessionRegistry::new();
    let (tx, _rx) = releases();
    let handle = registry.open(friendly_game(1, 2), None, tx).unwrap();

    let snapshot = handle.snapshot().await.unwrap();
    assert_eq!(snapshot.session_id, handle.session_id());
    assert_eq!(snapshot.turn, Some(pid(1)));
    assert!(!snapshot.finished);
}

#[tokio::test]
async fn test_terminal_action_carries_the_outcome_once() {
    let mut registry = SessionRegistry::new();
    let (tx, mut rx) = releases();
    let handle = registry.open(friendly_game(1, 2), None, tx).unwrap();

    // X wins with the top row.
    for (actor, row, col) in
        [(1, 0, 0), (2, 1, 0), (1, 0, 1), (2, 1, 1)]
    {
        handle
            .submit(pid(actor), Action::TicTacToe(Placement { row, col }))
            .await
            .unwrap();
    }
    let reply = handle
        .submit(pid(1), Action::TicTacToe(Placement { row: 0, col: 2 }))
        .await
        .unwrap();

    let outcome = reply.outcome.expect("winning move must carry the outcome");
    assert_eq!(outcome.winner, Some(pid(1)));
    assert!(reply.snapshot.finished);

    // The actor announces its own exit for the reaper.
    assert_eq!(rx.recv().await, Some(handle.session_id()));
}

#[tokio::test]
async fn test_finished_session_is_unreachable() {
    let mut registry = SessionRegistry::new();
    let (tx, _rx) = releases();
    let handle = registry.open(friendly_game(1, 2), None, tx).unwrap();

    for (actor, row, col) in
        [(1, 0, 0), (2, 1, 0), (1, 0, 1), (2, 1, 1), (1, 0, 2)]
    {
        handle
            .submit(pid(actor), Action::TicTacToe(Placement { row, col }))
            .await
            .unwrap();
    }

    // The actor has exited; a stale handle gets Unavailable.
    let result = handle
        .submit(pid(2), Action::TicTacToe(Placement { row: 2, col: 2 }))
        .await;
    assert!(matches!(result, Err(SessionError::Unavailable(_))));
}

// =========================================================================
// Timeouts
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_idle_session_times_out_and_notifies() {
    let mut registry = SessionRegistry::new();
    let (tx, mut rx) = releases();
    let handle = registry
        .open(friendly_game(1, 2), Some(Duration::from_secs(180)), tx)
        .unwrap();

    // Nobody moves. The clock fires and the actor reports its exit.
    let released = rx.recv().await;
    assert_eq!(released, Some(handle.session_id()));

    // No settlement on timeout: no outcome was ever emitted, and the
    // actor is gone.
    let result = handle
        .submit(pid(1), Action::TicTacToe(Placement { row: 0, col: 0 }))
        .await;
    assert!(matches!(result, Err(SessionError::Unavailable(_))));
}

#[tokio::test(start_paused = true)]
async fn test_accepted_actions_postpone_the_timeout() {
    let mut registry = SessionRegistry::new();
    let (tx, mut rx) = releases();
    let handle = registry
        .open(friendly_game(1, 2), Some(Duration::from_secs(60)), tx)
        .unwrap();

    // Keep the match alive past the original deadline with real moves.
    tokio::time::advance(Duration::from_secs(40)).await;
    handle
        .submit(pid(1), Action::TicTacToe(Placement { row: 0, col: 0 }))
        .await
        .unwrap();
    tokio::time::advance(Duration::from_secs(40)).await;
    handle
        .submit(pid(2), Action::TicTacToe(Placement { row: 1, col: 1 }))
        .await
        .unwrap();

    // 80 seconds of wall time have passed but never 60 idle ones.
    assert!(rx.try_recv().is_err());

    // Now go idle for the full timeout.
    let released = rx.recv().await;
    assert_eq!(released, Some(handle.session_id()));
}
