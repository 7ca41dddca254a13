//! Table actor: an isolated Tokio task that owns one running match.
//!
//! Each session runs in its own task, communicating through an mpsc
//! channel — no shared mutable state, just message passing. Actions are
//! applied in strict arrival order; replies travel back over oneshot
//! channels. The actor exits when the match ends or the turn clock
//! fires, and a finished actor is what makes a settled session
//! unreachable.

use std::time::Duration;

use parlor_clock::{TurnClock, idle};
use parlor_games::{Action, GameSession, MatchOutcome, SessionSnapshot, TurnError};
use parlor_types::{ParticipantId, SessionId};
use tokio::sync::{mpsc, oneshot};

use crate::SessionError;

/// The reply to an accepted action.
#[derive(Debug, Clone)]
pub struct ActReply {
    /// State after the action.
    pub snapshot: SessionSnapshot,
    /// Present exactly once, on the action that ended the match. The
    /// settled flag inside the game guarantees a second terminal reply
    /// can never carry it.
    pub outcome: Option<MatchOutcome>,
}

/// Commands sent to a table actor through its channel.
pub(crate) enum TableCommand {
    /// Apply a player action.
    Act {
        actor: ParticipantId,
        action: Action,
        reply: oneshot::Sender<Result<ActReply, TurnError>>,
    },

    /// Request the current snapshot.
    Snapshot {
        reply: oneshot::Sender<SessionSnapshot>,
    },
}

/// Handle to a running table actor. Cheap to clone — just an
/// `mpsc::Sender` wrapper. The registry holds one per session; the
/// actor stops when every handle is gone.
#[derive(Clone)]
pub struct SessionHandle {
    session_id: SessionId,
    sender: mpsc::Sender<TableCommand>,
}

impl SessionHandle {
    /// The session this handle points at.
    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    /// Submits an action and waits for the actor's verdict.
    pub async fn submit(
        &self,
        actor: ParticipantId,
        action: Action,
    ) -> Result<ActReply, SessionError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(TableCommand::Act {
                actor,
                action,
                reply: reply_tx,
            })
            .await
            .map_err(|_| SessionError::Unavailable(self.session_id))?;
        let reply = reply_rx
            .await
            .map_err(|_| SessionError::Unavailable(self.session_id))?;
        reply.map_err(SessionError::from)
    }

    /// Requests the current snapshot.
    pub async fn snapshot(&self) -> Result<SessionSnapshot, SessionError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(TableCommand::Snapshot { reply: reply_tx })
            .await
            .map_err(|_| SessionError::Unavailable(self.session_id))?;
        reply_rx
            .await
            .map_err(|_| SessionError::Unavailable(self.session_id))
    }
}

/// The internal actor state. Runs inside a Tokio task.
struct TableActor {
    session_id: SessionId,
    game: GameSession,
    clock: TurnClock,
    created_at: std::time::Instant,
    receiver: mpsc::Receiver<TableCommand>,
    /// Exit notifications to the registry's reaper. Sent on every exit
    /// path; release is idempotent, so double delivery is fine.
    releases: mpsc::UnboundedSender<SessionId>,
}

impl TableActor {
    async fn run(mut self) {
        tracing::info!(
            session_id = %self.session_id,
            variant = %self.game.variant(),
            "session started"
        );
        self.clock.arm();

        loop {
            let deadline = self.clock.deadline();
            tokio::select! {
                cmd = self.receiver.recv() => {
                    match cmd {
                        // Registry dropped the last handle — we were
                        // already released.
                        None => break,
                        Some(TableCommand::Act { actor, action, reply }) => {
                            let result = self.handle_act(actor, action);
                            let finished = self.game.is_terminal();
                            let _ = reply.send(result);
                            if finished {
                                let _ = self.releases.send(self.session_id);
                                tracing::info!(
                                    session_id = %self.session_id,
                                    lived = ?self.created_at.elapsed(),
                                    "session finished"
                                );
                                break;
                            }
                        }
                        Some(TableCommand::Snapshot { reply }) => {
                            let _ = reply.send(
                                self.game.snapshot(self.session_id),
                            );
                        }
                    }
                }
                _ = idle(deadline) => {
                    tracing::info!(
                        session_id = %self.session_id,
                        turn = ?self.game.current_turn(),
                        lived = ?self.created_at.elapsed(),
                        "session timed out waiting for a move"
                    );
                    let _ = self.releases.send(self.session_id);
                    break;
                }
            }
        }

        tracing::debug!(session_id = %self.session_id, "session actor stopped");
    }

    fn handle_act(
        &mut self,
        actor: ParticipantId,
        action: Action,
    ) -> Result<ActReply, TurnError> {
        self.game.apply(actor, action)?;
        // Accepted actions restart the idle countdown; rejected ones
        // must not buy time.
        self.clock.arm();
        let outcome = self.game.take_outcome();
        Ok(ActReply {
            snapshot: self.game.snapshot(self.session_id),
            outcome,
        })
    }
}

/// Spawns a table actor and returns the handle to reach it.
pub(crate) fn spawn_table(
    session_id: SessionId,
    game: GameSession,
    turn_timeout: Option<Duration>,
    releases: mpsc::UnboundedSender<SessionId>,
    channel_size: usize,
) -> SessionHandle {
    let (tx, rx) = mpsc::channel(channel_size);

    let actor = TableActor {
        session_id,
        game,
        clock: TurnClock::new(turn_timeout),
        created_at: std::time::Instant::now(),
        receiver: rx,
        releases,
    };

    tokio::spawn(actor.run());

    SessionHandle {
        session_id,
        sender: tx,
    }
}
