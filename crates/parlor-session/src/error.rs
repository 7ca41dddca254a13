//! Error types for the session layer.

use parlor_games::TurnError;
use parlor_types::{ParticipantId, SessionId};

/// Errors that can occur reserving, reaching, or acting in a session.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The participant already has an active session. Reservation is
    /// all-or-nothing: nobody was registered.
    #[error("{0} is already in an active session")]
    AlreadyInSession(ParticipantId),

    /// No session with this id — it never existed, was settled, or
    /// timed out.
    #[error("session {0} not found")]
    NotFound(SessionId),

    /// The session's actor is gone (settled or timed out while the
    /// caller held a stale handle).
    #[error("session {0} is no longer reachable")]
    Unavailable(SessionId),

    /// The session is alive but rejected the action.
    #[error(transparent)]
    Turn(#[from] TurnError),
}
