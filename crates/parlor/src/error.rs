//! Unified error type for the Parlor facade.

use parlor_games::TurnError;
use parlor_ledger::LedgerError;
use parlor_session::SessionError;

/// Top-level error returned by [`GameService`](crate::GameService).
///
/// Wraps the crate-specific errors transparently so callers see the
/// original message, while keeping the taxonomy flat: a turn rejection
/// surfaces as [`Turn`](Self::Turn) even though it traveled through
/// the session layer.
#[derive(Debug, thiserror::Error)]
pub enum ParlorError {
    /// A ledger failure (insufficient balance, persist error).
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// A session failure (already in a session, session not found).
    #[error(transparent)]
    Session(SessionError),

    /// A rejected game action (wrong turn, wrong stage, invalid move).
    #[error(transparent)]
    Turn(#[from] TurnError),

    /// A malformed request (bad bet, self-play, unknown card, ...).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl From<SessionError> for ParlorError {
    fn from(e: SessionError) -> Self {
        match e {
            // Un-nest turn rejections so callers match one level deep.
            SessionError::Turn(turn) => ParlorError::Turn(turn),
            other => ParlorError::Session(other),
        }
    }
}
