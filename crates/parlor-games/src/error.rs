//! Error types for game state transitions.

use parlor_types::ParticipantId;

/// Why an action was rejected. A rejected action never mutates state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TurnError {
    /// The actor is one of the session's participants but it is not
    /// their turn to act.
    #[error("it is not {0}'s turn")]
    NotYourTurn(ParticipantId),

    /// The actor is not part of this session at all.
    #[error("{0} is not part of this match")]
    NotAParticipant(ParticipantId),

    /// The action arrived at the wrong stage (or was a duplicate
    /// submission).
    #[error("out of sequence: {0}")]
    OutOfSequence(String),

    /// The action is for the right stage but invalid in itself
    /// (occupied cell, dead card, wrong variant, ...).
    #[error("invalid action: {0}")]
    InvalidAction(String),
}
