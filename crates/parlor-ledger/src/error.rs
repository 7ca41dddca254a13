//! Error types for the ledger.

use parlor_types::ParticipantId;

/// Errors that can occur during ledger operations.
///
/// Note what is *not* here: a corrupt store file on load. That is
/// recovered internally (backup + empty store) to keep the system
/// available, and is only visible in the operational log.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// A debit was requested against a balance that cannot cover it.
    #[error("{participant} has {balance}, needs {required}")]
    InsufficientBalance {
        participant: ParticipantId,
        balance: i64,
        required: i64,
    },

    /// Writing the store file failed. The in-memory state was not
    /// changed; the operation did not happen.
    #[error("failed to persist store: {0}")]
    Persist(#[from] std::io::Error),

    /// Serializing the store failed.
    #[error("failed to encode store: {0}")]
    Encode(#[from] serde_json::Error),
}
