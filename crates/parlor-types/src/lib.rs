//! Shared identity and collectible types for Parlor.
//!
//! Every other crate speaks in these types:
//!
//! - [`ParticipantId`] / [`SessionId`] — newtype ids
//! - [`GameVariant`] — the closed set of supported games
//! - [`Card`], [`CardTemplate`], [`Pet`], [`Rarity`] — collectible
//!   value objects stored in the ledger and used by the card battle
//!
//! The crate is deliberately free of behavior: no I/O, no game rules,
//! just the data model and its serde representation.

mod types;

pub use types::{
    Card, CardTemplate, GameVariant, ParticipantId, Pet, Rarity, SessionId,
};
