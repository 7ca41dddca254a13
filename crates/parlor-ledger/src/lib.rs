//! The Parlor ledger: durable per-participant balances and inventories.
//!
//! The ledger is the only component that touches persisted state. It
//! owns three independent stores — balances, cards, pets — each a JSON
//! file keyed by participant id, rewritten in full on every mutation.
//!
//! # Key properties
//!
//! - Records are created lazily on first access and never deleted.
//! - Every mutating operation fully persists before returning success,
//!   so a crash immediately after a successful call never loses state
//!   relative to what the caller was told.
//! - A store file that fails to parse on load is renamed aside with a
//!   `.bak` suffix and the store starts empty — logged, never raised.
//! - Mutations are serialized per store; concurrent adjustments never
//!   lose updates.

mod error;
mod ledger;
mod store;

pub use error::LedgerError;
pub use ledger::Ledger;
