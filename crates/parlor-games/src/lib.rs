//! Turn-based game state machines for Parlor.
//!
//! One module per variant — [`tictactoe`], [`blackjack`], [`rps`],
//! [`battle`] — each implementing the [`TurnGame`] trait: pure state
//! machines with no I/O, no clocks, and no ledger access. The
//! [`GameSession`] tagged union wraps whichever variant a session runs,
//! owns the event log, and enforces that actions match the variant
//! before delegating.
//!
//! # Key types
//!
//! - [`TurnGame`] — the per-variant trait (validate before apply)
//! - [`GameSession`] — polymorphic session state, selected at creation
//! - [`Action`] / [`Event`] — what players submit / what happened
//! - [`SessionSnapshot`] — render-ready view for the dispatch layer
//! - [`TurnError`] — rejection taxonomy, never mutates state

pub mod battle;
pub mod blackjack;
pub mod rps;
pub mod tictactoe;

mod error;
mod game;
mod logic;

pub use error::TurnError;
pub use game::{Action, GameSession, GameView, MatchOutcome, SessionSnapshot};
pub use logic::{Event, Stage, TurnGame};
