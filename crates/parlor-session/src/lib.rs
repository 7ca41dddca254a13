//! Session lifecycle for Parlor.
//!
//! Each active match runs as an isolated Tokio task (actor model) that
//! owns its [`GameSession`](parlor_games::GameSession), communicating
//! with the outside world through an mpsc channel. The
//! [`SessionRegistry`] tracks which participants are playing and
//! enforces the one-session-per-participant invariant with
//! all-or-nothing reservation.
//!
//! # Key types
//!
//! - [`SessionRegistry`] — reserve/release participants, spawn actors
//! - [`SessionHandle`] — send actions to a running session actor
//! - [`ActReply`] — an accepted action's snapshot plus, exactly once,
//!   the terminal [`MatchOutcome`](parlor_games::MatchOutcome)
//! - [`SessionError`] — membership and delivery failures

mod error;
mod registry;
mod table;

pub use error::SessionError;
pub use registry::SessionRegistry;
pub use table::{ActReply, SessionHandle};
