//! Turn deadline clock for Parlor sessions.
//!
//! Turn-based matches have exactly one suspension point: waiting for
//! the next player's action. [`TurnClock`] bounds that wait. The actor
//! re-arms the clock after every accepted action, so the deadline
//! always measures idle time since the last move.
//!
//! # Integration
//!
//! The clock is designed to sit inside a session actor's
//! `tokio::select!` loop:
//!
//! ```ignore
//! loop {
//!     tokio::select! {
//!         Some(cmd) = cmd_rx.recv() => { /* apply, then clock.arm() */ }
//!         _ = idle(clock.deadline()) => { /* timed out — release */ }
//!     }
//! }
//! ```
//!
//! # Event-driven mode
//!
//! A clock built with `None` never fires: [`idle`] pends forever, which
//! is the correct behavior for sessions that should only react to
//! player messages. `select!` still processes the other branches.

use std::time::Duration;

use tokio::time::{self, Instant};
use tracing::debug;

/// Bounds how long a session may sit idle between player actions.
///
/// One `TurnClock` per session actor. Starts unarmed; [`arm`](Self::arm)
/// sets the deadline to `now + timeout` and is called again after every
/// accepted action.
#[derive(Debug)]
pub struct TurnClock {
    timeout: Option<Duration>,
    deadline: Option<Instant>,
}

impl TurnClock {
    /// Creates an unarmed clock. `None` disables timeouts entirely.
    pub fn new(timeout: Option<Duration>) -> Self {
        if timeout.is_none() {
            debug!("turn clock created in event-driven mode (never fires)");
        }
        Self {
            timeout,
            deadline: None,
        }
    }

    /// A clock that never fires.
    pub fn disabled() -> Self {
        Self::new(None)
    }

    /// Starts (or restarts) the idle countdown from now.
    pub fn arm(&mut self) {
        self.deadline = self.timeout.map(|t| Instant::now() + t);
    }

    /// Clears the deadline; [`idle`] on a disarmed clock pends forever.
    pub fn disarm(&mut self) {
        self.deadline = None;
    }

    /// The current deadline, if armed. Pass this to [`idle`].
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Time left until the deadline. `None` when disarmed, zero when
    /// already past due.
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|d| d.saturating_duration_since(Instant::now()))
    }

    /// The configured idle timeout.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

/// Waits until `deadline`, or forever if there is none.
///
/// A free function (rather than a method) so a `select!` arm can take
/// the deadline by value and leave the actor's other fields borrowable.
pub async fn idle(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => time::sleep_until(deadline).await,
        None => std::future::pending::<()>().await,
    }
}

// =========================================================================
// Tests
// =========================================================================
