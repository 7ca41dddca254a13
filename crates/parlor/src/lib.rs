//! # Parlor
//!
//! Coordinator for short-lived, turn-based 1v1 minigames — tic-tac-toe,
//! blackjack, rock-paper-scissors, and a multi-card battle — backed by
//! a persistent ledger of per-participant currency and collectible
//! inventories.
//!
//! The chat/command layer, rendering, identity resolution, and cooldown
//! bookkeeping live outside this workspace. They talk to one type:
//! [`GameService`].
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use parlor::prelude::*;
//!
//! # async fn run() -> Result<(), ParlorError> {
//! let service = GameService::new(ServiceConfig::default())?;
//!
//! let session = service
//!     .start_game(
//!         GameVariant::TicTacToe,
//!         [ParticipantId(1), ParticipantId(2)],
//!         MatchRules::bet(50),
//!     )
//!     .await?;
//!
//! let snapshot = service
//!     .submit_action(
//!         session,
//!         ParticipantId(1),
//!         Action::TicTacToe(tictactoe::Placement { row: 0, col: 0 }),
//!     )
//!     .await?;
//! # let _ = snapshot;
//! # Ok(())
//! # }
//! ```

mod arcade;
mod collection;
mod config;
mod economy;
mod error;
mod service;
mod settlement;

pub use arcade::{ArcadeRound, CoinSide, RouletteWager, SlotSymbol};
pub use config::{BattleTuning, EconomyTuning, ServiceConfig, TurnTimeouts};
pub use error::ParlorError;
pub use service::{GameService, MatchRules};
pub use settlement::{SettlementConfig, SettlementEngine};

// Re-export the vocabulary the dispatch layer needs.
pub use parlor_games::{
    Action, Event, GameSession, GameView, MatchOutcome, SessionSnapshot,
    Stage, TurnError, battle, blackjack, rps, tictactoe,
};
pub use parlor_ledger::{Ledger, LedgerError};
pub use parlor_session::SessionError;
pub use parlor_types::{
    Card, CardTemplate, GameVariant, ParticipantId, Pet, Rarity, SessionId,
};

/// Everything a caller typically needs in one import.
pub mod prelude {
    pub use crate::{
        Action, ArcadeRound, Card, CoinSide, Event, GameService, GameVariant,
        MatchRules, ParlorError, ParticipantId, Pet, Rarity, RouletteWager,
        ServiceConfig, SessionId, SessionSnapshot, Stage, TurnError,
        battle, blackjack, rps, tictactoe,
    };
}
