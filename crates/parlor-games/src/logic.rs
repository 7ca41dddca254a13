//! The `TurnGame` trait and the types every variant shares.

use parlor_types::ParticipantId;
use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;

use crate::TurnError;
use crate::rps::Choice;

/// The trait each game variant implements.
///
/// Implementors are zero-sized tag types; all data lives in the
/// associated `State`. The framework always calls [`validate`] before
/// [`apply`], so `apply` may assume the action is legal — a rejected
/// action must leave the state untouched, and the cheapest way to
/// guarantee that is to reject before mutating anything.
///
/// [`validate`]: TurnGame::validate
/// [`apply`]: TurnGame::apply
pub trait TurnGame {
    /// Per-session settings, built by the caller at session creation
    /// (deck injection, prepared battle rosters, ...).
    type Config: Clone;

    /// The full variant state.
    type State: Clone + Serialize + DeserializeOwned + PartialEq;

    /// What a participant can submit.
    type Action: Clone;

    /// A render-safe projection of the state. This is what snapshots
    /// expose, so anything hidden (an unrevealed choice) must not
    /// appear here.
    type View: Clone + Serialize + DeserializeOwned;

    /// Creates the initial state for the two participants.
    fn init(config: &Self::Config, players: &[ParticipantId; 2]) -> Self::State;

    /// Checks whether `actor` may perform `action` right now.
    fn validate(
        state: &Self::State,
        actor: ParticipantId,
        action: &Self::Action,
    ) -> Result<(), TurnError>;

    /// Applies a validated action and returns the resulting events.
    fn apply(
        state: &mut Self::State,
        actor: ParticipantId,
        action: Self::Action,
    ) -> Vec<Event>;

    /// Whose turn it is. `None` during a simultaneous stage (both
    /// participants may act) and once the match is over.
    fn current_turn(state: &Self::State) -> Option<ParticipantId>;

    /// The current stage within the turn protocol.
    fn stage(state: &Self::State) -> Stage;

    /// True once the match has been decided (or drawn).
    fn is_terminal(state: &Self::State) -> bool;

    /// The winner, if the match is over and was not a draw.
    fn winner(state: &Self::State) -> Option<ParticipantId>;

    /// The render-safe projection of the state.
    fn view(state: &Self::State) -> Self::View;
}

// ---------------------------------------------------------------------------
// Stage
// ---------------------------------------------------------------------------

/// A sub-step within a turn. Most variants have a single stage per
/// turn; the card battle walks through three.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stage {
    /// Tic-tac-toe: the turn holder places a mark.
    Placing,
    /// Blackjack: the turn holder hits or stands.
    HitOrStand,
    /// Rock-paper-scissors: waiting for hidden choices from either side.
    AwaitingChoices,
    /// Card battle: the turn holder picks one of their alive cards.
    SelectAttacker,
    /// Card battle: the turn holder picks Attack or Defend.
    SelectAction,
    /// Card battle: the turn holder picks an opposing card to hit.
    SelectTarget,
    /// The match is over; no further actions are accepted.
    Complete,
}

// ---------------------------------------------------------------------------
// Event
// ---------------------------------------------------------------------------

/// Something that happened inside a session. Events accumulate in the
/// session's log and ride along in snapshots so the rendering layer can
/// narrate the match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    /// Tic-tac-toe: a mark was placed.
    MarkPlaced {
        by: ParticipantId,
        row: usize,
        col: usize,
        mark: char,
    },

    /// Blackjack: a card was dealt to a hand. Hands are open in this
    /// ruleset, so the value is public.
    CardDealt { to: ParticipantId, value: u8 },

    /// Blackjack: the participant stood.
    Stood { by: ParticipantId },

    /// Blackjack: the participant's hand went over 21.
    Busted { by: ParticipantId, total: u32 },

    /// Rock-paper-scissors: a choice was submitted. Deliberately does
    /// not carry the choice — nothing is revealed until both are in.
    ChoiceSubmitted { by: ParticipantId },

    /// Rock-paper-scissors: both choices are in.
    ChoicesRevealed {
        first: (ParticipantId, Choice),
        second: (ParticipantId, Choice),
    },

    /// Card battle: the turn holder selected their acting card.
    AttackerSelected { by: ParticipantId, card: String },

    /// Card battle: the acting card braced for the next hit.
    Defended {
        by: ParticipantId,
        card: String,
        bonus: u32,
    },

    /// Card battle: an attack landed (damage may be zero).
    Attacked {
        by: ParticipantId,
        attacker: String,
        target: String,
        damage: u32,
    },

    /// Card battle: a card dropped to zero hit points.
    CardDefeated { owner: ParticipantId, card: String },

    /// The match reached a terminal state. `winner` is `None` on a
    /// draw or push.
    MatchEnded { winner: Option<ParticipantId> },
}

impl Event {
    /// Shorthand used by every variant's terminal transition.
    pub(crate) fn ended(winner: Option<ParticipantId>) -> Self {
        Self::MatchEnded { winner }
    }
}
