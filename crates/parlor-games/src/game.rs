//! `GameSession`: one polymorphic state machine per active match.
//!
//! The variant is selected once at creation and never changes. All
//! dispatch happens here — an [`Action`] carrying the wrong variant's
//! move is rejected before any variant code runs — so the variant
//! modules stay free of cross-variant concerns.

use parlor_types::{GameVariant, ParticipantId, SessionId};
use serde::{Deserialize, Serialize};

use crate::logic::{Event, Stage, TurnGame};
use crate::TurnError;
use crate::{battle, blackjack, rps, tictactoe};
use crate::battle::CardBattle;
use crate::blackjack::Blackjack;
use crate::rps::RockPaperScissors;
use crate::tictactoe::TicTacToe;

// ---------------------------------------------------------------------------
// Action
// ---------------------------------------------------------------------------

/// A player action, tagged by variant. Submitting a move for the wrong
/// variant fails with `InvalidAction` without touching the state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Action {
    TicTacToe(tictactoe::Placement),
    Blackjack(blackjack::Move),
    RockPaperScissors(rps::Choice),
    CardBattle(battle::BattleMove),
}

// ---------------------------------------------------------------------------
// GameSession
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
enum VariantState {
    TicTacToe(tictactoe::State),
    Blackjack(blackjack::State),
    RockPaperScissors(rps::State),
    CardBattle(battle::State),
}

/// The state of one match between two participants.
///
/// Owns the variant state, the event log, and the settled flag that
/// makes outcome emission — and therefore settlement — exactly-once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSession {
    participants: [ParticipantId; 2],
    bet: u64,
    state: VariantState,
    log: Vec<Event>,
    settled: bool,
}

impl GameSession {
    /// A tic-tac-toe match. `bet` of zero means a friendly game.
    pub fn tic_tac_toe(participants: [ParticipantId; 2], bet: u64) -> Self {
        Self::with_state(
            participants,
            bet,
            VariantState::TicTacToe(TicTacToe::init(&(), &participants)),
        )
    }

    /// A blackjack match for `bet`.
    pub fn blackjack(
        participants: [ParticipantId; 2],
        bet: u64,
        config: blackjack::Config,
    ) -> Self {
        Self::with_state(
            participants,
            bet,
            VariantState::Blackjack(Blackjack::init(&config, &participants)),
        )
    }

    /// Rock-paper-scissors. `bet` of zero means informational only.
    pub fn rock_paper_scissors(participants: [ParticipantId; 2], bet: u64) -> Self {
        Self::with_state(
            participants,
            bet,
            VariantState::RockPaperScissors(RockPaperScissors::init(
                &(),
                &participants,
            )),
        )
    }

    /// A card battle over prepared working-copy rosters. Battles carry
    /// no bet — settlement uses the configured reward and penalty.
    pub fn card_battle(
        participants: [ParticipantId; 2],
        config: battle::Config,
    ) -> Self {
        Self::with_state(
            participants,
            0,
            VariantState::CardBattle(CardBattle::init(&config, &participants)),
        )
    }

    fn with_state(
        participants: [ParticipantId; 2],
        bet: u64,
        state: VariantState,
    ) -> Self {
        Self {
            participants,
            bet,
            state,
            log: Vec::new(),
            settled: false,
        }
    }

    pub fn variant(&self) -> GameVariant {
        match &self.state {
            VariantState::TicTacToe(_) => GameVariant::TicTacToe,
            VariantState::Blackjack(_) => GameVariant::Blackjack,
            VariantState::RockPaperScissors(_) => GameVariant::RockPaperScissors,
            VariantState::CardBattle(_) => GameVariant::CardBattle,
        }
    }

    pub fn participants(&self) -> [ParticipantId; 2] {
        self.participants
    }

    pub fn bet(&self) -> u64 {
        self.bet
    }

    /// Whose turn it is; `None` during rock-paper-scissors collection
    /// and once the match is over.
    pub fn current_turn(&self) -> Option<ParticipantId> {
        match &self.state {
            VariantState::TicTacToe(s) => TicTacToe::current_turn(s),
            VariantState::Blackjack(s) => Blackjack::current_turn(s),
            VariantState::RockPaperScissors(s) => {
                RockPaperScissors::current_turn(s)
            }
            VariantState::CardBattle(s) => CardBattle::current_turn(s),
        }
    }

    pub fn stage(&self) -> Stage {
        match &self.state {
            VariantState::TicTacToe(s) => TicTacToe::stage(s),
            VariantState::Blackjack(s) => Blackjack::stage(s),
            VariantState::RockPaperScissors(s) => RockPaperScissors::stage(s),
            VariantState::CardBattle(s) => CardBattle::stage(s),
        }
    }

    pub fn is_terminal(&self) -> bool {
        match &self.state {
            VariantState::TicTacToe(s) => TicTacToe::is_terminal(s),
            VariantState::Blackjack(s) => Blackjack::is_terminal(s),
            VariantState::RockPaperScissors(s) => {
                RockPaperScissors::is_terminal(s)
            }
            VariantState::CardBattle(s) => CardBattle::is_terminal(s),
        }
    }

    pub fn winner(&self) -> Option<ParticipantId> {
        match &self.state {
            VariantState::TicTacToe(s) => TicTacToe::winner(s),
            VariantState::Blackjack(s) => Blackjack::winner(s),
            VariantState::RockPaperScissors(s) => RockPaperScissors::winner(s),
            VariantState::CardBattle(s) => CardBattle::winner(s),
        }
    }

    /// Validates and applies one action. On success the resulting
    /// events are appended to the log and returned; on rejection the
    /// state is untouched.
    pub fn apply(
        &mut self,
        actor: ParticipantId,
        action: Action,
    ) -> Result<Vec<Event>, TurnError> {
        let variant = self.variant();
        let events = match (&mut self.state, action) {
            (VariantState::TicTacToe(s), Action::TicTacToe(a)) => {
                TicTacToe::validate(s, actor, &a)?;
                TicTacToe::apply(s, actor, a)
            }
            (VariantState::Blackjack(s), Action::Blackjack(a)) => {
                Blackjack::validate(s, actor, &a)?;
                Blackjack::apply(s, actor, a)
            }
            (VariantState::RockPaperScissors(s), Action::RockPaperScissors(a)) => {
                RockPaperScissors::validate(s, actor, &a)?;
                RockPaperScissors::apply(s, actor, a)
            }
            (VariantState::CardBattle(s), Action::CardBattle(a)) => {
                CardBattle::validate(s, actor, &a)?;
                CardBattle::apply(s, actor, a)
            }
            (_, action) => {
                return Err(TurnError::InvalidAction(format!(
                    "{action:?} does not belong to a {variant} session"
                )));
            }
        };

        self.log.extend(events.iter().cloned());
        Ok(events)
    }

    /// Emits the match outcome the first time it is called on a
    /// terminal session, and never again. This is the settled flag the
    /// settlement engine relies on for exactly-once application.
    pub fn take_outcome(&mut self) -> Option<MatchOutcome> {
        if self.settled || !self.is_terminal() {
            return None;
        }
        self.settled = true;
        Some(MatchOutcome {
            variant: self.variant(),
            participants: self.participants,
            winner: self.winner(),
            bet: self.bet,
        })
    }

    /// A render-ready snapshot under the given session id.
    pub fn snapshot(&self, session_id: SessionId) -> SessionSnapshot {
        let view = match &self.state {
            VariantState::TicTacToe(s) => GameView::TicTacToe(TicTacToe::view(s)),
            VariantState::Blackjack(s) => GameView::Blackjack(Blackjack::view(s)),
            VariantState::RockPaperScissors(s) => {
                GameView::RockPaperScissors(RockPaperScissors::view(s))
            }
            VariantState::CardBattle(s) => {
                GameView::CardBattle(CardBattle::view(s))
            }
        };
        SessionSnapshot {
            session_id,
            variant: self.variant(),
            participants: self.participants,
            turn: self.current_turn(),
            stage: self.stage(),
            bet: self.bet,
            view,
            log: self.log.clone(),
            finished: self.is_terminal(),
            winner: self.winner(),
        }
    }
}

// ---------------------------------------------------------------------------
// Outcome and snapshot
// ---------------------------------------------------------------------------

/// The terminal result of a match, emitted exactly once per session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchOutcome {
    pub variant: GameVariant,
    pub participants: [ParticipantId; 2],
    /// `None` on a draw, push, or tie.
    pub winner: Option<ParticipantId>,
    pub bet: u64,
}

impl MatchOutcome {
    /// The participant who did not win, if there was a winner.
    pub fn loser(&self) -> Option<ParticipantId> {
        let winner = self.winner?;
        self.participants.iter().copied().find(|p| *p != winner)
    }
}

/// Per-variant render-safe state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameView {
    TicTacToe(tictactoe::View),
    Blackjack(blackjack::View),
    RockPaperScissors(rps::View),
    CardBattle(battle::View),
}

/// Everything the rendering layer needs to draw a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub session_id: SessionId,
    pub variant: GameVariant,
    pub participants: [ParticipantId; 2],
    /// The participant expected to act, if the variant has a single
    /// turn holder right now.
    pub turn: Option<ParticipantId>,
    pub stage: Stage,
    pub bet: u64,
    pub view: GameView,
    pub log: Vec<Event>,
    pub finished: bool,
    pub winner: Option<ParticipantId>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rps::Choice;
    use crate::tictactoe::Placement;

    fn pid(id: u64) -> ParticipantId {
        ParticipantId(id)
    }

    fn players() -> [ParticipantId; 2] {
        [pid(1), pid(2)]
    }

    #[test]
    fn test_action_for_wrong_variant_is_rejected() {
        let mut game = GameSession::tic_tac_toe(players(), 0);
        let before = game.clone();

        let r = game.apply(pid(1), Action::RockPaperScissors(Choice::Rock));

        assert!(matches!(r, Err(TurnError::InvalidAction(_))));
        assert_eq!(game, before, "rejected action must not mutate state");
    }

    #[test]
    fn test_rejected_action_leaves_state_and_log_untouched() {
        let mut game = GameSession::tic_tac_toe(players(), 10);
        let before = game.clone();

        let r = game.apply(
            pid(2),
            Action::TicTacToe(Placement { row: 0, col: 0 }),
        );

        assert_eq!(r, Err(TurnError::NotYourTurn(pid(2))));
        assert_eq!(game, before);
    }

    #[test]
    fn test_events_accumulate_in_the_log() {
        let mut game = GameSession::tic_tac_toe(players(), 0);
        game.apply(pid(1), Action::TicTacToe(Placement { row: 0, col: 0 }))
            .unwrap();
        game.apply(pid(2), Action::TicTacToe(Placement { row: 1, col: 1 }))
            .unwrap();

        let snapshot = game.snapshot(SessionId(1));
        assert_eq!(snapshot.log.len(), 2);
        assert!(matches!(snapshot.log[0], Event::MarkPlaced { .. }));
    }

    #[test]
    fn test_take_outcome_requires_terminal() {
        let mut game = GameSession::rock_paper_scissors(players(), 25);
        assert!(game.take_outcome().is_none());

        game.apply(pid(1), Action::RockPaperScissors(Choice::Rock))
            .unwrap();
        game.apply(pid(2), Action::RockPaperScissors(Choice::Scissors))
            .unwrap();

        let outcome = game.take_outcome().expect("terminal session");
        assert_eq!(outcome.variant, GameVariant::RockPaperScissors);
        assert_eq!(outcome.winner, Some(pid(1)));
        assert_eq!(outcome.loser(), Some(pid(2)));
        assert_eq!(outcome.bet, 25);
    }

    #[test]
    fn test_take_outcome_is_exactly_once() {
        let mut game = GameSession::rock_paper_scissors(players(), 25);
        game.apply(pid(1), Action::RockPaperScissors(Choice::Rock))
            .unwrap();
        game.apply(pid(2), Action::RockPaperScissors(Choice::Scissors))
            .unwrap();

        assert!(game.take_outcome().is_some());
        assert!(game.take_outcome().is_none(), "second take must be None");
    }

    #[test]
    fn test_snapshot_carries_variant_and_turn() {
        let game = GameSession::blackjack(
            players(),
            50,
            crate::blackjack::Config { deck: Some(vec![2, 3, 4, 5, 6]) },
        );
        let snapshot = game.snapshot(SessionId(9));

        assert_eq!(snapshot.session_id, SessionId(9));
        assert_eq!(snapshot.variant, GameVariant::Blackjack);
        assert_eq!(snapshot.turn, Some(pid(1)));
        assert_eq!(snapshot.bet, 50);
        assert!(!snapshot.finished);
    }

    #[test]
    fn test_snapshot_round_trips_as_json() {
        // Snapshots cross into the rendering layer as data; they must
        // survive serialization.
        let mut game = GameSession::tic_tac_toe(players(), 15);
        game.apply(pid(1), Action::TicTacToe(Placement { row: 1, col: 2 }))
            .unwrap();
        let snapshot = game.snapshot(SessionId(4));

        let json = serde_json::to_string(&snapshot).unwrap();
        let decoded: SessionSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, snapshot);
    }

    #[test]
    fn test_outcome_loser_is_none_on_draw() {
        let mut game = GameSession::rock_paper_scissors(players(), 10);
        game.apply(pid(1), Action::RockPaperScissors(Choice::Rock))
            .unwrap();
        game.apply(pid(2), Action::RockPaperScissors(Choice::Rock))
            .unwrap();

        let outcome = game.take_outcome().unwrap();
        assert_eq!(outcome.winner, None);
        assert_eq!(outcome.loser(), None);
    }
}
