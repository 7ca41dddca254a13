//! The card battle: rosters of working-copy cards, three-stage turns.
//!
//! Each side fields an ordered roster of cards cloned from their
//! inventory (padded from the pool by the caller). Every turn walks
//! three stages: pick one of your alive cards, pick Attack or Defend,
//! and — for Attack only — pick an alive opposing card. Damage is
//! `attack - (defense + temp_defense)`, floored at zero; a card's
//! `temp_defense` is consumed by the first hit it receives, absorbed or
//! not. The battle ends when one side has no card left standing.
//!
//! Rosters are working copies: nothing here ever flows back into a
//! participant's persisted inventory. Outcomes only move currency.

use parlor_types::{Card, ParticipantId};
use serde::{Deserialize, Serialize};

use crate::logic::{Event, Stage, TurnGame};
use crate::TurnError;

/// What the acting card does this turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BattleAction {
    Attack,
    Defend,
}

/// One step of the three-stage turn protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BattleMove {
    /// Stage 1: choose one of your own alive cards by roster index.
    SelectAttacker { index: usize },
    /// Stage 2: choose what the selected card does.
    SelectAction { action: BattleAction },
    /// Stage 3 (Attack only): choose an alive opposing card.
    SelectTarget { index: usize },
}

/// Per-session settings, prepared by the caller.
#[derive(Debug, Clone)]
pub struct Config {
    /// Working-copy rosters, one per participant, in seat order.
    pub rosters: [Vec<Card>; 2],
    /// Defense added by a Defend action, effective for one hit.
    pub defend_bonus: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
enum TurnStage {
    SelectAttacker,
    SelectAction,
    SelectTarget,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct State {
    players: [ParticipantId; 2],
    rosters: [Vec<Card>; 2],
    turn: usize,
    stage: TurnStage,
    /// Roster index of the card selected in stage 1.
    selected: Option<usize>,
    defend_bonus: u32,
    finished: bool,
    winner: Option<ParticipantId>,
}

/// Full-table snapshot. Rosters are open information in a battle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct View {
    pub rosters: [RosterView; 2],
    /// The acting card's roster index once stage 1 has happened.
    pub selected: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterView {
    pub participant: ParticipantId,
    pub cards: Vec<Card>,
}

pub struct CardBattle;

impl TurnGame for CardBattle {
    type Config = Config;
    type State = State;
    type Action = BattleMove;
    type View = View;

    fn init(config: &Config, players: &[ParticipantId; 2]) -> State {
        let mut state = State {
            players: *players,
            rosters: config.rosters.clone(),
            turn: 0,
            stage: TurnStage::SelectAttacker,
            selected: None,
            defend_bonus: config.defend_bonus,
            finished: false,
            winner: None,
        };
        // A side fielded with no standing card has already lost.
        if let Some(winner) = decide(&state) {
            state.finished = true;
            state.winner = winner;
        }
        state
    }

    fn validate(
        state: &State,
        actor: ParticipantId,
        action: &BattleMove,
    ) -> Result<(), TurnError> {
        if !state.players.contains(&actor) {
            return Err(TurnError::NotAParticipant(actor));
        }
        if state.finished {
            return Err(TurnError::OutOfSequence(
                "the battle is already decided".into(),
            ));
        }
        if state.players[state.turn] != actor {
            return Err(TurnError::NotYourTurn(actor));
        }

        match (state.stage, action) {
            (TurnStage::SelectAttacker, BattleMove::SelectAttacker { index }) => {
                let card = state.rosters[state.turn]
                    .get(*index)
                    .ok_or_else(|| {
                        TurnError::InvalidAction(format!(
                            "no card at index {index}"
                        ))
                    })?;
                if !card.is_alive() {
                    return Err(TurnError::InvalidAction(format!(
                        "{} is defeated",
                        card.name
                    )));
                }
                Ok(())
            }
            (TurnStage::SelectAction, BattleMove::SelectAction { .. }) => Ok(()),
            (TurnStage::SelectTarget, BattleMove::SelectTarget { index }) => {
                let card = state.rosters[1 - state.turn]
                    .get(*index)
                    .ok_or_else(|| {
                        TurnError::InvalidAction(format!(
                            "no card at index {index}"
                        ))
                    })?;
                if !card.is_alive() {
                    return Err(TurnError::InvalidAction(format!(
                        "{} is already defeated",
                        card.name
                    )));
                }
                Ok(())
            }
            (stage, _) => Err(TurnError::OutOfSequence(format!(
                "expected a {} move",
                match stage {
                    TurnStage::SelectAttacker => "select-attacker",
                    TurnStage::SelectAction => "select-action",
                    TurnStage::SelectTarget => "select-target",
                }
            ))),
        }
    }

    fn apply(state: &mut State, actor: ParticipantId, action: BattleMove) -> Vec<Event> {
        match action {
            BattleMove::SelectAttacker { index } => {
                state.selected = Some(index);
                state.stage = TurnStage::SelectAction;
                vec![Event::AttackerSelected {
                    by: actor,
                    card: state.rosters[state.turn][index].name.clone(),
                }]
            }
            BattleMove::SelectAction { action: BattleAction::Defend } => {
                let index = state.selected.expect("stage 2 follows stage 1");
                let bonus = state.defend_bonus;
                let card = &mut state.rosters[state.turn][index];
                card.temp_defense += bonus;

                let mut events = vec![Event::Defended {
                    by: actor,
                    card: card.name.clone(),
                    bonus,
                }];
                end_turn(state, &mut events);
                events
            }
            BattleMove::SelectAction { action: BattleAction::Attack } => {
                state.stage = TurnStage::SelectTarget;
                Vec::new()
            }
            BattleMove::SelectTarget { index } => {
                let attacker_index =
                    state.selected.expect("stage 3 follows stage 1");
                let attacker = state.rosters[state.turn][attacker_index].clone();
                let target = &mut state.rosters[1 - state.turn][index];

                let damage = attacker
                    .attack
                    .saturating_sub(target.defense + target.temp_defense);
                target.hit_points = target.hit_points.saturating_sub(damage);
                // The bonus is spent by this hit whether or not it
                // absorbed anything.
                target.temp_defense = 0;

                let mut events = vec![Event::Attacked {
                    by: actor,
                    attacker: attacker.name.clone(),
                    target: target.name.clone(),
                    damage,
                }];
                if !target.is_alive() {
                    events.push(Event::CardDefeated {
                        owner: state.players[1 - state.turn],
                        card: target.name.clone(),
                    });
                }
                end_turn(state, &mut events);
                events
            }
        }
    }

    fn current_turn(state: &State) -> Option<ParticipantId> {
        if state.finished {
            None
        } else {
            Some(state.players[state.turn])
        }
    }

    fn stage(state: &State) -> Stage {
        if state.finished {
            Stage::Complete
        } else {
            match state.stage {
                TurnStage::SelectAttacker => Stage::SelectAttacker,
                TurnStage::SelectAction => Stage::SelectAction,
                TurnStage::SelectTarget => Stage::SelectTarget,
            }
        }
    }

    fn is_terminal(state: &State) -> bool {
        state.finished
    }

    fn winner(state: &State) -> Option<ParticipantId> {
        state.winner
    }

    fn view(state: &State) -> View {
        let roster = |i: usize| RosterView {
            participant: state.players[i],
            cards: state.rosters[i].clone(),
        };
        View {
            rosters: [roster(0), roster(1)],
            selected: state.selected,
        }
    }
}

/// `Some(winner)` once either side has no standing card. `Some(None)`
/// cannot happen in play (one attack defeats at most one card) but is
/// handled for the degenerate both-empty init.
fn decide(state: &State) -> Option<Option<ParticipantId>> {
    let alive =
        |i: usize| state.rosters[i].iter().any(Card::is_alive);
    match (alive(0), alive(1)) {
        (true, true) => None,
        (true, false) => Some(Some(state.players[0])),
        (false, true) => Some(Some(state.players[1])),
        (false, false) => Some(None),
    }
}

/// Completes the turn: check for a decided battle, otherwise hand the
/// turn to the opponent and reset to stage 1.
fn end_turn(state: &mut State, events: &mut Vec<Event>) {
    if let Some(winner) = decide(state) {
        state.finished = true;
        state.winner = winner;
        state.selected = None;
        events.push(Event::ended(winner));
        return;
    }
    state.turn = 1 - state.turn;
    state.stage = TurnStage::SelectAttacker;
    state.selected = None;
}
