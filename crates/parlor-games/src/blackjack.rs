//! Blackjack, 1v1 with no dealer.
//!
//! Both hands are dealt from one shuffled 4-deck pool of the ranks
//! 1-11 (the ace is modeled as a fixed low value — no soft/hard
//! distinction). The challenger acts first: hit as often as they dare,
//! then stand to pass the turn. A hand over 21 busts on the spot and
//! ends the match; otherwise the second stand triggers evaluation.

use std::collections::VecDeque;

use parlor_types::ParticipantId;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::logic::{Event, Stage, TurnGame};
use crate::TurnError;

/// Number of copies of each rank in the pool.
const DECKS: usize = 4;

/// Hit or stand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Move {
    Hit,
    Stand,
}

/// Per-session settings.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Explicit draw order, front first. `None` shuffles a fresh
    /// 4-deck pool — the normal case. Injected for tests and replays.
    pub deck: Option<Vec<u8>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct State {
    players: [ParticipantId; 2],
    deck: VecDeque<u8>,
    hands: [Vec<u8>; 2],
    /// Index into `players` of whoever still has to act.
    turn: usize,
    finished: bool,
    winner: Option<ParticipantId>,
}

/// Open-hands snapshot. This ruleset hides nothing: both hands and
/// totals are table-visible.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct View {
    pub hands: [HandView; 2],
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandView {
    pub participant: ParticipantId,
    pub cards: Vec<u8>,
    pub total: u32,
}

pub struct Blackjack;

impl TurnGame for Blackjack {
    type Config = Config;
    type State = State;
    type Action = Move;
    type View = View;

    fn init(config: &Config, players: &[ParticipantId; 2]) -> State {
        let mut deck: VecDeque<u8> = match &config.deck {
            Some(order) => order.iter().copied().collect(),
            None => {
                let mut pool: Vec<u8> = Vec::with_capacity(11 * DECKS);
                for _ in 0..DECKS {
                    pool.extend(1..=11u8);
                }
                pool.shuffle(&mut rand::rng());
                pool.into_iter().collect()
            }
        };

        // Two cards each, challenger first.
        let mut hands = [Vec::with_capacity(4), Vec::with_capacity(4)];
        for hand in &mut hands {
            for _ in 0..2 {
                if let Some(value) = deck.pop_front() {
                    hand.push(value);
                }
            }
        }

        State {
            players: *players,
            deck,
            hands,
            turn: 0,
            finished: false,
            winner: None,
        }
    }

    fn validate(
        state: &State,
        actor: ParticipantId,
        action: &Move,
    ) -> Result<(), TurnError> {
        if !state.players.contains(&actor) {
            return Err(TurnError::NotAParticipant(actor));
        }
        if state.finished {
            return Err(TurnError::OutOfSequence(
                "the match is already decided".into(),
            ));
        }
        if state.players[state.turn] != actor {
            return Err(TurnError::NotYourTurn(actor));
        }
        if matches!(action, Move::Hit) && state.deck.is_empty() {
            return Err(TurnError::InvalidAction("the deck is exhausted".into()));
        }
        Ok(())
    }

    fn apply(state: &mut State, actor: ParticipantId, action: Move) -> Vec<Event> {
        match action {
            Move::Hit => {
                let value = state
                    .deck
                    .pop_front()
                    .expect("validate checked the deck is non-empty");
                state.hands[state.turn].push(value);

                let mut events = vec![Event::CardDealt { to: actor, value }];
                let total = hand_total(&state.hands[state.turn]);
                if total > 21 {
                    // Busting ends the match immediately — the
                    // opponent never has to act.
                    state.finished = true;
                    let opponent = state.players[1 - state.turn];
                    state.winner = Some(opponent);
                    events.push(Event::Busted { by: actor, total });
                    events.push(Event::ended(Some(opponent)));
                }
                events
            }
            Move::Stand => {
                let mut events = vec![Event::Stood { by: actor }];
                if state.turn == 0 {
                    state.turn = 1;
                } else {
                    let winner = evaluate(state);
                    state.finished = true;
                    state.winner = winner;
                    events.push(Event::ended(winner));
                }
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
            Stage::HitOrStand
        }
    }

    fn is_terminal(state: &State) -> bool {
        state.finished
    }

    fn winner(state: &State) -> Option<ParticipantId> {
        state.winner
    }

    fn view(state: &State) -> View {
        let hand = |i: usize| HandView {
            participant: state.players[i],
            cards: state.hands[i].clone(),
            total: hand_total(&state.hands[i]),
        };
        View {
            hands: [hand(0), hand(1)],
        }
    }
}

fn hand_total(hand: &[u8]) -> u32 {
    hand.iter().map(|&v| v as u32).sum()
}

/// Both participants stood: both over 21 is a push, one over 21 loses,
/// otherwise the higher total wins and equal totals push.
fn evaluate(state: &State) -> Option<ParticipantId> {
    let totals = [hand_total(&state.hands[0]), hand_total(&state.hands[1])];
    match (totals[0] > 21, totals[1] > 21) {
        (true, true) => None,
        (true, false) => Some(state.players[1]),
        (false, true) => Some(state.players[0]),
        (false, false) => {
            if totals[0] > totals[1] {
                Some(state.players[0])
            } else if totals[1] > totals[0] {
                Some(state.players[1])
            } else {
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pid(id: u64) -> ParticipantId {
        ParticipantId(id)
    }

    fn players() -> [ParticipantId; 2] {
        [pid(1), pid(2)]
    }

    fn with_deck(deck: &[u8]) -> State {
        Blackjack::init(
            &Config {
                deck: Some(deck.to_vec()),
            },
            &players(),
        )
    }

    fn act(state: &mut State, actor: u64, action: Move) -> Vec<Event> {
        Blackjack::validate(state, pid(actor), &action).unwrap();
        Blackjack::apply(state, pid(actor), action)
    }

    #[test]
    fn test_init_deals_two_cards_each_challenger_first() {
        let state = with_deck(&[2, 3, 4, 5, 6, 7]);
        let view = Blackjack::view(&state);
        assert_eq!(view.hands[0].cards, vec![2, 3]);
        assert_eq!(view.hands[1].cards, vec![4, 5]);
        assert_eq!(view.hands[0].total, 5);
        assert_eq!(Blackjack::current_turn(&state), Some(pid(1)));
    }

    #[test]
    fn test_init_shuffled_pool_has_44_cards() {
        let state = Blackjack::init(&Config::default(), &players());
        let view = Blackjack::view(&state);
        let dealt: usize =
            view.hands.iter().map(|h| h.cards.len()).sum();
        assert_eq!(dealt, 4);
        assert_eq!(state.deck.len(), 11 * DECKS - 4);
    }

    #[test]
    fn test_hit_appends_the_next_draw() {
        let mut state = with_deck(&[2, 3, 4, 5, 6, 7]);
        let events = act(&mut state, 1, Move::Hit);

        assert_eq!(events, vec![Event::CardDealt { to: pid(1), value: 6 }]);
        assert_eq!(Blackjack::view(&state).hands[0].cards, vec![2, 3, 6]);
        // Still player 1's turn — they may keep hitting.
        assert_eq!(Blackjack::current_turn(&state), Some(pid(1)));
    }

    #[test]
    fn test_hitting_past_21_busts_and_ends_immediately() {
        // Player 1 starts at 10+9 = 19; the next draw is an 11.
        let mut state = with_deck(&[10, 9, 5, 5, 11]);
        let events = act(&mut state, 1, Move::Hit);

        assert!(Blackjack::is_terminal(&state));
        assert_eq!(Blackjack::winner(&state), Some(pid(2)));
        assert!(events.contains(&Event::Busted { by: pid(1), total: 30 }));
        assert!(events.contains(&Event::MatchEnded { winner: Some(pid(2)) }));
    }

    #[test]
    fn test_first_stand_passes_the_turn() {
        let mut state = with_deck(&[2, 3, 4, 5]);
        act(&mut state, 1, Move::Stand);
        assert_eq!(Blackjack::current_turn(&state), Some(pid(2)));
        assert!(!Blackjack::is_terminal(&state));
    }

    #[test]
    fn test_second_stand_higher_total_wins() {
        // P1: 10+9 = 19, P2: 5+5 = 10.
        let mut state = with_deck(&[10, 9, 5, 5]);
        act(&mut state, 1, Move::Stand);
        let events = act(&mut state, 2, Move::Stand);

        assert!(Blackjack::is_terminal(&state));
        assert_eq!(Blackjack::winner(&state), Some(pid(1)));
        assert!(events.contains(&Event::MatchEnded { winner: Some(pid(1)) }));
    }

    #[test]
    fn test_equal_totals_push() {
        let mut state = with_deck(&[10, 9, 9, 10]);
        act(&mut state, 1, Move::Stand);
        act(&mut state, 2, Move::Stand);

        assert!(Blackjack::is_terminal(&state));
        assert_eq!(Blackjack::winner(&state), None);
    }

    #[test]
    fn test_wrong_turn_is_rejected() {
        let state = with_deck(&[2, 3, 4, 5]);
        let r = Blackjack::validate(&state, pid(2), &Move::Hit);
        assert_eq!(r, Err(TurnError::NotYourTurn(pid(2))));
    }

    #[test]
    fn test_no_actions_after_terminal() {
        let mut state = with_deck(&[10, 9, 5, 5]);
        act(&mut state, 1, Move::Stand);
        act(&mut state, 2, Move::Stand);

        let r = Blackjack::validate(&state, pid(1), &Move::Hit);
        assert!(matches!(r, Err(TurnError::OutOfSequence(_))));
    }
}
