//! Property tests for turn ownership.
//!
//! The invariant under test: an action submitted by anyone other than
//! the current turn holder (or by an outsider, or carrying the wrong
//! variant's move) is rejected and never changes session state. The
//! fuzz uses a seeded RNG so failures reproduce.

use parlor_games::battle::{BattleAction, BattleMove, Config as BattleConfig};
use parlor_games::blackjack::{Config as BlackjackConfig, Move};
use parlor_games::rps::Choice;
use parlor_games::tictactoe::Placement;
use parlor_games::{Action, GameSession, Stage};
use parlor_types::{Card, ParticipantId};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const P1: ParticipantId = ParticipantId(1);
const P2: ParticipantId = ParticipantId(2);
const OUTSIDER: ParticipantId = ParticipantId(99);

fn random_action(rng: &mut StdRng) -> Action {
    match rng.random_range(0..4) {
        0 => Action::TicTacToe(Placement {
            row: rng.random_range(0..4),
            col: rng.random_range(0..4),
        }),
        1 => Action::Blackjack(if rng.random_bool(0.5) {
            Move::Hit
        } else {
            Move::Stand
        }),
        2 => Action::RockPaperScissors(match rng.random_range(0..3) {
            0 => Choice::Rock,
            1 => Choice::Paper,
            _ => Choice::Scissors,
        }),
        _ => Action::CardBattle(match rng.random_range(0..3) {
            0 => BattleMove::SelectAttacker {
                index: rng.random_range(0..4),
            },
            1 => BattleMove::SelectAction {
                action: if rng.random_bool(0.5) {
                    BattleAction::Attack
                } else {
                    BattleAction::Defend
                },
            },
            _ => BattleMove::SelectTarget {
                index: rng.random_range(0..4),
            },
        }),
    }
}

/// Fires a burst of hostile submissions and asserts none of them
/// changed anything.
fn assert_hostile_actions_bounce(game: &mut GameSession, rng: &mut StdRng) {
    let hostile_actors: Vec<ParticipantId> = match game.current_turn() {
        Some(holder) => {
            let other = if holder == P1 { P2 } else { P1 };
            vec![other, OUTSIDER]
        }
        // Simultaneous stage (or terminal): only outsiders are
        // guaranteed-hostile.
        None => vec![OUTSIDER],
    };

    for _ in 0..8 {
        let actor = hostile_actors[rng.random_range(0..hostile_actors.len())];
        let action = random_action(rng);
        let before = game.clone();

        let result = game.apply(actor, action.clone());

        assert!(
            result.is_err(),
            "hostile action accepted: {actor} submitted {action:?}"
        );
        assert_eq!(
            *game, before,
            "rejected action mutated state: {actor} submitted {action:?}"
        );
    }
}

/// Advances the session by one legal move from the expected actor.
fn advance(game: &mut GameSession, rng: &mut StdRng) {
    match game.stage() {
        Stage::Placing => {
            let actor = game.current_turn().unwrap();
            // Scan for a free cell.
            for row in 0..3 {
                for col in 0..3 {
                    if game
                        .apply(actor, Action::TicTacToe(Placement { row, col }))
                        .is_ok()
                    {
                        return;
                    }
                }
            }
            unreachable!("non-terminal board must have a free cell");
        }
        Stage::HitOrStand => {
            let actor = game.current_turn().unwrap();
            let action = if rng.random_bool(0.3) {
                Move::Hit
            } else {
                Move::Stand
            };
            game.apply(actor, Action::Blackjack(action)).unwrap();
        }
        Stage::AwaitingChoices => {
            // Submit for whichever participant hasn't yet.
            for actor in [P1, P2] {
                if game
                    .apply(actor, Action::RockPaperScissors(Choice::Rock))
                    .is_ok()
                {
                    return;
                }
            }
        }
        Stage::SelectAttacker => {
            let actor = game.current_turn().unwrap();
            for index in 0..4 {
                if game
                    .apply(
                        actor,
                        Action::CardBattle(BattleMove::SelectAttacker { index }),
                    )
                    .is_ok()
                {
                    return;
                }
            }
        }
        Stage::SelectAction => {
            let actor = game.current_turn().unwrap();
            let action = if rng.random_bool(0.25) {
                BattleAction::Defend
            } else {
                BattleAction::Attack
            };
            game.apply(actor, Action::CardBattle(BattleMove::SelectAction { action }))
                .unwrap();
        }
        Stage::SelectTarget => {
            let actor = game.current_turn().unwrap();
            for index in 0..4 {
                if game
                    .apply(
                        actor,
                        Action::CardBattle(BattleMove::SelectTarget { index }),
                    )
                    .is_ok()
                {
                    return;
                }
            }
        }
        Stage::Complete => {}
    }
}

fn fuzz(mut game: GameSession, seed: u64) {
    let mut rng = StdRng::seed_from_u64(seed);
    for _ in 0..200 {
        if game.is_terminal() {
            break;
        }
        assert_hostile_actions_bounce(&mut game, &mut rng);
        advance(&mut game, &mut rng);
    }
    // Terminal sessions reject everything, from anyone.
    if game.is_terminal() {
        for actor in [P1, P2, OUTSIDER] {
            let before = game.clone();
            let result = game.apply(actor, random_action(&mut rng));
            assert!(result.is_err());
            assert_eq!(game, before);
        }
    }
}

fn battle_roster(names: [&str; 3]) -> Vec<Card> {
    names
        .iter()
        .map(|name| Card {
            name: (*name).into(),
            attack: 40,
            defense: 10,
            hit_points: 60,
            temp_defense: 0,
        })
        .collect()
}

#[test]
fn test_tictactoe_rejections_never_mutate() {
    for seed in 0..20 {
        fuzz(GameSession::tic_tac_toe([P1, P2], 10), seed);
    }
}

#[test]
fn test_blackjack_rejections_never_mutate() {
    for seed in 0..20 {
        let game = GameSession::blackjack(
            [P1, P2],
            10,
            BlackjackConfig::default(),
        );
        fuzz(game, seed);
    }
}

#[test]
fn test_rps_rejections_never_mutate() {
    for seed in 0..20 {
        fuzz(GameSession::rock_paper_scissors([P1, P2], 0), seed);
    }
}

#[test]
fn test_battle_rejections_never_mutate() {
    for seed in 0..20 {
        let game = GameSession::card_battle(
            [P1, P2],
            BattleConfig {
                rosters: [
                    battle_roster(["Ember", "Tide", "Gale"]),
                    battle_roster(["Stone", "Thorn", "Frost"]),
                ],
                defend_bonus: 8,
            },
        );
        fuzz(game, seed);
    }
}
