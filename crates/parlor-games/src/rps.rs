//! Rock-paper-scissors with hidden simultaneous choices.
//!
//! Submission order carries no information: the first choice is stored
//! but never revealed (not in events, not in snapshots) until both are
//! in. One submission per participant; resolving follows the cyclic
//! rule rock > scissors > paper > rock.

use parlor_types::ParticipantId;
use serde::{Deserialize, Serialize};

use crate::logic::{Event, Stage, TurnGame};
use crate::TurnError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Choice {
    Rock,
    Paper,
    Scissors,
}

impl Choice {
    /// True if `self` beats `other` under the cyclic rule.
    pub fn beats(self, other: Choice) -> bool {
        matches!(
            (self, other),
            (Choice::Rock, Choice::Scissors)
                | (Choice::Paper, Choice::Rock)
                | (Choice::Scissors, Choice::Paper)
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct State {
    players: [ParticipantId; 2],
    choices: [Option<Choice>; 2],
    finished: bool,
    winner: Option<ParticipantId>,
}

/// Render-safe snapshot: who has submitted, and — only once the match
/// is resolved — what the choices were.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct View {
    pub submitted: [bool; 2],
    pub revealed: Option<[Choice; 2]>,
}

pub struct RockPaperScissors;

impl TurnGame for RockPaperScissors {
    type Config = ();
    type State = State;
    type Action = Choice;
    type View = View;

    fn init(_: &(), players: &[ParticipantId; 2]) -> State {
        State {
            players: *players,
            choices: [None, None],
            finished: false,
            winner: None,
        }
    }

    fn validate(
        state: &State,
        actor: ParticipantId,
        _action: &Choice,
    ) -> Result<(), TurnError> {
        let Some(slot) = seat(state, actor) else {
            return Err(TurnError::NotAParticipant(actor));
        };
        if state.finished {
            return Err(TurnError::OutOfSequence(
                "the match is already decided".into(),
            ));
        }
        if state.choices[slot].is_some() {
            return Err(TurnError::OutOfSequence(
                "you have already chosen".into(),
            ));
        }
        Ok(())
    }

    fn apply(state: &mut State, actor: ParticipantId, action: Choice) -> Vec<Event> {
        let slot = seat(state, actor).expect("validate checked membership");
        state.choices[slot] = Some(action);

        let mut events = vec![Event::ChoiceSubmitted { by: actor }];

        if let [Some(first), Some(second)] = state.choices {
            state.finished = true;
            state.winner = if first.beats(second) {
                Some(state.players[0])
            } else if second.beats(first) {
                Some(state.players[1])
            } else {
                None
            };
            events.push(Event::ChoicesRevealed {
                first: (state.players[0], first),
                second: (state.players[1], second),
            });
            events.push(Event::ended(state.winner));
        }

        events
    }

    /// Both participants may act until their choice is in — there is no
    /// turn holder.
    fn current_turn(_state: &State) -> Option<ParticipantId> {
        None
    }

    fn stage(state: &State) -> Stage {
        if state.finished {
            Stage::Complete
        } else {
            Stage::AwaitingChoices
        }
    }

    fn is_terminal(state: &State) -> bool {
        state.finished
    }

    fn winner(state: &State) -> Option<ParticipantId> {
        state.winner
    }

    fn view(state: &State) -> View {
        View {
            submitted: [state.choices[0].is_some(), state.choices[1].is_some()],
            revealed: match (state.finished, state.choices) {
                (true, [Some(a), Some(b)]) => Some([a, b]),
                _ => None,
            },
        }
    }
}

fn seat(state: &State, actor: ParticipantId) -> Option<usize> {
    state.players.iter().position(|p| *p == actor)
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

    fn choose(state: &mut State, actor: u64, choice: Choice) -> Vec<Event> {
        RockPaperScissors::validate(state, pid(actor), &choice).unwrap();
        RockPaperScissors::apply(state, pid(actor), choice)
    }

    #[test]
    fn test_beats_is_cyclic() {
        assert!(Choice::Rock.beats(Choice::Scissors));
        assert!(Choice::Scissors.beats(Choice::Paper));
        assert!(Choice::Paper.beats(Choice::Rock));
        assert!(!Choice::Rock.beats(Choice::Paper));
        assert!(!Choice::Rock.beats(Choice::Rock));
    }

    #[test]
    fn test_no_turn_holder_before_resolution() {
        let state = RockPaperScissors::init(&(), &players());
        assert_eq!(RockPaperScissors::current_turn(&state), None);
        assert_eq!(RockPaperScissors::stage(&state), Stage::AwaitingChoices);
    }

    #[test]
    fn test_first_submission_reveals_nothing() {
        let mut state = RockPaperScissors::init(&(), &players());
        let events = choose(&mut state, 1, Choice::Rock);

        assert_eq!(events, vec![Event::ChoiceSubmitted { by: pid(1) }]);
        let view = RockPaperScissors::view(&state);
        assert_eq!(view.submitted, [true, false]);
        assert!(view.revealed.is_none());
    }

    #[test]
    fn test_submission_order_is_irrelevant() {
        // Second participant submits first — perfectly fine.
        let mut state = RockPaperScissors::init(&(), &players());
        choose(&mut state, 2, Choice::Paper);
        choose(&mut state, 1, Choice::Rock);

        assert!(RockPaperScissors::is_terminal(&state));
        assert_eq!(RockPaperScissors::winner(&state), Some(pid(2)));
    }

    #[test]
    fn test_duplicate_submission_is_out_of_sequence() {
        let mut state = RockPaperScissors::init(&(), &players());
        choose(&mut state, 1, Choice::Rock);

        let r = RockPaperScissors::validate(&state, pid(1), &Choice::Paper);
        assert!(matches!(r, Err(TurnError::OutOfSequence(_))));
        // And the stored choice is untouched.
        assert_eq!(state.choices[0], Some(Choice::Rock));
    }

    #[test]
    fn test_equal_choices_tie() {
        let mut state = RockPaperScissors::init(&(), &players());
        choose(&mut state, 1, Choice::Scissors);
        let events = choose(&mut state, 2, Choice::Scissors);

        assert!(RockPaperScissors::is_terminal(&state));
        assert_eq!(RockPaperScissors::winner(&state), None);
        assert!(events.contains(&Event::MatchEnded { winner: None }));
    }

    #[test]
    fn test_resolution_reveals_both_choices() {
        let mut state = RockPaperScissors::init(&(), &players());
        choose(&mut state, 1, Choice::Rock);
        let events = choose(&mut state, 2, Choice::Scissors);

        assert_eq!(RockPaperScissors::winner(&state), Some(pid(1)));
        assert!(events.contains(&Event::ChoicesRevealed {
            first: (pid(1), Choice::Rock),
            second: (pid(2), Choice::Scissors),
        }));
        let view = RockPaperScissors::view(&state);
        assert_eq!(view.revealed, Some([Choice::Rock, Choice::Scissors]));
    }

    #[test]
    fn test_outsider_cannot_submit() {
        let state = RockPaperScissors::init(&(), &players());
        let r = RockPaperScissors::validate(&state, pid(9), &Choice::Rock);
        assert_eq!(r, Err(TurnError::NotAParticipant(pid(9))));
    }
}
