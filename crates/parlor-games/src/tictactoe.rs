//! Tic-tac-toe: 3x3 grid, strict turn alternation, win on any line.

use parlor_types::ParticipantId;
use serde::{Deserialize, Serialize};

use crate::logic::{Event, Stage, TurnGame};
use crate::TurnError;

/// One cell of the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cell {
    Empty,
    X,
    O,
}

/// Places the turn holder's mark at (`row`, `col`), both zero-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub row: usize,
    pub col: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct State {
    board: [[Cell; 3]; 3],
    players: [ParticipantId; 2],
    /// Index into `players`: 0 plays X, 1 plays O.
    turn: usize,
    finished: bool,
    winner: Option<ParticipantId>,
}

/// Board snapshot for rendering. Nothing is hidden in tic-tac-toe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct View {
    pub board: [[Cell; 3]; 3],
}

pub struct TicTacToe;

impl TurnGame for TicTacToe {
    type Config = ();
    type State = State;
    type Action = Placement;
    type View = View;

    fn init(_: &(), players: &[ParticipantId; 2]) -> State {
        State {
            board: [[Cell::Empty; 3]; 3],
            players: *players,
            turn: 0,
            finished: false,
            winner: None,
        }
    }

    fn validate(
        state: &State,
        actor: ParticipantId,
        action: &Placement,
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
        if action.row >= 3 || action.col >= 3 {
            return Err(TurnError::InvalidAction(
                "row and col must be 0-2".into(),
            ));
        }
        if state.board[action.row][action.col] != Cell::Empty {
            return Err(TurnError::InvalidAction(format!(
                "cell ({}, {}) is occupied",
                action.row, action.col
            )));
        }
        Ok(())
    }

    fn apply(
        state: &mut State,
        actor: ParticipantId,
        action: Placement,
    ) -> Vec<Event> {
        let mark = if state.turn == 0 { Cell::X } else { Cell::O };
        state.board[action.row][action.col] = mark;

        let mark_char = if mark == Cell::X { 'X' } else { 'O' };
        let mut events = vec![Event::MarkPlaced {
            by: actor,
            row: action.row,
            col: action.col,
            mark: mark_char,
        }];

        if line_complete(&state.board, mark) {
            state.finished = true;
            state.winner = Some(actor);
            events.push(Event::ended(Some(actor)));
        } else if board_full(&state.board) {
            state.finished = true;
            events.push(Event::ended(None));
        } else {
            state.turn = 1 - state.turn;
        }

        events
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
            Stage::Placing
        }
    }

    fn is_terminal(state: &State) -> bool {
        state.finished
    }

    fn winner(state: &State) -> Option<ParticipantId> {
        state.winner
    }

    fn view(state: &State) -> View {
        View { board: state.board }
    }
}

fn line_complete(b: &[[Cell; 3]; 3], m: Cell) -> bool {
    (0..3).any(|i| (0..3).all(|j| b[i][j] == m))       // rows
        || (0..3).any(|j| (0..3).all(|i| b[i][j] == m)) // cols
        || (0..3).all(|i| b[i][i] == m)                 // diagonal
        || (0..3).all(|i| b[i][2 - i] == m)             // anti-diagonal
}

fn board_full(b: &[[Cell; 3]; 3]) -> bool {
    b.iter().all(|row| row.iter().all(|c| *c != Cell::Empty))
}
