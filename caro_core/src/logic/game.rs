use crate::logic::board::{Board, Cell, Mark};
use crate::logic::rules::{is_winner, MoveError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    Playing,
    Won(Mark),
    Draw,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRecord {
    pub cell: Cell,
    pub mark: Mark,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub board: Board,
    pub turn: Mark,
    pub status: GameStatus,
    pub last_move: Option<Cell>,
    pub history: Vec<MoveRecord>,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    /// New game on an empty board. `X` moves first.
    #[must_use]
    pub fn new() -> Self {
        Self {
            board: Board::new(),
            turn: Mark::X,
            status: GameStatus::Playing,
            last_move: None,
            history: Vec::new(),
        }
    }

    /// Plays the side to move at `cell` and advances the turn.
    pub fn make_move(&mut self, cell: Cell) -> Result<(), MoveError> {
        if self.status != GameStatus::Playing {
            return Err(MoveError::GameOver);
        }
        if self.board.get(cell).is_some() {
            return Err(MoveError::CellOccupied);
        }

        let mark = self.turn;
        self.board.place(cell, mark);
        self.history.push(MoveRecord { cell, mark });
        self.last_move = Some(cell);
        self.turn = mark.opponent();
        self.update_status(mark);

        log::debug!("{mark:?} played cell {}", cell.index());
        Ok(())
    }

    // Win is checked before draw: a board filled by a winning move is a
    // win, not a draw.
    fn update_status(&mut self, moved: Mark) {
        if is_winner(&self.board, moved) {
            self.status = GameStatus::Won(moved);
        } else if self.board.is_full() {
            self.status = GameStatus::Draw;
        }
    }

    /// Takes back the last move, if any. The game reopens even if the move
    /// had ended it.
    pub fn undo_move(&mut self) -> bool {
        if let Some(record) = self.history.pop() {
            self.board.clear(record.cell);
            self.turn = record.mark;
            self.last_move = self.history.last().map(|r| r.cell);
            self.status = GameStatus::Playing;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(index: usize) -> Cell {
        Cell::new(index).expect("index in range")
    }

    #[test]
    fn test_turns_alternate() {
        let mut game = GameState::new();
        assert_eq!(game.turn, Mark::X);

        game.make_move(cell(4)).unwrap();
        assert_eq!(game.turn, Mark::O);
        assert_eq!(game.board.get(cell(4)), Some(Mark::X));
        assert_eq!(game.last_move, Some(cell(4)));

        game.make_move(cell(0)).unwrap();
        assert_eq!(game.turn, Mark::X);
        assert_eq!(game.board.get(cell(0)), Some(Mark::O));
    }

    #[test]
    fn test_occupied_cell_is_rejected() {
        let mut game = GameState::new();
        game.make_move(cell(4)).unwrap();

        let result = game.make_move(cell(4));
        assert_eq!(result, Err(MoveError::CellOccupied));
        // The rejected move must not consume the turn.
        assert_eq!(game.turn, Mark::O);
        assert_eq!(game.history.len(), 1);
    }

    #[test]
    fn test_win_ends_the_game() {
        let mut game = GameState::new();
        // X: 0, 1, 2 (top row); O: 3, 4.
        for index in [0, 3, 1, 4, 2] {
            game.make_move(cell(index)).unwrap();
        }
        assert_eq!(game.status, GameStatus::Won(Mark::X));

        let result = game.make_move(cell(5));
        assert_eq!(result, Err(MoveError::GameOver));
    }

    #[test]
    fn test_full_board_without_a_line_is_a_draw() {
        let mut game = GameState::new();
        // X: 4, 0, 5, 7, 2 / O: 8, 1, 3, 6. No completed line.
        for index in [4, 8, 0, 1, 5, 3, 7, 6, 2] {
            game.make_move(cell(index)).unwrap();
        }
        assert_eq!(game.status, GameStatus::Draw);
        assert!(game.board.is_full());
    }

    #[test]
    fn test_winning_final_move_beats_the_draw() {
        let mut game = GameState::new();
        // The ninth move fills the board and completes the 2-4-6 diagonal.
        for index in [1, 0, 2, 5, 3, 7, 4, 8, 6] {
            game.make_move(cell(index)).unwrap();
        }
        assert!(game.board.is_full());
        assert_eq!(game.status, GameStatus::Won(Mark::X));
    }

    #[test]
    fn test_undo_restores_previous_state() {
        let mut game = GameState::new();
        let before = game.clone();
        game.make_move(cell(4)).unwrap();

        assert!(game.undo_move());
        assert_eq!(game, before);
        assert!(!game.undo_move());
    }

    #[test]
    fn test_undo_reopens_a_finished_game() {
        let mut game = GameState::new();
        for index in [0, 3, 1, 4, 2] {
            game.make_move(cell(index)).unwrap();
        }
        assert_eq!(game.status, GameStatus::Won(Mark::X));

        assert!(game.undo_move());
        assert_eq!(game.status, GameStatus::Playing);
        assert_eq!(game.turn, Mark::X);
        assert_eq!(game.board.get(cell(2)), None);
        assert_eq!(game.last_move, Some(cell(4)));
    }

    #[test]
    fn test_serde_round_trip() {
        let mut game = GameState::new();
        game.make_move(cell(4)).unwrap();
        game.make_move(cell(0)).unwrap();

        let json = serde_json::to_string(&game).unwrap();
        let restored: GameState = serde_json::from_str(&json).unwrap();
        assert_eq!(game, restored);
    }
}
