use crate::engine::{SearchStats, Searcher};
use crate::logic::board::{Board, Cell, Mark};
use crate::logic::rules::{is_winner, winner};

const SCORE_WIN: i32 = 1;
const SCORE_LOSS: i32 = -1;
const SCORE_DRAW: i32 = 0;

/// Exhaustive minimax with alpha-beta pruning. The game tree is small
/// enough to solve outright, so there is no depth limit and no positional
/// evaluation; every leaf is a decided game scoring exactly
/// win/loss/draw. A win scores the same at any depth, so among several
/// winning lines the engine has no preference for the shortest one.
pub struct AlphaBetaEngine {
    nodes_searched: u32,
}

impl Default for AlphaBetaEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl AlphaBetaEngine {
    #[must_use]
    pub const fn new() -> Self {
        Self { nodes_searched: 0 }
    }

    /// Scores a finished position for `maximizing`, or `None` while the
    /// game is still open. The win checks come before the full-board
    /// check: a board filled by a winning move scores as the win it is.
    fn terminal_score(board: &Board, maximizing: Mark) -> Option<i32> {
        if is_winner(board, maximizing) {
            Some(SCORE_WIN)
        } else if is_winner(board, maximizing.opponent()) {
            Some(SCORE_LOSS)
        } else if board.is_full() {
            Some(SCORE_DRAW)
        } else {
            None
        }
    }

    fn alpha_beta(
        &mut self,
        board: &mut Board,
        mut alpha: i32,
        mut beta: i32,
        maximizing: Mark,
        turn: Mark,
    ) -> i32 {
        self.nodes_searched += 1;

        if let Some(score) = Self::terminal_score(board, maximizing) {
            return score;
        }

        if turn == maximizing {
            let mut best = i32::MIN;
            for cell in board.available_moves() {
                board.place(cell, turn);
                let score = self.alpha_beta(board, alpha, beta, maximizing, turn.opponent());
                board.clear(cell);

                best = best.max(score);
                alpha = alpha.max(score);
                if beta <= alpha {
                    break;
                }
            }
            best
        } else {
            let mut best = i32::MAX;
            for cell in board.available_moves() {
                board.place(cell, turn);
                let score = self.alpha_beta(board, alpha, beta, maximizing, turn.opponent());
                board.clear(cell);

                best = best.min(score);
                beta = beta.min(score);
                if beta <= alpha {
                    break;
                }
            }
            best
        }
    }
}

impl Searcher for AlphaBetaEngine {
    fn select_move(&mut self, board: &Board, mark: Mark) -> (Cell, SearchStats) {
        let moves = board.available_moves();
        assert!(!moves.is_empty(), "select_move called on a full board");
        debug_assert!(
            winner(board).is_none(),
            "select_move called on a decided board"
        );

        self.nodes_searched = 0;
        let mut board = board.clone();

        // Candidates in ascending cell order; strict `>` keeps the
        // earliest cell on equal scores.
        let mut best_score = i32::MIN;
        let mut best_move = None;
        for cell in moves {
            board.place(cell, mark);
            let score = self.alpha_beta(&mut board, i32::MIN, i32::MAX, mark, mark.opponent());
            board.clear(cell);

            if score > best_score {
                best_score = score;
                best_move = Some(cell);
            }
        }

        // At least one candidate was scored and every score beats the
        // i32::MIN seed.
        let Some(cell) = best_move else { unreachable!() };

        let stats = SearchStats {
            nodes: self.nodes_searched,
        };
        log::debug!(
            "selected cell {} score {best_score} nodes {}",
            cell.index(),
            stats.nodes
        );
        (cell, stats)
    }
}
