use std::io::{self, BufRead, Write};

use caro_core::engine::search::AlphaBetaEngine;
use caro_core::engine::Searcher;
use caro_core::logic::board::{Board, Cell, Mark};
use caro_core::logic::game::{GameState, GameStatus};
use caro_core::logic::rules::MoveError;

/// Runs games against the engine until the player stops or stdin closes.
pub fn run() -> io::Result<()> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut input = stdin.lock();
    let mut out = stdout.lock();

    writeln!(out, "Tic-tac-toe. The computer plays a perfect game.")?;
    loop {
        let Some(human) = prompt_mark(&mut input, &mut out)? else {
            return Ok(());
        };
        if !play_game(human, &mut input, &mut out)? {
            return Ok(());
        }
        match prompt_replay(&mut input, &mut out)? {
            Some(true) => {}
            Some(false) | None => return Ok(()),
        }
    }
}

/// One game. Returns `false` when stdin closed mid-game.
fn play_game(human: Mark, input: &mut impl BufRead, out: &mut impl Write) -> io::Result<bool> {
    let computer = human.opponent();
    let mut game = GameState::new();
    let mut engine = AlphaBetaEngine::new();
    tracing::debug!(?human, ?computer, "game started");

    while game.status == GameStatus::Playing {
        if game.turn == human {
            render(&game.board, out)?;
            let Some(chosen) = prompt_cell(input, out)? else {
                return Ok(false);
            };
            match game.make_move(chosen) {
                Ok(()) => {}
                Err(MoveError::CellOccupied) => writeln!(out, "That square is taken.")?,
                Err(MoveError::GameOver) => {}
            }
        } else {
            let (chosen, stats) = engine.select_move(&game.board, computer);
            tracing::debug!(cell = chosen.index(), nodes = stats.nodes, "computer move");
            match game.make_move(chosen) {
                Ok(()) => writeln!(out, "Computer plays {}.", chosen.index() + 1)?,
                Err(err) => unreachable!("engine move rejected: {err:?}"),
            }
        }
    }

    render(&game.board, out)?;
    announce(game.status, human, out)?;
    Ok(true)
}

fn prompt_mark(input: &mut impl BufRead, out: &mut impl Write) -> io::Result<Option<Mark>> {
    loop {
        write!(out, "Choose your symbol (X/O): ")?;
        out.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        match line.trim().to_ascii_uppercase().as_str() {
            "X" => return Ok(Some(Mark::X)),
            "O" => return Ok(Some(Mark::O)),
            _ => writeln!(out, "Enter X or O.")?,
        }
    }
}

fn prompt_cell(input: &mut impl BufRead, out: &mut impl Write) -> io::Result<Option<Cell>> {
    loop {
        write!(out, "Your move (1-9): ")?;
        out.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let chosen = line
            .trim()
            .parse::<usize>()
            .ok()
            .filter(|&n| n >= 1)
            .and_then(|n| Cell::new(n - 1));
        match chosen {
            Some(chosen) => return Ok(Some(chosen)),
            None => writeln!(out, "Enter a number from 1 to 9.")?,
        }
    }
}

fn prompt_replay(input: &mut impl BufRead, out: &mut impl Write) -> io::Result<Option<bool>> {
    loop {
        write!(out, "Play again? (y/n): ")?;
        out.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        match line.trim().to_ascii_lowercase().as_str() {
            "y" | "yes" => return Ok(Some(true)),
            "n" | "no" => return Ok(Some(false)),
            _ => writeln!(out, "Enter y or n.")?,
        }
    }
}

/// Prints the grid; empty cells show their number.
fn render(board: &Board, out: &mut impl Write) -> io::Result<()> {
    writeln!(out)?;
    for chosen in Cell::all() {
        let symbol = match board.get(chosen) {
            Some(Mark::X) => "X".to_owned(),
            Some(Mark::O) => "O".to_owned(),
            None => (chosen.index() + 1).to_string(),
        };
        write!(out, " {symbol} ")?;
        if chosen.col() < 2 {
            write!(out, "|")?;
        } else {
            writeln!(out)?;
            if chosen.row() < 2 {
                writeln!(out, "---+---+---")?;
            }
        }
    }
    writeln!(out)
}

fn announce(status: GameStatus, human: Mark, out: &mut impl Write) -> io::Result<()> {
    let message = match status {
        GameStatus::Won(mark) if mark == human => "You win!",
        GameStatus::Won(_) => "Computer wins!",
        GameStatus::Draw => "It's a draw!",
        GameStatus::Playing => return Ok(()),
    };
    writeln!(out, "{message}")
}
