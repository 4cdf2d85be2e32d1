//! Game session - a board plus the pause state the front-end toggles
//!
//! `Game::tick` is the fixed-rate entry point: one physics step followed by
//! the per-frame update. Commands arrive as edge-triggered [`Command`]s,
//! separate from the held [`Signal`](crate::types::Signal)s the board reads.

use log::debug;

use crate::board::Board;
use crate::snapshot::GameSnapshot;
use crate::types::{Command, InputSource, Timing};

/// What the front-end should show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameStatus {
    Playing,
    Paused,
    GameOver,
}

impl GameStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameStatus::Playing => "playing",
            GameStatus::Paused => "paused",
            GameStatus::GameOver => "game_over",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Game {
    board: Board,
    paused: bool,
}

impl Game {
    /// Create a game seeded from the wall clock
    pub fn new() -> Self {
        Self::from_board(Board::new())
    }

    pub fn with_seed(seed: u32) -> Self {
        Self::from_board(Board::with_seed(seed))
    }

    pub fn from_board(board: Board) -> Self {
        Self {
            board,
            paused: false,
        }
    }

    /// Replace the rule timers of the owned board
    pub fn with_timing(self, timing: Timing) -> Self {
        Self {
            board: self.board.with_timing(timing),
            paused: self.paused,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    pub fn status(&self) -> GameStatus {
        if self.board.is_game_over() {
            GameStatus::GameOver
        } else if self.paused {
            GameStatus::Paused
        } else {
            GameStatus::Playing
        }
    }

    /// One fixed step at sim time `t`; returns whether the board advanced
    ///
    /// A paused game does nothing, except that a paused game which is over
    /// drops its pause so the game-over state is what gets shown.
    pub fn tick<I: InputSource + ?Sized>(&mut self, input: &I, t: f64, dt: f64) -> bool {
        if self.paused {
            if self.board.is_game_over() {
                self.paused = false;
            }
            return false;
        }

        self.board.physics(input, t, dt);
        self.board.update();
        !self.board.is_game_over()
    }

    /// Apply a front-end command
    pub fn apply(&mut self, command: Command) {
        match command {
            Command::TogglePause => {
                self.paused = !self.paused;
                debug!("{}", if self.paused { "paused" } else { "resumed" });
            }
            Command::Restart => self.restart(),
        }
    }

    /// Reset the board and unpause
    pub fn restart(&mut self) {
        self.board.reset();
        self.paused = false;
    }

    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        out.capture(&self.board, self.paused);
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut s = GameSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{InputState, Signal, PHYSICS_STEP};

    fn force_game_over(game: &mut Game) {
        let board = game.board_mut();
        for x in 3..9 {
            for y in 0..4 {
                board.set_state(x, y, 1);
            }
        }
        board.new_tetromino();
        assert!(board.is_game_over());
    }

    #[test]
    fn new_game_is_playing() {
        let game = Game::with_seed(8);
        assert_eq!(game.status(), GameStatus::Playing);
        assert!(!game.paused());
    }

    #[test]
    fn paused_game_does_not_advance() {
        let mut game = Game::with_seed(8);
        game.apply(Command::TogglePause);
        assert_eq!(game.status(), GameStatus::Paused);

        let input = InputState::with(&[Signal::SoftDrop]);
        for n in 1..30 {
            assert!(!game.tick(&input, n as f64 * PHYSICS_STEP, PHYSICS_STEP));
        }
        assert_eq!(game.board().position().y, 0);
        assert_eq!(game.board().score(), 0);

        game.apply(Command::TogglePause);
        assert_eq!(game.status(), GameStatus::Playing);
        for n in 30..34 {
            game.tick(&input, n as f64 * PHYSICS_STEP, PHYSICS_STEP);
        }
        assert_eq!(game.board().position().y, 2);
    }

    #[test]
    fn tick_stamps_active_piece() {
        let mut game = Game::with_seed(8);
        assert!(game.tick(&InputState::new(), PHYSICS_STEP, PHYSICS_STEP));
        let stamped = game
            .board()
            .cells()
            .iter()
            .filter(|&&c| c != crate::types::EMPTY)
            .count();
        assert_eq!(stamped, 4);
    }

    #[test]
    fn paused_game_over_unpauses() {
        let mut game = Game::with_seed(8);
        force_game_over(&mut game);
        game.apply(Command::TogglePause);
        assert!(game.paused());
        assert_eq!(game.status(), GameStatus::GameOver);

        game.tick(&InputState::new(), PHYSICS_STEP, PHYSICS_STEP);
        assert!(!game.paused());
        assert_eq!(game.status(), GameStatus::GameOver);
    }

    #[test]
    fn restart_resets_board_and_pause() {
        let mut game = Game::with_seed(8);
        force_game_over(&mut game);
        game.apply(Command::TogglePause);
        game.apply(Command::Restart);

        assert_eq!(game.status(), GameStatus::Playing);
        assert!(!game.board().is_game_over());
        assert!(game
            .board()
            .cells()
            .iter()
            .all(|&c| c == crate::types::EMPTY));
    }

    #[test]
    fn snapshot_reflects_pause() {
        let mut game = Game::with_seed(8);
        game.apply(Command::TogglePause);
        let snap = game.snapshot();
        assert!(snap.paused);
        assert!(!snap.playable());
    }
}
