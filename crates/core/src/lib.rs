//! Core game logic - pure, deterministic, and testable
//!
//! This crate holds the rules of the game and nothing else. It has no
//! dependency on rendering, audio or terminal I/O, so the same board runs in
//! the terminal front-end, in tests and in benches.
//!
//! # Module Structure
//!
//! - [`shapes`]: the seven tetrominoes as 4x4 orientation masks plus colors
//! - [`piece`]: a tetromino instance with orientation state and bounds probes
//! - [`board`]: 10x20 grid, collision probes, physics timers, line clearing
//! - [`scoring`]: classic line-clear scoring, level and gravity dwell
//! - [`rng`]: seeded uniform piece selection
//! - [`session`]: a board plus pause state, driven by a fixed-step loop
//! - [`snapshot`]: plain-data view of a game for renderers
//!
//! # Game Rules
//!
//! - **Uniform randomizer**: every kind is equally likely on every draw
//! - **In-place rotation**: no wall kicks; a rotation that does not fit is refused
//! - **Immediate lock**: a piece locks the first time gravity finds it blocked
//! - **Auto-shift**: a held direction moves at once, then every 6 frames
//! - **Scoring**: 40/100/300/1200 times (level + 1); one point per soft-drop row
//!
//! # Example
//!
//! ```
//! use blockfall_core::Game;
//! use blockfall_core::types::{InputState, Signal, PHYSICS_STEP};
//!
//! let mut game = Game::with_seed(12345);
//! let input = InputState::with(&[Signal::SoftDrop]);
//!
//! for n in 1..=4 {
//!     game.tick(&input, n as f64 * PHYSICS_STEP, PHYSICS_STEP);
//! }
//!
//! // Soft drop moves one row every two frames and scores each row.
//! assert_eq!(game.board().position().y, 2);
//! assert_eq!(game.board().score(), 2);
//! ```
//!
//! # Timing
//!
//! Time is in seconds as `f64`. Physics runs at a fixed step of 1/60 s;
//! [`Board::update`] may run more often than physics without changing state.

pub use blockfall_types as types;

pub mod board;
pub mod piece;
pub mod rng;
pub mod scoring;
pub mod session;
pub mod shapes;
pub mod snapshot;

pub use board::{Board, Position};
pub use piece::Piece;
pub use rng::SimpleRng;
pub use session::{Game, GameStatus};
pub use shapes::{Mask, ShapeDef, SHAPES};
pub use snapshot::{ActiveSnapshot, GameSnapshot, Grid};
