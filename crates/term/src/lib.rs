//! Terminal "game renderer" module.
//!
//! A small, game-oriented rendering layer for terminal play. It avoids
//! widget toolkits and renders a [`GameSnapshot`](crate::core::GameSnapshot)
//! into a framebuffer that is diffed and flushed to the terminal.
//!
//! - [`fb`]: styled character framebuffer
//! - [`game_view`]: pure snapshot to framebuffer mapping (2 columns per cell)
//! - [`renderer`]: raw-mode terminal setup and diff encoding

pub mod fb;
pub mod game_view;
pub mod renderer;

pub use blockfall_core as core;
pub use blockfall_types as types;

pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use game_view::{AnchorY, GameView, Viewport};
pub use renderer::TerminalRenderer;
