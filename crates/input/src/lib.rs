//! Terminal input module (engine-facing).
//!
//! Maps `crossterm` key events onto the held [`Signal`](crate::types::Signal)s
//! the board samples every physics tick, plus one-shot
//! [`Command`](crate::types::Command)s for the session. [`KeyTracker`] keeps
//! signals held between events, including on terminals without key-release
//! events.

pub mod map;
pub mod tracker;

pub use blockfall_types as types;

pub use map::{handle_key_event, map_key, should_quit, KeyAction};
pub use tracker::KeyTracker;
