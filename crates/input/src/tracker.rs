//! Held-key tracker for terminal environments.
//!
//! The board reads held signals, but many terminals only report presses and
//! auto-repeats. Without release events a signal is released once no press or
//! repeat for it has arrived within the release timeout.

use std::time::{Duration, Instant};

use arrayvec::ArrayVec;
use crossterm::event::{KeyEvent, KeyEventKind};

use crate::map::{handle_key_event, KeyAction};
use crate::types::{Command, InputSource, InputState, Signal};

// Covers the gap between a press and the terminal's first auto-repeat.
const DEFAULT_KEY_RELEASE_TIMEOUT_MS: u64 = 550;

const MAX_PENDING_COMMANDS: usize = 8;

const NUM_SIGNALS: usize = Signal::ALL.len();

/// Tracks which signals are held and buffers one-shot commands.
#[derive(Debug, Clone)]
pub struct KeyTracker {
    held: InputState,
    last_seen: [Option<Instant>; NUM_SIGNALS],
    commands: ArrayVec<Command, MAX_PENDING_COMMANDS>,
    key_release_timeout: Duration,
    release_events: bool,
}

impl KeyTracker {
    pub fn new() -> Self {
        Self {
            held: InputState::new(),
            last_seen: [None; NUM_SIGNALS],
            commands: ArrayVec::new(),
            key_release_timeout: Duration::from_millis(DEFAULT_KEY_RELEASE_TIMEOUT_MS),
            release_events: false,
        }
    }

    pub fn with_key_release_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.key_release_timeout = Duration::from_millis(timeout_ms);
        self
    }

    /// Trust release events instead of the timeout
    pub fn with_release_events(mut self, enabled: bool) -> Self {
        self.release_events = enabled;
        self
    }

    pub fn key_release_timeout(&self) -> Duration {
        self.key_release_timeout
    }

    /// Feed one key event observed at `now`
    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) {
        let Some(action) = handle_key_event(key) else {
            return;
        };

        match (action, key.kind) {
            (KeyAction::Hold(signal), KeyEventKind::Press | KeyEventKind::Repeat) => {
                self.press(signal, now);
            }
            (KeyAction::Hold(signal), KeyEventKind::Release) => self.release(signal),
            (KeyAction::Command(command), KeyEventKind::Press) => {
                let _ = self.commands.try_push(command);
            }
            (KeyAction::Command(_), _) => {}
        }
    }

    pub fn press(&mut self, signal: Signal, now: Instant) {
        self.held.press(signal);
        self.last_seen[signal as usize] = Some(now);
    }

    pub fn release(&mut self, signal: Signal) {
        self.held.release(signal);
        self.last_seen[signal as usize] = None;
    }

    /// Release signals whose last press is older than the timeout
    pub fn expire(&mut self, now: Instant) {
        if self.release_events {
            return;
        }
        for signal in Signal::ALL {
            let Some(seen) = self.last_seen[signal as usize] else {
                continue;
            };
            if now.saturating_duration_since(seen) > self.key_release_timeout {
                self.release(signal);
            }
        }
    }

    /// Held signals as of the last `expire`
    pub fn state(&self) -> InputState {
        self.held
    }

    /// Commands received since the last call, in arrival order
    pub fn take_commands(&mut self) -> ArrayVec<Command, MAX_PENDING_COMMANDS> {
        std::mem::take(&mut self.commands)
    }

    pub fn reset(&mut self) {
        self.held.clear();
        self.last_seen = [None; NUM_SIGNALS];
        self.commands.clear();
    }
}

impl Default for KeyTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl InputSource for KeyTracker {
    fn is_down(&self, signal: Signal) -> bool {
        self.held.is_down(signal)
    }
}
