//! Key mapping from terminal events to held signals and commands.

use crate::types::{Command, Signal};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// What a key does: drive a held signal or fire a one-shot command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Hold(Signal),
    Command(Command),
}

/// Map a key code to the signal or command it drives.
pub fn map_key(code: KeyCode) -> Option<KeyAction> {
    match code {
        // Movement
        KeyCode::Left | KeyCode::Char('h' | 'H' | 'a' | 'A') => {
            Some(KeyAction::Hold(Signal::MoveLeft))
        }
        KeyCode::Right | KeyCode::Char('l' | 'L' | 'd' | 'D') => {
            Some(KeyAction::Hold(Signal::MoveRight))
        }
        KeyCode::Down | KeyCode::Char('j' | 'J' | 's' | 'S') => {
            Some(KeyAction::Hold(Signal::SoftDrop))
        }

        // Rotation
        KeyCode::Up | KeyCode::Char('k' | 'K' | 'w' | 'W' | 'r' | 'R') => {
            Some(KeyAction::Hold(Signal::Rotate))
        }

        // Commands
        KeyCode::Char('p' | 'P') => Some(KeyAction::Command(Command::TogglePause)),
        KeyCode::Char('n' | 'N') => Some(KeyAction::Command(Command::Restart)),

        _ => None,
    }
}

/// Map a key event, ignoring anything chorded with Control.
pub fn handle_key_event(key: KeyEvent) -> Option<KeyAction> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return None;
    }
    map_key(key.code)
}

/// Check if key should quit the game.
pub fn should_quit(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q' | 'Q'))
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    fn hold(signal: Signal) -> Option<KeyAction> {
        Some(KeyAction::Hold(signal))
    }

    #[test]
    fn test_movement_keys() {
        for code in [KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('H')] {
            assert_eq!(map_key(code), hold(Signal::MoveLeft));
        }
        for code in [KeyCode::Right, KeyCode::Char('D'), KeyCode::Char('l')] {
            assert_eq!(map_key(code), hold(Signal::MoveRight));
        }
        for code in [KeyCode::Down, KeyCode::Char('s'), KeyCode::Char('J')] {
            assert_eq!(map_key(code), hold(Signal::SoftDrop));
        }
    }

    #[test]
    fn test_rotation_keys() {
        for code in [
            KeyCode::Up,
            KeyCode::Char('w'),
            KeyCode::Char('K'),
            KeyCode::Char('r'),
        ] {
            assert_eq!(map_key(code), hold(Signal::Rotate));
        }
    }

    #[test]
    fn test_command_keys() {
        assert_eq!(
            map_key(KeyCode::Char('p')),
            Some(KeyAction::Command(Command::TogglePause))
        );
        assert_eq!(
            map_key(KeyCode::Char('N')),
            Some(KeyAction::Command(Command::Restart))
        );
        assert_eq!(map_key(KeyCode::Char(' ')), None);
        assert_eq!(map_key(KeyCode::Esc), None);
    }

    #[test]
    fn test_control_chords_are_not_mapped() {
        assert_eq!(
            handle_key_event(KeyEvent::new(KeyCode::Char('a'), KeyModifiers::CONTROL)),
            None
        );
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Char('a'))),
            hold(Signal::MoveLeft)
        );
    }

    #[test]
    fn test_quit_keys() {
        assert!(should_quit(KeyEvent::from(KeyCode::Char('q'))));
        assert!(should_quit(KeyEvent::new(
            KeyCode::Char('c'),
            KeyModifiers::CONTROL
        )));
        assert!(!should_quit(KeyEvent::from(KeyCode::Char('x'))));
        assert!(!should_quit(KeyEvent::from(KeyCode::Char('c'))));
    }
}
