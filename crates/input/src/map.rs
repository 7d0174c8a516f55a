//! Key mapping from terminal events to game actions.

use crate::types::{GameAction, RotationDirection};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Session flags the mapping depends on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeyContext {
    pub paused: bool,
    pub game_over: bool,
}

impl KeyContext {
    pub fn playing(&self) -> bool {
        !self.paused && !self.game_over
    }
}

/// Map keyboard input to game actions.
///
/// Piece controls are only produced while playing. `P` is always forwarded;
/// `Enter` starts a paused game and resets a finished one.
pub fn handle_key_event(key: KeyEvent, ctx: KeyContext) -> Option<GameAction> {
    if key.kind == KeyEventKind::Release {
        return None;
    }

    match key.code {
        KeyCode::Char('p') | KeyCode::Char('P') => return Some(GameAction::TogglePause),
        KeyCode::Enter => {
            return if ctx.game_over {
                Some(GameAction::Reset)
            } else if ctx.paused {
                Some(GameAction::Start)
            } else {
                None
            };
        }
        _ => {}
    }

    if !ctx.playing() {
        return None;
    }

    match key.code {
        // Movement
        KeyCode::Left => Some(GameAction::MOVE_LEFT),
        KeyCode::Right => Some(GameAction::MOVE_RIGHT),
        KeyCode::Down => Some(GameAction::SoftDrop),

        // Rotation
        KeyCode::Up | KeyCode::Char('x') | KeyCode::Char('X') => {
            Some(GameAction::Rotate(RotationDirection::Cw))
        }
        KeyCode::Char('z') | KeyCode::Char('Z') => Some(GameAction::Rotate(RotationDirection::Ccw)),

        // Actions
        KeyCode::Char(' ') => Some(GameAction::HardDrop),
        KeyCode::Char('c') | KeyCode::Char('C') if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(GameAction::Hold)
        }

        _ => None,
    }
}

/// Check if key should quit the game.
pub fn should_quit(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc)
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}
