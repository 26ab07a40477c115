//! Keyboard input handling
//!
//! Maps crossterm key events onto keypad actions. Browser-style keys go
//! through [`key_to_action`]; letters the browser never needed become
//! shortcuts for the buttons that only exist on screen.

use crate::core::{Operator, UnaryFunction};
use crate::keypad::{key_to_action, KeypadAction};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// What a key asks the terminal front end to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminalCommand {
    /// Press a calculator button
    Press(KeypadAction),
    /// Quit the application
    Quit,
    /// No binding
    Ignore,
}

/// Input handler that maps key events to commands
#[derive(Debug, Default)]
pub struct InputHandler;

impl InputHandler {
    /// Creates a new input handler
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Maps a key event to a command
    #[must_use]
    pub fn handle_key(&self, event: KeyEvent) -> TerminalCommand {
        let KeyEvent {
            code,
            modifiers,
            kind,
            ..
        } = event;

        if kind == KeyEventKind::Release {
            return TerminalCommand::Ignore;
        }

        if modifiers.contains(KeyModifiers::CONTROL) {
            return match code {
                KeyCode::Char('c' | 'q') => TerminalCommand::Quit,
                _ => TerminalCommand::Ignore,
            };
        }

        let action = match code {
            KeyCode::Char('q') => return TerminalCommand::Quit,
            KeyCode::Char(c) => Self::shortcut(c).or_else(|| {
                let mut buf = [0u8; 4];
                key_to_action(c.encode_utf8(&mut buf))
            }),
            other => key_name(other).and_then(key_to_action),
        };

        action.map_or(TerminalCommand::Ignore, TerminalCommand::Press)
    }

    /// Letter shortcut for an on-screen-only button
    #[must_use]
    pub const fn shortcut(c: char) -> Option<KeypadAction> {
        match c {
            's' => Some(KeypadAction::Function(UnaryFunction::Square)),
            'r' => Some(KeypadAction::Function(UnaryFunction::SquareRoot)),
            'i' => Some(KeypadAction::Function(UnaryFunction::Reciprocal)),
            'n' => Some(KeypadAction::Function(UnaryFunction::Negate)),
            'm' => Some(KeypadAction::Operator(Operator::Modulo)),
            _ => None,
        }
    }
}

/// Browser key name for a non-character key
#[must_use]
pub const fn key_name(code: KeyCode) -> Option<&'static str> {
    match code {
        KeyCode::Enter => Some("Enter"),
        KeyCode::Esc => Some("Escape"),
        KeyCode::Backspace => Some("Backspace"),
        KeyCode::Delete => Some("Delete"),
        _ => None,
    }
}
