//! Keypad and keyboard mapping
//!
//! Turns button clicks (element ids or `data-action` names) and keyboard key
//! names into [`KeypadAction`]s. Nothing here touches calculator state.

use crate::core::{EntryToken, Operator, UnaryFunction};

/// Everything a button or key can ask the calculator to do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeypadAction {
    /// Append a digit (0-9)
    Digit(u8),
    /// Append the decimal point
    Decimal,
    /// Choose a binary operator
    Operator(Operator),
    /// Apply a unary function
    Function(UnaryFunction),
    /// Compute the pending operation
    Equals,
    /// Delete the last character
    Delete,
    /// Reset everything
    Clear,
}

impl KeypadAction {
    /// Resolves a button `data-action` name.
    ///
    /// `percentage` is the modulo operator button; the percent function is
    /// only reachable from the keyboard.
    #[must_use]
    pub fn from_data_action(name: &str) -> Option<Self> {
        match name {
            "clear" => Some(Self::Clear),
            "delete" => Some(Self::Delete),
            "equals" => Some(Self::Equals),
            _ => Operator::ALL
                .into_iter()
                .find(|op| op.action_name() == name)
                .map(Self::Operator)
                .or_else(|| {
                    UnaryFunction::ALL
                        .into_iter()
                        .filter(|f| *f != UnaryFunction::Percent)
                        .find(|f| f.action_name() == name)
                        .map(Self::Function)
                }),
        }
    }

    /// Resolves a `data-number` value (`0`-`9` or `.`)
    #[must_use]
    pub fn from_data_number(value: &str) -> Option<Self> {
        let mut chars = value.chars();
        let (Some(ch), None) = (chars.next(), chars.next()) else {
            return None;
        };
        EntryToken::try_from(ch).ok().map(Self::from)
    }

    /// Button label
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::Digit(d) => d.to_string(),
            Self::Decimal => ".".to_string(),
            Self::Operator(op) => op.glyph().to_string(),
            Self::Function(f) => f.label().to_string(),
            Self::Equals => "=".to_string(),
            Self::Delete => "DEL".to_string(),
            Self::Clear => "C".to_string(),
        }
    }

    /// Digit or decimal point token, if this action enters one
    #[must_use]
    pub fn entry_token(&self) -> Option<EntryToken> {
        match self {
            Self::Digit(d) => Some(EntryToken::Digit(*d)),
            Self::Decimal => Some(EntryToken::Point),
            _ => None,
        }
    }
}

impl From<EntryToken> for KeypadAction {
    fn from(token: EntryToken) -> Self {
        match token {
            EntryToken::Digit(d) => Self::Digit(d),
            EntryToken::Point => Self::Decimal,
        }
    }
}

/// Maps a keyboard key name (as reported by the browser or terminal) to an
/// action. Keys without a binding return `None`.
#[must_use]
pub fn key_to_action(key: &str) -> Option<KeypadAction> {
    match key {
        "+" => Some(KeypadAction::Operator(Operator::Add)),
        "-" => Some(KeypadAction::Operator(Operator::Subtract)),
        "*" => Some(KeypadAction::Operator(Operator::Multiply)),
        "/" => Some(KeypadAction::Operator(Operator::Divide)),
        "%" => Some(KeypadAction::Function(UnaryFunction::Percent)),
        "Enter" | "=" => Some(KeypadAction::Equals),
        "Escape" => Some(KeypadAction::Clear),
        "Backspace" | "Delete" => Some(KeypadAction::Delete),
        _ => KeypadAction::from_data_number(key),
    }
}

/// A single keypad button
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeypadButtonDef {
    /// The action this button performs
    pub action: KeypadAction,
    /// Element id
    pub id: String,
}

impl KeypadButtonDef {
    /// Creates a button definition, deriving its element id
    #[must_use]
    pub fn new(action: KeypadAction) -> Self {
        let id = match action {
            KeypadAction::Digit(d) => format!("btn-{d}"),
            KeypadAction::Decimal => "btn-decimal".to_string(),
            KeypadAction::Operator(op) => format!("btn-{}", op.action_name()),
            KeypadAction::Function(f) => format!("btn-{}", f.action_name()),
            KeypadAction::Equals => "btn-equals".to_string(),
            KeypadAction::Delete => "btn-delete".to_string(),
            KeypadAction::Clear => "btn-clear".to_string(),
        };
        Self { action, id }
    }

    /// Button label
    #[must_use]
    pub fn label(&self) -> String {
        self.action.label()
    }
}

/// Registry of on-screen buttons
#[derive(Debug, Clone)]
pub struct Keypad {
    buttons: Vec<KeypadButtonDef>,
}

impl Default for Keypad {
    fn default() -> Self {
        Self::standard()
    }
}

impl Keypad {
    /// Every button of the standard calculator face
    #[must_use]
    pub fn standard() -> Self {
        let mut actions = vec![
            KeypadAction::Clear,
            KeypadAction::Delete,
            KeypadAction::Operator(Operator::Modulo),
            KeypadAction::Operator(Operator::Divide),
            KeypadAction::Function(UnaryFunction::Square),
            KeypadAction::Function(UnaryFunction::SquareRoot),
            KeypadAction::Function(UnaryFunction::Reciprocal),
            KeypadAction::Operator(Operator::Multiply),
        ];
        actions.extend((7..=9).map(KeypadAction::Digit));
        actions.push(KeypadAction::Operator(Operator::Subtract));
        actions.extend((4..=6).map(KeypadAction::Digit));
        actions.push(KeypadAction::Operator(Operator::Add));
        actions.extend((1..=3).map(KeypadAction::Digit));
        actions.push(KeypadAction::Equals);
        actions.extend([
            KeypadAction::Function(UnaryFunction::Negate),
            KeypadAction::Digit(0),
            KeypadAction::Decimal,
        ]);

        Self {
            buttons: actions.into_iter().map(KeypadButtonDef::new).collect(),
        }
    }

    /// Returns the number of buttons
    #[must_use]
    pub fn button_count(&self) -> usize {
        self.buttons.len()
    }

    /// Gets all button definitions
    #[must_use]
    pub fn buttons(&self) -> &[KeypadButtonDef] {
        &self.buttons
    }

    /// Finds a button by element id
    #[must_use]
    pub fn find_button_by_id(&self, id: &str) -> Option<&KeypadButtonDef> {
        self.buttons.iter().find(|b| b.id == id)
    }

    /// Resolves a clicked element id to its action
    #[must_use]
    pub fn handle_click(&self, element_id: &str) -> Option<KeypadAction> {
        self.find_button_by_id(element_id).map(|btn| btn.action)
    }
}
