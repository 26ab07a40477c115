//! Display projection
//!
//! The integer part of an operand is grouped with the locale's thousands
//! separator; whatever follows the first decimal point is copied verbatim so
//! typed decimals are never rounded.

use crate::core::operand::parse_leading_float;
use serde::{Deserialize, Serialize};

/// Separators used when rendering numbers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayLocale {
    /// Inserted between groups of three integer digits
    pub thousands_separator: String,
    /// Rendered in place of `.`
    pub decimal_separator: String,
}

impl Default for DisplayLocale {
    fn default() -> Self {
        Self::english()
    }
}

impl DisplayLocale {
    /// `1,234.5`
    #[must_use]
    pub fn english() -> Self {
        Self {
            thousands_separator: ",".to_string(),
            decimal_separator: ".".to_string(),
        }
    }

    /// Creates a locale with custom separators
    #[must_use]
    pub fn new(thousands_separator: impl Into<String>, decimal_separator: impl Into<String>) -> Self {
        Self {
            thousands_separator: thousands_separator.into(),
            decimal_separator: decimal_separator.into(),
        }
    }

    /// Formats operand text for display.
    ///
    /// Returns an empty string when neither part renders anything.
    #[must_use]
    pub fn format_operand(&self, text: &str) -> String {
        let mut parts = text.split('.');
        let integer_text = parts.next().unwrap_or_default();
        let fraction = parts.next();

        let integer = parse_leading_float(integer_text)
            .map(|value| self.group_integer(value))
            .unwrap_or_default();

        match fraction {
            Some(fraction) => format!("{integer}{}{fraction}", self.decimal_separator),
            None => integer,
        }
    }

    /// Renders a whole number with grouping separators
    #[must_use]
    pub fn group_integer(&self, value: f64) -> String {
        let sign = if value.is_sign_negative() { "-" } else { "" };
        if value.is_infinite() {
            return format!("{sign}\u{221e}");
        }

        let digits = format!("{:.0}", value.abs());
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push_str(&self.thousands_separator);
            }
            grouped.push(ch);
        }
        format!("{sign}{grouped}")
    }
}

/// What the display shows after an event
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DisplaySnapshot {
    /// Current value line
    pub primary: String,
    /// Pending-expression or error-message line
    pub secondary: String,
}

impl DisplaySnapshot {
    /// Creates a snapshot from both lines
    #[must_use]
    pub fn new(primary: impl Into<String>, secondary: impl Into<String>) -> Self {
        Self {
            primary: primary.into(),
            secondary: secondary.into(),
        }
    }
}
