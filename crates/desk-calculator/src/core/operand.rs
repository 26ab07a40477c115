//! Operand storage
//!
//! Typed input stays text until it is evaluated, so `0.` and `007` survive
//! editing. Arithmetic results are kept as numbers and only turned into text
//! when the user edits them or the display asks for it.

use std::fmt;

/// Text rendered in place of a number while the error display is up
pub const ERROR_SENTINEL: &str = "Error";

/// Value held in the current-operand slot
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// Text typed by the user (possibly empty)
    Raw(String),
    /// Result of an operation
    Computed(f64),
    /// Error sentinel
    Error,
}

impl Default for Operand {
    fn default() -> Self {
        Self::Raw(String::new())
    }
}

impl Operand {
    /// Returns the textual representation
    #[must_use]
    pub fn text(&self) -> String {
        match self {
            Self::Raw(text) => text.clone(),
            Self::Computed(value) => number_to_text(*value),
            Self::Error => ERROR_SENTINEL.to_string(),
        }
    }

    /// Parses the operand; `None` when it has no numeric prefix
    #[must_use]
    pub fn value(&self) -> Option<f64> {
        match self {
            Self::Raw(text) => parse_leading_float(text),
            Self::Computed(value) if value.is_nan() => None,
            Self::Computed(value) => Some(*value),
            Self::Error => None,
        }
    }

    /// True only for empty typed text
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Raw(text) if text.is_empty())
    }

    /// True for the error sentinel
    #[must_use]
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error)
    }

    /// True when the text already contains a decimal point
    #[must_use]
    pub fn has_decimal_point(&self) -> bool {
        self.text().contains('.')
    }

    /// Appends a character to the text, turning the operand into raw text
    #[must_use]
    pub fn pushed(&self, ch: char) -> Self {
        let mut text = self.text();
        text.push(ch);
        Self::Raw(text)
    }

    /// Drops the last character of the text
    #[must_use]
    pub fn popped(&self) -> Self {
        let mut text = self.text();
        text.pop();
        Self::Raw(text)
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text())
    }
}

/// Parses the longest numeric prefix of `text`.
///
/// Accepts an optional sign, digits with at most one `.`, an optional
/// exponent and `Infinity`. Trailing garbage is ignored; text without any
/// digit before the garbage yields `None`.
#[must_use]
pub fn parse_leading_float(text: &str) -> Option<f64> {
    let s = text.trim_start();
    let bytes = s.as_bytes();

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    if s[end..].starts_with("Infinity") {
        return Some(if s.starts_with('-') {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        });
    }

    let int_digits = count_digits(&bytes[end..]);
    end += int_digits;

    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = count_digits(&bytes[end + 1..]);
        end += 1 + frac_digits;
    }
    if int_digits + frac_digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits = count_digits(&bytes[exp_end..]);
        if exp_digits > 0 {
            end = exp_end + exp_digits;
        }
    }

    s[..end].parse::<f64>().ok()
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}

/// Shortest text for a computed value.
///
/// Very large and very small magnitudes switch to exponent form
/// (`1.5e+21`, `1e-7`); negative zero prints as `0`.
#[must_use]
pub fn number_to_text(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }

    let magnitude = value.abs();
    if (1e-6..1e21).contains(&magnitude) {
        return format!("{value}");
    }

    let text = format!("{value:e}");
    match text.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{mantissa}e+{exponent}")
        }
        _ => text,
    }
}
