//! Binary operators and unary functions
//!
//! Each variant carries its own display glyph and evaluation rule, so there
//! is no lookup table that could miss an entry.

use crate::core::{CalcError, CalcResult};
use serde::{Deserialize, Serialize};

/// What modulo does when the divisor is zero
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModuloByZero {
    /// Same error display as division by zero
    #[default]
    Error,
    /// Return the floating-point remainder (`NaN`)
    Native,
}

impl std::str::FromStr for ModuloByZero {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "error" => Ok(Self::Error),
            "native" => Ok(Self::Native),
            other => Err(format!(
                "unknown modulo-by-zero rule `{other}` (expected error or native)"
            )),
        }
    }
}

/// Arithmetic rules a state machine is created with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ArithmeticRules {
    /// Modulo-by-zero policy
    pub modulo_by_zero: ModuloByZero,
}

/// Binary operator awaiting its second operand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// Addition (+)
    Add,
    /// Subtraction (−)
    Subtract,
    /// Multiplication (×)
    Multiply,
    /// Division (÷)
    Divide,
    /// Remainder (%)
    Modulo,
}

impl Operator {
    /// Every operator, in keypad order
    pub const ALL: [Self; 5] = [
        Self::Add,
        Self::Subtract,
        Self::Multiply,
        Self::Divide,
        Self::Modulo,
    ];

    /// Glyph rendered after the previous operand
    #[must_use]
    pub const fn glyph(&self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Subtract => "\u{2212}",
            Self::Multiply => "\u{00d7}",
            Self::Divide => "\u{00f7}",
            Self::Modulo => "%",
        }
    }

    /// Button `data-action` name
    #[must_use]
    pub const fn action_name(&self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Subtract => "subtract",
            Self::Multiply => "multiply",
            Self::Divide => "divide",
            Self::Modulo => "percentage",
        }
    }

    /// Applies the operator to `prev` and `current`
    pub fn apply(&self, prev: f64, current: f64, rules: ArithmeticRules) -> CalcResult<f64> {
        match self {
            Self::Add => Ok(prev + current),
            Self::Subtract => Ok(prev - current),
            Self::Multiply => Ok(prev * current),
            Self::Divide => {
                if current == 0.0 {
                    return Err(CalcError::DivisionByZero);
                }
                Ok(prev / current)
            }
            Self::Modulo => {
                if current == 0.0 && rules.modulo_by_zero == ModuloByZero::Error {
                    return Err(CalcError::DivisionByZero);
                }
                Ok(prev % current)
            }
        }
    }
}

/// Single-operand function applied to the current operand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryFunction {
    /// x²
    Square,
    /// √x
    SquareRoot,
    /// 1/x
    Reciprocal,
    /// ±x
    Negate,
    /// x/100
    Percent,
}

impl UnaryFunction {
    /// Every function, in keypad order
    pub const ALL: [Self; 5] = [
        Self::Square,
        Self::SquareRoot,
        Self::Reciprocal,
        Self::Negate,
        Self::Percent,
    ];

    /// Button label
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Square => "x\u{00b2}",
            Self::SquareRoot => "\u{221a}",
            Self::Reciprocal => "1/x",
            Self::Negate => "\u{00b1}",
            Self::Percent => "%",
        }
    }

    /// Button `data-action` name
    #[must_use]
    pub const fn action_name(&self) -> &'static str {
        match self {
            Self::Square => "square",
            Self::SquareRoot => "square-root",
            Self::Reciprocal => "inverse",
            Self::Negate => "negate",
            Self::Percent => "percent",
        }
    }

    /// Whether the next digit after this function starts a new number.
    ///
    /// Negate leaves the value editable; every other function does not.
    #[must_use]
    pub const fn starts_fresh_entry(&self) -> bool {
        !matches!(self, Self::Negate)
    }

    /// Evaluates the function on an already parsed operand
    pub fn apply(&self, x: f64) -> CalcResult<f64> {
        match self {
            Self::Square => Ok(x * x),
            Self::SquareRoot => {
                if x < 0.0 {
                    return Err(CalcError::InvalidSquareRoot);
                }
                Ok(x.sqrt())
            }
            Self::Reciprocal => {
                if x == 0.0 {
                    return Err(CalcError::DivisionByZero);
                }
                Ok(1.0 / x)
            }
            Self::Negate => Ok(-x),
            Self::Percent => Ok(x / 100.0),
        }
    }

    /// Error reported when the operand does not parse, if any.
    ///
    /// Square root and reciprocal fault on garbage; the rest ignore it.
    #[must_use]
    pub const fn unparseable_error(&self) -> Option<CalcError> {
        match self {
            Self::SquareRoot => Some(CalcError::InvalidSquareRoot),
            Self::Reciprocal => Some(CalcError::DivisionByZero),
            Self::Square | Self::Negate | Self::Percent => None,
        }
    }
}
