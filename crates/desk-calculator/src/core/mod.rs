//! Calculator core: operands, operators and the entry state machine
//!
//! Nothing in here performs I/O or reads a clock. Every operation is total:
//! malformed input is a silent no-op and arithmetic faults move the state
//! into the error display instead of returning `Err`.

pub mod format;
pub mod operand;
mod operations;
pub mod state;

pub use format::{DisplayLocale, DisplaySnapshot};
pub use operand::Operand;
pub use operations::{ArithmeticRules, ModuloByZero, Operator, UnaryFunction};
pub use state::{CalculatorState, EntryToken, Transition};

use thiserror::Error;

/// Result type for fallible arithmetic
pub type CalcResult<T> = Result<T, CalcError>;

/// Faults that put the calculator into its error display.
///
/// The `Display` text is the message shown next to the error sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CalcError {
    /// Division, modulo or reciprocal with a zero divisor
    #[error("Cannot divide by zero")]
    DivisionByZero,
    /// Square root of a negative or unparseable operand
    #[error("Invalid input for square root")]
    InvalidSquareRoot,
    /// Fault raised outside the arithmetic rules (caught panic)
    #[error("Something went wrong")]
    Unexpected,
}

impl CalcError {
    /// Message shown alongside the error sentinel
    #[must_use]
    pub fn message(&self) -> String {
        self.to_string()
    }
}
