//! Desk Calculator - keypad-driven arithmetic
//!
//! A basic calculator as found on a desk or phone: digits are typed into a
//! current operand, a binary operator moves it to the previous operand, and
//! `=` folds the two. Unary functions act on the current operand in place.
//!
//! # Layers
//!
//! - **[`core`]**: the entry state machine and display projection, with no
//!   I/O and no clock
//! - **[`Calculator`]**: the controller; injects display sinks and a clock
//!   and schedules the auto-clear after an error
//! - **[`keypad`]**: button ids, `data-action` names and keyboard keys
//! - **[`session`]**: a tokio loop feeding events into a controller
//! - **`terminal`**: the crossterm front end (feature `tui`)
//!
//! # Example
//!
//! ```rust
//! use desk_calculator::prelude::*;
//!
//! let display = SharedText::new();
//! let mut calc = Calculator::new(NullSink, display.clone());
//!
//! for action in [
//!     KeypadAction::Digit(5),
//!     KeypadAction::Operator(Operator::Add),
//!     KeypadAction::Digit(3),
//!     KeypadAction::Operator(Operator::Add),
//!     KeypadAction::Digit(2),
//!     KeypadAction::Equals,
//! ] {
//!     calc.dispatch(action);
//! }
//! assert_eq!(display.get(), "10");
//!
//! // Errors replace the value until cleared
//! calc.append_digit(EntryToken::Digit(0));
//! calc.reciprocal();
//! assert_eq!(calc.display().primary, "Error");
//! assert_eq!(calc.display().secondary, "Cannot divide by zero");
//! ```

// Allow common test patterns
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::float_cmp
    )
)]
#![deny(missing_docs)]
#![deny(missing_debug_implementations)]

pub mod calculator;
pub mod cli;
pub mod clock;
pub mod config;
pub mod core;
pub mod display;
pub mod driver;
pub mod error;
pub mod keypad;
pub mod logging;
pub mod session;
pub mod timer;

#[cfg(feature = "tui")]
pub mod terminal;

pub use calculator::Calculator;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::calculator::Calculator;
    pub use crate::clock::{Clock, ManualClock, SystemClock, TokioClock};
    pub use crate::config::{AutoClearPolicy, CalculatorConfig, Verbosity};
    pub use crate::logging::LogFormat;
    pub use crate::core::{
        CalcError, CalculatorState, DisplayLocale, DisplaySnapshot, EntryToken, ModuloByZero,
        Operand, Operator, Transition, UnaryFunction,
    };
    pub use crate::display::{DisplaySink, NullSink, SharedText};
    pub use crate::driver::CalculatorDriver;
    pub use crate::error::{AppError, AppResult};
    pub use crate::keypad::{key_to_action, Keypad, KeypadAction};
    pub use crate::session::{Session, SessionEvent};
}
