//! Unified calculator driver
//!
//! Write the behaviour checks once, run them against every front end: the
//! bare controller and the terminal app both implement [`CalculatorDriver`].

use crate::calculator::Calculator;
use crate::core::{DisplaySnapshot, Transition, UnaryFunction};
use crate::keypad::{key_to_action, KeypadAction};

/// Abstract driver for calculator interactions
///
/// # Example
///
/// ```rust
/// use desk_calculator::display::NullSink;
/// use desk_calculator::driver::{verify_chained_operations, CalculatorDriver};
/// use desk_calculator::Calculator;
///
/// let mut calc = Calculator::new(NullSink, NullSink);
/// calc.press_keys("6*7=");
/// assert_eq!(calc.result(), "42");
/// verify_chained_operations(&mut calc);
/// ```
pub trait CalculatorDriver {
    /// Presses one keypad button
    fn press(&mut self, action: KeypadAction) -> Transition;

    /// Both display lines
    fn display(&self) -> DisplaySnapshot;

    /// Types keyboard keys, one character each; unbound keys are ignored
    fn press_keys(&mut self, keys: &str) {
        let mut buf = [0u8; 4];
        for ch in keys.chars() {
            if let Some(action) = key_to_action(ch.encode_utf8(&mut buf)) {
                self.press(action);
            }
        }
    }

    /// Primary display line
    fn result(&self) -> String {
        self.display().primary
    }

    /// Secondary display line
    fn expression(&self) -> String {
        self.display().secondary
    }

    /// Resets the calculator
    fn clear(&mut self) {
        self.press(KeypadAction::Clear);
    }
}

impl CalculatorDriver for Calculator {
    fn press(&mut self, action: KeypadAction) -> Transition {
        self.dispatch(action)
    }

    fn display(&self) -> DisplaySnapshot {
        Calculator::display(self)
    }
}

#[cfg(feature = "tui")]
impl CalculatorDriver for crate::terminal::TerminalApp {
    fn press(&mut self, action: KeypadAction) -> Transition {
        self.calculator_mut().dispatch(action)
    }

    fn display(&self) -> DisplaySnapshot {
        self.calculator().display()
    }
}

fn press_function<D: CalculatorDriver>(driver: &mut D, function: UnaryFunction) {
    driver.press(KeypadAction::Function(function));
}

// ===== Unified Checks =====
// These work with ANY CalculatorDriver implementation

/// Verifies the four basic operators
pub fn verify_basic_arithmetic<D: CalculatorDriver>(driver: &mut D) {
    driver.clear();
    driver.press_keys("2+3=");
    assert_eq!(driver.result(), "5");

    driver.clear();
    driver.press_keys("10-4=");
    assert_eq!(driver.result(), "6");

    driver.clear();
    driver.press_keys("6*7=");
    assert_eq!(driver.result(), "42");

    driver.clear();
    driver.press_keys("20/4=");
    assert_eq!(driver.result(), "5");
    driver.clear();
}

/// Verifies that choosing an operator folds the pending one
pub fn verify_chained_operations<D: CalculatorDriver>(driver: &mut D) {
    driver.clear();
    driver.press_keys("5+3+");
    assert_eq!(driver.expression(), "8 +");
    driver.press_keys("2=");
    assert_eq!(driver.result(), "10");

    driver.clear();
    driver.press_keys("2*3-1=");
    assert_eq!(driver.result(), "5");
    driver.clear();
}

/// Verifies the error display
pub fn verify_error_handling<D: CalculatorDriver>(driver: &mut D) {
    driver.clear();
    driver.press_keys("1/0=");
    assert_eq!(driver.result(), "Error");
    assert_eq!(driver.expression(), "Cannot divide by zero");

    driver.clear();
    driver.press_keys("4");
    press_function(driver, UnaryFunction::Negate);
    press_function(driver, UnaryFunction::SquareRoot);
    assert_eq!(driver.result(), "Error");
    assert_eq!(driver.expression(), "Invalid input for square root");

    driver.clear();
    driver.press_keys("0");
    press_function(driver, UnaryFunction::Reciprocal);
    assert_eq!(driver.expression(), "Cannot divide by zero");
    driver.clear();
}

/// Verifies the unary functions
pub fn verify_unary_functions<D: CalculatorDriver>(driver: &mut D) {
    driver.clear();
    driver.press_keys("4");
    press_function(driver, UnaryFunction::SquareRoot);
    assert_eq!(driver.result(), "2");

    driver.clear();
    driver.press_keys("50%");
    assert_eq!(driver.result(), "0.5");

    driver.clear();
    driver.press_keys("3");
    press_function(driver, UnaryFunction::Square);
    assert_eq!(driver.result(), "9");

    driver.clear();
    driver.press_keys("4");
    press_function(driver, UnaryFunction::Reciprocal);
    assert_eq!(driver.result(), "0.25");

    // Digits after a function start a new number
    driver.press_keys("7");
    assert_eq!(driver.result(), "7");
    driver.clear();
}

/// Verifies that a negated value stays editable
pub fn verify_negate_edit<D: CalculatorDriver>(driver: &mut D) {
    driver.clear();
    driver.press_keys("5");
    press_function(driver, UnaryFunction::Negate);
    assert_eq!(driver.result(), "-5");
    driver.press_keys("3");
    assert_eq!(driver.result(), "-53");
    driver.clear();
}

/// Verifies digit entry, deletion and no-op equals
pub fn verify_entry_rules<D: CalculatorDriver>(driver: &mut D) {
    driver.clear();
    driver.press_keys("1..2");
    assert_eq!(driver.result(), "1.2");

    driver.clear();
    driver.press_keys("123");
    driver.press(KeypadAction::Delete);
    assert_eq!(driver.result(), "12");

    let before = driver.display();
    assert_eq!(driver.press(KeypadAction::Equals), Transition::Unchanged);
    assert_eq!(driver.display(), before);
    driver.clear();
}

/// Verifies digit grouping on both lines
pub fn verify_formatting<D: CalculatorDriver>(driver: &mut D) {
    driver.clear();
    driver.press_keys("1234567");
    assert_eq!(driver.result(), "1,234,567");

    driver.clear();
    driver.press_keys("1234.5");
    assert_eq!(driver.result(), "1,234.5");

    driver.press_keys("+");
    assert_eq!(driver.expression(), "1,234.5 +");
    assert_eq!(driver.result(), "0");
    driver.clear();
}

/// Runs every check
pub fn run_full_suite<D: CalculatorDriver>(driver: &mut D) {
    verify_basic_arithmetic(driver);
    verify_chained_operations(driver);
    verify_error_handling(driver);
    verify_unary_functions(driver);
    verify_negate_edit(driver);
    verify_entry_rules(driver);
    verify_formatting(driver);
}
