//! Entry state machine
//!
//! States: idle/entry, operator pending, error displayed. Every input event
//! is applied to completion and reports a [`Transition`]; the owner decides
//! what to do about faults (the controller schedules the auto-clear).

use crate::core::format::{DisplayLocale, DisplaySnapshot};
use crate::core::operand::{parse_leading_float, Operand, ERROR_SENTINEL};
use crate::core::operations::{ArithmeticRules, Operator, UnaryFunction};
use crate::core::CalcError;

/// Token accepted by [`CalculatorState::append_digit`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryToken {
    /// A decimal digit (0-9)
    Digit(u8),
    /// The decimal point
    Point,
}

impl EntryToken {
    /// Character appended to the operand text
    #[must_use]
    pub fn to_char(self) -> Option<char> {
        match self {
            Self::Digit(d) => char::from_digit(u32::from(d), 10),
            Self::Point => Some('.'),
        }
    }
}

impl TryFrom<char> for EntryToken {
    type Error = char;

    fn try_from(ch: char) -> Result<Self, Self::Error> {
        match ch {
            '.' => Ok(Self::Point),
            // to_digit(10) is at most 9
            _ => ch.to_digit(10).map(|d| Self::Digit(d as u8)).ok_or(ch),
        }
    }
}

/// Outcome of applying one event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Input ignored; state untouched
    Unchanged,
    /// State moved
    Changed,
    /// Error display entered
    Faulted(CalcError),
}

impl Transition {
    /// Returns the fault, if any
    #[must_use]
    pub const fn fault(&self) -> Option<CalcError> {
        match self {
            Self::Faulted(err) => Some(*err),
            Self::Unchanged | Self::Changed => None,
        }
    }
}

/// The calculator's only piece of state
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CalculatorState {
    current: Operand,
    previous: String,
    pending: Option<Operator>,
    awaiting_fresh_entry: bool,
    error_message: Option<String>,
    rules: ArithmeticRules,
}

impl CalculatorState {
    /// Creates an idle state with default rules
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an idle state with the given arithmetic rules
    #[must_use]
    pub fn with_rules(rules: ArithmeticRules) -> Self {
        Self {
            rules,
            ..Self::default()
        }
    }

    // ===== Accessors =====

    /// Operand being entered or last computed
    #[must_use]
    pub fn current(&self) -> &Operand {
        &self.current
    }

    /// Operand captured when the operator was chosen (or the error message)
    #[must_use]
    pub fn previous(&self) -> &str {
        &self.previous
    }

    /// Operator waiting for its second operand
    #[must_use]
    pub fn pending_operator(&self) -> Option<Operator> {
        self.pending
    }

    /// Whether the next digit starts a new number
    #[must_use]
    pub fn awaiting_fresh_entry(&self) -> bool {
        self.awaiting_fresh_entry
    }

    /// Message shown next to the error sentinel
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// True while the error sentinel is displayed
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.current.is_error()
    }

    /// Arithmetic rules in effect
    #[must_use]
    pub fn rules(&self) -> ArithmeticRules {
        self.rules
    }

    // ===== Events =====

    /// Resets every field except the rules
    pub fn clear(&mut self) -> Transition {
        *self = Self::with_rules(self.rules);
        Transition::Changed
    }

    /// Appends a digit or the decimal point to the current operand
    pub fn append_digit(&mut self, token: EntryToken) -> Transition {
        let Some(ch) = token.to_char() else {
            return Transition::Unchanged;
        };

        if self.awaiting_fresh_entry {
            self.current = Operand::default();
            self.awaiting_fresh_entry = false;
        }

        if token == EntryToken::Point && self.current.has_decimal_point() {
            return Transition::Unchanged;
        }

        self.current = self.current.pushed(ch);
        Transition::Changed
    }

    /// Removes the last character of the current operand
    pub fn delete_last_char(&mut self) -> Transition {
        if self.current.is_empty() || self.current.is_error() {
            return Transition::Unchanged;
        }
        self.current = self.current.popped();
        Transition::Changed
    }

    /// Selects a binary operator, folding any pending one first
    pub fn choose_operator(&mut self, op: Operator) -> Transition {
        if self.current.is_empty() {
            return Transition::Unchanged;
        }
        if !self.previous.is_empty() {
            if let fault @ Transition::Faulted(_) = self.compute() {
                return fault;
            }
        }
        self.pending = Some(op);
        self.previous = self.current.text();
        self.current = Operand::default();
        Transition::Changed
    }

    /// Applies the pending operator to both operands
    pub fn compute(&mut self) -> Transition {
        let (Some(prev), Some(current)) = (
            parse_leading_float(&self.previous),
            self.current.value(),
        ) else {
            return Transition::Unchanged;
        };
        let Some(op) = self.pending else {
            return Transition::Unchanged;
        };

        match op.apply(prev, current, self.rules) {
            Ok(result) => {
                self.current = Operand::Computed(result);
                self.pending = None;
                self.previous.clear();
                self.awaiting_fresh_entry = true;
                Transition::Changed
            }
            Err(err) => self.enter_error_state(err),
        }
    }

    /// Applies a unary function to the current operand
    pub fn apply_function(&mut self, function: UnaryFunction) -> Transition {
        let Some(x) = self.current.value() else {
            return match function.unparseable_error() {
                Some(err) => self.enter_error_state(err),
                None => Transition::Unchanged,
            };
        };

        match function.apply(x) {
            Ok(result) => {
                self.current = Operand::Computed(result);
                if function.starts_fresh_entry() {
                    self.awaiting_fresh_entry = true;
                }
                Transition::Changed
            }
            Err(err) => self.enter_error_state(err),
        }
    }

    /// x²
    pub fn square(&mut self) -> Transition {
        self.apply_function(UnaryFunction::Square)
    }

    /// √x
    pub fn square_root(&mut self) -> Transition {
        self.apply_function(UnaryFunction::SquareRoot)
    }

    /// 1/x
    pub fn reciprocal(&mut self) -> Transition {
        self.apply_function(UnaryFunction::Reciprocal)
    }

    /// ±x (keeps the value editable)
    pub fn negate(&mut self) -> Transition {
        self.apply_function(UnaryFunction::Negate)
    }

    /// x/100
    pub fn percent(&mut self) -> Transition {
        self.apply_function(UnaryFunction::Percent)
    }

    /// Puts the error sentinel on the display
    pub fn enter_error_state(&mut self, err: CalcError) -> Transition {
        let message = err.message();
        self.current = Operand::Error;
        self.previous.clone_from(&message);
        self.pending = None;
        self.awaiting_fresh_entry = true;
        self.error_message = Some(message);
        Transition::Faulted(err)
    }

    // ===== Projection =====

    /// Derives both display lines
    #[must_use]
    pub fn project(&self, locale: &DisplayLocale) -> DisplaySnapshot {
        if self.is_error() {
            let message = self.error_message.clone().unwrap_or_default();
            return DisplaySnapshot::new(ERROR_SENTINEL, message);
        }

        let mut primary = locale.format_operand(&self.current.text());
        if primary.is_empty() {
            primary.push('0');
        }

        let secondary = match self.pending {
            Some(op) => format!("{} {}", locale.format_operand(&self.previous), op.glyph()),
            None => String::new(),
        };

        DisplaySnapshot { primary, secondary }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::operations::ModuloByZero;

    fn enter(state: &mut CalculatorState, text: &str) {
        for ch in text.chars() {
            let token = EntryToken::try_from(ch).expect("digit or point");
            state.append_digit(token);
        }
    }

    fn current_text(state: &CalculatorState) -> String {
        state.current().text()
    }

    // ===== EntryToken =====

    #[test]
    fn test_entry_token_from_char() {
        assert_eq!(EntryToken::try_from('7'), Ok(EntryToken::Digit(7)));
        assert_eq!(EntryToken::try_from('.'), Ok(EntryToken::Point));
        assert_eq!(EntryToken::try_from('x'), Err('x'));
    }

    #[test]
    fn test_entry_token_out_of_range_digit_ignored() {
        let mut state = CalculatorState::new();
        assert_eq!(state.append_digit(EntryToken::Digit(12)), Transition::Unchanged);
        assert!(state.current().is_empty());
    }

    // ===== Initial state / clear =====

    #[test]
    fn test_new_state_is_idle() {
        let state = CalculatorState::new();
        assert!(state.current().is_empty());
        assert!(state.previous().is_empty());
        assert_eq!(state.pending_operator(), None);
        assert!(!state.awaiting_fresh_entry());
        assert_eq!(state.error_message(), None);
    }

    #[test]
    fn test_clear_resets_everything_but_rules() {
        let rules = ArithmeticRules {
            modulo_by_zero: ModuloByZero::Native,
        };
        let mut state = CalculatorState::with_rules(rules);
        enter(&mut state, "12");
        state.choose_operator(Operator::Add);
        enter(&mut state, "3");
        assert_eq!(state.clear(), Transition::Changed);
        assert_eq!(state, CalculatorState::with_rules(rules));
    }

    // ===== append_digit =====

    #[test]
    fn test_digits_concatenate_as_text() {
        let mut state = CalculatorState::new();
        enter(&mut state, "00700");
        assert_eq!(current_text(&state), "00700");
    }

    #[test]
    fn test_second_point_rejected() {
        let mut state = CalculatorState::new();
        enter(&mut state, "1.");
        assert_eq!(state.append_digit(EntryToken::Point), Transition::Unchanged);
        enter(&mut state, "5");
        assert_eq!(current_text(&state), "1.5");
    }

    #[test]
    fn test_fresh_entry_replaces_result() {
        let mut state = CalculatorState::new();
        enter(&mut state, "5");
        state.choose_operator(Operator::Add);
        enter(&mut state, "3");
        state.compute();
        assert!(state.awaiting_fresh_entry());
        enter(&mut state, "9");
        assert_eq!(current_text(&state), "9");
        assert!(!state.awaiting_fresh_entry());
    }

    #[test]
    fn test_point_after_result_with_fraction_starts_fresh() {
        let mut state = CalculatorState::new();
        enter(&mut state, "50");
        state.percent();
        assert_eq!(state.append_digit(EntryToken::Point), Transition::Changed);
        assert_eq!(current_text(&state), ".");
    }

    // ===== delete_last_char =====

    #[test]
    fn test_delete_last_char() {
        let mut state = CalculatorState::new();
        enter(&mut state, "123");
        state.delete_last_char();
        assert_eq!(current_text(&state), "12");
    }

    #[test]
    fn test_delete_on_empty_is_noop() {
        let mut state = CalculatorState::new();
        let before = state.clone();
        assert_eq!(state.delete_last_char(), Transition::Unchanged);
        assert_eq!(state, before);
    }

    #[test]
    fn test_delete_on_computed_edits_text() {
        let mut state = CalculatorState::new();
        enter(&mut state, "12");
        state.square();
        state.delete_last_char();
        assert_eq!(current_text(&state), "14");
    }

    #[test]
    fn test_delete_on_error_is_noop() {
        let mut state = CalculatorState::new();
        state.enter_error_state(CalcError::DivisionByZero);
        assert_eq!(state.delete_last_char(), Transition::Unchanged);
        assert!(state.is_error());
    }

    // ===== choose_operator =====

    #[test]
    fn test_choose_operator_without_operand_is_noop() {
        let mut state = CalculatorState::new();
        assert_eq!(state.choose_operator(Operator::Add), Transition::Unchanged);
        assert_eq!(state.pending_operator(), None);
    }

    #[test]
    fn test_choose_operator_moves_operand() {
        let mut state = CalculatorState::new();
        enter(&mut state, "42");
        state.choose_operator(Operator::Multiply);
        assert_eq!(state.previous(), "42");
        assert!(state.current().is_empty());
        assert_eq!(state.pending_operator(), Some(Operator::Multiply));
    }

    #[test]
    fn test_operator_chain_folds() {
        let mut state = CalculatorState::new();
        enter(&mut state, "5");
        state.choose_operator(Operator::Add);
        enter(&mut state, "3");
        state.choose_operator(Operator::Add);
        assert_eq!(state.previous(), "8");
        enter(&mut state, "2");
        state.compute();
        assert_eq!(current_text(&state), "10");
    }

    #[test]
    fn test_fold_fault_abandons_operator() {
        let mut state = CalculatorState::new();
        enter(&mut state, "8");
        state.choose_operator(Operator::Divide);
        enter(&mut state, "0");
        assert_eq!(
            state.choose_operator(Operator::Add),
            Transition::Faulted(CalcError::DivisionByZero)
        );
        assert!(state.is_error());
        assert_eq!(state.pending_operator(), None);
    }

    // ===== compute =====

    #[test]
    fn test_compute_without_operator_is_noop() {
        let mut state = CalculatorState::new();
        enter(&mut state, "7");
        let before = state.clone();
        assert_eq!(state.compute(), Transition::Unchanged);
        assert_eq!(state, before);
    }

    #[test]
    fn test_compute_without_second_operand_is_noop() {
        let mut state = CalculatorState::new();
        enter(&mut state, "7");
        state.choose_operator(Operator::Subtract);
        let before = state.clone();
        assert_eq!(state.compute(), Transition::Unchanged);
        assert_eq!(state, before);
    }

    #[test]
    fn test_compute_each_operator() {
        let cases = [
            (Operator::Add, "10"),
            (Operator::Subtract, "6"),
            (Operator::Multiply, "16"),
            (Operator::Divide, "4"),
            (Operator::Modulo, "0"),
        ];
        for (op, expected) in cases {
            let mut state = CalculatorState::new();
            enter(&mut state, "8");
            state.choose_operator(op);
            enter(&mut state, "2");
            assert_eq!(state.compute(), Transition::Changed);
            assert_eq!(current_text(&state), expected, "{op:?}");
            assert!(state.previous().is_empty());
            assert_eq!(state.pending_operator(), None);
        }
    }

    #[test]
    fn test_divide_by_zero_enters_error() {
        let mut state = CalculatorState::new();
        enter(&mut state, "9");
        state.choose_operator(Operator::Divide);
        enter(&mut state, "0");
        assert_eq!(
            state.compute(),
            Transition::Faulted(CalcError::DivisionByZero)
        );
        assert!(state.is_error());
        assert_eq!(current_text(&state), "Error");
        assert_eq!(state.previous(), "Cannot divide by zero");
        assert_eq!(state.error_message(), Some("Cannot divide by zero"));
        assert!(state.awaiting_fresh_entry());
    }

    #[test]
    fn test_modulo_by_zero_native_yields_nan() {
        let mut state = CalculatorState::with_rules(ArithmeticRules {
            modulo_by_zero: ModuloByZero::Native,
        });
        enter(&mut state, "5");
        state.choose_operator(Operator::Modulo);
        enter(&mut state, "0");
        assert_eq!(state.compute(), Transition::Changed);
        assert_eq!(current_text(&state), "NaN");
        assert_eq!(state.current().value(), None);
    }

    #[test]
    fn test_modulo_by_zero_guarded_by_default() {
        let mut state = CalculatorState::new();
        enter(&mut state, "5");
        state.choose_operator(Operator::Modulo);
        enter(&mut state, "0");
        assert_eq!(
            state.compute(),
            Transition::Faulted(CalcError::DivisionByZero)
        );
    }

    // ===== Unary functions =====

    #[test]
    fn test_square() {
        let mut state = CalculatorState::new();
        enter(&mut state, "1.5");
        state.square();
        assert_eq!(current_text(&state), "2.25");
        assert!(state.awaiting_fresh_entry());
    }

    #[test]
    fn test_square_on_empty_is_noop() {
        let mut state = CalculatorState::new();
        assert_eq!(state.square(), Transition::Unchanged);
    }

    #[test]
    fn test_square_root() {
        let mut state = CalculatorState::new();
        enter(&mut state, "4");
        state.square_root();
        assert_eq!(current_text(&state), "2");
        assert!(state.awaiting_fresh_entry());
    }

    #[test]
    fn test_square_root_of_negative() {
        let mut state = CalculatorState::new();
        enter(&mut state, "4");
        state.negate();
        assert_eq!(
            state.square_root(),
            Transition::Faulted(CalcError::InvalidSquareRoot)
        );
        assert_eq!(state.error_message(), Some("Invalid input for square root"));
    }

    #[test]
    fn test_square_root_of_empty_faults() {
        let mut state = CalculatorState::new();
        assert_eq!(
            state.square_root(),
            Transition::Faulted(CalcError::InvalidSquareRoot)
        );
    }

    #[test]
    fn test_reciprocal() {
        let mut state = CalculatorState::new();
        enter(&mut state, "8");
        state.reciprocal();
        assert_eq!(current_text(&state), "0.125");
    }

    #[test]
    fn test_reciprocal_of_zero_and_empty() {
        let mut state = CalculatorState::new();
        enter(&mut state, "0");
        assert_eq!(
            state.reciprocal(),
            Transition::Faulted(CalcError::DivisionByZero)
        );

        let mut empty = CalculatorState::new();
        assert_eq!(
            empty.reciprocal(),
            Transition::Faulted(CalcError::DivisionByZero)
        );
    }

    #[test]
    fn test_negate_keeps_value_editable() {
        let mut state = CalculatorState::new();
        enter(&mut state, "5");
        state.negate();
        assert_eq!(current_text(&state), "-5");
        assert!(!state.awaiting_fresh_entry());
        enter(&mut state, "3");
        assert_eq!(current_text(&state), "-53");
    }

    #[test]
    fn test_negate_on_empty_is_noop() {
        let mut state = CalculatorState::new();
        assert_eq!(state.negate(), Transition::Unchanged);
    }

    #[test]
    fn test_percent() {
        let mut state = CalculatorState::new();
        enter(&mut state, "50");
        state.percent();
        assert_eq!(current_text(&state), "0.5");
        assert!(state.awaiting_fresh_entry());
    }

    // ===== Error state =====

    #[test]
    fn test_digit_after_error_starts_fresh() {
        let mut state = CalculatorState::new();
        state.enter_error_state(CalcError::DivisionByZero);
        enter(&mut state, "7");
        assert_eq!(current_text(&state), "7");
        assert!(!state.is_error());
    }

    #[test]
    fn test_clear_leaves_error_state() {
        let mut state = CalculatorState::new();
        state.enter_error_state(CalcError::InvalidSquareRoot);
        state.clear();
        assert!(!state.is_error());
        assert_eq!(state.error_message(), None);
    }

    // ===== Projection =====

    #[test]
    fn test_project_initial() {
        let state = CalculatorState::new();
        assert_eq!(
            state.project(&DisplayLocale::english()),
            DisplaySnapshot::new("0", "")
        );
    }

    #[test]
    fn test_project_pending_operator() {
        let mut state = CalculatorState::new();
        enter(&mut state, "1234");
        state.choose_operator(Operator::Divide);
        enter(&mut state, "2.50");
        assert_eq!(
            state.project(&DisplayLocale::english()),
            DisplaySnapshot::new("2.50", "1,234 ÷")
        );
    }

    #[test]
    fn test_project_error() {
        let mut state = CalculatorState::new();
        state.enter_error_state(CalcError::DivisionByZero);
        assert_eq!(
            state.project(&DisplayLocale::english()),
            DisplaySnapshot::new("Error", "Cannot divide by zero")
        );
    }

    #[test]
    fn test_project_nan_renders_zero() {
        let mut state = CalculatorState::with_rules(ArithmeticRules {
            modulo_by_zero: ModuloByZero::Native,
        });
        enter(&mut state, "5");
        state.choose_operator(Operator::Modulo);
        enter(&mut state, "0");
        state.compute();
        assert_eq!(state.project(&DisplayLocale::english()).primary, "0");
    }
}
