//! Calculator controller
//!
//! Owns the state machine, the auto-clear timer and the two display sinks.
//! Every entry point applies one event, schedules a clear if the event
//! faulted, and pushes the new projection to both sinks.

use crate::clock::{Clock, SystemClock};
use crate::config::{AutoClearPolicy, CalculatorConfig};
use crate::core::{
    CalcError, CalculatorState, DisplaySnapshot, EntryToken, Operator, Transition, UnaryFunction,
};
use crate::display::DisplaySink;
use crate::keypad::KeypadAction;
use crate::timer::AutoClearTimer;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Calculator with injected display sinks and clock
pub struct Calculator {
    state: CalculatorState,
    config: CalculatorConfig,
    timer: AutoClearTimer,
    clock: Box<dyn Clock>,
    previous_sink: Box<dyn DisplaySink>,
    current_sink: Box<dyn DisplaySink>,
}

impl fmt::Debug for Calculator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Calculator")
            .field("state", &self.state)
            .field("config", &self.config)
            .field("timer", &self.timer)
            .field("clock", &self.clock)
            .finish_non_exhaustive()
    }
}

impl Calculator {
    /// Creates a calculator with the default configuration and system clock
    pub fn new(
        previous_sink: impl DisplaySink + 'static,
        current_sink: impl DisplaySink + 'static,
    ) -> Self {
        Self::with_config(
            CalculatorConfig::default(),
            SystemClock,
            previous_sink,
            current_sink,
        )
    }

    /// Creates a calculator and renders the initial display
    pub fn with_config(
        config: CalculatorConfig,
        clock: impl Clock + 'static,
        previous_sink: impl DisplaySink + 'static,
        current_sink: impl DisplaySink + 'static,
    ) -> Self {
        let mut calculator = Self {
            state: CalculatorState::with_rules(config.rules()),
            timer: AutoClearTimer::new(config.auto_clear_delay()),
            config,
            clock: Box::new(clock),
            previous_sink: Box::new(previous_sink),
            current_sink: Box::new(current_sink),
        };
        calculator.render();
        calculator
    }

    // ===== Accessors =====

    /// Underlying state machine
    #[must_use]
    pub fn state(&self) -> &CalculatorState {
        &self.state
    }

    /// Effective configuration
    #[must_use]
    pub fn config(&self) -> &CalculatorConfig {
        &self.config
    }

    /// Both display lines as currently rendered
    #[must_use]
    pub fn display(&self) -> DisplaySnapshot {
        self.state.project(&self.config.locale)
    }

    /// Earliest pending auto-clear
    #[must_use]
    pub fn next_auto_clear(&self) -> Option<Instant> {
        self.timer.next_deadline()
    }

    /// Number of scheduled auto-clears
    #[must_use]
    pub fn pending_auto_clears(&self) -> usize {
        self.timer.pending()
    }

    // ===== Entry points =====

    /// Resets the calculator
    pub fn clear(&mut self) -> Transition {
        self.apply(CalculatorState::clear)
    }

    /// Appends a digit or the decimal point
    pub fn append_digit(&mut self, token: EntryToken) -> Transition {
        self.apply(|state| state.append_digit(token))
    }

    /// Deletes the last character of the current operand
    pub fn delete_last_char(&mut self) -> Transition {
        self.apply(CalculatorState::delete_last_char)
    }

    /// Chooses a binary operator
    pub fn choose_operator(&mut self, op: Operator) -> Transition {
        self.apply(|state| state.choose_operator(op))
    }

    /// Computes the pending operation
    pub fn compute(&mut self) -> Transition {
        self.apply(CalculatorState::compute)
    }

    /// Applies any unary function
    pub fn apply_function(&mut self, function: UnaryFunction) -> Transition {
        self.apply(|state| state.apply_function(function))
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

    /// ±x
    pub fn negate(&mut self) -> Transition {
        self.apply_function(UnaryFunction::Negate)
    }

    /// x/100
    pub fn percent(&mut self) -> Transition {
        self.apply_function(UnaryFunction::Percent)
    }

    /// Routes a keypad action.
    ///
    /// A panic while handling the action is caught and shown as
    /// [`CalcError::Unexpected`].
    pub fn dispatch(&mut self, action: KeypadAction) -> Transition {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.route(action)));
        let transition = outcome.unwrap_or_else(|_| {
            let transition = self.state.enter_error_state(CalcError::Unexpected);
            self.after_fault(CalcError::Unexpected);
            if panic::catch_unwind(AssertUnwindSafe(|| self.render())).is_err() {
                error!("display sink failed while showing the error");
            }
            transition
        });
        debug!(?action, ?transition, "dispatched");
        transition
    }

    /// Fires every auto-clear whose deadline has passed.
    ///
    /// Returns true if the display was cleared.
    pub fn poll_auto_clear(&mut self) -> bool {
        let fired = self.timer.take_due(self.clock.now());
        if fired == 0 {
            return false;
        }
        info!(fired, "auto-clear fired");
        self.state.clear();
        self.render();
        true
    }

    // ===== Internals =====

    fn route(&mut self, action: KeypadAction) -> Transition {
        match action {
            KeypadAction::Digit(d) => self.append_digit(EntryToken::Digit(d)),
            KeypadAction::Decimal => self.append_digit(EntryToken::Point),
            KeypadAction::Operator(op) => self.choose_operator(op),
            KeypadAction::Function(function) => self.apply_function(function),
            KeypadAction::Equals => self.compute(),
            KeypadAction::Delete => self.delete_last_char(),
            KeypadAction::Clear => self.clear(),
        }
    }

    fn apply(&mut self, event: impl FnOnce(&mut CalculatorState) -> Transition) -> Transition {
        // Overdue clears belong before this input, whenever the owner polls.
        self.poll_auto_clear();

        let transition = event(&mut self.state);
        if let Some(err) = transition.fault() {
            self.after_fault(err);
        } else if self.config.auto_clear_policy == AutoClearPolicy::CancelOnInput
            && !self.state.is_error()
        {
            // Only input that leaves the error display cancels its clear.
            let dropped = self.timer.cancel();
            if dropped > 0 {
                info!(dropped, "auto-clear cancelled by input");
            }
        }
        self.render();
        transition
    }

    fn after_fault(&mut self, err: CalcError) {
        let deadline = self.timer.arm(self.clock.now());
        warn!(error = %err, delay_ms = self.config.auto_clear_ms, "error displayed");
        debug!(?deadline, pending = self.timer.pending(), "auto-clear scheduled");
    }

    fn render(&mut self) {
        let snapshot = self.display();
        self.previous_sink.show(&snapshot.secondary);
        self.current_sink.show(&snapshot.primary);
    }
}
