//! Terminal application state

use super::input::{InputHandler, TerminalCommand};
use crate::calculator::Calculator;
use crate::clock::SystemClock;
use crate::config::CalculatorConfig;
use crate::core::Transition;
use crate::display::NullSink;
use crossterm::event::KeyEvent;

/// Calculator plus the key mapping and quit flag of the terminal front end
#[derive(Debug)]
pub struct TerminalApp {
    calculator: Calculator,
    input: InputHandler,
    should_quit: bool,
}

impl TerminalApp {
    /// Creates an app with a headless calculator
    #[must_use]
    pub fn new(config: CalculatorConfig) -> Self {
        Self::with_calculator(Calculator::with_config(
            config,
            SystemClock,
            NullSink,
            NullSink,
        ))
    }

    /// Wraps an existing calculator
    #[must_use]
    pub fn with_calculator(calculator: Calculator) -> Self {
        Self {
            calculator,
            input: InputHandler::new(),
            should_quit: false,
        }
    }

    /// Returns the calculator
    #[must_use]
    pub fn calculator(&self) -> &Calculator {
        &self.calculator
    }

    /// Returns the calculator mutably
    pub fn calculator_mut(&mut self) -> &mut Calculator {
        &mut self.calculator
    }

    /// Consumes the app, returning the calculator
    #[must_use]
    pub fn into_calculator(self) -> Calculator {
        self.calculator
    }

    /// Returns whether the app should quit
    #[must_use]
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Applies a command; returns the transition if a button was pressed
    pub fn handle_command(&mut self, command: TerminalCommand) -> Option<Transition> {
        match command {
            TerminalCommand::Press(action) => Some(self.calculator.dispatch(action)),
            TerminalCommand::Quit => {
                self.should_quit = true;
                None
            }
            TerminalCommand::Ignore => None,
        }
    }

    /// Maps and applies a key event
    pub fn handle_key(&mut self, event: KeyEvent) -> Option<Transition> {
        let command = self.input.handle_key(event);
        self.handle_command(command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::CalcError;
    use crossterm::event::{KeyCode, KeyModifiers};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_keys(app: &mut TerminalApp, keys: &str) {
        for c in keys.chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
    }

    #[test]
    fn test_new_app_shows_zero() {
        let app = TerminalApp::new(CalculatorConfig::default());
        assert_eq!(app.calculator().display().primary, "0");
        assert!(!app.should_quit());
    }

    #[test]
    fn test_typed_calculation() {
        let mut app = TerminalApp::new(CalculatorConfig::default());
        type_keys(&mut app, "12*3");
        assert_eq!(app.handle_key(key(KeyCode::Enter)), Some(Transition::Changed));
        assert_eq!(app.calculator().display().primary, "36");
    }

    #[test]
    fn test_shortcut_functions() {
        let mut app = TerminalApp::new(CalculatorConfig::default());
        type_keys(&mut app, "9r");
        assert_eq!(app.calculator().display().primary, "3");
        type_keys(&mut app, "s");
        assert_eq!(app.calculator().display().primary, "9");
        type_keys(&mut app, "n");
        assert_eq!(app.calculator().display().primary, "-9");
    }

    #[test]
    fn test_modulo_shortcut() {
        let mut app = TerminalApp::new(CalculatorConfig::default());
        type_keys(&mut app, "17m5=");
        assert_eq!(app.calculator().display().primary, "2");
    }

    #[test]
    fn test_error_via_keys() {
        let mut app = TerminalApp::new(CalculatorConfig::default());
        type_keys(&mut app, "0");
        assert_eq!(
            app.handle_key(key(KeyCode::Char('i'))),
            Some(Transition::Faulted(CalcError::DivisionByZero))
        );
        assert_eq!(app.calculator().display().secondary, "Cannot divide by zero");
        app.handle_key(key(KeyCode::Esc));
        assert_eq!(app.calculator().display().primary, "0");
    }

    #[test]
    fn test_quit_and_ignore() {
        let mut app = TerminalApp::new(CalculatorConfig::default());
        assert_eq!(app.handle_key(key(KeyCode::Tab)), None);
        assert!(!app.should_quit());
        assert_eq!(app.handle_key(key(KeyCode::Char('q'))), None);
        assert!(app.should_quit());
    }

    #[test]
    fn test_into_calculator() {
        let mut app = TerminalApp::new(CalculatorConfig::default());
        type_keys(&mut app, "5");
        let calc = app.into_calculator();
        assert_eq!(calc.display().primary, "5");
    }
}
