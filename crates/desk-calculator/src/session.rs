//! Event loop driving a [`Calculator`] from a channel
//!
//! Events are handled one at a time. While an auto-clear is pending, the
//! loop races the next event against the earliest deadline, so a clear
//! fires on time even when no key is pressed.

use crate::calculator::Calculator;
use crate::keypad::KeypadAction;
use std::time::Instant;
use tokio::sync::mpsc;
use tracing::{debug, info};

/// Input delivered to a running session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// A button press or key
    Action(KeypadAction),
    /// Stop the loop
    Quit,
}

impl From<KeypadAction> for SessionEvent {
    fn from(action: KeypadAction) -> Self {
        Self::Action(action)
    }
}

/// Single-consumer calculator loop
#[derive(Debug)]
pub struct Session {
    calculator: Calculator,
    events: mpsc::Receiver<SessionEvent>,
}

impl Session {
    /// Creates a session reading from `events`
    #[must_use]
    pub fn new(calculator: Calculator, events: mpsc::Receiver<SessionEvent>) -> Self {
        Self { calculator, events }
    }

    /// Creates a session together with its sender
    #[must_use]
    pub fn channel(calculator: Calculator, capacity: usize) -> (Self, mpsc::Sender<SessionEvent>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self::new(calculator, rx), tx)
    }

    /// Runs until [`SessionEvent::Quit`] or until every sender is dropped.
    ///
    /// Returns the calculator in its final state.
    pub async fn run(mut self) -> Calculator {
        loop {
            let deadline = self.calculator.next_auto_clear();
            let event = tokio::select! {
                event = self.events.recv() => event,
                () = wait_until(deadline) => {
                    self.calculator.poll_auto_clear();
                    continue;
                }
            };

            match event {
                Some(SessionEvent::Action(action)) => {
                    self.calculator.dispatch(action);
                }
                Some(SessionEvent::Quit) => {
                    debug!("quit requested");
                    break;
                }
                None => {
                    debug!("all senders dropped");
                    break;
                }
            }
        }
        info!(display = ?self.calculator.display(), "session ended");
        self.calculator
    }
}

async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(tokio::time::Instant::from_std(deadline)).await,
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::TokioClock;
    use crate::config::{AutoClearPolicy, CalculatorConfig};
    use crate::core::UnaryFunction;
    use crate::display::SharedText;
    use std::time::Duration;

    fn session(config: CalculatorConfig) -> (Session, mpsc::Sender<SessionEvent>, SharedText) {
        let current = SharedText::new();
        let calc = Calculator::with_config(config, TokioClock, SharedText::new(), current.clone());
        let (session, tx) = Session::channel(calc, 16);
        (session, tx, current)
    }

    async fn send_all(tx: &mpsc::Sender<SessionEvent>, actions: &[KeypadAction]) {
        for action in actions {
            tx.send(SessionEvent::Action(*action)).await.unwrap();
        }
    }

    const DIVIDE_BY_ZERO: [KeypadAction; 2] = [
        KeypadAction::Digit(0),
        KeypadAction::Function(UnaryFunction::Reciprocal),
    ];

    #[tokio::test(start_paused = true)]
    async fn test_session_processes_actions_until_quit() {
        let (session, tx, current) = session(CalculatorConfig::default());
        let handle = tokio::spawn(session.run());

        send_all(&tx, &[KeypadAction::Digit(4), KeypadAction::Digit(2)]).await;
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(current.get(), "42");

        tx.send(SessionEvent::Quit).await.unwrap();
        let calc = handle.await.unwrap();
        assert_eq!(calc.display().primary, "42");
    }

    #[tokio::test(start_paused = true)]
    async fn test_session_ends_when_senders_drop() {
        let (session, tx, _current) = session(CalculatorConfig::default());
        send_all(&tx, &[KeypadAction::Digit(7)]).await;
        drop(tx);
        let calc = session.run().await;
        assert_eq!(calc.display().primary, "7");
    }

    #[tokio::test(start_paused = true)]
    async fn test_auto_clear_fires_without_input() {
        let (session, tx, current) = session(CalculatorConfig::default());
        let handle = tokio::spawn(session.run());

        send_all(&tx, &DIVIDE_BY_ZERO).await;
        tokio::time::sleep(Duration::from_millis(1900)).await;
        assert_eq!(current.get(), "Error");

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(current.get(), "0");

        tx.send(SessionEvent::Quit).await.unwrap();
        let calc = handle.await.unwrap();
        assert_eq!(calc.next_auto_clear(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_preserve_policy_wipes_input_after_error() {
        let (session, tx, current) = session(CalculatorConfig::default());
        let handle = tokio::spawn(session.run());

        send_all(&tx, &DIVIDE_BY_ZERO).await;
        tokio::time::sleep(Duration::from_millis(500)).await;
        send_all(&tx, &[KeypadAction::Digit(4), KeypadAction::Digit(2)]).await;
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(current.get(), "42");

        tokio::time::sleep(Duration::from_millis(2000)).await;
        assert_eq!(current.get(), "0");

        drop(tx);
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_on_input_policy_keeps_input() {
        let config = CalculatorConfig::default().with_auto_clear_policy(AutoClearPolicy::CancelOnInput);
        let (session, tx, current) = session(config);
        let handle = tokio::spawn(session.run());

        send_all(&tx, &DIVIDE_BY_ZERO).await;
        tokio::time::sleep(Duration::from_millis(500)).await;
        send_all(&tx, &[KeypadAction::Digit(4), KeypadAction::Digit(2)]).await;
        tokio::time::sleep(Duration::from_millis(5000)).await;
        assert_eq!(current.get(), "42");

        drop(tx);
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_on_input_noop_keys_still_clear_error() {
        let config = CalculatorConfig::default().with_auto_clear_policy(AutoClearPolicy::CancelOnInput);
        let (session, tx, current) = session(config);
        let handle = tokio::spawn(session.run());

        send_all(&tx, &DIVIDE_BY_ZERO).await;
        tokio::time::sleep(Duration::from_millis(500)).await;
        send_all(&tx, &[KeypadAction::Delete, KeypadAction::Equals]).await;
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(current.get(), "Error");

        tokio::time::sleep(Duration::from_millis(1600)).await;
        assert_eq!(current.get(), "0");

        tx.send(SessionEvent::Quit).await.unwrap();
        let calc = handle.await.unwrap();
        assert_eq!(calc.next_auto_clear(), None);
    }
}
