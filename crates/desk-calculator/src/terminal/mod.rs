//! Terminal front end
//!
//! Raw-mode keypad calculator drawn with crossterm. Key events are read on a
//! blocking thread and fed into a [`Session`], which owns the calculator and
//! the auto-clear deadline.

mod app;
mod input;
mod ui;

pub use app::TerminalApp;
pub use input::{key_name, InputHandler, TerminalCommand};
pub use ui::{
    align_right, draw_frame, keypad_lines, TerminalRow, CURRENT_ROW, DISPLAY_WIDTH, HELP_LINE,
    PREVIOUS_ROW,
};

use crate::calculator::Calculator;
use crate::clock::TokioClock;
use crate::config::CalculatorConfig;
use crate::core::DisplaySnapshot;
use crate::error::{AppError, AppResult};
use crate::keypad::Keypad;
use crate::session::{Session, SessionEvent};
use crossterm::{
    cursor::{Hide, Show},
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use std::io;
use std::panic;
use tokio::sync::mpsc;
use tracing::{debug, error, warn};

/// Raw mode plus alternate screen, restored on drop
struct RawScreen;

impl RawScreen {
    fn enter() -> AppResult<Self> {
        enable_raw_mode()
            .map_err(|err| AppError::terminal(format!("cannot enable raw mode: {err}")))?;
        let screen = Self;
        execute!(io::stdout(), EnterAlternateScreen, Hide)?;
        Ok(screen)
    }
}

impl Drop for RawScreen {
    fn drop(&mut self) {
        let _ = execute!(io::stdout(), Show, LeaveAlternateScreen);
        let _ = disable_raw_mode();
    }
}

/// Routes panic reports into `tracing` while the keypad owns the screen;
/// the previous hook comes back on drop
struct LoggedPanics {
    restore: Option<Box<dyn FnOnce()>>,
}

impl LoggedPanics {
    fn install() -> Self {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(|info| {
            error!(%info, "panic while the terminal calculator was running");
        }));
        Self {
            restore: Some(Box::new(move || panic::set_hook(previous))),
        }
    }
}

impl Drop for LoggedPanics {
    fn drop(&mut self) {
        if let Some(restore) = self.restore.take() {
            restore();
        }
    }
}

/// Runs the interactive calculator until the user quits.
///
/// Returns the display as it was when the session ended.
pub fn run_interactive(config: CalculatorConfig) -> AppResult<DisplaySnapshot> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;

    let screen = RawScreen::enter()?;
    let panics = LoggedPanics::install();
    draw_frame(&mut io::stdout(), &Keypad::standard())?;

    let calculator = Calculator::with_config(
        config,
        TokioClock,
        TerminalRow::stdout(PREVIOUS_ROW),
        TerminalRow::stdout(CURRENT_ROW),
    );
    let (session, tx) = Session::channel(calculator, 64);
    std::thread::spawn(move || read_keys(&tx));

    let calculator = runtime.block_on(session.run());
    drop(panics);
    drop(screen);
    Ok(calculator.display())
}

fn read_keys(tx: &mpsc::Sender<SessionEvent>) {
    let handler = InputHandler::new();
    loop {
        let key = match event::read() {
            Ok(Event::Key(key)) => key,
            Ok(_) => continue,
            Err(err) => {
                warn!(%err, "terminal input failed");
                let _ = tx.blocking_send(SessionEvent::Quit);
                return;
            }
        };

        let event = match handler.handle_key(key) {
            TerminalCommand::Press(action) => SessionEvent::Action(action),
            TerminalCommand::Quit => SessionEvent::Quit,
            TerminalCommand::Ignore => continue,
        };

        if tx.blocking_send(event).is_err() || event == SessionEvent::Quit {
            debug!("input reader stopped");
            return;
        }
    }
}
