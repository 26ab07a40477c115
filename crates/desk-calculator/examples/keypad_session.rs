//! Keypad Session Example
//!
//! Drives a calculator session from a channel, the way the terminal front
//! end does, and prints the display as it changes.
//!
//! Run with: cargo run --example keypad_session

use desk_calculator::prelude::*;
use std::time::Duration;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    desk_calculator::logging::init(Verbosity::Verbose, LogFormat::Compact);

    let previous = SharedText::new();
    let current = SharedText::new();
    let config = CalculatorConfig::default().with_auto_clear_ms(300);
    let calculator = Calculator::with_config(config, TokioClock, previous.clone(), current.clone());
    let (session, tx) = Session::channel(calculator, 16);
    let handle = tokio::spawn(session.run());

    let keypad = Keypad::standard();
    let clicks = ["btn-1", "btn-2", "btn-divide", "btn-0", "btn-equals"];
    for id in clicks {
        if let Some(action) = keypad.handle_click(id) {
            let _ = tx.send(action.into()).await;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
        println!("{id:>12}: {:>24} | {}", previous.get(), current.get());
    }

    tokio::time::sleep(Duration::from_millis(400)).await;
    println!("{:>12}: {:>24} | {}", "auto-clear", previous.get(), current.get());

    let _ = tx.send(SessionEvent::Quit).await;
    if let Ok(calculator) = handle.await {
        println!("final: {}", calculator.display().primary);
    }
}
