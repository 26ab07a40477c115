//! Terminal rendering
//!
//! The static frame (title, display box, keypad, help) is drawn once; the
//! two display rows are repainted by [`TerminalRow`] sinks.

use crate::display::DisplaySink;
use crate::keypad::Keypad;
use crossterm::{
    cursor::MoveTo,
    queue,
    style::Print,
    terminal::{Clear, ClearType},
};
use std::io::{self, Write};
use tracing::warn;

/// Width of the display box interior
pub const DISPLAY_WIDTH: u16 = 32;
/// Screen row of the secondary (expression) line
pub const PREVIOUS_ROW: u16 = 2;
/// Screen row of the primary (value) line
pub const CURRENT_ROW: u16 = 3;

const KEYPAD_TOP: u16 = 6;
const BUTTONS_PER_ROW: usize = 4;

/// Keyboard help shown under the keypad
pub const HELP_LINE: &str = "s x²  r √  i 1/x  n ±  m mod  % pct  Esc C  q quit";

/// Right-aligns `text` in `width` columns; longer text is left as is
#[must_use]
pub fn align_right(text: &str, width: u16) -> String {
    format!("{text:>width$}", width = usize::from(width))
}

/// Keypad labels laid out row by row
#[must_use]
pub fn keypad_lines(keypad: &Keypad) -> Vec<String> {
    keypad
        .buttons()
        .chunks(BUTTONS_PER_ROW)
        .map(|row| {
            row.iter()
                .map(|button| format!("[{:^6}]", button.label()))
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect()
}

/// Draws everything except the display rows
pub fn draw_frame<W: Write>(out: &mut W, keypad: &Keypad) -> io::Result<()> {
    let border = "─".repeat(usize::from(DISPLAY_WIDTH) + 2);
    queue!(
        out,
        Clear(ClearType::All),
        MoveTo(0, 0),
        Print("desk-calc"),
        MoveTo(0, PREVIOUS_ROW - 1),
        Print(format!("┌{border}┐")),
        MoveTo(0, PREVIOUS_ROW),
        Print("│"),
        MoveTo(DISPLAY_WIDTH + 3, PREVIOUS_ROW),
        Print("│"),
        MoveTo(0, CURRENT_ROW),
        Print("│"),
        MoveTo(DISPLAY_WIDTH + 3, CURRENT_ROW),
        Print("│"),
        MoveTo(0, CURRENT_ROW + 1),
        Print(format!("└{border}┘")),
    )?;

    let mut row = KEYPAD_TOP;
    for line in keypad_lines(keypad) {
        queue!(out, MoveTo(0, row), Print(line))?;
        row += 1;
    }

    queue!(out, MoveTo(0, row + 1), Print(HELP_LINE))?;
    out.flush()
}

/// Display sink that repaints one screen row
#[derive(Debug)]
pub struct TerminalRow<W: Write + Send = io::Stdout> {
    out: W,
    row: u16,
    width: u16,
}

impl TerminalRow<io::Stdout> {
    /// Paints into stdout
    #[must_use]
    pub fn stdout(row: u16) -> Self {
        Self::new(io::stdout(), row, DISPLAY_WIDTH)
    }
}

impl<W: Write + Send> TerminalRow<W> {
    /// Creates a row sink over any writer
    #[must_use]
    pub fn new(out: W, row: u16, width: u16) -> Self {
        Self { out, row, width }
    }

    /// Returns the writer
    pub fn into_inner(self) -> W {
        self.out
    }

    fn paint(&mut self, text: &str) -> io::Result<()> {
        queue!(
            self.out,
            MoveTo(2, self.row),
            Print(align_right(text, self.width)),
        )?;
        self.out.flush()
    }
}

impl<W: Write + Send> DisplaySink for TerminalRow<W> {
    fn show(&mut self, text: &str) {
        if let Err(err) = self.paint(text) {
            warn!(%err, row = self.row, "display row write failed");
        }
    }
}
