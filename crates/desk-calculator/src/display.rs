//! Display sinks
//!
//! The controller never knows what it renders into. Callers inject one sink
//! for the secondary (pending expression) line and one for the primary
//! (current value) line.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

/// Write-only handle for one display line
pub trait DisplaySink: Send {
    /// Replaces the line's text
    fn show(&mut self, text: &str);
}

impl<F> DisplaySink for F
where
    F: FnMut(&str) + Send,
{
    fn show(&mut self, text: &str) {
        self(text);
    }
}

/// Sink that discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl DisplaySink for NullSink {
    fn show(&mut self, _text: &str) {}
}

/// Cloneable text buffer; every clone sees the last rendered text
#[derive(Clone, Default)]
pub struct SharedText {
    inner: Arc<Mutex<String>>,
}

impl SharedText {
    /// Creates an empty buffer
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the last rendered text
    #[must_use]
    pub fn get(&self) -> String {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl fmt::Debug for SharedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SharedText").field(&self.get()).finish()
    }
}

impl DisplaySink for SharedText {
    fn show(&mut self, text: &str) {
        let mut line = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        line.clear();
        line.push_str(text);
    }
}
