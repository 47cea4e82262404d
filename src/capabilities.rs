//! Narrow interfaces the core calls out to. Rendering layers supply their own
//! implementations; the ones here cover logging and tests.

use std::sync::{Arc, Mutex};

/// Clipboard-like destination for shared links
///
/// Fire-and-forget: the core never inspects the outcome of a write.
pub trait ClipboardSink {
    fn write(&self, text: &str);
}

/// Sink that only records the hand-off in the log
#[derive(Debug, Default, Clone, Copy)]
pub struct LogClipboard;

impl ClipboardSink for LogClipboard {
    fn write(&self, text: &str) {
        tracing::info!("Copied to clipboard: {}", text);
    }
}

/// In-memory sink that keeps every write, newest last
#[derive(Debug, Default, Clone)]
pub struct MemoryClipboard {
    writes: Arc<Mutex<Vec<String>>>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recently written text
    pub fn last(&self) -> Option<String> {
        self.writes.lock().ok().and_then(|w| w.last().cloned())
    }

    pub fn writes(&self) -> Vec<String> {
        self.writes.lock().map(|w| w.clone()).unwrap_or_default()
    }
}

impl ClipboardSink for MemoryClipboard {
    fn write(&self, text: &str) {
        match self.writes.lock() {
            Ok(mut writes) => writes.push(text.to_string()),
            Err(_) => tracing::warn!("Clipboard buffer unavailable, dropping write"),
        }
    }
}

impl<T: ClipboardSink + ?Sized> ClipboardSink for Arc<T> {
    fn write(&self, text: &str) {
        (**self).write(text)
    }
}
