//! Clipboard sink collaborator.

use crate::error::WaveformResult;

/// Receives finished export text for delivery to the OS clipboard.
pub trait ClipboardSink {
    fn deliver(&mut self, text: &str) -> WaveformResult<()>;
}

/// Keeps every delivered text in memory. Used headless and in tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryClipboard {
    history: Vec<String>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recently delivered text.
    pub fn contents(&self) -> Option<&str> {
        self.history.last().map(String::as_str)
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }
}

impl ClipboardSink for MemoryClipboard {
    fn deliver(&mut self, text: &str) -> WaveformResult<()> {
        self.history.push(text.to_string());
        Ok(())
    }
}
