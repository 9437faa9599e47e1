//! System clipboard sink backed by arboard.

use tracing::debug;
use wavekit_core::{ClipboardSink, WaveformError, WaveformResult};

/// Delivers export text to the OS clipboard.
///
/// The arboard handle is opened on first use and kept for the lifetime of the
/// sink, so clipboard managers on X11 and Wayland can still read the text after
/// the export command returns.
#[derive(Default)]
pub struct SystemClipboard {
    clipboard: Option<arboard::Clipboard>,
}

impl SystemClipboard {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ClipboardSink for SystemClipboard {
    fn deliver(&mut self, text: &str) -> WaveformResult<()> {
        if self.clipboard.is_none() {
            let clipboard =
                arboard::Clipboard::new().map_err(|e| WaveformError::clipboard(e.to_string()))?;
            self.clipboard = Some(clipboard);
        }
        let clipboard = self
            .clipboard
            .as_mut()
            .ok_or_else(|| WaveformError::clipboard("clipboard unavailable"))?;
        clipboard
            .set_text(text.to_string())
            .map_err(|e| WaveformError::clipboard(e.to_string()))?;
        debug!("Copied {} bytes to the system clipboard", text.len());
        Ok(())
    }
}
