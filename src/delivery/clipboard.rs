//! Clipboard access

use std::sync::Mutex;

use arboard::Clipboard;

/// Write-only clipboard
pub trait ClipboardSink: Send + Sync {
    fn set_text(&self, text: &str) -> Result<(), String>;
}

/// System clipboard via arboard.
///
/// The `Clipboard` is created lazily and kept alive: on X11 the owning process
/// has to stay around to serve the selection.
#[derive(Default)]
pub struct SystemClipboard {
    inner: Mutex<Option<Clipboard>>,
}

impl SystemClipboard {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ClipboardSink for SystemClipboard {
    fn set_text(&self, text: &str) -> Result<(), String> {
        let mut guard = self
            .inner
            .lock()
            .map_err(|_| "Clipboard lock poisoned".to_string())?;

        if guard.is_none() {
            let clipboard =
                Clipboard::new().map_err(|e| format!("Failed to access clipboard: {}", e))?;
            *guard = Some(clipboard);
        }

        match guard.as_mut() {
            Some(clipboard) => clipboard
                .set_text(text)
                .map_err(|e| format!("Failed to copy to clipboard: {}", e)),
            None => Err("Clipboard unavailable".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_copy_to_clipboard() {
        // Headless CI has no clipboard; only make sure we fail cleanly
        let clipboard = SystemClipboard::new();
        if let Err(err) = clipboard.set_text("echo shorthand") {
            eprintln!("Skipping clipboard test: {err}");
        }
    }
}
