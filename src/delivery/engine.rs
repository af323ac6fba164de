//! Paste a command into the window it was requested from.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use super::clipboard::ClipboardSink;
use crate::profile::{PasteMethod, ProfileRegistry};
use crate::window::{WindowIdentity, WindowLookupError, WindowSystem};

/// Named key combinations the input backend must support
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyChord {
    /// Platform paste: Ctrl+V, or Cmd+V on macOS
    Paste,
    ShiftInsert,
}

/// Synthetic keyboard and mouse input
pub trait InputSynth: Send + Sync {
    fn send_chord(&self, chord: KeyChord) -> Result<(), String>;

    /// Right click at the current pointer position
    fn right_click(&self) -> Result<(), String>;

    /// Replay a user-recorded key sequence exactly as configured
    fn send_sequence(&self, sequence: &str) -> Result<(), String>;
}

/// Result of a delivery that did not fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// Pasted into the target window
    Delivered,
    /// No usable target window; the command is on the clipboard
    CopiedToClipboard,
}

#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    #[error("Could not focus target window: {0}")]
    Focus(#[from] WindowLookupError),

    #[error("{0}")]
    Clipboard(String),

    #[error("Failed to send paste input: {0}")]
    Input(String),
}

/// Delays around the focus switch.
///
/// Focus changes propagate asynchronously in every window system; these
/// delays make a paste very likely, not certain, to land in the right window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeliveryTiming {
    /// Wait after restoring focus
    pub focus_settle: Duration,
    /// Wait after writing the clipboard
    pub paste_settle: Duration,
}

impl Default for DeliveryTiming {
    fn default() -> Self {
        Self {
            focus_settle: Duration::from_millis(100),
            paste_settle: Duration::from_millis(50),
        }
    }
}

impl DeliveryTiming {
    pub fn from_millis(focus_settle_ms: u64, paste_settle_ms: u64) -> Self {
        Self {
            focus_settle: Duration::from_millis(focus_settle_ms),
            paste_settle: Duration::from_millis(paste_settle_ms),
        }
    }
}

pub struct DeliveryEngine {
    windows: Arc<dyn WindowSystem>,
    input: Arc<dyn InputSynth>,
    clipboard: Arc<dyn ClipboardSink>,
    registry: Arc<ProfileRegistry>,
    timing: DeliveryTiming,
}

impl DeliveryEngine {
    pub fn new(
        windows: Arc<dyn WindowSystem>,
        input: Arc<dyn InputSynth>,
        clipboard: Arc<dyn ClipboardSink>,
        registry: Arc<ProfileRegistry>,
        timing: DeliveryTiming,
    ) -> Self {
        Self {
            windows,
            input,
            clipboard,
            registry,
            timing,
        }
    }

    /// Deliver `command` to `target`.
    ///
    /// A null target handle is not an error: the command is copied to the
    /// clipboard for a manual paste. A real window whose process could not be
    /// named has no profile and gets the default Ctrl+V paste. Every error
    /// leaves the command on the clipboard as well. No step is retried.
    pub fn deliver(
        &self,
        command: &str,
        target: &WindowIdentity,
    ) -> Result<DeliveryOutcome, DeliveryError> {
        if target.handle.is_null() {
            self.clipboard
                .set_text(command)
                .map_err(DeliveryError::Clipboard)?;
            tracing::info!("No target window, copied command to clipboard");
            return Ok(DeliveryOutcome::CopiedToClipboard);
        }

        if let Err(e) = self.windows.focus(target.handle) {
            // Leave the command somewhere the user can still paste it from
            if let Err(clip) = self.clipboard.set_text(command) {
                tracing::warn!("Clipboard fallback failed: {}", clip);
            }
            return Err(e.into());
        }
        thread::sleep(self.timing.focus_settle);

        self.clipboard
            .set_text(command)
            .map_err(DeliveryError::Clipboard)?;
        thread::sleep(self.timing.paste_settle);

        let profile = self.registry.resolve(target);
        let method = profile
            .as_ref()
            .map(|p| p.paste_method)
            .unwrap_or(PasteMethod::CtrlV);

        tracing::debug!(
            "Pasting into {} using {} (profile {})",
            target,
            method,
            profile.as_ref().map(|p| p.name.as_str()).unwrap_or("<none>")
        );

        let result = match method {
            PasteMethod::CtrlV => self.input.send_chord(KeyChord::Paste),
            PasteMethod::ShiftInsert => self.input.send_chord(KeyChord::ShiftInsert),
            PasteMethod::RightClick => self.input.right_click(),
            PasteMethod::Custom => match profile.as_ref().and_then(|p| p.custom_paste_sequence.as_deref()) {
                Some(sequence) => self.input.send_sequence(sequence),
                None => self.input.send_chord(KeyChord::Paste),
            },
        };
        result.map_err(DeliveryError::Input)?;

        tracing::info!("Command delivered to {}", target.process_name);
        Ok(DeliveryOutcome::Delivered)
    }
}
