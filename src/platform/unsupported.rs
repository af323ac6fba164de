use crate::delivery::{InputSynth, KeyChord};
use crate::window::{WindowHandle, WindowLookupError, WindowSystem};

/// Fallback for platforms without a backend: every target is unknown, so
/// commands always land on the clipboard.
#[derive(Debug, Default)]
pub struct NativePlatform;

impl NativePlatform {
    pub fn new() -> Self {
        Self
    }
}

impl WindowSystem for NativePlatform {
    fn foreground_window(&self) -> WindowHandle {
        WindowHandle::NULL
    }

    fn process_name(&self, _handle: WindowHandle) -> Result<String, WindowLookupError> {
        Err(WindowLookupError::Unsupported)
    }

    fn window_title(&self, _handle: WindowHandle) -> Result<String, WindowLookupError> {
        Err(WindowLookupError::Unsupported)
    }

    fn focus(&self, _handle: WindowHandle) -> Result<(), WindowLookupError> {
        Err(WindowLookupError::Unsupported)
    }
}

impl InputSynth for NativePlatform {
    fn send_chord(&self, _chord: KeyChord) -> Result<(), String> {
        Err("Input synthesis is not supported on this platform".to_string())
    }

    fn right_click(&self) -> Result<(), String> {
        Err("Input synthesis is not supported on this platform".to_string())
    }

    fn send_sequence(&self, _sequence: &str) -> Result<(), String> {
        Err("Input synthesis is not supported on this platform".to_string())
    }
}
