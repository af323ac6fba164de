//! macOS backend built on osascript and System Events.
//!
//! Window handles are the pid of the frontmost application.

use std::process::Command;

use super::run_command;
use crate::delivery::{InputSynth, KeyChord};
use crate::window::{WindowHandle, WindowLookupError, WindowSystem};

#[derive(Debug, Default)]
pub struct NativePlatform;

impl NativePlatform {
    pub fn new() -> Self {
        Self
    }

    fn osascript(script: &str) -> Result<String, String> {
        run_command(Command::new("osascript").args(["-e", script]))
    }

    fn system_events(statement: &str) -> Result<(), String> {
        Self::osascript(&format!(r#"tell application "System Events" to {}"#, statement)).map(|_| ())
    }
}

impl WindowSystem for NativePlatform {
    fn foreground_window(&self) -> WindowHandle {
        match Self::osascript(
            r#"tell application "System Events" to get unix id of first process whose frontmost is true"#,
        ) {
            Ok(out) => WindowHandle(out.parse().unwrap_or(0)),
            Err(e) => {
                tracing::debug!("Frontmost process lookup failed: {}", e);
                WindowHandle::NULL
            }
        }
    }

    fn process_name(&self, handle: WindowHandle) -> Result<String, WindowLookupError> {
        run_command(Command::new("ps").args(["-p", &handle.0.to_string(), "-o", "comm="]))
            .map_err(WindowLookupError::Process)
            .and_then(|name| {
                if name.is_empty() {
                    Err(WindowLookupError::NoWindow(handle))
                } else {
                    Ok(name)
                }
            })
    }

    fn window_title(&self, handle: WindowHandle) -> Result<String, WindowLookupError> {
        Self::osascript(&format!(
            r#"tell application "System Events" to get name of front window of (first process whose unix id is {})"#,
            handle.0
        ))
        .map_err(WindowLookupError::Title)
    }

    fn focus(&self, handle: WindowHandle) -> Result<(), WindowLookupError> {
        Self::system_events(&format!(
            "set frontmost of (first process whose unix id is {}) to true",
            handle.0
        ))
        .map_err(WindowLookupError::Focus)
    }
}

impl InputSynth for NativePlatform {
    fn send_chord(&self, chord: KeyChord) -> Result<(), String> {
        match chord {
            KeyChord::Paste => Self::system_events(r#"keystroke "v" using command down"#),
            // 114 = Help/Insert
            KeyChord::ShiftInsert => Self::system_events("key code 114 using shift down"),
        }
    }

    fn right_click(&self) -> Result<(), String> {
        Err("Right-click paste is not supported on macOS; use ctrl_v for this profile".to_string())
    }

    /// `sequence` is a System Events statement,
    /// e.g. `keystroke "v" using {command down, shift down}`
    fn send_sequence(&self, sequence: &str) -> Result<(), String> {
        if sequence.trim().is_empty() {
            return Err("Empty paste sequence".to_string());
        }
        Self::system_events(sequence)
    }
}
