//! X11 backend built on xdotool. Paste chords fall back to ydotool, which
//! also reaches Wayland clients.

use std::path::Path;
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

    fn xdotool(args: &[&str]) -> Result<String, String> {
        run_command(Command::new("xdotool").args(args))
            .map_err(|e| format!("{} (install xdotool)", e))
    }

    fn ydotool(args: &[&str]) -> Result<String, String> {
        run_command(Command::new("ydotool").args(args))
    }
}

/// ydotool `key` arguments for `chord`: Linux input event codes, pressed
/// then released in reverse order
fn ydotool_keys(chord: KeyChord) -> [&'static str; 4] {
    match chord {
        // KEY_LEFTCTRL, KEY_V
        KeyChord::Paste => ["29:1", "47:1", "47:0", "29:0"],
        // KEY_LEFTSHIFT, KEY_INSERT
        KeyChord::ShiftInsert => ["42:1", "110:1", "110:0", "42:0"],
    }
}

/// Executable name for `pid`: `/proc/<pid>/exe`, else `/proc/<pid>/comm`.
/// `comm` is truncated to 15 bytes by the kernel, so it is only a fallback.
fn process_name_for_pid(pid: u32) -> Result<String, WindowLookupError> {
    let proc_dir = Path::new("/proc").join(pid.to_string());

    if let Ok(exe) = std::fs::read_link(proc_dir.join("exe")) {
        if let Some(name) = exe.file_name() {
            return Ok(name.to_string_lossy().trim_end_matches(" (deleted)").to_string());
        }
    }

    std::fs::read_to_string(proc_dir.join("comm"))
        .map(|s| s.trim().to_string())
        .map_err(|e| WindowLookupError::Process(format!("pid {}: {}", pid, e)))
}

impl WindowSystem for NativePlatform {
    fn foreground_window(&self) -> WindowHandle {
        match Self::xdotool(&["getactivewindow"]) {
            Ok(out) => WindowHandle(out.parse().unwrap_or(0)),
            Err(e) => {
                tracing::debug!("getactivewindow failed: {}", e);
                WindowHandle::NULL
            }
        }
    }

    fn process_name(&self, handle: WindowHandle) -> Result<String, WindowLookupError> {
        let window = handle.0.to_string();
        let pid = Self::xdotool(&["getwindowpid", &window])
            .map_err(WindowLookupError::Process)?
            .parse::<u32>()
            .map_err(|e| WindowLookupError::Process(e.to_string()))?;
        process_name_for_pid(pid)
    }

    fn window_title(&self, handle: WindowHandle) -> Result<String, WindowLookupError> {
        Self::xdotool(&["getwindowname", &handle.0.to_string()]).map_err(WindowLookupError::Title)
    }

    fn focus(&self, handle: WindowHandle) -> Result<(), WindowLookupError> {
        Self::xdotool(&["windowactivate", "--sync", &handle.0.to_string()])
            .map(|_| ())
            .map_err(WindowLookupError::Focus)
    }
}

impl InputSynth for NativePlatform {
    fn send_chord(&self, chord: KeyChord) -> Result<(), String> {
        let keys = match chord {
            KeyChord::Paste => "ctrl+v",
            KeyChord::ShiftInsert => "shift+Insert",
        };
        let xdotool_err = match Self::xdotool(&["key", "--clearmodifiers", keys]) {
            Ok(_) => return Ok(()),
            Err(e) => e,
        };

        tracing::debug!("xdotool key failed ({}), trying ydotool", xdotool_err);
        let mut args = vec!["key"];
        args.extend(ydotool_keys(chord));
        Self::ydotool(&args).map(|_| ()).map_err(|e| {
            format!(
                "Paste keystroke requires xdotool (X11) or ydotool (Wayland): {}; {}",
                xdotool_err, e
            )
        })
    }

    fn right_click(&self) -> Result<(), String> {
        Self::xdotool(&["click", "3"]).map(|_| ())
    }

    /// `sequence` is a whitespace-separated list of xdotool key chords,
    /// e.g. "ctrl+shift+v" or "Escape i ctrl+v"
    fn send_sequence(&self, sequence: &str) -> Result<(), String> {
        let mut args = vec!["key", "--clearmodifiers"];
        args.extend(sequence.split_whitespace());
        if args.len() == 2 {
            return Err("Empty paste sequence".to_string());
        }
        Self::xdotool(&args).map(|_| ())
    }
}
