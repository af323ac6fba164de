//! Native window, input and dialog backends
//!
//! - Linux (X11): `xdotool` for windows and input, `zenity` for dialogs,
//!   `notify-send` for notifications
//! - macOS: `osascript` (System Events) for everything
//! - Windows: Win32 through the `windows` crate, PowerShell for dialogs

mod dialog;

#[cfg(target_os = "linux")]
mod linux;
#[cfg(target_os = "macos")]
mod macos;
#[cfg(target_os = "windows")]
mod win32;

pub use dialog::DialogView;

#[cfg(target_os = "linux")]
pub use linux::NativePlatform;
#[cfg(target_os = "macos")]
pub use macos::NativePlatform;
#[cfg(target_os = "windows")]
pub use win32::NativePlatform;

#[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
mod unsupported;
#[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
pub use unsupported::NativePlatform;

use std::process::Command;

use crate::runtime::Driver;

/// Run `driver` until it shuts down.
///
/// On macOS and Windows hotkey events only arrive while the main thread runs
/// the native event loop, so the driver moves to its own thread there.
pub fn run_event_loop(driver: Driver) {
    #[cfg(target_os = "macos")]
    {
        std::thread::spawn(move || driver.run());
        core_foundation::runloop::CFRunLoop::run_current();
    }
    #[cfg(target_os = "windows")]
    {
        std::thread::spawn(move || driver.run());
        win32::pump_messages();
    }
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    driver.run();
}

/// Run `command` and return its trimmed stdout, or a readable error
pub(crate) fn run_command(command: &mut Command) -> Result<String, String> {
    let program = command.get_program().to_string_lossy().into_owned();
    let output = command
        .output()
        .map_err(|e| format!("Failed to run {}: {}", program, e))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(format!("{} failed: {}", program, stderr.trim()));
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_command_missing_binary() {
        let err = run_command(&mut Command::new("shorthand-no-such-binary")).unwrap_err();
        assert!(err.starts_with("Failed to run shorthand-no-such-binary"));
    }

    #[cfg(unix)]
    #[test]
    fn test_run_command_captures_stdout_and_failure() {
        assert_eq!(
            run_command(Command::new("sh").args(["-c", "echo ' hi '"])).unwrap(),
            "hi"
        );
        let err = run_command(Command::new("sh").args(["-c", "echo oops >&2; exit 3"])).unwrap_err();
        assert_eq!(err, "sh failed: oops");
    }
}
