//! Window identification
//!
//! Captures who owned the foreground window at the instant the hotkey fired.
//! The snapshot is what later decides how (and where) a command is pasted.

use std::fmt;

/// Opaque reference to an OS window. `0` means "no window".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct WindowHandle(pub u64);

impl WindowHandle {
    pub const NULL: WindowHandle = WindowHandle(0);

    pub fn is_null(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for WindowHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

/// Failure to look up something about a window
#[derive(Debug, thiserror::Error)]
pub enum WindowLookupError {
    #[error("No such window: {0}")]
    NoWindow(WindowHandle),

    #[error("Failed to resolve owning process: {0}")]
    Process(String),

    #[error("Failed to read window title: {0}")]
    Title(String),

    #[error("Failed to focus window: {0}")]
    Focus(String),

    #[error("Window inspection is not supported on this platform")]
    Unsupported,
}

/// Snapshot of a window taken when the hotkey fired
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WindowIdentity {
    pub handle: WindowHandle,
    /// Executable basename without extension, empty when unknown
    pub process_name: String,
    pub title: String,
}

impl WindowIdentity {
    pub fn unknown() -> Self {
        Self::default()
    }

    /// An unknown identity cannot be targeted for delivery.
    pub fn is_unknown(&self) -> bool {
        self.handle.is_null() || self.process_name.trim().is_empty()
    }
}

impl fmt::Display for WindowIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_unknown() {
            write!(f, "<unknown window {}>", self.handle)
        } else {
            write!(f, "{} [{}] {:?}", self.process_name, self.handle, self.title)
        }
    }
}

/// Window primitives provided by the platform
pub trait WindowSystem: Send + Sync {
    /// Currently focused top-level window, or `WindowHandle::NULL`
    fn foreground_window(&self) -> WindowHandle;

    /// Name or path of the executable that owns the window
    fn process_name(&self, handle: WindowHandle) -> Result<String, WindowLookupError>;

    fn window_title(&self, handle: WindowHandle) -> Result<String, WindowLookupError>;

    /// Bring the window to the foreground
    fn focus(&self, handle: WindowHandle) -> Result<(), WindowLookupError>;
}

/// Build a `WindowIdentity` for `handle`.
///
/// Never fails: a process lookup failure yields an empty process name, which
/// callers treat as "unknown" and fall back to clipboard-only delivery.
pub fn identify(system: &dyn WindowSystem, handle: WindowHandle) -> WindowIdentity {
    if handle.is_null() {
        return WindowIdentity::unknown();
    }

    let process_name = match system.process_name(handle) {
        Ok(name) => normalize_process_name(&name),
        Err(e) => {
            tracing::debug!("Window {} process lookup failed: {}", handle, e);
            String::new()
        }
    };

    let title = system.window_title(handle).unwrap_or_else(|e| {
        tracing::debug!("Window {} title lookup failed: {}", handle, e);
        String::new()
    });

    WindowIdentity {
        handle,
        process_name,
        title,
    }
}

/// Capture and identify whatever window currently has focus
pub fn capture_foreground(system: &dyn WindowSystem) -> WindowIdentity {
    identify(system, system.foreground_window())
}

/// Reduce `C:\Program Files\PuTTY\putty.exe` or `/usr/bin/kitty` to its stem.
pub fn normalize_process_name(raw: &str) -> String {
    let trimmed = raw.trim();
    let base = trimmed
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(trimmed);
    let stem = match base.len().checked_sub(4) {
        Some(cut) if base.is_char_boundary(cut) && base[cut..].eq_ignore_ascii_case(".exe") => {
            &base[..cut]
        }
        _ => base,
    };
    stem.to_string()
}
