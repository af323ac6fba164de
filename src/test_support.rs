//! Fakes for the platform seams, shared by unit tests

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::delivery::{ClipboardSink, InputSynth, KeyChord};
use crate::window::{WindowHandle, WindowLookupError, WindowSystem};

/// Ordered log of everything the fakes were asked to do
#[derive(Clone, Default)]
pub struct Journal(Arc<Mutex<Vec<String>>>);

impl Journal {
    pub fn push(&self, entry: impl Into<String>) {
        self.0.lock().unwrap().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

pub struct FakeWindows {
    pub journal: Journal,
    pub processes: HashMap<u64, String>,
    pub foreground: Mutex<WindowHandle>,
    pub refuse_focus: bool,
}

impl FakeWindows {
    pub fn new(journal: Journal) -> Self {
        Self {
            journal,
            processes: HashMap::new(),
            foreground: Mutex::new(WindowHandle::NULL),
            refuse_focus: false,
        }
    }

    pub fn with_window(mut self, handle: u64, process: &str) -> Self {
        self.processes.insert(handle, process.to_string());
        self
    }

    pub fn set_foreground(&self, handle: u64) {
        *self.foreground.lock().unwrap() = WindowHandle(handle);
    }
}

impl WindowSystem for FakeWindows {
    fn foreground_window(&self) -> WindowHandle {
        *self.foreground.lock().unwrap()
    }

    fn process_name(&self, handle: WindowHandle) -> Result<String, WindowLookupError> {
        self.processes
            .get(&handle.0)
            .cloned()
            .ok_or(WindowLookupError::NoWindow(handle))
    }

    fn window_title(&self, handle: WindowHandle) -> Result<String, WindowLookupError> {
        Ok(format!("window {}", handle.0))
    }

    fn focus(&self, handle: WindowHandle) -> Result<(), WindowLookupError> {
        if self.refuse_focus {
            return Err(WindowLookupError::Focus("refused".to_string()));
        }
        self.journal.push(format!("focus {}", handle.0));
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeInput {
    pub journal: Journal,
    pub fail: bool,
}

impl FakeInput {
    fn record(&self, entry: String) -> Result<(), String> {
        if self.fail {
            return Err("input blocked".to_string());
        }
        self.journal.push(entry);
        Ok(())
    }
}

impl InputSynth for FakeInput {
    fn send_chord(&self, chord: KeyChord) -> Result<(), String> {
        self.record(format!("chord {:?}", chord))
    }

    fn right_click(&self) -> Result<(), String> {
        self.record("right_click".to_string())
    }

    fn send_sequence(&self, sequence: &str) -> Result<(), String> {
        self.record(format!("sequence {}", sequence))
    }
}

#[derive(Default)]
pub struct FakeClipboard {
    pub journal: Journal,
}

impl ClipboardSink for FakeClipboard {
    fn set_text(&self, text: &str) -> Result<(), String> {
        self.journal.push(format!("clipboard {}", text));
        Ok(())
    }
}
