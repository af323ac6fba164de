//! Terminal profile types

use serde::{Deserialize, Serialize};
use std::fmt;

/// How a terminal expects text to be pasted into it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PasteMethod {
    /// Ctrl+V (Cmd+V on macOS)
    #[default]
    CtrlV,
    /// Shift+Insert (MobaXterm, xterm)
    ShiftInsert,
    /// Right mouse click at the cursor (PuTTY)
    RightClick,
    /// Replay `custom_paste_sequence` verbatim
    Custom,
}

impl PasteMethod {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().replace(['-', '+', ' '], "_").as_str() {
            "ctrl_v" | "ctrlv" | "paste" => Some(PasteMethod::CtrlV),
            "shift_insert" | "shiftinsert" => Some(PasteMethod::ShiftInsert),
            "right_click" | "rightclick" => Some(PasteMethod::RightClick),
            "custom" => Some(PasteMethod::Custom),
            _ => None,
        }
    }
}

impl fmt::Display for PasteMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PasteMethod::CtrlV => write!(f, "Ctrl+V"),
            PasteMethod::ShiftInsert => write!(f, "Shift+Insert"),
            PasteMethod::RightClick => write!(f, "Right Click"),
            PasteMethod::Custom => write!(f, "Custom"),
        }
    }
}

/// Delivery profile for one kind of terminal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerminalProfile {
    /// Unique key
    pub name: String,

    #[serde(default)]
    pub paste_method: PasteMethod,

    /// Process names this profile applies to (compared case-insensitively)
    #[serde(default)]
    pub process_names: Vec<String>,

    /// Key sequence for `PasteMethod::Custom`, e.g. "ctrl+shift+v"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_paste_sequence: Option<String>,
}

impl TerminalProfile {
    pub fn new(name: impl Into<String>, paste_method: PasteMethod, process_names: &[&str]) -> Self {
        Self {
            name: name.into(),
            paste_method,
            process_names: process_names.iter().map(|s| s.to_string()).collect(),
            custom_paste_sequence: None,
        }
    }

    pub fn with_sequence(mut self, sequence: impl Into<String>) -> Self {
        self.custom_paste_sequence = Some(sequence.into());
        self
    }

    /// True if `process_name` is one of this profile's names
    pub fn matches(&self, process_name: &str) -> bool {
        let wanted = process_key(process_name);
        !wanted.is_empty() && self.process_names.iter().any(|p| process_key(p) == wanted)
    }
}

/// Comparison key for process names: trimmed, lowercased, `.exe` dropped
pub(crate) fn process_key(name: &str) -> String {
    let lower = name.trim().to_lowercase();
    match lower.strip_suffix(".exe") {
        Some(stem) => stem.to_string(),
        None => lower,
    }
}

/// Profiles written by `shorthand init` and used when no config exists
pub fn default_profiles() -> Vec<TerminalProfile> {
    vec![
        TerminalProfile::new("mobaxterm", PasteMethod::ShiftInsert, &["mobaxterm"]),
        TerminalProfile::new("putty", PasteMethod::RightClick, &["putty"]),
        TerminalProfile::new("windows_terminal", PasteMethod::CtrlV, &["WindowsTerminal", "wt"]),
        TerminalProfile::new("powershell", PasteMethod::CtrlV, &["powershell", "pwsh"]),
        TerminalProfile::new("cmd", PasteMethod::CtrlV, &["cmd", "conhost"]),
        TerminalProfile::new(
            "gnome_terminal",
            PasteMethod::Custom,
            &["gnome-terminal-server", "gnome-terminal", "konsole", "tilix"],
        )
        .with_sequence("ctrl+shift+v"),
        TerminalProfile::new("kitty", PasteMethod::Custom, &["kitty", "alacritty", "wezterm-gui"])
            .with_sequence("ctrl+shift+v"),
        TerminalProfile::new("xterm", PasteMethod::ShiftInsert, &["xterm", "urxvt"]),
        TerminalProfile::new("macos_terminal", PasteMethod::CtrlV, &["Terminal", "iTerm2"]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paste_method_parse() {
        assert_eq!(PasteMethod::parse("Ctrl+V"), Some(PasteMethod::CtrlV));
        assert_eq!(PasteMethod::parse("shift-insert"), Some(PasteMethod::ShiftInsert));
        assert_eq!(PasteMethod::parse("Right Click"), Some(PasteMethod::RightClick));
        assert_eq!(PasteMethod::parse("custom"), Some(PasteMethod::Custom));
        assert_eq!(PasteMethod::parse("middle_click"), None);
    }

    #[test]
    fn test_profile_matches_case_insensitive_and_exe() {
        let profile = TerminalProfile::new("wt", PasteMethod::CtrlV, &["WindowsTerminal"]);
        assert!(profile.matches("windowsterminal"));
        assert!(profile.matches("WindowsTerminal.exe"));
        assert!(!profile.matches("Windows"));
        assert!(!profile.matches(""));
    }

    #[test]
    fn test_default_profiles_do_not_overlap() {
        let profiles = default_profiles();
        let mut seen = std::collections::HashSet::new();
        for profile in &profiles {
            for name in &profile.process_names {
                assert!(seen.insert(process_key(name)), "duplicate process name {name}");
            }
        }
    }

    #[test]
    fn test_profile_toml_shape() {
        let profile = TerminalProfile::new("kitty", PasteMethod::Custom, &["kitty"])
            .with_sequence("ctrl+shift+v");
        let text = toml::to_string(&profile).unwrap();
        assert!(text.contains("paste_method = \"custom\""));
        assert!(text.contains("custom_paste_sequence = \"ctrl+shift+v\""));
    }
}
