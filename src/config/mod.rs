//! Configuration loading and management

mod io;
mod store;

pub use store::ConfigProfileStore;

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::delivery::DeliveryTiming;
use crate::generation::{DEFAULT_MODEL, DEFAULT_OLLAMA_URL};
use crate::profile::{TerminalProfile, default_profiles};
use crate::sanitize::LinePolicy;
use crate::session::CoordinatorOptions;

/// Configuration file errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Failed to write config file {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Config file already exists: {0} (use --force to overwrite)")]
    AlreadyExists(PathBuf),
}

/// Main configuration structure (`~/.shorthand/config.toml`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the Ollama server
    #[serde(default = "default_ollama_url")]
    pub ollama_url: String,

    /// Model that turns prompts into commands
    #[serde(default = "default_model_name")]
    pub model_name: String,

    /// Global hotkey, e.g. "ctrl+g", "ctrl+shift+space"
    #[serde(default = "default_hotkey")]
    pub hotkey: String,

    /// Show the generated command before it is pasted
    #[serde(default = "default_true")]
    pub show_preview: bool,

    /// Ask before pasting
    #[serde(default)]
    pub require_confirmation: bool,

    /// Initial state of the prompt dialog's unsafe toggle, and the default
    /// for `generate`. This only changes what the model is told; nothing is
    /// enforced.
    #[serde(default)]
    pub allow_unsafe: bool,

    /// Ignore the hotkey unless the focused window matches a terminal profile
    #[serde(default)]
    pub terminals_only: bool,

    /// Keep only the first line of the model's answer
    #[serde(default = "default_true")]
    pub single_line: bool,

    /// Timeout for one generation request, in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Wait after restoring focus to the terminal, in milliseconds
    #[serde(default = "default_focus_settle_ms")]
    pub focus_settle_ms: u64,

    /// Wait after writing the clipboard, in milliseconds
    #[serde(default = "default_paste_settle_ms")]
    pub paste_settle_ms: u64,

    /// Terminal profiles, matched in order
    #[serde(default = "default_profiles")]
    pub terminal_profiles: Vec<TerminalProfile>,
}

fn default_ollama_url() -> String {
    DEFAULT_OLLAMA_URL.to_string()
}

fn default_model_name() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_hotkey() -> String {
    #[cfg(target_os = "macos")]
    return "cmd+g".to_string();
    #[cfg(not(target_os = "macos"))]
    return "ctrl+g".to_string();
}

fn default_true() -> bool {
    true
}

fn default_request_timeout_secs() -> u64 {
    60
}

fn default_focus_settle_ms() -> u64 {
    100
}

fn default_paste_settle_ms() -> u64 {
    50
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ollama_url: default_ollama_url(),
            model_name: default_model_name(),
            hotkey: default_hotkey(),
            show_preview: true,
            require_confirmation: false,
            allow_unsafe: false,
            terminals_only: false,
            single_line: true,
            request_timeout_secs: default_request_timeout_secs(),
            focus_settle_ms: default_focus_settle_ms(),
            paste_settle_ms: default_paste_settle_ms(),
            terminal_profiles: default_profiles(),
        }
    }
}

impl Config {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    pub fn delivery_timing(&self) -> DeliveryTiming {
        DeliveryTiming::from_millis(self.focus_settle_ms, self.paste_settle_ms)
    }

    pub fn line_policy(&self) -> LinePolicy {
        if self.single_line {
            LinePolicy::FirstLine
        } else {
            LinePolicy::Preserve
        }
    }

    pub fn coordinator_options(&self) -> CoordinatorOptions {
        CoordinatorOptions {
            require_confirmation: self.require_confirmation,
            show_preview: self.show_preview,
            terminals_only: self.terminals_only,
            line_policy: self.line_policy(),
        }
    }
}
