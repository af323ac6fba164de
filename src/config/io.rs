//! Configuration file I/O operations

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use fs2::FileExt;

use super::{Config, ConfigError};

const CONFIG_HEADER: &str = "\
# Shorthand configuration
#
# ollama_url            - Base URL of the local Ollama server
# model_name            - Model that turns prompts into shell commands
# hotkey                - Global hotkey, e.g. \"ctrl+g\" or \"ctrl+shift+space\"
# show_preview          - Show the command before pasting it
# require_confirmation  - Ask before pasting
# allow_unsafe          - Default of the prompt's \"Allow unsafe commands\" toggle (a hint only, not a safety control)
# terminals_only        - Ignore the hotkey outside known terminals
# single_line           - Keep only the first line of the model's answer
# request_timeout_secs  - Timeout of one generation request
# focus_settle_ms       - Wait after refocusing the terminal
# paste_settle_ms       - Wait after writing the clipboard
#
# [[terminal_profiles]] are matched in order; the first profile listing the
# focused window's process name decides the paste method:
#   ctrl_v | shift_insert | right_click | custom (needs custom_paste_sequence)

";

impl Config {
    /// Global config directory (~/.shorthand/)
    pub fn global_config_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".shorthand")
    }

    /// Global config file (~/.shorthand/config.toml)
    pub fn global_config_path() -> PathBuf {
        Self::global_config_dir().join("config.toml")
    }

    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load configuration, falling back to defaults.
    ///
    /// A missing file is normal on first run. An unreadable or invalid file
    /// is logged and replaced by defaults in memory; it is never overwritten.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            tracing::debug!("No config at {}, using defaults", path.display());
            return Self::default();
        }

        match Self::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("{}; using default configuration", e);
                Self::default()
            }
        }
    }

    /// Save configuration with file locking and an atomic rename.
    pub fn save_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let write_err = |source: std::io::Error| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }

        let content = format!("{}{}", CONFIG_HEADER, toml::to_string_pretty(self)?);

        // Separate lock file so the rename below does not drop the lock
        let lock_path = path.with_extension("toml.lock");
        let lock_file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&lock_path)
            .map_err(write_err)?;
        lock_file.lock_exclusive().map_err(write_err)?;

        let temp_path = path.with_extension("toml.tmp");
        let mut temp_file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp_path)
            .map_err(write_err)?;
        temp_file
            .write_all(content.as_bytes())
            .map_err(write_err)?;
        temp_file.sync_all().map_err(write_err)?;

        std::fs::rename(&temp_path, path).map_err(write_err)?;

        Ok(())
    }

    /// Write a default configuration to `path`
    pub fn init(path: &Path, force: bool) -> Result<Self, ConfigError> {
        if path.exists() && !force {
            return Err(ConfigError::AlreadyExists(path.to_path_buf()));
        }
        let config = Self::default();
        config.save_to_file(path)?;
        tracing::info!("Wrote default configuration to {}", path.display());
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{PasteMethod, TerminalProfile};
    use tempfile::TempDir;

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.model_name = "llama3".to_string();
        config.terminal_profiles = vec![TerminalProfile::new(
            "putty",
            PasteMethod::RightClick,
            &["putty"],
        )];
        config.save_to_file(&path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("# Shorthand configuration"));

        let loaded = Config::from_file(&path).unwrap();
        assert_eq!(loaded, config);
        assert!(!path.with_extension("toml.tmp").exists());
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_or_default(&dir.path().join("absent.toml"));
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_or_default_invalid_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "model_name = [not toml").unwrap();

        assert!(matches!(Config::from_file(&path), Err(ConfigError::Parse { .. })));
        assert_eq!(Config::load_or_default(&path), Config::default());
        // The broken file is left for the user to fix
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "model_name = [not toml");
    }

    #[test]
    fn test_init_refuses_to_overwrite() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        Config::init(&path, false).unwrap();
        assert!(matches!(
            Config::init(&path, false),
            Err(ConfigError::AlreadyExists(_))
        ));
        assert!(Config::init(&path, true).is_ok());
    }
}
