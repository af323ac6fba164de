//! Profile persistence backed by the config file

use std::path::{Path, PathBuf};

use super::Config;
use crate::profile::{ProfileError, ProfileStore, TerminalProfile};

/// Writes `terminal_profiles` into the config file, leaving other settings as
/// they are on disk.
pub struct ConfigProfileStore {
    path: PathBuf,
}

impl ConfigProfileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ProfileStore for ConfigProfileStore {
    fn persist(&self, profiles: &[TerminalProfile]) -> Result<(), ProfileError> {
        let mut config = if self.path.exists() {
            Config::from_file(&self.path).map_err(|e| ProfileError::Persist(e.to_string()))?
        } else {
            Config::default()
        };
        config.terminal_profiles = profiles.to_vec();
        config
            .save_to_file(&self.path)
            .map_err(|e| ProfileError::Persist(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{PasteMethod, ProfileRegistry};
    use std::sync::Arc;
    use tempfile::TempDir;

    #[test]
    fn test_registry_edits_reach_config_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.model_name = "custom-model".to_string();
        config.terminal_profiles.clear();
        config.save_to_file(&path).unwrap();

        let registry = ProfileRegistry::new(
            Vec::new(),
            Arc::new(ConfigProfileStore::new(&path)),
        );
        registry
            .upsert(TerminalProfile::new("putty", PasteMethod::RightClick, &["putty"]))
            .unwrap();

        let on_disk = Config::from_file(&path).unwrap();
        assert_eq!(on_disk.model_name, "custom-model");
        assert_eq!(on_disk.terminal_profiles.len(), 1);
        assert_eq!(on_disk.terminal_profiles[0].paste_method, PasteMethod::RightClick);

        registry.remove("putty").unwrap();
        assert!(Config::from_file(&path).unwrap().terminal_profiles.is_empty());
    }

    #[test]
    fn test_broken_config_is_not_clobbered() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "hotkey = ").unwrap();

        let store = ConfigProfileStore::new(&path);
        assert!(matches!(store.persist(&[]), Err(ProfileError::Persist(_))));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "hotkey = ");
    }
}
