//! CLI command implementations

pub mod generate;
pub mod init;
pub mod probe;
pub mod profiles;
pub mod run;

use std::sync::Arc;

use shorthand::config::{Config, ConfigProfileStore};
use shorthand::generation::OllamaClient;
use shorthand::profile::ProfileRegistry;
use std::path::Path;

/// Client for the server and model named in `config`
pub fn client_from(config: &Config) -> OllamaClient {
    OllamaClient::new(
        config.ollama_url.as_str(),
        config.model_name.as_str(),
        config.request_timeout(),
    )
}

/// Registry over the configured profiles, writing edits back to `config_path`
pub fn registry_from(config: &Config, config_path: &Path) -> Arc<ProfileRegistry> {
    Arc::new(ProfileRegistry::new(
        config.terminal_profiles.clone(),
        Arc::new(ConfigProfileStore::new(config_path)),
    ))
}
