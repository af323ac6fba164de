//! Probe command implementation

use anyhow::{Result, bail};
use std::path::Path;

use shorthand::config::Config;

use super::client_from;

/// Check that the inference server answers `GET /api/tags`
pub fn probe_command(config_path: &Path) -> Result<()> {
    let config = Config::load_or_default(config_path);
    let client = client_from(&config);

    if !client.is_available() {
        bail!("Inference server at {} is not reachable", client.base_url());
    }

    println!(
        "Inference server at {} is available (model: {})",
        client.base_url(),
        client.model()
    );
    Ok(())
}
