//! Init command implementation

use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

use shorthand::config::Config;

/// Write the default configuration to `config_path`
pub fn init_command(config_path: &Path, force: bool) -> Result<()> {
    let config = Config::init(config_path, force)
        .with_context(|| format!("Failed to initialize {}", config_path.display()))?;

    info!("Initialized configuration");
    println!("Created {}", config_path.display());
    println!();
    println!("  Ollama server: {}", config.ollama_url);
    println!("  Model:         {}", config.model_name);
    println!("  Hotkey:        {}", config.hotkey);
    println!("  Profiles:      {}", config.terminal_profiles.len());
    println!();
    println!("Start with: shorthand run");

    Ok(())
}
