//! One-shot generation from the command line

use anyhow::{Context, Result, bail};
use std::path::Path;

use shorthand::config::Config;
use shorthand::generation::CommandGenerator;
use shorthand::sanitize::sanitize_with;

use super::client_from;

/// Generate a command for `prompt` and print it
pub fn generate_command(
    config_path: &Path,
    prompt: &[String],
    allow_unsafe: bool,
    raw: bool,
) -> Result<()> {
    let config = Config::load_or_default(config_path);
    let prompt = prompt.join(" ");
    if prompt.trim().is_empty() {
        bail!("Please enter a prompt");
    }

    let client = client_from(&config);
    let output = client
        .generate(prompt.trim(), allow_unsafe || config.allow_unsafe)
        .with_context(|| format!("Generation with model '{}' failed", config.model_name))?;

    if raw {
        println!("{}", output);
        return Ok(());
    }

    let command = sanitize_with(&output, config.line_policy());
    if command.is_empty() {
        bail!("No command generated");
    }
    println!("{}", command);
    Ok(())
}
