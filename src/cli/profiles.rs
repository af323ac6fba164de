//! Terminal profile management

use anyhow::{Context, Result, bail};
use std::path::Path;

use shorthand::config::Config;
use shorthand::profile::{PasteMethod, TerminalProfile};

use super::registry_from;

/// Print every profile in match order
pub fn list_command(config_path: &Path) -> Result<()> {
    let config = Config::load_or_default(config_path);
    let registry = registry_from(&config, config_path);
    let profiles = registry.list();

    if profiles.is_empty() {
        println!("No terminal profiles configured.");
        return Ok(());
    }

    println!("Terminal profiles ({}):\n", profiles.len());
    for profile in &profiles {
        println!(
            "  {:<18} {:<13} {}",
            profile.name,
            profile.paste_method.to_string(),
            profile.process_names.join(", ")
        );
        if let Some(sequence) = &profile.custom_paste_sequence {
            println!("  {:<18} sequence: {}", "", sequence);
        }
    }

    for overlap in registry.overlaps() {
        println!(
            "\nwarning: process '{}' is claimed by '{}' and '{}'; '{}' wins",
            overlap.process, overlap.winner, overlap.shadowed, overlap.winner
        );
    }

    Ok(())
}

/// Add a profile, or replace the one with the same name
pub fn add_command(
    config_path: &Path,
    name: &str,
    method: &str,
    processes: &[String],
    sequence: Option<String>,
) -> Result<()> {
    let Some(paste_method) = PasteMethod::parse(method) else {
        bail!(
            "Unknown paste method '{}' (expected ctrl_v, shift_insert, right_click or custom)",
            method
        );
    };

    let config = Config::load_or_default(config_path);
    let registry = registry_from(&config, config_path);

    let processes: Vec<&str> = processes.iter().map(String::as_str).collect();
    let mut profile = TerminalProfile::new(name, paste_method, &processes);
    if let Some(sequence) = sequence {
        profile = profile.with_sequence(sequence);
    }

    registry
        .upsert(profile)
        .with_context(|| format!("Failed to save profile '{}'", name))?;
    println!("Saved profile '{}' ({})", name, paste_method);
    Ok(())
}

/// Remove the profile called `name`
pub fn remove_command(config_path: &Path, name: &str) -> Result<()> {
    let config = Config::load_or_default(config_path);
    let registry = registry_from(&config, config_path);

    registry
        .remove(name)
        .with_context(|| format!("Failed to remove profile '{}'", name))?;
    println!("Removed profile '{}'", name);
    Ok(())
}
