use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use shorthand::config::Config;

mod cli;

#[derive(Parser)]
#[command(name = "shorthand")]
#[command(about = "Turn a plain-language prompt into a shell command, pasted into your terminal")]
#[command(version)]
struct Cli {
    /// Path to the config file (defaults to ~/.shorthand/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Register the global hotkey and wait for prompts (default)
    Run,

    /// Generate one command and print it
    Generate {
        /// What the command should do
        #[arg(required = true)]
        prompt: Vec<String>,

        /// Add the --unsafe hint to the prompt
        #[arg(long = "unsafe")]
        allow_unsafe: bool,

        /// Print the model output without sanitizing it
        #[arg(long)]
        raw: bool,
    },

    /// Check that the inference server is reachable
    Probe,

    /// Manage terminal profiles
    Profiles {
        #[command(subcommand)]
        action: ProfileAction,
    },

    /// Write a default configuration file
    Init {
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Subcommand)]
enum ProfileAction {
    /// List profiles in match order
    List,

    /// Add a profile or replace one with the same name
    Add {
        name: String,

        /// ctrl_v, shift_insert, right_click or custom
        #[arg(long)]
        method: String,

        /// Process name to match (repeatable)
        #[arg(long = "process", required = true)]
        processes: Vec<String>,

        /// Key sequence for the custom method
        #[arg(long)]
        sequence: Option<String>,
    },

    /// Remove a profile
    Remove { name: String },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .init();

    let config_path = cli.config.unwrap_or_else(Config::global_config_path);

    match cli.command {
        Some(Commands::Generate {
            prompt,
            allow_unsafe,
            raw,
        }) => {
            cli::generate::generate_command(&config_path, &prompt, allow_unsafe, raw)?;
        }
        Some(Commands::Probe) => {
            cli::probe::probe_command(&config_path)?;
        }
        Some(Commands::Profiles { action }) => match action {
            ProfileAction::List => cli::profiles::list_command(&config_path)?,
            ProfileAction::Add {
                name,
                method,
                processes,
                sequence,
            } => cli::profiles::add_command(&config_path, &name, &method, &processes, sequence)?,
            ProfileAction::Remove { name } => cli::profiles::remove_command(&config_path, &name)?,
        },
        Some(Commands::Init { force }) => {
            cli::init::init_command(&config_path, force)?;
        }
        Some(Commands::Run) | None => {
            cli::run::run_command(&config_path)?;
        }
    }

    Ok(())
}
