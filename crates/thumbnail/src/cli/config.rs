//! The `thumbnail config` command for configuration management.

use clap::{Args, Subcommand};
use thumbnail_core::Config;

/// Arguments for the `config` command.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Subcommands for configuration management.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Display the effective configuration
    Show,

    /// Show the config file search path
    Path,

    /// Initialize a new config file with defaults
    Init {
        /// Write to the platform config directory instead of ./config
        #[arg(long)]
        global: bool,

        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
}

/// Execute the config command.
pub async fn execute(args: ConfigArgs, config: Config) -> anyhow::Result<()> {
    match args.command {
        ConfigCommand::Show => {
            println!("{}", config.to_toml()?);
        }

        ConfigCommand::Path => {
            for path in Config::candidate_paths() {
                let marker = if path.exists() { " (found)" } else { "" };
                println!("{}{}", path.display(), marker);
            }
        }

        ConfigCommand::Init { global, force } => {
            let path = if global {
                Config::default_path()
            } else {
                std::path::PathBuf::from("config").join(Config::file_name())
            };

            if path.exists() && !force {
                anyhow::bail!(
                    "Config file already exists at: {}\nUse --force to overwrite.",
                    path.display()
                );
            }

            // Ensure parent directory exists
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }

            let toml = Config::default().to_toml()?;
            std::fs::write(&path, toml)?;

            tracing::info!("Config file created at: {}", path.display());
            println!("Configuration initialized at: {}", path.display());
        }
    }

    Ok(())
}
