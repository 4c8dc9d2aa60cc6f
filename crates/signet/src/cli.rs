//! CLI definition.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use signet_config::SysFs;

use crate::commands;

/// Inspect signing plugins and settings.
#[derive(Debug, Parser)]
#[command(name = "signet")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration directory (defaults to the user configuration directory)
    #[arg(long, global = true, env = "SIGNET_CONFIG_DIR", value_name = "DIR")]
    pub config_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Inspect available plugins (list, info)
    Plugin(commands::plugin::PluginArgs),

    /// Show and edit settings
    Config(commands::config::ConfigArgs),
}

impl Cli {
    /// Runs the CLI command.
    pub fn run(self) -> Result<()> {
        let config_fs = match self.config_dir {
            Some(dir) => SysFs::new(dir),
            None => signet_config::config_fs().context("failed to locate configuration directory")?,
        };

        match self.command {
            Commands::Plugin(args) => commands::plugin::run(args, &config_fs),
            Commands::Config(args) => commands::config::run(args, &config_fs),
        }
    }
}
