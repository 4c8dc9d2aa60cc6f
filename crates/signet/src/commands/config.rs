//! Settings commands.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use signet_config::{SettingsStore, SysFs};

/// Settings commands.
#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the settings file
    Show,

    /// Check whether a registry is insecure, or mark it as insecure
    Insecure(InsecureArgs),
}

/// Arguments for the `config insecure` command.
#[derive(Debug, Args)]
pub struct InsecureArgs {
    /// Registry host, optionally with port
    pub registry: String,

    /// Add the registry to the insecure list
    #[arg(long)]
    pub add: bool,
}

/// Runs the config command.
pub fn run(args: ConfigArgs, config_fs: &SysFs) -> Result<()> {
    let store = SettingsStore::in_dir(config_fs).context("failed to locate settings file")?;

    match args.command {
        ConfigCommand::Show => show(&store),
        ConfigCommand::Insecure(args) => insecure(&store, &args),
    }
}

fn show(store: &SettingsStore) -> Result<()> {
    let settings = store
        .load_from_cache()
        .with_context(|| format!("failed to load {}", store.path().display()))?;

    println!("# {}", store.path().display());
    println!(
        "{}",
        serde_json::to_string_pretty(settings.as_ref()).context("failed to render settings")?
    );

    Ok(())
}

fn insecure(store: &SettingsStore, args: &InsecureArgs) -> Result<()> {
    let settings = store
        .load_from_cache()
        .with_context(|| format!("failed to load {}", store.path().display()))?;
    let listed = settings.is_registry_insecure(&args.registry);

    if !args.add {
        if listed {
            println!("{} is insecure", args.registry);
        } else {
            println!("{} is not insecure", args.registry);
        }
        return Ok(());
    }

    if listed {
        println!("{} is already insecure", args.registry);
        return Ok(());
    }

    let mut updated = settings.as_ref().clone();
    updated.insecure_registries.push(args.registry.clone());
    store
        .save(&updated)
        .with_context(|| format!("failed to save {}", store.path().display()))?;

    println!("Marked {} as insecure", args.registry);

    Ok(())
}
