//! Plugin inspection commands.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context as _, Result};
use clap::{Args, Subcommand};
use signet_config::SysFs;
use signet_config::dir::PLUGINS_DIR_NAME;
use signet_plugin::Context;
use signet_plugin::proto::GetMetadataRequest;
use signet_plugin_manager::{FsPluginSource, PluginManager, UnifiedManager};
use signet_plugin_noop::NoopPlugin;

use crate::executor::DetachedExecutor;

/// Plugin inspection commands.
#[derive(Debug, Args)]
pub struct PluginArgs {
    #[command(subcommand)]
    pub command: PluginCommand,
}

#[derive(Debug, Subcommand)]
pub enum PluginCommand {
    /// List built-in and installed plugins
    List,

    /// Show the metadata a plugin reports about itself
    Info(InfoArgs),
}

/// Arguments for the `plugin info` command.
#[derive(Debug, Args)]
pub struct InfoArgs {
    /// Plugin name
    pub name: String,

    /// Give up on the plugin after this many seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,
}

/// Runs the plugin command.
pub fn run(args: PluginArgs, config_fs: &SysFs) -> Result<()> {
    let rt = tokio::runtime::Runtime::new().context("failed to create async runtime")?;

    rt.block_on(async { run_async(args, config_fs).await })
}

async fn run_async(args: PluginArgs, config_fs: &SysFs) -> Result<()> {
    let ctx = Context::new();
    let on_interrupt = ctx.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_interrupt.cancel();
        }
    });

    let manager = manager(&ctx, config_fs).await?;
    match args.command {
        PluginCommand::List => list(&ctx, &manager).await,
        PluginCommand::Info(args) => info(&ctx, &manager, args).await,
    }
}

async fn manager(ctx: &Context, config_fs: &SysFs) -> Result<UnifiedManager> {
    let plugin_fs = config_fs
        .sub(PLUGINS_DIR_NAME)
        .context("failed to locate plugin directory")?;
    let source = FsPluginSource::new(plugin_fs, Arc::new(DetachedExecutor));

    UnifiedManager::new(ctx, vec![Arc::new(NoopPlugin::new())], Some(source))
        .await
        .context("failed to initialize built-in plugins")
}

async fn list(ctx: &Context, manager: &UnifiedManager) -> Result<()> {
    let names = manager
        .list(ctx)
        .await
        .context("failed to list plugins")?;

    if names.is_empty() {
        println!("No plugins available.");
        return Ok(());
    }

    println!("Available plugins:\n");
    for name in names {
        println!("  {name}");
    }

    Ok(())
}

async fn info(ctx: &Context, manager: &UnifiedManager, args: InfoArgs) -> Result<()> {
    let ctx = match args.timeout {
        Some(secs) => ctx.child().timeout(Duration::from_secs(secs)),
        None => ctx.child(),
    };

    let plugin = manager
        .get(&ctx, &args.name)
        .await
        .with_context(|| format!("failed to load plugin {}", args.name))?;
    let metadata = ctx
        .run(plugin.get_metadata(&ctx, &GetMetadataRequest::default()))
        .await
        .with_context(|| format!("failed to fetch metadata for {}", args.name))?;

    println!("Name:        {}", metadata.name);
    println!("Version:     {}", metadata.version);
    println!("Description: {}", metadata.description);
    println!("URL:         {}", metadata.url);
    println!(
        "Contracts:   {}",
        metadata.supported_contract_versions.join(", ")
    );
    println!("\nCapabilities:");
    for capability in &metadata.capabilities {
        println!("  - {capability}");
    }

    Ok(())
}
