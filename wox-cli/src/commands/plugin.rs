//! Plugin management commands

use anyhow::{Result, bail};
use clap::{Args, Subcommand};
use comfy_table::{Cell, Color, ContentArrangement, Table, presets::UTF8_FULL_CONDENSED};
use wox_core::plugins::PluginSettingStore;

use super::{format_millis, start_engine, stop_engine};
use crate::builtin;
use crate::config::WoxConfig;

/// Plugin management arguments
#[derive(Args)]
pub struct PluginArgs {
    #[command(subcommand)]
    pub command: PluginCommands,
}

/// Plugin subcommands
#[derive(Subcommand)]
pub enum PluginCommands {
    /// List loaded plugins
    List,
    /// Enable a plugin
    Enable {
        /// Plugin id
        id: String,
    },
    /// Disable a plugin (it stays loaded but answers no queries)
    Disable {
        /// Plugin id
        id: String,
    },
}

/// Run plugin command
pub async fn run(args: PluginArgs, config: &WoxConfig) -> Result<()> {
    match args.command {
        PluginCommands::List => list_plugins(config).await,
        PluginCommands::Enable { id } => set_disabled(config, &id, false),
        PluginCommands::Disable { id } => set_disabled(config, &id, true),
    }
}

async fn list_plugins(config: &WoxConfig) -> Result<()> {
    let manager = start_engine(config).await?;
    let plugins = manager.registry().list_all();

    if plugins.is_empty() {
        println!("No plugins loaded");
        return stop_engine(&manager, config).await;
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Id").fg(Color::Cyan),
        Cell::new("Name").fg(Color::Cyan),
        Cell::new("Runtime").fg(Color::Cyan),
        Cell::new("Keywords").fg(Color::Cyan),
        Cell::new("Status").fg(Color::Cyan),
        Cell::new("Load").fg(Color::Cyan),
        Cell::new("Init").fg(Color::Cyan),
    ]);

    for p in plugins.iter() {
        let status = if p.is_disabled() {
            Cell::new("disabled").fg(Color::Yellow)
        } else {
            Cell::new("enabled").fg(Color::Green)
        };
        table.add_row(vec![
            Cell::new(p.id()),
            Cell::new(p.name()),
            Cell::new(p.metadata().runtime),
            Cell::new(p.trigger_keywords().join(" ")),
            status,
            Cell::new(format_millis(p.load_time())),
            Cell::new(format_millis(p.init_time())),
        ]);
    }

    println!("{table}");
    stop_engine(&manager, config).await
}

fn set_disabled(config: &WoxConfig, id: &str, disabled: bool) -> Result<()> {
    if !builtin::is_builtin(id) {
        bail!("Unknown plugin '{id}'. Run 'wox plugin list' to see plugin ids.");
    }

    let path = &config.settings.path;
    let mut store = PluginSettingStore::load(path)?;
    let mut setting = store.setting_for(id);
    setting.common.disabled = disabled;
    store.set(id, setting);
    store.save(path)?;

    let verb = if disabled { "Disabled" } else { "Enabled" };
    println!("{verb} plugin: {id}");
    Ok(())
}
