use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod builtin;
mod commands;
mod config;

use config::ConfigLoader;

#[derive(Parser)]
#[command(name = "wox", about = "Run the wox plugin engine from a terminal")]
#[command(version, propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Dispatch a query to the loaded plugins
    Query(commands::query::QueryArgs),
    /// Manage plugins
    Plugin(commands::plugin::PluginArgs),
    /// Validate a plugin.json descriptor
    Metadata(commands::metadata::MetadataArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = ConfigLoader::load();

    // RUST_LOG wins, then --verbose, then the configured level
    let level = match (&config, cli.verbose) {
        (_, true) => "debug".to_string(),
        (Ok(config), false) => config.log.level.clone(),
        (Err(_), false) => "info".to_string(),
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = config?;
    match cli.command {
        Commands::Query(args) => commands::query::run(args, &config).await,
        Commands::Plugin(args) => commands::plugin::run(args, &config).await,
        Commands::Metadata(args) => commands::metadata::run(args),
    }
}
