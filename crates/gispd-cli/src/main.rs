//! CLI application for exporting utility payment documents to GIS ZHKH.

mod commands;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use commands::{batch, config, process};

/// GIS ZHKH export - Merge payment document workbooks into the import template
#[derive(Parser)]
#[command(name = "gispd")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Defaults to `batch` with configured paths
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Export every payment document of the input directory
    Batch(batch::BatchArgs),

    /// Transform a single payment document
    Process(process::ProcessArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Some(Commands::Batch(args)) => batch::run(args, cli.config.as_deref()).await,
        Some(Commands::Process(args)) => process::run(args, cli.config.as_deref()).await,
        Some(Commands::Config(args)) => config::run(args, cli.config.as_deref()).await,
        None => batch::run(batch::BatchArgs::default(), cli.config.as_deref()).await,
    }
}
