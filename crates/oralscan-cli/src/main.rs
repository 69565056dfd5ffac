use std::path::PathBuf;

use clap::{Parser, Subcommand};
use eyre::Result;

use oralscan_cli::commands::{self, AnalyzeArgs, InitArgs};
use oralscan_cli::config;

#[derive(Parser)]
#[command(name = "oralscan")]
#[command(about = "Oral lesion classification, suggestions, and reports")]
#[command(version)]
struct Cli {
    /// Config file to use instead of the per-user default.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Emit logs as JSON.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify an image, print the result and suggestions, write the report.
    Analyze(AnalyzeArgs),

    /// Check that the classifier service is reachable.
    Health,

    Config {
        #[command(subcommand)]
        subcommand: ConfigCommand,
    },
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Print the effective config with secrets redacted.
    Show,
    /// Write a fresh config file.
    Init(InitArgs),
    /// Remove the config file.
    Delete,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_tracing(cli.json);

    let path = match cli.config {
        Some(path) => path,
        None => config::config_path()?,
    };

    match cli.command {
        Commands::Analyze(args) => {
            let config = config::apply_env_overrides(config::load_or_default(&path)?);
            commands::analyze(&config, args).await
        }
        Commands::Health => {
            let config = config::apply_env_overrides(config::load_or_default(&path)?);
            commands::health(&config).await
        }
        Commands::Config { subcommand } => match subcommand {
            ConfigCommand::Show => {
                let config = config::apply_env_overrides(config::load_or_default(&path)?);
                commands::config_show(&path, &config)
            }
            ConfigCommand::Init(args) => commands::config_init(&path, args),
            ConfigCommand::Delete => commands::config_delete(&path),
        },
    }
}

fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}
