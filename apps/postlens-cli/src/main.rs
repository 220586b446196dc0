//! Postlens CLI
//!
//! Extract the text of a document and get an AI content analysis of it from
//! the terminal.

mod commands;
mod config;
mod output;

use clap::{Parser, Subcommand};
use colored::Colorize;
use config::CliConfig;
use postlens_core::AppConfig;
use postlens_observability::{init_tracing, TracingConfig};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(
    name = "postlens",
    author = "Postlens Team",
    version,
    about = "Postlens - document text extraction and AI content analysis",
    long_about = "A command-line interface for the Postlens extraction and analysis services.\n\n\
                  Submit a PDF or image, get its text extracted, then a summary,\n\
                  a sentiment and suggestions for better engagement."
)]
struct Cli {
    /// Base URL of the extraction and analysis services
    #[arg(short, long, env = "POSTLENS_API_URL")]
    api_url: Option<String>,

    /// Request timeout in seconds (no timeout by default)
    #[arg(short, long, env = "POSTLENS_TIMEOUT")]
    timeout: Option<u64>,

    /// Output format (text, json, yaml)
    #[arg(short, long, value_parser = ["text", "json", "yaml"])]
    format: Option<String>,

    /// Configuration file (defaults to ~/.config/postlens/config.toml)
    #[arg(long, env = "POSTLENS_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract a document's text and analyze it
    Analyze {
        /// Document to analyze. Only the first file is used.
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Also print the extracted text
        #[arg(long)]
        show_text: bool,
    },

    /// Extract a document's text without analyzing it
    Extract {
        /// Document to extract
        file: PathBuf,
    },

    /// Configuration management
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Display version information
    Version {
        /// Show all component versions
        #[arg(short, long)]
        all: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell type
        #[arg(value_parser = ["bash", "zsh", "fish", "powershell"])]
        shell: String,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key
        key: String,
        /// Configuration value
        value: String,
    },
    /// Get a configuration value
    Get {
        /// Configuration key
        key: String,
    },
    /// Reset configuration to defaults
    Reset {
        /// Skip confirmation
        #[arg(short, long)]
        force: bool,
    },
    /// Print the configuration file path
    Path,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }

    let result = run(cli).await;

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {}", "Error".red().bold(), e);
            for cause in e.chain().skip(1) {
                eprintln!("{}: {}", "Caused by".yellow(), cause);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let app_config = AppConfig::load()?;

    let mut tracing_config = TracingConfig::from_logging(&app_config.logging)
        .with_service_name("postlens-cli")
        .with_color(!cli.no_color);
    if cli.verbose {
        tracing_config = tracing_config.with_log_level("debug");
    }
    if let Err(e) = init_tracing(&tracing_config) {
        output::warning(&format!("Logging disabled: {}", e));
    }

    let config_path = CliConfig::resolve_path(cli.config.as_deref())?;
    let cli_config = CliConfig::load_from(&config_path)?;
    let settings = cli_config.resolve(
        cli.api_url.as_deref(),
        cli.timeout,
        cli.format.as_deref(),
        &app_config,
    )?;
    tracing::debug!(api_url = %settings.api_url, format = %settings.format, "Resolved settings");

    match cli.command {
        Commands::Analyze { files, show_text } => {
            commands::analyze::run(&settings, &files, show_text).await
        }
        Commands::Extract { file } => commands::extract::run(&settings, &file)
            .await
            .map(|_| ExitCode::SUCCESS),
        Commands::Config(cmd) => commands::config::run(cmd, &config_path, settings.format)
            .map(|_| ExitCode::SUCCESS),
        Commands::Version { all } => {
            commands::version::run(all, settings.format).map(|_| ExitCode::SUCCESS)
        }
        Commands::Completions { shell } => {
            commands::completions::run(&shell).map(|_| ExitCode::SUCCESS)
        }
    }
}
