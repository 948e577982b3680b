//! Command-line interface for repolens
//!
//! One subcommand per user-facing operation against the digest service,
//! plus local digest inspection.

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::{load_settings, Settings};

mod ask;
mod delete;
mod generate;
mod inspect;
mod list;
mod show;
mod utils;

/// Browse repository digests and chat about the code inside them
#[derive(Parser)]
#[command(name = "repolens")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging (sets log level to DEBUG)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Settings file (discovered in the working directory when omitted)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Digest service base URL (overrides the settings file)
    #[arg(long, global = true, value_name = "URL")]
    server: Option<String>,

    /// Bearer token for the digest service
    #[arg(long, global = true, env = "REPOLENS_TOKEN", hide_env_values = true)]
    token: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// List the digests stored for this account
    List(list::ListArgs),

    /// Generate a new digest from a repository URL
    Generate(generate::GenerateArgs),

    /// Delete a stored digest
    Delete(delete::DeleteArgs),

    /// Parse a digest and print its file tree
    Inspect(inspect::InspectArgs),

    /// Print one file's content from a digest
    Show(show::ShowArgs),

    /// Ask the model about a digest's files
    Ask(Box<ask::AskArgs>),

    /// Generate shell completion scripts
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // Wire verbose flag to the tracing log level.
    // RUST_LOG in the environment always takes precedence; --verbose falls back to DEBUG.
    let filter = if cli.verbose {
        EnvFilter::from_default_env().add_directive(Level::DEBUG.into())
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();

    if let Commands::Completions { shell } = &cli.command {
        clap_complete::generate(*shell, &mut Cli::command(), "repolens", &mut io::stdout());
        return Ok(());
    }

    let settings = resolve_settings(&cli)?;

    // All network and file suspension happens on this one thread; the core
    // state machine never needs more.
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    match cli.command {
        Commands::List(args) => runtime.block_on(list::run(args, &settings)),
        Commands::Generate(args) => runtime.block_on(generate::run(args, &settings)),
        Commands::Delete(args) => runtime.block_on(delete::run(args, &settings)),
        Commands::Inspect(args) => runtime.block_on(inspect::run(args, &settings)),
        Commands::Show(args) => runtime.block_on(show::run(args, &settings)),
        Commands::Ask(args) => runtime.block_on(ask::run(*args, &settings)),
        Commands::Completions { .. } => unreachable!("handled above"),
    }
}

fn resolve_settings(cli: &Cli) -> Result<Settings> {
    let cwd = std::env::current_dir().context("Cannot determine working directory")?;
    let mut settings = load_settings(&cwd, cli.config.as_deref())?;

    if let Some(server) = &cli.server {
        settings.server_url = server.clone();
    }
    if let Some(token) = &cli.token {
        settings.api_token = Some(token.clone());
    }

    Ok(settings)
}
