//! # repodoc CLI
//!
//! ```bash
//! repodoc --config ./config/repodoc.toml <command>
//! ```
//!
//! | Command | Description |
//! |---------|-------------|
//! | `repodoc serve` | Start the HTTP API |
//! | `repodoc readme <repo_url>` | Generate a README and print it to stdout |
//! | `repodoc site <repo_url>` | Scaffold a VitePress site and print the report as JSON |
//!
//! Logs go to stderr and are filtered with `RUST_LOG` (default `repodoc=info`).

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use repodoc::config;
use repodoc::pipeline::Pipeline;
use repodoc::server;

/// repodoc: generate README narratives and VitePress scaffolds for git
/// repositories with a local model.
#[derive(Parser)]
#[command(
    name = "repodoc",
    version,
    about = "Generate baseline documentation for any git repository with a local Ollama model"
)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// Built-in defaults are used when the file does not exist.
    #[arg(long, global = true, default_value = "./config/repodoc.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API server.
    ///
    /// Binds to `[server].bind` and serves `/generate-readme`,
    /// `/generate-vitepress`, and `/health`.
    Serve,

    /// Generate a README for a repository and print it.
    Readme {
        /// Git URL of the repository to document.
        repo_url: String,
    },

    /// Scaffold a VitePress site from a repository's README.
    ///
    /// Writes to `[workspace].site_output_dir`, replacing its contents.
    Site {
        /// Git URL of the repository to document.
        repo_url: String,
    },
}

/// Used when `RUST_LOG` is unset or invalid.
const DEFAULT_LOG_FILTER: &str = "repodoc=info";

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let cfg = config::load_config_or_default(&cli.config)?;

    match cli.command {
        Commands::Serve => {
            server::run_server(&cfg).await?;
        }
        Commands::Readme { repo_url } => {
            let pipeline = Pipeline::from_config(Arc::new(cfg))?;
            let invocation = pipeline.generate_readme(&repo_url).await?;
            println!("{}", invocation.response);
        }
        Commands::Site { repo_url } => {
            let pipeline = Pipeline::from_config(Arc::new(cfg))?;
            let report = pipeline.generate_site(&repo_url).await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}
