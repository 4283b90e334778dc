//! CLI binary for meridian.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use meridian::commands::{self, OutputFormat, SearchRequest};
use meridian::config::MeridianConfig;
use meridian_search::EngineId;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// Meridian: query several search engines at once and read GitHub READMEs.
#[derive(Parser)]
#[command(name = "meridian", version, about)]
struct Cli {
    /// Path to TOML configuration file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Search the configured engines and print merged results.
    Search {
        /// Query text.
        query: String,

        /// Maximum results per engine.
        #[arg(short = 'n', long)]
        limit: Option<usize>,

        /// Engine to query (exa, github, duckduckgo). Repeatable.
        #[arg(short, long = "engine")]
        engines: Vec<EngineId>,

        /// Print JSON instead of markdown.
        #[arg(long)]
        json: bool,
    },

    /// Print the README of a GitHub repository URL.
    Readme {
        /// Repository URL, `owner/repo` path, or SSH remote.
        url: String,
    },

    /// Show how a repository URL resolves, without any network access.
    Resolve {
        /// Repository URL, `owner/repo` path, or SSH remote.
        url: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so stdout stays pipeable. Override with RUST_LOG.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("meridian=info,meridian_search=info")),
        )
        .init();

    let cli = Cli::parse();

    if let Command::Resolve { url } = &cli.command {
        print!("{}", commands::run_resolve(url)?);
        return Ok(());
    }

    let mut file_config = MeridianConfig::load(cli.config.as_deref())?;
    file_config.apply_env();
    let config = file_config.to_search_config()?;

    let cancel = CancellationToken::new();
    let ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("interrupted, cancelling outstanding requests");
            ctrl_c.cancel();
        }
    });

    let output = match cli.command {
        Command::Search {
            query,
            limit,
            engines,
            json,
        } => {
            let request = SearchRequest {
                query,
                limit,
                engines,
                output: if json { OutputFormat::Json } else { OutputFormat::Markdown },
            };
            commands::run_search(&config, &request, &cancel).await?
        }
        Command::Readme { url } => commands::run_readme(&config, &url, &cancel).await?,
        Command::Resolve { url } => commands::run_resolve(&url)?,
    };

    print!("{output}");
    if !output.ends_with('\n') {
        println!();
    }
    Ok(())
}
