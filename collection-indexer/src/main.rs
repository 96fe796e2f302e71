//! Collection Indexer Main Entry Point
//!
//! Operator commands: rebuild the whole index, empty it, or check that the
//! search engine is reachable.

use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use collection_indexer::{Dependencies, IndexerConfig, IndexingError};
use collection_indexer_repository::ConnectionOverrides;
use dotenv::dotenv;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Collection indexer command-line interface
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Repository snapshot to read records from
    #[arg(long, env = "SNAPSHOT_PATH", global = true)]
    snapshot: Option<PathBuf>,

    /// Directory holding the addon sources
    #[arg(long, env = "ADDON_DIR", global = true)]
    addons: Option<PathBuf>,

    /// Search host, overriding SEARCH_HOST
    #[arg(long, global = true)]
    host: Option<String>,

    /// Search port, overriding SEARCH_PORT
    #[arg(long, global = true)]
    port: Option<u16>,

    /// Search core (index alias), overriding SEARCH_CORE
    #[arg(long, global = true)]
    core: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    /// Reindex every item and addon record
    IndexAll,
    /// Remove every document from the index
    DeleteAll,
    /// Check whether the search engine is reachable
    Ping,
}

impl Cli {
    fn overrides(&self) -> ConnectionOverrides {
        ConnectionOverrides {
            host: self.host.clone(),
            port: self.port,
            core: self.core.clone(),
        }
    }

    fn config(&self) -> IndexerConfig {
        let mut config = IndexerConfig::from_env();
        if let Some(snapshot) = &self.snapshot {
            config.snapshot_path = Some(snapshot.clone());
        }
        if let Some(addons) = &self.addons {
            config.addon_dir = addons.clone();
        }
        config
    }
}

/// Initialize tracing/logging.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("collection_indexer=info,collection_indexer_repository=info")
    });

    let json = env::var("LOG_FORMAT")
        .map(|f| f.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(true),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_target(true).pretty())
            .init();
    }

    info!(
        service_name = "collection-indexer",
        service_version = env!("CARGO_PKG_VERSION"),
        json = json,
        "Tracing initialized"
    );
}

async fn run(cli: Cli) -> Result<bool, IndexingError> {
    let config = cli.config();
    let overrides = cli.overrides();

    match cli.command {
        Command::IndexAll => {
            let mut deps = Dependencies::connect(&config, &overrides).await?;
            let report = deps.orchestrator.index_all().await?;
            for diagnostic in &report.diagnostics {
                warn!(%diagnostic, "Measurement not indexed");
            }
            info!(
                items = report.items,
                addon_documents = report.addon_documents,
                failed = report.failed,
                "Index rebuilt"
            );
            Ok(report.failed == 0)
        }
        Command::DeleteAll => {
            let deps = Dependencies::connect(&config, &overrides).await?;
            deps.orchestrator.delete_all().await?;
            info!("Index emptied");
            Ok(true)
        }
        Command::Ping => {
            let deps = Dependencies::new(&config, &overrides).await?;
            let reachable = deps.orchestrator.ping().await;
            if reachable {
                info!("Search engine reachable");
            } else {
                error!("Search engine unreachable");
            }
            Ok(reachable)
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load environment variables from .env file
    dotenv().ok();

    let cli = Cli::parse();
    init_tracing();

    match run(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!(error = %e, "Collection indexer failed");
            ExitCode::FAILURE
        }
    }
}
