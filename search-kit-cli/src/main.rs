//! Index lifecycle management command.
//!
//! Usage: `search-kit <name> [--create|-c] [--update|-u] [--delete|-d]
//! [--verbose|-v]`. Exits 0 on success, 1 on error.

use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use search_kit::IndexOptions;
use search_kit_cli::{CliError, Dependencies};

#[derive(Parser)]
#[command(name = "search-kit")]
#[command(about = "Manages search kit indices", long_about = None)]
struct Cli {
    /// The name of the index to manage.
    name: String,

    /// Create the index if it does not exist.
    #[arg(short, long)]
    create: bool,

    /// Update the index mappings if it exists.
    #[arg(short, long)]
    update: bool,

    /// Delete the index if it exists.
    #[arg(short, long)]
    delete: bool,

    /// Print the configured settings and mappings.
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        error!(error = %e, "Index command failed");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let mut deps = Dependencies::new().await?;
    let handle = deps.registry.get(&cli.name, IndexOptions::default())?;
    let index_name = handle.index_name()?.to_string();

    if cli.delete {
        if handle.index_exists().await? {
            info!(index = %index_name, "Deleting index");
            handle.delete_index().await?;
        } else {
            warn!(index = %index_name, "Index does not exist, nothing to delete");
        }

        return Ok(());
    }

    if cli.update {
        if handle.index_exists().await? {
            info!(index = %index_name, "Updating index mappings");
            handle.update_index().await?;
        } else {
            warn!(index = %index_name, "Index does not exist, nothing to update");
        }

        return Ok(());
    }

    if cli.create {
        if handle.index_exists().await? {
            warn!(index = %index_name, "Index already exists, nothing to create");
        } else {
            info!(index = %index_name, "Creating index");
            handle.create_index().await?;
        }
    }

    if cli.verbose {
        println!("Index settings:");
        println!("{}", serde_json::to_string_pretty(handle.settings())?);
        println!();
        println!("Index mappings:");
        println!("{}", serde_json::to_string_pretty(handle.mappings())?);
    }

    Ok(())
}
