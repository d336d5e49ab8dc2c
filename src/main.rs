//! plan-docs CLI
//!
//! Collects document links from council plan pages and classifies them
//! against a table of development-plan document types.

use anyhow::Result;
use clap::{Parser, Subcommand};
use plan_docs::collect::{run_collect, CollectArgs};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "plan-docs")]
#[command(version)]
#[command(about = "Collect and classify document links from plan documentation pages")]
#[command(long_about = "Fetches each documentation page listed in a CSV, keeps links that look like documents and fuzzy-matches their text against a document-type table.\n\nCommands:\n  collect    Collect document links into a CSV")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Collect document links from the pages in a source table
    Collect(CollectArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "plan_docs=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    match cli.command {
        Commands::Collect(args) => run_collect(args).await,
    }
}
