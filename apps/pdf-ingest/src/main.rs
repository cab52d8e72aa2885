//! pdf-ingest - batch extraction of exam questions
//!
//! Subcommands:
//!
//! - `ingest`: walk a directory of exam PDFs and store their questions
//! - `categorize`: assign competency and difficulty to stored questions
//! - `extract`: extract a single file and print the result as JSON

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use questoes_db::{MemoryStore, PgStore, QuestionStore};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pdf_ingest::cli::{CategorizeArgs, Cli, Command, ExtractArgs, IngestArgs};
use pdf_ingest::{categorize_all, extract_single, Walker};

const DB_MAX_CONNECTIONS: u32 = 5;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(cli.log_filter()?)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Command::Ingest(args) => ingest(args).await,
        Command::Categorize(args) => categorize(args).await,
        Command::Extract(args) => extract(args),
    }
}

async fn ingest(args: IngestArgs) -> Result<()> {
    let config = args.to_config();

    let store: Arc<dyn QuestionStore> = if args.dry_run {
        info!("Dry run: questions are kept in memory");
        Arc::new(MemoryStore::new())
    } else {
        let url = args
            .database_url
            .as_deref()
            .context("DATABASE_URL must be set (or pass --dry-run)")?;
        Arc::new(
            PgStore::connect(url, DB_MAX_CONNECTIONS)
                .await
                .context("Failed to connect to database")?,
        )
    };

    let report = Walker::new(config, store)
        .run()
        .await
        .context("Ingest aborted")?;

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

async fn categorize(args: CategorizeArgs) -> Result<()> {
    let store = PgStore::connect(&args.database_url, DB_MAX_CONNECTIONS)
        .await
        .context("Failed to connect to database")?;

    let report = categorize_all(
        &store,
        args.page_size,
        Duration::from_millis(args.batch_delay_ms),
    )
    .await
    .context("Categorization aborted")?;

    info!(
        "Categorization finished: {} updated, {} failed",
        report.updated, report.failed
    );
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn extract(args: ExtractArgs) -> Result<()> {
    let result = extract_single(&args.file, args.gabarito.as_deref(), args.max_pages)
        .with_context(|| format!("Failed to extract {}", args.file.display()))?;

    info!(
        "{}: {} question(s), {} with answers",
        args.file.display(),
        result.len(),
        result.answered()
    );
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
