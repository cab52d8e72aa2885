//! Command-line arguments

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

use crate::config::{
    IngestConfig, DEFAULT_BATCH_DELAY_MS, DEFAULT_FILE_BATCH_SIZE, DEFAULT_INSERT_BATCH_SIZE,
    DEFAULT_MAX_PAGES,
};

#[derive(Parser, Debug)]
#[command(name = "pdf-ingest")]
#[command(about = "Extract exam questions from PDF files into the question store")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Walk a directory of exam PDFs and store their questions
    Ingest(IngestArgs),
    /// Fill in competency and difficulty for stored questions
    Categorize(CategorizeArgs),
    /// Extract one file and print the result as JSON
    Extract(ExtractArgs),
}

#[derive(Args, Debug)]
pub struct IngestArgs {
    /// Directory holding exam PDFs (and their *_gabarito files)
    #[arg(long, env = "PDF_DIR")]
    pub dir: PathBuf,

    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Pages read per document
    #[arg(long, env = "MAX_PAGES", default_value_t = DEFAULT_MAX_PAGES)]
    pub max_pages: u32,

    /// Files extracted concurrently per batch
    #[arg(long, env = "FILE_BATCH_SIZE", default_value_t = DEFAULT_FILE_BATCH_SIZE)]
    pub file_batch_size: usize,

    /// Questions inserted per store batch
    #[arg(long, env = "INSERT_BATCH_SIZE", default_value_t = DEFAULT_INSERT_BATCH_SIZE)]
    pub insert_batch_size: usize,

    /// Delay between batches in milliseconds
    #[arg(long, env = "BATCH_DELAY_MS", default_value_t = DEFAULT_BATCH_DELAY_MS)]
    pub batch_delay_ms: u64,

    /// Use an in-memory store instead of the database
    #[arg(long)]
    pub dry_run: bool,
}

impl IngestArgs {
    pub fn to_config(&self) -> IngestConfig {
        IngestConfig {
            pdf_dir: self.dir.clone(),
            max_pages: self.max_pages,
            file_batch_size: self.file_batch_size,
            insert_batch_size: self.insert_batch_size,
            batch_delay: Duration::from_millis(self.batch_delay_ms),
        }
        .normalized()
    }
}

#[derive(Args, Debug)]
pub struct CategorizeArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: String,

    /// Questions fetched and updated per page
    #[arg(long, env = "INSERT_BATCH_SIZE", default_value_t = DEFAULT_INSERT_BATCH_SIZE)]
    pub page_size: usize,

    /// Delay between pages in milliseconds
    #[arg(long, env = "BATCH_DELAY_MS", default_value_t = DEFAULT_BATCH_DELAY_MS)]
    pub batch_delay_ms: u64,
}

#[derive(Args, Debug)]
pub struct ExtractArgs {
    /// Exam file (.pdf or .txt)
    pub file: PathBuf,

    /// Matching answer key file
    #[arg(long)]
    pub gabarito: Option<PathBuf>,

    /// Pages read from each document
    #[arg(long, env = "MAX_PAGES", default_value_t = DEFAULT_MAX_PAGES)]
    pub max_pages: u32,
}

/// Crates whose logs follow `--verbose`
const LOGGED_CRATES: [&str; 3] = ["pdf_ingest", "shared_pdf", "questoes_db"];

impl Cli {
    /// `RUST_LOG` plus a directive per pipeline crate at the chosen level
    pub fn log_filter(&self) -> Result<EnvFilter, ParseError> {
        let level = if self.verbose { Level::DEBUG } else { Level::INFO };
        LOGGED_CRATES
            .iter()
            .try_fold(EnvFilter::from_default_env(), |filter, name| {
                Ok(filter.add_directive(format!("{}={}", name, level).parse()?))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_filter_covers_pipeline_crates() {
        let cli = Cli::try_parse_from([
            "pdf-ingest",
            "--verbose",
            "categorize",
            "--database-url",
            "postgres://localhost/questoes",
        ])
        .unwrap();
        let filter = cli.log_filter().unwrap().to_string().to_lowercase();
        for name in LOGGED_CRATES {
            assert!(filter.contains(&format!("{}=debug", name)), "{}", filter);
        }
        assert!(filter.contains("questoes_db=debug"));
    }

    #[test]
    fn test_ingest_defaults() {
        let cli = Cli::try_parse_from(["pdf-ingest", "ingest", "--dir", "/data/provas", "--dry-run"])
            .unwrap();
        let Command::Ingest(args) = cli.command else {
            panic!("expected ingest subcommand");
        };
        assert!(args.dry_run);

        let config = args.to_config();
        assert_eq!(config.pdf_dir, PathBuf::from("/data/provas"));
        assert_eq!(config.file_batch_size, DEFAULT_FILE_BATCH_SIZE);
        assert_eq!(config.batch_delay, Duration::from_millis(DEFAULT_BATCH_DELAY_MS));
    }

    #[test]
    fn test_extract_with_gabarito_and_verbose() {
        let cli = Cli::try_parse_from([
            "pdf-ingest",
            "extract",
            "prova.pdf",
            "--gabarito",
            "prova_gabarito.pdf",
            "-v",
        ])
        .unwrap();
        assert!(cli.verbose);
        let Command::Extract(args) = cli.command else {
            panic!("expected extract subcommand");
        };
        assert_eq!(args.file, PathBuf::from("prova.pdf"));
        assert_eq!(args.gabarito, Some(PathBuf::from("prova_gabarito.pdf")));
    }
}
