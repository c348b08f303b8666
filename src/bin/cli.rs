//! Project crawler CLI
//!
//! Crawls the project index, enriches each project with its team, and writes
//! `output.json` and `output.csv`.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use project_crawler::{
    error::Result,
    models::Config,
    pipeline::{self, ExportOutcome},
    services::HttpFetcher,
    storage::LocalStorage,
    utils::http,
};

/// Part IV project crawler
#[derive(Parser, Debug)]
#[command(
    name = "project-crawler",
    version,
    about = "Collects project titles and team members from the project listing"
)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Crawl the index and project pages, then write the outputs (default)
    Crawl {
        /// Override the index page URL
        #[arg(long)]
        index_url: Option<String>,

        /// Override the output directory
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },

    /// Validate the configuration file
    Validate,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = Config::load_or_default(&cli.config);

    match cli.command.unwrap_or(Command::Crawl {
        index_url: None,
        output_dir: None,
    }) {
        Command::Crawl {
            index_url,
            output_dir,
        } => {
            if let Some(url) = index_url {
                config.target.index_url = url;
            }
            if let Some(dir) = output_dir {
                config.output.dir = dir.to_string_lossy().into_owned();
            }
            config.validate()?;

            let client = http::create_async_client(&config.crawler, &config.target)?;
            let fetcher = HttpFetcher::new(client, config.target.clone());
            let storage = LocalStorage::new(&config.output);

            let report = pipeline::run_crawler(&config, &fetcher, &storage).await?;

            log::info!(
                "Crawl finished in {}s: {} projects, {} with teams, {} page failures",
                (report.end_time - report.start_time).num_seconds(),
                report.records.len(),
                report.enriched_count(),
                report.detail.failures
            );
            for (kind, outcome) in [("JSON", &report.json_output), ("CSV", &report.csv_output)] {
                match outcome {
                    ExportOutcome::Written(path) => {
                        log::info!("{} output: {}", kind, path.display())
                    }
                    ExportOutcome::Failed(message) => {
                        log::warn!("{} output not written: {}", kind, message)
                    }
                }
            }
        }

        Command::Validate => {
            log::info!("Validating configuration...");

            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!("Index URL: {}", config.target.index_url);
            log::info!("Allowed domains: {:?}", config.target.allowed_domains);
            log::info!(
                "Timeout: {}s, max concurrent visits: {}",
                config.crawler.timeout_secs,
                config.crawler.max_concurrent
            );
            log::info!(
                "Outputs: {}/{{{}, {}}}",
                config.output.dir,
                config.output.json_file,
                config.output.csv_file
            );
            log::info!("✓ Config OK");
        }
    }

    Ok(())
}
