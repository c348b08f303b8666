// src/pipeline/crawl.rs

//! Two-phase project crawling pipeline.
//!
//! 1. Index: fetch the listing page and append one record per project anchor.
//! 2. Detail: visit every collected URL and merge the team list into its record.
//!
//! Phase 1 completes before Phase 2 starts; the Phase 2 visit list is the
//! store's content at that moment. Outputs are written once all visits return.

use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use url::Url;

use crate::error::{AppError, Result};
use crate::models::{CompiledSelectors, Config, CrawlerConfig, ProjectRecord};
use crate::services::{PageFetcher, RecordStore, parse_project_links, parse_team_lists};
use crate::storage::ProjectStorage;

/// Result of writing one output file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    Written(PathBuf),
    Failed(String),
}

impl ExportOutcome {
    fn from_result(kind: &str, result: Result<PathBuf>) -> Self {
        match result {
            Ok(path) => Self::Written(path),
            Err(error) => {
                log::error!("Error writing {} output: {}", kind, error);
                Self::Failed(error.to_string())
            }
        }
    }
}

/// Counts from the index phase.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct IndexOutcome {
    /// Records appended to the store
    pub discovered: usize,
    /// Anchors whose URL was already present
    pub duplicates: usize,
    /// Error text when the index page could not be fetched
    pub error: Option<String>,
}

/// Counts from the detail phase.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DetailOutcome {
    /// Records scheduled for a visit
    pub planned: usize,
    /// Visits that returned, successfully or not
    pub visited: usize,
    pub failures: usize,
    /// Team lists merged into a record
    pub team_updates: usize,
    /// Team lists with no matching record
    pub dropped_updates: usize,
}

/// Summary of a crawl run.
#[derive(Debug, Clone)]
pub struct CrawlReport {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub index: IndexOutcome,
    pub detail: DetailOutcome,
    pub records: Vec<ProjectRecord>,
    pub json_output: ExportOutcome,
    pub csv_output: ExportOutcome,
}

impl CrawlReport {
    /// Records that received a team list.
    pub fn enriched_count(&self) -> usize {
        self.records.iter().filter(|r| r.has_team()).count()
    }
}

/// Run the full crawl and write both outputs.
///
/// Only configuration problems are returned as errors. Page and export
/// failures are logged and reflected in the report.
pub async fn run_crawler(
    config: &Config,
    fetcher: &dyn PageFetcher,
    storage: &dyn ProjectStorage,
) -> Result<CrawlReport> {
    let start_time = Utc::now();
    let selectors = config.selectors.compile()?;
    let index_url = Url::parse(&config.target.index_url)?;

    log::info!("Crawling project index {}", index_url);

    let store = RecordStore::new();
    let index = collect_projects(fetcher, &index_url, &selectors, &store).await;
    log::info!(
        "Index: {} projects discovered ({} duplicate links ignored)",
        index.discovered,
        index.duplicates
    );
    if store.is_empty() {
        log::warn!("No projects found on the index page");
    }

    let detail = enrich_projects(fetcher, &store, &selectors, &config.crawler).await;
    log::info!(
        "Details: {}/{} pages visited, {} failed, {} team lists merged",
        detail.visited,
        detail.planned,
        detail.failures,
        detail.team_updates
    );

    let records = store.into_records();
    let json_output = ExportOutcome::from_result("JSON", storage.write_json(&records).await);
    let csv_output = ExportOutcome::from_result("CSV", storage.write_csv(&records).await);

    Ok(CrawlReport {
        start_time,
        end_time: Utc::now(),
        index,
        detail,
        records,
        json_output,
        csv_output,
    })
}

/// Phase 1: fetch the index page and append a record per project anchor.
pub async fn collect_projects(
    fetcher: &dyn PageFetcher,
    index_url: &Url,
    selectors: &CompiledSelectors,
    store: &RecordStore,
) -> IndexOutcome {
    let mut outcome = IndexOutcome::default();

    let page = match fetcher.fetch(index_url.as_str()).await {
        Ok(page) => page,
        Err(error) => {
            log_visit_error(index_url.as_str(), &error);
            outcome.error = Some(error.to_string());
            return outcome;
        }
    };

    // Relative links resolve against the page as served, after redirects.
    let base = Url::parse(&page.final_url).unwrap_or_else(|_| index_url.clone());
    for link in parse_project_links(&page.body, &base, selectors) {
        if store.append(link.name, link.url.clone()) {
            outcome.discovered += 1;
        } else {
            outcome.duplicates += 1;
            log::debug!("Duplicate project link ignored: {}", link.url);
        }
    }
    outcome
}

/// Phase 2: visit every stored project and merge its team list.
///
/// Visits run concurrently up to `crawler.max_concurrent`; each merge goes
/// through the store's lock keyed by the visited URL.
pub async fn enrich_projects(
    fetcher: &dyn PageFetcher,
    store: &RecordStore,
    selectors: &CompiledSelectors,
    crawler: &CrawlerConfig,
) -> DetailOutcome {
    let delay = Duration::from_millis(crawler.request_delay_ms);
    let concurrency = crawler.max_concurrent.max(1);
    let targets = store.snapshot();

    let mut outcome = DetailOutcome {
        planned: targets.len(),
        ..DetailOutcome::default()
    };

    let mut visits = stream::iter(targets)
        .map(|record| async move {
            log::info!("Visiting {}", record.url);
            log::info!("Project: {}", record.name);
            let result = fetcher.fetch(&record.url).await;
            (record, result)
        })
        .buffer_unordered(concurrency);

    while let Some((record, result)) = visits.next().await {
        outcome.visited += 1;
        match result {
            Ok(page) => {
                if page.final_url != page.url {
                    log::debug!("{} redirected to {}", page.url, page.final_url);
                }
                for members in parse_team_lists(&page.body, selectors) {
                    if store.update_team(&record.url, members) {
                        outcome.team_updates += 1;
                    } else {
                        outcome.dropped_updates += 1;
                        log::warn!("No record for team list from {}", record.url);
                    }
                }
            }
            Err(error) => {
                outcome.failures += 1;
                log_visit_error(&record.url, &error);
            }
        }

        if delay.as_millis() > 0 {
            tokio::time::sleep(delay).await;
        }
    }

    outcome
}

fn log_visit_error(url: &str, error: &AppError) {
    if error.is_dispatch() {
        log::error!("Error visiting: {} {}", url, error);
    } else {
        log::warn!("Failed to fetch {}: {}", url, error);
    }
}
