//! Pipeline entry points for crawler operations.
//!
//! - `run_crawler`: Collect projects from the index, enrich them from their
//!   detail pages, and write the outputs

pub mod crawl;

pub use crawl::{
    CrawlReport, DetailOutcome, ExportOutcome, IndexOutcome, collect_projects, enrich_projects,
    run_crawler,
};
