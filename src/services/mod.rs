//! Service layer for the crawler application.
//!
//! This module contains the business logic for:
//! - Page fetching (`PageFetcher`, `HttpFetcher`)
//! - Index and detail page extraction (`parse_project_links`, `parse_team_lists`)
//! - Shared record accumulation (`RecordStore`)

pub mod fetcher;
mod projects;
mod records;

pub use fetcher::{FetchedPage, HttpFetcher, PageFetcher};
pub use projects::{ProjectLink, parse_project_links, parse_team_lists};
pub use records::RecordStore;
