// src/models/mod.rs

//! Domain models for the crawler application.

mod config;
mod project;

pub use config::{
    CompiledSelectors, Config, CrawlerConfig, OutputConfig, SelectorConfig, TargetConfig,
};
pub use project::ProjectRecord;
