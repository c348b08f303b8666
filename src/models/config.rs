//! Application configuration structures.

use std::fs;
use std::path::Path;

use scraper::Selector;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{AppError, Result};
use crate::utils::get_domain;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// HTTP and crawling behavior settings
    #[serde(default)]
    pub crawler: CrawlerConfig,

    /// Index page and domain allow-list
    #[serde(default)]
    pub target: TargetConfig,

    /// CSS selectors used on index and detail pages
    #[serde(default)]
    pub selectors: SelectorConfig,

    /// Output file locations
    #[serde(default)]
    pub output: OutputConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.crawler.user_agent.trim().is_empty() {
            return Err(AppError::validation("crawler.user_agent is empty"));
        }
        if self.crawler.timeout_secs == 0 {
            return Err(AppError::validation("crawler.timeout_secs must be > 0"));
        }
        if self.crawler.max_concurrent == 0 {
            return Err(AppError::validation("crawler.max_concurrent must be > 0"));
        }

        let index = Url::parse(&self.target.index_url).map_err(|e| {
            AppError::validation(format!(
                "target.index_url '{}' is not a valid URL: {}",
                self.target.index_url, e
            ))
        })?;
        if !self.target.allows(index.as_str()) {
            return Err(AppError::validation(format!(
                "target.index_url host {:?} is not in target.allowed_domains",
                index.host_str()
            )));
        }

        self.selectors.compile()?;

        if self.output.json_file.trim().is_empty() {
            return Err(AppError::validation("output.json_file is empty"));
        }
        if self.output.csv_file.trim().is_empty() {
            return Err(AppError::validation("output.csv_file is empty"));
        }
        Ok(())
    }
}

/// HTTP client and crawling behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlerConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Maximum concurrent detail page visits
    #[serde(default = "defaults::max_concurrent")]
    pub max_concurrent: usize,

    /// Delay after each detail page visit in milliseconds
    #[serde(default)]
    pub request_delay_ms: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            max_concurrent: defaults::max_concurrent(),
            request_delay_ms: 0,
        }
    }
}

/// Where the crawl starts and which hosts it may touch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetConfig {
    /// The project listing page
    #[serde(default = "defaults::index_url")]
    pub index_url: String,

    /// Hosts requests are restricted to. Empty allows every host.
    #[serde(default = "defaults::allowed_domains")]
    pub allowed_domains: Vec<String>,
}

impl TargetConfig {
    /// Whether a URL's host passes the allow-list.
    pub fn allows(&self, url: &str) -> bool {
        if self.allowed_domains.is_empty() {
            return true;
        }
        match get_domain(url) {
            Some(host) => self
                .allowed_domains
                .iter()
                .any(|d| d.eq_ignore_ascii_case(&host)),
            None => false,
        }
    }
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            index_url: defaults::index_url(),
            allowed_domains: defaults::allowed_domains(),
        }
    }
}

/// CSS selectors for the index and detail pages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectorConfig {
    /// Anchor holding a project's title and link on the index page
    #[serde(default = "defaults::project_link")]
    pub project_link: String,

    /// Heading that introduces the team list
    #[serde(default = "defaults::team_heading")]
    pub team_heading: String,

    /// Text the heading must contain
    #[serde(default = "defaults::team_heading_text")]
    pub team_heading_text: String,

    /// Tag name of the list element directly after the heading
    #[serde(default = "defaults::team_list_tag")]
    pub team_list_tag: String,

    /// Selector for one member inside the list
    #[serde(default = "defaults::team_member")]
    pub team_member: String,

    /// Collapse whitespace in extracted names; off keeps the raw node text
    #[serde(default)]
    pub normalize_text: bool,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            project_link: defaults::project_link(),
            team_heading: defaults::team_heading(),
            team_heading_text: defaults::team_heading_text(),
            team_list_tag: defaults::team_list_tag(),
            team_member: defaults::team_member(),
            normalize_text: false,
        }
    }
}

/// Parsed form of [`SelectorConfig`].
#[derive(Debug, Clone)]
pub struct CompiledSelectors {
    /// `<base href>` of a document, which overrides the page URL for links
    pub document_base: Selector,
    pub project_link: Selector,
    pub team_heading: Selector,
    pub team_heading_text: String,
    pub team_list_tag: String,
    pub team_member: Selector,
    pub normalize_text: bool,
}

impl SelectorConfig {
    /// Parse every selector, failing on the first invalid one.
    pub fn compile(&self) -> Result<CompiledSelectors> {
        if self.team_list_tag.trim().is_empty() {
            return Err(AppError::validation("selectors.team_list_tag is empty"));
        }
        Ok(CompiledSelectors {
            document_base: parse_selector("base[href]")?,
            project_link: parse_selector(&self.project_link)?,
            team_heading: parse_selector(&self.team_heading)?,
            team_heading_text: self.team_heading_text.clone(),
            team_list_tag: self.team_list_tag.trim().to_ascii_lowercase(),
            team_member: parse_selector(&self.team_member)?,
            normalize_text: self.normalize_text,
        })
    }
}

fn parse_selector(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
}

/// Output file settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory the files are written to
    #[serde(default = "defaults::output_dir")]
    pub dir: String,

    #[serde(default = "defaults::json_file")]
    pub json_file: String,

    #[serde(default = "defaults::csv_file")]
    pub csv_file: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: defaults::output_dir(),
            json_file: defaults::json_file(),
            csv_file: defaults::csv_file(),
        }
    }
}

mod defaults {
    // Crawler defaults
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; project-crawler/0.1)".into()
    }
    pub fn timeout() -> u64 {
        30
    }
    pub fn max_concurrent() -> usize {
        4
    }

    // Target defaults
    pub fn index_url() -> String {
        "https://part4project.foe.auckland.ac.nz/home/projects/ece/2024".into()
    }
    pub fn allowed_domains() -> Vec<String> {
        vec!["part4project.foe.auckland.ac.nz".into()]
    }

    // Selector defaults
    pub fn project_link() -> String {
        "a[name=Project_title]".into()
    }
    pub fn team_heading() -> String {
        "h4".into()
    }
    pub fn team_heading_text() -> String {
        "Team".into()
    }
    pub fn team_list_tag() -> String {
        "ul".into()
    }
    pub fn team_member() -> String {
        "li".into()
    }

    // Output defaults
    pub fn output_dir() -> String {
        ".".into()
    }
    pub fn json_file() -> String {
        "output.json".into()
    }
    pub fn csv_file() -> String {
        "output.csv".into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_default_config_ok() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_empty_user_agent() {
        let mut config = Config::default();
        config.crawler.user_agent = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_concurrency() {
        let mut config = Config::default();
        config.crawler.max_concurrent = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_index_outside_allow_list() {
        let mut config = Config::default();
        config.target.index_url = "https://example.com/home".to_string();
        assert!(config.validate().is_err());

        config.target.allowed_domains.clear();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_rejects_bad_selector() {
        let mut config = Config::default();
        config.selectors.project_link = "[[invalid".to_string();
        assert!(matches!(
            config.validate(),
            Err(AppError::Selector { .. })
        ));
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config: Config = toml::from_str(
            r#"
            [crawler]
            max_concurrent = 1

            [output]
            dir = "out"
            "#,
        )
        .unwrap();

        assert_eq!(config.crawler.max_concurrent, 1);
        assert_eq!(config.crawler.timeout_secs, 30);
        assert_eq!(config.output.dir, "out");
        assert_eq!(config.output.json_file, "output.json");
        assert_eq!(config.selectors.project_link, "a[name=Project_title]");
        assert!(!config.selectors.normalize_text);
    }

    #[test]
    fn allow_list_matches_host_case_insensitively() {
        let target = TargetConfig::default();
        assert!(target.allows("https://PART4PROJECT.foe.auckland.ac.nz/p/1"));
        assert!(!target.allows("https://evil.example/p/1"));
        assert!(!target.allows("not a url"));
    }
}
