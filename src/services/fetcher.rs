// src/services/fetcher.rs

//! Page fetching behind a trait, so the crawl can run against HTTP or a
//! scripted source in tests.

use std::error::Error as _;

use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use crate::error::{AppError, Result};
use crate::models::TargetConfig;

/// A successfully fetched page.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// URL that was requested
    pub url: String,
    /// URL after redirects
    pub final_url: String,
    pub body: String,
}

/// Source of HTML pages.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch a single page.
    ///
    /// Malformed or disallowed URLs fail before any request is made, and
    /// a redirect to a disallowed host fails with `ForbiddenDomain`.
    async fn fetch(&self, url: &str) -> Result<FetchedPage>;
}

/// `reqwest`-backed fetcher restricted to an allow-list of hosts.
pub struct HttpFetcher {
    client: Client,
    target: TargetConfig,
}

impl HttpFetcher {
    pub fn new(client: Client, target: TargetConfig) -> Self {
        Self { client, target }
    }

    /// Check a URL before dispatching a request for it.
    fn check_url(&self, url: &str) -> Result<Url> {
        let parsed = Url::parse(url)?;
        if !self.target.allows(parsed.as_str()) {
            return Err(AppError::ForbiddenDomain(url.to_string()));
        }
        Ok(parsed)
    }

    async fn request(&self, url: Url) -> Result<FetchedPage> {
        let requested = url.to_string();
        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => return Err(forbidden_redirect(&e).unwrap_or(AppError::Http(e))),
        };
        let status = response.status();
        let final_url = response.url().to_string();

        if !self.target.allows(&final_url) {
            return Err(AppError::ForbiddenDomain(final_url));
        }

        if !status.is_success() {
            return Err(AppError::Status {
                url: requested,
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        Ok(FetchedPage {
            url: requested,
            final_url,
            body,
        })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedPage> {
        let parsed = self.check_url(url)?;

        let result = self.request(parsed).await;
        if let Err(error) = &result {
            report_fetch_error(url, error);
        }
        result
    }
}

/// Recover the allow-list rejection raised by the client's redirect policy.
fn forbidden_redirect(error: &reqwest::Error) -> Option<AppError> {
    if !error.is_redirect() {
        return None;
    }
    let mut source = error.source();
    while let Some(cause) = source {
        if let Some(AppError::ForbiddenDomain(url)) = cause.downcast_ref::<AppError>() {
            return Some(AppError::ForbiddenDomain(url.clone()));
        }
        source = cause.source();
    }
    None
}

/// Report a failed request. Called for every request failure in either phase.
pub fn report_fetch_error(url: &str, error: &AppError) {
    match error.status() {
        Some(status) => log::error!(
            "Request URL: {} failed with response status {}. Error: {}",
            url,
            status,
            error
        ),
        None => log::error!(
            "Request URL: {} failed with no response. Error: {}",
            url,
            error
        ),
    }
}
