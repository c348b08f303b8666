// src/utils/http.rs

//! HTTP client utilities.

use std::time::Duration;

use reqwest::redirect::Policy;

use crate::error::{AppError, Result};
use crate::models::{CrawlerConfig, TargetConfig};

/// Redirect hops followed before a request is abandoned.
const MAX_REDIRECTS: usize = 10;

/// Create a configured asynchronous HTTP client.
///
/// Redirects are followed only while every hop stays inside the target's
/// allowed domains.
pub fn create_async_client(
    config: &CrawlerConfig,
    target: &TargetConfig,
) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .user_agent(&config.user_agent)
        .timeout(Duration::from_secs(config.timeout_secs))
        .redirect(redirect_policy(target.clone()))
        .build()?;
    Ok(client)
}

fn redirect_policy(target: TargetConfig) -> Policy {
    Policy::custom(move |attempt| {
        if !target.allows(attempt.url().as_str()) {
            let url = attempt.url().to_string();
            attempt.error(AppError::ForbiddenDomain(url))
        } else if attempt.previous().len() > MAX_REDIRECTS {
            attempt.error(format!("too many redirects (> {MAX_REDIRECTS})"))
        } else {
            attempt.follow()
        }
    })
}
