// src/error.rs

//! Unified error handling for the project crawler.

use std::fmt;

use thiserror::Error;

/// Result type alias for crawler operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("HTTP status {status} for {url}")]
    Status { url: String, status: u16 },

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// Request target is outside the allowed domains
    #[error("Forbidden domain: {0}")]
    ForbiddenDomain(String),

    /// CSS selector parsing failed
    #[error("Invalid selector '{selector}': {message}")]
    Selector { selector: String, message: String },

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),
}

impl AppError {
    /// Create a selector parsing error.
    pub fn selector(selector: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Selector {
            selector: selector.into(),
            message: message.to_string(),
        }
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Whether the error was raised before any request went out.
    pub fn is_dispatch(&self) -> bool {
        matches!(self, Self::Url(_) | Self::ForbiddenDomain(_))
    }

    /// Status code carried by the error, when the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_display() {
        let err = AppError::Status {
            url: "https://example.com/p/2".to_string(),
            status: 404,
        };
        assert_eq!(err.to_string(), "HTTP status 404 for https://example.com/p/2");
        assert_eq!(err.status(), Some(404));
    }

    #[test]
    fn test_selector_constructor() {
        let err = AppError::selector("[[", "unexpected token");
        assert_eq!(err.to_string(), "Invalid selector '[[': unexpected token");
        assert_eq!(err.status(), None);
    }
}
