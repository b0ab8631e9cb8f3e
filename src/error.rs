use ::scraper::error::SelectorErrorKind;
use std::path::PathBuf;

/// All errors that can occur while harvesting and loading.
#[derive(thiserror::Error, Debug)]
pub enum HarvestError {
    /// HTTP request failed (network, DNS, TLS, timeout, etc.).
    #[error("http request failed for {url}: {source}")]
    Http {
        url: String,
        source: reqwest::Error,
    },

    /// Server returned a non-success HTTP status code.
    #[error("unexpected status {status} for {url}")]
    UnexpectedStatus {
        url: String,
        status: reqwest::StatusCode,
    },

    /// Failed to read the response body as text.
    #[error("failed to read response body from {url}: {source}")]
    ResponseBody {
        url: String,
        source: reqwest::Error,
    },

    /// A CSS selector string could not be parsed.
    #[error("invalid CSS selector: {0}")]
    Selector(String),

    /// An expected HTML element was not found on the page.
    #[error("expected element not found: {context}")]
    ElementNotFound { context: &'static str },

    /// A table row lacks a cell, nested element or attribute it must carry.
    #[error("malformed {context} row: {detail}")]
    MalformedRow {
        context: &'static str,
        detail: String,
    },

    /// A ruleset label that has no generation mapping.
    #[error("unknown format label: {label:?}")]
    UnknownFormat { label: String },

    /// A required environment variable is missing or unusable.
    #[error("invalid configuration {name}: {reason}")]
    Config { name: &'static str, reason: String },

    /// A SQL script could not be read from disk.
    #[error("failed to read sql script {path:?}: {source}")]
    Script {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The destination database rejected a statement or connection.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl HarvestError {
    pub(crate) fn malformed(context: &'static str, detail: impl Into<String>) -> Self {
        HarvestError::MalformedRow {
            context,
            detail: detail.into(),
        }
    }

    /// True for transport, status and body failures.
    pub fn is_fetch(&self) -> bool {
        matches!(
            self,
            HarvestError::Http { .. }
                | HarvestError::UnexpectedStatus { .. }
                | HarvestError::ResponseBody { .. }
        )
    }
}

impl<'a> From<SelectorErrorKind<'a>> for HarvestError {
    fn from(err: SelectorErrorKind<'a>) -> Self {
        HarvestError::Selector(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, HarvestError>;
