// src/error.rs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScrapeError {
    /// The page could not be retrieved. Raised by the fetch collaborator.
    #[error("Fetch failed: {0}")]
    Fetch(String),

    /// Every extraction strategy came up empty.
    #[error("No price found ({tried} strategies tried)")]
    NoPriceFound { tried: usize },

    #[error("Malformed price: {0:?}")]
    MalformedPrice(String),

    #[error("Malformed date: {0:?}")]
    MalformedDate(String),

    /// Only returned by [`crate::store::try_load`]; `store::load` recovers it.
    #[error("Snapshot unreadable: {0}")]
    SnapshotUnreadable(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ::config::ConfigError),

    /// Bad command line. Kept apart from clap's own exit status (2), which
    /// would collide with extraction failures.
    #[error("{0}")]
    Usage(String),
}

impl ScrapeError {
    /// The page was read but no usable price came out of it.
    pub fn is_extraction_failure(&self) -> bool {
        matches!(
            self,
            ScrapeError::NoPriceFound { .. } | ScrapeError::MalformedPrice(_) | ScrapeError::MalformedDate(_)
        )
    }

    /// Process exit status: 2 for extraction failures, 1 for everything else.
    pub fn exit_code(&self) -> i32 {
        if self.is_extraction_failure() { 2 } else { 1 }
    }
}

impl From<reqwest::Error> for ScrapeError {
    fn from(e: reqwest::Error) -> Self {
        ScrapeError::Fetch(e.to_string())
    }
}
