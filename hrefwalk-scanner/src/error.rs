use std::fmt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Failed to fetch {url}: {reason}")]
    Fetch { url: String, reason: String },
}

pub type Result<T> = std::result::Result<T, ScanError>;

/// Reasons a node is answered with an empty result before any fetch happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    DepthExceeded,
    MalformedAddress,
    DuplicateVisit,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            SkipReason::DepthExceeded => "reached max recursion depth",
            SkipReason::MalformedAddress => "invalid url",
            SkipReason::DuplicateVisit => "url already processed",
        };
        f.write_str(msg)
    }
}
