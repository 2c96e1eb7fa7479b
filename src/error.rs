use std::path::PathBuf;
use thiserror::Error;

use crate::feed::TagError;

/// Errors that can abort feed generation.
///
/// Every per-file variant carries the offending path so the message printed
/// on exit names the file that stopped the run.
#[derive(Debug, Error)]
pub enum FeedError {
    /// The base URL argument could not be parsed.
    #[error("Invalid base URL '{input}': {source}")]
    InvalidBaseUrl {
        input: String,
        #[source]
        source: url::ParseError,
    },

    /// Filesystem metadata could not be read for an input file.
    #[error("{}: {source}", path.display())]
    Stat {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An input file could not be opened for reading.
    #[error("{}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Tag extraction failed and the strict tag policy is in effect.
    #[error("{}: Error loading tags: {source}", path.display())]
    Tags {
        path: PathBuf,
        #[source]
        source: TagError,
    },

    /// The XML document could not be produced.
    #[error("Failed to render feed: {0}")]
    Render(String),

    /// The rendered document could not be written out.
    #[error("Failed to write feed: {0}")]
    Write(#[from] std::io::Error),
}
