//! Error types for showrate
//!
//! This module defines all error types used throughout the library.
//! ShowrateError implements Serialize so reports can carry the failure text.

use std::path::PathBuf;

use serde::{Serialize, Serializer};
use thiserror::Error;

/// Error type for showrate operations
#[derive(Error, Debug)]
pub enum ShowrateError {
    /// The source file could not be opened for reading
    #[error("Failed to open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The delimiter is empty or cannot be represented in the chosen encoding
    #[error("Delimiter {delimiter:?} cannot be encoded as {encoding}")]
    UnsupportedDelimiter { delimiter: String, encoding: String },

    /// Reader options are unusable (e.g. a zero chunk size)
    #[error("Invalid reader options: {0}")]
    InvalidOptions(String),

    /// Line bytes are not valid under the chosen encoding
    #[error("Line {line_number} is not valid {encoding}: {reason}")]
    Decode {
        line_number: usize,
        encoding: String,
        reason: String,
    },

    /// Read or seek failed on an already opened source
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The reader was used after `close`
    #[error("Attempt to read from closed reader")]
    ReaderClosed,

    /// A table row is missing fields or holds non-numeric values
    #[error("Malformed row at line {line_number}: {reason}")]
    MalformedRow { line_number: usize, reason: String },

    /// The HTTP client could not be constructed
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    /// Transport failure or non-success status while fetching a page
    #[error("Request to {url} failed: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The episodes page no longer has the expected structure
    #[error("Failed to parse rating: {0}")]
    RatingParse(String),

    /// Statistics were requested over zero seasons or episodes
    #[error("Cannot average an empty aggregate: {0}")]
    EmptyAggregate(String),
}

impl ShowrateError {
    /// Whether the error must abort the whole run.
    ///
    /// File, table and page-structure errors are fatal. Network failures in
    /// the season fetch chain and empty aggregates are reported and the
    /// process carries on.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            ShowrateError::Fetch { .. } | ShowrateError::EmptyAggregate(_)
        )
    }
}

/// Serialize ShowrateError as its display string
impl Serialize for ShowrateError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

/// Result type alias for showrate operations
pub type Result<T> = std::result::Result<T, ShowrateError>;
