//! Error taxonomy for document reading, ingestion and queries.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GpsError {
    // Resource errors
    #[error("error opening source file '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Structural document errors
    #[error("malformed document: {0}")]
    Xml(String),
    #[error("no '{0}' element")]
    MissingElement(&'static str),
    #[error("no '{0}' attribute")]
    MissingAttribute(&'static str),
    #[error("invalid {field} value '{value}'")]
    InvalidNumber { field: &'static str, value: String },
    #[error("invalid timestamp '{0}'")]
    InvalidTimestamp(String),
    #[error("fix {index} has no timestamp")]
    MissingTimestamp { index: usize },
    #[error("fix {index} at t={found}s precedes the previous fix at t={previous}s")]
    TimestampOutOfOrder { index: usize, previous: i64, found: i64 },

    // Configuration errors
    #[error("granularity must be a finite, non-negative distance (got {0})")]
    InvalidGranularity(f64),

    // Query-time errors
    #[error("statistic requested on an empty sequence")]
    EmptySequence,
    #[error("no position named '{0}'")]
    NameNotFound(String),
    #[error("position not found")]
    PositionNotFound,
    #[error("index {index} out of range for {len} positions")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("segment ending at position {index} has zero travel time")]
    ZeroTravelTime { index: usize },
}

impl GpsError {
    /// True for errors raised while reading or ingesting a source.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            GpsError::Xml(_)
                | GpsError::MissingElement(_)
                | GpsError::MissingAttribute(_)
                | GpsError::InvalidNumber { .. }
                | GpsError::InvalidTimestamp(_)
                | GpsError::MissingTimestamp { .. }
                | GpsError::TimestampOutOfOrder { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, GpsError>;
