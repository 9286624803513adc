//! Error taxonomy for one fetch-and-normalize run.

use std::time::Duration;
use thiserror::Error;

/// Everything that can abort a single pipeline run.
///
/// Failures never outlive the request that produced them; the server maps
/// every variant to a `500` for that request only.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Transport error or non-success HTTP status.
    #[error("could not retrieve data file {url}: {reason}")]
    FetchFailure { url: String, reason: String },

    /// The source did not answer within the configured timeout.
    #[error("timed out after {timeout:?} fetching {url}")]
    FetchTimeout { url: String, timeout: Duration },

    /// Missing header, ragged record, or a populated cell that is not a non-negative number.
    #[error("malformed input: {0}")]
    MalformedInput(String),

    /// An allow-listed entity is absent from a column-oriented header.
    #[error("unknown entity {0:?}: not present in CSV header")]
    UnknownEntity(String),

    /// None of the configured layouts matched.
    #[error("could not parse date {input:?} with layouts {layouts:?}")]
    DateParseFailure { input: String, layouts: Vec<String> },

    /// No correction table registered for this metric.
    #[error("invalid metric: {0:?}")]
    UnsupportedMetric(String),
}

pub type Result<T> = std::result::Result<T, PipelineError>;

impl From<csv::Error> for PipelineError {
    fn from(err: csv::Error) -> Self {
        PipelineError::MalformedInput(format!("could not read CSV data: {}", err))
    }
}
