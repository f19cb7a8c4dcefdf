//! Error types for FortiOS API operations.

use thiserror::Error;

use crate::reorder::SortKey;

/// Errors that can occur during FortiOS API operations.
#[derive(Debug, Error)]
pub enum FortiError {
    /// Configuration is missing or incomplete.
    #[error("FortiOS configuration required: {0}")]
    ConfigMissing(String),

    /// A caller-supplied argument is invalid.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Entity not found.
    #[error("{entity_type} '{id}' not found")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// API request failed.
    #[error("FortiOS API error: {message}")]
    ApiError {
        message: String,
        status_code: Option<u16>,
    },

    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// JSON parsing error.
    #[error("Failed to parse response: {0}")]
    ParseError(#[from] serde_json::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),

    /// Rate limited.
    #[error("Rate limited, retry after {retry_after_secs:?} seconds")]
    RateLimited { retry_after_secs: Option<u64> },

    /// The response parsed but did not have the expected shape.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// The collection cannot be ordered by the requested key.
    #[error("{entity_type} cannot be sorted by {key}")]
    UnsupportedSortKey {
        entity_type: &'static str,
        key: SortKey,
    },

    /// Fetching the current order of a collection failed.
    #[error("Failed to fetch {collection} order: {source}")]
    Fetch {
        collection: &'static str,
        #[source]
        source: Box<FortiError>,
    },

    /// A reorder stopped at its first failed move.
    ///
    /// Only the first `applied` moves reached the appliance; the collection
    /// is left partially reordered.
    #[error("Reorder aborted after {applied} of {planned} moves: {source}")]
    Reorder {
        applied: usize,
        planned: usize,
        #[source]
        source: MoveError,
    },
}

impl FortiError {
    /// Returns true if the appliance reported the resource as absent.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            FortiError::NotFound { .. }
                | FortiError::ApiError {
                    status_code: Some(404),
                    ..
                }
        )
    }
}

/// A single move-after call that the appliance rejected.
#[derive(Debug, Error)]
#[error("moving {id} after {after_id} failed: {source}")]
pub struct MoveError {
    /// The entry being relocated.
    pub id: String,
    /// The entry it was to be placed after.
    pub after_id: String,
    #[source]
    pub source: Box<FortiError>,
}

/// Result type alias for FortiOS operations.
pub type Result<T> = core::result::Result<T, FortiError>;
