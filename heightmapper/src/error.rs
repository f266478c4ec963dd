//! Error types for the heightmapper library.

use thiserror::Error;

/// Errors that can occur while downloading or rendering a heightmap.
#[derive(Error, Debug)]
pub enum HeightmapError {
    /// IO error when writing output.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The run configuration was rejected before any request was made.
    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    /// A batch request could not be completed (transport error or HTTP status).
    #[error("Request for batch {batch} failed: {reason}")]
    RequestFailed { batch: usize, reason: String },

    /// A batch response body could not be decoded.
    #[error("Malformed response for batch {batch}: {reason}")]
    MalformedResponse { batch: usize, reason: String },

    /// Every sample in the grid is at or below the no-data threshold.
    #[error("No valid height data: every sample is at or below the no-data threshold")]
    NoValidData,

    /// Encoding or resizing the output image failed.
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// HTTP client error.
    #[cfg(feature = "http")]
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl HeightmapError {
    pub(crate) fn invalid_config(reason: impl Into<String>) -> Self {
        HeightmapError::InvalidConfig {
            reason: reason.into(),
        }
    }
}

/// Result type alias using [`HeightmapError`].
pub type Result<T> = std::result::Result<T, HeightmapError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = HeightmapError::invalid_config("step must be positive");
        assert!(err.to_string().contains("step must be positive"));

        let err = HeightmapError::RequestFailed {
            batch: 7,
            reason: "HTTP 502 Bad Gateway".to_string(),
        };
        assert!(err.to_string().contains("batch 7"));
        assert!(err.to_string().contains("502"));

        let err = HeightmapError::MalformedResponse {
            batch: 3,
            reason: "expected value at line 1 column 1".to_string(),
        };
        assert!(err.to_string().contains("batch 3"));

        assert!(HeightmapError::NoValidData.to_string().contains("No valid"));
    }
}
