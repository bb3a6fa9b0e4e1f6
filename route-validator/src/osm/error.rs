//! OSM client error types.

/// Errors from fetching elements from the OSM API.
#[derive(Debug, thiserror::Error)]
pub enum OsmError {
    /// HTTP request failed (connection, body read, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The element has been deleted (HTTP 410).
    #[error("element no longer exists")]
    Gone,

    /// API returned a non-success status other than 410
    #[error("API error {status}: {body}")]
    Api { status: u16, body: String },

    /// Failed to parse response JSON
    #[error("JSON parse error: {message}")]
    Json { message: String },

    /// Response parsed but did not contain the expected element
    #[error("malformed response: {0}")]
    Malformed(String),

    /// Request did not complete within the configured timeout
    #[error("request timed out")]
    Timeout,

    /// The caller cancelled the request
    #[error("request cancelled")]
    Cancelled,

    /// The configured user agent is not a valid header value
    #[error("invalid user agent header")]
    InvalidHeader,
}

impl OsmError {
    /// Whether the API reported the element as deleted.
    pub fn is_gone(&self) -> bool {
        matches!(self, OsmError::Gone)
    }

    /// Whether the failure was ours (timeout or cancellation) rather than the API's.
    pub fn is_abandoned(&self) -> bool {
        matches!(self, OsmError::Timeout | OsmError::Cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = OsmError::Api {
            status: 500,
            body: "Internal Server Error".into(),
        };
        assert_eq!(err.to_string(), "API error 500: Internal Server Error");

        assert_eq!(OsmError::Gone.to_string(), "element no longer exists");
        assert_eq!(OsmError::Timeout.to_string(), "request timed out");

        let err = OsmError::Json {
            message: "expected value".into(),
        };
        assert!(err.to_string().contains("expected value"));
    }

    #[test]
    fn classification() {
        assert!(OsmError::Gone.is_gone());
        assert!(!OsmError::Cancelled.is_gone());
        assert!(OsmError::Cancelled.is_abandoned());
        assert!(OsmError::Timeout.is_abandoned());
        let api = OsmError::Api {
            status: 404,
            body: String::new(),
        };
        assert!(!api.is_gone());
        assert!(!api.is_abandoned());
    }
}
