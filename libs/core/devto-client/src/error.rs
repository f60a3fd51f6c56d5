//! Error handling with context pattern
//!
//! Every HTTP failure carries the URL it happened on.

use thiserror::Error;

/// Result type alias for dev.to client operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for dev.to client operations
#[derive(Error, Debug)]
pub enum Error {
    /// The underlying HTTP client could not be constructed
    #[error("Failed to build HTTP client: {0}")]
    Build(#[source] reqwest::Error),

    /// The API key contains bytes that cannot travel in an HTTP header
    #[error("API key is not a valid HTTP header value")]
    InvalidApiKey,

    /// Transport-level failure (DNS, connect, timeout, ...)
    #[error("Request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The API answered with a non-2xx status
    #[error("{url} returned HTTP {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    /// The requested article does not exist (HTTP 404 on the detail endpoint)
    #[error("Article not found: {slug}")]
    NotFound { slug: String },

    /// The response body was not the JSON shape we expect
    #[error("Failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

impl Error {
    /// HTTP status associated with this error, if the server responded at all.
    pub fn status(&self) -> Option<reqwest::StatusCode> {
        match self {
            Error::Status { status, .. } => Some(*status),
            Error::NotFound { .. } => Some(reqwest::StatusCode::NOT_FOUND),
            Error::Request { source, .. } => source.status(),
            _ => None,
        }
    }
}

/// Extension trait for attaching the request URL to errors
pub(crate) trait ErrorContext<T> {
    fn with_url(self, url: &str) -> Result<T>;
}

impl<T> ErrorContext<T> for std::result::Result<T, reqwest::Error> {
    fn with_url(self, url: &str) -> Result<T> {
        self.map_err(|source| Error::Request {
            url: url.to_string(),
            source,
        })
    }
}

impl<T> ErrorContext<T> for std::result::Result<T, serde_json::Error> {
    fn with_url(self, url: &str) -> Result<T> {
        self.map_err(|source| Error::Decode {
            url: url.to_string(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_display_includes_url_and_code() {
        let err = Error::Status {
            url: "https://dev.to/api/articles".to_string(),
            status: reqwest::StatusCode::UNAUTHORIZED,
        };
        let msg = err.to_string();
        assert!(msg.contains("https://dev.to/api/articles"));
        assert!(msg.contains("401"));
        assert_eq!(err.status(), Some(reqwest::StatusCode::UNAUTHORIZED));
    }

    #[test]
    fn test_decode_context_keeps_url() {
        let parsed: std::result::Result<u32, _> = serde_json::from_str("not json");
        let err = parsed.with_url("https://example.test/x").unwrap_err();
        assert!(matches!(err, Error::Decode { ref url, .. } if url == "https://example.test/x"));
        assert!(err.status().is_none());
    }

    #[test]
    fn test_not_found_reports_404() {
        let err = Error::NotFound {
            slug: "missing".to_string(),
        };
        assert_eq!(err.status(), Some(reqwest::StatusCode::NOT_FOUND));
        assert_eq!(err.to_string(), "Article not found: missing");
    }
}
