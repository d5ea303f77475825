//! Error types for the API client.

/// Errors that can occur when making API requests.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// An HTTP request failed (network error or unexpected response).
    #[error("Request failed")]
    RequestFailed,
    /// The request did not complete within the configured timeout.
    #[error("Request timed out")]
    Timeout,
    /// The API returned a non-success status with a body snippet.
    #[error("Request failed with status {status}")]
    HttpStatus { status: u16, body: String },
    /// The response body was not the JSON shape we expected.
    #[error("Failed to parse response: {0}")]
    Parse(String),
}

impl Error {
    /// Whether retrying the same request could plausibly succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            Error::RequestFailed | Error::Timeout => true,
            Error::HttpStatus { status, .. } => *status == 429 || *status >= 500,
            Error::Parse(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transient_classification() {
        assert!(Error::RequestFailed.is_transient());
        assert!(Error::Timeout.is_transient());
        assert!(Error::HttpStatus { status: 503, body: String::new() }.is_transient());
        assert!(Error::HttpStatus { status: 429, body: String::new() }.is_transient());
        assert!(!Error::HttpStatus { status: 404, body: String::new() }.is_transient());
        assert!(!Error::Parse("eof".to_string()).is_transient());
    }

    #[test]
    fn display_includes_status() {
        let err = Error::HttpStatus {
            status: 502,
            body: "bad gateway".to_string(),
        };
        assert!(err.to_string().contains("502"));
    }
}
