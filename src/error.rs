//! Error types for calls against the MangaDex API
//!
//! Handlers never expose these to callers: every failure is flattened to an
//! HTTP 500 carrying [`GENERIC_ERROR_MESSAGE`].

use thiserror::Error;

/// Body message returned for every upstream or processing failure
pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong. Please try again later.";

#[derive(Error, Debug)]
pub enum UpstreamError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("MangaDex returned status {status} for {url}")]
    Status { status: u16, url: String },

    #[error("MangaDex API error: {0}")]
    Api(String),

    #[error("Failed to decode MangaDex response: {0}")]
    Decode(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, UpstreamError>;

/// JSON body sent with the flattened 500 response
pub fn generic_error_body() -> serde_json::Value {
    serde_json::json!({ "message": GENERIC_ERROR_MESSAGE })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generic_body_literal() {
        let body = serde_json::to_string(&generic_error_body()).unwrap();
        assert_eq!(
            body,
            r#"{"message":"Something went wrong. Please try again later."}"#
        );
    }

    #[test]
    fn test_status_display() {
        let err = UpstreamError::Status {
            status: 404,
            url: "https://api.mangadex.org/manga/x".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "MangaDex returned status 404 for https://api.mangadex.org/manga/x"
        );
    }
}
