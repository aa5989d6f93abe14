//! Error types for the dashboard
//!
//! Uses thiserror for ergonomic error definitions.
//! Missing or rejected credentials are not errors: they surface as
//! [`AuthOutcome::Unauthenticated`](crate::client::AuthOutcome).

use thiserror::Error;

/// Custom Result type using our Error
pub type Result<T> = std::result::Result<T, DashboardError>;

/// Dashboard errors
#[derive(Error, Debug)]
pub enum DashboardError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Transport failures (connection refused, aborted fetch, ...)
    #[error("HTTP error: {0}")]
    Http(String),

    /// JSON decoding errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Non-success status other than 401
    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// DOM or storage failures in the browser binding
    #[error("Browser error: {0}")]
    Browser(String),
}

impl From<reqwest::Error> for DashboardError {
    fn from(err: reqwest::Error) -> Self {
        DashboardError::Http(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let err = DashboardError::Api {
            status: 500,
            message: "Internal Server Error".into(),
        };
        assert_eq!(
            err.to_string(),
            "API error (HTTP 500): Internal Server Error"
        );
    }

    #[test]
    fn test_error_conversion() {
        let json_err = serde_json::from_str::<i32>("invalid").unwrap_err();
        let err: DashboardError = json_err.into();
        assert!(matches!(err, DashboardError::Json(_)));
    }
}
