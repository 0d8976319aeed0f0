//! Error types for pgrkam-api

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias using pgrkam-api Error
pub type Result<T> = std::result::Result<T, Error>;

/// Text shown for transport-level failures instead of the raw client error.
pub const NETWORK_FAILURE_MESSAGE: &str =
    "Network connection failed. Please check your internet connection.";

/// Broad classification of a failed chat turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorKind {
    /// The request never completed: unreachable host, refused connection, timeout
    Network,
    /// The server answered, but not with a usable reply
    Server,
    /// Reserved for input rejected before submission. Never produced today.
    Validation,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Network => "network",
            ErrorKind::Server => "server",
            ErrorKind::Validation => "validation",
        }
    }
}

/// Errors that can occur when talking to the chat endpoint
#[derive(Error, Debug)]
pub enum Error {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Endpoint answered with a non-2xx status
    #[error("{message}")]
    Server { status: u16, message: String },

    /// Unexpected response format
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    /// Create a server error for a status code, preferring the `detail` text
    /// the endpoint sent back.
    pub fn server(status: u16, detail: Option<String>) -> Self {
        let message = detail
            .filter(|d| !d.trim().is_empty())
            .unwrap_or_else(|| format!("Server error: {}", status));
        Self::Server { status, message }
    }

    /// Classify this error as a transport fault or a server-side failure
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Http(e) if e.is_decode() || e.is_status() => ErrorKind::Server,
            Error::Http(_) => ErrorKind::Network,
            _ => ErrorKind::Server,
        }
    }

    /// Check if this error is a transport fault
    pub fn is_network(&self) -> bool {
        self.kind() == ErrorKind::Network
    }

    /// Message suitable for the error banner
    pub fn user_message(&self) -> String {
        match self.kind() {
            ErrorKind::Network => NETWORK_FAILURE_MESSAGE.to_string(),
            _ => self.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_error_uses_detail() {
        let e = Error::server(500, Some("retriever offline".into()));
        assert_eq!(e.to_string(), "retriever offline");
        assert_eq!(e.kind(), ErrorKind::Server);
    }

    #[test]
    fn test_server_error_synthesizes_message() {
        let e = Error::server(502, None);
        assert_eq!(e.to_string(), "Server error: 502");
    }

    #[test]
    fn test_server_error_blank_detail_falls_back() {
        let e = Error::server(503, Some("   ".into()));
        assert_eq!(e.user_message(), "Server error: 503");
    }

    #[test]
    fn test_malformed_body_is_server_class() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let e = Error::from(json_err);
        assert_eq!(e.kind(), ErrorKind::Server);
        assert!(!e.is_network());
    }

    #[test]
    fn test_unexpected_response_is_server_class() {
        let e = Error::UnexpectedResponse("empty body".into());
        assert_eq!(e.kind(), ErrorKind::Server);
        assert_eq!(e.user_message(), "Unexpected response: empty body");
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(ErrorKind::Network.as_str(), "network");
        assert_eq!(ErrorKind::Server.as_str(), "server");
        assert_eq!(ErrorKind::Validation.as_str(), "validation");
    }
}
