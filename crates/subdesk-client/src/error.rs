//! Error types for the subscription client.

use thiserror::Error;

/// Subscription client errors.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport failure (connect, DNS, TLS, timeout, body read)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend answered with a non-2xx status
    #[error("Backend returned {status}{}", message_suffix(.message))]
    Status {
        status: u16,
        /// `error` field of the response body, when present
        message: Option<String>,
    },

    /// Success body did not match the expected shape
    #[error("Invalid response body: {0}")]
    Decode(String),

    /// Client could not be built from config
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ClientError {
    /// Server-supplied message from a failed response body.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ClientError::Status { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    /// HTTP status, when the backend answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Status { status, .. } => Some(*status),
            ClientError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Check if this error is a network-related error.
    pub fn is_network_error(&self) -> bool {
        matches!(self, ClientError::Http(_))
    }

    /// Get a user-friendly error message.
    pub fn friendly_message(&self) -> String {
        match self {
            ClientError::Status {
                message: Some(msg), ..
            } => msg.clone(),
            ClientError::Status { status, .. } => format!("Request failed with status {status}"),
            ClientError::Http(e) if e.is_timeout() => "Request timed out.".to_string(),
            ClientError::Http(e) if e.is_connect() => {
                "Could not connect. Check your network.".to_string()
            }
            ClientError::Http(_) => "Network error. Check your connection.".to_string(),
            ClientError::Decode(_) => "Unexpected response from the server.".to_string(),
            ClientError::Config(msg) => format!("Configuration error: {msg}"),
        }
    }
}

fn message_suffix(message: &Option<String>) -> String {
    message.as_deref().map(|m| format!(": {m}")).unwrap_or_default()
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_with_message() {
        let err = ClientError::Status {
            status: 402,
            message: Some("card declined".into()),
        };
        assert_eq!(err.server_message(), Some("card declined"));
        assert_eq!(err.status(), Some(402));
        assert_eq!(err.to_string(), "Backend returned 402: card declined");
        assert_eq!(err.friendly_message(), "card declined");
        assert!(!err.is_network_error());
    }

    #[test]
    fn test_status_without_message() {
        let err = ClientError::Status {
            status: 500,
            message: None,
        };
        assert_eq!(err.server_message(), None);
        assert_eq!(err.to_string(), "Backend returned 500");
        assert!(err.friendly_message().contains("500"));
    }

    #[test]
    fn test_decode_error_is_not_network() {
        let err = ClientError::Decode("missing field `subscription`".into());
        assert!(!err.is_network_error());
        assert_eq!(err.status(), None);
        assert_eq!(err.server_message(), None);
    }
}
