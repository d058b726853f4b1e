//! Source error types.

use thiserror::Error;

/// Errors that can occur while fetching a remote collection.
///
/// Cloneable so a failure can be multicast to every consumer of a shared stream.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    /// No response was received (connection refused, timeout, ...).
    #[error("Transport error: {message}")]
    Transport { message: String },

    /// The backend answered with a non-success status code.
    #[error("Backend error (status {status}): {message}")]
    Backend { status: u16, message: String },

    /// The response body did not have the expected shape.
    #[error("Decode error: {message}")]
    Decode { message: String },
}

impl SourceError {
    /// Creates a transport error.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Creates a backend error.
    pub fn backend(status: u16, message: impl Into<String>) -> Self {
        Self::Backend {
            status,
            message: message.into(),
        }
    }

    /// Creates a decode error.
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Status code returned by the backend, if a response was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Backend { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Human-readable message for the error channel.
    ///
    /// Distinguishes client-side or network failures from backend responses.
    pub fn user_message(&self) -> String {
        match self {
            Self::Backend { status, message } => {
                format!("Backend returned code {status}: {message}")
            }
            Self::Transport { message } | Self::Decode { message } => {
                format!("An error occurred: {message}")
            }
        }
    }
}

impl From<serde_json::Error> for SourceError {
    fn from(error: serde_json::Error) -> Self {
        Self::decode(error.to_string())
    }
}

/// Result type for source operations.
pub type Result<T> = std::result::Result<T, SourceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_message_names_status_code() {
        let error = SourceError::backend(404, "Http failure response for api/products: 404 Not Found");
        assert_eq!(
            error.user_message(),
            "Backend returned code 404: Http failure response for api/products: 404 Not Found"
        );
        assert_eq!(error.status(), Some(404));
    }

    #[test]
    fn test_client_side_messages_share_a_prefix() {
        assert_eq!(
            SourceError::transport("connection refused").user_message(),
            "An error occurred: connection refused"
        );
        assert_eq!(
            SourceError::decode("expected a sequence").user_message(),
            "An error occurred: expected a sequence"
        );
        assert_eq!(SourceError::transport("x").status(), None);
    }

    #[test]
    fn test_json_errors_become_decode_errors() {
        let error = serde_json::from_str::<Vec<u32>>("{}").unwrap_err();
        assert!(matches!(SourceError::from(error), SourceError::Decode { .. }));
    }
}
