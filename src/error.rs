//! Failure taxonomy for endpoint attempts.
//!
//! Every candidate failure is caught at the attempt boundary, classified,
//! logged, and the fallback loop advances. The classification stays inside
//! the crate; callers only ever see the uniform exhaustion error.

use std::fmt;

use reqwest::StatusCode;

/// Caller-visible message when every candidate has failed.
pub const ALL_ENDPOINTS_FAILED: &str = "All sync endpoints failed";

/// Why a single endpoint attempt failed.
#[derive(Debug)]
pub enum AttemptError {
    /// Connection refused, timeout, DNS failure, or any other transport
    /// fault before a status line was received.
    Transport(reqwest::Error),

    /// The endpoint answered with a non-success HTTP status. The response
    /// body is discarded.
    Status(StatusCode),

    /// The endpoint answered with a success status but the body was not
    /// valid JSON. Treated like any other attempt failure: the loop moves
    /// on to the next candidate.
    Decode(serde_json::Error),
}

impl AttemptError {
    /// Short label used as a structured log field.
    pub fn kind(&self) -> &'static str {
        match self {
            AttemptError::Transport(_) => "transport",
            AttemptError::Status(_) => "status",
            AttemptError::Decode(_) => "decode",
        }
    }

    /// Whether the failure happened before any HTTP status was received.
    pub fn is_transport(&self) -> bool {
        matches!(self, AttemptError::Transport(_))
    }
}

impl fmt::Display for AttemptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttemptError::Transport(err) => write!(f, "transport error: {err}"),
            AttemptError::Status(status) => write!(f, "unexpected status: {status}"),
            AttemptError::Decode(err) => write!(f, "invalid JSON in response body: {err}"),
        }
    }
}

impl std::error::Error for AttemptError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_labels() {
        let status = AttemptError::Status(StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(status.kind(), "status");
        assert!(!status.is_transport());

        let decode = AttemptError::Decode(
            serde_json::from_str::<serde_json::Value>("not json").unwrap_err(),
        );
        assert_eq!(decode.kind(), "decode");
    }

    #[test]
    fn test_display_includes_status_code() {
        let err = AttemptError::Status(StatusCode::BAD_GATEWAY);
        assert!(err.to_string().contains("502"));
    }
}
