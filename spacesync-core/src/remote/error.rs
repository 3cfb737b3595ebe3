//! Remote API error types.

use thiserror::Error;

/// HTTP status the API answers with when an entity already exists.
pub const CONFLICT_STATUS: u16 = 422;

/// Errors returned by a remote space call.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    #[error("Server returned status {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Invalid response body: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True when the API rejected a create because the entity already exists.
    pub fn is_conflict(&self) -> bool {
        self.status() == Some(CONFLICT_STATUS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_conflict_only_for_422() {
        let conflict = ApiError::Http {
            status: 422,
            message: "{\"name\":[\"has already been taken\"]}".to_string(),
        };
        assert!(conflict.is_conflict());

        let not_found = ApiError::Http {
            status: 404,
            message: String::new(),
        };
        assert!(!not_found.is_conflict());
        assert_eq!(not_found.status(), Some(404));

        let transport = ApiError::Transport("connection refused".to_string());
        assert!(!transport.is_conflict());
        assert_eq!(transport.status(), None);
    }

    #[test]
    fn test_display() {
        let err = ApiError::Http {
            status: 401,
            message: "Unauthorized".to_string(),
        };
        assert_eq!(err.to_string(), "Server returned status 401: Unauthorized");
    }
}
