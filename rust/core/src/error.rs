use thiserror::Error;

/// Result type for service operations
pub type Result<T> = std::result::Result<T, ServiceError>;

/// Failures surfaced by the query and elevation services.
///
/// "No data" is deliberately not a variant: an area with zero valid
/// buildings yields empty collections, and a mesh with zero valid solids
/// yields `None`, neither of which is an error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// Remote gateway timeout (HTTP 504). The only retryable class.
    #[error("server timeout ({status})")]
    Timeout { status: u16 },

    /// Any other non-2xx response. Terminal for the current run.
    #[error("service returned status {status}")]
    Status { status: u16 },

    /// Response body did not match the expected shape.
    #[error("malformed response: {reason}")]
    Malformed { reason: String },

    /// The request never produced an HTTP status.
    #[error("transport failure: {reason}")]
    Transport { reason: String },
}

impl ServiceError {
    /// Classify an HTTP status code.
    pub fn from_status(status: u16) -> Self {
        if status == 504 {
            Self::Timeout { status }
        } else {
            Self::Status { status }
        }
    }

    /// Retry only gateway timeouts; every other failure is terminal.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    /// Status code, when the failure carried one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Timeout { status } | Self::Status { status } => Some(*status),
            Self::Malformed { .. } | Self::Transport { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_504_is_transient() {
        assert!(ServiceError::from_status(504).is_transient());
        assert!(!ServiceError::from_status(429).is_transient());
        assert!(!ServiceError::from_status(500).is_transient());
        assert!(!ServiceError::Malformed { reason: "x".into() }.is_transient());
        assert!(!ServiceError::Transport { reason: "x".into() }.is_transient());
    }

    #[test]
    fn test_status_extraction() {
        assert_eq!(ServiceError::from_status(504).status(), Some(504));
        assert_eq!(ServiceError::from_status(400).status(), Some(400));
        assert_eq!(ServiceError::Transport { reason: "x".into() }.status(), None);
    }
}
