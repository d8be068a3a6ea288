use thiserror::Error;

/// Failures surfaced by a media backend, named after the platform error they
/// correspond to.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MediaError {
    #[error("{0}")]
    NotAllowed(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    NotReadable(String),
    #[error("{message}")]
    Overconstrained { constraint: String, message: String },
    #[error("{0}")]
    Abort(String),
    #[error("{0}")]
    Unknown(String),
}

impl MediaError {
    pub fn name(&self) -> &'static str {
        match self {
            MediaError::NotAllowed(_) => "NotAllowedError",
            MediaError::NotFound(_) => "NotFoundError",
            MediaError::NotReadable(_) => "NotReadableError",
            MediaError::Overconstrained { .. } => "OverconstrainedError",
            MediaError::Abort(_) => "AbortError",
            MediaError::Unknown(_) => "UnknownError",
        }
    }

    pub fn message(&self) -> String {
        self.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::MediaError;

    #[test]
    fn test_name_and_message() {
        let error = MediaError::Overconstrained {
            constraint: "deviceId".to_string(),
            message: "No device matches deviceId bad-id".to_string(),
        };

        assert_eq!(error.name(), "OverconstrainedError");
        assert_eq!(error.message(), "No device matches deviceId bad-id");
    }

    #[test]
    fn test_permission_denied() {
        let error = MediaError::NotAllowed("Permission denied".to_string());

        assert_eq!(error.name(), "NotAllowedError");
        assert_eq!(error.message(), "Permission denied");
    }
}
