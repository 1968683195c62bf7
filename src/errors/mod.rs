/// Error handling for the queue tracker
///
/// A single error type covers store mutations, snapshot producers, configuration
/// and server startup. The webserver maps each variant onto an HTTP status.
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueueError {
    #[error("{0}")] NotFound(String),

    #[error("{0}")] Forbidden(String),

    #[error("{0}")] Validation(String),

    #[error("{0}")] Conflict(String),

    #[error("Configuration error: {0}")] Config(String),

    #[error("Serialization error: {0}")] Serialization(String),

    #[error("Server error: {0}")] Server(String),
}

impl QueueError {
    pub fn patient_not_found() -> Self {
        QueueError::NotFound("Patient not found".to_string())
    }

    pub fn staff_not_found() -> Self {
        QueueError::NotFound("Staff not found".to_string())
    }

    pub fn missing_fields() -> Self {
        QueueError::Validation("Missing required fields".to_string())
    }

    /// Client mistakes: the request can be fixed and retried by the caller
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            QueueError::NotFound(_) |
                QueueError::Forbidden(_) |
                QueueError::Validation(_) |
                QueueError::Conflict(_)
        )
    }
}

impl From<serde_json::Error> for QueueError {
    fn from(err: serde_json::Error) -> Self {
        QueueError::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for QueueError {
    fn from(err: std::io::Error) -> Self {
        QueueError::Server(err.to_string())
    }
}

pub type QueueResult<T> = Result<T, QueueError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_keeps_message_verbatim() {
        assert_eq!(QueueError::patient_not_found().to_string(), "Patient not found");
        assert_eq!(
            QueueError::Config("port must be > 0".to_string()).to_string(),
            "Configuration error: port must be > 0"
        );
    }

    #[test]
    fn test_client_error_classification() {
        assert!(QueueError::missing_fields().is_client_error());
        assert!(QueueError::Conflict("dup".to_string()).is_client_error());
        assert!(!QueueError::Server("bind".to_string()).is_client_error());
    }
}
