//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Server '{0}' not found")]
    UnknownServer(String),

    #[error("Server '{0}' is disabled")]
    ServerDisabled(String),

    #[error("No active tool server")]
    NoActiveServer,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = DomainError::UnknownServer("weather".to_string());
        assert_eq!(error.to_string(), "Server 'weather' not found");
        assert_eq!(
            DomainError::NoActiveServer.to_string(),
            "No active tool server"
        );
    }
}
