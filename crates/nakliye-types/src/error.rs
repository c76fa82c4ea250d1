//! Error types for nakliye

use thiserror::Error;

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration not found")]
    NotFound,

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Failed to save configuration: {0}")]
    SaveError(String),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// No bearer token available; raised before any network call
    #[error("Access token not found")]
    MissingCredential,

    #[error("Upstream responded with {status}: {message}")]
    Upstream { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Operation already in progress: {0}")]
    AlreadyInFlight(String),

    #[error("Invalid time: {0}")]
    InvalidTime(String),
}

impl Error {
    /// HTTP-like status for the error, used by the server front
    pub fn status_code(&self) -> u16 {
        match self {
            Error::MissingCredential => 401,
            Error::NotFound(_) => 404,
            Error::Validation(_) | Error::InvalidTime(_) => 400,
            Error::AlreadyInFlight(_) => 409,
            Error::Upstream { status, .. } => *status,
            _ => 500,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(Error::MissingCredential.status_code(), 401);
        assert_eq!(Error::AlreadyInFlight("x".into()).status_code(), 409);
        assert_eq!(
            Error::Upstream { status: 503, message: "down".into() }.status_code(),
            503
        );
        assert_eq!(Error::Network("refused".into()).status_code(), 500);
    }

    #[test]
    fn test_config_error_converts() {
        let err: Error = ConfigError::NotFound.into();
        assert!(matches!(err, Error::Config(ConfigError::NotFound)));
        assert_eq!(err.to_string(), "Configuration error: Configuration not found");
    }
}
