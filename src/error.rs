use miette::{Diagnostic, Result};
use thiserror::Error;

/// Main error type for the application
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("Environment error: {0}")]
    #[diagnostic(code(navette::environment))]
    Environment(String),

    #[error("Configuration error: {0}")]
    #[diagnostic(code(navette::config))]
    Config(String),

    #[error("Storage error: {0}")]
    #[diagnostic(code(navette::store))]
    Store(String),

    #[error("Not found: {0}")]
    #[diagnostic(code(navette::not_found))]
    NotFound(String),

    #[error("Validation error: {0}")]
    #[diagnostic(code(navette::validation))]
    Validation(String),

    #[error("Authentication error: {0}")]
    #[diagnostic(code(navette::auth))]
    Auth(String),

    #[error(transparent)]
    #[diagnostic(code(navette::io))]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    #[diagnostic(code(navette::serialization))]
    Serialization(String),

    #[error("Other error: {0}")]
    #[diagnostic(code(navette::other))]
    Other(String),
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

impl From<redis::RedisError> for Error {
    fn from(err: redis::RedisError) -> Self {
        Error::Store(err.to_string())
    }
}

/// Type alias for Result with our Error type
pub type AppResult<T> = Result<T, Error>;

/// Helper to create environment errors
pub fn env_error(var: &str) -> Error {
    Error::Environment(format!("Missing environment variable: {}", var))
}

/// Helper to create configuration errors
pub fn config_error(message: &str) -> Error {
    Error::Config(message.to_string())
}

/// Helper to create storage errors
pub fn store_error(message: &str) -> Error {
    Error::Store(message.to_string())
}

/// Helper to create not-found errors
pub fn not_found(what: &str, id: &str) -> Error {
    Error::NotFound(format!("{} {}", what, id))
}

/// Helper to create validation errors
pub fn validation_error(message: &str) -> Error {
    Error::Validation(message.to_string())
}

/// Helper to create authentication errors
pub fn auth_error(message: &str) -> Error {
    Error::Auth(message.to_string())
}
