use std::io;
use thiserror::Error;

/// Unified error type for the aitrip application
#[derive(Error, Debug)]
pub enum AitripError {
    /// Provider id is not registered (configuration mistake)
    #[error("Unknown provider: {0}")]
    UnknownProvider(String),

    /// User has not supplied a token required by the provider
    #[error("No API token configured for {0}. Set one in ~/.aitrip/config.yaml")]
    MissingCredential(String),

    /// AI service failures (transport, non-success status, vendor error payload)
    #[error("AI service error: {0}")]
    Api(String),

    /// Vendor replied but the expected reply path was absent
    #[error("Malformed provider response: {0}")]
    MalformedResponse(String),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// User input errors
    #[error("Input error: {0}")]
    Input(String),

    /// IO-related errors
    #[error("IO error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Network-related errors
    #[error("Network error: {0}")]
    Network(String),
}

impl From<reqwest::Error> for AitripError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AitripError::Network(format!("Request timed out: {}", err))
        } else if err.is_connect() {
            AitripError::Network(format!("Connection failed: {}", err))
        } else if err.is_status() {
            AitripError::Api(format!("API returned error status: {}", err))
        } else {
            AitripError::Network(format!("Request failed: {}", err))
        }
    }
}

impl From<serde_json::Error> for AitripError {
    fn from(err: serde_json::Error) -> Self {
        AitripError::Serialization(format!("JSON error: {}", err))
    }
}

impl From<serde_yml::Error> for AitripError {
    fn from(err: serde_yml::Error) -> Self {
        AitripError::Serialization(format!("YAML error: {}", err))
    }
}
