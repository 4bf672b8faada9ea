//! Error types and handling for `CareCompass`

use thiserror::Error;

/// Main error type for the `CareCompass` capabilities
#[derive(Error, Debug)]
pub enum CareCompassError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// A network call exceeded its bound
    #[error("Request timed out: {message}")]
    Timeout { message: String },

    /// Connection-level failures
    #[error("Network error: {message}")]
    Network { message: String },

    /// Upstream service answered with an error
    #[error("API error: {message}")]
    Api { message: String },

    /// Response payload could not be decoded
    #[error("Parse error: {message}")]
    Parse { message: String },

    /// Outbound call could not be placed
    #[error("Call placement failed: {message}")]
    Call { message: String },
}

impl CareCompassError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new timeout error
    pub fn timeout<S: Into<String>>(message: S) -> Self {
        Self::Timeout {
            message: message.into(),
        }
    }

    /// Create a new network error
    pub fn network<S: Into<String>>(message: S) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Create a new API error
    pub fn api<S: Into<String>>(message: S) -> Self {
        Self::Api {
            message: message.into(),
        }
    }

    /// Create a new parse error
    pub fn parse<S: Into<String>>(message: S) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    /// Create a new call placement error
    pub fn call<S: Into<String>>(message: S) -> Self {
        Self::Call {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            CareCompassError::Config { .. } => {
                "Configuration error. Please check your config file and credentials.".to_string()
            }
            CareCompassError::Timeout { .. } => "Request timed out. Please try again.".to_string(),
            CareCompassError::Network { .. } | CareCompassError::Api { .. } => {
                "Unable to connect to external services. Please check your internet connection."
                    .to_string()
            }
            CareCompassError::Parse { .. } => {
                "An external service returned an unexpected response.".to_string()
            }
            CareCompassError::Call { message } => {
                format!("The emergency call could not be placed: {message}")
            }
        }
    }
}

impl From<reqwest::Error> for CareCompassError {
    fn from(err: reqwest::Error) -> Self {
        // Request URLs carry API keys in their query string
        let err = err.without_url();
        if err.is_timeout() {
            Self::timeout(err.to_string())
        } else if err.is_decode() {
            Self::parse(err.to_string())
        } else {
            Self::network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for CareCompassError {
    fn from(err: serde_json::Error) -> Self {
        Self::parse(err.to_string())
    }
}
