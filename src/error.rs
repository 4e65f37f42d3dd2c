// Error taxonomy shared by the booking flow and the remote clients

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PortalError {
    // Missing or invalid input; blocks forward navigation and is shown inline
    #[error("Validation error: {0}")]
    Validation(String),

    // `code` is the backend's machine-readable error code, when it sends one
    #[error("API error: {status} - {message}")]
    Api {
        status: u16,
        message: String,
        code: Option<String>,
    },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    // Expected session data is gone; the caller restarts from search
    #[error("Missing state: {0}")]
    MissingState(String),

    #[error("No flights found for this route")]
    NoResults,

    #[error("Timed out: {0}")]
    Timeout(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl PortalError {
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        PortalError::Api {
            status,
            message: message.into(),
            code: None,
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        PortalError::Validation(message.into())
    }

    pub fn missing_state(message: impl Into<String>) -> Self {
        PortalError::MissingState(message.into())
    }

    /// Message for a dismissible error banner.
    ///
    /// Server-provided and validation messages are shown as-is; anything else
    /// falls back to the generic text supplied by the caller.
    pub fn banner(&self, fallback: &str) -> String {
        match self {
            PortalError::Validation(msg) => msg.clone(),
            PortalError::Api { message, .. } if !message.trim().is_empty() => message.clone(),
            PortalError::NoResults => self.to_string(),
            PortalError::Network(_) => "Network error - please check your connection".to_string(),
            _ => fallback.to_string(),
        }
    }

    pub fn requires_restart(&self) -> bool {
        matches!(self, PortalError::MissingState(_))
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, PortalError::Validation(_))
    }

    pub fn code(&self) -> Option<&str> {
        match self {
            PortalError::Api { code, .. } => code.as_deref(),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for PortalError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            PortalError::MalformedResponse(err.to_string())
        } else if let Some(status) = err.status() {
            PortalError::Api {
                status: status.as_u16(),
                message: String::new(),
                code: None,
            }
        } else {
            PortalError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for PortalError {
    fn from(err: serde_json::Error) -> Self {
        PortalError::MalformedResponse(err.to_string())
    }
}

impl From<config::ConfigError> for PortalError {
    fn from(err: config::ConfigError) -> Self {
        PortalError::Config(err.to_string())
    }
}

pub type PortalResult<T> = Result<T, PortalError>;
