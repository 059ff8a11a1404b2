use crate::provider::ProviderError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RelayError {
    #[error("HTTP request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error(transparent)]
    ProviderError(#[from] ProviderError),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value for {field} ('{value}'): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("{message}")]
    MissingInputError { message: String },

    #[error("Method {method} Not Allowed")]
    MethodNotAllowedError { method: String },

    #[error("Failed to read {path}: {source}")]
    EncodingError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{message}")]
    RelayRejectedError { status: u16, message: String },

    #[error("Unexpected relay response: {message}")]
    UnexpectedResponseError { message: String },
}

pub type Result<T> = std::result::Result<T, RelayError>;

impl RelayError {
    pub fn user_friendly_message(&self) -> String {
        match self {
            RelayError::ApiError(_) => "Could not reach the server".to_string(),
            RelayError::IoError(e) => format!("File operation failed: {}", e),
            RelayError::ProviderError(e) => format!("Face swap failed: {}", e.detail()),
            RelayError::ConfigError { .. }
            | RelayError::MissingConfigError { .. }
            | RelayError::InvalidConfigValueError { .. } => format!("Invalid configuration: {}", self),
            RelayError::EncodingError { path, .. } => format!("Could not read {}", path),
            RelayError::RelayRejectedError { message, .. } => format!("Face swap failed: {}", message),
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            RelayError::ApiError(_) => "Check that the relay is running and the URL is correct",
            RelayError::MissingConfigError { .. } => {
                "Set REPLICATE_API_TOKEN or pass --api-token"
            }
            RelayError::ConfigError { .. } | RelayError::InvalidConfigValueError { .. } => {
                "Review the command-line arguments and configuration file"
            }
            RelayError::MissingInputError { .. } => "Pass both --image and --video",
            RelayError::EncodingError { .. } | RelayError::IoError(_) => {
                "Check that the file exists and is readable"
            }
            RelayError::RelayRejectedError { status, .. } if *status < 500 => {
                "Check the submitted files"
            }
            _ => "Try again later; the provider may be unavailable",
        }
    }
}
