//! Client side of the hosted inference provider.
//!
//! The relay only ever talks to the provider through the
//! [`Predictor`](crate::domain::ports::Predictor) port; [`ReplicateClient`]
//! is the production implementation.

pub mod replicate;

pub use replicate::ReplicateClient;

use crate::domain::model::PredictionStatus;

/// Errors from the provider API layer.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("Provider request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The provider returned a non-2xx status code.
    #[error("Provider API error ({status}): {body}")]
    Api {
        status: u16,
        /// `detail` field of a JSON error body, when there was one.
        detail: Option<String>,
        /// Raw response body.
        body: String,
    },

    /// The job reached a terminal state other than `succeeded`.
    #[error("Prediction {status}: {}", .error.as_deref().unwrap_or("no error reported"))]
    Prediction {
        id: String,
        status: PredictionStatus,
        error: Option<String>,
    },

    /// A success response whose body did not match the expected shape.
    #[error("Invalid provider response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ProviderError {
    /// Builds an [`ProviderError::Api`] from a failed response body.
    pub fn from_response_body(status: u16, body: String) -> Self {
        let detail = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|value| match value.get("detail") {
                Some(serde_json::Value::String(s)) => Some(s.clone()),
                Some(serde_json::Value::Null) | None => None,
                Some(other) => Some(other.to_string()),
            });
        Self::Api {
            status,
            detail,
            body,
        }
    }

    /// Structured detail from the provider's error payload, falling back to
    /// the error text.
    pub fn detail(&self) -> String {
        match self {
            Self::Api {
                detail: Some(detail),
                ..
            } => detail.clone(),
            other => other.to_string(),
        }
    }
}
