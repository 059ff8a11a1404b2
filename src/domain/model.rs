use crate::utils::error::{RelayError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Face-swap model the relay submits to unless configured otherwise.
pub const DEFAULT_MODEL: &str = "arabyai-replicate/roop_face_swap:11b6bf0f4e14d808f655e87e5448233cceff10a45f659d71539cafb7163b2e84";

/// Body accepted by the relay endpoint.
///
/// Both fields are data URLs. They are optional here so that an incomplete
/// body still parses and can be rejected with a 400 instead of a framework
/// rejection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SwapRequest {
    #[serde(default)]
    pub swap_image: Option<String>,
    #[serde(default)]
    pub target_video: Option<String>,
}

impl SwapRequest {
    pub fn new(swap_image: impl Into<String>, target_video: impl Into<String>) -> Self {
        Self {
            swap_image: Some(swap_image.into()),
            target_video: Some(target_video.into()),
        }
    }

    /// Returns the job input when both payloads are present and non-empty.
    pub fn into_input(self) -> Option<SwapInput> {
        match (self.swap_image, self.target_video) {
            (Some(swap_image), Some(target_video))
                if !swap_image.is_empty() && !target_video.is_empty() =>
            {
                Some(SwapInput {
                    swap_image,
                    target_video,
                })
            }
            _ => None,
        }
    }
}

/// Validated job input, forwarded to the provider unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapInput {
    pub swap_image: String,
    pub target_video: String,
}

/// Body sent to the provider when creating a prediction.
#[derive(Debug, Clone, Serialize)]
pub struct PredictionInput<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<&'a str>,
    pub input: &'a SwapInput,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PredictionStatus {
    Starting,
    Processing,
    Succeeded,
    Failed,
    Canceled,
}

impl PredictionStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed | Self::Canceled)
    }
}

impl fmt::Display for PredictionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Starting => "starting",
            Self::Processing => "processing",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
            Self::Canceled => "canceled",
        };
        f.write_str(s)
    }
}

/// A remote job as reported by the provider.
#[derive(Debug, Clone, Deserialize)]
pub struct Prediction {
    pub id: String,
    pub status: PredictionStatus,
    #[serde(default)]
    pub output: serde_json::Value,
    #[serde(default)]
    pub error: Option<serde_json::Value>,
    #[serde(default)]
    pub logs: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Prediction {
    /// Job error as text; the provider reports it either as a string or an object.
    pub fn error_message(&self) -> Option<String> {
        match &self.error {
            None | Some(serde_json::Value::Null) => None,
            Some(serde_json::Value::String(s)) => Some(s.clone()),
            Some(other) => Some(other.to_string()),
        }
    }

    pub fn elapsed(&self) -> Option<chrono::Duration> {
        Some(self.completed_at? - self.created_at?)
    }
}

/// Error payload returned by the relay for 4xx/5xx responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Provider model identifier in `owner/name[:version]` form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelRef {
    pub owner: String,
    pub name: String,
    pub version: Option<String>,
}

impl FromStr for ModelRef {
    type Err = RelayError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = |reason: &str| RelayError::InvalidConfigValueError {
            field: "model".to_string(),
            value: s.to_string(),
            reason: reason.to_string(),
        };

        let (path, version) = match s.split_once(':') {
            Some((_, "")) => return Err(invalid("Version after ':' cannot be empty")),
            Some((path, version)) => (path, Some(version.to_string())),
            None => (s, None),
        };

        let (owner, name) = path
            .split_once('/')
            .ok_or_else(|| invalid("Expected owner/name[:version]"))?;
        if owner.is_empty() || name.is_empty() || name.contains('/') {
            return Err(invalid("Expected owner/name[:version]"));
        }

        Ok(Self {
            owner: owner.to_string(),
            name: name.to_string(),
            version,
        })
    }
}

impl fmt::Display for ModelRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)?;
        if let Some(version) = &self.version {
            write!(f, ":{}", version)?;
        }
        Ok(())
    }
}
