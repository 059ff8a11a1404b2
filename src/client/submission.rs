//! One-at-a-time face-swap submission flow.
//!
//! ```text
//! Idle --submit--> EncodingFiles --> AwaitingRemote --> Success
//!                        |                  |
//!                        +-------> Failed <-+
//! ```
//!
//! A submission without both files stays in `Idle` with an error and makes
//! no request.
//!
//! Each transition is also published as a [`SubmissionUpdate`] to an
//! optional progress channel, so a caller can show the status line and lock
//! its inputs while `submit` is still running.

use crate::client::encoding::encode_file;
use crate::client::relay_client::RelayClient;
use crate::domain::model::SwapInput;
use std::path::PathBuf;
use tokio::sync::mpsc::UnboundedSender;

pub const STATUS_PREPARING: &str = "Step 1/2: Preparing files...";
pub const STATUS_SUBMITTING: &str =
    "Step 2/2: Submitting to Replicate... (This can take 1-3 minutes)";
pub const STATUS_COMPLETE: &str = "Face swap complete!";
pub const STATUS_FAILED: &str = "An error occurred.";
pub const MISSING_FILES_MESSAGE: &str = "Please select both an image and a video.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionState {
    Idle,
    EncodingFiles,
    AwaitingRemote,
    Success { result_url: String },
    Failed { error: String },
}

impl SubmissionState {
    /// Inputs are locked while files are encoded or the relay is working.
    pub fn is_busy(&self) -> bool {
        matches!(self, Self::EncodingFiles | Self::AwaitingRemote)
    }
}

/// A state change together with the status line shown for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionUpdate {
    pub state: SubmissionState,
    pub status_message: String,
}

impl SubmissionUpdate {
    pub fn is_busy(&self) -> bool {
        self.state.is_busy()
    }
}

pub struct Submission {
    relay: RelayClient,
    source_image: Option<PathBuf>,
    target_video: Option<PathBuf>,
    state: SubmissionState,
    status_message: String,
    status_history: Vec<String>,
    error: Option<String>,
    progress: Option<UnboundedSender<SubmissionUpdate>>,
}

impl Submission {
    pub fn new(relay: RelayClient) -> Self {
        Self {
            relay,
            source_image: None,
            target_video: None,
            state: SubmissionState::Idle,
            status_message: String::new(),
            status_history: Vec::new(),
            error: None,
            progress: None,
        }
    }

    /// Publish every state change to `progress` as it happens.
    pub fn with_progress(mut self, progress: UnboundedSender<SubmissionUpdate>) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn choose_image(&mut self, path: impl Into<PathBuf>) {
        self.source_image = Some(path.into());
    }

    pub fn choose_video(&mut self, path: impl Into<PathBuf>) {
        self.target_video = Some(path.into());
    }

    pub fn state(&self) -> &SubmissionState {
        &self.state
    }

    pub fn status_message(&self) -> &str {
        &self.status_message
    }

    /// Status messages of the current submission, oldest first.
    pub fn status_history(&self) -> &[String] {
        &self.status_history
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn result_url(&self) -> Option<&str> {
        match &self.state {
            SubmissionState::Success { result_url } => Some(result_url),
            _ => None,
        }
    }

    pub fn is_busy(&self) -> bool {
        self.state.is_busy()
    }

    pub async fn submit(&mut self) -> &SubmissionState {
        let (Some(image), Some(video)) = (self.source_image.clone(), self.target_video.clone())
        else {
            tracing::warn!("{}", MISSING_FILES_MESSAGE);
            self.error = Some(MISSING_FILES_MESSAGE.to_string());
            self.state = SubmissionState::Idle;
            return &self.state;
        };

        self.error = None;
        self.status_history.clear();

        self.advance(SubmissionState::EncodingFiles, STATUS_PREPARING);
        let input = match Self::encode(image, video).await {
            Ok(input) => input,
            Err(e) => return self.fail(e.to_string()),
        };

        self.advance(SubmissionState::AwaitingRemote, STATUS_SUBMITTING);
        match self.relay.swap(&input).await {
            Ok(result_url) => {
                self.advance(SubmissionState::Success { result_url }, STATUS_COMPLETE);
            }
            Err(e) => return self.fail(e.to_string()),
        }

        &self.state
    }

    async fn encode(image: PathBuf, video: PathBuf) -> crate::utils::error::Result<SwapInput> {
        Ok(SwapInput {
            swap_image: encode_file(&image).await?,
            target_video: encode_file(&video).await?,
        })
    }

    fn advance(&mut self, state: SubmissionState, message: &str) {
        tracing::info!("{}", message);
        self.state = state;
        self.status_message = message.to_string();
        self.status_history.push(message.to_string());

        if let Some(progress) = &self.progress {
            let update = SubmissionUpdate {
                state: self.state.clone(),
                status_message: self.status_message.clone(),
            };
            // The receiver may already be gone.
            let _ = progress.send(update);
        }
    }

    fn fail(&mut self, error: String) -> &SubmissionState {
        tracing::error!("Submission failed: {}", error);
        self.error = Some(error.clone());
        self.advance(SubmissionState::Failed { error }, STATUS_FAILED);
        &self.state
    }
}
