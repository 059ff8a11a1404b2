pub mod client;
pub mod config;
pub mod domain;
pub mod provider;
pub mod relay;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::RelayArgs;

pub use client::{RelayClient, Submission, SubmissionState, SubmissionUpdate};
pub use config::RelayConfig;
pub use domain::model::{ErrorBody, ModelRef, SwapInput, SwapRequest};
pub use provider::{ProviderError, ReplicateClient};
pub use relay::{router, AppState};
pub use utils::error::{RelayError, Result};
