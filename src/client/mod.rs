//! Submission side: encode two local files, call the relay, track progress.

pub mod encoding;
pub mod relay_client;
pub mod submission;

pub use relay_client::RelayClient;
pub use submission::{Submission, SubmissionState, SubmissionUpdate};
