use crate::domain::model::{ModelRef, SwapInput};
use crate::provider::ProviderError;
use async_trait::async_trait;
use std::time::Duration;

pub trait ConfigProvider: Send + Sync {
    fn bind_address(&self) -> &str;
    fn provider_url(&self) -> &str;
    fn api_token(&self) -> &str;
    fn model(&self) -> &str;
    fn poll_interval(&self) -> Duration;
}

/// Runs a remote job to completion and returns its raw output.
#[async_trait]
pub trait Predictor: Send + Sync {
    async fn run(
        &self,
        model: &ModelRef,
        input: &SwapInput,
    ) -> std::result::Result<serde_json::Value, ProviderError>;
}
