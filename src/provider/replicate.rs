//! REST client for a Replicate-style prediction API.
//!
//! `run` mirrors the provider SDK's run-to-completion call: create the
//! prediction, then poll it until it reaches a terminal status. There is no
//! overall deadline; the caller is blocked for as long as the job runs.

use crate::domain::model::{ModelRef, Prediction, PredictionInput, PredictionStatus, SwapInput};
use crate::domain::ports::{ConfigProvider, Predictor};
use crate::provider::ProviderError;
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "https://api.replicate.com";

pub struct ReplicateClient {
    client: Client,
    api_url: String,
    api_token: String,
    poll_interval: Duration,
}

impl ReplicateClient {
    /// * `api_url` - Base URL, e.g. `https://api.replicate.com`.
    /// * `api_token` - Bearer credential sent on every request.
    pub fn new(api_url: impl Into<String>, api_token: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_url: api_url.into().trim_end_matches('/').to_string(),
            api_token: api_token.into(),
            poll_interval: Duration::from_secs(1),
        }
    }

    pub fn from_config<C: ConfigProvider + ?Sized>(config: &C) -> Self {
        Self::new(config.provider_url(), config.api_token())
            .with_poll_interval(config.poll_interval())
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Create a prediction for `model`.
    ///
    /// Versioned models go through `POST /v1/predictions`; a bare
    /// `owner/name` uses the model's own predictions endpoint.
    pub async fn create_prediction(
        &self,
        model: &ModelRef,
        input: &SwapInput,
    ) -> Result<Prediction, ProviderError> {
        let url = match &model.version {
            Some(_) => format!("{}/v1/predictions", self.api_url),
            None => format!(
                "{}/v1/models/{}/{}/predictions",
                self.api_url, model.owner, model.name
            ),
        };
        let body = PredictionInput {
            version: model.version.as_deref(),
            input,
        };

        tracing::debug!("Creating prediction at: {}", url);
        let response = self
            .client
            .post(url)
            .bearer_auth(&self.api_token)
            .json(&body)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    pub async fn get_prediction(&self, id: &str) -> Result<Prediction, ProviderError> {
        let response = self
            .client
            .get(format!("{}/v1/predictions/{}", self.api_url, id))
            .bearer_auth(&self.api_token)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Poll until `prediction` reaches a terminal status.
    pub async fn wait(&self, mut prediction: Prediction) -> Result<Prediction, ProviderError> {
        while !prediction.status.is_terminal() {
            tokio::time::sleep(self.poll_interval).await;
            prediction = self.get_prediction(&prediction.id).await?;
            tracing::debug!(id = %prediction.id, status = %prediction.status, "Polled prediction");
        }
        Ok(prediction)
    }

    async fn parse_response<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ProviderError> {
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(ProviderError::from_response_body(status.as_u16(), body));
        }
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl Predictor for ReplicateClient {
    async fn run(
        &self,
        model: &ModelRef,
        input: &SwapInput,
    ) -> Result<serde_json::Value, ProviderError> {
        let created = self.create_prediction(model, input).await?;
        tracing::info!(id = %created.id, status = %created.status, "Prediction created");

        let prediction = self.wait(created).await?;
        if let Some(elapsed) = prediction.elapsed() {
            tracing::info!(id = %prediction.id, "Prediction ran for {}s", elapsed.num_seconds());
        }

        match prediction.status {
            PredictionStatus::Succeeded => Ok(prediction.output),
            status => {
                if let Some(logs) = &prediction.logs {
                    tracing::debug!(id = %prediction.id, "Prediction logs:\n{}", logs);
                }
                Err(ProviderError::Prediction {
                    error: prediction.error_message(),
                    id: prediction.id,
                    status,
                })
            }
        }
    }
}
