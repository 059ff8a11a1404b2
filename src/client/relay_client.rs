use crate::domain::model::SwapInput;
use crate::utils::error::{RelayError, Result};
use reqwest::{Client, StatusCode};
use std::path::Path;

pub const GENERIC_FAILURE_MESSAGE: &str = "Prediction failed.";

/// HTTP client for the relay's `/api/predictions` endpoint.
#[derive(Debug, Clone)]
pub struct RelayClient {
    client: Client,
    endpoint: String,
}

impl RelayClient {
    /// * `base_url` - Where the relay is served, e.g. `http://127.0.0.1:3000`.
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            endpoint: format!("{}/api/predictions", base_url.trim_end_matches('/')),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Submit both payloads and return the first element of the result.
    ///
    /// Any status other than 200 is a failure carrying the body's `detail`,
    /// or a generic message when there is none.
    pub async fn swap(&self, input: &SwapInput) -> Result<String> {
        tracing::debug!("Submitting to relay: {}", self.endpoint);
        let response = self.client.post(&self.endpoint).json(input).send().await?;

        let status = response.status();
        let body: serde_json::Value = response.json().await.unwrap_or_default();
        tracing::debug!("Relay response status: {}", status);

        if status != StatusCode::OK {
            let message = body
                .get("detail")
                .and_then(|d| d.as_str())
                .filter(|d| !d.is_empty())
                .unwrap_or(GENERIC_FAILURE_MESSAGE)
                .to_string();
            return Err(RelayError::RelayRejectedError {
                status: status.as_u16(),
                message,
            });
        }

        body.get(0)
            .and_then(|first| first.as_str())
            .map(str::to_string)
            .ok_or_else(|| RelayError::UnexpectedResponseError {
                message: format!("expected an array of URLs, got {}", body),
            })
    }

    /// Fetch the produced video into `destination`.
    pub async fn download(&self, url: &str, destination: &Path) -> Result<u64> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        let bytes = response.bytes().await?;
        tokio::fs::write(destination, &bytes).await?;
        Ok(bytes.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn input() -> SwapInput {
        SwapInput {
            swap_image: "data:image/png;base64,AA".to_string(),
            target_video: "data:video/mp4;base64,BB".to_string(),
        }
    }

    #[tokio::test]
    async fn test_swap_returns_first_url() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/api/predictions")
                .header("content-type", "application/json")
                .json_body(json!({
                    "swap_image": "data:image/png;base64,AA",
                    "target_video": "data:video/mp4;base64,BB"
                }));
            then.status(200)
                .json_body(json!(["http://x/result.mp4", "http://x/other.mp4"]));
        });

        let url = RelayClient::new(&server.base_url()).swap(&input()).await.unwrap();

        assert_eq!(url, "http://x/result.mp4");
        mock.assert();
    }

    #[tokio::test]
    async fn test_swap_surfaces_detail() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/api/predictions");
            then.status(500).json_body(json!({
                "message": "An error occurred during the prediction.",
                "detail": "bad input"
            }));
        });

        let err = RelayClient::new(&server.base_url())
            .swap(&input())
            .await
            .unwrap_err();

        match err {
            RelayError::RelayRejectedError { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "bad input");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_swap_without_detail_uses_generic_message() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/api/predictions");
            then.status(400)
                .json_body(json!({ "message": "Missing swap_image or target_video in request body" }));
        });

        let err = RelayClient::new(&server.base_url())
            .swap(&input())
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), GENERIC_FAILURE_MESSAGE);
    }

    #[tokio::test]
    async fn test_download_writes_file() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/result.mp4");
            then.status(200).body("video-bytes");
        });
        let dir = tempfile::tempdir().unwrap();
        let destination = dir.path().join("result.mp4");

        let written = RelayClient::new(&server.base_url())
            .download(&server.url("/result.mp4"), &destination)
            .await
            .unwrap();

        assert_eq!(written, 11);
        assert_eq!(std::fs::read(&destination).unwrap(), b"video-bytes");
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let client = RelayClient::new("http://127.0.0.1:3000/");
        assert_eq!(client.endpoint(), "http://127.0.0.1:3000/api/predictions");
    }
}
