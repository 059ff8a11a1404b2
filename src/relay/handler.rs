//! `/api/predictions`: the face-swap relay.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::Method;
use axum::Json;

use crate::domain::model::SwapRequest;
use crate::relay::state::AppState;
use crate::utils::error::RelayError;

pub const MISSING_INPUT_MESSAGE: &str = "Missing swap_image or target_video in request body";

/// POST /api/predictions -- run one face-swap job to completion.
///
/// The request is held open until the provider reports a terminal status.
/// A body that does not parse is treated like one with both fields missing.
pub async fn create_prediction(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<serde_json::Value>, RelayError> {
    let input = parse_swap_request(&body)
        .into_input()
        .ok_or_else(|| RelayError::MissingInputError {
            message: MISSING_INPUT_MESSAGE.to_string(),
        })?;

    tracing::info!(model = %state.model, "Running prediction...");
    match state.predictor.run(&state.model, &input).await {
        Ok(output) => {
            tracing::info!(%output, "Prediction finished successfully");
            Ok(Json(output))
        }
        Err(e) => {
            tracing::error!(error = %e, "Error running prediction");
            Err(e.into())
        }
    }
}

/// Fields are looked up by name, so only a JSON object can carry them.
fn parse_swap_request(body: &[u8]) -> SwapRequest {
    let fields = match serde_json::from_slice::<serde_json::Map<String, serde_json::Value>>(body) {
        Ok(fields) => fields,
        Err(e) => {
            tracing::debug!(error = %e, "Request body is not a JSON object");
            return SwapRequest::default();
        }
    };

    serde_json::from_value(serde_json::Value::Object(fields)).unwrap_or_else(|e| {
        tracing::debug!(error = %e, "Request body fields are not strings");
        SwapRequest::default()
    })
}

/// Any verb other than POST.
pub async fn method_not_allowed(method: Method) -> RelayError {
    tracing::debug!(%method, "Rejected request method");
    RelayError::MethodNotAllowedError {
        method: method.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{ErrorBody, ModelRef, SwapInput};
    use crate::domain::ports::Predictor;
    use crate::provider::ProviderError;
    use crate::relay::response::PREDICTION_FAILED_MESSAGE;
    use async_trait::async_trait;
    use axum::http::StatusCode;
    use axum::routing::post;
    use axum::Router;
    use axum_test::TestServer;
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    enum Outcome {
        Output(serde_json::Value),
        ApiError(u16, &'static str),
    }

    struct FakePredictor {
        outcome: Outcome,
        calls: Mutex<Vec<(String, SwapInput)>>,
    }

    impl FakePredictor {
        fn new(outcome: Outcome) -> Arc<Self> {
            Arc::new(Self {
                outcome,
                calls: Mutex::new(Vec::new()),
            })
        }

        fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl Predictor for FakePredictor {
        async fn run(
            &self,
            model: &ModelRef,
            input: &SwapInput,
        ) -> Result<serde_json::Value, ProviderError> {
            self.calls
                .lock()
                .unwrap()
                .push((model.to_string(), input.clone()));
            match &self.outcome {
                Outcome::Output(value) => Ok(value.clone()),
                Outcome::ApiError(status, body) => Err(ProviderError::from_response_body(
                    *status,
                    body.to_string(),
                )),
            }
        }
    }

    fn server_with(predictor: Arc<FakePredictor>) -> TestServer {
        let state = AppState::new(predictor, "owner/face_swap:v1".parse().unwrap());
        let app = Router::new()
            .route(
                "/api/predictions",
                post(create_prediction).fallback(method_not_allowed),
            )
            .with_state(state);
        TestServer::new(app).unwrap()
    }

    #[tokio::test]
    async fn test_success_returns_raw_output() {
        let predictor = FakePredictor::new(Outcome::Output(json!(["http://x/result.mp4"])));
        let server = server_with(predictor.clone());

        let response = server
            .post("/api/predictions")
            .json(&json!({
                "swap_image": "data:image/png;base64,AA",
                "target_video": "data:video/mp4;base64,BB"
            }))
            .await;

        response.assert_status(StatusCode::OK);
        response.assert_json(&json!(["http://x/result.mp4"]));

        let calls = predictor.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "owner/face_swap:v1");
        assert_eq!(calls[0].1.swap_image, "data:image/png;base64,AA");
        assert_eq!(calls[0].1.target_video, "data:video/mp4;base64,BB");
    }

    #[tokio::test]
    async fn test_missing_field_is_bad_request() {
        let predictor = FakePredictor::new(Outcome::Output(json!([])));
        let server = server_with(predictor.clone());

        for body in [
            json!({ "swap_image": "data:image/png;base64,AA" }),
            json!({ "target_video": "data:video/mp4;base64,BB" }),
            json!({ "swap_image": "", "target_video": "data:video/mp4;base64,BB" }),
            json!({}),
        ] {
            let response = server.post("/api/predictions").json(&body).await;
            response.assert_status(StatusCode::BAD_REQUEST);
            let error: ErrorBody = response.json();
            assert_eq!(error.message, MISSING_INPUT_MESSAGE);
        }

        let response = server.post("/api/predictions").text("not json").await;
        response.assert_status(StatusCode::BAD_REQUEST);

        let response = server
            .post("/api/predictions")
            .json(&json!(["data:image/png;base64,AA", "data:video/mp4;base64,BB"]))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);

        let response = server
            .post("/api/predictions")
            .json(&json!({ "swap_image": 1, "target_video": "data:video/mp4;base64,BB" }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);

        assert_eq!(predictor.call_count(), 0);
    }

    #[tokio::test]
    async fn test_other_methods_are_not_allowed() {
        let predictor = FakePredictor::new(Outcome::Output(json!([])));
        let server = server_with(predictor.clone());

        let response = server.get("/api/predictions").await;
        response.assert_status(StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.header("allow"), "POST");
        let error: ErrorBody = response.json();
        assert_eq!(error.message, "Method GET Not Allowed");

        let response = server.put("/api/predictions").await;
        response.assert_status(StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.header("allow"), "POST");

        let response = server.delete("/api/predictions").await;
        response.assert_status(StatusCode::METHOD_NOT_ALLOWED);

        assert_eq!(predictor.call_count(), 0);
    }

    #[tokio::test]
    async fn test_provider_rejection_detail_is_relayed() {
        let predictor = FakePredictor::new(Outcome::ApiError(422, r#"{"detail":"bad input"}"#));
        let server = server_with(predictor);

        let response = server
            .post("/api/predictions")
            .json(&json!({ "swap_image": "a", "target_video": "b" }))
            .await;

        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        response.assert_json(&json!({
            "message": PREDICTION_FAILED_MESSAGE,
            "detail": "bad input"
        }));
    }

    #[tokio::test]
    async fn test_unstructured_provider_error_uses_error_text() {
        let predictor = FakePredictor::new(Outcome::ApiError(503, "Service Unavailable"));
        let server = server_with(predictor);

        let response = server
            .post("/api/predictions")
            .json(&json!({ "swap_image": "a", "target_video": "b" }))
            .await;

        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        let error: ErrorBody = response.json();
        assert_eq!(
            error.detail.as_deref(),
            Some("Provider API error (503): Service Unavailable")
        );
    }
}
