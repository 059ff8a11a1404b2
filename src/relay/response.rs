use axum::http::header::ALLOW;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::domain::model::ErrorBody;
use crate::utils::error::RelayError;

pub const PREDICTION_FAILED_MESSAGE: &str = "An error occurred during the prediction.";

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        match self {
            RelayError::MethodNotAllowedError { method } => (
                StatusCode::METHOD_NOT_ALLOWED,
                [(ALLOW, "POST")],
                Json(ErrorBody {
                    message: format!("Method {} Not Allowed", method),
                    detail: None,
                }),
            )
                .into_response(),
            RelayError::MissingInputError { message } => (
                StatusCode::BAD_REQUEST,
                Json(ErrorBody {
                    message,
                    detail: None,
                }),
            )
                .into_response(),
            RelayError::ProviderError(err) => prediction_failed(err.detail()),
            other => prediction_failed(other.to_string()),
        }
    }
}

fn prediction_failed(detail: String) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorBody {
            message: PREDICTION_FAILED_MESSAGE.to_string(),
            detail: Some(detail),
        }),
    )
        .into_response()
}
