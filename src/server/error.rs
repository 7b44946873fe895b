//! HTTP error mapping for the detector service

use crate::error::DetectorError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Wrapper turning pipeline errors into HTTP responses.
///
/// Client-input failures map to 400 with their full message;
/// `ServiceUnavailable` maps to 503; everything else is logged and masked
/// behind a generic 500 so internal detail never leaks to callers.
/// (Type-level JSON rejection never reaches this type: axum's `Json`
/// extractor answers 422 on its own.)
#[derive(Debug)]
pub struct ApiError(pub DetectorError);

impl From<DetectorError> for ApiError {
    fn from(err: DetectorError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = if self.0.is_client_error() {
            tracing::warn!(detail = %self.0, "Rejected invalid request");
            (StatusCode::BAD_REQUEST, self.0.to_string())
        } else {
            match &self.0 {
                DetectorError::ServiceUnavailable => {
                    tracing::error!("Prediction requested before inference context was loaded");
                    (StatusCode::SERVICE_UNAVAILABLE, self.0.to_string())
                }
                other => {
                    tracing::error!(detail = %other, "Internal error during prediction");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "An unexpected error occurred during prediction.".to_string(),
                    )
                }
            }
        };

        let body = Json(json!({
            "error": true,
            "message": message,
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_errors_map_to_400() {
        let response = ApiError(DetectorError::EmptyPayload).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_unavailable_maps_to_503() {
        let response = ApiError(DetectorError::ServiceUnavailable).into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_internal_maps_to_500() {
        let response = ApiError(DetectorError::Internal("boom".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
