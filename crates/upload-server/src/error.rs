//! Error responses of the upload endpoint.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// Every failure is answered with `{ "error": "<message>" }`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    MissingFields,
    InvalidFileName,
    InvalidImageData,
    UploadFailed,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingFields | ApiError::InvalidFileName | ApiError::InvalidImageData => {
                StatusCode::BAD_REQUEST
            }
            ApiError::UploadFailed => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            ApiError::MissingFields => "Missing imageData or fileName",
            ApiError::InvalidFileName => "Invalid fileName",
            ApiError::InvalidImageData => "Invalid image data",
            ApiError::UploadFailed => "Image upload failed",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.message() }))).into_response()
    }
}
