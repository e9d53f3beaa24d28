//! `POST /api/upload`.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use pixelpop_booth_model::EncodedPhoto;

use crate::error::ApiError;
use crate::store::{is_safe_file_name, public_url};
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadBody {
    #[serde(default)]
    pub image_data: Option<String>,
    #[serde(default)]
    pub file_name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UploadReply {
    pub success: bool,
    pub url: String,
}

pub async fn upload(
    State(state): State<AppState>,
    body: Result<Json<UploadBody>, JsonRejection>,
) -> Response {
    let body = match body {
        Ok(Json(body)) => body,
        Err(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            tracing::warn!("Upload body over limit");
            return rejection.into_response();
        }
        Err(rejection) => {
            tracing::debug!(error = %rejection, "Unreadable upload body");
            return ApiError::MissingFields.into_response();
        }
    };

    match store_upload(&state, body).await {
        Ok(url) => (StatusCode::OK, Json(UploadReply { success: true, url })).into_response(),
        Err(e) => e.into_response(),
    }
}

async fn store_upload(state: &AppState, body: UploadBody) -> Result<String, ApiError> {
    let image_data = body.image_data.filter(|s| !s.is_empty());
    let file_name = body.file_name.filter(|s| !s.is_empty());
    let (Some(image_data), Some(file_name)) = (image_data, file_name) else {
        return Err(ApiError::MissingFields);
    };

    if !is_safe_file_name(&file_name) {
        tracing::warn!(%file_name, "Rejected upload file name");
        return Err(ApiError::InvalidFileName);
    }

    let photo = EncodedPhoto::from_data_url(&image_data).map_err(|e| {
        tracing::warn!(%file_name, error = %e, "Rejected upload payload");
        ApiError::InvalidImageData
    })?;

    match state.store.save(&file_name, &photo.bytes).await {
        Ok(path) => {
            tracing::info!(path = %path.display(), bytes = photo.len(), "Stored upload");
            Ok(public_url(&file_name))
        }
        Err(e) => {
            tracing::error!(%file_name, error = %e, "Image upload failed");
            Err(ApiError::UploadFailed)
        }
    }
}
