/// Photo upload API route
use crate::{error::ServerError, state::AppState};
use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;

/// Multipart field carrying the photo
pub const PHOTO_FIELD: &str = "photo";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl UploadResponse {
    fn stored(file_path: String) -> (StatusCode, Json<Self>) {
        (
            StatusCode::OK,
            Json(Self {
                success: true,
                file_path: Some(file_path),
                message: None,
            }),
        )
    }

    fn failed(status: StatusCode, message: impl Into<String>) -> (StatusCode, Json<Self>) {
        (
            status,
            Json(Self {
                success: false,
                file_path: None,
                message: Some(message.into()),
            }),
        )
    }
}

/// POST /upload
pub async fn upload_photo(
    State(app_state): State<AppState>,
    mut multipart: Multipart,
) -> (StatusCode, Json<UploadResponse>) {
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                tracing::warn!("Malformed upload: {}", e);
                return UploadResponse::failed(StatusCode::BAD_REQUEST, e.body_text());
            }
        };

        if field.name() != Some(PHOTO_FIELD) {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        let data = match field.bytes().await {
            Ok(data) => data,
            Err(e) => {
                tracing::warn!("Upload interrupted: {}", e);
                return UploadResponse::failed(StatusCode::BAD_REQUEST, e.body_text());
            }
        };

        return match app_state.file_storage.store_photo(&file_name, &data).await {
            Ok(path) => UploadResponse::stored(path),
            Err(ServerError::BadRequest(message)) => {
                UploadResponse::failed(StatusCode::BAD_REQUEST, message)
            }
            Err(e) => {
                tracing::error!("Could not store upload: {}", e);
                UploadResponse::failed(StatusCode::INTERNAL_SERVER_ERROR, "Upload failed")
            }
        };
    }

    tracing::warn!("No file received");
    UploadResponse::failed(StatusCode::BAD_REQUEST, "No file provided")
}
