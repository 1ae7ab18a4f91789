/// Music search API route
use crate::{
    error::{Result, ServerError},
    state::AppState,
};
use axum::{extract::State, Json};
use cupid_core::TrackId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct MusicSearchRequest {
    #[serde(default)]
    pub query: String,
}

#[derive(Debug, Serialize)]
pub struct MusicSearchResponse {
    pub result: TrackId,
}

/// POST /api/music-search
pub async fn music_search(
    State(app_state): State<AppState>,
    Json(request): Json<MusicSearchRequest>,
) -> Result<Json<MusicSearchResponse>> {
    let query = request.query.trim();
    if query.is_empty() {
        return Err(ServerError::BadRequest("Query is required".to_string()));
    }

    // Search failures are a "not found", never a server error
    let found = app_state.search.search(query).await.unwrap_or_else(|e| {
        tracing::warn!(query = %query, error = %e, "Search failed");
        None
    });

    found
        .map(|result| Json(MusicSearchResponse { result }))
        .ok_or_else(|| ServerError::NotFound("Song not found".to_string()))
}
