/// Generation API routes
use crate::{
    error::{Result, ServerError},
    services::prompts::{build_prompt, parse_trivia},
    state::AppState,
};
use axum::{
    extract::{Path, State},
    Json,
};
use cupid_core::Feature;
use serde_json::{json, Value};

/// POST /api/:feature
///
/// Text features answer `{ result: "<text>" }`; trivia answers
/// `{ result: [question, ...] }`.
pub async fn generate(
    Path(slug): Path<String>,
    State(app_state): State<AppState>,
    body: Option<Json<Value>>,
) -> Result<Json<Value>> {
    let feature = Feature::from_slug(&slug)
        .ok_or_else(|| ServerError::NotFound(format!("Unknown feature: {}", slug)))?;

    let fields = body.map(|Json(v)| v).unwrap_or(Value::Null);
    let prompt = build_prompt(feature, fields)?;

    tracing::info!(feature = %feature, "Generating");
    let text = app_state.gateway.generate_prompt(&prompt).await?;

    if feature.is_structured() {
        let questions =
            parse_trivia(&text).map_err(|e| ServerError::InvalidContent(e.to_string()))?;
        return Ok(Json(json!({ "result": questions })));
    }

    Ok(Json(json!({ "result": text })))
}
