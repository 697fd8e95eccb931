//! Publish and preview endpoints.

use axum::Json;
use axum::extract::State;
use axum::response::Html;
use serde::Serialize;

use crate::error::ApiError;
use crate::state::AppState;

/// Body of a successful publish.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    success: bool,
    tiles_published: usize,
    tiles_skipped: usize,
    bytes: usize,
}

/// `POST /api/v1/generate`
///
/// Writes the page. A storage failure is a 500 and the previously published
/// page stays in place.
pub async fn generate(State(state): State<AppState>) -> Result<Json<GenerateResponse>, ApiError> {
    let outcome = state.generator.generate()?;
    Ok(Json(GenerateResponse {
        success: true,
        tiles_published: outcome.tiles_published,
        tiles_skipped: outcome.tiles_skipped,
        bytes: outcome.bytes,
    }))
}

/// `GET /api/v1/preview`
///
/// The page `generate` would write, without writing it.
pub async fn preview(State(state): State<AppState>) -> Result<Html<String>, ApiError> {
    Ok(Html(state.generator.preview()?))
}
