//! Site settings endpoints.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use tessera_core::{Settings, SettingsUpdate};

use super::{Success, success};
use crate::error::ApiError;
use crate::state::AppState;

/// `GET /api/v1/settings`
pub async fn get_settings(
    State(state): State<AppState>,
) -> Result<Json<Success<Settings>>, ApiError> {
    Ok(success(state.settings().get()?))
}

/// `PUT /api/v1/settings`
///
/// Accepts a partial update. Fields outside the allow-list are ignored.
pub async fn update_settings(
    State(state): State<AppState>,
    payload: Result<Json<SettingsUpdate>, JsonRejection>,
) -> Result<Json<Success<Settings>>, ApiError> {
    let Json(update) = payload?;
    let settings = state.settings().save(update)?;
    tracing::info!(site_title = %settings.site_title, "settings updated");
    Ok(success(settings))
}
