//! Tile CRUD and ordering endpoints.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use chrono::Utc;
use serde::Serialize;
use tessera_core::{PositionUpdate, Tile, TileDraft, VisibilityStatus, effective_status};

use super::{Success, success};
use crate::error::ApiError;
use crate::state::AppState;

/// A tile as the editor sees it, with its visibility right now.
#[derive(Debug, Clone, Serialize)]
pub struct TileView {
    #[serde(flatten)]
    tile: Tile,
    visibility: VisibilityStatus,
}

impl From<Tile> for TileView {
    fn from(tile: Tile) -> Self {
        let visibility = effective_status(&tile, Utc::now());
        Self { tile, visibility }
    }
}

fn views(tiles: Vec<Tile>) -> Vec<TileView> {
    tiles.into_iter().map(TileView::from).collect()
}

/// Id of a deleted tile.
#[derive(Debug, Clone, Serialize)]
pub struct Deleted {
    id: String,
}

/// `GET /api/v1/tiles`
///
/// All tiles, hidden and scheduled ones included, ordered by position.
/// Each carries its current visibility status for the editor.
pub async fn list_tiles(
    State(state): State<AppState>,
) -> Result<Json<Success<Vec<TileView>>>, ApiError> {
    Ok(success(views(state.tiles().list()?)))
}

/// `GET /api/v1/tiles/{id}`
pub async fn get_tile(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Success<TileView>>, ApiError> {
    Ok(success(state.tiles().get(&id)?.into()))
}

/// `POST /api/v1/tiles`
///
/// Creates a tile when the body has no `id`, otherwise updates that tile.
pub async fn save_tile(
    State(state): State<AppState>,
    payload: Result<Json<TileDraft>, JsonRejection>,
) -> Result<(StatusCode, Json<Success<TileView>>), ApiError> {
    let Json(draft) = payload?;
    let status = if draft.id.is_some() {
        StatusCode::OK
    } else {
        StatusCode::CREATED
    };
    let tile = state.tiles().save(draft)?;
    Ok((status, success(tile.into())))
}

/// `PUT /api/v1/tiles/{id}`
///
/// The id in the path wins over any id in the body.
pub async fn update_tile(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<TileDraft>, JsonRejection>,
) -> Result<Json<Success<TileView>>, ApiError> {
    let Json(mut draft) = payload?;
    draft.id = Some(id);
    Ok(success(state.tiles().save(draft)?.into()))
}

/// `DELETE /api/v1/tiles/{id}`
pub async fn delete_tile(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Success<Deleted>>, ApiError> {
    state.tiles().delete(&id)?;
    Ok(success(Deleted { id }))
}

/// `POST /api/v1/tiles/positions`
///
/// Body: `[{"id": "...", "position": 10}, ...]`. Applied all-or-nothing;
/// responds with the reordered tile list.
pub async fn update_positions(
    State(state): State<AppState>,
    payload: Result<Json<Vec<PositionUpdate>>, JsonRejection>,
) -> Result<Json<Success<Vec<TileView>>>, ApiError> {
    let Json(updates) = payload?;
    state.tiles().update_positions(&updates)?;
    Ok(success(views(state.tiles().list()?)))
}
