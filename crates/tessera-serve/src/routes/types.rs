//! Tile type catalogue.

use std::collections::BTreeMap;

use axum::Json;
use axum::extract::State;
use tessera_core::TileTypeInfo;

use super::{Success, success};
use crate::state::AppState;

/// `GET /api/v1/tile-types`
///
/// Every registered type keyed by type key, with its display name,
/// description and field schema.
pub async fn list_tile_types(
    State(state): State<AppState>,
) -> Json<Success<BTreeMap<&'static str, TileTypeInfo>>> {
    success(state.registry().describe())
}
