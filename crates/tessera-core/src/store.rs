//! Tile and settings stores.
//!
//! Every mutation is one read-modify-write cycle over the whole JSON
//! document, serialized by a per-document lock. This prevents lost updates
//! between requests in one process; coordinating several processes or
//! editors is out of scope.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::metrics;
use crate::registry::TileRegistry;
use crate::settings::{Settings, SettingsUpdate};
use crate::storage::{BackupPolicy, JsonDocument};
use crate::tile::{PositionUpdate, Tile, TileDraft, coerce_color_scheme};

/// File name of the tile collection inside the data directory.
pub const TILES_FILE: &str = "tiles.json";

/// File name of the settings record inside the data directory.
pub const SETTINGS_FILE: &str = "settings.json";

/// Gap left between positions assigned to new tiles.
pub const POSITION_STEP: i64 = 10;

/// On-disk shape of the tile collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TileCollection {
    /// Tiles in stored order.
    #[serde(default)]
    pub tiles: Vec<Tile>,
}

/// Sort tiles by position, keeping stored order for equal positions.
pub fn sort_by_position(tiles: &mut [Tile]) {
    tiles.sort_by_key(|t| t.position);
}

/// Owner of the tile collection.
pub struct TileStore {
    document: JsonDocument<TileCollection>,
    registry: Arc<TileRegistry>,
    lock: Mutex<()>,
}

impl TileStore {
    /// Store backed by `document`, validating against `registry`.
    pub fn new(document: JsonDocument<TileCollection>, registry: Arc<TileRegistry>) -> Self {
        Self {
            document,
            registry,
            lock: Mutex::new(()),
        }
    }

    /// Store at `<data_dir>/tiles.json`.
    pub fn open(data_dir: &Path, backups: BackupPolicy, registry: Arc<TileRegistry>) -> Self {
        Self::new(
            JsonDocument::new(data_dir.join(TILES_FILE), backups),
            registry,
        )
    }

    /// Registry used for validation.
    pub fn registry(&self) -> &Arc<TileRegistry> {
        &self.registry
    }

    /// All tiles, ascending by position.
    pub fn list(&self) -> Result<Vec<Tile>> {
        let _guard = self.lock.lock();
        let mut tiles = self.document.read()?.tiles;
        sort_by_position(&mut tiles);
        Ok(tiles)
    }

    /// Fetch one tile.
    pub fn get(&self, id: &str) -> Result<Tile> {
        let _guard = self.lock.lock();
        self.document
            .read()?
            .tiles
            .into_iter()
            .find(|t| t.id == id)
            .ok_or_else(|| Error::NotFound(format!("tile {id}")))
    }

    /// Create or update a tile.
    ///
    /// Without an id a new tile is created. With an id the type must match
    /// the stored tile; `created` is preserved. `data`, `visible` and the
    /// schedule are replaced as submitted, while omitted layout fields keep
    /// their previous values. Nothing is written unless validation passes.
    pub fn save(&self, draft: TileDraft) -> Result<Tile> {
        let _guard = self.lock.lock();
        let mut collection = self.document.read()?;

        let existing_index = match draft.id.as_deref() {
            Some(id) => Some(
                collection
                    .tiles
                    .iter()
                    .position(|t| t.id == id)
                    .ok_or_else(|| Error::NotFound(format!("tile {id}")))?,
            ),
            None => None,
        };
        let existing = existing_index.map(|i| &collection.tiles[i]);

        if let Some(existing) = existing
            && existing.tile_type != draft.tile_type
        {
            metrics::increment(metrics::TILE_VALIDATION_FAILURES_TOTAL, 1);
            return Err(Error::invalid(format!(
                "Tile type cannot be changed (is '{}')",
                existing.tile_type
            )));
        }

        if let Err(e) = self.registry.validate(&draft.tile_type, &draft.data) {
            metrics::increment(metrics::TILE_VALIDATION_FAILURES_TOTAL, 1);
            debug!(tile_type = %draft.tile_type, error = %e, "tile rejected");
            return Err(e);
        }

        let now = Utc::now();
        let next_position = collection
            .tiles
            .iter()
            .map(|t| t.position)
            .max()
            .map_or(POSITION_STEP, |max| max.saturating_add(POSITION_STEP));

        let size = draft
            .size
            .or(existing.map(|t| t.size))
            .unwrap_or_default();
        let style = draft
            .style
            .or(existing.map(|t| t.style))
            .unwrap_or_default();
        let color_scheme = draft
            .color_scheme
            .or(existing.map(|t| t.color_scheme))
            .unwrap_or_default();

        let tile = Tile {
            id: match existing {
                Some(t) => t.id.clone(),
                None => new_tile_id(&collection.tiles),
            },
            tile_type: draft.tile_type,
            position: draft
                .position
                .or(existing.map(|t| t.position))
                .unwrap_or(next_position),
            size,
            style,
            color_scheme: coerce_color_scheme(style, color_scheme),
            data: draft.data,
            visible: draft.visible,
            visibility_schedule: draft.visibility_schedule.filter(|s| !s.is_empty()),
            created: existing.map_or(now, |t| t.created),
            updated: now,
        };

        match existing_index {
            Some(index) => collection.tiles[index] = tile.clone(),
            None => collection.tiles.push(tile.clone()),
        }

        self.document.write(&collection)?;

        metrics::increment(metrics::TILE_SAVES_TOTAL, 1);
        metrics::set_gauge(metrics::TILES_STORED, collection.tiles.len() as f64);
        info!(
            tile_id = %tile.id,
            tile_type = %tile.tile_type,
            created = existing_index.is_none(),
            "tile saved"
        );

        Ok(tile)
    }

    /// Remove a tile.
    pub fn delete(&self, id: &str) -> Result<()> {
        let _guard = self.lock.lock();
        let mut collection = self.document.read()?;

        let before = collection.tiles.len();
        collection.tiles.retain(|t| t.id != id);
        if collection.tiles.len() == before {
            return Err(Error::NotFound(format!("tile {id}")));
        }

        self.document.write(&collection)?;
        metrics::set_gauge(metrics::TILES_STORED, collection.tiles.len() as f64);
        info!(tile_id = %id, "tile deleted");
        Ok(())
    }

    /// Reposition tiles without touching any other field.
    ///
    /// All ids must exist; otherwise nothing is written. The stored
    /// collection is re-sorted by position.
    pub fn update_positions(&self, updates: &[PositionUpdate]) -> Result<()> {
        let _guard = self.lock.lock();
        let mut collection = self.document.read()?;

        for update in updates {
            let tile = collection
                .tiles
                .iter_mut()
                .find(|t| t.id == update.id)
                .ok_or_else(|| Error::NotFound(format!("tile {}", update.id)))?;
            tile.position = update.position;
        }

        sort_by_position(&mut collection.tiles);
        self.document.write(&collection)?;
        info!(count = updates.len(), "tile positions updated");
        Ok(())
    }

    /// Snapshot the tile collection.
    pub fn backup(&self) -> Result<Option<PathBuf>> {
        let _guard = self.lock.lock();
        self.document.backup()
    }
}

fn new_tile_id(existing: &[Tile]) -> String {
    loop {
        let id = format!("tile_{}", uuid::Uuid::new_v4().simple());
        if !existing.iter().any(|t| t.id == id) {
            return id;
        }
    }
}

/// Owner of the settings record.
pub struct SettingsStore {
    document: JsonDocument<Settings>,
    lock: Mutex<()>,
}

impl SettingsStore {
    /// Store backed by `document`.
    pub fn new(document: JsonDocument<Settings>) -> Self {
        Self {
            document,
            lock: Mutex::new(()),
        }
    }

    /// Store at `<data_dir>/settings.json`.
    pub fn open(data_dir: &Path, backups: BackupPolicy) -> Self {
        Self::new(JsonDocument::new(data_dir.join(SETTINGS_FILE), backups))
    }

    /// Current settings (defaults if never saved).
    pub fn get(&self) -> Result<Settings> {
        let _guard = self.lock.lock();
        self.document.read()
    }

    /// Apply an allow-listed update and persist it.
    pub fn save(&self, update: SettingsUpdate) -> Result<Settings> {
        let _guard = self.lock.lock();
        let next = self.document.read()?.apply(update)?;
        self.document.write(&next)?;
        info!("settings saved");
        Ok(next)
    }

    /// Snapshot the settings record.
    pub fn backup(&self) -> Result<Option<PathBuf>> {
        let _guard = self.lock.lock();
        self.document.backup()
    }
}
