//! Core types, validation, and storage for Tessera.
//!
//! This crate provides:
//! - The tile and settings data model
//! - The `TileType` contract, its field schema, and the `TileRegistry`
//! - Visibility rules shared by generation and the published runtime
//! - Escaping and input-format helpers used by every renderer
//! - JSON document storage with atomic writes and rolling backups
//! - Serialized tile and settings stores
//! - Prometheus metrics helpers
//! - Shared error types

mod error;
pub mod escape;
pub mod metrics;
pub mod registry;
pub mod settings;
pub mod storage;
pub mod store;
pub mod tile;
pub mod tile_type;
pub mod visibility;

pub use error::{Error, Result};
pub use registry::{TileRegistry, TileTypeInfo};
pub use settings::{Settings, SettingsUpdate, Theme};
pub use storage::{BackupPolicy, JsonDocument, backup_file, write_atomic};
pub use store::{SettingsStore, TileCollection, TileStore};
pub use tile::{
    ColorScheme, PositionUpdate, Tile, TileData, TileDraft, TileSize, TileStyle,
    VisibilitySchedule,
};
pub use tile_type::{FieldKind, FieldSpec, SelectOption, TileType};
pub use visibility::{VisibilityReason, VisibilityStatus, effective_status, is_publishable};
