//! Registration table mapping type keys to tile type implementations.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::tile::TileData;
use crate::tile_type::{FieldSpec, TileType};

/// Editor-facing description of a registered tile type.
#[derive(Debug, Clone, Serialize)]
pub struct TileTypeInfo {
    /// Display label.
    pub name: &'static str,
    /// One-line description.
    pub description: &'static str,
    /// Accepted fields with metadata.
    pub fields: &'static [FieldSpec],
}

/// Explicit registry of tile types, in registration order.
///
/// Registering a type whose key is already present replaces the previous
/// implementation in place.
#[derive(Clone, Default)]
pub struct TileRegistry {
    types: Vec<Arc<dyn TileType>>,
}

impl TileRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tile type.
    pub fn register<T>(&mut self, tile_type: T) -> &mut Self
    where
        T: TileType + 'static,
    {
        let tile_type: Arc<dyn TileType> = Arc::new(tile_type);
        match self.types.iter().position(|t| t.key() == tile_type.key()) {
            Some(index) => {
                tracing::debug!(key = tile_type.key(), "replacing registered tile type");
                self.types[index] = tile_type;
            }
            None => self.types.push(tile_type),
        }
        self
    }

    /// Builder-style [`register`](Self::register).
    pub fn with<T>(mut self, tile_type: T) -> Self
    where
        T: TileType + 'static,
    {
        self.register(tile_type);
        self
    }

    /// Resolve a type key.
    pub fn get(&self, key: &str) -> Option<&dyn TileType> {
        self.types
            .iter()
            .find(|t| t.key() == key)
            .map(|t| t.as_ref())
    }

    /// Whether `key` is registered.
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Iterate registered types in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn TileType> {
        self.types.iter().map(|t| t.as_ref())
    }

    /// Number of registered types.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Whether no types are registered.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Describe every registered type, keyed by type key.
    pub fn describe(&self) -> BTreeMap<&'static str, TileTypeInfo> {
        self.iter()
            .map(|t| {
                (
                    t.key(),
                    TileTypeInfo {
                        name: t.name(),
                        description: t.description(),
                        fields: t.fields(),
                    },
                )
            })
            .collect()
    }

    /// Validate `data` against the type registered under `key`.
    ///
    /// An unknown key is a validation error.
    pub fn validate(&self, key: &str, data: &TileData) -> Result<()> {
        let Some(tile_type) = self.get(key) else {
            return Err(Error::invalid(format!("Unknown tile type: {key}")));
        };
        let errors = tile_type.validate(data);
        if errors.is_empty() {
            Ok(())
        } else {
            Err(Error::Validation(errors))
        }
    }
}

impl std::fmt::Debug for TileRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.types.iter().map(|t| t.key()))
            .finish()
    }
}
