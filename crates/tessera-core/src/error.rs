//! Error types shared by the Tessera crates.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while editing, storing or publishing tiles.
#[derive(Error, Debug)]
pub enum Error {
    /// User input failed validation. Nothing was written.
    #[error("validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    /// The requested record does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Writing, renaming or backing up a file failed.
    #[error("persistence error at {}: {source}", path.display())]
    Persistence {
        /// The file the operation was acting on.
        path: PathBuf,
        /// The underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// A stored document could not be parsed or serialized.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A single tile failed to render.
    #[error("failed to render tile {tile_id} ({tile_type}): {reason}")]
    Render {
        /// Id of the tile that failed.
        tile_id: String,
        /// Type key of the tile that failed.
        tile_type: String,
        /// Description of what's wrong.
        reason: String,
    },
}

impl Error {
    /// Build a validation error from a single message.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Validation(vec![message.into()])
    }

    /// Build a persistence error for `path`.
    pub fn persistence(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Persistence {
            path: path.into(),
            source,
        }
    }

    /// The validation messages, if this is a validation error.
    pub fn messages(&self) -> Option<&[String]> {
        match self {
            Self::Validation(messages) => Some(messages),
            _ => None,
        }
    }
}
