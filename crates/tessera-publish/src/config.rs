//! Publishing configuration loaded from environment variables.

use std::path::PathBuf;

use anyhow::Context;
use tessera_core::BackupPolicy;
use tessera_core::storage::DEFAULT_MAX_BACKUPS;

/// Where tiles are read from and where the page is written.
#[derive(Debug, Clone)]
pub struct PublishConfig {
    /// Directory holding `tiles.json` and `settings.json`.
    pub data_dir: PathBuf,

    /// Location of the published document.
    pub output_path: PathBuf,

    /// Directory receiving backups of data files and the published page.
    pub backup_dir: PathBuf,

    /// Backups retained per logical document.
    pub max_backups: usize,
}

impl PublishConfig {
    /// Load configuration from environment variables.
    ///
    /// Optional:
    /// - `TESSERA_DATA_DIR`: Data directory (default: "./data")
    /// - `TESSERA_OUTPUT_PATH`: Published page (default: "./public/index.html")
    /// - `TESSERA_BACKUP_DIR`: Backup directory (default: "<data dir>/backups")
    /// - `TESSERA_MAX_BACKUPS`: Backups kept per document, at least 1 (default: 10)
    pub fn from_env() -> anyhow::Result<Self> {
        let data_dir = PathBuf::from(
            std::env::var("TESSERA_DATA_DIR").unwrap_or_else(|_| "./data".to_string()),
        );

        let output_path = PathBuf::from(
            std::env::var("TESSERA_OUTPUT_PATH")
                .unwrap_or_else(|_| "./public/index.html".to_string()),
        );

        let backup_dir = std::env::var("TESSERA_BACKUP_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| data_dir.join("backups"));

        let max_backups = match std::env::var("TESSERA_MAX_BACKUPS") {
            Ok(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("TESSERA_MAX_BACKUPS must be a number, got {raw:?}"))?,
            Err(_) => DEFAULT_MAX_BACKUPS,
        };
        if max_backups == 0 {
            anyhow::bail!("TESSERA_MAX_BACKUPS must be at least 1");
        }

        tracing::info!(
            data_dir = %data_dir.display(),
            output_path = %output_path.display(),
            backup_dir = %backup_dir.display(),
            max_backups,
            "publish configuration loaded"
        );

        Ok(Self {
            data_dir,
            output_path,
            backup_dir,
            max_backups,
        })
    }

    /// Configuration rooted at `data_dir`, with defaults for the rest.
    pub fn with_data_dir(data_dir: impl Into<PathBuf>, output_path: impl Into<PathBuf>) -> Self {
        let data_dir = data_dir.into();
        Self {
            backup_dir: data_dir.join("backups"),
            data_dir,
            output_path: output_path.into(),
            max_backups: DEFAULT_MAX_BACKUPS,
        }
    }

    /// Backup policy shared by every document.
    pub fn backup_policy(&self) -> BackupPolicy {
        BackupPolicy {
            dir: self.backup_dir.clone(),
            keep: self.max_backups,
        }
    }
}
