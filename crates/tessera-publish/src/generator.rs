//! Publishing and previewing the page.
//!
//! # Publish sequence
//!
//! 1. Compose the document from the current tiles and settings
//! 2. Back up the tile collection, the settings and the previously
//!    published document
//! 3. Atomically replace the published document
//!
//! Any failure in steps 2 or 3 fails the publish and leaves the previously
//! published document in place. Preview runs step 1 only.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use tessera_core::metrics::{self, PUBLISH_BYTES, PUBLISH_FAILURES_TOTAL, PUBLISH_TOTAL};
use tessera_core::{
    BackupPolicy, Result, SettingsStore, TileRegistry, TileStore, backup_file, write_atomic,
};
use tracing::{error, info};

use crate::config::PublishConfig;
use crate::page::{ComposedPage, compose};

/// Summary of a successful publish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishOutcome {
    /// Tiles present in the published document.
    pub tiles_published: usize,
    /// Tiles left out because they could not be rendered.
    pub tiles_skipped: usize,
    /// Size of the document in bytes.
    pub bytes: usize,
    /// Where the document was written.
    pub path: PathBuf,
    /// Backup of the document it replaced, if there was one.
    pub previous_backup: Option<PathBuf>,
}

/// Builds the page from the stores and writes it to the output path.
pub struct PageGenerator {
    tiles: Arc<TileStore>,
    settings: Arc<SettingsStore>,
    output_path: PathBuf,
    backups: BackupPolicy,
    lock: Mutex<()>,
}

impl PageGenerator {
    /// Generator over existing stores.
    pub fn new(
        tiles: Arc<TileStore>,
        settings: Arc<SettingsStore>,
        output_path: impl Into<PathBuf>,
        backups: BackupPolicy,
    ) -> Self {
        Self {
            tiles,
            settings,
            output_path: output_path.into(),
            backups,
            lock: Mutex::new(()),
        }
    }

    /// Open the stores in `config.data_dir` and build a generator over them.
    pub fn open(config: &PublishConfig, registry: Arc<TileRegistry>) -> Self {
        let backups = config.backup_policy();
        let tiles = Arc::new(TileStore::open(&config.data_dir, backups.clone(), registry));
        let settings = Arc::new(SettingsStore::open(&config.data_dir, backups.clone()));
        Self::new(tiles, settings, config.output_path.clone(), backups)
    }

    /// The tile store read by this generator.
    pub fn tiles(&self) -> &Arc<TileStore> {
        &self.tiles
    }

    /// The settings store read by this generator.
    pub fn settings(&self) -> &Arc<SettingsStore> {
        &self.settings
    }

    /// Where published documents are written.
    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Compose the page from the current stored state.
    pub fn compose(&self) -> Result<ComposedPage> {
        let settings = self.settings.get()?;
        let tiles = self.tiles.list()?;
        Ok(compose(&settings, &tiles, self.tiles.registry()))
    }

    /// The document [`generate`](Self::generate) would write, without
    /// writing anything.
    pub fn preview(&self) -> Result<String> {
        Ok(self.compose()?.html)
    }

    /// Compose, back up and atomically write the page.
    pub fn generate(&self) -> Result<PublishOutcome> {
        let _guard = self.lock.lock();

        match self.publish() {
            Ok(outcome) => {
                metrics::increment(PUBLISH_TOTAL, 1);
                metrics::set_gauge(PUBLISH_BYTES, outcome.bytes as f64);
                info!(
                    tiles_published = outcome.tiles_published,
                    tiles_skipped = outcome.tiles_skipped,
                    bytes = outcome.bytes,
                    path = %outcome.path.display(),
                    "page published"
                );
                Ok(outcome)
            }
            Err(e) => {
                metrics::increment(PUBLISH_FAILURES_TOTAL, 1);
                error!(path = %self.output_path.display(), error = %e, "publish failed");
                Err(e)
            }
        }
    }

    fn publish(&self) -> Result<PublishOutcome> {
        let page = self.compose()?;

        self.tiles.backup()?;
        self.settings.backup()?;
        let previous_backup = backup_file(&self.output_path, &self.backups)?;

        write_atomic(&self.output_path, page.html.as_bytes())?;

        Ok(PublishOutcome {
            tiles_published: page.tiles_rendered,
            tiles_skipped: page.skipped.len(),
            bytes: page.html.len(),
            path: self.output_path.clone(),
            previous_backup,
        })
    }
}
