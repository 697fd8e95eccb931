//! File persistence with atomic replacement and rolling backups.
//!
//! # Write protocol
//!
//! 1. Serialize into `<name>.tmp` next to the target
//! 2. Flush and fsync the temporary file
//! 3. Rename it over the target
//!
//! A failure at any step leaves the previous file untouched. Errors are
//! surfaced immediately and never retried, so a corrupt write cannot be
//! papered over.

use std::fs::{self, File};
use std::io::Write;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};

/// Default number of backups kept per document.
pub const DEFAULT_MAX_BACKUPS: usize = 10;

/// Where and how many backups are kept.
#[derive(Debug, Clone)]
pub struct BackupPolicy {
    /// Directory holding backup copies.
    pub dir: PathBuf,
    /// Number of newest backups retained per document.
    pub keep: usize,
}

impl BackupPolicy {
    /// Keep [`DEFAULT_MAX_BACKUPS`] copies in `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            keep: DEFAULT_MAX_BACKUPS,
        }
    }
}

/// Replace `path` with `bytes` atomically.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| Error::persistence(parent, e))?;
    }

    let tmp_path = tmp_path_for(path);
    let result = (|| {
        let mut file = File::create(&tmp_path)?;
        file.write_all(bytes)?;
        file.flush()?;
        file.sync_all()
    })();

    if let Err(e) = result {
        if let Err(cleanup) = fs::remove_file(&tmp_path) {
            debug!(path = %tmp_path.display(), error = %cleanup, "failed to remove temp file");
        }
        return Err(Error::persistence(&tmp_path, e));
    }

    fs::rename(&tmp_path, path).map_err(|e| {
        if let Err(cleanup) = fs::remove_file(&tmp_path) {
            debug!(path = %tmp_path.display(), error = %cleanup, "failed to remove temp file");
        }
        Error::persistence(path, e)
    })?;

    debug!(path = %path.display(), bytes = bytes.len(), "wrote file atomically");
    Ok(())
}

/// Copy `path` into the backup directory, then prune old copies.
///
/// Returns `Ok(None)` when there is nothing to back up yet.
pub fn backup_file(path: &Path, policy: &BackupPolicy) -> Result<Option<PathBuf>> {
    if !path.exists() {
        return Ok(None);
    }

    fs::create_dir_all(&policy.dir).map_err(|e| Error::persistence(&policy.dir, e))?;

    let (stem, ext) = backup_name_parts(path);
    let stamp = Utc::now().format("%Y%m%d-%H%M%S-%3f");
    let mut backup_path = policy.dir.join(format!("{stem}-{stamp}.{ext}"));
    let mut counter = 1;
    while backup_path.exists() {
        backup_path = policy.dir.join(format!("{stem}-{stamp}-{counter}.{ext}"));
        counter += 1;
    }

    fs::copy(path, &backup_path).map_err(|e| Error::persistence(&backup_path, e))?;
    info!(source = %path.display(), backup = %backup_path.display(), "created backup");

    prune_backups(path, policy);
    Ok(Some(backup_path))
}

/// Backups of `path`, oldest first.
pub fn list_backups(path: &Path, policy: &BackupPolicy) -> Vec<PathBuf> {
    let (stem, ext) = backup_name_parts(path);
    let prefix = format!("{stem}-");
    let suffix = format!(".{ext}");

    let Ok(entries) = fs::read_dir(&policy.dir) else {
        return Vec::new();
    };

    let mut backups: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with(&prefix) && n.ends_with(&suffix) && is_stamped(n, &prefix))
        })
        .collect();
    // Timestamps are zero-padded, so lexical order of the stems is
    // chronological, with same-millisecond `-N` copies after their base.
    backups.sort_by(|a, b| a.file_stem().cmp(&b.file_stem()));
    backups
}

fn prune_backups(path: &Path, policy: &BackupPolicy) {
    // The backup just taken always survives.
    let keep = policy.keep.max(1);
    let backups = list_backups(path, policy);
    if backups.len() <= keep {
        return;
    }
    for old in &backups[..backups.len() - keep] {
        match fs::remove_file(old) {
            Ok(()) => debug!(path = %old.display(), "pruned old backup"),
            Err(e) => warn!(path = %old.display(), error = %e, "failed to prune backup"),
        }
    }
}

fn is_stamped(name: &str, prefix: &str) -> bool {
    name[prefix.len()..]
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_digit())
}

fn backup_name_parts(path: &Path) -> (String, String) {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string());
    let ext = path
        .extension()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "bak".to_string());
    (stem, ext)
}

fn tmp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// A JSON file holding one logical document of type `T`.
#[derive(Debug, Clone)]
pub struct JsonDocument<T> {
    path: PathBuf,
    backups: BackupPolicy,
    _marker: PhantomData<fn() -> T>,
}

impl<T> JsonDocument<T>
where
    T: Serialize + DeserializeOwned + Default,
{
    /// Document stored at `path`, backed up per `backups`.
    pub fn new(path: impl Into<PathBuf>, backups: BackupPolicy) -> Self {
        Self {
            path: path.into(),
            backups,
            _marker: PhantomData,
        }
    }

    /// Location of the document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the document; a missing file yields `T::default()`.
    pub fn read(&self) -> Result<T> {
        match fs::read(&self.path) {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(T::default()),
            Err(e) => Err(Error::persistence(&self.path, e)),
        }
    }

    /// Replace the document atomically.
    pub fn write(&self, value: &T) -> Result<()> {
        let mut bytes = serde_json::to_vec_pretty(value)?;
        bytes.push(b'\n');
        write_atomic(&self.path, &bytes)
    }

    /// Snapshot the current file into the backup directory.
    pub fn backup(&self) -> Result<Option<PathBuf>> {
        backup_file(&self.path, &self.backups)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::TempDir;

    #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
    struct Doc {
        items: Vec<String>,
    }

    fn doc(tmp: &TempDir) -> JsonDocument<Doc> {
        JsonDocument::new(
            tmp.path().join("doc.json"),
            BackupPolicy::new(tmp.path().join("backups")),
        )
    }

    #[test]
    fn missing_file_reads_default() {
        let tmp = TempDir::new().unwrap();
        assert_eq!(doc(&tmp).read().unwrap(), Doc::default());
    }

    #[test]
    fn write_then_read() {
        let tmp = TempDir::new().unwrap();
        let document = doc(&tmp);
        let value = Doc {
            items: vec!["a".into(), "b".into()],
        };
        document.write(&value).unwrap();
        assert_eq!(document.read().unwrap(), value);
        assert!(!tmp.path().join("doc.json.tmp").exists());
    }

    #[test]
    fn corrupt_file_is_json_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("doc.json"), b"{not json").unwrap();
        let err = doc(&tmp).read().unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }

    #[test]
    fn write_atomic_creates_parent_dirs() {
        let tmp = TempDir::new().unwrap();
        let target = tmp.path().join("public/site/index.html");
        write_atomic(&target, b"<html></html>").unwrap();
        assert_eq!(fs::read(&target).unwrap(), b"<html></html>");
    }

    #[test]
    fn failed_rename_keeps_previous_content() {
        let tmp = TempDir::new().unwrap();
        // A directory at the target path makes the rename fail.
        let target = tmp.path().join("index.html");
        fs::create_dir(&target).unwrap();
        fs::write(target.join("keep"), b"x").unwrap();

        let err = write_atomic(&target, b"new").unwrap_err();
        assert!(matches!(err, Error::Persistence { .. }));
        assert!(target.join("keep").exists());
        assert!(!tmp.path().join("index.html.tmp").exists());
    }

    #[test]
    fn backup_of_missing_file_is_none() {
        let tmp = TempDir::new().unwrap();
        assert_eq!(doc(&tmp).backup().unwrap(), None);
    }

    #[test]
    fn backup_copies_current_content() {
        let tmp = TempDir::new().unwrap();
        let document = doc(&tmp);
        document
            .write(&Doc {
                items: vec!["first".into()],
            })
            .unwrap();

        let backup = document.backup().unwrap().unwrap();
        assert!(backup.starts_with(tmp.path().join("backups")));
        let copied: Doc = serde_json::from_slice(&fs::read(&backup).unwrap()).unwrap();
        assert_eq!(copied.items, vec!["first"]);
    }

    #[test]
    fn backups_are_pruned_to_policy() {
        let tmp = TempDir::new().unwrap();
        let policy = BackupPolicy {
            dir: tmp.path().join("backups"),
            keep: 3,
        };
        let target = tmp.path().join("tiles.json");
        fs::write(&target, b"{}").unwrap();

        for _ in 0..6 {
            backup_file(&target, &policy).unwrap();
        }

        assert_eq!(list_backups(&target, &policy).len(), 3);
    }

    #[test]
    fn zero_keep_still_retains_latest_backup() {
        let tmp = TempDir::new().unwrap();
        let policy = BackupPolicy {
            dir: tmp.path().join("backups"),
            keep: 0,
        };
        let target = tmp.path().join("index.html");
        fs::write(&target, b"<p>v1</p>").unwrap();

        backup_file(&target, &policy).unwrap();
        let latest = backup_file(&target, &policy).unwrap().unwrap();

        assert!(latest.exists());
        assert_eq!(list_backups(&target, &policy), vec![latest]);
    }

    #[test]
    fn backups_of_other_documents_are_untouched() {
        let tmp = TempDir::new().unwrap();
        let policy = BackupPolicy {
            dir: tmp.path().join("backups"),
            keep: 1,
        };
        let tiles = tmp.path().join("tiles.json");
        let settings = tmp.path().join("settings.json");
        fs::write(&tiles, b"{}").unwrap();
        fs::write(&settings, b"{}").unwrap();

        backup_file(&settings, &policy).unwrap();
        backup_file(&tiles, &policy).unwrap();
        backup_file(&tiles, &policy).unwrap();

        assert_eq!(list_backups(&tiles, &policy).len(), 1);
        assert_eq!(list_backups(&settings, &policy).len(), 1);
    }
}
