//! Append-only version history for plan files.
//!
//! Snapshots live under `<root>/<filename>/<version-id>.json`, one JSON record
//! per snapshot. They are written atomically and never edited or removed by
//! this crate.

mod diff;
mod version_id;

use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use log::{debug, warn};

pub use diff::compute_diff;
pub use version_id::VersionId;

use crate::{
    clock::Clock,
    error::{FileSystemResultExt, PlanError, Result},
    models::{VersionInfo, VersionSnapshot},
    store::files::{atomic_write, ensure_dir, write_new},
};

const SNAPSHOT_EXTENSION: &str = "json";

/// Durable snapshot storage.
#[derive(Debug, Clone)]
pub struct VersionStore {
    root: PathBuf,
    clock: Arc<dyn Clock>,
}

impl VersionStore {
    pub fn new(root: impl Into<PathBuf>, clock: Arc<dyn Clock>) -> Self {
        Self {
            root: root.into(),
            clock,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn plan_dir(&self, filename: &str) -> PathBuf {
        self.root.join(filename)
    }

    fn snapshot_path(&self, filename: &str, id: VersionId) -> PathBuf {
        self.plan_dir(filename)
            .join(format!("{id}.{SNAPSHOT_EXTENSION}"))
    }

    /// All version ids recorded for `filename`, oldest first.
    fn ids(&self, filename: &str) -> Result<Vec<VersionId>> {
        let dir = self.plan_dir(filename);
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(PlanError::file_system(&dir, e)),
        };

        let mut ids = Vec::new();
        for entry in entries {
            let entry = entry.fs_context(&dir)?;
            let name = entry.file_name();
            let Some(stem) = name
                .to_str()
                .and_then(|n| n.strip_suffix(SNAPSHOT_EXTENSION))
                .and_then(|n| n.strip_suffix('.'))
            else {
                continue;
            };
            match stem.parse::<VersionId>() {
                Ok(id) => ids.push(id),
                Err(_) => debug!("Skipping unrecognised history entry {name:?}"),
            }
        }
        ids.sort();
        Ok(ids)
    }

    /// Snapshot `content`, the text about to be replaced, under a fresh id.
    ///
    /// Ids are claimed with a no-replace write, so concurrent saves never
    /// overwrite each other: a loser moves on to the next sequence number.
    pub fn save_version(
        &self,
        filename: &str,
        content: &str,
        summary: &str,
    ) -> Result<VersionSnapshot> {
        ensure_dir(&self.plan_dir(filename))?;

        let now = self.clock.now();
        let mut latest = self.ids(filename)?.last().copied();
        loop {
            let id = VersionId::next_after(latest, now).ok_or_else(|| {
                PlanError::Configuration {
                    message: format!("Too many snapshots of '{filename}' share one timestamp"),
                }
            })?;

            let snapshot = VersionSnapshot {
                version: id.to_string(),
                filename: filename.to_string(),
                content: content.to_string(),
                size_bytes: content.len() as u64,
                created_at: now,
                summary: summary.to_string(),
            };
            let record = serde_json::to_vec_pretty(&snapshot)?;
            if write_new(&self.snapshot_path(filename, id), &record)? {
                debug!("Saved version {} of '{filename}'", snapshot.version);
                return Ok(snapshot);
            }

            debug!("Version id {id} of '{filename}' already taken, retrying");
            latest = Some(id);
        }
    }

    /// Snapshot metadata, newest first. Unreadable records are skipped.
    pub fn list_versions(&self, filename: &str) -> Result<Vec<VersionInfo>> {
        let mut versions = Vec::new();
        for id in self.ids(filename)?.into_iter().rev() {
            match self.read_snapshot(filename, id) {
                Ok(snapshot) => versions.push(VersionInfo::from(&snapshot)),
                Err(e) => warn!("Skipping unreadable version {id} of '{filename}': {e}"),
            }
        }
        Ok(versions)
    }

    /// Whether any snapshot directory exists for `filename`.
    pub fn has_history(&self, filename: &str) -> bool {
        self.plan_dir(filename).exists()
    }

    /// The full snapshot record for `version`.
    pub fn get_snapshot(&self, filename: &str, version: &str) -> Result<VersionSnapshot> {
        let not_found = || PlanError::VersionNotFound {
            filename: filename.to_string(),
            version: version.to_string(),
        };
        let id = version.parse::<VersionId>().map_err(|_| not_found())?;
        match self.read_snapshot(filename, id) {
            Err(PlanError::FileSystem { source, .. })
                if source.kind() == std::io::ErrorKind::NotFound =>
            {
                Err(not_found())
            }
            other => other,
        }
    }

    /// Exact historical content of `version`.
    pub fn get_version(&self, filename: &str, version: &str) -> Result<String> {
        self.get_snapshot(filename, version).map(|s| s.content)
    }

    fn read_snapshot(&self, filename: &str, id: VersionId) -> Result<VersionSnapshot> {
        let path = self.snapshot_path(filename, id);
        let bytes = fs::read(&path).fs_context(&path)?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Move a plan's history along with a rename. Existing target history is
    /// left alone and reported as an error.
    pub fn rename_history(&self, from: &str, to: &str) -> Result<()> {
        let source = self.plan_dir(from);
        if !source.exists() {
            return Ok(());
        }
        let target = self.plan_dir(to);
        if target.exists() {
            return Err(PlanError::HistoryExists {
                filename: to.to_string(),
            });
        }
        fs::rename(&source, &target).fs_context(&source)?;

        // Records carry their filename; keep them consistent with the new name.
        for id in self.ids(to)? {
            let mut snapshot = self.read_snapshot(to, id)?;
            snapshot.filename = to.to_string();
            let record = serde_json::to_vec_pretty(&snapshot)?;
            atomic_write(&self.snapshot_path(to, id), &record)?;
        }
        Ok(())
    }
}
