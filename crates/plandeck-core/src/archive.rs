//! Soft-deleted plans.
//!
//! Archiving moves a plan file into the archive directory and records an
//! entry in `<archive>/.meta.json`. Entries expire after the retention
//! period; expired plans are removed by an explicit cleanup, never on read.

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
    sync::{Mutex, MutexGuard, PoisonError},
};

use jiff::{SignedDuration, Timestamp};
use log::warn;
use serde::{Deserialize, Serialize};

use crate::{
    error::{PlanError, Result},
    store::files::atomic_write,
};

/// Archive directory name inside the plans directory.
pub const ARCHIVE_DIR: &str = "archive";

/// Index of archived plans, kept inside the archive directory.
pub const META_FILENAME: &str = ".meta.json";

/// Days an archived plan is kept before cleanup removes it.
pub const DEFAULT_RETENTION_DAYS: i64 = 30;

/// Upper bound on the configurable retention, about a century.
const MAX_RETENTION_DAYS: i64 = 36_500;

/// One archived plan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ArchivedPlan {
    pub filename: String,
    /// Where the plan lived before it was archived
    pub original_path: PathBuf,
    pub archived_at: Timestamp,
    pub expires_at: Timestamp,
    pub title: String,
    pub preview: String,
}

impl ArchivedPlan {
    pub fn is_expired(&self, now: Timestamp) -> bool {
        self.expires_at <= now
    }
}

type ArchiveIndex = BTreeMap<String, ArchivedPlan>;

/// Archive directory plus its metadata index.
#[derive(Debug)]
pub struct ArchiveStore {
    dir: PathBuf,
    retention: SignedDuration,
    // Serialises read-modify-write cycles on the index.
    index_lock: Mutex<()>,
}

impl ArchiveStore {
    pub fn new(dir: impl Into<PathBuf>, retention_days: i64) -> Self {
        let days = retention_days.clamp(0, MAX_RETENTION_DAYS);
        Self {
            dir: dir.into(),
            retention: SignedDuration::from_hours(days * 24),
            index_lock: Mutex::new(()),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Location of an archived plan file.
    pub fn path(&self, filename: &str) -> PathBuf {
        self.dir.join(filename)
    }

    /// When a plan archived at `archived_at` expires.
    pub fn expiry(&self, archived_at: Timestamp) -> Result<Timestamp> {
        archived_at
            .checked_add(self.retention)
            .map_err(|e| PlanError::Configuration {
                message: format!("Archive retention out of range: {e}"),
            })
    }

    fn lock(&self) -> MutexGuard<'_, ()> {
        self.index_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn meta_path(&self) -> PathBuf {
        self.dir.join(META_FILENAME)
    }

    /// The index; missing or unreadable counts as empty.
    fn read_index(&self) -> ArchiveIndex {
        let path = self.meta_path();
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) => {
                if e.kind() != std::io::ErrorKind::NotFound {
                    warn!("Cannot read archive index {}: {e}", path.display());
                }
                return ArchiveIndex::new();
            }
        };
        serde_json::from_slice(&bytes).unwrap_or_else(|e| {
            warn!("Ignoring corrupt archive index {}: {e}", path.display());
            ArchiveIndex::new()
        })
    }

    fn write_index(&self, index: &ArchiveIndex) -> Result<()> {
        let record = serde_json::to_vec_pretty(index)?;
        atomic_write(&self.meta_path(), &record)
    }

    /// Add or replace the entry for `entry.filename`.
    pub fn record(&self, entry: ArchivedPlan) -> Result<()> {
        let _guard = self.lock();
        let mut index = self.read_index();
        index.insert(entry.filename.clone(), entry);
        self.write_index(&index)
    }

    /// Drop the entry for `filename`, returning it if there was one.
    pub fn remove_entry(&self, filename: &str) -> Result<Option<ArchivedPlan>> {
        let _guard = self.lock();
        let mut index = self.read_index();
        let removed = index.remove(filename);
        if removed.is_some() {
            self.write_index(&index)?;
        }
        Ok(removed)
    }

    /// Archived plans whose file is still present, newest first.
    pub fn list(&self) -> Vec<ArchivedPlan> {
        let _guard = self.lock();
        let mut entries: Vec<ArchivedPlan> = self
            .read_index()
            .into_values()
            .filter(|entry| self.path(&entry.filename).is_file())
            .collect();
        entries.sort_by(|a, b| b.archived_at.cmp(&a.archived_at));
        entries
    }

    /// Remove every expired entry and its file, returning their filenames.
    pub fn remove_expired(&self, now: Timestamp) -> Result<Vec<String>> {
        let _guard = self.lock();
        let mut index = self.read_index();
        let expired: Vec<String> = index
            .values()
            .filter(|entry| entry.is_expired(now))
            .map(|entry| entry.filename.clone())
            .collect();
        if expired.is_empty() {
            return Ok(expired);
        }

        for filename in &expired {
            let path = self.path(filename);
            match fs::remove_file(&path) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(PlanError::file_system(&path, e)),
            }
            index.remove(filename);
        }
        self.write_index(&index)?;
        Ok(expired)
    }
}
