//! Lost-update detection based on file fingerprints.
//!
//! The detector remembers the fingerprint of every file at the moment its
//! content was handed to a caller. A later write is rejected when the file on
//! disk no longer matches that fingerprint. This is advisory optimistic
//! concurrency, not a lock: a race between the check and the write is
//! accepted.

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::{
    clock::{FileStatSource, Fingerprint, FsStat},
    error::{PlanError, Result},
};

/// Outcome of a conflict check.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictCheck {
    pub has_conflict: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_known_mtime: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_mtime: Option<i64>,
}

impl ConflictCheck {
    fn clear() -> Self {
        Self::default()
    }
}

#[derive(Debug, Clone)]
struct CachedState {
    directory: PathBuf,
    fingerprint: Fingerprint,
}

/// Per-filename fingerprint cache.
///
/// Cheap to share: the repository holds one behind an [`Arc`]. Clearing the
/// cache only ever turns conflicts into non-conflicts.
#[derive(Debug)]
pub struct ConflictDetector {
    cache: Mutex<HashMap<String, CachedState>>,
    stat: Arc<dyn FileStatSource>,
}

impl Default for ConflictDetector {
    fn default() -> Self {
        Self::new(Arc::new(FsStat))
    }
}

impl ConflictDetector {
    pub fn new(stat: Arc<dyn FileStatSource>) -> Self {
        Self {
            cache: Mutex::new(HashMap::new()),
            stat,
        }
    }

    fn cache(&self) -> MutexGuard<'_, HashMap<String, CachedState>> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Stat `filename` in `directory` with the configured source.
    pub fn fingerprint(&self, directory: &Path, filename: &str) -> std::io::Result<Fingerprint> {
        self.stat.fingerprint(&directory.join(filename))
    }

    /// Overwrite the cached fingerprint for `filename`.
    pub fn record_file_state(&self, directory: &Path, filename: &str, fingerprint: Fingerprint) {
        debug!(
            "Recording fingerprint for '{filename}': mtime={} size={}",
            fingerprint.mtime_millis, fingerprint.size_bytes
        );
        self.cache().insert(
            filename.to_string(),
            CachedState {
                directory: directory.to_path_buf(),
                fingerprint,
            },
        );
    }

    /// Stat the file now and record the result; stat failures are ignored.
    pub fn observe(&self, directory: &Path, filename: &str) {
        match self.fingerprint(directory, filename) {
            Ok(fingerprint) => self.record_file_state(directory, filename, fingerprint),
            Err(e) => warn!("Could not fingerprint '{filename}': {e}"),
        }
    }

    /// Compare the file on disk against the fingerprint from the last read.
    ///
    /// No cached fingerprint, a fingerprint from another directory, or a file
    /// that cannot be stat-ed all count as "no conflict".
    pub fn check_conflict(&self, directory: &Path, filename: &str) -> ConflictCheck {
        let Some(cached) = self.cache().get(filename).cloned() else {
            return ConflictCheck::clear();
        };
        if cached.directory != directory {
            return ConflictCheck::clear();
        }

        let Ok(current) = self.fingerprint(directory, filename) else {
            return ConflictCheck::clear();
        };

        if current == cached.fingerprint {
            ConflictCheck::clear()
        } else {
            ConflictCheck {
                has_conflict: true,
                last_known_mtime: Some(cached.fingerprint.mtime_millis),
                current_mtime: Some(current.mtime_millis),
            }
        }
    }

    /// [`Self::check_conflict`] as a [`PlanError::Conflict`].
    pub fn ensure_unchanged(&self, directory: &Path, filename: &str) -> Result<()> {
        let check = self.check_conflict(directory, filename);
        if !check.has_conflict {
            return Ok(());
        }
        warn!("Rejecting write to '{filename}': modified externally");
        Err(PlanError::Conflict {
            filename: filename.to_string(),
            last_known_mtime: check.last_known_mtime.unwrap_or_default(),
            current_mtime: check.current_mtime.unwrap_or_default(),
        })
    }

    /// Drop the fingerprint for one file.
    pub fn forget(&self, filename: &str) {
        self.cache().remove(filename);
    }

    /// Drop every fingerprint.
    pub fn clear(&self) {
        self.cache().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Stat source returning whatever the test last stored.
    #[derive(Debug, Default)]
    struct ScriptedStat {
        current: Mutex<HashMap<PathBuf, Fingerprint>>,
    }

    impl ScriptedStat {
        fn set(&self, path: PathBuf, mtime_millis: i64, size_bytes: u64) {
            self.current.lock().expect("lock").insert(
                path,
                Fingerprint {
                    mtime_millis,
                    size_bytes,
                },
            );
        }
    }

    impl FileStatSource for ScriptedStat {
        fn fingerprint(&self, path: &Path) -> std::io::Result<Fingerprint> {
            self.current
                .lock()
                .expect("lock")
                .get(path)
                .copied()
                .ok_or_else(|| std::io::Error::from(std::io::ErrorKind::NotFound))
        }
    }

    fn setup() -> (Arc<ScriptedStat>, ConflictDetector) {
        let stat = Arc::new(ScriptedStat::default());
        let detector = ConflictDetector::new(stat.clone());
        (stat, detector)
    }

    #[test]
    fn test_unread_file_never_conflicts() {
        let (stat, detector) = setup();
        stat.set(PathBuf::from("/plans/a.md"), 10, 5);
        assert!(!detector.check_conflict(Path::new("/plans"), "a.md").has_conflict);
    }

    #[test]
    fn test_recorded_state_matches_until_external_change() {
        let (stat, detector) = setup();
        let dir = Path::new("/plans");
        stat.set(dir.join("a.md"), 10, 5);
        detector.observe(dir, "a.md");
        assert!(!detector.check_conflict(dir, "a.md").has_conflict);

        stat.set(dir.join("a.md"), 20, 5);
        let check = detector.check_conflict(dir, "a.md");
        assert!(check.has_conflict);
        assert_eq!(check.last_known_mtime, Some(10));
        assert_eq!(check.current_mtime, Some(20));

        let err = detector.ensure_unchanged(dir, "a.md").unwrap_err();
        assert!(err.is_conflict());
    }

    #[test]
    fn test_size_change_alone_conflicts() {
        let (stat, detector) = setup();
        let dir = Path::new("/plans");
        stat.set(dir.join("a.md"), 10, 5);
        detector.observe(dir, "a.md");
        stat.set(dir.join("a.md"), 10, 6);
        assert!(detector.check_conflict(dir, "a.md").has_conflict);
    }

    #[test]
    fn test_other_directory_is_fresh_read() {
        let (stat, detector) = setup();
        stat.set(PathBuf::from("/plans/a.md"), 10, 5);
        stat.set(PathBuf::from("/archive/a.md"), 99, 1);
        detector.observe(Path::new("/plans"), "a.md");
        assert!(!detector.check_conflict(Path::new("/archive"), "a.md").has_conflict);
    }

    #[test]
    fn test_missing_file_and_cleared_cache_do_not_conflict() {
        let (stat, detector) = setup();
        let dir = Path::new("/plans");
        stat.set(dir.join("a.md"), 10, 5);
        stat.set(dir.join("b.md"), 10, 5);
        detector.observe(dir, "a.md");
        detector.observe(dir, "b.md");

        stat.current.lock().expect("lock").remove(&dir.join("a.md"));
        assert!(!detector.check_conflict(dir, "a.md").has_conflict);

        stat.set(dir.join("b.md"), 11, 5);
        detector.clear();
        assert!(!detector.check_conflict(dir, "b.md").has_conflict);
    }
}
