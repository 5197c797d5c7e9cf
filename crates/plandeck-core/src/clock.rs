//! Time and file-stat sources, injectable for tests.

use std::{
    fmt::Debug,
    fs,
    path::Path,
    sync::{Mutex, PoisonError},
};

use jiff::{SignedDuration, Timestamp};
use serde::{Deserialize, Serialize};

/// Source of the current time.
pub trait Clock: Send + Sync + Debug {
    fn now(&self) -> Timestamp;
}

/// The system wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct FixedClock {
    now: Mutex<Timestamp>,
}

impl FixedClock {
    pub fn new(start: Timestamp) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    /// Move the clock forward (or backward for a negative duration).
    pub fn advance(&self, by: SignedDuration) {
        let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        *now = now.checked_add(by).unwrap_or(*now);
    }

    pub fn set(&self, to: Timestamp) {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner) = to;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> Timestamp {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// The `(modification time, size)` pair of a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fingerprint {
    pub mtime_millis: i64,
    pub size_bytes: u64,
}

/// Reads file fingerprints.
pub trait FileStatSource: Send + Sync + Debug {
    fn fingerprint(&self, path: &Path) -> std::io::Result<Fingerprint>;
}

/// Fingerprints from the real file system.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsStat;

impl FileStatSource for FsStat {
    fn fingerprint(&self, path: &Path) -> std::io::Result<Fingerprint> {
        let metadata = fs::metadata(path)?;
        let modified = Timestamp::try_from(metadata.modified()?)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        Ok(Fingerprint {
            mtime_millis: modified.as_millisecond(),
            size_bytes: metadata.len(),
        })
    }
}
