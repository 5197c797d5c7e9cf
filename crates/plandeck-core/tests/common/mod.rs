use std::{
    path::Path,
    sync::{
        atomic::{AtomicI64, Ordering},
        Arc, Mutex, PoisonError,
    },
};

use jiff::Timestamp;
use plandeck_core::{
    audit::{AuditEntry, AuditLogger, AuditQuery},
    clock::{FileStatSource, Fingerprint, FixedClock, FsStat},
    PlanError, PlanRepository, PlanRepositoryBuilder, Result,
};
use tempfile::TempDir;

pub const START: &str = "2026-10-19T12:00:00Z";

/// Helper function to create a test repository
pub async fn create_test_repository() -> (TempDir, PlanRepository) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let repo = PlanRepositoryBuilder::new()
        .with_plans_dir(temp_dir.path())
        .build()
        .await
        .expect("Failed to create repository");
    (temp_dir, repo)
}

/// A repository whose clock stands still at [`START`].
pub async fn create_fixed_clock_repository() -> (TempDir, Arc<FixedClock>, PlanRepository) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let clock = Arc::new(FixedClock::new(
        START.parse::<Timestamp>().expect("valid timestamp"),
    ));
    let repo = PlanRepositoryBuilder::new()
        .with_plans_dir(temp_dir.path())
        .with_clock(clock.clone())
        .build()
        .await
        .expect("Failed to create repository");
    (temp_dir, clock, repo)
}

/// Real file stats with an adjustable mtime offset, to fake edits that keep
/// the size.
#[derive(Debug, Default)]
pub struct SkewedStat {
    skew_millis: AtomicI64,
}

impl SkewedStat {
    pub fn touch(&self) {
        self.skew_millis.fetch_add(1_000, Ordering::SeqCst);
    }
}

impl FileStatSource for SkewedStat {
    fn fingerprint(&self, path: &Path) -> std::io::Result<Fingerprint> {
        let mut fingerprint = FsStat.fingerprint(path)?;
        fingerprint.mtime_millis += self.skew_millis.load(Ordering::SeqCst);
        Ok(fingerprint)
    }
}

/// Audit logger keeping entries in memory.
#[derive(Debug, Default)]
pub struct RecordingAudit {
    entries: Mutex<Vec<AuditEntry>>,
}

impl RecordingAudit {
    pub fn actions(&self) -> Vec<String> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|e| e.action.clone())
            .collect()
    }
}

impl AuditLogger for RecordingAudit {
    fn log(&self, entry: &AuditEntry) -> Result<()> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(entry.clone());
        Ok(())
    }

    fn entries(&self, _query: &AuditQuery) -> Result<Vec<AuditEntry>> {
        let mut entries = self
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        entries.reverse();
        Ok(entries)
    }
}

/// Audit logger whose every write fails.
#[derive(Debug, Default)]
pub struct FailingAudit;

impl AuditLogger for FailingAudit {
    fn log(&self, _entry: &AuditEntry) -> Result<()> {
        Err(PlanError::Configuration {
            message: "audit sink unavailable".to_string(),
        })
    }

    fn entries(&self, _query: &AuditQuery) -> Result<Vec<AuditEntry>> {
        Ok(Vec::new())
    }
}
