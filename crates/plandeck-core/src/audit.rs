//! Audit trail of accepted mutations.
//!
//! Logging is fire-and-forget from the repository's point of view: a failed
//! append is reported with `warn!` and never fails the mutation itself.

use std::{
    fmt::Debug,
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
    sync::{Mutex, PoisonError},
};

use jiff::Timestamp;
use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{FileSystemResultExt, PlanError, Result};

/// Name of the log file inside the primary plans directory.
pub const AUDIT_FILENAME: &str = ".audit.jsonl";

/// Kinds of mutation recorded in the audit log.
pub mod actions {
    pub const CREATE: &str = "create";
    pub const UPDATE: &str = "update";
    pub const DELETE: &str = "delete";
    pub const RENAME: &str = "rename";
    pub const STATUS_CHANGE: &str = "status_change";
    pub const FIELD_UPDATE: &str = "field_update";
    pub const SUBTASK: &str = "subtask";
    pub const ROLLBACK: &str = "rollback";
    pub const MIGRATE: &str = "migrate";
    pub const RESTORE: &str = "restore";
}

/// One line of the audit log.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuditEntry {
    pub timestamp: Timestamp,
    pub action: String,
    pub filename: String,
    #[serde(default)]
    pub details: Value,
}

/// Filters for reading the audit log back.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuditQuery {
    pub filename: Option<String>,
    pub action: Option<String>,
    /// Newest entries kept; `None` or 0 returns everything
    pub limit: Option<usize>,
}

/// Receiver of audit notifications.
pub trait AuditLogger: Send + Sync + Debug {
    fn log(&self, entry: &AuditEntry) -> Result<()>;

    /// Entries matching `query`, newest first.
    fn entries(&self, query: &AuditQuery) -> Result<Vec<AuditEntry>>;
}

/// Append-only JSON-lines log on disk.
#[derive(Debug)]
pub struct JsonlAuditLog {
    path: PathBuf,
    // Serialises appends from concurrent blocking tasks.
    write_lock: Mutex<()>,
}

impl JsonlAuditLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// The log at its usual place inside `plans_dir`.
    pub fn in_dir(plans_dir: &Path) -> Self {
        Self::new(plans_dir.join(AUDIT_FILENAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AuditLogger for JsonlAuditLog {
    fn log(&self, entry: &AuditEntry) -> Result<()> {
        let mut line = serde_json::to_string(entry)?;
        line.push('\n');

        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .fs_context(&self.path)?;
        file.write_all(line.as_bytes()).fs_context(&self.path)
    }

    fn entries(&self, query: &AuditQuery) -> Result<Vec<AuditEntry>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(PlanError::file_system(&self.path, e)),
        };

        let mut entries: Vec<AuditEntry> = content
            .lines()
            .filter(|line| !line.trim().is_empty())
            .filter_map(|line| match serde_json::from_str::<AuditEntry>(line) {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!("Skipping unreadable audit line: {e}");
                    None
                }
            })
            .filter(|entry| {
                query.filename.as_deref().map_or(true, |f| entry.filename == f)
                    && query.action.as_deref().map_or(true, |a| entry.action == a)
            })
            .collect();

        entries.reverse();
        if let Some(limit) = query.limit.filter(|l| *l > 0) {
            entries.truncate(limit);
        }
        Ok(entries)
    }
}

/// Discards every entry.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopAuditLog;

impl AuditLogger for NoopAuditLog {
    fn log(&self, _entry: &AuditEntry) -> Result<()> {
        Ok(())
    }

    fn entries(&self, _query: &AuditQuery) -> Result<Vec<AuditEntry>> {
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use tempfile::TempDir;

    use super::*;

    fn entry(action: &str, filename: &str, second: i64) -> AuditEntry {
        AuditEntry {
            timestamp: Timestamp::from_second(second).expect("timestamp"),
            action: action.to_string(),
            filename: filename.to_string(),
            details: json!({}),
        }
    }

    #[test]
    fn test_entries_newest_first_with_filters() {
        let dir = TempDir::new().expect("temp dir");
        let log = JsonlAuditLog::in_dir(dir.path());
        log.log(&entry(actions::CREATE, "a.md", 1)).expect("log");
        log.log(&entry(actions::UPDATE, "a.md", 2)).expect("log");
        log.log(&entry(actions::CREATE, "b.md", 3)).expect("log");

        let all = log.entries(&AuditQuery::default()).expect("entries");
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].filename, "b.md");

        let only_a = log
            .entries(&AuditQuery {
                filename: Some("a.md".to_string()),
                ..Default::default()
            })
            .expect("entries");
        assert_eq!(only_a.len(), 2);
        assert_eq!(only_a[0].action, actions::UPDATE);

        let creates = log
            .entries(&AuditQuery {
                action: Some(actions::CREATE.to_string()),
                limit: Some(1),
                ..Default::default()
            })
            .expect("entries");
        assert_eq!(creates.len(), 1);
        assert_eq!(creates[0].filename, "b.md");
    }

    #[test]
    fn test_missing_log_reads_empty() {
        let dir = TempDir::new().expect("temp dir");
        let log = JsonlAuditLog::in_dir(dir.path());
        assert!(log.entries(&AuditQuery::default()).expect("entries").is_empty());
    }

    #[test]
    fn test_corrupt_line_is_skipped() {
        let dir = TempDir::new().expect("temp dir");
        let log = JsonlAuditLog::in_dir(dir.path());
        log.log(&entry(actions::DELETE, "a.md", 1)).expect("log");
        fs::write(
            log.path(),
            format!(
                "{}not json\n",
                fs::read_to_string(log.path()).expect("read log")
            ),
        )
        .expect("append garbage");

        assert_eq!(log.entries(&AuditQuery::default()).expect("entries").len(), 1);
    }
}
