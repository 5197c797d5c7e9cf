//! Version history and diff models.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// An immutable saved copy of a plan's full content.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VersionSnapshot {
    /// Timestamp-derived id, ordered like `created_at`
    pub version: String,
    pub filename: String,
    pub content: String,
    pub size_bytes: u64,
    pub created_at: Timestamp,
    pub summary: String,
}

/// Snapshot metadata without the content, for listings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VersionInfo {
    pub version: String,
    pub filename: String,
    pub size_bytes: u64,
    pub created_at: Timestamp,
    pub summary: String,
}

impl From<&VersionSnapshot> for VersionInfo {
    fn from(snapshot: &VersionSnapshot) -> Self {
        Self {
            version: snapshot.version.clone(),
            filename: snapshot.filename.clone(),
            size_bytes: snapshot.size_bytes,
            created_at: snapshot.created_at,
            summary: snapshot.summary.clone(),
        }
    }
}

/// Classification of a line in a diff.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum DiffLineKind {
    Added,
    Removed,
    Unchanged,
}

/// One line of a line-oriented diff.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DiffLine {
    /// 1-based position in the diff output
    pub line_number: usize,
    #[serde(rename = "type")]
    pub kind: DiffLineKind,
    pub content: String,
}

/// Per-kind line counts of a diff.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DiffStats {
    pub added: usize,
    pub removed: usize,
    pub unchanged: usize,
}

/// Result of comparing two contents line by line.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DiffResult {
    pub from_version: String,
    pub to_version: String,
    pub lines: Vec<DiffLine>,
    pub stats: DiffStats,
}

impl DiffResult {
    /// True when both sides are identical.
    pub fn is_unchanged(&self) -> bool {
        self.stats.added == 0 && self.stats.removed == 0
    }
}
