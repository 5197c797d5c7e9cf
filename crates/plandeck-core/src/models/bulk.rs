//! Outcome of operations applied to many plans at once.

use serde::{Deserialize, Serialize};

/// A single file that a bulk operation could not update.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BulkFailure {
    pub filename: String,
    pub error: String,
}

/// Partitioned result of a bulk operation.
///
/// One file failing never rolls back or aborts another file's update.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct BulkResult {
    pub succeeded: Vec<String>,
    pub failed: Vec<BulkFailure>,
}

impl BulkResult {
    /// Record a successful file.
    pub fn push_success(&mut self, filename: impl Into<String>) {
        self.succeeded.push(filename.into());
    }

    /// Record a failed file with its error message.
    pub fn push_failure(&mut self, filename: impl Into<String>, error: impl ToString) {
        self.failed.push(BulkFailure {
            filename: filename.into(),
            error: error.to_string(),
        });
    }

    /// True when every file succeeded.
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Outcome of rewriting out-of-date frontmatter across all plans.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct MigrationReport {
    pub migrated: usize,
    pub errors: Vec<String>,
}
