//! Error types for the plan metadata engine.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::models::PlanStatus;

/// Comprehensive error type for all plan operations.
///
/// Parsing anomalies inside a frontmatter block are never errors; they are
/// recovered field by field and reported through
/// [`crate::codec::FieldDiagnostic`] instead.
#[derive(Error, Debug)]
pub enum PlanError {
    /// Filename failed validation before any I/O was attempted
    #[error("Invalid filename: {filename}")]
    InvalidFilename { filename: String },
    /// Plan file absent on disk
    #[error("Plan not found: {filename}")]
    NotFound { filename: String },
    /// Target filename is already taken
    #[error("Plan already exists: {filename}")]
    AlreadyExists { filename: String },
    /// Name still carries the version history of an earlier plan
    #[error("Version history already exists for '{filename}'")]
    HistoryExists { filename: String },
    /// File changed on disk since it was last read
    #[error(
        "Plan '{filename}' was modified externally (last known mtime {last_known_mtime}, current mtime {current_mtime})"
    )]
    Conflict {
        filename: String,
        last_known_mtime: i64,
        current_mtime: i64,
    },
    /// Status change rejected by the transition table
    #[error("Invalid status transition from {from} to {to}")]
    InvalidTransition { from: PlanStatus, to: PlanStatus },
    /// Unknown version requested for diff, rollback or fetch
    #[error("Version '{version}' not found for plan '{filename}'")]
    VersionNotFound { filename: String, version: String },
    /// Unknown subtask id
    #[error("Subtask '{id}' not found in plan '{filename}'")]
    SubtaskNotFound { filename: String, id: String },
    /// Invalid input validation errors
    #[error("Invalid input for field '{field}': {reason}")]
    InvalidInput { field: String, reason: String },
    /// File system operation errors
    #[error("File system error at path '{path}': {source}")]
    FileSystem {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Serialization/deserialization errors
    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },
    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

/// Builder for creating input validation errors.
pub struct InvalidInputBuilder {
    field: String,
}

impl InvalidInputBuilder {
    /// Create a new invalid input error builder for a field.
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }

    /// Build the error with the given reason.
    pub fn with_reason(self, reason: impl Into<String>) -> PlanError {
        PlanError::InvalidInput {
            field: self.field,
            reason: reason.into(),
        }
    }
}

impl PlanError {
    /// Creates a builder for input validation errors.
    pub fn invalid_input(field: impl Into<String>) -> InvalidInputBuilder {
        InvalidInputBuilder::new(field)
    }

    /// Wraps an I/O error with the path it happened at.
    pub fn file_system(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        PlanError::FileSystem {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// True for the lost-update error raised by the conflict check.
    pub fn is_conflict(&self) -> bool {
        matches!(self, PlanError::Conflict { .. })
    }
}

/// Extension trait attaching a path to I/O results.
pub trait FileSystemResultExt<T> {
    /// Map an I/O error to [`PlanError::FileSystem`] at `path`.
    fn fs_context(self, path: &Path) -> Result<T>;
}

impl<T> FileSystemResultExt<T> for std::result::Result<T, std::io::Error> {
    fn fs_context(self, path: &Path) -> Result<T> {
        self.map_err(|e| PlanError::file_system(path, e))
    }
}

/// Result type alias for plan operations
pub type Result<T> = std::result::Result<T, PlanError>;
