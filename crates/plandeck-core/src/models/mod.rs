//! Data models for plan files, their metadata and their history.
//!
//! Display implementations for these models live in
//! [`crate::display::models`], keeping data structures separate from
//! presentation.
//!
//! # Examples
//!
//! ```rust
//! use plandeck_core::models::{PlanFrontmatter, PlanStatus, Subtask, SubtaskProgress, SubtaskStatus};
//!
//! let frontmatter = PlanFrontmatter {
//!     status: Some(PlanStatus::InProgress),
//!     subtasks: vec![Subtask {
//!         id: "st-1".to_string(),
//!         title: "Design API".to_string(),
//!         status: SubtaskStatus::Done,
//!         assignee: None,
//!         due_date: None,
//!     }],
//!     ..Default::default()
//! };
//!
//! assert_eq!(frontmatter.effective_status(), PlanStatus::InProgress);
//! assert_eq!(SubtaskProgress::of(&frontmatter.subtasks).percentage, 100);
//! ```

pub mod bulk;
pub mod frontmatter;
pub mod plan;
pub mod status;
pub mod version;

#[cfg(test)]
mod tests;

pub use bulk::{BulkFailure, BulkResult, MigrationReport};
pub use frontmatter::{PlanFrontmatter, Subtask, SubtaskProgress};
pub use plan::{PlanDetail, PlanFile, PlanMeta};
pub use status::{PlanStatus, Priority, SubtaskStatus};
pub use version::{DiffLine, DiffLineKind, DiffResult, DiffStats, VersionInfo, VersionSnapshot};
