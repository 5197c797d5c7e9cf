//! Core library for Plandeck, a metadata engine for markdown plan files.
//!
//! Plans are ordinary markdown files with an optional frontmatter block on
//! top. This crate reads and writes that block without ever touching the
//! markdown body, and guards every write with:
//!
//! - **Status workflow** ([`transitions`]): `todo → in_progress → review →
//!   completed`, with explicit back-edges
//! - **Conflict detection** ([`conflict`]): a write fails if the file changed
//!   on disk since it was last read
//! - **Version history** ([`history`]): the replaced content is snapshotted
//!   before each write, with line diffs and rollback
//! - **Audit log** ([`audit`]): one JSON line per mutation
//!
//! Deleted plans can go to an [`archive`] instead of disappearing, and
//! [`deps`] builds the dependency graph implied by `blockedBy`.
//!
//! # Architecture
//!
//! - **Codec** ([`codec`]): frontmatter parsing and serialization, tolerant of
//!   hand-edited files
//! - **Store** ([`store`]): the synchronous engine owning the commit path
//! - **Repository** ([`repository`]): the async facade front ends use
//! - **Display** ([`display`]): markdown formatting for terminal output
//!
//! # Quick Start
//!
//! ```rust
//! use plandeck_core::{models::PlanStatus, params::CreatePlan, PlanRepositoryBuilder};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let dir = tempfile::TempDir::new()?;
//! let repo = PlanRepositoryBuilder::new()
//!     .with_plans_dir(dir.path())
//!     .build()
//!     .await?;
//!
//! let plan = repo
//!     .create_plan(&CreatePlan {
//!         content: "# My Project\n\nFirst draft.\n".to_string(),
//!         filename: Some("my-project.md".to_string()),
//!     })
//!     .await?;
//! println!("Created plan: {}", plan.filename);
//!
//! repo.update_status("my-project.md", PlanStatus::InProgress).await?;
//! for plan in repo.list_plans().await? {
//!     println!("Plan: {}", plan.title);
//! }
//! # Ok(())
//! # }
//! ```

pub mod archive;
pub mod audit;
pub mod clock;
pub mod codec;
pub mod conflict;
pub mod deps;
pub mod display;
pub mod error;
pub mod history;
pub mod migration;
pub mod models;
pub mod params;
pub mod repository;
pub mod store;
pub mod transitions;

// Re-export commonly used types
pub use display::{
    Archive, AuditTrail, CreateResult, DeleteResult, OperationStatus, PlanList, Subtasks,
    UpdateResult, Versions,
};
pub use error::{PlanError, Result};
pub use models::{
    PlanDetail, PlanFile, PlanFrontmatter, PlanMeta, PlanStatus, Priority, Subtask, SubtaskStatus,
};
pub use params::{BulkAction, CreatePlan, FieldUpdate, SubtaskCreate, SubtaskUpdate};
pub use repository::{builder::PlanRepositoryBuilder, PlanRepository};
