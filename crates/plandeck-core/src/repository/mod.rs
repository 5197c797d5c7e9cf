//! High-level async API over plan files.
//!
//! [`PlanRepository`] is the entry point for front ends. Each operation hops
//! onto the blocking pool once and runs against the synchronous
//! [`PlanStore`], which owns the read/decode/commit lifecycle:
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │  PlanRepository │    │    PlanStore    │    │  Collaborators  │
//! │ (async, tokio)  │───▶│ (sync engine)   │───▶│ codec, history, │
//! │                 │    │                 │    │ conflict, audit │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//! ```
//!
//! ## Submodules
//!
//! - [`builder`]: Configures directories and collaborators
//! - [`plan_ops`]: Reads, creation, content/status/field updates
//! - [`subtask_ops`]: Subtask checklist operations
//! - [`bulk_ops`]: Multi-file operations with partitioned results
//! - [`history_ops`]: Versions, diffs and rollback
//! - [`archive_ops`]: Soft delete, restore and purge
//! - [`deps_ops`]: Dependency graph queries
//!
//! # Usage Examples
//!
//! ```rust
//! use plandeck_core::{PlanRepositoryBuilder, models::PlanStatus, params::CreatePlan};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let dir = tempfile::TempDir::new()?;
//! let repo = PlanRepositoryBuilder::new()
//!     .with_plans_dir(dir.path())
//!     .build()
//!     .await?;
//!
//! repo.create_plan(&CreatePlan {
//!     content: "# Release checklist\n".to_string(),
//!     filename: Some("release.md".to_string()),
//! })
//! .await?;
//!
//! repo.update_status("release.md", PlanStatus::InProgress).await?;
//! let detail = repo.get_plan("release.md").await?;
//! assert_eq!(detail.meta.title, "Release checklist");
//! # Ok(())
//! # }
//! ```

use tokio::task;

use crate::{
    error::{PlanError, Result},
    store::PlanStore,
};

pub mod archive_ops;
pub mod builder;
pub mod bulk_ops;
pub mod deps_ops;
pub mod history_ops;
pub mod plan_ops;
pub mod subtask_ops;


/// Async facade over a [`PlanStore`]. Cheap to clone.
#[derive(Debug, Clone)]
pub struct PlanRepository {
    store: PlanStore,
}

impl PlanRepository {
    pub(crate) fn new(store: PlanStore) -> Self {
        Self { store }
    }

    /// The synchronous engine, for callers already off the async runtime.
    pub fn store(&self) -> &PlanStore {
        &self.store
    }

    /// Run `f` against the store on the blocking pool.
    async fn blocking<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&PlanStore) -> Result<T> + Send + 'static,
    {
        let store = self.store.clone();
        task::spawn_blocking(move || f(&store))
            .await
            .map_err(|e| PlanError::Configuration {
                message: format!("Task join error: {e}"),
            })?
    }
}
