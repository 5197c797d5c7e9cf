//! Archive operations for the PlanRepository.
//!
//! Archiving is a soft delete: the plan leaves every listing but can be
//! restored until its retention runs out and cleanup removes it.

use super::PlanRepository;
use crate::{
    archive::ArchivedPlan,
    error::Result,
    models::{BulkResult, PlanMeta},
};

impl PlanRepository {
    /// Moves a plan into the archive.
    ///
    /// # Errors
    ///
    /// * `PlanError::NotFound` - When the plan does not exist
    /// * `PlanError::Conflict` - When the file changed on disk since last read
    /// * `PlanError::InvalidInput` - When an archived plan of that name exists
    pub async fn archive_plan(&self, filename: &str) -> Result<ArchivedPlan> {
        let filename = filename.to_string();
        self.blocking(move |store| store.archive_plan(&filename))
            .await
    }

    /// Archives every file.
    pub async fn bulk_archive(&self, filenames: &[String]) -> Result<BulkResult> {
        let filenames = filenames.to_vec();
        self.blocking(move |store| Ok(store.bulk_archive(&filenames)))
            .await
    }

    /// Archived plans, newest first.
    pub async fn list_archived(&self) -> Result<Vec<ArchivedPlan>> {
        self.blocking(|store| Ok(store.list_archived())).await
    }

    /// Brings an archived plan back.
    ///
    /// # Errors
    ///
    /// * `PlanError::NotFound` - When no archived plan has that name
    /// * `PlanError::AlreadyExists` - When a live plan already uses the name
    pub async fn restore_archived(&self, filename: &str) -> Result<PlanMeta> {
        let filename = filename.to_string();
        self.blocking(move |store| store.restore_archived(&filename))
            .await
    }

    /// Permanently deletes an archived plan.
    pub async fn purge_archived(&self, filename: &str) -> Result<()> {
        let filename = filename.to_string();
        self.blocking(move |store| store.purge_archived(&filename))
            .await
    }

    /// Removes archived plans past their retention, returning the count.
    pub async fn cleanup_expired_archives(&self) -> Result<usize> {
        self.blocking(|store| store.cleanup_expired_archives())
            .await
    }
}
