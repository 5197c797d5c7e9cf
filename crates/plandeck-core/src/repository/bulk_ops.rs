//! Bulk operations for the PlanRepository.
//!
//! Each file is processed on its own: one failure is recorded in the result
//! and never stops or undoes the others.

use super::PlanRepository;
use crate::{error::Result, models::BulkResult, params::BulkAction};

impl PlanRepository {
    /// Applies `action` to every file.
    pub async fn bulk_update(
        &self,
        filenames: &[String],
        action: &BulkAction,
    ) -> Result<BulkResult> {
        let filenames = filenames.to_vec();
        let action = action.clone();
        self.blocking(move |store| Ok(store.bulk_update(&filenames, &action)))
            .await
    }

    /// Deletes every file.
    pub async fn bulk_delete(&self, filenames: &[String]) -> Result<BulkResult> {
        let filenames = filenames.to_vec();
        self.blocking(move |store| Ok(store.bulk_delete(&filenames)))
            .await
    }
}
