//! Version history operations for the PlanRepository.

use super::PlanRepository;
use crate::{
    error::Result,
    models::{DiffResult, PlanMeta, VersionInfo, VersionSnapshot},
};

impl PlanRepository {
    /// Lists snapshots of a plan, newest first.
    pub async fn list_versions(&self, filename: &str) -> Result<Vec<VersionInfo>> {
        let filename = filename.to_string();
        self.blocking(move |store| store.list_versions(&filename))
            .await
    }

    /// Fetches one snapshot with its exact historical content.
    ///
    /// # Errors
    ///
    /// * `PlanError::VersionNotFound` - When the version does not exist
    pub async fn get_version(&self, filename: &str, version: &str) -> Result<VersionSnapshot> {
        let filename = filename.to_string();
        let version = version.to_string();
        self.blocking(move |store| store.get_version(&filename, &version))
            .await
    }

    /// Line diff from one version to another, or to the current content when
    /// `to` is `None`.
    pub async fn diff_versions(
        &self,
        filename: &str,
        from: &str,
        to: Option<&str>,
    ) -> Result<DiffResult> {
        let filename = filename.to_string();
        let from = from.to_string();
        let to = to.map(str::to_string);
        self.blocking(move |store| store.diff_versions(&filename, &from, to.as_deref()))
            .await
    }

    /// Restores a version as the current content.
    ///
    /// The content being replaced is snapshotted first, so the rollback can
    /// itself be rolled back.
    pub async fn rollback(&self, filename: &str, version: &str) -> Result<PlanMeta> {
        let filename = filename.to_string();
        let version = version.to_string();
        self.blocking(move |store| store.rollback(&filename, &version))
            .await
    }
}
