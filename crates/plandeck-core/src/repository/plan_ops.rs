//! Plan operations for the PlanRepository.

use super::PlanRepository;
use crate::{
    audit::{AuditEntry, AuditQuery},
    error::Result,
    models::{MigrationReport, PlanDetail, PlanMeta, PlanStatus},
    params::{CreatePlan, FieldUpdate},
};

impl PlanRepository {
    /// Lists every plan across configured directories, newest-modified first.
    pub async fn list_plans(&self) -> Result<Vec<PlanMeta>> {
        self.blocking(|store| store.list_plans()).await
    }

    /// Retrieves a plan with its content.
    ///
    /// This counts as a read for conflict detection: a later write fails with
    /// `PlanError::Conflict` if the file changes on disk in between.
    pub async fn get_plan(&self, filename: &str) -> Result<PlanDetail> {
        let filename = filename.to_string();
        self.blocking(move |store| store.get_plan(&filename)).await
    }

    /// Retrieves plan metadata without recording a read.
    pub async fn get_plan_meta(&self, filename: &str) -> Result<PlanMeta> {
        let filename = filename.to_string();
        self.blocking(move |store| store.get_plan_meta(&filename))
            .await
    }

    /// Creates a plan from raw content, stored exactly as given.
    pub async fn create_plan(&self, params: &CreatePlan) -> Result<PlanMeta> {
        let params = params.clone();
        self.blocking(move |store| store.create_plan(&params)).await
    }

    /// Replaces a plan's content, snapshotting the previous content.
    pub async fn update_content(&self, filename: &str, content: &str) -> Result<PlanMeta> {
        let filename = filename.to_string();
        let content = content.to_string();
        self.blocking(move |store| store.update_content(&filename, &content))
            .await
    }

    /// Changes a plan's status, enforcing the status workflow.
    ///
    /// # Errors
    ///
    /// * `PlanError::InvalidTransition` - When the workflow forbids the change
    pub async fn update_status(&self, filename: &str, status: PlanStatus) -> Result<PlanMeta> {
        let filename = filename.to_string();
        self.blocking(move |store| store.update_status(&filename, status))
            .await
    }

    /// Statuses the plan can move to from its current status.
    pub async fn available_transitions(&self, filename: &str) -> Result<Vec<PlanStatus>> {
        let filename = filename.to_string();
        self.blocking(move |store| store.available_transitions(&filename))
            .await
    }

    /// Sets or clears a single frontmatter field.
    pub async fn update_field(&self, filename: &str, update: &FieldUpdate) -> Result<PlanMeta> {
        let filename = filename.to_string();
        let update = update.clone();
        self.blocking(move |store| store.update_field(&filename, &update))
            .await
    }

    /// Renames a plan; its history moves along.
    pub async fn rename_plan(&self, filename: &str, new_filename: &str) -> Result<PlanMeta> {
        let filename = filename.to_string();
        let new_filename = new_filename.to_string();
        self.blocking(move |store| store.rename_plan(&filename, &new_filename))
            .await
    }

    /// Permanently deletes a plan file. Its history is kept.
    pub async fn delete_plan(&self, filename: &str) -> Result<()> {
        let filename = filename.to_string();
        self.blocking(move |store| store.delete_plan(&filename))
            .await
    }

    /// Rewrites plans whose frontmatter is behind the current schema.
    pub async fn migrate_all(&self) -> Result<MigrationReport> {
        self.blocking(|store| store.migrate_all()).await
    }

    /// Reads back the audit log, newest first.
    pub async fn audit_log(&self, query: &AuditQuery) -> Result<Vec<AuditEntry>> {
        let query = query.clone();
        self.blocking(move |store| store.audit_logger().entries(&query))
            .await
    }
}
