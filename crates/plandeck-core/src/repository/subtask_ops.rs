//! Subtask operations for the PlanRepository.

use super::PlanRepository;
use crate::{
    error::Result,
    models::{Subtask, SubtaskProgress},
    params::{SubtaskCreate, SubtaskUpdate},
};

impl PlanRepository {
    /// Lists a plan's subtasks in stored order.
    pub async fn list_subtasks(&self, filename: &str) -> Result<Vec<Subtask>> {
        let filename = filename.to_string();
        self.blocking(move |store| store.list_subtasks(&filename))
            .await
    }

    /// Adds a subtask with a generated id.
    pub async fn add_subtask(&self, filename: &str, params: &SubtaskCreate) -> Result<Subtask> {
        let filename = filename.to_string();
        let params = params.clone();
        self.blocking(move |store| store.add_subtask(&filename, &params))
            .await
    }

    /// Updates the given fields of a subtask.
    ///
    /// # Errors
    ///
    /// * `PlanError::SubtaskNotFound` - When no subtask has this id
    pub async fn update_subtask(
        &self,
        filename: &str,
        id: &str,
        params: &SubtaskUpdate,
    ) -> Result<Subtask> {
        let filename = filename.to_string();
        let id = id.to_string();
        let params = params.clone();
        self.blocking(move |store| store.update_subtask(&filename, &id, &params))
            .await
    }

    /// Flips a subtask between todo and done.
    pub async fn toggle_subtask(&self, filename: &str, id: &str) -> Result<Subtask> {
        let filename = filename.to_string();
        let id = id.to_string();
        self.blocking(move |store| store.toggle_subtask(&filename, &id))
            .await
    }

    /// Removes a subtask.
    pub async fn delete_subtask(&self, filename: &str, id: &str) -> Result<()> {
        let filename = filename.to_string();
        let id = id.to_string();
        self.blocking(move |store| store.delete_subtask(&filename, &id))
            .await
    }

    /// Completion counts for a list of subtasks.
    pub fn subtask_progress(subtasks: &[Subtask]) -> SubtaskProgress {
        SubtaskProgress::of(subtasks)
    }
}
