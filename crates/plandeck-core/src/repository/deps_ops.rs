//! Dependency queries for the PlanRepository.

use super::PlanRepository;
use crate::{
    deps::{DependencyGraph, PlanDependencies},
    error::{PlanError, Result},
    store::files::validate_filename,
};

impl PlanRepository {
    /// Graph of every plan and its `blockedBy` links.
    pub async fn dependency_graph(&self) -> Result<DependencyGraph> {
        self.blocking(|store| Ok(DependencyGraph::build(&store.list_plans()?)))
            .await
    }

    /// What one plan waits on, what waits on it, and its upstream chain.
    ///
    /// # Errors
    ///
    /// * `PlanError::NotFound` - When the plan does not exist
    pub async fn plan_dependencies(&self, filename: &str) -> Result<PlanDependencies> {
        let filename = filename.to_string();
        self.blocking(move |store| {
            validate_filename(&filename)?;
            DependencyGraph::build(&store.list_plans()?)
                .dependencies_of(&filename)
                .ok_or(PlanError::NotFound { filename })
        })
        .await
    }
}
