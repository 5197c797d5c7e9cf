//! Subtask mutations inside a plan's frontmatter.

use serde_json::json;
use uuid::Uuid;

use super::{Mutation, PlanStore};
use crate::{
    audit::actions,
    error::{PlanError, Result},
    models::{PlanFrontmatter, Subtask, SubtaskStatus},
    params::{SubtaskCreate, SubtaskUpdate},
};

fn subtask_mut<'a>(
    frontmatter: &'a mut PlanFrontmatter,
    filename: &str,
    id: &str,
) -> Result<&'a mut Subtask> {
    let index = frontmatter
        .subtask_index(id)
        .ok_or_else(|| PlanError::SubtaskNotFound {
            filename: filename.to_string(),
            id: id.to_string(),
        })?;
    Ok(&mut frontmatter.subtasks[index])
}

fn subtask_mutation(value: Subtask, summary: &str, op: &str) -> Mutation<Subtask> {
    let details = json!({ "op": op, "id": value.id });
    Mutation {
        value,
        summary: summary.to_string(),
        action: actions::SUBTASK,
        details,
    }
}

impl PlanStore {
    /// Append a subtask with a fresh UUID.
    pub fn add_subtask(&self, filename: &str, params: &SubtaskCreate) -> Result<Subtask> {
        params.validate()?;
        let now = self.now().to_string();
        let (subtask, _) = self.mutate_frontmatter(filename, |fm| {
            let subtask = Subtask {
                id: Uuid::new_v4().to_string(),
                title: params.title.trim().to_string(),
                status: SubtaskStatus::Todo,
                assignee: params.assignee.clone().filter(|a| !a.is_empty()),
                due_date: params.due_date.clone().filter(|d| !d.is_empty()),
            };
            fm.subtasks.push(subtask.clone());
            fm.modified = Some(now);
            Ok(subtask_mutation(subtask, "Subtask added", "add"))
        })?;
        Ok(subtask)
    }

    /// Change the given fields of one subtask.
    pub fn update_subtask(
        &self,
        filename: &str,
        id: &str,
        params: &SubtaskUpdate,
    ) -> Result<Subtask> {
        params.validate()?;
        let now = self.now().to_string();
        let (subtask, _) = self.mutate_frontmatter(filename, |fm| {
            let subtask = subtask_mut(fm, filename, id)?;
            if let Some(title) = &params.title {
                subtask.title = title.trim().to_string();
            }
            if let Some(status) = params.status {
                subtask.status = status;
            }
            if let Some(assignee) = &params.assignee {
                subtask.assignee = Some(assignee.clone()).filter(|a| !a.is_empty());
            }
            if let Some(due_date) = &params.due_date {
                subtask.due_date = Some(due_date.clone()).filter(|d| !d.is_empty());
            }
            let updated = subtask.clone();
            fm.modified = Some(now);
            Ok(subtask_mutation(updated, "Subtask updated", "update"))
        })?;
        Ok(subtask)
    }

    /// Flip a subtask between todo and done.
    pub fn toggle_subtask(&self, filename: &str, id: &str) -> Result<Subtask> {
        let now = self.now().to_string();
        let (subtask, _) = self.mutate_frontmatter(filename, |fm| {
            let subtask = subtask_mut(fm, filename, id)?;
            subtask.status = subtask.status.toggled();
            let toggled = subtask.clone();
            fm.modified = Some(now);
            Ok(subtask_mutation(toggled, "Subtask toggled", "toggle"))
        })?;
        Ok(subtask)
    }

    /// Remove a subtask.
    pub fn delete_subtask(&self, filename: &str, id: &str) -> Result<()> {
        let now = self.now().to_string();
        self.mutate_frontmatter(filename, |fm| {
            let index = fm
                .subtask_index(id)
                .ok_or_else(|| PlanError::SubtaskNotFound {
                    filename: filename.to_string(),
                    id: id.to_string(),
                })?;
            let removed = fm.subtasks.remove(index);
            fm.modified = Some(now);
            Ok(subtask_mutation(removed, "Subtask deleted", "delete"))
        })?;
        Ok(())
    }

    /// Subtasks of a plan as currently stored.
    pub fn list_subtasks(&self, filename: &str) -> Result<Vec<Subtask>> {
        let meta = self.get_plan_meta(filename)?;
        Ok(meta.frontmatter.map(|fm| fm.subtasks).unwrap_or_default())
    }
}
