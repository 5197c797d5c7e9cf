//! Soft delete: archive, restore, purge and expiry cleanup.

use std::fs;

use log::{info, warn};
use serde_json::json;

use super::{
    files::{ensure_dir, read_plan, validate_filename, write_new},
    parent_dir, PlanStore,
};
use crate::{
    archive::ArchivedPlan,
    audit::actions,
    codec::{self, outline},
    error::{FileSystemResultExt, PlanError, Result},
    models::{BulkResult, PlanFile, PlanFrontmatter, PlanMeta},
};

/// `content` with `archivedAt` stamped.
fn stamp_archived(content: &str, at: String) -> String {
    let PlanFile { frontmatter, body } = codec::decode(content);
    let mut frontmatter = frontmatter.unwrap_or_default();
    frontmatter.archived_at = Some(at);
    codec::encode(&PlanFile::with_frontmatter(frontmatter, body))
}

/// `content` without `archivedAt`; a block left empty is dropped.
fn clear_archived(content: &str) -> String {
    let PlanFile { frontmatter, body } = codec::decode(content);
    match frontmatter {
        Some(mut frontmatter) if frontmatter.archived_at.is_some() => {
            frontmatter.archived_at = None;
            if frontmatter == PlanFrontmatter::default() {
                codec::encode(&PlanFile::without_frontmatter(body))
            } else {
                codec::encode(&PlanFile::with_frontmatter(frontmatter, body))
            }
        }
        _ => content.to_string(),
    }
}

impl PlanStore {
    /// Move a plan into the archive, stamping `archivedAt`.
    ///
    /// The pre-archive content is snapshotted like any other write, and the
    /// same conflict check applies.
    pub fn archive_plan(&self, filename: &str) -> Result<ArchivedPlan> {
        let path = self.resolve(filename)?;
        let dir = parent_dir(&path);
        self.conflicts().ensure_unchanged(dir, filename)?;

        let previous = read_plan(&path, filename)?;
        let now = self.now();
        let archived = stamp_archived(&previous, now.to_string());

        let archive = self.archive();
        let expires_at = archive.expiry(now)?;
        ensure_dir(archive.dir())?;
        let target = archive.path(filename);
        if !write_new(&target, archived.as_bytes())? {
            return Err(PlanError::invalid_input("filename").with_reason(format!(
                "an archived plan named '{filename}' already exists; restore or purge it first"
            )));
        }
        let moved = self
            .versions()
            .save_version(filename, &previous, "Archived")
            .and_then(|_| fs::remove_file(&path).fs_context(&path));
        if let Err(e) = moved {
            let _ = fs::remove_file(&target);
            return Err(e);
        }

        let body = codec::decode(&previous).body;
        let entry = ArchivedPlan {
            filename: filename.to_string(),
            original_path: path,
            archived_at: now,
            expires_at,
            title: outline::title(&body),
            preview: outline::preview(&body, outline::PREVIEW_LENGTH),
        };
        archive.record(entry.clone())?;

        self.conflicts().forget(filename);
        info!("Archived plan '{filename}'");
        self.audit(
            actions::DELETE,
            filename,
            json!({ "permanent": false, "archived": true }),
        );
        Ok(entry)
    }

    /// Archive each file independently.
    pub fn bulk_archive(&self, filenames: &[String]) -> BulkResult {
        let mut result = BulkResult::default();
        for filename in filenames {
            match self.archive_plan(filename) {
                Ok(_) => result.push_success(filename.as_str()),
                Err(e) => {
                    warn!("Archiving '{filename}' failed: {e}");
                    result.push_failure(filename.as_str(), e);
                }
            }
        }
        result
    }

    /// Archived plans still on disk, newest first.
    pub fn list_archived(&self) -> Vec<ArchivedPlan> {
        self.archive().list()
    }

    /// Move an archived plan back into the primary directory and clear
    /// `archivedAt`.
    pub fn restore_archived(&self, filename: &str) -> Result<PlanMeta> {
        validate_filename(filename)?;
        let source = self.archive().path(filename);
        let archived = read_plan(&source, filename)?;
        if self.exists(filename) {
            return Err(PlanError::AlreadyExists {
                filename: filename.to_string(),
            });
        }

        ensure_dir(self.plans_dir())?;
        let target = self.plans_dir().join(filename);
        let restored = clear_archived(&archived);
        if !write_new(&target, restored.as_bytes())? {
            return Err(PlanError::AlreadyExists {
                filename: filename.to_string(),
            });
        }
        fs::remove_file(&source).fs_context(&source)?;
        self.archive().remove_entry(filename)?;

        self.conflicts().observe(self.plans_dir(), filename);
        info!("Restored plan '{filename}' from the archive");
        self.audit(actions::RESTORE, filename, json!({}));
        self.get_plan_meta(filename)
    }

    /// Delete an archived plan for good.
    pub fn purge_archived(&self, filename: &str) -> Result<()> {
        validate_filename(filename)?;
        let path = self.archive().path(filename);
        match fs::remove_file(&path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(PlanError::NotFound {
                    filename: filename.to_string(),
                })
            }
            Err(e) => return Err(PlanError::file_system(&path, e)),
        }
        self.archive().remove_entry(filename)?;

        info!("Purged archived plan '{filename}'");
        self.audit(
            actions::DELETE,
            filename,
            json!({ "permanent": true, "archived": true }),
        );
        Ok(())
    }

    /// Remove archived plans past their retention; returns how many went.
    pub fn cleanup_expired_archives(&self) -> Result<usize> {
        let removed = self.archive().remove_expired(self.now())?;
        for filename in &removed {
            self.audit(
                actions::DELETE,
                filename,
                json!({ "permanent": true, "archived": true, "expired": true }),
            );
        }
        if !removed.is_empty() {
            info!("Removed {} expired archived plan(s)", removed.len());
        }
        Ok(removed.len())
    }
}
