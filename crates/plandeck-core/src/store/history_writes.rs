//! History queries and rollback.

use serde_json::json;

use super::{
    files::{read_plan, validate_filename},
    PlanStore,
};
use crate::{
    audit::actions,
    error::Result,
    history::compute_diff,
    models::{DiffResult, PlanMeta, VersionInfo, VersionSnapshot},
};

/// Label used for the live file in diffs.
pub const CURRENT_LABEL: &str = "current";

impl PlanStore {
    /// Snapshots of a plan, newest first. Works for deleted plans too.
    pub fn list_versions(&self, filename: &str) -> Result<Vec<VersionInfo>> {
        validate_filename(filename)?;
        self.versions().list_versions(filename)
    }

    pub fn get_version(&self, filename: &str, version: &str) -> Result<VersionSnapshot> {
        validate_filename(filename)?;
        self.versions().get_snapshot(filename, version)
    }

    /// Diff `from` against `to`, or against the live file when `to` is `None`.
    pub fn diff_versions(
        &self,
        filename: &str,
        from: &str,
        to: Option<&str>,
    ) -> Result<DiffResult> {
        let old = self.get_version(filename, from)?;
        let (new_content, to_label) = match to {
            Some(version) => (self.get_version(filename, version)?.content, version),
            None => {
                let path = self.resolve(filename)?;
                (read_plan(&path, filename)?, CURRENT_LABEL)
            }
        };
        Ok(compute_diff(&old.content, &new_content, from, to_label))
    }

    /// Restore `version` as the current content.
    ///
    /// Goes through the normal commit path, so the content being replaced is
    /// snapshotted first and rollback can itself be undone.
    pub fn rollback(&self, filename: &str, version: &str) -> Result<PlanMeta> {
        let path = self.resolve(filename)?;
        let target = self.versions().get_snapshot(filename, version)?;
        let current = read_plan(&path, filename)?;

        let meta = self.commit(
            &path,
            filename,
            &current,
            &target.content,
            &format!("Before rollback to {version}"),
        )?;
        self.audit(actions::ROLLBACK, filename, json!({ "version": version }));
        Ok(meta)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use jiff::{SignedDuration, Timestamp};
    use tempfile::TempDir;

    use crate::{
        archive::{ArchiveStore, ARCHIVE_DIR, DEFAULT_RETENTION_DAYS},
        audit::NoopAuditLog,
        clock::{FixedClock, FsStat},
        conflict::ConflictDetector,
        error::PlanError,
        history::VersionStore,
        migration::NoMigration,
        models::DiffLineKind,
        params::CreatePlan,
        store::{PlanStore, StoreConfig},
    };

    fn setup() -> (TempDir, Arc<FixedClock>, PlanStore) {
        let dir = TempDir::new().expect("temp dir");
        let clock = Arc::new(FixedClock::new(
            "2026-10-19T12:00:00Z".parse::<Timestamp>().expect("timestamp"),
        ));
        let store = PlanStore::new(StoreConfig {
            plans_dir: dir.path().to_path_buf(),
            extra_dirs: Vec::new(),
            versions: VersionStore::new(dir.path().join(".history"), clock.clone()),
            archive: Arc::new(ArchiveStore::new(
                dir.path().join(ARCHIVE_DIR),
                DEFAULT_RETENTION_DAYS,
            )),
            conflicts: Arc::new(ConflictDetector::new(Arc::new(FsStat))),
            audit: Arc::new(NoopAuditLog),
            migrator: Arc::new(NoMigration),
            clock: clock.clone(),
        });
        (dir, clock, store)
    }

    #[test]
    fn test_rollback_snapshots_current_content_first() {
        let (_dir, clock, store) = setup();
        store
            .create_plan(&CreatePlan {
                content: "v1\n".to_string(),
                filename: Some("a.md".to_string()),
            })
            .expect("create");
        store.update_content("a.md", "v2\n").expect("update");
        let first = store.list_versions("a.md").expect("list")[0].version.clone();

        clock.advance(SignedDuration::from_secs(1));
        store.rollback("a.md", &first).expect("rollback");

        let versions = store.list_versions("a.md").expect("list");
        assert_eq!(versions.len(), 2);
        assert!(versions[0].summary.starts_with("Before rollback to"));
        let latest = store
            .get_version("a.md", &versions[0].version)
            .expect("latest");
        assert_eq!(latest.content, "v2\n");
    }

    #[test]
    fn test_rollback_unknown_version_writes_nothing() {
        let (dir, _clock, store) = setup();
        store
            .create_plan(&CreatePlan {
                content: "v1\n".to_string(),
                filename: Some("a.md".to_string()),
            })
            .expect("create");

        let err = store
            .rollback("a.md", "2020-01-01T00-00-00.000000000Z")
            .unwrap_err();
        assert!(matches!(err, PlanError::VersionNotFound { .. }));
        assert!(store.list_versions("a.md").expect("list").is_empty());
        assert_eq!(
            std::fs::read_to_string(dir.path().join("a.md")).expect("read"),
            "v1\n"
        );
    }

    #[test]
    fn test_diff_against_current() {
        let (_dir, _clock, store) = setup();
        store
            .create_plan(&CreatePlan {
                content: "a\nb\n".to_string(),
                filename: Some("a.md".to_string()),
            })
            .expect("create");
        store.update_content("a.md", "a\nc\n").expect("update");
        let version = store.list_versions("a.md").expect("list")[0].version.clone();

        let diff = store.diff_versions("a.md", &version, None).expect("diff");
        assert_eq!(diff.to_version, super::CURRENT_LABEL);
        assert_eq!(diff.stats.added, 1);
        assert_eq!(diff.stats.removed, 1);
        assert!(diff
            .lines
            .iter()
            .any(|l| l.kind == DiffLineKind::Added && l.content == "c"));
    }
}
