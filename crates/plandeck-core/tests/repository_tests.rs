mod common;

use std::{fs, sync::Arc};

use common::{
    create_fixed_clock_repository, create_test_repository, FailingAudit, RecordingAudit, SkewedStat,
    START,
};
use plandeck_core::{
    audit::actions,
    migration::NoMigration,
    models::{PlanStatus, SubtaskStatus},
    params::{CreatePlan, SubtaskCreate},
    PlanError, PlanRepositoryBuilder,
};
use tempfile::TempDir;

async fn create(repo: &plandeck_core::PlanRepository, filename: &str, content: &str) {
    repo.create_plan(&CreatePlan {
        content: content.to_string(),
        filename: Some(filename.to_string()),
    })
    .await
    .expect("Failed to create plan");
}

#[tokio::test]
async fn test_same_size_external_edit_is_a_conflict() {
    let temp_dir = TempDir::new().expect("temp dir");
    let stat = Arc::new(SkewedStat::default());
    let repo = PlanRepositoryBuilder::new()
        .with_plans_dir(temp_dir.path())
        .with_stat_source(stat.clone())
        .build()
        .await
        .expect("build");
    create(&repo, "race.md", "# Race\n").await;
    repo.get_plan("race.md").await.expect("read");

    stat.touch();
    let err = repo
        .update_status("race.md", PlanStatus::InProgress)
        .await
        .unwrap_err();
    match err {
        PlanError::Conflict {
            filename,
            last_known_mtime,
            current_mtime,
        } => {
            assert_eq!(filename, "race.md");
            assert_eq!(current_mtime - last_known_mtime, 1_000);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_never_read_file_is_written_without_conflict() {
    let (temp_dir, repo) = create_test_repository().await;
    fs::write(temp_dir.path().join("manual.md"), "# Manual\n").expect("write");

    repo.update_status("manual.md", PlanStatus::InProgress)
        .await
        .expect("first write has nothing to compare against");
}

#[tokio::test]
async fn test_structured_writes_stamp_modified_with_clock_time() {
    let (_temp_dir, _clock, repo) = create_fixed_clock_repository().await;
    create(&repo, "clock.md", "# Clock\n").await;

    let meta = repo
        .update_status("clock.md", PlanStatus::InProgress)
        .await
        .expect("update");
    let frontmatter = meta.frontmatter.expect("frontmatter");
    assert_eq!(frontmatter.modified.as_deref(), Some(START));
    assert_eq!(frontmatter.schema_version, Some(1));
}

#[tokio::test]
async fn test_versions_in_the_same_instant_stay_ordered() {
    let (_temp_dir, _clock, repo) = create_fixed_clock_repository().await;
    create(&repo, "same.md", "one\n").await;
    repo.update_content("same.md", "two\n").await.expect("two");
    repo.update_content("same.md", "three\n")
        .await
        .expect("three");

    let versions = repo.list_versions("same.md").await.expect("list");
    assert_eq!(versions.len(), 2);
    assert!(versions[0].version > versions[1].version);

    let newest = repo
        .get_version("same.md", &versions[0].version)
        .await
        .expect("newest");
    assert_eq!(newest.content, "two\n");
}

#[tokio::test]
async fn test_body_after_block_is_never_reformatted() {
    let (temp_dir, repo) = create_test_repository().await;
    let body = "# Notes\n\n---\n\nstatus: not a field\n  indented\n\n\n";
    create(&repo, "body.md", &format!("---\nstatus: todo\n---\n{body}")).await;

    repo.update_status("body.md", PlanStatus::InProgress)
        .await
        .expect("update");

    let on_disk = fs::read_to_string(temp_dir.path().join("body.md")).expect("read");
    assert!(on_disk.ends_with(&format!("---\n{body}")));
}

#[tokio::test]
async fn test_history_outlives_the_plan() {
    let (_temp_dir, repo) = create_test_repository().await;
    create(&repo, "gone.md", "# Gone\n").await;
    repo.update_content("gone.md", "# Going\n")
        .await
        .expect("update");
    repo.delete_plan("gone.md").await.expect("delete");

    let versions = repo.list_versions("gone.md").await.expect("list");
    assert_eq!(versions.len(), 1);
    let err = repo.get_plan("gone.md").await.unwrap_err();
    assert!(matches!(err, PlanError::NotFound { .. }));
}

#[tokio::test]
async fn test_custom_audit_logger_receives_every_mutation() {
    let temp_dir = TempDir::new().expect("temp dir");
    let audit = Arc::new(RecordingAudit::default());
    let repo = PlanRepositoryBuilder::new()
        .with_plans_dir(temp_dir.path())
        .with_audit_logger(audit.clone())
        .build()
        .await
        .expect("build");

    create(&repo, "a.md", "# A\n").await;
    let subtask = repo
        .add_subtask(
            "a.md",
            &SubtaskCreate {
                title: "Check".to_string(),
                ..Default::default()
            },
        )
        .await
        .expect("add");
    assert_eq!(subtask.status, SubtaskStatus::Todo);
    let version = repo.list_versions("a.md").await.expect("list")[0]
        .version
        .clone();
    repo.rollback("a.md", &version).await.expect("rollback");
    repo.rename_plan("a.md", "b.md").await.expect("rename");

    assert_eq!(
        audit.actions(),
        vec![
            actions::CREATE,
            actions::SUBTASK,
            actions::ROLLBACK,
            actions::RENAME
        ]
    );
}

#[tokio::test]
async fn test_failing_audit_logger_does_not_fail_mutations() {
    let temp_dir = TempDir::new().expect("temp dir");
    let repo = PlanRepositoryBuilder::new()
        .with_plans_dir(temp_dir.path())
        .with_audit_logger(Arc::new(FailingAudit))
        .build()
        .await
        .expect("build");
    create(&repo, "a.md", "# A\n").await;

    let meta = repo
        .update_status("a.md", PlanStatus::InProgress)
        .await
        .expect("status change succeeds without audit");
    assert_eq!(
        meta.frontmatter.expect("frontmatter").status,
        Some(PlanStatus::InProgress)
    );
    let on_disk = fs::read_to_string(temp_dir.path().join("a.md")).expect("read");
    assert!(on_disk.contains("status: in_progress\n"));
    assert_eq!(repo.list_versions("a.md").await.expect("list").len(), 1);

    repo.delete_plan("a.md")
        .await
        .expect("delete succeeds without audit");
    assert!(!temp_dir.path().join("a.md").exists());
    assert!(matches!(
        repo.get_plan("a.md").await.unwrap_err(),
        PlanError::NotFound { .. }
    ));
}

#[tokio::test]
async fn test_migration_handler_is_replaceable() {
    let temp_dir = TempDir::new().expect("temp dir");
    let repo = PlanRepositoryBuilder::new()
        .with_plans_dir(temp_dir.path())
        .with_migration_handler(Arc::new(NoMigration))
        .build()
        .await
        .expect("build");
    create(&repo, "a.md", "---\nstatus: todo\n---\n# A\n").await;

    let report = repo.migrate_all().await.expect("migrate");
    assert_eq!(report.migrated, 0);

    let meta = repo
        .update_status("a.md", PlanStatus::InProgress)
        .await
        .expect("update");
    assert_eq!(meta.frontmatter.expect("frontmatter").schema_version, None);
}
