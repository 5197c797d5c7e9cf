#[cfg(test)]
mod model_tests {
    use std::str::FromStr;

    use crate::models::{
        BulkResult, PlanFrontmatter, PlanStatus, Priority, Subtask, SubtaskProgress,
        SubtaskStatus,
    };

    fn create_test_subtask(id: &str, status: SubtaskStatus) -> Subtask {
        Subtask {
            id: id.to_string(),
            title: format!("Subtask {id}"),
            status,
            assignee: None,
            due_date: None,
        }
    }

    #[test]
    fn test_plan_status_round_trips_through_literal() {
        for status in PlanStatus::ALL {
            assert_eq!(PlanStatus::from_str(status.as_str()), Ok(status));
            assert_eq!(format!("{status}"), status.as_str());
        }
    }

    #[test]
    fn test_plan_status_from_str_is_strict() {
        assert!(PlanStatus::from_str("In-Progress").is_err());
        assert!(PlanStatus::from_str("done").is_err());
    }

    #[test]
    fn test_plan_status_normalize_aliases() {
        assert_eq!(PlanStatus::normalize("In-Progress"), Some(PlanStatus::InProgress));
        assert_eq!(PlanStatus::normalize("in progress"), Some(PlanStatus::InProgress));
        assert_eq!(PlanStatus::normalize("DONE"), Some(PlanStatus::Completed));
        assert_eq!(PlanStatus::normalize("in_review"), Some(PlanStatus::Review));
        assert_eq!(PlanStatus::normalize("blocked"), None);
    }

    #[test]
    fn test_priority_rejects_unknown_literal() {
        assert_eq!(Priority::from_str("critical"), Ok(Priority::Critical));
        assert!(Priority::from_str("super_high").is_err());
    }

    #[test]
    fn test_subtask_status_toggle_and_icon() {
        assert_eq!(SubtaskStatus::Todo.toggled(), SubtaskStatus::Done);
        assert_eq!(SubtaskStatus::Done.toggled(), SubtaskStatus::Todo);
        assert_eq!(SubtaskStatus::Done.with_icon(), "✓ Done");
        assert_eq!(SubtaskStatus::Todo.with_icon(), "○ Todo");
    }

    #[test]
    fn test_effective_status_defaults_to_todo() {
        let frontmatter = PlanFrontmatter::default();
        assert_eq!(frontmatter.effective_status(), PlanStatus::Todo);
    }

    #[test]
    fn test_subtask_progress_rounds_percentage() {
        let subtasks = vec![
            create_test_subtask("a", SubtaskStatus::Done),
            create_test_subtask("b", SubtaskStatus::Todo),
            create_test_subtask("c", SubtaskStatus::Todo),
        ];
        let progress = SubtaskProgress::of(&subtasks);
        assert_eq!(progress.done, 1);
        assert_eq!(progress.total, 3);
        assert_eq!(progress.percentage, 33);
    }

    #[test]
    fn test_subtask_progress_empty() {
        assert_eq!(SubtaskProgress::of(&[]), SubtaskProgress::default());
    }

    #[test]
    fn test_subtask_index_finds_by_id() {
        let frontmatter = PlanFrontmatter {
            subtasks: vec![
                create_test_subtask("st-1", SubtaskStatus::Todo),
                create_test_subtask("st-2", SubtaskStatus::Done),
            ],
            ..Default::default()
        };
        assert_eq!(frontmatter.subtask_index("st-2"), Some(1));
        assert_eq!(frontmatter.subtask_index("missing"), None);
    }

    #[test]
    fn test_frontmatter_serializes_camel_case() {
        let frontmatter = PlanFrontmatter {
            due_date: Some("2026-03-01".to_string()),
            blocked_by: vec!["a.md".to_string()],
            status: Some(PlanStatus::InProgress),
            ..Default::default()
        };
        let json = serde_json::to_value(&frontmatter).expect("serialize frontmatter");
        assert_eq!(json["dueDate"], "2026-03-01");
        assert_eq!(json["blockedBy"][0], "a.md");
        assert_eq!(json["status"], "in_progress");
        assert!(json.get("tags").is_none());
    }

    #[test]
    fn test_bulk_result_partitions() {
        let mut result = BulkResult::default();
        result.push_success("a.md");
        assert!(result.is_complete());
        result.push_failure("b.md", "Plan not found: b.md");
        assert!(!result.is_complete());
        assert_eq!(result.failed[0].filename, "b.md");
    }
}
