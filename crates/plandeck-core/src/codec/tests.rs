#[cfg(test)]
mod codec_tests {
    use crate::codec::{decode, decode_with_diagnostics, encode, FieldOutcome};
    use crate::models::{PlanFile, PlanFrontmatter, PlanStatus, Priority, Subtask, SubtaskStatus};

    fn frontmatter_of(text: &str) -> PlanFrontmatter {
        decode(text).frontmatter.expect("frontmatter block present")
    }

    #[test]
    fn test_decode_inline_and_block_lists_agree() {
        let inline = frontmatter_of("---\nblockedBy: [a.md, b.md]\n---\n");
        let block = frontmatter_of("---\nblockedBy:\n  - a.md\n  - b.md\n---\n");
        assert_eq!(inline.blocked_by, vec!["a.md", "b.md"]);
        assert_eq!(inline, block);
    }

    #[test]
    fn test_decode_scalar_list_value_is_single_item() {
        let fm = frontmatter_of("---\ntags: backend\n---\n");
        assert_eq!(fm.tags, vec!["backend"]);
    }

    #[test]
    fn test_decode_subtasks() {
        let text = "---\nstatus: in_progress\nsubtasks:\n  - id: st-1\n    title: \"Design API\"\n    status: done\n  - id: st-2\n    title: Write tests\n    assignee: sam\n---\n# Body\n";
        let decoded = decode_with_diagnostics(text);
        let fm = decoded.file.frontmatter.expect("frontmatter");

        assert!(decoded.diagnostics.is_empty());
        assert_eq!(fm.status, Some(PlanStatus::InProgress));
        assert_eq!(
            fm.subtasks,
            vec![
                Subtask {
                    id: "st-1".to_string(),
                    title: "Design API".to_string(),
                    status: SubtaskStatus::Done,
                    assignee: None,
                    due_date: None,
                },
                Subtask {
                    id: "st-2".to_string(),
                    title: "Write tests".to_string(),
                    status: SubtaskStatus::Todo,
                    assignee: Some("sam".to_string()),
                    due_date: None,
                },
            ]
        );
        assert_eq!(decoded.file.body, "# Body\n");
    }

    #[test]
    fn test_decode_subtask_without_title_is_dropped() {
        let decoded = decode_with_diagnostics(
            "---\nsubtasks:\n  - id: st-1\n  - id: st-2\n    title: Kept\n---\n",
        );
        let fm = decoded.file.frontmatter.expect("frontmatter");
        assert_eq!(fm.subtasks.len(), 1);
        assert_eq!(fm.subtasks[0].id, "st-2");
        assert_eq!(decoded.diagnostics.len(), 1);
        assert_eq!(decoded.diagnostics[0].key, "subtasks");
        assert_eq!(decoded.diagnostics[0].line, 3);
    }

    #[test]
    fn test_decode_unknown_priority_is_dropped_with_diagnostic() {
        let decoded = decode_with_diagnostics("---\npriority: super_high\nstatus: review\n---\n");
        let fm = decoded.file.frontmatter.expect("frontmatter");

        assert_eq!(fm.priority, None);
        assert_eq!(fm.status, Some(PlanStatus::Review));
        assert_eq!(decoded.diagnostics.len(), 1);
        assert_eq!(decoded.diagnostics[0].line, 2);
        assert_eq!(
            decoded.diagnostics[0].outcome,
            FieldOutcome::Malformed {
                raw: "super_high".to_string()
            }
        );
    }

    #[test]
    fn test_decode_normalizes_status_aliases() {
        assert_eq!(
            frontmatter_of("---\nstatus: In-Progress\n---\n").status,
            Some(PlanStatus::InProgress)
        );
        let decoded = decode_with_diagnostics("---\nstatus: blocked\n---\n");
        assert_eq!(
            decoded.file.frontmatter.and_then(|fm| fm.status),
            Some(PlanStatus::Todo)
        );
        assert_eq!(decoded.diagnostics.len(), 1);
    }

    #[test]
    fn test_decode_unknown_key_is_ignored() {
        let decoded = decode_with_diagnostics("---\nowner: sam\nestimate: 3d\n---\n");
        let fm = decoded.file.frontmatter.expect("frontmatter");
        assert_eq!(fm.estimate.as_deref(), Some("3d"));
        assert_eq!(decoded.diagnostics[0].key, "owner");
        assert_eq!(decoded.diagnostics[0].outcome, FieldOutcome::Ignored);
    }

    #[test]
    fn test_decode_accepts_camel_case_aliases() {
        let fm = frontmatter_of("---\nprojectPath: /srv/app\nsessionId: abc\n---\n");
        assert_eq!(fm.project_path.as_deref(), Some("/srv/app"));
        assert_eq!(fm.session_id.as_deref(), Some("abc"));
    }

    #[test]
    fn test_absent_block_differs_from_empty_block() {
        let absent = decode("# Plan\n");
        let empty = decode("---\n---\n# Plan\n");

        assert_eq!(absent.frontmatter, None);
        assert_eq!(empty.frontmatter, Some(PlanFrontmatter::default()));
        assert_eq!(absent.body, empty.body);
    }

    #[test]
    fn test_text_without_closing_delimiter_is_body() {
        let text = "---\nstatus: todo\n# Not a block\n";
        let file = decode(text);
        assert_eq!(file.frontmatter, None);
        assert_eq!(file.body, text);
    }

    #[test]
    fn test_encode_without_frontmatter_returns_body() {
        let file = PlanFile::without_frontmatter("# Plan\nBody\n");
        assert_eq!(encode(&file), "# Plan\nBody\n");
    }

    #[test]
    fn test_encode_empty_frontmatter() {
        let file = PlanFile::with_frontmatter(PlanFrontmatter::default(), "# Plan\n");
        assert_eq!(encode(&file), "---\n---\n# Plan\n");
    }

    #[test]
    fn test_encode_field_order_and_quoting() {
        let fm = PlanFrontmatter {
            status: Some(PlanStatus::Review),
            priority: Some(Priority::High),
            created: Some("2026-01-01T00:00:00Z".to_string()),
            tags: vec!["api".to_string()],
            schema_version: Some(1),
            assignee: Some(String::new()),
            ..Default::default()
        };
        let text = encode(&PlanFile::with_frontmatter(fm, ""));
        assert_eq!(
            text,
            "---\ncreated: \"2026-01-01T00:00:00Z\"\nstatus: review\npriority: high\ntags:\n  - \"api\"\nschemaVersion: 1\n---\n"
        );
    }

    #[test]
    fn test_value_round_trip() {
        let text = "---\nstatus: todo\npriority: low\ndueDate: 2026-03-01\ntags: [a, 'b c']\nblockedBy:\n  - x.md\nsubtasks:\n  - id: st-1\n    title: 'One'\n    dueDate: 2026-02-01\nschemaVersion: 1\n---\n# Body\n\nText\n";
        let once = decode(text);
        let twice = decode(&encode(&once));
        assert_eq!(once, twice);
        assert_eq!(encode(&twice), encode(&once));
    }

    /// Round-trip cases: name, input text, and what the first decode must yield.
    const ROUND_TRIP_CASES: &[(&str, &str, fn(&PlanFile))] = &[
        (
            "quoted values keep colons and hashes",
            "---\nassignee: \"ops: on-call # primary\"\nestimate: '2h # rough'\n---\n# Body\n",
            |file| {
                let fm = file.frontmatter.as_ref().expect("block");
                assert_eq!(fm.assignee.as_deref(), Some("ops: on-call # primary"));
                assert_eq!(fm.estimate.as_deref(), Some("2h # rough"));
            },
        ),
        (
            "empty list items are dropped",
            "---\ntags: [a, , 'b']\nblockedBy: []\n---\n",
            |file| {
                let fm = file.frontmatter.as_ref().expect("block");
                assert_eq!(fm.tags, vec!["a", "b"]);
                assert!(fm.blocked_by.is_empty());
            },
        ),
        (
            "scalar on a list field is one item",
            "---\ntags: urgent\nblockedBy: \"x.md\"\n---\nbody\n",
            |file| {
                let fm = file.frontmatter.as_ref().expect("block");
                assert_eq!(fm.tags, vec!["urgent"]);
                assert_eq!(fm.blocked_by, vec!["x.md"]);
            },
        ),
        (
            "subtasks with assignee and due date",
            "---\nsubtasks:\n  - id: st-1\n    title: Write\n    status: done\n    assignee: sam\n    dueDate: 2026-11-01\n  - id: st-2\n    title: \"Review: part 2\"\n---\n",
            |file| {
                let fm = file.frontmatter.as_ref().expect("block");
                assert_eq!(
                    fm.subtasks,
                    vec![
                        Subtask {
                            id: "st-1".to_string(),
                            title: "Write".to_string(),
                            status: SubtaskStatus::Done,
                            assignee: Some("sam".to_string()),
                            due_date: Some("2026-11-01".to_string()),
                        },
                        Subtask {
                            id: "st-2".to_string(),
                            title: "Review: part 2".to_string(),
                            status: SubtaskStatus::Todo,
                            assignee: None,
                            due_date: None,
                        },
                    ]
                );
            },
        ),
        (
            "unknown and malformed status and priority",
            "---\nstatus: Someday\npriority: super_high\nflavor: mint\n---\n# B\n",
            |file| {
                let fm = file.frontmatter.as_ref().expect("block");
                assert_eq!(fm.status, Some(PlanStatus::Todo));
                assert_eq!(fm.priority, None);
            },
        ),
        (
            "status aliases normalize",
            "---\nstatus: In-Progress\npriority: critical\n---\n",
            |file| {
                let fm = file.frontmatter.as_ref().expect("block");
                assert_eq!(fm.status, Some(PlanStatus::InProgress));
                assert_eq!(fm.priority, Some(Priority::Critical));
            },
        ),
        (
            "body that starts with a delimiter line",
            "---\nstatus: review\n---\n---\nnot: a field\n---\n",
            |file| {
                assert!(file.frontmatter.is_some());
                assert_eq!(file.body, "---\nnot: a field\n---\n");
            },
        ),
        (
            "unclosed block is all body",
            "---\nstatus: review\n# Never closed\n",
            |file| {
                assert!(file.frontmatter.is_none());
                assert_eq!(file.body, "---\nstatus: review\n# Never closed\n");
            },
        ),
    ];

    #[test]
    fn test_round_trip_cases() {
        for (name, text, check) in ROUND_TRIP_CASES {
            let once = decode(text);
            check(&once);

            let encoded = encode(&once);
            let twice = decode(&encoded);
            assert_eq!(twice, once, "{name}: decode(encode(x)) differs");
            assert_eq!(encode(&twice), encoded, "{name}: encoding is not stable");
        }
    }

    #[test]
    fn test_malformed_field_leaves_body_untouched() {
        let text = "---\npriority: ???\n---\n# Body\n---\nnot a block\n";
        let file = decode(text);
        assert_eq!(file.body, "# Body\n---\nnot a block\n");
    }
}
