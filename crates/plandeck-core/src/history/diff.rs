//! Line-oriented diff based on the longest common subsequence.

use crate::models::{DiffLine, DiffLineKind, DiffResult, DiffStats};

/// Diff two contents line by line.
///
/// Lines are split on `\n` only, so a trailing newline yields a final empty
/// line on both sides. Before each common line the removed lines are emitted,
/// then the added ones. Equal-length edit scripts are broken the same way on
/// every call.
pub fn compute_diff(
    old_content: &str,
    new_content: &str,
    from_label: impl Into<String>,
    to_label: impl Into<String>,
) -> DiffResult {
    let old_lines: Vec<&str> = old_content.split('\n').collect();
    let new_lines: Vec<&str> = new_content.split('\n').collect();

    let mut builder = DiffBuilder::default();
    let (mut old_idx, mut new_idx) = (0, 0);

    for (oi, ni) in common_subsequence(&old_lines, &new_lines) {
        builder.extend(DiffLineKind::Removed, &old_lines[old_idx..oi]);
        builder.extend(DiffLineKind::Added, &new_lines[new_idx..ni]);
        builder.push(DiffLineKind::Unchanged, old_lines[oi]);
        old_idx = oi + 1;
        new_idx = ni + 1;
    }
    builder.extend(DiffLineKind::Removed, &old_lines[old_idx..]);
    builder.extend(DiffLineKind::Added, &new_lines[new_idx..]);

    let stats = builder.stats();
    DiffResult {
        from_version: from_label.into(),
        to_version: to_label.into(),
        lines: builder.lines,
        stats,
    }
}

#[derive(Default)]
struct DiffBuilder {
    lines: Vec<DiffLine>,
}

impl DiffBuilder {
    fn push(&mut self, kind: DiffLineKind, content: &str) {
        self.lines.push(DiffLine {
            line_number: self.lines.len() + 1,
            kind,
            content: content.to_string(),
        });
    }

    fn extend(&mut self, kind: DiffLineKind, contents: &[&str]) {
        for content in contents {
            self.push(kind, content);
        }
    }

    /// Counted from the emitted lines so the totals always agree with them.
    fn stats(&self) -> DiffStats {
        self.lines
            .iter()
            .fold(DiffStats::default(), |mut stats, line| {
                match line.kind {
                    DiffLineKind::Added => stats.added += 1,
                    DiffLineKind::Removed => stats.removed += 1,
                    DiffLineKind::Unchanged => stats.unchanged += 1,
                }
                stats
            })
    }
}

/// Index pairs `(old, new)` of one longest common subsequence, ascending.
fn common_subsequence(old: &[&str], new: &[&str]) -> Vec<(usize, usize)> {
    let (m, n) = (old.len(), new.len());
    let width = n + 1;
    let mut table = vec![0u32; (m + 1) * width];

    for i in 1..=m {
        for j in 1..=n {
            table[i * width + j] = if old[i - 1] == new[j - 1] {
                table[(i - 1) * width + j - 1] + 1
            } else {
                table[(i - 1) * width + j].max(table[i * width + j - 1])
            };
        }
    }

    let mut pairs = Vec::new();
    let (mut i, mut j) = (m, n);
    while i > 0 && j > 0 {
        if old[i - 1] == new[j - 1] {
            pairs.push((i - 1, j - 1));
            i -= 1;
            j -= 1;
        } else if table[(i - 1) * width + j] > table[i * width + j - 1] {
            i -= 1;
        } else {
            j -= 1;
        }
    }
    pairs.reverse();
    pairs
}
