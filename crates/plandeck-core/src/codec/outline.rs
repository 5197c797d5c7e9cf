//! Markdown outline extraction for list views: title, sections, preview.

/// Number of characters kept in a preview before it is cut with `...`.
pub const PREVIEW_LENGTH: usize = 200;

/// Title used when the body has no `# ` heading.
pub const UNTITLED: &str = "Untitled";

/// Labels that introduce a related project path, checked in order.
const PROJECT_LABELS: [&str; 3] = ["プロジェクト", "project", "path"];

fn heading(line: &str, marker: &str) -> Option<String> {
    let rest = line.strip_prefix(marker)?;
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let text = rest.trim();
    (!text.is_empty()).then(|| text.to_string())
}

/// First level-one heading of the body.
pub fn title(body: &str) -> String {
    body.lines()
        .find_map(|line| heading(line, "#"))
        .unwrap_or_else(|| UNTITLED.to_string())
}

/// All level-two headings in document order.
pub fn sections(body: &str) -> Vec<String> {
    body.lines().filter_map(|line| heading(line, "##")).collect()
}

/// Collapsed prose following the title, skipping headings, code fences,
/// tables and list items.
pub fn preview(body: &str, length: usize) -> String {
    let lines: Vec<&str> = body.split('\n').collect();
    let start = lines
        .iter()
        .position(|line| heading(line, "#").is_some())
        .map_or(0, |i| i + 1);

    let text = lines[start..]
        .iter()
        .filter(|line| !line.starts_with(['#', '|', '`', '-', '*']))
        .flat_map(|line| line.split_whitespace())
        .collect::<Vec<_>>()
        .join(" ");

    if text.chars().count() > length {
        let cut: String = text.chars().take(length).collect();
        format!("{cut}...")
    } else {
        text
    }
}

/// Project path mentioned as `Project: <path>` or `path: <path>`.
pub fn related_project(body: &str) -> Option<String> {
    PROJECT_LABELS
        .iter()
        .find_map(|label| body.lines().find_map(|line| labelled_value(line, label)))
}

fn labelled_value(line: &str, label: &str) -> Option<String> {
    let lower = line.to_lowercase();
    // Lowercasing can change byte offsets for non-ASCII text; only trust
    // positions when the lengths agree.
    if lower.len() != line.len() {
        return None;
    }

    let mut from = 0;
    while let Some(found) = lower[from..].find(label) {
        let after = from + found + label.len();
        let rest = line.get(after..)?;
        if let Some(value) = rest
            .strip_prefix(':')
            .or_else(|| rest.strip_prefix('：'))
            .and_then(project_value)
        {
            return Some(value);
        }
        from = after;
    }
    None
}

fn project_value(rest: &str) -> Option<String> {
    let rest = rest.trim_start();
    let rest = rest.strip_prefix('`').unwrap_or(rest);
    let value = rest.split('`').next().unwrap_or_default().trim();
    (!value.is_empty()).then(|| value.to_string())
}
