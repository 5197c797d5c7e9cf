//! Line-level helpers shared by the decoder.

/// Delimiter line opening and closing a metadata block.
pub(super) const DELIMITER: &str = "---";

/// A metadata block split out of a file.
pub(super) struct RawBlock<'a> {
    /// Text between the delimiter lines
    pub(super) block: &'a str,
    /// Everything after the closing delimiter line
    pub(super) body: &'a str,
}

fn strip_cr(line: &str) -> &str {
    line.strip_suffix('\r').unwrap_or(line)
}

/// Split `text` into block and body.
///
/// Returns `None` unless the first line is exactly `---` and a later line is
/// exactly `---` as well.
pub(super) fn split_block(text: &str) -> Option<RawBlock<'_>> {
    let first_end = text.find('\n')?;
    if strip_cr(&text[..first_end]) != DELIMITER {
        return None;
    }

    let block_start = first_end + 1;
    let mut pos = block_start;
    while pos < text.len() {
        let rest = &text[pos..];
        let (line, next) = match rest.find('\n') {
            Some(i) => (&rest[..i], pos + i + 1),
            None => (rest, text.len()),
        };
        if strip_cr(line) == DELIMITER {
            return Some(RawBlock {
                block: &text[block_start..pos],
                body: &text[next..],
            });
        }
        pos = next;
    }
    None
}

/// Strip one layer of matching single or double quotes.
///
/// The value is trimmed first. No escape sequences are interpreted.
pub(super) fn unquote(value: &str) -> &str {
    let value = value.trim();
    let bytes = value.as_bytes();
    if bytes.len() >= 2 {
        let first = bytes[0];
        if (first == b'"' || first == b'\'') && bytes[bytes.len() - 1] == first {
            return &value[1..value.len() - 1];
        }
    }
    value
}

/// A top-level `key: value` line, or `None` for indented or colon-less lines.
pub(super) fn top_level_field(line: &str) -> Option<(&str, &str)> {
    if line.starts_with(char::is_whitespace) {
        return None;
    }
    let colon = line.find(':')?;
    Some((line[..colon].trim(), line[colon + 1..].trim()))
}

/// The value of an indented `- value` list item.
pub(super) fn list_item(line: &str) -> Option<&str> {
    let trimmed = line.trim_start();
    if trimmed.len() == line.len() {
        return None;
    }
    let rest = trimmed.strip_prefix('-')?;
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let value = rest.trim();
    (!value.is_empty()).then_some(value)
}

/// Split `key: value` where the key is a single word.
pub(super) fn word_key_value(text: &str) -> Option<(&str, &str)> {
    let colon = text.find(':')?;
    let key = &text[..colon];
    if key.is_empty() || !key.chars().all(|c| c.is_alphanumeric() || c == '_') {
        return None;
    }
    Some((key, text[colon + 1..].trim()))
}

/// A `- key: value` line opening a new subtask item.
pub(super) fn subtask_item(line: &str) -> Option<(&str, &str)> {
    list_item(line).and_then(word_key_value)
}

/// A `key: value` continuation line indented by at least four columns.
pub(super) fn subtask_property(line: &str) -> Option<(&str, &str)> {
    let indent = line.len() - line.trim_start().len();
    if indent < 4 {
        return None;
    }
    word_key_value(line.trim_start())
}

/// Inline `[a, b, c]` list contents, or `None` when not bracketed.
pub(super) fn inline_list(value: &str) -> Option<Vec<String>> {
    let inner = value.strip_prefix('[')?.strip_suffix(']')?;
    Some(
        inner
            .split(',')
            .map(unquote)
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect(),
    )
}
