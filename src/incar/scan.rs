//! Quote-aware scanning helpers for INCAR logical lines

/// Split a logical line into code and trailing comment.
///
/// A `#` or `!` starts a comment only while an even number of double quotes
/// has been seen so far. Quote state toggles on every `"`; backslash-escaped
/// quotes are not honored (historical behavior kept on purpose).
///
/// Returns `(code, comment)` where `comment` is trimmed and empty when no
/// marker exists outside quotes. `code` is left untrimmed.
pub fn split_comment(line: &str) -> (&str, &str) {
    let mut in_quotes = false;
    for (idx, ch) in line.char_indices() {
        match ch {
            '"' => in_quotes = !in_quotes,
            '#' | '!' if !in_quotes => {
                return (&line[..idx], line[idx + 1..].trim());
            }
            _ => {}
        }
    }
    (line, "")
}

/// Split the code portion of a line into `;`-separated statements.
///
/// Separators inside double quotes are ignored. Always returns at least one
/// element (the whole input when no unquoted `;` exists); empty segments are
/// kept and filtered by the caller.
pub fn split_statements(code: &str) -> Vec<&str> {
    let mut statements = Vec::new();
    let mut in_quotes = false;
    let mut start = 0;

    for (idx, ch) in code.char_indices() {
        match ch {
            '"' => in_quotes = !in_quotes,
            ';' if !in_quotes => {
                statements.push(&code[start..idx]);
                start = idx + 1;
            }
            _ => {}
        }
    }
    statements.push(&code[start..]);
    statements
}
