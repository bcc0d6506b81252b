//! INCAR text codec
//!
//! Turns raw INCAR text into an ordered name -> entry mapping and back.
//! Parsing is best-effort: statements without `=` are dropped, unterminated
//! quoted blocks commit whatever accumulated. Nothing here is a hard error.

use indexmap::IndexMap;
use log::debug;

use super::scan;
use crate::model::ConfigEntry;

/// Accumulator for a quoted value that spans several logical lines.
struct MultilineValue {
    name: String,
    segments: Vec<String>,
    comment: String,
}

impl MultilineValue {
    fn commit(self, result: &mut IndexMap<String, ConfigEntry>) {
        if self.name.is_empty() {
            return;
        }
        result.insert(
            self.name,
            ConfigEntry::new(self.segments.join("\n"), self.comment),
        );
    }
}

/// Merge backslash-continued raw lines into logical lines.
///
/// A line ending in `\` (after trailing-whitespace trim) has the backslash
/// removed and the next raw line appended with a single space; chains longer
/// than two lines are merged the same way. A dangling continuation at EOF is
/// kept as its own logical line.
fn merge_continuations(text: &str) -> Vec<String> {
    let mut logical = Vec::new();
    let mut continuation: Option<String> = None;

    for raw in text.lines() {
        let stripped = raw.trim_end();
        match continuation.take() {
            Some(mut acc) => {
                if let Some(head) = stripped.strip_suffix('\\') {
                    acc.push(' ');
                    acc.push_str(head.trim());
                    continuation = Some(acc);
                } else {
                    acc.push(' ');
                    acc.push_str(raw.trim());
                    logical.push(acc);
                }
            }
            None => {
                if let Some(head) = stripped.strip_suffix('\\') {
                    continuation = Some(head.to_string());
                } else {
                    logical.push(raw.to_string());
                }
            }
        }
    }

    if let Some(acc) = continuation {
        logical.push(acc);
    }
    logical
}

/// Parse INCAR-style text into an ordered mapping.
///
/// Handles `name = value` lines, `;`-separated statements, inline `#`/`!`
/// comments outside quotes, backslash continuation and multi-line quoted
/// values. Re-parsing a name overwrites the entry in place, keeping its
/// original position.
pub fn parse_config_text(text: &str) -> IndexMap<String, ConfigEntry> {
    debug!("parse_config_text: starting parse, text length={}", text.len());

    let mut result: IndexMap<String, ConfigEntry> = IndexMap::new();
    let mut multiline: Option<MultilineValue> = None;

    for line in merge_continuations(text) {
        let stripped = line.trim();

        if let Some(mut state) = multiline.take() {
            if let Some(quote_at) = stripped.find('"') {
                let before = &stripped[..quote_at];
                if !before.is_empty() {
                    state.segments.push(before.to_string());
                }
                let (_, extra_comment) = scan::split_comment(&stripped[quote_at + 1..]);
                if !extra_comment.is_empty() {
                    state.comment = extra_comment.to_string();
                }
                state.commit(&mut result);
            } else {
                state.segments.push(stripped.to_string());
                multiline = Some(state);
            }
            continue;
        }

        if stripped.is_empty() || stripped.starts_with('#') || stripped.starts_with('!') {
            continue;
        }
        if !stripped.contains('=') {
            continue;
        }

        let (code, comment) = scan::split_comment(stripped);
        let statements = scan::split_statements(code);
        let last_idx = statements.len() - 1;

        for (idx, stmt) in statements.iter().enumerate() {
            let stmt = stmt.trim();
            let (name, value) = match stmt.split_once('=') {
                Some((name, value)) => (name.trim(), value.trim()),
                None => continue,
            };
            if name.is_empty() {
                continue;
            }

            // Only the last statement on the line owns the trailing comment.
            let stmt_comment = if idx == last_idx { comment } else { "" };

            if let Some(rest) = value.strip_prefix('"') {
                if let Some(close_at) = rest.find('"') {
                    // Quoted value closed on the same line; anything after the
                    // closing quote may still carry a comment marker.
                    let (_, extra_comment) = scan::split_comment(&rest[close_at + 1..]);
                    let final_comment = if stmt_comment.is_empty() {
                        extra_comment
                    } else {
                        stmt_comment
                    };
                    result.insert(
                        name.to_string(),
                        ConfigEntry::new(&rest[..close_at], final_comment),
                    );
                } else {
                    let mut state = MultilineValue {
                        name: name.to_string(),
                        segments: Vec::new(),
                        comment: stmt_comment.to_string(),
                    };
                    if !rest.is_empty() {
                        state.segments.push(rest.to_string());
                    }
                    multiline = Some(state);
                }
            } else {
                result.insert(name.to_string(), ConfigEntry::new(value, stmt_comment));
            }
        }
    }

    // Unterminated block at EOF is committed as-is, not an error.
    if let Some(state) = multiline {
        state.commit(&mut result);
    }

    debug!("parse_config_text: finished, parsed {} entries", result.len());
    result
}

/// Serialize an ordered mapping back into INCAR text.
///
/// Single-line values render as `name = value`; multi-line values as a
/// three-part quoted block. Lines are joined with `\n` without a trailing
/// newline. A single-line value parsed from a quoted literal loses its
/// quotes here; quoting is only reproduced for multi-line values.
pub fn config_to_text(entries: &IndexMap<String, ConfigEntry>) -> String {
    let mut lines: Vec<String> = Vec::new();

    for (name, entry) in entries {
        let comment = entry.comment.trim();
        if entry.is_multiline() {
            lines.push(format!("{} = \"", name));
            lines.extend(entry.value.lines().map(str::to_string));
            let mut closing = String::from("\"");
            if !comment.is_empty() {
                closing.push_str(" # ");
                closing.push_str(comment);
            }
            lines.push(closing);
        } else {
            let mut line = format!("{} = {}", name, entry.value);
            if !comment.is_empty() {
                line.push_str(" # ");
                line.push_str(comment);
            }
            lines.push(line);
        }
    }

    lines.join("\n")
}
