//! Entry data structure for INCAR configuration items

use serde::{Deserialize, Serialize};

/// A single `name = value` entry with its trailing comment.
///
/// # Field Semantics
/// - `value`: the raw text right of the first `=`, trimmed. Multi-line
///   quoted blocks store their lines joined by `\n`.
/// - `comment`: inline comment text after `#` or `!`, without the marker,
///   trimmed. Empty when the statement carried no comment.
///
/// Entries are owned by the [`Incar`](crate::Incar) document that parsed
/// them; the document preserves first-introduction order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigEntry {
    pub value: String,
    pub comment: String,
}

impl ConfigEntry {
    pub fn new(value: impl Into<String>, comment: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            comment: comment.into(),
        }
    }

    /// Entry with no trailing comment.
    pub fn bare(value: impl Into<String>) -> Self {
        Self::new(value, "")
    }

    /// Multi-line values serialize as a quoted block instead of `name = value`.
    pub fn is_multiline(&self) -> bool {
        self.value.contains('\n')
    }
}
