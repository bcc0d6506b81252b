//! # Slurm Script Regex Patterns
//!
//! All regex patterns for recognizing the structured line shapes inside a
//! batch script. Everything that matches none of them passes through
//! byte-for-byte.
//!
//! Patterns apply to the *trimmed* line. Per-name variants are built on
//! demand with the name escaped.

use lazy_static::lazy_static;
use regex::Regex;

/// Marker that opens a scheduler directive line.
pub const SBATCH_PREFIX: &str = "#SBATCH";

lazy_static! {
    /// Matches any directive: `#SBATCH --name` or `#SBATCH --name=value`
    ///
    /// Captures:
    /// - Group 1: directive name (no `=` or whitespace)
    /// - Group 2: value, absent for bare directives
    pub static ref DIRECTIVE_RE: Regex = Regex::new(
        r"^#SBATCH\s+--([^=\s]+)(?:=(.*))?\s*$"
    ).unwrap();

    /// Matches an environment export: `export KEY=VALUE`
    ///
    /// Captures:
    /// - Group 1: variable name (identifier characters only)
    /// - Group 2: value (everything after `=`)
    pub static ref EXPORT_RE: Regex = Regex::new(
        r"^export\s+([A-Za-z_][A-Za-z0-9_]*)=(.*)$"
    ).unwrap();

    /// Matches the job id line printed by sbatch on success.
    ///
    /// Captures:
    /// - Group 1: job id digits
    pub static ref JOB_ID_RE: Regex = Regex::new(
        r"Submitted batch job (\d+)"
    ).unwrap();
}

/// Pattern matching a directive line for one specific name, with or
/// without a value.
pub fn directive_line_re(name: &str) -> Regex {
    Regex::new(&format!(
        r"^#SBATCH\s+--{}(?:=.*)?\s*$",
        regex::escape(name)
    ))
    .unwrap()
}

/// Pattern matching an export line for one specific variable.
pub fn export_line_re(key: &str) -> Regex {
    Regex::new(&format!(
        r"^export\s+{}(?:=.*)?\s*$",
        regex::escape(key)
    ))
    .unwrap()
}
