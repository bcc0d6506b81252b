//! Slurm batch script document
//!
//! A [`SlurmScript`] holds a script as an ordered sequence of raw lines and
//! edits it in place: directives, module loads, environment exports, body
//! commands and comments each have structured operations with their own
//! insertion policy. Lines that match no recognized shape pass through
//! byte-for-byte.

pub mod patterns;

mod command;
mod comment;
mod directive;
mod env;
mod module_line;
mod submit;

use std::path::{Path, PathBuf};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::templates;
use crate::utils::path::{read_file, write_file};

/// Which matching lines an edit applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Which {
    First,
    All,
}

/// Where a body command is inserted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BodyPosition {
    End,
    Top,
}

/// Where a standalone comment is inserted. `Top` lands after the shebang
/// when one exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommentPosition {
    End,
    Top,
}

/// Insertion policy for new module lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModulePosition {
    /// After the last existing module line; appends when none exists.
    AfterLastModule,
    /// Immediately after the shebang, or at the very top without one.
    AfterShebang,
    /// Unconditionally at the end.
    End,
}

/// Structural classification of one script line, computed on demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Shebang,
    Directive,
    Module,
    Export,
    Comment,
    Blank,
    Command,
}

impl LineKind {
    /// Classify a line by shape. `is_first` distinguishes a shebang from an
    /// ordinary comment.
    pub fn of(line: &str, is_first: bool) -> Self {
        let stripped = line.trim();
        if is_first && stripped.starts_with("#!") {
            LineKind::Shebang
        } else if patterns::DIRECTIVE_RE.is_match(stripped) {
            LineKind::Directive
        } else if stripped.starts_with("module ") {
            LineKind::Module
        } else if patterns::EXPORT_RE.is_match(stripped) {
            LineKind::Export
        } else if stripped.starts_with('#') {
            LineKind::Comment
        } else if stripped.is_empty() {
            LineKind::Blank
        } else {
            LineKind::Command
        }
    }
}

/// Line-oriented batch script editor.
///
/// The line sequence is the single source of truth: every lookup rescans it,
/// so indices stay correct across insertions and deletions. Duplicate
/// directive or export names are legal; each operation picks its occurrence
/// by its own policy (see the editor methods).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlurmScript {
    lines: Vec<String>,
    base_dir: Option<PathBuf>,
}

impl SlurmScript {
    /// Default on-disk filename.
    pub const FILENAME: &'static str = "job.slurm";

    /// Minimal script with a bash shebang.
    pub fn new() -> Self {
        Self {
            lines: vec!["#!/bin/bash".to_string()],
            base_dir: None,
        }
    }

    pub fn from_lines(lines: Vec<String>) -> Self {
        Self {
            lines,
            base_dir: None,
        }
    }

    pub fn from_text(text: &str) -> Self {
        debug!("creating SlurmScript from raw text");
        Self::from_lines(text.lines().map(str::to_string).collect())
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("loading SlurmScript from {}", path.display());
        let text = read_file(path)?;
        Ok(Self::from_text(&text))
    }

    /// Create from a packaged sbatch template.
    pub fn from_template(name: &str) -> Result<Self> {
        let text = templates::load_sbatch_template(name)?;
        Ok(Self::from_text(text))
    }

    pub fn with_base_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(base_dir.into());
        self
    }

    pub fn set_base_dir(&mut self, base_dir: impl Into<PathBuf>) {
        self.base_dir = Some(base_dir.into());
    }

    /// Replace the content with a packaged template, re-applying any
    /// previously set `output`, `err` and `chdir` directives.
    pub fn load_template(&mut self, name: &str) -> Result<()> {
        let previous = self.list_directives();
        debug!("loading template {:?} into existing SlurmScript", name);

        let text = templates::load_sbatch_template(name)?;
        self.lines = text.lines().map(str::to_string).collect();

        for key in ["output", "err", "chdir"] {
            if let Some(value) = previous.get(key) {
                self.set_directive(key, value.as_deref());
            }
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Content access
    // ------------------------------------------------------------------

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Replace the whole content from a raw string.
    pub fn set_text(&mut self, text: &str) {
        self.lines = text.lines().map(str::to_string).collect();
    }

    /// Render the script, with a trailing newline.
    pub fn to_text(&self) -> String {
        let mut text = self.lines.join("\n");
        text.push('\n');
        text
    }

    /// Classify the line at `index` by shape.
    pub fn classify(&self, index: usize) -> Option<LineKind> {
        self.lines
            .get(index)
            .map(|line| LineKind::of(line, index == 0))
    }

    // ------------------------------------------------------------------
    // Line-model queries used by every editor
    // ------------------------------------------------------------------

    pub fn has_shebang(&self) -> bool {
        self.lines
            .first()
            .map(|l| l.starts_with("#!"))
            .unwrap_or(false)
    }

    /// First index not occupied by the shebang: 1 when line 0 is a shebang,
    /// 0 otherwise.
    pub fn first_index_after_shebang(&self) -> usize {
        usize::from(self.has_shebang())
    }

    /// Index of the last line satisfying `predicate`.
    pub fn find_last_matching<F>(&self, predicate: F) -> Option<usize>
    where
        F: Fn(&str) -> bool,
    {
        self.lines.iter().rposition(|line| predicate(line))
    }

    /// Insert a raw line at `index`, clamped to the end.
    pub fn insert_line(&mut self, index: usize, line: impl Into<String>) {
        let index = index.min(self.lines.len());
        self.lines.insert(index, line.into());
    }

    /// Replace the raw line at `index`; out-of-range indices are ignored.
    pub fn replace_line(&mut self, index: usize, line: impl Into<String>) {
        if let Some(slot) = self.lines.get_mut(index) {
            *slot = line.into();
        }
    }

    /// Delete every line satisfying `predicate`, returning how many went.
    pub fn remove_lines_matching<F>(&mut self, predicate: F) -> usize
    where
        F: Fn(&str) -> bool,
    {
        let before = self.lines.len();
        self.lines.retain(|line| !predicate(line));
        before - self.lines.len()
    }

    // ------------------------------------------------------------------
    // I/O
    // ------------------------------------------------------------------

    fn resolve_path(&self, path: Option<&Path>) -> Result<PathBuf> {
        if let Some(path) = path {
            return Ok(path.to_path_buf());
        }
        match &self.base_dir {
            Some(dir) => Ok(dir.join(Self::FILENAME)),
            None => Err(Error::UnresolvedPath {
                filename: Self::FILENAME,
            }),
        }
    }

    /// Write the script to disk, creating parent directories as needed.
    pub fn save(&self, path: Option<&Path>) -> Result<()> {
        let path = self.resolve_path(path)?;
        log::info!("saving SlurmScript to {}", path.display());
        write_file(&path, &self.to_text())
    }
}

impl Default for SlurmScript {
    fn default() -> Self {
        Self::new()
    }
}
