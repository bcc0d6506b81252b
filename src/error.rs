//! Crate-wide error type
//!
//! Every fallible operation returns [`Result`]. I/O failures convert
//! automatically; the remaining variants carry enough context to report the
//! failure without re-deriving it at the call site.

use thiserror::Error;

/// Errors from document parsing, path resolution, templates and job
/// submission.
#[derive(Debug, Error)]
pub enum Error {
    /// A command line could not be split into shell tokens, usually because
    /// of an unbalanced quote. The edit that needed the tokens is aborted.
    #[error("cannot tokenize command line: {line:?}")]
    Tokenize { line: String },

    /// A load or save was asked to resolve a default path but no base
    /// directory was ever set.
    #[error("no path given and no base directory set for {filename}")]
    UnresolvedPath { filename: &'static str },

    /// Lookup of a packaged template by a name that is not shipped.
    #[error("unknown template {name:?} (available: {available})")]
    UnknownTemplate { name: String, available: String },

    /// The submission program could not be started at all.
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The submission program ran but exited unsuccessfully.
    #[error("{program} exited with status {code:?}: {stderr}")]
    SubmitFailed {
        program: String,
        code: Option<i32>,
        stdout: String,
        stderr: String,
    },

    /// The submission succeeded but no job id could be parsed from the
    /// output.
    #[error("no job id found in submission output: {stdout:?}")]
    JobId { stdout: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
