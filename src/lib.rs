//! vaspfile - VASP input file manager
//!
//! A library for editing VASP calculation inputs: the INCAR key/value
//! configuration format and Slurm batch scripts. Both document types
//! preserve every byte they do not understand and support targeted,
//! position-aware mutation.
//!
//! # Features
//!
//! - Parse INCAR text into an ordered name -> `{value, comment}` mapping,
//!   with `;` statements, inline `#`/`!` comments, backslash continuation
//!   and multi-line quoted values
//! - Edit `#SBATCH` directives, `module` lines, `export` variables, body
//!   commands and comments in a batch script without touching unrelated
//!   lines
//! - Shell-aware rewriting and reordering of per-command options
//! - Packaged INCAR presets and sbatch templates
//! - Workspace orchestration for a calculation directory
//! - Submission through `sbatch` with job-id capture

pub mod error;
pub mod incar;
pub mod model;
pub mod slurm;
pub mod templates;
pub mod utils;
pub mod workspace;

pub use error::{Error, Result};
pub use incar::Incar;
pub use model::ConfigEntry;
pub use slurm::{
    BodyPosition, CommentPosition, LineKind, ModulePosition, SlurmScript, Which,
};
pub use workspace::Workspace;
