//! INCAR configuration document
//!
//! An [`Incar`] is an ordered mapping from parameter name to
//! [`ConfigEntry`], created empty or by parsing INCAR text, mutated in
//! place and serialized back on demand. Everything the parser does not
//! understand is dropped best-effort; see [`parse`] for the codec rules.

mod parse;
mod scan;

pub use parse::{config_to_text, parse_config_text};
pub use scan::{split_comment, split_statements};

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use log::{info, warn};

use crate::error::{Error, Result};
use crate::model::ConfigEntry;
use crate::templates;
use crate::utils::path::{read_file, write_file};

/// Ordered INCAR document.
///
/// Insertion order is the order names were first introduced; overwriting a
/// name keeps its original position. The optional base directory is the
/// default location for [`load`](Incar::load) and [`save`](Incar::save)
/// when no explicit path is given.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Incar {
    data: IndexMap<String, ConfigEntry>,
    base_dir: Option<PathBuf>,
}

impl Incar {
    /// Default on-disk filename.
    pub const FILENAME: &'static str = "INCAR";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            data: IndexMap::new(),
            base_dir: Some(base_dir.into()),
        }
    }

    pub fn from_text(text: &str) -> Self {
        Self {
            data: parse_config_text(text),
            base_dir: None,
        }
    }

    pub fn set_base_dir(&mut self, base_dir: impl Into<PathBuf>) {
        self.base_dir = Some(base_dir.into());
    }

    // ------------------------------------------------------------------
    // Mapping surface
    // ------------------------------------------------------------------

    pub fn get(&self, name: &str) -> Option<&ConfigEntry> {
        self.data.get(name)
    }

    /// Insert or overwrite an entry. An existing name keeps its position.
    pub fn set(&mut self, name: impl Into<String>, entry: ConfigEntry) {
        self.data.insert(name.into(), entry);
    }

    /// Shorthand for setting a value with no comment.
    pub fn set_value(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.set(name, ConfigEntry::bare(value));
    }

    /// Remove an entry, preserving the order of the remaining ones.
    pub fn remove(&mut self, name: &str) -> Option<ConfigEntry> {
        self.data.shift_remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.data.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ConfigEntry)> {
        self.data.iter()
    }

    /// Direct access to the underlying ordered mapping.
    pub fn entries(&self) -> &IndexMap<String, ConfigEntry> {
        &self.data
    }

    pub fn extend(&mut self, other: impl IntoIterator<Item = (String, ConfigEntry)>) {
        self.data.extend(other);
    }

    // ------------------------------------------------------------------
    // Codec
    // ------------------------------------------------------------------

    /// Render the document as INCAR text.
    pub fn as_text(&self) -> String {
        config_to_text(&self.data)
    }

    /// Replace the document content by parsing `text`.
    pub fn set_text(&mut self, text: &str) {
        self.data = parse_config_text(text);
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

    /// Load from disk, or start empty when the file is missing.
    pub fn load(&mut self, path: Option<&Path>) -> Result<()> {
        let path = self.resolve_path(path)?;

        if !path.exists() {
            warn!(
                "INCAR not found at {}, starting with empty configuration",
                path.display()
            );
            self.data.clear();
            return Ok(());
        }

        let text = read_file(&path)?;
        self.data = parse_config_text(&text);
        info!("loaded INCAR from {}", path.display());
        Ok(())
    }

    /// Write to disk, creating parent directories as needed.
    pub fn save(&self, path: Option<&Path>) -> Result<()> {
        let path = self.resolve_path(path)?;
        let is_new = !path.exists();

        write_file(&path, &self.as_text())?;

        if is_new {
            info!("created new INCAR at {}", path.display());
        } else {
            info!("updated INCAR at {}", path.display());
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Templates
    // ------------------------------------------------------------------

    /// Merge a packaged template into the document.
    ///
    /// With `overwrite` set, template entries replace existing ones;
    /// otherwise existing entries win.
    pub fn apply_template(&mut self, name: &str, overwrite: bool) -> Result<()> {
        let tmpl = templates::load_incar_template(name)?;
        let added = tmpl.len();

        if overwrite {
            self.data.extend(tmpl.data);
        } else {
            for (key, value) in tmpl.data {
                self.data.entry(key).or_insert(value);
            }
        }

        info!(
            "applied INCAR template {:?} (overwrite={}, +{} keys, total={})",
            name,
            overwrite,
            added,
            self.len()
        );
        Ok(())
    }
}

impl IntoIterator for Incar {
    type Item = (String, ConfigEntry);
    type IntoIter = indexmap::map::IntoIter<String, ConfigEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.into_iter()
    }
}
