//! Calculation directory orchestration
//!
//! A [`Workspace`] ties an [`Incar`] and a [`SlurmScript`] to a root
//! directory with optional input/output sub-paths. Path resolution and the
//! forced `output`/`err`/`chdir` directives live here so the documents
//! themselves stay pure text-in/text-out.

use std::fs;
use std::path::{Path, PathBuf};

use log::debug;

use crate::error::Result;
use crate::incar::Incar;
use crate::slurm::SlurmScript;

/// Root directory plus optional input/output locations for one calculation.
///
/// Relative input/output paths are joined onto the root; absolute ones are
/// used as-is; unset ones fall back to the root.
#[derive(Debug)]
pub struct Workspace {
    root: PathBuf,
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    incar: Incar,
    slurm: Option<SlurmScript>,
}

impl Workspace {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let incar = Incar::with_base_dir(&root);
        Self {
            root,
            input: None,
            output: None,
            incar,
            slurm: None,
        }
    }

    pub fn with_input(mut self, input: impl Into<PathBuf>) -> Self {
        self.input = Some(input.into());
        self.incar.set_base_dir(self.input_dir());
        self
    }

    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = Some(output.into());
        self
    }

    // ------------------------------------------------------------------
    // Path resolution
    // ------------------------------------------------------------------

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn input_dir(&self) -> PathBuf {
        self.resolve(self.input.as_deref())
    }

    pub fn output_dir(&self) -> PathBuf {
        self.resolve(self.output.as_deref())
    }

    fn resolve(&self, sub: Option<&Path>) -> PathBuf {
        match sub {
            None => self.root.clone(),
            Some(path) if path.is_absolute() => path.to_path_buf(),
            Some(path) => self.root.join(path),
        }
    }

    // ------------------------------------------------------------------
    // Documents
    // ------------------------------------------------------------------

    pub fn incar(&self) -> &Incar {
        &self.incar
    }

    pub fn incar_mut(&mut self) -> &mut Incar {
        &mut self.incar
    }

    /// Load the INCAR from the input directory; missing files leave an
    /// empty document.
    pub fn load_inputs(&mut self) -> Result<()> {
        self.incar.set_base_dir(self.input_dir());
        self.incar.load(None)
    }

    /// Write the INCAR to the root directory.
    pub fn save_all(&self) -> Result<()> {
        let path = self.root.join(Incar::FILENAME);
        self.incar.save(Some(&path))?;
        log::info!("saved all files to {}", self.root.display());
        Ok(())
    }

    /// The batch script for this calculation.
    ///
    /// Loaded lazily: `job.slurm` from the input directory when present,
    /// otherwise the packaged `example.job` template. Either way the
    /// `output`, `err` and `chdir` directives are forced to match the
    /// workspace layout.
    pub fn slurm(&mut self) -> Result<&mut SlurmScript> {
        if self.slurm.is_none() {
            let mut script = self.load_slurm()?;
            self.configure_output_paths(&mut script)?;
            self.slurm = Some(script);
        }
        Ok(self.slurm.get_or_insert_with(SlurmScript::new))
    }

    fn load_slurm(&self) -> Result<SlurmScript> {
        let script_path = self.input_dir().join(SlurmScript::FILENAME);
        if script_path.exists() {
            debug!("loading existing slurm script from {}", script_path.display());
            SlurmScript::from_file(&script_path)
        } else {
            debug!(
                "no {} in input directory, using packaged template",
                SlurmScript::FILENAME
            );
            SlurmScript::from_template("example.job")
        }
    }

    /// Batch stdout/stderr land in the output dir when one is set, else in
    /// the root; bare `std.out`/`std.err` names when that equals the run
    /// dir. `chdir` always points at the root.
    fn configure_output_paths(&self, script: &mut SlurmScript) -> Result<()> {
        let out_dir = self.slurm_output_dir();
        fs::create_dir_all(&out_dir)?;

        let (output, err) = if out_dir == self.root {
            ("std.out".to_string(), "std.err".to_string())
        } else {
            (
                out_dir.join("std.out").display().to_string(),
                out_dir.join("std.err").display().to_string(),
            )
        };

        script.set_directive("output", Some(&output));
        script.set_directive("err", Some(&err));
        script.set_directive("chdir", Some(&self.root.display().to_string()));
        Ok(())
    }

    fn slurm_output_dir(&self) -> PathBuf {
        if self.output.is_some() {
            self.output_dir()
        } else {
            self.root.clone()
        }
    }
}
