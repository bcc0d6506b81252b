//! Job submission via the external sbatch binary
//!
//! The script is written to a scoped temporary file that is removed on
//! every exit path (success, failure, spawn error) unless the caller asks
//! to keep it. The call blocks until sbatch exits; the job itself runs
//! asynchronously.

use std::io::Write;
use std::process::Command;

use log::{debug, info};
use tempfile::Builder;

use super::patterns::JOB_ID_RE;
use super::SlurmScript;
use crate::error::{Error, Result};

impl SlurmScript {
    /// Submit the script with `sbatch_path`, returning the job id.
    ///
    /// Success requires exit code zero and a `Submitted batch job <digits>`
    /// line on standard output. Anything else is a hard failure carrying
    /// the captured output for diagnostics.
    pub fn submit(
        &self,
        sbatch_path: &str,
        extra_args: &[&str],
        keep_script: bool,
    ) -> Result<u64> {
        let mut script_file = Builder::new()
            .prefix("vaspfile-")
            .suffix(".slurm")
            .tempfile()?;
        script_file.write_all(self.to_text().as_bytes())?;
        script_file.flush()?;

        info!(
            "submitting job via {} using script {}",
            sbatch_path,
            script_file.path().display()
        );

        let run = Command::new(sbatch_path)
            .args(extra_args)
            .arg(script_file.path())
            .output();

        if keep_script {
            // Persist before inspecting the result so the script survives
            // failed submissions too.
            let (_, kept_path) = script_file.keep().map_err(|err| Error::Io(err.error))?;
            info!("kept submission script at {}", kept_path.display());
        }

        let output = run.map_err(|source| Error::Spawn {
            program: sbatch_path.to_string(),
            source,
        })?;

        let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        debug!("sbatch stdout: {}", stdout);
        if !stderr.is_empty() {
            debug!("sbatch stderr: {}", stderr);
        }

        if !output.status.success() {
            return Err(Error::SubmitFailed {
                program: sbatch_path.to_string(),
                code: output.status.code(),
                stdout,
                stderr,
            });
        }

        let job_id = JOB_ID_RE
            .captures(&stdout)
            .and_then(|caps| caps[1].parse::<u64>().ok())
            .ok_or(Error::JobId {
                stdout: stdout.clone(),
            })?;

        info!("submitted batch job {}", job_id);
        Ok(job_id)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use std::path::PathBuf;
    use tempfile::tempdir;

    /// Stand-in submitter that prints `body` and exits with `code`.
    fn fake_sbatch(dir: &std::path::Path, body: &str, code: i32) -> PathBuf {
        let path = dir.join("sbatch");
        let script = format!("#!/bin/sh\necho \"{}\"\nexit {}\n", body, code);
        fs::write(&path, script).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[test]
    fn test_submit_parses_job_id() {
        let dir = tempdir().unwrap();
        let sbatch = fake_sbatch(dir.path(), "Submitted batch job 123456", 0);

        let script = SlurmScript::new();
        let job_id = script
            .submit(sbatch.to_str().unwrap(), &[], false)
            .unwrap();
        assert_eq!(job_id, 123456);
    }

    #[test]
    fn test_submit_nonzero_exit_fails() {
        let dir = tempdir().unwrap();
        let sbatch = fake_sbatch(dir.path(), "sbatch: error: invalid partition", 1);

        let script = SlurmScript::new();
        let err = script
            .submit(sbatch.to_str().unwrap(), &[], false)
            .unwrap_err();
        assert!(matches!(err, Error::SubmitFailed { code: Some(1), .. }));
    }

    #[test]
    fn test_submit_unparsable_output_fails() {
        let dir = tempdir().unwrap();
        let sbatch = fake_sbatch(dir.path(), "queued maybe", 0);

        let script = SlurmScript::new();
        let err = script
            .submit(sbatch.to_str().unwrap(), &[], false)
            .unwrap_err();
        assert!(matches!(err, Error::JobId { .. }));
    }

    #[test]
    fn test_submit_missing_binary_is_spawn_error() {
        let script = SlurmScript::new();
        let err = script
            .submit("/nonexistent/sbatch-binary", &[], false)
            .unwrap_err();
        assert!(matches!(err, Error::Spawn { .. }));
    }
}
