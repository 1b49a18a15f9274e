//! Blocking execution of the external simulation binary.
//!
//! The simulation is an opaque collaborator: the harness launches it in the
//! experiment directory, waits for it to exit, and collects its exit code,
//! captured stdout, and the two log files it leaves behind. No timeout is
//! applied here; if the environment needs one it wraps the harness.

use std::fs;
use std::path::Path;
use std::process::Command;

use tracing::{debug, warn};

use crate::config::{ExperimentSpec, HarnessConfig};
use crate::errors::HarnessError;

/// Outcome of one simulation run.
#[derive(Clone, Debug)]
pub struct RunOutput {
    /// Process exit code; zero means the model completed cleanly.
    pub exit_code: i32,
    /// Captured standard output.
    pub stdout: String,
    /// Contents of the primary model log.
    pub log: String,
    /// Contents of the secondary coupling log.
    pub secondary_log: String,
}

/// Runs experiments under a fixed harness configuration.
#[derive(Clone, Debug)]
pub struct ExperimentRunner {
    config: HarnessConfig,
}

impl ExperimentRunner {
    /// Build a runner over `config`.
    pub fn new(config: HarnessConfig) -> Self {
        Self { config }
    }

    /// The configuration this runner launches experiments with.
    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// Run one experiment to completion and collect its output.
    ///
    /// Blocks until the subprocess terminates. A missing experiment
    /// directory or an unlaunchable executable is a config error; a non-zero
    /// exit is not — it is reported through [`RunOutput::exit_code`] so the
    /// validation battery can fail on it.
    pub fn run(&self, spec: &ExperimentSpec) -> Result<RunOutput, HarnessError> {
        let exp_dir = self.config.experiment_dir(&spec.name);
        if !exp_dir.is_dir() {
            return Err(HarnessError::Config(format!(
                "experiment directory '{}' does not exist",
                exp_dir.display()
            )));
        }

        let mut command = Command::new(&self.config.executable);
        command.current_dir(&exp_dir).args(&self.config.executable_args);
        if let Some(years) = spec.years_duration {
            command.arg("--years-duration").arg(years.to_string());
        }

        debug!(
            experiment = %spec.name,
            executable = %self.config.executable.display(),
            "launching simulation"
        );
        let output = command.output().map_err(|err| {
            HarnessError::Config(format!(
                "cannot launch '{}': {err}",
                self.config.executable.display()
            ))
        })?;

        let exit_code = output.status.code().unwrap_or(-1);
        if exit_code != 0 {
            warn!(experiment = %spec.name, exit_code, "simulation exited with non-zero status");
        }

        Ok(RunOutput {
            exit_code,
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            log: read_log(&exp_dir.join(&self.config.log_filename))?,
            secondary_log: read_log(&exp_dir.join(&self.config.secondary_log_filename))?,
        })
    }
}

/// Read a run log, tolerating its absence: a crashed run may never have
/// opened the file, and the exit-status check reports that case on its own.
fn read_log(path: &Path) -> Result<String, HarnessError> {
    if !path.is_file() {
        warn!(path = %path.display(), "run log missing, treating as empty");
        return Ok(String::new());
    }
    Ok(fs::read_to_string(path)?)
}
