//! Harness configuration and experiment run specs.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::constants::files;
use crate::errors::HarnessError;
use crate::types::ExperimentName;

/// Locates experiment directories, reference data, and the model executable.
#[derive(Clone, Debug)]
pub struct HarnessConfig {
    /// Root directory holding one subdirectory per experiment.
    pub test_root: PathBuf,
    /// Simulation executable invoked for each run.
    pub executable: PathBuf,
    /// Extra arguments passed to the executable on every run.
    pub executable_args: Vec<String>,
    /// Primary model log file name, relative to the experiment directory.
    pub log_filename: String,
    /// Secondary coupling log file name, relative to the experiment directory.
    pub secondary_log_filename: String,
    /// Stored reference checksum file name, relative to the experiment directory.
    pub checksum_filename: String,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            test_root: PathBuf::from(files::DEFAULT_TEST_ROOT),
            executable: PathBuf::from(files::DEFAULT_EXECUTABLE),
            executable_args: Vec::new(),
            log_filename: files::PRIMARY_LOG.to_string(),
            secondary_log_filename: files::SECONDARY_LOG.to_string(),
            checksum_filename: files::CHECKSUM_REFERENCE.to_string(),
        }
    }
}

impl HarnessConfig {
    /// Config rooted at `test_root`, defaults elsewhere.
    pub fn rooted_at(test_root: impl Into<PathBuf>) -> Self {
        Self {
            test_root: test_root.into(),
            ..Self::default()
        }
    }

    /// Directory holding one experiment's configuration and reference data.
    pub fn experiment_dir(&self, name: &str) -> PathBuf {
        self.test_root.join(name)
    }

    /// Path of the stored reference checksums for `name`.
    pub fn checksum_path(&self, name: &str) -> PathBuf {
        self.experiment_dir(name).join(&self.checksum_filename)
    }

    /// Path of the namelist holding `name`'s forcing period.
    pub fn namelist_path(&self, name: &str) -> PathBuf {
        self.experiment_dir(name).join(files::ACCESSOM2_NAMELIST)
    }

    /// Path of `name`'s forcing-description file.
    pub fn forcing_path(&self, name: &str) -> PathBuf {
        self.experiment_dir(name).join(files::FORCING_CONFIG)
    }

    /// List experiment names found under the test root, sorted.
    ///
    /// A directory counts as an experiment when it carries a namelist file.
    pub fn discover_experiments(&self) -> Result<Vec<ExperimentName>, HarnessError> {
        let mut names = Vec::new();
        for entry in WalkDir::new(&self.test_root).min_depth(1).max_depth(1) {
            let entry = entry.map_err(|err| {
                HarnessError::Config(format!(
                    "cannot scan '{}': {err}",
                    self.test_root.display()
                ))
            })?;
            if !entry.file_type().is_dir() {
                continue;
            }
            let Some(name) = entry.file_name().to_str() else {
                continue;
            };
            if has_namelist(entry.path()) {
                names.push(name.to_string());
            }
        }
        names.sort();
        Ok(names)
    }
}

fn has_namelist(dir: &Path) -> bool {
    dir.join(files::ACCESSOM2_NAMELIST).is_file()
}

/// One experiment run request: preset name plus optional duration override.
#[derive(Clone, Debug)]
pub struct ExperimentSpec {
    /// Experiment preset (directory name under the test root).
    pub name: ExperimentName,
    /// Run duration in forcing years; `None` uses the experiment default.
    pub years_duration: Option<u32>,
}

impl ExperimentSpec {
    /// Spec for `name` with the preset's default duration.
    pub fn named(name: impl Into<ExperimentName>) -> Self {
        Self {
            name: name.into(),
            years_duration: None,
        }
    }

    /// Override the run duration in forcing years.
    pub fn with_years(mut self, years: u32) -> Self {
        self.years_duration = Some(years);
        self
    }
}
