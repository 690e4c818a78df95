//! Application configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

pub const DEFAULT_CONFIG_FILE: &str = "groundflow.yaml";
pub const ENV_SOLVER_EXE: &str = "GF_SOLVER_EXE";
pub const ENV_BASE_DIR: &str = "GF_BASE_DIR";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub solver: SolverConfig,
    pub folders: FolderConfig,
    /// Runs with any budget discrepancy at or above this are flagged
    pub discrepancy_threshold_pct: f64,
    pub files: FileConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    pub executable: PathBuf,
    pub args: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FolderConfig {
    /// Parent of all experiment folders
    pub base: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub scenarios: String,
    pub runs: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            solver: SolverConfig::default(),
            folders: FolderConfig::default(),
            discrepancy_threshold_pct: 1.0,
            files: FileConfig::default(),
        }
    }
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            executable: PathBuf::from("mf6"),
            args: Vec::new(),
        }
    }
}

impl Default for FolderConfig {
    fn default() -> Self {
        Self {
            base: PathBuf::from("."),
        }
    }
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            scenarios: "scenarios.csv".to_string(),
            runs: "runs.csv".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration for a front end.
    ///
    /// An explicit `path` must exist. Without one, `groundflow.yaml` in the
    /// working directory is used when present. Environment overrides are
    /// applied last.
    pub fn load(path: Option<&Path>) -> AppResult<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> AppResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| AppError::ConfigFileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_yaml_str(&content)
    }

    pub fn from_yaml_str(content: &str) -> AppResult<Self> {
        let config: AppConfig = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `GF_SOLVER_EXE` / `GF_BASE_DIR` style overrides from `lookup`.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(exe) = lookup(ENV_SOLVER_EXE).filter(|v| !v.is_empty()) {
            self.solver.executable = PathBuf::from(exe);
        }
        if let Some(base) = lookup(ENV_BASE_DIR).filter(|v| !v.is_empty()) {
            self.folders.base = PathBuf::from(base);
        }
    }

    pub fn validate(&self) -> AppResult<()> {
        if !(self.discrepancy_threshold_pct.is_finite() && self.discrepancy_threshold_pct > 0.0) {
            return Err(AppError::Config(format!(
                "discrepancy_threshold_pct must be positive, got {}",
                self.discrepancy_threshold_pct
            )));
        }
        if self.solver.executable.as_os_str().is_empty() {
            return Err(AppError::Config("solver.executable is empty".to_string()));
        }
        if self.files.scenarios.is_empty() || self.files.runs.is_empty() {
            return Err(AppError::Config("file names must not be empty".to_string()));
        }
        Ok(())
    }

    pub fn experiment_dir(&self, experiment: &str) -> PathBuf {
        self.folders.base.join(experiment)
    }

    pub fn csv_dir(&self, experiment: &str) -> PathBuf {
        self.experiment_dir(experiment).join("csv")
    }

    pub fn scenarios_path(&self, experiment: &str) -> PathBuf {
        self.csv_dir(experiment).join(&self.files.scenarios)
    }

    pub fn runs_path(&self, experiment: &str) -> PathBuf {
        self.csv_dir(experiment).join(&self.files.runs)
    }

    /// Copy of the experiment definition kept with its outputs.
    pub fn definition_path(&self, experiment: &str) -> PathBuf {
        self.experiment_dir(experiment).join("experiment.yaml")
    }

    pub fn simulation_dir(&self, experiment: &str, simulation_name: &str) -> PathBuf {
        self.experiment_dir(experiment).join(simulation_name)
    }
}
