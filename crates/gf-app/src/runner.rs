//! External solver invocation.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::debug;

use crate::config::AppConfig;
use crate::error::AppResult;

/// Output file holding the solver's stdout and stderr.
pub const SOLVER_OUTPUT_FILE: &str = "solver.out";

const NORMAL_TERMINATION: &str = "normal termination";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolverOutcome {
    pub normal_termination: bool,
    /// Short human-readable reason when the run did not terminate normally
    pub message: Option<String>,
}

impl SolverOutcome {
    pub fn normal() -> Self {
        Self {
            normal_termination: true,
            message: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            normal_termination: false,
            message: Some(message.into()),
        }
    }
}

/// Runs the solver on one prepared simulation folder.
///
/// A solver that runs but does not terminate normally is an `Ok` outcome;
/// `Err` is reserved for failures of the runner itself.
pub trait SolverRunner {
    fn run(&self, sim_dir: &Path) -> AppResult<SolverOutcome>;
}

/// Spawns the configured solver executable inside the simulation folder.
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    executable: PathBuf,
    args: Vec<String>,
}

impl ProcessRunner {
    pub fn new(executable: impl Into<PathBuf>, args: Vec<String>) -> Self {
        Self {
            executable: executable.into(),
            args,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.solver.executable.clone(), config.solver.args.clone())
    }
}

impl SolverRunner for ProcessRunner {
    fn run(&self, sim_dir: &Path) -> AppResult<SolverOutcome> {
        let out_path = sim_dir.join(SOLVER_OUTPUT_FILE);
        let stdout = File::create(&out_path)?;
        let stderr = stdout.try_clone()?;

        debug!(exe = %self.executable.display(), dir = %sim_dir.display(), "spawning solver");
        let status = match Command::new(&self.executable)
            .args(&self.args)
            .current_dir(sim_dir)
            .stdin(Stdio::null())
            .stdout(stdout)
            .stderr(stderr)
            .status()
        {
            Ok(status) => status,
            Err(e) => {
                return Ok(SolverOutcome::failed(format!(
                    "could not start {}: {}",
                    self.executable.display(),
                    e
                )));
            }
        };

        let bytes = std::fs::read(&out_path)?;
        let output = String::from_utf8_lossy(&bytes);
        if !status.success() {
            return Ok(SolverOutcome::failed(format!("solver exited with {}", status)));
        }
        if !has_normal_termination(&output) {
            return Ok(SolverOutcome::failed("no normal termination in solver output"));
        }
        Ok(SolverOutcome::normal())
    }
}

/// Case-insensitive search for the solver's normal termination notice.
pub fn has_normal_termination(output: &str) -> bool {
    output.to_lowercase().contains(NORMAL_TERMINATION)
}
