//! gf-scenarios: parameter sweeps and scenario tables.
//!
//! A [`SweepSpec`] maps parameter names to a single value or a list of
//! candidates. [`generate`] expands it into the cartesian product of all
//! candidates, one named [`Scenario`] per combination.

pub mod generate;
pub mod sweep;
pub mod table;

pub use generate::{Scenario, ScenarioTable, generate};
pub use sweep::{ParamEntry, ParamValue, SweepSpec};

/// Columns every scenario row carries ahead of its parameters.
pub const SIMULATION_NAME: &str = "simulation_name";
pub const MODEL_NAME: &str = "model_name";

/// Names a sweep parameter may not take.
pub const RESERVED_COLUMNS: [&str; 3] = [SIMULATION_NAME, MODEL_NAME, "status"];

pub type SweepResult<T> = Result<T, SweepError>;

#[derive(thiserror::Error, Debug)]
pub enum SweepError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Malformed scenario table: {0}")]
    Table(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}
