//! Shared application service layer for groundflow.
//!
//! Front ends call these services with an explicit [`AppConfig`]; environment
//! overrides are read only by [`AppConfig::load`].

pub mod config;
pub mod deck_service;
pub mod error;
pub mod experiment_service;
pub mod progress;
pub mod run_service;
pub mod runner;

pub use config::AppConfig;
pub use deck_service::{ConfigureResponse, configure_experiment, configure_with};
pub use error::{AppError, AppResult};
pub use experiment_service::{
    SetupResponse, load_definition, load_experiment, setup_experiment,
};
pub use progress::{BatchProgressEvent, BatchStage, ConfigureEvent};
pub use run_service::{
    BatchRequest, BatchSummary, ExperimentStatus, ScenarioOutcome, experiment_status, run_batch,
    select_indices,
};
pub use runner::{ProcessRunner, SolverOutcome, SolverRunner};
