//! gf-project: experiment definition file format and validation.

pub mod schema;
pub mod validate;

pub use schema::*;
pub use validate::{ValidationError, validate_experiment};

/// Newest schema version this crate reads and writes.
pub const LATEST_VERSION: u32 = 1;

pub type ProjectResult<T> = Result<T, ProjectError>;

#[derive(thiserror::Error, Debug)]
pub enum ProjectError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub fn load_yaml(path: &std::path::Path) -> ProjectResult<Experiment> {
    let content = std::fs::read_to_string(path)?;
    let experiment: Experiment = serde_yaml::from_str(&content)?;
    validate_experiment(&experiment)?;
    Ok(experiment)
}

pub fn save_yaml(path: &std::path::Path, experiment: &Experiment) -> ProjectResult<()> {
    validate_experiment(experiment)?;
    let content = serde_yaml::to_string(experiment)?;
    std::fs::write(path, content)?;
    Ok(())
}
