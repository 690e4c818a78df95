//! Error types for the gf-app service layer.

use std::path::PathBuf;

/// Application error type that wraps errors from the backend crates.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to read config file: {path}")]
    ConfigFileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Experiment error: {0}")]
    Experiment(String),

    #[error("Experiment '{name}' not found in {base}")]
    ExperimentNotFound { name: String, base: PathBuf },

    #[error("Scenario error: {0}")]
    Scenario(String),

    #[error("Deck error: {0}")]
    Deck(String),

    #[error("Results error: {0}")]
    Results(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for gf-app operations.
pub type AppResult<T> = Result<T, AppError>;

// Conversions from backend error types
impl From<gf_project::ProjectError> for AppError {
    fn from(err: gf_project::ProjectError) -> Self {
        AppError::Experiment(err.to_string())
    }
}

impl From<gf_scenarios::SweepError> for AppError {
    fn from(err: gf_scenarios::SweepError) -> Self {
        AppError::Scenario(err.to_string())
    }
}

impl From<gf_deck::DeckError> for AppError {
    fn from(err: gf_deck::DeckError) -> Self {
        AppError::Deck(err.to_string())
    }
}

impl From<gf_results::ResultsError> for AppError {
    fn from(err: gf_results::ResultsError) -> Self {
        AppError::Results(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Config(format!("Failed to parse config YAML: {}", err))
    }
}
