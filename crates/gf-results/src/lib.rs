//! gf-results: run status bookkeeping and solver budget checks.

pub mod budget;
pub mod status;
pub mod store;

pub use budget::{BudgetEntry, BudgetReport, load_listing_budget, parse_listing_budget};
pub use status::{RunStatus, StatusCounts};
pub use store::{RunStatusStore, STATUS_COLUMN};

use gf_scenarios::SweepError;

pub type ResultsResult<T> = Result<T, ResultsError>;

#[derive(thiserror::Error, Debug)]
pub enum ResultsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Scenario table error: {0}")]
    Table(#[from] SweepError),

    #[error("Run table does not match scenarios: {reason}")]
    SchemaMismatch { reason: String },

    #[error("Unknown run status '{value}'")]
    UnknownStatus { value: String },

    #[error("Run index {index} out of range (len={len})")]
    RowOutOfRange { index: usize, len: usize },

    #[error("Listing line {line}: {reason}")]
    Listing { line: usize, reason: String },
}
