//! gf-deck: turn an experiment plus one scenario into solver input files.

pub mod deck;
pub mod mf6;
pub mod params;

pub use deck::{ChdCell, Deck, DeckSummary, build_deck};
pub use mf6::{DeckWriter, Mf6Writer};
pub use params::ModelParams;

use gf_grid::GridError;
use gf_wells::WellError;

pub type DeckResult<T> = Result<T, DeckError>;

#[derive(thiserror::Error, Debug)]
pub enum DeckError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Grid error: {0}")]
    Grid(#[from] GridError),

    #[error("Well error: {0}")]
    Well(#[from] WellError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
