//! gf-grid: structured grid geometry and the hydraulic conductivity field.
//!
//! Only the lookups the deck builder needs are here: point-to-cell,
//! screen-to-layers, layer thickness and boundary edges. Anything beyond that
//! belongs to the solver.

pub mod field;
pub mod grid;

pub use field::{ConductivityField, load_gaussian_field};
pub use grid::{BOTTOM_TOLERANCE, CellIndex, GridShape, Side, StructuredGrid};

use gf_core::GfError;

pub type GridResult<T> = Result<T, GridError>;

#[derive(thiserror::Error, Debug)]
pub enum GridError {
    #[error("Invalid grid dimension: {what}")]
    InvalidDimension { what: String },

    #[error("Point ({x}, {y}) lies outside the model domain")]
    OutsideDomain { x: f64, y: f64 },

    #[error("Layer {layer} out of range (nlay={nlay})")]
    LayerOutOfRange { layer: usize, nlay: usize },

    #[error("Field has {got} values, grid needs {expected}")]
    FieldShape { expected: usize, got: usize },

    #[error("Invalid field value '{value}' on line {line}")]
    FieldValue { line: usize, value: String },

    #[error("Core error: {0}")]
    Core(#[from] GfError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}
