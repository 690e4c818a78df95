//! gf-core: shared foundation for groundflow.
//!
//! Contains:
//! - units (uom SI types + constructors for the quantities the decks use)
//! - numeric (Real + finiteness guard + linspace)
//! - error (shared error types)

pub mod error;
pub mod numeric;
pub mod units;

pub use error::{GfError, GfResult};
pub use numeric::*;
pub use units::*;
