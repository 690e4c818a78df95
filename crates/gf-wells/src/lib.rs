//! gf-wells: multi-layer well discharge allocation.
//!
//! A well screened across several model layers has its per-stress-period
//! rate split between those layers according to a [`Policy`]. Choosing the
//! policy, computing the split and correcting vertical conductivity are three
//! separate calls so each can be checked on its own.

pub mod allocate;
pub mod correction;
pub mod package;
pub mod policy;
pub mod well;

pub use allocate::{Allocation, allocate, allocate_with, transmissivity};
pub use correction::{
    KZZ_CORRECTION_FACTOR, apply_kzz_correction, apply_policy_corrections,
    kzz_correction_targets,
};
pub use package::{WellPackage, build_well_package};
pub use policy::{Policy, select_policy};
pub use well::{PumpingStep, ScreenedLayer, Well, WellSite};

use gf_grid::GridError;

pub type WellResult<T> = Result<T, WellError>;

#[derive(thiserror::Error, Debug)]
pub enum WellError {
    #[error("Unsupported pumping policy '{name}'")]
    UnsupportedPolicy { name: String },

    #[error("Cannot allocate rate for well {well_id}: {reason}")]
    Allocation { well_id: String, reason: String },

    #[error("Well {well_id} screen does not intersect any model layer")]
    EmptyScreen { well_id: String },

    #[error("Well {well_id} pumps in stress period {stress_period_id}, model has {nper}")]
    UnknownStressPeriod {
        well_id: String,
        stress_period_id: usize,
        nper: usize,
    },

    #[error("Grid error: {0}")]
    Grid(#[from] GridError),
}
