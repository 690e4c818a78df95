//! Well boundary entries grouped by stress period.

use crate::allocate::{Allocation, allocate};
use crate::well::Well;
use crate::{WellError, WellResult};

/// Allocations for every stress period of a model, in period order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WellPackage {
    pub periods: Vec<Vec<Allocation>>,
}

impl WellPackage {
    /// Largest number of entries active in any period.
    pub fn maxbound(&self) -> usize {
        self.periods.iter().map(Vec::len).max().unwrap_or(0)
    }

    pub fn period(&self, stress_period_id: usize) -> &[Allocation] {
        self.periods
            .get(stress_period_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn allocation_count(&self) -> usize {
        self.periods.iter().map(Vec::len).sum()
    }
}

/// Allocate every scheduled step of every pumping well.
pub fn build_well_package(wells: &[Well], nper: usize) -> WellResult<WellPackage> {
    let mut periods = vec![Vec::new(); nper];
    for well in wells.iter().filter(|w| w.is_pumping()) {
        for step in &well.schedule {
            let slot = periods
                .get_mut(step.stress_period_id)
                .ok_or_else(|| WellError::UnknownStressPeriod {
                    well_id: well.id.clone(),
                    stress_period_id: step.stress_period_id,
                    nper,
                })?;
            slot.extend(allocate(well, step)?);
        }
    }
    Ok(WellPackage { periods })
}
