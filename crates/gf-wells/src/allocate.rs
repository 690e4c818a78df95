//! Per-layer split of a well's stress-period rate.

use gf_grid::CellIndex;
use tracing::debug;

use crate::policy::{Policy, select_policy};
use crate::well::{PumpingStep, ScreenedLayer, Well};
use crate::{WellError, WellResult};

/// Rate assigned to one layer of a well for one stress period.
#[derive(Debug, Clone, PartialEq)]
pub struct Allocation {
    pub layer: usize,
    pub cell: CellIndex,
    /// m3/day, sign carried over from the schedule
    pub flow_rate: f64,
    /// `<well_id>_SP<stress_period_id>`
    pub label: String,
}

/// Layer transmissivity used as an allocation weight.
///
/// Uses the geometric mean of `k` and `k22` when the layer has a `k22`
/// value, and `k` alone otherwise.
pub fn transmissivity(layer: &ScreenedLayer) -> f64 {
    let k = match layer.k22 {
        Some(k22) => (layer.k * k22).sqrt(),
        None => layer.k,
    };
    layer.thickness * k
}

/// Split one stress-period rate using the policy chosen for the well.
pub fn allocate(well: &Well, step: &PumpingStep) -> WellResult<Vec<Allocation>> {
    let policy = select_policy(well)?;
    allocate_with(well, policy, step)
}

/// Split one stress-period rate under an already chosen policy.
///
/// Pure: the vertical conductivity change of
/// [`Policy::DeepestWithKzzCorrection`] is applied separately by
/// [`crate::apply_kzz_correction`].
pub fn allocate_with(well: &Well, policy: Policy, step: &PumpingStep) -> WellResult<Vec<Allocation>> {
    let label = well.label(step.stress_period_id);
    let entry = |layer: usize, flow_rate: f64| Allocation {
        layer,
        cell: well.cell,
        flow_rate,
        label: label.clone(),
    };

    let allocations = match policy {
        Policy::DeepestLayer | Policy::DeepestWithKzzCorrection => {
            let deepest = well.deepest().ok_or_else(|| WellError::EmptyScreen {
                well_id: well.id.clone(),
            })?;
            vec![entry(deepest.layer, step.flow_rate)]
        }
        Policy::Homogeneous => {
            if well.layers.is_empty() {
                return Err(WellError::EmptyScreen {
                    well_id: well.id.clone(),
                });
            }
            let share = step.flow_rate / well.layers.len() as f64;
            well.layers.iter().map(|l| entry(l.layer, share)).collect()
        }
        Policy::ByTransmissivity => {
            let weights: Vec<f64> = well.layers.iter().map(transmissivity).collect();
            let total: f64 = weights.iter().sum();
            if !(total.is_finite() && total > 0.0) {
                return Err(WellError::Allocation {
                    well_id: well.id.clone(),
                    reason: format!("transmissivity sum is {}", total),
                });
            }
            well.layers
                .iter()
                .zip(&weights)
                .map(|(l, w)| entry(l.layer, w * step.flow_rate / total))
                .collect()
        }
    };

    debug!(
        well = %well.id,
        stress_period = step.stress_period_id,
        policy = %policy,
        entries = allocations.len(),
        "allocated well rate"
    );

    Ok(allocations)
}
