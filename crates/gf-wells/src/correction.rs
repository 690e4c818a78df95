//! Vertical conductivity correction for wells pumped from their deepest layer.

use gf_grid::ConductivityField;
use tracing::info;

use crate::WellResult;
use crate::policy::select_policy;
use crate::well::{ScreenedLayer, Well};

/// Multiplier applied to `k` to obtain the corrected `k33`.
pub const KZZ_CORRECTION_FACTOR: f64 = 10.0;

/// Screened layers above the deepest one.
pub fn kzz_correction_targets(well: &Well) -> &[ScreenedLayer] {
    match well.layers.split_last() {
        Some((_, above)) => above,
        None => &[],
    }
}

/// Set `k33 = k * 10` on the cells above the well's deepest screened layer.
///
/// Returns the number of cells corrected by this call. Cells already in the
/// field's correction ledger are left untouched.
pub fn apply_kzz_correction(field: &mut ConductivityField, well: &Well) -> usize {
    let mut applied = 0;
    for target in kzz_correction_targets(well) {
        if !field.mark_corrected(target.layer, well.cell) {
            continue;
        }
        let k = field.k(target.layer, well.cell);
        let k33 = k * KZZ_CORRECTION_FACTOR;
        field.set_k33(target.layer, well.cell, k33);
        info!(
            well = %well.id,
            layer = target.layer,
            row = well.cell.row,
            col = well.cell.col,
            k33,
            "kzz correction"
        );
        applied += 1;
    }
    applied
}

/// Apply the correction for every pumping well whose policy asks for it.
pub fn apply_policy_corrections(field: &mut ConductivityField, wells: &[Well]) -> WellResult<usize> {
    let mut applied = 0;
    for well in wells.iter().filter(|w| w.is_pumping()) {
        if select_policy(well)?.needs_kzz_correction() {
            applied += apply_kzz_correction(field, well);
        }
    }
    Ok(applied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::well::PumpingStep;
    use gf_grid::{CellIndex, GridShape};

    fn shape() -> GridShape {
        GridShape {
            nlay: 4,
            nrow: 3,
            ncol: 3,
        }
    }

    fn well(layers: &[usize], policy: Option<&str>, pumping: bool) -> Well {
        Well {
            id: "W2".to_string(),
            cell: CellIndex { row: 1, col: 2 },
            layers: layers
                .iter()
                .map(|&layer| ScreenedLayer {
                    layer,
                    thickness: 1.0,
                    k: 2.0,
                    k22: None,
                })
                .collect(),
            schedule: if pumping {
                vec![PumpingStep {
                    stress_period_id: 1,
                    flow_rate: -10.0,
                }]
            } else {
                vec![]
            },
            policy: policy.map(str::to_string),
        }
    }

    #[test]
    fn targets_exclude_deepest_layer() {
        let w = well(&[1, 2, 3], None, true);
        let targets: Vec<usize> = kzz_correction_targets(&w).iter().map(|l| l.layer).collect();
        assert_eq!(targets, vec![1, 2]);
        assert!(kzz_correction_targets(&well(&[3], None, true)).is_empty());
    }

    #[test]
    fn correction_multiplies_k_and_is_idempotent() {
        let mut field = ConductivityField::uniform(shape(), 2.0);
        let w = well(&[1, 2, 3], Some("deepest_layer_kzz_correction"), true);

        assert_eq!(apply_kzz_correction(&mut field, &w), 2);
        assert_eq!(field.k33(1, w.cell), 20.0);
        assert_eq!(field.k33(2, w.cell), 20.0);
        assert_eq!(field.k33(3, w.cell), 2.0);
        assert_eq!(field.k33(1, CellIndex { row: 0, col: 0 }), 2.0);

        assert_eq!(apply_kzz_correction(&mut field, &w), 0);
        assert_eq!(field.k33(1, w.cell), 20.0);
        assert_eq!(field.corrected_count(), 2);
    }

    #[test]
    fn only_kzz_policy_wells_that_pump_are_corrected() {
        let mut field = ConductivityField::uniform(shape(), 1.0);
        let wells = vec![
            well(&[0, 1], Some("deepest_layer_kzz_correction"), true),
            well(&[0, 1, 2], None, true),
            well(&[0, 1], Some("deepest_layer_kzz_correction"), false),
        ];
        let applied = apply_policy_corrections(&mut field, &wells).unwrap();
        assert_eq!(applied, 1);
        assert!(field.is_corrected(0, CellIndex { row: 1, col: 2 }));
    }

    #[test]
    fn single_layer_well_never_corrects() {
        let mut field = ConductivityField::uniform(shape(), 1.0);
        let wells = vec![well(&[2], Some("deepest_layer_kzz_correction"), true)];
        assert_eq!(apply_policy_corrections(&mut field, &wells).unwrap(), 0);
        assert!(field.k33_values().is_none());
    }

    #[test]
    fn bad_override_surfaces_as_error() {
        let mut field = ConductivityField::uniform(shape(), 1.0);
        let wells = vec![well(&[0, 1], Some("bogus"), true)];
        assert!(apply_policy_corrections(&mut field, &wells).is_err());
    }
}
