//! Allocation policy and the decision step that picks it.

use std::fmt;
use std::str::FromStr;

use crate::well::Well;
use crate::{WellError, WellResult};

/// How a well's rate is split across its screened layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Policy {
    /// Whole rate in the deepest screened layer
    DeepestLayer,
    /// Equal share per screened layer
    Homogeneous,
    /// Share proportional to layer transmissivity
    ByTransmissivity,
    /// Deepest layer, with vertical conductivity boosted above it
    DeepestWithKzzCorrection,
}

impl Policy {
    pub const ALL: [Policy; 4] = [
        Policy::DeepestLayer,
        Policy::Homogeneous,
        Policy::ByTransmissivity,
        Policy::DeepestWithKzzCorrection,
    ];

    /// Name used in experiment files and scenario tables.
    pub fn name(self) -> &'static str {
        match self {
            Policy::DeepestLayer => "deepest_layer",
            Policy::Homogeneous => "homogeneous",
            Policy::ByTransmissivity => "distributed_by_transmissivities",
            Policy::DeepestWithKzzCorrection => "deepest_layer_kzz_correction",
        }
    }

    pub fn needs_kzz_correction(self) -> bool {
        matches!(self, Policy::DeepestWithKzzCorrection)
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Policy {
    type Err = WellError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Policy::ALL
            .into_iter()
            .find(|p| p.name() == s)
            .ok_or_else(|| WellError::UnsupportedPolicy {
                name: s.to_string(),
            })
    }
}

/// Decide the policy for a well.
///
/// Single-layer wells always use [`Policy::DeepestLayer`], whatever was
/// requested. Multi-layer wells use the requested policy, or
/// [`Policy::ByTransmissivity`] when none was given.
pub fn select_policy(well: &Well) -> WellResult<Policy> {
    match well.layers.len() {
        0 => Err(WellError::EmptyScreen {
            well_id: well.id.clone(),
        }),
        1 => Ok(Policy::DeepestLayer),
        _ => match well.policy.as_deref() {
            Some(name) => name.parse(),
            None => Ok(Policy::ByTransmissivity),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::well::ScreenedLayer;
    use gf_grid::CellIndex;

    fn well_with(layers: usize, policy: Option<&str>) -> Well {
        Well {
            id: "W1".to_string(),
            cell: CellIndex { row: 0, col: 0 },
            layers: (0..layers)
                .map(|layer| ScreenedLayer {
                    layer,
                    thickness: 1.0,
                    k: 1.0,
                    k22: None,
                })
                .collect(),
            schedule: vec![],
            policy: policy.map(str::to_string),
        }
    }

    #[test]
    fn names_round_trip() {
        for policy in Policy::ALL {
            assert_eq!(policy.name().parse::<Policy>().unwrap(), policy);
        }
    }

    #[test]
    fn unknown_name_is_reported() {
        let err = "by_magic".parse::<Policy>().unwrap_err();
        assert!(matches!(err, WellError::UnsupportedPolicy { ref name } if name == "by_magic"));
        assert!(err.to_string().contains("by_magic"));
    }

    #[test]
    fn single_layer_forces_deepest() {
        let well = well_with(1, Some("homogeneous"));
        assert_eq!(select_policy(&well).unwrap(), Policy::DeepestLayer);
        // Even a bogus override is not looked at
        let well = well_with(1, Some("by_magic"));
        assert_eq!(select_policy(&well).unwrap(), Policy::DeepestLayer);
    }

    #[test]
    fn multi_layer_defaults_to_transmissivity() {
        let well = well_with(3, None);
        assert_eq!(select_policy(&well).unwrap(), Policy::ByTransmissivity);
        let well = well_with(3, Some("homogeneous"));
        assert_eq!(select_policy(&well).unwrap(), Policy::Homogeneous);
    }

    #[test]
    fn empty_screen_and_bad_override_fail() {
        assert!(matches!(
            select_policy(&well_with(0, None)),
            Err(WellError::EmptyScreen { .. })
        ));
        assert!(matches!(
            select_policy(&well_with(2, Some("sideways"))),
            Err(WellError::UnsupportedPolicy { .. })
        ));
    }
}
