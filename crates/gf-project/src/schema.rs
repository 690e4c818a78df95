//! Experiment schema definitions.

use std::path::{Path, PathBuf};

use gf_grid::Side;
use gf_scenarios::SweepSpec;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Experiment {
    pub version: u32,
    pub name: String,
    #[serde(default = "default_base_name")]
    pub base_name: String,
    pub parameters: SweepSpec,
    #[serde(default)]
    pub model: ModelDef,
}

fn default_base_name() -> String {
    "SIM".to_string()
}

impl Experiment {
    /// Rebase relative data paths onto `dir`, usually the folder holding the
    /// definition file.
    pub fn resolve_paths(&mut self, dir: &Path) {
        if let ConductivityDef::GaussianCsv { path } = &mut self.model.conductivity {
            if path.is_relative() {
                *path = dir.join(&*path);
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelDef {
    pub domain: DomainDef,
    pub conductivity: ConductivityDef,
    pub stress_periods: Vec<StressPeriodDef>,
    #[serde(default)]
    pub constant_heads: Vec<ConstantHeadDef>,
    #[serde(default)]
    pub wells: Vec<WellDef>,
    #[serde(default)]
    pub storage: StorageDef,
    #[serde(default)]
    pub solver: SolverDef,
}

/// The dipole test layout: a 100 x 100 x 10 m block under a west-to-east
/// gradient with two pumping/injection pairs.
impl Default for ModelDef {
    fn default() -> Self {
        let hour = 1.0 / 24.0;
        let mut stress_periods = vec![StressPeriodDef {
            id: 0,
            length: 100.0,
            n_time_steps: 1,
            ts_multiplier: 1.0,
            steady_state: true,
        }];
        stress_periods.extend((1..4).map(|id| StressPeriodDef {
            id,
            length: hour,
            n_time_steps: 15,
            ts_multiplier: 1.0,
            steady_state: false,
        }));

        let well = |id: &str, x: f64, y: f64, top: f64, bottom: f64, active: usize, factor: f64| {
            WellDef {
                id: id.to_string(),
                x,
                y,
                screen_top: top,
                screen_bottom: bottom,
                policy: None,
                pumping: (0..4)
                    .map(|sp| PumpingDef {
                        stress_period_id: sp,
                        rate: RateDef::Scaled {
                            factor: if sp == active { factor } else { 0.0 },
                        },
                    })
                    .collect(),
            }
        };

        Self {
            domain: DomainDef::default(),
            conductivity: ConductivityDef::GaussianCsv {
                path: PathBuf::from("data/hk_field.csv"),
            },
            stress_periods,
            constant_heads: vec![
                ConstantHeadDef {
                    name: "inlet".to_string(),
                    head: 110.0,
                    side: Side::West,
                },
                ConstantHeadDef {
                    name: "outlet".to_string(),
                    head: 100.0,
                    side: Side::East,
                },
            ],
            wells: vec![
                well("W1", 25.0, 50.0, 2.0, 1.0, 1, -1.0),
                well("W2", 75.0, 50.0, 2.0, 1.0, 1, 1.0),
                well("W3", 50.0, 25.0, 4.0, 3.0, 2, -1.0),
                well("W4", 50.0, 75.0, 4.0, 3.0, 2, 1.0),
            ],
            storage: StorageDef::default(),
            solver: SolverDef::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DomainDef {
    /// Extent along x (m)
    pub length: f64,
    /// Extent along y (m)
    pub width: f64,
    pub top: f64,
    pub bottom: f64,
    pub layers: usize,
    pub rows: usize,
    pub columns: usize,
}

impl Default for DomainDef {
    fn default() -> Self {
        Self {
            length: 100.0,
            width: 100.0,
            top: 10.0,
            bottom: 0.0,
            layers: 10,
            rows: 100,
            columns: 100,
        }
    }
}

/// Horizontal hydraulic conductivity source.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConductivityDef {
    /// Same value everywhere (m/day)
    Uniform { k: f64 },
    /// Standard normal scores transformed with the scenario's field variance
    GaussianCsv { path: PathBuf },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StressPeriodDef {
    pub id: usize,
    /// Days
    pub length: f64,
    pub n_time_steps: u32,
    #[serde(default = "default_ts_multiplier")]
    pub ts_multiplier: f64,
    #[serde(default)]
    pub steady_state: bool,
}

fn default_ts_multiplier() -> f64 {
    1.0
}

/// Fixed head applied to every layer of the cells along one domain edge.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConstantHeadDef {
    pub name: String,
    pub head: f64,
    pub side: Side,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WellDef {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub screen_top: f64,
    pub screen_bottom: f64,
    /// Allocation policy name for multi-layer screens
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy: Option<String>,
    #[serde(default)]
    pub pumping: Vec<PumpingDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PumpingDef {
    pub stress_period_id: usize,
    pub rate: RateDef,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RateDef {
    /// Multiple of the scenario's pumping flow rate; negative extracts
    Scaled { factor: f64 },
    Fixed { m3_per_day: f64 },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StorageDef {
    #[serde(default = "default_specific_yield")]
    pub specific_yield: f64,
    #[serde(default = "default_convertible")]
    pub convertible: bool,
}

fn default_specific_yield() -> f64 {
    0.2
}

fn default_convertible() -> bool {
    true
}

impl Default for StorageDef {
    fn default() -> Self {
        Self {
            specific_yield: default_specific_yield(),
            convertible: default_convertible(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum LinearAcceleration {
    Cg,
    #[default]
    Bicgstab,
}

impl LinearAcceleration {
    pub fn keyword(self) -> &'static str {
        match self {
            LinearAcceleration::Cg => "CG",
            LinearAcceleration::Bicgstab => "BICGSTAB",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Complexity {
    Simple,
    #[default]
    Moderate,
    Complex,
}

impl Complexity {
    pub fn keyword(self) -> &'static str {
        match self {
            Complexity::Simple => "SIMPLE",
            Complexity::Moderate => "MODERATE",
            Complexity::Complex => "COMPLEX",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SolverDef {
    pub inner_maximum: u32,
    pub outer_maximum: u32,
    pub relaxation_factor: f64,
    pub linear_acceleration: LinearAcceleration,
    pub complexity: Complexity,
}

impl Default for SolverDef {
    fn default() -> Self {
        Self {
            inner_maximum: 250,
            outer_maximum: 100,
            relaxation_factor: 0.97,
            linear_acceleration: LinearAcceleration::default(),
            complexity: Complexity::default(),
        }
    }
}
