//! Deck assembly: everything the solver needs for one scenario.

use std::collections::BTreeSet;
use std::path::Path;

use gf_grid::{CellIndex, ConductivityField, Side, StructuredGrid, load_gaussian_field};
use gf_project::{
    ConductivityDef, ConstantHeadDef, Experiment, RateDef, SolverDef, StorageDef, StressPeriodDef,
    WellDef,
};
use gf_scenarios::Scenario;
use gf_wells::{PumpingStep, Well, WellPackage, WellSite, apply_policy_corrections, build_well_package};
use serde::Serialize;
use tracing::{debug, info};

use crate::DeckResult;
use crate::params::ModelParams;

/// One constant-head boundary cell.
#[derive(Debug, Clone, PartialEq)]
pub struct ChdCell {
    pub layer: usize,
    pub cell: CellIndex,
    pub head: f64,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct Deck {
    pub simulation_name: String,
    pub model_name: String,
    pub params: ModelParams,
    pub grid: StructuredGrid,
    /// Conductivity with vertical corrections already applied
    pub field: ConductivityField,
    pub stress_periods: Vec<StressPeriodDef>,
    pub solver: SolverDef,
    pub storage: StorageDef,
    pub constant_heads: Vec<ChdCell>,
    /// Starting heads in `[layer][row][col]` order
    pub initial_heads: Vec<f64>,
    pub wells: Vec<Well>,
    pub well_package: WellPackage,
}

impl Deck {
    pub fn nper(&self) -> usize {
        self.stress_periods.len()
    }

    pub fn budget_file(&self) -> String {
        format!("{}.bud", self.model_name)
    }

    pub fn head_file(&self) -> String {
        format!("{}.hds", self.model_name)
    }

    pub fn listing_file(&self) -> String {
        format!("{}.lst", self.model_name)
    }

    pub fn summary(&self) -> DeckSummary {
        DeckSummary {
            simulation_name: self.simulation_name.clone(),
            model_name: self.model_name.clone(),
            cells: self.grid.shape().len(),
            constant_head_cells: self.constant_heads.len(),
            wells: self.wells.len(),
            allocations_per_period: self.well_package.periods.iter().map(Vec::len).collect(),
            corrected_cells: self.field.corrected_count(),
            params: self.params.clone(),
        }
    }
}

/// Counts describing a built deck, for dry runs and logs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeckSummary {
    pub simulation_name: String,
    pub model_name: String,
    pub cells: usize,
    pub constant_head_cells: usize,
    pub wells: usize,
    pub allocations_per_period: Vec<usize>,
    pub corrected_cells: usize,
    pub params: ModelParams,
}

/// Build the deck of one scenario.
///
/// Relative data paths in the experiment are resolved against `base_dir`.
pub fn build_deck(experiment: &Experiment, scenario: &Scenario, base_dir: &Path) -> DeckResult<Deck> {
    let params = ModelParams::from_scenario(scenario)?;
    let model = &experiment.model;
    let domain = &model.domain;

    let grid = StructuredGrid::uniform(
        domain.length,
        domain.width,
        domain.top,
        domain.bottom,
        domain.layers,
        domain.rows,
        domain.columns,
    )?;

    let mut field = match &model.conductivity {
        ConductivityDef::Uniform { k } => ConductivityField::uniform(grid.shape(), *k),
        ConductivityDef::GaussianCsv { path } => {
            let path = if path.is_relative() {
                base_dir.join(path)
            } else {
                path.clone()
            };
            let z = load_gaussian_field(&path, grid.shape())?;
            ConductivityField::lognormal(grid.shape(), &z, params.hk_field_variance)?
        }
    };

    let constant_heads = constant_head_cells(&grid, &model.constant_heads);
    let initial_heads = initial_heads(&grid, &model.constant_heads);

    let q = params.pumping_rate_m3pd();
    let wells = model
        .wells
        .iter()
        .map(|def| site(def, q, params.pumping_method.as_deref()).resolve(&grid, &field))
        .collect::<Result<Vec<_>, _>>()?;

    let corrected = apply_policy_corrections(&mut field, &wells)?;
    let well_package = build_well_package(&wells, model.stress_periods.len())?;

    info!(
        simulation = %scenario.simulation_name,
        wells = wells.len(),
        allocations = well_package.allocation_count(),
        corrected,
        "built deck"
    );

    Ok(Deck {
        simulation_name: scenario.simulation_name.clone(),
        model_name: scenario.model_name.clone(),
        params,
        grid,
        field,
        stress_periods: model.stress_periods.clone(),
        solver: model.solver.clone(),
        storage: model.storage.clone(),
        constant_heads,
        initial_heads,
        wells,
        well_package,
    })
}

fn site(def: &WellDef, q: f64, pumping_method: Option<&str>) -> WellSite {
    WellSite {
        id: def.id.clone(),
        x: def.x,
        y: def.y,
        screen_top: def.screen_top,
        screen_bottom: def.screen_bottom,
        schedule: def
            .pumping
            .iter()
            .map(|p| PumpingStep {
                stress_period_id: p.stress_period_id,
                flow_rate: match p.rate {
                    RateDef::Scaled { factor } => factor * q,
                    RateDef::Fixed { m3_per_day } => m3_per_day,
                },
            })
            .collect(),
        policy: pumping_method.map(str::to_string).or_else(|| def.policy.clone()),
    }
}

/// Edge cells on every layer. A cell on two edges keeps the first head.
fn constant_head_cells(grid: &StructuredGrid, defs: &[ConstantHeadDef]) -> Vec<ChdCell> {
    let mut seen = BTreeSet::new();
    let mut cells = Vec::new();
    for def in defs {
        for layer in 0..grid.nlay {
            for cell in grid.edge_cells(def.side) {
                if seen.insert((layer, cell)) {
                    cells.push(ChdCell {
                        layer,
                        cell,
                        head: def.head,
                        name: def.name.clone(),
                    });
                }
            }
        }
    }
    debug!(cells = cells.len(), "constant head cells");
    cells
}

/// Linear west-to-east ramp between the west and east constant heads, on
/// every layer. Without that pair, the mean of the given heads, or the top
/// of the domain when there are none.
fn initial_heads(grid: &StructuredGrid, defs: &[ConstantHeadDef]) -> Vec<f64> {
    let head_on = |side: Side| defs.iter().find(|d| d.side == side).map(|d| d.head);
    let shape = grid.shape();

    let row: Vec<f64> = match (head_on(Side::West), head_on(Side::East)) {
        (Some(west), Some(east)) => (1..=grid.ncol)
            .map(|c| {
                let t = c as f64 / grid.ncol as f64;
                (1.0 - t) * west + t * east
            })
            .collect(),
        _ => {
            let flat = if defs.is_empty() {
                grid.top
            } else {
                defs.iter().map(|d| d.head).sum::<f64>() / defs.len() as f64
            };
            vec![flat; grid.ncol]
        }
    };

    let mut heads = Vec::with_capacity(shape.len());
    for _ in 0..shape.nlay * shape.nrow {
        heads.extend_from_slice(&row);
    }
    heads
}
