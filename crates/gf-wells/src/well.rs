//! Well model resolved against the grid.

use gf_grid::{CellIndex, ConductivityField, StructuredGrid};

use crate::{WellError, WellResult};

/// Rate applied during one stress period (m3/day, negative = extraction).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PumpingStep {
    pub stress_period_id: usize,
    pub flow_rate: f64,
}

/// Geometry and conductivity of one screened layer at the well cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenedLayer {
    pub layer: usize,
    pub thickness: f64,
    pub k: f64,
    pub k22: Option<f64>,
}

/// Well as declared: location, screen elevations and schedule.
#[derive(Debug, Clone, PartialEq)]
pub struct WellSite {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub screen_top: f64,
    pub screen_bottom: f64,
    pub schedule: Vec<PumpingStep>,
    /// Requested policy name, if any
    pub policy: Option<String>,
}

/// Well with its screen translated into model layers.
#[derive(Debug, Clone, PartialEq)]
pub struct Well {
    pub id: String,
    pub cell: CellIndex,
    /// Screened layers, top to bottom
    pub layers: Vec<ScreenedLayer>,
    pub schedule: Vec<PumpingStep>,
    pub policy: Option<String>,
}

impl WellSite {
    /// Locate the well cell, find the screened layers and fetch their
    /// thickness and conductivity.
    pub fn resolve(&self, grid: &StructuredGrid, field: &ConductivityField) -> WellResult<Well> {
        let cell = grid.cell_at(self.x, self.y)?;
        let layers = grid
            .screen_layers(self.screen_top, self.screen_bottom)
            .into_iter()
            .map(|layer| -> WellResult<ScreenedLayer> {
                Ok(ScreenedLayer {
                    layer,
                    thickness: grid.layer_thickness(layer)?,
                    k: field.k(layer, cell),
                    k22: field.k22(layer, cell),
                })
            })
            .collect::<WellResult<Vec<_>>>()?;

        if layers.is_empty() {
            return Err(WellError::EmptyScreen {
                well_id: self.id.clone(),
            });
        }

        Ok(Well {
            id: self.id.clone(),
            cell,
            layers,
            schedule: self.schedule.clone(),
            policy: self.policy.clone(),
        })
    }
}

impl Well {
    /// Boundary name for entries of one stress period.
    pub fn label(&self, stress_period_id: usize) -> String {
        format!("{}_SP{}", self.id, stress_period_id)
    }

    pub fn deepest(&self) -> Option<&ScreenedLayer> {
        self.layers.last()
    }

    pub fn is_pumping(&self) -> bool {
        !self.schedule.is_empty()
    }
}
