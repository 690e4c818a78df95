//! Hydraulic conductivity field (m/day).
//!
//! Values are stored flat in `[layer][row][col]` order. `k22` and `k33` are
//! optional, matching the solver's node-property-flow inputs where absent
//! components default to `k`.

use std::collections::BTreeSet;
use std::fs::File;
use std::path::Path;

use crate::grid::{CellIndex, GridShape};
use crate::{GridError, GridResult};

#[derive(Debug, Clone, PartialEq)]
pub struct ConductivityField {
    shape: GridShape,
    k: Vec<f64>,
    k22: Option<Vec<f64>>,
    k33: Option<Vec<f64>>,
    /// Cells whose vertical conductivity has been rewritten by a correction
    corrected: BTreeSet<(usize, CellIndex)>,
}

impl ConductivityField {
    pub fn uniform(shape: GridShape, k: f64) -> Self {
        Self {
            shape,
            k: vec![k; shape.len()],
            k22: None,
            k33: None,
            corrected: BTreeSet::new(),
        }
    }

    pub fn from_values(shape: GridShape, k: Vec<f64>) -> GridResult<Self> {
        check_len(shape, &k)?;
        Ok(Self {
            shape,
            k,
            k22: None,
            k33: None,
            corrected: BTreeSet::new(),
        })
    }

    /// Log-normal field `k = exp(sqrt(variance) * z)` from standard normal
    /// scores `z`.
    pub fn lognormal(shape: GridShape, z: &[f64], variance: f64) -> GridResult<Self> {
        if !(variance >= 0.0) {
            return Err(GridError::InvalidDimension {
                what: format!("field variance {} must be non-negative", variance),
            });
        }
        let sigma = variance.sqrt();
        Self::from_values(shape, z.iter().map(|z| (sigma * z).exp()).collect())
    }

    /// Attach the secondary horizontal component.
    pub fn with_k22(mut self, k22: Vec<f64>) -> GridResult<Self> {
        check_len(self.shape, &k22)?;
        self.k22 = Some(k22);
        Ok(self)
    }

    pub fn shape(&self) -> GridShape {
        self.shape
    }

    pub fn k(&self, layer: usize, cell: CellIndex) -> f64 {
        self.k[self.shape.offset(layer, cell)]
    }

    pub fn k22(&self, layer: usize, cell: CellIndex) -> Option<f64> {
        let at = self.shape.offset(layer, cell);
        self.k22.as_ref().map(|v| v[at])
    }

    /// Vertical conductivity; falls back to `k` when not set.
    pub fn k33(&self, layer: usize, cell: CellIndex) -> f64 {
        let at = self.shape.offset(layer, cell);
        self.k33.as_ref().map_or(self.k[at], |v| v[at])
    }

    pub fn k_values(&self) -> &[f64] {
        &self.k
    }

    pub fn k22_values(&self) -> Option<&[f64]> {
        self.k22.as_deref()
    }

    pub fn k33_values(&self) -> Option<&[f64]> {
        self.k33.as_deref()
    }

    /// Set vertical conductivity of one cell, materializing `k33` from `k`
    /// on first use.
    pub fn set_k33(&mut self, layer: usize, cell: CellIndex, value: f64) {
        let at = self.shape.offset(layer, cell);
        let k = &self.k;
        self.k33.get_or_insert_with(|| k.clone())[at] = value;
    }

    /// Record a correction on a cell. Returns false if it was already recorded.
    pub fn mark_corrected(&mut self, layer: usize, cell: CellIndex) -> bool {
        self.corrected.insert((layer, cell))
    }

    pub fn is_corrected(&self, layer: usize, cell: CellIndex) -> bool {
        self.corrected.contains(&(layer, cell))
    }

    pub fn corrected_count(&self) -> usize {
        self.corrected.len()
    }
}

fn check_len(shape: GridShape, values: &[f64]) -> GridResult<()> {
    if values.len() != shape.len() {
        return Err(GridError::FieldShape {
            expected: shape.len(),
            got: values.len(),
        });
    }
    Ok(())
}

/// Read a one-column gaussian score file (with a header line) and reorder it
/// into `[layer][row][col]` storage.
///
/// The file lists values with the layer index varying fastest, then the row,
/// then the column.
pub fn load_gaussian_field(path: &Path, shape: GridShape) -> GridResult<Vec<f64>> {
    let file = File::open(path)?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(file);

    let mut raw = Vec::with_capacity(shape.len());
    for (i, record) in reader.records().enumerate() {
        let record = record?;
        let cell = record.get(0).unwrap_or("").trim();
        let value: f64 = cell.parse().map_err(|_| GridError::FieldValue {
            // header is line 1
            line: i + 2,
            value: cell.to_string(),
        })?;
        raw.push(value);
    }
    check_len(shape, &raw)?;

    let mut values = vec![0.0; shape.len()];
    for col in 0..shape.ncol {
        for row in 0..shape.nrow {
            for layer in 0..shape.nlay {
                let src = col * shape.nrow * shape.nlay + row * shape.nlay + layer;
                values[shape.offset(layer, CellIndex { row, col })] = raw[src];
            }
        }
    }
    Ok(values)
}
