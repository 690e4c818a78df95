//! Structured (layer, row, column) grid.

use gf_core::linspace;
use serde::{Deserialize, Serialize};

use crate::{GridError, GridResult};

/// Tolerance used when comparing layer bottoms against screen elevations.
pub const BOTTOM_TOLERANCE: f64 = 1e-7;

/// Grid dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridShape {
    pub nlay: usize,
    pub nrow: usize,
    pub ncol: usize,
}

impl GridShape {
    /// Cells per layer.
    pub fn ncpl(&self) -> usize {
        self.nrow * self.ncol
    }

    pub fn len(&self) -> usize {
        self.nlay * self.ncpl()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Flat offset of a cell in `[layer][row][col]` storage.
    pub fn offset(&self, layer: usize, cell: CellIndex) -> usize {
        layer * self.ncpl() + cell.row * self.ncol + cell.col
    }
}

/// Horizontal cell position. Row 0 is the northern edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellIndex {
    pub row: usize,
    pub col: usize,
}

/// Domain boundary edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    West,
    East,
    North,
    South,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StructuredGrid {
    pub nlay: usize,
    pub nrow: usize,
    pub ncol: usize,
    /// Column width along x
    pub delr: f64,
    /// Row height along y
    pub delc: f64,
    pub top: f64,
    /// Bottom elevation of each layer, top to bottom
    pub botm: Vec<f64>,
}

impl StructuredGrid {
    /// Regular grid with equal-height layers between `top` and `bottom`.
    #[allow(clippy::too_many_arguments)]
    pub fn uniform(
        length: f64,
        width: f64,
        top: f64,
        bottom: f64,
        nlay: usize,
        nrow: usize,
        ncol: usize,
    ) -> GridResult<Self> {
        if nlay == 0 || nrow == 0 || ncol == 0 {
            return Err(GridError::InvalidDimension {
                what: format!("nlay={}, nrow={}, ncol={}", nlay, nrow, ncol),
            });
        }
        if !(length > 0.0) || !(width > 0.0) {
            return Err(GridError::InvalidDimension {
                what: format!("length={}, width={}", length, width),
            });
        }
        if !(top > bottom) {
            return Err(GridError::InvalidDimension {
                what: format!("top {} must be above bottom {}", top, bottom),
            });
        }

        let first_bottom = top - (top - bottom) / nlay as f64;
        Ok(Self {
            nlay,
            nrow,
            ncol,
            delr: length / ncol as f64,
            delc: width / nrow as f64,
            top,
            botm: linspace(first_bottom, bottom, nlay),
        })
    }

    pub fn shape(&self) -> GridShape {
        GridShape {
            nlay: self.nlay,
            nrow: self.nrow,
            ncol: self.ncol,
        }
    }

    pub fn length(&self) -> f64 {
        self.delr * self.ncol as f64
    }

    pub fn width(&self) -> f64 {
        self.delc * self.nrow as f64
    }

    /// Cell containing the point. Points on the east/south edges fall in the
    /// last column/row.
    pub fn cell_at(&self, x: f64, y: f64) -> GridResult<CellIndex> {
        if !(0.0..=self.length()).contains(&x) || !(0.0..=self.width()).contains(&y) {
            return Err(GridError::OutsideDomain { x, y });
        }
        let col = ((x / self.delr).floor() as usize).min(self.ncol - 1);
        let row = (((self.width() - y) / self.delc).floor() as usize).min(self.nrow - 1);
        Ok(CellIndex { row, col })
    }

    /// Layers intersected by a well screen, top to bottom.
    ///
    /// A layer is screened when its bottom lies below `screen_top` and above
    /// `screen_bottom`.
    pub fn screen_layers(&self, screen_top: f64, screen_bottom: f64) -> Vec<usize> {
        self.botm
            .iter()
            .enumerate()
            .filter(|(_, b)| {
                (*b - screen_top) < BOTTOM_TOLERANCE && (*b - screen_bottom) >= BOTTOM_TOLERANCE
            })
            .map(|(layer, _)| layer)
            .collect()
    }

    pub fn layer_top(&self, layer: usize) -> GridResult<f64> {
        self.check_layer(layer)?;
        Ok(if layer == 0 {
            self.top
        } else {
            self.botm[layer - 1]
        })
    }

    pub fn layer_thickness(&self, layer: usize) -> GridResult<f64> {
        let thickness = self.layer_top(layer)? - self.botm[layer];
        gf_core::ensure_finite(thickness, "layer thickness").map_err(GridError::from)
    }

    /// Cells along a boundary edge, in row/column order.
    pub fn edge_cells(&self, side: Side) -> Vec<CellIndex> {
        match side {
            Side::West => (0..self.nrow).map(|row| CellIndex { row, col: 0 }).collect(),
            Side::East => (0..self.nrow)
                .map(|row| CellIndex {
                    row,
                    col: self.ncol - 1,
                })
                .collect(),
            Side::North => (0..self.ncol).map(|col| CellIndex { row: 0, col }).collect(),
            Side::South => (0..self.ncol)
                .map(|col| CellIndex {
                    row: self.nrow - 1,
                    col,
                })
                .collect(),
        }
    }

    fn check_layer(&self, layer: usize) -> GridResult<()> {
        if layer >= self.nlay {
            return Err(GridError::LayerOutOfRange {
                layer,
                nlay: self.nlay,
            });
        }
        Ok(())
    }
}
