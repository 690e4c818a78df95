//! MODFLOW 6 input file writer.
//!
//! One simulation with a single groundwater-flow model. Arrays are written
//! per layer, as a `CONSTANT` when the layer is uniform and as `INTERNAL`
//! rows otherwise. Cell ids in list input are 1-based.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use gf_grid::GridShape;
use tracing::debug;

use crate::DeckResult;
use crate::deck::Deck;

/// Writes a deck as solver input files into a simulation folder.
pub trait DeckWriter {
    /// Write every input file into `dir`, creating it if needed. Returns the
    /// written paths.
    fn write(&self, deck: &Deck, dir: &Path) -> DeckResult<Vec<PathBuf>>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Mf6Writer;

impl DeckWriter for Mf6Writer {
    fn write(&self, deck: &Deck, dir: &Path) -> DeckResult<Vec<PathBuf>> {
        fs::create_dir_all(dir)?;
        let files = render(deck);
        let mut written = Vec::with_capacity(files.len());
        for (name, text) in files {
            let path = dir.join(name);
            fs::write(&path, text)?;
            written.push(path);
        }
        debug!(
            simulation = %deck.simulation_name,
            files = written.len(),
            dir = %dir.display(),
            "wrote deck"
        );
        Ok(written)
    }
}

/// File name and contents of every input file, `mfsim.nam` first.
pub fn render(deck: &Deck) -> Vec<(String, String)> {
    let sim = &deck.simulation_name;
    let model = &deck.model_name;

    let mut packages = vec![
        ("DIS6", "dis", dis(deck)),
        ("NPF6", "npf", npf(deck)),
        ("IC6", "ic", ic(deck)),
    ];
    if !deck.constant_heads.is_empty() {
        packages.push(("CHD6", "chd", chd(deck)));
    }
    if deck.well_package.maxbound() > 0 {
        packages.push(("WEL6", "wel", wel(deck)));
    }
    packages.push(("STO6", "sto", sto(deck)));
    packages.push(("OC6", "oc", oc(deck)));

    let mut files = vec![
        ("mfsim.nam".to_string(), mfsim_nam(deck)),
        (format!("{}.tdis", sim), tdis(deck)),
        (format!("{}.ims", sim), ims(deck)),
    ];

    let mut nam = String::new();
    nam.push_str("BEGIN options\n  SAVE_FLOWS\n");
    if deck.params.newton_raphson {
        nam.push_str("  NEWTON  UNDER_RELAXATION\n");
    }
    nam.push_str("END options\n\nBEGIN packages\n");
    for (ftype, ext, _) in &packages {
        let _ = writeln!(nam, "  {}  {}.{}  {}", ftype, model, ext, ext);
    }
    nam.push_str("END packages\n");
    files.push((format!("{}.nam", model), nam));

    for (_, ext, text) in packages {
        files.push((format!("{}.{}", model, ext), text));
    }
    files
}

fn mfsim_nam(deck: &Deck) -> String {
    let sim = &deck.simulation_name;
    let model = &deck.model_name;
    format!(
        "BEGIN options\nEND options\n\n\
         BEGIN timing\n  TDIS6  {sim}.tdis\nEND timing\n\n\
         BEGIN models\n  gwf6  {model}.nam  {model}\nEND models\n\n\
         BEGIN exchanges\nEND exchanges\n\n\
         BEGIN solutiongroup  1\n  ims6  {sim}.ims  {model}\nEND solutiongroup\n"
    )
}

fn tdis(deck: &Deck) -> String {
    let mut out = String::new();
    out.push_str("BEGIN options\n  TIME_UNITS  days\nEND options\n\n");
    let _ = writeln!(out, "BEGIN dimensions\n  NPER  {}\nEND dimensions\n", deck.nper());
    out.push_str("BEGIN perioddata\n");
    for sp in &deck.stress_periods {
        let _ = writeln!(
            out,
            "  {:?}  {}  {:?}",
            sp.length, sp.n_time_steps, sp.ts_multiplier
        );
    }
    out.push_str("END perioddata\n");
    out
}

fn ims(deck: &Deck) -> String {
    let solver = &deck.solver;
    let hclose = deck.params.head_convergence;
    let mut out = String::new();
    let _ = writeln!(
        out,
        "BEGIN options\n  PRINT_OPTION  summary\n  COMPLEXITY  {}\n  NO_PTC  ALL\nEND options\n",
        solver.complexity.keyword()
    );
    let _ = writeln!(
        out,
        "BEGIN nonlinear\n  OUTER_DVCLOSE  {:?}\n  OUTER_MAXIMUM  {}\nEND nonlinear\n",
        hclose, solver.outer_maximum
    );
    let _ = writeln!(
        out,
        "BEGIN linear\n  INNER_MAXIMUM  {}\n  INNER_DVCLOSE  {:?}\n  LINEAR_ACCELERATION  {}\n  \
         RELAXATION_FACTOR  {:?}\n  SCALING_METHOD  none\n  REORDERING_METHOD  none\nEND linear",
        solver.inner_maximum,
        hclose,
        solver.linear_acceleration.keyword(),
        solver.relaxation_factor
    );
    out
}

fn dis(deck: &Deck) -> String {
    let grid = &deck.grid;
    let mut out = String::new();
    out.push_str("BEGIN options\n  LENGTH_UNITS  meters\nEND options\n\n");
    let _ = writeln!(
        out,
        "BEGIN dimensions\n  NLAY  {}\n  NROW  {}\n  NCOL  {}\nEND dimensions\n",
        grid.nlay, grid.nrow, grid.ncol
    );
    out.push_str("BEGIN griddata\n");
    let _ = writeln!(out, "  delr\n    CONSTANT  {:?}", grid.delr);
    let _ = writeln!(out, "  delc\n    CONSTANT  {:?}", grid.delc);
    let _ = writeln!(out, "  top\n    CONSTANT  {:?}", grid.top);
    out.push_str("  botm  LAYERED\n");
    for b in &grid.botm {
        let _ = writeln!(out, "    CONSTANT  {:?}", b);
    }
    out.push_str("END griddata\n");
    out
}

fn npf(deck: &Deck) -> String {
    let shape = deck.grid.shape();
    let field = &deck.field;
    let mut out = String::new();
    out.push_str("BEGIN options\n  SAVE_SPECIFIC_DISCHARGE\nEND options\n\n");
    out.push_str("BEGIN griddata\n  icelltype\n    CONSTANT  0\n");
    layered(&mut out, "k", field.k_values(), shape);
    if let Some(k22) = field.k22_values() {
        layered(&mut out, "k22", k22, shape);
    }
    if let Some(k33) = field.k33_values() {
        layered(&mut out, "k33", k33, shape);
    }
    out.push_str("END griddata\n");
    out
}

fn ic(deck: &Deck) -> String {
    let mut out = String::from("BEGIN options\nEND options\n\nBEGIN griddata\n");
    layered(&mut out, "strt", &deck.initial_heads, deck.grid.shape());
    out.push_str("END griddata\n");
    out
}

fn chd(deck: &Deck) -> String {
    let mut out = String::new();
    out.push_str("BEGIN options\n  BOUNDNAMES\nEND options\n\n");
    let _ = writeln!(
        out,
        "BEGIN dimensions\n  MAXBOUND  {}\nEND dimensions\n",
        deck.constant_heads.len()
    );
    out.push_str("BEGIN period  1\n");
    for c in &deck.constant_heads {
        let _ = writeln!(
            out,
            "  {}  {}  {}  {:?}  {}",
            c.layer + 1,
            c.cell.row + 1,
            c.cell.col + 1,
            c.head,
            c.name
        );
    }
    out.push_str("END period  1\n");
    out
}

fn wel(deck: &Deck) -> String {
    let package = &deck.well_package;
    let mut out = String::new();
    out.push_str("BEGIN options\n  BOUNDNAMES\n  SAVE_FLOWS\nEND options\n\n");
    let _ = writeln!(
        out,
        "BEGIN dimensions\n  MAXBOUND  {}\nEND dimensions",
        package.maxbound()
    );
    // Every period gets a block so an idle period switches wells off
    for (sp, entries) in package.periods.iter().enumerate() {
        let _ = writeln!(out, "\nBEGIN period  {}", sp + 1);
        for a in entries {
            let _ = writeln!(
                out,
                "  {}  {}  {}  {:?}  {}",
                a.layer + 1,
                a.cell.row + 1,
                a.cell.col + 1,
                a.flow_rate,
                a.label
            );
        }
        let _ = writeln!(out, "END period  {}", sp + 1);
    }
    out
}

fn sto(deck: &Deck) -> String {
    let storage = &deck.storage;
    let mut out = String::new();
    out.push_str("BEGIN options\n  SAVE_FLOWS\nEND options\n\n");
    out.push_str("BEGIN griddata\n");
    let _ = writeln!(
        out,
        "  iconvert\n    CONSTANT  {}",
        if storage.convertible { 1 } else { 0 }
    );
    let _ = writeln!(out, "  ss\n    CONSTANT  {:?}", deck.params.specific_storage);
    let _ = writeln!(out, "  sy\n    CONSTANT  {:?}", storage.specific_yield);
    out.push_str("END griddata\n");
    for (sp, period) in deck.stress_periods.iter().enumerate() {
        let state = if period.steady_state {
            "STEADY-STATE"
        } else {
            "TRANSIENT"
        };
        let _ = writeln!(out, "\nBEGIN period  {}\n  {}\nEND period  {}", sp + 1, state, sp + 1);
    }
    out
}

fn oc(deck: &Deck) -> String {
    format!(
        "BEGIN options\n  BUDGET  FILEOUT  {}\n  HEAD  FILEOUT  {}\nEND options\n\n\
         BEGIN period  1\n  SAVE  HEAD  ALL\n  SAVE  BUDGET  ALL\nEND period  1\n",
        deck.budget_file(),
        deck.head_file()
    )
}

/// Per-layer array block for a `[layer][row][col]` value slice.
fn layered(out: &mut String, name: &str, values: &[f64], shape: GridShape) {
    let _ = writeln!(out, "  {}  LAYERED", name);
    let ncpl = shape.ncpl();
    for layer in values.chunks(ncpl).take(shape.nlay) {
        let first = layer.first().copied().unwrap_or(0.0);
        if layer.iter().all(|v| *v == first) {
            let _ = writeln!(out, "    CONSTANT  {:?}", first);
            continue;
        }
        out.push_str("    INTERNAL  FACTOR  1.0\n");
        for row in layer.chunks(shape.ncol) {
            out.push_str("     ");
            for v in row {
                let _ = write!(out, " {:?}", v);
            }
            out.push('\n');
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layered_array_uses_constant_for_uniform_layers() {
        let shape = GridShape {
            nlay: 2,
            nrow: 2,
            ncol: 2,
        };
        let mut out = String::new();
        layered(&mut out, "k", &[1.0, 1.0, 1.0, 1.0, 1.0, 2.0, 3.0, 4.0], shape);
        assert_eq!(
            out,
            "  k  LAYERED\n    CONSTANT  1.0\n    INTERNAL  FACTOR  1.0\n      1.0 2.0\n      3.0 4.0\n"
        );
    }
}
