use crate::GfError;

/// Floating point type used throughout the workspace.
pub type Real = f64;

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, GfError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(GfError::NonFinite { what, value: v })
    }
}

/// `n` evenly spaced values from `start` to `end`, both inclusive.
///
/// `n == 1` yields `[start]`, `n == 0` yields an empty vector.
pub fn linspace(start: Real, end: Real, n: usize) -> Vec<Real> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let delta = (end - start) / (n - 1) as Real;
            let mut points: Vec<Real> = (0..n).map(|i| start + i as Real * delta).collect();
            // Ensure exact endpoint
            points[n - 1] = end;
            points
        }
    }
}
