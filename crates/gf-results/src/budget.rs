//! Percent discrepancy extraction from solver listing files.
//!
//! Each volume budget table in a listing starts with a line like
//!
//! ```text
//!   VOLUME BUDGET FOR ENTIRE MODEL AT END OF TIME STEP    1, STRESS PERIOD   2
//! ```
//!
//! and ends with a line holding two discrepancies, the cumulative one first:
//!
//! ```text
//!   PERCENT DISCREPANCY =           0.00     PERCENT DISCREPANCY =           0.01
//! ```

use std::path::Path;

use serde::Serialize;

use crate::{ResultsError, ResultsResult};

const BUDGET_MARKER: &str = "BUDGET FOR ENTIRE MODEL AT END OF TIME STEP";
const DISCREPANCY_MARKER: &str = "PERCENT DISCREPANCY =";

/// Discrepancies of one budget table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BudgetEntry {
    /// 1-based, as printed; 0 when the table header was not found
    pub time_step: usize,
    pub stress_period: usize,
    pub cumulative_pct: f64,
    pub rate_pct: f64,
}

impl BudgetEntry {
    /// Larger absolute discrepancy of the two.
    pub fn worst(&self) -> f64 {
        self.cumulative_pct.abs().max(self.rate_pct.abs())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BudgetReport {
    pub entries: Vec<BudgetEntry>,
}

impl BudgetReport {
    /// True if any rate or cumulative discrepancy reaches `threshold_pct` in
    /// absolute value.
    pub fn exceeds(&self, threshold_pct: f64) -> bool {
        self.entries.iter().any(|e| e.worst() >= threshold_pct)
    }

    pub fn max_abs_discrepancy(&self) -> Option<f64> {
        self.entries.iter().map(BudgetEntry::worst).reduce(f64::max)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

pub fn parse_listing_budget(text: &str) -> ResultsResult<BudgetReport> {
    let mut entries = Vec::new();
    let mut step = (0, 0);

    for (i, line) in text.lines().enumerate() {
        if let Some(at) = line.find(BUDGET_MARKER) {
            step = parse_step(&line[at + BUDGET_MARKER.len()..]).ok_or_else(|| {
                ResultsError::Listing {
                    line: i + 1,
                    reason: "unreadable time step header".to_string(),
                }
            })?;
            continue;
        }
        if !line.contains(DISCREPANCY_MARKER) {
            continue;
        }

        let values = line
            .split(DISCREPANCY_MARKER)
            .skip(1)
            .map(|v| v.trim().parse::<f64>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| ResultsError::Listing {
                line: i + 1,
                reason: e.to_string(),
            })?;
        let [cumulative_pct, rate_pct] = values[..] else {
            return Err(ResultsError::Listing {
                line: i + 1,
                reason: format!("expected 2 discrepancies, found {}", values.len()),
            });
        };

        entries.push(BudgetEntry {
            time_step: step.0,
            stress_period: step.1,
            cumulative_pct,
            rate_pct,
        });
    }

    Ok(BudgetReport { entries })
}

pub fn load_listing_budget(path: &Path) -> ResultsResult<BudgetReport> {
    let text = std::fs::read_to_string(path)?;
    parse_listing_budget(&text)
}

/// `"    1, STRESS PERIOD   2"` -> `(1, 2)`
fn parse_step(rest: &str) -> Option<(usize, usize)> {
    let (kstp, kper) = rest.split_once(',')?;
    let kper = kper.trim().strip_prefix("STRESS PERIOD")?;
    Some((kstp.trim().parse().ok()?, kper.trim().parse().ok()?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const LISTING: &str = "
  VOLUME BUDGET FOR ENTIRE MODEL AT END OF TIME STEP    1, STRESS PERIOD   1
  ---------------------------------------------------------------------------------------------------

     CUMULATIVE VOLUME      L**3       RATES FOR THIS TIME STEP      L**3/T          PACKAGE NAME
     ------------------                 ------------------------                     ----------------

           IN:                                      IN:
           ---                                      ---
                 CHD =        4500.0000                   CHD =          45.0000     CHD_0

            TOTAL IN =        4500.0000              TOTAL IN =          45.0000

          OUT:                                     OUT:
          ----                                     ----
                 CHD =        4500.0000                   CHD =          45.0000     CHD_0

           TOTAL OUT =        4500.0000             TOTAL OUT =          45.0000

            IN - OUT =       1.0000E-05              IN - OUT =       1.0000E-07

 PERCENT DISCREPANCY =           0.00     PERCENT DISCREPANCY =           0.00

  VOLUME BUDGET FOR ENTIRE MODEL AT END OF TIME STEP   15, STRESS PERIOD   2
 PERCENT DISCREPANCY =           0.35     PERCENT DISCREPANCY =          -1.20
";

    #[test]
    fn finds_every_discrepancy_pair() {
        let report = parse_listing_budget(LISTING).unwrap();
        assert_eq!(report.entries.len(), 2);
        assert_eq!(
            report.entries[1],
            BudgetEntry {
                time_step: 15,
                stress_period: 2,
                cumulative_pct: 0.35,
                rate_pct: -1.2,
            }
        );
        assert_eq!(report.entries[0].stress_period, 1);
    }

    #[test]
    fn threshold_uses_absolute_values_inclusively() {
        let report = parse_listing_budget(LISTING).unwrap();
        assert!(report.exceeds(1.0));
        assert!(report.exceeds(1.2));
        assert!(!report.exceeds(1.5));
        assert_eq!(report.max_abs_discrepancy(), Some(1.2));
    }

    #[test]
    fn listing_without_budgets_is_empty() {
        let report = parse_listing_budget("normal termination of simulation\n").unwrap();
        assert!(report.is_empty());
        assert!(!report.exceeds(1.0));
        assert_eq!(report.max_abs_discrepancy(), None);
    }

    #[test]
    fn malformed_discrepancy_is_an_error() {
        let text = " PERCENT DISCREPANCY =  abc     PERCENT DISCREPANCY =  0.1\n";
        assert!(matches!(
            parse_listing_budget(text),
            Err(ResultsError::Listing { line: 1, .. })
        ));
        let text = " PERCENT DISCREPANCY =  0.2\n";
        assert!(parse_listing_budget(text).is_err());
    }

    proptest! {
        #[test]
        fn parses_printed_values(cum in -50.0f64..50.0, rate in -50.0f64..50.0) {
            let text = format!(
                " PERCENT DISCREPANCY = {:>14.2}     PERCENT DISCREPANCY = {:>14.2}\n",
                cum, rate
            );
            let report = parse_listing_budget(&text).unwrap();
            prop_assert_eq!(report.entries.len(), 1);
            prop_assert!((report.entries[0].cumulative_pct - cum).abs() <= 0.005 + 1e-9);
            prop_assert!((report.entries[0].rate_pct - rate).abs() <= 0.005 + 1e-9);
        }
    }
}
