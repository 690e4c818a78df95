//! Per-scenario run state.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ResultsError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Pending,
    Running,
    /// Terminated normally within the discrepancy threshold
    Success,
    /// Solver did not terminate normally
    Failed,
    /// Terminated normally but a budget discrepancy reached the threshold
    Alert,
}

impl RunStatus {
    pub const ALL: [RunStatus; 5] = [
        RunStatus::Pending,
        RunStatus::Running,
        RunStatus::Success,
        RunStatus::Failed,
        RunStatus::Alert,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RunStatus::Pending => "pending",
            RunStatus::Running => "running",
            RunStatus::Success => "success",
            RunStatus::Failed => "failed",
            RunStatus::Alert => "alert",
        }
    }

    /// True once the solver has finished with this scenario, whatever the
    /// outcome.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            RunStatus::Success | RunStatus::Failed | RunStatus::Alert
        )
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RunStatus {
    type Err = ResultsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RunStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s.trim())
            .ok_or_else(|| ResultsError::UnknownStatus {
                value: s.to_string(),
            })
    }
}

/// Number of rows in each state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub pending: usize,
    pub running: usize,
    pub success: usize,
    pub failed: usize,
    pub alert: usize,
}

impl StatusCounts {
    pub fn add(&mut self, status: RunStatus) {
        match status {
            RunStatus::Pending => self.pending += 1,
            RunStatus::Running => self.running += 1,
            RunStatus::Success => self.success += 1,
            RunStatus::Failed => self.failed += 1,
            RunStatus::Alert => self.alert += 1,
        }
    }

    pub fn get(&self, status: RunStatus) -> usize {
        match status {
            RunStatus::Pending => self.pending,
            RunStatus::Running => self.running,
            RunStatus::Success => self.success,
            RunStatus::Failed => self.failed,
            RunStatus::Alert => self.alert,
        }
    }

    pub fn total(&self) -> usize {
        self.pending + self.running + self.success + self.failed + self.alert
    }
}

impl FromIterator<RunStatus> for StatusCounts {
    fn from_iter<I: IntoIterator<Item = RunStatus>>(iter: I) -> Self {
        let mut counts = Self::default();
        for status in iter {
            counts.add(status);
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for status in RunStatus::ALL {
            assert_eq!(status.as_str().parse::<RunStatus>().unwrap(), status);
            assert_eq!(status.to_string(), status.as_str());
        }
    }

    #[test]
    fn unknown_status_is_rejected() {
        assert!(matches!(
            "done".parse::<RunStatus>(),
            Err(ResultsError::UnknownStatus { .. })
        ));
    }

    #[test]
    fn terminal_states() {
        assert!(!RunStatus::Pending.is_terminal());
        assert!(!RunStatus::Running.is_terminal());
        assert!(RunStatus::Alert.is_terminal());
    }

    #[test]
    fn counts_collect() {
        let counts: StatusCounts = [RunStatus::Success, RunStatus::Alert, RunStatus::Success]
            .into_iter()
            .collect();
        assert_eq!(counts.get(RunStatus::Success), 2);
        assert_eq!(counts.alert, 1);
        assert_eq!(counts.total(), 3);
    }
}
