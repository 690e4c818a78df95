//! Progress events for long-running services.

use gf_results::RunStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchStage {
    OpeningRunTable,
    Skipping,
    RunningSolver,
    CheckingBudget,
    Finished,
    Completed,
}

impl BatchStage {
    pub fn label(&self) -> &'static str {
        match self {
            BatchStage::OpeningRunTable => "Opening run table",
            BatchStage::Skipping => "Skipping finished run",
            BatchStage::RunningSolver => "Running solver",
            BatchStage::CheckingBudget => "Checking budget",
            BatchStage::Finished => "Run finished",
            BatchStage::Completed => "Completed",
        }
    }
}

#[derive(Debug, Clone)]
pub struct BatchProgressEvent {
    pub stage: BatchStage,
    /// Row of the scenario table, if the event concerns one scenario
    pub index: Option<usize>,
    /// Position within the selected rows and their count
    pub position: usize,
    pub total: usize,
    pub status: Option<RunStatus>,
    pub elapsed_wall_s: f64,
    pub message: Option<String>,
}

/// One scenario deck built, and written when requested.
#[derive(Debug, Clone)]
pub struct ConfigureEvent {
    pub index: usize,
    pub total: usize,
    pub simulation_name: String,
    pub written: bool,
}
