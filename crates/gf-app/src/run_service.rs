//! Batch execution of configured scenarios.
//!
//! Every row moves `pending -> running -> {success, failed, alert}` and each
//! transition is persisted before the next starts. A scenario that fails never
//! stops the batch.

use std::ops::Range;
use std::time::Instant;

use gf_results::{RunStatus, RunStatusStore, StatusCounts, load_listing_budget};
use gf_scenarios::Scenario;
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::error::{AppError, AppResult};
use crate::experiment_service::load_experiment;
use crate::progress::{BatchProgressEvent, BatchStage};
use crate::runner::SolverRunner;

/// Request to run part of an experiment.
#[derive(Debug, Clone, Default)]
pub struct BatchRequest {
    pub experiment: String,
    /// First row, inclusive; defaults to 0
    pub start: Option<usize>,
    /// Last row, exclusive; defaults to the row count
    pub end: Option<usize>,
    /// Reset every row to pending before running
    pub clean: bool,
    /// Leave rows already `success` or `alert` untouched
    pub resume: bool,
}

#[derive(Debug, Clone)]
pub struct ScenarioOutcome {
    pub index: usize,
    pub simulation_name: String,
    pub status: RunStatus,
    pub skipped: bool,
    pub max_discrepancy_pct: Option<f64>,
    pub message: Option<String>,
}

#[derive(Debug, Clone)]
pub struct BatchSummary {
    pub experiment: String,
    pub started_at: String,
    pub finished_at: String,
    pub selected: Range<usize>,
    pub outcomes: Vec<ScenarioOutcome>,
    /// Statuses of the whole table after the batch
    pub counts: StatusCounts,
}

#[derive(Debug, Clone)]
pub struct ExperimentStatus {
    pub experiment: String,
    pub rows: Vec<(String, RunStatus)>,
    pub counts: StatusCounts,
}

/// Rows `start..end` of a table with `len` rows.
pub fn select_indices(start: Option<usize>, end: Option<usize>, len: usize) -> AppResult<Range<usize>> {
    let start = start.unwrap_or(0);
    let end = end.unwrap_or(len);
    if end > len {
        return Err(AppError::InvalidInput(format!(
            "end {} is past the last scenario ({} rows)",
            end, len
        )));
    }
    if start > end {
        return Err(AppError::InvalidInput(format!(
            "start {} is after end {}",
            start, end
        )));
    }
    Ok(start..end)
}

#[allow(clippy::too_many_arguments)]
fn emit_progress(
    progress_cb: &mut Option<&mut dyn FnMut(BatchProgressEvent)>,
    stage: BatchStage,
    started: Instant,
    total: usize,
    position: usize,
    scenario: Option<&Scenario>,
    status: Option<RunStatus>,
    message: Option<String>,
) {
    if let Some(cb) = progress_cb.as_deref_mut() {
        cb(BatchProgressEvent {
            stage,
            index: scenario.map(|s| s.index),
            position,
            total,
            status,
            elapsed_wall_s: started.elapsed().as_secs_f64(),
            message,
        });
    }
}

/// Run the selected scenarios of an experiment one after the other.
pub fn run_batch(
    config: &AppConfig,
    request: &BatchRequest,
    runner: &dyn SolverRunner,
    mut progress: Option<&mut dyn FnMut(BatchProgressEvent)>,
) -> AppResult<BatchSummary> {
    let started = Instant::now();
    let started_at = chrono::Utc::now().to_rfc3339();
    let name = request.experiment.as_str();

    let (_, table) = load_experiment(config, name)?;
    let selected = select_indices(request.start, request.end, table.len())?;
    let total = selected.len();

    for scenario in &table.rows[selected.clone()] {
        let dir = config.simulation_dir(name, &scenario.simulation_name);
        if !dir.is_dir() {
            return Err(AppError::InvalidInput(format!(
                "simulation folder {} is missing, configure the experiment first",
                dir.display()
            )));
        }
    }

    emit_progress(&mut progress, BatchStage::OpeningRunTable, started, total, 0, None, None, None);
    let mut store = RunStatusStore::open(&config.runs_path(name), &table, request.clean)?;

    let mut outcomes = Vec::with_capacity(total);
    for (position, scenario) in table.rows[selected.clone()].iter().enumerate() {
        let index = scenario.index;
        let current = store.status(index).unwrap_or(RunStatus::Pending);
        if request.resume && matches!(current, RunStatus::Success | RunStatus::Alert) {
            emit_progress(
                &mut progress,
                BatchStage::Skipping,
                started,
                total,
                position,
                Some(scenario),
                Some(current),
                None,
            );
            outcomes.push(ScenarioOutcome {
                index,
                simulation_name: scenario.simulation_name.clone(),
                status: current,
                skipped: true,
                max_discrepancy_pct: None,
                message: None,
            });
            continue;
        }

        store.set_status(index, RunStatus::Running)?;
        emit_progress(
            &mut progress,
            BatchStage::RunningSolver,
            started,
            total,
            position,
            Some(scenario),
            Some(RunStatus::Running),
            None,
        );

        let outcome = run_one(config, name, scenario, runner, &mut progress, started, total, position);
        store.set_status(index, outcome.status)?;
        emit_progress(
            &mut progress,
            BatchStage::Finished,
            started,
            total,
            position,
            Some(scenario),
            Some(outcome.status),
            outcome.message.clone(),
        );
        outcomes.push(outcome);
    }

    let counts = store.counts();
    emit_progress(&mut progress, BatchStage::Completed, started, total, total, None, None, None);
    info!(
        experiment = name,
        ran = outcomes.iter().filter(|o| !o.skipped).count(),
        success = counts.success,
        failed = counts.failed,
        alert = counts.alert,
        "batch finished"
    );

    Ok(BatchSummary {
        experiment: name.to_string(),
        started_at,
        finished_at: chrono::Utc::now().to_rfc3339(),
        selected,
        outcomes,
        counts,
    })
}

#[allow(clippy::too_many_arguments)]
fn run_one(
    config: &AppConfig,
    experiment: &str,
    scenario: &Scenario,
    runner: &dyn SolverRunner,
    progress: &mut Option<&mut dyn FnMut(BatchProgressEvent)>,
    started: Instant,
    total: usize,
    position: usize,
) -> ScenarioOutcome {
    let dir = config.simulation_dir(experiment, &scenario.simulation_name);
    let failed = |message: String| {
        warn!(simulation = %scenario.simulation_name, "{}", message);
        ScenarioOutcome {
            index: scenario.index,
            simulation_name: scenario.simulation_name.clone(),
            status: RunStatus::Failed,
            skipped: false,
            max_discrepancy_pct: None,
            message: Some(message),
        }
    };

    match runner.run(&dir) {
        Ok(outcome) if outcome.normal_termination => {}
        Ok(outcome) => {
            return failed(
                outcome
                    .message
                    .unwrap_or_else(|| "solver did not terminate normally".to_string()),
            );
        }
        Err(e) => return failed(format!("solver could not be run: {}", e)),
    }

    emit_progress(
        progress,
        BatchStage::CheckingBudget,
        started,
        total,
        position,
        Some(scenario),
        Some(RunStatus::Running),
        None,
    );
    let listing = dir.join(format!("{}.lst", scenario.model_name));
    let report = match load_listing_budget(&listing) {
        Ok(report) => report,
        Err(e) => return failed(format!("listing {} unusable: {}", listing.display(), e)),
    };

    let max = report.max_abs_discrepancy();
    let status = if report.exceeds(config.discrepancy_threshold_pct) {
        warn!(
            simulation = %scenario.simulation_name,
            max_discrepancy_pct = max.unwrap_or_default(),
            "budget discrepancy above threshold"
        );
        RunStatus::Alert
    } else {
        RunStatus::Success
    };

    ScenarioOutcome {
        index: scenario.index,
        simulation_name: scenario.simulation_name.clone(),
        status,
        skipped: false,
        max_discrepancy_pct: max,
        message: None,
    }
}

/// Current state of every row, without creating the run table.
pub fn experiment_status(config: &AppConfig, name: &str) -> AppResult<ExperimentStatus> {
    let (_, table) = load_experiment(config, name)?;
    let runs_path = config.runs_path(name);

    let statuses: Vec<RunStatus> = if runs_path.exists() {
        RunStatusStore::open(&runs_path, &table, false)?.statuses().to_vec()
    } else {
        vec![RunStatus::Pending; table.len()]
    };

    let rows: Vec<(String, RunStatus)> = table
        .iter()
        .map(|s| s.simulation_name.clone())
        .zip(statuses.iter().copied())
        .collect();

    Ok(ExperimentStatus {
        experiment: name.to_string(),
        rows,
        counts: statuses.into_iter().collect(),
    })
}
