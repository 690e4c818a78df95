use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use gf_app::{
    AppConfig, AppError, AppResult, BatchProgressEvent, BatchRequest, BatchStage, ProcessRunner,
    configure_experiment, experiment_status, load_definition, load_experiment, run_batch,
    setup_experiment,
};
use gf_results::load_listing_budget;

#[derive(Parser)]
#[command(name = "gf-cli")]
#[command(about = "groundflow CLI - groundwater scenario sweeps for MODFLOW 6", long_about = None)]
struct Cli {
    /// Application config file (defaults to ./groundflow.yaml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an experiment folder and its scenario table
    Setup {
        /// Path to the experiment definition YAML
        definition: PathBuf,
        /// Experiment folder name (defaults to the definition's name)
        #[arg(long)]
        experiment: Option<String>,
        /// Simulation base name
        #[arg(long)]
        sim: Option<String>,
    },
    /// Build solver input for every scenario
    Configure {
        #[arg(long)]
        experiment: String,
        /// Write input files; otherwise print deck summaries as JSON
        #[arg(long)]
        write: bool,
    },
    /// Run the solver over configured scenarios
    Run {
        #[arg(long)]
        experiment: String,
        /// First scenario index (inclusive)
        #[arg(long)]
        start: Option<usize>,
        /// Last scenario index (exclusive)
        #[arg(long)]
        end: Option<usize>,
        /// Actually run; without it nothing is executed
        #[arg(long)]
        run: bool,
        /// Reset every run status to pending first
        #[arg(long)]
        clean: bool,
        /// Skip scenarios already finished with success or alert
        #[arg(long)]
        resume: bool,
    },
    /// Show run status of an experiment
    Status {
        #[arg(long)]
        experiment: String,
    },
    /// Report percent discrepancies of a listing file
    CheckBudget {
        listing: PathBuf,
        /// Alert threshold in percent (defaults to the configured one)
        #[arg(long)]
        threshold: Option<f64>,
    },
}

fn main() -> AppResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref())?;
    debug!(
        solver = %config.solver.executable.display(),
        base = %config.folders.base.display(),
        "loaded configuration"
    );

    match cli.command {
        Commands::Setup {
            definition,
            experiment,
            sim,
        } => cmd_setup(&config, &definition, experiment, sim),
        Commands::Configure { experiment, write } => cmd_configure(&config, &experiment, write),
        Commands::Run {
            experiment,
            start,
            end,
            run,
            clean,
            resume,
        } => {
            let request = BatchRequest {
                experiment,
                start,
                end,
                clean,
                resume,
            };
            cmd_run(&config, &request, run)
        }
        Commands::Status { experiment } => cmd_status(&config, &experiment),
        Commands::CheckBudget { listing, threshold } => {
            cmd_check_budget(&listing, threshold.unwrap_or(config.discrepancy_threshold_pct))
        }
    }
}

fn cmd_setup(
    config: &AppConfig,
    definition: &Path,
    experiment: Option<String>,
    sim: Option<String>,
) -> AppResult<()> {
    println!("Setting up experiment from: {}", definition.display());
    let mut def = load_definition(definition)?;
    if let Some(sim) = sim {
        def.base_name = sim;
    }
    let name = experiment.unwrap_or_else(|| def.name.clone());

    let response = setup_experiment(config, &def, &name)?;
    println!("✓ Experiment '{}' created in {}", name, response.experiment_dir.display());
    println!("  Parameters: {}", response.parameters.join(", "));
    println!("  Scenarios: {}", response.scenario_count);
    println!("  Table: {}", response.scenarios_path.display());
    Ok(())
}

fn cmd_configure(config: &AppConfig, experiment: &str, write: bool) -> AppResult<()> {
    let response = configure_experiment(
        config,
        experiment,
        write,
        Some(&mut |event| {
            print!("\r  built {}/{} {}", event.index + 1, event.total, event.simulation_name);
            let _ = io::stdout().flush();
        }),
    )?;
    clear_progress_line();

    if write {
        println!(
            "✓ Wrote {} simulation folders for '{}'",
            response.written.len(),
            experiment
        );
    } else {
        for summary in &response.summaries {
            let line = serde_json::to_string(summary)
                .map_err(|e| AppError::InvalidInput(format!("cannot serialize summary: {}", e)))?;
            println!("{}", line);
        }
        println!("✓ {} decks checked (use --write to create input files)", response.summaries.len());
    }
    Ok(())
}

fn cmd_run(config: &AppConfig, request: &BatchRequest, execute: bool) -> AppResult<()> {
    let (_, table) = load_experiment(config, &request.experiment)?;
    if !execute {
        println!(
            "Nothing executed for '{}' ({} scenarios). Pass --run to run the solver.",
            request.experiment,
            table.len()
        );
        return Ok(());
    }

    println!("Running experiment: {}", request.experiment);
    let runner = ProcessRunner::from_config(config);

    let mut last_emit = Instant::now();
    let summary = run_batch(
        config,
        request,
        &runner,
        Some(&mut |event| {
            let emit_now =
                event.stage != BatchStage::RunningSolver || last_emit.elapsed().as_millis() >= 100;
            if emit_now {
                render_cli_progress(&event);
                last_emit = Instant::now();
            }
        }),
    )?;
    clear_progress_line();

    for outcome in &summary.outcomes {
        let mut line = format!("  {:<12} {}", outcome.simulation_name, outcome.status);
        if outcome.skipped {
            line.push_str("  (skipped)");
        }
        if let Some(max) = outcome.max_discrepancy_pct {
            line.push_str(&format!("  max discrepancy {:.2}%", max));
        }
        if let Some(msg) = &outcome.message {
            line.push_str(&format!("  {}", msg));
        }
        println!("{}", line);
    }

    let c = summary.counts;
    println!(
        "✓ Batch finished: {} success, {} alert, {} failed, {} pending",
        c.success, c.alert, c.failed, c.pending
    );
    println!("  Started:  {}", summary.started_at);
    println!("  Finished: {}", summary.finished_at);
    Ok(())
}

fn cmd_status(config: &AppConfig, experiment: &str) -> AppResult<()> {
    let status = experiment_status(config, experiment)?;
    println!("Experiment '{}':", status.experiment);
    for (simulation, run_status) in &status.rows {
        println!("  {:<12} {}", simulation, run_status);
    }
    let c = status.counts;
    println!(
        "  {} total: {} pending, {} running, {} success, {} failed, {} alert",
        c.total(),
        c.pending,
        c.running,
        c.success,
        c.failed,
        c.alert
    );
    Ok(())
}

fn cmd_check_budget(listing: &Path, threshold: f64) -> AppResult<()> {
    let report = load_listing_budget(listing)?;
    if report.is_empty() {
        println!("No volume budgets found in {}", listing.display());
        return Ok(());
    }
    for entry in &report.entries {
        println!(
            "  period {:>3} step {:>4}  rate {:>8.2}%  cumulative {:>8.2}%",
            entry.stress_period, entry.time_step, entry.rate_pct, entry.cumulative_pct
        );
    }
    if report.exceeds(threshold) {
        println!("⚠ Discrepancy at or above {:.2}%", threshold);
    } else {
        println!("✓ All discrepancies below {:.2}%", threshold);
    }
    Ok(())
}

fn clear_progress_line() {
    print!("\r{}\r", " ".repeat(100));
    let _ = io::stdout().flush();
}

fn render_cli_progress(event: &BatchProgressEvent) {
    let spinner = ['|', '/', '-', '\\'];
    let spin_idx = ((event.elapsed_wall_s * 10.0) as usize) % spinner.len();
    let mut line = format!(
        "\r{} [{}/{}] {}  elapsed={:.1}s",
        spinner[spin_idx],
        (event.position + 1).min(event.total.max(1)),
        event.total,
        event.stage.label(),
        event.elapsed_wall_s
    );
    if let Some(index) = event.index {
        line.push_str(&format!("  row={}", index));
    }
    if let Some(status) = event.status {
        line.push_str(&format!("  {}", status));
    }
    print!("{}", line);
    let _ = io::stdout().flush();
}
