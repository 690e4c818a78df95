//! Experiment setup and loading.

use std::path::{Path, PathBuf};

use gf_deck::ModelParams;
use gf_project::Experiment;
use gf_scenarios::{ScenarioTable, generate};
use tracing::info;

use crate::config::AppConfig;
use crate::error::{AppError, AppResult};

/// What `setup_experiment` created.
#[derive(Debug, Clone)]
pub struct SetupResponse {
    pub experiment_dir: PathBuf,
    pub scenarios_path: PathBuf,
    pub definition_path: PathBuf,
    pub parameters: Vec<String>,
    pub scenario_count: usize,
}

/// Load an experiment definition and rebase its data paths onto the folder
/// holding the file.
pub fn load_definition(path: &Path) -> AppResult<Experiment> {
    if !path.exists() {
        return Err(AppError::InvalidInput(format!(
            "definition file {} does not exist",
            path.display()
        )));
    }
    let mut experiment = gf_project::load_yaml(path)?;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => std::fs::canonicalize(parent)?,
        _ => std::env::current_dir()?,
    };
    experiment.resolve_paths(&dir);
    Ok(experiment)
}

/// Create the experiment folder, generate its scenario table and keep a copy
/// of the definition next to it.
///
/// Every generated scenario must carry usable model parameters; nothing is
/// written otherwise.
pub fn setup_experiment(
    config: &AppConfig,
    experiment: &Experiment,
    name: &str,
) -> AppResult<SetupResponse> {
    check_name(name)?;
    let table = generate(&experiment.base_name, &experiment.parameters)?;
    for scenario in table.iter() {
        ModelParams::from_scenario(scenario)?;
    }

    let experiment_dir = config.experiment_dir(name);
    std::fs::create_dir_all(config.csv_dir(name))?;

    let scenarios_path = config.scenarios_path(name);
    table.write_csv(&scenarios_path)?;

    let definition_path = config.definition_path(name);
    let mut stored = experiment.clone();
    stored.name = name.to_string();
    gf_project::save_yaml(&definition_path, &stored)?;

    info!(
        experiment = name,
        scenarios = table.len(),
        dir = %experiment_dir.display(),
        "experiment set up"
    );

    Ok(SetupResponse {
        experiment_dir,
        scenarios_path,
        definition_path,
        parameters: table.parameters.clone(),
        scenario_count: table.len(),
    })
}

/// Load the stored definition and scenario table of an experiment.
pub fn load_experiment(config: &AppConfig, name: &str) -> AppResult<(Experiment, ScenarioTable)> {
    check_name(name)?;
    let definition_path = config.definition_path(name);
    let scenarios_path = config.scenarios_path(name);
    if !definition_path.exists() || !scenarios_path.exists() {
        return Err(AppError::ExperimentNotFound {
            name: name.to_string(),
            base: config.folders.base.clone(),
        });
    }

    let experiment = gf_project::load_yaml(&definition_path)?;
    let table = ScenarioTable::read_csv(&scenarios_path)?;
    Ok((experiment, table))
}

fn check_name(name: &str) -> AppResult<()> {
    if name.trim().is_empty() || name.contains(['/', '\\']) || name == "." || name == ".." {
        return Err(AppError::InvalidInput(format!(
            "'{}' is not a valid experiment name",
            name
        )));
    }
    Ok(())
}
