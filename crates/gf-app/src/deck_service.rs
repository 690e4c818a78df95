//! Deck building for every scenario of an experiment.

use std::path::PathBuf;

use gf_deck::{DeckSummary, DeckWriter, Mf6Writer, build_deck};
use tracing::info;

use crate::config::AppConfig;
use crate::error::AppResult;
use crate::experiment_service::load_experiment;
use crate::progress::ConfigureEvent;

#[derive(Debug, Clone)]
pub struct ConfigureResponse {
    pub experiment: String,
    pub summaries: Vec<DeckSummary>,
    /// Simulation folders that received input files
    pub written: Vec<PathBuf>,
}

/// Build the deck of every scenario and, when `write` is set, write MODFLOW 6
/// input files into `<base>/<experiment>/<simulation_name>/`.
pub fn configure_experiment(
    config: &AppConfig,
    experiment: &str,
    write: bool,
    progress: Option<&mut dyn FnMut(ConfigureEvent)>,
) -> AppResult<ConfigureResponse> {
    configure_with(config, experiment, write, &Mf6Writer, progress)
}

/// [`configure_experiment`] with an explicit writer.
///
/// Stops at the first scenario whose deck cannot be built.
pub fn configure_with(
    config: &AppConfig,
    experiment: &str,
    write: bool,
    writer: &dyn DeckWriter,
    mut progress: Option<&mut dyn FnMut(ConfigureEvent)>,
) -> AppResult<ConfigureResponse> {
    let (definition, table) = load_experiment(config, experiment)?;
    let base_dir = config.experiment_dir(experiment);

    let mut summaries = Vec::with_capacity(table.len());
    let mut written = Vec::new();
    for scenario in table.iter() {
        let deck = build_deck(&definition, scenario, &base_dir)?;
        if write {
            let dir = config.simulation_dir(experiment, &scenario.simulation_name);
            writer.write(&deck, &dir)?;
            written.push(dir);
        }
        summaries.push(deck.summary());

        if let Some(cb) = progress.as_deref_mut() {
            cb(ConfigureEvent {
                index: scenario.index,
                total: table.len(),
                simulation_name: scenario.simulation_name.clone(),
                written: write,
            });
        }
    }

    info!(
        experiment,
        decks = summaries.len(),
        written = written.len(),
        "experiment configured"
    );

    Ok(ConfigureResponse {
        experiment: experiment.to_string(),
        summaries,
        written,
    })
}
