//! Run status table persisted next to the scenario table.
//!
//! The file is the scenario table with a trailing `status` column. Every
//! update rewrites it through a temporary file and a rename, so a reader
//! never sees a half-written table.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use csv::StringRecord;
use gf_scenarios::table::parse_header;
use gf_scenarios::{Scenario, ScenarioTable};
use tracing::debug;

use crate::status::{RunStatus, StatusCounts};
use crate::{ResultsError, ResultsResult};

pub const STATUS_COLUMN: &str = "status";

#[derive(Debug, Clone)]
pub struct RunStatusStore {
    path: PathBuf,
    table: ScenarioTable,
    statuses: Vec<RunStatus>,
}

impl RunStatusStore {
    /// Open the status table for `scenarios`.
    ///
    /// A missing file, or `reset`, starts every row as pending. An existing
    /// file must describe the same scenarios.
    pub fn open(path: &Path, scenarios: &ScenarioTable, reset: bool) -> ResultsResult<Self> {
        if reset || !path.exists() {
            let store = Self {
                path: path.to_path_buf(),
                table: scenarios.clone(),
                statuses: vec![RunStatus::Pending; scenarios.len()],
            };
            store.save()?;
            debug!(path = %path.display(), rows = scenarios.len(), "initialised run table");
            return Ok(store);
        }

        let (table, statuses) = read_runs(path)?;
        check_schema(&table, scenarios)?;
        Ok(Self {
            path: path.to_path_buf(),
            table,
            statuses,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.statuses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statuses.is_empty()
    }

    pub fn status(&self, index: usize) -> Option<RunStatus> {
        self.statuses.get(index).copied()
    }

    pub fn statuses(&self) -> &[RunStatus] {
        &self.statuses
    }

    pub fn scenario(&self, index: usize) -> Option<&Scenario> {
        self.table.get(index)
    }

    /// Record a new state for one row and persist the whole table.
    pub fn set_status(&mut self, index: usize, status: RunStatus) -> ResultsResult<()> {
        let len = self.statuses.len();
        let slot = self
            .statuses
            .get_mut(index)
            .ok_or(ResultsError::RowOutOfRange { index, len })?;
        *slot = status;
        self.save()
    }

    pub fn counts(&self) -> StatusCounts {
        self.statuses.iter().copied().collect()
    }

    fn save(&self) -> ResultsResult<()> {
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        {
            let mut writer = csv::Writer::from_writer(File::create(&tmp)?);
            let mut header = self.table.header();
            header.push(STATUS_COLUMN.to_string());
            writer.write_record(&header)?;
            for (row, status) in self.table.iter().zip(&self.statuses) {
                let mut record = row.record();
                record.push(status.as_str().to_string());
                writer.write_record(&record)?;
            }
            writer.flush()?;
        }

        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

fn read_runs(path: &Path) -> ResultsResult<(ScenarioTable, Vec<RunStatus>)> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(File::open(path)?);

    let header = reader.headers()?.clone();
    if header.iter().last() != Some(STATUS_COLUMN) {
        return Err(ResultsError::SchemaMismatch {
            reason: format!("last column must be '{}'", STATUS_COLUMN),
        });
    }
    let scenario_header: StringRecord = header.iter().take(header.len() - 1).collect();
    let parameters = parse_header(&scenario_header)?;

    let mut rows = Vec::new();
    let mut statuses = Vec::new();
    for (ordinal, record) in reader.records().enumerate() {
        let record = record?;
        let Some(status) = record.iter().last() else {
            return Err(ResultsError::SchemaMismatch {
                reason: format!("row {} is empty", ordinal),
            });
        };
        statuses.push(status.parse()?);
        let cells: StringRecord = record.iter().take(record.len() - 1).collect();
        rows.push(Scenario::from_record(ordinal, &parameters, &cells)?);
    }

    Ok((ScenarioTable { parameters, rows }, statuses))
}

fn check_schema(found: &ScenarioTable, expected: &ScenarioTable) -> ResultsResult<()> {
    if found.parameters != expected.parameters {
        return Err(ResultsError::SchemaMismatch {
            reason: format!(
                "columns {:?} differ from {:?}",
                found.parameters, expected.parameters
            ),
        });
    }
    if found.len() != expected.len() {
        return Err(ResultsError::SchemaMismatch {
            reason: format!("{} rows, expected {}", found.len(), expected.len()),
        });
    }
    for (a, b) in found.iter().zip(expected.iter()) {
        if a.simulation_name != b.simulation_name {
            return Err(ResultsError::SchemaMismatch {
                reason: format!(
                    "row {} is '{}', expected '{}'",
                    a.index, a.simulation_name, b.simulation_name
                ),
            });
        }
    }
    Ok(())
}
