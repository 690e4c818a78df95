//! Delimited-text form of a scenario table.
//!
//! Layout: an unnamed index column, `simulation_name`, `model_name`, then one
//! column per parameter in declaration order. The empty index header keeps
//! the files interchangeable with tables written by dataframe tooling.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use csv::StringRecord;

use crate::generate::{Scenario, ScenarioTable};
use crate::sweep::ParamValue;
use crate::{MODEL_NAME, SIMULATION_NAME, SweepError, SweepResult};

impl ScenarioTable {
    /// Header row including the index and name columns.
    pub fn header(&self) -> Vec<String> {
        let mut header = vec![
            String::new(),
            SIMULATION_NAME.to_string(),
            MODEL_NAME.to_string(),
        ];
        header.extend(self.parameters.iter().cloned());
        header
    }

    pub fn write_csv(&self, path: &Path) -> SweepResult<()> {
        let file = File::create(path)?;
        self.write_to(file)
    }

    pub fn write_to<W: Write>(&self, writer: W) -> SweepResult<()> {
        let mut writer = csv::Writer::from_writer(writer);
        writer.write_record(self.header())?;
        for row in &self.rows {
            writer.write_record(row.record())?;
        }
        writer.flush()?;
        Ok(())
    }

    pub fn read_csv(path: &Path) -> SweepResult<Self> {
        let file = File::open(path)?;
        Self::read_from(file)
    }

    pub fn read_from<R: Read>(reader: R) -> SweepResult<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(reader);
        let parameters = parse_header(reader.headers()?)?;

        let mut rows = Vec::new();
        for (ordinal, record) in reader.records().enumerate() {
            rows.push(Scenario::from_record(ordinal, &parameters, &record?)?);
        }

        Ok(ScenarioTable { parameters, rows })
    }
}

impl Scenario {
    /// Cells in header order.
    pub fn record(&self) -> Vec<String> {
        let mut cells = Vec::with_capacity(self.params.len() + 3);
        cells.push(self.index.to_string());
        cells.push(self.simulation_name.clone());
        cells.push(self.model_name.clone());
        cells.extend(self.params.iter().map(|(_, v)| v.to_cell()));
        cells
    }

    /// Parse a data row. The index cell must equal `ordinal`.
    pub fn from_record(
        ordinal: usize,
        parameters: &[String],
        record: &StringRecord,
    ) -> SweepResult<Self> {
        if record.len() != parameters.len() + 3 {
            return Err(SweepError::Table(format!(
                "row {} has {} cells, expected {}",
                ordinal,
                record.len(),
                parameters.len() + 3
            )));
        }

        let index: usize = record[0].trim().parse().map_err(|_| {
            SweepError::Table(format!("row {} has invalid index '{}'", ordinal, &record[0]))
        })?;
        if index != ordinal {
            return Err(SweepError::Table(format!(
                "row {} is labelled with index {}",
                ordinal, index
            )));
        }

        let params = parameters
            .iter()
            .zip(record.iter().skip(3))
            .map(|(name, cell)| (name.clone(), ParamValue::parse_cell(cell)))
            .collect();

        Ok(Scenario {
            index,
            simulation_name: record[1].to_string(),
            model_name: record[2].to_string(),
            params,
        })
    }
}

/// Validate the fixed leading columns and return the parameter names.
pub fn parse_header(header: &StringRecord) -> SweepResult<Vec<String>> {
    if header.len() < 3 {
        return Err(SweepError::Table(format!(
            "header has {} columns, expected at least 3",
            header.len()
        )));
    }
    if &header[1] != SIMULATION_NAME || &header[2] != MODEL_NAME {
        return Err(SweepError::Table(format!(
            "header must start with '', '{}', '{}'",
            SIMULATION_NAME, MODEL_NAME
        )));
    }
    Ok(header.iter().skip(3).map(str::to_string).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate::generate;
    use crate::sweep::SweepSpec;

    fn sample_table() -> ScenarioTable {
        let spec = SweepSpec::new()
            .with("pumping_flow_rate", vec![50_i64, 100])
            .with("specific_storage", vec![1e-2, 1e-3])
            .with("newton_raphson", vec![true, false])
            .with("pumping_method", ParamValue::from("homogeneous"));
        generate("SIM", &spec).unwrap()
    }

    #[test]
    fn writes_index_first_with_empty_header() {
        let table = sample_table();
        let mut buf = Vec::new();
        table.write_to(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some(",simulation_name,model_name,pumping_flow_rate,specific_storage,newton_raphson,pumping_method")
        );
        assert_eq!(
            lines.next(),
            Some("0,SIM0,SIM0_MODEL,50,0.01,True,homogeneous")
        );
    }

    #[test]
    fn round_trip_is_identical() {
        let table = sample_table();
        let mut buf = Vec::new();
        table.write_to(&mut buf).unwrap();
        let back = ScenarioTable::read_from(buf.as_slice()).unwrap();
        assert_eq!(table, back);
    }

    #[test]
    fn rejects_out_of_order_index() {
        let text = ",simulation_name,model_name,a\n1,SIM1,SIM1_MODEL,3\n";
        let err = ScenarioTable::read_from(text.as_bytes()).unwrap_err();
        assert!(matches!(err, SweepError::Table(_)));
    }

    #[test]
    fn rejects_foreign_header() {
        let text = "idx,name,model,a\n0,SIM0,SIM0_MODEL,3\n";
        assert!(ScenarioTable::read_from(text.as_bytes()).is_err());
    }
}
