//! Scenario generation: cartesian product over a [`SweepSpec`].

use std::collections::HashSet;

use tracing::debug;

use crate::sweep::{ParamValue, SweepSpec};
use crate::{RESERVED_COLUMNS, SweepError, SweepResult};

/// One combination of parameter values.
#[derive(Debug, Clone, PartialEq)]
pub struct Scenario {
    /// 0-based position in the table
    pub index: usize,
    /// `<base_name><index>`
    pub simulation_name: String,
    /// `<simulation_name>_MODEL`
    pub model_name: String,
    /// Resolved values in declaration order
    pub params: Vec<(String, ParamValue)>,
}

impl Scenario {
    pub fn new(base_name: &str, index: usize, params: Vec<(String, ParamValue)>) -> Self {
        let simulation_name = format!("{}{}", base_name, index);
        let model_name = format!("{}_MODEL", simulation_name);
        Self {
            index,
            simulation_name,
            model_name,
            params,
        }
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.params.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }
}

/// Ordered table of scenarios sharing one parameter schema.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ScenarioTable {
    pub parameters: Vec<String>,
    pub rows: Vec<Scenario>,
}

impl ScenarioTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Scenario> {
        self.rows.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Scenario> {
        self.rows.iter()
    }
}

/// Expand a sweep into its scenario table.
///
/// Rows follow nested-loop order over the parameters as declared, with the
/// last parameter varying fastest.
pub fn generate(base_name: &str, spec: &SweepSpec) -> SweepResult<ScenarioTable> {
    if spec.is_empty() {
        return Err(SweepError::Configuration(
            "no sweep parameters given".to_string(),
        ));
    }
    validate_names(spec)?;

    let names: Vec<String> = spec.names().map(str::to_string).collect();
    let dims: Vec<_> = spec.iter().map(|(_, entry)| entry.candidates()).collect();

    for (name, candidates) in names.iter().zip(&dims) {
        if candidates.is_empty() {
            return Err(SweepError::Configuration(format!(
                "parameter '{}' has an empty candidate list",
                name
            )));
        }
        for candidate in candidates.iter() {
            check_cell_type(name, candidate)?;
        }
    }

    let total = dims
        .iter()
        .try_fold(1usize, |acc, d| acc.checked_mul(d.len()))
        .ok_or_else(|| SweepError::Configuration("scenario count overflows".to_string()))?;

    let mut rows = Vec::with_capacity(total);
    let mut cursor = vec![0usize; dims.len()];
    for index in 0..total {
        let params = names
            .iter()
            .zip(&dims)
            .zip(&cursor)
            .map(|((name, candidates), &at)| (name.clone(), candidates[at].clone()))
            .collect();
        rows.push(Scenario::new(base_name, index, params));

        // Odometer step, innermost dimension last
        for d in (0..dims.len()).rev() {
            cursor[d] += 1;
            if cursor[d] < dims[d].len() {
                break;
            }
            cursor[d] = 0;
        }
    }

    debug!(
        base_name,
        parameters = names.len(),
        scenarios = rows.len(),
        "generated scenario table"
    );

    Ok(ScenarioTable {
        parameters: names,
        rows,
    })
}

/// Text that a table cell would read back as a bool or number cannot be
/// stored without changing its type.
fn check_cell_type(name: &str, value: &ParamValue) -> SweepResult<()> {
    if let ParamValue::Text(text) = value {
        let read_back = ParamValue::parse_cell(text);
        if !matches!(read_back, ParamValue::Text(_)) {
            return Err(SweepError::Configuration(format!(
                "parameter '{}': text value '{}' would be read back as {}",
                name,
                text,
                read_back.type_name()
            )));
        }
    }
    Ok(())
}

fn validate_names(spec: &SweepSpec) -> SweepResult<()> {
    let mut seen = HashSet::new();
    for name in spec.names() {
        if name.trim().is_empty() {
            return Err(SweepError::Configuration(
                "parameter name must not be empty".to_string(),
            ));
        }
        if RESERVED_COLUMNS.contains(&name) {
            return Err(SweepError::Configuration(format!(
                "parameter name '{}' is reserved",
                name
            )));
        }
        if !seen.insert(name) {
            return Err(SweepError::Configuration(format!(
                "parameter '{}' declared twice",
                name
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sweep::ParamEntry;
    use proptest::prelude::*;

    fn values(table: &ScenarioTable, name: &str) -> Vec<ParamValue> {
        table
            .iter()
            .map(|s| s.get(name).cloned().unwrap())
            .collect()
    }

    #[test]
    fn last_parameter_varies_fastest() {
        let spec = SweepSpec::new()
            .with("a", vec![1_i64, 2])
            .with("b", vec![10_i64, 20]);
        let table = generate("SIM", &spec).unwrap();

        assert_eq!(table.len(), 4);
        let int = ParamValue::Int;
        assert_eq!(values(&table, "a"), vec![int(1), int(1), int(2), int(2)]);
        assert_eq!(values(&table, "b"), vec![int(10), int(20), int(10), int(20)]);
        let names: Vec<&str> = table.iter().map(|s| s.simulation_name.as_str()).collect();
        assert_eq!(names, vec!["SIM0", "SIM1", "SIM2", "SIM3"]);
        assert_eq!(table.rows[3].model_name, "SIM3_MODEL");
    }

    #[test]
    fn all_scalar_parameters_give_one_row() {
        let spec = SweepSpec::new()
            .with("rate", ParamValue::Int(50))
            .with("newton", ParamValue::Bool(true));
        let table = generate("RUN", &spec).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.rows[0].simulation_name, "RUN0");
        assert_eq!(table.rows[0].get("newton"), Some(&ParamValue::Bool(true)));
    }

    #[test]
    fn scalars_do_not_multiply_rows() {
        let spec = SweepSpec::new()
            .with("fixed", ParamValue::Float(0.2))
            .with("swept", vec![1_i64, 2, 3]);
        let table = generate("S", &spec).unwrap();
        assert_eq!(table.len(), 3);
        assert!(table.iter().all(|s| s.get("fixed") == Some(&ParamValue::Float(0.2))));
    }

    #[test]
    fn empty_spec_is_a_configuration_error() {
        let err = generate("SIM", &SweepSpec::new()).unwrap_err();
        assert!(matches!(err, SweepError::Configuration(_)));
    }

    #[test]
    fn empty_candidate_list_is_rejected() {
        let spec = SweepSpec::new().with("a", ParamEntry::List(vec![]));
        assert!(matches!(
            generate("SIM", &spec),
            Err(SweepError::Configuration(_))
        ));
    }

    #[test]
    fn duplicate_and_reserved_names_are_rejected() {
        let dup = SweepSpec::new()
            .with("a", vec![1_i64])
            .with("a", vec![2_i64]);
        assert!(generate("SIM", &dup).is_err());

        let reserved = SweepSpec::new().with("status", vec![1_i64]);
        assert!(generate("SIM", &reserved).is_err());
    }

    #[test]
    fn text_that_reads_back_as_another_type_is_rejected() {
        for text in ["42", "True", "1e3", "false"] {
            let spec = SweepSpec::new().with("label", vec![ParamValue::from(text)]);
            assert!(
                matches!(generate("SIM", &spec), Err(SweepError::Configuration(_))),
                "'{}' should be rejected",
                text
            );
        }

        let spec = SweepSpec::new().with("label", vec!["homogeneous", "42a"]);
        assert_eq!(generate("SIM", &spec).unwrap().len(), 2);
    }

    #[test]
    fn parameter_columns_keep_declaration_order() {
        let spec = SweepSpec::new()
            .with("z", vec![1_i64])
            .with("a", vec![2_i64]);
        let table = generate("SIM", &spec).unwrap();
        assert_eq!(table.parameters, vec!["z".to_string(), "a".to_string()]);
    }

    proptest! {
        #[test]
        fn row_count_is_product_and_names_are_unique(lens in prop::collection::vec(1usize..5, 1..5)) {
            let mut spec = SweepSpec::new();
            for (i, len) in lens.iter().enumerate() {
                let candidates: Vec<i64> = (0..*len as i64).collect();
                spec.push(format!("p{}", i), candidates);
            }
            let table = generate("SIM", &spec).unwrap();
            let expected: usize = lens.iter().product();
            prop_assert_eq!(table.len(), expected);

            let unique: HashSet<&str> = table.iter().map(|s| s.simulation_name.as_str()).collect();
            prop_assert_eq!(unique.len(), expected);
        }

        #[test]
        fn row_matches_mixed_radix_position(lens in prop::collection::vec(1usize..4, 1..4)) {
            let mut spec = SweepSpec::new();
            for (i, len) in lens.iter().enumerate() {
                let candidates: Vec<i64> = (0..*len as i64).collect();
                spec.push(format!("p{}", i), candidates);
            }
            let table = generate("SIM", &spec).unwrap();
            for row in table.iter() {
                let mut rest = row.index;
                for (i, len) in lens.iter().enumerate().rev() {
                    let digit = (rest % len) as i64;
                    rest /= len;
                    prop_assert_eq!(row.get(&format!("p{}", i)), Some(&ParamValue::Int(digit)));
                }
            }
        }
    }
}
