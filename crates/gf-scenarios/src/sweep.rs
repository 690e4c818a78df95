//! Sweep specification: parameter name -> one value or a list of candidates.
//!
//! Declaration order matters: it is the dimension order of the cartesian
//! product, so the YAML mapping order is preserved when deserializing.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A single resolved parameter value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl ParamValue {
    /// Numeric view; integers widen to `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ParamValue::Int(v) => Some(*v as f64),
            ParamValue::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ParamValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParamValue::Text(v) => Some(v),
            _ => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            ParamValue::Bool(_) => "bool",
            ParamValue::Int(_) => "int",
            ParamValue::Float(_) => "float",
            ParamValue::Text(_) => "text",
        }
    }

    /// Parse a table cell, trying bool, int, float, then falling back to text.
    pub fn parse_cell(cell: &str) -> Self {
        match cell {
            "True" | "true" => return ParamValue::Bool(true),
            "False" | "false" => return ParamValue::Bool(false),
            _ => {}
        }
        if let Ok(v) = cell.parse::<i64>() {
            return ParamValue::Int(v);
        }
        if let Ok(v) = cell.parse::<f64>() {
            return ParamValue::Float(v);
        }
        ParamValue::Text(cell.to_string())
    }

    /// Table cell form. Floats always keep a decimal point or exponent so
    /// they read back as floats.
    pub fn to_cell(&self) -> String {
        match self {
            ParamValue::Bool(true) => "True".to_string(),
            ParamValue::Bool(false) => "False".to_string(),
            ParamValue::Int(v) => v.to_string(),
            ParamValue::Float(v) => format!("{:?}", v),
            ParamValue::Text(v) => v.clone(),
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_cell())
    }
}

impl From<bool> for ParamValue {
    fn from(v: bool) -> Self {
        ParamValue::Bool(v)
    }
}

impl From<i64> for ParamValue {
    fn from(v: i64) -> Self {
        ParamValue::Int(v)
    }
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        ParamValue::Float(v)
    }
}

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        ParamValue::Text(v.to_string())
    }
}

/// One sweep dimension: a fixed value or an ordered list of candidates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamEntry {
    List(Vec<ParamValue>),
    Single(ParamValue),
}

impl ParamEntry {
    /// Candidates for the product; a single value is a one-element sequence.
    pub fn candidates(&self) -> &[ParamValue] {
        match self {
            ParamEntry::List(values) => values,
            ParamEntry::Single(value) => std::slice::from_ref(value),
        }
    }
}

impl<V: Into<ParamValue>> From<Vec<V>> for ParamEntry {
    fn from(values: Vec<V>) -> Self {
        ParamEntry::List(values.into_iter().map(Into::into).collect())
    }
}

/// Ordered parameter sweep.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SweepSpec {
    entries: Vec<(String, ParamEntry)>,
}

impl SweepSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a parameter; declaration order is product order.
    pub fn with(mut self, name: impl Into<String>, entry: impl Into<ParamEntry>) -> Self {
        self.push(name, entry);
        self
    }

    pub fn push(&mut self, name: impl Into<String>, entry: impl Into<ParamEntry>) {
        self.entries.push((name.into(), entry.into()));
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamEntry)> {
        self.entries.iter().map(|(n, e)| (n.as_str(), e))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn get(&self, name: &str) -> Option<&ParamEntry> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, e)| e)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<ParamValue> for ParamEntry {
    fn from(value: ParamValue) -> Self {
        ParamEntry::Single(value)
    }
}

impl Serialize for SweepSpec {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, entry) in &self.entries {
            map.serialize_entry(name, entry)?;
        }
        map.end()
    }
}

struct SweepSpecVisitor;

impl<'de> Visitor<'de> for SweepSpecVisitor {
    type Value = SweepSpec;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "a mapping of parameter names to a value or a list of values")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<SweepSpec, A::Error> {
        let mut spec = SweepSpec::new();
        while let Some((name, entry)) = access.next_entry::<String, ParamEntry>()? {
            spec.entries.push((name, entry));
        }
        Ok(spec)
    }
}

impl<'de> Deserialize<'de> for SweepSpec {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(SweepSpecVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cells_parse_in_type_order() {
        assert_eq!(ParamValue::parse_cell("True"), ParamValue::Bool(true));
        assert_eq!(ParamValue::parse_cell("false"), ParamValue::Bool(false));
        assert_eq!(ParamValue::parse_cell("50"), ParamValue::Int(50));
        assert_eq!(ParamValue::parse_cell("1e-5"), ParamValue::Float(1e-5));
        assert_eq!(ParamValue::parse_cell("2.0"), ParamValue::Float(2.0));
        assert_eq!(
            ParamValue::parse_cell("homogeneous"),
            ParamValue::Text("homogeneous".to_string())
        );
    }

    #[test]
    fn whole_floats_keep_their_type_in_cells() {
        let cell = ParamValue::Float(2.0).to_cell();
        assert_eq!(cell, "2.0");
        assert_eq!(ParamValue::parse_cell(&cell), ParamValue::Float(2.0));
    }

    #[test]
    fn single_value_is_one_candidate() {
        let entry = ParamEntry::Single(ParamValue::Int(3));
        assert_eq!(entry.candidates(), &[ParamValue::Int(3)]);
    }

    #[test]
    fn yaml_declaration_order_is_preserved() {
        let yaml = "zeta: [1, 2]\nalpha: 0.5\nmid: [true, false]\n";
        let spec: SweepSpec = serde_yaml::from_str(yaml).unwrap();
        let names: Vec<&str> = spec.names().collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
        assert_eq!(
            spec.get("alpha"),
            Some(&ParamEntry::Single(ParamValue::Float(0.5)))
        );
        assert_eq!(
            spec.get("mid").map(|e| e.candidates().len()),
            Some(2)
        );
    }

    #[test]
    fn yaml_round_trip_keeps_order() {
        let spec = SweepSpec::new()
            .with("b", vec![10_i64, 20])
            .with("a", ParamValue::from("x"));
        let text = serde_yaml::to_string(&spec).unwrap();
        let back: SweepSpec = serde_yaml::from_str(&text).unwrap();
        assert_eq!(spec, back);
    }
}
