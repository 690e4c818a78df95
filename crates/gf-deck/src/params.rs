//! Scenario parameters understood by the deck builder.

use gf_core::{VolumeRate, lpm, to_m3pd};
use gf_scenarios::{ParamValue, Scenario};
use serde::Serialize;

use crate::{DeckError, DeckResult};

/// Resolved values of the sweepable model parameters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelParams {
    /// l/min
    pub pumping_flow_rate: f64,
    /// 1/m
    pub specific_storage: f64,
    pub newton_raphson: bool,
    /// Head change closure for both solver loops (m)
    pub head_convergence: f64,
    /// Variance of ln(k) for gaussian fields
    pub hk_field_variance: f64,
    /// Policy name applied to every well, replacing per-well choices
    pub pumping_method: Option<String>,
}

impl Default for ModelParams {
    fn default() -> Self {
        Self {
            pumping_flow_rate: 50.0,
            specific_storage: 0.01,
            newton_raphson: true,
            head_convergence: 1e-6,
            hk_field_variance: 2.25,
            pumping_method: None,
        }
    }
}

impl ModelParams {
    pub const NAMES: [&'static str; 6] = [
        "pumping_flow_rate",
        "specific_storage",
        "newton_raphson",
        "head_convergence",
        "hk_field_variance",
        "pumping_method",
    ];

    /// Read parameters from a scenario row, defaulting the ones it omits.
    pub fn from_scenario(scenario: &Scenario) -> DeckResult<Self> {
        let mut params = Self::default();
        for (name, value) in &scenario.params {
            match name.as_str() {
                "pumping_flow_rate" => params.pumping_flow_rate = number(name, value)?,
                "specific_storage" => params.specific_storage = number(name, value)?,
                "newton_raphson" => {
                    params.newton_raphson = value.as_bool().ok_or_else(|| mistyped(name, "bool", value))?
                }
                "head_convergence" => params.head_convergence = number(name, value)?,
                "hk_field_variance" => params.hk_field_variance = number(name, value)?,
                "pumping_method" => {
                    let method = value.as_str().ok_or_else(|| mistyped(name, "text", value))?;
                    params.pumping_method = Some(method.to_string());
                }
                other => {
                    return Err(DeckError::Configuration(format!(
                        "scenario {} has unknown parameter '{}'",
                        scenario.simulation_name, other
                    )));
                }
            }
        }
        params.check()?;
        Ok(params)
    }

    pub fn pumping_rate(&self) -> VolumeRate {
        lpm(self.pumping_flow_rate)
    }

    /// Pumping rate in the solver's unit, m3/day.
    pub fn pumping_rate_m3pd(&self) -> f64 {
        to_m3pd(self.pumping_rate())
    }

    fn check(&self) -> DeckResult<()> {
        if self.specific_storage < 0.0 {
            return Err(DeckError::Configuration(format!(
                "specific_storage {} must not be negative",
                self.specific_storage
            )));
        }
        if !(self.head_convergence > 0.0) {
            return Err(DeckError::Configuration(format!(
                "head_convergence {} must be positive",
                self.head_convergence
            )));
        }
        if self.hk_field_variance < 0.0 {
            return Err(DeckError::Configuration(format!(
                "hk_field_variance {} must not be negative",
                self.hk_field_variance
            )));
        }
        Ok(())
    }
}

fn number(name: &str, value: &ParamValue) -> DeckResult<f64> {
    let v = value.as_f64().ok_or_else(|| mistyped(name, "number", value))?;
    if !v.is_finite() {
        return Err(DeckError::Configuration(format!(
            "parameter '{}' is not finite: {}",
            name, v
        )));
    }
    Ok(v)
}

fn mistyped(name: &str, expected: &str, value: &ParamValue) -> DeckError {
    DeckError::Configuration(format!(
        "parameter '{}' expects a {}, got {} '{}'",
        name,
        expected,
        value.type_name(),
        value
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario(params: Vec<(&str, ParamValue)>) -> Scenario {
        Scenario::new(
            "SIM",
            0,
            params
                .into_iter()
                .map(|(n, v)| (n.to_string(), v))
                .collect(),
        )
    }

    #[test]
    fn defaults_fill_missing_parameters() {
        let params = ModelParams::from_scenario(&scenario(vec![])).unwrap();
        assert_eq!(params, ModelParams::default());
        // 50 l/min is exactly 72 m3/day in the written deck
        assert_eq!(params.pumping_rate_m3pd(), 72.0);
    }

    #[test]
    fn integers_are_accepted_for_numbers() {
        let params = ModelParams::from_scenario(&scenario(vec![
            ("pumping_flow_rate", ParamValue::Int(100)),
            ("specific_storage", ParamValue::Float(1e-3)),
            ("newton_raphson", ParamValue::Bool(false)),
            ("pumping_method", ParamValue::from("homogeneous")),
        ]))
        .unwrap();
        assert_eq!(params.pumping_flow_rate, 100.0);
        assert!((params.pumping_rate_m3pd() - 144.0).abs() < 1e-9);
        assert!(!params.newton_raphson);
        assert_eq!(params.pumping_method.as_deref(), Some("homogeneous"));
    }

    #[test]
    fn unknown_name_is_a_configuration_error() {
        let err = ModelParams::from_scenario(&scenario(vec![("porosity", ParamValue::Float(0.3))]))
            .unwrap_err();
        assert!(matches!(err, DeckError::Configuration(ref m) if m.contains("porosity")));
    }

    #[test]
    fn wrong_types_are_configuration_errors() {
        for (name, value) in [
            ("newton_raphson", ParamValue::Int(1)),
            ("pumping_flow_rate", ParamValue::from("fast")),
            ("pumping_method", ParamValue::Bool(true)),
        ] {
            let err = ModelParams::from_scenario(&scenario(vec![(name, value)])).unwrap_err();
            assert!(matches!(err, DeckError::Configuration(_)), "{}", name);
        }
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        assert!(ModelParams::from_scenario(&scenario(vec![(
            "head_convergence",
            ParamValue::Float(0.0)
        )]))
        .is_err());
        assert!(ModelParams::from_scenario(&scenario(vec![(
            "hk_field_variance",
            ParamValue::Float(-1.0)
        )]))
        .is_err());
    }
}
