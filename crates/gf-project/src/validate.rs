//! Experiment validation logic.

use std::collections::HashSet;

use crate::LATEST_VERSION;
use crate::schema::{DomainDef, Experiment, ModelDef, WellDef};

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Duplicate ID: {id} in {context}")]
    DuplicateId { id: String, context: String },

    #[error("Missing reference: {id} in {context}")]
    MissingReference { id: String, context: String },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

fn invalid(field: impl Into<String>, value: impl ToString, reason: &str) -> ValidationError {
    ValidationError::InvalidValue {
        field: field.into(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

pub fn validate_experiment(experiment: &Experiment) -> Result<(), ValidationError> {
    if experiment.version > LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: experiment.version,
        });
    }
    if experiment.name.trim().is_empty() {
        return Err(invalid("name", &experiment.name, "must not be empty"));
    }
    if experiment.base_name.trim().is_empty() {
        return Err(invalid("base_name", &experiment.base_name, "must not be empty"));
    }
    validate_model(&experiment.model)
}

fn validate_model(model: &ModelDef) -> Result<(), ValidationError> {
    validate_domain(&model.domain)?;

    if model.stress_periods.is_empty() {
        return Err(invalid("stress_periods", 0, "at least one is required"));
    }
    for (position, sp) in model.stress_periods.iter().enumerate() {
        if sp.id != position {
            return Err(invalid(
                format!("stress_periods[{}].id", position),
                sp.id,
                "ids must count up from 0 in order",
            ));
        }
        if !(sp.length > 0.0) {
            return Err(invalid(
                format!("stress_periods[{}].length", position),
                sp.length,
                "must be positive",
            ));
        }
        if sp.n_time_steps == 0 {
            return Err(invalid(
                format!("stress_periods[{}].n_time_steps", position),
                sp.n_time_steps,
                "must be positive",
            ));
        }
        if !(sp.ts_multiplier > 0.0) {
            return Err(invalid(
                format!("stress_periods[{}].ts_multiplier", position),
                sp.ts_multiplier,
                "must be positive",
            ));
        }
    }

    for ch in &model.constant_heads {
        if ch.name.trim().is_empty() {
            return Err(invalid("constant_heads.name", &ch.name, "must not be empty"));
        }
        if !ch.head.is_finite() {
            return Err(invalid(format!("constant_heads.{}.head", ch.name), ch.head, "must be finite"));
        }
    }

    let mut well_ids = HashSet::new();
    for well in &model.wells {
        if !well_ids.insert(&well.id) {
            return Err(ValidationError::DuplicateId {
                id: well.id.clone(),
                context: "wells".to_string(),
            });
        }
        validate_well(well, &model.domain, model.stress_periods.len())?;
    }

    if !(0.0..=1.0).contains(&model.storage.specific_yield) {
        return Err(invalid(
            "storage.specific_yield",
            model.storage.specific_yield,
            "must be within [0, 1]",
        ));
    }
    if model.solver.inner_maximum == 0 || model.solver.outer_maximum == 0 {
        return Err(invalid(
            "solver",
            format!("{}/{}", model.solver.inner_maximum, model.solver.outer_maximum),
            "iteration limits must be positive",
        ));
    }

    Ok(())
}

fn validate_domain(domain: &DomainDef) -> Result<(), ValidationError> {
    if domain.layers == 0 || domain.rows == 0 || domain.columns == 0 {
        return Err(invalid(
            "domain",
            format!("{}x{}x{}", domain.layers, domain.rows, domain.columns),
            "cell counts must be positive",
        ));
    }
    if !(domain.length > 0.0) || !(domain.width > 0.0) {
        return Err(invalid(
            "domain",
            format!("{}x{}", domain.length, domain.width),
            "extent must be positive",
        ));
    }
    if !(domain.top > domain.bottom) {
        return Err(invalid("domain.top", domain.top, "must be above bottom"));
    }
    Ok(())
}

fn validate_well(well: &WellDef, domain: &DomainDef, nper: usize) -> Result<(), ValidationError> {
    if well.id.trim().is_empty() {
        return Err(invalid("wells.id", &well.id, "must not be empty"));
    }
    if !(0.0..=domain.length).contains(&well.x) || !(0.0..=domain.width).contains(&well.y) {
        return Err(invalid(
            format!("wells.{}", well.id),
            format!("({}, {})", well.x, well.y),
            "location outside the domain",
        ));
    }
    if !(well.screen_top > well.screen_bottom) {
        return Err(invalid(
            format!("wells.{}.screen_top", well.id),
            well.screen_top,
            "must be above screen_bottom",
        ));
    }
    for step in &well.pumping {
        if step.stress_period_id >= nper {
            return Err(ValidationError::MissingReference {
                id: step.stress_period_id.to_string(),
                context: format!("well '{}' pumping stress_period_id", well.id),
            });
        }
    }
    Ok(())
}
