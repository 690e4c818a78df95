use std::path::{Path, PathBuf};

use gf_grid::Side;
use gf_project::*;
use gf_scenarios::{ParamEntry, ParamValue};

const DEFINITION: &str = r#"
version: 1
name: dipole
base_name: RUN
parameters:
  pumping_flow_rate: [50, 100]
  specific_storage: 0.001
  newton_raphson: [true, false]
  pumping_method: homogeneous
model:
  domain: { length: 100.0, width: 50.0, top: 10.0, bottom: 0.0, layers: 5, rows: 10, columns: 20 }
  conductivity: { type: gaussian_csv, path: data/hk.csv }
  stress_periods:
    - { id: 0, length: 100.0, n_time_steps: 1, steady_state: true }
    - { id: 1, length: 0.5, n_time_steps: 10 }
  constant_heads:
    - { name: inlet, head: 110.0, side: west }
    - { name: outlet, head: 100.0, side: east }
  wells:
    - id: W1
      x: 25.0
      y: 25.0
      screen_top: 6.0
      screen_bottom: 2.0
      policy: deepest_layer_kzz_correction
      pumping:
        - { stress_period_id: 1, rate: { type: scaled, factor: -1.0 } }
    - id: W2
      x: 75.0
      y: 25.0
      screen_top: 6.0
      screen_bottom: 2.0
      pumping:
        - { stress_period_id: 1, rate: { type: fixed, m3_per_day: 12.5 } }
"#;

fn unique_temp_dir(prefix: &str) -> PathBuf {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let dir = std::env::temp_dir().join(format!("{}_{}", prefix, nanos));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn parses_hand_written_definition() {
    let experiment: Experiment = serde_yaml::from_str(DEFINITION).unwrap();
    validate_experiment(&experiment).unwrap();

    let names: Vec<&str> = experiment.parameters.names().collect();
    assert_eq!(
        names,
        vec!["pumping_flow_rate", "specific_storage", "newton_raphson", "pumping_method"]
    );
    assert_eq!(
        experiment.parameters.get("pumping_flow_rate"),
        Some(&ParamEntry::List(vec![ParamValue::Int(50), ParamValue::Int(100)]))
    );
    assert_eq!(
        experiment.parameters.get("specific_storage"),
        Some(&ParamEntry::Single(ParamValue::Float(0.001)))
    );

    let model = &experiment.model;
    assert_eq!(model.stress_periods[1].ts_multiplier, 1.0);
    assert!(!model.stress_periods[1].steady_state);
    assert_eq!(model.constant_heads[0].side, Side::West);
    assert_eq!(model.wells[1].policy, None);
    assert_eq!(
        model.wells[1].pumping[0].rate,
        RateDef::Fixed { m3_per_day: 12.5 }
    );
    assert_eq!(model.storage, StorageDef::default());
    assert_eq!(model.solver.inner_maximum, 250);
    assert_eq!(model.solver.linear_acceleration.keyword(), "BICGSTAB");
}

#[test]
fn roundtrip_yaml_on_disk() {
    let experiment: Experiment = serde_yaml::from_str(DEFINITION).unwrap();
    let dir = unique_temp_dir("gf_project_roundtrip");
    let path = dir.join("experiment.yaml");

    save_yaml(&path, &experiment).unwrap();
    let loaded = load_yaml(&path).unwrap();
    assert_eq!(experiment, loaded);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn model_section_defaults_to_dipole_layout() {
    let text = "version: 1\nname: minimal\nparameters:\n  pumping_flow_rate: [10, 20]\n";
    let experiment: Experiment = serde_yaml::from_str(text).unwrap();
    assert_eq!(experiment.base_name, "SIM");
    assert_eq!(experiment.model, ModelDef::default());
    assert_eq!(experiment.model.wells.len(), 4);
    assert_eq!(experiment.model.stress_periods.len(), 4);
    validate_experiment(&experiment).unwrap();
}

#[test]
fn relative_field_path_is_rebased() {
    let mut experiment: Experiment = serde_yaml::from_str(DEFINITION).unwrap();
    experiment.resolve_paths(Path::new("/data/experiments"));
    assert_eq!(
        experiment.model.conductivity,
        ConductivityDef::GaussianCsv {
            path: PathBuf::from("/data/experiments/data/hk.csv")
        }
    );

    // Already absolute paths are left alone
    experiment.resolve_paths(Path::new("/elsewhere"));
    assert_eq!(
        experiment.model.conductivity,
        ConductivityDef::GaussianCsv {
            path: PathBuf::from("/data/experiments/data/hk.csv")
        }
    );
}

#[test]
fn invalid_definition_does_not_load() {
    let dir = unique_temp_dir("gf_project_invalid");
    let path = dir.join("experiment.yaml");
    std::fs::write(&path, DEFINITION.replace("id: W2", "id: W1")).unwrap();

    assert!(matches!(
        load_yaml(&path),
        Err(ProjectError::Validation(ValidationError::DuplicateId { .. }))
    ));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn missing_file_is_io_error() {
    let err = load_yaml(Path::new("/nonexistent/gf/experiment.yaml")).unwrap_err();
    assert!(matches!(err, ProjectError::Io(_)));
}
