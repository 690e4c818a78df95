use std::path::{Path, PathBuf};

use gf_deck::{DeckWriter, Mf6Writer, build_deck};
use gf_project::{ConductivityDef, DomainDef, Experiment, ModelDef};
use gf_scenarios::{ParamValue, Scenario, SweepSpec};

fn unique_temp_dir(prefix: &str) -> PathBuf {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("{}_{}", prefix, nanos))
}

fn experiment(conductivity: ConductivityDef) -> Experiment {
    let mut model = ModelDef::default();
    model.domain = DomainDef {
        length: 100.0,
        width: 100.0,
        top: 10.0,
        bottom: 0.0,
        layers: 2,
        rows: 4,
        columns: 4,
    };
    model.conductivity = conductivity;
    for well in &mut model.wells {
        // Both layers screened
        well.screen_top = 10.0;
        well.screen_bottom = -1.0;
    }
    Experiment {
        version: 1,
        name: "small".to_string(),
        base_name: "SIM".to_string(),
        parameters: SweepSpec::new(),
        model,
    }
}

fn read(dir: &Path, name: &str) -> String {
    std::fs::read_to_string(dir.join(name)).unwrap()
}

#[test]
fn writes_complete_simulation_folder() {
    let exp = experiment(ConductivityDef::Uniform { k: 5.0 });
    let scenario = Scenario::new(
        "SIM",
        0,
        vec![
            ("newton_raphson".to_string(), ParamValue::Bool(false)),
            (
                "pumping_method".to_string(),
                ParamValue::from("deepest_layer_kzz_correction"),
            ),
        ],
    );
    let deck = build_deck(&exp, &scenario, Path::new(".")).unwrap();
    let dir = unique_temp_dir("gf_deck_write").join(&deck.simulation_name);

    let written = Mf6Writer.write(&deck, &dir).unwrap();
    let mut names: Vec<String> = written
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(
        names,
        vec![
            "SIM0.ims",
            "SIM0.tdis",
            "SIM0_MODEL.chd",
            "SIM0_MODEL.dis",
            "SIM0_MODEL.ic",
            "SIM0_MODEL.nam",
            "SIM0_MODEL.npf",
            "SIM0_MODEL.oc",
            "SIM0_MODEL.sto",
            "SIM0_MODEL.wel",
            "mfsim.nam",
        ]
    );

    let nam = read(&dir, "SIM0_MODEL.nam");
    assert!(!nam.contains("NEWTON"));
    assert!(nam.contains("WEL6  SIM0_MODEL.wel  wel"));

    let tdis = read(&dir, "SIM0.tdis");
    assert!(tdis.contains("NPER  4"));
    assert!(tdis.contains("  100.0  1  1.0"));

    // Upper layer of each pumping well cell is corrected
    let npf = read(&dir, "SIM0_MODEL.npf");
    assert!(npf.contains("  k  LAYERED\n    CONSTANT  5.0\n    CONSTANT  5.0\n"));
    assert!(npf.contains("  k33  LAYERED\n    INTERNAL  FACTOR  1.0\n"));
    assert!(npf.contains("50.0"));

    // W1 at (25, 50) is row 3, column 2 in 1-based ids, deepest layer 2
    let wel = read(&dir, "SIM0_MODEL.wel");
    assert!(wel.contains("MAXBOUND  4"));
    assert!(wel.contains("BEGIN period  2\n  2  3  2  -72.0"));
    assert!(wel.contains("W1_SP1"));
    assert_eq!(wel.matches("BEGIN period").count(), 4);

    let sto = read(&dir, "SIM0_MODEL.sto");
    assert!(sto.contains("BEGIN period  1\n  STEADY-STATE"));
    assert!(sto.contains("BEGIN period  2\n  TRANSIENT"));
    assert!(sto.contains("ss\n    CONSTANT  0.01"));

    let oc = read(&dir, "SIM0_MODEL.oc");
    assert!(oc.contains("BUDGET  FILEOUT  SIM0_MODEL.bud"));
    assert!(oc.contains("HEAD  FILEOUT  SIM0_MODEL.hds"));

    let chd = read(&dir, "SIM0_MODEL.chd");
    assert!(chd.contains("MAXBOUND  16"));
    assert!(chd.contains("  1  1  1  110.0  inlet"));
    assert!(chd.contains("  2  4  4  100.0  outlet"));

    let _ = std::fs::remove_dir_all(dir.parent().unwrap());
}

#[test]
fn gaussian_field_is_read_relative_to_base_dir() {
    let base = unique_temp_dir("gf_deck_field");
    std::fs::create_dir_all(base.join("data")).unwrap();
    let mut text = String::from("z\n");
    for i in 0..32 {
        text.push_str(&format!("{}\n", if i % 2 == 0 { 0.0 } else { 1.0 }));
    }
    std::fs::write(base.join("data/hk.csv"), text).unwrap();

    let exp = experiment(ConductivityDef::GaussianCsv {
        path: "data/hk.csv".into(),
    });
    let scenario = Scenario::new(
        "SIM",
        1,
        vec![("hk_field_variance".to_string(), ParamValue::Float(4.0))],
    );
    let deck = build_deck(&exp, &scenario, &base).unwrap();

    // Odd raw entries are layer 1: k = exp(2)
    let layer1 = &deck.field.k_values()[16..];
    assert!(layer1.iter().all(|k| (k - 2f64.exp()).abs() < 1e-12));
    assert!(deck.field.k_values()[..16].iter().all(|k| *k == 1.0));

    let summary = serde_json::to_value(deck.summary()).unwrap();
    assert_eq!(summary["simulation_name"], "SIM1");
    assert_eq!(summary["cells"], 32);
    assert_eq!(summary["params"]["hk_field_variance"], 4.0);

    let _ = std::fs::remove_dir_all(&base);
}
