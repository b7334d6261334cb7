//! Runs the binary against a model written to a temporary directory.

mod common;

use std::process::{Command, Output};

use common::{DDY, count_objects, office_model, write_model_json};

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_honeybee-energy"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

#[test]
fn validate_reports_room_count() {
    let dir = tempfile::tempdir().unwrap();
    let model = write_model_json(&office_model(), dir.path());
    let out = run(&["validate", model.to_str().unwrap()]);
    assert!(out.status.success());
    let stdout = String::from_utf8(out.stdout).unwrap();
    assert!(stdout.contains("Small Office: valid (2 rooms"));
}

#[test]
fn validate_rejects_missing_file() {
    let out = run(&["validate", "does-not-exist.json"]);
    assert!(!out.status.success());
    let stderr = String::from_utf8(out.stderr).unwrap();
    assert!(stderr.starts_with("error:"));
}

#[test]
fn translate_writes_idf_file() {
    let dir = tempfile::tempdir().unwrap();
    let model = write_model_json(&office_model(), dir.path());
    let ddy = dir.path().join("site.ddy");
    std::fs::write(&ddy, DDY).unwrap();
    let idf_path = dir.path().join("in.idf");

    let out = run(&[
        "translate",
        model.to_str().unwrap(),
        "--preset",
        "load_balance",
        "--ddy",
        ddy.to_str().unwrap(),
        "--all-design-days",
        "-o",
        idf_path.to_str().unwrap(),
    ]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));

    let idf = std::fs::read_to_string(&idf_path).unwrap();
    assert_eq!(count_objects(&idf, "SizingPeriod:DesignDay"), 4);
    assert_eq!(count_objects(&idf, "Zone"), 2);
}

#[test]
fn translate_unknown_preset_fails() {
    let dir = tempfile::tempdir().unwrap();
    let model = write_model_json(&office_model(), dir.path());
    let out = run(&["translate", model.to_str().unwrap(), "--preset", "nope"]);
    assert!(!out.status.success());
    let stderr = String::from_utf8(out.stderr).unwrap();
    assert!(stderr.contains("unknown preset"));
}

#[test]
fn invalid_config_lists_every_error() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("bad.toml");
    std::fs::write(
        &config,
        "[simulation]\ntimestep = 7\n\n[output]\nreporting_frequency = \"Weekly\"\n",
    )
    .unwrap();
    let out = run(&["sim-par", "--config", config.to_str().unwrap()]);
    assert!(!out.status.success());
    let stderr = String::from_utf8(out.stderr).unwrap();
    assert!(stderr.contains("simulation.timestep"));
    assert!(stderr.contains("output.reporting_frequency"));
}

#[test]
fn sim_par_json_output() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sim_par.json");
    let out = run(&["sim-par", "--preset", "comfort", "-o", path.to_str().unwrap()]);
    assert!(out.status.success());
    let sp = honeybee_energy::simulation::SimulationParameter::from_json_file(&path).unwrap();
    assert!(!sp.output.outputs.is_empty());
}

#[test]
fn schedules_to_stdout() {
    let dir = tempfile::tempdir().unwrap();
    let model = write_model_json(&office_model(), dir.path());
    let out = run(&["schedules", model.to_str().unwrap()]);
    assert!(out.status.success());
    let stdout = String::from_utf8(out.stdout).unwrap();
    assert!(stdout.lines().next().unwrap().contains("Generic Office Occupancy"));
    assert_eq!(stdout.lines().count(), 1 + 8760);
}

#[test]
fn sim_par_idf_output() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sim_par.idf");
    let out = run(&["sim-par", "-o", path.to_str().unwrap()]);
    assert!(out.status.success());
    let idf = std::fs::read_to_string(&path).unwrap();
    assert_eq!(count_objects(&idf, "SimulationControl"), 1);
    assert_eq!(count_objects(&idf, "GlobalGeometryRules"), 1);
}
