//! Every preset and a TOML config drive a full translation.

mod common;

use honeybee_energy::config::SimParConfig;
use honeybee_energy::idf::{extract_objects, parse_idf_string};
use honeybee_energy::translate::simulation_idf;

use common::{DDY, count_objects, office_model};

#[test]
fn every_preset_translates_the_office() {
    let model = office_model();
    for name in SimParConfig::PRESETS {
        let sim_par = SimParConfig::from_preset(name)
            .unwrap()
            .to_simulation_parameter()
            .unwrap();
        let dir = tempfile::tempdir().unwrap();
        let idf = simulation_idf(&model, &sim_par, dir.path())
            .unwrap_or_else(|e| panic!("preset {name} failed: {e}"));
        assert!(
            count_objects(&idf, "Output:Variable") > 0,
            "preset {name} requests no outputs"
        );
    }
}

#[test]
fn sizing_preset_disables_run_periods() {
    let sim_par = SimParConfig::from_preset("sizing")
        .unwrap()
        .to_simulation_parameter()
        .unwrap();
    let idf = sim_par.to_idf();
    let control = &extract_objects(&idf, "SimulationControl")[0];
    let fields = parse_idf_string(control, Some("SimulationControl")).unwrap();
    assert_eq!(fields, ["Yes", "Yes", "Yes", "Yes", "No"]);
}

#[test]
fn toml_config_with_ddy_file() {
    let dir = tempfile::tempdir().unwrap();
    let ddy_path = dir.path().join("site.ddy");
    std::fs::write(&ddy_path, DDY).unwrap();
    let toml_path = dir.path().join("sim_par.toml");
    std::fs::write(
        &toml_path,
        format!(
            r#"
[simulation]
timestep = 4
north_angle = 15.0

[run_period]
start_date = [6, 1]
end_date = [8, 31]

[output]
reporting_frequency = "Daily"
zone_energy_use = "Total"

[sizing]
ddy_file = "{}"
"#,
            ddy_path.display().to_string().replace('\\', "/")
        ),
    )
    .unwrap();

    let cfg = SimParConfig::from_toml_file(&toml_path).unwrap();
    assert!(cfg.validate().is_empty());
    let sim_par = cfg.to_simulation_parameter().unwrap();
    assert_eq!(sim_par.sizing_parameter.design_days.len(), 2);

    let model = office_model();
    let idf = simulation_idf(&model, &sim_par, dir.path()).unwrap();
    assert_eq!(count_objects(&idf, "SizingPeriod:DesignDay"), 2);
    let building = parse_idf_string(&extract_objects(&idf, "Building")[0], None).unwrap();
    assert_eq!(building[1], "15");
    let variable = &extract_objects(&idf, "Output:Variable")[0];
    let fields = parse_idf_string(variable, Some("Output:Variable")).unwrap();
    assert_eq!(fields[2], "Daily");
}
