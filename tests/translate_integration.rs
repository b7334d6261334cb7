//! End-to-end translation of a small office model.

mod common;

use honeybee_energy::geometry::Model;
use honeybee_energy::idf::{extract_objects, parse_idf_string};
use honeybee_energy::simulation::{LoadComponent, SimulationParameter};
use honeybee_energy::translate::{model_to_idf, simulation_idf};

use common::{count_objects, office_model};

#[test]
fn office_model_object_counts() {
    let model = office_model();
    let dir = tempfile::tempdir().unwrap();
    let idf = simulation_idf(&model, &SimulationParameter::default(), dir.path()).unwrap();

    assert_eq!(count_objects(&idf, "Zone"), 2);
    assert_eq!(count_objects(&idf, "BuildingSurface:Detailed"), 12);
    assert_eq!(count_objects(&idf, "FenestrationSurface:Detailed"), 1);
    assert_eq!(count_objects(&idf, "ZoneControl:Thermostat"), 1);
    assert_eq!(count_objects(&idf, "ZoneHVAC:EquipmentConnections"), 1);
    assert_eq!(count_objects(&idf, "People"), 1);
    assert_eq!(count_objects(&idf, "Lights"), 1);
    assert_eq!(count_objects(&idf, "GlobalGeometryRules"), 1);
}

#[test]
fn only_conditioned_rooms_get_thermostats() {
    let model = office_model();
    let dir = tempfile::tempdir().unwrap();
    let idf = model_to_idf(&model, dir.path(), Default::default()).unwrap();
    let thermostat = &extract_objects(&idf, "ZoneControl:Thermostat")[0];
    let fields = parse_idf_string(thermostat, Some("ZoneControl:Thermostat")).unwrap();
    assert_eq!(fields[1], "Office");
}

#[test]
fn every_surface_references_a_written_construction() {
    let model = office_model();
    let dir = tempfile::tempdir().unwrap();
    let idf = model_to_idf(&model, dir.path(), Default::default()).unwrap();

    let construction_names: Vec<String> = extract_objects(&idf, "Construction")
        .iter()
        .map(|c| parse_idf_string(c, Some("Construction")).unwrap()[0].clone())
        .collect();
    for surface in extract_objects(&idf, "BuildingSurface:Detailed") {
        let fields = parse_idf_string(&surface, Some("BuildingSurface:Detailed")).unwrap();
        assert!(
            construction_names.contains(&fields[2]),
            "missing construction {}",
            fields[2]
        );
    }
}

#[test]
fn model_survives_json_round_trip() {
    let model = office_model();
    let back = Model::from_json(&model.to_json().unwrap()).unwrap();
    assert_eq!(back, model);

    let dir = tempfile::tempdir().unwrap();
    let a = model_to_idf(&model, dir.path(), Default::default()).unwrap();
    let b = model_to_idf(&back, dir.path(), Default::default()).unwrap();
    assert_eq!(a, b);
}

#[test]
fn output_requests_reach_the_idf() {
    let model = office_model();
    let mut sim_par = SimulationParameter::default();
    sim_par.output.add_zone_energy_use(LoadComponent::Sensible);
    let dir = tempfile::tempdir().unwrap();
    let idf = simulation_idf(&model, &sim_par, dir.path()).unwrap();
    assert_eq!(count_objects(&idf, "Output:Variable"), 5);
    assert!(idf.contains("Zone Ideal Loads Supply Air Sensible Cooling Energy"));
}

#[test]
fn simulation_parameters_read_back_from_full_idf() {
    let model = office_model();
    let mut sim_par = SimulationParameter {
        timestep: 4,
        ..SimulationParameter::default()
    };
    sim_par.output.add_comfort_metrics();
    let dir = tempfile::tempdir().unwrap();
    let idf = simulation_idf(&model, &sim_par, dir.path()).unwrap();

    let back = SimulationParameter::from_idf(&idf).unwrap();
    assert_eq!(back.timestep, 4);
    assert_eq!(back.output.outputs, sim_par.output.outputs);
    assert_eq!(back.north_angle, Some(0.0));
}
