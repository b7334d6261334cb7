//! Model to EnergyPlus IDF translation.
//!
//! Each function returns IDF text for one object or block. [`model_to_idf`]
//! assembles the whole model into banner-separated sections and
//! [`simulation_idf`] puts the simulation parameters in front of it.

use std::collections::HashSet;
use std::path::Path;

use tracing::{debug, warn};

use crate::construction::{ConstructionSet, unique_by_name};
use crate::error::Result;
use crate::geometry::{Aperture, Door, Face, Model, Point3D, Room, Shade};
use crate::idf::generate_idf_string;
use crate::load::Load;
use crate::load::setpoint::control_type_schedule;
use crate::schedule::{Schedule, ScheduleTypeLimit};
use crate::simulation::{SimulationParameter, SolarDistribution};

const MODEL_BANNER: &str = "!-   =======================================\n\
                            !-   ================ MODEL ================\n\
                            !-   =======================================\n";
const TYPE_LIMITS_BANNER: &str = "!-   ========= SCHEDULE TYPE LIMITS =========\n";
const SCHEDULES_BANNER: &str = "!-   ============== SCHEDULES ==============\n";
const MATERIALS_BANNER: &str = "!-   ============== MATERIALS ==============\n";
const CONSTRUCTIONS_BANNER: &str = "!-   ============ CONSTRUCTIONS ============\n";
const ZONE_BANNER: &str = "!-   ============ ZONE GEOMETRY ============\n";
const CONTEXT_BANNER: &str = "!-   ========== CONTEXT GEOMETRY ==========\n";

fn vertices_idf(vertices: &[Point3D]) -> String {
    vertices
        .iter()
        .map(|p| p.idf_text())
        .collect::<Vec<_>>()
        .join(",\n ")
}

/// `BuildingSurface:Detailed` for a face of `room`.
pub fn face_to_idf(face: &Face, room: &Room) -> String {
    let bc = &face.boundary_condition;
    let vertices = face.upper_left_vertices();
    let values = [
        face.name.clone(),
        face.face_type.idf_surface_type(bc).to_string(),
        face.construction(&room.energy.construction_set).name.clone(),
        room.name.clone(),
        bc.name().to_string(),
        bc.boundary_condition_object().unwrap_or_default().to_string(),
        bc.sun_exposure_idf().to_string(),
        bc.wind_exposure_idf().to_string(),
        bc.view_factor_idf(),
        vertices.len().to_string(),
        vertices_idf(&vertices),
    ];
    let comments = [
        "name",
        "surface type",
        "construction name",
        "zone name",
        "boundary condition",
        "boundary condition object",
        "sun exposure",
        "wind exposure",
        "view factor to ground",
        "number of vertices",
        "",
    ];
    generate_idf_string("BuildingSurface:Detailed", &values, Some(&comments))
}

const FENESTRATION_COMMENTS: [&str; 10] = [
    "name",
    "surface type",
    "construction name",
    "building surface name",
    "boundary condition object",
    "view factor to ground",
    "frame and divider name",
    "multiplier",
    "number of vertices",
    "",
];

/// `FenestrationSurface:Detailed` for a window in `face`.
pub fn aperture_to_idf(aperture: &Aperture, face: &Face, set: &ConstructionSet) -> String {
    let bc = &aperture.boundary_condition;
    let vertices = aperture.upper_left_vertices();
    let values = [
        aperture.name.clone(),
        "Window".to_string(),
        aperture.construction(set, face.face_type).name.clone(),
        face.name.clone(),
        bc.boundary_condition_object().unwrap_or_default().to_string(),
        bc.view_factor_idf(),
        String::new(),
        "1".to_string(),
        vertices.len().to_string(),
        vertices_idf(&vertices),
    ];
    generate_idf_string(
        "FenestrationSurface:Detailed",
        &values,
        Some(&FENESTRATION_COMMENTS),
    )
}

/// `FenestrationSurface:Detailed` for a door in `face`.
pub fn door_to_idf(door: &Door, face: &Face, set: &ConstructionSet) -> String {
    let bc = &door.boundary_condition;
    let vertices = door.upper_left_vertices();
    let values = [
        door.name.clone(),
        door.idf_surface_type().to_string(),
        door.construction(set).name().to_string(),
        face.name.clone(),
        bc.boundary_condition_object().unwrap_or_default().to_string(),
        bc.view_factor_idf(),
        String::new(),
        "1".to_string(),
        vertices.len().to_string(),
        vertices_idf(&vertices),
    ];
    generate_idf_string(
        "FenestrationSurface:Detailed",
        &values,
        Some(&FENESTRATION_COMMENTS),
    )
}

/// Shading surface text for `shade`.
///
/// A shade with a `base_surface` is written as `Shading:Zone:Detailed`,
/// otherwise as `Shading:Building:Detailed`. Shades whose construction
/// differs from the default also get a `ShadingProperty:Reflectance`.
pub fn shade_to_idf(shade: &Shade, base_surface: Option<&str>) -> String {
    let vertices = shade.upper_left_vertices();
    let schedule = shade
        .transmittance_schedule
        .as_ref()
        .map(|s| s.name().to_string())
        .unwrap_or_default();
    let geometry = match base_surface {
        Some(base) => generate_idf_string(
            "Shading:Zone:Detailed",
            &[
                shade.name.clone(),
                base.to_string(),
                schedule,
                vertices.len().to_string(),
                vertices_idf(&vertices),
            ],
            Some(&[
                "name",
                "base surface",
                "transmittance schedule",
                "number of vertices",
                "",
            ]),
        ),
        None => generate_idf_string(
            "Shading:Building:Detailed",
            &[
                shade.name.clone(),
                schedule,
                vertices.len().to_string(),
                vertices_idf(&vertices),
            ],
            Some(&["name", "transmittance schedule", "number of vertices", ""]),
        ),
    };
    let construction = shade.construction();
    if construction.is_default() {
        geometry
    } else {
        format!("{geometry}\n\n{}", construction.to_shading_idf(&shade.name))
    }
}

fn zone_idf(room: &Room) -> String {
    if room.multiplier == 1 {
        return generate_idf_string("Zone", &[room.name.as_str()], Some(&["name"]));
    }
    let multiplier = room.multiplier.to_string();
    generate_idf_string(
        "Zone",
        &[room.name.as_str(), "", "", "", "", "", multiplier.as_str()],
        Some(&[
            "name",
            "direction of relative north",
            "x origin",
            "y origin",
            "z origin",
            "type",
            "multiplier",
        ]),
    )
}

/// The zone block of a room: `Zone`, its loads, any window shading control
/// and, when conditioned, its ideal air system, thermostat and humidistat.
///
/// A conditioned room without a setpoint is written unconditioned with a
/// warning.
pub fn room_to_idf(room: &Room) -> String {
    let energy = &room.energy;
    let zone = room.name.as_str();
    let mut objects = vec![
        format!("!-   ________ZONE:{}________\n", room.display_name()),
        zone_idf(room),
    ];
    let loads: [Option<&dyn Load>; 5] = [
        energy.people().map(|l| l as &dyn Load),
        energy.lighting().map(|l| l as &dyn Load),
        energy.electric_equipment().map(|l| l as &dyn Load),
        energy.gas_equipment().map(|l| l as &dyn Load),
        energy.infiltration().map(|l| l as &dyn Load),
    ];
    objects.extend(loads.into_iter().flatten().map(|l| l.to_idf(zone)));
    if let Some(control) = &energy.window_shade_control {
        let apertures: Vec<&str> = room
            .faces
            .iter()
            .flat_map(|f| &f.apertures)
            .map(|a| a.name.as_str())
            .collect();
        if apertures.is_empty() {
            warn!(room = zone, control = %control.name, "window shade control has no windows");
        } else {
            objects.push(control.to_idf(zone, &apertures));
        }
    }
    objects.extend(energy.ventilation().map(|l| l.to_idf(zone)));

    if let Some(hvac) = &energy.hvac {
        match energy.setpoint() {
            Some(setpoint) => {
                objects.push(hvac.to_idf(zone, setpoint, energy.ventilation()));
                objects.push(setpoint.to_idf(zone));
                objects.extend(setpoint.to_idf_humidistat(zone));
            }
            None => warn!(room = zone, "conditioned room has no setpoint; HVAC not written"),
        }
    }
    objects.join("\n\n")
}

/// IDF objects for `schedules`, writing fixed-interval value files into
/// `directory`.
///
/// File names are unique within one call. A stem already taken, ignoring
/// case, gets a `_2`, `_3`, ... suffix.
pub fn schedules_to_idf(schedules: &[&Schedule], directory: &Path) -> Result<Vec<String>> {
    let mut taken = HashSet::new();
    let mut objects = Vec::new();
    for schedule in schedules {
        match schedule {
            Schedule::FixedInterval(s) => {
                let stem = s.file_stem();
                let mut file_name = format!("{stem}.csv");
                let mut n = 1;
                while !taken.insert(file_name.to_ascii_lowercase()) {
                    n += 1;
                    file_name = format!("{stem}_{n}.csv");
                }
                objects.push(s.to_idf_file(directory, &file_name)?);
            }
            Schedule::Ruleset(_) => objects.extend(schedule.to_idf(directory)?),
        }
    }
    Ok(objects)
}

/// The full model as IDF, in banner-separated sections.
///
/// Fixed-interval schedules write their value files into
/// `schedule_directory`.
///
/// # Errors
///
/// Returns an error if a schedule file cannot be written or the thermostat
/// control type schedule cannot be built.
pub fn model_to_idf(
    model: &Model,
    schedule_directory: &Path,
    solar_distribution: SolarDistribution,
) -> Result<String> {
    let mut blocks = vec![MODEL_BANNER.to_string(), model.building_idf(solar_distribution)];

    let control_type = if model.has_thermostats() {
        Some(control_type_schedule()?)
    } else {
        None
    };

    let mut type_limits: Vec<&ScheduleTypeLimit> = model.schedule_type_limits();
    type_limits.extend(control_type.as_ref().and_then(|s| s.schedule_type_limit()));
    let type_limits = unique_by_name(&type_limits, |t| t.name.as_str());
    blocks.push(TYPE_LIMITS_BANNER.to_string());
    blocks.extend(type_limits.iter().map(|t| t.to_idf()));

    let mut schedules = model.schedules();
    schedules.extend(control_type.as_ref());
    blocks.push(SCHEDULES_BANNER.to_string());
    blocks.extend(schedules_to_idf(&schedules, schedule_directory)?);

    let materials = model.materials();
    blocks.push(MATERIALS_BANNER.to_string());
    blocks.extend(materials.iter().map(|m| m.to_idf()));

    let constructions = model.constructions();
    blocks.push(CONSTRUCTIONS_BANNER.to_string());
    blocks.extend(constructions.iter().map(|c| c.to_idf()));

    blocks.push(ZONE_BANNER.to_string());
    for room in &model.rooms {
        let set = &room.energy.construction_set;
        blocks.push(room_to_idf(room));
        for face in &room.faces {
            blocks.push(face_to_idf(face, room));
            for aperture in &face.apertures {
                blocks.push(aperture_to_idf(aperture, face, set));
                blocks.extend(
                    aperture
                        .outdoor_shades
                        .iter()
                        .map(|s| shade_to_idf(s, Some(face.name.as_str()))),
                );
            }
            blocks.extend(face.doors.iter().map(|d| door_to_idf(d, face, set)));
            blocks.extend(
                face.outdoor_shades
                    .iter()
                    .map(|s| shade_to_idf(s, Some(face.name.as_str()))),
            );
        }
        blocks.extend(room.outdoor_shades.iter().map(|s| shade_to_idf(s, None)));
    }

    blocks.push(CONTEXT_BANNER.to_string());
    blocks.extend(model.orphaned_shades.iter().map(|s| shade_to_idf(s, None)));

    debug!(
        model = %model.name,
        rooms = model.rooms.len(),
        type_limits = type_limits.len(),
        schedules = schedules.len(),
        materials = materials.len(),
        constructions = constructions.len(),
        "translated model to IDF"
    );
    Ok(blocks.join("\n\n"))
}

/// Simulation parameters followed by the model, ready to run.
///
/// A north angle on the parameters replaces the model's own.
pub fn simulation_idf(
    model: &Model,
    sim_par: &SimulationParameter,
    schedule_directory: &Path,
) -> Result<String> {
    sim_par.validate()?;
    let model_idf = match sim_par.north_angle {
        Some(north) if north != model.north_angle => {
            let mut rotated = model.clone();
            rotated.north_angle = north;
            model_to_idf(&rotated, schedule_directory, sim_par.solar_distribution())?
        }
        _ => model_to_idf(model, schedule_directory, sim_par.solar_distribution())?,
    };
    Ok(format!("{}\n\n{model_idf}", sim_par.to_idf()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::construction::{ShadeConstruction, WindowConstruction, WindowShadeControl};
    use crate::material::{
        EnergyWindowMaterialGas, EnergyWindowMaterialGlazing, EnergyWindowMaterialShade, GasType,
        WindowMaterial,
    };
    use crate::geometry::{BoundaryCondition, FaceType};
    use crate::idf::{extract_objects, parse_idf_string};
    use crate::library::programs::office_program;
    use crate::schedule::{ScheduleFixedInterval, ScheduleRuleset};

    fn office() -> Room {
        let mut room = Room::from_box("Office", 5.0, 10.0, 3.0, Point3D::default()).unwrap();
        room.energy.program_type = office_program().unwrap();
        room.energy.add_default_ideal_air();
        room
    }

    fn canopy(name: &str) -> Shade {
        Shade::new(
            name,
            vec![
                Point3D::new(0.0, -1.0, 3.0),
                Point3D::new(5.0, -1.0, 3.0),
                Point3D::new(5.0, 0.0, 3.0),
                Point3D::new(0.0, 0.0, 3.0),
            ],
        )
        .unwrap()
    }

    #[test]
    fn roof_face_fields() {
        let room = office();
        let top = room.faces.iter().find(|f| f.face_type == FaceType::RoofCeiling).unwrap();
        let f = parse_idf_string(&face_to_idf(top, &room), Some("BuildingSurface:Detailed"))
            .unwrap();
        assert_eq!(f[0], "Office_Top");
        assert_eq!(f[1], "Roof");
        assert_eq!(f[3], "Office");
        assert_eq!(f[4], "Outdoors");
        assert_eq!(f[6], "SunExposed");
        assert_eq!(f[7], "WindExposed");
        assert_eq!(f[8], "autocalculate");
        assert_eq!(f[9], "4");
        assert_eq!(f.len(), 10 + 4 * 3);
    }

    #[test]
    fn ground_floor_has_no_sun() {
        let room = office();
        let floor = &room.faces[0];
        assert_eq!(floor.boundary_condition, BoundaryCondition::Ground);
        let f = parse_idf_string(&face_to_idf(floor, &room), None).unwrap();
        assert_eq!(f[1], "Floor");
        assert_eq!(f[4], "Ground");
        assert_eq!(f[6], "NoSun");
    }

    #[test]
    fn window_and_door_objects() {
        let mut room = office();
        let front = &mut room.faces[1];
        front
            .add_aperture(
                Aperture::new(
                    "Office_Win",
                    vec![
                        Point3D::new(1.0, 0.0, 1.0),
                        Point3D::new(4.0, 0.0, 1.0),
                        Point3D::new(4.0, 0.0, 2.0),
                        Point3D::new(1.0, 0.0, 2.0),
                    ],
                )
                .unwrap(),
            )
            .unwrap();
        front
            .add_door(
                Door::new(
                    "Office_Door",
                    vec![
                        Point3D::new(4.2, 0.0, 0.0),
                        Point3D::new(4.9, 0.0, 0.0),
                        Point3D::new(4.9, 0.0, 2.0),
                        Point3D::new(4.2, 0.0, 2.0),
                    ],
                    true,
                )
                .unwrap(),
            )
            .unwrap();
        let face = &room.faces[1];
        let set = &room.energy.construction_set;
        let win = parse_idf_string(&aperture_to_idf(&face.apertures[0], face, set), None).unwrap();
        assert_eq!(win[1], "Window");
        assert_eq!(win[3], "Office_Front");
        assert_eq!(win[7], "1");
        let door = parse_idf_string(&door_to_idf(&face.doors[0], face, set), None).unwrap();
        assert_eq!(door[1], "GlassDoor");
    }

    #[test]
    fn shade_object_types() {
        let shade = canopy("Canopy");
        assert!(shade_to_idf(&shade, Some("Office_Front")).starts_with("Shading:Zone:Detailed"));
        let building = shade_to_idf(&shade, None);
        assert!(building.starts_with("Shading:Building:Detailed"));
        assert!(!building.contains("ShadingProperty:Reflectance"));

        let mut bright = canopy("Bright Canopy");
        bright.construction = Some(ShadeConstruction::new("White", 0.7, 0.7, false).unwrap());
        let text = shade_to_idf(&bright, None);
        let props = extract_objects(&text, "ShadingProperty:Reflectance");
        assert_eq!(props.len(), 1);
        let f = parse_idf_string(&props[0], None).unwrap();
        assert_eq!(f, ["Bright Canopy", "0.7", "0.7"]);
    }

    #[test]
    fn zone_block_for_conditioned_room() {
        let mut room = office();
        room.multiplier = 3;
        room.display_name = Some("Open Office".to_string());
        let text = room_to_idf(&room);
        assert!(text.starts_with("!-   ________ZONE:Open Office________"));
        let zone = parse_idf_string(&extract_objects(&text, "Zone")[0], None).unwrap();
        assert_eq!(zone, ["Office", "", "", "", "", "", "3"]);
        for t in [
            "People",
            "Lights",
            "ElectricEquipment",
            "ZoneInfiltration:DesignFlowRate",
            "ZoneHVAC:EquipmentConnections",
            "ZoneControl:Thermostat",
        ] {
            assert_eq!(extract_objects(&text, t).len(), 1, "{t}");
        }
    }

    fn shaded_office() -> Room {
        let mut room = office();
        room.faces[1]
            .add_aperture(
                Aperture::new(
                    "Office_Win",
                    vec![
                        Point3D::new(1.0, 0.0, 1.0),
                        Point3D::new(4.0, 0.0, 1.0),
                        Point3D::new(4.0, 0.0, 2.0),
                        Point3D::new(1.0, 0.0, 2.0),
                    ],
                )
                .unwrap(),
            )
            .unwrap();
        let glass: WindowMaterial = EnergyWindowMaterialGlazing::clear("Clear").unwrap().into();
        let gap: WindowMaterial = EnergyWindowMaterialGas::new("Air Gap", 0.0127, GasType::Air)
            .unwrap()
            .into();
        let shade: WindowMaterial = EnergyWindowMaterialShade::new("Roller").unwrap().into();
        let construction =
            WindowConstruction::new("Shaded Double", vec![glass.clone(), gap, glass, shade])
                .unwrap();
        let schedule = ScheduleRuleset::from_constant_value("Shades Down", 1.0, None)
            .unwrap()
            .into();
        room.energy.window_shade_control =
            Some(WindowShadeControl::new("Office Shades", construction, schedule).unwrap());
        room
    }

    #[test]
    fn shade_control_follows_infiltration() {
        let text = room_to_idf(&shaded_office());
        let controls = extract_objects(&text, "WindowShadingControl");
        assert_eq!(controls.len(), 1);
        let fields = parse_idf_string(&controls[0], None).unwrap();
        assert_eq!(fields[1], "Office");
        assert_eq!(fields[3], "InteriorShade");
        assert_eq!(&fields[16..], ["Office_Win"]);
        let at = |t: &str| text.find(&format!("{t},")).unwrap();
        assert!(at("ZoneInfiltration:DesignFlowRate") < at("WindowShadingControl"));
        assert!(at("WindowShadingControl") < at("ZoneHVAC:EquipmentConnections"));
    }

    #[test]
    fn shade_control_without_windows_is_skipped() {
        let mut room = shaded_office();
        room.faces[1].apertures.clear();
        let text = room_to_idf(&room);
        assert!(extract_objects(&text, "WindowShadingControl").is_empty());
    }

    #[test]
    fn model_writes_shaded_construction_and_schedule() {
        let model = Model::new("Shaded Building", vec![shaded_office()]).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let idf = model_to_idf(&model, dir.path(), SolarDistribution::FullExterior).unwrap();
        assert_eq!(extract_objects(&idf, "WindowMaterial:Shade").len(), 1);
        let constructions = extract_objects(&idf, "Construction");
        assert!(constructions.iter().any(|c| c.contains("Shaded Double")));
        assert!(idf.contains("Shades Down"));
    }

    #[test]
    fn room_without_setpoint_skips_hvac() {
        let mut room = Room::from_box("Closet", 2.0, 2.0, 3.0, Point3D::default()).unwrap();
        room.energy.add_default_ideal_air();
        let text = room_to_idf(&room);
        assert!(extract_objects(&text, "ZoneHVAC:IdealLoadsAirSystem").is_empty());
        assert_eq!(extract_objects(&text, "Zone").len(), 1);
    }

    #[test]
    fn model_sections_in_order() {
        let mut model = Model::new("Office Building", vec![office()]).unwrap();
        model.orphaned_shades.push(canopy("Tree"));
        let dir = tempfile::tempdir().unwrap();
        let idf = model_to_idf(&model, dir.path(), SolarDistribution::FullExterior).unwrap();
        let banners = [
            "MODEL",
            "SCHEDULE TYPE LIMITS",
            "SCHEDULES",
            "MATERIALS",
            "CONSTRUCTIONS",
            "ZONE GEOMETRY",
            "CONTEXT GEOMETRY",
        ];
        let positions: Vec<usize> = banners
            .iter()
            .map(|b| idf.find(&format!("= {b} =")).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(extract_objects(&idf, "BuildingSurface:Detailed").len(), 6);
        assert_eq!(extract_objects(&idf, "Shading:Building:Detailed").len(), 1);
        assert!(idf.contains("Dual Setpoint Control Type"));
        let building = parse_idf_string(&extract_objects(&idf, "Building")[0], None).unwrap();
        assert_eq!(building[5], "FullExterior");
    }

    #[test]
    fn simulation_parameters_override_north() {
        let model = Model::new("Office Building", vec![office()]).unwrap();
        let sim_par = SimulationParameter {
            north_angle: Some(45.0),
            ..SimulationParameter::default()
        };
        let dir = tempfile::tempdir().unwrap();
        let idf = simulation_idf(&model, &sim_par, dir.path()).unwrap();
        assert!(idf.starts_with("!-   ========= SIMULATION PARAMETERS"));
        let building = parse_idf_string(&extract_objects(&idf, "Building")[0], None).unwrap();
        assert_eq!(building[1], "45");
    }

    #[test]
    fn fixed_interval_files_never_collide() {
        let ones = ScheduleFixedInterval::new("Occ A", vec![1.0; 8760], 1, None).unwrap();
        let zeros = ScheduleFixedInterval::new("Occ_A", vec![0.0; 8760], 1, None).unwrap();
        let (a, b) = (Schedule::from(ones), Schedule::from(zeros));
        let dir = tempfile::tempdir().unwrap();
        let objects = schedules_to_idf(&[&a, &b], dir.path()).unwrap();

        let file_of = |text: &str| {
            let fields = parse_idf_string(text, Some("Schedule:File")).unwrap();
            std::path::PathBuf::from(&fields[2])
        };
        let (path_a, path_b) = (file_of(&objects[0]), file_of(&objects[1]));
        assert_ne!(path_a, path_b);
        assert!(path_b.ends_with("Occ_A_2.csv"));
        let first_line = |p: &Path| {
            std::fs::read_to_string(p).unwrap().lines().next().map(str::to_string)
        };
        assert_eq!(first_line(&path_a).as_deref(), Some("1"));
        assert_eq!(first_line(&path_b).as_deref(), Some("0"));
    }
}
