//! The model: rooms, context shades and everything they reference.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::room::Room;
use super::shade::Shade;
use crate::construction::{Construction, ConstructionSet, unique_by_name};
use crate::error::{Error, Result, check_ep_name};
use crate::idf::generate_idf_string;
use crate::material::Material;
use crate::programtype::ProgramType;
use crate::schedule::{Schedule, ScheduleTypeLimit};
use crate::simulation::SolarDistribution;

/// Surroundings used for wind speed profiles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TerrainType {
    Ocean,
    Country,
    Suburbs,
    Urban,
    #[default]
    City,
}

impl TerrainType {
    pub const ALL: [TerrainType; 5] = [
        TerrainType::Ocean,
        TerrainType::Country,
        TerrainType::Suburbs,
        TerrainType::Urban,
        TerrainType::City,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TerrainType::Ocean => "Ocean",
            TerrainType::Country => "Country",
            TerrainType::Suburbs => "Suburbs",
            TerrainType::Urban => "Urban",
            TerrainType::City => "City",
        }
    }
}

impl fmt::Display for TerrainType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TerrainType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::invalid("terrain type", format!("\"{s}\" is not recognized")))
    }
}

/// Names that differ only in the object they label.
fn conflicting_names<T: PartialEq>(items: &[T], name: impl Fn(&T) -> &str) -> Vec<String> {
    let mut first: HashMap<&str, &T> = HashMap::new();
    let mut conflicts: Vec<String> = Vec::new();
    for item in items {
        let n = name(item);
        match first.get(n) {
            None => {
                first.insert(n, item);
            }
            Some(prev) if *prev != item && !conflicts.iter().any(|c| c == n) => {
                conflicts.push(n.to_string());
            }
            Some(_) => {}
        }
    }
    conflicts
}

/// Names used more than once.
fn repeated_names<'a>(names: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut order: Vec<&str> = Vec::new();
    for n in names {
        let count = counts.entry(n).or_insert(0);
        *count += 1;
        if *count == 2 {
            order.push(n);
        }
    }
    order.into_iter().map(str::to_string).collect()
}

fn duplicate_check(kind: &str, names: Vec<String>) -> Result<()> {
    if names.is_empty() {
        Ok(())
    } else {
        Err(Error::Duplicate {
            kind: kind.to_string(),
            names,
        })
    }
}

/// A building model ready to be written to IDF.
///
/// Collections such as [`Model::schedules`] return each object once, in
/// the order it is first met walking rooms, then shades.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Model {
    pub name: String,
    /// Degrees clockwise from the Y axis to true north.
    #[serde(default)]
    pub north_angle: f64,
    #[serde(default)]
    pub terrain_type: TerrainType,
    #[serde(default)]
    pub rooms: Vec<Room>,
    /// Context shades that belong to no room.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub orphaned_shades: Vec<Shade>,
}

impl Model {
    pub fn new(name: &str, rooms: Vec<Room>) -> Result<Self> {
        let model = Self {
            name: name.to_string(),
            north_angle: 0.0,
            terrain_type: TerrainType::default(),
            rooms,
            orphaned_shades: Vec::new(),
        };
        model.validate()?;
        Ok(model)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Reads and validates a model JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let model = Self::from_json(&std::fs::read_to_string(path)?)?;
        model.validate()?;
        Ok(model)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Runs every object's checks and the duplicate-name checks.
    pub fn validate(&self) -> Result<()> {
        check_ep_name(&self.name)?;
        if !(0.0..360.0).contains(&self.north_angle) {
            return Err(Error::out_of_range(
                "north angle",
                self.north_angle,
                "at least 0 and less than 360",
            ));
        }
        self.rooms.iter().try_for_each(Room::validate)?;
        self.orphaned_shades.iter().try_for_each(Shade::validate)?;
        self.check_duplicate_room_names()?;
        self.check_duplicate_surface_names()?;
        self.check_duplicate_shade_names()?;
        self.check_duplicate_material_names()?;
        self.check_duplicate_construction_names()?;
        self.check_duplicate_construction_set_names()?;
        self.check_duplicate_schedule_type_limit_names()?;
        self.check_duplicate_schedule_names()?;
        self.check_duplicate_program_type_names()
    }

    /// Every shade, room-attached ones first.
    pub fn all_shades(&self) -> impl Iterator<Item = &Shade> {
        self.rooms
            .iter()
            .flat_map(Room::all_shades)
            .chain(self.orphaned_shades.iter())
    }

    /// Total floor area, counting room multipliers.
    pub fn floor_area(&self) -> f64 {
        self.rooms
            .iter()
            .map(|r| r.floor_area() * f64::from(r.multiplier))
            .sum()
    }

    fn all_constructions(&self) -> Vec<Construction> {
        self.rooms
            .iter()
            .flat_map(|r| {
                let mut c = r.energy.construction_set.constructions_unique();
                c.extend(r.surface_constructions());
                c.extend(
                    r.energy
                        .window_shade_control
                        .as_ref()
                        .map(|s| Construction::from(s.construction.clone())),
                );
                c
            })
            .collect()
    }

    pub fn constructions(&self) -> Vec<Construction> {
        unique_by_name(&self.all_constructions(), Construction::name)
    }

    fn all_materials(&self) -> Vec<Material> {
        self.constructions()
            .iter()
            .flat_map(Construction::materials)
            .collect()
    }

    pub fn materials(&self) -> Vec<Material> {
        unique_by_name(&self.all_materials(), Material::name)
    }

    fn all_schedules(&self) -> Vec<&Schedule> {
        self.rooms
            .iter()
            .flat_map(|r| r.energy.schedules())
            .chain(self.all_shades().filter_map(|s| s.transmittance_schedule.as_ref()))
            .collect()
    }

    pub fn schedules(&self) -> Vec<&Schedule> {
        unique_by_name(&self.all_schedules(), |s| s.name())
    }

    fn all_schedule_type_limits(&self) -> Vec<&ScheduleTypeLimit> {
        self.all_schedules()
            .into_iter()
            .filter_map(Schedule::schedule_type_limit)
            .collect()
    }

    pub fn schedule_type_limits(&self) -> Vec<&ScheduleTypeLimit> {
        unique_by_name(&self.all_schedule_type_limits(), |t| t.name.as_str())
    }

    pub fn construction_sets(&self) -> Vec<&ConstructionSet> {
        let sets: Vec<&ConstructionSet> =
            self.rooms.iter().map(|r| &r.energy.construction_set).collect();
        unique_by_name(&sets, |s| s.name.as_str())
    }

    pub fn program_types(&self) -> Vec<&ProgramType> {
        let programs: Vec<&ProgramType> =
            self.rooms.iter().map(|r| &r.energy.program_type).collect();
        unique_by_name(&programs, |p| p.name.as_str())
    }

    /// Whether any room writes a thermostat.
    pub fn has_thermostats(&self) -> bool {
        self.rooms
            .iter()
            .any(|r| r.energy.is_conditioned() && r.energy.setpoint().is_some())
    }

    pub fn check_duplicate_room_names(&self) -> Result<()> {
        duplicate_check("room", repeated_names(self.rooms.iter().map(|r| r.name.as_str())))
    }

    /// Faces, windows and doors share one IDF namespace.
    pub fn check_duplicate_surface_names(&self) -> Result<()> {
        duplicate_check("surface", repeated_names(self.rooms.iter().flat_map(Room::surface_names)))
    }

    pub fn check_duplicate_shade_names(&self) -> Result<()> {
        duplicate_check("shade", repeated_names(self.all_shades().map(|s| s.name.as_str())))
    }

    pub fn check_duplicate_material_names(&self) -> Result<()> {
        duplicate_check("material", conflicting_names(&self.all_materials(), Material::name))
    }

    pub fn check_duplicate_construction_names(&self) -> Result<()> {
        duplicate_check(
            "construction",
            conflicting_names(&self.all_constructions(), Construction::name),
        )
    }

    pub fn check_duplicate_construction_set_names(&self) -> Result<()> {
        let sets: Vec<&ConstructionSet> =
            self.rooms.iter().map(|r| &r.energy.construction_set).collect();
        duplicate_check("construction set", conflicting_names(&sets, |s| s.name.as_str()))
    }

    pub fn check_duplicate_schedule_type_limit_names(&self) -> Result<()> {
        duplicate_check(
            "schedule type limit",
            conflicting_names(&self.all_schedule_type_limits(), |t| t.name.as_str()),
        )
    }

    pub fn check_duplicate_schedule_names(&self) -> Result<()> {
        duplicate_check("schedule", conflicting_names(&self.all_schedules(), |s| s.name()))
    }

    pub fn check_duplicate_program_type_names(&self) -> Result<()> {
        let programs: Vec<&ProgramType> =
            self.rooms.iter().map(|r| &r.energy.program_type).collect();
        duplicate_check("program type", conflicting_names(&programs, |p| p.name.as_str()))
    }

    /// The IDF `Building` object.
    pub fn building_idf(&self, solar_distribution: SolarDistribution) -> String {
        let values = [
            self.name.clone(),
            self.north_angle.to_string(),
            self.terrain_type.to_string(),
            String::new(),
            String::new(),
            solar_distribution.to_string(),
        ];
        let comments = [
            "name",
            "north axis",
            "terrain",
            "loads convergence tolerance",
            "temperature convergence tolerance",
            "solar distribution",
        ];
        generate_idf_string("Building", &values, Some(&comments))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point3D;
    use crate::idf::parse_idf_string;
    use crate::library::programs::office_program;

    fn office_model() -> Model {
        let mut a = Room::from_box("Office A", 5.0, 10.0, 3.0, Point3D::default()).unwrap();
        let mut b =
            Room::from_box("Office B", 5.0, 10.0, 3.0, Point3D::new(5.0, 0.0, 0.0)).unwrap();
        for room in [&mut a, &mut b] {
            room.energy.program_type = office_program().unwrap();
            room.energy.add_default_ideal_air();
        }
        Model::new("Two Offices", vec![a, b]).unwrap()
    }

    #[test]
    fn collections_are_unique() {
        let model = office_model();
        assert_eq!(model.program_types().len(), 1);
        assert_eq!(model.construction_sets().len(), 1);
        assert_eq!(model.constructions().len(), 13);
        let names: Vec<&str> = model.schedules().iter().map(|s| s.name()).collect();
        let mut sorted = names.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), names.len());
        assert!(names.contains(&"Generic Office Occupancy"));
        assert!(model.has_thermostats());
        assert!((model.floor_area() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn duplicate_room_names_fail() {
        let a = Room::from_box("Same", 5.0, 5.0, 3.0, Point3D::default()).unwrap();
        let err = Model::new("Twins", vec![a.clone(), a]).unwrap_err();
        assert!(matches!(err, Error::Duplicate { ref kind, .. } if kind == "room"));
    }

    #[test]
    fn conflicting_construction_names_fail() {
        let mut model = office_model();
        let mut odd = crate::library::constructions::INTERIOR_WALL.clone();
        odd.name = "Generic Exterior Wall".into();
        model.rooms[0].faces[1].construction = Some(odd);
        let err = model.check_duplicate_construction_names().unwrap_err();
        assert!(err.to_string().contains("Generic Exterior Wall"));
    }

    #[test]
    fn building_object() {
        let model = office_model();
        let text = model.building_idf(SolarDistribution::default());
        let f = parse_idf_string(&text, Some("Building")).unwrap();
        assert_eq!(f[0], "Two Offices");
        assert_eq!(f[1], "0");
        assert_eq!(f[2], "City");
        assert_eq!(f[5], "FullInteriorAndExteriorWithReflections");
    }

    #[test]
    fn terrain_parsing() {
        assert_eq!("suburbs".parse::<TerrainType>().unwrap(), TerrainType::Suburbs);
        assert!("Desert".parse::<TerrainType>().is_err());
    }

    #[test]
    fn json_round_trip_keeps_energy_properties() {
        let model = office_model();
        let back = Model::from_json(&model.to_json().unwrap()).unwrap();
        assert_eq!(back, model);
        assert!(back.rooms[0].energy.is_conditioned());
    }

    #[test]
    fn rejects_bad_north_angle() {
        let mut model = office_model();
        model.north_angle = 360.0;
        assert!(model.validate().is_err());
    }
}
