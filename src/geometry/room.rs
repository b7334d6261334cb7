//! Rooms: closed volumes that become EnergyPlus zones.

use serde::{Deserialize, Serialize};

use super::boundary::{BoundaryCondition, FaceType};
use super::face::Face;
use super::polygon::{self, Point3D};
use super::properties::RoomEnergyProperties;
use super::shade::Shade;
use crate::construction::Construction;
use crate::error::{Error, Result, check_ep_name, check_positive};

fn one() -> u32 {
    1
}

/// A room and the energy properties of its zone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Number of identical copies the zone stands for.
    #[serde(default = "one")]
    pub multiplier: u32,
    pub faces: Vec<Face>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub outdoor_shades: Vec<Shade>,
    #[serde(default)]
    pub energy: RoomEnergyProperties,
}

impl Room {
    pub fn new(name: &str, faces: Vec<Face>) -> Result<Self> {
        let room = Self {
            name: name.to_string(),
            display_name: None,
            multiplier: 1,
            faces,
            outdoor_shades: Vec::new(),
            energy: RoomEnergyProperties::default(),
        };
        room.validate()?;
        Ok(room)
    }

    /// A box-shaped room with its minimum corner at `origin`.
    ///
    /// Faces are named `{name}_Bottom`, `{name}_Front`, `{name}_Right`,
    /// `{name}_Back`, `{name}_Left` and `{name}_Top`. The floor sits on the
    /// ground and every other face is outdoors. Front faces -Y.
    ///
    /// # Errors
    ///
    /// Returns an error for an invalid name or a non-positive dimension.
    ///
    /// # Examples
    ///
    /// ```
    /// use honeybee_energy::geometry::{Point3D, Room};
    ///
    /// let room = Room::from_box("Office", 5.0, 10.0, 3.0, Point3D::default()).unwrap();
    /// assert_eq!(room.faces.len(), 6);
    /// assert!((room.volume() - 150.0).abs() < 1e-9);
    /// ```
    pub fn from_box(name: &str, width: f64, depth: f64, height: f64, origin: Point3D) -> Result<Self> {
        check_ep_name(name)?;
        check_positive("room width", width)?;
        check_positive("room depth", depth)?;
        check_positive("room height", height)?;
        let (w, d, h) = (width, depth, height);
        let pt = |x: f64, y: f64, z: f64| origin.add(Point3D::new(x, y, z));
        let sides = [
            ("Bottom", FaceType::Floor, [pt(0., 0., 0.), pt(0., d, 0.), pt(w, d, 0.), pt(w, 0., 0.)]),
            ("Front", FaceType::Wall, [pt(0., 0., 0.), pt(w, 0., 0.), pt(w, 0., h), pt(0., 0., h)]),
            ("Right", FaceType::Wall, [pt(w, 0., 0.), pt(w, d, 0.), pt(w, d, h), pt(w, 0., h)]),
            ("Back", FaceType::Wall, [pt(w, d, 0.), pt(0., d, 0.), pt(0., d, h), pt(w, d, h)]),
            ("Left", FaceType::Wall, [pt(0., d, 0.), pt(0., 0., 0.), pt(0., 0., h), pt(0., d, h)]),
            ("Top", FaceType::RoofCeiling, [pt(0., 0., h), pt(w, 0., h), pt(w, d, h), pt(0., d, h)]),
        ];
        let faces = sides
            .into_iter()
            .map(|(side, face_type, vertices)| {
                let boundary = match face_type {
                    FaceType::Floor => BoundaryCondition::Ground,
                    _ => BoundaryCondition::outdoors(),
                };
                Face::new(&format!("{name}_{side}"), vertices.to_vec(), face_type, boundary)
            })
            .collect::<Result<Vec<_>>>()?;
        Self::new(name, faces)
    }

    /// Display name, falling back to the name.
    pub fn display_name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.name)
    }

    pub fn validate(&self) -> Result<()> {
        check_ep_name(&self.name)?;
        if self.multiplier == 0 {
            return Err(Error::out_of_range("room multiplier", 0.0, "1 or greater"));
        }
        if self.faces.is_empty() {
            return Err(Error::invalid(
                "room faces",
                format!("room \"{}\" has no faces", self.name),
            ));
        }
        self.faces.iter().try_for_each(Face::validate)?;
        self.outdoor_shades.iter().try_for_each(Shade::validate)?;
        self.energy.validate()
    }

    pub fn floor_area(&self) -> f64 {
        self.faces_of(FaceType::Floor).map(Face::area).sum()
    }

    /// Area of walls exposed to the outdoors, windows and doors included.
    pub fn exterior_wall_area(&self) -> f64 {
        self.faces_of(FaceType::Wall)
            .filter(|f| matches!(f.boundary_condition, BoundaryCondition::Outdoors { .. }))
            .map(Face::area)
            .sum()
    }

    pub fn exterior_aperture_area(&self) -> f64 {
        self.faces
            .iter()
            .flat_map(|f| &f.apertures)
            .filter(|a| matches!(a.boundary_condition, BoundaryCondition::Outdoors { .. }))
            .map(|a| a.area())
            .sum()
    }

    /// Enclosed volume, assuming the faces form a closed shell.
    pub fn volume(&self) -> f64 {
        polygon::enclosed_volume(self.faces.iter().map(|f| f.vertices.as_slice()))
    }

    fn faces_of(&self, face_type: FaceType) -> impl Iterator<Item = &Face> {
        self.faces.iter().filter(move |f| f.face_type == face_type)
    }

    /// Shades on the room, its faces and their windows.
    pub fn all_shades(&self) -> impl Iterator<Item = &Shade> {
        self.outdoor_shades
            .iter()
            .chain(self.faces.iter().flat_map(Face::all_shades))
    }

    /// Names of the room's faces, windows and doors.
    pub fn surface_names(&self) -> impl Iterator<Item = &str> {
        self.faces.iter().flat_map(|f| {
            std::iter::once(f.name.as_str())
                .chain(f.apertures.iter().map(|a| a.name.as_str()))
                .chain(f.doors.iter().map(|d| d.name.as_str()))
        })
    }

    /// Constructions the room's surfaces resolve to, repeats included.
    pub fn surface_constructions(&self) -> Vec<Construction> {
        let set = &self.energy.construction_set;
        let mut constructions = Vec::new();
        for face in &self.faces {
            constructions.push(face.construction(set).clone().into());
            for ap in &face.apertures {
                constructions.push(ap.construction(set, face.face_type).clone().into());
            }
            for door in &face.doors {
                constructions.push(door.construction(set));
            }
        }
        constructions
    }
}
