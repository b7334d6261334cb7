//! Faces enclosing a room.

use serde::{Deserialize, Serialize};

use super::aperture::{Aperture, Door};
use super::boundary::{BoundaryCondition, FaceType};
use super::polygon::{self, Point3D};
use super::shade::Shade;
use crate::construction::{ConstructionSet, OpaqueConstruction};
use crate::error::{Error, Result};

/// One planar face of a room, with any windows, doors and shades it hosts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Face {
    pub name: String,
    pub vertices: Vec<Point3D>,
    pub face_type: FaceType,
    #[serde(default)]
    pub boundary_condition: BoundaryCondition,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub apertures: Vec<Aperture>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub doors: Vec<Door>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub outdoor_shades: Vec<Shade>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub construction: Option<OpaqueConstruction>,
}

impl Face {
    pub fn new(
        name: &str,
        vertices: Vec<Point3D>,
        face_type: FaceType,
        boundary_condition: BoundaryCondition,
    ) -> Result<Self> {
        let face = Self {
            name: name.to_string(),
            vertices,
            face_type,
            boundary_condition,
            apertures: Vec::new(),
            doors: Vec::new(),
            outdoor_shades: Vec::new(),
            construction: None,
        };
        face.validate()?;
        Ok(face)
    }

    /// Adds a window. Outdoor faces only host outdoor windows.
    pub fn add_aperture(&mut self, aperture: Aperture) -> Result<()> {
        aperture.validate()?;
        self.check_sub_boundary(&aperture.name, &aperture.boundary_condition)?;
        self.apertures.push(aperture);
        Ok(())
    }

    pub fn add_door(&mut self, door: Door) -> Result<()> {
        door.validate()?;
        self.check_sub_boundary(&door.name, &door.boundary_condition)?;
        self.doors.push(door);
        Ok(())
    }

    fn check_sub_boundary(&self, name: &str, boundary: &BoundaryCondition) -> Result<()> {
        let outdoors = matches!(self.boundary_condition, BoundaryCondition::Outdoors { .. });
        let sub_outdoors = matches!(boundary, BoundaryCondition::Outdoors { .. });
        let sub_surface = matches!(boundary, BoundaryCondition::Surface { .. });
        let face_surface = matches!(self.boundary_condition, BoundaryCondition::Surface { .. });
        if (outdoors && sub_outdoors) || (face_surface && sub_surface) {
            Ok(())
        } else {
            Err(Error::invalid(
                "sub-face boundary condition",
                format!(
                    "\"{name}\" is {} but its face \"{}\" is {}",
                    boundary.name(),
                    self.name,
                    self.boundary_condition.name()
                ),
            ))
        }
    }

    /// # Errors
    ///
    /// Returns an error for a bad name or polygon, an invalid child object,
    /// or a window or door whose boundary does not match the face.
    pub fn validate(&self) -> Result<()> {
        super::check_polygon(&self.name, &self.vertices)?;
        self.boundary_condition.validate()?;
        if let Some(c) = &self.construction {
            c.validate()?;
        }
        for ap in &self.apertures {
            ap.validate()?;
            self.check_sub_boundary(&ap.name, &ap.boundary_condition)?;
        }
        for door in &self.doors {
            door.validate()?;
            self.check_sub_boundary(&door.name, &door.boundary_condition)?;
        }
        self.outdoor_shades.iter().try_for_each(Shade::validate)
    }

    /// The assigned construction, or what `set` gives this face.
    pub fn construction<'a>(&'a self, set: &'a ConstructionSet) -> &'a OpaqueConstruction {
        self.construction
            .as_ref()
            .unwrap_or_else(|| set.face_construction(self.face_type, &self.boundary_condition))
    }

    pub fn area(&self) -> f64 {
        polygon::area(&self.vertices)
    }

    pub fn normal(&self) -> Point3D {
        polygon::normal(&self.vertices)
    }

    pub fn upper_left_vertices(&self) -> Vec<Point3D> {
        polygon::upper_left_vertices(&self.vertices)
    }

    /// Every shade on the face and its windows.
    pub fn all_shades(&self) -> impl Iterator<Item = &Shade> {
        self.outdoor_shades
            .iter()
            .chain(self.apertures.iter().flat_map(|a| a.outdoor_shades.iter()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wall() -> Face {
        Face::new(
            "South",
            vec![
                Point3D::new(0.0, 0.0, 0.0),
                Point3D::new(4.0, 0.0, 0.0),
                Point3D::new(4.0, 0.0, 3.0),
                Point3D::new(0.0, 0.0, 3.0),
            ],
            FaceType::Wall,
            BoundaryCondition::outdoors(),
        )
        .unwrap()
    }

    fn window(name: &str) -> Aperture {
        Aperture::new(
            name,
            vec![
                Point3D::new(1.0, 0.0, 1.0),
                Point3D::new(3.0, 0.0, 1.0),
                Point3D::new(3.0, 0.0, 2.0),
                Point3D::new(1.0, 0.0, 2.0),
            ],
        )
        .unwrap()
    }

    #[test]
    fn outdoor_face_accepts_outdoor_window() {
        let mut face = wall();
        face.add_aperture(window("Win")).unwrap();
        assert_eq!(face.apertures.len(), 1);
        assert!(face.validate().is_ok());
    }

    #[test]
    fn ground_face_rejects_windows() {
        let mut face = wall();
        face.boundary_condition = BoundaryCondition::Ground;
        assert!(face.add_aperture(window("Win")).is_err());
    }

    #[test]
    fn construction_override() {
        let mut face = wall();
        let set = ConstructionSet::default();
        assert_eq!(face.construction(&set).name, "Generic Exterior Wall");
        let mut custom = crate::library::constructions::INTERIOR_WALL.clone();
        custom.name = "Thin Wall".into();
        face.construction = Some(custom);
        assert_eq!(face.construction(&set).name, "Thin Wall");
    }

    #[test]
    fn shades_include_window_shades() {
        let mut face = wall();
        let mut win = window("Win");
        win.outdoor_shades.push(
            Shade::new(
                "Win Fin",
                vec![
                    Point3D::new(1.0, 0.0, 1.0),
                    Point3D::new(1.0, -0.5, 1.0),
                    Point3D::new(1.0, -0.5, 2.0),
                    Point3D::new(1.0, 0.0, 2.0),
                ],
            )
            .unwrap(),
        );
        face.add_aperture(win).unwrap();
        assert_eq!(face.all_shades().count(), 1);
    }
}
