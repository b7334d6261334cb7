//! Windows and doors hosted by faces.

use serde::{Deserialize, Serialize};

use super::boundary::{BoundaryCondition, FaceType};
use super::polygon::{self, Point3D};
use super::shade::Shade;
use crate::construction::{Construction, ConstructionSet, WindowConstruction};
use crate::error::{Error, Result};

/// A glazed opening in a face.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Aperture {
    pub name: String,
    pub vertices: Vec<Point3D>,
    #[serde(default)]
    pub boundary_condition: BoundaryCondition,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub outdoor_shades: Vec<Shade>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub construction: Option<WindowConstruction>,
}

impl Aperture {
    /// An outdoor aperture with no shades and the construction set default.
    pub fn new(name: &str, vertices: Vec<Point3D>) -> Result<Self> {
        let aperture = Self {
            name: name.to_string(),
            vertices,
            boundary_condition: BoundaryCondition::outdoors(),
            outdoor_shades: Vec::new(),
            construction: None,
        };
        aperture.validate()?;
        Ok(aperture)
    }

    /// # Errors
    ///
    /// Returns an error for a bad name or polygon, an invalid construction
    /// or shade, or a boundary other than `Outdoors` or `Surface`.
    pub fn validate(&self) -> Result<()> {
        super::check_polygon(&self.name, &self.vertices)?;
        self.boundary_condition.validate()?;
        if matches!(
            self.boundary_condition,
            BoundaryCondition::Ground | BoundaryCondition::Adiabatic
        ) {
            return Err(Error::invalid(
                "aperture boundary condition",
                format!(
                    "\"{}\" must be Outdoors or Surface, got {}",
                    self.name,
                    self.boundary_condition.name()
                ),
            ));
        }
        if let Some(c) = &self.construction {
            c.validate()?;
        }
        self.outdoor_shades.iter().try_for_each(Shade::validate)
    }

    /// The assigned construction, or the one `set` gives an aperture in a
    /// face of `parent_type`.
    pub fn construction<'a>(
        &'a self,
        set: &'a ConstructionSet,
        parent_type: FaceType,
    ) -> &'a WindowConstruction {
        self.construction
            .as_ref()
            .unwrap_or_else(|| set.aperture_construction(&self.boundary_condition, parent_type))
    }

    pub fn area(&self) -> f64 {
        polygon::area(&self.vertices)
    }

    pub fn upper_left_vertices(&self) -> Vec<Point3D> {
        polygon::upper_left_vertices(&self.vertices)
    }
}

/// An opaque or glass door in a face.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Door {
    pub name: String,
    pub vertices: Vec<Point3D>,
    #[serde(default)]
    pub boundary_condition: BoundaryCondition,
    #[serde(default)]
    pub is_glass: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub construction: Option<Construction>,
}

impl Door {
    pub fn new(name: &str, vertices: Vec<Point3D>, is_glass: bool) -> Result<Self> {
        let door = Self {
            name: name.to_string(),
            vertices,
            boundary_condition: BoundaryCondition::outdoors(),
            is_glass,
            construction: None,
        };
        door.validate()?;
        Ok(door)
    }

    pub fn validate(&self) -> Result<()> {
        super::check_polygon(&self.name, &self.vertices)?;
        self.boundary_condition.validate()?;
        match &self.construction {
            Some(Construction::Window(_)) if !self.is_glass => Err(Error::invalid(
                "door construction",
                format!("opaque door \"{}\" has a window construction", self.name),
            )),
            Some(Construction::Opaque(_)) if self.is_glass => Err(Error::invalid(
                "door construction",
                format!("glass door \"{}\" has an opaque construction", self.name),
            )),
            Some(c) => c.validate(),
            None => Ok(()),
        }
    }

    pub fn construction(&self, set: &ConstructionSet) -> Construction {
        match &self.construction {
            Some(c) => c.clone(),
            None => set.door_construction(&self.boundary_condition, self.is_glass),
        }
    }

    /// `Door` or `GlassDoor` for `FenestrationSurface:Detailed`.
    pub fn idf_surface_type(&self) -> &'static str {
        if self.is_glass { "GlassDoor" } else { "Door" }
    }

    pub fn area(&self) -> f64 {
        polygon::area(&self.vertices)
    }

    pub fn upper_left_vertices(&self) -> Vec<Point3D> {
        polygon::upper_left_vertices(&self.vertices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::constructions::{EXTERIOR_DOOR, SINGLE_PANE};

    fn window() -> Vec<Point3D> {
        vec![
            Point3D::new(1.0, 0.0, 1.0),
            Point3D::new(3.0, 0.0, 1.0),
            Point3D::new(3.0, 0.0, 2.0),
            Point3D::new(1.0, 0.0, 2.0),
        ]
    }

    #[test]
    fn aperture_uses_set_for_skylights() {
        let ap = Aperture::new("Win", window()).unwrap();
        let set = ConstructionSet::default();
        assert_eq!(ap.construction(&set, FaceType::Wall).name, "Generic Double Pane");
        let mut custom = ap.clone();
        custom.construction = Some(SINGLE_PANE.clone());
        assert_eq!(custom.construction(&set, FaceType::RoofCeiling).name, "Generic Single Pane");
        assert!((ap.area() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn aperture_rejects_ground() {
        let mut ap = Aperture::new("Win", window()).unwrap();
        ap.boundary_condition = BoundaryCondition::Ground;
        assert!(ap.validate().is_err());
    }

    #[test]
    fn door_construction_must_match_glass_flag() {
        let mut door = Door::new("Entry", window(), false).unwrap();
        assert_eq!(door.idf_surface_type(), "Door");
        door.construction = Some(SINGLE_PANE.clone().into());
        assert!(door.validate().is_err());
        door.construction = Some(EXTERIOR_DOOR.clone().into());
        assert!(door.validate().is_ok());
        assert_eq!(
            door.construction(&ConstructionSet::default()).name(),
            "Generic Exterior Door"
        );
    }
}
