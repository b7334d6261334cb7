//! Boundary conditions and face types.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result, check_range};

fn yes() -> bool {
    true
}

/// What lies on the other side of a surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum BoundaryCondition {
    Outdoors {
        #[serde(default = "yes")]
        sun_exposure: bool,
        #[serde(default = "yes")]
        wind_exposure: bool,
        /// Fraction of the sky seen as ground; EnergyPlus computes it when
        /// absent.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        view_factor: Option<f64>,
    },
    Ground,
    Adiabatic,
    /// Another surface, followed by its parent objects (face, then room for
    /// apertures and doors; room for faces).
    Surface {
        boundary_condition_objects: Vec<String>,
    },
}

impl Default for BoundaryCondition {
    fn default() -> Self {
        Self::outdoors()
    }
}

impl BoundaryCondition {
    /// Sun and wind exposed outdoors with an autocalculated view factor.
    pub fn outdoors() -> Self {
        BoundaryCondition::Outdoors {
            sun_exposure: true,
            wind_exposure: true,
            view_factor: None,
        }
    }

    /// Adjacent to `surface`, which belongs to `parents` from nearest outward.
    pub fn surface(surface: &str, parents: &[&str]) -> Self {
        let mut objects = vec![surface.to_string()];
        objects.extend(parents.iter().map(|p| p.to_string()));
        BoundaryCondition::Surface {
            boundary_condition_objects: objects,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            BoundaryCondition::Outdoors { .. } => "Outdoors",
            BoundaryCondition::Ground => "Ground",
            BoundaryCondition::Adiabatic => "Adiabatic",
            BoundaryCondition::Surface { .. } => "Surface",
        }
    }

    /// The adjacent surface name for `Surface` boundaries.
    pub fn boundary_condition_object(&self) -> Option<&str> {
        match self {
            BoundaryCondition::Surface {
                boundary_condition_objects,
            } => boundary_condition_objects.first().map(String::as_str),
            _ => None,
        }
    }

    pub fn sun_exposure_idf(&self) -> &'static str {
        match self {
            BoundaryCondition::Outdoors {
                sun_exposure: true, ..
            } => "SunExposed",
            _ => "NoSun",
        }
    }

    pub fn wind_exposure_idf(&self) -> &'static str {
        match self {
            BoundaryCondition::Outdoors {
                wind_exposure: true,
                ..
            } => "WindExposed",
            _ => "NoWind",
        }
    }

    /// View factor field: the value, `autocalculate`, or blank when the
    /// surface is not outdoors.
    pub fn view_factor_idf(&self) -> String {
        match self {
            BoundaryCondition::Outdoors {
                view_factor: Some(v),
                ..
            } => v.to_string(),
            BoundaryCondition::Outdoors { .. } => "autocalculate".to_string(),
            _ => String::new(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            BoundaryCondition::Outdoors {
                view_factor: Some(v),
                ..
            } => check_range("view factor", *v, 0.0, 1.0),
            BoundaryCondition::Surface {
                boundary_condition_objects,
            } if boundary_condition_objects.is_empty() => Err(Error::invalid(
                "boundary condition",
                "surface boundary needs the adjacent surface name",
            )),
            _ => Ok(()),
        }
    }
}

/// Kind of face in a room's enclosure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FaceType {
    Wall,
    Floor,
    RoofCeiling,
    AirWall,
}

impl FaceType {
    /// `BuildingSurface:Detailed` surface type. EnergyPlus splits roofs from
    /// ceilings and has no air wall type.
    pub fn idf_surface_type(self, boundary: &BoundaryCondition) -> &'static str {
        match (self, boundary) {
            (FaceType::RoofCeiling, BoundaryCondition::Outdoors { .. } | BoundaryCondition::Ground) => {
                "Roof"
            }
            (FaceType::RoofCeiling, _) => "Ceiling",
            (FaceType::Floor, _) => "Floor",
            (FaceType::Wall | FaceType::AirWall, _) => "Wall",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outdoors_fields() {
        let bc = BoundaryCondition::outdoors();
        assert_eq!(bc.name(), "Outdoors");
        assert_eq!(bc.sun_exposure_idf(), "SunExposed");
        assert_eq!(bc.wind_exposure_idf(), "WindExposed");
        assert_eq!(bc.view_factor_idf(), "autocalculate");
        assert_eq!(bc.boundary_condition_object(), None);
    }

    #[test]
    fn ground_and_surface_fields() {
        assert_eq!(BoundaryCondition::Ground.sun_exposure_idf(), "NoSun");
        assert_eq!(BoundaryCondition::Ground.view_factor_idf(), "");
        let bc = BoundaryCondition::surface("Room2_Back", &["Room2"]);
        assert_eq!(bc.boundary_condition_object(), Some("Room2_Back"));
        assert_eq!(bc.wind_exposure_idf(), "NoWind");
    }

    #[test]
    fn validation() {
        let bad = BoundaryCondition::Outdoors {
            sun_exposure: true,
            wind_exposure: true,
            view_factor: Some(1.5),
        };
        assert!(bad.validate().is_err());
        let empty = BoundaryCondition::Surface {
            boundary_condition_objects: vec![],
        };
        assert!(empty.validate().is_err());
    }

    #[test]
    fn roof_or_ceiling() {
        let out = BoundaryCondition::outdoors();
        let adj = BoundaryCondition::surface("Above_Bottom", &["Above"]);
        assert_eq!(FaceType::RoofCeiling.idf_surface_type(&out), "Roof");
        assert_eq!(FaceType::RoofCeiling.idf_surface_type(&adj), "Ceiling");
        assert_eq!(FaceType::AirWall.idf_surface_type(&adj), "Wall");
    }

    #[test]
    fn json_defaults_exposure() {
        let bc: BoundaryCondition = serde_json::from_str(r#"{"type":"Outdoors"}"#).unwrap();
        assert_eq!(bc, BoundaryCondition::outdoors());
        let json = serde_json::to_string(&BoundaryCondition::Ground).unwrap();
        assert_eq!(json, r#"{"type":"Ground"}"#);
    }
}
