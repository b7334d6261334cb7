//! Shading surfaces.

use serde::{Deserialize, Serialize};

use super::polygon::{self, Point3D};
use crate::construction::ShadeConstruction;
use crate::error::Result;
use crate::library::constructions::SHADE;
use crate::schedule::Schedule;

/// An opaque or partly transparent surface that casts shadows but encloses
/// no zone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shade {
    pub name: String,
    pub vertices: Vec<Point3D>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub construction: Option<ShadeConstruction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transmittance_schedule: Option<Schedule>,
}

impl Shade {
    pub fn new(name: &str, vertices: Vec<Point3D>) -> Result<Self> {
        let shade = Self {
            name: name.to_string(),
            vertices,
            construction: None,
            transmittance_schedule: None,
        };
        shade.validate()?;
        Ok(shade)
    }

    pub fn validate(&self) -> Result<()> {
        super::check_polygon(&self.name, &self.vertices)?;
        if let Some(c) = &self.construction {
            c.validate()?;
        }
        if let Some(s) = &self.transmittance_schedule {
            crate::load::check_fractional_schedule(s, &self.name)?;
        }
        Ok(())
    }

    /// The assigned construction or the library default.
    pub fn construction(&self) -> &ShadeConstruction {
        self.construction.as_ref().unwrap_or(&*SHADE)
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
    use crate::library::schedule_type_limits::TEMPERATURE;
    use crate::schedule::ScheduleRuleset;

    fn overhang() -> Vec<Point3D> {
        vec![
            Point3D::new(0.0, 0.0, 3.0),
            Point3D::new(0.0, -1.0, 3.0),
            Point3D::new(4.0, -1.0, 3.0),
            Point3D::new(4.0, 0.0, 3.0),
        ]
    }

    #[test]
    fn default_construction() {
        let shade = Shade::new("Overhang", overhang()).unwrap();
        assert!(shade.construction().is_default());
        assert!((shade.area() - 4.0).abs() < 1e-12);
    }

    #[test]
    fn transmittance_must_be_fractional() {
        let mut shade = Shade::new("Tree", overhang()).unwrap();
        let sched = ScheduleRuleset::from_constant_value("Tree Temp", 20.0, Some(TEMPERATURE.clone()))
            .unwrap();
        shade.transmittance_schedule = Some(sched.into());
        assert!(shade.validate().is_err());
    }

    #[test]
    fn rejects_degenerate_polygon() {
        assert!(Shade::new("Line", overhang()[..2].to_vec()).is_err());
    }
}
