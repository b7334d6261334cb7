//! Minimal host geometry: rooms made of planar faces with windows, doors
//! and shades, gathered into a model.

pub mod aperture;
pub mod boundary;
pub mod face;
pub mod model;
pub mod polygon;
pub mod properties;
pub mod room;
pub mod shade;

use crate::error::{Error, Result, check_ep_name};

pub use aperture::{Aperture, Door};
pub use boundary::{BoundaryCondition, FaceType};
pub use face::Face;
pub use model::{Model, TerrainType};
pub use polygon::Point3D;
pub use properties::RoomEnergyProperties;
pub use room::Room;
pub use shade::Shade;

/// Smallest polygon area treated as a surface, in square metres.
const MIN_AREA: f64 = 1e-6;

fn check_polygon(name: &str, vertices: &[Point3D]) -> Result<()> {
    check_ep_name(name)?;
    if vertices.len() < 3 {
        return Err(Error::invalid(
            "vertices",
            format!("\"{name}\" needs at least 3 vertices, got {}", vertices.len()),
        ));
    }
    if vertices
        .iter()
        .any(|p| !(p.x.is_finite() && p.y.is_finite() && p.z.is_finite()))
    {
        return Err(Error::invalid("vertices", format!("\"{name}\" has a non-finite vertex")));
    }
    if polygon::area(vertices) < MIN_AREA {
        return Err(Error::invalid("vertices", format!("\"{name}\" has no area")));
    }
    Ok(())
}
