//! Layered constructions and the film coefficients used to rate them.
//!
//! Layers are always listed from the outside in. Film coefficients follow
//! ISO 10292 for the simple R-factor and ISO 15099 for temperature profiles.

pub mod opaque;
pub mod set;
pub mod shade;
pub mod shading;
pub mod window;

use serde::{Deserialize, Serialize};

use crate::idf::generate_idf_string;
use crate::material::{GasType, Material, gas::SIGMA};

pub use opaque::OpaqueConstruction;
pub use set::{ApertureSet, ConstructionSet, DoorSet, SurfaceSet};
pub use shade::ShadeConstruction;
pub use shading::WindowShadeControl;
pub use window::{ShadeLocation, WindowConstruction};

/// Conditions on the interior film of a surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilmConditions {
    /// Mean of the air and surface temperature (K).
    pub t_kelvin: f64,
    /// Difference between the air and surface temperature (C).
    pub delta_t: f64,
    /// Surface height (m).
    pub height: f64,
    /// Tilt in degrees from 0 to 180, with 90 standing vertical.
    pub angle: f64,
    pub pressure: f64,
}

impl Default for FilmConditions {
    fn default() -> Self {
        Self {
            t_kelvin: 293.15,
            delta_t: 15.0,
            height: 1.0,
            angle: 90.0,
            pressure: 101325.0,
        }
    }
}

/// Outdoor and indoor boundary conditions for a temperature profile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProfileConditions {
    pub outside_temperature: f64,
    pub inside_temperature: f64,
    pub wind_speed: f64,
    pub height: f64,
    pub angle: f64,
    pub pressure: f64,
}

impl Default for ProfileConditions {
    fn default() -> Self {
        Self {
            outside_temperature: -18.0,
            inside_temperature: 21.0,
            wind_speed: 6.7,
            height: 1.0,
            angle: 90.0,
            pressure: 101325.0,
        }
    }
}

impl ProfileConditions {
    /// Angle seen by the interior film, flipped when heat flows inward.
    pub(crate) fn film_angle(&self) -> f64 {
        if self.angle != 90.0 && self.outside_temperature > self.inside_temperature {
            (180.0 - self.angle).abs()
        } else {
            self.angle
        }
    }
}

/// Simple outdoor film coefficient (W/m2-K).
pub fn out_h_simple() -> f64 {
    23.0
}

/// Simple indoor film coefficient for a surface of the given emissivity.
pub fn in_h_simple(inside_emissivity: f64) -> f64 {
    3.6 + 4.4 * inside_emissivity / 0.84
}

/// Detailed outdoor film coefficient (W/m2-K).
pub fn out_h(outside_emissivity: f64, wind_speed: f64, t_kelvin: f64) -> f64 {
    let conv_h = 4.0 + 4.0 * wind_speed;
    let rad_h = 4.0 * SIGMA * outside_emissivity * t_kelvin.powi(3);
    conv_h + rad_h
}

/// Detailed indoor film coefficient from natural convection plus radiation.
pub fn in_h(inside_emissivity: f64, c: &FilmConditions) -> f64 {
    let air = GasType::Air;
    let rho = air.density_at(c.t_kelvin, c.pressure);
    let numerator =
        rho.powi(2) * c.height.powi(3) * 9.81 * air.specific_heat_at(c.t_kelvin) * c.delta_t;
    let denominator =
        c.t_kelvin * air.viscosity_at(c.t_kelvin) * air.conductivity_at(c.t_kelvin);
    let rayleigh_h = (numerator / denominator).abs();

    let nusselt = if c.angle < 15.0 {
        0.13 * rayleigh_h.powf(1.0 / 3.0)
    } else if c.angle <= 90.0 {
        let sin_a = c.angle.to_radians().sin();
        let rayleigh_c = 2.5e5 * ((0.72 * c.angle).exp() / sin_a).powf(0.2);
        if rayleigh_h < rayleigh_c {
            0.56 * (rayleigh_h * sin_a).powf(0.25)
        } else {
            let nu_1 = 0.56 * (rayleigh_c * sin_a).powf(0.25);
            let nu_2 = 0.13 * (rayleigh_h.powf(1.0 / 3.0) - rayleigh_c.powf(1.0 / 3.0));
            nu_1 + nu_2
        }
    } else if c.angle <= 179.0 {
        let sin_a = c.angle.to_radians().sin();
        0.56 * (rayleigh_h * sin_a).powf(0.25)
    } else {
        0.58 * rayleigh_h.powf(0.2)
    };
    let conv_h = nusselt * air.conductivity_at(c.t_kelvin) / c.height;
    let rad_h = 4.0 * SIGMA * inside_emissivity * c.t_kelvin.powi(3);
    conv_h + rad_h
}

/// Temperatures at each boundary between `r_values`, from outside in.
pub fn temperature_profile_from_r_values(
    r_values: &[f64],
    outside_temperature: f64,
    inside_temperature: f64,
) -> Vec<f64> {
    let r_factor: f64 = r_values.iter().sum();
    let delta_t = inside_temperature - outside_temperature;
    let mut temperatures = Vec::with_capacity(r_values.len() + 1);
    temperatures.push(outside_temperature);
    for (i, r) in r_values.iter().enumerate() {
        temperatures.push(temperatures[i] + delta_t * (r / r_factor));
    }
    temperatures
}

/// Writes an IDF `Construction` listing layer names.
pub(crate) fn construction_idf<'a>(name: &str, layers: impl Iterator<Item = &'a str>) -> String {
    let mut values = vec![name.to_string()];
    let mut comments = vec!["name".to_string()];
    for (i, layer) in layers.enumerate() {
        values.push(layer.to_string());
        comments.push(format!("layer {}", i + 1));
    }
    let comments: Vec<&str> = comments.iter().map(String::as_str).collect();
    generate_idf_string("Construction", &values, Some(&comments))
}

/// Keeps the first occurrence of each name.
pub(crate) fn unique_by_name<T: Clone>(items: &[T], name: impl Fn(&T) -> &str) -> Vec<T> {
    let mut seen = std::collections::HashSet::new();
    items
        .iter()
        .filter(|item| seen.insert(name(item).to_string()))
        .cloned()
        .collect()
}

/// Any construction assignable to a face, aperture or door.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Construction {
    #[serde(rename = "OpaqueConstruction")]
    Opaque(OpaqueConstruction),
    #[serde(rename = "WindowConstruction")]
    Window(WindowConstruction),
}

impl Construction {
    pub fn name(&self) -> &str {
        match self {
            Construction::Opaque(c) => &c.name,
            Construction::Window(c) => &c.name,
        }
    }

    pub fn validate(&self) -> crate::Result<()> {
        match self {
            Construction::Opaque(c) => c.validate(),
            Construction::Window(c) => c.validate(),
        }
    }

    pub fn materials(&self) -> Vec<Material> {
        match self {
            Construction::Opaque(c) => c
                .unique_materials()
                .into_iter()
                .map(Material::Opaque)
                .collect(),
            Construction::Window(c) => c
                .unique_materials()
                .into_iter()
                .map(Material::Window)
                .collect(),
        }
    }

    pub fn u_factor(&self) -> f64 {
        match self {
            Construction::Opaque(c) => c.u_factor(),
            Construction::Window(c) => c.u_factor(),
        }
    }

    pub fn to_idf(&self) -> String {
        match self {
            Construction::Opaque(c) => c.to_idf(),
            Construction::Window(c) => c.to_idf(),
        }
    }
}

impl From<OpaqueConstruction> for Construction {
    fn from(c: OpaqueConstruction) -> Self {
        Construction::Opaque(c)
    }
}

impl From<WindowConstruction> for Construction {
    fn from(c: WindowConstruction) -> Self {
        Construction::Window(c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_films() {
        assert!((in_h_simple(0.84) - 8.0).abs() < 1e-12);
        assert!((out_h_simple() - 23.0).abs() < 1e-12);
    }

    #[test]
    fn detailed_outdoor_film_grows_with_wind() {
        let calm = out_h(0.9, 0.0, 273.15);
        let windy = out_h(0.9, 6.7, 273.15);
        assert!((windy - calm - 26.8).abs() < 1e-9);
    }

    #[test]
    fn indoor_film_is_in_typical_range() {
        let h = in_h(0.84, &FilmConditions::default());
        assert!(h > 5.0 && h < 12.0, "h = {h}");
        let up = in_h(
            0.84,
            &FilmConditions {
                angle: 180.0,
                ..FilmConditions::default()
            },
        );
        assert!(up > 0.0);
    }

    #[test]
    fn profile_spans_boundaries() {
        let temps = temperature_profile_from_r_values(&[1.0, 2.0, 1.0], -10.0, 30.0);
        assert_eq!(temps, vec![-10.0, 0.0, 20.0, 30.0]);
    }

    #[test]
    fn construction_idf_numbers_layers() {
        let text = construction_idf("Wall", ["Brick", "Gypsum"].into_iter());
        assert!(text.contains("!- layer 1"));
        assert!(text.contains("Gypsum;"));
    }
}
