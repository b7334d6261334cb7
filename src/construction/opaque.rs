//! Opaque constructions for walls, floors, roofs and doors.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::{
    FilmConditions, ProfileConditions, construction_idf, in_h, in_h_simple, out_h, out_h_simple,
    temperature_profile_from_r_values, unique_by_name,
};
use crate::error::{Error, Result, check_ep_name};
use crate::idf::{extract_objects, parse_idf_string};
use crate::material::OpaqueMaterial;

/// Most layers EnergyPlus accepts in an opaque construction.
pub const MAX_OPAQUE_LAYERS: usize = 10;

/// A stack of opaque materials, outside to inside.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "OpaqueConstructionData", into = "OpaqueConstructionData")]
pub struct OpaqueConstruction {
    pub name: String,
    pub materials: Vec<OpaqueMaterial>,
}

/// JSON layout: layer names plus the unique materials they refer to.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct OpaqueConstructionData {
    name: String,
    layers: Vec<String>,
    materials: Vec<OpaqueMaterial>,
}

impl TryFrom<OpaqueConstructionData> for OpaqueConstruction {
    type Error = Error;

    fn try_from(data: OpaqueConstructionData) -> Result<Self> {
        let lookup: HashMap<String, OpaqueMaterial> = data
            .materials
            .into_iter()
            .map(|m| (m.name().to_string(), m))
            .collect();
        Self::from_abridged(&data.name, &data.layers, &lookup)
    }
}

impl From<OpaqueConstruction> for OpaqueConstructionData {
    fn from(c: OpaqueConstruction) -> Self {
        Self {
            layers: c.layers().into_iter().map(str::to_string).collect(),
            materials: c.unique_materials(),
            name: c.name,
        }
    }
}

impl OpaqueConstruction {
    /// # Errors
    ///
    /// Returns an error for an invalid name, no layers, more than
    /// [`MAX_OPAQUE_LAYERS`] layers, or an invalid material.
    pub fn new(name: &str, materials: Vec<OpaqueMaterial>) -> Result<Self> {
        let c = Self {
            name: name.to_string(),
            materials,
        };
        c.validate()?;
        Ok(c)
    }

    /// Builds a construction from layer names resolved against `materials`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingReference`] for a layer with no material.
    pub fn from_abridged(
        name: &str,
        layers: &[String],
        materials: &HashMap<String, OpaqueMaterial>,
    ) -> Result<Self> {
        let mats = layers
            .iter()
            .map(|l| {
                materials
                    .get(l)
                    .cloned()
                    .ok_or_else(|| Error::missing("material", l))
            })
            .collect::<Result<Vec<_>>>()?;
        Self::new(name, mats)
    }

    pub fn validate(&self) -> Result<()> {
        check_ep_name(&self.name)?;
        if self.materials.is_empty() || self.materials.len() > MAX_OPAQUE_LAYERS {
            return Err(Error::InvalidLayers {
                construction: self.name.clone(),
                reason: format!(
                    "needs 1 to {MAX_OPAQUE_LAYERS} layers, got {}",
                    self.materials.len()
                ),
            });
        }
        self.materials.iter().try_for_each(OpaqueMaterial::validate)
    }

    /// Material names, outside to inside.
    pub fn layers(&self) -> Vec<&str> {
        self.materials.iter().map(OpaqueMaterial::name).collect()
    }

    pub fn unique_materials(&self) -> Vec<OpaqueMaterial> {
        unique_by_name(&self.materials, |m| m.name())
    }

    fn outside(&self) -> Option<&OpaqueMaterial> {
        self.materials.first()
    }

    fn inside(&self) -> Option<&OpaqueMaterial> {
        self.materials.last()
    }

    pub fn inside_emissivity(&self) -> f64 {
        self.inside().map_or(0.9, OpaqueMaterial::thermal_absorptance)
    }

    pub fn outside_emissivity(&self) -> f64 {
        self.outside().map_or(0.9, OpaqueMaterial::thermal_absorptance)
    }

    pub fn inside_solar_reflectance(&self) -> f64 {
        1.0 - self.inside().map_or(0.7, OpaqueMaterial::solar_absorptance)
    }

    pub fn inside_visible_reflectance(&self) -> f64 {
        1.0 - self.inside().map_or(0.7, OpaqueMaterial::visible_absorptance)
    }

    pub fn outside_solar_reflectance(&self) -> f64 {
        1.0 - self.outside().map_or(0.7, OpaqueMaterial::solar_absorptance)
    }

    pub fn outside_visible_reflectance(&self) -> f64 {
        1.0 - self.outside().map_or(0.7, OpaqueMaterial::visible_absorptance)
    }

    /// Resistance of the layers without films (m2-K/W).
    pub fn r_value(&self) -> f64 {
        self.materials.iter().map(OpaqueMaterial::r_value).sum()
    }

    pub fn u_value(&self) -> f64 {
        1.0 / self.r_value()
    }

    /// Resistance including standard films (m2-K/W).
    pub fn r_factor(&self) -> f64 {
        self.r_value() + 1.0 / out_h_simple() + 1.0 / in_h_simple(self.inside_emissivity())
    }

    pub fn u_factor(&self) -> f64 {
        1.0 / self.r_factor()
    }

    /// Whether the layers read the same in reverse.
    pub fn is_symmetric(&self) -> bool {
        self.materials.iter().eq(self.materials.iter().rev())
    }

    /// Mass per unit area (kg/m2).
    pub fn mass_area_density(&self) -> f64 {
        self.materials.iter().map(OpaqueMaterial::mass_area_density).sum()
    }

    /// Heat capacity per unit area (J/m2-K).
    pub fn area_heat_capacity(&self) -> f64 {
        self.materials.iter().map(OpaqueMaterial::area_heat_capacity).sum()
    }

    /// Total thickness of the massed layers (m).
    pub fn thickness(&self) -> f64 {
        self.materials.iter().map(OpaqueMaterial::thickness).sum()
    }

    /// Temperatures at each layer boundary and the R-value of each layer.
    ///
    /// The first temperature is the outdoor air and the second the exterior
    /// surface; the last two are the interior surface and the indoor air.
    /// R-values start with the outdoor film and end with the indoor film, so
    /// they sum to the R-factor under these conditions.
    pub fn temperature_profile(&self, c: &ProfileConditions) -> (Vec<f64>, Vec<f64>) {
        let angle = c.film_angle();
        let in_r_init = 1.0 / in_h_simple(self.inside_emissivity());
        let mut r_values = Vec::with_capacity(self.materials.len() + 2);
        r_values.push(
            1.0 / out_h(
                self.outside_emissivity(),
                c.wind_speed,
                c.outside_temperature + 273.15,
            ),
        );
        r_values.extend(self.materials.iter().map(OpaqueMaterial::r_value));
        r_values.push(in_r_init);

        let total: f64 = r_values.iter().sum();
        let in_delta_t = (in_r_init / total) * (c.outside_temperature - c.inside_temperature);
        let film = FilmConditions {
            t_kelvin: c.inside_temperature - in_delta_t / 2.0 + 273.15,
            delta_t: in_delta_t,
            height: c.height,
            angle,
            pressure: c.pressure,
        };
        if let Some(last) = r_values.last_mut() {
            *last = 1.0 / in_h(self.inside_emissivity(), &film);
        }
        let temperatures = temperature_profile_from_r_values(
            &r_values,
            c.outside_temperature,
            c.inside_temperature,
        );
        (temperatures, r_values)
    }

    pub fn to_idf(&self) -> String {
        construction_idf(&self.name, self.materials.iter().map(OpaqueMaterial::name))
    }

    /// Parses a `Construction` whose layers are all in `materials`.
    ///
    /// # Errors
    ///
    /// Returns an error if a layer is missing from `materials` or the
    /// construction is invalid.
    pub fn from_idf(text: &str, materials: &HashMap<String, OpaqueMaterial>) -> Result<Self> {
        let fields = parse_idf_string(text, Some("Construction"))?;
        let Some((name, layers)) = fields.split_first() else {
            return Err(Error::idf("Construction", "missing name"));
        };
        Self::from_abridged(name, layers, materials)
    }

    /// Reads every opaque construction and material in an IDF file.
    ///
    /// Constructions referencing layers that are not opaque materials, such
    /// as window constructions, are skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if a material object cannot be parsed.
    pub fn extract_all_from_idf_file(
        file_text: &str,
    ) -> Result<(Vec<OpaqueConstruction>, Vec<OpaqueMaterial>)> {
        let materials = extract_objects(file_text, "Material")
            .into_iter()
            .chain(extract_objects(file_text, "Material:NoMass"))
            .map(|text| OpaqueMaterial::from_idf(&text))
            .collect::<Result<Vec<_>>>()?;
        let lookup: HashMap<String, OpaqueMaterial> = materials
            .iter()
            .map(|m| (m.name().to_string(), m.clone()))
            .collect();
        let constructions = extract_objects(file_text, "Construction")
            .iter()
            .filter_map(|text| Self::from_idf(text, &lookup).ok())
            .collect();
        Ok((constructions, materials))
    }
}
