//! Window constructions made of glazing, gas and shade layers.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::{
    FilmConditions, ProfileConditions, construction_idf, in_h, in_h_simple, out_h, out_h_simple,
    temperature_profile_from_r_values, unique_by_name,
};
use crate::error::{Error, Result, check_ep_name};
use crate::idf::{extract_objects, parse_idf_string};
use crate::material::{
    EnergyWindowMaterialSimpleGlazSys, GapConditions, ShadeLayer, WindowMaterial,
};

/// Most layers EnergyPlus accepts in a window construction.
pub const MAX_WINDOW_LAYERS: usize = 8;

/// Iteration cap when solving gap conductances.
const MAX_ITERATIONS: usize = 100;

/// Convergence tolerance on the total R-value (m2-K/W).
const R_TOLERANCE: f64 = 0.001;

/// Where the shade or blind of a window construction sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShadeLocation {
    Exterior,
    Interior,
    Between,
}

impl ShadeLocation {
    pub fn as_str(self) -> &'static str {
        match self {
            ShadeLocation::Exterior => "Exterior",
            ShadeLocation::Interior => "Interior",
            ShadeLocation::Between => "Between",
        }
    }
}

impl fmt::Display for ShadeLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stack of glazing, gas and shade layers, outside to inside.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "WindowConstructionData", into = "WindowConstructionData")]
pub struct WindowConstruction {
    pub name: String,
    pub materials: Vec<WindowMaterial>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct WindowConstructionData {
    name: String,
    layers: Vec<String>,
    materials: Vec<WindowMaterial>,
}

impl TryFrom<WindowConstructionData> for WindowConstruction {
    type Error = Error;

    fn try_from(data: WindowConstructionData) -> Result<Self> {
        let lookup: HashMap<String, WindowMaterial> = data
            .materials
            .into_iter()
            .map(|m| (m.name().to_string(), m))
            .collect();
        Self::from_abridged(&data.name, &data.layers, &lookup)
    }
}

impl From<WindowConstruction> for WindowConstructionData {
    fn from(c: WindowConstruction) -> Self {
        Self {
            layers: c.layers().into_iter().map(str::to_string).collect(),
            materials: c.unique_materials(),
            name: c.name,
        }
    }
}

impl WindowConstruction {
    /// # Errors
    ///
    /// Returns [`Error::InvalidLayers`] when the layer stack is not a valid
    /// glazing system.
    pub fn new(name: &str, materials: Vec<WindowMaterial>) -> Result<Self> {
        let c = Self {
            name: name.to_string(),
            materials,
        };
        c.validate()?;
        Ok(c)
    }

    /// # Errors
    ///
    /// Returns [`Error::MissingReference`] for a layer with no material.
    pub fn from_abridged(
        name: &str,
        layers: &[String],
        materials: &HashMap<String, WindowMaterial>,
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

    /// Checks the layer stack.
    ///
    /// A simple glazing system stands alone. Gases may not face outdoors or
    /// indoors and must follow a glazing. A single shade or blind may sit
    /// first, last, or directly between two glazings. Glazings may not touch.
    pub fn validate(&self) -> Result<()> {
        check_ep_name(&self.name)?;
        let layers_err = |reason: String| Error::InvalidLayers {
            construction: self.name.clone(),
            reason,
        };
        let n = self.materials.len();
        if n == 0 || n > MAX_WINDOW_LAYERS {
            return Err(layers_err(format!(
                "needs 1 to {MAX_WINDOW_LAYERS} layers, got {n}"
            )));
        }
        let simple = self
            .materials
            .iter()
            .any(|m| matches!(m, WindowMaterial::SimpleGlazSys(_)));
        if simple && n > 1 {
            return Err(layers_err(
                "a simple glazing system must be the only layer".into(),
            ));
        }
        if let Some(m) = [&self.materials[0], &self.materials[n - 1]]
            .into_iter()
            .find(|m| m.is_gas())
        {
            return Err(layers_err(format!(
                "gas layer \"{}\" cannot be on the outside or inside",
                m.name()
            )));
        }
        if !self.materials.iter().any(WindowMaterial::is_glazing) {
            return Err(layers_err("needs at least one glazing layer".into()));
        }
        let mut after_glazing = false;
        let mut shade: Option<&str> = None;
        for (i, m) in self.materials.iter().enumerate() {
            if m.is_glazing() {
                if after_glazing {
                    return Err(layers_err(format!(
                        "adjacent glazing layers before \"{}\"",
                        m.name()
                    )));
                }
                after_glazing = true;
                continue;
            }
            if !after_glazing && (m.is_gas() || i != 0) {
                return Err(layers_err(format!(
                    "layer \"{}\" must follow a glazing layer",
                    m.name()
                )));
            }
            if m.is_shade() {
                if let Some(first) = shade {
                    return Err(layers_err(format!(
                        "only one shade allowed, found \"{first}\" and \"{}\"",
                        m.name()
                    )));
                }
                shade = Some(m.name());
            }
            after_glazing = false;
        }
        self.materials.iter().try_for_each(WindowMaterial::validate)
    }

    pub fn layers(&self) -> Vec<&str> {
        self.materials.iter().map(WindowMaterial::name).collect()
    }

    pub fn unique_materials(&self) -> Vec<WindowMaterial> {
        unique_by_name(&self.materials, |m| m.name())
    }

    fn simple_system(&self) -> Option<&EnergyWindowMaterialSimpleGlazSys> {
        match self.materials.as_slice() {
            [WindowMaterial::SimpleGlazSys(s)] => Some(s),
            _ => None,
        }
    }

    pub fn glazing_count(&self) -> usize {
        self.materials.iter().filter(|m| m.is_glazing()).count()
    }

    /// Gas layers plus the air gaps beside a shade: one for a shade at
    /// either end, two for a shade between panes.
    pub fn gap_count(&self) -> usize {
        let last = self.materials.len().saturating_sub(1);
        self.materials
            .iter()
            .enumerate()
            .map(|(i, m)| {
                if m.is_gas() || (m.is_shade() && (i == 0 || i == last)) {
                    1
                } else if m.is_shade() {
                    2
                } else {
                    0
                }
            })
            .sum()
    }

    pub fn has_shade(&self) -> bool {
        self.materials.iter().any(WindowMaterial::is_shade)
    }

    pub fn shade_location(&self) -> Option<ShadeLocation> {
        if self.materials.first().is_some_and(WindowMaterial::is_shade) {
            Some(ShadeLocation::Exterior)
        } else if self.materials.last().is_some_and(WindowMaterial::is_shade) {
            Some(ShadeLocation::Interior)
        } else if self.has_shade() {
            Some(ShadeLocation::Between)
        } else {
            None
        }
    }

    /// Total thickness (m), counting blinds by their slat width.
    pub fn thickness(&self) -> f64 {
        self.materials.iter().map(WindowMaterial::thickness).sum()
    }

    pub fn is_symmetric(&self) -> bool {
        self.materials.iter().eq(self.materials.iter().rev())
    }

    /// Emissivity of the layer facing the room.
    pub fn inside_emissivity(&self) -> f64 {
        self.materials
            .last()
            .map_or(0.84, WindowMaterial::emissivity_back)
    }

    /// Emissivity of the layer facing outdoors.
    pub fn outside_emissivity(&self) -> f64 {
        self.materials.first().map_or(0.84, WindowMaterial::emissivity)
    }

    /// Solar transmittance at normal incidence with any shade ignored.
    pub fn solar_transmittance(&self) -> f64 {
        if let Some(s) = self.simple_system() {
            return s.shgc * 0.8;
        }
        self.materials
            .iter()
            .filter_map(|m| match m {
                WindowMaterial::Glazing(g) => Some(g.solar_transmittance),
                _ => None,
            })
            .product()
    }

    /// Visible transmittance at normal incidence with any shade ignored.
    pub fn visible_transmittance(&self) -> f64 {
        if let Some(s) = self.simple_system() {
            return s.vt;
        }
        self.materials
            .iter()
            .filter_map(|m| match m {
                WindowMaterial::Glazing(g) => Some(g.visible_transmittance),
                _ => None,
            })
            .product()
    }

    /// Resistance including films (m2-K/W).
    ///
    /// Constructions with gaps or shades are solved on the default
    /// temperature profile. Shades are treated as impermeable to air.
    pub fn r_factor(&self) -> f64 {
        if let Some(s) = self.simple_system() {
            return s.r_factor();
        }
        if self.gap_count() == 0 {
            return self.materials.iter().map(WindowMaterial::r_value).sum::<f64>()
                + 1.0 / out_h_simple()
                + 1.0 / in_h_simple(self.inside_emissivity());
        }
        let (_, r_values) = self.temperature_profile(&ProfileConditions::default());
        r_values.iter().sum()
    }

    pub fn u_factor(&self) -> f64 {
        1.0 / self.r_factor()
    }

    /// Resistance without films (m2-K/W).
    pub fn r_value(&self) -> f64 {
        if let Some(s) = self.simple_system() {
            return s.r_value();
        }
        if self.gap_count() == 0 {
            return self.materials.iter().map(WindowMaterial::r_value).sum();
        }
        let (_, r_values) = self.temperature_profile(&ProfileConditions::default());
        r_values[1..r_values.len() - 1].iter().sum()
    }

    pub fn u_value(&self) -> f64 {
        1.0 / self.r_value()
    }

    /// Temperatures at each layer boundary and the R-value of each layer.
    ///
    /// Gap and film conductances depend on the temperatures around them, so
    /// the profile is iterated until the total R-value settles. A shade's
    /// R-value includes the air gaps beside it.
    pub fn temperature_profile(&self, c: &ProfileConditions) -> (Vec<f64>, Vec<f64>) {
        let angle = c.film_angle();
        let mut r_values = Vec::with_capacity(self.materials.len() + 2);
        r_values.push(
            1.0 / out_h(
                self.outside_emissivity(),
                c.wind_speed,
                c.outside_temperature + 273.15,
            ),
        );
        let initial_gap = GapConditions {
            delta_t: (c.inside_temperature - c.outside_temperature).abs().max(1.0)
                / self.gap_count().max(1) as f64,
            t_kelvin: (c.inside_temperature + c.outside_temperature) / 2.0 + 273.15,
            ..GapConditions::default()
        };
        r_values.extend(
            self.materials
                .iter()
                .enumerate()
                .map(|(i, m)| match m.as_shade() {
                    Some(shade) => self.shade_r_value(i, shade, &initial_gap),
                    None => m.r_value(),
                }),
        );
        r_values.push(1.0 / in_h_simple(self.inside_emissivity()));

        let mut r_last = 0.0;
        let mut r_next: f64 = r_values.iter().sum();
        let mut iterations = 0;
        while (r_next - r_last).abs() > R_TOLERANCE && iterations < MAX_ITERATIONS {
            r_last = r_next;
            let temperatures = temperature_profile_from_r_values(
                &r_values,
                c.outside_temperature,
                c.inside_temperature,
            );
            r_values = self.layered_r_values(&temperatures, &r_values, c, angle);
            r_next = r_values.iter().sum();
            iterations += 1;
        }
        let temperatures = temperature_profile_from_r_values(
            &r_values,
            c.outside_temperature,
            c.inside_temperature,
        );
        (temperatures, r_values)
    }

    fn layered_r_values(
        &self,
        temperatures: &[f64],
        previous: &[f64],
        c: &ProfileConditions,
        angle: f64,
    ) -> Vec<f64> {
        let mut r_values = Vec::with_capacity(previous.len());
        r_values.push(previous[0]);
        for (i, mat) in self.materials.iter().enumerate() {
            let gap = GapConditions {
                delta_t: (temperatures[i + 1] - temperatures[i + 2]).abs(),
                height: c.height,
                t_kelvin: (temperatures[i + 1] + temperatures[i + 2]) / 2.0 + 273.15,
                pressure: c.pressure,
                emissivity_1: self.emissivity_before(i),
                emissivity_2: self.emissivity_after(i),
                angle,
            };
            if let Some(gas) = mat.as_gas() {
                r_values.push(1.0 / gas.u_value_at_angle(&gap));
            } else if let Some(shade) = mat.as_shade() {
                r_values.push(self.shade_r_value(i, shade, &gap));
            } else {
                r_values.push(previous[i + 1]);
            }
        }
        let n = temperatures.len();
        let film = FilmConditions {
            t_kelvin: (temperatures[n - 1] + temperatures[n - 2]) / 2.0 + 273.15,
            delta_t: (temperatures[n - 1] - temperatures[n - 2]).abs(),
            height: c.height,
            angle,
            pressure: c.pressure,
        };
        r_values.push(1.0 / in_h(self.inside_emissivity(), &film));
        r_values
    }

    /// Back emissivity of the layer before `i`, facing layer `i`.
    fn emissivity_before(&self, i: usize) -> f64 {
        i.checked_sub(1)
            .and_then(|j| self.materials.get(j))
            .map_or(0.84, WindowMaterial::emissivity_back)
    }

    /// Front emissivity of the layer after `i`, facing layer `i`.
    fn emissivity_after(&self, i: usize) -> f64 {
        self.materials
            .get(i + 1)
            .map_or(0.84, WindowMaterial::emissivity)
    }

    /// R-value of the shade at layer `i` with its air gaps.
    fn shade_r_value(&self, i: usize, shade: &dyn ShadeLayer, gap: &GapConditions) -> f64 {
        if i == 0 {
            shade.r_value_exterior(self.emissivity_after(i), gap)
        } else if i == self.materials.len() - 1 {
            shade.r_value_interior(self.emissivity_before(i), gap)
        } else {
            shade.r_value_between(self.emissivity_after(i), self.emissivity_before(i), gap)
        }
    }

    pub fn to_idf(&self) -> String {
        construction_idf(&self.name, self.materials.iter().map(WindowMaterial::name))
    }

    /// # Errors
    ///
    /// Returns an error if a layer is missing from `materials` or the layer
    /// stack is invalid.
    pub fn from_idf(text: &str, materials: &HashMap<String, WindowMaterial>) -> Result<Self> {
        let fields = parse_idf_string(text, Some("Construction"))?;
        let Some((name, layers)) = fields.split_first() else {
            return Err(Error::idf("Construction", "missing name"));
        };
        Self::from_abridged(name, layers, materials)
    }

    /// Reads every window construction and window material in an IDF file.
    ///
    /// # Errors
    ///
    /// Returns an error if a window material object cannot be parsed.
    pub fn extract_all_from_idf_file(
        file_text: &str,
    ) -> Result<(Vec<WindowConstruction>, Vec<WindowMaterial>)> {
        let materials = [
            "WindowMaterial:Glazing",
            "WindowMaterial:SimpleGlazingSystem",
            "WindowMaterial:Gas",
            "WindowMaterial:GasMixture",
            "WindowMaterial:Shade",
            "WindowMaterial:Blind",
        ]
        .iter()
        .flat_map(|ty| extract_objects(file_text, ty))
        .map(|text| WindowMaterial::from_idf(&text))
        .collect::<Result<Vec<_>>>()?;
        let lookup: HashMap<String, WindowMaterial> = materials
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::{
        EnergyWindowMaterialBlind, EnergyWindowMaterialGas, EnergyWindowMaterialGasMixture,
        EnergyWindowMaterialGlazing, EnergyWindowMaterialShade, GasFraction, GasType,
        SlatOrientation,
    };

    fn assert_rel(actual: f64, expected: f64) {
        assert!(
            ((actual - expected) / expected).abs() < 1e-2,
            "{actual} is not within 1% of {expected}"
        );
    }

    fn clear() -> WindowMaterial {
        EnergyWindowMaterialGlazing::clear("Clear").unwrap().into()
    }

    fn lowe() -> WindowMaterial {
        EnergyWindowMaterialGlazing {
            solar_transmittance: 0.45,
            solar_reflectance: 0.36,
            visible_transmittance: 0.71,
            visible_reflectance: 0.21,
            emissivity_back: 0.047,
            ..EnergyWindowMaterialGlazing::clear("Low-e").unwrap()
        }
        .into()
    }

    fn gap() -> WindowMaterial {
        EnergyWindowMaterialGas::new("Air Gap", 0.0127, GasType::Air)
            .unwrap()
            .into()
    }

    fn ref_lowe() -> WindowMaterial {
        EnergyWindowMaterialGlazing {
            thickness: 0.00318,
            solar_transmittance: 0.4517,
            solar_reflectance: 0.359,
            visible_transmittance: 0.714,
            visible_reflectance: 0.207,
            emissivity_back: 0.046578,
            conductivity: 1.0,
            ..EnergyWindowMaterialGlazing::clear("Low-e Glass").unwrap()
        }
        .into()
    }

    fn ref_clear() -> WindowMaterial {
        EnergyWindowMaterialGlazing {
            thickness: 0.005715,
            solar_transmittance: 0.770675,
            solar_reflectance: 0.07,
            visible_transmittance: 0.8836,
            visible_reflectance: 0.0804,
            conductivity: 1.0,
            ..EnergyWindowMaterialGlazing::clear("Clear Glass").unwrap()
        }
        .into()
    }

    fn air_argon() -> WindowMaterial {
        let gases = vec![
            GasFraction {
                gas_type: GasType::Air,
                gas_fraction: 0.1,
            },
            GasFraction {
                gas_type: GasType::Argon,
                gas_fraction: 0.9,
            },
        ];
        EnergyWindowMaterialGasMixture::new("Air Argon Gap", 0.0125, gases)
            .unwrap()
            .into()
    }

    fn roller_shade() -> WindowMaterial {
        let mut shade = EnergyWindowMaterialShade {
            thickness: 0.025,
            solar_transmittance: 0.15,
            solar_reflectance: 0.5,
            visible_transmittance: 0.25,
            visible_reflectance: 0.5,
            emissivity: 0.4,
            conductivity: 0.2,
            distance_to_glass: 0.1,
            airflow_permeability: 0.25,
            ..EnergyWindowMaterialShade::new("Low-e Diffusing Shade").unwrap()
        };
        shade.set_all_opening_multipliers(0.75);
        shade.validate().unwrap();
        shade.into()
    }

    fn plastic_blind() -> WindowMaterial {
        let mut blind = EnergyWindowMaterialBlind {
            slat_orientation: SlatOrientation::Vertical,
            slat_width: 0.025,
            slat_separation: 0.01875,
            slat_thickness: 0.003,
            slat_angle: 90.0,
            slat_conductivity: 0.2,
            infrared_transmittance: 0.0,
            emissivity: 0.95,
            distance_to_glass: 0.1,
            ..EnergyWindowMaterialBlind::new("Plastic Blind").unwrap()
        };
        blind.set_all_solar_transmittance(0.05);
        blind.set_all_solar_reflectance(0.4);
        blind.set_all_visible_transmittance(0.05);
        blind.set_all_visible_reflectance(0.45);
        blind.top_opening_multiplier = 1.0;
        blind.bottom_opening_multiplier = 1.0;
        blind.left_opening_multiplier = 1.0;
        blind.right_opening_multiplier = 1.0;
        blind.validate().unwrap();
        blind.into()
    }

    #[test]
    fn layer_rules() {
        assert!(WindowConstruction::new("Double", vec![lowe(), gap(), clear()]).is_ok());
        assert!(WindowConstruction::new("GasOut", vec![gap(), clear()]).is_err());
        assert!(WindowConstruction::new("TwoPanes", vec![clear(), clear()]).is_err());
        let simple: WindowMaterial = EnergyWindowMaterialSimpleGlazSys::new("S", 1.8, 0.4, 0.6)
            .unwrap()
            .into();
        assert!(WindowConstruction::new("Simple", vec![simple.clone()]).is_ok());
        assert!(WindowConstruction::new("Mixed", vec![simple, gap(), clear()]).is_err());
    }

    #[test]
    fn counts_and_transmittance() {
        let c = WindowConstruction::new("Double", vec![lowe(), gap(), clear()]).unwrap();
        assert_eq!(c.glazing_count(), 2);
        assert_eq!(c.gap_count(), 1);
        assert!((c.solar_transmittance() - 0.45 * 0.85).abs() < 1e-12);
        assert!((c.visible_transmittance() - 0.71 * 0.9).abs() < 1e-12);
        assert!((c.outside_emissivity() - 0.84).abs() < 1e-12);
        assert!((c.inside_emissivity() - 0.84).abs() < 1e-12);
    }

    #[test]
    fn double_pane_u_factor_is_typical() {
        let c = WindowConstruction::new("Double", vec![clear(), gap(), clear()]).unwrap();
        let u = c.u_factor();
        assert!(u > 2.3 && u < 3.3, "u = {u}");
        let single = WindowConstruction::new("Single", vec![clear()]).unwrap();
        assert!(single.u_factor() > u);
    }

    #[test]
    fn low_e_coating_lowers_u_factor() {
        let plain = WindowConstruction::new("Plain", vec![clear(), gap(), clear()]).unwrap();
        let coated = WindowConstruction::new("Coated", vec![lowe(), gap(), clear()]).unwrap();
        assert!(coated.u_factor() < plain.u_factor());
    }

    #[test]
    fn simple_system_uses_rated_values() {
        let simple = EnergyWindowMaterialSimpleGlazSys::new("S", 2.0, 0.4, 0.6).unwrap();
        let c = WindowConstruction::new("Simple", vec![simple.into()]).unwrap();
        assert!((c.u_factor() - 2.0).abs() < 1e-12);
        assert!((c.solar_transmittance() - 0.32).abs() < 1e-12);
        assert!((c.visible_transmittance() - 0.6).abs() < 1e-12);
    }

    #[test]
    fn profile_ends_at_air_temperatures() {
        let c = WindowConstruction::new("Double", vec![lowe(), gap(), clear()]).unwrap();
        let (temps, r_values) = c.temperature_profile(&ProfileConditions::default());
        assert_eq!(temps.len(), 6);
        assert_eq!(r_values.len(), 5);
        assert!((temps[0] + 18.0).abs() < 1e-9);
        assert!((temps[5] - 21.0).abs() < 1e-9);
    }

    #[test]
    fn extracts_window_constructions() {
        let c = WindowConstruction::new("Double", vec![lowe(), gap(), clear()]).unwrap();
        let mut file = String::new();
        for m in c.unique_materials() {
            file.push_str(&m.to_idf());
            file.push('\n');
        }
        file.push_str(&c.to_idf());
        file.push_str("\nMaterial, Brick, Rough, 0.1, 0.9, 1920, 790;\n");
        file.push_str("Construction, Wall, Brick;\n");
        let (constructions, materials) =
            WindowConstruction::extract_all_from_idf_file(&file).unwrap();
        assert_eq!(materials.len(), 3);
        assert_eq!(constructions.len(), 1);
        assert_eq!(constructions[0].layers(), vec!["Low-e", "Air Gap", "Clear"]);
    }

    #[test]
    fn double_low_e_reference_values() {
        let c = WindowConstruction::new("Double Low-E", vec![ref_lowe(), gap(), ref_clear()])
            .unwrap();
        assert_rel(c.u_factor(), 1.698);
        assert_rel(c.r_value(), 0.41984);
        assert_rel(c.r_factor(), 0.5889);
        assert_rel(c.u_value(), 2.3818);
    }

    #[test]
    fn clear_and_gas_fill_reference_values() {
        let double = WindowConstruction::new("Double Clear", vec![ref_clear(), gap(), ref_clear()])
            .unwrap();
        assert_rel(double.u_factor(), 2.72);
        let triple = WindowConstruction::new(
            "Triple Clear",
            vec![ref_clear(), gap(), ref_clear(), gap(), ref_clear()],
        )
        .unwrap();
        assert_rel(triple.u_factor(), 1.757);
        let argon = WindowConstruction::new("Air Argon", vec![ref_lowe(), air_argon(), ref_clear()])
            .unwrap();
        assert_rel(argon.u_factor(), 1.463);
    }

    #[test]
    fn shade_positions_change_u_factor() {
        let interior = WindowConstruction::new(
            "Interior Shade",
            vec![ref_lowe(), gap(), ref_clear(), roller_shade()],
        )
        .unwrap();
        let between =
            WindowConstruction::new("Between Shade", vec![ref_lowe(), roller_shade(), ref_clear()])
                .unwrap();
        let exterior = WindowConstruction::new(
            "Exterior Shade",
            vec![roller_shade(), ref_lowe(), gap(), ref_clear()],
        )
        .unwrap();
        assert_rel(interior.u_factor(), 0.9091);
        assert_rel(between.u_factor(), 1.13374);
        assert_rel(exterior.u_factor(), 0.97678);
        assert_eq!(interior.shade_location(), Some(ShadeLocation::Interior));
        assert_eq!(between.shade_location(), Some(ShadeLocation::Between));
        assert_eq!(exterior.shade_location(), Some(ShadeLocation::Exterior));
    }

    #[test]
    fn blind_positions_change_u_factor() {
        let interior = WindowConstruction::new(
            "Interior Blind",
            vec![ref_lowe(), gap(), ref_clear(), plastic_blind()],
        )
        .unwrap();
        let between =
            WindowConstruction::new("Between Blind", vec![ref_lowe(), plastic_blind(), ref_clear()])
                .unwrap();
        let exterior = WindowConstruction::new(
            "Exterior Blind",
            vec![plastic_blind(), ref_lowe(), gap(), ref_clear()],
        )
        .unwrap();
        assert_rel(interior.u_factor(), 1.26296);
        assert_rel(between.u_factor(), 1.416379);
        assert_rel(exterior.u_factor(), 1.2089);
    }

    #[test]
    fn shade_layer_rules() {
        let shaded = |name: &str, layers: Vec<WindowMaterial>| WindowConstruction::new(name, layers);
        assert!(shaded("TwoShades", vec![roller_shade(), clear(), plastic_blind()]).is_err());
        assert!(shaded("GasBeforeShade", vec![clear(), gap(), roller_shade(), clear()]).is_err());
        assert!(shaded("ShadeThenGas", vec![roller_shade(), gap(), clear()]).is_err());
        assert!(shaded("ShadeOnly", vec![roller_shade()]).is_err());
        let ok = shaded("Shaded", vec![clear(), gap(), clear(), roller_shade()]).unwrap();
        assert!(ok.has_shade());
        assert_eq!(ok.glazing_count(), 2);
        assert_eq!(ok.gap_count(), 2);
        let between = shaded("Between", vec![clear(), roller_shade(), clear()]).unwrap();
        assert_eq!(between.gap_count(), 2);
        let plain = shaded("Plain", vec![clear(), gap(), clear()]).unwrap();
        assert!(!plain.has_shade());
        assert_eq!(plain.shade_location(), None);
    }

    #[test]
    fn extracts_shaded_constructions() {
        let c = WindowConstruction::new("Shaded", vec![clear(), gap(), clear(), roller_shade()])
            .unwrap();
        let mut file = String::new();
        for m in c.unique_materials() {
            file.push_str(&m.to_idf());
            file.push('\n');
        }
        file.push_str(&c.to_idf());
        let (constructions, materials) =
            WindowConstruction::extract_all_from_idf_file(&file).unwrap();
        assert_eq!(materials.len(), 3);
        assert_eq!(constructions[0].shade_location(), Some(ShadeLocation::Interior));
    }
}
