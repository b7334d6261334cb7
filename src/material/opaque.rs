//! Opaque materials: `Material` and `Material:NoMass`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result, check_ep_name, check_positive, check_range};
use crate::idf::reader::{field, parse_f64, parse_opt_f64};
use crate::idf::{generate_idf_string, parse_idf_string};

/// Surface roughness classes recognised by EnergyPlus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Roughness {
    VeryRough,
    Rough,
    #[default]
    MediumRough,
    MediumSmooth,
    Smooth,
    VerySmooth,
}

impl Roughness {
    pub const ALL: [Roughness; 6] = [
        Roughness::VeryRough,
        Roughness::Rough,
        Roughness::MediumRough,
        Roughness::MediumSmooth,
        Roughness::Smooth,
        Roughness::VerySmooth,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Roughness::VeryRough => "VeryRough",
            Roughness::Rough => "Rough",
            Roughness::MediumRough => "MediumRough",
            Roughness::MediumSmooth => "MediumSmooth",
            Roughness::Smooth => "Smooth",
            Roughness::VerySmooth => "VerySmooth",
        }
    }
}

impl fmt::Display for Roughness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Roughness {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Roughness::ALL
            .into_iter()
            .find(|r| r.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                Error::invalid(
                    "roughness",
                    format!(
                        "\"{s}\" is not one of {}",
                        Roughness::ALL.map(Roughness::as_str).join(", ")
                    ),
                )
            })
    }
}

fn default_thermal_absorptance() -> f64 {
    0.9
}

fn default_solar_absorptance() -> f64 {
    0.7
}

fn check_absorptances(thermal: f64, solar: f64, visible: Option<f64>) -> Result<()> {
    if !(thermal > 0.0 && thermal <= 0.99999) {
        return Err(Error::out_of_range(
            "thermal absorptance",
            thermal,
            "greater than 0 and at most 0.99999",
        ));
    }
    check_range("solar absorptance", solar, 0.0, 1.0)?;
    if let Some(v) = visible {
        check_range("visible absorptance", v, 0.0, 1.0)?;
    }
    Ok(())
}

/// A typical opaque material with thermal mass.
///
/// Written to IDF as a `Material` object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergyMaterial {
    pub name: String,
    /// Layer thickness (m).
    pub thickness: f64,
    /// Thermal conductivity (W/m-K).
    pub conductivity: f64,
    /// Density (kg/m3).
    pub density: f64,
    /// Specific heat (J/kg-K).
    pub specific_heat: f64,
    #[serde(default)]
    pub roughness: Roughness,
    /// Fraction of long wave radiation absorbed.
    #[serde(default = "default_thermal_absorptance")]
    pub thermal_absorptance: f64,
    /// Fraction of solar radiation absorbed.
    #[serde(default = "default_solar_absorptance")]
    pub solar_absorptance: f64,
    /// Fraction of visible light absorbed. `None` follows the solar value.
    #[serde(default)]
    pub visible_absorptance: Option<f64>,
}

impl EnergyMaterial {
    /// Creates a material with default roughness and absorptances.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is not a valid EnergyPlus name, a
    /// physical property is not positive, or specific heat is below 100.
    pub fn new(
        name: &str,
        thickness: f64,
        conductivity: f64,
        density: f64,
        specific_heat: f64,
    ) -> Result<Self> {
        let mat = Self {
            name: name.to_string(),
            thickness,
            conductivity,
            density,
            specific_heat,
            roughness: Roughness::default(),
            thermal_absorptance: default_thermal_absorptance(),
            solar_absorptance: default_solar_absorptance(),
            visible_absorptance: None,
        };
        mat.validate()?;
        Ok(mat)
    }

    /// Sets roughness and absorptances, consuming and returning the material.
    ///
    /// # Errors
    ///
    /// Returns an error if an absorptance is outside `[0, 1]`.
    pub fn with_surface(
        mut self,
        roughness: Roughness,
        thermal_absorptance: f64,
        solar_absorptance: f64,
        visible_absorptance: Option<f64>,
    ) -> Result<Self> {
        check_absorptances(thermal_absorptance, solar_absorptance, visible_absorptance)?;
        self.roughness = roughness;
        self.thermal_absorptance = thermal_absorptance;
        self.solar_absorptance = solar_absorptance;
        self.visible_absorptance = visible_absorptance;
        Ok(self)
    }

    /// Checks every field against its allowed range.
    pub fn validate(&self) -> Result<()> {
        check_ep_name(&self.name)?;
        check_positive("material thickness", self.thickness)?;
        check_positive("material conductivity", self.conductivity)?;
        check_positive("material density", self.density)?;
        if !(self.specific_heat.is_finite() && self.specific_heat >= 100.0) {
            return Err(Error::out_of_range(
                "material specific heat",
                self.specific_heat,
                "100 or greater",
            ));
        }
        check_absorptances(
            self.thermal_absorptance,
            self.solar_absorptance,
            self.visible_absorptance,
        )
    }

    pub fn visible_absorptance(&self) -> f64 {
        self.visible_absorptance.unwrap_or(self.solar_absorptance)
    }

    pub fn solar_reflectance(&self) -> f64 {
        1.0 - self.solar_absorptance
    }

    pub fn visible_reflectance(&self) -> f64 {
        1.0 - self.visible_absorptance()
    }

    /// Resistivity (m-K/W).
    pub fn resistivity(&self) -> f64 {
        1.0 / self.conductivity
    }

    /// Thermal resistance of the layer without air films (m2-K/W).
    pub fn r_value(&self) -> f64 {
        self.thickness / self.conductivity
    }

    /// Conductance of the layer without air films (W/m2-K).
    pub fn u_value(&self) -> f64 {
        self.conductivity / self.thickness
    }

    /// Sets the R-value by changing conductivity; thickness is kept.
    ///
    /// # Errors
    ///
    /// Returns an error if `r_value` is not positive.
    pub fn set_r_value(&mut self, r_value: f64) -> Result<()> {
        check_positive("material r-value", r_value)?;
        self.conductivity = self.thickness / r_value;
        Ok(())
    }

    /// Sets the U-value by changing conductivity; thickness is kept.
    ///
    /// # Errors
    ///
    /// Returns an error if `u_value` is not positive.
    pub fn set_u_value(&mut self, u_value: f64) -> Result<()> {
        check_positive("material u-value", u_value)?;
        self.set_r_value(1.0 / u_value)
    }

    /// Mass per unit area (kg/m2).
    pub fn mass_area_density(&self) -> f64 {
        self.thickness * self.density
    }

    /// Heat capacity per unit area (J/m2-K).
    pub fn area_heat_capacity(&self) -> f64 {
        self.mass_area_density() * self.specific_heat
    }

    pub fn to_idf(&self) -> String {
        let values = [
            self.name.clone(),
            self.roughness.to_string(),
            self.thickness.to_string(),
            self.conductivity.to_string(),
            self.density.to_string(),
            self.specific_heat.to_string(),
            self.thermal_absorptance.to_string(),
            self.solar_absorptance.to_string(),
            self.visible_absorptance().to_string(),
        ];
        let comments = [
            "name",
            "roughness",
            "thickness {m}",
            "conductivity {W/m-K}",
            "density {kg/m3}",
            "specific heat {J/kg-K}",
            "thermal absorptance",
            "solar absorptance",
            "visible absorptance",
        ];
        generate_idf_string("Material", &values, Some(&comments))
    }

    /// Parses a `Material` object. Missing absorptances take their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a `Material` or a field is invalid.
    pub fn from_idf(text: &str) -> Result<Self> {
        const T: &str = "Material";
        let f = parse_idf_string(text, Some(T))?;
        let mat = Self {
            name: field(&f, 0, T, "name")?.to_string(),
            roughness: field(&f, 1, T, "roughness")?.parse()?,
            thickness: parse_f64(field(&f, 2, T, "thickness")?, T, "thickness")?,
            conductivity: parse_f64(field(&f, 3, T, "conductivity")?, T, "conductivity")?,
            density: parse_f64(field(&f, 4, T, "density")?, T, "density")?,
            specific_heat: parse_f64(field(&f, 5, T, "specific heat")?, T, "specific heat")?,
            thermal_absorptance: parse_opt_f64(&f, 6, T, "thermal absorptance")?
                .unwrap_or_else(default_thermal_absorptance),
            solar_absorptance: parse_opt_f64(&f, 7, T, "solar absorptance")?
                .unwrap_or_else(default_solar_absorptance),
            visible_absorptance: parse_opt_f64(&f, 8, T, "visible absorptance")?,
        };
        mat.validate()?;
        Ok(mat)
    }
}

/// An opaque layer described only by its thermal resistance.
///
/// Written to IDF as a `Material:NoMass` object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergyMaterialNoMass {
    pub name: String,
    /// Thermal resistance (m2-K/W).
    pub r_value: f64,
    #[serde(default)]
    pub roughness: Roughness,
    #[serde(default = "default_thermal_absorptance")]
    pub thermal_absorptance: f64,
    #[serde(default = "default_solar_absorptance")]
    pub solar_absorptance: f64,
    #[serde(default)]
    pub visible_absorptance: Option<f64>,
}

impl EnergyMaterialNoMass {
    /// Creates a no-mass material with default surface properties.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is invalid or `r_value` is below 0.001.
    pub fn new(name: &str, r_value: f64) -> Result<Self> {
        let mat = Self {
            name: name.to_string(),
            r_value,
            roughness: Roughness::default(),
            thermal_absorptance: default_thermal_absorptance(),
            solar_absorptance: default_solar_absorptance(),
            visible_absorptance: None,
        };
        mat.validate()?;
        Ok(mat)
    }

    pub fn validate(&self) -> Result<()> {
        check_ep_name(&self.name)?;
        if !(self.r_value.is_finite() && self.r_value >= 0.001) {
            return Err(Error::out_of_range(
                "material r-value",
                self.r_value,
                "0.001 or greater",
            ));
        }
        check_absorptances(
            self.thermal_absorptance,
            self.solar_absorptance,
            self.visible_absorptance,
        )
    }

    pub fn visible_absorptance(&self) -> f64 {
        self.visible_absorptance.unwrap_or(self.solar_absorptance)
    }

    pub fn u_value(&self) -> f64 {
        1.0 / self.r_value
    }

    pub fn solar_reflectance(&self) -> f64 {
        1.0 - self.solar_absorptance
    }

    pub fn visible_reflectance(&self) -> f64 {
        1.0 - self.visible_absorptance()
    }

    pub fn to_idf(&self) -> String {
        let values = [
            self.name.clone(),
            self.roughness.to_string(),
            self.r_value.to_string(),
            self.thermal_absorptance.to_string(),
            self.solar_absorptance.to_string(),
            self.visible_absorptance().to_string(),
        ];
        let comments = [
            "name",
            "roughness",
            "thermal resistance {m2-K/W}",
            "thermal absorptance",
            "solar absorptance",
            "visible absorptance",
        ];
        generate_idf_string("Material:NoMass", &values, Some(&comments))
    }

    /// Parses a `Material:NoMass` object.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a `Material:NoMass` or a field is invalid.
    pub fn from_idf(text: &str) -> Result<Self> {
        const T: &str = "Material:NoMass";
        let f = parse_idf_string(text, Some(T))?;
        let mat = Self {
            name: field(&f, 0, T, "name")?.to_string(),
            roughness: field(&f, 1, T, "roughness")?.parse()?,
            r_value: parse_f64(field(&f, 2, T, "thermal resistance")?, T, "thermal resistance")?,
            thermal_absorptance: parse_opt_f64(&f, 3, T, "thermal absorptance")?
                .unwrap_or_else(default_thermal_absorptance),
            solar_absorptance: parse_opt_f64(&f, 4, T, "solar absorptance")?
                .unwrap_or_else(default_solar_absorptance),
            visible_absorptance: parse_opt_f64(&f, 5, T, "visible absorptance")?,
        };
        mat.validate()?;
        Ok(mat)
    }
}
