//! Gas gap layers for window constructions.
//!
//! Gas properties follow quadratic curves in Kelvin temperature. Convection
//! across the gap uses the ISO 15099 Nusselt correlations.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result, check_ep_name, check_positive, check_range};
use crate::idf::reader::{field, parse_f64};
use crate::idf::{generate_idf_string, parse_idf_string};

/// Stefan-Boltzmann constant used for gap radiation (W/m2-K4).
pub const SIGMA: f64 = 5.6697e-8;

/// Gases available for window cavities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GasType {
    #[default]
    Air,
    Argon,
    Krypton,
    Xenon,
}

impl GasType {
    pub const ALL: [GasType; 4] = [
        GasType::Air,
        GasType::Argon,
        GasType::Krypton,
        GasType::Xenon,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            GasType::Air => "Air",
            GasType::Argon => "Argon",
            GasType::Krypton => "Krypton",
            GasType::Xenon => "Xenon",
        }
    }

    fn conductivity_curve(self) -> [f64; 3] {
        match self {
            GasType::Air => [0.002873, 0.0000776, 0.0],
            GasType::Argon => [0.002285, 0.00005149, 0.0],
            GasType::Krypton => [0.0009443, 0.00002826, 0.0],
            GasType::Xenon => [0.0004538, 0.00001723, 0.0],
        }
    }

    fn viscosity_curve(self) -> [f64; 3] {
        match self {
            GasType::Air => [0.00000372, 0.00000005, 0.0],
            GasType::Argon => [0.00000338, 0.00000006, 0.0],
            GasType::Krypton => [0.00000221, 0.00000008, 0.0],
            GasType::Xenon => [0.00000107, 0.00000007, 0.0],
        }
    }

    fn specific_heat_curve(self) -> [f64; 3] {
        match self {
            GasType::Air => [1002.73699951, 0.012324, 0.0],
            GasType::Argon => [521.92852783, 0.0, 0.0],
            GasType::Krypton => [248.09069824, 0.0, 0.0],
            GasType::Xenon => [158.33970642, 0.0, 0.0],
        }
    }

    /// Molecular weight (g/mol).
    pub fn molecular_weight(self) -> f64 {
        match self {
            GasType::Air => 28.97,
            GasType::Argon => 39.948,
            GasType::Krypton => 83.8,
            GasType::Xenon => 131.3,
        }
    }

    /// Density from the ideal gas law (kg/m3).
    pub fn density_at(self, t_kelvin: f64, pressure: f64) -> f64 {
        (pressure * self.molecular_weight() * 0.001) / (8.314 * t_kelvin)
    }

    pub fn conductivity_at(self, t_kelvin: f64) -> f64 {
        eval_curve(self.conductivity_curve(), t_kelvin)
    }

    pub fn viscosity_at(self, t_kelvin: f64) -> f64 {
        eval_curve(self.viscosity_curve(), t_kelvin)
    }

    pub fn specific_heat_at(self, t_kelvin: f64) -> f64 {
        eval_curve(self.specific_heat_curve(), t_kelvin)
    }
}

fn eval_curve([a, b, c]: [f64; 3], t: f64) -> f64 {
    a + b * t + c * t * t
}

impl fmt::Display for GasType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GasType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        GasType::ALL
            .into_iter()
            .find(|g| g.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                Error::invalid(
                    "gas type",
                    format!("\"{s}\" is not one of Air, Argon, Krypton, Xenon"),
                )
            })
    }
}

/// Boundary conditions across a gas cavity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GapConditions {
    /// Temperature difference across the cavity (C).
    pub delta_t: f64,
    /// Cavity height (m).
    pub height: f64,
    /// Mean cavity temperature (K).
    pub t_kelvin: f64,
    /// Cavity pressure (Pa).
    pub pressure: f64,
    /// Emissivity of the surface on each side.
    pub emissivity_1: f64,
    pub emissivity_2: f64,
    /// Tilt in degrees from 0 to 180, with 90 standing vertical.
    pub angle: f64,
}

impl Default for GapConditions {
    fn default() -> Self {
        Self {
            delta_t: 15.0,
            height: 1.0,
            t_kelvin: 273.15,
            pressure: 101325.0,
            emissivity_1: 0.84,
            emissivity_2: 0.84,
            angle: 90.0,
        }
    }
}

/// Thermal behaviour shared by every kind of gas layer.
///
/// Implementors supply the gap thickness and the temperature curves; the
/// convective and radiative terms are derived from those.
pub trait GasGap {
    /// Gap thickness (m).
    fn thickness(&self) -> f64;
    fn molecular_weight(&self) -> f64;
    /// Conductivity without convection (W/m-K).
    fn conductivity_at(&self, t_kelvin: f64) -> f64;
    /// Viscosity (kg/m-s).
    fn viscosity_at(&self, t_kelvin: f64) -> f64;
    /// Specific heat (J/kg-K).
    fn specific_heat_at(&self, t_kelvin: f64) -> f64;

    /// Density from the ideal gas law (kg/m3).
    fn density_at(&self, t_kelvin: f64, pressure: f64) -> f64 {
        (pressure * self.molecular_weight() * 0.001) / (8.314 * t_kelvin)
    }

    fn prandtl_at(&self, t_kelvin: f64) -> f64 {
        self.viscosity_at(t_kelvin) * self.specific_heat_at(t_kelvin)
            / self.conductivity_at(t_kelvin)
    }

    fn grashof(&self, c: &GapConditions) -> f64 {
        let rho = self.density_at(c.t_kelvin, c.pressure);
        (9.81 * self.thickness().powi(3) * c.delta_t * rho.powi(2))
            / (c.t_kelvin * self.viscosity_at(c.t_kelvin).powi(2))
    }

    fn rayleigh(&self, c: &GapConditions) -> f64 {
        let rho = self.density_at(c.t_kelvin, c.pressure);
        let numerator = rho.powi(2)
            * self.thickness().powi(3)
            * 9.81
            * self.specific_heat_at(c.t_kelvin)
            * c.delta_t;
        let denominator =
            c.t_kelvin * self.viscosity_at(c.t_kelvin) * self.conductivity_at(c.t_kelvin);
        numerator / denominator
    }

    /// Nusselt number of the cavity standing vertically.
    fn nusselt(&self, c: &GapConditions) -> f64 {
        let ra = self.rayleigh(c);
        let nu_1 = if ra > 50000.0 {
            0.0673838 * ra.powf(1.0 / 3.0)
        } else if ra > 10000.0 {
            0.028154 * ra.powf(0.4134)
        } else {
            1.0 + 1.7596678e-10 * ra.powf(2.2984755)
        };
        let nu_2 = 0.242 * (ra * (self.thickness() / c.height)).powf(0.272);
        nu_1.max(nu_2)
    }

    /// Nusselt number of the cavity at `c.angle`.
    fn nusselt_at_angle(&self, c: &GapConditions) -> f64 {
        let dot_x = |x: f64| (x + x.abs()) / 2.0;
        let ra = self.rayleigh(c);
        if c.angle < 60.0 {
            let cos_a = c.angle.to_radians().cos();
            let sin_a_18 = (1.8 * c.angle.to_radians()).sin();
            let term_1 = dot_x(1.0 - 1708.0 / (ra * cos_a));
            let term_2 = 1.0 - (1708.0 * sin_a_18.powf(1.6)) / (ra * cos_a);
            let term_3 = dot_x((ra * cos_a / 5830.0).powf(1.0 / 3.0) - 1.0);
            1.0 + 1.44 * term_1 * term_2 + term_3
        } else if c.angle < 90.0 {
            let g = 0.5 / (1.0 + (ra / 3160.0).powf(20.6)).powf(0.1);
            let nu_1 = (1.0 + ((0.0936 * ra.powf(0.314)) / (1.0 + g)).powi(7)).powf(1.0 / 7.0);
            let nu_2 = (0.104 + 0.175 / (self.thickness() / c.height)) * ra.powf(0.283);
            (nu_1.max(nu_2) + self.nusselt(c)) / 2.0
        } else if c.angle == 90.0 {
            self.nusselt(c)
        } else {
            1.0 + (self.nusselt(c) - 1.0) * c.angle.to_radians().sin()
        }
    }

    /// Convective conductance of the vertical cavity (W/m2-K).
    fn convective_conductance(&self, c: &GapConditions) -> f64 {
        self.nusselt(c) * self.conductivity_at(c.t_kelvin) / self.thickness()
    }

    fn convective_conductance_at_angle(&self, c: &GapConditions) -> f64 {
        self.nusselt_at_angle(c) * self.conductivity_at(c.t_kelvin) / self.thickness()
    }

    /// Radiative conductance between the two bounding surfaces (W/m2-K).
    fn radiative_conductance(&self, c: &GapConditions) -> f64 {
        4.0 * SIGMA * (1.0 / c.emissivity_1 + 1.0 / c.emissivity_2 - 1.0).recip()
            * c.t_kelvin.powi(3)
    }

    /// U-value of the vertical cavity (W/m2-K).
    fn u_value(&self, c: &GapConditions) -> f64 {
        self.convective_conductance(c) + self.radiative_conductance(c)
    }

    fn u_value_at_angle(&self, c: &GapConditions) -> f64 {
        self.convective_conductance_at_angle(c) + self.radiative_conductance(c)
    }
}

fn default_gap_thickness() -> f64 {
    0.0125
}

/// A single-gas cavity, written as `WindowMaterial:Gas`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergyWindowMaterialGas {
    pub name: String,
    #[serde(default = "default_gap_thickness")]
    pub thickness: f64,
    #[serde(default)]
    pub gas_type: GasType,
}

impl EnergyWindowMaterialGas {
    /// # Errors
    ///
    /// Returns an error for an invalid name or non-positive thickness.
    pub fn new(name: &str, thickness: f64, gas_type: GasType) -> Result<Self> {
        let gas = Self {
            name: name.to_string(),
            thickness,
            gas_type,
        };
        gas.validate()?;
        Ok(gas)
    }

    pub fn validate(&self) -> Result<()> {
        check_ep_name(&self.name)?;
        check_positive("gas gap thickness", self.thickness)
    }

    /// Conductivity at 0C (W/m-K).
    pub fn conductivity(&self) -> f64 {
        self.conductivity_at(273.15)
    }

    pub fn to_idf(&self) -> String {
        let values = [
            self.name.clone(),
            self.gas_type.to_string(),
            self.thickness.to_string(),
        ];
        generate_idf_string(
            "WindowMaterial:Gas",
            &values,
            Some(&["name", "gas type", "thickness {m}"]),
        )
    }

    /// # Errors
    ///
    /// Returns an error if the text is not a `WindowMaterial:Gas` or a field is invalid.
    pub fn from_idf(text: &str) -> Result<Self> {
        const T: &str = "WindowMaterial:Gas";
        let f = parse_idf_string(text, Some(T))?;
        Self::new(
            field(&f, 0, T, "name")?,
            parse_f64(field(&f, 2, T, "thickness")?, T, "thickness")?,
            field(&f, 1, T, "gas type")?.parse()?,
        )
    }
}

impl GasGap for EnergyWindowMaterialGas {
    fn thickness(&self) -> f64 {
        self.thickness
    }

    fn molecular_weight(&self) -> f64 {
        self.gas_type.molecular_weight()
    }

    fn conductivity_at(&self, t_kelvin: f64) -> f64 {
        self.gas_type.conductivity_at(t_kelvin)
    }

    fn viscosity_at(&self, t_kelvin: f64) -> f64 {
        self.gas_type.viscosity_at(t_kelvin)
    }

    fn specific_heat_at(&self, t_kelvin: f64) -> f64 {
        self.gas_type.specific_heat_at(t_kelvin)
    }
}

/// One component of a gas mixture.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GasFraction {
    pub gas_type: GasType,
    /// Volumetric fraction of the mixture.
    pub gas_fraction: f64,
}

fn default_mixture() -> Vec<GasFraction> {
    vec![
        GasFraction {
            gas_type: GasType::Argon,
            gas_fraction: 0.9,
        },
        GasFraction {
            gas_type: GasType::Air,
            gas_fraction: 0.1,
        },
    ]
}

/// A cavity holding 2 to 4 gases, written as `WindowMaterial:GasMixture`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergyWindowMaterialGasMixture {
    pub name: String,
    #[serde(default = "default_gap_thickness")]
    pub thickness: f64,
    #[serde(rename = "gas_type_fraction", default = "default_mixture")]
    pub gases: Vec<GasFraction>,
}

impl EnergyWindowMaterialGasMixture {
    /// # Errors
    ///
    /// Returns an error unless there are 2 to 4 distinct gases whose fractions
    /// lie in (0, 1) and sum to 1.
    pub fn new(name: &str, thickness: f64, gases: Vec<GasFraction>) -> Result<Self> {
        let mix = Self {
            name: name.to_string(),
            thickness,
            gases,
        };
        mix.validate()?;
        Ok(mix)
    }

    pub fn validate(&self) -> Result<()> {
        check_ep_name(&self.name)?;
        check_positive("gas gap thickness", self.thickness)?;
        if !(2..=4).contains(&self.gases.len()) {
            return Err(Error::invalid(
                "gas mixture",
                format!("needs 2 to 4 gases, got {}", self.gases.len()),
            ));
        }
        for (i, g) in self.gases.iter().enumerate() {
            if self.gases[..i].iter().any(|o| o.gas_type == g.gas_type) {
                return Err(Error::invalid(
                    "gas mixture",
                    format!("{} appears more than once", g.gas_type),
                ));
            }
            if !(g.gas_fraction > 0.0 && g.gas_fraction < 1.0) {
                return Err(Error::out_of_range(
                    "gas fraction",
                    g.gas_fraction,
                    "between 0 and 1 exclusive",
                ));
            }
        }
        let total: f64 = self.gases.iter().map(|g| g.gas_fraction).sum();
        if (total - 1.0).abs() > 1e-6 {
            return Err(Error::out_of_range("sum of gas fractions", total, "1"));
        }
        Ok(())
    }

    pub fn gas_count(&self) -> usize {
        self.gases.len()
    }

    pub fn conductivity(&self) -> f64 {
        self.conductivity_at(273.15)
    }

    fn weighted(&self, prop: impl Fn(GasType) -> f64) -> f64 {
        self.gases
            .iter()
            .map(|g| prop(g.gas_type) * g.gas_fraction)
            .sum()
    }

    pub fn to_idf(&self) -> String {
        let mut values = vec![
            self.name.clone(),
            self.thickness.to_string(),
            self.gases.len().to_string(),
        ];
        let mut comments = vec![
            "name".to_string(),
            "thickness {m}".to_string(),
            "number of gases".to_string(),
        ];
        for (i, g) in self.gases.iter().enumerate() {
            values.push(g.gas_type.to_string());
            values.push(g.gas_fraction.to_string());
            comments.push(format!("gas {i} type"));
            comments.push(format!("gas {i} fraction"));
        }
        let comments: Vec<&str> = comments.iter().map(String::as_str).collect();
        generate_idf_string("WindowMaterial:GasMixture", &values, Some(&comments))
    }

    /// # Errors
    ///
    /// Returns an error if the text is not a `WindowMaterial:GasMixture` or the
    /// mixture is invalid.
    pub fn from_idf(text: &str) -> Result<Self> {
        const T: &str = "WindowMaterial:GasMixture";
        let f = parse_idf_string(text, Some(T))?;
        let count = field(&f, 2, T, "number of gases")?
            .parse::<usize>()
            .map_err(|_| Error::idf(T, "number of gases is not an integer"))?;
        let gases = (0..count)
            .map(|i| {
                Ok(GasFraction {
                    gas_type: field(&f, 3 + 2 * i, T, "gas type")?.parse()?,
                    gas_fraction: parse_f64(
                        field(&f, 4 + 2 * i, T, "gas fraction")?,
                        T,
                        "gas fraction",
                    )?,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Self::new(
            field(&f, 0, T, "name")?,
            parse_f64(field(&f, 1, T, "thickness")?, T, "thickness")?,
            gases,
        )
    }
}

impl GasGap for EnergyWindowMaterialGasMixture {
    fn thickness(&self) -> f64 {
        self.thickness
    }

    fn molecular_weight(&self) -> f64 {
        self.weighted(GasType::molecular_weight)
    }

    fn conductivity_at(&self, t_kelvin: f64) -> f64 {
        self.weighted(|g| g.conductivity_at(t_kelvin))
    }

    fn viscosity_at(&self, t_kelvin: f64) -> f64 {
        self.weighted(|g| g.viscosity_at(t_kelvin))
    }

    fn specific_heat_at(&self, t_kelvin: f64) -> f64 {
        self.weighted(|g| g.specific_heat_at(t_kelvin))
    }
}

fn d_specific_heat_ratio() -> f64 {
    1.0
}
fn d_custom_molecular_weight() -> f64 {
    20.0
}

/// A cavity of a gas given by its own property curves, written as
/// `WindowMaterial:Gas` with the `Custom` gas type.
///
/// Each property is `a + b * T + c * T^2` with `T` in Kelvin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergyWindowMaterialGasCustom {
    pub name: String,
    #[serde(default = "default_gap_thickness")]
    pub thickness: f64,
    pub conductivity_coeff_a: f64,
    pub viscosity_coeff_a: f64,
    pub specific_heat_coeff_a: f64,
    #[serde(default)]
    pub conductivity_coeff_b: f64,
    #[serde(default)]
    pub viscosity_coeff_b: f64,
    #[serde(default)]
    pub specific_heat_coeff_b: f64,
    #[serde(default)]
    pub conductivity_coeff_c: f64,
    #[serde(default)]
    pub viscosity_coeff_c: f64,
    #[serde(default)]
    pub specific_heat_coeff_c: f64,
    #[serde(default = "d_specific_heat_ratio")]
    pub specific_heat_ratio: f64,
    /// Grams per mol, from 20 to 200.
    #[serde(default = "d_custom_molecular_weight")]
    pub molecular_weight: f64,
}

impl EnergyWindowMaterialGasCustom {
    /// A gas with constant conductivity, viscosity and specific heat.
    ///
    /// # Errors
    ///
    /// Returns an error for an invalid name, non-positive thickness, or
    /// non-positive viscosity or specific heat.
    pub fn new(
        name: &str,
        thickness: f64,
        conductivity: f64,
        viscosity: f64,
        specific_heat: f64,
    ) -> Result<Self> {
        let gas = Self {
            name: name.to_string(),
            thickness,
            conductivity_coeff_a: conductivity,
            viscosity_coeff_a: viscosity,
            specific_heat_coeff_a: specific_heat,
            conductivity_coeff_b: 0.0,
            viscosity_coeff_b: 0.0,
            specific_heat_coeff_b: 0.0,
            conductivity_coeff_c: 0.0,
            viscosity_coeff_c: 0.0,
            specific_heat_coeff_c: 0.0,
            specific_heat_ratio: d_specific_heat_ratio(),
            molecular_weight: d_custom_molecular_weight(),
        };
        gas.validate()?;
        Ok(gas)
    }

    pub fn validate(&self) -> Result<()> {
        check_ep_name(&self.name)?;
        check_positive("gas gap thickness", self.thickness)?;
        check_positive("custom gas viscosity coefficient a", self.viscosity_coeff_a)?;
        check_positive(
            "custom gas specific heat coefficient a",
            self.specific_heat_coeff_a,
        )?;
        if !(self.specific_heat_ratio >= 1.0) {
            return Err(Error::out_of_range(
                "custom gas specific heat ratio",
                self.specific_heat_ratio,
                "at least 1",
            ));
        }
        check_range("custom gas molecular weight", self.molecular_weight, 20.0, 200.0)
    }

    pub fn conductivity(&self) -> f64 {
        self.conductivity_at(273.15)
    }

    pub fn to_idf(&self) -> String {
        let values = [
            self.name.clone(),
            "Custom".to_string(),
            self.thickness.to_string(),
            self.conductivity_coeff_a.to_string(),
            self.conductivity_coeff_b.to_string(),
            self.conductivity_coeff_c.to_string(),
            self.viscosity_coeff_a.to_string(),
            self.viscosity_coeff_b.to_string(),
            self.viscosity_coeff_c.to_string(),
            self.specific_heat_coeff_a.to_string(),
            self.specific_heat_coeff_b.to_string(),
            self.specific_heat_coeff_c.to_string(),
            self.molecular_weight.to_string(),
            self.specific_heat_ratio.to_string(),
        ];
        let comments = [
            "name",
            "gas type",
            "thickness {m}",
            "conductivity coeff a",
            "conductivity coeff b",
            "conductivity coeff c",
            "viscosity coeff a",
            "viscosity coeff b",
            "viscosity coeff c",
            "specific heat coeff a",
            "specific heat coeff b",
            "specific heat coeff c",
            "molecular weight",
            "specific heat ratio",
        ];
        generate_idf_string("WindowMaterial:Gas", &values, Some(&comments))
    }

    /// # Errors
    ///
    /// Returns an error unless the text is a `WindowMaterial:Gas` of the
    /// `Custom` gas type with valid coefficients.
    pub fn from_idf(text: &str) -> Result<Self> {
        const T: &str = "WindowMaterial:Gas";
        let f = parse_idf_string(text, Some(T))?;
        let gas_type = field(&f, 1, T, "gas type")?;
        if !gas_type.eq_ignore_ascii_case("Custom") {
            return Err(Error::idf(T, format!("expected a Custom gas, got \"{gas_type}\"")));
        }
        let num = |i: usize, label: &str| -> Result<f64> {
            parse_f64(field(&f, i, T, label)?, T, label)
        };
        let opt = |i: usize, label: &str, default: f64| -> Result<f64> {
            match f.get(i).map(|s| s.trim()) {
                None | Some("") => Ok(default),
                Some(v) => parse_f64(v, T, label),
            }
        };
        let gas = Self {
            name: field(&f, 0, T, "name")?.to_string(),
            thickness: num(2, "thickness")?,
            conductivity_coeff_a: num(3, "conductivity coefficient a")?,
            conductivity_coeff_b: opt(4, "conductivity coefficient b", 0.0)?,
            conductivity_coeff_c: opt(5, "conductivity coefficient c", 0.0)?,
            viscosity_coeff_a: num(6, "viscosity coefficient a")?,
            viscosity_coeff_b: opt(7, "viscosity coefficient b", 0.0)?,
            viscosity_coeff_c: opt(8, "viscosity coefficient c", 0.0)?,
            specific_heat_coeff_a: num(9, "specific heat coefficient a")?,
            specific_heat_coeff_b: opt(10, "specific heat coefficient b", 0.0)?,
            specific_heat_coeff_c: opt(11, "specific heat coefficient c", 0.0)?,
            molecular_weight: opt(12, "molecular weight", d_custom_molecular_weight())?,
            specific_heat_ratio: opt(13, "specific heat ratio", d_specific_heat_ratio())?,
        };
        gas.validate()?;
        Ok(gas)
    }
}

impl GasGap for EnergyWindowMaterialGasCustom {
    fn thickness(&self) -> f64 {
        self.thickness
    }

    fn molecular_weight(&self) -> f64 {
        self.molecular_weight
    }

    fn conductivity_at(&self, t_kelvin: f64) -> f64 {
        eval_curve(
            [
                self.conductivity_coeff_a,
                self.conductivity_coeff_b,
                self.conductivity_coeff_c,
            ],
            t_kelvin,
        )
    }

    fn viscosity_at(&self, t_kelvin: f64) -> f64 {
        eval_curve(
            [
                self.viscosity_coeff_a,
                self.viscosity_coeff_b,
                self.viscosity_coeff_c,
            ],
            t_kelvin,
        )
    }

    fn specific_heat_at(&self, t_kelvin: f64) -> f64 {
        eval_curve(
            [
                self.specific_heat_coeff_a,
                self.specific_heat_coeff_b,
                self.specific_heat_coeff_c,
            ],
            t_kelvin,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn air_gap() -> EnergyWindowMaterialGas {
        EnergyWindowMaterialGas::new("Air Gap", 0.0127, GasType::Air).unwrap()
    }

    #[test]
    fn air_properties_at_freezing() {
        let gas = air_gap();
        assert!((gas.conductivity() - 0.0240695).abs() < 1e-6);
        assert!((gas.density_at(273.15, 101325.0) - 1.2925).abs() < 1e-3);
        assert!((gas.prandtl_at(273.15) - 0.7264).abs() < 1e-3);
    }

    #[test]
    fn air_gap_u_value_is_typical() {
        let gas = air_gap();
        let u = gas.u_value(&GapConditions::default());
        assert!(u > 5.0 && u < 8.0, "u = {u}");
        let vertical = gas.u_value_at_angle(&GapConditions::default());
        assert!((u - vertical).abs() < 1e-12);
    }

    #[test]
    fn low_tilt_convects_more() {
        let gas = EnergyWindowMaterialGas::new("Wide", 0.05, GasType::Air).unwrap();
        let up = GapConditions {
            angle: 30.0,
            ..GapConditions::default()
        };
        let down = GapConditions {
            angle: 150.0,
            ..GapConditions::default()
        };
        assert!(gas.nusselt_at_angle(&up) > gas.nusselt_at_angle(&down));
        assert!(gas.nusselt_at_angle(&down) >= 1.0);
    }

    #[test]
    fn gas_type_parses_any_case() {
        assert_eq!("ARGON".parse::<GasType>().ok(), Some(GasType::Argon));
        assert!("Helium".parse::<GasType>().is_err());
    }

    #[test]
    fn gas_idf_order() {
        let gas = EnergyWindowMaterialGas::new("Argon Gap", 0.01, GasType::Argon).unwrap();
        let text = gas.to_idf();
        let fields = parse_idf_string(&text, Some("WindowMaterial:Gas")).unwrap();
        assert_eq!(fields, vec!["Argon Gap", "Argon", "0.01"]);
        assert_eq!(EnergyWindowMaterialGas::from_idf(&text).unwrap(), gas);
    }

    #[test]
    fn mixture_weights_properties() {
        let mix = EnergyWindowMaterialGasMixture::new("Mix", 0.0125, default_mixture()).unwrap();
        let expected = 0.9 * GasType::Argon.conductivity_at(273.15)
            + 0.1 * GasType::Air.conductivity_at(273.15);
        assert!((mix.conductivity() - expected).abs() < 1e-12);
        assert!((mix.molecular_weight() - (0.9 * 39.948 + 0.1 * 28.97)).abs() < 1e-9);
        let back = EnergyWindowMaterialGasMixture::from_idf(&mix.to_idf()).unwrap();
        assert_eq!(back, mix);
    }

    #[test]
    fn mixture_rejects_bad_fractions() {
        let bad_sum = vec![
            GasFraction {
                gas_type: GasType::Argon,
                gas_fraction: 0.5,
            },
            GasFraction {
                gas_type: GasType::Air,
                gas_fraction: 0.3,
            },
        ];
        assert!(EnergyWindowMaterialGasMixture::new("M", 0.01, bad_sum).is_err());
        let single = vec![GasFraction {
            gas_type: GasType::Air,
            gas_fraction: 0.99,
        }];
        assert!(EnergyWindowMaterialGasMixture::new("M", 0.01, single).is_err());
        let repeated = vec![
            GasFraction {
                gas_type: GasType::Air,
                gas_fraction: 0.5,
            },
            GasFraction {
                gas_type: GasType::Air,
                gas_fraction: 0.5,
            },
        ];
        assert!(EnergyWindowMaterialGasMixture::new("M", 0.01, repeated).is_err());
    }

    #[test]
    fn custom_gas_with_air_curves_matches_air() {
        let air = air_gap();
        let custom = EnergyWindowMaterialGasCustom {
            conductivity_coeff_b: 0.0000776,
            viscosity_coeff_b: 0.00000005,
            specific_heat_coeff_b: 0.012324,
            molecular_weight: 28.97,
            ..EnergyWindowMaterialGasCustom::new(
                "Custom Air",
                0.0127,
                0.002873,
                0.00000372,
                1002.73699951,
            )
            .unwrap()
        };
        let c = GapConditions::default();
        assert!((custom.conductivity() - air.conductivity()).abs() < 1e-12);
        assert!((custom.u_value(&c) - air.u_value(&c)).abs() < 1e-9);
    }

    #[test]
    fn custom_gas_idf_coefficient_order() {
        let co2 = EnergyWindowMaterialGasCustom {
            specific_heat_ratio: 1.4,
            molecular_weight: 44.0,
            ..EnergyWindowMaterialGasCustom::new("CO2", 0.0125, 0.0146, 0.000014, 827.73)
                .unwrap()
        };
        let text = co2.to_idf();
        let fields = parse_idf_string(&text, Some("WindowMaterial:Gas")).unwrap();
        assert_eq!(fields[1], "Custom");
        assert_eq!(fields[3], "0.0146");
        assert_eq!(fields[6], "0.000014");
        assert_eq!(fields[9], "827.73");
        assert_eq!(fields[12], "44");
        assert_eq!(EnergyWindowMaterialGasCustom::from_idf(&text).unwrap(), co2);
        assert!(EnergyWindowMaterialGas::from_idf(&text).is_err());
        let argon = EnergyWindowMaterialGas::new("Argon", 0.01, GasType::Argon).unwrap();
        assert!(EnergyWindowMaterialGasCustom::from_idf(&argon.to_idf()).is_err());
    }

    #[test]
    fn custom_gas_limits() {
        let gas = EnergyWindowMaterialGasCustom::new("Gas", 0.01, 0.01, 0.00001, 800.0).unwrap();
        let light = EnergyWindowMaterialGasCustom {
            molecular_weight: 4.0,
            ..gas.clone()
        };
        assert!(light.validate().is_err());
        let low_ratio = EnergyWindowMaterialGasCustom {
            specific_heat_ratio: 0.5,
            ..gas
        };
        assert!(low_ratio.validate().is_err());
    }
}
