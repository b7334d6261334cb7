//! Shade and blind layers for window constructions.
//!
//! A shade layer is rated together with the air between it and the glass, so
//! its resistance depends on where it sits in the construction.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::gas::{EnergyWindowMaterialGas, GapConditions, GasGap, GasType};
use crate::error::{Error, Result, check_ep_name, check_positive, check_range};
use crate::idf::reader::{field, parse_f64};
use crate::idf::{generate_idf_string, parse_idf_string};

fn d_infrared_transmittance() -> f64 {
    0.0
}
fn d_emissivity() -> f64 {
    0.9
}
fn d_distance_to_glass() -> f64 {
    0.05
}
fn d_opening_multiplier() -> f64 {
    0.5
}

/// Behaviour shared by shades and blinds.
pub trait ShadeLayer {
    /// Resistance of the shade itself (m2-K/W).
    fn r_value(&self) -> f64;
    fn emissivity(&self) -> f64;
    fn emissivity_back(&self) -> f64 {
        self.emissivity()
    }
    /// Distance between the shade and the neighbouring glass (m).
    fn distance_to_glass(&self) -> f64;

    /// Air gap between the shade and the glass.
    fn air_gap(&self) -> EnergyWindowMaterialGas {
        EnergyWindowMaterialGas {
            name: "Generic Shade Gap".to_string(),
            thickness: self.distance_to_glass(),
            gas_type: GasType::Air,
        }
    }

    /// Shade plus air gap when the shade is the outermost layer.
    ///
    /// `glass_emissivity` is the emissivity of the glazing behind the gap.
    fn r_value_exterior(&self, glass_emissivity: f64, c: &GapConditions) -> f64 {
        let gap = GapConditions {
            emissivity_1: self.emissivity_back(),
            emissivity_2: glass_emissivity,
            ..*c
        };
        self.r_value() + 1.0 / self.air_gap().u_value_at_angle(&gap)
    }

    /// Shade plus air gap when the shade is the innermost layer.
    fn r_value_interior(&self, glass_emissivity: f64, c: &GapConditions) -> f64 {
        let gap = GapConditions {
            emissivity_1: self.emissivity(),
            emissivity_2: glass_emissivity,
            ..*c
        };
        self.r_value() + 1.0 / self.air_gap().u_value_at_angle(&gap)
    }

    /// Shade plus an air gap on each side when it sits between two panes.
    fn r_value_between(&self, emissivity_1: f64, emissivity_2: f64, c: &GapConditions) -> f64 {
        let gap = self.air_gap();
        let side = |glass_emissivity: f64| GapConditions {
            emissivity_1: self.emissivity(),
            emissivity_2: glass_emissivity,
            ..*c
        };
        self.r_value()
            + 1.0 / gap.u_value_at_angle(&side(emissivity_1))
            + 1.0 / gap.u_value_at_angle(&side(emissivity_2))
    }
}

fn check_openings(openings: [f64; 4]) -> Result<()> {
    openings
        .into_iter()
        .try_for_each(|m| check_range("shade opening multiplier", m, 0.0, 1.0))
}

fn check_sum(label: &str, transmittance: f64, reflectance: f64) -> Result<()> {
    if transmittance + reflectance > 1.0 {
        return Err(Error::invalid(
            label,
            format!(
                "transmittance + reflectance is {} (above 1)",
                transmittance + reflectance
            ),
        ));
    }
    Ok(())
}

fn d_shade_thickness() -> f64 {
    0.005
}
fn d_shade_solar_transmittance() -> f64 {
    0.4
}
fn d_shade_solar_reflectance() -> f64 {
    0.5
}
fn d_shade_visible() -> f64 {
    0.4
}
fn d_shade_conductivity() -> f64 {
    0.9
}

/// A diffusing shade, written as `WindowMaterial:Shade`.
///
/// Optical properties are the same on both sides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergyWindowMaterialShade {
    pub name: String,
    #[serde(default = "d_shade_thickness")]
    pub thickness: f64,
    #[serde(default = "d_shade_solar_transmittance")]
    pub solar_transmittance: f64,
    #[serde(default = "d_shade_solar_reflectance")]
    pub solar_reflectance: f64,
    #[serde(default = "d_shade_visible")]
    pub visible_transmittance: f64,
    #[serde(default = "d_shade_visible")]
    pub visible_reflectance: f64,
    #[serde(default = "d_infrared_transmittance")]
    pub infrared_transmittance: f64,
    #[serde(default = "d_emissivity")]
    pub emissivity: f64,
    #[serde(default = "d_shade_conductivity")]
    pub conductivity: f64,
    #[serde(default = "d_distance_to_glass")]
    pub distance_to_glass: f64,
    #[serde(default = "d_opening_multiplier")]
    pub top_opening_multiplier: f64,
    #[serde(default = "d_opening_multiplier")]
    pub bottom_opening_multiplier: f64,
    #[serde(default = "d_opening_multiplier")]
    pub left_opening_multiplier: f64,
    #[serde(default = "d_opening_multiplier")]
    pub right_opening_multiplier: f64,
    /// Fraction of the shade open to air flow, at most 0.8.
    #[serde(default)]
    pub airflow_permeability: f64,
}

impl EnergyWindowMaterialShade {
    /// Creates a white diffusing shade with the given name.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is not a valid EnergyPlus name.
    pub fn new(name: &str) -> Result<Self> {
        let mat = Self {
            name: name.to_string(),
            thickness: d_shade_thickness(),
            solar_transmittance: d_shade_solar_transmittance(),
            solar_reflectance: d_shade_solar_reflectance(),
            visible_transmittance: d_shade_visible(),
            visible_reflectance: d_shade_visible(),
            infrared_transmittance: d_infrared_transmittance(),
            emissivity: d_emissivity(),
            conductivity: d_shade_conductivity(),
            distance_to_glass: d_distance_to_glass(),
            top_opening_multiplier: d_opening_multiplier(),
            bottom_opening_multiplier: d_opening_multiplier(),
            left_opening_multiplier: d_opening_multiplier(),
            right_opening_multiplier: d_opening_multiplier(),
            airflow_permeability: 0.0,
        };
        mat.validate()?;
        Ok(mat)
    }

    pub fn validate(&self) -> Result<()> {
        check_ep_name(&self.name)?;
        check_positive("shade thickness", self.thickness)?;
        check_positive("shade conductivity", self.conductivity)?;
        for (label, v) in [
            ("shade solar transmittance", self.solar_transmittance),
            ("shade solar reflectance", self.solar_reflectance),
            ("shade visible transmittance", self.visible_transmittance),
            ("shade visible reflectance", self.visible_reflectance),
            ("shade infrared transmittance", self.infrared_transmittance),
            ("shade emissivity", self.emissivity),
        ] {
            check_range(label, v, 0.0, 1.0)?;
        }
        check_sum("shade solar optics", self.solar_transmittance, self.solar_reflectance)?;
        check_sum(
            "shade visible optics",
            self.visible_transmittance,
            self.visible_reflectance,
        )?;
        check_range("shade distance to glass", self.distance_to_glass, 0.001, 1.0)?;
        check_openings(self.opening_multipliers())?;
        check_range("shade airflow permeability", self.airflow_permeability, 0.0, 0.8)
    }

    /// Top, bottom, left and right opening multipliers.
    pub fn opening_multipliers(&self) -> [f64; 4] {
        [
            self.top_opening_multiplier,
            self.bottom_opening_multiplier,
            self.left_opening_multiplier,
            self.right_opening_multiplier,
        ]
    }

    pub fn set_all_opening_multipliers(&mut self, multiplier: f64) {
        self.top_opening_multiplier = multiplier;
        self.bottom_opening_multiplier = multiplier;
        self.left_opening_multiplier = multiplier;
        self.right_opening_multiplier = multiplier;
    }

    pub fn u_value(&self) -> f64 {
        self.conductivity / self.thickness
    }

    pub fn to_idf(&self) -> String {
        let values = [
            self.name.clone(),
            self.solar_transmittance.to_string(),
            self.solar_reflectance.to_string(),
            self.visible_transmittance.to_string(),
            self.visible_reflectance.to_string(),
            self.emissivity.to_string(),
            self.infrared_transmittance.to_string(),
            self.thickness.to_string(),
            self.conductivity.to_string(),
            self.distance_to_glass.to_string(),
            self.top_opening_multiplier.to_string(),
            self.bottom_opening_multiplier.to_string(),
            self.left_opening_multiplier.to_string(),
            self.right_opening_multiplier.to_string(),
            self.airflow_permeability.to_string(),
        ];
        let comments = [
            "name",
            "solar transmittance",
            "solar reflectance",
            "visible transmittance",
            "visible reflectance",
            "emissivity",
            "infrared transmittance",
            "thickness {m}",
            "conductivity {W/m-K}",
            "distance to glass {m}",
            "top opening multiplier",
            "bottom opening multiplier",
            "left opening multiplier",
            "right opening multiplier",
            "airflow permeability",
        ];
        generate_idf_string("WindowMaterial:Shade", &values, Some(&comments))
    }

    /// # Errors
    ///
    /// Returns an error if the text is not a `WindowMaterial:Shade` or a
    /// property is out of range.
    pub fn from_idf(text: &str) -> Result<Self> {
        const T: &str = "WindowMaterial:Shade";
        let f = parse_idf_string(text, Some(T))?;
        let num = |i: usize, label: &str| -> Result<f64> {
            parse_f64(field(&f, i, T, label)?, T, label)
        };
        let opt = |i: usize, label: &str, default: f64| -> Result<f64> {
            match f.get(i).map(|s| s.trim()) {
                None | Some("") => Ok(default),
                Some(v) => parse_f64(v, T, label),
            }
        };
        let mat = Self {
            name: field(&f, 0, T, "name")?.to_string(),
            solar_transmittance: num(1, "solar transmittance")?,
            solar_reflectance: num(2, "solar reflectance")?,
            visible_transmittance: num(3, "visible transmittance")?,
            visible_reflectance: num(4, "visible reflectance")?,
            emissivity: num(5, "emissivity")?,
            infrared_transmittance: num(6, "infrared transmittance")?,
            thickness: num(7, "thickness")?,
            conductivity: num(8, "conductivity")?,
            distance_to_glass: opt(9, "distance to glass", d_distance_to_glass())?,
            top_opening_multiplier: opt(10, "top opening multiplier", d_opening_multiplier())?,
            bottom_opening_multiplier: opt(
                11,
                "bottom opening multiplier",
                d_opening_multiplier(),
            )?,
            left_opening_multiplier: opt(12, "left opening multiplier", d_opening_multiplier())?,
            right_opening_multiplier: opt(
                13,
                "right opening multiplier",
                d_opening_multiplier(),
            )?,
            airflow_permeability: opt(14, "airflow permeability", 0.0)?,
        };
        mat.validate()?;
        Ok(mat)
    }
}

impl ShadeLayer for EnergyWindowMaterialShade {
    fn r_value(&self) -> f64 {
        self.thickness / self.conductivity
    }

    fn emissivity(&self) -> f64 {
        self.emissivity
    }

    fn distance_to_glass(&self) -> f64 {
        self.distance_to_glass
    }
}

/// Direction the slats of a blind run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SlatOrientation {
    #[default]
    Horizontal,
    Vertical,
}

impl SlatOrientation {
    pub fn as_str(self) -> &'static str {
        match self {
            SlatOrientation::Horizontal => "Horizontal",
            SlatOrientation::Vertical => "Vertical",
        }
    }
}

impl fmt::Display for SlatOrientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SlatOrientation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        [SlatOrientation::Horizontal, SlatOrientation::Vertical]
            .into_iter()
            .find(|o| o.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                Error::invalid(
                    "slat orientation",
                    format!("\"{s}\" is not one of Horizontal, Vertical"),
                )
            })
    }
}

fn d_slat_width() -> f64 {
    0.025
}
fn d_slat_separation() -> f64 {
    0.01875
}
fn d_slat_thickness() -> f64 {
    0.001
}
fn d_slat_angle() -> f64 {
    45.0
}
fn d_slat_conductivity() -> f64 {
    221.0
}
fn d_blind_reflectance() -> f64 {
    0.5
}
fn d_maximum_slat_angle() -> f64 {
    180.0
}

/// A blind of flat, evenly spaced slats, written as `WindowMaterial:Blind`.
///
/// Back reflectances and emissivity left as `None` match the front.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergyWindowMaterialBlind {
    pub name: String,
    #[serde(default)]
    pub slat_orientation: SlatOrientation,
    #[serde(default = "d_slat_width")]
    pub slat_width: f64,
    #[serde(default = "d_slat_separation")]
    pub slat_separation: f64,
    #[serde(default = "d_slat_thickness")]
    pub slat_thickness: f64,
    /// Degrees between the slats and the glazing normal.
    #[serde(default = "d_slat_angle")]
    pub slat_angle: f64,
    #[serde(default = "d_slat_conductivity")]
    pub slat_conductivity: f64,
    #[serde(default)]
    pub beam_solar_transmittance: f64,
    #[serde(default = "d_blind_reflectance")]
    pub beam_solar_reflectance: f64,
    #[serde(default)]
    pub beam_solar_reflectance_back: Option<f64>,
    #[serde(default)]
    pub diffuse_solar_transmittance: f64,
    #[serde(default = "d_blind_reflectance")]
    pub diffuse_solar_reflectance: f64,
    #[serde(default)]
    pub diffuse_solar_reflectance_back: Option<f64>,
    #[serde(default)]
    pub beam_visible_transmittance: f64,
    #[serde(default = "d_blind_reflectance")]
    pub beam_visible_reflectance: f64,
    #[serde(default)]
    pub beam_visible_reflectance_back: Option<f64>,
    #[serde(default)]
    pub diffuse_visible_transmittance: f64,
    #[serde(default = "d_blind_reflectance")]
    pub diffuse_visible_reflectance: f64,
    #[serde(default)]
    pub diffuse_visible_reflectance_back: Option<f64>,
    #[serde(default = "d_infrared_transmittance")]
    pub infrared_transmittance: f64,
    #[serde(default = "d_emissivity")]
    pub emissivity: f64,
    #[serde(default)]
    pub emissivity_back: Option<f64>,
    #[serde(default = "d_distance_to_glass")]
    pub distance_to_glass: f64,
    #[serde(default = "d_opening_multiplier")]
    pub top_opening_multiplier: f64,
    #[serde(default = "d_opening_multiplier")]
    pub bottom_opening_multiplier: f64,
    #[serde(default = "d_opening_multiplier")]
    pub left_opening_multiplier: f64,
    #[serde(default = "d_opening_multiplier")]
    pub right_opening_multiplier: f64,
    #[serde(default)]
    pub minimum_slat_angle: f64,
    #[serde(default = "d_maximum_slat_angle")]
    pub maximum_slat_angle: f64,
}

impl EnergyWindowMaterialBlind {
    /// Creates horizontal metal blinds with the given name.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is not a valid EnergyPlus name.
    pub fn new(name: &str) -> Result<Self> {
        let mat = Self {
            name: name.to_string(),
            slat_orientation: SlatOrientation::default(),
            slat_width: d_slat_width(),
            slat_separation: d_slat_separation(),
            slat_thickness: d_slat_thickness(),
            slat_angle: d_slat_angle(),
            slat_conductivity: d_slat_conductivity(),
            beam_solar_transmittance: 0.0,
            beam_solar_reflectance: d_blind_reflectance(),
            beam_solar_reflectance_back: None,
            diffuse_solar_transmittance: 0.0,
            diffuse_solar_reflectance: d_blind_reflectance(),
            diffuse_solar_reflectance_back: None,
            beam_visible_transmittance: 0.0,
            beam_visible_reflectance: d_blind_reflectance(),
            beam_visible_reflectance_back: None,
            diffuse_visible_transmittance: 0.0,
            diffuse_visible_reflectance: d_blind_reflectance(),
            diffuse_visible_reflectance_back: None,
            infrared_transmittance: d_infrared_transmittance(),
            emissivity: d_emissivity(),
            emissivity_back: None,
            distance_to_glass: d_distance_to_glass(),
            top_opening_multiplier: d_opening_multiplier(),
            bottom_opening_multiplier: d_opening_multiplier(),
            left_opening_multiplier: d_opening_multiplier(),
            right_opening_multiplier: d_opening_multiplier(),
            minimum_slat_angle: 0.0,
            maximum_slat_angle: d_maximum_slat_angle(),
        };
        mat.validate()?;
        Ok(mat)
    }

    pub fn validate(&self) -> Result<()> {
        check_ep_name(&self.name)?;
        check_range("blind slat width", self.slat_width, 0.0, 1.0)?;
        check_range("blind slat separation", self.slat_separation, 0.0, 1.0)?;
        check_range("blind slat thickness", self.slat_thickness, 0.0, 0.1)?;
        check_positive("blind slat thickness", self.slat_thickness)?;
        check_positive("blind slat conductivity", self.slat_conductivity)?;
        for (label, v) in [
            ("blind slat angle", self.slat_angle),
            ("blind minimum slat angle", self.minimum_slat_angle),
            ("blind maximum slat angle", self.maximum_slat_angle),
        ] {
            check_range(label, v, 0.0, 180.0)?;
        }
        if self.minimum_slat_angle >= self.maximum_slat_angle {
            return Err(Error::invalid(
                "blind slat angles",
                format!(
                    "minimum {} is not below maximum {}",
                    self.minimum_slat_angle, self.maximum_slat_angle
                ),
            ));
        }
        let optics = [
            (
                "blind beam solar",
                self.beam_solar_transmittance,
                self.beam_solar_reflectance,
                self.beam_solar_reflectance_back(),
            ),
            (
                "blind diffuse solar",
                self.diffuse_solar_transmittance,
                self.diffuse_solar_reflectance,
                self.diffuse_solar_reflectance_back(),
            ),
            (
                "blind beam visible",
                self.beam_visible_transmittance,
                self.beam_visible_reflectance,
                self.beam_visible_reflectance_back(),
            ),
            (
                "blind diffuse visible",
                self.diffuse_visible_transmittance,
                self.diffuse_visible_reflectance,
                self.diffuse_visible_reflectance_back(),
            ),
        ];
        for (label, t, front, back) in optics {
            for v in [t, front, back] {
                check_range(label, v, 0.0, 1.0)?;
            }
            check_sum(label, t, front)?;
            check_sum(label, t, back)?;
        }
        check_range("blind infrared transmittance", self.infrared_transmittance, 0.0, 1.0)?;
        check_range("blind emissivity", self.emissivity, 0.0, 1.0)?;
        check_range("blind emissivity back", ShadeLayer::emissivity_back(self), 0.0, 1.0)?;
        check_range("blind distance to glass", self.distance_to_glass, 0.001, 1.0)?;
        check_openings([
            self.top_opening_multiplier,
            self.bottom_opening_multiplier,
            self.left_opening_multiplier,
            self.right_opening_multiplier,
        ])
    }

    pub fn beam_solar_reflectance_back(&self) -> f64 {
        self.beam_solar_reflectance_back
            .unwrap_or(self.beam_solar_reflectance)
    }

    pub fn diffuse_solar_reflectance_back(&self) -> f64 {
        self.diffuse_solar_reflectance_back
            .unwrap_or(self.diffuse_solar_reflectance)
    }

    pub fn beam_visible_reflectance_back(&self) -> f64 {
        self.beam_visible_reflectance_back
            .unwrap_or(self.beam_visible_reflectance)
    }

    pub fn diffuse_visible_reflectance_back(&self) -> f64 {
        self.diffuse_visible_reflectance_back
            .unwrap_or(self.diffuse_visible_reflectance)
    }

    /// Sets beam and diffuse solar transmittance together.
    pub fn set_all_solar_transmittance(&mut self, transmittance: f64) {
        self.beam_solar_transmittance = transmittance;
        self.diffuse_solar_transmittance = transmittance;
    }

    /// Sets every solar reflectance, clearing the back overrides.
    pub fn set_all_solar_reflectance(&mut self, reflectance: f64) {
        self.beam_solar_reflectance = reflectance;
        self.beam_solar_reflectance_back = None;
        self.diffuse_solar_reflectance = reflectance;
        self.diffuse_solar_reflectance_back = None;
    }

    pub fn set_all_visible_transmittance(&mut self, transmittance: f64) {
        self.beam_visible_transmittance = transmittance;
        self.diffuse_visible_transmittance = transmittance;
    }

    pub fn set_all_visible_reflectance(&mut self, reflectance: f64) {
        self.beam_visible_reflectance = reflectance;
        self.beam_visible_reflectance_back = None;
        self.diffuse_visible_reflectance = reflectance;
        self.diffuse_visible_reflectance_back = None;
    }

    /// U-value of the slats closed flat (W/m2-K).
    pub fn u_value(&self) -> f64 {
        self.slat_conductivity / self.slat_thickness
    }

    pub fn to_idf(&self) -> String {
        let values = [
            self.name.clone(),
            self.slat_orientation.to_string(),
            self.slat_width.to_string(),
            self.slat_separation.to_string(),
            self.slat_thickness.to_string(),
            self.slat_angle.to_string(),
            self.slat_conductivity.to_string(),
            self.beam_solar_transmittance.to_string(),
            self.beam_solar_reflectance.to_string(),
            self.beam_solar_reflectance_back().to_string(),
            self.diffuse_solar_transmittance.to_string(),
            self.diffuse_solar_reflectance.to_string(),
            self.diffuse_solar_reflectance_back().to_string(),
            self.beam_visible_transmittance.to_string(),
            self.beam_visible_reflectance.to_string(),
            self.beam_visible_reflectance_back().to_string(),
            self.diffuse_visible_transmittance.to_string(),
            self.diffuse_visible_reflectance.to_string(),
            self.diffuse_visible_reflectance_back().to_string(),
            self.infrared_transmittance.to_string(),
            self.emissivity.to_string(),
            ShadeLayer::emissivity_back(self).to_string(),
            self.distance_to_glass.to_string(),
            self.top_opening_multiplier.to_string(),
            self.bottom_opening_multiplier.to_string(),
            self.left_opening_multiplier.to_string(),
            self.right_opening_multiplier.to_string(),
            self.minimum_slat_angle.to_string(),
            self.maximum_slat_angle.to_string(),
        ];
        let comments = [
            "name",
            "slat orientation",
            "slat width {m}",
            "slat separation {m}",
            "slat thickness {m}",
            "slat angle {deg}",
            "slat conductivity {W/m-K}",
            "beam solar transmittance",
            "beam solar reflectance front",
            "beam solar reflectance back",
            "diffuse solar transmittance",
            "diffuse solar reflectance front",
            "diffuse solar reflectance back",
            "beam visible transmittance",
            "beam visible reflectance front",
            "beam visible reflectance back",
            "diffuse visible transmittance",
            "diffuse visible reflectance front",
            "diffuse visible reflectance back",
            "infrared transmittance",
            "emissivity front",
            "emissivity back",
            "distance to glass {m}",
            "top opening multiplier",
            "bottom opening multiplier",
            "left opening multiplier",
            "right opening multiplier",
            "minimum slat angle {deg}",
            "maximum slat angle {deg}",
        ];
        generate_idf_string("WindowMaterial:Blind", &values, Some(&comments))
    }

    /// # Errors
    ///
    /// Returns an error if the text is not a `WindowMaterial:Blind` or a
    /// property is out of range.
    pub fn from_idf(text: &str) -> Result<Self> {
        const T: &str = "WindowMaterial:Blind";
        let f = parse_idf_string(text, Some(T))?;
        let num = |i: usize, label: &str| -> Result<f64> {
            parse_f64(field(&f, i, T, label)?, T, label)
        };
        let opt = |i: usize, label: &str, default: f64| -> Result<f64> {
            match f.get(i).map(|s| s.trim()) {
                None | Some("") => Ok(default),
                Some(v) => parse_f64(v, T, label),
            }
        };
        let mat = Self {
            name: field(&f, 0, T, "name")?.to_string(),
            slat_orientation: field(&f, 1, T, "slat orientation")?.parse()?,
            slat_width: num(2, "slat width")?,
            slat_separation: num(3, "slat separation")?,
            slat_thickness: opt(4, "slat thickness", d_slat_thickness())?,
            slat_angle: opt(5, "slat angle", d_slat_angle())?,
            slat_conductivity: opt(6, "slat conductivity", d_slat_conductivity())?,
            beam_solar_transmittance: opt(7, "beam solar transmittance", 0.0)?,
            beam_solar_reflectance: num(8, "beam solar reflectance")?,
            beam_solar_reflectance_back: Some(num(9, "beam solar reflectance back")?),
            diffuse_solar_transmittance: num(10, "diffuse solar transmittance")?,
            diffuse_solar_reflectance: num(11, "diffuse solar reflectance")?,
            diffuse_solar_reflectance_back: Some(num(12, "diffuse solar reflectance back")?),
            beam_visible_transmittance: opt(13, "beam visible transmittance", 0.0)?,
            beam_visible_reflectance: num(14, "beam visible reflectance")?,
            beam_visible_reflectance_back: Some(num(15, "beam visible reflectance back")?),
            diffuse_visible_transmittance: opt(16, "diffuse visible transmittance", 0.0)?,
            diffuse_visible_reflectance: num(17, "diffuse visible reflectance")?,
            diffuse_visible_reflectance_back: Some(num(
                18,
                "diffuse visible reflectance back",
            )?),
            infrared_transmittance: opt(19, "infrared transmittance", 0.0)?,
            emissivity: opt(20, "emissivity", d_emissivity())?,
            emissivity_back: Some(opt(21, "emissivity back", d_emissivity())?),
            distance_to_glass: opt(22, "distance to glass", d_distance_to_glass())?,
            top_opening_multiplier: opt(23, "top opening multiplier", d_opening_multiplier())?,
            bottom_opening_multiplier: opt(
                24,
                "bottom opening multiplier",
                d_opening_multiplier(),
            )?,
            left_opening_multiplier: opt(25, "left opening multiplier", d_opening_multiplier())?,
            right_opening_multiplier: opt(
                26,
                "right opening multiplier",
                d_opening_multiplier(),
            )?,
            minimum_slat_angle: opt(27, "minimum slat angle", 0.0)?,
            maximum_slat_angle: opt(28, "maximum slat angle", d_maximum_slat_angle())?,
        };
        mat.validate()?;
        Ok(mat)
    }
}

impl ShadeLayer for EnergyWindowMaterialBlind {
    /// Resistance of the slats closed flat.
    fn r_value(&self) -> f64 {
        self.slat_thickness / self.slat_conductivity
    }

    fn emissivity(&self) -> f64 {
        self.emissivity
    }

    fn emissivity_back(&self) -> f64 {
        self.emissivity_back.unwrap_or(self.emissivity)
    }

    fn distance_to_glass(&self) -> f64 {
        self.distance_to_glass
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn insulating_shade() -> EnergyWindowMaterialShade {
        EnergyWindowMaterialShade {
            thickness: 0.025,
            solar_transmittance: 0.15,
            solar_reflectance: 0.5,
            visible_transmittance: 0.25,
            visible_reflectance: 0.5,
            emissivity: 0.4,
            conductivity: 0.2,
            distance_to_glass: 0.1,
            ..EnergyWindowMaterialShade::new("Low-e Diffusing Shade").unwrap()
        }
    }

    #[test]
    fn shade_defaults_and_r_value() {
        let shade = EnergyWindowMaterialShade::new("Shade").unwrap();
        assert!((shade.r_value() - 0.005 / 0.9).abs() < 1e-12);
        assert!((shade.u_value() - 180.0).abs() < 1e-9);
        assert_eq!(shade.opening_multipliers(), [0.5; 4]);
        assert!((ShadeLayer::emissivity_back(&shade) - 0.9).abs() < 1e-12);
    }

    #[test]
    fn shade_rejects_bad_optics() {
        let mut shade = EnergyWindowMaterialShade::new("Shade").unwrap();
        shade.solar_transmittance = 0.6;
        assert!(shade.validate().is_err());
        let mut shade = EnergyWindowMaterialShade::new("Shade").unwrap();
        shade.airflow_permeability = 0.9;
        assert!(shade.validate().is_err());
        let mut shade = EnergyWindowMaterialShade::new("Shade").unwrap();
        shade.distance_to_glass = 0.0;
        assert!(shade.validate().is_err());
    }

    #[test]
    fn gap_resistance_adds_to_the_shade() {
        let shade = insulating_shade();
        let c = GapConditions {
            delta_t: 7.5,
            ..GapConditions::default()
        };
        let exterior = shade.r_value_exterior(0.84, &c);
        let interior = shade.r_value_interior(0.84, &c);
        let between = shade.r_value_between(0.84, 0.84, &c);
        assert!(exterior > shade.r_value());
        assert!((exterior - interior).abs() < 1e-12);
        let gap = between - shade.r_value();
        assert!((gap - 2.0 * (interior - shade.r_value())).abs() < 1e-9);
        // a low-e pane facing the gap cuts radiation across it
        assert!(shade.r_value_interior(0.05, &c) > interior);
    }

    #[test]
    fn shade_idf_keeps_distance_to_glass() {
        let shade = insulating_shade();
        let text = shade.to_idf();
        assert!(text.contains("0.1,"));
        let back = EnergyWindowMaterialShade::from_idf(&text).unwrap();
        assert_eq!(back, shade);
    }

    #[test]
    fn blind_back_values_follow_front() {
        let mut blind = EnergyWindowMaterialBlind::new("Blind").unwrap();
        assert!((blind.r_value() - 0.001 / 221.0).abs() < 1e-15);
        assert!((blind.beam_solar_reflectance_back() - 0.5).abs() < 1e-12);
        blind.emissivity_back = Some(0.2);
        assert!((ShadeLayer::emissivity_back(&blind) - 0.2).abs() < 1e-12);
        blind.set_all_solar_reflectance(0.7);
        assert!((blind.diffuse_solar_reflectance_back() - 0.7).abs() < 1e-12);
        assert!(blind.validate().is_ok());
    }

    #[test]
    fn blind_rejects_crossed_slat_angles() {
        let blind = EnergyWindowMaterialBlind {
            minimum_slat_angle: 120.0,
            maximum_slat_angle: 60.0,
            ..EnergyWindowMaterialBlind::new("Blind").unwrap()
        };
        assert!(blind.validate().is_err());
        let blind = EnergyWindowMaterialBlind {
            beam_solar_transmittance: 0.6,
            ..EnergyWindowMaterialBlind::new("Blind").unwrap()
        };
        assert!(blind.validate().is_err());
    }

    #[test]
    fn blind_idf_field_order() {
        let blind = EnergyWindowMaterialBlind {
            slat_orientation: SlatOrientation::Vertical,
            slat_thickness: 0.003,
            slat_angle: 90.0,
            slat_conductivity: 0.2,
            ..EnergyWindowMaterialBlind::new("Plastic Blind").unwrap()
        };
        let text = blind.to_idf();
        let fields = parse_idf_string(&text, Some("WindowMaterial:Blind")).unwrap();
        assert_eq!(fields.len(), 29);
        assert_eq!(fields[1], "Vertical");
        assert_eq!(fields[6], "0.2");
        let back = EnergyWindowMaterialBlind::from_idf(&text).unwrap();
        assert_eq!(back.slat_orientation, SlatOrientation::Vertical);
        assert!((back.r_value() - 0.015).abs() < 1e-12);
        assert_eq!(back.beam_solar_reflectance_back, Some(0.5));
    }
}
