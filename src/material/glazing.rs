//! Glass panes and whole-system glazing.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result, check_ep_name, check_positive, check_range};
use crate::idf::reader::{field, parse_f64};
use crate::idf::{generate_idf_string, parse_idf_string, yes_no};

fn d_thickness() -> f64 {
    0.003
}
fn d_solar_transmittance() -> f64 {
    0.85
}
fn d_reflectance() -> f64 {
    0.075
}
fn d_visible_transmittance() -> f64 {
    0.9
}
fn d_emissivity() -> f64 {
    0.84
}
fn d_conductivity() -> f64 {
    0.9
}
fn d_dirt() -> f64 {
    1.0
}

/// A single pane of glass, written as `WindowMaterial:Glazing` with
/// spectrally averaged optical data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergyWindowMaterialGlazing {
    pub name: String,
    #[serde(default = "d_thickness")]
    pub thickness: f64,
    #[serde(default = "d_solar_transmittance")]
    pub solar_transmittance: f64,
    #[serde(default = "d_reflectance")]
    pub solar_reflectance: f64,
    /// Back side reflectance; `None` matches the front.
    #[serde(default)]
    pub solar_reflectance_back: Option<f64>,
    #[serde(default = "d_visible_transmittance")]
    pub visible_transmittance: f64,
    #[serde(default = "d_reflectance")]
    pub visible_reflectance: f64,
    #[serde(default)]
    pub visible_reflectance_back: Option<f64>,
    #[serde(default)]
    pub infrared_transmittance: f64,
    #[serde(default = "d_emissivity")]
    pub emissivity: f64,
    #[serde(default = "d_emissivity")]
    pub emissivity_back: f64,
    #[serde(default = "d_conductivity")]
    pub conductivity: f64,
    #[serde(default = "d_dirt")]
    pub dirt_correction: f64,
    #[serde(default)]
    pub solar_diffusing: bool,
}

impl EnergyWindowMaterialGlazing {
    /// Creates clear 3mm glass with the given name.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is not a valid EnergyPlus name.
    pub fn clear(name: &str) -> Result<Self> {
        let mat = Self {
            name: name.to_string(),
            thickness: d_thickness(),
            solar_transmittance: d_solar_transmittance(),
            solar_reflectance: d_reflectance(),
            solar_reflectance_back: None,
            visible_transmittance: d_visible_transmittance(),
            visible_reflectance: d_reflectance(),
            visible_reflectance_back: None,
            infrared_transmittance: 0.0,
            emissivity: d_emissivity(),
            emissivity_back: d_emissivity(),
            conductivity: d_conductivity(),
            dirt_correction: d_dirt(),
            solar_diffusing: false,
        };
        mat.validate()?;
        Ok(mat)
    }

    pub fn validate(&self) -> Result<()> {
        check_ep_name(&self.name)?;
        check_positive("glazing thickness", self.thickness)?;
        check_positive("glazing conductivity", self.conductivity)?;
        let fractions = [
            ("glazing solar transmittance", Some(self.solar_transmittance)),
            ("glazing solar reflectance", Some(self.solar_reflectance)),
            ("glazing solar reflectance back", self.solar_reflectance_back),
            ("glazing visible transmittance", Some(self.visible_transmittance)),
            ("glazing visible reflectance", Some(self.visible_reflectance)),
            ("glazing visible reflectance back", self.visible_reflectance_back),
            ("glazing infrared transmittance", Some(self.infrared_transmittance)),
            ("glazing emissivity", Some(self.emissivity)),
            ("glazing emissivity back", Some(self.emissivity_back)),
            ("glazing dirt correction", Some(self.dirt_correction)),
        ];
        for (label, value) in fractions {
            if let Some(v) = value {
                check_range(label, v, 0.0, 1.0)?;
            }
        }
        let pairs = [
            ("solar", self.solar_transmittance, self.solar_reflectance),
            ("solar back", self.solar_transmittance, self.solar_reflectance_back()),
            ("visible", self.visible_transmittance, self.visible_reflectance),
            ("visible back", self.visible_transmittance, self.visible_reflectance_back()),
        ];
        for (label, t, r) in pairs {
            if t + r > 1.0 {
                return Err(Error::invalid(
                    "glazing optics",
                    format!("{label} transmittance + reflectance is {} (above 1)", t + r),
                ));
            }
        }
        Ok(())
    }

    pub fn solar_reflectance_back(&self) -> f64 {
        self.solar_reflectance_back.unwrap_or(self.solar_reflectance)
    }

    pub fn visible_reflectance_back(&self) -> f64 {
        self.visible_reflectance_back.unwrap_or(self.visible_reflectance)
    }

    pub fn resistivity(&self) -> f64 {
        1.0 / self.conductivity
    }

    /// Resistance of the pane without air films (m2-K/W).
    pub fn r_value(&self) -> f64 {
        self.thickness / self.conductivity
    }

    pub fn u_value(&self) -> f64 {
        1.0 / self.r_value()
    }

    /// Sets the R-value by changing conductivity.
    ///
    /// # Errors
    ///
    /// Returns an error if `r_value` is not positive.
    pub fn set_r_value(&mut self, r_value: f64) -> Result<()> {
        check_positive("glazing r-value", r_value)?;
        self.conductivity = self.thickness / r_value;
        Ok(())
    }

    pub fn to_idf(&self) -> String {
        let values = [
            self.name.clone(),
            "SpectralAverage".to_string(),
            String::new(),
            self.thickness.to_string(),
            self.solar_transmittance.to_string(),
            self.solar_reflectance.to_string(),
            self.solar_reflectance_back().to_string(),
            self.visible_transmittance.to_string(),
            self.visible_reflectance.to_string(),
            self.visible_reflectance_back().to_string(),
            self.infrared_transmittance.to_string(),
            self.emissivity.to_string(),
            self.emissivity_back.to_string(),
            self.conductivity.to_string(),
            self.dirt_correction.to_string(),
            yes_no(self.solar_diffusing).to_string(),
        ];
        let comments = [
            "name",
            "optical data type",
            "spectral data set name",
            "thickness {m}",
            "solar transmittance",
            "solar reflectance front",
            "solar reflectance back",
            "visible transmittance",
            "visible reflectance front",
            "visible reflectance back",
            "infrared_transmittance",
            "emissivity front",
            "emissivity back",
            "conductivity {W/m-K}",
            "dirt correction factor",
            "solar diffusing",
        ];
        generate_idf_string("WindowMaterial:Glazing", &values, Some(&comments))
    }

    /// Parses a spectrally averaged `WindowMaterial:Glazing`.
    ///
    /// # Errors
    ///
    /// Returns an error for other optical data types, missing fields, or
    /// properties out of range.
    pub fn from_idf(text: &str) -> Result<Self> {
        const T: &str = "WindowMaterial:Glazing";
        let f = parse_idf_string(text, Some(T))?;
        let optical = field(&f, 1, T, "optical data type")?;
        if !optical.eq_ignore_ascii_case("SpectralAverage") {
            return Err(Error::idf(
                T,
                format!("expected SpectralAverage optical data, got \"{optical}\""),
            ));
        }
        let num = |i: usize, label: &str| -> Result<f64> {
            parse_f64(field(&f, i, T, label)?, T, label)
        };
        let dirt_correction = match f.get(14).map(|s| s.trim()) {
            None | Some("") => d_dirt(),
            Some(v) => parse_f64(v, T, "dirt correction")?,
        };
        let mat = Self {
            name: field(&f, 0, T, "name")?.to_string(),
            thickness: num(3, "thickness")?,
            solar_transmittance: num(4, "solar transmittance")?,
            solar_reflectance: num(5, "solar reflectance")?,
            solar_reflectance_back: Some(num(6, "solar reflectance back")?),
            visible_transmittance: num(7, "visible transmittance")?,
            visible_reflectance: num(8, "visible reflectance")?,
            visible_reflectance_back: Some(num(9, "visible reflectance back")?),
            infrared_transmittance: num(10, "infrared transmittance")?,
            emissivity: num(11, "emissivity")?,
            emissivity_back: num(12, "emissivity back")?,
            conductivity: num(13, "conductivity")?,
            dirt_correction,
            solar_diffusing: f
                .get(15)
                .is_some_and(|s| !s.trim().is_empty() && !s.trim().eq_ignore_ascii_case("No")),
        };
        mat.validate()?;
        Ok(mat)
    }
}

fn d_vt() -> f64 {
    0.6
}

/// An entire glazing system (glass, gaps and frame) described by its
/// rated U-factor, SHGC and VT. Written as `WindowMaterial:SimpleGlazingSystem`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergyWindowMaterialSimpleGlazSys {
    pub name: String,
    /// U-factor including air films (W/m2-K).
    pub u_factor: f64,
    pub shgc: f64,
    #[serde(default = "d_vt")]
    pub vt: f64,
}

impl EnergyWindowMaterialSimpleGlazSys {
    /// Combined interior and exterior film resistance (m2-K/W).
    pub const FILM_RESISTANCE: f64 = 1.0 / 23.0 + 1.0 / 7.0;

    /// # Errors
    ///
    /// Returns an error unless `u_factor` is in (0, 12] and `shgc` and `vt`
    /// are in (0, 1).
    pub fn new(name: &str, u_factor: f64, shgc: f64, vt: f64) -> Result<Self> {
        let mat = Self {
            name: name.to_string(),
            u_factor,
            shgc,
            vt,
        };
        mat.validate()?;
        Ok(mat)
    }

    pub fn validate(&self) -> Result<()> {
        check_ep_name(&self.name)?;
        if !(self.u_factor > 0.0 && self.u_factor <= 12.0) {
            return Err(Error::out_of_range(
                "glazing system u-factor",
                self.u_factor,
                "greater than 0 and at most 12",
            ));
        }
        for (label, v) in [("glazing system shgc", self.shgc), ("glazing system vt", self.vt)] {
            if !(v > 0.0 && v < 1.0) {
                return Err(Error::out_of_range(label, v, "between 0 and 1 exclusive"));
            }
        }
        Ok(())
    }

    pub fn r_factor(&self) -> f64 {
        1.0 / self.u_factor
    }

    /// Resistance without air films (m2-K/W).
    pub fn r_value(&self) -> f64 {
        self.r_factor() - Self::FILM_RESISTANCE
    }

    pub fn u_value(&self) -> f64 {
        1.0 / self.r_value()
    }

    pub fn to_idf(&self) -> String {
        let values = [
            self.name.clone(),
            self.u_factor.to_string(),
            self.shgc.to_string(),
            self.vt.to_string(),
        ];
        generate_idf_string(
            "WindowMaterial:SimpleGlazingSystem",
            &values,
            Some(&["name", "u-factor {W/m2-K}", "shgc", "vt"]),
        )
    }

    /// # Errors
    ///
    /// Returns an error if the text is not a `WindowMaterial:SimpleGlazingSystem`
    /// or a value is out of range.
    pub fn from_idf(text: &str) -> Result<Self> {
        const T: &str = "WindowMaterial:SimpleGlazingSystem";
        let f = parse_idf_string(text, Some(T))?;
        let vt = match f.get(3).map(|s| s.trim()) {
            None | Some("") => d_vt(),
            Some(v) => parse_f64(v, T, "vt")?,
        };
        Self::new(
            field(&f, 0, T, "name")?,
            parse_f64(field(&f, 1, T, "u-factor")?, T, "u-factor")?,
            parse_f64(field(&f, 2, T, "shgc")?, T, "shgc")?,
            vt,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lowe() -> EnergyWindowMaterialGlazing {
        EnergyWindowMaterialGlazing {
            solar_transmittance: 0.45,
            solar_reflectance: 0.36,
            visible_transmittance: 0.714,
            visible_reflectance: 0.207,
            emissivity_back: 0.0466,
            ..EnergyWindowMaterialGlazing::clear("Low-e Glass").unwrap()
        }
    }

    #[test]
    fn back_reflectance_follows_front() {
        let g = lowe();
        assert!((g.solar_reflectance_back() - 0.36).abs() < 1e-12);
        assert!((g.visible_reflectance_back() - 0.207).abs() < 1e-12);
        assert!((g.r_value() - 0.003 / 0.9).abs() < 1e-12);
    }

    #[test]
    fn optics_must_conserve_energy() {
        let mut g = lowe();
        g.solar_reflectance = 0.6;
        assert!(g.validate().is_err());
        let mut g = lowe();
        g.visible_reflectance_back = Some(0.5);
        assert!(g.validate().is_err());
    }

    #[test]
    fn idf_field_order() {
        let g = lowe();
        let text = g.to_idf();
        let f = parse_idf_string(&text, Some("WindowMaterial:Glazing")).unwrap();
        assert_eq!(f.len(), 16);
        assert_eq!(f[1], "SpectralAverage");
        assert_eq!(f[2], "");
        assert_eq!(f[12], "0.0466");
        assert_eq!(f[15], "No");
        let back = EnergyWindowMaterialGlazing::from_idf(&text).unwrap();
        assert_eq!(back.solar_reflectance_back(), g.solar_reflectance_back());
        assert_eq!(back.emissivity_back, g.emissivity_back);
    }

    #[test]
    fn spectral_glazing_is_rejected() {
        let text = "WindowMaterial:Glazing, G, Spectral, Data, 0.003, 0.8, 0.1, 0.1, \
                    0.8, 0.1, 0.1, 0, 0.84, 0.84, 0.9;";
        assert!(EnergyWindowMaterialGlazing::from_idf(text).is_err());
    }

    #[test]
    fn simple_glazing_r_value_excludes_films() {
        let s = EnergyWindowMaterialSimpleGlazSys::new("Simple", 2.0, 0.4, 0.6).unwrap();
        assert!((s.r_factor() - 0.5).abs() < 1e-12);
        let expected = 0.5 - (1.0 / 23.0 + 1.0 / 7.0);
        assert!((s.r_value() - expected).abs() < 1e-12);
        let back = EnergyWindowMaterialSimpleGlazSys::from_idf(&s.to_idf()).unwrap();
        assert_eq!(back, s);
    }

    #[test]
    fn simple_glazing_limits() {
        assert!(EnergyWindowMaterialSimpleGlazSys::new("S", 12.5, 0.4, 0.6).is_err());
        assert!(EnergyWindowMaterialSimpleGlazSys::new("S", 12.0, 0.4, 0.6).is_ok());
        assert!(EnergyWindowMaterialSimpleGlazSys::new("S", 2.0, 1.0, 0.6).is_err());
    }
}
