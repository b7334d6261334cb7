//! Reflectance of shading surfaces.

use serde::{Deserialize, Serialize};

use crate::error::{Result, check_ep_name, check_range};
use crate::idf::generate_idf_string;

fn d_reflectance() -> f64 {
    0.2
}

/// Solar and visible reflectance of a shade.
///
/// Shades are not written as `Construction` objects. A non-default shade
/// construction adds a `ShadingProperty:Reflectance` next to its surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShadeConstruction {
    pub name: String,
    #[serde(default = "d_reflectance")]
    pub solar_reflectance: f64,
    #[serde(default = "d_reflectance")]
    pub visible_reflectance: f64,
    #[serde(default)]
    pub is_specular: bool,
}

impl ShadeConstruction {
    /// # Errors
    ///
    /// Returns an error for an invalid name or reflectances outside `[0, 1]`.
    pub fn new(
        name: &str,
        solar_reflectance: f64,
        visible_reflectance: f64,
        is_specular: bool,
    ) -> Result<Self> {
        let c = Self {
            name: name.to_string(),
            solar_reflectance,
            visible_reflectance,
            is_specular,
        };
        c.validate()?;
        Ok(c)
    }

    pub fn validate(&self) -> Result<()> {
        check_ep_name(&self.name)?;
        check_range("shade solar reflectance", self.solar_reflectance, 0.0, 1.0)?;
        check_range("shade visible reflectance", self.visible_reflectance, 0.0, 1.0)
    }

    /// Whether EnergyPlus would assume these properties anyway.
    pub fn is_default(&self) -> bool {
        self.solar_reflectance == d_reflectance()
            && self.visible_reflectance == d_reflectance()
            && !self.is_specular
    }

    /// `ShadingProperty:Reflectance` for the named shading surface.
    pub fn to_shading_idf(&self, surface_name: &str) -> String {
        let mut values = vec![
            surface_name.to_string(),
            self.solar_reflectance.to_string(),
            self.visible_reflectance.to_string(),
        ];
        let mut comments = vec![
            "shading surface name",
            "diffuse solar reflectance",
            "diffuse visible reflectance",
        ];
        if self.is_specular {
            values.extend(["1".to_string(), self.name.clone()]);
            comments.extend(["glazed fraction of surface", "glazing construction"]);
        }
        generate_idf_string("ShadingProperty:Reflectance", &values, Some(&comments))
    }
}

impl Default for ShadeConstruction {
    fn default() -> Self {
        Self {
            name: "Generic Shade".to_string(),
            solar_reflectance: d_reflectance(),
            visible_reflectance: d_reflectance(),
            is_specular: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::idf::parse_idf_string;

    #[test]
    fn default_detection() {
        assert!(ShadeConstruction::default().is_default());
        let bright = ShadeConstruction::new("Bright", 0.6, 0.7, false).unwrap();
        assert!(!bright.is_default());
    }

    #[test]
    fn shading_property_fields() {
        let bright = ShadeConstruction::new("Bright", 0.6, 0.7, false).unwrap();
        let text = bright.to_shading_idf("Overhang");
        let f = parse_idf_string(&text, Some("ShadingProperty:Reflectance")).unwrap();
        assert_eq!(f, vec!["Overhang", "0.6", "0.7"]);
    }

    #[test]
    fn specular_shade_names_glazing() {
        let mirror = ShadeConstruction::new("Mirror", 0.8, 0.8, true).unwrap();
        let f = parse_idf_string(&mirror.to_shading_idf("Fin"), None).unwrap();
        assert_eq!(f.len(), 5);
        assert_eq!(f[3], "1");
        assert_eq!(f[4], "Mirror");
    }

    #[test]
    fn rejects_reflectance_above_one() {
        assert!(ShadeConstruction::new("Mirror", 1.2, 0.5, true).is_err());
    }
}
