//! Materials that make up construction layers.
//!
//! Opaque constructions stack [`OpaqueMaterial`]s, window constructions stack
//! [`WindowMaterial`]s. Both enums serialize with a `type` tag so a JSON model
//! can hold any mix of them.

pub mod gas;
pub mod glazing;
pub mod opaque;
pub mod shade;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::idf::{object_type, parse_idf_string};

pub use gas::{
    EnergyWindowMaterialGas, EnergyWindowMaterialGasCustom, EnergyWindowMaterialGasMixture,
    GapConditions, GasFraction, GasGap, GasType,
};
pub use glazing::{EnergyWindowMaterialGlazing, EnergyWindowMaterialSimpleGlazSys};
pub use opaque::{EnergyMaterial, EnergyMaterialNoMass, Roughness};
pub use shade::{
    EnergyWindowMaterialBlind, EnergyWindowMaterialShade, ShadeLayer, SlatOrientation,
};

/// A layer of an opaque construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum OpaqueMaterial {
    #[serde(rename = "EnergyMaterial")]
    Mass(EnergyMaterial),
    #[serde(rename = "EnergyMaterialNoMass")]
    NoMass(EnergyMaterialNoMass),
}

impl OpaqueMaterial {
    pub fn name(&self) -> &str {
        match self {
            OpaqueMaterial::Mass(m) => &m.name,
            OpaqueMaterial::NoMass(m) => &m.name,
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            OpaqueMaterial::Mass(m) => m.validate(),
            OpaqueMaterial::NoMass(m) => m.validate(),
        }
    }

    pub fn r_value(&self) -> f64 {
        match self {
            OpaqueMaterial::Mass(m) => m.r_value(),
            OpaqueMaterial::NoMass(m) => m.r_value,
        }
    }

    pub fn u_value(&self) -> f64 {
        1.0 / self.r_value()
    }

    /// Thickness in meters; no-mass layers have none.
    pub fn thickness(&self) -> f64 {
        match self {
            OpaqueMaterial::Mass(m) => m.thickness,
            OpaqueMaterial::NoMass(_) => 0.0,
        }
    }

    pub fn mass_area_density(&self) -> f64 {
        match self {
            OpaqueMaterial::Mass(m) => m.mass_area_density(),
            OpaqueMaterial::NoMass(_) => 0.0,
        }
    }

    pub fn area_heat_capacity(&self) -> f64 {
        match self {
            OpaqueMaterial::Mass(m) => m.area_heat_capacity(),
            OpaqueMaterial::NoMass(_) => 0.0,
        }
    }

    pub fn thermal_absorptance(&self) -> f64 {
        match self {
            OpaqueMaterial::Mass(m) => m.thermal_absorptance,
            OpaqueMaterial::NoMass(m) => m.thermal_absorptance,
        }
    }

    pub fn solar_absorptance(&self) -> f64 {
        match self {
            OpaqueMaterial::Mass(m) => m.solar_absorptance,
            OpaqueMaterial::NoMass(m) => m.solar_absorptance,
        }
    }

    pub fn visible_absorptance(&self) -> f64 {
        match self {
            OpaqueMaterial::Mass(m) => m.visible_absorptance(),
            OpaqueMaterial::NoMass(m) => m.visible_absorptance(),
        }
    }

    pub fn to_idf(&self) -> String {
        match self {
            OpaqueMaterial::Mass(m) => m.to_idf(),
            OpaqueMaterial::NoMass(m) => m.to_idf(),
        }
    }

    /// Parses either `Material` or `Material:NoMass` text.
    ///
    /// # Errors
    ///
    /// Returns an error for any other object type or invalid fields.
    pub fn from_idf(text: &str) -> Result<Self> {
        let ty = object_type(text);
        if ty.eq_ignore_ascii_case("Material") {
            EnergyMaterial::from_idf(text).map(OpaqueMaterial::Mass)
        } else if ty.eq_ignore_ascii_case("Material:NoMass") {
            EnergyMaterialNoMass::from_idf(text).map(OpaqueMaterial::NoMass)
        } else {
            Err(Error::idf("Material", format!("\"{ty}\" is not an opaque material")))
        }
    }
}

impl From<EnergyMaterial> for OpaqueMaterial {
    fn from(m: EnergyMaterial) -> Self {
        OpaqueMaterial::Mass(m)
    }
}

impl From<EnergyMaterialNoMass> for OpaqueMaterial {
    fn from(m: EnergyMaterialNoMass) -> Self {
        OpaqueMaterial::NoMass(m)
    }
}

/// A layer of a window construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum WindowMaterial {
    #[serde(rename = "EnergyWindowMaterialGlazing")]
    Glazing(EnergyWindowMaterialGlazing),
    #[serde(rename = "EnergyWindowMaterialSimpleGlazSys")]
    SimpleGlazSys(EnergyWindowMaterialSimpleGlazSys),
    #[serde(rename = "EnergyWindowMaterialGas")]
    Gas(EnergyWindowMaterialGas),
    #[serde(rename = "EnergyWindowMaterialGasMixture")]
    GasMixture(EnergyWindowMaterialGasMixture),
    #[serde(rename = "EnergyWindowMaterialGasCustom")]
    GasCustom(EnergyWindowMaterialGasCustom),
    #[serde(rename = "EnergyWindowMaterialShade")]
    Shade(EnergyWindowMaterialShade),
    #[serde(rename = "EnergyWindowMaterialBlind")]
    Blind(EnergyWindowMaterialBlind),
}

impl WindowMaterial {
    pub fn name(&self) -> &str {
        match self {
            WindowMaterial::Glazing(m) => &m.name,
            WindowMaterial::SimpleGlazSys(m) => &m.name,
            WindowMaterial::Gas(m) => &m.name,
            WindowMaterial::GasMixture(m) => &m.name,
            WindowMaterial::GasCustom(m) => &m.name,
            WindowMaterial::Shade(m) => &m.name,
            WindowMaterial::Blind(m) => &m.name,
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            WindowMaterial::Glazing(m) => m.validate(),
            WindowMaterial::SimpleGlazSys(m) => m.validate(),
            WindowMaterial::Gas(m) => m.validate(),
            WindowMaterial::GasMixture(m) => m.validate(),
            WindowMaterial::GasCustom(m) => m.validate(),
            WindowMaterial::Shade(m) => m.validate(),
            WindowMaterial::Blind(m) => m.validate(),
        }
    }

    pub fn is_gas(&self) -> bool {
        matches!(
            self,
            WindowMaterial::Gas(_) | WindowMaterial::GasMixture(_) | WindowMaterial::GasCustom(_)
        )
    }

    pub fn is_shade(&self) -> bool {
        matches!(self, WindowMaterial::Shade(_) | WindowMaterial::Blind(_))
    }

    pub fn is_glazing(&self) -> bool {
        matches!(
            self,
            WindowMaterial::Glazing(_) | WindowMaterial::SimpleGlazSys(_)
        )
    }

    /// The gap behaviour of gas layers.
    pub fn as_gas(&self) -> Option<&dyn GasGap> {
        match self {
            WindowMaterial::Gas(g) => Some(g),
            WindowMaterial::GasMixture(g) => Some(g),
            WindowMaterial::GasCustom(g) => Some(g),
            _ => None,
        }
    }

    /// The gap behaviour of shade and blind layers.
    pub fn as_shade(&self) -> Option<&dyn ShadeLayer> {
        match self {
            WindowMaterial::Shade(s) => Some(s),
            WindowMaterial::Blind(s) => Some(s),
            _ => None,
        }
    }

    /// Emissivity of the outward face; 0.84 for layers without one.
    pub fn emissivity(&self) -> f64 {
        match self {
            WindowMaterial::Glazing(m) => m.emissivity,
            WindowMaterial::Shade(m) => m.emissivity,
            WindowMaterial::Blind(m) => m.emissivity,
            _ => 0.84,
        }
    }

    /// Emissivity of the inward face; 0.84 for layers without one.
    pub fn emissivity_back(&self) -> f64 {
        match self {
            WindowMaterial::Glazing(m) => m.emissivity_back,
            WindowMaterial::Shade(m) => m.emissivity,
            WindowMaterial::Blind(m) => m.emissivity_back.unwrap_or(m.emissivity),
            _ => 0.84,
        }
    }

    pub fn thickness(&self) -> f64 {
        match self {
            WindowMaterial::Glazing(m) => m.thickness,
            WindowMaterial::SimpleGlazSys(_) => 0.0,
            WindowMaterial::Gas(m) => m.thickness,
            WindowMaterial::GasMixture(m) => m.thickness,
            WindowMaterial::GasCustom(m) => m.thickness,
            WindowMaterial::Shade(m) => m.thickness,
            WindowMaterial::Blind(m) => m.slat_width,
        }
    }

    /// Resistance of the layer without films. Gas gaps use the still-gas
    /// conductivity at 0C and shades exclude their air gaps.
    pub fn r_value(&self) -> f64 {
        match self {
            WindowMaterial::Glazing(m) => m.r_value(),
            WindowMaterial::SimpleGlazSys(m) => m.r_value(),
            WindowMaterial::Gas(m) => m.thickness / m.conductivity(),
            WindowMaterial::GasMixture(m) => m.thickness / m.conductivity(),
            WindowMaterial::GasCustom(m) => m.thickness / m.conductivity(),
            WindowMaterial::Shade(m) => m.r_value(),
            WindowMaterial::Blind(m) => m.r_value(),
        }
    }

    pub fn to_idf(&self) -> String {
        match self {
            WindowMaterial::Glazing(m) => m.to_idf(),
            WindowMaterial::SimpleGlazSys(m) => m.to_idf(),
            WindowMaterial::Gas(m) => m.to_idf(),
            WindowMaterial::GasMixture(m) => m.to_idf(),
            WindowMaterial::GasCustom(m) => m.to_idf(),
            WindowMaterial::Shade(m) => m.to_idf(),
            WindowMaterial::Blind(m) => m.to_idf(),
        }
    }

    /// Parses any of the supported `WindowMaterial:*` objects.
    ///
    /// # Errors
    ///
    /// Returns an error for unsupported object types or invalid fields.
    pub fn from_idf(text: &str) -> Result<Self> {
        let ty = object_type(text).to_ascii_lowercase();
        match ty.as_str() {
            "windowmaterial:glazing" => {
                EnergyWindowMaterialGlazing::from_idf(text).map(WindowMaterial::Glazing)
            }
            "windowmaterial:simpleglazingsystem" => {
                EnergyWindowMaterialSimpleGlazSys::from_idf(text).map(WindowMaterial::SimpleGlazSys)
            }
            "windowmaterial:gas" => {
                let fields = parse_idf_string(text, Some("WindowMaterial:Gas"))?;
                if fields
                    .get(1)
                    .is_some_and(|g| g.trim().eq_ignore_ascii_case("Custom"))
                {
                    EnergyWindowMaterialGasCustom::from_idf(text).map(WindowMaterial::GasCustom)
                } else {
                    EnergyWindowMaterialGas::from_idf(text).map(WindowMaterial::Gas)
                }
            }
            "windowmaterial:gasmixture" => {
                EnergyWindowMaterialGasMixture::from_idf(text).map(WindowMaterial::GasMixture)
            }
            "windowmaterial:shade" => {
                EnergyWindowMaterialShade::from_idf(text).map(WindowMaterial::Shade)
            }
            "windowmaterial:blind" => {
                EnergyWindowMaterialBlind::from_idf(text).map(WindowMaterial::Blind)
            }
            _ => Err(Error::idf(
                "WindowMaterial",
                format!("\"{}\" is not a supported window material", object_type(text)),
            )),
        }
    }
}

impl From<EnergyWindowMaterialGlazing> for WindowMaterial {
    fn from(m: EnergyWindowMaterialGlazing) -> Self {
        WindowMaterial::Glazing(m)
    }
}

impl From<EnergyWindowMaterialSimpleGlazSys> for WindowMaterial {
    fn from(m: EnergyWindowMaterialSimpleGlazSys) -> Self {
        WindowMaterial::SimpleGlazSys(m)
    }
}

impl From<EnergyWindowMaterialGas> for WindowMaterial {
    fn from(m: EnergyWindowMaterialGas) -> Self {
        WindowMaterial::Gas(m)
    }
}

impl From<EnergyWindowMaterialGasMixture> for WindowMaterial {
    fn from(m: EnergyWindowMaterialGasMixture) -> Self {
        WindowMaterial::GasMixture(m)
    }
}

impl From<EnergyWindowMaterialGasCustom> for WindowMaterial {
    fn from(m: EnergyWindowMaterialGasCustom) -> Self {
        WindowMaterial::GasCustom(m)
    }
}

impl From<EnergyWindowMaterialShade> for WindowMaterial {
    fn from(m: EnergyWindowMaterialShade) -> Self {
        WindowMaterial::Shade(m)
    }
}

impl From<EnergyWindowMaterialBlind> for WindowMaterial {
    fn from(m: EnergyWindowMaterialBlind) -> Self {
        WindowMaterial::Blind(m)
    }
}

/// Any material, as gathered from a model's constructions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Material {
    Opaque(OpaqueMaterial),
    Window(WindowMaterial),
}

impl Material {
    pub fn name(&self) -> &str {
        match self {
            Material::Opaque(m) => m.name(),
            Material::Window(m) => m.name(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            Material::Opaque(m) => m.validate(),
            Material::Window(m) => m.validate(),
        }
    }

    pub fn to_idf(&self) -> String {
        match self {
            Material::Opaque(m) => m.to_idf(),
            Material::Window(m) => m.to_idf(),
        }
    }
}
