//! Generic materials used by the built-in constructions.

use std::sync::LazyLock;

use crate::material::{
    EnergyMaterial, EnergyWindowMaterialGas, EnergyWindowMaterialGlazing, GasType,
    OpaqueMaterial, Roughness, WindowMaterial,
};

use crate::material::Roughness::{MediumRough, MediumSmooth, Smooth};

#[allow(clippy::too_many_arguments)]
fn mass(
    name: &str,
    thickness: f64,
    conductivity: f64,
    density: f64,
    specific_heat: f64,
    roughness: Roughness,
    thermal: f64,
    solar: f64,
    visible: Option<f64>,
) -> EnergyMaterial {
    EnergyMaterial {
        name: name.to_string(),
        thickness,
        conductivity,
        density,
        specific_heat,
        roughness,
        thermal_absorptance: thermal,
        solar_absorptance: solar,
        visible_absorptance: visible,
    }
}

fn glass(
    name: &str,
    solar_t: f64,
    solar_r: f64,
    visible_t: f64,
    visible_r: f64,
    emissivity: f64,
    emissivity_back: f64,
) -> EnergyWindowMaterialGlazing {
    EnergyWindowMaterialGlazing {
        name: name.to_string(),
        thickness: 0.006,
        solar_transmittance: solar_t,
        solar_reflectance: solar_r,
        solar_reflectance_back: None,
        visible_transmittance: visible_t,
        visible_reflectance: visible_r,
        visible_reflectance_back: None,
        infrared_transmittance: 0.0,
        emissivity,
        emissivity_back,
        conductivity: 1.0,
        dirt_correction: 1.0,
        solar_diffusing: false,
    }
}

pub static BRICK: LazyLock<EnergyMaterial> = LazyLock::new(|| {
    mass("Generic Brick", 0.1, 0.9, 1920.0, 790.0, MediumRough, 0.9, 0.65, Some(0.65))
});
pub static CONCRETE_LW: LazyLock<EnergyMaterial> = LazyLock::new(|| {
    mass("Generic LW Concrete", 0.1, 0.53, 1280.0, 840.0, MediumRough, 0.9, 0.8, Some(0.8))
});
pub static CONCRETE_HW: LazyLock<EnergyMaterial> = LazyLock::new(|| {
    mass("Generic HW Concrete", 0.2, 1.95, 2240.0, 900.0, MediumRough, 0.9, 0.8, Some(0.8))
});
pub static INSULATION: LazyLock<EnergyMaterial> = LazyLock::new(|| {
    mass("Generic 50mm Insulation", 0.05, 0.03, 43.0, 1210.0, MediumRough, 0.9, 0.7, Some(0.7))
});
pub static INSULATION_THIN: LazyLock<EnergyMaterial> = LazyLock::new(|| {
    mass("Generic 25mm Insulation", 0.025, 0.03, 43.0, 1210.0, MediumRough, 0.9, 0.7, Some(0.7))
});
pub static GYPSUM: LazyLock<EnergyMaterial> = LazyLock::new(|| {
    mass("Generic Gypsum Board", 0.0127, 0.16, 800.0, 1090.0, MediumSmooth, 0.9, 0.5, Some(0.5))
});
pub static ACOUSTIC_TILE: LazyLock<EnergyMaterial> = LazyLock::new(|| {
    mass("Generic Acoustic Tile", 0.02, 0.06, 368.0, 590.0, MediumSmooth, 0.9, 0.2, Some(0.2))
});
pub static PAINTED_METAL: LazyLock<EnergyMaterial> = LazyLock::new(|| {
    mass("Generic Painted Metal", 0.0015, 45.0, 7690.0, 410.0, Smooth, 0.9, 0.5, Some(0.5))
});
pub static ROOF_MEMBRANE: LazyLock<EnergyMaterial> = LazyLock::new(|| {
    mass("Generic Roof Membrane", 0.01, 0.16, 1120.0, 1460.0, MediumRough, 0.9, 0.65, Some(0.65))
});
pub static WOOD: LazyLock<EnergyMaterial> = LazyLock::new(|| {
    mass("Generic 25mm Wood", 0.0254, 0.15, 608.0, 1630.0, MediumSmooth, 0.9, 0.5, Some(0.5))
});
pub static WALL_GAP: LazyLock<EnergyMaterial> = LazyLock::new(|| {
    mass("Generic Wall Air Gap", 0.1, 0.667, 1.28, 1000.0, Smooth, 0.9, 0.7, None)
});
pub static CEILING_GAP: LazyLock<EnergyMaterial> = LazyLock::new(|| {
    mass("Generic Ceiling Air Gap", 0.1, 0.556, 1.28, 1000.0, Smooth, 0.9, 0.7, None)
});
pub static AIR: LazyLock<EnergyMaterial> = LazyLock::new(|| {
    mass("Air Wall Material", 0.01, 0.6, 1.28, 1004.0, Smooth, 0.95, 0.95, Some(0.95))
});

pub static CLEAR_GLASS: LazyLock<EnergyWindowMaterialGlazing> =
    LazyLock::new(|| glass("Generic Clear Glass", 0.77, 0.07, 0.88, 0.08, 0.84, 0.84));
pub static LOWE_GLASS: LazyLock<EnergyWindowMaterialGlazing> =
    LazyLock::new(|| glass("Generic Low-e Glass", 0.45, 0.36, 0.71, 0.21, 0.84, 0.047));
pub static AIR_GAP: LazyLock<EnergyWindowMaterialGas> = LazyLock::new(|| EnergyWindowMaterialGas {
    name: "Generic Window Air Gap".to_string(),
    thickness: 0.0127,
    gas_type: GasType::Air,
});
pub static ARGON_GAP: LazyLock<EnergyWindowMaterialGas> =
    LazyLock::new(|| EnergyWindowMaterialGas {
        name: "Generic Window Argon Gap".to_string(),
        thickness: 0.0127,
        gas_type: GasType::Argon,
    });

/// Every opaque material in the library.
pub fn opaque_materials() -> Vec<OpaqueMaterial> {
    [
        &BRICK,
        &CONCRETE_LW,
        &CONCRETE_HW,
        &INSULATION,
        &INSULATION_THIN,
        &GYPSUM,
        &ACOUSTIC_TILE,
        &PAINTED_METAL,
        &ROOF_MEMBRANE,
        &WOOD,
        &WALL_GAP,
        &CEILING_GAP,
        &AIR,
    ]
    .into_iter()
    .map(|m| OpaqueMaterial::Mass((**m).clone()))
    .collect()
}

/// Every window material in the library.
pub fn window_materials() -> Vec<WindowMaterial> {
    vec![
        WindowMaterial::Glazing(CLEAR_GLASS.clone()),
        WindowMaterial::Glazing(LOWE_GLASS.clone()),
        WindowMaterial::Gas(AIR_GAP.clone()),
        WindowMaterial::Gas(ARGON_GAP.clone()),
    ]
}

pub fn opaque_material_by_name(name: &str) -> Option<OpaqueMaterial> {
    opaque_materials().into_iter().find(|m| m.name() == name)
}

pub fn window_material_by_name(name: &str) -> Option<WindowMaterial> {
    window_materials().into_iter().find(|m| m.name() == name)
}
