//! Generic constructions assigned when nothing else is specified.

use std::sync::LazyLock;

use super::materials::{
    ACOUSTIC_TILE, AIR, AIR_GAP, BRICK, CEILING_GAP, CLEAR_GLASS, CONCRETE_HW, CONCRETE_LW,
    GYPSUM, INSULATION, INSULATION_THIN, LOWE_GLASS, PAINTED_METAL, ROOF_MEMBRANE, WALL_GAP, WOOD,
};
use crate::construction::{OpaqueConstruction, ShadeConstruction, WindowConstruction};
use crate::material::{EnergyMaterial, OpaqueMaterial, WindowMaterial};

fn opaque(name: &str, layers: &[&LazyLock<EnergyMaterial>]) -> OpaqueConstruction {
    OpaqueConstruction {
        name: name.to_string(),
        materials: layers
            .iter()
            .map(|m| OpaqueMaterial::Mass((***m).clone()))
            .collect(),
    }
}

pub static EXTERIOR_WALL: LazyLock<OpaqueConstruction> = LazyLock::new(|| {
    opaque(
        "Generic Exterior Wall",
        &[&BRICK, &CONCRETE_LW, &INSULATION, &WALL_GAP, &GYPSUM],
    )
});
pub static INTERIOR_WALL: LazyLock<OpaqueConstruction> = LazyLock::new(|| {
    opaque("Generic Interior Wall", &[&GYPSUM, &WALL_GAP, &GYPSUM])
});
pub static UNDERGROUND_WALL: LazyLock<OpaqueConstruction> = LazyLock::new(|| {
    opaque(
        "Generic Underground Wall",
        &[&INSULATION, &CONCRETE_HW, &WALL_GAP, &GYPSUM],
    )
});
pub static EXPOSED_FLOOR: LazyLock<OpaqueConstruction> = LazyLock::new(|| {
    opaque(
        "Generic Exposed Floor",
        &[&PAINTED_METAL, &CEILING_GAP, &INSULATION, &CONCRETE_LW],
    )
});
pub static INTERIOR_FLOOR: LazyLock<OpaqueConstruction> = LazyLock::new(|| {
    opaque(
        "Generic Interior Floor",
        &[&ACOUSTIC_TILE, &CEILING_GAP, &CONCRETE_LW],
    )
});
pub static GROUND_SLAB: LazyLock<OpaqueConstruction> = LazyLock::new(|| {
    opaque("Generic Ground Slab", &[&INSULATION, &CONCRETE_HW])
});
pub static ROOF: LazyLock<OpaqueConstruction> = LazyLock::new(|| {
    opaque(
        "Generic Roof",
        &[&ROOF_MEMBRANE, &INSULATION, &CONCRETE_LW, &CEILING_GAP, &ACOUSTIC_TILE],
    )
});
pub static INTERIOR_CEILING: LazyLock<OpaqueConstruction> = LazyLock::new(|| {
    opaque(
        "Generic Interior Ceiling",
        &[&CONCRETE_LW, &CEILING_GAP, &ACOUSTIC_TILE],
    )
});
pub static UNDERGROUND_ROOF: LazyLock<OpaqueConstruction> = LazyLock::new(|| {
    opaque(
        "Generic Underground Roof",
        &[&INSULATION, &CONCRETE_HW, &CEILING_GAP, &ACOUSTIC_TILE],
    )
});
pub static EXTERIOR_DOOR: LazyLock<OpaqueConstruction> = LazyLock::new(|| {
    opaque(
        "Generic Exterior Door",
        &[&PAINTED_METAL, &INSULATION_THIN, &PAINTED_METAL],
    )
});
pub static INTERIOR_DOOR: LazyLock<OpaqueConstruction> =
    LazyLock::new(|| opaque("Generic Interior Door", &[&WOOD]));
pub static AIR_WALL: LazyLock<OpaqueConstruction> =
    LazyLock::new(|| opaque("Air Wall", &[&AIR]));

pub static DOUBLE_PANE: LazyLock<WindowConstruction> = LazyLock::new(|| WindowConstruction {
    name: "Generic Double Pane".to_string(),
    materials: vec![
        WindowMaterial::Glazing(LOWE_GLASS.clone()),
        WindowMaterial::Gas(AIR_GAP.clone()),
        WindowMaterial::Glazing(CLEAR_GLASS.clone()),
    ],
});
pub static SINGLE_PANE: LazyLock<WindowConstruction> = LazyLock::new(|| WindowConstruction {
    name: "Generic Single Pane".to_string(),
    materials: vec![WindowMaterial::Glazing(CLEAR_GLASS.clone())],
});

pub static SHADE: LazyLock<ShadeConstruction> = LazyLock::new(ShadeConstruction::default);

/// Every opaque construction in the library.
pub fn opaque_constructions() -> Vec<OpaqueConstruction> {
    [
        &EXTERIOR_WALL,
        &INTERIOR_WALL,
        &UNDERGROUND_WALL,
        &EXPOSED_FLOOR,
        &INTERIOR_FLOOR,
        &GROUND_SLAB,
        &ROOF,
        &INTERIOR_CEILING,
        &UNDERGROUND_ROOF,
        &EXTERIOR_DOOR,
        &INTERIOR_DOOR,
        &AIR_WALL,
    ]
    .into_iter()
    .map(|c| (**c).clone())
    .collect()
}

pub fn window_constructions() -> Vec<WindowConstruction> {
    vec![DOUBLE_PANE.clone(), SINGLE_PANE.clone()]
}

pub fn opaque_construction_by_name(name: &str) -> Option<OpaqueConstruction> {
    opaque_constructions().into_iter().find(|c| c.name == name)
}

pub fn window_construction_by_name(name: &str) -> Option<WindowConstruction> {
    window_constructions().into_iter().find(|c| c.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn library_constructions_are_valid() {
        for c in opaque_constructions() {
            assert!(c.validate().is_ok(), "{}", c.name);
        }
        for c in window_constructions() {
            assert!(c.validate().is_ok(), "{}", c.name);
        }
    }

    #[test]
    fn interior_constructions_are_symmetric() {
        assert!(INTERIOR_WALL.is_symmetric());
        assert!(!EXTERIOR_WALL.is_symmetric());
        assert!(EXTERIOR_DOOR.is_symmetric());
    }

    #[test]
    fn exterior_wall_layers() {
        assert_eq!(
            EXTERIOR_WALL.layers(),
            vec![
                "Generic Brick",
                "Generic LW Concrete",
                "Generic 50mm Insulation",
                "Generic Wall Air Gap",
                "Generic Gypsum Board"
            ]
        );
        assert!(EXTERIOR_WALL.u_factor() < 1.0);
    }

    #[test]
    fn double_pane_outperforms_single() {
        assert!(DOUBLE_PANE.u_factor() < SINGLE_PANE.u_factor());
        assert_eq!(opaque_construction_by_name("Air Wall").map(|c| c.materials.len()), Some(1));
    }
}
