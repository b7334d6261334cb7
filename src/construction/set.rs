//! Construction sets: which construction each kind of surface receives.

use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use super::{Construction, OpaqueConstruction, WindowConstruction, unique_by_name};
use crate::error::{Result, check_ep_name};
use crate::geometry::{BoundaryCondition, FaceType};
use crate::library::constructions as lib;

/// Resolves an optional slot to its library fallback.
fn pick<'a, T>(slot: &'a Option<T>, fallback: &'static LazyLock<T>) -> &'a T {
    slot.as_ref().unwrap_or_else(|| LazyLock::force(fallback))
}

/// Exterior, interior and ground constructions for one face type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceSet {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exterior: Option<OpaqueConstruction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interior: Option<OpaqueConstruction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ground: Option<OpaqueConstruction>,
}

impl SurfaceSet {
    fn slots(&self) -> [&Option<OpaqueConstruction>; 3] {
        [&self.exterior, &self.interior, &self.ground]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApertureSet {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub window: Option<WindowConstruction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interior: Option<WindowConstruction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skylight: Option<WindowConstruction>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DoorSet {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exterior: Option<OpaqueConstruction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interior: Option<OpaqueConstruction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exterior_glass: Option<WindowConstruction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interior_glass: Option<WindowConstruction>,
}

/// A full set of constructions for a room.
///
/// Empty slots fall back to the generic library constructions, so a default
/// set is always complete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstructionSet {
    pub name: String,
    #[serde(default)]
    pub wall_set: SurfaceSet,
    #[serde(default)]
    pub floor_set: SurfaceSet,
    #[serde(default)]
    pub roof_ceiling_set: SurfaceSet,
    #[serde(default)]
    pub aperture_set: ApertureSet,
    #[serde(default)]
    pub door_set: DoorSet,
}

impl Default for ConstructionSet {
    fn default() -> Self {
        Self::new("Default Generic Construction Set")
    }
}

impl ConstructionSet {
    /// An empty set where every slot uses the library default.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            wall_set: SurfaceSet::default(),
            floor_set: SurfaceSet::default(),
            roof_ceiling_set: SurfaceSet::default(),
            aperture_set: ApertureSet::default(),
            door_set: DoorSet::default(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        check_ep_name(&self.name)?;
        self.modified_constructions_unique()
            .iter()
            .try_for_each(Construction::validate)
    }

    /// Construction for an opaque face.
    pub fn face_construction(
        &self,
        face_type: FaceType,
        boundary: &BoundaryCondition,
    ) -> &OpaqueConstruction {
        let (set, [ext, int, ground]) = match face_type {
            FaceType::AirWall => return LazyLock::force(&lib::AIR_WALL),
            FaceType::Wall => (
                &self.wall_set,
                [&lib::EXTERIOR_WALL, &lib::INTERIOR_WALL, &lib::UNDERGROUND_WALL],
            ),
            FaceType::Floor => (
                &self.floor_set,
                [&lib::EXPOSED_FLOOR, &lib::INTERIOR_FLOOR, &lib::GROUND_SLAB],
            ),
            FaceType::RoofCeiling => (
                &self.roof_ceiling_set,
                [&lib::ROOF, &lib::INTERIOR_CEILING, &lib::UNDERGROUND_ROOF],
            ),
        };
        match boundary {
            BoundaryCondition::Outdoors { .. } => pick(&set.exterior, ext),
            BoundaryCondition::Ground => pick(&set.ground, ground),
            BoundaryCondition::Surface { .. } | BoundaryCondition::Adiabatic => {
                pick(&set.interior, int)
            }
        }
    }

    /// Construction for an aperture in a face of `parent_type`.
    pub fn aperture_construction(
        &self,
        boundary: &BoundaryCondition,
        parent_type: FaceType,
    ) -> &WindowConstruction {
        let a = &self.aperture_set;
        match (boundary, parent_type) {
            (BoundaryCondition::Surface { .. }, _) => pick(&a.interior, &lib::SINGLE_PANE),
            (_, FaceType::RoofCeiling) => pick(&a.skylight, &lib::DOUBLE_PANE),
            _ => pick(&a.window, &lib::DOUBLE_PANE),
        }
    }

    /// Construction for a door, glass or opaque.
    pub fn door_construction(&self, boundary: &BoundaryCondition, is_glass: bool) -> Construction {
        let d = &self.door_set;
        let interior = matches!(boundary, BoundaryCondition::Surface { .. });
        match (is_glass, interior) {
            (false, false) => pick(&d.exterior, &lib::EXTERIOR_DOOR).clone().into(),
            (false, true) => pick(&d.interior, &lib::INTERIOR_DOOR).clone().into(),
            (true, false) => pick(&d.exterior_glass, &lib::DOUBLE_PANE).clone().into(),
            (true, true) => pick(&d.interior_glass, &lib::SINGLE_PANE).clone().into(),
        }
    }

    /// Every construction the set resolves to, defaults included.
    pub fn constructions_unique(&self) -> Vec<Construction> {
        let mut all: Vec<Construction> = Vec::new();
        let surfaces = [
            (&self.wall_set, [&lib::EXTERIOR_WALL, &lib::INTERIOR_WALL, &lib::UNDERGROUND_WALL]),
            (&self.floor_set, [&lib::EXPOSED_FLOOR, &lib::INTERIOR_FLOOR, &lib::GROUND_SLAB]),
            (&self.roof_ceiling_set, [&lib::ROOF, &lib::INTERIOR_CEILING, &lib::UNDERGROUND_ROOF]),
        ];
        for (set, defaults) in surfaces {
            for (slot, fallback) in set.slots().into_iter().zip(defaults) {
                all.push(pick(slot, fallback).clone().into());
            }
        }
        let a = &self.aperture_set;
        all.push(pick(&a.window, &lib::DOUBLE_PANE).clone().into());
        all.push(pick(&a.interior, &lib::SINGLE_PANE).clone().into());
        all.push(pick(&a.skylight, &lib::DOUBLE_PANE).clone().into());
        let d = &self.door_set;
        all.push(pick(&d.exterior, &lib::EXTERIOR_DOOR).clone().into());
        all.push(pick(&d.interior, &lib::INTERIOR_DOOR).clone().into());
        all.push(pick(&d.exterior_glass, &lib::DOUBLE_PANE).clone().into());
        all.push(pick(&d.interior_glass, &lib::SINGLE_PANE).clone().into());
        unique_by_name(&all, Construction::name)
    }

    /// Only the constructions explicitly assigned to this set.
    pub fn modified_constructions_unique(&self) -> Vec<Construction> {
        let opaque = [&self.wall_set, &self.floor_set, &self.roof_ceiling_set]
            .into_iter()
            .flat_map(SurfaceSet::slots)
            .chain([&self.door_set.exterior, &self.door_set.interior])
            .flatten()
            .cloned()
            .map(Construction::from);
        let window = [
            &self.aperture_set.window,
            &self.aperture_set.interior,
            &self.aperture_set.skylight,
            &self.door_set.exterior_glass,
            &self.door_set.interior_glass,
        ]
        .into_iter()
        .flatten()
        .cloned()
        .map(Construction::from);
        let all: Vec<Construction> = opaque.chain(window).collect();
        unique_by_name(&all, Construction::name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outdoors() -> BoundaryCondition {
        BoundaryCondition::outdoors()
    }

    fn surface() -> BoundaryCondition {
        BoundaryCondition::Surface {
            boundary_condition_objects: vec!["Other Face".into(), "Other Room".into()],
        }
    }

    #[test]
    fn default_set_uses_library() {
        let set = ConstructionSet::default();
        assert_eq!(
            set.face_construction(FaceType::Wall, &outdoors()).name,
            "Generic Exterior Wall"
        );
        assert_eq!(
            set.face_construction(FaceType::Floor, &BoundaryCondition::Ground).name,
            "Generic Ground Slab"
        );
        assert_eq!(
            set.face_construction(FaceType::RoofCeiling, &surface()).name,
            "Generic Interior Ceiling"
        );
        assert_eq!(
            set.face_construction(FaceType::AirWall, &outdoors()).name,
            "Air Wall"
        );
        assert_eq!(
            set.face_construction(FaceType::Wall, &BoundaryCondition::Adiabatic).name,
            "Generic Interior Wall"
        );
    }

    #[test]
    fn aperture_and_door_selection() {
        let set = ConstructionSet::default();
        assert_eq!(
            set.aperture_construction(&outdoors(), FaceType::Wall).name,
            "Generic Double Pane"
        );
        assert_eq!(
            set.aperture_construction(&surface(), FaceType::Wall).name,
            "Generic Single Pane"
        );
        assert_eq!(set.door_construction(&outdoors(), false).name(), "Generic Exterior Door");
        assert_eq!(set.door_construction(&surface(), true).name(), "Generic Single Pane");
    }

    #[test]
    fn overrides_take_priority() {
        let mut set = ConstructionSet::new("Custom");
        let mut skylight = lib::SINGLE_PANE.clone();
        skylight.name = "Custom Skylight".into();
        set.aperture_set.skylight = Some(skylight);
        assert_eq!(
            set.aperture_construction(&outdoors(), FaceType::RoofCeiling).name,
            "Custom Skylight"
        );
        let modified = set.modified_constructions_unique();
        assert_eq!(modified.len(), 1);
        assert!(set.validate().is_ok());
    }

    #[test]
    fn unique_constructions_are_deduplicated() {
        let set = ConstructionSet::default();
        let all = set.constructions_unique();
        let mut names: Vec<&str> = all.iter().map(Construction::name).collect();
        let before = names.len();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), before);
        assert_eq!(before, 13);
        assert!(set.modified_constructions_unique().is_empty());
    }

    #[test]
    fn json_omits_empty_slots() {
        let set = ConstructionSet::default();
        let json = serde_json::to_string(&set).unwrap();
        assert!(!json.contains("exterior"));
        let back: ConstructionSet = serde_json::from_str(&json).unwrap();
        assert_eq!(back, set);
    }
}
