//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use honeybee_energy::geometry::{Aperture, Model, Point3D, Room, RoomEnergyProperties};
use honeybee_energy::library::programs::{office_program, plenum_program};

/// DDY text with the 99.6% / 0.4% pair and the 99% / 1% pair.
pub const DDY: &str = "\
SizingPeriod:DesignDay,
  Golden Ann Htg 99.6% Condns DB,  !- Name
  12, 21, WinterDesignDay, -18.8, 0.0;
SizingPeriod:DesignDay,
  Golden Ann Clg .4% Condns DB=>MWB,  !- Name
  7, 21, SummerDesignDay, 33.1, 15.2;
SizingPeriod:DesignDay,
  Golden Ann Clg 1% Condns DB=>MWB,
  7, 21, SummerDesignDay, 31.5, 15.4;
SizingPeriod:DesignDay,
  Golden Ann Htg 99% Condns DB,
  12, 21, WinterDesignDay, -15.6, 0.0;
";

/// A 10 m x 8 m x 3 m conditioned office with one window on the front wall.
pub fn office_room() -> Room {
    let mut room = Room::from_box("Office", 10.0, 8.0, 3.0, Point3D::default()).unwrap();
    let window = Aperture::new(
        "Office_Front_Glz",
        vec![
            Point3D::new(2.0, 0.0, 1.0),
            Point3D::new(8.0, 0.0, 1.0),
            Point3D::new(8.0, 0.0, 2.2),
            Point3D::new(2.0, 0.0, 2.2),
        ],
    )
    .unwrap();
    room.faces[1].add_aperture(window).unwrap();
    room.energy = RoomEnergyProperties::new(office_program().unwrap());
    room.energy.add_default_ideal_air();
    room
}

/// An unconditioned plenum beside the office.
pub fn plenum_room() -> Room {
    let mut room = Room::from_box("Plenum", 10.0, 8.0, 0.8, Point3D::new(20.0, 0.0, 0.0)).unwrap();
    room.energy = RoomEnergyProperties::new(plenum_program());
    room
}

/// A two-room model: the office and its plenum.
pub fn office_model() -> Model {
    Model::new("Small Office", vec![office_room(), plenum_room()]).unwrap()
}

/// Writes `model` as JSON into `dir` and returns the path.
pub fn write_model_json(model: &Model, dir: &Path) -> PathBuf {
    let path = dir.join("model.json");
    std::fs::write(&path, model.to_json().unwrap()).unwrap();
    path
}

/// Number of objects of `object_type` in `idf`.
pub fn count_objects(idf: &str, object_type: &str) -> usize {
    honeybee_energy::idf::extract_objects(idf, object_type).len()
}
