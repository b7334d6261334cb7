//! Built-in materials, constructions, schedule type limits and programs.
//!
//! Library objects are built on first use and cloned out, so callers are
//! free to rename or modify what they get.

pub mod construction_sets;
pub mod constructions;
pub mod materials;
pub mod programs;
pub mod schedule_type_limits;
