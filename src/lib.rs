//! Energy properties for building models, translated to EnergyPlus IDF.

pub mod config;
pub mod construction;
pub mod error;
pub mod geometry;
pub mod hvac;
pub mod idf;
pub mod io;
pub mod library;
pub mod load;
pub mod material;
pub mod programtype;
pub mod schedule;
/// Run period, outputs, shadowing, sizing and simulation control.
pub mod simulation;
pub mod translate;

#[cfg(feature = "api")]
pub mod api;

pub use error::{Error, Result};
