//! Zone HVAC systems.

/// Ideal loads air system that meets zone setpoints exactly.
pub mod idealair;

pub use idealair::{CapacityLimit, EconomizerType, HeatRecoveryType, IdealAirSystem};
