//! Simulation parameters: run period, outputs, sizing, shadow calculation
//! and simulation control.

pub mod control;
pub mod output;
pub mod parameter;
pub mod runperiod;
pub mod shadow;
pub mod sizing;

pub use control::SimulationControl;
pub use output::{LoadComponent, ReportingFrequency, SimulationOutput};
pub use parameter::SimulationParameter;
pub use runperiod::{DaylightSavingTime, RunPeriod};
pub use shadow::{CalculationMethod, ShadowCalculation, SolarDistribution};
pub use sizing::{DesignDay, SizingParameter};
