//! API response and query types.

use serde::{Deserialize, Serialize};

use crate::geometry::{Model, Room};

/// Model name, size and object counts.
#[derive(Debug, Serialize)]
pub struct ModelSummary {
    pub name: String,
    pub room_count: usize,
    /// Floor area including room multipliers (m²).
    pub floor_area: f64,
    pub construction_count: usize,
    pub material_count: usize,
    pub schedule_count: usize,
}

impl From<&Model> for ModelSummary {
    fn from(m: &Model) -> Self {
        Self {
            name: m.name.clone(),
            room_count: m.rooms.len(),
            floor_area: m.floor_area(),
            construction_count: m.constructions().len(),
            material_count: m.materials().len(),
            schedule_count: m.schedules().len(),
        }
    }
}

/// One room with its zone-level properties.
#[derive(Debug, Serialize)]
pub struct RoomSummary {
    pub name: String,
    pub display_name: String,
    pub multiplier: u32,
    /// Floor area of one copy of the room (m²).
    pub floor_area: f64,
    /// Enclosed volume (m³).
    pub volume: f64,
    pub program_type: String,
    pub construction_set: String,
    pub conditioned: bool,
}

impl From<&Room> for RoomSummary {
    fn from(r: &Room) -> Self {
        Self {
            name: r.name.clone(),
            display_name: r.display_name().to_string(),
            multiplier: r.multiplier,
            floor_area: r.floor_area(),
            volume: r.volume(),
            program_type: r.energy.program_type.name.clone(),
            construction_set: r.energy.construction_set.name.clone(),
            conditioned: r.energy.is_conditioned(),
        }
    }
}

/// Optional hour range for the schedule endpoint.
#[derive(Debug, Deserialize)]
pub struct ScheduleQuery {
    /// Start hour of the year (inclusive).
    pub from: Option<usize>,
    /// End hour of the year (inclusive).
    pub to: Option<usize>,
}

/// Hourly values of one schedule over a range of hours.
#[derive(Debug, Serialize)]
pub struct ScheduleValues {
    pub name: String,
    pub from: usize,
    pub to: usize,
    pub values: Vec<f64>,
}

/// Error response body for 4xx errors.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
}
