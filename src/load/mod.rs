//! Internal loads, outdoor air and setpoints assigned to a thermal zone.

/// Electric and gas equipment.
pub mod equipment;
/// Infiltration through the exterior envelope.
pub mod infiltration;
/// Lighting power density.
pub mod lighting;
/// Occupancy and metabolic gains.
pub mod people;
/// Thermostat and humidistat setpoints.
pub mod setpoint;
pub mod types;
/// Minimum outdoor air requirements.
pub mod ventilation;

use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::schedule::Schedule;

pub use equipment::{ElectricEquipment, GasEquipment};
pub use infiltration::Infiltration;
pub use lighting::Lighting;
pub use people::People;
pub use setpoint::Setpoint;
pub use types::Load;
pub use ventilation::Ventilation;

/// IDF object name of a load assigned to a zone.
pub(crate) fn zone_object_name(name: &str, zone_name: &str) -> String {
    format!("{name}..{zone_name}")
}

/// Load name recovered from a `"{name}..{zone}"` IDF object name.
pub(crate) fn split_zone_object_name(object_name: &str) -> &str {
    object_name.split("..").next().unwrap_or(object_name)
}

/// Looks up a schedule referenced by an IDF field.
pub(crate) fn lookup_schedule(
    schedules: &HashMap<String, Schedule>,
    name: &str,
) -> Result<Schedule> {
    schedules
        .get(name)
        .cloned()
        .ok_or_else(|| Error::missing("schedule", name))
}

/// Rejects schedules whose type limits are not fractional.
pub(crate) fn check_fractional_schedule(schedule: &Schedule, load: &str) -> Result<()> {
    match schedule.schedule_type_limit() {
        Some(limit) if limit.unit() != "fraction" => Err(Error::invalid(
            format!("{load} schedule"),
            format!(
                "\"{}\" should be fractional, got unit type {}",
                schedule.name(),
                limit.unit_type
            ),
        )),
        _ => Ok(()),
    }
}

/// Rejects schedules whose type limits are not in `unit`.
pub(crate) fn check_schedule_unit(schedule: &Schedule, load: &str, unit: &str) -> Result<()> {
    match schedule.schedule_type_limit() {
        Some(limit) if limit.unit() != unit => Err(Error::invalid(
            format!("{load} schedule"),
            format!(
                "\"{}\" should be in {unit} units, got unit type {}",
                schedule.name(),
                limit.unit_type
            ),
        )),
        _ => Ok(()),
    }
}

/// Weights for averaging loads.
///
/// Returns the weights as given, for load magnitudes, and the same weights
/// scaled to sum to 1, for fractions and schedules. Weights may sum to less
/// than 1; the remainder is treated as area with no load.
///
/// # Errors
///
/// Returns an error if there are no loads, the count does not match, a
/// weight is negative, or the weights sum to more than 1.
pub(crate) fn load_weights(count: usize, weights: Option<&[f64]>) -> Result<(Vec<f64>, Vec<f64>)> {
    if count == 0 {
        return Err(Error::invalid("loads", "at least one load is needed to average"));
    }
    let raw = match weights {
        None => vec![1.0 / count as f64; count],
        Some(w) if w.len() != count => {
            return Err(Error::invalid(
                "weights",
                format!("{} weights for {count} loads", w.len()),
            ));
        }
        Some(w) => w.to_vec(),
    };
    if raw.iter().any(|w| *w < 0.0) {
        return Err(Error::invalid("weights", "weights cannot be negative"));
    }
    let total: f64 = raw.iter().sum();
    if total > 1.0 + 1e-6 {
        return Err(Error::invalid(
            "weights",
            format!("must sum to 1 or less, got {total}"),
        ));
    }
    let unit = if total > 0.0 {
        raw.iter().map(|w| w / total).collect()
    } else {
        vec![1.0 / count as f64; count]
    };
    Ok((raw, unit))
}

pub(crate) fn weighted_sum<T>(items: &[&T], weights: &[f64], value: impl Fn(&T) -> f64) -> f64 {
    items.iter().zip(weights).map(|(item, w)| value(item) * w).sum()
}
