//! Standard schedule type limits.

use std::sync::LazyLock;

use crate::schedule::NumericType::{Continuous, Discrete};
use crate::schedule::{NumericType, ScheduleTypeLimit, UnitType};

fn limit(
    name: &str,
    lower: Option<f64>,
    upper: Option<f64>,
    numeric_type: NumericType,
    unit_type: UnitType,
) -> ScheduleTypeLimit {
    ScheduleTypeLimit {
        name: name.to_string(),
        lower_limit: lower,
        upper_limit: upper,
        numeric_type,
        unit_type,
    }
}

pub static FRACTIONAL: LazyLock<ScheduleTypeLimit> = LazyLock::new(|| {
    limit("Fractional", Some(0.0), Some(1.0), Continuous, UnitType::Dimensionless)
});
pub static ON_OFF: LazyLock<ScheduleTypeLimit> =
    LazyLock::new(|| limit("On-Off", Some(0.0), Some(1.0), Discrete, UnitType::Availability));
pub static TEMPERATURE: LazyLock<ScheduleTypeLimit> = LazyLock::new(|| {
    limit("Temperature", Some(-273.15), None, Continuous, UnitType::Temperature)
});
pub static ACTIVITY_LEVEL: LazyLock<ScheduleTypeLimit> = LazyLock::new(|| {
    limit("Activity Level", Some(0.0), None, Continuous, UnitType::ActivityLevel)
});
pub static POWER: LazyLock<ScheduleTypeLimit> =
    LazyLock::new(|| limit("Power", None, None, Continuous, UnitType::Power));
pub static HUMIDITY: LazyLock<ScheduleTypeLimit> =
    LazyLock::new(|| limit("Humidity", Some(0.0), Some(100.0), Continuous, UnitType::Percent));
pub static ANGLE: LazyLock<ScheduleTypeLimit> =
    LazyLock::new(|| limit("Angle", Some(0.0), Some(180.0), Continuous, UnitType::Angle));
pub static DELTA_TEMPERATURE: LazyLock<ScheduleTypeLimit> = LazyLock::new(|| {
    limit("Delta Temperature", None, None, Continuous, UnitType::DeltaTemperature)
});
pub static PERCENT: LazyLock<ScheduleTypeLimit> =
    LazyLock::new(|| limit("Percent", Some(0.0), Some(100.0), Continuous, UnitType::Percent));
pub static CONTROL_TYPE: LazyLock<ScheduleTypeLimit> =
    LazyLock::new(|| limit("Control Type", Some(0.0), Some(4.0), Discrete, UnitType::Control));

pub fn schedule_type_limits() -> Vec<ScheduleTypeLimit> {
    [
        &FRACTIONAL,
        &ON_OFF,
        &TEMPERATURE,
        &ACTIVITY_LEVEL,
        &POWER,
        &HUMIDITY,
        &ANGLE,
        &DELTA_TEMPERATURE,
        &PERCENT,
        &CONTROL_TYPE,
    ]
    .into_iter()
    .map(|l| LazyLock::force(l).clone())
    .collect()
}

pub fn schedule_type_limit_by_name(name: &str) -> Option<ScheduleTypeLimit> {
    schedule_type_limits().into_iter().find(|l| l.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn library_limits_are_valid() {
        let all = schedule_type_limits();
        assert_eq!(all.len(), 10);
        assert!(all.iter().all(|l| l.validate().is_ok()));
    }

    #[test]
    fn lookup_by_name() {
        let t = schedule_type_limit_by_name("Temperature").unwrap();
        assert_eq!(t.unit(), "C");
        assert_eq!(t.lower_limit, Some(-273.15));
        assert!(schedule_type_limit_by_name("Nope").is_none());
    }
}
