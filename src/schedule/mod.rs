//! Schedules: type limits, day schedules, rules, rulesets and fixed-interval
//! series.

pub mod date;
pub mod day;
pub mod fixedinterval;
pub mod rule;
pub mod ruleset;
pub mod typelimit;

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub use date::{Date, DayOfWeek, Time};
pub use day::ScheduleDay;
pub use fixedinterval::ScheduleFixedInterval;
pub use rule::ScheduleRule;
pub use ruleset::ScheduleRuleset;
pub use typelimit::{NumericType, ScheduleTypeLimit, UnitType};

/// Timesteps per hour that divide an hour into whole minutes.
pub const VALID_TIMESTEPS: [u32; 12] = [1, 2, 3, 4, 5, 6, 10, 12, 15, 20, 30, 60];

pub(crate) fn check_timestep(timestep: u32) -> Result<()> {
    if VALID_TIMESTEPS.contains(&timestep) {
        Ok(())
    } else {
        Err(Error::invalid(
            "timestep",
            format!("{timestep} is not one of {VALID_TIMESTEPS:?}"),
        ))
    }
}

/// Any schedule a load, setpoint or shade can reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Schedule {
    #[serde(rename = "ScheduleRuleset")]
    Ruleset(ScheduleRuleset),
    #[serde(rename = "ScheduleFixedInterval")]
    FixedInterval(ScheduleFixedInterval),
}

impl Schedule {
    pub fn name(&self) -> &str {
        match self {
            Schedule::Ruleset(s) => &s.name,
            Schedule::FixedInterval(s) => &s.name,
        }
    }

    pub fn schedule_type_limit(&self) -> Option<&ScheduleTypeLimit> {
        match self {
            Schedule::Ruleset(s) => s.schedule_type_limit.as_ref(),
            Schedule::FixedInterval(s) => s.schedule_type_limit.as_ref(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            Schedule::Ruleset(s) => s.validate(),
            Schedule::FixedInterval(s) => s.validate(),
        }
    }

    /// Values over the year at `timestep`.
    pub fn annual_values(&self, timestep: u32) -> Result<Vec<f64>> {
        match self {
            Schedule::Ruleset(s) => s.annual_values(timestep),
            Schedule::FixedInterval(s) => s.values_at_timestep(timestep),
        }
    }

    /// A single value if the schedule never changes.
    pub fn constant_value(&self) -> Option<f64> {
        match self {
            Schedule::Ruleset(s) if s.is_constant() => s.default_day_schedule.values.first().copied(),
            Schedule::Ruleset(_) => None,
            Schedule::FixedInterval(s) => {
                let first = *s.values.first()?;
                s.values.iter().all(|v| *v == first).then_some(first)
            }
        }
    }

    /// Every value the schedule can take, in no particular order.
    pub fn all_values(&self) -> Vec<f64> {
        match self {
            Schedule::Ruleset(s) => s
                .day_schedules()
                .into_iter()
                .flat_map(|d| d.values.iter().copied())
                .collect(),
            Schedule::FixedInterval(s) => s.values.clone(),
        }
    }

    /// IDF objects for the schedule. Fixed-interval schedules write their
    /// CSV into `directory`.
    pub fn to_idf(&self, directory: &Path) -> Result<Vec<String>> {
        match self {
            Schedule::Ruleset(s) => Ok(s.idf_objects()),
            Schedule::FixedInterval(s) => Ok(vec![s.to_idf(directory)?]),
        }
    }

    /// Weighted average of several schedules.
    ///
    /// Rulesets average into a ruleset. Any fixed-interval input makes the
    /// result a fixed-interval schedule at `timestep`.
    pub fn average(
        name: &str,
        schedules: &[&Schedule],
        weights: Option<&[f64]>,
        timestep: u32,
    ) -> Result<Schedule> {
        let rulesets: Option<Vec<&ScheduleRuleset>> = schedules
            .iter()
            .map(|s| match s {
                Schedule::Ruleset(r) => Some(r),
                Schedule::FixedInterval(_) => None,
            })
            .collect();
        if let Some(rulesets) = rulesets {
            return ScheduleRuleset::average_schedules(name, &rulesets, weights, timestep)
                .map(Schedule::Ruleset);
        }
        let weights = ruleset::average_weights(schedules.len(), weights)?;
        let mut total: Vec<f64> = Vec::new();
        for (sched, w) in schedules.iter().zip(&weights) {
            let values = sched.annual_values(timestep)?;
            if total.len() < values.len() {
                total.resize(values.len(), 0.0);
            }
            for (acc, v) in total.iter_mut().zip(values) {
                *acc += v * w;
            }
        }
        let limit = schedules.first().and_then(|s| s.schedule_type_limit().cloned());
        let leap = total.len() == 8784 * timestep as usize;
        let expected = (if leap { 8784 } else { 8760 }) * timestep as usize;
        total.truncate(expected);
        ScheduleFixedInterval::new(name, total, timestep, limit).map(Schedule::FixedInterval)
    }
}

impl From<ScheduleRuleset> for Schedule {
    fn from(s: ScheduleRuleset) -> Self {
        Schedule::Ruleset(s)
    }
}

impl From<ScheduleFixedInterval> for Schedule {
    fn from(s: ScheduleFixedInterval) -> Self {
        Schedule::FixedInterval(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timesteps_divide_the_hour() {
        assert!(check_timestep(6).is_ok());
        assert!(check_timestep(7).is_err());
        assert!(check_timestep(0).is_err());
    }

    #[test]
    fn constant_values() {
        let on: Schedule = ScheduleRuleset::from_constant_value("On", 1.0, None)
            .unwrap()
            .into();
        assert_eq!(on.constant_value(), Some(1.0));
        let fixed: Schedule = ScheduleFixedInterval::new("Flat", vec![0.4; 8760], 1, None)
            .unwrap()
            .into();
        assert_eq!(fixed.constant_value(), Some(0.4));
    }

    #[test]
    fn mixed_average_is_fixed_interval() {
        let on: Schedule = ScheduleRuleset::from_constant_value("On", 1.0, None)
            .unwrap()
            .into();
        let fixed: Schedule = ScheduleFixedInterval::new("Zero", vec![0.0; 8760], 1, None)
            .unwrap()
            .into();
        let avg = Schedule::average("Mix", &[&on, &fixed], None, 1).unwrap();
        assert!(matches!(avg, Schedule::FixedInterval(_)));
        assert_eq!(avg.constant_value(), Some(0.5));
    }

    #[test]
    fn tagged_json() {
        let on: Schedule = ScheduleRuleset::from_constant_value("On", 1.0, None)
            .unwrap()
            .into();
        let json = serde_json::to_value(&on).unwrap();
        assert_eq!(json["type"], "ScheduleRuleset");
        let back: Schedule = serde_json::from_value(json).unwrap();
        assert_eq!(back, on);
    }
}
