//! A single day of schedule values.

use serde::{Deserialize, Serialize};

use super::check_timestep;
use super::date::Time;
use super::typelimit::ScheduleTypeLimit;
use crate::error::{Error, Result, check_ep_name};
use crate::idf::reader::{field, parse_f64};
use crate::idf::{generate_idf_string, object_type, parse_idf_string};

fn default_times() -> Vec<Time> {
    vec![Time::MIDNIGHT]
}

/// Values over one day, each holding from its start time until the next.
///
/// Written to IDF as `Schedule:Day:Interval`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleDay {
    pub name: String,
    pub values: Vec<f64>,
    /// Start time of each value. The first is always midnight.
    #[serde(default = "default_times")]
    pub times: Vec<Time>,
    /// Interpolate linearly between values instead of stepping.
    #[serde(default)]
    pub interpolate: bool,
}

impl ScheduleDay {
    /// # Errors
    ///
    /// Returns an error if the name is invalid, `values` and `times` differ in
    /// length, the first time is not midnight, or times do not increase.
    pub fn new(name: &str, values: Vec<f64>, times: Vec<Time>, interpolate: bool) -> Result<Self> {
        let day = Self {
            name: name.to_string(),
            values,
            times,
            interpolate,
        };
        day.validate()?;
        Ok(day)
    }

    /// A day holding one value throughout.
    pub fn constant(name: &str, value: f64) -> Result<Self> {
        Self::new(name, vec![value], default_times(), false)
    }

    /// Builds a day from `24 * timestep` evenly spaced values.
    ///
    /// With `remove_repeated`, runs of equal values collapse into a single
    /// interval.
    ///
    /// # Examples
    ///
    /// ```
    /// use honeybee_energy::schedule::ScheduleDay;
    ///
    /// let mut hourly = vec![0.0; 24];
    /// hourly[9..17].fill(1.0);
    /// let day = ScheduleDay::from_values_at_timestep("Office", &hourly, 1, true).unwrap();
    /// assert_eq!(day.values, vec![0.0, 1.0, 0.0]);
    /// ```
    pub fn from_values_at_timestep(
        name: &str,
        values: &[f64],
        timestep: u32,
        remove_repeated: bool,
    ) -> Result<Self> {
        check_timestep(timestep)?;
        let expected = 24 * timestep as usize;
        if values.len() != expected {
            return Err(Error::Schedule {
                name: name.to_string(),
                reason: format!(
                    "expected {expected} values at timestep {timestep}, got {}",
                    values.len()
                ),
            });
        }
        let step = 60 / timestep;
        let mut times = Vec::new();
        let mut vals = Vec::new();
        for (i, v) in values.iter().enumerate() {
            if remove_repeated && vals.last() == Some(v) {
                continue;
            }
            times.push(Time::from_minutes(i as u32 * step));
            vals.push(*v);
        }
        Self::new(name, vals, times, false)
    }

    pub fn validate(&self) -> Result<()> {
        check_ep_name(&self.name)?;
        let fail = |reason: String| {
            Err(Error::Schedule {
                name: self.name.clone(),
                reason,
            })
        };
        if self.values.is_empty() {
            return fail("a day schedule needs at least one value".into());
        }
        if self.values.len() != self.times.len() {
            return fail(format!(
                "{} values but {} times",
                self.values.len(),
                self.times.len()
            ));
        }
        if self.times.first() != Some(&Time::MIDNIGHT) {
            return fail("the first time must be 00:00".into());
        }
        for t in &self.times {
            t.validate()?;
        }
        if let Some(w) = self.times.windows(2).find(|w| w[0] >= w[1]) {
            return fail(format!("time {} does not follow {}", w[1], w[0]));
        }
        if self.values.iter().any(|v| !v.is_finite()) {
            return fail("values must be finite numbers".into());
        }
        Ok(())
    }

    /// Adds a value starting at `time`, keeping times in order.
    pub fn add_value(&mut self, value: f64, time: Time) -> Result<()> {
        time.validate()?;
        let pos = self.times.partition_point(|t| *t < time);
        if self.times.get(pos) == Some(&time) {
            self.values[pos] = value;
        } else {
            self.times.insert(pos, time);
            self.values.insert(pos, value);
        }
        Ok(())
    }

    /// Removes the value at `index`. The midnight value cannot be removed.
    pub fn remove_value(&mut self, index: usize) -> Result<()> {
        if index == 0 || index >= self.values.len() {
            return Err(Error::Schedule {
                name: self.name.clone(),
                reason: format!("cannot remove value at index {index}"),
            });
        }
        self.values.remove(index);
        self.times.remove(index);
        Ok(())
    }

    pub fn is_constant(&self) -> bool {
        self.values.windows(2).all(|w| w[0] == w[1])
    }

    fn value(&self, i: usize) -> f64 {
        self.values.get(i).copied().unwrap_or_default()
    }

    /// End of each interval in minutes, the last being 1440.
    fn end_minutes(&self) -> impl Iterator<Item = u32> + '_ {
        self.times
            .iter()
            .skip(1)
            .map(|t| t.minutes())
            .chain(std::iter::once(1440))
    }

    /// Time-weighted mean over the day.
    pub fn average(&self) -> f64 {
        self.times
            .iter()
            .zip(self.end_minutes())
            .enumerate()
            .map(|(i, (start, end))| self.value(i) * f64::from(end - start.minutes()))
            .sum::<f64>()
            / 1440.0
    }

    /// Values sampled at the start of each of the `24 * timestep` steps.
    pub fn values_at_timestep(&self, timestep: u32) -> Vec<f64> {
        let steps = 24 * timestep.max(1);
        let step = 1440.0 / f64::from(steps);
        let starts: Vec<f64> = self.times.iter().map(|t| f64::from(t.minutes())).collect();
        (0..steps)
            .map(|i| {
                let m = f64::from(i) * step;
                let k = starts.iter().rposition(|s| *s <= m).unwrap_or(0);
                match starts.get(k + 1) {
                    Some(next) if self.interpolate => {
                        let frac = (m - starts[k]) / (next - starts[k]);
                        self.value(k) + frac * (self.value(k + 1) - self.value(k))
                    }
                    _ => self.value(k),
                }
            })
            .collect()
    }

    /// Writes a `Schedule:Day:Interval` object.
    pub fn to_idf(&self, type_limit: Option<&ScheduleTypeLimit>) -> String {
        let mut values = vec![
            self.name.clone(),
            type_limit.map(|t| t.name.clone()).unwrap_or_default(),
            if self.interpolate { "Linear" } else { "No" }.to_string(),
        ];
        let mut comments = vec![
            "schedule name".to_string(),
            "schedule type limits".into(),
            "interpolate to timestep".into(),
        ];
        for (i, end) in self.end_minutes().enumerate() {
            values.push(format!("Until: {:02}:{:02}", end / 60, end % 60));
            values.push(self.value(i).to_string());
            comments.push(format!("time {}", i + 1));
            comments.push(format!("value until time {}", i + 1));
        }
        let comments: Vec<&str> = comments.iter().map(String::as_str).collect();
        generate_idf_string("Schedule:Day:Interval", &values, Some(&comments))
    }

    /// Parses `Schedule:Day:Interval`, `Schedule:Day:Hourly` or
    /// `Schedule:Day:List`.
    pub fn from_idf(text: &str) -> Result<Self> {
        let ty = object_type(text);
        match ty.to_ascii_lowercase().as_str() {
            "schedule:day:interval" => Self::from_interval_idf(text),
            "schedule:day:hourly" => {
                const T: &str = "Schedule:Day:Hourly";
                let f = parse_idf_string(text, Some(T))?;
                let name = field(&f, 0, T, "name")?;
                let vals = f
                    .iter()
                    .skip(2)
                    .map(|v| parse_f64(v, T, "hourly value"))
                    .collect::<Result<Vec<_>>>()?;
                Self::from_values_at_timestep(name, &vals, 1, true)
            }
            "schedule:day:list" => {
                const T: &str = "Schedule:Day:List";
                let f = parse_idf_string(text, Some(T))?;
                let name = field(&f, 0, T, "name")?;
                let minutes = parse_f64(field(&f, 3, T, "minutes per item")?, T, "minutes")?;
                if minutes < 1.0 || 60.0 % minutes != 0.0 {
                    return Err(Error::idf(T, format!("unsupported minutes per item {minutes}")));
                }
                let vals = f
                    .iter()
                    .skip(4)
                    .map(|v| parse_f64(v, T, "list value"))
                    .collect::<Result<Vec<_>>>()?;
                Self::from_values_at_timestep(name, &vals, 60 / minutes as u32, true)
            }
            _ => Err(Error::idf(
                "Schedule:Day",
                format!("\"{ty}\" is not a supported day schedule"),
            )),
        }
    }

    fn from_interval_idf(text: &str) -> Result<Self> {
        const T: &str = "Schedule:Day:Interval";
        let f = parse_idf_string(text, Some(T))?;
        let name = field(&f, 0, T, "name")?;
        let interpolate = matches!(
            f.get(2).map(|s| s.to_ascii_lowercase()).as_deref(),
            Some("linear" | "yes")
        );
        let mut times = vec![Time::MIDNIGHT];
        let mut values = Vec::new();
        for pair in f.get(3..).unwrap_or_default().chunks(2) {
            let [until, value] = pair else {
                return Err(Error::idf(T, "time without a matching value"));
            };
            let clock = until
                .trim()
                .trim_start_matches(|c: char| c.is_ascii_alphabetic())
                .trim_start_matches(':');
            let end = Time::parse_until(clock)
                .ok_or_else(|| Error::idf(T, format!("\"{until}\" is not a time")))?;
            values.push(parse_f64(value, T, "value")?);
            if end < 1440 {
                times.push(Time::from_minutes(end));
            }
        }
        times.truncate(values.len());
        Self::new(name, values, times, interpolate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn office() -> ScheduleDay {
        ScheduleDay::new(
            "Office Occupancy",
            vec![0.0, 1.0, 0.5, 0.0],
            vec![Time(0, 0), Time(9, 0), Time(17, 0), Time(19, 0)],
            false,
        )
        .unwrap()
    }

    #[test]
    fn hourly_values_step() {
        let vals = office().values_at_timestep(1);
        assert_eq!(vals.len(), 24);
        assert_eq!(vals[8], 0.0);
        assert_eq!(vals[9], 1.0);
        assert_eq!(vals[17], 0.5);
        assert_eq!(vals[19], 0.0);
    }

    #[test]
    fn interpolated_values() {
        let day = ScheduleDay::new("Ramp", vec![0.0, 1.0], vec![Time(0, 0), Time(12, 0)], true)
            .unwrap();
        let vals = day.values_at_timestep(1);
        assert!((vals[6] - 0.5).abs() < 1e-9);
        assert_eq!(vals[23], 1.0);
    }

    #[test]
    fn average_is_time_weighted() {
        let day = office();
        let expected = (8.0 * 1.0 + 2.0 * 0.5) / 24.0;
        assert!((day.average() - expected).abs() < 1e-9);
    }

    #[test]
    fn rejects_bad_times() {
        assert!(ScheduleDay::new("A", vec![1.0], vec![Time(1, 0)], false).is_err());
        assert!(
            ScheduleDay::new("A", vec![1.0, 2.0], vec![Time(0, 0), Time(0, 0)], false).is_err()
        );
        assert!(ScheduleDay::new("A", vec![1.0, 2.0], vec![Time(0, 0)], false).is_err());
        assert!(ScheduleDay::from_values_at_timestep("A", &[1.0; 23], 1, true).is_err());
        assert!(ScheduleDay::from_values_at_timestep("A", &[1.0; 168], 7, true).is_err());
    }

    #[test]
    fn idf_round_trip() {
        let day = office();
        let idf = day.to_idf(None);
        assert!(idf.contains("Until: 09:00,"));
        assert!(idf.contains("Until: 24:00,"));
        let back = ScheduleDay::from_idf(&idf).unwrap();
        assert_eq!(back, day);
    }

    #[test]
    fn hourly_idf_collapses_repeats() {
        let mut text = String::from("Schedule:Day:Hourly, Flat, Fraction");
        for _ in 0..24 {
            text.push_str(", 0.3");
        }
        text.push(';');
        let day = ScheduleDay::from_idf(&text).unwrap();
        assert_eq!(day.values, vec![0.3]);
        assert!(day.is_constant());
    }

    #[test]
    fn add_and_remove_values() {
        let mut day = office();
        day.add_value(0.8, Time(12, 0)).unwrap();
        assert_eq!(day.times[2], Time(12, 0));
        assert_eq!(day.values[2], 0.8);
        assert!(day.remove_value(0).is_err());
        day.remove_value(2).unwrap();
        assert_eq!(day, office());
    }
}
