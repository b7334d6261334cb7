//! Rules that apply a day schedule to certain days of a date range.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::date::Date;
use super::day::ScheduleDay;
use crate::error::{Error, Result};
use crate::idf::reader::field;
use crate::idf::{object_type, parse_idf_string};

const DAY_NAMES: [&str; 8] = [
    "sunday",
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
    "holiday",
];

fn jan_1() -> Date {
    Date::JAN_1
}

fn dec_31() -> Date {
    Date::DEC_31
}

/// A day schedule applied on selected weekdays between two dates.
///
/// Dates are inclusive and refer to a common (non-leap) year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRule {
    pub schedule_day: ScheduleDay,
    #[serde(default)]
    pub apply_sunday: bool,
    #[serde(default)]
    pub apply_monday: bool,
    #[serde(default)]
    pub apply_tuesday: bool,
    #[serde(default)]
    pub apply_wednesday: bool,
    #[serde(default)]
    pub apply_thursday: bool,
    #[serde(default)]
    pub apply_friday: bool,
    #[serde(default)]
    pub apply_saturday: bool,
    #[serde(default)]
    pub apply_holiday: bool,
    #[serde(default = "jan_1")]
    pub start_date: Date,
    #[serde(default = "dec_31")]
    pub end_date: Date,
}

impl ScheduleRule {
    /// A whole-year rule that applies on no days until some are set.
    pub fn new(schedule_day: ScheduleDay) -> Self {
        Self {
            schedule_day,
            apply_sunday: false,
            apply_monday: false,
            apply_tuesday: false,
            apply_wednesday: false,
            apply_thursday: false,
            apply_friday: false,
            apply_saturday: false,
            apply_holiday: false,
            start_date: Date::JAN_1,
            end_date: Date::DEC_31,
        }
    }

    /// Sets the date range.
    ///
    /// # Errors
    ///
    /// Returns an error if either date is February 29 or if `start` comes
    /// after `end`.
    pub fn with_dates(mut self, start: Date, end: Date) -> Result<Self> {
        self.start_date = start;
        self.end_date = end;
        self.check_dates()?;
        Ok(self)
    }

    /// Builds a rule from day names such as `["weekday", "holiday"]`.
    pub fn from_days_applied(
        schedule_day: ScheduleDay,
        days: &[&str],
        start: Date,
        end: Date,
    ) -> Result<Self> {
        let mut rule = Self::new(schedule_day).with_dates(start, end)?;
        for day in days {
            rule.apply_day_by_name(day)?;
        }
        Ok(rule)
    }

    pub fn validate(&self) -> Result<()> {
        self.schedule_day.validate()?;
        self.check_dates()
    }

    fn check_dates(&self) -> Result<()> {
        for d in [self.start_date, self.end_date] {
            d.validate()?;
            if d.doy(false).is_none() {
                return Err(self.err(format!("rule date {d} does not exist in a common year")));
            }
        }
        if self.start_date > self.end_date {
            return Err(self.err(format!(
                "start date {} comes after end date {}",
                self.start_date, self.end_date
            )));
        }
        Ok(())
    }

    fn err(&self, reason: String) -> Error {
        Error::Schedule {
            name: self.schedule_day.name.clone(),
            reason,
        }
    }

    pub fn start_doy(&self) -> u32 {
        self.start_date.doy(false).unwrap_or(1)
    }

    pub fn end_doy(&self) -> u32 {
        self.end_date.doy(false).unwrap_or(365)
    }

    pub fn apply_weekday(&self) -> bool {
        self.apply_monday
            && self.apply_tuesday
            && self.apply_wednesday
            && self.apply_thursday
            && self.apply_friday
    }

    pub fn set_apply_weekday(&mut self, value: bool) {
        self.apply_monday = value;
        self.apply_tuesday = value;
        self.apply_wednesday = value;
        self.apply_thursday = value;
        self.apply_friday = value;
    }

    pub fn apply_weekend(&self) -> bool {
        self.apply_sunday && self.apply_saturday
    }

    pub fn set_apply_weekend(&mut self, value: bool) {
        self.apply_sunday = value;
        self.apply_saturday = value;
    }

    pub fn apply_all(&self) -> bool {
        self.apply_weekday() && self.apply_weekend() && self.apply_holiday
    }

    /// Sets every weekday and holidays.
    pub fn set_apply_all(&mut self, value: bool) {
        self.set_apply_weekday(value);
        self.set_apply_weekend(value);
        self.apply_holiday = value;
    }

    /// Flags Sunday through Saturday.
    pub fn week_apply_tuple(&self) -> [bool; 7] {
        [
            self.apply_sunday,
            self.apply_monday,
            self.apply_tuesday,
            self.apply_wednesday,
            self.apply_thursday,
            self.apply_friday,
            self.apply_saturday,
        ]
    }

    /// Lowercase names of the days this rule applies on.
    pub fn days_applied(&self) -> Vec<&'static str> {
        let week = self.week_apply_tuple();
        DAY_NAMES
            .iter()
            .zip(week.iter().chain(std::iter::once(&self.apply_holiday)))
            .filter(|(_, on)| **on)
            .map(|(name, _)| *name)
            .collect()
    }

    /// Applies the rule on a named day, `weekday`, `weekend` or `all`.
    pub fn apply_day_by_name(&mut self, day: &str) -> Result<()> {
        match day.trim().to_ascii_lowercase().as_str() {
            "weekday" => self.set_apply_weekday(true),
            "weekend" => self.set_apply_weekend(true),
            "all" => self.set_apply_all(true),
            other => match DAY_NAMES.iter().position(|d| *d == other) {
                Some(i) => return self.apply_day_by_dow(i as u32 + 1),
                None => {
                    return Err(Error::invalid(
                        "day name",
                        format!("\"{day}\" is not a day of the week, holiday, weekday, weekend or all"),
                    ));
                }
            },
        }
        Ok(())
    }

    /// Applies the rule by day number: 1 is Sunday, 7 Saturday, 8 holiday.
    pub fn apply_day_by_dow(&mut self, dow: u32) -> Result<()> {
        let flag = match dow {
            1 => &mut self.apply_sunday,
            2 => &mut self.apply_monday,
            3 => &mut self.apply_tuesday,
            4 => &mut self.apply_wednesday,
            5 => &mut self.apply_thursday,
            6 => &mut self.apply_friday,
            7 => &mut self.apply_saturday,
            8 => &mut self.apply_holiday,
            _ => {
                return Err(Error::out_of_range("day of week", f64::from(dow), "from 1 to 8"));
            }
        };
        *flag = true;
        Ok(())
    }

    /// Whether the rule covers day-of-year `doy`, ignoring the weekday.
    pub fn does_rule_apply_doy(&self, doy: u32) -> bool {
        (self.start_doy()..=self.end_doy()).contains(&doy)
    }

    pub fn does_rule_apply_doy_leap_year(&self, doy: u32) -> bool {
        let shift = |d: Date, doy: u32| if d.month() > 2 { doy + 1 } else { doy };
        let start = shift(self.start_date, self.start_doy());
        let end = shift(self.end_date, self.end_doy());
        (start..=end).contains(&doy)
    }

    /// Whether the rule applies on `doy` falling on weekday `dow` (1 to 7).
    ///
    /// Without `dow`, the year is taken to start on a Sunday.
    pub fn does_rule_apply(&self, doy: u32, dow: Option<u32>) -> bool {
        self.applies_on_dow(doy, dow) && self.does_rule_apply_doy(doy)
    }

    pub fn does_rule_apply_leap_year(&self, doy: u32, dow: Option<u32>) -> bool {
        self.applies_on_dow(doy, dow) && self.does_rule_apply_doy_leap_year(doy)
    }

    fn applies_on_dow(&self, doy: u32, dow: Option<u32>) -> bool {
        let dow = dow.unwrap_or((doy.max(1) - 1) % 7 + 1);
        let i = (dow.clamp(1, 7) - 1) as usize;
        self.week_apply_tuple()[i]
    }

    /// Reads the rules described by a `Schedule:Week:Daily` or
    /// `Schedule:Week:Compact` object.
    ///
    /// Days sharing a day schedule in a daily week share one rule.
    pub fn extract_all_from_schedule_week(
        text: &str,
        day_schedules: &HashMap<String, ScheduleDay>,
    ) -> Result<Vec<ScheduleRule>> {
        let lookup = |name: &str| {
            day_schedules
                .get(name)
                .cloned()
                .ok_or_else(|| Error::missing("day schedule", name))
        };
        let ty = object_type(text);
        let mut rules: Vec<ScheduleRule> = Vec::new();
        if ty.eq_ignore_ascii_case("Schedule:Week:Daily") {
            const T: &str = "Schedule:Week:Daily";
            let f = parse_idf_string(text, Some(T))?;
            let mut applied: Vec<&str> = Vec::new();
            for dow in 1..=8u32 {
                let day_name = field(&f, dow as usize, T, DAY_NAMES[dow as usize - 1])?;
                match applied.iter().position(|n| *n == day_name) {
                    Some(i) => rules[i].apply_day_by_dow(dow)?,
                    None => {
                        let mut rule = ScheduleRule::new(lookup(day_name)?);
                        rule.apply_day_by_dow(dow)?;
                        rules.push(rule);
                        applied.push(day_name);
                    }
                }
            }
        } else {
            const T: &str = "Schedule:Week:Compact";
            let f = parse_idf_string(text, Some(T))?;
            for pair in f.get(1..).unwrap_or_default().chunks(2) {
                let [day_type, day_name] = pair else {
                    return Err(Error::idf(T, "day type without a day schedule"));
                };
                let mut rule = ScheduleRule::new(lookup(day_name)?);
                let day_type = day_type.to_ascii_lowercase();
                if day_type.contains("alldays") {
                    rule.set_apply_all(true);
                } else if day_type.contains("weekdays") {
                    rule.set_apply_weekday(true);
                } else if day_type.contains("weekends") {
                    rule.set_apply_weekend(true);
                } else if let Some(i) = DAY_NAMES.iter().position(|d| day_type.contains(d)) {
                    rule.apply_day_by_dow(i as u32 + 1)?;
                }
                rules.push(rule);
            }
        }
        Ok(rules)
    }
}
