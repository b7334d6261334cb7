//! Calendar helpers: month/day dates, clock times and days of the week.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

const LEAP_YEAR: i32 = 2016;
const COMMON_YEAR: i32 = 2017;

/// A month and day without a year, serialized as `[month, day]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Date(pub u32, pub u32);

impl Date {
    pub const JAN_1: Date = Date(1, 1);
    pub const DEC_31: Date = Date(12, 31);

    /// Creates a date, allowing February 29.
    pub fn new(month: u32, day: u32) -> Result<Self> {
        let date = Date(month, day);
        date.validate()?;
        Ok(date)
    }

    pub fn month(self) -> u32 {
        self.0
    }

    pub fn day(self) -> u32 {
        self.1
    }

    pub fn validate(self) -> Result<()> {
        match NaiveDate::from_ymd_opt(LEAP_YEAR, self.0, self.1) {
            Some(_) => Ok(()),
            None => Err(Error::invalid(
                "date",
                format!("{self} is not a calendar date"),
            )),
        }
    }

    /// Day of the year starting at 1, or `None` for February 29 of a
    /// common year.
    pub fn doy(self, leap_year: bool) -> Option<u32> {
        let year = if leap_year { LEAP_YEAR } else { COMMON_YEAR };
        NaiveDate::from_ymd_opt(year, self.0, self.1).map(|d| d.ordinal())
    }

    /// Inverse of [`Date::doy`]. Out-of-range days clamp to the year's ends.
    pub fn from_doy(doy: u32, leap_year: bool) -> Self {
        let year = if leap_year { LEAP_YEAR } else { COMMON_YEAR };
        let last = if leap_year { 366 } else { 365 };
        NaiveDate::from_yo_opt(year, doy.clamp(1, last))
            .map(|d| Date(d.month(), d.day()))
            .unwrap_or(Date::DEC_31)
    }
}

impl Default for Date {
    fn default() -> Self {
        Date::JAN_1
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}/{:02}", self.0, self.1)
    }
}

/// Time of day with minute resolution, serialized as `[hour, minute]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Time(pub u32, pub u32);

impl Time {
    pub const MIDNIGHT: Time = Time(0, 0);

    pub fn new(hour: u32, minute: u32) -> Result<Self> {
        let time = Time(hour, minute);
        time.validate()?;
        Ok(time)
    }

    pub fn from_minutes(minutes: u32) -> Self {
        Time(minutes / 60, minutes % 60)
    }

    pub fn validate(self) -> Result<()> {
        if self.0 < 24 && self.1 < 60 {
            Ok(())
        } else {
            Err(Error::invalid("time", format!("{self} is not a time of day")))
        }
    }

    /// Minutes since midnight.
    pub fn minutes(self) -> u32 {
        self.0 * 60 + self.1
    }

    /// Parses `HH:MM`, accepting `24:00` as the end of the day.
    pub(crate) fn parse_until(text: &str) -> Option<u32> {
        let (h, m) = text.trim().split_once(':')?;
        let h: u32 = h.trim().parse().ok()?;
        let m: u32 = m.trim().parse().ok()?;
        let total = h * 60 + m;
        (m < 60 && total <= 1440).then_some(total)
    }
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.0, self.1)
    }
}

/// Day of the week, numbered 1 (Sunday) through 7 (Saturday).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DayOfWeek {
    #[default]
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl DayOfWeek {
    pub const ALL: [DayOfWeek; 7] = [
        DayOfWeek::Sunday,
        DayOfWeek::Monday,
        DayOfWeek::Tuesday,
        DayOfWeek::Wednesday,
        DayOfWeek::Thursday,
        DayOfWeek::Friday,
        DayOfWeek::Saturday,
    ];

    pub fn number(self) -> u32 {
        self as u32 + 1
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DayOfWeek::Sunday => "Sunday",
            DayOfWeek::Monday => "Monday",
            DayOfWeek::Tuesday => "Tuesday",
            DayOfWeek::Wednesday => "Wednesday",
            DayOfWeek::Thursday => "Thursday",
            DayOfWeek::Friday => "Friday",
            DayOfWeek::Saturday => "Saturday",
        }
    }
}

impl fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DayOfWeek {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        DayOfWeek::ALL
            .into_iter()
            .find(|d| d.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::invalid("day of week", format!("\"{s}\" is not a weekday name")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn day_of_year_common_and_leap() {
        assert_eq!(Date(1, 1).doy(false), Some(1));
        assert_eq!(Date(3, 1).doy(false), Some(60));
        assert_eq!(Date(3, 1).doy(true), Some(61));
        assert_eq!(Date(12, 31).doy(false), Some(365));
        assert_eq!(Date(2, 29).doy(false), None);
        assert_eq!(Date::from_doy(60, false), Date(3, 1));
        assert_eq!(Date::from_doy(366, true), Date(12, 31));
    }

    #[test]
    fn rejects_impossible_dates() {
        assert!(Date::new(2, 29).is_ok());
        assert!(Date::new(2, 30).is_err());
        assert!(Date::new(13, 1).is_err());
        assert!(Time::new(24, 0).is_err());
    }

    #[test]
    fn until_times() {
        assert_eq!(Time::parse_until("24:00"), Some(1440));
        assert_eq!(Time::parse_until(" 9:30"), Some(570));
        assert_eq!(Time::parse_until("25:00"), None);
        assert_eq!(Time(7, 5).to_string(), "07:05");
    }

    #[test]
    fn weekday_numbers() {
        assert_eq!(DayOfWeek::Sunday.number(), 1);
        assert_eq!(DayOfWeek::Saturday.number(), 7);
        assert_eq!("monday".parse::<DayOfWeek>().ok(), Some(DayOfWeek::Monday));
    }
}
