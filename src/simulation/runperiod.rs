//! Simulation run period, holidays and daylight saving time.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::idf::{generate_idf_string, parse_idf_string};
use crate::schedule::{Date, DayOfWeek};

/// Start and end of daylight saving time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DaylightSavingTime {
    pub start_date: Date,
    pub end_date: Date,
}

impl Default for DaylightSavingTime {
    fn default() -> Self {
        Self {
            start_date: Date(3, 12),
            end_date: Date(11, 5),
        }
    }
}

impl DaylightSavingTime {
    pub fn validate(&self) -> Result<()> {
        self.start_date.validate()?;
        self.end_date.validate()
    }

    pub fn to_idf(&self) -> String {
        let values = [date_field(self.start_date), date_field(self.end_date)];
        generate_idf_string(
            "RunPeriodControl:DaylightSavingTime",
            &values,
            Some(&["start date", "end date"]),
        )
    }

    pub fn from_idf(text: &str) -> Result<Self> {
        const T: &str = "RunPeriodControl:DaylightSavingTime";
        let f = parse_idf_string(text, Some(T))?;
        let field = |i: usize| f.get(i).map(String::as_str).unwrap_or("");
        Ok(Self {
            start_date: parse_date_field(field(0), T)?,
            end_date: parse_date_field(field(1), T)?,
        })
    }
}

/// `month/day` as IDF date fields are written.
fn date_field(date: Date) -> String {
    format!("{}/{}", date.month(), date.day())
}

fn parse_date_field(text: &str, object_type: &str) -> Result<Date> {
    let (m, d) = text
        .split_once('/')
        .ok_or_else(|| Error::idf(object_type, format!("\"{text}\" is not a month/day date")))?;
    let month = m
        .trim()
        .parse()
        .map_err(|_| Error::idf(object_type, format!("bad month in \"{text}\"")))?;
    let day = d
        .trim()
        .parse()
        .map_err(|_| Error::idf(object_type, format!("bad day in \"{text}\"")))?;
    Date::new(month, day)
}

/// The stretch of the year to simulate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunPeriod {
    pub start_date: Date,
    pub end_date: Date,
    pub start_day_of_week: DayOfWeek,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub holidays: Vec<Date>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub daylight_saving_time: Option<DaylightSavingTime>,
    pub is_leap_year: bool,
}

impl Default for RunPeriod {
    fn default() -> Self {
        Self {
            start_date: Date::JAN_1,
            end_date: Date::DEC_31,
            start_day_of_week: DayOfWeek::Sunday,
            holidays: Vec::new(),
            daylight_saving_time: None,
            is_leap_year: false,
        }
    }
}

impl RunPeriod {
    /// # Errors
    ///
    /// Returns an error if either date is invalid or the end does not come
    /// after the start.
    pub fn new(start_date: Date, end_date: Date) -> Result<Self> {
        let rp = Self {
            start_date,
            end_date,
            ..Self::default()
        };
        rp.validate()?;
        Ok(rp)
    }

    pub fn validate(&self) -> Result<()> {
        for date in [self.start_date, self.end_date]
            .iter()
            .chain(&self.holidays)
        {
            date.validate()?;
            if !self.is_leap_year && *date == Date(2, 29) {
                return Err(Error::invalid(
                    "run period",
                    "February 29 needs a leap year",
                ));
            }
        }
        if self.start_date >= self.end_date {
            return Err(Error::invalid(
                "run period",
                format!(
                    "start date {} must come before end date {}",
                    self.start_date, self.end_date
                ),
            ));
        }
        if let Some(dst) = &self.daylight_saving_time {
            dst.validate()?;
        }
        Ok(())
    }

    fn year(&self) -> u32 {
        if self.is_leap_year { 2016 } else { 2017 }
    }

    /// `RunPeriod`, one `RunPeriodControl:SpecialDays` per holiday, then the
    /// daylight saving object if any.
    pub fn to_idf(&self) -> Vec<String> {
        let year = self.year().to_string();
        let values = [
            "CustomRunPeriod".to_string(),
            self.start_date.month().to_string(),
            self.start_date.day().to_string(),
            year.clone(),
            self.end_date.month().to_string(),
            self.end_date.day().to_string(),
            year,
            self.start_day_of_week.to_string(),
            "Yes".to_string(),
            "Yes".to_string(),
        ];
        let comments = [
            "name",
            "start month",
            "start day",
            "start year",
            "end month",
            "end day",
            "end year",
            "start day of week",
            "use weather file holidays",
            "use weather file daylight savings",
        ];
        let mut objects = vec![generate_idf_string("RunPeriod", &values, Some(&comments))];
        objects.extend(self.holidays.iter().enumerate().map(|(i, date)| {
            generate_idf_string(
                "RunPeriodControl:SpecialDays",
                &[format!("Holiday_{i}"), date_field(*date)],
                Some(&["name", "date"]),
            )
        }));
        objects.extend(self.daylight_saving_time.map(|d| d.to_idf()));
        objects
    }

    /// Rebuilds a run period from its IDF objects.
    pub fn from_idf<S: AsRef<str>>(
        text: &str,
        holidays: &[S],
        daylight_saving: Option<&str>,
    ) -> Result<Self> {
        const T: &str = "RunPeriod";
        let f = parse_idf_string(text, Some(T))?;
        let field = |i: usize| f.get(i).map(String::as_str).unwrap_or("");
        let number = |i: usize| -> Result<u32> {
            field(i)
                .parse()
                .map_err(|_| Error::idf(T, format!("field {i} is not a whole number")))
        };
        let is_leap_year = match field(3) {
            "" => false,
            y => y.parse::<u32>().map_err(|_| Error::idf(T, "bad start year"))? % 4 == 0,
        };
        let start_day_of_week = match field(7) {
            "" => DayOfWeek::Sunday,
            d => d.parse()?,
        };
        let holidays = holidays
            .iter()
            .map(|h| {
                const H: &str = "RunPeriodControl:SpecialDays";
                let f = parse_idf_string(h.as_ref(), Some(H))?;
                parse_date_field(f.get(1).map(String::as_str).unwrap_or(""), H)
            })
            .collect::<Result<Vec<_>>>()?;
        let rp = Self {
            start_date: Date::new(number(1)?, number(2)?)?,
            end_date: Date::new(number(4)?, number(5)?)?,
            start_day_of_week,
            holidays,
            daylight_saving_time: daylight_saving.map(DaylightSavingTime::from_idf).transpose()?,
            is_leap_year,
        };
        rp.validate()?;
        Ok(rp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_whole_common_year() {
        let objects = RunPeriod::default().to_idf();
        assert_eq!(objects.len(), 1);
        let f = parse_idf_string(&objects[0], Some("RunPeriod")).unwrap();
        assert_eq!(f[..8], ["CustomRunPeriod", "1", "1", "2017", "12", "31", "2017", "Sunday"]);
    }

    #[test]
    fn holidays_and_daylight_saving() {
        let mut rp = RunPeriod::new(Date(1, 1), Date(6, 30)).unwrap();
        rp.holidays = vec![Date(1, 1), Date(5, 29)];
        rp.daylight_saving_time = Some(DaylightSavingTime::default());
        rp.is_leap_year = true;
        let objects = rp.to_idf();
        assert_eq!(objects.len(), 4);
        let hol = parse_idf_string(&objects[2], Some("RunPeriodControl:SpecialDays")).unwrap();
        assert_eq!(hol, ["Holiday_1", "5/29"]);

        let back = RunPeriod::from_idf(&objects[0], &objects[1..3], Some(objects[3].as_str())).unwrap();
        assert_eq!(back, rp);
    }

    #[test]
    fn rejects_reversed_dates() {
        assert!(RunPeriod::new(Date(6, 1), Date(3, 1)).is_err());
        assert!(RunPeriod::new(Date(2, 29), Date(3, 1)).is_err());
    }

    #[test]
    fn json_defaults() {
        let rp: RunPeriod = serde_json::from_str(r#"{"end_date":[3,31]}"#).unwrap();
        assert_eq!(rp.start_date, Date::JAN_1);
        assert_eq!(rp.end_date, Date(3, 31));
    }
}
