//! Annual schedules assembled from day schedules and priority-ordered rules.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::check_timestep;
use super::date::{Date, DayOfWeek};
use super::day::ScheduleDay;
use super::rule::ScheduleRule;
use super::typelimit::ScheduleTypeLimit;
use crate::error::{Error, Result, check_ep_name};
use crate::idf::reader::{field, parse_f64};
use crate::idf::{extract_objects, generate_idf_string, object_type, parse_idf_string};

const WEEK_COMMENTS: [&str; 13] = [
    "name",
    "sunday",
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
    "holiday",
    "summer design day",
    "winter design day",
    "custom day 1",
    "custom day 2",
];

const WEEK_DAY_TITLES: [&str; 8] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Holiday",
];

/// A full-year schedule.
///
/// Rules are checked in order and the first one that applies to a day wins,
/// so index 0 has the highest priority. Days no rule covers use
/// `default_day_schedule`. Design days fall back to the default day when
/// unset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ScheduleRulesetData", into = "ScheduleRulesetData")]
pub struct ScheduleRuleset {
    pub name: String,
    pub default_day_schedule: ScheduleDay,
    pub schedule_rules: Vec<ScheduleRule>,
    pub schedule_type_limit: Option<ScheduleTypeLimit>,
    pub summer_designday_schedule: Option<ScheduleDay>,
    pub winter_designday_schedule: Option<ScheduleDay>,
}

/// JSON layout: day schedules listed once and referenced by name.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ScheduleRulesetData {
    name: String,
    day_schedules: Vec<ScheduleDay>,
    default_day_schedule: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    schedule_rules: Vec<ScheduleRuleData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    schedule_type_limit: Option<ScheduleTypeLimit>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    summer_designday_schedule: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    winter_designday_schedule: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ScheduleRuleData {
    schedule_day: String,
    #[serde(default)]
    apply_sunday: bool,
    #[serde(default)]
    apply_monday: bool,
    #[serde(default)]
    apply_tuesday: bool,
    #[serde(default)]
    apply_wednesday: bool,
    #[serde(default)]
    apply_thursday: bool,
    #[serde(default)]
    apply_friday: bool,
    #[serde(default)]
    apply_saturday: bool,
    #[serde(default)]
    apply_holiday: bool,
    #[serde(default)]
    start_date: Option<Date>,
    #[serde(default)]
    end_date: Option<Date>,
}

impl TryFrom<ScheduleRulesetData> for ScheduleRuleset {
    type Error = Error;

    fn try_from(data: ScheduleRulesetData) -> Result<Self> {
        let days: HashMap<String, ScheduleDay> = data
            .day_schedules
            .into_iter()
            .map(|d| (d.name.clone(), d))
            .collect();
        let lookup = |name: &str| {
            days.get(name)
                .cloned()
                .ok_or_else(|| Error::missing("day schedule", name))
        };
        let rules = data
            .schedule_rules
            .into_iter()
            .map(|r| {
                Ok(ScheduleRule {
                    schedule_day: lookup(&r.schedule_day)?,
                    apply_sunday: r.apply_sunday,
                    apply_monday: r.apply_monday,
                    apply_tuesday: r.apply_tuesday,
                    apply_wednesday: r.apply_wednesday,
                    apply_thursday: r.apply_thursday,
                    apply_friday: r.apply_friday,
                    apply_saturday: r.apply_saturday,
                    apply_holiday: r.apply_holiday,
                    start_date: r.start_date.unwrap_or(Date::JAN_1),
                    end_date: r.end_date.unwrap_or(Date::DEC_31),
                })
            })
            .collect::<Result<Vec<_>>>()?;
        let sched = Self {
            default_day_schedule: lookup(&data.default_day_schedule)?,
            schedule_rules: rules,
            schedule_type_limit: data.schedule_type_limit,
            summer_designday_schedule: data
                .summer_designday_schedule
                .as_deref()
                .map(lookup)
                .transpose()?,
            winter_designday_schedule: data
                .winter_designday_schedule
                .as_deref()
                .map(lookup)
                .transpose()?,
            name: data.name,
        };
        sched.validate()?;
        Ok(sched)
    }
}

impl From<ScheduleRuleset> for ScheduleRulesetData {
    fn from(s: ScheduleRuleset) -> Self {
        let day_schedules = s.day_schedules().into_iter().cloned().collect();
        let schedule_rules = s
            .schedule_rules
            .iter()
            .map(|r| ScheduleRuleData {
                schedule_day: r.schedule_day.name.clone(),
                apply_sunday: r.apply_sunday,
                apply_monday: r.apply_monday,
                apply_tuesday: r.apply_tuesday,
                apply_wednesday: r.apply_wednesday,
                apply_thursday: r.apply_thursday,
                apply_friday: r.apply_friday,
                apply_saturday: r.apply_saturday,
                apply_holiday: r.apply_holiday,
                start_date: Some(r.start_date),
                end_date: Some(r.end_date),
            })
            .collect();
        Self {
            day_schedules,
            default_day_schedule: s.default_day_schedule.name.clone(),
            schedule_rules,
            summer_designday_schedule: s.summer_designday_schedule.map(|d| d.name),
            winter_designday_schedule: s.winter_designday_schedule.map(|d| d.name),
            schedule_type_limit: s.schedule_type_limit,
            name: s.name,
        }
    }
}

impl ScheduleRuleset {
    /// # Errors
    ///
    /// Returns an error if the name, any day schedule or any rule is invalid,
    /// if two different day schedules share a name, or if a value falls
    /// outside the type limits.
    pub fn new(
        name: &str,
        default_day_schedule: ScheduleDay,
        schedule_rules: Vec<ScheduleRule>,
        schedule_type_limit: Option<ScheduleTypeLimit>,
    ) -> Result<Self> {
        let sched = Self {
            name: name.to_string(),
            default_day_schedule,
            schedule_rules,
            schedule_type_limit,
            summer_designday_schedule: None,
            winter_designday_schedule: None,
        };
        sched.validate()?;
        Ok(sched)
    }

    /// Sets both design day schedules.
    pub fn with_design_days(mut self, summer: ScheduleDay, winter: ScheduleDay) -> Result<Self> {
        self.summer_designday_schedule = Some(summer);
        self.winter_designday_schedule = Some(winter);
        self.validate()?;
        Ok(self)
    }

    /// A schedule holding `value` all year.
    pub fn from_constant_value(
        name: &str,
        value: f64,
        schedule_type_limit: Option<ScheduleTypeLimit>,
    ) -> Result<Self> {
        let day = ScheduleDay::constant(&format!("{name}_Day Schedule"), value)?;
        Self::new(name, day, Vec::new(), schedule_type_limit)
    }

    /// A schedule repeating the same `24 * timestep` values every day.
    pub fn from_daily_values(
        name: &str,
        daily_values: &[f64],
        timestep: u32,
        schedule_type_limit: Option<ScheduleTypeLimit>,
    ) -> Result<Self> {
        let day = ScheduleDay::from_values_at_timestep(
            &format!("{name}_Day Schedule"),
            daily_values,
            timestep,
            true,
        )?;
        Self::new(name, day, Vec::new(), schedule_type_limit)
    }

    /// Builds a schedule from daily values for Sunday through Saturday and
    /// holidays.
    ///
    /// Days with identical values share one day schedule. When design day
    /// values are not given, the summer design day copies the day with the
    /// highest average and the winter design day the one with the lowest.
    pub fn from_week_daily_values(
        name: &str,
        week_values: [&[f64]; 8],
        timestep: u32,
        schedule_type_limit: Option<ScheduleTypeLimit>,
        summer_designday_values: Option<&[f64]>,
        winter_designday_values: Option<&[f64]>,
    ) -> Result<Self> {
        let mut rules: Vec<ScheduleRule> = Vec::new();
        let mut applied: Vec<&[f64]> = Vec::new();
        for (i, vals) in week_values.into_iter().enumerate() {
            let dow = i as u32 + 1;
            match applied.iter().position(|a| *a == vals) {
                Some(j) => rules[j].apply_day_by_dow(dow)?,
                None => {
                    let day_name = format!("{name}_{}", WEEK_DAY_TITLES[i]);
                    let day = ScheduleDay::from_values_at_timestep(&day_name, vals, timestep, true)?;
                    let mut rule = ScheduleRule::new(day);
                    rule.apply_day_by_dow(dow)?;
                    rules.push(rule);
                    applied.push(vals);
                }
            }
        }
        let averages: Vec<f64> = applied
            .iter()
            .map(|v| v.iter().sum::<f64>() / v.len().max(1) as f64)
            .collect();
        let pick = |values: Option<&[f64]>, suffix: &str, highest: bool| -> Result<ScheduleDay> {
            match values {
                Some(v) => ScheduleDay::from_values_at_timestep(
                    &format!("{name}_{suffix}"),
                    v,
                    timestep,
                    true,
                ),
                None => {
                    let idx = extreme_index(&averages, highest);
                    let mut day = rules[idx].schedule_day.clone();
                    day.name = format!("{}_{suffix}", day.name);
                    Ok(day)
                }
            }
        };
        let summer = pick(summer_designday_values, "SmrDsn", true)?;
        let winter = pick(winter_designday_values, "WntrDsn", false)?;
        let mut rules = rules.into_iter();
        let default = rules
            .next()
            .map(|r| r.schedule_day)
            .ok_or_else(|| Error::invalid("week values", "no days given"))?;
        Self::new(name, default, rules.collect(), schedule_type_limit)?
            .with_design_days(summer, winter)
    }

    /// Builds a schedule from day schedules for Sunday through Saturday and
    /// holidays. Days sharing a schedule name share one rule.
    pub fn from_week_day_schedules(
        name: &str,
        week_schedules: [ScheduleDay; 8],
        summer_designday_schedule: ScheduleDay,
        winter_designday_schedule: ScheduleDay,
        schedule_type_limit: Option<ScheduleTypeLimit>,
    ) -> Result<Self> {
        let mut rules: Vec<ScheduleRule> = Vec::new();
        for (i, day) in week_schedules.into_iter().enumerate() {
            let dow = i as u32 + 1;
            match rules.iter().position(|r| r.schedule_day.name == day.name) {
                Some(j) => rules[j].apply_day_by_dow(dow)?,
                None => {
                    let mut rule = ScheduleRule::new(day);
                    rule.apply_day_by_dow(dow)?;
                    rules.push(rule);
                }
            }
        }
        let rename = |mut day: ScheduleDay, suffix: &str| {
            if rules.iter().any(|r| r.schedule_day.name == day.name) {
                day.name = format!("{}_{suffix}", day.name);
            }
            day
        };
        let summer = rename(summer_designday_schedule, "SmrDsn");
        let winter = rename(winter_designday_schedule, "WntrDsn");
        let mut rules = rules.into_iter();
        let default = rules
            .next()
            .map(|r| r.schedule_day)
            .ok_or_else(|| Error::invalid("week schedules", "no days given"))?;
        Self::new(name, default, rules.collect(), schedule_type_limit)?
            .with_design_days(summer, winter)
    }

    pub fn validate(&self) -> Result<()> {
        check_ep_name(&self.name)?;
        self.default_day_schedule.validate()?;
        for rule in &self.schedule_rules {
            rule.validate()?;
        }
        for day in [&self.summer_designday_schedule, &self.winter_designday_schedule]
            .into_iter()
            .flatten()
        {
            day.validate()?;
        }
        let mut by_name: HashMap<&str, &ScheduleDay> = HashMap::new();
        for day in self.all_days() {
            if let Some(prev) = by_name.insert(&day.name, day) {
                if prev != day {
                    return Err(Error::Duplicate {
                        kind: "day schedule".into(),
                        names: vec![day.name.clone()],
                    });
                }
            }
        }
        if let Some(limit) = &self.schedule_type_limit {
            limit.validate()?;
            for day in self.all_days() {
                limit.check_values(&self.name, &day.values)?;
            }
        }
        Ok(())
    }

    fn all_days(&self) -> impl Iterator<Item = &ScheduleDay> {
        std::iter::once(&self.default_day_schedule)
            .chain(self.summer_designday_schedule.as_ref())
            .chain(self.winter_designday_schedule.as_ref())
            .chain(self.schedule_rules.iter().map(|r| &r.schedule_day))
    }

    /// Every distinct day schedule, default first.
    pub fn day_schedules(&self) -> Vec<&ScheduleDay> {
        let mut seen = HashSet::new();
        self.all_days()
            .filter(|d| seen.insert(d.name.as_str()))
            .collect()
    }

    pub fn summer_designday(&self) -> &ScheduleDay {
        self.summer_designday_schedule
            .as_ref()
            .unwrap_or(&self.default_day_schedule)
    }

    pub fn winter_designday(&self) -> &ScheduleDay {
        self.winter_designday_schedule
            .as_ref()
            .unwrap_or(&self.default_day_schedule)
    }

    /// Whether one value describes the whole schedule.
    pub fn is_constant(&self) -> bool {
        self.default_day_schedule.is_constant()
            && self.schedule_rules.is_empty()
            && self.summer_designday_schedule.is_none()
            && self.winter_designday_schedule.is_none()
    }

    /// Whether every rule spans the whole year.
    pub fn is_single_week(&self) -> bool {
        self.schedule_rules
            .iter()
            .all(|r| r.start_doy() == 1 && r.end_doy() == 365)
    }

    /// Inserts a rule at the highest priority.
    pub fn add_rule(&mut self, rule: ScheduleRule) -> Result<()> {
        rule.validate()?;
        self.schedule_rules.insert(0, rule);
        Ok(())
    }

    pub fn remove_rule(&mut self, index: usize) -> Result<ScheduleRule> {
        if index >= self.schedule_rules.len() {
            return Err(self.rule_index_err(index));
        }
        Ok(self.schedule_rules.remove(index))
    }

    /// Moves the rule at `index` to `new_index`.
    pub fn reorder_rule(&mut self, index: usize, new_index: usize) -> Result<()> {
        let len = self.schedule_rules.len();
        if index >= len || new_index >= len {
            return Err(self.rule_index_err(index.max(new_index)));
        }
        let rule = self.schedule_rules.remove(index);
        self.schedule_rules.insert(new_index, rule);
        Ok(())
    }

    fn rule_index_err(&self, index: usize) -> Error {
        Error::Schedule {
            name: self.name.clone(),
            reason: format!(
                "no rule at index {index} ({} rules)",
                self.schedule_rules.len()
            ),
        }
    }

    /// Sequential values from `start` to `end` inclusive.
    ///
    /// # Arguments
    ///
    /// * `timestep` - Values per hour
    /// * `start`, `end` - Date range, inclusive
    /// * `start_dow` - Weekday of `start`
    /// * `holidays` - Dates on which holiday rules apply
    /// * `leap_year` - Whether February has 29 days
    ///
    /// # Errors
    ///
    /// Returns an error for an unsupported timestep, a date missing from the
    /// chosen year, or `start` after `end`.
    pub fn values(
        &self,
        timestep: u32,
        start: Date,
        end: Date,
        start_dow: DayOfWeek,
        holidays: &[Date],
        leap_year: bool,
    ) -> Result<Vec<f64>> {
        check_timestep(timestep)?;
        let doy = |d: Date| {
            d.doy(leap_year).ok_or_else(|| Error::Schedule {
                name: self.name.clone(),
                reason: format!("{d} does not exist in the chosen year"),
            })
        };
        let (first, last) = (doy(start)?, doy(end)?);
        if first > last {
            return Err(Error::Schedule {
                name: self.name.clone(),
                reason: format!("start date {start} comes after end date {end}"),
            });
        }
        let holiday_doys: HashSet<u32> = holidays
            .iter()
            .filter_map(|h| {
                let d = h.doy(leap_year);
                if d.is_none() {
                    warn!(schedule = %self.name, holiday = %h, "holiday skipped outside leap year");
                }
                d
            })
            .collect();
        let rule_values: Vec<Vec<f64>> = self
            .schedule_rules
            .iter()
            .map(|r| r.schedule_day.values_at_timestep(timestep))
            .collect();
        let default_values = self.default_day_schedule.values_at_timestep(timestep);

        let mut out = Vec::with_capacity((last - first + 1) as usize * 24 * timestep as usize);
        let mut dow = start_dow.number();
        for d in first..=last {
            let holiday = holiday_doys.contains(&d);
            let applies = |r: &ScheduleRule| match (holiday, leap_year) {
                (true, false) => r.apply_holiday && r.does_rule_apply_doy(d),
                (true, true) => r.apply_holiday && r.does_rule_apply_doy_leap_year(d),
                (false, false) => r.does_rule_apply(d, Some(dow)),
                (false, true) => r.does_rule_apply_leap_year(d, Some(dow)),
            };
            let day = match self.schedule_rules.iter().position(applies) {
                Some(i) => &rule_values[i],
                None => &default_values,
            };
            out.extend_from_slice(day);
            dow = dow % 7 + 1;
        }
        Ok(out)
    }

    /// Values for a common year starting on a Sunday with no holidays.
    pub fn annual_values(&self, timestep: u32) -> Result<Vec<f64>> {
        self.values(timestep, Date::JAN_1, Date::DEC_31, DayOfWeek::Sunday, &[], false)
    }

    /// Rules equivalent to this schedule between two dates.
    ///
    /// Rules outside the range are dropped, overlapping ones are clipped,
    /// and a final rule carries the default day for uncovered weekdays.
    pub fn to_rules(&self, start: Date, end: Date) -> Result<Vec<ScheduleRule>> {
        let span = ScheduleRule::new(self.default_day_schedule.clone()).with_dates(start, end)?;
        let (first, last) = (span.start_doy(), span.end_doy());
        let mut rules: Vec<ScheduleRule> = Vec::new();
        for rule in &self.schedule_rules {
            if rule.end_doy() < first || rule.start_doy() > last {
                continue;
            }
            let mut clipped = rule.clone();
            if rule.start_doy() < first {
                clipped.start_date = start;
            }
            if rule.end_doy() > last {
                clipped.end_date = end;
            }
            rules.push(clipped);
        }
        let mut default_rule = span;
        for dow in 0..7 {
            if !rules.iter().any(|r| r.week_apply_tuple()[dow]) {
                default_rule.apply_day_by_dow(dow as u32 + 1)?;
            }
        }
        if !rules.iter().any(|r| r.apply_holiday) {
            default_rule.apply_holiday = true;
        }
        rules.push(default_rule);
        Ok(rules)
    }

    /// Day schedule names for Sunday through Saturday and holidays when the
    /// rules at `indices` are active.
    fn week_list(&self, indices: &[usize]) -> Vec<String> {
        let active = || indices.iter().filter_map(|i| self.schedule_rules.get(*i));
        let mut week: Vec<String> = (0..7)
            .map(|dow| {
                active()
                    .find(|r| r.week_apply_tuple()[dow])
                    .map_or(&self.default_day_schedule, |r| &r.schedule_day)
                    .name
                    .clone()
            })
            .collect();
        let holiday = self
            .schedule_rules
            .iter()
            .find(|r| r.apply_holiday)
            .map_or(&self.default_day_schedule, |r| &r.schedule_day);
        week.push(holiday.name.clone());
        week
    }

    fn week_idf(&self, week_list: &[String], index: usize) -> (String, String) {
        let week_name = format!("{}_Week {index}", self.name);
        let mut fields = vec![week_name.clone()];
        fields.extend(week_list.iter().cloned());
        fields.push(self.summer_designday().name.clone());
        fields.push(self.winter_designday().name.clone());
        fields.push(self.default_day_schedule.name.clone());
        fields.push(self.default_day_schedule.name.clone());
        (
            generate_idf_string("Schedule:Week:Daily", &fields, Some(&WEEK_COMMENTS)),
            week_name,
        )
    }

    /// Writes the year (or constant) schedule and its week schedules.
    ///
    /// Constant schedules become a single `Schedule:Constant` with no week
    /// schedules. Day schedules are written separately through
    /// [`ScheduleRuleset::idf_objects`].
    pub fn to_idf(&self) -> (String, Option<Vec<String>>) {
        let type_limit = self
            .schedule_type_limit
            .as_ref()
            .map(|t| t.name.clone())
            .unwrap_or_default();
        if self.is_constant() {
            let value = self.default_day_schedule.values.first().copied().unwrap_or_default();
            let fields = [self.name.clone(), type_limit, value.to_string()];
            let constant = generate_idf_string(
                "Schedule:Constant",
                &fields,
                Some(&["schedule name", "schedule type limits", "value"]),
            );
            return (constant, None);
        }

        let mut week_schedules = Vec::new();
        let mut periods: Vec<(String, Date, Date)> = Vec::new();
        if self.is_single_week() {
            let all: Vec<usize> = (0..self.schedule_rules.len()).collect();
            let (idf, week_name) = self.week_idf(&self.week_list(&all), 1);
            week_schedules.push(idf);
            periods.push((week_name, Date::JAN_1, Date::DEC_31));
        } else {
            let rules_each_day: Vec<Vec<usize>> = (1..=365)
                .map(|doy| {
                    self.schedule_rules
                        .iter()
                        .enumerate()
                        .filter(|(_, r)| r.does_rule_apply_doy(doy))
                        .map(|(i, _)| i)
                        .collect()
                })
                .collect();
            let mut unique_weeks: Vec<Vec<String>> = Vec::new();
            let mut week_names: Vec<String> = Vec::new();
            let mut set_to_week: HashMap<&[usize], usize> = HashMap::new();
            for set in &rules_each_day {
                if set_to_week.contains_key(set.as_slice()) {
                    continue;
                }
                let week = self.week_list(set);
                let idx = match unique_weeks.iter().position(|w| *w == week) {
                    Some(i) => i,
                    None => {
                        let (idf, name) = self.week_idf(&week, unique_weeks.len() + 1);
                        week_schedules.push(idf);
                        week_names.push(name);
                        unique_weeks.push(week);
                        unique_weeks.len() - 1
                    }
                };
                set_to_week.insert(set.as_slice(), idx);
            }
            let mut prev: Option<usize> = None;
            for (i, set) in rules_each_day.iter().enumerate() {
                let doy = i as u32 + 1;
                let week = set_to_week.get(set.as_slice()).copied().unwrap_or_default();
                if prev != Some(week) {
                    if let Some(last) = periods.last_mut() {
                        last.2 = Date::from_doy(doy - 1, false);
                    }
                    periods.push((week_names[week].clone(), Date::from_doy(doy, false), Date::DEC_31));
                    prev = Some(week);
                }
            }
        }

        let mut fields = vec![self.name.clone(), type_limit];
        let mut comments = vec!["schedule name".to_string(), "schedule type limits".into()];
        for (i, (week, start, end)) in periods.iter().enumerate() {
            let n = i + 1;
            fields.extend([
                week.clone(),
                start.month().to_string(),
                start.day().to_string(),
                end.month().to_string(),
                end.day().to_string(),
            ]);
            comments.extend([
                format!("week schedule name {n}"),
                format!("start month {n}"),
                format!("start day {n}"),
                format!("end month {n}"),
                format!("end day {n}"),
            ]);
        }
        let comments: Vec<&str> = comments.iter().map(String::as_str).collect();
        (
            generate_idf_string("Schedule:Year", &fields, Some(&comments)),
            Some(week_schedules),
        )
    }

    /// Every IDF object this schedule needs: year or constant, weeks, days.
    pub fn idf_objects(&self) -> Vec<String> {
        let (year, weeks) = self.to_idf();
        let mut objects = vec![year];
        if let Some(weeks) = weeks {
            objects.extend(weeks);
            objects.extend(
                self.day_schedules()
                    .into_iter()
                    .map(|d| d.to_idf(self.schedule_type_limit.as_ref())),
            );
        }
        objects
    }

    /// Rebuilds a schedule from its `Schedule:Year`, week and day objects.
    pub fn from_idf<S: AsRef<str>>(
        year: &str,
        weeks: &[S],
        days: &[S],
        type_limit: Option<&str>,
    ) -> Result<Self> {
        let day_dict = day_dictionary(days.iter().map(AsRef::as_ref))?;
        let week_dict = week_dictionary(weeks.iter().map(AsRef::as_ref), &day_dict)?;
        let limit = type_limit.map(ScheduleTypeLimit::from_idf).transpose()?;
        Self::from_year_fields(&parse_idf_string(year, Some("Schedule:Year"))?, &week_dict, limit)
    }

    fn from_year_fields(
        fields: &[String],
        weeks: &HashMap<String, WeekEntry>,
        limit: Option<ScheduleTypeLimit>,
    ) -> Result<Self> {
        const T: &str = "Schedule:Year";
        let name = field(fields, 0, T, "name")?;
        let mut all_rules = Vec::new();
        let mut design_days = None;
        for group in fields.get(2..).unwrap_or_default().chunks(5) {
            let [week, sm, sd, em, ed] = group else {
                return Err(Error::idf(T, "incomplete week schedule period"));
            };
            let entry = weeks
                .get(week.as_str())
                .ok_or_else(|| Error::missing("week schedule", week))?;
            let date = |m: &str, d: &str| -> Result<Date> {
                Date::new(parse_f64(m, T, "month")? as u32, parse_f64(d, T, "day")? as u32)
            };
            let (start, end) = (date(sm, sd)?, date(em, ed)?);
            for rule in &entry.rules {
                all_rules.push(rule.clone().with_dates(start, end)?);
            }
            if design_days.is_none() {
                design_days = Some(entry.design_days.clone());
            }
        }
        let mut rules = all_rules.into_iter();
        let default = rules
            .next()
            .map(|r| r.schedule_day)
            .ok_or_else(|| Error::idf(T, "no week schedules"))?;
        let sched = Self::new(name, default, rules.collect(), limit)?;
        match design_days {
            Some((summer, winter)) => sched.with_design_days(summer, winter),
            None => Ok(sched),
        }
    }

    /// Reads every `Schedule:Year` and `Schedule:Constant` in an IDF file.
    pub fn extract_all_from_idf_file(text: &str) -> Result<Vec<Self>> {
        let days: Vec<String> = ["Schedule:Day:Interval", "Schedule:Day:Hourly", "Schedule:Day:List"]
            .into_iter()
            .flat_map(|t| extract_objects(text, t))
            .collect();
        let day_dict = day_dictionary(days.iter().map(String::as_str))?;
        let weeks: Vec<String> = ["Schedule:Week:Daily", "Schedule:Week:Compact"]
            .into_iter()
            .flat_map(|t| extract_objects(text, t))
            .collect();
        let week_dict = week_dictionary(weeks.iter().map(String::as_str), &day_dict)?;
        let limits: HashMap<String, ScheduleTypeLimit> =
            ScheduleTypeLimit::extract_all_from_idf_file(text)?
                .into_iter()
                .map(|t| (t.name.clone(), t))
                .collect();
        let limit_for = |name: Option<&String>| -> Result<Option<ScheduleTypeLimit>> {
            match name.map(|n| n.trim()).filter(|n| !n.is_empty()) {
                None => Ok(None),
                Some(n) => limits
                    .get(n)
                    .cloned()
                    .map(Some)
                    .ok_or_else(|| Error::missing("schedule type limits", n)),
            }
        };

        let mut schedules = Vec::new();
        for year in extract_objects(text, "Schedule:Year") {
            let fields = parse_idf_string(&year, Some("Schedule:Year"))?;
            let limit = limit_for(fields.get(1))?;
            schedules.push(Self::from_year_fields(&fields, &week_dict, limit)?);
        }
        for constant in extract_objects(text, "Schedule:Constant") {
            const T: &str = "Schedule:Constant";
            let fields = parse_idf_string(&constant, Some(T))?;
            let value = match fields.get(2).map(|s| s.trim()) {
                None | Some("") => 0.0,
                Some(v) => parse_f64(v, T, "value")?,
            };
            let limit = limit_for(fields.get(1))?;
            schedules.push(Self::from_constant_value(field(&fields, 0, T, "name")?, value, limit)?);
        }
        Ok(schedules)
    }

    /// Weighted average of several schedules.
    ///
    /// Weights default to equal shares and must sum to 1. The result takes
    /// the type limits of the first schedule.
    ///
    /// # Errors
    ///
    /// Returns an error if `schedules` is empty, the weights do not match
    /// the schedules or do not sum to 1, or the timestep is unsupported.
    pub fn average_schedules(
        name: &str,
        schedules: &[&ScheduleRuleset],
        weights: Option<&[f64]>,
        timestep: u32,
    ) -> Result<Self> {
        check_timestep(timestep)?;
        let weights = average_weights(schedules.len(), weights)?;
        if schedules.iter().all(|s| s.is_single_week()) {
            let indices: Vec<Vec<usize>> = schedules
                .iter()
                .map(|s| (0..s.schedule_rules.len()).collect())
                .collect();
            return average_week(name, schedules, &weights, timestep, &indices);
        }

        let rules_each_day: Vec<Vec<Vec<usize>>> = (1..=365)
            .map(|doy| {
                schedules
                    .iter()
                    .map(|s| {
                        s.schedule_rules
                            .iter()
                            .enumerate()
                            .filter(|(_, r)| r.does_rule_apply_doy(doy))
                            .map(|(i, _)| i)
                            .collect()
                    })
                    .collect()
            })
            .collect();
        let mut week_scheds: Vec<ScheduleRuleset> = Vec::new();
        let mut set_index: HashMap<&Vec<Vec<usize>>, usize> = HashMap::new();
        for set in &rules_each_day {
            if !set_index.contains_key(set) {
                let week_name = format!("{name}_{}", week_scheds.len());
                week_scheds.push(average_week(&week_name, schedules, &weights, timestep, set)?);
                set_index.insert(set, week_scheds.len() - 1);
            }
        }
        let mut final_rules = Vec::new();
        let mut period_start = 1u32;
        for doy in 1..=365u32 {
            let i = (doy - 1) as usize;
            let is_last = doy == 365 || rules_each_day[i] != rules_each_day[i + 1];
            if is_last {
                let week = set_index.get(&rules_each_day[i]).copied().unwrap_or_default();
                final_rules.extend(week_scheds[week].to_rules(
                    Date::from_doy(period_start, false),
                    Date::from_doy(doy, false),
                )?);
                period_start = doy + 1;
            }
        }
        let mut rules = final_rules.into_iter();
        let default = rules
            .next()
            .map(|r| r.schedule_day)
            .ok_or_else(|| Error::invalid("schedules", "nothing to average"))?;
        let first_week = &week_scheds[0];
        Self::new(name, default, rules.collect(), schedules[0].schedule_type_limit.clone())?
            .with_design_days(
                first_week.summer_designday().clone(),
                first_week.winter_designday().clone(),
            )
    }
}

fn extreme_index(values: &[f64], highest: bool) -> usize {
    let mut best = 0;
    for (i, v) in values.iter().enumerate() {
        let better = if highest { *v > values[best] } else { *v < values[best] };
        if better {
            best = i;
        }
    }
    best
}

/// Normalized averaging weights, one per item.
pub(crate) fn average_weights(count: usize, weights: Option<&[f64]>) -> Result<Vec<f64>> {
    if count == 0 {
        return Err(Error::invalid("schedules", "at least one item is needed to average"));
    }
    match weights {
        None => Ok(vec![1.0 / count as f64; count]),
        Some(w) if w.len() != count => Err(Error::invalid(
            "weights",
            format!("{} weights for {count} items", w.len()),
        )),
        Some(w) => {
            let total: f64 = w.iter().sum();
            if (total - 1.0).abs() > 1e-6 {
                return Err(Error::invalid("weights", format!("must sum to 1, got {total}")));
            }
            Ok(w.to_vec())
        }
    }
}

/// Averages one representative week of each schedule, using only the rules
/// at `indices[s]` for schedule `s`.
fn average_week(
    name: &str,
    schedules: &[&ScheduleRuleset],
    weights: &[f64],
    timestep: u32,
    indices: &[Vec<usize>],
) -> Result<ScheduleRuleset> {
    let steps = 24 * timestep as usize;
    let mut avg = vec![vec![0.0; steps]; 10];
    for ((sched, w), idx) in schedules.iter().zip(weights).zip(indices) {
        let active = || idx.iter().filter_map(|i| sched.schedule_rules.get(*i));
        let mut week: Vec<&ScheduleDay> = (0..7)
            .map(|dow| {
                active()
                    .find(|r| r.week_apply_tuple()[dow])
                    .map_or(&sched.default_day_schedule, |r| &r.schedule_day)
            })
            .collect();
        week.push(
            active()
                .find(|r| r.apply_holiday)
                .map_or(&sched.default_day_schedule, |r| &r.schedule_day),
        );
        week.push(sched.summer_designday());
        week.push(sched.winter_designday());
        for (slot, day) in avg.iter_mut().zip(week) {
            for (acc, v) in slot.iter_mut().zip(day.values_at_timestep(timestep)) {
                *acc += v * w;
            }
        }
    }
    ScheduleRuleset::from_week_daily_values(
        name,
        [&avg[0], &avg[1], &avg[2], &avg[3], &avg[4], &avg[5], &avg[6], &avg[7]],
        timestep,
        schedules.first().and_then(|s| s.schedule_type_limit.clone()),
        Some(avg[8].as_slice()),
        Some(avg[9].as_slice()),
    )
}

fn day_dictionary<'a>(texts: impl Iterator<Item = &'a str>) -> Result<HashMap<String, ScheduleDay>> {
    texts
        .map(|t| ScheduleDay::from_idf(t).map(|d| (d.name.clone(), d)))
        .collect()
}

#[derive(Debug, Clone)]
struct WeekEntry {
    rules: Vec<ScheduleRule>,
    design_days: (ScheduleDay, ScheduleDay),
}

fn week_dictionary<'a>(
    texts: impl Iterator<Item = &'a str>,
    days: &HashMap<String, ScheduleDay>,
) -> Result<HashMap<String, WeekEntry>> {
    let lookup = |name: &str| {
        days.get(name)
            .cloned()
            .ok_or_else(|| Error::missing("day schedule", name))
    };
    let mut out = HashMap::new();
    for text in texts {
        let rules = ScheduleRule::extract_all_from_schedule_week(text, days)?;
        let fields = parse_idf_string(text, None)?;
        let design_days = if object_type(text).eq_ignore_ascii_case("Schedule:Week:Daily") {
            const T: &str = "Schedule:Week:Daily";
            (
                lookup(field(&fields, 9, T, "summer design day")?)?,
                lookup(field(&fields, 10, T, "winter design day")?)?,
            )
        } else {
            let fallback = rules
                .last()
                .map(|r| r.schedule_day.clone())
                .ok_or_else(|| Error::idf("Schedule:Week:Compact", "no day types"))?;
            let (mut summer, mut winter) = (fallback.clone(), fallback);
            for pair in fields.get(1..).unwrap_or_default().chunks(2) {
                if let [day_type, day_name] = pair {
                    let day_type = day_type.to_ascii_lowercase();
                    if day_type.contains("summerdesignday") {
                        summer = lookup(day_name)?;
                    } else if day_type.contains("winterdesignday") {
                        winter = lookup(day_name)?;
                    }
                }
            }
            (summer, winter)
        };
        let name = fields.first().cloned().unwrap_or_default();
        out.insert(name, WeekEntry { rules, design_days });
    }
    Ok(out)
}
