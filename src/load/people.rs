use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::types::Load;
use super::{
    check_fractional_schedule, check_schedule_unit, load_weights, lookup_schedule,
    split_zone_object_name, weighted_sum, zone_object_name,
};
use crate::error::{Error, Result, check_ep_name, check_non_negative, check_range};
use crate::idf::reader::{field, parse_f64, parse_opt_f64};
use crate::idf::{generate_idf_string, parse_idf_string};
use crate::library::schedule_type_limits::ACTIVITY_LEVEL;
use crate::schedule::{Schedule, ScheduleRuleset};

/// Name of the activity schedule used when none is given.
pub const DEFAULT_ACTIVITY_SCHEDULE: &str = "Seated Adult Activity";

/// Metabolic rate of a seated adult in W per person.
pub const SEATED_ADULT_WATTS: f64 = 120.0;

fn default_radiant_fraction() -> f64 {
    0.3
}

/// Constant 120 W activity schedule for seated adults.
pub fn default_activity_schedule() -> Result<Schedule> {
    ScheduleRuleset::from_constant_value(
        DEFAULT_ACTIVITY_SCHEDULE,
        SEATED_ADULT_WATTS,
        Some(ACTIVITY_LEVEL.clone()),
    )
    .map(Schedule::from)
}

/// Occupant density with occupancy and metabolic activity schedules.
///
/// Written to IDF as a `People` object using the `People/Area` method.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct People {
    pub name: String,
    /// People per m2 of floor area.
    pub people_per_area: f64,
    /// Fraction of peak occupancy present over time.
    pub occupancy_schedule: Schedule,
    /// Heat given off per person in W.
    pub activity_schedule: Schedule,
    #[serde(default = "default_radiant_fraction")]
    pub radiant_fraction: f64,
    /// Latent share of the sensible and latent heat. `None` lets
    /// EnergyPlus calculate it from the zone conditions.
    #[serde(default)]
    pub latent_fraction: Option<f64>,
}

impl People {
    /// Creates people with the default seated adult activity.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is invalid, the density is negative, or
    /// the occupancy schedule is not fractional.
    pub fn new(name: &str, people_per_area: f64, occupancy_schedule: Schedule) -> Result<Self> {
        let people = Self {
            name: name.to_string(),
            people_per_area,
            occupancy_schedule,
            activity_schedule: default_activity_schedule()?,
            radiant_fraction: default_radiant_fraction(),
            latent_fraction: None,
        };
        people.validate()?;
        Ok(people)
    }

    pub fn with_activity_schedule(mut self, activity_schedule: Schedule) -> Result<Self> {
        self.activity_schedule = activity_schedule;
        self.validate()?;
        Ok(self)
    }

    pub fn with_fractions(mut self, radiant_fraction: f64, latent_fraction: Option<f64>) -> Result<Self> {
        self.radiant_fraction = radiant_fraction;
        self.latent_fraction = latent_fraction;
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        check_ep_name(&self.name)?;
        check_non_negative("people per area", self.people_per_area)?;
        check_range("people radiant fraction", self.radiant_fraction, 0.0, 1.0)?;
        if let Some(latent) = self.latent_fraction {
            check_range("people latent fraction", latent, 0.0, 1.0)?;
        }
        check_fractional_schedule(&self.occupancy_schedule, "People occupancy")?;
        check_schedule_unit(&self.activity_schedule, "People activity", "W")
    }

    /// Floor area per person in m2, or `None` for an empty space.
    pub fn area_per_person(&self) -> Option<f64> {
        (self.people_per_area > 0.0).then(|| 1.0 / self.people_per_area)
    }

    /// Reads a `People` object, returning the people and their zone name.
    ///
    /// # Errors
    ///
    /// Returns an error for a method other than `People/Area` or a schedule
    /// missing from `schedules`.
    pub fn from_idf(text: &str, schedules: &HashMap<String, Schedule>) -> Result<(Self, String)> {
        const T: &str = "People";
        let f = parse_idf_string(text, Some(T))?;
        let method = field(&f, 3, T, "number of people calculation method")?;
        if !method.eq_ignore_ascii_case("People/Area") {
            return Err(Error::idf(
                T,
                format!("calculation method \"{method}\" is not supported, use People/Area"),
            ));
        }
        let latent_fraction = match f.get(8).map(|s| s.trim()) {
            None | Some("") => None,
            Some(v) if v.eq_ignore_ascii_case("autocalculate") => None,
            Some(v) => Some(1.0 - parse_f64(v, T, "sensible heat fraction")?),
        };
        let activity_schedule = match f.get(9).map(|s| s.trim()) {
            None | Some("") => default_activity_schedule()?,
            Some(name) => lookup_schedule(schedules, name)?,
        };
        let people = Self {
            name: split_zone_object_name(field(&f, 0, T, "name")?).to_string(),
            people_per_area: parse_f64(field(&f, 5, T, "people per area")?, T, "people per area")?,
            occupancy_schedule: lookup_schedule(schedules, field(&f, 2, T, "schedule name")?)?,
            activity_schedule,
            radiant_fraction: parse_opt_f64(&f, 7, T, "radiant fraction")?.unwrap_or(0.3),
            latent_fraction,
        };
        people.validate()?;
        Ok((people, field(&f, 1, T, "zone name")?.to_string()))
    }

    /// Weighted average of several people loads.
    ///
    /// The latent fraction stays autocalculated unless every input sets it.
    pub fn average(
        name: &str,
        people: &[&People],
        weights: Option<&[f64]>,
        timestep: u32,
    ) -> Result<Self> {
        let (weights, unit) = load_weights(people.len(), weights)?;
        let occupancy: Vec<&Schedule> = people.iter().map(|p| &p.occupancy_schedule).collect();
        let activity: Vec<&Schedule> = people.iter().map(|p| &p.activity_schedule).collect();
        let latent_fraction = people
            .iter()
            .zip(&unit)
            .map(|(p, w)| p.latent_fraction.map(|l| l * w))
            .sum::<Option<f64>>();
        let averaged = Self {
            name: name.to_string(),
            people_per_area: weighted_sum(people, &weights, |p| p.people_per_area),
            occupancy_schedule: Schedule::average(
                &format!("{name} Occupancy Schedule"),
                &occupancy,
                Some(unit.as_slice()),
                timestep,
            )?,
            activity_schedule: Schedule::average(
                &format!("{name} Activity Schedule"),
                &activity,
                Some(unit.as_slice()),
                timestep,
            )?,
            radiant_fraction: weighted_sum(people, &unit, |p| p.radiant_fraction),
            latent_fraction,
        };
        averaged.validate()?;
        Ok(averaged)
    }
}

impl Load for People {
    fn name(&self) -> &str {
        &self.name
    }

    fn load_type(&self) -> &'static str {
        "People"
    }

    fn schedules(&self) -> Vec<&Schedule> {
        vec![&self.occupancy_schedule, &self.activity_schedule]
    }

    fn to_idf(&self, zone_name: &str) -> String {
        let sensible = self
            .latent_fraction
            .map(|l| (1.0 - l).to_string())
            .unwrap_or_else(|| "autocalculate".to_string());
        let values = [
            zone_object_name(&self.name, zone_name),
            zone_name.to_string(),
            self.occupancy_schedule.name().to_string(),
            "People/Area".to_string(),
            String::new(),
            self.people_per_area.to_string(),
            String::new(),
            self.radiant_fraction.to_string(),
            sensible,
            self.activity_schedule.name().to_string(),
        ];
        let comments = [
            "name",
            "zone name",
            "occupancy schedule name",
            "occupancy method",
            "number of people {person}",
            "people per floor area {person/m2}",
            "floor area per person {m2/person}",
            "radiant fraction",
            "sensible heat fraction",
            "activity level schedule name",
        ];
        generate_idf_string("People", &values, Some(&comments))
    }
}
