use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::types::Load;
use super::{
    check_fractional_schedule, load_weights, lookup_schedule, split_zone_object_name,
    weighted_sum, zone_object_name,
};
use crate::error::{Error, Result, check_ep_name, check_non_negative, check_range};
use crate::idf::reader::{field, parse_f64, parse_opt_f64};
use crate::idf::{generate_idf_string, parse_idf_string};
use crate::schedule::Schedule;

fn default_radiant_fraction() -> f64 {
    0.32
}

fn default_visible_fraction() -> f64 {
    0.25
}

/// Lighting power per floor area with the way its heat enters the zone.
///
/// Written to IDF as a `Lights` object using the `Watts/Area` method.
///
/// # Examples
///
/// ```
/// use honeybee_energy::load::Lighting;
/// use honeybee_energy::schedule::ScheduleRuleset;
///
/// let sched = ScheduleRuleset::from_constant_value("Always On", 1.0, None).unwrap();
/// let lights = Lighting::new("Office Lighting", 10.0, sched.into()).unwrap();
/// assert!((lights.convected_fraction() - 0.43).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lighting {
    pub name: String,
    /// Lighting power density in W/m2.
    pub watts_per_area: f64,
    /// Fractional schedule multiplying the power density.
    pub schedule: Schedule,
    #[serde(default)]
    pub return_air_fraction: f64,
    #[serde(default = "default_radiant_fraction")]
    pub radiant_fraction: f64,
    #[serde(default = "default_visible_fraction")]
    pub visible_fraction: f64,
}

impl Lighting {
    /// Creates lighting with the default heat fractions.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is invalid, the power density is
    /// negative, or the schedule is not fractional.
    pub fn new(name: &str, watts_per_area: f64, schedule: Schedule) -> Result<Self> {
        let lighting = Self {
            name: name.to_string(),
            watts_per_area,
            schedule,
            return_air_fraction: 0.0,
            radiant_fraction: default_radiant_fraction(),
            visible_fraction: default_visible_fraction(),
        };
        lighting.validate()?;
        Ok(lighting)
    }

    /// Replaces the heat fractions.
    pub fn with_fractions(
        mut self,
        return_air_fraction: f64,
        radiant_fraction: f64,
        visible_fraction: f64,
    ) -> Result<Self> {
        self.return_air_fraction = return_air_fraction;
        self.radiant_fraction = radiant_fraction;
        self.visible_fraction = visible_fraction;
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        check_ep_name(&self.name)?;
        check_non_negative("lighting watts per area", self.watts_per_area)?;
        check_range("lighting return air fraction", self.return_air_fraction, 0.0, 1.0)?;
        check_range("lighting radiant fraction", self.radiant_fraction, 0.0, 1.0)?;
        check_range("lighting visible fraction", self.visible_fraction, 0.0, 1.0)?;
        let total = self.return_air_fraction + self.radiant_fraction + self.visible_fraction;
        if total > 1.0 + 1e-9 {
            return Err(Error::invalid(
                "lighting fractions",
                format!("return air, radiant and visible fractions sum to {total}, above 1"),
            ));
        }
        check_fractional_schedule(&self.schedule, "Lighting")
    }

    /// Fraction of the heat given off as convection.
    pub fn convected_fraction(&self) -> f64 {
        1.0 - self.return_air_fraction - self.radiant_fraction - self.visible_fraction
    }

    /// Reads a `Lights` object, returning the lighting and its zone name.
    ///
    /// # Errors
    ///
    /// Returns an error if the object does not use the `Watts/Area` method
    /// or references a schedule missing from `schedules`.
    pub fn from_idf(text: &str, schedules: &HashMap<String, Schedule>) -> Result<(Self, String)> {
        const T: &str = "Lights";
        let f = parse_idf_string(text, Some(T))?;
        let method = field(&f, 3, T, "design level calculation method")?;
        if !method.eq_ignore_ascii_case("Watts/Area") {
            return Err(Error::idf(
                T,
                format!("calculation method \"{method}\" is not supported, use Watts/Area"),
            ));
        }
        let lighting = Self {
            name: split_zone_object_name(field(&f, 0, T, "name")?).to_string(),
            watts_per_area: parse_f64(field(&f, 5, T, "watts per area")?, T, "watts per area")?,
            schedule: lookup_schedule(schedules, field(&f, 2, T, "schedule name")?)?,
            return_air_fraction: parse_opt_f64(&f, 7, T, "return air fraction")?.unwrap_or(0.0),
            radiant_fraction: parse_opt_f64(&f, 8, T, "radiant fraction")?.unwrap_or(0.0),
            visible_fraction: parse_opt_f64(&f, 9, T, "visible fraction")?.unwrap_or(0.0),
        };
        lighting.validate()?;
        Ok((lighting, field(&f, 1, T, "zone name")?.to_string()))
    }

    /// Weighted average of several lighting loads.
    ///
    /// Power densities use the weights as given, so weights summing to less
    /// than 1 dilute the load. Fractions and schedules use the weights
    /// scaled to sum to 1. The schedule is named `"{name} Schedule"`.
    pub fn average(
        name: &str,
        lightings: &[&Lighting],
        weights: Option<&[f64]>,
        timestep: u32,
    ) -> Result<Self> {
        let (weights, unit) = load_weights(lightings.len(), weights)?;
        let schedules: Vec<&Schedule> = lightings.iter().map(|l| &l.schedule).collect();
        let schedule = Schedule::average(&format!("{name} Schedule"), &schedules, Some(unit.as_slice()), timestep)?;
        let lighting = Self {
            name: name.to_string(),
            watts_per_area: weighted_sum(lightings, &weights, |l| l.watts_per_area),
            schedule,
            return_air_fraction: weighted_sum(lightings, &unit, |l| l.return_air_fraction),
            radiant_fraction: weighted_sum(lightings, &unit, |l| l.radiant_fraction),
            visible_fraction: weighted_sum(lightings, &unit, |l| l.visible_fraction),
        };
        lighting.validate()?;
        Ok(lighting)
    }
}

impl Load for Lighting {
    fn name(&self) -> &str {
        &self.name
    }

    fn load_type(&self) -> &'static str {
        "Lighting"
    }

    fn schedules(&self) -> Vec<&Schedule> {
        vec![&self.schedule]
    }

    fn to_idf(&self, zone_name: &str) -> String {
        let values = [
            zone_object_name(&self.name, zone_name),
            zone_name.to_string(),
            self.schedule.name().to_string(),
            "Watts/Area".to_string(),
            String::new(),
            self.watts_per_area.to_string(),
            String::new(),
            self.return_air_fraction.to_string(),
            self.radiant_fraction.to_string(),
            self.visible_fraction.to_string(),
        ];
        let comments = [
            "name",
            "zone name",
            "schedule name",
            "lighting level method",
            "lighting power level {W}",
            "lighting per floor area {W/m2}",
            "lighting per person {W/ppl}",
            "return air fraction",
            "radiant fraction",
            "visible fraction",
        ];
        generate_idf_string("Lights", &values, Some(&comments))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::schedule_type_limits::FRACTIONAL;
    use crate::schedule::ScheduleRuleset;

    fn constant(name: &str, value: f64) -> Schedule {
        ScheduleRuleset::from_constant_value(name, value, Some(FRACTIONAL.clone()))
            .unwrap()
            .into()
    }

    #[test]
    fn fractions_cannot_exceed_one() {
        let lights = Lighting::new("Lights", 8.0, constant("On", 1.0)).unwrap();
        assert!(lights.clone().with_fractions(0.5, 0.4, 0.2).is_err());
        let lights = lights.with_fractions(0.1, 0.4, 0.2).unwrap();
        assert!((lights.convected_fraction() - 0.3).abs() < 1e-9);
        assert!(Lighting::new("Lights", -1.0, constant("On", 1.0)).is_err());
    }

    #[test]
    fn writes_lights_object() {
        let lights = Lighting::new("Office Lighting", 10.5, constant("Office Lights Sch", 0.9))
            .unwrap();
        let idf = lights.to_idf("Zone 1");
        assert!(idf.starts_with("Lights,\n Office Lighting..Zone 1,"));
        assert!(idf.contains("Watts/Area,"));
        assert!(idf.contains("10.5,"));
        assert!(idf.contains("!- lighting per floor area {W/m2}"));
        assert!(idf.contains("0.25;"));
    }

    #[test]
    fn reads_back_with_zone() {
        let sched = constant("Office Lights Sch", 0.9);
        let lights = Lighting::new("Office Lighting", 10.5, sched.clone()).unwrap();
        let schedules = HashMap::from([(sched.name().to_string(), sched)]);
        let (back, zone) = Lighting::from_idf(&lights.to_idf("Zone 1"), &schedules).unwrap();
        assert_eq!(zone, "Zone 1");
        assert_eq!(back, lights);
        assert!(Lighting::from_idf(&lights.to_idf("Zone 1"), &HashMap::new()).is_err());
    }

    #[test]
    fn average_with_partial_weights() {
        let a = Lighting::new("A", 10.0, constant("Full", 1.0)).unwrap();
        let b = Lighting::new("B", 6.0, constant("Half", 0.5))
            .unwrap()
            .with_fractions(0.0, 0.5, 0.25)
            .unwrap();
        let avg = Lighting::average("Mix", &[&a, &b], Some(&[0.25, 0.25]), 1).unwrap();
        assert!((avg.watts_per_area - 4.0).abs() < 1e-9);
        assert!((avg.radiant_fraction - 0.41).abs() < 1e-9);
        assert_eq!(avg.schedule.name(), "Mix Schedule");
        assert!(avg.schedule.all_values().iter().all(|v| (v - 0.75).abs() < 1e-9));
    }
}
