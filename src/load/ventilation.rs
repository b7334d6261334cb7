use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::types::Load;
use super::{
    check_fractional_schedule, load_weights, lookup_schedule, split_zone_object_name,
    weighted_sum, zone_object_name,
};
use crate::error::{Error, Result, check_ep_name, check_non_negative};
use crate::idf::reader::{field, parse_opt_f64};
use crate::idf::{generate_idf_string, parse_idf_string};
use crate::library::schedule_type_limits::FRACTIONAL;
use crate::schedule::{Schedule, ScheduleRuleset};

/// Flow per person EnergyPlus assumes when the field is blank, in m3/s.
const DEFAULT_FLOW_PER_PERSON: f64 = 0.00944;

/// Minimum outdoor air for a zone.
///
/// Written to IDF as `DesignSpecification:OutdoorAir`. The four criteria are
/// added together (the `Sum` method).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Ventilation {
    pub name: String,
    /// m3/s per person.
    pub flow_per_person: f64,
    /// m3/s per m2 of floor area.
    pub flow_per_area: f64,
    /// m3/s for the whole zone.
    pub flow_per_zone: f64,
    pub air_changes_per_hour: f64,
    /// Fractional schedule on the outdoor air. `None` means always on.
    pub schedule: Option<Schedule>,
}

impl Ventilation {
    pub fn new(
        name: &str,
        flow_per_person: f64,
        flow_per_area: f64,
        flow_per_zone: f64,
        air_changes_per_hour: f64,
    ) -> Result<Self> {
        let vent = Self {
            name: name.to_string(),
            flow_per_person,
            flow_per_area,
            flow_per_zone,
            air_changes_per_hour,
            schedule: None,
        };
        vent.validate()?;
        Ok(vent)
    }

    pub fn with_schedule(mut self, schedule: Schedule) -> Result<Self> {
        self.schedule = Some(schedule);
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        check_ep_name(&self.name)?;
        check_non_negative("ventilation flow per person", self.flow_per_person)?;
        check_non_negative("ventilation flow per area", self.flow_per_area)?;
        check_non_negative("ventilation flow per zone", self.flow_per_zone)?;
        check_non_negative("ventilation air changes per hour", self.air_changes_per_hour)?;
        match &self.schedule {
            Some(s) => check_fractional_schedule(s, "Ventilation"),
            None => Ok(()),
        }
    }

    /// Reads a `DesignSpecification:OutdoorAir` object.
    ///
    /// Single-criterion methods zero out the other criteria. A blank flow per
    /// person takes the EnergyPlus default of 0.00944 m3/s.
    pub fn from_idf(text: &str, schedules: &HashMap<String, Schedule>) -> Result<Self> {
        const T: &str = "DesignSpecification:OutdoorAir";
        let f = parse_idf_string(text, Some(T))?;
        let mut person = parse_opt_f64(&f, 2, T, "flow per person")?.unwrap_or(DEFAULT_FLOW_PER_PERSON);
        let mut area = parse_opt_f64(&f, 3, T, "flow per area")?.unwrap_or(0.0);
        let mut zone = parse_opt_f64(&f, 4, T, "flow per zone")?.unwrap_or(0.0);
        let mut ach = parse_opt_f64(&f, 5, T, "air changes per hour")?.unwrap_or(0.0);
        let method = f.get(1).map(|m| m.to_ascii_lowercase()).unwrap_or_default();
        match method.as_str() {
            "sum" | "maximum" => {}
            "" | "flow/person" => (area, zone, ach) = (0.0, 0.0, 0.0),
            "flow/area" => (person, zone, ach) = (0.0, 0.0, 0.0),
            "flow/zone" => (person, area, ach) = (0.0, 0.0, 0.0),
            "airchanges/hour" => (person, area, zone) = (0.0, 0.0, 0.0),
            other => {
                return Err(Error::idf(
                    T,
                    format!("flow rate method \"{other}\" is not supported"),
                ));
            }
        }
        let schedule = match f.get(6).map(|s| s.trim()) {
            None | Some("") => None,
            Some(name) => Some(lookup_schedule(schedules, name)?),
        };
        let vent = Self {
            name: split_zone_object_name(field(&f, 0, T, "name")?).to_string(),
            flow_per_person: person,
            flow_per_area: area,
            flow_per_zone: zone,
            air_changes_per_hour: ach,
            schedule,
        };
        vent.validate()?;
        Ok(vent)
    }

    /// Weighted average of several ventilation objects.
    ///
    /// Inputs without a schedule count as always on when any input has one.
    pub fn average(
        name: &str,
        ventilations: &[&Ventilation],
        weights: Option<&[f64]>,
        timestep: u32,
    ) -> Result<Self> {
        let (weights, unit) = load_weights(ventilations.len(), weights)?;
        let schedule = if ventilations.iter().all(|v| v.schedule.is_none()) {
            None
        } else {
            let full: Schedule =
                ScheduleRuleset::from_constant_value("Full Ventilation", 1.0, Some(FRACTIONAL.clone()))?
                    .into();
            let schedules: Vec<&Schedule> = ventilations
                .iter()
                .map(|v| v.schedule.as_ref().unwrap_or(&full))
                .collect();
            Some(Schedule::average(
                &format!("{name} Schedule"),
                &schedules,
                Some(unit.as_slice()),
                timestep,
            )?)
        };
        let vent = Self {
            name: name.to_string(),
            flow_per_person: weighted_sum(ventilations, &weights, |v| v.flow_per_person),
            flow_per_area: weighted_sum(ventilations, &weights, |v| v.flow_per_area),
            flow_per_zone: weighted_sum(ventilations, &weights, |v| v.flow_per_zone),
            air_changes_per_hour: weighted_sum(ventilations, &weights, |v| v.air_changes_per_hour),
            schedule,
        };
        vent.validate()?;
        Ok(vent)
    }
}

impl Load for Ventilation {
    fn name(&self) -> &str {
        &self.name
    }

    fn load_type(&self) -> &'static str {
        "Ventilation"
    }

    fn schedules(&self) -> Vec<&Schedule> {
        self.schedule.iter().collect()
    }

    fn to_idf(&self, zone_name: &str) -> String {
        let values = [
            zone_object_name(&self.name, zone_name),
            "Sum".to_string(),
            self.flow_per_person.to_string(),
            self.flow_per_area.to_string(),
            self.flow_per_zone.to_string(),
            self.air_changes_per_hour.to_string(),
            self.schedule
                .as_ref()
                .map(|s| s.name().to_string())
                .unwrap_or_default(),
        ];
        let comments = [
            "name",
            "flow rate method",
            "flow per person {m3/s-person}",
            "flow per floor area {m3/s-m2}",
            "flow per zone {m3/s}",
            "air changes per hour {1/hr}",
            "outdoor air schedule name",
        ];
        generate_idf_string("DesignSpecification:OutdoorAir", &values, Some(&comments))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_sum_method() {
        let vent = Ventilation::new("Office OA", 0.0025, 0.0003, 0.0, 0.0).unwrap();
        let idf = vent.to_idf("Z");
        let fields = parse_idf_string(&idf, Some("DesignSpecification:OutdoorAir")).unwrap();
        assert_eq!(fields[0], "Office OA..Z");
        assert_eq!(fields[1], "Sum");
        assert_eq!(fields[6], "");
        assert!(vent.schedules().is_empty());
    }

    #[test]
    fn single_criterion_methods_zero_the_rest() {
        let text = "DesignSpecification:OutdoorAir, OA..Z, Flow/Area, 0.01, 0.0006, 0.1, 2;";
        let vent = Ventilation::from_idf(text, &HashMap::new()).unwrap();
        assert_eq!(vent.name, "OA");
        assert_eq!(vent.flow_per_person, 0.0);
        assert_eq!(vent.flow_per_area, 0.0006);
        assert_eq!(vent.air_changes_per_hour, 0.0);

        let blank = "DesignSpecification:OutdoorAir, OA, Sum, , 0.0006;";
        let vent = Ventilation::from_idf(blank, &HashMap::new()).unwrap();
        assert_eq!(vent.flow_per_person, DEFAULT_FLOW_PER_PERSON);

        let bad = "DesignSpecification:OutdoorAir, OA, Proportional, 0.01;";
        assert!(Ventilation::from_idf(bad, &HashMap::new()).is_err());
    }

    #[test]
    fn average_fills_missing_schedules() {
        let half: Schedule = ScheduleRuleset::from_constant_value("Half", 0.5, None)
            .unwrap()
            .into();
        let a = Ventilation::new("A", 0.01, 0.0, 0.0, 0.0)
            .unwrap()
            .with_schedule(half)
            .unwrap();
        let b = Ventilation::new("B", 0.0, 0.0006, 0.0, 0.0).unwrap();
        let avg = Ventilation::average("Mix", &[&a, &b], None, 1).unwrap();
        assert!((avg.flow_per_person - 0.005).abs() < 1e-12);
        assert!((avg.flow_per_area - 0.0003).abs() < 1e-12);
        let sched = avg.schedule.unwrap();
        assert!(sched.all_values().iter().all(|v| (v - 0.75).abs() < 1e-9));

        let none = Ventilation::average("Bare", &[&b], None, 1).unwrap();
        assert!(none.schedule.is_none());
    }
}
