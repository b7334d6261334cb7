use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::types::Load;
use super::{
    check_fractional_schedule, load_weights, lookup_schedule, split_zone_object_name,
    weighted_sum, zone_object_name,
};
use crate::error::{Error, Result, check_ep_name, check_non_negative};
use crate::idf::reader::{field, parse_f64, parse_opt_f64};
use crate::idf::{generate_idf_string, parse_idf_string};
use crate::schedule::Schedule;

fn one() -> f64 {
    1.0
}

/// Outdoor air leaking in through the exterior envelope.
///
/// Written to IDF as `ZoneInfiltration:DesignFlowRate` using the
/// `Flow/ExteriorArea` method. The flow is scaled by
/// `constant + temperature * |dT| + velocity * wind speed`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Infiltration {
    pub name: String,
    /// Flow in m3/s per m2 of exterior facade.
    pub flow_per_exterior_area: f64,
    pub schedule: Schedule,
    #[serde(default = "one")]
    pub constant_coefficient: f64,
    #[serde(default)]
    pub temperature_coefficient: f64,
    #[serde(default)]
    pub velocity_coefficient: f64,
}

impl Infiltration {
    pub fn new(name: &str, flow_per_exterior_area: f64, schedule: Schedule) -> Result<Self> {
        let infiltration = Self {
            name: name.to_string(),
            flow_per_exterior_area,
            schedule,
            constant_coefficient: 1.0,
            temperature_coefficient: 0.0,
            velocity_coefficient: 0.0,
        };
        infiltration.validate()?;
        Ok(infiltration)
    }

    pub fn with_coefficients(mut self, constant: f64, temperature: f64, velocity: f64) -> Result<Self> {
        self.constant_coefficient = constant;
        self.temperature_coefficient = temperature;
        self.velocity_coefficient = velocity;
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        check_ep_name(&self.name)?;
        check_non_negative("infiltration flow per exterior area", self.flow_per_exterior_area)?;
        check_non_negative("infiltration constant coefficient", self.constant_coefficient)?;
        check_non_negative("infiltration temperature coefficient", self.temperature_coefficient)?;
        check_non_negative("infiltration velocity coefficient", self.velocity_coefficient)?;
        check_fractional_schedule(&self.schedule, "Infiltration")
    }

    /// Reads a `ZoneInfiltration:DesignFlowRate` object, returning the
    /// infiltration and its zone name.
    pub fn from_idf(text: &str, schedules: &HashMap<String, Schedule>) -> Result<(Self, String)> {
        const T: &str = "ZoneInfiltration:DesignFlowRate";
        let f = parse_idf_string(text, Some(T))?;
        let method = field(&f, 3, T, "design flow rate calculation method")?;
        if !method.eq_ignore_ascii_case("Flow/ExteriorArea") {
            return Err(Error::idf(
                T,
                format!("calculation method \"{method}\" is not supported, use Flow/ExteriorArea"),
            ));
        }
        let infiltration = Self {
            name: split_zone_object_name(field(&f, 0, T, "name")?).to_string(),
            flow_per_exterior_area: parse_f64(
                field(&f, 6, T, "flow per exterior surface area")?,
                T,
                "flow per exterior surface area",
            )?,
            schedule: lookup_schedule(schedules, field(&f, 2, T, "schedule name")?)?,
            constant_coefficient: parse_opt_f64(&f, 8, T, "constant coefficient")?.unwrap_or(1.0),
            temperature_coefficient: parse_opt_f64(&f, 9, T, "temperature coefficient")?
                .unwrap_or(0.0),
            velocity_coefficient: parse_opt_f64(&f, 10, T, "velocity coefficient")?.unwrap_or(0.0),
        };
        infiltration.validate()?;
        Ok((infiltration, field(&f, 1, T, "zone name")?.to_string()))
    }

    /// Weighted average of several infiltration loads.
    pub fn average(
        name: &str,
        infiltrations: &[&Infiltration],
        weights: Option<&[f64]>,
        timestep: u32,
    ) -> Result<Self> {
        let (weights, unit) = load_weights(infiltrations.len(), weights)?;
        let schedules: Vec<&Schedule> = infiltrations.iter().map(|i| &i.schedule).collect();
        let infiltration = Self {
            name: name.to_string(),
            flow_per_exterior_area: weighted_sum(infiltrations, &weights, |i| {
                i.flow_per_exterior_area
            }),
            schedule: Schedule::average(&format!("{name} Schedule"), &schedules, Some(unit.as_slice()), timestep)?,
            constant_coefficient: weighted_sum(infiltrations, &unit, |i| i.constant_coefficient),
            temperature_coefficient: weighted_sum(infiltrations, &unit, |i| {
                i.temperature_coefficient
            }),
            velocity_coefficient: weighted_sum(infiltrations, &unit, |i| i.velocity_coefficient),
        };
        infiltration.validate()?;
        Ok(infiltration)
    }
}

impl Load for Infiltration {
    fn name(&self) -> &str {
        &self.name
    }

    fn load_type(&self) -> &'static str {
        "Infiltration"
    }

    fn schedules(&self) -> Vec<&Schedule> {
        vec![&self.schedule]
    }

    fn to_idf(&self, zone_name: &str) -> String {
        let values = [
            zone_object_name(&self.name, zone_name),
            zone_name.to_string(),
            self.schedule.name().to_string(),
            "Flow/ExteriorArea".to_string(),
            String::new(),
            String::new(),
            self.flow_per_exterior_area.to_string(),
            String::new(),
            self.constant_coefficient.to_string(),
            self.temperature_coefficient.to_string(),
            self.velocity_coefficient.to_string(),
        ];
        let comments = [
            "name",
            "zone name",
            "schedule name",
            "design flow rate calculation method",
            "design flow rate {m3/s}",
            "flow per floor area {m3/s-m2}",
            "flow per exterior area {m3/s-m2}",
            "air changes per hour {1/hr}",
            "constant coefficient",
            "temperature coefficient",
            "velocity coefficient",
        ];
        generate_idf_string("ZoneInfiltration:DesignFlowRate", &values, Some(&comments))
    }
}
