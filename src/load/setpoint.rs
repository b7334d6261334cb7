use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::types::Load;
use super::{
    check_schedule_unit, load_weights, lookup_schedule, split_zone_object_name, zone_object_name,
};
use crate::error::{Result, check_ep_name, check_range};
use crate::idf::reader::field;
use crate::idf::{generate_idf_string, parse_idf_string};
use crate::library::schedule_type_limits::{CONTROL_TYPE, HUMIDITY, TEMPERATURE};
use crate::schedule::{Schedule, ScheduleRuleset};

/// Name of the constant schedule selecting dual setpoint thermostat control.
pub const CONTROL_TYPE_SCHEDULE: &str = "Dual Setpoint Control Type";

/// EnergyPlus control type number for `ThermostatSetpoint:DualSetpoint`.
const DUAL_SETPOINT_CONTROL: f64 = 4.0;

/// Constant schedule every thermostat written by [`Setpoint::to_idf`]
/// references for its control type.
pub fn control_type_schedule() -> Result<Schedule> {
    ScheduleRuleset::from_constant_value(
        CONTROL_TYPE_SCHEDULE,
        DUAL_SETPOINT_CONTROL,
        Some(CONTROL_TYPE.clone()),
    )
    .map(Schedule::from)
}

fn humidifying_no_limit() -> Result<Schedule> {
    ScheduleRuleset::from_constant_value("HumidNoLimit", 0.0, Some(HUMIDITY.clone()))
        .map(Schedule::from)
}

fn dehumidifying_no_limit() -> Result<Schedule> {
    ScheduleRuleset::from_constant_value("DeHumidNoLimit", 100.0, Some(HUMIDITY.clone()))
        .map(Schedule::from)
}

fn temperature_schedule(name: &str, value: f64) -> Result<Schedule> {
    check_range("temperature setpoint", value, -273.15, f64::MAX)?;
    ScheduleRuleset::from_constant_value(name, value, Some(TEMPERATURE.clone())).map(Schedule::from)
}

fn humidity_schedule(name: &str, value: f64) -> Result<Schedule> {
    check_range("humidity setpoint", value, 0.0, 100.0)?;
    ScheduleRuleset::from_constant_value(name, value, Some(HUMIDITY.clone())).map(Schedule::from)
}

fn fold_values(schedule: &Schedule, highest: bool) -> f64 {
    let values = schedule.all_values();
    let init = if highest { f64::NEG_INFINITY } else { f64::INFINITY };
    values
        .into_iter()
        .fold(init, |acc, v| if highest { acc.max(v) } else { acc.min(v) })
}

/// Thermostat and optional humidistat setpoints for a conditioned zone.
///
/// Humidity schedules are either both present or both absent. Setting only
/// one of them fills the other with a schedule that never limits the
/// system (0% for humidifying, 100% for dehumidifying).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Setpoint {
    pub name: String,
    /// Heating setpoint in C.
    pub heating_schedule: Schedule,
    /// Cooling setpoint in C.
    pub cooling_schedule: Schedule,
    #[serde(default)]
    pub humidifying_schedule: Option<Schedule>,
    #[serde(default)]
    pub dehumidifying_schedule: Option<Schedule>,
}

impl Setpoint {
    /// # Errors
    ///
    /// Returns an error if the name is invalid or either schedule has type
    /// limits that are not temperatures.
    pub fn new(name: &str, heating_schedule: Schedule, cooling_schedule: Schedule) -> Result<Self> {
        let setpoint = Self {
            name: name.to_string(),
            heating_schedule,
            cooling_schedule,
            humidifying_schedule: None,
            dehumidifying_schedule: None,
        };
        setpoint.validate()?;
        Ok(setpoint)
    }

    /// Setpoints that hold the same temperatures all year.
    ///
    /// The schedules are named `{name}_HtgSetp` and `{name}_ClgSetp`.
    ///
    /// # Examples
    ///
    /// ```
    /// use honeybee_energy::load::Setpoint;
    ///
    /// let setpoint = Setpoint::from_constant_setpoints("Office", 21.0, 24.0).unwrap();
    /// assert_eq!(setpoint.heating_setpoint(), 21.0);
    /// assert_eq!(setpoint.cooling_schedule.name(), "Office_ClgSetp");
    /// ```
    pub fn from_constant_setpoints(name: &str, heating: f64, cooling: f64) -> Result<Self> {
        Self::new(
            name,
            temperature_schedule(&format!("{name}_HtgSetp"), heating)?,
            temperature_schedule(&format!("{name}_ClgSetp"), cooling)?,
        )
    }

    /// Sets the humidity schedules, filling a missing one with its
    /// no-limit schedule. Passing `None` twice removes humidity control.
    pub fn with_humidity_schedules(
        mut self,
        humidifying: Option<Schedule>,
        dehumidifying: Option<Schedule>,
    ) -> Result<Self> {
        (self.humidifying_schedule, self.dehumidifying_schedule) = match (humidifying, dehumidifying) {
            (None, None) => (None, None),
            (Some(h), None) => (Some(h), Some(dehumidifying_no_limit()?)),
            (None, Some(d)) => (Some(humidifying_no_limit()?), Some(d)),
            (Some(h), Some(d)) => (Some(h), Some(d)),
        };
        self.validate()?;
        Ok(self)
    }

    /// Sets constant humidity setpoints in percent relative humidity.
    pub fn with_humidity_setpoints(
        self,
        humidifying: Option<f64>,
        dehumidifying: Option<f64>,
    ) -> Result<Self> {
        let humid = humidifying
            .map(|v| humidity_schedule(&format!("{}_HumidSetp", self.name), v))
            .transpose()?;
        let dehumid = dehumidifying
            .map(|v| humidity_schedule(&format!("{}_DeHumidSetp", self.name), v))
            .transpose()?;
        self.with_humidity_schedules(humid, dehumid)
    }

    pub fn remove_humidity_setpoints(&mut self) {
        self.humidifying_schedule = None;
        self.dehumidifying_schedule = None;
    }

    pub fn validate(&self) -> Result<()> {
        check_ep_name(&self.name)?;
        check_schedule_unit(&self.heating_schedule, "Heating Setpoint", "C")?;
        check_schedule_unit(&self.cooling_schedule, "Cooling Setpoint", "C")?;
        if let Some(s) = &self.humidifying_schedule {
            check_schedule_unit(s, "Humidifying Setpoint", "%")?;
        }
        if let Some(s) = &self.dehumidifying_schedule {
            check_schedule_unit(s, "Dehumidifying Setpoint", "%")?;
        }
        Ok(())
    }

    /// Highest heating temperature.
    pub fn heating_setpoint(&self) -> f64 {
        fold_values(&self.heating_schedule, true)
    }

    /// Lowest cooling temperature.
    pub fn cooling_setpoint(&self) -> f64 {
        fold_values(&self.cooling_schedule, false)
    }

    pub fn humidifying_setpoint(&self) -> Option<f64> {
        self.humidifying_schedule.as_ref().map(|s| fold_values(s, true))
    }

    pub fn dehumidifying_setpoint(&self) -> Option<f64> {
        self.dehumidifying_schedule.as_ref().map(|s| fold_values(s, false))
    }

    /// Lowest heating temperature, used when the building is unoccupied.
    pub fn heating_setback(&self) -> f64 {
        fold_values(&self.heating_schedule, false)
    }

    /// Highest cooling temperature, used when the building is unoccupied.
    pub fn cooling_setback(&self) -> f64 {
        fold_values(&self.cooling_schedule, true)
    }

    pub fn humidifying_setback(&self) -> Option<f64> {
        self.humidifying_schedule.as_ref().map(|s| fold_values(s, false))
    }

    pub fn dehumidifying_setback(&self) -> Option<f64> {
        self.dehumidifying_schedule.as_ref().map(|s| fold_values(s, true))
    }

    /// Reads a `ThermostatSetpoint:DualSetpoint` object, returning the
    /// setpoint and the zone part of its name (empty if the name has none).
    pub fn from_idf(text: &str, schedules: &HashMap<String, Schedule>) -> Result<(Self, String)> {
        const T: &str = "ThermostatSetpoint:DualSetpoint";
        let f = parse_idf_string(text, Some(T))?;
        let object_name = field(&f, 0, T, "name")?;
        let zone = object_name
            .split_once("..")
            .map(|(_, z)| z.to_string())
            .unwrap_or_default();
        let setpoint = Self::new(
            split_zone_object_name(object_name),
            lookup_schedule(schedules, field(&f, 1, T, "heating setpoint schedule")?)?,
            lookup_schedule(schedules, field(&f, 2, T, "cooling setpoint schedule")?)?,
        )?;
        Ok((setpoint, zone))
    }

    /// Adds humidity schedules from a `ZoneControl:Humidistat` object.
    pub fn add_humidity_from_idf(
        &mut self,
        text: &str,
        schedules: &HashMap<String, Schedule>,
    ) -> Result<()> {
        const T: &str = "ZoneControl:Humidistat";
        let f = parse_idf_string(text, Some(T))?;
        let lookup = |i: usize| match f.get(i).map(|s| s.trim()) {
            None | Some("") => Ok(None),
            Some(name) => lookup_schedule(schedules, name).map(Some),
        };
        let updated = self.clone().with_humidity_schedules(lookup(2)?, lookup(3)?)?;
        *self = updated;
        Ok(())
    }

    /// IDF text of the humidistat, or `None` without humidity control.
    pub fn to_idf_humidistat(&self, zone_name: &str) -> Option<String> {
        let humid = self.humidifying_schedule.as_ref()?;
        let dehumid = self.dehumidifying_schedule.as_ref()?;
        let values = [
            zone_object_name(&self.name, zone_name),
            zone_name.to_string(),
            humid.name().to_string(),
            dehumid.name().to_string(),
        ];
        let comments = [
            "name",
            "zone name",
            "humidifying setpoint schedule",
            "dehumidifying setpoint schedule",
        ];
        Some(generate_idf_string("ZoneControl:Humidistat", &values, Some(&comments)))
    }

    /// Weighted average of several setpoints.
    ///
    /// Humidity control is kept if any input has it; inputs without it count
    /// as the no-limit schedules.
    pub fn average(
        name: &str,
        setpoints: &[&Setpoint],
        weights: Option<&[f64]>,
        timestep: u32,
    ) -> Result<Self> {
        let (_, unit) = load_weights(setpoints.len(), weights)?;
        let average = |suffix: &str, schedules: Vec<&Schedule>| {
            Schedule::average(&format!("{name}_{suffix} Schedule"), &schedules, Some(unit.as_slice()), timestep)
        };
        let heating = average("HtgSetp", setpoints.iter().map(|s| &s.heating_schedule).collect())?;
        let cooling = average("ClgSetp", setpoints.iter().map(|s| &s.cooling_schedule).collect())?;
        let mut setpoint = Self::new(name, heating, cooling)?;
        if setpoints.iter().any(|s| s.humidifying_schedule.is_some()) {
            let (humid_none, dehumid_none) = (humidifying_no_limit()?, dehumidifying_no_limit()?);
            let humid = average(
                "Humid",
                setpoints
                    .iter()
                    .map(|s| s.humidifying_schedule.as_ref().unwrap_or(&humid_none))
                    .collect(),
            )?;
            let dehumid = average(
                "Dehumid",
                setpoints
                    .iter()
                    .map(|s| s.dehumidifying_schedule.as_ref().unwrap_or(&dehumid_none))
                    .collect(),
            )?;
            setpoint = setpoint.with_humidity_schedules(Some(humid), Some(dehumid))?;
        }
        Ok(setpoint)
    }
}

impl Load for Setpoint {
    fn name(&self) -> &str {
        &self.name
    }

    fn load_type(&self) -> &'static str {
        "Setpoint"
    }

    fn schedules(&self) -> Vec<&Schedule> {
        let mut schedules = vec![&self.heating_schedule, &self.cooling_schedule];
        schedules.extend(self.humidifying_schedule.as_ref());
        schedules.extend(self.dehumidifying_schedule.as_ref());
        schedules
    }

    /// `ZoneControl:Thermostat` and its `ThermostatSetpoint:DualSetpoint`.
    ///
    /// The thermostat references [`CONTROL_TYPE_SCHEDULE`], which must be
    /// written alongside it.
    fn to_idf(&self, zone_name: &str) -> String {
        let object_name = zone_object_name(&self.name, zone_name);
        let thermostat = generate_idf_string(
            "ZoneControl:Thermostat",
            &[
                object_name.as_str(),
                zone_name,
                CONTROL_TYPE_SCHEDULE,
                "ThermostatSetpoint:DualSetpoint",
                object_name.as_str(),
            ],
            Some(&[
                "name",
                "zone name",
                "control type schedule name",
                "control object type",
                "control name",
            ]),
        );
        let dual = generate_idf_string(
            "ThermostatSetpoint:DualSetpoint",
            &[
                object_name.as_str(),
                self.heating_schedule.name(),
                self.cooling_schedule.name(),
            ],
            Some(&[
                "name",
                "heating setpoint temperature schedule",
                "cooling setpoint temperature schedule",
            ]),
        );
        format!("{thermostat}\n\n{dual}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::idf::extract_objects;

    #[test]
    fn constant_setpoints_and_setbacks() {
        let setpoint = Setpoint::from_constant_setpoints("Office", 21.0, 24.0).unwrap();
        assert_eq!(setpoint.heating_setpoint(), 21.0);
        assert_eq!(setpoint.heating_setback(), 21.0);
        assert_eq!(setpoint.cooling_setpoint(), 24.0);
        assert_eq!(setpoint.humidifying_setpoint(), None);
        assert_eq!(setpoint.schedules().len(), 2);
    }

    #[test]
    fn setback_reads_lowest_heating_value() {
        let week = ScheduleRuleset::from_daily_values(
            "Heat",
            &[[15.6; 7].as_slice(), [21.0; 12].as_slice(), [15.6; 5].as_slice()].concat(),
            1,
            Some(TEMPERATURE.clone()),
        )
        .unwrap();
        let cool = temperature_schedule("Cool", 24.0).unwrap();
        let setpoint = Setpoint::new("Office", week.into(), cool).unwrap();
        assert_eq!(setpoint.heating_setpoint(), 21.0);
        assert_eq!(setpoint.heating_setback(), 15.6);
    }

    #[test]
    fn one_humidity_schedule_fills_the_other() {
        let setpoint = Setpoint::from_constant_setpoints("Office", 21.0, 24.0)
            .unwrap()
            .with_humidity_setpoints(Some(30.0), None)
            .unwrap();
        assert_eq!(setpoint.humidifying_setpoint(), Some(30.0));
        assert_eq!(setpoint.dehumidifying_setpoint(), Some(100.0));
        assert_eq!(
            setpoint.humidifying_schedule.as_ref().map(|s| s.name()),
            Some("Office_HumidSetp")
        );
        let idf = setpoint.to_idf_humidistat("Z").unwrap();
        assert!(idf.contains("DeHumidNoLimit;"));
    }

    #[test]
    fn humidistat_absent_without_humidity() {
        let mut setpoint = Setpoint::from_constant_setpoints("Office", 21.0, 24.0)
            .unwrap()
            .with_humidity_setpoints(Some(30.0), Some(60.0))
            .unwrap();
        setpoint.remove_humidity_setpoints();
        assert!(setpoint.to_idf_humidistat("Z").is_none());
    }

    #[test]
    fn temperature_units_required() {
        let frac: Schedule = ScheduleRuleset::from_constant_value(
            "Frac",
            0.5,
            Some(crate::library::schedule_type_limits::FRACTIONAL.clone()),
        )
        .unwrap()
        .into();
        let cool = temperature_schedule("Cool", 24.0).unwrap();
        assert!(Setpoint::new("Bad", frac, cool).is_err());
    }

    #[test]
    fn writes_thermostat_pair() {
        let setpoint = Setpoint::from_constant_setpoints("Office", 21.0, 24.0).unwrap();
        let idf = setpoint.to_idf("Zone 1");
        let thermostat = extract_objects(&idf, "ZoneControl:Thermostat");
        let dual = extract_objects(&idf, "ThermostatSetpoint:DualSetpoint");
        assert_eq!((thermostat.len(), dual.len()), (1, 1));
        let fields = parse_idf_string(&thermostat[0], None).unwrap();
        assert_eq!(fields[2], CONTROL_TYPE_SCHEDULE);
        assert_eq!(fields[4], "Office..Zone 1");
        assert_eq!(control_type_schedule().unwrap().constant_value(), Some(4.0));

        let schedules: HashMap<String, Schedule> = setpoint
            .schedules()
            .into_iter()
            .map(|s| (s.name().to_string(), s.clone()))
            .collect();
        let (back, zone) = Setpoint::from_idf(&dual[0], &schedules).unwrap();
        assert_eq!(zone, "Zone 1");
        assert_eq!(back, setpoint);
    }

    #[test]
    fn average_blends_humidity() {
        let dry = Setpoint::from_constant_setpoints("Dry", 20.0, 24.0)
            .unwrap()
            .with_humidity_setpoints(Some(30.0), Some(50.0))
            .unwrap();
        let plain = Setpoint::from_constant_setpoints("Plain", 22.0, 26.0).unwrap();
        let avg = Setpoint::average("Mix", &[&dry, &plain], None, 1).unwrap();
        assert!((avg.heating_setpoint() - 21.0).abs() < 1e-9);
        assert!((avg.humidifying_setpoint().unwrap() - 15.0).abs() < 1e-9);
        assert!((avg.dehumidifying_setpoint().unwrap() - 75.0).abs() < 1e-9);
        assert_eq!(avg.heating_schedule.name(), "Mix_HtgSetp Schedule");
    }
}
