use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result, check_positive, check_range};
use crate::idf::reader::{field, parse_f64, parse_opt_f64};
use crate::idf::{generate_idf_string, parse_idf_string};
use crate::load::{Setpoint, Ventilation, check_fractional_schedule, zone_object_name};
use crate::schedule::Schedule;

/// Maximum supply air temperature when heating, in C.
const HEATING_SUPPLY_AIR_TEMPERATURE: f64 = 40.0;
/// Minimum supply air temperature when cooling, in C.
const COOLING_SUPPLY_AIR_TEMPERATURE: f64 = 13.0;
const HEATING_SUPPLY_AIR_HUMIDITY_RATIO: f64 = 0.0156;
const COOLING_SUPPLY_AIR_HUMIDITY_RATIO: f64 = 0.0077;
const COOLING_SENSIBLE_HEAT_RATIO: f64 = 0.7;

/// Limit on the heating or cooling capacity of an ideal air system.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapacityLimit {
    /// Sized by EnergyPlus from the design days.
    #[default]
    Autosize,
    NoLimit,
    /// Fixed capacity in W.
    Watts(f64),
}

impl CapacityLimit {
    fn validate(&self, field: &str) -> Result<()> {
        match self {
            CapacityLimit::Watts(w) => check_positive(field, *w),
            _ => Ok(()),
        }
    }

    /// Limit type, air flow limit and capacity fields.
    fn idf_fields(&self) -> [String; 3] {
        match self {
            CapacityLimit::Autosize => [
                "LimitFlowRateAndCapacity".to_string(),
                "autosize".to_string(),
                "autosize".to_string(),
            ],
            CapacityLimit::NoLimit => ["NoLimit".to_string(), String::new(), String::new()],
            CapacityLimit::Watts(w) => ["LimitCapacity".to_string(), String::new(), w.to_string()],
        }
    }

    fn from_idf_fields(limit_type: &str, capacity: &str) -> Result<Self> {
        match limit_type.to_ascii_lowercase().as_str() {
            "" | "nolimit" | "limitflowrate" => Ok(CapacityLimit::NoLimit),
            _ if capacity.is_empty() || capacity.eq_ignore_ascii_case("autosize") => {
                Ok(CapacityLimit::Autosize)
            }
            _ => parse_f64(capacity, "ZoneHVAC:IdealLoadsAirSystem", "capacity")
                .map(CapacityLimit::Watts),
        }
    }
}

/// Air-side economizer control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum EconomizerType {
    NoEconomizer,
    #[default]
    DifferentialDryBulb,
    DifferentialEnthalpy,
}

impl EconomizerType {
    pub const ALL: [EconomizerType; 3] = [
        EconomizerType::NoEconomizer,
        EconomizerType::DifferentialDryBulb,
        EconomizerType::DifferentialEnthalpy,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            EconomizerType::NoEconomizer => "NoEconomizer",
            EconomizerType::DifferentialDryBulb => "DifferentialDryBulb",
            EconomizerType::DifferentialEnthalpy => "DifferentialEnthalpy",
        }
    }
}

impl fmt::Display for EconomizerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EconomizerType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        EconomizerType::ALL
            .into_iter()
            .find(|e| e.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                Error::invalid(
                    "economizer type",
                    format!(
                        "\"{s}\" is not one of {}",
                        EconomizerType::ALL.map(EconomizerType::as_str).join(", ")
                    ),
                )
            })
    }
}

/// Heat recovery written to IDF, derived from the two effectiveness values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeatRecoveryType {
    None,
    Sensible,
    Enthalpy,
}

impl HeatRecoveryType {
    pub fn as_str(self) -> &'static str {
        match self {
            HeatRecoveryType::None => "None",
            HeatRecoveryType::Sensible => "Sensible",
            HeatRecoveryType::Enthalpy => "Enthalpy",
        }
    }
}

/// A system that supplies whatever heating, cooling and outdoor air a zone
/// needs to hold its setpoints, within optional capacity limits.
///
/// Written to IDF as `ZoneHVAC:IdealLoadsAirSystem` with the equipment
/// connections and equipment list that tie it to the zone.
///
/// # Examples
///
/// ```
/// use honeybee_energy::hvac::{IdealAirSystem, HeatRecoveryType};
///
/// let mut hvac = IdealAirSystem::default();
/// assert_eq!(hvac.heat_recovery_type(), HeatRecoveryType::None);
/// hvac.sensible_heat_recovery = 0.7;
/// assert_eq!(hvac.heat_recovery_type(), HeatRecoveryType::Sensible);
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IdealAirSystem {
    pub heating_limit: CapacityLimit,
    pub cooling_limit: CapacityLimit,
    pub economizer_type: EconomizerType,
    /// Vary outdoor air with the occupancy schedule.
    pub demand_controlled_ventilation: bool,
    pub sensible_heat_recovery: f64,
    pub latent_heat_recovery: f64,
    pub heating_availability_schedule: Option<Schedule>,
    pub cooling_availability_schedule: Option<Schedule>,
}

impl IdealAirSystem {
    pub fn validate(&self) -> Result<()> {
        self.heating_limit.validate("ideal air heating limit")?;
        self.cooling_limit.validate("ideal air cooling limit")?;
        check_range("ideal air sensible heat recovery", self.sensible_heat_recovery, 0.0, 1.0)?;
        check_range("ideal air latent heat recovery", self.latent_heat_recovery, 0.0, 1.0)?;
        if let Some(s) = &self.heating_availability_schedule {
            check_fractional_schedule(s, "Heating availability")?;
        }
        if let Some(s) = &self.cooling_availability_schedule {
            check_fractional_schedule(s, "Cooling availability")?;
        }
        Ok(())
    }

    pub fn heat_recovery_type(&self) -> HeatRecoveryType {
        if self.sensible_heat_recovery == 0.0 && self.latent_heat_recovery == 0.0 {
            HeatRecoveryType::None
        } else if self.latent_heat_recovery != 0.0 {
            HeatRecoveryType::Enthalpy
        } else {
            HeatRecoveryType::Sensible
        }
    }

    pub fn schedules(&self) -> Vec<&Schedule> {
        self.heating_availability_schedule
            .iter()
            .chain(self.cooling_availability_schedule.iter())
            .collect()
    }

    /// Name of the `ZoneHVAC:IdealLoadsAirSystem` serving `zone_name`.
    pub fn object_name(zone_name: &str) -> String {
        format!("{zone_name} Ideal Loads Air System")
    }

    /// IDF objects for the system serving `zone_name`.
    ///
    /// Humidity control follows the setpoint's humidistat and the outdoor air
    /// follows `ventilation`, which must be written for the same zone.
    ///
    /// # Arguments
    ///
    /// * `zone_name` - Zone the system serves; prefixes every node name
    /// * `setpoint` - Zone setpoint, used for humidity control types
    /// * `ventilation` - Zone outdoor air requirement, if any
    pub fn to_idf(
        &self,
        zone_name: &str,
        setpoint: &Setpoint,
        ventilation: Option<&Ventilation>,
    ) -> String {
        let system_name = Self::object_name(zone_name);
        let supply_node = format!("{zone_name} Ideal Loads Supply Inlet");
        let equipment_list = format!("{zone_name} Equipment List");
        let [h_type, h_air, h_cap] = self.heating_limit.idf_fields();
        let [c_type, c_air, c_cap] = self.cooling_limit.idf_fields();
        let schedule_name =
            |s: &Option<Schedule>| s.as_ref().map(|s| s.name().to_string()).unwrap_or_default();
        let control = |on: bool| (if on { "Humidistat" } else { "None" }).to_string();
        let (oa_name, oa_inlet) = match ventilation {
            Some(v) => (
                zone_object_name(&v.name, zone_name),
                format!("{zone_name} Outdoor Air Inlet"),
            ),
            None => (String::new(), String::new()),
        };
        let values = [
            system_name.clone(),
            String::new(),
            supply_node.clone(),
            String::new(),
            String::new(),
            HEATING_SUPPLY_AIR_TEMPERATURE.to_string(),
            COOLING_SUPPLY_AIR_TEMPERATURE.to_string(),
            HEATING_SUPPLY_AIR_HUMIDITY_RATIO.to_string(),
            COOLING_SUPPLY_AIR_HUMIDITY_RATIO.to_string(),
            h_type,
            h_air,
            h_cap,
            c_type,
            c_air,
            c_cap,
            schedule_name(&self.heating_availability_schedule),
            schedule_name(&self.cooling_availability_schedule),
            control(setpoint.dehumidifying_schedule.is_some()),
            COOLING_SENSIBLE_HEAT_RATIO.to_string(),
            control(setpoint.humidifying_schedule.is_some()),
            oa_name,
            oa_inlet,
            (if self.demand_controlled_ventilation { "OccupancySchedule" } else { "None" })
                .to_string(),
            self.economizer_type.to_string(),
            self.heat_recovery_type().as_str().to_string(),
            self.sensible_heat_recovery.to_string(),
            self.latent_heat_recovery.to_string(),
        ];
        let comments = [
            "name",
            "availability schedule",
            "zone supply air node",
            "zone exhaust air node",
            "system inlet air node",
            "max heating supply air temp {C}",
            "min cooling supply air temp {C}",
            "max heating supply air hr {kg-H2O/kg-air}",
            "min cooling supply air hr {kg-H2O/kg-air}",
            "heating limit",
            "max heating flow rate {m3/s}",
            "max sensible heat capacity {W}",
            "cooling limit",
            "max cooling flow rate {m3/s}",
            "max total cooling capacity {W}",
            "heating availability schedule",
            "cooling availability schedule",
            "dehumidification control type",
            "cooling sensible heat ratio",
            "humidification control type",
            "design specification outdoor air object",
            "outdoor air inlet node",
            "demand controlled ventilation type",
            "economizer type",
            "heat recovery type",
            "sensible heat recovery effectiveness",
            "latent heat recovery effectiveness",
        ];
        let connections = generate_idf_string(
            "ZoneHVAC:EquipmentConnections",
            &[
                zone_name.to_string(),
                equipment_list.clone(),
                supply_node,
                String::new(),
                format!("{zone_name} Zone Air Node"),
                format!("{zone_name} Return Outlet"),
            ],
            Some(&[
                "zone name",
                "zone conditioning equipment list",
                "zone air inlet node",
                "zone air exhaust node",
                "zone air node",
                "zone return air node",
            ]),
        );
        let list = generate_idf_string(
            "ZoneHVAC:EquipmentList",
            &[
                equipment_list.as_str(),
                "SequentialLoad",
                "ZoneHVAC:IdealLoadsAirSystem",
                system_name.as_str(),
                "1",
                "1",
            ],
            Some(&[
                "name",
                "load distribution scheme",
                "zone equipment object type",
                "zone equipment name",
                "zone equipment cooling sequence",
                "zone equipment heating sequence",
            ]),
        );
        [
            generate_idf_string("ZoneHVAC:IdealLoadsAirSystem", &values, Some(&comments)),
            connections,
            list,
        ]
        .join("\n\n")
    }

    /// Reads a `ZoneHVAC:IdealLoadsAirSystem` object.
    ///
    /// Fields beyond the end of a short object keep their defaults.
    pub fn from_idf(text: &str, schedules: &HashMap<String, Schedule>) -> Result<Self> {
        const T: &str = "ZoneHVAC:IdealLoadsAirSystem";
        let f = parse_idf_string(text, Some(T))?;
        field(&f, 0, T, "name")?;
        let get = |i: usize| f.get(i).map(|s| s.trim()).unwrap_or("");
        let schedule = |i: usize| match get(i) {
            "" => Ok(None),
            name => schedules
                .get(name)
                .cloned()
                .map(Some)
                .ok_or_else(|| Error::missing("schedule", name)),
        };
        let economizer = match get(23) {
            "" => EconomizerType::default(),
            e => e.parse()?,
        };
        let recovery = get(24).to_ascii_lowercase();
        let sensible = parse_opt_f64(&f, 25, T, "sensible heat recovery")?;
        let latent = parse_opt_f64(&f, 26, T, "latent heat recovery")?;
        let (sensible_heat_recovery, latent_heat_recovery) = match recovery.as_str() {
            "sensible" => (sensible.unwrap_or(0.7), 0.0),
            "enthalpy" => (sensible.unwrap_or(0.7), latent.unwrap_or(0.65)),
            _ => (0.0, 0.0),
        };
        let system = Self {
            heating_limit: CapacityLimit::from_idf_fields(get(9), get(11))?,
            cooling_limit: CapacityLimit::from_idf_fields(get(12), get(14))?,
            economizer_type: economizer,
            demand_controlled_ventilation: get(22).eq_ignore_ascii_case("OccupancySchedule"),
            sensible_heat_recovery,
            latent_heat_recovery,
            heating_availability_schedule: schedule(15)?,
            cooling_availability_schedule: schedule(16)?,
        };
        system.validate()?;
        Ok(system)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::idf::extract_objects;

    fn setpoint() -> Setpoint {
        Setpoint::from_constant_setpoints("Office", 21.0, 24.0).unwrap()
    }

    #[test]
    fn heat_recovery_follows_effectiveness() {
        let mut hvac = IdealAirSystem {
            latent_heat_recovery: 0.65,
            ..Default::default()
        };
        assert_eq!(hvac.heat_recovery_type(), HeatRecoveryType::Enthalpy);
        hvac.latent_heat_recovery = 1.5;
        assert!(hvac.validate().is_err());
    }

    #[test]
    fn writes_three_objects_per_zone() {
        let hvac = IdealAirSystem::default();
        let vent = Ventilation::new("Office OA", 0.0025, 0.0003, 0.0, 0.0).unwrap();
        let idf = hvac.to_idf("Zone 1", &setpoint(), Some(&vent));
        let system = extract_objects(&idf, "ZoneHVAC:IdealLoadsAirSystem");
        assert_eq!(system.len(), 1);
        assert_eq!(extract_objects(&idf, "ZoneHVAC:EquipmentConnections").len(), 1);
        assert_eq!(extract_objects(&idf, "ZoneHVAC:EquipmentList").len(), 1);
        let fields = parse_idf_string(&system[0], None).unwrap();
        assert_eq!(fields.len(), 27);
        assert_eq!(fields[0], "Zone 1 Ideal Loads Air System");
        assert_eq!(fields[2], "Zone 1 Ideal Loads Supply Inlet");
        assert_eq!(fields[9], "LimitFlowRateAndCapacity");
        assert_eq!(fields[17], "None");
        assert_eq!(fields[20], "Office OA..Zone 1");
        assert_eq!(fields[23], "DifferentialDryBulb");
    }

    #[test]
    fn zones_get_distinct_nodes() {
        let hvac = IdealAirSystem::default();
        let a = hvac.to_idf("A", &setpoint(), None);
        let b = hvac.to_idf("B", &setpoint(), None);
        assert!(a.contains("A Zone Air Node"));
        assert!(!b.contains("A Zone Air Node"));
    }

    #[test]
    fn humidistat_switches_control_types() {
        let hvac = IdealAirSystem::default();
        let humid = setpoint().with_humidity_setpoints(Some(30.0), Some(60.0)).unwrap();
        let idf = hvac.to_idf("Z", &humid, None);
        let system = extract_objects(&idf, "ZoneHVAC:IdealLoadsAirSystem");
        let fields = parse_idf_string(&system[0], None).unwrap();
        assert_eq!(fields[17], "Humidistat");
        assert_eq!(fields[19], "Humidistat");
    }

    #[test]
    fn reads_back_limits_and_recovery() {
        let hvac = IdealAirSystem {
            heating_limit: CapacityLimit::Watts(5000.0),
            cooling_limit: CapacityLimit::NoLimit,
            economizer_type: EconomizerType::NoEconomizer,
            demand_controlled_ventilation: true,
            sensible_heat_recovery: 0.7,
            latent_heat_recovery: 0.6,
            ..Default::default()
        };
        let idf = hvac.to_idf("Z", &setpoint(), None);
        let system = extract_objects(&idf, "ZoneHVAC:IdealLoadsAirSystem");
        let back = IdealAirSystem::from_idf(&system[0], &HashMap::new()).unwrap();
        assert_eq!(back, hvac);
    }

    #[test]
    fn capacity_limit_json() {
        let json = serde_json::to_string(&CapacityLimit::Watts(1200.0)).unwrap();
        assert_eq!(json, r#"{"watts":1200.0}"#);
        let auto: CapacityLimit = serde_json::from_str(r#""autosize""#).unwrap();
        assert_eq!(auto, CapacityLimit::Autosize);
    }
}
