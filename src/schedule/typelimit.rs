//! `ScheduleTypeLimits`: bounds and units for schedule values.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result, check_ep_name};
use crate::idf::reader::{field, parse_opt_f64};
use crate::idf::{extract_objects, generate_idf_string, opt_num, parse_idf_string};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum NumericType {
    #[default]
    Continuous,
    Discrete,
}

impl NumericType {
    pub fn as_str(self) -> &'static str {
        match self {
            NumericType::Continuous => "Continuous",
            NumericType::Discrete => "Discrete",
        }
    }
}

impl fmt::Display for NumericType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NumericType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "continuous" => Ok(NumericType::Continuous),
            "discrete" => Ok(NumericType::Discrete),
            _ => Err(Error::invalid(
                "numeric type",
                format!("\"{s}\" is not Continuous or Discrete"),
            )),
        }
    }
}

/// The physical quantity a schedule's values represent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum UnitType {
    #[default]
    Dimensionless,
    Temperature,
    DeltaTemperature,
    PrecipitationRate,
    Angle,
    ConvectionCoefficient,
    ActivityLevel,
    Velocity,
    Capacity,
    Power,
    Availability,
    Percent,
    Control,
    Mode,
}

impl UnitType {
    pub const ALL: [UnitType; 14] = [
        UnitType::Dimensionless,
        UnitType::Temperature,
        UnitType::DeltaTemperature,
        UnitType::PrecipitationRate,
        UnitType::Angle,
        UnitType::ConvectionCoefficient,
        UnitType::ActivityLevel,
        UnitType::Velocity,
        UnitType::Capacity,
        UnitType::Power,
        UnitType::Availability,
        UnitType::Percent,
        UnitType::Control,
        UnitType::Mode,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            UnitType::Dimensionless => "Dimensionless",
            UnitType::Temperature => "Temperature",
            UnitType::DeltaTemperature => "DeltaTemperature",
            UnitType::PrecipitationRate => "PrecipitationRate",
            UnitType::Angle => "Angle",
            UnitType::ConvectionCoefficient => "ConvectionCoefficient",
            UnitType::ActivityLevel => "ActivityLevel",
            UnitType::Velocity => "Velocity",
            UnitType::Capacity => "Capacity",
            UnitType::Power => "Power",
            UnitType::Availability => "Availability",
            UnitType::Percent => "Percent",
            UnitType::Control => "Control",
            UnitType::Mode => "Mode",
        }
    }

    /// Unit abbreviation for values of this type.
    pub fn unit(self) -> &'static str {
        match self {
            UnitType::Dimensionless
            | UnitType::Availability
            | UnitType::Control
            | UnitType::Mode => "fraction",
            UnitType::Temperature | UnitType::DeltaTemperature => "C",
            UnitType::PrecipitationRate => "m",
            UnitType::Angle => "degrees",
            UnitType::ConvectionCoefficient => "W/m2-K",
            UnitType::ActivityLevel | UnitType::Capacity | UnitType::Power => "W",
            UnitType::Velocity => "m/s",
            UnitType::Percent => "%",
        }
    }
}

impl fmt::Display for UnitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UnitType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        UnitType::ALL
            .into_iter()
            .find(|u| u.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::invalid("unit type", format!("\"{s}\" is not a known unit type")))
    }
}

/// Limits and units that EnergyPlus checks schedule values against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleTypeLimit {
    pub name: String,
    #[serde(default)]
    pub lower_limit: Option<f64>,
    #[serde(default)]
    pub upper_limit: Option<f64>,
    #[serde(default)]
    pub numeric_type: NumericType,
    #[serde(default)]
    pub unit_type: UnitType,
}

impl ScheduleTypeLimit {
    pub fn new(
        name: &str,
        lower_limit: Option<f64>,
        upper_limit: Option<f64>,
        numeric_type: NumericType,
        unit_type: UnitType,
    ) -> Result<Self> {
        let limit = Self {
            name: name.to_string(),
            lower_limit,
            upper_limit,
            numeric_type,
            unit_type,
        };
        limit.validate()?;
        Ok(limit)
    }

    pub fn validate(&self) -> Result<()> {
        check_ep_name(&self.name)?;
        if let (Some(lo), Some(hi)) = (self.lower_limit, self.upper_limit) {
            if lo > hi {
                return Err(Error::invalid(
                    "schedule type limits",
                    format!("lower limit {lo} is above upper limit {hi}"),
                ));
            }
        }
        Ok(())
    }

    pub fn unit(&self) -> &'static str {
        self.unit_type.unit()
    }

    /// Checks that every value lies within the limits.
    pub fn check_values(&self, schedule: &str, values: &[f64]) -> Result<()> {
        let below = self.lower_limit.and_then(|lo| values.iter().find(|v| **v < lo));
        let above = self.upper_limit.and_then(|hi| values.iter().find(|v| **v > hi));
        match below.or(above) {
            Some(v) => Err(Error::Schedule {
                name: schedule.to_string(),
                reason: format!("value {v} is outside the limits of \"{}\"", self.name),
            }),
            None => Ok(()),
        }
    }

    pub fn to_idf(&self) -> String {
        let values = [
            self.name.clone(),
            opt_num(self.lower_limit),
            opt_num(self.upper_limit),
            self.numeric_type.to_string(),
            self.unit_type.to_string(),
        ];
        let comments = [
            "name",
            "lower limit value",
            "upper limit value",
            "numeric type",
            "unit type",
        ];
        generate_idf_string("ScheduleTypeLimits", &values, Some(&comments))
    }

    /// Parses a `ScheduleTypeLimits` object. Missing trailing fields default.
    pub fn from_idf(text: &str) -> Result<Self> {
        const T: &str = "ScheduleTypeLimits";
        let f = parse_idf_string(text, Some(T))?;
        let numeric_type = match f.get(3).map(|s| s.trim()) {
            None | Some("") => NumericType::default(),
            Some(s) => s.parse()?,
        };
        let unit_type = match f.get(4).map(|s| s.trim()) {
            None | Some("") => UnitType::default(),
            Some(s) => s.parse()?,
        };
        Self::new(
            field(&f, 0, T, "name")?,
            parse_opt_f64(&f, 1, T, "lower limit")?,
            parse_opt_f64(&f, 2, T, "upper limit")?,
            numeric_type,
            unit_type,
        )
    }

    pub fn extract_all_from_idf_file(text: &str) -> Result<Vec<Self>> {
        extract_objects(text, "ScheduleTypeLimits")
            .iter()
            .map(|obj| Self::from_idf(obj))
            .collect()
    }
}
