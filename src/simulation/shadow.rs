//! Shadow calculation settings.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::idf::{generate_idf_string, parse_idf_string};

/// How beam solar and its reflections are distributed over surfaces.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SolarDistribution {
    MinimalShadowing,
    FullExterior,
    FullInteriorAndExterior,
    FullExteriorWithReflections,
    #[default]
    FullInteriorAndExteriorWithReflections,
}

impl SolarDistribution {
    pub const ALL: [SolarDistribution; 5] = [
        SolarDistribution::MinimalShadowing,
        SolarDistribution::FullExterior,
        SolarDistribution::FullInteriorAndExterior,
        SolarDistribution::FullExteriorWithReflections,
        SolarDistribution::FullInteriorAndExteriorWithReflections,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SolarDistribution::MinimalShadowing => "MinimalShadowing",
            SolarDistribution::FullExterior => "FullExterior",
            SolarDistribution::FullInteriorAndExterior => "FullInteriorAndExterior",
            SolarDistribution::FullExteriorWithReflections => "FullExteriorWithReflections",
            SolarDistribution::FullInteriorAndExteriorWithReflections => {
                "FullInteriorAndExteriorWithReflections"
            }
        }
    }
}

impl fmt::Display for SolarDistribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SolarDistribution {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|d| d.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                Error::invalid("solar distribution", format!("\"{s}\" is not recognized"))
            })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CalculationMethod {
    #[default]
    AverageOverDaysInFrequency,
    TimestepFrequency,
}

impl CalculationMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            CalculationMethod::AverageOverDaysInFrequency => "AverageOverDaysInFrequency",
            CalculationMethod::TimestepFrequency => "TimestepFrequency",
        }
    }
}

impl FromStr for CalculationMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        [
            CalculationMethod::AverageOverDaysInFrequency,
            CalculationMethod::TimestepFrequency,
        ]
        .into_iter()
        .find(|m| m.as_str().eq_ignore_ascii_case(s.trim()))
        .ok_or_else(|| Error::invalid("calculation method", format!("\"{s}\" is not recognized")))
    }
}

fn d_frequency() -> u32 {
    30
}

fn d_max_figures() -> u32 {
    15000
}

/// `ShadowCalculation` plus the building's solar distribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShadowCalculation {
    #[serde(default)]
    pub solar_distribution: SolarDistribution,
    #[serde(default)]
    pub calculation_method: CalculationMethod,
    /// Days between shadow recalculations.
    #[serde(default = "d_frequency")]
    pub calculation_frequency: u32,
    #[serde(default = "d_max_figures")]
    pub maximum_figures: u32,
}

impl Default for ShadowCalculation {
    fn default() -> Self {
        Self {
            solar_distribution: SolarDistribution::default(),
            calculation_method: CalculationMethod::default(),
            calculation_frequency: d_frequency(),
            maximum_figures: d_max_figures(),
        }
    }
}

impl ShadowCalculation {
    pub fn validate(&self) -> Result<()> {
        if self.calculation_frequency < 1 {
            return Err(Error::out_of_range(
                "shadow calculation frequency",
                f64::from(self.calculation_frequency),
                "1 or greater",
            ));
        }
        if self.maximum_figures < 200 {
            return Err(Error::out_of_range(
                "shadow calculation maximum figures",
                f64::from(self.maximum_figures),
                "200 or greater",
            ));
        }
        Ok(())
    }

    /// The solar distribution is written on `Building`, not here.
    pub fn to_idf(&self) -> String {
        let values = [
            self.calculation_method.as_str().to_string(),
            self.calculation_frequency.to_string(),
            self.maximum_figures.to_string(),
        ];
        generate_idf_string(
            "ShadowCalculation",
            &values,
            Some(&["calculation method", "calculation frequency", "maximum figures"]),
        )
    }

    /// Reads a `ShadowCalculation`; blank fields take the EnergyPlus
    /// defaults.
    pub fn from_idf(text: &str, solar_distribution: SolarDistribution) -> Result<Self> {
        const T: &str = "ShadowCalculation";
        let f = parse_idf_string(text, Some(T))?;
        let field = |i: usize| f.get(i).map(String::as_str).unwrap_or("");
        let number = |i: usize, default: u32| -> Result<u32> {
            match field(i) {
                "" => Ok(default),
                v => v
                    .parse()
                    .map_err(|_| Error::idf(T, format!("field {i} is not a whole number"))),
            }
        };
        let sc = Self {
            solar_distribution,
            calculation_method: match field(0) {
                "" => CalculationMethod::default(),
                m => m.parse()?,
            },
            calculation_frequency: number(1, 20)?,
            maximum_figures: number(2, d_max_figures())?,
        };
        sc.validate()?;
        Ok(sc)
    }
}
