//! Requested outputs and summary reports.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::idf::generate_idf_string;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReportingFrequency {
    Timestep,
    #[default]
    Hourly,
    Daily,
    Monthly,
    Annual,
}

impl ReportingFrequency {
    pub const ALL: [ReportingFrequency; 5] = [
        ReportingFrequency::Timestep,
        ReportingFrequency::Hourly,
        ReportingFrequency::Daily,
        ReportingFrequency::Monthly,
        ReportingFrequency::Annual,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ReportingFrequency::Timestep => "Timestep",
            ReportingFrequency::Hourly => "Hourly",
            ReportingFrequency::Daily => "Daily",
            ReportingFrequency::Monthly => "Monthly",
            ReportingFrequency::Annual => "Annual",
        }
    }
}

impl fmt::Display for ReportingFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportingFrequency {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|r| r.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                Error::invalid("reporting frequency", format!("\"{s}\" is not recognized"))
            })
    }
}

/// Part of a load an output group reports on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LoadComponent {
    #[default]
    All,
    Total,
    Sensible,
    Latent,
}

impl LoadComponent {
    pub const ALL: [LoadComponent; 4] = [
        LoadComponent::All,
        LoadComponent::Total,
        LoadComponent::Sensible,
        LoadComponent::Latent,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            LoadComponent::All => "All",
            LoadComponent::Total => "Total",
            LoadComponent::Sensible => "Sensible",
            LoadComponent::Latent => "Latent",
        }
    }
}

impl fmt::Display for LoadComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LoadComponent {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::invalid("load type", format!("\"{s}\" is not recognized")))
    }
}

const IDEAL_LOADS: &str = "Zone Ideal Loads Supply Air";

const ZONE_ELECTRIC_USE: [&str; 3] = [
    "Zone Lights Electric Energy",
    "Zone Electric Equipment Electric Energy",
    "Zone Gas Equipment Gas Energy",
];

const HVAC_ENERGY_USE: [&str; 10] = [
    "Cooling Coil Electric Energy",
    "Chiller Electric Energy",
    "Boiler Gas Energy",
    "Heating Coil Total Heating Energy",
    "Heating Coil Gas Energy",
    "Heating Coil Electric Energy",
    "Fan Electric Energy",
    "Pump Electric Energy",
    "Humidifier Electric Energy",
    "Water Heater Heating Energy",
];

const WINDOW_FLOW: [&str; 2] = [
    "Surface Window Heat Gain Energy",
    "Surface Window Heat Loss Energy",
];

const SURFACE_FLOW: [&str; 2] = [
    "Surface Inside Face Conduction Heat Transfer Energy",
    "Surface Outside Face Conduction Heat Transfer Energy",
];

const COMFORT: [&str; 4] = [
    "Zone Operative Temperature",
    "Zone Mean Air Temperature",
    "Zone Mean Radiant Temperature",
    "Zone Air Relative Humidity",
];

const SURFACE_TEMPERATURE: [&str; 2] = [
    "Surface Inside Face Temperature",
    "Surface Outside Face Temperature",
];

fn d_true() -> bool {
    true
}

fn d_summary_reports() -> Vec<String> {
    vec!["AllSummary".to_string()]
}

/// Output variables, their reporting frequency and the summary tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationOutput {
    #[serde(default)]
    pub reporting_frequency: ReportingFrequency,
    #[serde(default = "d_true")]
    pub include_sqlite: bool,
    #[serde(default)]
    pub include_html: bool,
    /// Output variable names in the order they were added, without repeats.
    #[serde(default)]
    pub outputs: Vec<String>,
    #[serde(default = "d_summary_reports")]
    pub summary_reports: Vec<String>,
}

impl Default for SimulationOutput {
    fn default() -> Self {
        Self {
            reporting_frequency: ReportingFrequency::default(),
            include_sqlite: true,
            include_html: false,
            outputs: Vec::new(),
            summary_reports: d_summary_reports(),
        }
    }
}

impl SimulationOutput {
    /// Adds one output variable. Returns false if it was already requested.
    pub fn add_output(&mut self, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() || self.outputs.iter().any(|o| o == name) {
            return false;
        }
        self.outputs.push(name.to_string());
        true
    }

    fn add_all<S: AsRef<str>>(&mut self, names: &[S]) {
        for name in names {
            self.add_output(name.as_ref());
        }
    }

    /// Ideal air heating and cooling delivered to each zone, plus the
    /// electricity and gas its lights and equipment use.
    pub fn add_zone_energy_use(&mut self, load_type: LoadComponent) {
        let parts: &[&str] = match load_type {
            LoadComponent::All => &["Total", "Sensible", "Latent"],
            LoadComponent::Total => &["Total"],
            LoadComponent::Sensible => &["Sensible"],
            LoadComponent::Latent => &["Latent"],
        };
        let ideal: Vec<String> = parts
            .iter()
            .flat_map(|p| {
                [
                    format!("{IDEAL_LOADS} {p} Cooling Energy"),
                    format!("{IDEAL_LOADS} {p} Heating Energy"),
                ]
            })
            .collect();
        self.add_all(&ideal);
        self.add_all(&ZONE_ELECTRIC_USE);
    }

    /// Energy used by coils, plant, fans and pumps.
    pub fn add_hvac_energy_use(&mut self) {
        self.add_all(&HVAC_ENERGY_USE);
    }

    /// Heat gained and lost through people, lights, equipment, infiltration
    /// and windows.
    ///
    /// # Errors
    ///
    /// `LoadComponent::All` is not a breakdown these outputs support.
    pub fn add_gains_and_losses(&mut self, load_type: LoadComponent) -> Result<()> {
        let names: Vec<String> = match load_type {
            LoadComponent::All => {
                return Err(Error::invalid(
                    "load type",
                    "gains and losses need Total, Sensible or Latent",
                ));
            }
            LoadComponent::Latent => vec![
                "Zone People Latent Gain Energy".to_string(),
                "Zone Electric Equipment Latent Gain Energy".to_string(),
                "Zone Gas Equipment Latent Gain Energy".to_string(),
                "Zone Infiltration Latent Heat Gain Energy".to_string(),
                "Zone Infiltration Latent Heat Loss Energy".to_string(),
            ],
            component => {
                let c = component.as_str();
                vec![
                    format!("Zone People {c} Heating Energy"),
                    "Zone Lights Total Heating Energy".to_string(),
                    "Zone Electric Equipment Total Heating Energy".to_string(),
                    "Zone Gas Equipment Total Heating Energy".to_string(),
                    format!("Zone Infiltration {c} Heat Gain Energy"),
                    format!("Zone Infiltration {c} Heat Loss Energy"),
                ]
            }
        };
        self.add_all(&names);
        self.add_all(&WINDOW_FLOW);
        Ok(())
    }

    /// Conduction through every surface and heat flow through windows.
    pub fn add_surface_energy_flow(&mut self) {
        self.add_all(&SURFACE_FLOW);
        self.add_all(&WINDOW_FLOW);
    }

    /// Zone temperatures and humidity used to judge thermal comfort.
    pub fn add_comfort_metrics(&mut self) {
        self.add_all(&COMFORT);
    }

    pub fn add_surface_temperature(&mut self) {
        self.add_all(&SURFACE_TEMPERATURE);
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(name) = self.outputs.iter().find(|o| o.contains([',', ';'])) {
            return Err(Error::invalid(
                "output",
                format!("\"{name}\" contains an IDF delimiter"),
            ));
        }
        Ok(())
    }

    /// Table style, one `Output:Variable` per output, summary reports and
    /// the SQLite request.
    pub fn to_idf(&self) -> Vec<String> {
        let style = if self.include_html { "CommaAndHTML" } else { "Comma" };
        let mut objects = vec![generate_idf_string(
            "OutputControl:Table:Style",
            &[style, "None"],
            Some(&["column separator", "unit conversion"]),
        )];
        let frequency = self.reporting_frequency.as_str();
        objects.extend(self.outputs.iter().map(|name| {
            generate_idf_string(
                "Output:Variable",
                &["*", name.as_str(), frequency],
                Some(&["key value", "name", "frequency"]),
            )
        }));
        if !self.summary_reports.is_empty() {
            let comments = vec!["report"; self.summary_reports.len()];
            objects.push(generate_idf_string(
                "Output:Table:SummaryReports",
                &self.summary_reports,
                Some(comments.as_slice()),
            ));
        }
        if self.include_sqlite {
            objects.push(generate_idf_string(
                "Output:SQLite",
                &["SimpleAndTabular"],
                Some(&["option type"]),
            ));
        }
        objects
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::idf::{object_type, parse_idf_string};

    #[test]
    fn outputs_are_an_ordered_set() {
        let mut out = SimulationOutput::default();
        assert!(out.add_output("Zone Mean Air Temperature"));
        assert!(!out.add_output("Zone Mean Air Temperature"));
        out.add_comfort_metrics();
        assert_eq!(out.outputs.len(), 4);
        assert_eq!(out.outputs[0], "Zone Mean Air Temperature");
    }

    #[test]
    fn zone_energy_use_by_component() {
        let mut all = SimulationOutput::default();
        all.add_zone_energy_use(LoadComponent::All);
        assert_eq!(all.outputs.len(), 9);

        let mut sensible = SimulationOutput::default();
        sensible.add_zone_energy_use(LoadComponent::Sensible);
        assert!(
            sensible
                .outputs
                .contains(&"Zone Ideal Loads Supply Air Sensible Cooling Energy".to_string())
        );
        assert_eq!(sensible.outputs.len(), 5);
    }

    #[test]
    fn gains_and_losses_reject_all() {
        let mut out = SimulationOutput::default();
        assert!(out.add_gains_and_losses(LoadComponent::All).is_err());
        out.add_gains_and_losses(LoadComponent::Latent).unwrap();
        assert!(out.outputs.iter().any(|o| o == "Surface Window Heat Gain Energy"));
    }

    #[test]
    fn idf_objects_in_order() {
        let mut out = SimulationOutput {
            reporting_frequency: ReportingFrequency::Daily,
            ..SimulationOutput::default()
        };
        out.add_surface_temperature();
        let objects = out.to_idf();
        let types: Vec<String> = objects.iter().map(|o| object_type(o)).collect();
        assert_eq!(
            types,
            [
                "OutputControl:Table:Style",
                "Output:Variable",
                "Output:Variable",
                "Output:Table:SummaryReports",
                "Output:SQLite",
            ]
        );
        let var = parse_idf_string(&objects[1], Some("Output:Variable")).unwrap();
        assert_eq!(var, ["*", "Surface Inside Face Temperature", "Daily"]);
    }

    #[test]
    fn frequency_parses() {
        assert_eq!("monthly".parse::<ReportingFrequency>().unwrap(), ReportingFrequency::Monthly);
        assert!("Weekly".parse::<ReportingFrequency>().is_err());
    }
}
