//! The full set of simulation parameters written ahead of the model.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{
    ReportingFrequency, RunPeriod, ShadowCalculation, SimulationControl, SimulationOutput,
    SizingParameter, SolarDistribution,
};
use crate::error::{Error, Result};
use crate::idf::{extract_objects, generate_idf_string, parse_idf_string};
use crate::schedule::check_timestep;

fn d_timestep() -> u32 {
    6
}

/// Everything besides the model that an EnergyPlus run needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationParameter {
    #[serde(default)]
    pub output: SimulationOutput,
    #[serde(default)]
    pub run_period: RunPeriod,
    /// Timesteps per hour.
    #[serde(default = "d_timestep")]
    pub timestep: u32,
    #[serde(default)]
    pub simulation_control: SimulationControl,
    #[serde(default)]
    pub shadow_calculation: ShadowCalculation,
    #[serde(default)]
    pub sizing_parameter: SizingParameter,
    /// Replaces the model's north angle when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub north_angle: Option<f64>,
}

impl Default for SimulationParameter {
    fn default() -> Self {
        Self {
            output: SimulationOutput::default(),
            run_period: RunPeriod::default(),
            timestep: d_timestep(),
            simulation_control: SimulationControl::default(),
            shadow_calculation: ShadowCalculation::default(),
            sizing_parameter: SizingParameter::default(),
            north_angle: None,
        }
    }
}

impl SimulationParameter {
    pub fn validate(&self) -> Result<()> {
        check_timestep(self.timestep)?;
        if let Some(north) = self.north_angle {
            if !(0.0..360.0).contains(&north) {
                return Err(Error::out_of_range("north angle", north, "in [0, 360)"));
            }
        }
        self.output.validate()?;
        self.run_period.validate()?;
        self.shadow_calculation.validate()?;
        self.sizing_parameter.validate()?;
        if self.simulation_control.run_for_sizing_periods
            && self.sizing_parameter.design_days.is_empty()
        {
            tracing::warn!("sizing periods requested but no design days are loaded");
        }
        Ok(())
    }

    pub fn solar_distribution(&self) -> SolarDistribution {
        self.shadow_calculation.solar_distribution
    }

    /// # Errors
    ///
    /// Returns an error for malformed JSON or parameters that fail
    /// validation.
    pub fn from_json(json: &str) -> Result<Self> {
        let sp: Self = serde_json::from_str(json)?;
        sp.validate()?;
        Ok(sp)
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        Self::from_json(&std::fs::read_to_string(path)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// IDF text for the simulation parameters, with a banner and blank lines
    /// between objects.
    pub fn to_idf(&self) -> String {
        let mut objects = vec![
            "!-   ========= SIMULATION PARAMETERS =========\n".to_string(),
            self.simulation_control.to_idf(),
            self.shadow_calculation.to_idf(),
            generate_idf_string(
                "Timestep",
                &[self.timestep.to_string()],
                Some(&["timesteps per hour"]),
            ),
        ];
        objects.extend(self.run_period.to_idf());
        objects.extend(self.output.to_idf());
        objects.push(self.sizing_parameter.to_idf());
        objects.extend(
            self.sizing_parameter
                .design_days
                .iter()
                .map(|d| d.idf.clone()),
        );
        objects.push(generate_idf_string(
            "GlobalGeometryRules",
            &["UpperLeftCorner", "Counterclockwise", "Relative"],
            Some(&[
                "starting vertex position",
                "vertex entry direction",
                "coordinate system",
            ]),
        ));
        objects.join("\n\n")
    }

    /// Reads simulation parameters back out of IDF text.
    ///
    /// Objects that are absent keep their defaults. The solar distribution
    /// and north angle come from `Building` when one is present.
    pub fn from_idf(idf_text: &str) -> Result<Self> {
        let first = |t: &str| extract_objects(idf_text, t).into_iter().next();
        let mut sp = Self::default();

        if let Some(text) = first("SimulationControl") {
            sp.simulation_control = SimulationControl::from_idf(&text)?;
        }
        let mut solar_distribution = SolarDistribution::default();
        if let Some(text) = first("Building") {
            let f = parse_idf_string(&text, Some("Building"))?;
            if let Some(north) = f.get(1).filter(|v| !v.is_empty()) {
                sp.north_angle = Some(
                    north
                        .parse()
                        .map_err(|_| Error::idf("Building", "north axis is not a number"))?,
                );
            }
            if let Some(dist) = f.get(5).filter(|v| !v.is_empty()) {
                solar_distribution = dist.parse()?;
            }
        }
        sp.shadow_calculation = match first("ShadowCalculation") {
            Some(text) => ShadowCalculation::from_idf(&text, solar_distribution)?,
            None => ShadowCalculation {
                solar_distribution,
                ..ShadowCalculation::default()
            },
        };
        if let Some(text) = first("Timestep") {
            let f = parse_idf_string(&text, Some("Timestep"))?;
            sp.timestep = f
                .first()
                .and_then(|v| v.parse().ok())
                .ok_or_else(|| Error::idf("Timestep", "timesteps per hour is not a number"))?;
        }
        if let Some(text) = first("RunPeriod") {
            let holidays = extract_objects(idf_text, "RunPeriodControl:SpecialDays");
            let dst = first("RunPeriodControl:DaylightSavingTime");
            sp.run_period = RunPeriod::from_idf(&text, &holidays, dst.as_deref())?;
        }

        let variables = extract_objects(idf_text, "Output:Variable");
        for text in &variables {
            let f = parse_idf_string(text, Some("Output:Variable"))?;
            if let Some(name) = f.get(1) {
                sp.output.add_output(name);
            }
            if let Some(freq) = f.get(2).filter(|v| !v.is_empty()) {
                sp.output.reporting_frequency = freq.parse::<ReportingFrequency>()?;
            }
        }
        if let Some(text) = first("OutputControl:Table:Style") {
            let f = parse_idf_string(&text, Some("OutputControl:Table:Style"))?;
            sp.output.include_html = f.first().is_some_and(|s| s.contains("HTML"));
        }
        sp.output.include_sqlite = first("Output:SQLite").is_some();
        if let Some(text) = first("Output:Table:SummaryReports") {
            sp.output.summary_reports = parse_idf_string(&text, Some("Output:Table:SummaryReports"))?;
        }

        let design_days = extract_objects(idf_text, "SizingPeriod:DesignDay");
        sp.sizing_parameter =
            SizingParameter::from_idf(first("Sizing:Parameters").as_deref(), &design_days)?;

        sp.validate()?;
        Ok(sp)
    }
}
