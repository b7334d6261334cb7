//! TOML simulation-parameter configuration and preset definitions.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::schedule::{Date, DayOfWeek, VALID_TIMESTEPS};
use crate::simulation::{
    CalculationMethod, DaylightSavingTime, LoadComponent, ReportingFrequency, RunPeriod,
    ShadowCalculation, SimulationControl, SimulationOutput, SimulationParameter, SizingParameter,
    SolarDistribution,
};

/// Top-level simulation-parameter configuration parsed from TOML.
///
/// All fields have defaults matching the `default` preset minus its
/// outputs. Load from TOML with [`SimParConfig::from_toml_file`] or use
/// [`SimParConfig::from_preset`] for a built-in starting point.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimParConfig {
    /// Timestep and north angle.
    #[serde(default)]
    pub simulation: SimulationConfig,
    /// Dates to simulate.
    #[serde(default)]
    pub run_period: RunPeriodConfig,
    /// Requested output groups and variables.
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub shadow_calculation: ShadowConfig,
    /// Sizing factors and the design day source.
    #[serde(default)]
    pub sizing: SizingConfig,
    #[serde(default)]
    pub simulation_control: ControlConfig,
}

/// Timestep and north angle.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// Timesteps per hour (a divisor of 60).
    pub timestep: u32,
    /// Degrees from the Y axis to true north, replacing the model's own.
    pub north_angle: Option<f64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            timestep: 6,
            north_angle: None,
        }
    }
}

/// Dates to simulate.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunPeriodConfig {
    /// `[month, day]`.
    pub start_date: Date,
    /// `[month, day]`.
    pub end_date: Date,
    /// Day name, e.g. `"Monday"`.
    pub start_day_of_week: String,
    pub holidays: Vec<Date>,
    /// Adds daylight saving time between `dst_start` and `dst_end`.
    pub daylight_saving: bool,
    pub dst_start: Date,
    pub dst_end: Date,
    pub leap_year: bool,
}

impl Default for RunPeriodConfig {
    fn default() -> Self {
        let dst = DaylightSavingTime::default();
        Self {
            start_date: Date::JAN_1,
            end_date: Date::DEC_31,
            start_day_of_week: "Sunday".to_string(),
            holidays: Vec::new(),
            daylight_saving: false,
            dst_start: dst.start_date,
            dst_end: dst.end_date,
            leap_year: false,
        }
    }
}

/// Requested output groups and variables.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// `"Timestep"`, `"Hourly"`, `"Daily"`, `"Monthly"` or `"Annual"`.
    pub reporting_frequency: String,
    pub include_sqlite: bool,
    pub include_html: bool,
    /// Load component for zone energy use outputs, if requested.
    pub zone_energy_use: Option<String>,
    pub hvac_energy_use: bool,
    /// Load component for gains and losses outputs, if requested.
    pub gains_and_losses: Option<String>,
    pub surface_energy_flow: bool,
    pub comfort_metrics: bool,
    pub surface_temperature: bool,
    /// Extra output variable names.
    pub variables: Vec<String>,
    pub summary_reports: Vec<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        let output = SimulationOutput::default();
        Self {
            reporting_frequency: output.reporting_frequency.to_string(),
            include_sqlite: output.include_sqlite,
            include_html: output.include_html,
            zone_energy_use: None,
            hvac_energy_use: false,
            gains_and_losses: None,
            surface_energy_flow: false,
            comfort_metrics: false,
            surface_temperature: false,
            variables: Vec::new(),
            summary_reports: output.summary_reports,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ShadowConfig {
    pub solar_distribution: String,
    pub calculation_method: String,
    /// Days between shadow recalculations.
    pub calculation_frequency: u32,
    pub maximum_figures: u32,
}

impl Default for ShadowConfig {
    fn default() -> Self {
        let sc = ShadowCalculation::default();
        Self {
            solar_distribution: sc.solar_distribution.to_string(),
            calculation_method: sc.calculation_method.as_str().to_string(),
            calculation_frequency: sc.calculation_frequency,
            maximum_figures: sc.maximum_figures,
        }
    }
}

/// Sizing factors and the design day source.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SizingConfig {
    pub heating_factor: f64,
    pub cooling_factor: f64,
    /// DDY file to read design days from.
    pub ddy_file: Option<PathBuf>,
    /// Keep every design day instead of the 99.6% / 0.4% pair.
    pub all_design_days: bool,
}

impl Default for SizingConfig {
    fn default() -> Self {
        let sp = SizingParameter::default();
        Self {
            heating_factor: sp.heating_factor,
            cooling_factor: sp.cooling_factor,
            ddy_file: None,
            all_design_days: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ControlConfig {
    pub do_zone_sizing: bool,
    pub do_system_sizing: bool,
    pub do_plant_sizing: bool,
    pub run_for_sizing_periods: bool,
    pub run_for_run_periods: bool,
}

impl Default for ControlConfig {
    fn default() -> Self {
        SimulationControl::default().into()
    }
}

impl From<SimulationControl> for ControlConfig {
    fn from(c: SimulationControl) -> Self {
        Self {
            do_zone_sizing: c.do_zone_sizing,
            do_system_sizing: c.do_system_sizing,
            do_plant_sizing: c.do_plant_sizing,
            run_for_sizing_periods: c.run_for_sizing_periods,
            run_for_run_periods: c.run_for_run_periods,
        }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug)]
pub struct ConfigError {
    /// Dotted field path (e.g., `"simulation.timestep"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "config error: {} — {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

fn config_error(field: &str, message: impl fmt::Display) -> ConfigError {
    ConfigError {
        field: field.to_string(),
        message: message.to_string(),
    }
}

impl SimParConfig {
    /// Zone and HVAC energy use, hourly for the whole year.
    pub fn default_preset() -> Self {
        let mut cfg = Self::default();
        cfg.output.zone_energy_use = Some("All".to_string());
        cfg.output.hvac_energy_use = true;
        cfg
    }

    /// Zone energy use plus every heat gain and loss, for a load balance.
    pub fn load_balance() -> Self {
        let mut cfg = Self::default();
        cfg.output.zone_energy_use = Some("All".to_string());
        cfg.output.gains_and_losses = Some("Total".to_string());
        cfg.output.surface_energy_flow = true;
        cfg
    }

    /// Temperatures and humidity for thermal comfort mapping.
    pub fn comfort() -> Self {
        let mut cfg = Self::default();
        cfg.output.comfort_metrics = true;
        cfg.output.surface_temperature = true;
        cfg
    }

    /// Load balance outputs on design days only.
    pub fn sizing() -> Self {
        let mut cfg = Self::load_balance();
        cfg.simulation_control = SimulationControl::sizing_only().into();
        cfg
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["default", "load_balance", "comfort", "sizing"];

    /// Loads a configuration from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "default" => Ok(Self::default_preset()),
            "load_balance" => Ok(Self::load_balance()),
            "comfort" => Ok(Self::comfort()),
            "sizing" => Ok(Self::sizing()),
            _ => Err(config_error(
                "preset",
                format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            )),
        }
    }

    /// Parses a configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| {
            config_error("sim_par", format!("cannot read \"{}\": {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| config_error("toml", e))
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid. The DDY file is
    /// only checked for existence here; it is read by
    /// [`SimParConfig::to_simulation_parameter`].
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        let s = &self.simulation;
        if !VALID_TIMESTEPS.contains(&s.timestep) {
            errors.push(config_error(
                "simulation.timestep",
                format!("must be one of {VALID_TIMESTEPS:?}, got {}", s.timestep),
            ));
        }
        if let Some(north) = s.north_angle {
            if !(0.0..360.0).contains(&north) {
                errors.push(config_error("simulation.north_angle", "must be in [0, 360)"));
            }
        }

        let rp = &self.run_period;
        if let Err(e) = rp.start_day_of_week.parse::<DayOfWeek>() {
            errors.push(config_error("run_period.start_day_of_week", e));
        }
        if let Err(e) = self.run_period() {
            errors.push(config_error("run_period", e));
        }

        let out = &self.output;
        if let Err(e) = out.reporting_frequency.parse::<ReportingFrequency>() {
            errors.push(config_error("output.reporting_frequency", e));
        }
        if let Some(Err(e)) = out.zone_energy_use.as_deref().map(str::parse::<LoadComponent>) {
            errors.push(config_error("output.zone_energy_use", e));
        }
        match out.gains_and_losses.as_deref().map(str::parse::<LoadComponent>) {
            Some(Err(e)) => errors.push(config_error("output.gains_and_losses", e)),
            Some(Ok(LoadComponent::All)) => errors.push(config_error(
                "output.gains_and_losses",
                "must be \"Total\", \"Sensible\" or \"Latent\"",
            )),
            _ => {}
        }

        let sh = &self.shadow_calculation;
        if let Err(e) = sh.solar_distribution.parse::<SolarDistribution>() {
            errors.push(config_error("shadow_calculation.solar_distribution", e));
        }
        if let Err(e) = sh.calculation_method.parse::<CalculationMethod>() {
            errors.push(config_error("shadow_calculation.calculation_method", e));
        }
        if sh.calculation_frequency == 0 {
            errors.push(config_error("shadow_calculation.calculation_frequency", "must be > 0"));
        }
        if sh.maximum_figures < 200 {
            errors.push(config_error("shadow_calculation.maximum_figures", "must be >= 200"));
        }

        let sz = &self.sizing;
        if sz.heating_factor <= 0.0 {
            errors.push(config_error("sizing.heating_factor", "must be > 0"));
        }
        if sz.cooling_factor <= 0.0 {
            errors.push(config_error("sizing.cooling_factor", "must be > 0"));
        }
        if let Some(path) = &sz.ddy_file {
            if !path.is_file() {
                errors.push(config_error(
                    "sizing.ddy_file",
                    format!("\"{}\" does not exist", path.display()),
                ));
            }
        }

        errors
    }

    fn run_period(&self) -> crate::Result<RunPeriod> {
        let rp = &self.run_period;
        let run_period = RunPeriod {
            start_date: rp.start_date,
            end_date: rp.end_date,
            start_day_of_week: rp.start_day_of_week.parse().unwrap_or_default(),
            holidays: rp.holidays.clone(),
            daylight_saving_time: rp.daylight_saving.then_some(DaylightSavingTime {
                start_date: rp.dst_start,
                end_date: rp.dst_end,
            }),
            is_leap_year: rp.leap_year,
        };
        run_period.validate()?;
        Ok(run_period)
    }

    /// Builds the simulation parameters this configuration describes.
    ///
    /// # Errors
    ///
    /// Returns the first validation error, or a `ConfigError` if the DDY
    /// file cannot be read.
    pub fn to_simulation_parameter(&self) -> Result<SimulationParameter, ConfigError> {
        if let Some(e) = self.validate().into_iter().next() {
            return Err(e);
        }
        let parse_err = |field: &'static str| move |e: crate::Error| config_error(field, e);

        let out = &self.output;
        let mut output = SimulationOutput {
            reporting_frequency: out
                .reporting_frequency
                .parse()
                .map_err(parse_err("output.reporting_frequency"))?,
            include_sqlite: out.include_sqlite,
            include_html: out.include_html,
            outputs: Vec::new(),
            summary_reports: out.summary_reports.clone(),
        };
        if let Some(component) = &out.zone_energy_use {
            output.add_zone_energy_use(
                component.parse().map_err(parse_err("output.zone_energy_use"))?,
            );
        }
        if out.hvac_energy_use {
            output.add_hvac_energy_use();
        }
        if let Some(component) = &out.gains_and_losses {
            output
                .add_gains_and_losses(
                    component.parse().map_err(parse_err("output.gains_and_losses"))?,
                )
                .map_err(parse_err("output.gains_and_losses"))?;
        }
        if out.surface_energy_flow {
            output.add_surface_energy_flow();
        }
        if out.comfort_metrics {
            output.add_comfort_metrics();
        }
        if out.surface_temperature {
            output.add_surface_temperature();
        }
        for name in &out.variables {
            output.add_output(name);
        }

        let sh = &self.shadow_calculation;
        let shadow_calculation = ShadowCalculation {
            solar_distribution: sh
                .solar_distribution
                .parse()
                .map_err(parse_err("shadow_calculation.solar_distribution"))?,
            calculation_method: sh
                .calculation_method
                .parse()
                .map_err(parse_err("shadow_calculation.calculation_method"))?,
            calculation_frequency: sh.calculation_frequency,
            maximum_figures: sh.maximum_figures,
        };

        let mut sizing_parameter = SizingParameter {
            design_days: Vec::new(),
            heating_factor: self.sizing.heating_factor,
            cooling_factor: self.sizing.cooling_factor,
        };
        if let Some(path) = &self.sizing.ddy_file {
            let ddy = fs::read_to_string(path).map_err(|e| {
                config_error(
                    "sizing.ddy_file",
                    format!("cannot read \"{}\": {e}", path.display()),
                )
            })?;
            if self.sizing.all_design_days {
                sizing_parameter.add_from_ddy(&ddy);
            } else {
                sizing_parameter.add_from_ddy_996_004(&ddy);
            }
        }

        let c = &self.simulation_control;
        let sim_par = SimulationParameter {
            output,
            run_period: self.run_period().map_err(parse_err("run_period"))?,
            timestep: self.simulation.timestep,
            simulation_control: SimulationControl::new(
                c.do_zone_sizing,
                c.do_system_sizing,
                c.do_plant_sizing,
                c.run_for_sizing_periods,
                c.run_for_run_periods,
            ),
            shadow_calculation,
            sizing_parameter,
            north_angle: self.simulation.north_angle,
        };
        sim_par.validate().map_err(parse_err("sim_par"))?;
        Ok(sim_par)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_preset_valid() {
        for name in SimParConfig::PRESETS {
            let cfg = SimParConfig::from_preset(name).unwrap();
            let errors = cfg.validate();
            assert!(errors.is_empty(), "{name} should be valid: {errors:?}");
            assert!(cfg.to_simulation_parameter().is_ok(), "{name}");
        }
    }

    #[test]
    fn from_preset_unknown() {
        let err = SimParConfig::from_preset("nonexistent");
        assert!(err.is_err());
        let e = err.unwrap_err();
        assert!(e.message.contains("unknown preset"));
        assert!(e.to_string().starts_with("config error: preset"));
    }

    #[test]
    fn default_preset_outputs() {
        let sp = SimParConfig::default_preset().to_simulation_parameter().unwrap();
        assert!(sp.output.outputs.iter().any(|o| o == "Zone Ideal Loads Supply Air Total Cooling Energy"));
        assert!(sp.output.outputs.iter().any(|o| o == "Fan Electric Energy"));
        assert_eq!(sp.simulation_control, SimulationControl::default());
    }

    #[test]
    fn sizing_preset_runs_design_days_only() {
        let sp = SimParConfig::sizing().to_simulation_parameter().unwrap();
        assert!(sp.simulation_control.run_for_sizing_periods);
        assert!(!sp.simulation_control.run_for_run_periods);
        assert!(sp.output.outputs.iter().any(|o| o.starts_with("Surface Inside Face Conduction")));
    }

    #[test]
    fn valid_toml_parses() {
        let toml = r#"
[simulation]
timestep = 4
north_angle = 15.0

[run_period]
start_date = [6, 1]
end_date = [8, 31]
start_day_of_week = "Monday"
holidays = [[7, 4]]
daylight_saving = true

[output]
reporting_frequency = "Daily"
comfort_metrics = true
variables = ["Site Outdoor Air Drybulb Temperature"]

[shadow_calculation]
solar_distribution = "FullExterior"
calculation_frequency = 10

[sizing]
heating_factor = 1.2

[simulation_control]
do_plant_sizing = false
"#;
        let cfg = SimParConfig::from_toml_str(toml);
        assert!(cfg.is_ok(), "valid TOML should parse: {:?}", cfg.err());
        let sp = cfg.unwrap().to_simulation_parameter().unwrap();
        assert_eq!(sp.timestep, 4);
        assert_eq!(sp.north_angle, Some(15.0));
        assert_eq!(sp.run_period.start_day_of_week, DayOfWeek::Monday);
        assert_eq!(sp.run_period.holidays, [Date(7, 4)]);
        assert!(sp.run_period.daylight_saving_time.is_some());
        assert_eq!(sp.output.reporting_frequency, ReportingFrequency::Daily);
        assert_eq!(sp.output.outputs.len(), 5);
        assert_eq!(sp.shadow_calculation.solar_distribution, SolarDistribution::FullExterior);
        assert_eq!(sp.sizing_parameter.heating_factor, 1.2);
        assert!(!sp.simulation_control.do_plant_sizing);
    }

    #[test]
    fn invalid_toml_unknown_field() {
        let toml = r#"
[simulation]
timestep = 6
bogus_field = true
"#;
        assert!(SimParConfig::from_toml_str(toml).is_err());
    }

    #[test]
    fn validation_catches_bad_timestep() {
        let mut cfg = SimParConfig::default();
        cfg.simulation.timestep = 7;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "simulation.timestep"));
    }

    #[test]
    fn validation_catches_reversed_run_period() {
        let mut cfg = SimParConfig::default();
        cfg.run_period.start_date = Date(9, 1);
        cfg.run_period.end_date = Date(3, 1);
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "run_period"));
    }

    #[test]
    fn validation_catches_gains_and_losses_all() {
        let mut cfg = SimParConfig::default();
        cfg.output.gains_and_losses = Some("All".to_string());
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "output.gains_and_losses"));
    }

    #[test]
    fn validation_catches_bad_names() {
        let mut cfg = SimParConfig::default();
        cfg.output.reporting_frequency = "Weekly".to_string();
        cfg.shadow_calculation.solar_distribution = "Sunny".to_string();
        cfg.run_period.start_day_of_week = "Funday".to_string();
        let fields: Vec<String> = cfg.validate().into_iter().map(|e| e.field).collect();
        assert!(fields.contains(&"output.reporting_frequency".to_string()));
        assert!(fields.contains(&"shadow_calculation.solar_distribution".to_string()));
        assert!(fields.contains(&"run_period.start_day_of_week".to_string()));
    }

    #[test]
    fn missing_ddy_file_reported() {
        let mut cfg = SimParConfig::default();
        cfg.sizing.ddy_file = Some(PathBuf::from("/no/such/weather.ddy"));
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "sizing.ddy_file"));
    }

    #[test]
    fn ddy_file_loads_design_days() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("site.ddy");
        fs::write(
            &path,
            "SizingPeriod:DesignDay,\n Site Htg 99.6% Condns DB,\n 1, 21, WinterDesignDay;\n\
             SizingPeriod:DesignDay,\n Site Htg 99% Condns DB,\n 1, 21, WinterDesignDay;\n",
        )
        .unwrap();
        let mut cfg = SimParConfig::default();
        cfg.sizing.ddy_file = Some(path.clone());
        let sp = cfg.to_simulation_parameter().unwrap();
        assert_eq!(sp.sizing_parameter.design_days.len(), 1);

        cfg.sizing.all_design_days = true;
        let sp = cfg.to_simulation_parameter().unwrap();
        assert_eq!(sp.sizing_parameter.design_days.len(), 2);
    }
}
