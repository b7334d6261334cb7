//! Which calculations EnergyPlus runs.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::idf::{generate_idf_string, parse_idf_string, yes_no};

/// `SimulationControl`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationControl {
    pub do_zone_sizing: bool,
    pub do_system_sizing: bool,
    pub do_plant_sizing: bool,
    pub run_for_sizing_periods: bool,
    pub run_for_run_periods: bool,
}

impl Default for SimulationControl {
    fn default() -> Self {
        Self {
            do_zone_sizing: true,
            do_system_sizing: true,
            do_plant_sizing: true,
            run_for_sizing_periods: false,
            run_for_run_periods: true,
        }
    }
}

impl SimulationControl {
    pub fn new(
        do_zone_sizing: bool,
        do_system_sizing: bool,
        do_plant_sizing: bool,
        run_for_sizing_periods: bool,
        run_for_run_periods: bool,
    ) -> Self {
        Self {
            do_zone_sizing,
            do_system_sizing,
            do_plant_sizing,
            run_for_sizing_periods,
            run_for_run_periods,
        }
    }

    /// Sizing only, as used for load balance studies on design days.
    pub fn sizing_only() -> Self {
        Self::new(true, true, true, true, false)
    }

    /// True when any of the sizing calculations is on.
    pub fn any_sizing(&self) -> bool {
        self.do_zone_sizing || self.do_system_sizing || self.do_plant_sizing
    }

    pub fn to_idf(&self) -> String {
        let values = [
            self.do_zone_sizing,
            self.do_system_sizing,
            self.do_plant_sizing,
            self.run_for_sizing_periods,
            self.run_for_run_periods,
        ]
        .map(|b| yes_no(b).to_string());
        generate_idf_string(
            "SimulationControl",
            &values,
            Some(&[
                "do zone sizing",
                "do system sizing",
                "do plant sizing",
                "run for sizing periods",
                "run for run periods",
            ]),
        )
    }

    /// Blank fields take the EnergyPlus defaults.
    pub fn from_idf(text: &str) -> Result<Self> {
        const T: &str = "SimulationControl";
        let f = parse_idf_string(text, Some(T))?;
        let flag = |i: usize, default: bool| -> Result<bool> {
            match f.get(i).map(|s| s.to_ascii_lowercase()).as_deref() {
                None | Some("") => Ok(default),
                Some("yes") => Ok(true),
                Some("no") => Ok(false),
                Some(other) => Err(Error::idf(T, format!("\"{other}\" is not Yes or No"))),
            }
        };
        Ok(Self {
            do_zone_sizing: flag(0, false)?,
            do_system_sizing: flag(1, false)?,
            do_plant_sizing: flag(2, false)?,
            run_for_sizing_periods: flag(3, true)?,
            run_for_run_periods: flag(4, true)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_object() {
        let text = SimulationControl::default().to_idf();
        let f = parse_idf_string(&text, Some("SimulationControl")).unwrap();
        assert_eq!(f, ["Yes", "Yes", "Yes", "No", "Yes"]);
        assert_eq!(SimulationControl::from_idf(&text).unwrap(), SimulationControl::default());
    }

    #[test]
    fn blank_fields_use_energyplus_defaults() {
        let sc = SimulationControl::from_idf("SimulationControl, Yes;").unwrap();
        assert!(sc.do_zone_sizing);
        assert!(!sc.do_system_sizing);
        assert!(sc.run_for_sizing_periods);
        assert!(SimulationControl::from_idf("SimulationControl, Maybe;").is_err());
    }

    #[test]
    fn sizing_only_skips_run_periods() {
        let sc = SimulationControl::sizing_only();
        assert!(sc.any_sizing());
        assert!(!sc.run_for_run_periods);
    }
}
