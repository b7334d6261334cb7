//! Sizing factors and design days.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Error, Result, check_positive};
use crate::idf::{extract_objects, generate_idf_string, parse_idf_string};

const DESIGN_DAY: &str = "SizingPeriod:DesignDay";

/// One `SizingPeriod:DesignDay` object, kept as IDF text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignDay {
    pub name: String,
    pub idf: String,
}

impl DesignDay {
    /// # Errors
    ///
    /// Returns an error if `text` is not a named `SizingPeriod:DesignDay`.
    pub fn from_idf(text: &str) -> Result<Self> {
        let fields = parse_idf_string(text, Some(DESIGN_DAY))?;
        match fields.first() {
            Some(name) if !name.is_empty() => Ok(Self {
                name: name.clone(),
                idf: text.trim().to_string(),
            }),
            _ => Err(Error::idf(DESIGN_DAY, "design day has no name")),
        }
    }
}

fn d_heating() -> f64 {
    1.25
}

fn d_cooling() -> f64 {
    1.15
}

/// Factors applied to peak loads and the design days they are found on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizingParameter {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub design_days: Vec<DesignDay>,
    #[serde(default = "d_heating")]
    pub heating_factor: f64,
    #[serde(default = "d_cooling")]
    pub cooling_factor: f64,
}

impl Default for SizingParameter {
    fn default() -> Self {
        Self {
            design_days: Vec::new(),
            heating_factor: d_heating(),
            cooling_factor: d_cooling(),
        }
    }
}

impl SizingParameter {
    pub fn validate(&self) -> Result<()> {
        check_positive("sizing heating factor", self.heating_factor)?;
        check_positive("sizing cooling factor", self.cooling_factor)
    }

    /// Adds the design days of a DDY file whose names pass `keep`.
    ///
    /// Objects that cannot be read are skipped with a warning. Returns the
    /// number added.
    pub fn add_from_ddy_filtered(&mut self, ddy_text: &str, keep: impl Fn(&str) -> bool) -> usize {
        let before = self.design_days.len();
        for text in extract_objects(ddy_text, DESIGN_DAY) {
            match DesignDay::from_idf(&text) {
                Ok(day) if keep(&day.name) => self.design_days.push(day),
                Ok(_) => {}
                Err(e) => warn!(error = %e, "skipping unreadable design day"),
            }
        }
        let added = self.design_days.len() - before;
        debug!(added, "design days read from DDY");
        added
    }

    /// Adds every design day in a DDY file.
    pub fn add_from_ddy(&mut self, ddy_text: &str) -> usize {
        self.add_from_ddy_filtered(ddy_text, |_| true)
    }

    /// Adds the 99.6% heating and 0.4% cooling design days.
    pub fn add_from_ddy_996_004(&mut self, ddy_text: &str) -> usize {
        self.add_from_ddy_filtered(ddy_text, |n| n.contains("99.6%") || n.contains(".4%"))
    }

    /// Adds the 99% heating and 1% cooling design days.
    pub fn add_from_ddy_990_010(&mut self, ddy_text: &str) -> usize {
        self.add_from_ddy_filtered(ddy_text, |n| n.contains("99%") || n.contains("1%"))
    }

    pub fn add_from_ddy_keyword(&mut self, ddy_text: &str, keyword: &str) -> usize {
        self.add_from_ddy_filtered(ddy_text, |n| n.contains(keyword))
    }

    pub fn remove_design_day(&mut self, index: usize) -> Option<DesignDay> {
        (index < self.design_days.len()).then(|| self.design_days.remove(index))
    }

    pub fn remove_design_day_keyword(&mut self, keyword: &str) {
        self.design_days.retain(|d| !d.name.contains(keyword));
    }

    pub fn remove_all_design_days(&mut self) {
        self.design_days.clear();
    }

    /// `Sizing:Parameters`.
    pub fn to_idf(&self) -> String {
        let values = [self.heating_factor.to_string(), self.cooling_factor.to_string()];
        generate_idf_string(
            "Sizing:Parameters",
            &values,
            Some(&["heating factor", "cooling factor"]),
        )
    }

    /// Rebuilds the parameter from `Sizing:Parameters` and design day text.
    pub fn from_idf<S: AsRef<str>>(sizing: Option<&str>, design_days: &[S]) -> Result<Self> {
        const T: &str = "Sizing:Parameters";
        let mut sp = Self::default();
        if let Some(text) = sizing {
            let f = parse_idf_string(text, Some(T))?;
            let factor = |i: usize, default: f64| -> Result<f64> {
                match f.get(i).map(String::as_str) {
                    None | Some("") => Ok(default),
                    Some(v) => v
                        .parse()
                        .map_err(|_| Error::idf(T, format!("field {i} is not a number"))),
                }
            };
            sp.heating_factor = factor(0, d_heating())?;
            sp.cooling_factor = factor(1, d_cooling())?;
        }
        sp.design_days = design_days
            .iter()
            .map(|d| DesignDay::from_idf(d.as_ref()))
            .collect::<Result<_>>()?;
        sp.validate()?;
        Ok(sp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DDY: &str = "\
! Design days for a test site
SizingPeriod:DesignDay,
  Golden Ann Htg 99.6% Condns DB,  !- Name
  12, 21, WinterDesignDay, -18.8, 0.0;
SizingPeriod:DesignDay,
  Golden Ann Clg .4% Condns DB=>MWB,  !- Name
  7, 21, SummerDesignDay, 33.1, 15.2;
SizingPeriod:DesignDay,
  Golden Ann Clg 1% Condns DB=>MWB,
  7, 21, SummerDesignDay, 31.5, 15.4;
SizingPeriod:DesignDay,
  Golden Ann Htg 99% Condns DB,
  12, 21, WinterDesignDay, -15.6, 0.0;
";

    #[test]
    fn filters_996_004() {
        let mut sp = SizingParameter::default();
        assert_eq!(sp.add_from_ddy_996_004(DDY), 2);
        assert_eq!(sp.design_days[0].name, "Golden Ann Htg 99.6% Condns DB");
        assert_eq!(sp.design_days[1].name, "Golden Ann Clg .4% Condns DB=>MWB");
    }

    #[test]
    fn filters_990_010_and_keyword() {
        let mut sp = SizingParameter::default();
        assert_eq!(sp.add_from_ddy_990_010(DDY), 2);
        sp.remove_all_design_days();
        assert_eq!(sp.add_from_ddy_keyword(DDY, "Clg"), 2);
        sp.remove_design_day_keyword("1%");
        assert_eq!(sp.design_days.len(), 1);
        assert!(sp.remove_design_day(5).is_none());
    }

    #[test]
    fn all_design_days() {
        let mut sp = SizingParameter::default();
        assert_eq!(sp.add_from_ddy(DDY), 4);
    }

    #[test]
    fn sizing_object_round_trip() {
        let sp = SizingParameter {
            heating_factor: 1.3,
            ..SizingParameter::default()
        };
        let text = sp.to_idf();
        let back = SizingParameter::from_idf::<&str>(Some(text.as_str()), &[]).unwrap();
        assert_eq!(back, sp);
    }

    #[test]
    fn rejects_zero_factor() {
        let sp = SizingParameter {
            cooling_factor: 0.0,
            ..SizingParameter::default()
        };
        assert!(sp.validate().is_err());
    }
}
