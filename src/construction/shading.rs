//! Scheduled deployment of a window shade.

use serde::{Deserialize, Serialize};

use super::window::{ShadeLocation, WindowConstruction};
use crate::error::{Error, Result, check_ep_name};
use crate::idf::generate_idf_string;
use crate::material::WindowMaterial;
use crate::schedule::Schedule;

const COMMENTS: [&str; 16] = [
    "name",
    "zone name",
    "shading control sequence number",
    "shading type",
    "construction with shading name",
    "shading control type",
    "schedule name",
    "setpoint {W/m2}",
    "shading control is scheduled",
    "glare control is active",
    "shading device material name",
    "type of slat angle control for blinds",
    "slat angle schedule name",
    "setpoint 2",
    "daylighting control object name",
    "multiple surface control type",
];

/// Swaps a room's windows to a shaded construction whenever a schedule
/// is non-zero.
///
/// The shaded construction carries the shade or blind layer itself, so the
/// EnergyPlus shading type is read off where that layer sits and what kind
/// of layer it is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowShadeControl {
    pub name: String,
    pub construction: WindowConstruction,
    pub schedule: Schedule,
}

impl WindowShadeControl {
    /// # Errors
    ///
    /// Returns an error if the name is invalid or the construction has no
    /// shade or blind layer.
    pub fn new(name: &str, construction: WindowConstruction, schedule: Schedule) -> Result<Self> {
        let control = Self {
            name: name.to_string(),
            construction,
            schedule,
        };
        control.validate()?;
        Ok(control)
    }

    pub fn validate(&self) -> Result<()> {
        check_ep_name(&self.name)?;
        self.construction.validate()?;
        if !self.construction.has_shade() {
            return Err(Error::invalid(
                "window shade control construction",
                format!("\"{}\" has no shade or blind layer", self.construction.name),
            ));
        }
        Ok(())
    }

    /// EnergyPlus shading type, e.g. `InteriorShade` or `BetweenGlassBlind`.
    pub fn shading_type(&self) -> String {
        let location = match self.construction.shade_location() {
            Some(ShadeLocation::Exterior) => "Exterior",
            Some(ShadeLocation::Between) => "BetweenGlass",
            _ => "Interior",
        };
        let device = if self
            .construction
            .materials
            .iter()
            .any(|m| matches!(m, WindowMaterial::Blind(_)))
        {
            "Blind"
        } else {
            "Shade"
        };
        format!("{location}{device}")
    }

    /// `WindowShadingControl` for `zone`, covering the named windows.
    pub fn to_idf<S: AsRef<str>>(&self, zone: &str, apertures: &[S]) -> String {
        let mut values = vec![
            self.name.clone(),
            zone.to_string(),
            "1".to_string(),
            self.shading_type(),
            self.construction.name.clone(),
            "OnIfScheduleAllows".to_string(),
            self.schedule.name().to_string(),
            String::new(),
            "Yes".to_string(),
            "No".to_string(),
            String::new(),
            String::new(),
            String::new(),
            String::new(),
            String::new(),
            "Sequential".to_string(),
        ];
        let mut comments = COMMENTS.to_vec();
        for ap in apertures {
            values.push(ap.as_ref().to_string());
            comments.push("fenestration surface name");
        }
        generate_idf_string("WindowShadingControl", &values, Some(&comments))
    }
}
