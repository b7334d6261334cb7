//! Energy properties attached to a room.

use serde::{Deserialize, Serialize};

use crate::construction::{ConstructionSet, WindowShadeControl};
use crate::error::Result;
use crate::hvac::IdealAirSystem;
use crate::library::programs::plenum_program;
use crate::load::{
    ElectricEquipment, GasEquipment, Infiltration, Lighting, Load, People, Setpoint, Ventilation,
};
use crate::programtype::ProgramType;
use crate::schedule::Schedule;

fn default_program() -> ProgramType {
    plenum_program()
}

/// Program, constructions, HVAC and load overrides of a room.
///
/// A load set directly on the room replaces the program's load of the same
/// kind. Accessors such as [`RoomEnergyProperties::lighting`] return the
/// load in effect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomEnergyProperties {
    #[serde(default = "default_program")]
    pub program_type: ProgramType,
    #[serde(default)]
    pub construction_set: ConstructionSet,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hvac: Option<IdealAirSystem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub people: Option<People>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lighting: Option<Lighting>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub electric_equipment: Option<ElectricEquipment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas_equipment: Option<GasEquipment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub infiltration: Option<Infiltration>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ventilation: Option<Ventilation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub setpoint: Option<Setpoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window_shade_control: Option<WindowShadeControl>,
}

impl Default for RoomEnergyProperties {
    fn default() -> Self {
        Self::new(default_program())
    }
}

impl RoomEnergyProperties {
    pub fn new(program_type: ProgramType) -> Self {
        Self {
            program_type,
            construction_set: ConstructionSet::default(),
            hvac: None,
            people: None,
            lighting: None,
            electric_equipment: None,
            gas_equipment: None,
            infiltration: None,
            ventilation: None,
            setpoint: None,
            window_shade_control: None,
        }
    }

    pub fn people(&self) -> Option<&People> {
        self.people.as_ref().or(self.program_type.people.as_ref())
    }

    pub fn lighting(&self) -> Option<&Lighting> {
        self.lighting.as_ref().or(self.program_type.lighting.as_ref())
    }

    pub fn electric_equipment(&self) -> Option<&ElectricEquipment> {
        self.electric_equipment
            .as_ref()
            .or(self.program_type.electric_equipment.as_ref())
    }

    pub fn gas_equipment(&self) -> Option<&GasEquipment> {
        self.gas_equipment
            .as_ref()
            .or(self.program_type.gas_equipment.as_ref())
    }

    pub fn infiltration(&self) -> Option<&Infiltration> {
        self.infiltration
            .as_ref()
            .or(self.program_type.infiltration.as_ref())
    }

    pub fn ventilation(&self) -> Option<&Ventilation> {
        self.ventilation
            .as_ref()
            .or(self.program_type.ventilation.as_ref())
    }

    pub fn setpoint(&self) -> Option<&Setpoint> {
        self.setpoint.as_ref().or(self.program_type.setpoint.as_ref())
    }

    pub fn is_conditioned(&self) -> bool {
        self.hvac.is_some()
    }

    /// Conditions the room with a default ideal air system.
    pub fn add_default_ideal_air(&mut self) {
        self.hvac = Some(IdealAirSystem::default());
    }

    /// Loads in effect, in IDF writing order.
    pub fn loads(&self) -> Vec<&dyn Load> {
        let mut loads: Vec<&dyn Load> = Vec::new();
        loads.extend(self.people().map(|l| l as &dyn Load));
        loads.extend(self.lighting().map(|l| l as &dyn Load));
        loads.extend(self.electric_equipment().map(|l| l as &dyn Load));
        loads.extend(self.gas_equipment().map(|l| l as &dyn Load));
        loads.extend(self.infiltration().map(|l| l as &dyn Load));
        loads.extend(self.ventilation().map(|l| l as &dyn Load));
        loads.extend(self.setpoint().map(|l| l as &dyn Load));
        loads
    }

    /// Schedules of the loads in effect, the HVAC system and the window
    /// shade control, repeats included.
    pub fn schedules(&self) -> Vec<&Schedule> {
        let mut schedules: Vec<&Schedule> =
            self.loads().into_iter().flat_map(|l| l.schedules()).collect();
        if let Some(hvac) = &self.hvac {
            schedules.extend(hvac.schedules());
        }
        if let Some(control) = &self.window_shade_control {
            schedules.push(&control.schedule);
        }
        schedules
    }

    pub fn validate(&self) -> Result<()> {
        self.program_type.validate()?;
        self.construction_set.validate()?;
        if let Some(h) = &self.hvac {
            h.validate()?;
        }
        if let Some(l) = &self.people {
            l.validate()?;
        }
        if let Some(l) = &self.lighting {
            l.validate()?;
        }
        if let Some(l) = &self.electric_equipment {
            l.validate()?;
        }
        if let Some(l) = &self.gas_equipment {
            l.validate()?;
        }
        if let Some(l) = &self.infiltration {
            l.validate()?;
        }
        if let Some(l) = &self.ventilation {
            l.validate()?;
        }
        if let Some(l) = &self.setpoint {
            l.validate()?;
        }
        if let Some(c) = &self.window_shade_control {
            c.validate()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::programs::office_program;
    use crate::library::schedule_type_limits::FRACTIONAL;
    use crate::schedule::ScheduleRuleset;

    #[test]
    fn default_is_unconditioned_plenum() {
        let props = RoomEnergyProperties::default();
        assert_eq!(props.program_type.name, "Plenum");
        assert!(!props.is_conditioned());
        assert!(props.loads().is_empty());
    }

    #[test]
    fn override_replaces_program_load() {
        let mut props = RoomEnergyProperties::new(office_program().unwrap());
        assert_eq!(props.lighting().unwrap().name, "Generic Office Lighting");
        let sched: Schedule =
            ScheduleRuleset::from_constant_value("Task Lights", 1.0, Some(FRACTIONAL.clone()))
                .unwrap()
                .into();
        props.lighting = Some(Lighting::new("Task Lighting", 4.0, sched).unwrap());
        assert_eq!(props.lighting().unwrap().name, "Task Lighting");
        assert!(props.schedules().iter().any(|s| s.name() == "Task Lights"));
        assert!(props.validate().is_ok());
    }

    #[test]
    fn ideal_air_conditions_room() {
        let mut props = RoomEnergyProperties::new(office_program().unwrap());
        props.add_default_ideal_air();
        assert!(props.is_conditioned());
        assert_eq!(props.loads().last().unwrap().load_type(), "Setpoint");
    }

    #[test]
    fn json_defaults_to_plenum() {
        let props: RoomEnergyProperties = serde_json::from_str("{}").unwrap();
        assert_eq!(props, RoomEnergyProperties::default());
    }
}
