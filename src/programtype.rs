//! Space-use programs bundling the loads of a typical zone.

use serde::{Deserialize, Serialize};

use crate::construction::unique_by_name;
use crate::error::{Result, check_ep_name};
use crate::load::{
    ElectricEquipment, GasEquipment, Infiltration, Lighting, Load, People, Setpoint, Ventilation,
};
use crate::schedule::Schedule;

/// Loads describing how a type of space is used, such as an office or a
/// plenum. Any load may be absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgramType {
    pub name: String,
    #[serde(default)]
    pub people: Option<People>,
    #[serde(default)]
    pub lighting: Option<Lighting>,
    #[serde(default)]
    pub electric_equipment: Option<ElectricEquipment>,
    #[serde(default)]
    pub gas_equipment: Option<GasEquipment>,
    #[serde(default)]
    pub infiltration: Option<Infiltration>,
    #[serde(default)]
    pub ventilation: Option<Ventilation>,
    #[serde(default)]
    pub setpoint: Option<Setpoint>,
}

impl ProgramType {
    /// A program with no loads.
    pub fn new(name: &str) -> Result<Self> {
        check_ep_name(name)?;
        Ok(Self {
            name: name.to_string(),
            people: None,
            lighting: None,
            electric_equipment: None,
            gas_equipment: None,
            infiltration: None,
            ventilation: None,
            setpoint: None,
        })
    }

    pub fn validate(&self) -> Result<()> {
        check_ep_name(&self.name)?;
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
        Ok(())
    }

    /// Every load the program holds, in IDF writing order.
    pub fn loads(&self) -> Vec<&dyn Load> {
        let mut loads: Vec<&dyn Load> = Vec::new();
        if let Some(l) = &self.people {
            loads.push(l);
        }
        if let Some(l) = &self.lighting {
            loads.push(l);
        }
        if let Some(l) = &self.electric_equipment {
            loads.push(l);
        }
        if let Some(l) = &self.gas_equipment {
            loads.push(l);
        }
        if let Some(l) = &self.infiltration {
            loads.push(l);
        }
        if let Some(l) = &self.ventilation {
            loads.push(l);
        }
        if let Some(l) = &self.setpoint {
            loads.push(l);
        }
        loads
    }

    /// Every schedule referenced by the loads, repeats included.
    pub fn schedules(&self) -> Vec<&Schedule> {
        self.loads().into_iter().flat_map(|l| l.schedules()).collect()
    }

    /// Schedules referenced by the loads, first occurrence of each name.
    pub fn schedules_unique(&self) -> Vec<&Schedule> {
        unique_by_name(&self.schedules(), |s| s.name())
    }

    /// Weighted average of several programs.
    ///
    /// Each load is averaged over the programs that have it, using those
    /// programs' weights, so a load missing from part of the floor area is
    /// diluted. Averaged loads are named `{name}_People`, `{name}_Lighting`
    /// and so on.
    ///
    /// # Errors
    ///
    /// Returns an error if `programs` is empty, the weights do not sum to 1,
    /// or a load cannot be averaged.
    pub fn average(
        name: &str,
        programs: &[&ProgramType],
        weights: Option<&[f64]>,
        timestep: u32,
    ) -> Result<Self> {
        let weights = crate::schedule::ruleset::average_weights(programs.len(), weights)?;

        fn gather<'a, T>(
            programs: &[&'a ProgramType],
            weights: &[f64],
            load: impl Fn(&'a ProgramType) -> Option<&'a T>,
        ) -> (Vec<&'a T>, Vec<f64>) {
            programs
                .iter()
                .zip(weights)
                .filter_map(|(p, w)| load(p).map(|l| (l, *w)))
                .unzip()
        }

        macro_rules! average_load {
            ($field:ident, $ty:ty, $suffix:literal) => {{
                let (loads, w) = gather(programs, &weights, |p| p.$field.as_ref());
                if loads.is_empty() {
                    None
                } else {
                    Some(<$ty>::average(
                        &format!(concat!("{}_", $suffix), name),
                        &loads,
                        Some(w.as_slice()),
                        timestep,
                    )?)
                }
            }};
        }

        let program = Self {
            name: name.to_string(),
            people: average_load!(people, People, "People"),
            lighting: average_load!(lighting, Lighting, "Lighting"),
            electric_equipment: average_load!(electric_equipment, ElectricEquipment, "Electric Equipment"),
            gas_equipment: average_load!(gas_equipment, GasEquipment, "Gas Equipment"),
            infiltration: average_load!(infiltration, Infiltration, "Infiltration"),
            ventilation: average_load!(ventilation, Ventilation, "Ventilation"),
            setpoint: average_load!(setpoint, Setpoint, "Setpoint"),
        };
        program.validate()?;
        Ok(program)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::programs::{office_program, plenum_program};
    use crate::library::schedule_type_limits::FRACTIONAL;
    use crate::schedule::ScheduleRuleset;

    #[test]
    fn plenum_has_no_schedules() {
        let plenum = plenum_program();
        assert!(plenum.loads().is_empty());
        assert!(plenum.schedules().is_empty());
    }

    #[test]
    fn office_schedules_are_unique_by_name() {
        let office = office_program().unwrap();
        let all = office.schedules();
        let unique = office.schedules_unique();
        assert!(unique.len() <= all.len());
        let mut names: Vec<&str> = unique.iter().map(|s| s.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), unique.len());
        assert!(office.validate().is_ok());
    }

    #[test]
    fn average_dilutes_missing_loads() {
        let office = office_program().unwrap();
        let plenum = plenum_program();
        let avg = ProgramType::average("Half Office", &[&office, &plenum], None, 1).unwrap();
        let lights = avg.lighting.as_ref().unwrap();
        let office_lights = office.lighting.as_ref().unwrap();
        assert!((lights.watts_per_area - office_lights.watts_per_area / 2.0).abs() < 1e-9);
        assert_eq!(lights.name, "Half Office_Lighting");
        let setpoint = avg.setpoint.as_ref().unwrap();
        assert_eq!(
            setpoint.heating_setpoint(),
            office.setpoint.as_ref().unwrap().heating_setpoint()
        );
    }

    #[test]
    fn average_rejects_bad_weights() {
        let plenum = plenum_program();
        assert!(ProgramType::average("Bad", &[&plenum, &plenum], Some(&[0.2, 0.2]), 1).is_err());
        assert!(ProgramType::average("Empty", &[], None, 1).is_err());
    }

    #[test]
    fn json_keeps_loads() {
        let mut program = ProgramType::new("Storage").unwrap();
        let sched: Schedule = ScheduleRuleset::from_constant_value(
            "Storage Lights",
            0.2,
            Some(FRACTIONAL.clone()),
        )
        .unwrap()
        .into();
        program.lighting = Some(Lighting::new("Storage Lighting", 3.0, sched).unwrap());
        let json = serde_json::to_string(&program).unwrap();
        let back: ProgramType = serde_json::from_str(&json).unwrap();
        assert_eq!(back, program);
    }
}
