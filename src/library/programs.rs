//! Built-in programs: an unloaded plenum and a generic office.

use super::schedule_type_limits::{FRACTIONAL, TEMPERATURE};
use crate::error::Result;
use crate::load::{ElectricEquipment, Infiltration, Lighting, People, Setpoint, Ventilation};
use crate::programtype::ProgramType;
use crate::schedule::{Schedule, ScheduleRuleset, ScheduleTypeLimit};

pub const PLENUM: &str = "Plenum";
pub const GENERIC_OFFICE: &str = "Generic Office Program";

/// Hourly values equal to `base` except in the `[start, end)` hour ranges.
fn hours(base: f64, ranges: &[(usize, usize, f64)]) -> Vec<f64> {
    let mut values = vec![base; 24];
    for &(start, end, value) in ranges {
        for v in &mut values[start..end] {
            *v = value;
        }
    }
    values
}

/// A ruleset with one profile for weekdays, one for Saturday and one for
/// Sunday and holidays.
fn office_week(
    name: &str,
    weekday: &[f64],
    saturday: &[f64],
    sunday: &[f64],
    limit: &ScheduleTypeLimit,
    design_days: Option<(&[f64], &[f64])>,
) -> Result<Schedule> {
    let (summer, winter) = design_days.unzip();
    ScheduleRuleset::from_week_daily_values(
        name,
        [sunday, weekday, weekday, weekday, weekday, weekday, saturday, sunday],
        1,
        Some(limit.clone()),
        summer,
        winter,
    )
    .map(Schedule::from)
}

/// A program with no loads, for plenums and other unoccupied spaces.
pub fn plenum_program() -> ProgramType {
    ProgramType {
        name: PLENUM.to_string(),
        people: None,
        lighting: None,
        electric_equipment: None,
        gas_equipment: None,
        infiltration: None,
        ventilation: None,
        setpoint: None,
    }
}

/// Office loads and weekly schedules typical of mid-size offices.
pub fn office_program() -> Result<ProgramType> {
    let occupancy = office_week(
        "Generic Office Occupancy",
        &hours(
            0.0,
            &[
                (6, 7, 0.1),
                (7, 8, 0.2),
                (8, 12, 0.95),
                (12, 13, 0.5),
                (13, 17, 0.95),
                (17, 18, 0.7),
                (18, 19, 0.4),
                (19, 22, 0.1),
                (22, 23, 0.05),
            ],
        ),
        &hours(0.0, &[(6, 8, 0.1), (8, 12, 0.3), (12, 17, 0.1)]),
        &hours(0.0, &[]),
        &FRACTIONAL,
        None,
    )?;
    let lighting = office_week(
        "Generic Office Lighting",
        &hours(
            0.05,
            &[
                (5, 7, 0.1),
                (7, 8, 0.3),
                (8, 12, 0.9),
                (12, 13, 0.8),
                (13, 17, 0.9),
                (17, 18, 0.5),
                (18, 20, 0.3),
                (20, 22, 0.2),
                (22, 23, 0.1),
            ],
        ),
        &hours(0.05, &[(6, 8, 0.1), (8, 12, 0.3), (12, 17, 0.15)]),
        &hours(0.05, &[]),
        &FRACTIONAL,
        None,
    )?;
    let equipment = office_week(
        "Generic Office Equipment",
        &hours(0.4, &[(8, 12, 0.9), (12, 13, 0.8), (13, 17, 0.9), (17, 18, 0.5)]),
        &hours(0.3, &[(8, 12, 0.5), (12, 17, 0.35)]),
        &hours(0.3, &[]),
        &FRACTIONAL,
        None,
    )?;
    let infiltration = office_week(
        "Generic Office Infiltration",
        &hours(1.0, &[(6, 22, 0.25)]),
        &hours(1.0, &[(6, 18, 0.25)]),
        &hours(1.0, &[]),
        &FRACTIONAL,
        None,
    )?;
    let heating_design = (hours(15.6, &[]), hours(21.0, &[]));
    let heating = office_week(
        "Generic Office Heating",
        &hours(15.6, &[(6, 22, 21.0)]),
        &hours(15.6, &[(6, 18, 21.0)]),
        &hours(15.6, &[]),
        &TEMPERATURE,
        Some((heating_design.0.as_slice(), heating_design.1.as_slice())),
    )?;
    let cooling_design = (hours(24.0, &[]), hours(26.7, &[]));
    let cooling = office_week(
        "Generic Office Cooling",
        &hours(26.7, &[(6, 22, 24.0)]),
        &hours(26.7, &[(6, 18, 24.0)]),
        &hours(26.7, &[]),
        &TEMPERATURE,
        Some((cooling_design.0.as_slice(), cooling_design.1.as_slice())),
    )?;

    Ok(ProgramType {
        name: GENERIC_OFFICE.to_string(),
        people: Some(People::new("Generic Office People", 0.0565, occupancy)?),
        lighting: Some(Lighting::new("Generic Office Lighting", 10.55, lighting)?),
        electric_equipment: Some(ElectricEquipment::new(
            "Generic Office Equipment",
            10.33,
            equipment,
        )?),
        gas_equipment: None,
        infiltration: Some(Infiltration::new(
            "Generic Office Infiltration",
            0.0002266,
            infiltration,
        )?),
        ventilation: Some(Ventilation::new(
            "Generic Office Ventilation",
            0.00236,
            0.000305,
            0.0,
            0.0,
        )?),
        setpoint: Some(Setpoint::new("Generic Office Setpoints", heating, cooling)?),
    })
}
