use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::types::Load;
use super::{
    check_fractional_schedule, load_weights, lookup_schedule, split_zone_object_name,
    weighted_sum, zone_object_name,
};
use crate::error::{Error, Result, check_ep_name, check_non_negative, check_range};
use crate::idf::reader::{field, parse_f64, parse_opt_f64};
use crate::idf::{generate_idf_string, parse_idf_string};
use crate::schedule::Schedule;

const EQUIPMENT_COMMENTS: [&str; 10] = [
    "name",
    "zone name",
    "schedule name",
    "equipment level method",
    "equipment power level {W}",
    "equipment per floor area {W/m2}",
    "equipment per person {W/ppl}",
    "latent fraction",
    "radiant fraction",
    "lost fraction",
];

/// Fields shared by electric and gas equipment.
struct Fields {
    name: String,
    watts_per_area: f64,
    schedule: Schedule,
    radiant_fraction: f64,
    latent_fraction: f64,
    lost_fraction: f64,
}

fn validate_fields(
    kind: &str,
    name: &str,
    watts_per_area: f64,
    schedule: &Schedule,
    fractions: [f64; 3],
) -> Result<()> {
    check_ep_name(name)?;
    check_non_negative(&format!("{kind} watts per area"), watts_per_area)?;
    let [radiant, latent, lost] = fractions;
    check_range(&format!("{kind} radiant fraction"), radiant, 0.0, 1.0)?;
    check_range(&format!("{kind} latent fraction"), latent, 0.0, 1.0)?;
    check_range(&format!("{kind} lost fraction"), lost, 0.0, 1.0)?;
    let total = radiant + latent + lost;
    if total > 1.0 + 1e-9 {
        return Err(Error::invalid(
            format!("{kind} fractions"),
            format!("radiant, latent and lost fractions sum to {total}, above 1"),
        ));
    }
    check_fractional_schedule(schedule, kind)
}

fn read_fields(
    object_type: &str,
    text: &str,
    schedules: &HashMap<String, Schedule>,
) -> Result<(Fields, String)> {
    let f = parse_idf_string(text, Some(object_type))?;
    let t = object_type;
    let method = field(&f, 3, t, "design level calculation method")?;
    if !method.eq_ignore_ascii_case("Watts/Area") {
        return Err(Error::idf(
            t,
            format!("calculation method \"{method}\" is not supported, use Watts/Area"),
        ));
    }
    let fields = Fields {
        name: split_zone_object_name(field(&f, 0, t, "name")?).to_string(),
        watts_per_area: parse_f64(field(&f, 5, t, "watts per area")?, t, "watts per area")?,
        schedule: lookup_schedule(schedules, field(&f, 2, t, "schedule name")?)?,
        latent_fraction: parse_opt_f64(&f, 7, t, "latent fraction")?.unwrap_or(0.0),
        radiant_fraction: parse_opt_f64(&f, 8, t, "radiant fraction")?.unwrap_or(0.0),
        lost_fraction: parse_opt_f64(&f, 9, t, "lost fraction")?.unwrap_or(0.0),
    };
    Ok((fields, field(&f, 1, t, "zone name")?.to_string()))
}

fn write_fields(
    object_type: &str,
    zone_name: &str,
    name: &str,
    watts_per_area: f64,
    schedule: &Schedule,
    fractions: [f64; 3],
) -> String {
    let [radiant, latent, lost] = fractions;
    let values = [
        zone_object_name(name, zone_name),
        zone_name.to_string(),
        schedule.name().to_string(),
        "Watts/Area".to_string(),
        String::new(),
        watts_per_area.to_string(),
        String::new(),
        latent.to_string(),
        radiant.to_string(),
        lost.to_string(),
    ];
    generate_idf_string(object_type, &values, Some(&EQUIPMENT_COMMENTS))
}

macro_rules! equipment_type {
    ($(#[$meta:meta])* $ty:ident, $object:literal, $kind:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
        pub struct $ty {
            pub name: String,
            /// Equipment power density in W/m2.
            pub watts_per_area: f64,
            /// Fractional schedule multiplying the power density.
            pub schedule: Schedule,
            #[serde(default)]
            pub radiant_fraction: f64,
            #[serde(default)]
            pub latent_fraction: f64,
            #[serde(default)]
            pub lost_fraction: f64,
        }

        impl $ty {
            /// Creates equipment that gives off all of its heat as
            /// convection.
            pub fn new(name: &str, watts_per_area: f64, schedule: Schedule) -> Result<Self> {
                let equip = Self {
                    name: name.to_string(),
                    watts_per_area,
                    schedule,
                    radiant_fraction: 0.0,
                    latent_fraction: 0.0,
                    lost_fraction: 0.0,
                };
                equip.validate()?;
                Ok(equip)
            }

            /// Replaces the heat fractions.
            pub fn with_fractions(
                mut self,
                radiant_fraction: f64,
                latent_fraction: f64,
                lost_fraction: f64,
            ) -> Result<Self> {
                self.radiant_fraction = radiant_fraction;
                self.latent_fraction = latent_fraction;
                self.lost_fraction = lost_fraction;
                self.validate()?;
                Ok(self)
            }

            pub fn validate(&self) -> Result<()> {
                validate_fields(
                    $kind,
                    &self.name,
                    self.watts_per_area,
                    &self.schedule,
                    self.fractions(),
                )
            }

            /// Fraction of the heat given off as convection.
            pub fn convected_fraction(&self) -> f64 {
                1.0 - self.radiant_fraction - self.latent_fraction - self.lost_fraction
            }

            fn fractions(&self) -> [f64; 3] {
                [self.radiant_fraction, self.latent_fraction, self.lost_fraction]
            }

            #[doc = concat!("Reads an `", $object, "` object, returning the equipment and its zone name.")]
            pub fn from_idf(
                text: &str,
                schedules: &HashMap<String, Schedule>,
            ) -> Result<(Self, String)> {
                let (f, zone) = read_fields($object, text, schedules)?;
                let equip = Self {
                    name: f.name,
                    watts_per_area: f.watts_per_area,
                    schedule: f.schedule,
                    radiant_fraction: f.radiant_fraction,
                    latent_fraction: f.latent_fraction,
                    lost_fraction: f.lost_fraction,
                };
                equip.validate()?;
                Ok((equip, zone))
            }

            /// Weighted average of several equipment loads.
            ///
            /// Power densities use the weights as given; fractions and
            /// schedules use them scaled to sum to 1.
            pub fn average(
                name: &str,
                equipment: &[&$ty],
                weights: Option<&[f64]>,
                timestep: u32,
            ) -> Result<Self> {
                let (weights, unit) = load_weights(equipment.len(), weights)?;
                let schedules: Vec<&Schedule> = equipment.iter().map(|e| &e.schedule).collect();
                let schedule =
                    Schedule::average(&format!("{name} Schedule"), &schedules, Some(unit.as_slice()), timestep)?;
                let equip = Self {
                    name: name.to_string(),
                    watts_per_area: weighted_sum(equipment, &weights, |e| e.watts_per_area),
                    schedule,
                    radiant_fraction: weighted_sum(equipment, &unit, |e| e.radiant_fraction),
                    latent_fraction: weighted_sum(equipment, &unit, |e| e.latent_fraction),
                    lost_fraction: weighted_sum(equipment, &unit, |e| e.lost_fraction),
                };
                equip.validate()?;
                Ok(equip)
            }
        }

        impl Load for $ty {
            fn name(&self) -> &str {
                &self.name
            }

            fn load_type(&self) -> &'static str {
                $kind
            }

            fn schedules(&self) -> Vec<&Schedule> {
                vec![&self.schedule]
            }

            fn to_idf(&self, zone_name: &str) -> String {
                write_fields(
                    $object,
                    zone_name,
                    &self.name,
                    self.watts_per_area,
                    &self.schedule,
                    self.fractions(),
                )
            }
        }
    };
}

equipment_type!(
    /// Plug and process loads powered by electricity.
    ///
    /// Written to IDF as an `ElectricEquipment` object using the
    /// `Watts/Area` method.
    ElectricEquipment,
    "ElectricEquipment",
    "Electric Equipment"
);

equipment_type!(
    /// Process loads fueled by natural gas, such as kitchen ranges.
    ///
    /// Written to IDF as a `GasEquipment` object using the `Watts/Area`
    /// method.
    GasEquipment,
    "GasEquipment",
    "Gas Equipment"
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::schedule_type_limits::FRACTIONAL;
    use crate::schedule::ScheduleRuleset;

    fn constant(name: &str, value: f64) -> Schedule {
        ScheduleRuleset::from_constant_value(name, value, Some(FRACTIONAL.clone()))
            .unwrap()
            .into()
    }

    #[test]
    fn fraction_sum_is_checked() {
        let equip = ElectricEquipment::new("Plugs", 10.0, constant("On", 1.0)).unwrap();
        assert_eq!(equip.convected_fraction(), 1.0);
        assert!(equip.clone().with_fractions(0.6, 0.3, 0.2).is_err());
        let equip = equip.with_fractions(0.3, 0.1, 0.1).unwrap();
        assert!((equip.convected_fraction() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn field_order_puts_latent_first() {
        let equip = GasEquipment::new("Range", 3.0, constant("Kitchen", 0.5))
            .unwrap()
            .with_fractions(0.2, 0.1, 0.3)
            .unwrap();
        let idf = equip.to_idf("Kitchen Zone");
        assert!(idf.starts_with("GasEquipment,\n Range..Kitchen Zone,"));
        let fields = parse_idf_string(&idf, Some("GasEquipment")).unwrap();
        assert_eq!(fields[7], "0.1");
        assert_eq!(fields[8], "0.2");
        assert_eq!(fields[9], "0.3");
        assert!(idf.contains("!- equipment per floor area {W/m2}"));
    }

    #[test]
    fn reads_back_each_type() {
        let sched = constant("Plug Sch", 0.7);
        let schedules = HashMap::from([(sched.name().to_string(), sched.clone())]);
        let elec = ElectricEquipment::new("Plugs", 8.5, sched.clone()).unwrap();
        let (back, zone) = ElectricEquipment::from_idf(&elec.to_idf("Z"), &schedules).unwrap();
        assert_eq!((back, zone.as_str()), (elec.clone(), "Z"));
        assert!(GasEquipment::from_idf(&elec.to_idf("Z"), &schedules).is_err());
    }

    #[test]
    fn rejects_other_methods() {
        let sched = constant("Plug Sch", 0.7);
        let schedules = HashMap::from([(sched.name().to_string(), sched)]);
        let text = "ElectricEquipment, Plugs..Z, Z, Plug Sch, EquipmentLevel, 500, , , 0, 0, 0;";
        assert!(ElectricEquipment::from_idf(text, &schedules).is_err());
    }

    #[test]
    fn average_dilutes_power() {
        let a = ElectricEquipment::new("A", 12.0, constant("On", 1.0)).unwrap();
        let avg = ElectricEquipment::average("Half", &[&a], Some(&[0.5]), 1).unwrap();
        assert!((avg.watts_per_area - 6.0).abs() < 1e-9);
        assert_eq!(avg.load_type(), "Electric Equipment");
    }
}
