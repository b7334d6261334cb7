//! Schedules given as one value per timestep of the year.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::check_timestep;
use super::typelimit::ScheduleTypeLimit;
use crate::error::{Error, Result, check_ep_name};
use crate::idf::{generate_idf_string, yes_no};

fn default_timestep() -> u32 {
    1
}

/// An annual schedule of explicit values, written to IDF as `Schedule:File`
/// backed by a one-column CSV.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleFixedInterval {
    pub name: String,
    /// `8760 * timestep` values, or `8784 * timestep` for a leap year.
    pub values: Vec<f64>,
    #[serde(default = "default_timestep")]
    pub timestep: u32,
    #[serde(default)]
    pub schedule_type_limit: Option<ScheduleTypeLimit>,
    #[serde(default)]
    pub interpolate: bool,
}

impl ScheduleFixedInterval {
    pub fn new(
        name: &str,
        values: Vec<f64>,
        timestep: u32,
        schedule_type_limit: Option<ScheduleTypeLimit>,
    ) -> Result<Self> {
        let sched = Self {
            name: name.to_string(),
            values,
            timestep,
            schedule_type_limit,
            interpolate: false,
        };
        sched.validate()?;
        Ok(sched)
    }

    pub fn validate(&self) -> Result<()> {
        check_ep_name(&self.name)?;
        check_timestep(self.timestep)?;
        let common = 8760 * self.timestep as usize;
        let leap = 8784 * self.timestep as usize;
        if self.values.len() != common && self.values.len() != leap {
            return Err(Error::Schedule {
                name: self.name.clone(),
                reason: format!(
                    "expected {common} or {leap} values at timestep {}, got {}",
                    self.timestep,
                    self.values.len()
                ),
            });
        }
        if let Some(limit) = &self.schedule_type_limit {
            limit.check_values(&self.name, &self.values)?;
        }
        Ok(())
    }

    pub fn is_leap_year(&self) -> bool {
        self.values.len() == 8784 * self.timestep as usize
    }

    /// Hours of data covered by the values.
    pub fn hours(&self) -> usize {
        self.values.len() / self.timestep.max(1) as usize
    }

    /// Reads one column of a CSV file, skipping `skip_rows` leading rows.
    ///
    /// # Errors
    ///
    /// Returns an error if the column is missing in a row, a cell is not a
    /// number, or the value count does not fit the timestep.
    pub fn from_csv<R: Read>(
        name: &str,
        reader: R,
        column: usize,
        skip_rows: usize,
        timestep: u32,
    ) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);
        let mut values = Vec::new();
        for (i, record) in rdr.records().enumerate().skip(skip_rows) {
            let record = record?;
            let cell = record.get(column).ok_or_else(|| {
                Error::invalid("csv", format!("row {} has no column {column}", i + 1))
            })?;
            let value = cell.trim().parse::<f64>().map_err(|_| {
                Error::invalid("csv", format!("row {}: \"{cell}\" is not a number", i + 1))
            })?;
            values.push(value);
        }
        Self::new(name, values, timestep, None)
    }

    pub fn from_csv_file(
        name: &str,
        path: &Path,
        column: usize,
        skip_rows: usize,
        timestep: u32,
    ) -> Result<Self> {
        Self::from_csv(name, File::open(path)?, column, skip_rows, timestep)
    }

    /// Value at the start of `hour` (0 to 23) on day-of-year `doy`.
    pub fn value_at(&self, doy: u32, hour: u32) -> Option<f64> {
        if doy == 0 || hour > 23 {
            return None;
        }
        let index = ((doy as usize - 1) * 24 + hour as usize) * self.timestep as usize;
        self.values.get(index).copied()
    }

    /// Values resampled to `timestep`.
    ///
    /// Finer timesteps repeat values and coarser ones average them.
    pub fn values_at_timestep(&self, timestep: u32) -> Result<Vec<f64>> {
        check_timestep(timestep)?;
        let source = self.timestep;
        if timestep == source {
            Ok(self.values.clone())
        } else if timestep % source == 0 {
            let n = (timestep / source) as usize;
            Ok(self
                .values
                .iter()
                .flat_map(|v| std::iter::repeat_n(*v, n))
                .collect())
        } else if source % timestep == 0 {
            let n = (source / timestep) as usize;
            Ok(self
                .values
                .chunks(n)
                .map(|c| c.iter().sum::<f64>() / c.len() as f64)
                .collect())
        } else {
            Err(Error::Schedule {
                name: self.name.clone(),
                reason: format!("cannot resample timestep {source} to {timestep}"),
            })
        }
    }

    /// File-safe version of the name. Distinct names can share a stem.
    pub fn file_stem(&self) -> String {
        self.name
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
            .collect()
    }

    /// CSV file name used by [`ScheduleFixedInterval::to_idf`].
    pub fn file_name(&self) -> String {
        format!("{}.csv", self.file_stem())
    }

    /// Writes the values CSV into `directory` and returns the `Schedule:File`
    /// object that reads it.
    pub fn to_idf(&self, directory: &Path) -> Result<String> {
        self.to_idf_file(directory, &self.file_name())
    }

    /// Like [`ScheduleFixedInterval::to_idf`] but writes the values to
    /// `file_name` inside `directory`.
    pub fn to_idf_file(&self, directory: &Path, file_name: &str) -> Result<String> {
        std::fs::create_dir_all(directory)?;
        let path = directory.join(file_name);
        let mut wtr = csv::WriterBuilder::new()
            .has_headers(false)
            .from_path(&path)?;
        for v in &self.values {
            wtr.write_record([v.to_string()])?;
        }
        wtr.flush()?;
        debug!(schedule = %self.name, path = %path.display(), "wrote schedule file");

        let values = [
            self.name.clone(),
            self.schedule_type_limit
                .as_ref()
                .map(|t| t.name.clone())
                .unwrap_or_default(),
            path.display().to_string(),
            "1".to_string(),
            "0".to_string(),
            self.hours().to_string(),
            "Comma".to_string(),
            yes_no(self.interpolate).to_string(),
            (60 / self.timestep.max(1)).to_string(),
        ];
        let comments = [
            "schedule name",
            "schedule type limits",
            "file name",
            "column number",
            "rows to skip",
            "hours of data",
            "column separator",
            "interpolate to timestep",
            "minutes per item",
        ];
        Ok(generate_idf_string("Schedule:File", &values, Some(&comments)))
    }
}
