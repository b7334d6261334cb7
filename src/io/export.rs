//! CSV export of annual schedule values.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::error::Result;
use crate::schedule::Schedule;

/// Exports the annual values of `schedules` to a CSV file at `path`.
///
/// Writes a `timestep` column followed by one column per schedule, with one
/// row per timestep of the year. Produces deterministic output for
/// identical inputs.
///
/// # Arguments
///
/// * `schedules` - Schedules to evaluate, in column order
/// * `timestep` - Timesteps per hour
/// * `path` - Output file path
///
/// # Errors
///
/// Returns an error if a schedule cannot be evaluated at `timestep` or the
/// file cannot be written.
pub fn export_schedules_csv(schedules: &[&Schedule], timestep: u32, path: &Path) -> Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_schedules_csv(schedules, timestep, buf)
}

/// Writes schedule values as CSV to any writer.
///
/// # Errors
///
/// Returns an error if a schedule cannot be evaluated or writing fails.
pub fn write_schedules_csv(
    schedules: &[&Schedule],
    timestep: u32,
    writer: impl Write,
) -> Result<()> {
    let columns = schedules
        .iter()
        .map(|s| s.annual_values(timestep))
        .collect::<Result<Vec<_>>>()?;
    let rows = columns.iter().map(Vec::len).max().unwrap_or(0);

    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    let mut header = vec!["timestep".to_string()];
    header.extend(schedules.iter().map(|s| s.name().to_string()));
    wtr.write_record(&header)?;

    for i in 0..rows {
        let mut record = Vec::with_capacity(columns.len() + 1);
        record.push(i.to_string());
        record.extend(
            columns
                .iter()
                .map(|c| c.get(i).map(|v| v.to_string()).unwrap_or_default()),
        );
        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    Ok(())
}
