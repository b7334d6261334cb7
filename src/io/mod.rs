//! File export.

pub mod export;

pub use export::{export_schedules_csv, write_schedules_csv};
