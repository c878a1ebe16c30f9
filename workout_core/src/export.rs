//! CSV export of completion history.

use crate::{Result, WorkoutCompletionRecord};
use std::fs::OpenOptions;
use std::path::Path;

const HEADER: [&str; 6] = ["id", "date", "user_id", "workout_id", "completed", "is_rest_day"];

/// A row in the CSV output
#[derive(Debug, serde::Serialize)]
struct CsvRow<'a> {
    id: &'a str,
    date: String,
    user_id: Option<&'a str>,
    workout_id: Option<&'a str>,
    completed: bool,
    is_rest_day: bool,
}

impl<'a> From<&'a WorkoutCompletionRecord> for CsvRow<'a> {
    fn from(record: &'a WorkoutCompletionRecord) -> Self {
        CsvRow {
            id: &record.id,
            date: record.date.format("%Y-%m-%d").to_string(),
            user_id: record.user_id.as_deref(),
            workout_id: record.workout_id.as_deref(),
            completed: record.qualifies() && !record.is_rest_day,
            is_rest_day: record.is_rest_day,
        }
    }
}

/// Write records to `csv_path`, replacing any previous export
///
/// The file is flushed and synced before returning the row count.
pub fn export_records(records: &[WorkoutCompletionRecord], csv_path: &Path) -> Result<usize> {
    if let Some(parent) = csv_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(csv_path)?;

    // Header is written explicitly so an empty history still gets one
    let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(file);
    writer.write_record(HEADER)?;

    for record in records {
        writer.serialize(CsvRow::from(record))?;
    }

    writer.flush()?;
    let file = writer
        .into_inner()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;
    file.sync_all()?;

    tracing::info!("Exported {} records to {:?}", records.len(), csv_path);
    Ok(records.len())
}
