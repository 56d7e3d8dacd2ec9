//! Tabular export of the deduplicated records

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use crate::domain::Record;

/// Export column order
pub const COLUMNS: [&str; 14] = [
    "address",
    "link",
    "condition",
    "parking",
    "built_in",
    "floor_count",
    "heating",
    "air_conditioning",
    "bathroom",
    "house_area",
    "lot_area",
    "room_count",
    "price",
    "price_per_area",
];

#[derive(Error, Debug)]
pub enum SinkError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Destination of a finished crawl
pub trait RecordSink {
    /// Persist `records` under `name`, returning where they were written.
    fn write_records(&self, name: &str, records: &[Record]) -> Result<PathBuf, SinkError>;
}

/// Writes one CSV file per run into a directory
#[derive(Debug, Clone)]
pub struct CsvSink {
    directory: PathBuf,
}

impl CsvSink {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }
}

impl RecordSink for CsvSink {
    fn write_records(&self, name: &str, records: &[Record]) -> Result<PathBuf, SinkError> {
        fs::create_dir_all(&self.directory)?;
        let path = self.directory.join(name);

        let file = File::create(&path)?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);

        writer.write_record(COLUMNS)?;
        for record in records {
            writer.serialize(record)?;
        }
        writer.flush()?;

        info!("Wrote {} records to {}", records.len(), path.display());
        Ok(path)
    }
}

/// Read records back from a file written by `CsvSink`.
pub fn read_records(path: &Path) -> Result<Vec<Record>, SinkError> {
    let mut reader = csv::ReaderBuilder::new().has_headers(true).from_path(path)?;

    let mut records = Vec::new();
    for row in reader.deserialize() {
        records.push(row?);
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn record(house_area: i32, price: f64) -> Record {
        Record {
            address: "Budapest, XI. kerület, Bartók Béla út 10.".into(),
            link: format!("https://ingatlan.com/{house_area}"),
            condition: "felújított".into(),
            heating: "gáz, \"cirkó\"".into(),
            house_area,
            lot_area: 0,
            room_count: 3,
            price,
            price_per_area: price / f64::from(house_area) * 1_000_000.0,
            ..Record::default()
        }
    }

    #[test]
    fn test_header_row_is_fixed() {
        let dir = TempDir::new().unwrap();
        let sink = CsvSink::new(dir.path());
        let path = sink.write_records("empty.csv", &[]).unwrap();

        let content = fs::read_to_string(path).unwrap();
        assert_eq!(content.trim_end(), COLUMNS.join(","));
    }

    #[test]
    fn test_quoting_survives_roundtrip() {
        let dir = TempDir::new().unwrap();
        let sink = CsvSink::new(dir.path().join("nested"));
        let written = vec![record(70, 64.9), record(85, 71.5)];

        let path = sink.write_records("out.csv", &written).unwrap();
        assert!(path.starts_with(dir.path().join("nested")));
        assert_eq!(read_records(&path).unwrap(), written);
    }
}
