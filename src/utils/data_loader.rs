//! Data loading utilities

use crate::error::{RideDemandError, Result};
use polars::prelude::*;
use std::fs::File;
use std::path::Path;
use std::time::Instant;
use tracing::info;

/// Loader for tabular trip files
#[derive(Debug, Clone)]
pub struct DataLoader {
    /// Rows used for CSV schema inference
    infer_schema_length: usize,
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DataLoader {
    pub fn new() -> Self {
        Self {
            infer_schema_length: 1000,
        }
    }

    pub fn with_infer_schema_length(mut self, rows: usize) -> Self {
        self.infer_schema_length = rows;
        self
    }

    /// Load a delimited file with a header row
    pub fn load_csv(&self, path: &Path, delimiter: u8) -> Result<DataFrame> {
        let file = open(path)?;
        let parse_opts = CsvParseOptions::default().with_separator(delimiter);

        CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(self.infer_schema_length))
            .with_parse_options(parse_opts)
            .into_reader_with_file_handle(file)
            .finish()
            .map_err(|e| RideDemandError::DataError(format!("{}: {}", path.display(), e)))
    }

    /// Load a JSON array or newline-delimited JSON file
    pub fn load_json(&self, path: &Path, lines: bool) -> Result<DataFrame> {
        let file = open(path)?;
        let format = if lines { JsonFormat::JsonLines } else { JsonFormat::Json };

        JsonReader::new(file)
            .with_json_format(format)
            .finish()
            .map_err(|e| RideDemandError::DataError(format!("{}: {}", path.display(), e)))
    }

    /// Detect the format from the extension and load; unknown extensions are read as CSV
    pub fn load_auto(&self, path: &Path) -> Result<DataFrame> {
        let start = Instant::now();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();

        let df = match ext.as_str() {
            "tsv" => self.load_csv(path, b'\t')?,
            "json" => self.load_json(path, false)?,
            "jsonl" | "ndjson" => self.load_json(path, true)?,
            _ => self.load_csv(path, b',')?,
        };

        info!(
            path = %path.display(),
            rows = df.height(),
            columns = df.width(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Loaded dataset"
        );
        Ok(df)
    }
}

fn open(path: &Path) -> Result<File> {
    File::open(path)
        .map_err(|e| RideDemandError::DataError(format!("Failed to open {}: {}", path.display(), e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_csv_auto() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "key,fare_amount,pickup_datetime").unwrap();
        writeln!(file, "a,7.5,2015-05-07 19:52:06 UTC").unwrap();
        writeln!(file, "b,12.0,2009-07-17 20:04:56 UTC").unwrap();
        file.flush().unwrap();

        let df = DataLoader::new().load_auto(file.path()).unwrap();
        assert_eq!(df.height(), 2);
        assert_eq!(df.width(), 3);
    }

    #[test]
    fn test_load_tsv() {
        let mut file = tempfile::Builder::new().suffix(".tsv").tempfile().unwrap();
        writeln!(file, "price\thumidity").unwrap();
        writeln!(file, "100\t55").unwrap();
        file.flush().unwrap();

        let df = DataLoader::new().load_auto(file.path()).unwrap();
        let names: Vec<&str> = df.get_column_names().iter().map(|s| s.as_str()).collect();
        assert_eq!(names, vec!["price", "humidity"]);
    }

    #[test]
    fn test_missing_file() {
        let result = DataLoader::new().load_auto(Path::new("/nonexistent/trips.csv"));
        assert!(matches!(result, Err(RideDemandError::DataError(_))));
    }
}
