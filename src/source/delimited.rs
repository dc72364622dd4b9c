//! Decodes comma-separated exports with the `csv` crate.

use crate::source::{trim_row, Rows, Source, SourceError};
use std::io::Cursor;

/// A `Source` backed by the bytes of a `.csv` file. There is no header handling here: the header
/// row is found by the analysis like in any other sheet.
pub struct CsvSource {
    bytes: Vec<u8>,
}

impl CsvSource {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }
}

impl Source for CsvSource {
    fn rows(&mut self) -> Result<Rows, SourceError> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(Cursor::new(self.bytes.as_slice()));

        let mut rows = Rows::new();
        for (ix, result) in rdr.records().enumerate() {
            let record = result
                .map_err(|e| SourceError::new(format!("Unable to read CSV line {}", ix + 1), e))?;
            rows.push(trim_row(record.iter().map(|field| field.to_string())));
        }
        Ok(rows)
    }
}
