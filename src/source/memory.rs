//! Implements the `Source` trait using in-memory rows.
//!
//! Note: this is compiled even in the "production" version of this app so that the whole analysis
//! can be run, top-to-bottom, without a workbook on disk.

use crate::source::{CsvSource, Rows, Source, SourceError};

/// A `Source` that holds its rows in memory. By default, it is seeded with a small sales export.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct MemorySource {
    rows: Rows,
}

impl MemorySource {
    /// Create a new `MemorySource` from any grid of cell text.
    pub fn new<S, R, I>(rows: I) -> Self
    where
        S: Into<String>,
        R: IntoIterator<Item = S>,
        I: IntoIterator<Item = R>,
    {
        Self {
            rows: rows
                .into_iter()
                .map(|row| row.into_iter().map(|s| s.into()).collect())
                .collect(),
        }
    }

    /// Loads rows from a CSV-formatted string.
    pub fn from_csv(csv_data: &str) -> Result<Self, SourceError> {
        let rows = CsvSource::new(csv_data.as_bytes().to_vec()).rows()?;
        Ok(Self { rows })
    }

    /// A small export from a coffee shop till, preceded by the usual title rows.
    pub fn seeded() -> Self {
        // The seed data is a constant in this module and is known to be valid CSV.
        Self::from_csv(SALES_DATA).unwrap_or_default()
    }
}

impl Source for MemorySource {
    fn rows(&mut self) -> Result<Rows, SourceError> {
        Ok(self.rows.clone())
    }
}

/// Seed sales data. The header row is not the first row and the columns do not start at `A`.
pub(crate) const SALES_DATA: &str = r##",Raport vanzari pe articole,,,,,
,Perioada: 14.03.2025 - 14.03.2025,,,,,
,,,,,,
,Nr.,Data,Denumire marfa,Cantitate,Pret,Suma cu TVA fără reducere
,1,14.03.2025,Latte,2,45,90
,2,14.03.2025,Cappuccino,3,40,120
,3,14.03.2025,Croissant,4,"30,50",122
,4,14.03.2025,Punga cadou,1,2,2
,5,14.03.2025,Latte,1,45,45
,6,14.03.2025,Cheesecake,1,65,65
,7,14.03.2025, Ice Latte ,2,50,100
,8,14.03.2025,Americano,1,35,35
,9,14.03.2025,Croissant,2,"30,50",61
,10,14.03.2025,,,,
,11,14.03.2025,Tea,2,25,50
,12,14.03.2025,Lemonade,abc,40,40
"##;
