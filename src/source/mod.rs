//! Sources of decoded sheet rows.
//!
//! A `Source` hands the analysis an in-memory grid of cell text. Rows may have different lengths;
//! missing cells are simply absent. Decoding is synchronous and happens entirely in memory, the
//! caller is responsible for fetching the bytes.

mod delimited;
mod memory;
mod xlsx;

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;
use std::fmt::{Debug, Display, Formatter};
use std::path::Path;

pub use delimited::CsvSource;
pub use memory::MemorySource;
pub use xlsx::XlsxSource;

#[cfg(test)]
pub(crate) use memory::SALES_DATA;
#[cfg(test)]
pub(crate) use xlsx::seeded_workbook;

/// Rows of cell text, top to bottom.
pub type Rows = Vec<Vec<String>>;

/// Anything that can produce the rows of a single sheet.
pub trait Source {
    /// Decode and return all rows of the sheet.
    fn rows(&mut self) -> Result<Rows, SourceError>;
}

/// The spreadsheet could not be opened or decoded.
pub struct SourceError {
    message: String,
    inner: Option<Box<dyn Error + Send + Sync + 'static>>,
}

impl SourceError {
    pub(crate) fn new<E>(message: impl Into<String>, inner: E) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        Self {
            message: message.into(),
            inner: Some(Box::new(inner)),
        }
    }

    pub(crate) fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            inner: None,
        }
    }
}

impl Debug for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceError")
            .field("message", &self.message)
            .field("inner", &self.inner)
            .finish()
    }
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match &self.inner {
            Some(inner) => write!(f, "{}: {inner}", self.message),
            None => Display::fmt(&self.message, f),
        }
    }
}

impl Error for SourceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.inner
            .as_deref()
            .map(|e| e as &(dyn Error + 'static))
    }
}

/// The file formats that can be analyzed.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Xlsx,
    Csv,
}

serde_plain::derive_display_from_serialize!(SourceKind);
serde_plain::derive_fromstr_from_deserialize!(SourceKind);

impl SourceKind {
    /// Chooses the kind from the file extension of `path`, ignoring case.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        ext.parse().ok()
    }

    /// Wraps the raw file `bytes` in the matching `Source`.
    pub fn open(self, bytes: Vec<u8>) -> Box<dyn Source + Send> {
        match self {
            SourceKind::Xlsx => Box::new(XlsxSource::new(bytes)),
            SourceKind::Csv => Box::new(CsvSource::new(bytes)),
        }
    }
}

/// Converts a row of cells to owned strings and drops trailing empty cells, so that rows are only
/// as long as their last non-empty cell.
fn trim_row<I>(cells: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut row: Vec<String> = cells.into_iter().collect();
    while row.last().is_some_and(|c| c.is_empty()) {
        row.pop();
    }
    row
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_kind_from_path() {
        assert_eq!(
            SourceKind::from_path(&PathBuf::from("sales.xlsx")),
            Some(SourceKind::Xlsx)
        );
        assert_eq!(
            SourceKind::from_path(&PathBuf::from("/tmp/SALES.XLSX")),
            Some(SourceKind::Xlsx)
        );
        assert_eq!(
            SourceKind::from_path(&PathBuf::from("export.csv")),
            Some(SourceKind::Csv)
        );
        assert_eq!(SourceKind::from_path(&PathBuf::from("sales.xls")), None);
        assert_eq!(SourceKind::from_path(&PathBuf::from("sales")), None);
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(SourceKind::Xlsx.to_string(), "xlsx");
        assert_eq!("csv".parse::<SourceKind>().unwrap(), SourceKind::Csv);
    }

    #[test]
    fn test_trim_row() {
        let row = trim_row(vec!["a".to_string(), String::new(), "b".into(), "".into(), "".into()]);
        assert_eq!(row, vec!["a", "", "b"]);
        assert!(trim_row(vec![String::new()]).is_empty());
    }

    #[test]
    fn test_error_display() {
        let e = SourceError::message("The workbook has no worksheets");
        assert_eq!(e.to_string(), "The workbook has no worksheets");
        assert!(e.source().is_none());

        let io = std::io::Error::new(std::io::ErrorKind::InvalidData, "bad zip");
        let e = SourceError::new("Unable to open the workbook", io);
        assert_eq!(e.to_string(), "Unable to open the workbook: bad zip");
        assert!(e.source().is_some());
    }
}
