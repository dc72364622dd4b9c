//! The sales analysis: find the table in a sheet, total each item, rank the items and render the
//! report text.
//!
//! Everything in here is synchronous and works on in-memory rows. A run owns all of its state
//! except the `PriorityTable`, which is only read, so runs can happen on any number of threads at
//! once.

mod engine;
mod extract;
mod format;

use crate::model::{Item, PriorityTable};
use crate::source::{Source, SourceError};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use tracing::debug;

pub use engine::{aggregate, compare, rank};
pub use extract::{
    extract, Extract, SchemaError, AMOUNT_HEADER, DATE_HEADER, EXCLUDE_MARKER, NAME_HEADER,
    QUANTITY_HEADER, UNKNOWN_DATE,
};
pub use format::{render, Rendered, DISPLAY_CAP};

/// The outcome of analyzing one sheet.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct AnalysisResult {
    report_date: String,
    items: Vec<Item>,
    text: String,
    total_sum: Decimal,
}

impl AnalysisResult {
    /// The date found in the sheet, or `UNKNOWN_DATE`.
    pub fn report_date(&self) -> &str {
        &self.report_date
    }

    /// Every item in report order, including those past `DISPLAY_CAP`.
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// The rendered report.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The sum of the items listed in `text`.
    pub fn total_sum(&self) -> Decimal {
        self.total_sum
    }
}

/// Why a sheet could not be analyzed.
#[derive(Debug)]
pub enum AnalysisError {
    /// The file could not be opened or decoded.
    SourceOpen(SourceError),
    /// The sheet does not contain the expected table.
    Schema(SchemaError),
}

impl Display for AnalysisError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            AnalysisError::SourceOpen(e) => Display::fmt(e, f),
            AnalysisError::Schema(e) => Display::fmt(e, f),
        }
    }
}

impl Error for AnalysisError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            AnalysisError::SourceOpen(e) => Some(e),
            AnalysisError::Schema(e) => Some(e),
        }
    }
}

impl From<SourceError> for AnalysisError {
    fn from(e: SourceError) -> Self {
        AnalysisError::SourceOpen(e)
    }
}

impl From<SchemaError> for AnalysisError {
    fn from(e: SchemaError) -> Self {
        AnalysisError::Schema(e)
    }
}

/// Reads the rows from `source` and analyzes them.
pub fn analyze<S>(source: &mut S, table: &PriorityTable) -> Result<AnalysisResult, AnalysisError>
where
    S: Source + ?Sized,
{
    let rows = source.rows()?;
    analyze_rows(&rows, table).map_err(AnalysisError::Schema)
}

/// Analyzes rows that have already been decoded.
pub fn analyze_rows<S: AsRef<str>>(
    rows: &[Vec<S>],
    table: &PriorityTable,
) -> Result<AnalysisResult, SchemaError> {
    let (report_date, raw_rows) = extract(rows)?.into_parts();
    let mut items = aggregate(&raw_rows, table);
    rank(&mut items);
    let (text, total_sum) = render(&report_date, &items).into_parts();
    debug!(
        "Analyzed {} rows into {} items for {report_date}",
        raw_rows.len(),
        items.len()
    );
    Ok(AnalysisResult {
        report_date,
        items,
        text,
        total_sum,
    })
}
