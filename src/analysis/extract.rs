//! Finds the header row and the columns of interest in a sales sheet and pulls out the data rows.
//!
//! Till exports put a few title rows above the table and do not always start the table in the
//! first column, so nothing here assumes a fixed position. The header row is the first row that
//! mentions the item-name header, and every column is located by its exact header text.

use crate::model::RawRow;
use std::error::Error;
use std::fmt::{Display, Formatter};
use tracing::{debug, trace};

/// Header of the item-name column. Also the marker used to find the header row.
pub const NAME_HEADER: &str = "Denumire marfa";

/// Header of the quantity column.
pub const QUANTITY_HEADER: &str = "Cantitate";

/// Header of the amount (with VAT, before discount) column.
pub const AMOUNT_HEADER: &str = "Suma cu TVA fără reducere";

/// Header of the optional date column.
pub const DATE_HEADER: &str = "Data";

/// Item names containing this text are packaging fees, not products.
pub const EXCLUDE_MARKER: &str = "Punga";

/// The report date used when the sheet does not provide one.
pub const UNKNOWN_DATE: &str = "unknown";

/// The sheet does not have the expected shape.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum SchemaError {
    /// No cell in the sheet mentions `NAME_HEADER`.
    HeaderNotFound,
    /// The header row lacks one or more mandatory columns, listed here by header text.
    MissingColumns(Vec<&'static str>),
}

impl Display for SchemaError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SchemaError::HeaderNotFound => {
                write!(f, "❌ headers not found: no cell contains '{NAME_HEADER}'")
            }
            SchemaError::MissingColumns(missing) => {
                write!(f, "❌ required columns are missing: {}", missing.join(", "))
            }
        }
    }
}

impl Error for SchemaError {}

/// What the extractor found in a sheet: the report date and the product rows.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct Extract {
    report_date: String,
    rows: Vec<RawRow>,
}

impl Extract {
    /// The first non-empty date below the header, or `UNKNOWN_DATE`.
    pub fn report_date(&self) -> &str {
        &self.report_date
    }

    pub fn rows(&self) -> &[RawRow] {
        &self.rows
    }

    pub fn into_parts(self) -> (String, Vec<RawRow>) {
        (self.report_date, self.rows)
    }
}

/// Column positions within the header row.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
struct Columns {
    name: usize,
    quantity: usize,
    amount: usize,
    date: Option<usize>,
}

impl Columns {
    /// Locates the columns by exact header text. When a header repeats, the last one wins.
    fn find<S: AsRef<str>>(header: &[S]) -> Result<Self, SchemaError> {
        let (mut name, mut quantity, mut amount, mut date) = (None, None, None, None);
        for (ix, cell) in header.iter().enumerate() {
            match cell.as_ref() {
                NAME_HEADER => name = Some(ix),
                QUANTITY_HEADER => quantity = Some(ix),
                AMOUNT_HEADER => amount = Some(ix),
                DATE_HEADER => date = Some(ix),
                _ => {}
            }
        }

        match (name, quantity, amount) {
            (Some(name), Some(quantity), Some(amount)) => Ok(Self {
                name,
                quantity,
                amount,
                date,
            }),
            _ => {
                let missing = [
                    (name, NAME_HEADER),
                    (quantity, QUANTITY_HEADER),
                    (amount, AMOUNT_HEADER),
                ]
                .into_iter()
                .filter(|(ix, _)| ix.is_none())
                .map(|(_, header)| header)
                .collect();
                Err(SchemaError::MissingColumns(missing))
            }
        }
    }
}

/// Extracts the report date and the product rows from `rows`.
///
/// # Errors
/// - `SchemaError::HeaderNotFound` when no cell contains `NAME_HEADER`.
/// - `SchemaError::MissingColumns` when the header row lacks the name, quantity or amount column.
pub fn extract<S: AsRef<str>>(rows: &[Vec<S>]) -> Result<Extract, SchemaError> {
    let header_ix = rows
        .iter()
        .position(|row| row.iter().any(|cell| cell.as_ref().contains(NAME_HEADER)))
        .ok_or(SchemaError::HeaderNotFound)?;
    let columns = Columns::find(&rows[header_ix])?;
    debug!("Found the header at row {} with {columns:?}", header_ix + 1);

    let body = &rows[header_ix + 1..];

    let report_date = columns
        .date
        .and_then(|date_ix| {
            body.iter()
                .map(|row| cell(row, date_ix))
                .find(|date| !date.is_empty())
        })
        .unwrap_or(UNKNOWN_DATE)
        .to_string();

    let mut extracted = Vec::new();
    for (offset, row) in body.iter().enumerate() {
        let name = match row.get(columns.name) {
            Some(name) if !name.as_ref().is_empty() => name.as_ref(),
            _ => continue,
        };
        if name.contains(EXCLUDE_MARKER) {
            trace!(
                "Skipping '{name}' at row {}, it is not a product",
                header_ix + offset + 2
            );
            continue;
        }
        let date = columns
            .date
            .map(|date_ix| cell(row, date_ix))
            .filter(|date| !date.is_empty())
            .map(String::from);
        extracted.push(RawRow::new(
            name,
            cell(row, columns.quantity),
            cell(row, columns.amount),
            date,
        ));
    }

    Ok(Extract {
        report_date,
        rows: extracted,
    })
}

/// The text of the cell at `ix`, or an empty string when the row is too short.
fn cell<S: AsRef<str>>(row: &[S], ix: usize) -> &str {
    row.get(ix).map(|s| s.as_ref()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: [&str; 4] = [DATE_HEADER, NAME_HEADER, QUANTITY_HEADER, AMOUNT_HEADER];

    #[test]
    fn test_header_not_found() {
        let rows = vec![vec!["Item", "Qty", "Sum"], vec!["Latte", "1", "2"]];
        assert_eq!(extract(&rows).unwrap_err(), SchemaError::HeaderNotFound);
    }

    #[test]
    fn test_empty_sheet_is_header_not_found() {
        let rows: Vec<Vec<String>> = Vec::new();
        assert_eq!(extract(&rows).unwrap_err(), SchemaError::HeaderNotFound);
    }

    #[test]
    fn test_missing_columns_are_named() {
        let rows = vec![vec![NAME_HEADER, "Pret"], vec!["Latte", "45"]];
        let e = extract(&rows).unwrap_err();
        assert_eq!(
            e,
            SchemaError::MissingColumns(vec![QUANTITY_HEADER, AMOUNT_HEADER])
        );
        assert_eq!(
            e.to_string(),
            "❌ required columns are missing: Cantitate, Suma cu TVA fără reducere"
        );
    }

    #[test]
    fn test_error_messages_differ() {
        assert_ne!(
            SchemaError::HeaderNotFound.to_string(),
            SchemaError::MissingColumns(vec![AMOUNT_HEADER]).to_string()
        );
    }

    #[test]
    fn test_marker_is_a_substring_but_columns_are_exact() {
        // The header row is found through a cell that merely contains the marker, but the name
        // column itself must match exactly.
        let rows = vec![vec![
            "Denumire marfa (cod)",
            QUANTITY_HEADER,
            AMOUNT_HEADER,
        ]];
        assert_eq!(
            extract(&rows).unwrap_err(),
            SchemaError::MissingColumns(vec![NAME_HEADER])
        );
    }

    #[test]
    fn test_first_header_row_wins() {
        let rows = vec![
            vec!["x", NAME_HEADER, QUANTITY_HEADER, AMOUNT_HEADER],
            vec!["", "Latte", "1", "45"],
            vec![NAME_HEADER, QUANTITY_HEADER, AMOUNT_HEADER],
        ];
        let extract = extract(&rows).unwrap();
        // The second header-looking row is read as data through the first header's columns.
        assert_eq!(extract.rows().len(), 2);
        assert_eq!(extract.rows()[1].name(), QUANTITY_HEADER);
    }

    #[test]
    fn test_date_is_first_non_empty_below_header() {
        let rows = vec![
            vec!["Data 01.01.2020 in a title", "", "", ""],
            HEADER.to_vec(),
            vec!["", "Latte", "1", "45"],
            vec!["15.03.2025", "Tea", "1", "25"],
            vec!["16.03.2025", "Tea", "1", "25"],
        ];
        let extract = extract(&rows).unwrap();
        assert_eq!(extract.report_date(), "15.03.2025");
        assert_eq!(extract.rows()[0].date(), None);
        assert_eq!(extract.rows()[1].date(), Some("15.03.2025"));
    }

    #[test]
    fn test_date_from_excluded_row_still_counts() {
        let rows = vec![
            HEADER.to_vec(),
            vec!["14.03.2025", "Punga mare", "1", "2"],
            vec!["15.03.2025", "Latte", "1", "45"],
        ];
        let extract = extract(&rows).unwrap();
        assert_eq!(extract.report_date(), "14.03.2025");
        assert_eq!(extract.rows().len(), 1);
    }

    #[test]
    fn test_no_date_column_is_unknown() {
        let rows = vec![
            vec![NAME_HEADER, QUANTITY_HEADER, AMOUNT_HEADER],
            vec!["Latte", "1", "45"],
        ];
        assert_eq!(extract(&rows).unwrap().report_date(), UNKNOWN_DATE);
    }

    #[test]
    fn test_empty_date_cells_are_unknown() {
        let rows = vec![HEADER.to_vec(), vec!["", "Latte", "1", "45"], vec![""]];
        assert_eq!(extract(&rows).unwrap().report_date(), UNKNOWN_DATE);
    }

    #[test]
    fn test_row_filtering() {
        let rows = vec![
            HEADER.to_vec(),
            vec!["14.03.2025"],
            vec!["14.03.2025", ""],
            vec!["14.03.2025", "Punga cadou", "1", "2"],
            vec!["14.03.2025", "Latte", "2"],
            vec!["14.03.2025", "punga", "1", "1"],
        ];
        let extract = extract(&rows).unwrap();
        let names: Vec<&str> = extract.rows().iter().map(|r| r.name()).collect();
        // The exclusion marker is case-sensitive.
        assert_eq!(names, vec!["Latte", "punga"]);
        // Ragged rows read missing cells as empty.
        assert_eq!(extract.rows()[0].quantity(), "2");
        assert_eq!(extract.rows()[0].amount(), "");
    }

    #[test]
    fn test_raw_text_is_kept() {
        let rows = vec![HEADER.to_vec(), vec!["", " Latte ", "abc", "1 234,50"]];
        let extract = extract(&rows).unwrap();
        let row = &extract.rows()[0];
        assert_eq!(row.name(), " Latte ");
        assert_eq!(row.quantity(), "abc");
        assert_eq!(row.amount(), "1 234,50");
    }

    #[test]
    fn test_last_duplicate_header_wins() {
        let rows = vec![
            vec![NAME_HEADER, QUANTITY_HEADER, AMOUNT_HEADER, QUANTITY_HEADER],
            vec!["Latte", "1", "45", "9"],
        ];
        let extract = extract(&rows).unwrap();
        assert_eq!(extract.rows()[0].quantity(), "9");
    }
}
