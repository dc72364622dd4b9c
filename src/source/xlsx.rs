//! Decodes the first worksheet of an `.xlsx` workbook with `calamine`.

use crate::source::{trim_row, Rows, Source, SourceError};
use calamine::{open_workbook_from_rs, Data, Reader, Xlsx, XlsxError};
use chrono::{NaiveDateTime, Timelike};
use std::io::Cursor;
use tracing::debug;

/// A `Source` backed by the bytes of an `.xlsx` file.
pub struct XlsxSource {
    bytes: Vec<u8>,
}

impl XlsxSource {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }
}

impl Source for XlsxSource {
    fn rows(&mut self) -> Result<Rows, SourceError> {
        let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(self.bytes.as_slice()))
            .map_err(|e: XlsxError| SourceError::new("Unable to open the workbook", e))?;

        let sheet_name = workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| SourceError::message("The workbook has no worksheets"))?;

        let range = workbook.worksheet_range(&sheet_name).map_err(|e| {
            SourceError::new(format!("Unable to read the worksheet '{sheet_name}'"), e)
        })?;

        debug!(
            "Read worksheet '{sheet_name}' with {} rows and {} columns",
            range.height(),
            range.width()
        );

        Ok(range
            .rows()
            .map(|row| trim_row(row.iter().map(cell_text)))
            .collect())
    }
}

/// Renders a workbook cell the way it would appear as text in the sheet.
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => f.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(datetime) => format_datetime(datetime),
            None => dt.as_f64().to_string(),
        },
        Data::Error(e) => format!("#ERROR: {e:?}"),
    }
}

/// Dates print as `DD.MM.YYYY`, with the time appended only when it is not midnight.
fn format_datetime(datetime: NaiveDateTime) -> String {
    if datetime.hour() == 0 && datetime.minute() == 0 && datetime.second() == 0 {
        datetime.format("%d.%m.%Y").to_string()
    } else {
        datetime.format("%d.%m.%Y %H:%M:%S").to_string()
    }
}

/// Writes the seeded sales export into an `.xlsx` workbook. Dates become date cells, numbers
/// become number cells and everything else stays text.
#[cfg(test)]
pub(crate) fn seeded_workbook() -> Vec<u8> {
    use crate::source::MemorySource;
    use chrono::{Datelike, NaiveDate};
    use rust_xlsxwriter::{ExcelDateTime, Format, Workbook};

    let rows = MemorySource::seeded().rows().unwrap();
    let date_format = Format::new().set_num_format("dd.mm.yyyy");
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    for (r, row) in rows.iter().enumerate() {
        for (c, cell) in row.iter().enumerate() {
            let (r, c) = (r as u32, c as u16);
            if cell.is_empty() {
                continue;
            }
            if let Ok(date) = NaiveDate::parse_from_str(cell, "%d.%m.%Y") {
                let (y, m, d) = (date.year() as u16, date.month() as u8, date.day() as u8);
                let date = ExcelDateTime::from_ymd(y, m, d).unwrap();
                worksheet
                    .write_datetime_with_format(r, c, &date, &date_format)
                    .unwrap();
            } else if let Ok(number) = cell.parse::<f64>() {
                worksheet.write_number(r, c, number).unwrap();
            } else {
                worksheet.write_string(r, c, cell).unwrap();
            }
        }
    }
    workbook.save_to_buffer().unwrap()
}
