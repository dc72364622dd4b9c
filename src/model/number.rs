//! Locale-tolerant parsing of the numeric text found in point-of-sale exports.
//!
//! Different tills and spreadsheet locales write the same number in different ways, for example
//! `1234.5`, `1 234,50`, `1.234,50` or `1,234.50`. The functions here normalize those spellings
//! into a `Decimal`.
//!
//! Cells that cannot be read as a number are not an error for the report: `parse_lenient` turns
//! them into zero so that the rest of the row (e.g. its amount) still counts.

use rust_decimal::Decimal;
use std::error::Error;
use std::fmt;
use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;
use tracing::{trace, warn};

/// An error that can occur when parsing cell text into a `Decimal` value.
pub struct NumberError {
    text: String,
    inner: rust_decimal::Error,
}

impl NumberError {
    /// The text that failed to parse.
    pub fn text(&self) -> &str {
        &self.text
    }
}

impl Debug for NumberError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("NumberError")
            .field("text", &self.text)
            .field("inner", &self.inner)
            .finish()
    }
}

impl Display for NumberError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' is not a number: {}", self.text, self.inner)
    }
}

impl Error for NumberError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.inner)
    }
}

/// Parses `text` as a decimal number, accepting the separators used by common locales.
///
/// - Leading and trailing whitespace is ignored.
/// - Inner whitespace (including non-breaking spaces) and apostrophes are thousands separators.
/// - When both `,` and `.` are present, whichever comes last is the decimal separator.
/// - A single `,` on its own is a decimal separator: `12,5` is twelve and a half.
/// - A separator that repeats (`1.234.567`, `1,234,567`) is a thousands separator.
/// - Scientific notation such as `1.5e3` is accepted.
///
/// # Examples
/// ```
/// # use pos_report::model::parse_decimal;
/// # use rust_decimal::Decimal;
/// # use std::str::FromStr;
/// let expected = Decimal::from_str("1234.5").unwrap();
/// assert_eq!(parse_decimal("1 234,50").unwrap(), expected);
/// assert_eq!(parse_decimal("1.234,50").unwrap(), expected);
/// assert_eq!(parse_decimal("1,234.50").unwrap(), expected);
/// assert!(parse_decimal("abc").is_err());
/// ```
pub fn parse_decimal(text: &str) -> Result<Decimal, NumberError> {
    let normalized = normalize(text);
    Decimal::from_str(&normalized)
        .or_else(|e| Decimal::from_scientific(&normalized).map_err(|_| e))
        .map_err(|inner| NumberError {
            text: text.to_string(),
            inner,
        })
}

/// Parses `text` like `parse_decimal` but returns zero when the text is empty or is not a number.
///
/// Exports regularly contain blank or free-text cells in numeric columns. Those rows are still
/// counted, they simply contribute nothing for that field.
///
/// ```
/// # use pos_report::model::parse_lenient;
/// # use rust_decimal::Decimal;
/// assert_eq!(parse_lenient("abc"), Decimal::ZERO);
/// assert_eq!(parse_lenient(""), Decimal::ZERO);
/// assert_eq!(parse_lenient("2"), Decimal::from(2));
/// ```
pub fn parse_lenient(text: &str) -> Decimal {
    match parse_decimal(text) {
        Ok(value) => value,
        Err(e) => {
            if looks_numeric(&normalize(text)) {
                warn!("Counting a number that is out of range as zero: {e}");
            } else if !text.trim().is_empty() {
                trace!("Treating unparsable number as zero: {e}");
            }
            Decimal::ZERO
        }
    }
}

/// True for normalized text made only of a number's characters, e.g. `9e28` or `-1.5`, which can
/// only fail to parse by being out of range or malformed.
fn looks_numeric(normalized: &str) -> bool {
    normalized.chars().any(|c| c.is_ascii_digit())
        && normalized
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '-' | '+' | '.' | 'e' | 'E'))
}

/// Rewrites `text` into the plain `-1234.5` form understood by `Decimal::from_str`.
fn normalize(text: &str) -> String {
    let compact: String = text
        .trim()
        .chars()
        .filter(|&c| !c.is_whitespace() && c != '\'')
        .collect();

    let commas = compact.matches(',').count();
    let dots = compact.matches('.').count();

    match (compact.rfind(','), compact.rfind('.')) {
        // 1.234,50
        (Some(comma), Some(dot)) if comma > dot => compact.replace('.', "").replace(',', "."),
        // 1,234.50
        (Some(_), Some(_)) => compact.replace(',', ""),
        (Some(_), None) if commas == 1 => compact.replace(',', "."),
        (Some(_), None) => compact.replace(',', ""),
        (None, Some(_)) if dots > 1 => compact.replace('.', ""),
        _ => compact,
    }
}
