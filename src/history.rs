//! The history of generated reports.
//!
//! Every analyzed sheet is recorded as a `Report` in a single JSON file (`reports.json` in the
//! home directory by default). Records are only ever appended.

use crate::analysis::AnalysisResult;
use crate::{utils, Result};
use anyhow::{ensure, Context};
use chrono::{Local, SecondsFormat};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// The default file name of the history, relative to the home directory.
pub const REPORTS_JSON: &str = "reports.json";

/// A stored report.
///
/// Example:
/// ```json
/// {
///   "date": "14.03.2025",
///   "text": "📅 Report date: 14.03.2025\n\n📊 Sales report:\n\n...",
///   "total_sum": 728.0,
///   "timestamp": "2025-03-14T21:04:11+02:00"
/// }
/// ```
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Report {
    date: String,
    text: String,
    total_sum: Decimal,
    timestamp: String,
}

impl Report {
    /// Creates a record of `result`, timestamped now.
    pub fn new(result: &AnalysisResult) -> Self {
        Self::with_timestamp(
            result.report_date(),
            result.text(),
            result.total_sum(),
            Local::now().to_rfc3339_opts(SecondsFormat::Secs, false),
        )
    }

    pub fn with_timestamp(
        date: impl Into<String>,
        text: impl Into<String>,
        total_sum: Decimal,
        timestamp: impl Into<String>,
    ) -> Self {
        Self {
            date: date.into(),
            text: text.into(),
            total_sum,
            timestamp: timestamp.into(),
        }
    }

    pub fn date(&self) -> &str {
        &self.date
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn total_sum(&self) -> Decimal {
        self.total_sum
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }
}

/// The append-only report history stored at `path`.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct History {
    path: PathBuf,
}

impl History {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads all stored reports, oldest first. A missing file is an empty history.
    pub async fn load(&self) -> Result<Vec<Report>> {
        if !self.path.is_file() {
            debug!("No history at {}", self.path.display());
            return Ok(Vec::new());
        }
        utils::deserialize(&self.path)
            .await
            .context("Unable to load the report history")
    }

    /// Appends `report` to the history and returns its 1-based number.
    pub async fn append(&self, report: Report) -> Result<usize> {
        let mut reports = self.load().await?;
        reports.push(report);
        let json = serde_json::to_string_pretty(&reports)
            .context("Failed to serialize the report history to JSON")?;
        utils::write(&self.path, json).await?;
        debug!(
            "Saved report {} to {}",
            reports.len(),
            self.path.display()
        );
        Ok(reports.len())
    }

    /// Returns the report with the given 1-based `number`.
    pub async fn get(&self, number: usize) -> Result<Report> {
        let mut reports = self.load().await?;
        let count = reports.len();
        ensure!(
            (1..=count).contains(&number),
            "There is no report number {number}, the history has {count} reports"
        );
        Ok(reports.swap_remove(number - 1))
    }
}
