use crate::analysis::{self, AnalysisResult};
use crate::commands::Out;
use crate::delivery::{deliver, Delivery, Sink};
use crate::history::Report;
use crate::model::PriorityTable;
use crate::source::SourceKind;
use crate::{utils, Config, Result};
use anyhow::{bail, Context};
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// The structured output of `posr analyze`.
#[derive(Debug, Clone, Serialize)]
pub struct Analyzed {
    /// The analysis of the sheet.
    result: AnalysisResult,
    /// Whether the report text or the too-long notice was sent.
    delivery: Delivery,
    /// The 1-based number of the report in the history, if it was saved.
    report_number: Option<usize>,
}

impl Analyzed {
    pub fn result(&self) -> &AnalysisResult {
        &self.result
    }

    pub fn delivery(&self) -> Delivery {
        self.delivery
    }

    pub fn report_number(&self) -> Option<usize> {
        self.report_number
    }
}

/// Analyzes the spreadsheet at `file`, records the report in the history unless `save` is false,
/// and sends the report text to `sink`.
///
/// The file type is chosen by extension. Decoding and analysis run on the blocking thread pool, so
/// any number of these can run at once while sharing `table`.
///
/// # Errors
/// - The file is not an `.xlsx` or `.csv` file, or cannot be read.
/// - The sheet cannot be decoded or does not contain the sales table.
/// - The history cannot be written or the sink fails.
pub async fn analyze(
    config: Config,
    table: Arc<PriorityTable>,
    file: &Path,
    save: bool,
    sink: &mut (dyn Sink + Send),
) -> Result<Out<Analyzed>> {
    let Some(kind) = SourceKind::from_path(file) else {
        bail!("Please send a file in .xlsx format")
    };
    let bytes = utils::read_bytes(file).await?;
    debug!("Read {} bytes of {kind} from {}", bytes.len(), file.display());

    let result = tokio::task::spawn_blocking(move || {
        let mut source = kind.open(bytes);
        analysis::analyze(source.as_mut(), &table)
    })
    .await
    .context("The analysis task did not finish")??;
    info!(
        "Found {} items for {}, total {}",
        result.items().len(),
        result.report_date(),
        result.total_sum()
    );

    let report_number = if save {
        Some(config.history().append(Report::new(&result)).await?)
    } else {
        None
    };

    let delivery = deliver(sink, result.text(), config.message_limit()).await?;

    let message = match report_number {
        Some(n) => format!("Analyzed {} and saved it as report {n}", file.display()),
        None => format!("Analyzed {}", file.display()),
    };
    Ok(Out::new(
        message,
        Analyzed {
            result,
            delivery,
            report_number,
        },
    ))
}
