use crate::commands::Out;
use crate::delivery::{deliver, Delivery, Sink};
use crate::history::Report;
use crate::{Config, Result};
use rust_decimal::prelude::ToPrimitive;
use tracing::debug;

/// Sends a numbered summary of every stored report to `sink`, one per line, in the order they were
/// saved.
pub async fn history_list(
    config: Config,
    sink: &mut (dyn Sink + Send),
) -> Result<Out<Vec<Report>>> {
    let reports = config.history().load().await?;
    let text = if reports.is_empty() {
        "No saved reports.".to_string()
    } else {
        reports
            .iter()
            .enumerate()
            .map(|(i, r)| summary_line(i + 1, r))
            .collect::<Vec<_>>()
            .join("\n")
    };
    deliver(sink, &text, config.message_limit()).await?;
    Ok(Out::new(
        format!("Listed {} saved reports", reports.len()),
        reports,
    ))
}

/// Sends the full text of report `number` (1-based) to `sink`.
pub async fn history_show(
    config: Config,
    number: usize,
    sink: &mut (dyn Sink + Send),
) -> Result<Out<Report>> {
    let report = config.history().get(number).await?;
    debug!("Showing report {number} from {}", report.timestamp());
    let delivery = deliver(sink, report.text(), config.message_limit()).await?;
    let message = match delivery {
        Delivery::Sent => format!("Sent report {number}"),
        Delivery::TooLong => format!("Report {number} is too long to send"),
    };
    Ok(Out::new(message, report))
}

fn summary_line(number: usize, report: &Report) -> String {
    let total = report.total_sum().to_f64().unwrap_or_default();
    format!(
        "{number}. {} - {} lei",
        report.date(),
        format_num::format_num!(",.2", total)
    )
}
