//! Renders ranked items as the text of a chat message.

use crate::model::Item;
use rust_decimal::{Decimal, RoundingStrategy};
use tracing::warn;

/// The most items that are listed in a report.
pub const DISPLAY_CAP: usize = 30;

/// Width of the name column. Longer names are cut.
const NAME_WIDTH: usize = 40;

/// Width of the quantity and sum columns.
const NUMBER_WIDTH: usize = 10;

/// The text of a report and the total of the items it lists.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct Rendered {
    text: String,
    total_sum: Decimal,
}

impl Rendered {
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The sum over the listed items only. Items past `DISPLAY_CAP` are not included.
    pub fn total_sum(&self) -> Decimal {
        self.total_sum
    }

    pub fn into_parts(self) -> (String, Decimal) {
        (self.text, self.total_sum)
    }
}

/// Renders a report for `report_date` listing at most `DISPLAY_CAP` of the already-ranked
/// `items`, followed by a note about how many were left out.
pub fn render(report_date: &str, items: &[Item]) -> Rendered {
    let mut text = format!("📅 Report date: {report_date}\n\n📊 Sales report:\n\n");
    let mut total_sum = Decimal::ZERO;

    for item in items.iter().take(DISPLAY_CAP) {
        total_sum = total_sum.checked_add(item.sum()).unwrap_or_else(|| {
            warn!("The report total is out of range, capping it");
            total_sum.saturating_add(item.sum())
        });
        let quantity = two_places(item.quantity());
        let sum = two_places(item.sum());
        text.push_str(&format!(
            "{:<name_w$.name_w$} {quantity:>num_w$} {sum:>num_w$}\n",
            item.name(),
            name_w = NAME_WIDTH,
            num_w = NUMBER_WIDTH,
        ));
    }

    if items.len() > DISPLAY_CAP {
        text.push_str(&format!(
            "\n... and {} more items. The full report is in the file.",
            items.len() - DISPLAY_CAP
        ));
    }

    Rendered { text, total_sum }
}

fn two_places(value: Decimal) -> String {
    format!(
        "{:.2}",
        value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    )
}
