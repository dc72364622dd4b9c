use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// One data row of a sales sheet, as found below the header row.
///
/// Quantity and amount are kept as the raw cell text; they are parsed when the row is folded into
/// an `Item`.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RawRow {
    name: String,
    quantity: String,
    amount: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    date: Option<String>,
}

impl RawRow {
    pub fn new(
        name: impl Into<String>,
        quantity: impl Into<String>,
        amount: impl Into<String>,
        date: Option<String>,
    ) -> Self {
        Self {
            name: name.into(),
            quantity: quantity.into(),
            amount: amount.into(),
            date,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn quantity(&self) -> &str {
        &self.quantity
    }

    pub fn amount(&self) -> &str {
        &self.amount
    }

    pub fn date(&self) -> Option<&str> {
        self.date.as_deref()
    }
}

/// The running totals for every row that shares the exact same item name.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Item {
    name: String,
    quantity: Decimal,
    sum: Decimal,
    is_priority: bool,
}

impl Item {
    /// Creates an item with zero totals. `is_priority` is fixed for the life of the item.
    pub fn new(name: impl Into<String>, is_priority: bool) -> Self {
        Self {
            name: name.into(),
            quantity: Decimal::ZERO,
            sum: Decimal::ZERO,
            is_priority,
        }
    }

    /// Creates an item that already holds the given totals.
    pub fn with_totals(
        name: impl Into<String>,
        quantity: Decimal,
        sum: Decimal,
        is_priority: bool,
    ) -> Self {
        Self {
            name: name.into(),
            quantity,
            sum,
            is_priority,
        }
    }

    /// Adds one row's quantity and amount to the totals. Totals that would leave the `Decimal`
    /// range stay at `Decimal::MAX` or `Decimal::MIN`.
    pub(crate) fn add(&mut self, quantity: Decimal, sum: Decimal) {
        self.quantity = accumulate(&self.name, "quantity", self.quantity, quantity);
        self.sum = accumulate(&self.name, "sum", self.sum, sum);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn quantity(&self) -> Decimal {
        self.quantity
    }

    pub fn sum(&self) -> Decimal {
        self.sum
    }

    pub fn is_priority(&self) -> bool {
        self.is_priority
    }
}

fn accumulate(name: &str, field: &str, total: Decimal, value: Decimal) -> Decimal {
    total.checked_add(value).unwrap_or_else(|| {
        warn!("The {field} of '{name}' is out of range, capping it");
        total.saturating_add(value)
    })
}
