//! Folds raw rows into per-item totals and ranks the items.

use crate::model::{parse_lenient, Item, PriorityTable, RawRow};
use std::cmp::Ordering;
use std::collections::HashMap;
use tracing::trace;

/// Groups `rows` by their exact item name and sums quantity and amount for each group.
///
/// The grouping key is the name exactly as written: `"Latte"` and `"latte "` are two items even
/// though both are priority items. Each item's priority flag is decided by `table` when the item is
/// first seen. Numeric text that does not parse counts as zero.
///
/// Items are returned in order of first appearance; use `rank` to order them for a report.
pub fn aggregate(rows: &[RawRow], table: &PriorityTable) -> Vec<Item> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut items: Vec<Item> = Vec::new();

    for row in rows {
        let ix = *index.entry(row.name()).or_insert_with(|| {
            let is_priority = table.is_priority(row.name());
            trace!("New item '{}' (priority: {is_priority})", row.name());
            items.push(Item::new(row.name(), is_priority));
            items.len() - 1
        });
        items[ix].add(parse_lenient(row.quantity()), parse_lenient(row.amount()));
    }

    items
}

/// Sorts `items` for the report: priority items first, then by descending sum. Items with the same
/// priority and sum are ordered by name so that the output does not depend on input order.
pub fn rank(items: &mut [Item]) {
    items.sort_by(compare);
}

/// The ranking order used by `rank`.
pub fn compare(a: &Item, b: &Item) -> Ordering {
    b.is_priority()
        .cmp(&a.is_priority())
        .then_with(|| b.sum().cmp(&a.sum()))
        .then_with(|| a.name().cmp(b.name()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn row(name: &str, quantity: &str, amount: &str) -> RawRow {
        RawRow::new(name, quantity, amount, None)
    }

    fn find<'a>(items: &'a [Item], name: &str) -> &'a Item {
        items.iter().find(|i| i.name() == name).unwrap()
    }

    #[test]
    fn test_exact_name_grouping() {
        let table = PriorityTable::default();
        let rows = vec![
            row("Latte", "2", "50"),
            row("latte", "1", "25"),
            row("Latte", "1", "25"),
        ];
        let items = aggregate(&rows, &table);
        assert_eq!(items.len(), 2);
        assert_eq!(find(&items, "Latte").quantity(), Decimal::from(3));
        assert_eq!(find(&items, "Latte").sum(), Decimal::from(75));
        assert_eq!(find(&items, "latte").sum(), Decimal::from(25));
        assert!(items.iter().all(|i| i.is_priority()));
    }

    #[test]
    fn test_unparsable_quantity_counts_as_zero() {
        let table = PriorityTable::default();
        let rows = vec![row("Lemonade", "abc", "40"), row("Lemonade", "1", "")];
        let items = aggregate(&rows, &table);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].quantity(), Decimal::ONE);
        assert_eq!(items[0].sum(), Decimal::from(40));
    }

    #[test]
    fn test_sums_are_additive_for_any_order() {
        let table = PriorityTable::default();
        let mut rows = vec![
            row("Croissant", "1", "30,50"),
            row("Tea", "1", "25"),
            row("Croissant", "2", "61"),
            row("Tea", "3", "0.1"),
            row("Croissant", "1", "0.2"),
            row("Tea", "1", "1e1"),
        ];
        let forward = aggregate(&rows, &table);
        rows.reverse();
        let backward = aggregate(&rows, &table);

        for name in ["Croissant", "Tea"] {
            let expected: Decimal = rows
                .iter()
                .filter(|r| r.name() == name)
                .map(|r| parse_lenient(r.amount()))
                .sum();
            assert_eq!(find(&forward, name).sum(), expected);
            assert_eq!(find(&backward, name).sum(), expected);
            assert_eq!(find(&forward, name).quantity(), find(&backward, name).quantity());
        }
        assert_eq!(find(&forward, "Croissant").sum(), Decimal::new(917, 1));
    }

    #[test]
    fn test_priority_decided_from_first_name_seen() {
        let table = PriorityTable::default();
        let rows = vec![row(" Flat White ", "1", "50"), row("Muffin", "1", "30")];
        let items = aggregate(&rows, &table);
        assert!(find(&items, " Flat White ").is_priority());
        assert!(!find(&items, "Muffin").is_priority());
    }

    #[test]
    fn test_aggregate_empty() {
        assert!(aggregate(&[], &PriorityTable::default()).is_empty());
    }

    #[test]
    fn test_rank_priority_then_sum() {
        let mut items = vec![
            Item::with_totals("Croissant", Decimal::ONE, Decimal::from(500), false),
            Item::with_totals("Tea", Decimal::ONE, Decimal::from(10), true),
            Item::with_totals("Latte", Decimal::ONE, Decimal::from(90), true),
            Item::with_totals("Muffin", Decimal::ONE, Decimal::from(600), false),
        ];
        rank(&mut items);
        let names: Vec<&str> = items.iter().map(|i| i.name()).collect();
        assert_eq!(names, vec!["Latte", "Tea", "Muffin", "Croissant"]);
    }

    #[test]
    fn test_rank_is_a_total_order() {
        let mut items: Vec<Item> = (0..20)
            .map(|i| {
                Item::with_totals(
                    format!("item {i:02}"),
                    Decimal::ONE,
                    Decimal::from((i * 7) % 5),
                    i % 3 == 0,
                )
            })
            .collect();
        rank(&mut items);
        for pair in items.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            if a.is_priority() != b.is_priority() {
                assert!(a.is_priority());
            } else {
                assert!(a.sum() >= b.sum());
            }
        }
    }

    #[test]
    fn test_ties_are_broken_by_name() {
        let tied = |name: &str| Item::with_totals(name, Decimal::ONE, Decimal::from(25), true);
        let mut first = vec![tied("Tea"), tied("Cacao"), tied("Latte")];
        let mut second = vec![tied("Latte"), tied("Tea"), tied("Cacao")];
        rank(&mut first);
        rank(&mut second);
        assert_eq!(first, second);
        assert_eq!(first[0].name(), "Cacao");
    }

    #[test]
    fn test_equal_sums_with_different_scale_are_ties() {
        let a = Item::with_totals("B", Decimal::ONE, Decimal::new(5000, 2), false);
        let b = Item::with_totals("A", Decimal::ONE, Decimal::from(50), false);
        assert_eq!(compare(&a, &b), Ordering::Greater);
    }

    #[test]
    fn test_sums_near_the_limit_do_not_panic() {
        let table = PriorityTable::default();
        let max = Decimal::MAX.to_string();
        let rows = vec![
            row("Tea", "1", &max),
            row("Tea", "1", "1"),
            row("Cake", "1", &max),
            row("Cake", "1", &max),
        ];
        let items = aggregate(&rows, &table);
        assert_eq!(find(&items, "Tea").sum(), Decimal::MAX);
        assert_eq!(find(&items, "Tea").quantity(), Decimal::from(2));
        assert_eq!(find(&items, "Cake").sum(), Decimal::MAX);
    }
}
