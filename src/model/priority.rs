//! The closed list of item names that are ranked ahead of everything else in a report.

use std::collections::HashSet;

/// The drinks that lead every report. Stored lowercase and trimmed.
const PRIORITY_ITEMS: &[&str] = &[
    "espresso",
    "double espresso decaffeinated",
    "chocolate truffle",
    "sakura latte",
    "matcha latte",
    "berry raf",
    "kakao banana",
    "masala tea latte",
    "cheese & orange latte",
    "double cappuccino vegan",
    "flat white",
    "flat white decaffeinated",
    "flat white vegan",
    "latte",
    "latte decaffeinated",
    "latte vegan",
    "ice latte",
    "ice latte decaffeinated",
    "espresso decaffeinated",
    "ice latte vegan",
    "espresso tonic",
    "espresso tonic decaffeinated",
    "bumblebee",
    "tea",
    "doppio(double espresso)",
    "americano",
    "americano decaffeinated",
    "cappuccino",
    "cappuccino decaffeinated",
    "cacao",
    "hot chocolate",
    "cappuccino vegan",
    "double americano",
    "double cappuccino",
];

/// An immutable set of priority item names.
///
/// Lookups ignore case and surrounding whitespace, so `" Latte "`, `"LATTE"` and `"latte"` are all
/// the same priority item. Build it once with `PriorityTable::default()` and share it (it is
/// `Send + Sync`) between analysis runs.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct PriorityTable {
    names: HashSet<String>,
}

impl PriorityTable {
    /// Creates a table from `names`, normalizing each one.
    pub fn new<S, I>(names: I) -> Self
    where
        S: AsRef<str>,
        I: IntoIterator<Item = S>,
    {
        Self {
            names: names.into_iter().map(|s| normalize(s.as_ref())).collect(),
        }
    }

    /// Returns `true` if `name` is a priority item.
    pub fn is_priority(&self, name: &str) -> bool {
        self.names.contains(&normalize(name))
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl Default for PriorityTable {
    /// The built-in drink list.
    fn default() -> Self {
        Self::new(PRIORITY_ITEMS)
    }
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table_has_every_drink() {
        let table = PriorityTable::default();
        assert_eq!(table.len(), PRIORITY_ITEMS.len());
        for name in PRIORITY_ITEMS {
            assert!(table.is_priority(name), "{name}");
        }
    }

    #[test]
    fn test_case_and_whitespace_invariant() {
        let table = PriorityTable::default();
        let expected = table.is_priority("latte");
        assert!(expected);
        assert_eq!(table.is_priority(" Latte "), expected);
        assert_eq!(table.is_priority("LATTE"), expected);
        assert!(table.is_priority("\tFlat White\n"));
        assert!(table.is_priority("Doppio(Double Espresso)"));
    }

    #[test]
    fn test_non_priority() {
        let table = PriorityTable::default();
        assert!(!table.is_priority("Croissant"));
        assert!(!table.is_priority("Punga cadou"));
        assert!(!table.is_priority("lat te"));
        assert!(!table.is_priority(""));
    }

    #[test]
    fn test_custom_table_is_normalized() {
        let table = PriorityTable::new(["  Cold Brew ", "MOCHA"]);
        assert_eq!(table.len(), 2);
        assert!(table.is_priority("cold brew"));
        assert!(table.is_priority("Mocha"));
        assert!(!table.is_priority("latte"));
    }

    #[test]
    fn test_empty_table() {
        let table = PriorityTable::new(Vec::<String>::new());
        assert!(table.is_empty());
        assert!(!table.is_priority("latte"));
    }
}
