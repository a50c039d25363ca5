//! Flow types and the category catalog offered for each of them.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Category that carries a free-text description instead of a fixed label.
pub const OTHERS_CATEGORY: &str = "Others";

const EXPENSE_CATEGORIES: &[&str] = &[
    "Traveling",
    "Food",
    "Electricity",
    "Education",
    "Entertainment",
    OTHERS_CATEGORY,
];

const INCOME_CATEGORIES: &[&str] = &[
    "Salary",
    "Freelancing",
    "Investment",
    "Gifts",
    OTHERS_CATEGORY,
];

/// Direction of a cash-flow event.
///
/// Only `Expense` and `Income` can be written. `Other` preserves whatever a
/// hand-edited ledger file contains so reads never reject an unknown label.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FlowType {
    Expense,
    Income,
    Other(String),
}

impl FlowType {
    pub fn as_str(&self) -> &str {
        match self {
            FlowType::Expense => "Expense",
            FlowType::Income => "Income",
            FlowType::Other(label) => label,
        }
    }

    /// Returns `true` for the two flow types accepted by the writer.
    pub fn is_writable(&self) -> bool {
        matches!(self, FlowType::Expense | FlowType::Income)
    }

    /// Categories offered for this flow type. Empty for unknown flow types.
    pub fn categories(&self) -> &'static [&'static str] {
        match self {
            FlowType::Expense => EXPENSE_CATEGORIES,
            FlowType::Income => INCOME_CATEGORIES,
            FlowType::Other(_) => &[],
        }
    }

    /// Returns `true` when `category` is one of the offered labels (exact match).
    pub fn offers_category(&self, category: &str) -> bool {
        self.categories().contains(&category)
    }
}

impl fmt::Display for FlowType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for FlowType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Expense" => FlowType::Expense,
            "Income" => FlowType::Income,
            _ => FlowType::Other(value),
        }
    }
}

impl From<FlowType> for String {
    fn from(value: FlowType) -> Self {
        match value {
            FlowType::Other(label) => label,
            known => known.as_str().to_string(),
        }
    }
}

impl FromStr for FlowType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(FlowType::from(s.to_string()))
    }
}

/// Returns `true` for the catch-all category labels that expect a description.
pub fn is_others_category(category: &str) -> bool {
    matches!(category, "Others" | "Other")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flow_type_parsing_is_case_sensitive() {
        assert_eq!(FlowType::from("Expense".to_string()), FlowType::Expense);
        assert_eq!(
            FlowType::from("expense".to_string()),
            FlowType::Other("expense".into())
        );
        assert!(!FlowType::Other("expense".into()).is_writable());
    }

    #[test]
    fn catalogs_follow_flow_type() {
        assert!(FlowType::Expense.offers_category("Food"));
        assert!(!FlowType::Expense.offers_category("Salary"));
        assert!(FlowType::Income.offers_category("Salary"));
        assert!(FlowType::Other("Transfer".into()).categories().is_empty());
    }

    #[test]
    fn others_matches_both_spellings() {
        assert!(is_others_category("Others"));
        assert!(is_others_category("Other"));
        assert!(!is_others_category("others"));
    }
}
