//! Aggregations over a slice of ledger records.

use std::collections::BTreeMap;

use super::record::CashFlowRecord;

/// Sums expense amounts per category.
///
/// Grouping uses the exact category string. Records of any other flow type are ignored.
/// An empty map means there is nothing to chart.
pub fn aggregate_expenses_by_category(records: &[CashFlowRecord]) -> BTreeMap<String, f64> {
    records
        .iter()
        .filter(|record| record.is_expense())
        .fold(BTreeMap::new(), |mut totals, record| {
            *totals.entry(record.category.clone()).or_insert(0.0) += record.amount;
            totals
        })
}

/// Income and expense totals for a set of records.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MonthlySummary {
    pub income: f64,
    pub expenses: f64,
    pub record_count: usize,
}

impl MonthlySummary {
    pub fn net(&self) -> f64 {
        self.income - self.expenses
    }
}

/// Totals records by flow type; unknown flow types only count towards `record_count`.
pub fn summarize(records: &[CashFlowRecord]) -> MonthlySummary {
    records
        .iter()
        .fold(MonthlySummary::default(), |mut summary, record| {
            if record.is_income() {
                summary.income += record.amount;
            } else if record.is_expense() {
                summary.expenses += record.amount;
            }
            summary.record_count += 1;
            summary
        })
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::ledger::FlowType;

    fn record(amount: f64, flow_type: FlowType, category: &str) -> CashFlowRecord {
        CashFlowRecord {
            amount,
            date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            category: category.into(),
            flow_type,
            description: String::new(),
        }
    }

    fn sample() -> Vec<CashFlowRecord> {
        vec![
            record(100.0, FlowType::Expense, "Food"),
            record(50.0, FlowType::Expense, "Food"),
            record(30.0, FlowType::Expense, "Travel"),
            record(20.0, FlowType::Income, "Salary"),
        ]
    }

    #[test]
    fn expenses_are_grouped_by_category() {
        let totals = aggregate_expenses_by_category(&sample());
        assert_eq!(totals.len(), 2);
        assert_eq!(totals.get("Food"), Some(&150.0));
        assert_eq!(totals.get("Travel"), Some(&30.0));
        assert!(!totals.contains_key("Salary"));
    }

    #[test]
    fn grouping_is_case_sensitive() {
        let records = vec![
            record(1.0, FlowType::Expense, "Food"),
            record(2.0, FlowType::Expense, "food"),
        ];
        let totals = aggregate_expenses_by_category(&records);
        assert_eq!(totals.len(), 2);
    }

    #[test]
    fn no_expenses_yields_empty_map() {
        let records = vec![
            record(20.0, FlowType::Income, "Salary"),
            record(5.0, FlowType::Other("Transfer".into()), "Food"),
        ];
        assert!(aggregate_expenses_by_category(&records).is_empty());
        assert!(aggregate_expenses_by_category(&[]).is_empty());
    }

    #[test]
    fn summary_totals_and_net() {
        let mut records = sample();
        records.push(record(9.0, FlowType::Other("Transfer".into()), "Misc"));
        let summary = summarize(&records);
        assert_eq!(summary.income, 20.0);
        assert_eq!(summary.expenses, 180.0);
        assert_eq!(summary.net(), -160.0);
        assert_eq!(summary.record_count, 5);
    }
}
