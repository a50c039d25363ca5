//! Plain-text rendering of ledger rows and category totals.

use std::collections::BTreeMap;

use crate::{
    ledger::{dates::format_date, CashFlowRecord},
    storage::LEDGER_HEADER,
};

const BAR_WIDTH: usize = 30;
const BAR_CHAR: char = '█';

pub fn format_amount(symbol: &str, amount: f64) -> String {
    if amount.fract() == 0.0 {
        format!("{symbol}{amount:.0}")
    } else {
        format!("{symbol}{amount:.2}")
    }
}

/// Renders records as a left-aligned table using the ledger's column names.
pub fn render_records(records: &[CashFlowRecord], symbol: &str) -> String {
    let rows: Vec<[String; 5]> = records
        .iter()
        .map(|record| {
            [
                format_amount(symbol, record.amount),
                format_date(record.date),
                record.category.clone(),
                record.flow_type.to_string(),
                record.description.replace('\n', " "),
            ]
        })
        .collect();

    let mut widths = LEDGER_HEADER.map(|title| title.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_row(&mut out, LEDGER_HEADER.iter().copied(), &widths);
    let rule: Vec<String> = widths.iter().map(|width| "-".repeat(*width)).collect();
    push_row(&mut out, rule.iter().map(String::as_str), &widths);
    for row in &rows {
        push_row(&mut out, row.iter().map(String::as_str), &widths);
    }
    out
}

fn push_row<'a>(out: &mut String, cells: impl Iterator<Item = &'a str>, widths: &[usize]) {
    let line: Vec<String> = cells
        .zip(widths)
        .map(|(cell, width)| {
            let pad = width.saturating_sub(cell.chars().count());
            format!("{cell}{}", " ".repeat(pad))
        })
        .collect();
    out.push_str(line.join("  ").trim_end());
    out.push('\n');
}

/// Renders category totals as a horizontal bar chart scaled to the largest total.
pub fn render_breakdown(totals: &BTreeMap<String, f64>, symbol: &str) -> String {
    let label_width = totals.keys().map(|k| k.chars().count()).max().unwrap_or(0);
    let max = totals.values().copied().fold(0.0_f64, f64::max);
    let mut out = String::new();
    for (category, total) in totals {
        let bar_len = if max > 0.0 {
            ((total / max) * BAR_WIDTH as f64).round() as usize
        } else {
            0
        };
        let pad = label_width.saturating_sub(category.chars().count());
        out.push_str(&format!(
            "{category}{}  {} {}\n",
            " ".repeat(pad),
            BAR_CHAR.to_string().repeat(bar_len),
            format_amount(symbol, *total)
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::ledger::FlowType;

    #[test]
    fn amounts_drop_zero_fraction() {
        assert_eq!(format_amount("₹", 150.0), "₹150");
        assert_eq!(format_amount("$", 12.5), "$12.50");
    }

    #[test]
    fn table_has_header_rule_and_rows() {
        let records = vec![CashFlowRecord {
            amount: 100.0,
            date: NaiveDate::from_ymd_opt(2024, 7, 4).unwrap(),
            category: "Others".into(),
            flow_type: FlowType::Expense,
            description: "Gift\nwrap".into(),
        }];
        let table = render_records(&records, "₹");
        let lines: Vec<_> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Amount"));
        assert!(lines[1].starts_with("------"));
        assert!(lines[2].contains("2024-07-04"));
        assert!(lines[2].ends_with("Gift wrap"));
    }

    #[test]
    fn largest_category_gets_full_bar() {
        let totals = BTreeMap::from([("Food".to_string(), 150.0), ("Travel".to_string(), 30.0)]);
        let chart = render_breakdown(&totals, "₹");
        let lines: Vec<_> = chart.lines().collect();
        assert_eq!(lines[0].matches(BAR_CHAR).count(), BAR_WIDTH);
        assert_eq!(lines[1].matches(BAR_CHAR).count(), 6);
        assert!(lines[1].starts_with("Travel"));
        assert!(lines[1].ends_with("₹30"));
    }
}
