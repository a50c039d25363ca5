use chrono::NaiveDate;
use dialoguer::Input;

use crate::cli::context::{CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::cli::table::{format_amount, render_breakdown, render_records};
use crate::ledger::{
    aggregate_expenses_by_category, dates::parse_date, is_others_category, summarize,
    CashFlowEntry, CashFlowRecord, FlowType,
};
use crate::storage::SkippedRow;

const EXPENSE_USAGE: &str = "expense <amount> [date] <category> [description]";
const INCOME_USAGE: &str = "income <amount> [date] <source> [description]";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new("expense", "Log an expense", EXPENSE_USAGE, cmd_expense),
        CommandEntry::new("income", "Log income", INCOME_USAGE, cmd_income),
        CommandEntry::new(
            "month",
            "Show the current month's cash flow",
            "month",
            cmd_month,
        ),
        CommandEntry::new(
            "breakdown",
            "Chart this month's expenses by category",
            "breakdown",
            cmd_breakdown,
        ),
        CommandEntry::new(
            "summary",
            "Show this month's income, expenses and net",
            "summary",
            cmd_summary,
        ),
        CommandEntry::new(
            "categories",
            "List the offered categories",
            "categories",
            cmd_categories,
        ),
    ]
}

fn cmd_expense(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    log_flow(context, args, FlowType::Expense)
}

fn cmd_income(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    log_flow(context, args, FlowType::Income)
}

fn log_flow(context: &mut ShellContext, args: &[&str], flow_type: FlowType) -> CommandResult {
    let mut entry = parse_flow_args(args, &flow_type, context.today())?;

    if !flow_type.offers_category(&entry.category) {
        output::warning(format!(
            "`{}` is not one of the offered categories; logging it anyway.",
            entry.category
        ));
    }

    if is_others_category(&entry.category) {
        if entry.description.is_empty() && context.is_interactive() {
            let label = match flow_type {
                FlowType::Income => "Specify the Source",
                _ => "Specify the Category",
            };
            entry.description = Input::<String>::with_theme(&context.theme)
                .with_prompt(label)
                .allow_empty(true)
                .interact_text()?;
        }
    } else if !entry.description.is_empty() {
        output::warning("Descriptions are only kept for the Others category; ignoring it.");
        entry.description.clear();
    }

    let record = context.writer.append(entry)?;
    let preposition = if record.is_income() { "from" } else { "for" };
    output::success(format!(
        "Logged: {} {preposition} {} on {}",
        format_amount(context.currency(), record.amount),
        record.category,
        record.date
    ));
    Ok(())
}

/// Parses `<amount> [date] <category> [description...]`; the date defaults to `today`.
pub(crate) fn parse_flow_args(
    args: &[&str],
    flow_type: &FlowType,
    today: NaiveDate,
) -> Result<CashFlowEntry, CommandError> {
    let usage = match flow_type {
        FlowType::Income => INCOME_USAGE,
        _ => EXPENSE_USAGE,
    };
    let missing = || CommandError::InvalidArguments(format!("usage: {usage}"));

    let (raw_amount, rest) = args.split_first().ok_or_else(missing)?;
    let amount = parse_amount(raw_amount)?;

    let (date, rest) = match rest.first().and_then(|raw| parse_date(raw)) {
        Some(date) => (date, &rest[1..]),
        None => (today, rest),
    };

    let (raw_category, rest) = rest.split_first().ok_or_else(missing)?;
    let category = canonical_category(flow_type, raw_category);

    Ok(CashFlowEntry::new(amount, date, category, flow_type.clone())
        .with_description(rest.join(" ")))
}

/// Zero is refused here as well, although the ledger itself accepts it.
fn parse_amount(raw: &str) -> Result<f64, CommandError> {
    let amount: f64 = raw
        .trim()
        .parse()
        .map_err(|_| CommandError::InvalidArguments(format!("`{raw}` is not a valid amount")))?;
    if !amount.is_finite() || amount <= 0.0 {
        return Err(CommandError::InvalidArguments(
            "Please enter a valid amount.".to_string(),
        ));
    }
    Ok(amount)
}

fn canonical_category(flow_type: &FlowType, raw: &str) -> String {
    let raw = raw.trim();
    flow_type
        .categories()
        .iter()
        .find(|offered| offered.eq_ignore_ascii_case(raw))
        .map(|offered| offered.to_string())
        .unwrap_or_else(|| raw.to_string())
}

fn report_skipped(skipped: &[SkippedRow]) {
    for row in skipped {
        output::warning(format!("Skipped ledger line {}: {}", row.line, row.reason));
    }
}

fn print_breakdown(context: &ShellContext, records: &[CashFlowRecord]) {
    let totals = aggregate_expenses_by_category(records);
    if totals.is_empty() {
        output::info("No expenses logged for this month.");
    } else {
        print!("{}", render_breakdown(&totals, context.currency()));
    }
}

fn cmd_month(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let snapshot = context.reader.load_current_month_with_report()?;
    report_skipped(&snapshot.skipped);

    output::section("Current Month's Cash Flow");
    if snapshot.records.is_empty() {
        output::info("No cash flow data available for the current month.");
        return Ok(());
    }
    print!("{}", render_records(&snapshot.records, context.currency()));

    output::section("Expense Breakdown by Category");
    print_breakdown(context, &snapshot.records);
    Ok(())
}

fn cmd_breakdown(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let snapshot = context.reader.load_current_month_with_report()?;
    report_skipped(&snapshot.skipped);
    output::section("Expense Breakdown by Category");
    print_breakdown(context, &snapshot.records);
    Ok(())
}

fn cmd_summary(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let snapshot = context.reader.load_current_month_with_report()?;
    report_skipped(&snapshot.skipped);
    let summary = summarize(&snapshot.records);
    let symbol = context.currency();

    output::section(format!("Summary for {}", context.today().format("%B %Y")));
    output::two_column(&[
        ("Income", format_amount(symbol, summary.income)),
        ("Expenses", format_amount(symbol, summary.expenses)),
        ("Net", format_signed(symbol, summary.net())),
        ("Records", summary.record_count.to_string()),
    ]);
    Ok(())
}

fn format_signed(symbol: &str, amount: f64) -> String {
    if amount < 0.0 {
        format!("-{}", format_amount(symbol, -amount))
    } else {
        format_amount(symbol, amount)
    }
}

fn cmd_categories(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    for (title, flow_type) in [
        ("Expense categories", FlowType::Expense),
        ("Income sources", FlowType::Income),
    ] {
        output::section(title);
        for category in flow_type.categories() {
            output::info(format!("  {category}"));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands::test_support::{context, today};

    #[test]
    fn date_is_optional_and_description_joined() {
        let entry = parse_flow_args(&["250", "Others", "bike", "repair"], &FlowType::Expense, today())
            .unwrap();
        assert_eq!(entry.amount, 250.0);
        assert_eq!(entry.date, today());
        assert_eq!(entry.category, "Others");
        assert_eq!(entry.description, "bike repair");

        let dated = parse_flow_args(&["90", "2024-08-01", "salary"], &FlowType::Income, today())
            .unwrap();
        assert_eq!(dated.date, NaiveDate::from_ymd_opt(2024, 8, 1).unwrap());
        assert_eq!(dated.category, "Salary");
    }

    #[test]
    fn zero_and_garbage_amounts_are_refused() {
        let err = parse_flow_args(&["0", "Food"], &FlowType::Expense, today()).unwrap_err();
        assert_eq!(err.to_string(), "Please enter a valid amount.");
        assert!(parse_flow_args(&["ten", "Food"], &FlowType::Expense, today()).is_err());
        assert!(parse_flow_args(&["10"], &FlowType::Expense, today()).is_err());
    }

    #[test]
    fn expense_command_appends_to_ledger() {
        let (mut ctx, _dir) = context();
        cmd_expense(&mut ctx, &["120", "food"]).unwrap();
        cmd_income(&mut ctx, &["5000", "Salary", "ignored"]).unwrap();

        let records = ctx.reader.load_all().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].category, "Food");
        assert!(records[0].is_expense());
        assert_eq!(records[1].description, "");
        assert!(ctx.ledger_path.is_file());
    }

    #[test]
    fn rejected_input_leaves_no_ledger() {
        let (mut ctx, _dir) = context();
        assert!(cmd_expense(&mut ctx, &["-1", "Food"]).is_err());
        assert!(!ctx.ledger_path.exists());
    }

    #[test]
    fn views_handle_an_empty_ledger() {
        let (mut ctx, _dir) = context();
        cmd_month(&mut ctx, &[]).unwrap();
        cmd_breakdown(&mut ctx, &[]).unwrap();
        cmd_summary(&mut ctx, &[]).unwrap();
    }

    #[test]
    fn net_keeps_its_sign() {
        assert_eq!(format_signed("₹", -40.0), "-₹40");
        assert_eq!(format_signed("₹", 12.5), "₹12.50");
    }
}
