use std::str::FromStr;

use dialoguer::{Input, MultiSelect, Select};

use crate::advisor::{
    request_advice, AdvicePrompt, FilingStatus, IncomeSource, InvestmentGoal, InvestmentProfile,
    RiskTolerance, TaxCredit, TaxProfile,
};
use crate::cli::context::{CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::errors::CashFlowError;

const TAX_KEYS: &[&str] = &[
    "income",
    "sources",
    "medical",
    "mortgage",
    "charity",
    "status",
    "credits",
    "questions",
];
const INVEST_KEYS: &[&str] = &["risk", "horizon", "goals", "initial", "monthly"];

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "tax",
            "Ask for tax planning advice",
            "tax [income=N] [sources=a,b] [medical=N] [mortgage=N] [charity=N] [status=S] [credits=a,b] [questions=TEXT]",
            cmd_tax,
        ),
        CommandEntry::new(
            "invest",
            "Ask for investment advice",
            "invest [risk=low|moderate|high] [horizon=1-30] [goals=a,b] [initial=N] [monthly=N]",
            cmd_invest,
        ),
        CommandEntry::new(
            "prompt",
            "Print the advice prompt without sending it",
            "prompt <tax|invest> [key=value...]",
            cmd_prompt,
        ),
    ]
}

fn cmd_tax(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let profile = if args.is_empty() && context.is_interactive() {
        tax_form(context)?
    } else {
        tax_profile_from_args(args)?
    };
    ask(context, &profile)
}

fn cmd_invest(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let profile = if args.is_empty() && context.is_interactive() {
        invest_form(context)?
    } else {
        invest_profile_from_args(args)?
    };
    ask(context, &profile)
}

fn cmd_prompt(_context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some((kind, rest)) = args.split_first() else {
        return Err(CommandError::InvalidArguments(
            "usage: prompt <tax|invest> [key=value...]".into(),
        ));
    };
    let prompt = match kind.to_ascii_lowercase().as_str() {
        "tax" => tax_profile_from_args(rest)?.build_prompt(),
        "invest" => invest_profile_from_args(rest)?.build_prompt(),
        other => {
            return Err(CommandError::InvalidArguments(format!(
                "unknown prompt kind `{other}` (expected tax or invest)"
            )))
        }
    };
    println!("{prompt}");
    Ok(())
}

fn ask(context: &ShellContext, inputs: &dyn AdvicePrompt) -> CommandResult {
    output::info("Generating response... Please wait.");
    let answer = request_advice(context.advisor.as_ref(), inputs)?;
    output::section("Advice");
    println!("{answer}");
    Ok(())
}

/// Splits `key=value` arguments, rejecting keys outside `allowed`.
fn parse_pairs<'a>(
    args: &[&'a str],
    allowed: &[&str],
) -> Result<Vec<(String, &'a str)>, CommandError> {
    args.iter()
        .copied()
        .map(|arg| {
            let (key, value) = arg.split_once('=').ok_or_else(|| {
                CommandError::InvalidArguments(format!("expected key=value, got `{arg}`"))
            })?;
            let key = key.trim().to_ascii_lowercase();
            if !allowed.contains(&key.as_str()) {
                return Err(CommandError::InvalidArguments(format!(
                    "unknown field `{key}` (expected one of: {})",
                    allowed.join(", ")
                )));
            }
            Ok((key, value))
        })
        .collect()
}

fn parse_whole<T: FromStr>(key: &str, value: &str) -> Result<T, CommandError> {
    value.trim().parse().map_err(|_| {
        CommandError::InvalidArguments(format!("`{key}` expects a whole number, got `{value}`"))
    })
}

fn parse_list<T>(value: &str) -> Result<Vec<T>, CommandError>
where
    T: FromStr<Err = CashFlowError>,
{
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(|item| item.parse().map_err(CommandError::from))
        .collect()
}

pub(crate) fn tax_profile_from_args(args: &[&str]) -> Result<TaxProfile, CommandError> {
    let mut profile = TaxProfile::default();
    for (key, value) in parse_pairs(args, TAX_KEYS)? {
        match key.as_str() {
            "income" => profile.annual_income = parse_whole(&key, value)?,
            "sources" => profile.income_sources = parse_list(value)?,
            "medical" => profile.medical_expenses = parse_whole(&key, value)?,
            "mortgage" => profile.mortgage_interest = parse_whole(&key, value)?,
            "charity" => profile.charitable_contributions = parse_whole(&key, value)?,
            "status" => profile.filing_status = value.parse()?,
            "credits" => profile.credits = parse_list(value)?,
            _ => profile.specific_questions = value.to_string(),
        }
    }
    Ok(profile)
}

pub(crate) fn invest_profile_from_args(args: &[&str]) -> Result<InvestmentProfile, CommandError> {
    let mut profile = InvestmentProfile::default();
    for (key, value) in parse_pairs(args, INVEST_KEYS)? {
        match key.as_str() {
            "risk" => profile.risk_tolerance = value.parse()?,
            "horizon" => profile.horizon_years = parse_whole(&key, value)?,
            "goals" => profile.goals = parse_list(value)?,
            "initial" => profile.initial_investment = parse_whole(&key, value)?,
            _ => profile.monthly_contribution = parse_whole(&key, value)?,
        }
    }
    profile.validate()?;
    Ok(profile)
}

fn labels<T: Copy>(options: &[T], label: fn(T) -> &'static str) -> Vec<&'static str> {
    options.iter().copied().map(label).collect()
}

fn amount_input(context: &ShellContext, prompt: &str) -> Result<u64, CommandError> {
    Ok(Input::<u64>::with_theme(&context.theme)
        .with_prompt(prompt)
        .default(0)
        .interact_text()?)
}

fn pick_many<T: Copy>(
    context: &ShellContext,
    prompt: &str,
    options: &[T],
    label: fn(T) -> &'static str,
) -> Result<Vec<T>, CommandError> {
    let picked = MultiSelect::with_theme(&context.theme)
        .with_prompt(prompt)
        .items(&labels(options, label))
        .interact()?;
    Ok(picked.into_iter().map(|index| options[index]).collect())
}

fn pick_one<T: Copy>(
    context: &ShellContext,
    prompt: &str,
    options: &[T],
    label: fn(T) -> &'static str,
) -> Result<T, CommandError> {
    let index = Select::with_theme(&context.theme)
        .with_prompt(prompt)
        .items(&labels(options, label))
        .default(0)
        .interact()?;
    Ok(options[index])
}

fn tax_form(context: &ShellContext) -> Result<TaxProfile, CommandError> {
    output::section("Tax Planning");
    Ok(TaxProfile {
        annual_income: amount_input(context, "Annual Income")?,
        income_sources: pick_many(
            context,
            "Additional Income Sources",
            IncomeSource::ALL,
            IncomeSource::label,
        )?,
        medical_expenses: amount_input(context, "Medical Expenses")?,
        mortgage_interest: amount_input(context, "Mortgage Interest")?,
        charitable_contributions: amount_input(context, "Charitable Contributions")?,
        filing_status: pick_one(
            context,
            "Filing Status",
            FilingStatus::ALL,
            FilingStatus::label,
        )?,
        credits: pick_many(context, "Tax Credits", TaxCredit::ALL, TaxCredit::label)?,
        specific_questions: Input::<String>::with_theme(&context.theme)
            .with_prompt("Any specific tax questions or concerns?")
            .allow_empty(true)
            .interact_text()?,
    })
}

fn invest_form(context: &ShellContext) -> Result<InvestmentProfile, CommandError> {
    output::section("Investment Preferences");
    let risk_tolerance = pick_one(
        context,
        "Risk Tolerance",
        RiskTolerance::ALL,
        RiskTolerance::label,
    )?;
    let horizon_years = Input::<u8>::with_theme(&context.theme)
        .with_prompt("Investment Horizon (years, 1-30)")
        .default(1)
        .validate_with(|value: &u8| -> Result<(), &str> {
            if (1..=30).contains(value) {
                Ok(())
            } else {
                Err("Horizon must be between 1 and 30 years")
            }
        })
        .interact_text()?;
    let profile = InvestmentProfile {
        risk_tolerance,
        horizon_years,
        goals: pick_many(
            context,
            "Investment Goals",
            InvestmentGoal::ALL,
            InvestmentGoal::label,
        )?,
        initial_investment: amount_input(context, "Initial Investment Amount")?,
        monthly_contribution: amount_input(context, "Monthly Contribution")?,
    };
    profile.validate()?;
    Ok(profile)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands::test_support::{context_with, ScriptedAdvisor};

    #[test]
    fn tax_arguments_fill_the_profile() {
        let profile = tax_profile_from_args(&[
            "income=900000",
            "sources=freelancing, investment",
            "status=head-of-household",
            "credits=education credit",
            "questions=Old or new regime?",
        ])
        .unwrap();
        assert_eq!(profile.annual_income, 900_000);
        assert_eq!(
            profile.income_sources,
            vec![IncomeSource::Freelancing, IncomeSource::Investment]
        );
        assert_eq!(profile.filing_status, FilingStatus::HeadOfHousehold);
        assert_eq!(profile.credits, vec![TaxCredit::EducationCredit]);
        assert_eq!(profile.specific_questions, "Old or new regime?");
        assert_eq!(profile.medical_expenses, 0);
    }

    #[test]
    fn malformed_arguments_are_rejected() {
        assert!(tax_profile_from_args(&["income"]).is_err());
        assert!(tax_profile_from_args(&["salary=10"]).is_err());
        assert!(tax_profile_from_args(&["income=-5"]).is_err());
        assert!(invest_profile_from_args(&["horizon=31"]).is_err());
        assert!(invest_profile_from_args(&["risk=reckless"]).is_err());
    }

    #[test]
    fn invest_sends_one_prompt_and_prints_answer() {
        let advisor = ScriptedAdvisor::default();
        let prompts = advisor.prompts.clone();
        let (mut ctx, _dir) = context_with(advisor);

        cmd_invest(
            &mut ctx,
            &["risk=high", "horizon=12", "goals=retirement", "monthly=2000"],
        )
        .unwrap();

        let sent = prompts.borrow();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].contains("Risk Tolerance: High, Investment Horizon: 12"));
        assert!(sent[0].ends_with("Monthly Contribution: 2000"));
    }

    #[test]
    fn service_failure_becomes_command_error() {
        let advisor = ScriptedAdvisor {
            failure: Some("quota exceeded".into()),
            ..ScriptedAdvisor::default()
        };
        let (mut ctx, _dir) = context_with(advisor);
        let err = cmd_tax(&mut ctx, &["income=10"]).unwrap_err();
        assert!(err.to_string().contains("quota exceeded"));
    }

    #[test]
    fn prompt_command_does_not_call_the_service() {
        let advisor = ScriptedAdvisor::default();
        let prompts = advisor.prompts.clone();
        let (mut ctx, _dir) = context_with(advisor);
        cmd_prompt(&mut ctx, &["tax", "income=100"]).unwrap();
        assert!(cmd_prompt(&mut ctx, &["budget"]).is_err());
        assert!(prompts.borrow().is_empty());
    }
}
