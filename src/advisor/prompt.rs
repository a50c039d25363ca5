//! Structured advice inputs and the natural-language prompts built from them.

use std::{fmt, str::FromStr};

use crate::errors::{CashFlowError, Result};

/// Anything that renders into a single advice prompt.
pub trait AdvicePrompt {
    fn build_prompt(&self) -> String;
}

/// Declares a closed set of form options with their display labels.
macro_rules! labeled_options {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $label:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn label(self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }

        impl FromStr for $name {
            type Err = CashFlowError;

            /// Matches labels case-insensitively, ignoring spaces, `-` and `_`.
            fn from_str(s: &str) -> Result<Self> {
                let wanted = normalize(s);
                $name::ALL
                    .iter()
                    .copied()
                    .find(|option| normalize(option.label()) == wanted)
                    .ok_or_else(|| {
                        let choices: Vec<_> = $name::ALL.iter().map(|o| o.label()).collect();
                        CashFlowError::validation(format!(
                            "unknown {} `{}` (expected one of: {})",
                            stringify!($name),
                            s.trim(),
                            choices.join(", ")
                        ))
                    })
            }
        }
    };
}

fn normalize(value: &str) -> String {
    value
        .chars()
        .filter(|ch| !matches!(ch, ' ' | '-' | '_'))
        .flat_map(char::to_lowercase)
        .collect()
}

labeled_options!(
    /// Additional income sources offered on the tax form.
    IncomeSource {
        Freelancing => "Freelancing",
        Investment => "Investment",
        Other => "Other",
    }
);

labeled_options!(FilingStatus {
    Single => "Single",
    MarriedFilingJointly => "Married Filing Jointly",
    MarriedFilingSeparately => "Married Filing Separately",
    HeadOfHousehold => "Head of Household",
});

labeled_options!(TaxCredit {
    ChildTaxCredit => "Child Tax Credit",
    EducationCredit => "Education Credit",
    RetirementSavingsContributionCredit => "Retirement Savings Contribution Credit",
    Other => "Other",
});

labeled_options!(RiskTolerance {
    Low => "Low",
    Moderate => "Moderate",
    High => "High",
});

labeled_options!(InvestmentGoal {
    Retirement => "Retirement",
    BuyingAHouse => "Buying a House",
    Education => "Education",
    Vacation => "Vacation",
    EmergencyFund => "Emergency Fund",
    Other => "Other",
});

impl Default for FilingStatus {
    fn default() -> Self {
        FilingStatus::Single
    }
}

impl Default for RiskTolerance {
    fn default() -> Self {
        RiskTolerance::Low
    }
}

pub const MIN_HORIZON_YEARS: u8 = 1;
pub const MAX_HORIZON_YEARS: u8 = 30;

fn join_labels<T: fmt::Display>(items: &[T]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Inputs of the tax planning form. Amounts are whole currency units.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaxProfile {
    pub annual_income: u64,
    pub income_sources: Vec<IncomeSource>,
    pub medical_expenses: u64,
    pub mortgage_interest: u64,
    pub charitable_contributions: u64,
    pub filing_status: FilingStatus,
    pub credits: Vec<TaxCredit>,
    pub specific_questions: String,
}

impl AdvicePrompt for TaxProfile {
    fn build_prompt(&self) -> String {
        format!(
            "So based on these given data generate me a tax planning advice, assuming I'm an Indian. \
             Annual Income: {}, Income Sources: {}, \
             Deductions: Medical Expenses: {}, Mortgage Interest: {}, \
             Charitable Contributions: {}, Filing Status: {}, \
             Tax Credits: {}, Specific Questions: {}, ",
            self.annual_income,
            join_labels(&self.income_sources),
            self.medical_expenses,
            self.mortgage_interest,
            self.charitable_contributions,
            self.filing_status,
            join_labels(&self.credits),
            self.specific_questions,
        )
    }
}

/// Inputs of the investment preferences form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvestmentProfile {
    pub risk_tolerance: RiskTolerance,
    pub horizon_years: u8,
    pub goals: Vec<InvestmentGoal>,
    pub initial_investment: u64,
    pub monthly_contribution: u64,
}

impl Default for InvestmentProfile {
    fn default() -> Self {
        Self {
            risk_tolerance: RiskTolerance::default(),
            horizon_years: MIN_HORIZON_YEARS,
            goals: Vec::new(),
            initial_investment: 0,
            monthly_contribution: 0,
        }
    }
}

impl InvestmentProfile {
    pub fn validate(&self) -> Result<()> {
        if !(MIN_HORIZON_YEARS..=MAX_HORIZON_YEARS).contains(&self.horizon_years) {
            return Err(CashFlowError::validation(format!(
                "investment horizon must be between {MIN_HORIZON_YEARS} and {MAX_HORIZON_YEARS} years"
            )));
        }
        Ok(())
    }
}

impl AdvicePrompt for InvestmentProfile {
    fn build_prompt(&self) -> String {
        format!(
            "So based on these given data generate me an investing advice, assuming I'm an Indian. \
             Risk Tolerance: {}, Investment Horizon: {}, \
             Investment Goals: {}, Initial Investment: {}, \
             Monthly Contribution: {}",
            self.risk_tolerance,
            self.horizon_years,
            join_labels(&self.goals),
            self.initial_investment,
            self.monthly_contribution,
        )
    }
}
