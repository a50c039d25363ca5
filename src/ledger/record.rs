//! Ledger rows and the input struct used to create them.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::{CashFlowError, Result};

use super::flow::FlowType;

/// One logged income or expense event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashFlowRecord {
    pub amount: f64,
    pub date: NaiveDate,
    pub category: String,
    pub flow_type: FlowType,
    #[serde(default)]
    pub description: String,
}

impl CashFlowRecord {
    pub fn is_expense(&self) -> bool {
        self.flow_type == FlowType::Expense
    }

    pub fn is_income(&self) -> bool {
        self.flow_type == FlowType::Income
    }

    /// Returns `true` when the record falls in the same calendar month and year as `reference`.
    pub fn in_month_of(&self, reference: NaiveDate) -> bool {
        use chrono::Datelike;
        self.date.year() == reference.year() && self.date.month() == reference.month()
    }
}

/// Caller-supplied values for a new ledger row.
#[derive(Debug, Clone, PartialEq)]
pub struct CashFlowEntry {
    pub amount: f64,
    pub date: NaiveDate,
    pub category: String,
    pub flow_type: FlowType,
    pub description: String,
}

impl CashFlowEntry {
    pub fn new(
        amount: f64,
        date: NaiveDate,
        category: impl Into<String>,
        flow_type: FlowType,
    ) -> Self {
        Self {
            amount,
            date,
            category: category.into(),
            flow_type,
            description: String::new(),
        }
    }

    pub fn expense(amount: f64, date: NaiveDate, category: impl Into<String>) -> Self {
        Self::new(amount, date, category, FlowType::Expense)
    }

    pub fn income(amount: f64, date: NaiveDate, category: impl Into<String>) -> Self {
        Self::new(amount, date, category, FlowType::Income)
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Checks write-time preconditions and produces the record to persist.
    pub fn validate(self) -> Result<CashFlowRecord> {
        if !self.amount.is_finite() {
            return Err(CashFlowError::validation("amount must be a finite number"));
        }
        if self.amount < 0.0 {
            return Err(CashFlowError::validation(format!(
                "amount must not be negative (got {})",
                self.amount
            )));
        }
        if self.category.trim().is_empty() {
            return Err(CashFlowError::validation("category must not be empty"));
        }
        if !self.flow_type.is_writable() {
            return Err(CashFlowError::validation(format!(
                "flow type must be Expense or Income (got `{}`)",
                self.flow_type
            )));
        }
        Ok(CashFlowRecord {
            // Adding +0.0 turns -0.0 into 0.0 so no sign reaches the ledger.
            amount: self.amount + 0.0,
            date: self.date,
            category: self.category,
            flow_type: self.flow_type,
            description: self.description,
        })
    }
}
