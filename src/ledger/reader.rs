//! Read side of the ledger: full loads and the current-month view.

use std::{collections::BTreeMap, sync::Arc};

use tracing::debug;

use crate::{
    errors::Result,
    storage::{CashFlowStore, LedgerSnapshot, ParsePolicy},
    time::{Clock, SystemClock},
};

use super::{
    record::CashFlowRecord,
    summary::{aggregate_expenses_by_category, summarize, MonthlySummary},
};

/// Reloads the ledger from storage on every call; nothing is cached.
#[derive(Clone)]
pub struct LedgerReader {
    storage: Arc<dyn CashFlowStore>,
    clock: Arc<dyn Clock>,
    policy: ParsePolicy,
}

impl LedgerReader {
    pub fn new(storage: Arc<dyn CashFlowStore>) -> Self {
        Self {
            storage,
            clock: Arc::new(SystemClock),
            policy: ParsePolicy::default(),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_policy(mut self, policy: ParsePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> ParsePolicy {
        self.policy
    }

    /// Loads every row, including those skipped under the lenient policy.
    pub fn load_all_with_report(&self) -> Result<LedgerSnapshot> {
        self.storage.load(self.policy)
    }

    /// Loads every row in insertion order.
    pub fn load_all(&self) -> Result<Vec<CashFlowRecord>> {
        Ok(self.load_all_with_report()?.records)
    }

    /// Returns the rows dated in the clock's current month and year, in insertion order.
    ///
    /// The month is taken at call time, so two calls spanning a month boundary
    /// can disagree.
    pub fn load_current_month(&self) -> Result<Vec<CashFlowRecord>> {
        Ok(self.load_current_month_with_report()?.records)
    }

    /// Current-month rows plus every row the lenient policy skipped, whatever its month.
    pub fn load_current_month_with_report(&self) -> Result<LedgerSnapshot> {
        let today = self.clock.today();
        let mut snapshot = self.load_all_with_report()?;
        snapshot.records.retain(|record| record.in_month_of(today));
        debug!(%today, count = snapshot.records.len(), "loaded current month");
        Ok(snapshot)
    }

    /// Per-category expense totals for the current month.
    pub fn current_month_expenses_by_category(&self) -> Result<BTreeMap<String, f64>> {
        Ok(aggregate_expenses_by_category(&self.load_current_month()?))
    }

    pub fn current_month_summary(&self) -> Result<MonthlySummary> {
        Ok(summarize(&self.load_current_month()?))
    }
}
