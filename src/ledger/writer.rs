//! Append side of the ledger.

use std::sync::Arc;

use tracing::info;

use crate::{errors::Result, storage::CashFlowStore};

use super::record::{CashFlowEntry, CashFlowRecord};

/// Validates entries and appends them to storage, one row per call.
#[derive(Clone)]
pub struct LedgerWriter {
    storage: Arc<dyn CashFlowStore>,
}

impl LedgerWriter {
    pub fn new(storage: Arc<dyn CashFlowStore>) -> Self {
        Self { storage }
    }

    /// Validates `entry` and appends it.
    ///
    /// Validation failures are returned before storage is touched, so a
    /// rejected entry never creates or modifies the ledger.
    pub fn append(&self, entry: CashFlowEntry) -> Result<CashFlowRecord> {
        let record = entry.validate()?;
        self.storage.append(&record)?;
        info!(
            amount = record.amount,
            date = %record.date,
            category = %record.category,
            flow_type = %record.flow_type,
            "logged cash flow"
        );
        Ok(record)
    }
}
