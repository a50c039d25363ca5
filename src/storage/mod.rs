//! Persistence backends for the cash-flow ledger.

pub mod csv_backend;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{errors::Result, ledger::CashFlowRecord};

pub use csv_backend::{CsvLedgerStorage, LEDGER_HEADER};

/// How a load reacts to a row whose amount or date cannot be decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParsePolicy {
    /// The first malformed row fails the whole load.
    #[default]
    Strict,
    /// Malformed rows are skipped and reported.
    Lenient,
}

impl fmt::Display for ParsePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ParsePolicy::Strict => "strict",
            ParsePolicy::Lenient => "lenient",
        };
        f.write_str(label)
    }
}

/// A row left out of a lenient load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRow {
    pub line: u64,
    pub reason: String,
}

/// Every decodable row of the ledger, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct LedgerSnapshot {
    pub records: Vec<CashFlowRecord>,
    pub skipped: Vec<SkippedRow>,
}

/// Append-only storage for ledger rows.
///
/// Implementations hold no cached state: every `load` reads the medium again.
pub trait CashFlowStore: Send + Sync {
    /// Durably appends one row, creating the medium (and its header) if absent.
    fn append(&self, record: &CashFlowRecord) -> Result<()>;

    /// Reads the whole ledger. A missing medium yields an empty snapshot.
    fn load(&self, policy: ParsePolicy) -> Result<LedgerSnapshot>;
}
