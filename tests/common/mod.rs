#![allow(dead_code)]

use std::{path::Path, sync::Arc};

use cashflow_advisor::{
    ledger::{LedgerReader, LedgerWriter},
    storage::{CashFlowStore, CsvLedgerStorage},
    time::FixedClock,
};
use chrono::NaiveDate;

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// Writer and reader over `<dir>/cash_flow.csv`, with the reader pinned to `today`.
pub fn open_ledger(dir: &Path, today: NaiveDate) -> (LedgerWriter, LedgerReader) {
    let storage: Arc<dyn CashFlowStore> = Arc::new(CsvLedgerStorage::new(dir.join("cash_flow.csv")));
    let writer = LedgerWriter::new(Arc::clone(&storage));
    let reader = LedgerReader::new(storage).with_clock(Arc::new(FixedClock(today)));
    (writer, reader)
}
