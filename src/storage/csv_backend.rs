use std::{
    fs::{self, File, OpenOptions},
    io::{self, BufReader, Read, Seek, SeekFrom, Write},
    path::{Path, PathBuf},
};

use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use tracing::{debug, warn};

use crate::{
    errors::{CashFlowError, Result},
    ledger::{
        dates::{format_date, parse_date},
        CashFlowRecord, FlowType,
    },
};

use super::{CashFlowStore, LedgerSnapshot, ParsePolicy, SkippedRow};

/// Column names written once at the top of every ledger file.
pub const LEDGER_HEADER: [&str; 5] = ["Amount", "Date", "Category", "Flow Type", "Description"];

const REQUIRED_FIELDS: usize = 4;

/// Ledger stored as a comma-separated file, one row per event.
///
/// There is no locking: concurrent writers can interleave rows.
#[derive(Debug, Clone)]
pub struct CsvLedgerStorage {
    path: PathBuf,
}

impl CsvLedgerStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn ensure_parent_dir(&self) -> io::Result<()> {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent),
            _ => Ok(()),
        }
    }
}

impl CashFlowStore for CsvLedgerStorage {
    fn append(&self, record: &CashFlowRecord) -> Result<()> {
        self.ensure_parent_dir()?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        let len = file.metadata()?.len();
        let needs_header = len == 0;
        if !needs_header && !ends_with_newline(&self.path)? {
            // A hand-edited file may lack the final newline; keep the new row on its own line.
            file.write_all(b"\n")?;
        }

        let mut writer = WriterBuilder::new().has_headers(false).from_writer(file);
        if needs_header {
            debug!(path = %self.path.display(), "creating ledger file");
            writer.write_record(LEDGER_HEADER)?;
        }
        writer.write_record(encode_row(record))?;
        writer.flush()?;
        Ok(())
    }

    fn load(&self, policy: ParsePolicy) -> Result<LedgerSnapshot> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Ok(LedgerSnapshot::default());
            }
            Err(err) => return Err(err.into()),
        };

        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(BufReader::new(file));

        let headers = reader.headers()?.clone();
        if !headers.is_empty() && !header_matches(&headers) {
            warn!(
                path = %self.path.display(),
                found = ?headers,
                "ledger header differs from the expected columns"
            );
        }

        let mut snapshot = LedgerSnapshot::default();
        for row in reader.records() {
            let outcome = row
                .map_err(CashFlowError::from)
                .and_then(|row| decode_row(&row));
            match (outcome, policy) {
                (Ok(record), _) => snapshot.records.push(record),
                (Err(CashFlowError::Parse { line, message }), ParsePolicy::Lenient) => {
                    warn!(line, reason = %message, "skipping malformed ledger row");
                    snapshot.skipped.push(SkippedRow {
                        line,
                        reason: message,
                    });
                }
                (Err(err), _) => return Err(err),
            }
        }
        Ok(snapshot)
    }
}

fn header_matches(headers: &StringRecord) -> bool {
    headers.len() == LEDGER_HEADER.len()
        && headers
            .iter()
            .zip(LEDGER_HEADER)
            .all(|(found, expected)| found.trim() == expected)
}

fn ends_with_newline(path: &Path) -> io::Result<bool> {
    let mut file = File::open(path)?;
    file.seek(SeekFrom::End(-1))?;
    let mut last = [0u8; 1];
    file.read_exact(&mut last)?;
    Ok(last[0] == b'\n')
}

fn encode_row(record: &CashFlowRecord) -> [String; 5] {
    [
        record.amount.to_string(),
        format_date(record.date),
        record.category.clone(),
        record.flow_type.as_str().to_string(),
        record.description.clone(),
    ]
}

fn decode_row(row: &StringRecord) -> Result<CashFlowRecord> {
    let line = row.position().map(|pos| pos.line()).unwrap_or(0);
    let parse_error = |message: String| CashFlowError::Parse { line, message };

    if row.len() < REQUIRED_FIELDS {
        return Err(parse_error(format!(
            "expected at least {REQUIRED_FIELDS} fields, found {}",
            row.len()
        )));
    }

    let raw_amount = row.get(0).unwrap_or_default().trim();
    let amount = raw_amount
        .parse::<f64>()
        .ok()
        .filter(|amount| amount.is_finite())
        .ok_or_else(|| parse_error(format!("invalid amount `{raw_amount}`")))?;

    let raw_date = row.get(1).unwrap_or_default();
    let date =
        parse_date(raw_date).ok_or_else(|| parse_error(format!("invalid date `{raw_date}`")))?;

    Ok(CashFlowRecord {
        amount,
        date,
        category: row.get(2).unwrap_or_default().to_string(),
        flow_type: FlowType::from(row.get(3).unwrap_or_default().to_string()),
        description: row.get(4).unwrap_or_default().to_string(),
    })
}
