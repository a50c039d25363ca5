//! Cash-flow ledger: records, the append/read services, and aggregations.

pub mod dates;
pub mod flow;
pub mod reader;
pub mod record;
pub mod summary;
pub mod writer;

pub use flow::{is_others_category, FlowType, OTHERS_CATEGORY};
pub use reader::LedgerReader;
pub use record::{CashFlowEntry, CashFlowRecord};
pub use summary::{aggregate_expenses_by_category, summarize, MonthlySummary};
pub use writer::LedgerWriter;
