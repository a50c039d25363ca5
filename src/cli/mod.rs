//! Line-oriented shell over the ledger and advisor services.

pub mod commands;
pub mod context;
pub mod output;
pub mod registry;
pub mod shell;
pub mod table;

pub use context::{CliError, CliMode, CommandError, ShellContext};
pub use shell::run_cli;
