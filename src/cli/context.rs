//! Shared runtime state for shell sessions and command execution.

use std::{io, path::PathBuf, sync::Arc};

use chrono::NaiveDate;
use dialoguer::{theme::ColorfulTheme, Confirm};
use rustyline::error::ReadlineError;
use thiserror::Error;

use crate::{
    advisor::{AdviceService, ChatCompletionClient},
    config::{Config, ConfigManager},
    errors::CashFlowError,
    ledger::{LedgerReader, LedgerWriter},
    storage::{CashFlowStore, CsvLedgerStorage},
    time::{Clock, SystemClock},
};

use super::{commands, output, registry::CommandRegistry};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Exit,
}

/// Fatal shell failures; these end the session.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] CashFlowError),
    #[error("Terminal error: {0}")]
    Readline(#[from] ReadlineError),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Per-command failures; reported and the shell keeps running.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Core(#[from] CashFlowError),
    #[error("{0}")]
    InvalidArguments(String),
    #[error("Prompt failed: {0}")]
    Prompt(String),
    #[error("exit requested")]
    ExitRequested,
}

impl From<dialoguer::Error> for CommandError {
    fn from(err: dialoguer::Error) -> Self {
        CommandError::Prompt(err.to_string())
    }
}

pub type CommandResult = Result<(), CommandError>;

pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub theme: ColorfulTheme,
    pub config_manager: ConfigManager,
    pub config: Config,
    pub clock: Arc<dyn Clock>,
    pub writer: LedgerWriter,
    pub reader: LedgerReader,
    pub advisor: Box<dyn AdviceService>,
    pub ledger_path: PathBuf,
    pub last_command: Option<String>,
    pub running: bool,
}

impl ShellContext {
    /// Builds a context from the on-disk configuration and the production services.
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        let config_manager = ConfigManager::new()?;
        let config = config_manager.load()?;
        let advisor = ChatCompletionClient::new(config.advisor.clone())?;
        Ok(Self::with_services(
            mode,
            config_manager,
            config,
            Arc::new(SystemClock),
            Box::new(advisor),
        ))
    }

    pub fn with_services(
        mode: CliMode,
        config_manager: ConfigManager,
        config: Config,
        clock: Arc<dyn Clock>,
        advisor: Box<dyn AdviceService>,
    ) -> Self {
        let ledger_path = config_manager.ledger_path(&config);
        let storage: Arc<dyn CashFlowStore> = Arc::new(CsvLedgerStorage::new(&ledger_path));
        let writer = LedgerWriter::new(Arc::clone(&storage));
        let reader = LedgerReader::new(storage)
            .with_clock(Arc::clone(&clock))
            .with_policy(config.parse_policy);

        let mut registry = CommandRegistry::new();
        commands::register_all(&mut registry);

        Self {
            mode,
            registry,
            theme: ColorfulTheme::default(),
            config_manager,
            config,
            clock,
            writer,
            reader,
            advisor,
            ledger_path,
            last_command: None,
            running: true,
        }
    }

    /// Persists `config` and rebuilds the services that depend on it.
    pub fn apply_config(&mut self, config: Config) -> Result<(), CommandError> {
        self.config_manager.save(&config)?;
        let advisor = ChatCompletionClient::new(config.advisor.clone())?;
        let ledger_path = self.config_manager.ledger_path(&config);
        let storage: Arc<dyn CashFlowStore> = Arc::new(CsvLedgerStorage::new(&ledger_path));
        self.writer = LedgerWriter::new(Arc::clone(&storage));
        self.reader = LedgerReader::new(storage)
            .with_clock(Arc::clone(&self.clock))
            .with_policy(config.parse_policy);
        self.advisor = Box::new(advisor);
        self.ledger_path = ledger_path;
        self.config = config;
        Ok(())
    }

    pub fn is_interactive(&self) -> bool {
        self.mode == CliMode::Interactive
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn currency(&self) -> &str {
        &self.config.currency_symbol
    }

    pub fn prompt(&self) -> String {
        "cashflow> ".to_string()
    }

    pub fn command_names(&self) -> Vec<&'static str> {
        self.registry.names()
    }

    pub fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        let Some(handler) = self.registry.handler(command) else {
            self.suggest_command(raw);
            return Ok(LoopControl::Continue);
        };
        match handler(self, args) {
            Ok(()) => Ok(LoopControl::Continue),
            Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
            Err(err) => Err(err),
        }
    }

    pub fn suggest_command(&self, raw: &str) {
        match self.registry.suggest(raw) {
            Some(name) => output::warning(format!(
                "Unknown command `{raw}`. Did you mean `{name}`?"
            )),
            None => output::warning(format!(
                "Unknown command `{raw}`. Type `help` to list commands."
            )),
        }
    }

    pub fn report_error(&self, err: CommandError) -> Result<(), CliError> {
        output::error(err);
        Ok(())
    }

    pub fn confirm_exit(&self) -> Result<bool, CliError> {
        if !self.is_interactive() {
            return Ok(true);
        }
        Confirm::with_theme(&self.theme)
            .with_prompt("Exit the shell?")
            .default(true)
            .interact()
            .map_err(|err| CliError::Io(io::Error::new(io::ErrorKind::Other, err.to_string())))
    }
}
