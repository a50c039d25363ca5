use std::{
    borrow::Cow,
    io::{self, BufRead},
};

use rustyline::{
    completion::{Completer, Pair},
    error::ReadlineError,
    highlight::Highlighter,
    hint::Hinter,
    history::DefaultHistory,
    validate::Validator,
    Cmd, Context as ReadlineContext, Editor, Helper, KeyEvent,
};
use shell_words::split;
use tracing::debug;

use super::{
    context::{CliError, CliMode, CommandError, LoopControl, ShellContext},
    output,
};

/// Setting this variable switches the shell to reading commands from stdin.
pub const SCRIPT_ENV: &str = "CASHFLOW_CLI_SCRIPT";

pub fn run_cli() -> Result<(), CliError> {
    let mode = if std::env::var_os(SCRIPT_ENV).is_some() {
        CliMode::Script
    } else {
        CliMode::Interactive
    };
    output::set_plain(mode == CliMode::Script);

    let mut context = ShellContext::new(mode)?;
    debug!(ledger = %context.ledger_path.display(), ?mode, "shell started");

    match mode {
        CliMode::Interactive => run_interactive(&mut context),
        CliMode::Script => run_script(&mut context),
    }
}

fn run_interactive(context: &mut ShellContext) -> Result<(), CliError> {
    let mut editor = Editor::<CommandHelper, DefaultHistory>::new()?;
    editor.set_helper(Some(CommandHelper::new(context.command_names())));
    editor.bind_sequence(KeyEvent::from('?'), Cmd::Complete);

    output::info("Personal Finance Advisor. Type `help` to list commands.");
    while context.running {
        match editor.readline(&context.prompt()) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                editor.add_history_entry(trimmed).ok();
                match handle_line(context, trimmed) {
                    Ok(LoopControl::Continue) => {}
                    Ok(LoopControl::Exit) => break,
                    Err(err) => context.report_error(err)?,
                }
            }
            Err(ReadlineError::Interrupted) => {
                if context.confirm_exit()? {
                    break;
                }
            }
            Err(ReadlineError::Eof) => {
                output::info("Exiting shell.");
                break;
            }
            Err(err) => return Err(err.into()),
        }
    }
    Ok(())
}

fn run_script(context: &mut ShellContext) -> Result<(), CliError> {
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        if !context.running {
            break;
        }
        let line = line?;
        match handle_line(context, &line) {
            Ok(LoopControl::Continue) => {}
            Ok(LoopControl::Exit) => break,
            Err(err) => context.report_error(err)?,
        }
    }
    Ok(())
}

/// Tokenizes one input line and dispatches it.
pub fn handle_line(context: &mut ShellContext, line: &str) -> Result<LoopControl, CommandError> {
    let tokens = match split(line) {
        Ok(tokens) => tokens,
        Err(err) => {
            output::warning(format!("Could not parse input: {err}"));
            return Ok(LoopControl::Continue);
        }
    };

    let Some((raw, rest)) = tokens.split_first() else {
        return Ok(LoopControl::Continue);
    };
    if raw.starts_with('#') {
        return Ok(LoopControl::Continue);
    }

    let command = raw.to_lowercase();
    let args: Vec<&str> = rest.iter().map(String::as_str).collect();
    context.last_command = Some(line.trim().to_string());

    let control = context.dispatch(&command, raw, &args)?;
    if control == LoopControl::Exit {
        context.running = false;
    }
    Ok(control)
}

struct CommandHelper {
    commands: Vec<String>,
}

impl CommandHelper {
    fn new(names: Vec<&'static str>) -> Self {
        let mut commands: Vec<String> = names.into_iter().map(str::to_string).collect();
        commands.sort();
        commands.dedup();
        Self { commands }
    }
}

impl Helper for CommandHelper {}

impl Completer for CommandHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &ReadlineContext<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let prefix = &line[..pos];
        // Only the first word is completed.
        if prefix.trim_start().contains(char::is_whitespace) {
            return Ok((pos, Vec::new()));
        }
        let start = prefix.len() - prefix.trim_start().len();
        let needle = prefix[start..].to_ascii_lowercase();
        let candidates = self
            .commands
            .iter()
            .filter(|name| name.starts_with(&needle))
            .map(|name| Pair {
                display: name.clone(),
                replacement: name.clone(),
            })
            .collect();
        Ok((start, candidates))
    }
}

impl Hinter for CommandHelper {
    type Hint = String;
}

impl Highlighter for CommandHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        Cow::Borrowed(line)
    }
}

impl Validator for CommandHelper {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands::test_support::context;

    #[test]
    fn comments_and_blank_lines_are_ignored() {
        let (mut ctx, _dir) = context();
        assert_eq!(handle_line(&mut ctx, "   ").unwrap(), LoopControl::Continue);
        assert_eq!(
            handle_line(&mut ctx, "# expense 5 Food").unwrap(),
            LoopControl::Continue
        );
        assert!(!ctx.ledger_path.exists());
    }

    #[test]
    fn commands_are_case_insensitive_and_quoted_args_stay_whole() {
        let (mut ctx, _dir) = context();
        handle_line(&mut ctx, "EXPENSE 40 Others \"bus pass\"").unwrap();
        let records = ctx.reader.load_all().unwrap();
        assert_eq!(records[0].description, "bus pass");
        assert_eq!(ctx.last_command.as_deref(), Some("EXPENSE 40 Others \"bus pass\""));
    }

    #[test]
    fn exit_stops_the_loop() {
        let (mut ctx, _dir) = context();
        assert_eq!(handle_line(&mut ctx, "exit").unwrap(), LoopControl::Exit);
        assert!(!ctx.running);
    }

    #[test]
    fn command_errors_are_returned_to_the_loop() {
        let (mut ctx, _dir) = context();
        assert!(handle_line(&mut ctx, "expense 0 Food").is_err());
        assert!(ctx.running);
    }
}
