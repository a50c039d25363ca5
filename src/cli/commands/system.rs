use std::path::PathBuf;

use crate::cli::context::{CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::storage::ParsePolicy;
use crate::utils::build_info;

const CONFIG_KEYS: &[&str] = &[
    "currency",
    "parse-policy",
    "model",
    "endpoint",
    "api-key-env",
    "ledger",
];

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "config",
            "Show or change settings",
            "config [show|path|set <key> <value>]",
            cmd_config,
        ),
        CommandEntry::new("version", "Show build metadata", "version", cmd_version),
        CommandEntry::new(
            "help",
            "Show available commands",
            "help [command]",
            cmd_help,
        ),
        CommandEntry::new("exit", "Exit the shell", "exit", cmd_exit),
    ]
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args.first().map(|sub| sub.to_ascii_lowercase()).as_deref() {
        None | Some("show") => {
            show_config(context);
            Ok(())
        }
        Some("path") => {
            println!("{}", context.config_manager.config_path().display());
            Ok(())
        }
        Some("set") => set_config(context, &args[1..]),
        Some(other) => Err(CommandError::InvalidArguments(format!(
            "unknown config action `{other}` (expected show, path or set)"
        ))),
    }
}

fn show_config(context: &ShellContext) {
    let config = &context.config;
    output::section("Configuration");
    output::two_column(&[
        ("Data dir", context.config_manager.base_dir().display().to_string()),
        ("Ledger", context.ledger_path.display().to_string()),
        ("Currency", config.currency_symbol.clone()),
        ("Parse policy", config.parse_policy.to_string()),
        ("Model", config.advisor.model.clone()),
        ("Endpoint", config.advisor.endpoint.clone()),
        ("API key env", config.advisor.api_key_env.clone()),
    ]);
}

fn set_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [key, value @ ..] = args else {
        return Err(CommandError::InvalidArguments(
            "usage: config set <key> <value>".into(),
        ));
    };
    let value = value.join(" ");
    let value = value.trim();
    if value.is_empty() {
        return Err(CommandError::InvalidArguments(format!(
            "`{key}` needs a value"
        )));
    }

    let mut config = context.config.clone();
    match key.to_ascii_lowercase().as_str() {
        "currency" => config.currency_symbol = value.to_string(),
        "parse-policy" => config.parse_policy = parse_policy(value)?,
        "model" => config.advisor.model = value.to_string(),
        "endpoint" => config.advisor.endpoint = value.to_string(),
        "api-key-env" => config.advisor.api_key_env = value.to_string(),
        "ledger" => config.ledger_path = Some(PathBuf::from(value)),
        other => {
            return Err(CommandError::InvalidArguments(format!(
                "unknown setting `{other}` (expected one of: {})",
                CONFIG_KEYS.join(", ")
            )))
        }
    }
    context.apply_config(config)?;
    output::success(format!("Updated `{key}`."));
    Ok(())
}

fn parse_policy(value: &str) -> Result<ParsePolicy, CommandError> {
    match value.to_ascii_lowercase().as_str() {
        "strict" => Ok(ParsePolicy::Strict),
        "lenient" => Ok(ParsePolicy::Lenient),
        other => Err(CommandError::InvalidArguments(format!(
            "unknown parse policy `{other}` (expected strict or lenient)"
        ))),
    }
}

fn cmd_version(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let meta = build_info::current();
    output::section(format!("Cashflow Advisor {}", meta.version));
    output::two_column(&meta.rows());
    Ok(())
}

fn cmd_help(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if let Some(name) = args.first() {
        match context.registry.get(&name.to_lowercase()) {
            Some(entry) => {
                output::section(entry.name);
                output::info(entry.description);
                output::info(format!("usage: {}", entry.usage));
            }
            None => context.suggest_command(name),
        }
        return Ok(());
    }

    output::section("Commands");
    let rows: Vec<(&str, String)> = context
        .registry
        .list()
        .into_iter()
        .map(|entry| (entry.name, entry.description.to_string()))
        .collect();
    output::two_column(&rows);
    Ok(())
}

fn cmd_exit(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    Err(CommandError::ExitRequested)
}
