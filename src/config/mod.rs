//! Persistent user configuration and the on-disk locations derived from it.

use std::{
    env,
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use dirs::home_dir;
use serde::{Deserialize, Serialize};

use crate::{
    errors::{CashFlowError, Result},
    storage::ParsePolicy,
};

const DEFAULT_DIR_NAME: &str = ".cashflow_advisor";
const HOME_ENV: &str = "CASHFLOW_HOME";
const CONFIG_DIR: &str = "config";
const CONFIG_FILE: &str = "config.json";
const LEDGER_FILE: &str = "cash_flow.csv";
const TMP_SUFFIX: &str = "tmp";

pub const DEFAULT_ENDPOINT: &str = "https://api.groq.com/openai/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "llama3-70b-8192";
pub const DEFAULT_API_KEY_ENV: &str = "GROQ_API_KEY";
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful assistant.";

/// Returns the application data directory, defaulting to `~/.cashflow_advisor`.
pub fn app_data_dir() -> PathBuf {
    if let Some(custom) = env::var_os(HOME_ENV) {
        return PathBuf::from(custom);
    }
    home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

/// User-configurable settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Optional custom ledger location. Defaults to `<data dir>/cash_flow.csv`.
    pub ledger_path: Option<PathBuf>,
    pub currency_symbol: String,
    pub parse_policy: ParsePolicy,
    pub advisor: AdvisorConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ledger_path: None,
            currency_symbol: "₹".into(),
            parse_policy: ParsePolicy::Strict,
            advisor: AdvisorConfig::default(),
        }
    }
}

impl Config {
    pub fn resolve_ledger_path(&self, base: &Path) -> PathBuf {
        match &self.ledger_path {
            Some(path) if path.is_absolute() => path.clone(),
            Some(path) => base.join(path),
            None => base.join(LEDGER_FILE),
        }
    }
}

/// Settings for the chat-completion service that answers advice prompts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvisorConfig {
    pub endpoint: String,
    pub model: String,
    /// Name of the environment variable holding the API key; the key itself is never stored.
    pub api_key_env: String,
    pub system_prompt: String,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.into(),
            model: DEFAULT_MODEL.into(),
            api_key_env: DEFAULT_API_KEY_ENV.into(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.into(),
        }
    }
}

/// Loads and saves [`Config`] under a base directory.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    base_dir: PathBuf,
    config_path: PathBuf,
}

impl ConfigManager {
    /// Uses [`app_data_dir`] as the base directory.
    pub fn new() -> Result<Self> {
        Self::with_base_dir(app_data_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self> {
        fs::create_dir_all(&base)?;
        let config_path = base.join(CONFIG_DIR).join(CONFIG_FILE);
        Ok(Self {
            base_dir: base,
            config_path,
        })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Returns the stored configuration, or defaults when none has been saved.
    pub fn load(&self) -> Result<Config> {
        if !self.config_path.exists() {
            return Ok(Config::default());
        }
        let data = fs::read_to_string(&self.config_path)?;
        serde_json::from_str(&data).map_err(|err| {
            CashFlowError::Config(format!("{}: {err}", self.config_path.display()))
        })
    }

    pub fn save(&self, config: &Config) -> Result<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(config)?;
        let tmp = tmp_path(&self.config_path);
        write_all(&tmp, &json)?;
        fs::rename(&tmp, &self.config_path)?;
        Ok(())
    }

    pub fn ledger_path(&self, config: &Config) -> PathBuf {
        config.resolve_ledger_path(&self.base_dir)
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{existing}.{TMP_SUFFIX}"),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_all(path: &Path, data: &str) -> Result<()> {
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).unwrap();
        let config = manager.load().unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(
            manager.ledger_path(&config),
            dir.path().join("cash_flow.csv")
        );
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).unwrap();
        fs::create_dir_all(manager.config_path().parent().unwrap()).unwrap();
        fs::write(
            manager.config_path(),
            r#"{ "parse_policy": "lenient", "advisor": { "model": "mixtral" } }"#,
        )
        .unwrap();
        let config = manager.load().unwrap();
        assert_eq!(config.parse_policy, ParsePolicy::Lenient);
        assert_eq!(config.advisor.model, "mixtral");
        assert_eq!(config.advisor.api_key_env, DEFAULT_API_KEY_ENV);
        assert_eq!(config.currency_symbol, "₹");
    }

    #[test]
    fn invalid_file_is_a_config_error() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).unwrap();
        fs::create_dir_all(manager.config_path().parent().unwrap()).unwrap();
        fs::write(manager.config_path(), "{ not json").unwrap();
        assert!(matches!(manager.load(), Err(CashFlowError::Config(_))));
    }

    #[test]
    fn relative_ledger_path_resolves_against_base() {
        let config = Config {
            ledger_path: Some(PathBuf::from("books/2024.csv")),
            ..Config::default()
        };
        assert_eq!(
            config.resolve_ledger_path(Path::new("/data")),
            PathBuf::from("/data/books/2024.csv")
        );
    }
}
