//! # UnitXchange Configuration System
//!
//! File: cli/src/core/config.rs
//!
//! ## Overview
//!
//! This module implements the configuration system for UnitXchange, handling
//! loading, merging, validation, and access to configuration data. It combines
//! defaults, user settings, and project-specific overrides.
//!
//! ## Architecture
//!
//! The configuration system follows these principles:
//! - Configuration is loaded from multiple sources in order of precedence
//! - Paths are expanded (e.g., `~` to home directory)
//! - Configuration is validated for correctness before use
//! - Structured data models ensure type safety
//!
//! Configuration sources (in order of precedence):
//! 1. Project-specific `.unitxchange.toml` in current directory or ancestors
//! 2. User-specific `config.toml` in the platform config directory
//!    (e.g. `~/.config/unitxchange/config.toml`)
//! 3. Default values defined in the code
//!
//! Command-line flags are applied on top by the command handlers.
//!
//! ## Examples
//!
//! ```toml
//! [rates]
//! endpoint = "https://api.exchangerate-api.com/v4/latest/USD"
//! ttl_secs = 600
//!
//! [chat]
//! history_file = "~/.local/share/unitxchange/chat_histories.json"
//! model = "gemini-2.0-flash"
//! temperature = 0.0
//!
//! [server]
//! port = 9000
//! ```
//!
//! ```rust
//! let cfg = config::load_config()?;
//! let ttl = cfg.rates.ttl();
//! let history_path = cfg.chat.history_path();
//! ```
//!
use crate::chatbot::gemini::DEFAULT_BASE_URL;
use crate::chatbot::model::{parse_temperature, ModelChoice, DEFAULT_TEMPERATURE};
use crate::common::fs::io;
use crate::conversion::currency::{DEFAULT_RATES_ENDPOINT, DEFAULT_TTL};
use crate::conversion::history::DEFAULT_DISPLAY_LIMIT;
use crate::core::error::{Result, UnitxError};
use anyhow::{anyhow, Context};
use directories::ProjectDirs;
use serde::Deserialize;
use std::net::IpAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Represents the main configuration structure, loaded from TOML files.
#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub rates: RatesConfig,
    #[serde(default)]
    pub chat: ChatConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub history: HistoryConfig,
}

/// Exchange-rate lookup settings.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RatesConfig {
    /// Endpoint returning `{"rates": {...}}` relative to USD.
    #[serde(default = "default_rates_endpoint")]
    pub endpoint: String,
    /// Seconds before cached rates are refetched.
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
}

/// Chatbot settings.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ChatConfig {
    /// JSON file holding all chat sessions (can use ~). Will be expanded.
    #[serde(default = "default_history_file")]
    pub history_file: String,
    #[serde(default)]
    pub model: ModelChoice,
    /// Creativity setting, 0.0 (strict) to 1.0.
    #[serde(default = "default_temperature")]
    pub temperature: f64,
}

/// Hosted language-model settings.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct LlmConfig {
    #[serde(default = "default_llm_base_url")]
    pub base_url: String,
    /// Name of the environment variable holding the API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
}

/// Web server settings used by `unitxchange serve`.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_enable_cors")]
    pub enable_cors: bool,
}

/// Conversion-history display settings.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct HistoryConfig {
    /// Number of recent conversions shown.
    #[serde(default = "default_display_limit")]
    pub display_limit: usize,
}

fn default_rates_endpoint() -> String {
    DEFAULT_RATES_ENDPOINT.to_string()
}
fn default_ttl_secs() -> u64 {
    DEFAULT_TTL.as_secs()
}
fn default_history_file() -> String {
    "chat_histories.json".to_string()
}
fn default_temperature() -> f64 {
    DEFAULT_TEMPERATURE
}
fn default_llm_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}
fn default_api_key_env() -> String {
    "GOOGLE_API_KEY".to_string()
}
fn default_host() -> IpAddr {
    IpAddr::from([127, 0, 0, 1])
}
fn default_port() -> u16 {
    8501
}
fn default_enable_cors() -> bool {
    true
}
fn default_display_limit() -> usize {
    DEFAULT_DISPLAY_LIMIT
}

impl Default for RatesConfig {
    fn default() -> Self {
        Self {
            endpoint: default_rates_endpoint(),
            ttl_secs: default_ttl_secs(),
        }
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            history_file: default_history_file(),
            model: ModelChoice::default(),
            temperature: default_temperature(),
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: default_llm_base_url(),
            api_key_env: default_api_key_env(),
        }
    }
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            enable_cors: default_enable_cors(),
        }
    }
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            display_limit: default_display_limit(),
        }
    }
}

impl RatesConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

impl ChatConfig {
    pub fn history_path(&self) -> PathBuf {
        PathBuf::from(&self.history_file)
    }
}

const PROJECT_CONFIG_FILENAME: &str = ".unitxchange.toml";

/// Loads, merges, expands and validates the configuration.
pub fn load_config() -> Result<Config> {
    let user_config = load_user_config()?;
    let project_config = load_project_config()?;
    let mut merged_config = merge_configs(user_config.unwrap_or_default(), project_config);
    expand_config_paths(&mut merged_config);
    validate_config(&merged_config).context("Configuration validation failed")?;
    debug!("Final loaded configuration: {:?}", merged_config);
    Ok(merged_config)
}

fn load_user_config() -> Result<Option<Config>> {
    if let Some(proj_dirs) = ProjectDirs::from("com", "UnitXchange", "unitxchange") {
        let config_path = proj_dirs.config_dir().join("config.toml");
        if config_path.exists() {
            info!("Loading user configuration from: {}", config_path.display());
            load_config_from_path(&config_path).map(Some)
        } else {
            debug!(
                "User configuration file not found at {}",
                config_path.display()
            );
            Ok(None)
        }
    } else {
        warn!("Could not determine user config directory.");
        Ok(None)
    }
}

fn load_project_config() -> Result<Option<Config>> {
    let current_dir = std::env::current_dir().context("Failed to get current directory")?;
    if let Some(project_config_path) = find_project_config_path(&current_dir) {
        info!(
            "Loading project configuration from: {}",
            project_config_path.display()
        );
        load_config_from_path(&project_config_path).map(Some)
    } else {
        debug!("No project configuration file ({}) found.", PROJECT_CONFIG_FILENAME);
        Ok(None)
    }
}

/// Searches `start` and its ancestors for the project config file, stopping at
/// the first directory containing `.git`.
fn find_project_config_path(start: &Path) -> Option<PathBuf> {
    let mut path = start;
    loop {
        let project_config = path.join(PROJECT_CONFIG_FILENAME);
        if project_config.is_file() {
            return Some(project_config);
        }
        if path.join(".git").is_dir() {
            debug!(
                "Found .git directory at {}, stopping project config search.",
                path.display()
            );
            return None;
        }
        path = path.parent()?;
    }
}

fn load_config_from_path(path: &Path) -> Result<Config> {
    let content = io::read_file_to_string(path)?;
    toml::from_str(&content)
        .with_context(|| format!("Failed to parse TOML from file: {}", path.display()))
}

/// Field-wise merge: a project value wins when it differs from the default.
fn merge_configs(user: Config, project: Option<Config>) -> Config {
    let project = match project {
        Some(p) => p,
        None => return user,
    };
    let defaults = Config::default();

    fn pick<T: PartialEq>(project: T, user: T, default: &T) -> T {
        if &project != default {
            project
        } else {
            user
        }
    }

    Config {
        rates: RatesConfig {
            endpoint: pick(project.rates.endpoint, user.rates.endpoint, &defaults.rates.endpoint),
            ttl_secs: pick(project.rates.ttl_secs, user.rates.ttl_secs, &defaults.rates.ttl_secs),
        },
        chat: ChatConfig {
            history_file: pick(
                project.chat.history_file,
                user.chat.history_file,
                &defaults.chat.history_file,
            ),
            model: pick(project.chat.model, user.chat.model, &defaults.chat.model),
            temperature: pick(
                project.chat.temperature,
                user.chat.temperature,
                &defaults.chat.temperature,
            ),
        },
        llm: LlmConfig {
            base_url: pick(project.llm.base_url, user.llm.base_url, &defaults.llm.base_url),
            api_key_env: pick(
                project.llm.api_key_env,
                user.llm.api_key_env,
                &defaults.llm.api_key_env,
            ),
        },
        server: ServerSection {
            host: pick(project.server.host, user.server.host, &defaults.server.host),
            port: pick(project.server.port, user.server.port, &defaults.server.port),
            enable_cors: pick(
                project.server.enable_cors,
                user.server.enable_cors,
                &defaults.server.enable_cors,
            ),
        },
        history: HistoryConfig {
            display_limit: pick(
                project.history.display_limit,
                user.history.display_limit,
                &defaults.history.display_limit,
            ),
        },
    }
}

fn expand_config_paths(config: &mut Config) {
    config.chat.history_file = shellexpand::tilde(&config.chat.history_file).into_owned();
    debug!("Expanded chat history file: {}", config.chat.history_file);
}

/// Checks value ranges that serde cannot express.
pub fn validate_config(config: &Config) -> Result<()> {
    info!("Validating final configuration...");
    if config.rates.ttl_secs == 0 {
        return Err(anyhow!(UnitxError::Config(
            "[rates] ttl_secs must be greater than zero.".to_string()
        )));
    }
    if config.rates.endpoint.trim().is_empty() {
        return Err(anyhow!(UnitxError::Config(
            "[rates] endpoint cannot be empty.".to_string()
        )));
    }
    if config.chat.history_file.trim().is_empty() {
        return Err(anyhow!(UnitxError::Config(
            "[chat] history_file cannot be empty.".to_string()
        )));
    }
    if parse_temperature(config.chat.temperature).is_err() {
        return Err(anyhow!(UnitxError::Config(format!(
            "[chat] temperature {} must be between 0.0 and 1.0.",
            config.chat.temperature
        ))));
    }
    if config.history.display_limit == 0 {
        return Err(anyhow!(UnitxError::Config(
            "[history] display_limit must be greater than zero.".to_string()
        )));
    }
    if config.llm.api_key_env.trim().is_empty() {
        return Err(anyhow!(UnitxError::Config(
            "[llm] api_key_env cannot be empty.".to_string()
        )));
    }
    info!("Configuration validation successful.");
    Ok(())
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_deserialize_basic_toml() {
        let toml_content = r#"
            [rates]
            ttl_secs = 120

            [chat]
            history_file = "~/chats/history.json"
            model = "gemini-1.5-flash"
            temperature = 0.0

            [server]
            host = "0.0.0.0"
            port = 9000
        "#;

        let config: Config = toml::from_str(toml_content).expect("Failed to parse TOML");

        assert_eq!(config.rates.ttl_secs, 120);
        assert_eq!(config.rates.endpoint, DEFAULT_RATES_ENDPOINT); // Default
        assert_eq!(config.chat.history_file, "~/chats/history.json"); // Not yet expanded
        assert_eq!(config.chat.model, ModelChoice::Gemini15Flash);
        assert_eq!(config.chat.temperature, 0.0);
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host.to_string(), "0.0.0.0");
        assert!(config.server.enable_cors); // Default
        assert_eq!(config.history.display_limit, 10);
        assert_eq!(config.llm.api_key_env, "GOOGLE_API_KEY");
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.rates.ttl(), Duration::from_secs(600));
        assert_eq!(config.chat.history_file, "chat_histories.json");
        assert_eq!(config.chat.model, ModelChoice::Gemini20Flash);
        assert_eq!(config.chat.temperature, 0.7);
        assert_eq!(config.server.port, 8501);
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result: std::result::Result<Config, _> = toml::from_str("[chat]\ncolour = \"red\"");
        assert!(result.is_err());
        let result: std::result::Result<Config, _> =
            toml::from_str("[chat]\nmodel = \"gpt-4\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_merge_project_overrides_user() {
        let user: Config = toml::from_str(
            "[server]\nport = 7000\n[chat]\ntemperature = 0.2\n[rates]\nttl_secs = 60",
        )
        .unwrap();
        let project: Config = toml::from_str("[server]\nport = 7100").unwrap();

        let merged = merge_configs(user, Some(project));
        assert_eq!(merged.server.port, 7100); // Project wins
        assert_eq!(merged.chat.temperature, 0.2); // User kept
        assert_eq!(merged.rates.ttl_secs, 60); // User kept
    }

    #[test]
    fn test_path_expansion() {
        let mut config = Config::default();
        config.chat.history_file = "~/unitx/chats.json".to_string();
        expand_config_paths(&mut config);

        let home_dir = dirs::home_dir().unwrap();
        assert_eq!(
            config.chat.history_file,
            home_dir.join("unitx/chats.json").to_string_lossy()
        );
    }

    #[test]
    fn test_validate_config_rejects_bad_values() {
        let mut config = Config::default();
        config.rates.ttl_secs = 0;
        assert!(validate_config(&config)
            .unwrap_err()
            .to_string()
            .contains("ttl_secs"));

        let mut config = Config::default();
        config.chat.temperature = 1.5;
        assert!(validate_config(&config).is_err());

        let mut config = Config::default();
        config.history.display_limit = 0;
        assert!(validate_config(&config).is_err());

        let mut config = Config::default();
        config.chat.history_file = " ".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_find_project_config_path() -> Result<()> {
        let root = tempdir()?;
        std::fs::create_dir(root.path().join(".git"))?;
        let nested = root.path().join("a/b");
        std::fs::create_dir_all(&nested)?;

        assert_eq!(find_project_config_path(&nested), None);

        std::fs::write(root.path().join("a").join(PROJECT_CONFIG_FILENAME), "")?;
        assert_eq!(
            find_project_config_path(&nested),
            Some(root.path().join("a").join(PROJECT_CONFIG_FILENAME))
        );
        Ok(())
    }

    #[test]
    fn test_load_config_from_path() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[history]\ndisplay_limit = 5\n")?;
        let config = load_config_from_path(&path)?;
        assert_eq!(config.history.display_limit, 5);
        Ok(())
    }
}
