//! Layered application configuration, built with figment.
//!
//! Sources, highest priority first:
//! 1. Well-known environment variables (`GEMINI_API_KEY` or
//!    `ANTHROPIC_API_KEY` for the configured provider, `SUPABASE_URL`,
//!    `SUPABASE_ANON_KEY`, `SUPABASE_ACCESS_TOKEN`, `STORYSEED_USER_ID`,
//!    `OTEL_EXPORTER_OTLP_ENDPOINT`)
//! 2. `STORYSEED_*` variables, `__` separating sections
//!    (`STORYSEED_LLM__MODEL` -> `llm.model`)
//! 3. The TOML file (`--config PATH`, else `.storyseed/config.toml`)
//! 4. Built-in defaults
//!
//! Blank environment values are ignored. A missing default file is not an
//! error; a missing explicit `--config` file is. Validation runs once, after
//! extraction.

use std::path::{Path, PathBuf};
use std::time::Duration;

use figment::providers::{Env, Format, Serialized, Toml};
use figment::value::UncasedStr;
use figment::Figment;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Project-local config file used when `--config` is not given.
pub const DEFAULT_CONFIG_PATH: &str = ".storyseed/config.toml";

/// Bare variable names and the config key each one sets.
const WELL_KNOWN_ENV: &[(&str, &str)] = &[
    ("SUPABASE_URL", "storage.url"),
    ("SUPABASE_ANON_KEY", "storage.anon_key"),
    ("SUPABASE_ACCESS_TOKEN", "storage.access_token"),
    ("STORYSEED_USER_ID", "user.id"),
    ("OTEL_EXPORTER_OTLP_ENDPOINT", "telemetry.otlp_endpoint"),
];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file {} does not exist", path.display())]
    MissingFile { path: PathBuf },

    /// Figment extraction or merge error; names the offending source.
    #[error("configuration error: {0}")]
    Figment(#[from] figment::Error),

    #[error("invalid configuration value for '{field}': {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    pub user: UserConfig,
    pub llm: LlmConfig,
    pub storage: StorageConfig,
    pub notes: NotesConfig,
    pub export: ExportConfig,
    pub telemetry: TelemetryConfig,
}

/// Who is signed in. With no `id` every record operation is refused.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct UserConfig {
    pub id: Option<String>,
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    #[default]
    Gemini,
    Anthropic,
}

impl Provider {
    pub fn api_key_env(self) -> &'static str {
        match self {
            Provider::Gemini => "GEMINI_API_KEY",
            Provider::Anthropic => "ANTHROPIC_API_KEY",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LlmConfig {
    pub provider: Provider,
    pub api_key: String,
    /// Empty means the provider's default model.
    pub model: String,
    pub temperature: f32,
    pub max_output_tokens: u32,
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: Provider::default(),
            api_key: String::new(),
            model: String::new(),
            temperature: 0.7,
            max_output_tokens: 2048,
            timeout_secs: 60,
        }
    }
}

impl LlmConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct StorageConfig {
    pub url: String,
    pub anon_key: String,
    pub access_token: Option<String>,
    pub timeout_secs: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            anon_key: String::new(),
            access_token: None,
            timeout_secs: 10,
        }
    }
}

impl StorageConfig {
    /// Both URL and anon key are present.
    pub fn is_configured(&self) -> bool {
        !self.url.trim().is_empty() && !self.anon_key.trim().is_empty()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct NotesConfig {
    /// Directory for the on-device notes cache. Defaults to the user data dir.
    pub dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Directory exported drafts are written to. Defaults to `./drafts`.
    pub dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Human,
    Json,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct TelemetryConfig {
    pub log_format: LogFormat,
    /// `RUST_LOG`-style directive used when `RUST_LOG` is unset.
    pub filter: String,
    /// OTLP gRPC endpoint; spans are exported only when set.
    pub otlp_endpoint: Option<String>,
    pub service_name: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_format: LogFormat::Human,
            filter: "info".into(),
            otlp_endpoint: None,
            service_name: "storyseed".into(),
        }
    }
}

impl AppConfig {
    /// Loads every source, extracts, and validates.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let config: Self = Self::figment(explicit)?.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Builds the provider chain without extracting it.
    pub fn figment(explicit: Option<&Path>) -> Result<Figment, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        match explicit {
            Some(path) if !path.exists() => {
                return Err(ConfigError::MissingFile {
                    path: path.to_path_buf(),
                })
            }
            Some(path) => figment = figment.merge(Toml::file(path)),
            None => {
                let path = Path::new(DEFAULT_CONFIG_PATH);
                if path.exists() {
                    figment = figment.merge(Toml::file(path));
                }
            }
        }

        figment = figment.merge(Env::prefixed("STORYSEED_").split("__"));

        // The key variable depends on the provider chosen so far.
        let provider: Provider = figment.extract_inner("llm.provider")?;
        let api_key_env = provider.api_key_env();
        figment = figment.merge(
            Env::raw()
                .only(&[api_key_env])
                .filter(is_set)
                .map(|_| "llm.api_key".into()),
        );

        let names: Vec<&str> = WELL_KNOWN_ENV.iter().map(|(name, _)| *name).collect();
        figment = figment.merge(Env::raw().only(&names).filter(is_set).map(|name| {
            WELL_KNOWN_ENV
                .iter()
                .find(|(env, _)| name.as_str().eq_ignore_ascii_case(env))
                .map_or_else(|| name.as_str().to_string(), |(_, key)| key.to_string())
                .into()
        }));

        Ok(figment)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(ConfigError::InvalidValue {
                field: "llm.temperature",
                reason: format!("{} is outside 0.0..=2.0", self.llm.temperature),
            });
        }
        if self.llm.max_output_tokens == 0 {
            return Err(ConfigError::InvalidValue {
                field: "llm.max_output_tokens",
                reason: "must be greater than zero".into(),
            });
        }
        if self.llm.timeout_secs == 0 || self.storage.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "timeout_secs",
                reason: "timeouts must be greater than zero".into(),
            });
        }
        let url = self.storage.url.trim();
        if !url.is_empty() && !(url.starts_with("https://") || url.starts_with("http://")) {
            return Err(ConfigError::InvalidValue {
                field: "storage.url",
                reason: format!("'{url}' is not an http(s) URL"),
            });
        }
        if self.user.id.as_deref().is_some_and(|id| id.trim().is_empty()) {
            return Err(ConfigError::InvalidValue {
                field: "user.id",
                reason: "must not be blank".into(),
            });
        }
        Ok(())
    }

    /// Directory for the on-device notes cache.
    pub fn notes_dir(&self) -> PathBuf {
        self.notes.dir.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .map(|d| d.join("storyseed"))
                .unwrap_or_else(|| PathBuf::from(".storyseed"))
        })
    }

    pub fn export_dir(&self) -> PathBuf {
        self.export
            .dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("drafts"))
    }
}

/// Only variables with a non-blank value override lower layers.
fn is_set(name: &UncasedStr) -> bool {
    std::env::var(name.as_str()).is_ok_and(|value| !value.trim().is_empty())
}
