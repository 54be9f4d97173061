use config::{Config as ConfigLoader, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use vocalis_reply::WikipediaConfig;
use vocalis_types::GenerationConfig;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub cors: CorsConfig,
    pub database: DatabaseConfig,
    pub llm: LlmConfig,
    pub encyclopedia: EncyclopediaConfig,
    pub history: HistoryConfig,
    pub logging: LoggingConfig,

    // Secrets (from ENV only)
    #[serde(skip)]
    pub openai_api_key: Option<String>,
    #[serde(skip)]
    pub openai_base_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Per-request timeout; external lookups run inside it
    pub request_timeout_secs: u64,
    /// Deadline for each reply source; must stay below `request_timeout_secs`
    pub source_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            request_timeout_secs: 60,
            source_timeout_secs: 20,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    pub enabled: bool,
    pub origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            origins: vec!["*".to_string()],
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data/vocalis.db"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub system_prompt: String,
    /// HTTP deadline for one completion call
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        let defaults = GenerationConfig::default();
        Self {
            model: defaults.model,
            temperature: defaults.temperature.unwrap_or(0.7),
            max_tokens: defaults.max_tokens.unwrap_or(300),
            system_prompt: defaults.system_prompt,
            timeout_secs: 15,
        }
    }
}

impl From<LlmConfig> for GenerationConfig {
    fn from(config: LlmConfig) -> Self {
        GenerationConfig::new(config.model)
            .with_temperature(config.temperature)
            .with_max_tokens(config.max_tokens)
            .with_system_prompt(config.system_prompt)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EncyclopediaConfig {
    pub enabled: bool,
    pub base_url: Option<String>,
    pub language: String,
    pub sentences: usize,
    pub timeout_secs: u64,
}

impl Default for EncyclopediaConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: None,
            language: "en".to_string(),
            sentences: 2,
            timeout_secs: 10,
        }
    }
}

impl From<&EncyclopediaConfig> for WikipediaConfig {
    fn from(config: &EncyclopediaConfig) -> Self {
        WikipediaConfig {
            base_url: config.base_url.clone(),
            language: config.language.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
            ..WikipediaConfig::default()
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    pub limit: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            limit: vocalis_persist::DEFAULT_HISTORY_LIMIT,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from TOML files and environment variables
    ///
    /// Hierarchy (weakest to strongest):
    /// 1. config/default.toml
    /// 2. config/{ENV}.toml (if ENV is set)
    /// 3. Environment variables, e.g. `VOCALIS_SERVER__PORT=8080`
    pub fn load() -> Result<Self, ConfigError> {
        let env = std::env::var("ENV").unwrap_or_else(|_| "dev".to_string());

        let builder = ConfigLoader::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(
                Environment::with_prefix("VOCALIS")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        let mut cfg: Config = builder.build()?.try_deserialize()?;
        cfg.apply_openai_env(non_blank_env);
        cfg.validate()?;

        Ok(cfg)
    }

    /// Read the OpenAI variables; these never come from files.
    ///
    /// No key disables delegation. `OPENAI_MODEL` overrides `llm.model`.
    pub fn apply_openai_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        self.openai_api_key = lookup("OPENAI_API_KEY");
        self.openai_base_url = lookup("OPENAI_BASE_URL");
        if let Some(model) = lookup("OPENAI_MODEL") {
            self.llm.model = model;
        }
    }

    /// Reject timeouts that would let the request deadline fire before
    /// the reply chain gives up on a slow source.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.source_timeout_secs == 0 {
            return Err(ConfigError::Message(
                "server.source_timeout_secs must be greater than zero".to_string(),
            ));
        }
        if self.server.source_timeout_secs >= self.server.request_timeout_secs {
            return Err(ConfigError::Message(format!(
                "server.source_timeout_secs ({}) must be below server.request_timeout_secs ({})",
                self.server.source_timeout_secs, self.server.request_timeout_secs
            )));
        }
        Ok(())
    }

    pub fn generation(&self) -> GenerationConfig {
        self.llm.clone().into()
    }

    pub fn source_timeout(&self) -> Duration {
        Duration::from_secs(self.server.source_timeout_secs)
    }

    /// OpenAI HTTP deadline, capped by the per-source deadline
    pub fn llm_timeout(&self) -> Duration {
        Duration::from_secs(self.llm.timeout_secs).min(self.source_timeout())
    }
}

fn non_blank_env(key: &str) -> Option<String> {
    non_blank(std::env::var(key).ok())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
