use std::path::{Path, PathBuf};

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::llm::providers::{DEFAULT_BASE_URL, DEFAULT_CHAT_MODEL, DEFAULT_EMBEDDING_MODEL};

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] Box<figment::Error>),

    #[error("GOOGLE_API_KEY is not set (export it or add llm.api_key to the config file)")]
    MissingApiKey,

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub llm: LlmConfig,
    pub data: DataConfig,
    pub wiki: WikiConfig,
    pub memory: MemoryConfig,
    pub tutor: TutorConfig,
}

/// Gemini access.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub api_key: Option<String>,
    /// Chat models in fallback order.
    pub chat_models: Vec<String>,
    pub embedding_model: String,
    pub base_url: String,
    pub temperature: Option<f32>,
    /// Pause before the next model after HTTP 429.
    pub rate_limit_backoff_ms: u64,
    pub request_timeout_secs: u64,
}

/// Data directory configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Override the default data directory.
    pub data_dir: Option<PathBuf>,
}

/// Encyclopedia scraping.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WikiConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub user_agent: String,
}

/// Which embedding source backs vector memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbedderKind {
    /// Gemini `embedContent`
    Provider,
    /// Offline feature hashing
    Hashing,
}

/// Vector memory.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryConfig {
    pub enabled: bool,
    pub embedder: EmbedderKind,
    pub hashing_dimension: usize,
}

/// Tutoring session behaviour.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TutorConfig {
    /// Append the persona kernel (with harvested voice samples) to the system prompt.
    pub use_kernel: bool,
    /// Rewrite the memory retrieval query before searching.
    pub rewrite_queries: bool,
    /// Store a memory snippet every N user/assistant exchanges.
    pub memory_every_exchanges: usize,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            chat_models: vec![
                DEFAULT_CHAT_MODEL.to_string(),
                "gemini-2.0-flash-exp".to_string(),
                "gemini-1.5-flash".to_string(),
            ],
            embedding_model: DEFAULT_EMBEDDING_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            temperature: None,
            rate_limit_backoff_ms: 2000,
            request_timeout_secs: 120,
        }
    }
}

impl LlmConfig {
    /// API key, required only once an LLM call is built.
    pub fn api_key(&self) -> Result<&str, ConfigError> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or(ConfigError::MissingApiKey)
    }
}

impl Default for WikiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://en.wikipedia.org".to_string(),
            timeout_secs: 5,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36"
                .to_string(),
        }
    }
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            embedder: EmbedderKind::Provider,
            hashing_dimension: 256,
        }
    }
}

impl Default for TutorConfig {
    fn default() -> Self {
        Self {
            use_kernel: true,
            rewrite_queries: true,
            memory_every_exchanges: 3,
        }
    }
}

impl AppConfig {
    /// Load configuration from defaults, `~/.config/curio/config.toml`,
    /// `CURIO_*` environment variables and `GOOGLE_API_KEY`.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Like [`AppConfig::load`], with an extra file layered above the user config.
    pub fn load_from(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let config: Self = Self::figment(explicit)
            .extract()
            .map_err(|e| ConfigError::Load(Box::new(e)))?;
        config.validate()?;
        tracing::debug!(config_path = %Self::config_path().display(), "configuration loaded");
        Ok(config)
    }

    /// Layered provider stack, lowest precedence first.
    pub fn figment(explicit: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(AppConfig::default()))
            .merge(Toml::file(Self::config_path()));

        if let Some(path) = explicit {
            figment = figment.merge(Toml::file(path));
        }

        figment = figment.merge(Env::prefixed("CURIO_").split("__"));

        if let Ok(key) = std::env::var("GOOGLE_API_KEY") {
            if !key.trim().is_empty() {
                figment = figment.merge(Serialized::default("llm.api_key", key));
            }
        }

        figment
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.llm.chat_models.is_empty() {
            return Err(ConfigError::Invalid(
                "llm.chat_models must list at least one model".to_string(),
            ));
        }
        if self.tutor.memory_every_exchanges == 0 {
            return Err(ConfigError::Invalid(
                "tutor.memory_every_exchanges must be at least 1".to_string(),
            ));
        }
        if self.memory.hashing_dimension == 0 {
            return Err(ConfigError::Invalid(
                "memory.hashing_dimension must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Resolved data directory (override or XDG default).
    pub fn data_dir(&self) -> PathBuf {
        self.data.data_dir.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .map(|d| d.join("curio"))
                .unwrap_or_else(|| PathBuf::from("data"))
        })
    }

    pub fn database_path(&self) -> PathBuf {
        self.data_dir().join("curio_data.db")
    }

    pub fn memory_dir(&self) -> PathBuf {
        self.data_dir().join("memory")
    }

    pub fn log_dir(&self) -> PathBuf {
        self.data_dir().join("logs")
    }

    fn config_path() -> PathBuf {
        dirs::config_dir()
            .map(|d| d.join("curio").join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }
}
