//! Configuration management for the sentiment comparison tool
//!
//! Loads backend credentials and evaluation settings from TOML files. The
//! original tab-separated `key<TAB>value` credential files are still read.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::backends::KNOWN_BACKENDS;

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub evaluation: EvaluationConfig,
    #[serde(default)]
    pub backends: IndexMap<String, BackendConfig>,
}

/// Evaluation run settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationConfig {
    /// Backends to register, in display order
    #[serde(default = "default_backend_order")]
    pub backends: Vec<String>,
    /// Default document language (ISO 639-1)
    #[serde(default = "default_language")]
    pub language: String,
    /// Default HTTP timeout applied by each backend to its own calls
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
}

/// Backend-specific configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BackendConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Environment variable holding the API key when `api_key` is unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key_env: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// Skyttle analysis domain
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    /// Overrides the evaluation language for this backend
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Requests per minute the service allows
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rpm: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
}

// Default value functions
fn default_true() -> bool { true }
fn default_language() -> String { "en".to_string() }
fn default_timeout_ms() -> u64 { 30_000 }
fn default_output_dir() -> String { "results".to_string() }
fn default_backend_order() -> Vec<String> {
    KNOWN_BACKENDS.iter().map(|s| s.to_string()).collect()
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            backends: default_backend_order(),
            language: default_language(),
            timeout_ms: default_timeout_ms(),
            output_dir: default_output_dir(),
        }
    }
}

impl BackendConfig {
    fn from_env_key(var: &str) -> Self {
        Self {
            enabled: true,
            api_key_env: Some(var.to_string()),
            ..Default::default()
        }
    }

    fn with_key(key: &str) -> Self {
        Self {
            enabled: true,
            api_key: Some(key.to_string()),
            ..Default::default()
        }
    }

    /// Resolve the API key from the file or the environment
    pub fn api_key(&self, backend: &str) -> Result<String, ConfigError> {
        let from_file = self.api_key.clone().filter(|k| !k.trim().is_empty());
        let from_env = || {
            self.api_key_env
                .as_ref()
                .and_then(|var| std::env::var(var).ok())
                .filter(|k| !k.trim().is_empty())
        };

        from_file
            .or_else(from_env)
            .ok_or_else(|| ConfigError::MissingCredential {
                backend: backend.to_string(),
                field: "api_key".to_string(),
            })
    }

    /// Return a required plain-text field, failing when it is absent or blank
    pub fn require(
        &self,
        backend: &str,
        field: &str,
        value: &Option<String>,
    ) -> Result<String, ConfigError> {
        value
            .clone()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingCredential {
                backend: backend.to_string(),
                field: field.to_string(),
            })
    }
}

impl Config {
    /// Load configuration from a file.
    ///
    /// `.toml` files are parsed as TOML; anything else is read as the
    /// tab-separated credential format.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {}", path.display(), e)))?;

        if path.extension().map(|e| e == "toml").unwrap_or(false) {
            Self::from_toml(&content)
        } else {
            Self::from_key_values(&content)
        }
    }

    /// Parse configuration from a TOML string
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Parse the tab-separated `key<TAB>value` credential format
    pub fn from_key_values(content: &str) -> Result<Self, ConfigError> {
        let mut values: IndexMap<String, String> = IndexMap::new();
        for (idx, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let (key, value) = line.split_once('\t').ok_or_else(|| {
                ConfigError::Parse(format!("Line {}: expected key<TAB>value", idx + 1))
            })?;
            values.insert(key.trim().to_string(), value.trim().to_string());
        }

        let mut config = Config {
            evaluation: EvaluationConfig::default(),
            backends: IndexMap::new(),
        };

        if let Some(language) = values.get("language") {
            config.evaluation.language = language.clone();
        }

        if let Some(auth) = values.get("mashape_auth") {
            config.backends.insert("skyttle".to_string(), BackendConfig::with_key(auth));
            config.backends.insert("chatterbox".to_string(), BackendConfig::with_key(auth));
        }

        let keyed = [
            ("datumbox", "datumbox_key"),
            ("repustate", "repustate_key"),
            ("viralheat", "viralheat_key"),
            ("lymbix", "lymbix_key"),
            ("aiapplied", "aiapplied_key"),
            ("sentigem", "sentigem_key"),
            ("alchemy", "alchemy_key"),
        ];
        for (backend, key) in keyed {
            if let Some(value) = values.get(key) {
                config.backends.insert(backend.to_string(), BackendConfig::with_key(value));
            }
        }

        if values.contains_key("bitext_user") || values.contains_key("bitext_pwd") {
            config.backends.insert(
                "bitext".to_string(),
                BackendConfig {
                    enabled: true,
                    user: values.get("bitext_user").cloned(),
                    password: values.get("bitext_pwd").cloned(),
                    ..Default::default()
                },
            );
        }

        if values.keys().any(|k| k.starts_with("semantria_")) {
            tracing::warn!("Semantria credentials found but the Semantria backend is not supported");
        }

        // only backends with credentials in the file take part
        config
            .evaluation
            .backends
            .retain(|name| config.backends.contains_key(name));

        Ok(config)
    }

    /// Load from an explicit path, the default locations, or built-in defaults
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = path {
            let config = Self::from_file(path)?;
            tracing::info!("Loaded configuration from {}", path.display());
            return Ok(config);
        }

        let config_paths = [
            PathBuf::from("config/backends.toml"),
            PathBuf::from("config.txt"),
        ];

        for path in &config_paths {
            if path.exists() {
                let config = Self::from_file(path)?;
                tracing::info!("Loaded configuration from {}", path.display());
                return Ok(config);
            }
        }

        tracing::info!("Using default configuration");
        Ok(Self::default())
    }

    /// Save configuration to a TOML file
    pub fn save_toml<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content =
            toml::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))?;
        fs::write(path, content).map_err(|e| ConfigError::Io(e.to_string()))?;
        Ok(())
    }

    /// Get a specific backend config
    pub fn get_backend(&self, name: &str) -> Option<&BackendConfig> {
        self.backends.get(name)
    }

    /// Names of backends to register, in order, skipping disabled entries
    pub fn selected_backends(&self) -> Vec<&str> {
        self.evaluation
            .backends
            .iter()
            .map(|s| s.as_str())
            .filter(|name| self.get_backend(name).map(|b| b.enabled).unwrap_or(true))
            .collect()
    }

    /// Language a backend should request
    pub fn language_for(&self, name: &str) -> &str {
        self.get_backend(name)
            .and_then(|b| b.language.as_deref())
            .unwrap_or(&self.evaluation.language)
    }

    /// HTTP timeout a backend applies to its own calls
    pub fn timeout_for(&self, name: &str) -> Duration {
        let ms = self
            .get_backend(name)
            .and_then(|b| b.timeout_ms)
            .unwrap_or(self.evaluation.timeout_ms);
        Duration::from_millis(ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        let mut backends = IndexMap::new();

        for name in KNOWN_BACKENDS {
            let backend = match *name {
                "skyttle" | "chatterbox" => BackendConfig::from_env_key("MASHAPE_AUTH"),
                "bitext" => BackendConfig {
                    enabled: true,
                    user: Some(String::new()),
                    password: Some(String::new()),
                    ..Default::default()
                },
                other => BackendConfig::from_env_key(&format!("{}_API_KEY", other.to_uppercase())),
            };
            backends.insert(name.to_string(), backend);
        }

        Self {
            evaluation: EvaluationConfig::default(),
            backends,
        }
    }
}

/// Configuration errors; all are fatal before any document is dispatched
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Unknown backend: {0}")]
    UnknownBackend(String),

    #[error("Backend '{backend}' is missing required setting '{field}'")]
    MissingCredential { backend: String, field: String },

    #[error("Backend '{backend}' does not support language '{language}'")]
    UnsupportedLanguage { backend: String, language: String },

    #[error("Backend '{0}' is registered more than once")]
    DuplicateBackend(String),

    #[error("No backends selected")]
    NoBackends,

    #[error("Backend '{backend}': failed to build HTTP client: {message}")]
    HttpClient { backend: String, message: String },
}
