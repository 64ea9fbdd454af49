//! Configuration management for cv-match

use crate::error::{CvMatchError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_OLLAMA_HOST: &str = "127.0.0.1:11434";
pub const DEFAULT_OLLAMA_MODEL: &str = "qwen2.5-coder:7b";
pub const DEFAULT_OPENAI_HOST: &str = "https://api.openai.com";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4";
pub const DEFAULT_API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Scores strictly above this value pass.
pub const DEFAULT_PASS_THRESHOLD: f64 = 70.0;
/// Looser policy used by some deployments; paired with an inclusive comparison.
pub const ALTERNATE_PASS_THRESHOLD: f64 = 60.0;

pub const DEFAULT_EVALUATION_TEMPERATURE: f64 = 0.0;
pub const DEFAULT_IMPROVEMENT_TEMPERATURE: f64 = 0.4;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub backend: BackendConfig,
    pub generation: GenerationConfig,
    pub scoring: ScoringConfig,
    pub prompts: PromptConfig,
    pub input: InputConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    Ollama,
    OpenAi,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    pub kind: BackendKind,
    /// Host or base URL; the backend default applies when unset.
    pub host: Option<String>,
    /// Model identifier; the backend default applies when unset.
    pub model: Option<String>,
    /// Explicit API key. Takes precedence over `api_key_env`.
    pub api_key: Option<String>,
    pub api_key_env: String,
    /// No timeout when unset: a hung backend blocks the run.
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Log the failure and carry on with an absent reply.
    Continue,
    /// Stop the run with the chat error.
    Abort,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub evaluation_temperature: f64,
    pub improvement_temperature: f64,
    pub on_failure: FailurePolicy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub pass_threshold: f64,
    /// Use `>=` instead of `>` against the threshold.
    pub inclusive: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptConfig {
    pub evaluation: PathBuf,
    pub improvement: PathBuf,
    pub builtin: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnsupportedPolicy {
    /// Treat an unsupported resume as empty text.
    Empty,
    /// Fail the run.
    Reject,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    pub unsupported_resume: UnsupportedPolicy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub color_output: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Console,
    Json,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            kind: BackendKind::Ollama,
            host: None,
            model: None,
            api_key: None,
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            timeout_secs: None,
        }
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            evaluation_temperature: DEFAULT_EVALUATION_TEMPERATURE,
            improvement_temperature: DEFAULT_IMPROVEMENT_TEMPERATURE,
            on_failure: FailurePolicy::Continue,
        }
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            pass_threshold: DEFAULT_PASS_THRESHOLD,
            inclusive: false,
        }
    }
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            evaluation: PathBuf::from("prompts/evaluation_prompt.txt"),
            improvement: PathBuf::from("prompts/improve_prompt.txt"),
            builtin: false,
        }
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            unsupported_resume: UnsupportedPolicy::Empty,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Console,
            color_output: true,
        }
    }
}

impl BackendConfig {
    pub fn host(&self) -> &str {
        match (&self.host, self.kind) {
            (Some(host), _) => host,
            (None, BackendKind::Ollama) => DEFAULT_OLLAMA_HOST,
            (None, BackendKind::OpenAi) => DEFAULT_OPENAI_HOST,
        }
    }

    pub fn model(&self) -> &str {
        match (&self.model, self.kind) {
            (Some(model), _) => model,
            (None, BackendKind::Ollama) => DEFAULT_OLLAMA_MODEL,
            (None, BackendKind::OpenAi) => DEFAULT_OPENAI_MODEL,
        }
    }

    /// Resolve the bearer token for hosted backends
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var(&self.api_key_env).ok())
            .filter(|key| !key.trim().is_empty())
    }
}

impl Config {
    /// Load configuration from an explicit path, or from the default location when it exists.
    ///
    /// An explicit path that does not exist is an error; a missing default file yields defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => {
                if !path.exists() {
                    return Err(CvMatchError::Configuration(format!(
                        "Config file does not exist: {}",
                        path.display()
                    )));
                }
                Self::from_file(path)
            }
            None => {
                let config_path = Self::config_path();
                if config_path.exists() {
                    Self::from_file(&config_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)
            .map_err(|e| CvMatchError::Configuration(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values no run can use, whichever layer set them.
    pub fn validate(&self) -> Result<()> {
        let threshold = self.scoring.pass_threshold;
        if !(0.0..=100.0).contains(&threshold) {
            return Err(CvMatchError::Configuration(format!(
                "scoring.pass_threshold must be between 0 and 100, got {}",
                threshold
            )));
        }
        if self.backend.timeout_secs == Some(0) {
            return Err(CvMatchError::Configuration(
                "backend.timeout_secs must be at least 1; omit it to wait indefinitely".to_string(),
            ));
        }
        Ok(())
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| CvMatchError::Configuration(format!("Failed to serialize config: {}", e)))
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("cv-match")
            .join("config.toml")
    }
}
