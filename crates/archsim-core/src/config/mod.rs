//! Configuration management for archsim.
//!
//! Configuration is loaded from multiple sources with the following priority:
//! 1. Environment variables (highest priority)
//! 2. Project-local `archsim.toml` file
//! 3. User config `~/.config/archsim/config.toml`
//! 4. Built-in defaults (lowest priority)

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::matching::CompareMode;
use crate::similarity::Weights;

mod defaults;

pub use defaults::*;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Scoring configuration.
    pub similarity: SimilarityConfig,

    /// Input and output locations.
    pub paths: PathsConfig,

    /// Embedding source configuration.
    pub embedding: EmbeddingConfig,

    /// Worker pool configuration.
    pub scheduler: SchedulerConfig,
}

impl Config {
    /// Load configuration from default locations.
    ///
    /// Searches for config in order:
    /// 1. `./archsim.toml` (project local)
    /// 2. `~/.config/archsim/config.toml` (user config)
    /// 3. Falls back to defaults
    pub fn load() -> Result<Self, ConfigError> {
        if Path::new(CONFIG_FILE_NAME).exists() {
            return Self::from_file(CONFIG_FILE_NAME);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join(CONFIG_DIR_NAME).join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        let mut config = Self::default();
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load configuration from a specific file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&content)?;

        config.apply_env_overrides();

        Ok(config)
    }

    /// Apply environment variable overrides.
    fn apply_env_overrides(&mut self) {
        if let Ok(w) = std::env::var("ARCHSIM_WEIGHT_STRUCTURAL") {
            if let Ok(n) = w.parse() {
                self.similarity.weight_structural = n;
            }
        }
        if let Ok(w) = std::env::var("ARCHSIM_WEIGHT_SEMANTIC") {
            if let Ok(n) = w.parse() {
                self.similarity.weight_semantic = n;
            }
        }
        if let Ok(mode) = std::env::var("ARCHSIM_COMPARE_MODE") {
            if let Ok(m) = mode.parse() {
                self.similarity.compare_mode = m;
            }
        }
        if let Ok(test) = std::env::var("ARCHSIM_TEST") {
            if let Ok(b) = test.parse() {
                self.similarity.test = b;
            }
        }

        if let Ok(dir) = std::env::var("ARCHSIM_JSON_DIR") {
            self.paths.json_dir = dir;
        }

        if let Ok(threads) = std::env::var("ARCHSIM_THREADS") {
            if let Ok(n) = threads.parse() {
                self.scheduler.threads = Some(n);
            }
        }
    }

    /// Check the configuration before any comparison work starts.
    ///
    /// Outside sweep mode the two weights must sum to 1.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.similarity.test {
            self.similarity
                .weights()
                .validate()
                .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        }
        if self.scheduler.threads == Some(0) {
            return Err(ConfigError::Invalid(
                "scheduler.threads must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Create a default config file content as a string.
    pub fn default_config_string() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

/// Scoring configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimilarityConfig {
    /// Weight of the structural score.
    pub weight_structural: f64,

    /// Weight of the normalized semantic score.
    pub weight_semantic: f64,

    /// Normalization policy: "max", "min" or "average".
    pub compare_mode: CompareMode,

    /// Sweep the weight split instead of using the configured weights.
    pub test: bool,
}

impl Default for SimilarityConfig {
    fn default() -> Self {
        Self {
            weight_structural: DEFAULT_WEIGHT_STRUCTURAL,
            weight_semantic: DEFAULT_WEIGHT_SEMANTIC,
            compare_mode: DEFAULT_COMPARE_MODE.parse().unwrap_or_default(),
            test: false,
        }
    }
}

impl SimilarityConfig {
    pub fn weights(&self) -> Weights {
        Weights::new(self.weight_structural, self.weight_semantic)
    }
}

/// Input and output locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Directory of JSON instance documents.
    pub json_dir: String,

    /// Output CSV for the structural matrix.
    pub structural_csv: String,

    /// Output CSV for the semantic matrix.
    pub semantic_csv: String,

    /// Output CSV for the combined matrix.
    pub combined_csv: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            json_dir: DEFAULT_JSON_DIR.to_string(),
            structural_csv: DEFAULT_STRUCTURAL_CSV.to_string(),
            semantic_csv: DEFAULT_SEMANTIC_CSV.to_string(),
            combined_csv: DEFAULT_COMBINED_CSV.to_string(),
        }
    }
}

impl PathsConfig {
    pub fn json_path(&self) -> PathBuf {
        PathBuf::from(&self.json_dir)
    }
}

/// Embedding source configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// FastEmbed model name, used when no vector file is set.
    pub model: String,

    /// Text vector file (`word v1 v2 ...` per line). Takes precedence over `model`.
    pub vectors_file: Option<String>,

    /// Model cache directory. Defaults to `~/.archsim/cache/`.
    pub cache_dir: Option<String>,

    /// Words removed from names before lookup.
    pub stop_words: Vec<String>,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_EMBEDDING_MODEL.to_string(),
            vectors_file: None,
            cache_dir: None,
            stop_words: crate::semantic::DEFAULT_STOP_WORDS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// Worker pool configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Worker threads. Defaults to the available parallelism.
    pub threads: Option<usize>,
}
