//! @acp:module "Configuration"
//! @acp:summary "Project configuration loading, defaults and environment overlay"
//! @acp:domain cli
//! @acp:layer config
//!
//! Defaults are resolved once, at the CLI boundary. Library code receives
//! the finished `Config` (or one of its sections) and never reads the
//! environment itself.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::post::DEFAULT_RELATED_LINE;

/// Default config file name in the project root
pub const DEFAULT_CONFIG_FILE: &str = ".praeparium.json";

/// @acp:summary "Main Praeparium configuration structure"
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Chat-completion writer settings
    #[serde(default)]
    pub writer: WriterConfig,

    /// Post-processing settings
    #[serde(default)]
    pub post: PostConfig,

    /// QA thresholds used when no bundle targets are supplied
    #[serde(default)]
    pub qa: QaConfig,

    /// Input/output locations
    #[serde(default)]
    pub paths: PathsConfig,

    /// Publishing target
    #[serde(default)]
    pub publish: PublishConfig,
}

impl Config {
    /// @acp:summary "Load config from a .praeparium.json file"
    pub fn load<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| crate::PraepError::parse(path, e))
    }

    /// Overlay environment values onto the loaded config.
    ///
    /// `lookup` is normally `|k| std::env::var(k).ok()`; tests pass a map.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = non_empty("OPENAI_API_KEY") {
            self.writer.api_key = Some(key);
        }
        if let Some(model) = non_empty("PRAEPARIUM_MODEL") {
            self.writer.model = model;
        }
        if let Some(base) = non_empty("PRAEPARIUM_API_BASE") {
            self.writer.api_base = base;
        }
        if let Some(author) = non_empty("PRAEPARIUM_AUTHOR") {
            self.post.default_author = author;
        }
        if let Some(url) = non_empty("WP_BASE_URL") {
            self.publish.base_url = Some(url);
        }
        if let Some(user) = non_empty("WP_USERNAME") {
            self.publish.username = Some(user);
        }
        if let Some(password) = non_empty("WP_APP_PASSWORD") {
            self.publish.password = Some(password);
        }
    }
}

fn default_model() -> String {
    "gpt-4o".to_string()
}

fn default_api_base() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_temperature() -> f64 {
    0.25
}

fn default_top_p() -> f64 {
    0.9
}

fn default_frequency_penalty() -> f64 {
    0.1
}

fn default_min_chars() -> usize {
    400
}

/// @acp:summary "Chat-completion writer configuration"
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WriterConfig {
    /// Model name sent with every request
    #[serde(default = "default_model")]
    pub model: String,

    /// Base URL of the OpenAI-compatible API
    #[serde(default = "default_api_base", rename = "apiBase")]
    pub api_base: String,

    /// Bearer token; usually supplied through the environment
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,

    #[serde(default = "default_temperature")]
    pub temperature: f64,

    #[serde(default = "default_top_p", rename = "topP")]
    pub top_p: f64,

    #[serde(default = "default_frequency_penalty", rename = "frequencyPenalty")]
    pub frequency_penalty: f64,

    #[serde(default, rename = "presencePenalty")]
    pub presence_penalty: f64,

    /// Minimum trimmed length of an acceptable generation
    #[serde(default = "default_min_chars", rename = "minChars")]
    pub min_chars: usize,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            api_base: default_api_base(),
            api_key: None,
            temperature: default_temperature(),
            top_p: default_top_p(),
            frequency_penalty: default_frequency_penalty(),
            presence_penalty: 0.0,
            min_chars: default_min_chars(),
        }
    }
}

fn default_author() -> String {
    "Praeparium Editorial Team".to_string()
}

fn default_related_line() -> String {
    DEFAULT_RELATED_LINE.to_string()
}

/// @acp:summary "Post-processing configuration"
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostConfig {
    /// Byline name used when an article has none
    #[serde(default = "default_author", rename = "defaultAuthor")]
    pub default_author: String,

    /// Internal-link line appended to every article
    #[serde(default = "default_related_line", rename = "relatedLine")]
    pub related_line: String,
}

impl Default for PostConfig {
    fn default() -> Self {
        Self {
            default_author: default_author(),
            related_line: default_related_line(),
        }
    }
}

fn default_fk_max() -> f64 {
    8.0
}

fn default_style_min() -> f64 {
    0.85
}

/// @acp:summary "QA thresholds"
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QaConfig {
    #[serde(default = "default_fk_max", rename = "fkMax")]
    pub fk_max: f64,

    #[serde(default = "default_style_min", rename = "styleMin")]
    pub style_min: f64,
}

impl Default for QaConfig {
    fn default() -> Self {
        Self {
            fk_max: default_fk_max(),
            style_min: default_style_min(),
        }
    }
}

fn default_registry_dir() -> PathBuf {
    PathBuf::from("data/registry")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("out")
}

/// @acp:summary "Input/output path configuration"
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Registry root; authors live in `<registry>/authors/`
    #[serde(default = "default_registry_dir", rename = "registryDir")]
    pub registry_dir: PathBuf,

    /// Default output directory for generated markdown
    #[serde(default = "default_output_dir", rename = "outputDir")]
    pub output_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            registry_dir: default_registry_dir(),
            output_dir: default_output_dir(),
        }
    }
}

/// @acp:summary "WordPress publishing configuration"
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PublishConfig {
    #[serde(default, rename = "baseUrl", skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    /// Application password; never written back to disk
    #[serde(default, skip_serializing)]
    pub password: Option<String>,
}
