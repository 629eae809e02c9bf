use std::collections::HashMap;
use std::path::PathBuf;

use serde::Deserialize;

use crate::engine::{DEFAULT_CONFIRM_ABOVE, EngineOptions};
use crate::words::Language;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub version: u32,
    pub profile: Option<String>,
    pub profiles: HashMap<String, Profile>,
    #[serde(default)]
    pub words: WordsConfig,
    #[serde(default)]
    pub prompt: PromptConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Profile {
    pub templates_dir: String,
    pub output_dir: String,
    /// Shared group library (defaults to `groups.yaml` in the templates directory).
    pub groups_file: Option<String>,
    /// List development templates (directories starting with `_`).
    #[serde(default)]
    pub include_hidden: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WordsConfig {
    #[serde(default = "default_language")]
    pub language: String,
}

impl Default for WordsConfig {
    fn default() -> Self {
        Self { language: default_language() }
    }
}

fn default_language() -> String {
    Language::default().as_str().to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct PromptConfig {
    /// Repeat counts above this must be confirmed.
    #[serde(default = "default_confirm_above")]
    pub confirm_above: usize,
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self { confirm_above: default_confirm_above() }
    }
}

fn default_confirm_above() -> usize {
    DEFAULT_CONFIRM_ABOVE
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub file_level: Option<String>,
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: default_log_level(), file_level: None, file: None }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub active_profile: String,
    /// Config file the settings came from; `None` for built-in defaults.
    pub source: Option<PathBuf>,
    pub templates_dir: PathBuf,
    pub output_dir: PathBuf,
    pub groups_file: PathBuf,
    pub include_hidden: bool,
    pub language: Language,
    pub confirm_above: usize,
    pub logging: LoggingConfig,
}

impl ResolvedConfig {
    pub fn engine_options(&self) -> EngineOptions {
        EngineOptions { language: self.language, confirm_above: self.confirm_above }
    }
}
