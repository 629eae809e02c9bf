use crate::config::types::{
    ConfigFile, LoggingConfig, Profile, PromptConfig, ResolvedConfig, WordsConfig,
};
use crate::words::Language;
use shellexpand::full;
use std::path::{Path, PathBuf};
use std::{env, fs};

use dirs::home_dir;
use thiserror::Error;
use tracing::debug;

/// Name of the shared group library inside a templates directory.
pub const GROUPS_FILE_NAME: &str = "groups.yaml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found at {0}")]
    NotFound(String),

    #[error("failed to read config file {0}: {1}")]
    ReadError(String, #[source] std::io::Error),

    #[error("failed to parse TOML in {0}: {1}")]
    ParseError(String, #[source] toml::de::Error),

    #[error("profile '{0}' not found")]
    ProfileNotFound(String),

    #[error("no profiles defined in config")]
    NoProfiles,

    #[error("version {0} is unsupported (expected 1)")]
    BadVersion(u32),

    #[error("unknown words language '{0}' (expected ru or en)")]
    UnknownLanguage(String),

    #[error("home directory not available to expand '~'")]
    NoHome,
}

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load and resolve the active profile.
    ///
    /// Without an explicit path, a missing default config file falls back to
    /// built-in settings rooted at the working directory.
    pub fn load(
        config_path: Option<&Path>,
        profile_override: Option<&str>,
    ) -> Result<ResolvedConfig, ConfigError> {
        let path = match config_path {
            Some(p) => p.to_path_buf(),
            None => {
                let path = default_config_path();
                if !path.exists() {
                    debug!(path = %path.display(), "no config file, using built-in defaults");
                    return Self::builtin(profile_override);
                }
                path
            }
        };

        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }

        let s = fs::read_to_string(&path)
            .map_err(|e| ConfigError::ReadError(path.display().to_string(), e))?;

        let cf: ConfigFile = toml::from_str(&s)
            .map_err(|e| ConfigError::ParseError(path.display().to_string(), e))?;

        if cf.version != 1 {
            return Err(ConfigError::BadVersion(cf.version));
        }
        if cf.profiles.is_empty() {
            return Err(ConfigError::NoProfiles);
        }

        let active = profile_override
            .map(ToOwned::to_owned)
            .or(cf.profile.clone())
            .unwrap_or_else(|| "default".to_string());

        let prof = cf
            .profiles
            .get(&active)
            .ok_or_else(|| ConfigError::ProfileNotFound(active.clone()))?;

        let mut resolved =
            Self::resolve_profile(&active, prof, &cf.words, &cf.prompt, &cf.logging)?;
        resolved.source = Some(path);
        Ok(resolved)
    }

    /// Settings used when no config file exists.
    pub fn builtin(profile_override: Option<&str>) -> Result<ResolvedConfig, ConfigError> {
        let active = profile_override.unwrap_or("default");
        if active != "default" {
            return Err(ConfigError::ProfileNotFound(active.to_string()));
        }
        let templates_dir = PathBuf::from("templates");
        Ok(ResolvedConfig {
            active_profile: active.to_string(),
            source: None,
            groups_file: templates_dir.join(GROUPS_FILE_NAME),
            templates_dir,
            output_dir: PathBuf::from("output"),
            include_hidden: false,
            language: Language::default(),
            confirm_above: PromptConfig::default().confirm_above,
            logging: LoggingConfig::default(),
        })
    }

    fn resolve_profile(
        active: &str,
        prof: &Profile,
        words: &WordsConfig,
        prompt: &PromptConfig,
        log_cfg: &LoggingConfig,
    ) -> Result<ResolvedConfig, ConfigError> {
        let templates_dir = expand_path(&prof.templates_dir)?;
        let output_dir = expand_path(&prof.output_dir)?;
        let groups_file = match &prof.groups_file {
            Some(file) => expand_path(file)?,
            None => templates_dir.join(GROUPS_FILE_NAME),
        };

        let language: Language = words
            .language
            .parse()
            .map_err(|_| ConfigError::UnknownLanguage(words.language.clone()))?;

        let logging = match &log_cfg.file {
            Some(file) => LoggingConfig {
                level: log_cfg.level.clone(),
                file_level: log_cfg.file_level.clone(),
                file: Some(expand_path(&file.to_string_lossy())?),
            },
            None => log_cfg.clone(),
        };

        Ok(ResolvedConfig {
            active_profile: active.to_string(),
            source: None,
            templates_dir,
            output_dir,
            groups_file,
            include_hidden: prof.include_hidden,
            language,
            confirm_above: prompt.confirm_above,
            logging,
        })
    }
}

pub fn default_config_path() -> PathBuf {
    if let Ok(xdg) = env::var("XDG_CONFIG_HOME") {
        return Path::new(&xdg).join("docfill").join("config.toml");
    }
    let home = home_dir().unwrap_or_else(|| PathBuf::from("~"));
    home.join(".config").join("docfill").join("config.toml")
}

fn expand_path(input: &str) -> Result<PathBuf, ConfigError> {
    let expanded = full(input).map_err(|_| ConfigError::NoHome)?;
    Ok(PathBuf::from(expanded.to_string()))
}
