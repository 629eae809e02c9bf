use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::config::types::ResolvedConfig;
use crate::schema::{SchemaLoadError, TemplateSchema, load_group_library, load_template_schema};
use crate::templates::discovery::{
    InvalidTemplate, TemplateDiscoveryError, TemplateInfo, discover_templates,
};

#[derive(Debug, Error)]
pub enum TemplateRepoError {
    #[error(transparent)]
    Discovery(#[from] TemplateDiscoveryError),

    #[error("template not found: {0}")]
    NotFound(String),

    #[error("template {name} is unusable: {reason}")]
    Invalid { name: String, reason: String },

    #[error("failed to read template file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Schema(#[from] SchemaLoadError),
}

impl TemplateRepoError {
    /// The template's schema is inconsistent, as opposed to missing or unreadable.
    pub fn is_definition_error(&self) -> bool {
        matches!(self, Self::Schema(e) if e.is_definition_error())
    }
}

/// A template with its schema validated and its document read.
#[derive(Debug, Clone)]
pub struct LoadedTemplate {
    pub info: TemplateInfo,
    pub schema: TemplateSchema,
    /// Document source.
    pub body: String,
}

impl LoadedTemplate {
    pub fn logical_name(&self) -> &str {
        &self.info.logical_name
    }
}

pub struct TemplateRepository {
    pub root: PathBuf,
    pub groups_file: PathBuf,
    pub templates: Vec<TemplateInfo>,
    pub invalid: Vec<InvalidTemplate>,
}

impl TemplateRepository {
    pub fn new(
        root: &Path,
        groups_file: &Path,
        include_hidden: bool,
    ) -> Result<Self, TemplateDiscoveryError> {
        let discovery = discover_templates(root, include_hidden)?;
        Ok(Self {
            root: root.to_path_buf(),
            groups_file: groups_file.to_path_buf(),
            templates: discovery.templates,
            invalid: discovery.invalid,
        })
    }

    pub fn from_config(cfg: &ResolvedConfig) -> Result<Self, TemplateDiscoveryError> {
        Self::new(&cfg.templates_dir, &cfg.groups_file, cfg.include_hidden)
    }

    pub fn list_all(&self) -> &[TemplateInfo] {
        &self.templates
    }

    /// Load `name`, validating its schema against the group library.
    pub fn get_by_name(&self, name: &str) -> Result<LoadedTemplate, TemplateRepoError> {
        let Some(info) = self.templates.iter().find(|t| t.logical_name == name) else {
            return Err(match self.invalid.iter().find(|t| t.logical_name == name) {
                Some(invalid) => TemplateRepoError::Invalid {
                    name: name.to_string(),
                    reason: invalid.error.to_string(),
                },
                None => TemplateRepoError::NotFound(name.to_string()),
            });
        };

        let library = load_group_library(&self.groups_file)?;
        let schema = load_template_schema(&info.schema_path, &library)?;

        let body = fs::read_to_string(&info.document_path).map_err(|e| TemplateRepoError::Io {
            path: info.document_path.clone(),
            source: e,
        })?;

        debug!(template = name, units = schema.units.len(), "template loaded");
        Ok(LoadedTemplate { info: info.clone(), schema, body })
    }
}
