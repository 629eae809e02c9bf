use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use handlebars::Handlebars;
use serde_json::{Map, Value as JsonValue};
use thiserror::Error;

use crate::engine::OutputMap;

use super::repository::LoadedTemplate;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to render template '{name}': {source}")]
    Template {
        name: String,
        #[source]
        source: Box<handlebars::RenderError>,
    },

    #[error("failed to serialize collected values: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to write document {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Values available to every document besides the collected ones.
pub const BUILTIN_KEYS: &[&str] = &["template_name", "date", "time"];

/// The object a document is rendered against: collected values plus builtins.
///
/// Collected keys win over builtins of the same name.
pub fn build_context(
    template: &LoadedTemplate,
    values: &OutputMap,
    now: DateTime<Local>,
) -> Result<JsonValue, RenderError> {
    let mut ctx = Map::new();
    ctx.insert("template_name".into(), template.logical_name().into());
    ctx.insert("date".into(), now.format("%d.%m.%Y").to_string().into());
    ctx.insert("time".into(), now.format("%H:%M").to_string().into());

    if let JsonValue::Object(collected) = serde_json::to_value(values)? {
        ctx.extend(collected);
    }
    Ok(JsonValue::Object(ctx))
}

/// Render the template's document with plain substitution (no HTML escaping).
pub fn render(
    template: &LoadedTemplate,
    values: &OutputMap,
    now: DateTime<Local>,
) -> Result<String, RenderError> {
    let ctx = build_context(template, values, now)?;

    let mut handlebars = Handlebars::new();
    handlebars.register_escape_fn(handlebars::no_escape);

    handlebars.render_template(&template.body, &ctx).map_err(|e| RenderError::Template {
        name: template.logical_name().to_string(),
        source: Box::new(e),
    })
}

/// `<output_dir>/<logical_name>_<unix timestamp>.<ext>`.
pub fn default_output_path(
    output_dir: &Path,
    template: &LoadedTemplate,
    now: DateTime<Local>,
) -> PathBuf {
    output_dir.join(format!(
        "{}_{}.{}",
        template.logical_name(),
        now.timestamp(),
        template.info.document_extension()
    ))
}

/// Write a rendered document, creating parent directories.
pub fn write_document(path: &Path, content: &str) -> Result<(), RenderError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| RenderError::Io { path: parent.to_path_buf(), source: e })?;
    }
    fs::write(path, content).map_err(|e| RenderError::Io { path: path.to_path_buf(), source: e })
}
