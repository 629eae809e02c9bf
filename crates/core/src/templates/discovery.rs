use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::warn;
use walkdir::WalkDir;

/// File every template directory must contain.
pub const SCHEMA_FILE_NAME: &str = "schema.yaml";

/// Extensions recognised as the template's document.
pub const DOCUMENT_EXTENSIONS: &[&str] = &["hbs", "md", "txt"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateInfo {
    /// Directory name without the development `_` prefix.
    pub logical_name: String,
    pub dir: PathBuf,
    pub schema_path: PathBuf,
    pub document_path: PathBuf,
    /// Development template (directory name starts with `_`).
    pub hidden: bool,
}

impl TemplateInfo {
    /// Extension of the document, reused for the rendered output.
    pub fn document_extension(&self) -> &str {
        self.document_path.extension().and_then(|e| e.to_str()).unwrap_or("txt")
    }
}

#[derive(Debug, Error)]
pub enum TemplateDiscoveryError {
    #[error("templates directory does not exist: {0}")]
    MissingDir(String),

    #[error("failed to read templates directory {0}: {1}")]
    WalkError(String, #[source] walkdir::Error),

    #[error("template {0} has no document file (.hbs, .md or .txt)")]
    NoDocument(String),

    #[error("template {0} has several document files: {names}", names = .1.join(", "))]
    AmbiguousDocument(String, Vec<String>),
}

/// A template directory that holds a schema but cannot be used as is.
#[derive(Debug)]
pub struct InvalidTemplate {
    pub logical_name: String,
    pub dir: PathBuf,
    pub error: TemplateDiscoveryError,
}

/// Result of scanning a templates directory.
#[derive(Debug, Default)]
pub struct Discovery {
    /// Usable templates, sorted by logical name.
    pub templates: Vec<TemplateInfo>,
    /// Directories skipped because of a document problem, sorted by logical name.
    pub invalid: Vec<InvalidTemplate>,
}

/// Scan the direct subdirectories of `root` for templates.
///
/// Subdirectories without a `schema.yaml` are ignored. Development templates
/// are only listed with `include_hidden`. A directory with zero or several
/// documents is skipped with a warning and kept in [`Discovery::invalid`].
pub fn discover_templates(
    root: &Path,
    include_hidden: bool,
) -> Result<Discovery, TemplateDiscoveryError> {
    if !root.is_dir() {
        return Err(TemplateDiscoveryError::MissingDir(root.display().to_string()));
    }

    let mut out = Discovery::default();
    for entry in WalkDir::new(root).min_depth(1).max_depth(1) {
        let entry = entry
            .map_err(|e| TemplateDiscoveryError::WalkError(root.display().to_string(), e))?;
        if !entry.file_type().is_dir() {
            continue;
        }
        let dir = entry.path();
        let schema_path = dir.join(SCHEMA_FILE_NAME);
        if !schema_path.is_file() {
            continue;
        }

        let Some(dir_name) = dir.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let hidden = dir_name.starts_with('_');
        if hidden && !include_hidden {
            continue;
        }

        match find_document(dir) {
            Ok(document_path) => out.templates.push(TemplateInfo {
                logical_name: logical_name(dir_name),
                dir: dir.to_path_buf(),
                schema_path,
                document_path,
                hidden,
            }),
            Err(error) => {
                warn!(dir = %dir.display(), %error, "skipping template");
                out.invalid.push(InvalidTemplate {
                    logical_name: logical_name(dir_name),
                    dir: dir.to_path_buf(),
                    error,
                });
            }
        }
    }

    out.templates.sort_by(|a, b| a.logical_name.cmp(&b.logical_name));
    out.invalid.sort_by(|a, b| a.logical_name.cmp(&b.logical_name));
    Ok(out)
}

fn find_document(dir: &Path) -> Result<PathBuf, TemplateDiscoveryError> {
    let mut documents = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry =
            entry.map_err(|e| TemplateDiscoveryError::WalkError(dir.display().to_string(), e))?;
        if entry.file_type().is_file() && is_document_file(entry.path()) {
            documents.push(entry.into_path());
        }
    }

    match documents.len() {
        0 => Err(TemplateDiscoveryError::NoDocument(dir.display().to_string())),
        1 => Ok(documents.remove(0)),
        _ => {
            let mut names: Vec<String> = documents
                .iter()
                .filter_map(|p| p.file_name().and_then(|n| n.to_str()).map(str::to_string))
                .collect();
            names.sort();
            Err(TemplateDiscoveryError::AmbiguousDocument(dir.display().to_string(), names))
        }
    }
}

fn is_document_file(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    // Office/editor lock files.
    if name.starts_with("~$") {
        return false;
    }
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| DOCUMENT_EXTENSIONS.contains(&ext))
}

fn logical_name(dir_name: &str) -> String {
    dir_name.strip_prefix('_').unwrap_or(dir_name).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_files() {
        assert!(is_document_file(Path::new("t/doc.hbs")));
        assert!(is_document_file(Path::new("t/doc.md")));
        assert!(!is_document_file(Path::new("t/~$doc.md")));
        assert!(!is_document_file(Path::new("t/schema.yaml")));
        assert!(!is_document_file(Path::new("t/doc.docx")));
    }

    #[test]
    fn logical_name_strips_dev_prefix() {
        assert_eq!(logical_name("_draft"), "draft");
        assert_eq!(logical_name("lease"), "lease");
    }
}
