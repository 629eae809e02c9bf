pub mod check;
pub mod doctor;
pub mod fill;
pub mod list_templates;
pub mod words;

use crate::logging;
use docfill_core::config::loader::{ConfigLoader, default_config_path};
use docfill_core::config::types::ResolvedConfig;
use docfill_core::templates::repository::{LoadedTemplate, TemplateRepository};
use std::fmt::Display;
use std::path::Path;

/// Runtime failure: I/O, prompts, rendering.
pub const EXIT_FAILURE: i32 = 1;
/// The template schema itself is invalid.
pub const EXIT_DEFINITION: i32 = 2;

/// Report a failed command and exit.
pub fn fail(cmd: &str, err: impl Display, code: i32) -> ! {
    println!("FAIL docfill {cmd}");
    println!("{err}");
    logging::flush();
    std::process::exit(code);
}

/// Load the config and install logging, or exit.
pub fn load_config(cmd: &str, config: Option<&Path>, profile: Option<&str>) -> ResolvedConfig {
    match ConfigLoader::load(config, profile) {
        Ok(rc) => {
            logging::init(&rc);
            rc
        }
        Err(e) => {
            println!("FAIL docfill {cmd}");
            println!("{e}");
            if config.is_none() {
                println!("looked for: {}", default_config_path().display());
            }
            std::process::exit(EXIT_FAILURE);
        }
    }
}

pub fn open_repository(cmd: &str, cfg: &ResolvedConfig) -> TemplateRepository {
    TemplateRepository::from_config(cfg).unwrap_or_else(|e| fail(cmd, e, EXIT_FAILURE))
}

/// Load a template, exiting with [`EXIT_DEFINITION`] when its schema is invalid.
pub fn load_template(cmd: &str, repo: &TemplateRepository, name: &str) -> LoadedTemplate {
    repo.get_by_name(name).unwrap_or_else(|e| {
        let code = if e.is_definition_error() { EXIT_DEFINITION } else { EXIT_FAILURE };
        fail(cmd, e, code)
    })
}
