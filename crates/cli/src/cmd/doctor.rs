use docfill_core::config::loader::{ConfigLoader, default_config_path};
use std::path::Path;

pub fn run(config: Option<&Path>, profile: Option<&str>) {
    match ConfigLoader::load(config, profile) {
        Ok(rc) => {
            crate::logging::init(&rc);
            tracing::debug!(profile = %rc.active_profile, "configuration resolved");
            println!("OK   docfill doctor");
            match &rc.source {
                Some(path) => println!("path: {}", path.display()),
                None => println!(
                    "path: (built-in defaults; {} not found)",
                    default_config_path().display()
                ),
            }
            println!("profile: {}", rc.active_profile);
            println!("templates_dir: {}", rc.templates_dir.display());
            println!("output_dir: {}", rc.output_dir.display());
            println!("groups_file: {}", rc.groups_file.display());
            println!("include_hidden: {}", rc.include_hidden);
            println!("words.language: {}", rc.language);
            println!("prompt.confirm_above: {}", rc.confirm_above);
            println!("logging.level: {}", rc.logging.level);
            if let Some(file) = &rc.logging.file {
                println!("logging.file: {}", file.display());
            }
        }
        Err(e) => {
            println!("FAIL docfill doctor");
            println!("{e}");
            if config.is_none() {
                println!("looked for: {}", default_config_path().display());
            }
            std::process::exit(super::EXIT_FAILURE);
        }
    }
}
