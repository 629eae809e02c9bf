//! Dynamic value completers for shell completion.

use clap_complete::engine::CompletionCandidate;
use docfill_core::config::loader::ConfigLoader;
use docfill_core::templates::repository::TemplateRepository;
use std::ffi::OsStr;

/// Complete template names from the active profile's templates directory.
pub fn complete_templates(current: &OsStr) -> Vec<CompletionCandidate> {
    let current_str = current.to_str().unwrap_or("");

    let Ok(cfg) = ConfigLoader::load(None, None) else {
        return Vec::new();
    };
    let Ok(repo) = TemplateRepository::from_config(&cfg) else {
        return Vec::new();
    };

    repo.list_all()
        .iter()
        .filter(|info| info.logical_name.starts_with(current_str))
        .map(|info| {
            let candidate = CompletionCandidate::new(&info.logical_name);
            if info.hidden { candidate.help(Some("development template".into())) } else { candidate }
        })
        .collect()
}
