use crate::FillArgs;
use crate::prompt::stdin_prompter;
use chrono::Local;
use docfill_core::engine::{CollectionEngine, PromptError, Prompter};
use docfill_core::templates::discovery::TemplateInfo;
use docfill_core::templates::engine::{default_output_path, render, write_document};
use std::path::Path;
use tracing::{debug, info};

pub fn run(config: Option<&Path>, profile: Option<&str>, args: &FillArgs) {
    let cfg = super::load_config("fill", config, profile);
    let repo = super::open_repository("fill", &cfg);
    let mut prompter = stdin_prompter();

    let name = match &args.template {
        Some(name) => name.clone(),
        None => select_template(repo.list_all(), prompter.as_mut())
            .unwrap_or_else(|e| super::fail("fill", e, super::EXIT_FAILURE)),
    };
    let template = super::load_template("fill", &repo, &name);
    debug!(template = %name, units = template.schema.units.len(), "starting collection");

    let values = CollectionEngine::new(prompter.as_mut(), cfg.engine_options())
        .run(&template.schema.units)
        .unwrap_or_else(|e| super::fail("fill", e, super::EXIT_FAILURE));

    if args.json {
        match serde_json::to_string_pretty(&values) {
            Ok(json) => println!("{json}"),
            Err(e) => super::fail("fill", e, super::EXIT_FAILURE),
        }
        return;
    }

    let now = Local::now();
    let rendered = render(&template, &values, now)
        .unwrap_or_else(|e| super::fail("fill", e, super::EXIT_FAILURE));
    let output = match &args.output {
        Some(path) => path.clone(),
        None => default_output_path(&cfg.output_dir, &template, now),
    };
    if let Err(e) = write_document(&output, &rendered) {
        super::fail("fill", e, super::EXIT_FAILURE);
    }

    info!(template = %name, output = %output.display(), "document written");
    println!("OK   docfill fill");
    println!("template: {name}");
    println!("output: {}", output.display());
}

/// Ask for a template by number or name until a listed one is given.
fn select_template(
    templates: &[TemplateInfo],
    prompter: &mut dyn Prompter,
) -> Result<String, String> {
    if templates.is_empty() {
        return Err("no templates found".to_string());
    }

    for (i, t) in templates.iter().enumerate() {
        prompter.notify(&format!("{:>3}. {}", i + 1, t.logical_name));
    }
    loop {
        let answer = prompter.read_line("Template: ").map_err(|e: PromptError| e.to_string())?;
        let answer = answer.trim();
        if let Some(choice) = pick(templates, answer) {
            return Ok(choice.logical_name.clone());
        }
        prompter.notify(&format!("No template '{answer}'."));
    }
}

fn pick<'a>(templates: &'a [TemplateInfo], answer: &str) -> Option<&'a TemplateInfo> {
    if let Ok(n) = answer.parse::<usize>() {
        return n.checked_sub(1).and_then(|i| templates.get(i));
    }
    templates.iter().find(|t| t.logical_name == answer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use docfill_core::engine::LinePrompter;
    use std::path::PathBuf;

    fn info(name: &str) -> TemplateInfo {
        TemplateInfo {
            logical_name: name.to_string(),
            dir: PathBuf::from(name),
            schema_path: PathBuf::from(name).join("schema.yaml"),
            document_path: PathBuf::from(name).join("doc.hbs"),
            hidden: false,
        }
    }

    #[test]
    fn select_by_number_or_name() {
        let templates = vec![info("lease"), info("power")];
        let mut prompter = LinePrompter::new("9\nnope\n2\n".as_bytes(), Vec::new());
        assert_eq!(select_template(&templates, &mut prompter).unwrap(), "power");

        let mut prompter = LinePrompter::new("lease\n".as_bytes(), Vec::new());
        assert_eq!(select_template(&templates, &mut prompter).unwrap(), "lease");
    }

    #[test]
    fn select_fails_without_templates() {
        let mut prompter = LinePrompter::new("".as_bytes(), Vec::new());
        assert!(select_template(&[], &mut prompter).is_err());
    }
}
