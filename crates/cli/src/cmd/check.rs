use crate::CheckArgs;
use docfill_core::templates::engine::BUILTIN_KEYS;
use std::path::Path;

pub fn run(config: Option<&Path>, profile: Option<&str>, args: &CheckArgs) {
    let rc = super::load_config("check", config, profile);
    let repo = super::open_repository("check", &rc);
    let loaded = super::load_template("check", &repo, &args.template);

    println!("OK   docfill check");
    println!("template: {}", loaded.logical_name());
    if let Some(description) = &loaded.schema.description {
        println!("description: {description}");
    }
    println!("document: {}", loaded.info.document_path.display());
    println!("units:");
    for (i, unit) in loaded.schema.units.iter().enumerate() {
        println!("  {}. {}", i + 1, unit.describe());
    }
    println!("builtins: {}", BUILTIN_KEYS.join(", "));
}
