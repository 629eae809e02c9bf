use std::path::Path;

pub fn run(config: Option<&Path>, profile: Option<&str>) {
    let rc = super::load_config("list-templates", config, profile);
    let repo = super::open_repository("list-templates", &rc);

    let list = repo.list_all();
    if list.is_empty() && repo.invalid.is_empty() {
        println!("(no templates found)");
        return;
    }
    for t in list {
        if t.hidden {
            println!("{} (dev)", t.logical_name);
        } else {
            println!("{}", t.logical_name);
        }
    }
    println!("-- {} templates --", list.len());
    for t in &repo.invalid {
        println!("skipped: {} (see docfill check {})", t.logical_name, t.logical_name);
    }
}
