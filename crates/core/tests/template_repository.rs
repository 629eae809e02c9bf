use docfill_core::markers::CollectionUnit;
use docfill_core::templates::repository::{TemplateRepoError, TemplateRepository};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

fn write(path: &PathBuf, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

const GROUPS: &str = r#"
groups:
  names:
    fields:
      - { name: f_name, description: "First name" }
      - { name: s_name, description: "Surname" }
"#;

const LEASE_SCHEMA: &str = r#"
description: Lease agreement
groups:
  tenant:
    extends: [names]
    fields:
      - { name: phone, optional: true }
units:
  - group: tenant
  - repeat: { group: names, field: s_name, result: witnesses, description: witnesses }
"#;

fn setup(root: &Path) {
    write(&root.join("groups.yaml"), GROUPS);
    write(&root.join("lease").join("schema.yaml"), LEASE_SCHEMA);
    write(&root.join("lease").join("lease.md"), "# Lease for {{s_name}}\n");
    write(
        &root.join("broken").join("schema.yaml"),
        "units:\n  - group: missing_group\n",
    );
    write(&root.join("broken").join("broken.txt"), "{{x}}");
    write(&root.join("garbled").join("schema.yaml"), "units: [ {\n");
    write(&root.join("garbled").join("garbled.txt"), "{{x}}");
}

fn repository(root: &Path) -> TemplateRepository {
    TemplateRepository::new(root, &root.join("groups.yaml"), false).expect("discover ok")
}

#[test]
fn loads_template_with_shared_groups() {
    let tmp = tempdir().unwrap();
    setup(tmp.path());
    let repo = repository(tmp.path());

    let names: Vec<&str> = repo.list_all().iter().map(|t| t.logical_name.as_str()).collect();
    assert_eq!(names, vec!["broken", "garbled", "lease"]);

    let lease = repo.get_by_name("lease").expect("load ok");
    assert_eq!(lease.logical_name(), "lease");
    assert_eq!(lease.schema.description.as_deref(), Some("Lease agreement"));
    assert_eq!(lease.body, "# Lease for {{s_name}}\n");

    let kinds: Vec<&str> = lease.schema.units.iter().map(CollectionUnit::kind).collect();
    assert_eq!(kinds, vec!["group", "repeat"]);
    let tenant: Vec<&str> =
        lease.schema.units[0].group().fields().iter().map(|f| f.name()).collect();
    assert_eq!(tenant, vec!["f_name", "s_name", "phone"]);
}

#[test]
fn unknown_name_is_not_found() {
    let tmp = tempdir().unwrap();
    setup(tmp.path());
    let err = repository(tmp.path()).get_by_name("nope").unwrap_err();
    assert!(matches!(err, TemplateRepoError::NotFound(ref n) if n == "nope"));
    assert!(!err.is_definition_error());
}

#[test]
fn inconsistent_schema_is_a_definition_error() {
    let tmp = tempdir().unwrap();
    setup(tmp.path());
    let err = repository(tmp.path()).get_by_name("broken").unwrap_err();
    assert!(err.is_definition_error(), "got {err:?}");
    assert!(err.to_string().contains("missing_group"), "got {err}");
}

#[test]
fn unparsable_schema_is_not_a_definition_error() {
    let tmp = tempdir().unwrap();
    setup(tmp.path());
    let err = repository(tmp.path()).get_by_name("garbled").unwrap_err();
    assert!(matches!(err, TemplateRepoError::Schema(_)));
    assert!(!err.is_definition_error());
}

#[test]
fn missing_group_library_only_breaks_templates_that_need_it() {
    let tmp = tempdir().unwrap();
    let root = tmp.path();
    write(
        &root.join("solo").join("schema.yaml"),
        "groups:\n  g: { fields: [{ name: x }] }\nunits:\n  - group: g\n",
    );
    write(&root.join("solo").join("solo.md"), "{{x}}");

    let repo = repository(root);
    assert!(repo.get_by_name("solo").is_ok());
}

#[test]
fn template_with_broken_document_set_is_reported_by_name() {
    let tmp = tempdir().unwrap();
    setup(tmp.path());
    write(&tmp.path().join("twice").join("schema.yaml"), LEASE_SCHEMA);
    write(&tmp.path().join("twice").join("a.md"), "a");
    write(&tmp.path().join("twice").join("b.txt"), "b");

    let repo = repository(tmp.path());
    assert!(repo.list_all().iter().all(|t| t.logical_name != "twice"));
    assert!(repo.get_by_name("lease").is_ok());

    let err = repo.get_by_name("twice").unwrap_err();
    assert!(matches!(err, TemplateRepoError::Invalid { ref name, .. } if name == "twice"));
    assert!(err.to_string().contains("a.md, b.txt"), "got {err}");
    assert!(!err.is_definition_error());
}
