use chrono::{Local, TimeZone};
use docfill_core::engine::{CollectionEngine, EngineOptions, LinePrompter};
use docfill_core::schema::{GroupLibrary, load_template_schema};
use docfill_core::templates::discovery::TemplateInfo;
use docfill_core::templates::engine::render;
use docfill_core::templates::repository::LoadedTemplate;
use insta::assert_snapshot;
use std::path::PathBuf;

fn power_of_attorney() -> LoadedTemplate {
    let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/power");
    let schema_path = dir.join("schema.yaml");
    let document_path = dir.join("power.md");
    let schema = load_template_schema(&schema_path, &GroupLibrary::default()).unwrap();
    LoadedTemplate {
        info: TemplateInfo {
            logical_name: "power".into(),
            dir,
            schema_path,
            document_path,
            hidden: false,
        },
        schema,
        body: include_str!("fixtures/power/power.md").to_string(),
    }
}

#[test]
fn golden_power_of_attorney() {
    let template = power_of_attorney();
    let input = "2\nIvan\nPetrov\nМ\nAnna\nSidorova\nЖ\n12.5\n45.5\n4.25\n\n";
    let mut prompter = LinePrompter::new(input.as_bytes(), Vec::new());
    let values = CollectionEngine::new(&mut prompter, EngineOptions::default())
        .run(&template.schema.units)
        .unwrap();

    let now = Local.with_ymd_and_hms(2024, 3, 5, 10, 30, 0).unwrap();
    let out = render(&template, &values, now).unwrap();

    assert_snapshot!(out, @r"
    # Power of attorney

    Issued by гражданин Petrov Ivan, гражданка Sidorova Anna.

    Flat No. 12.5 (двенадцать точка пять), area 45.5 (сорок пять целых пять десятых) sq. m,
    total 49.75 sq. m with adjacent rooms.

    Division code: 500-127.
    ");
}

#[test]
fn golden_optional_field_left_empty() {
    let template = power_of_attorney();
    let input = "1\nIvan\nPetrov\nМ\n3\n30.5\n\n111-222\n";
    let mut prompter = LinePrompter::new(input.as_bytes(), Vec::new());
    let values = CollectionEngine::new(&mut prompter, EngineOptions::default())
        .run(&template.schema.units)
        .unwrap();

    let out = render(&template, &values, Local::now()).unwrap();

    assert_snapshot!(out, @r"
    # Power of attorney

    Issued by гражданин Petrov Ivan.

    Flat No. 3 (три), area 30.5 (тридцать целых пять десятых) sq. m,
    total  sq. m with adjacent rooms.

    Division code: 111-222.
    ");
}
