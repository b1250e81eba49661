use resxgen::emitter::DEFAULT_RUNTIME_PATH;
use resxgen::runtime::{self, ResourceBundle, ResxBundle};
use resxgen::{AccessorModel, extract_file, render};
use std::path::{Path, PathBuf};

#[path = "fixtures/Strings.designer.rs"]
mod strings;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

#[test]
fn checked_in_module_matches_fresh_rendering() {
    let entries = extract_file(fixture("Strings.resx")).expect("fixture parses");
    let model = AccessorModel {
        namespace: "Demo.App".to_string(),
        resource_bundle_name: "Strings".to_string(),
        resource_file_name: "Strings.resx".to_string(),
        runtime_path: DEFAULT_RUNTIME_PATH.to_string(),
        entries,
        internalize: false,
    };
    assert_eq!(render(&model), include_str!("fixtures/Strings.designer.rs"));
}

#[test]
fn named_accessor_formats_arguments() {
    assert_eq!(strings::greeting("World").unwrap(), "Hello, World!");
}

#[test]
fn repeated_named_parameter_reuses_argument() {
    assert_eq!(strings::debt("Ann", 5).unwrap(), "Ann owes 5, Ann!");
}

#[test]
fn positional_accessor_takes_canonical_order() {
    assert_eq!(strings::order("first", "second").unwrap(), "second before first");
}

#[test]
fn zero_argument_accessor_returns_raw_value() {
    assert_eq!(strings::title().unwrap(), "Resource Helper");
    assert_eq!(strings::BUNDLE_NAME, "Demo.App.Strings");
}

#[test]
fn stale_bundle_reports_missing_resource() {
    let bundle = ResxBundle::from_file(strings::BUNDLE_NAME, fixture("Missing.resx")).unwrap();
    assert_eq!(bundle.name(), "Demo.App.Strings");

    let err = runtime::get_string(&bundle, "Greeting", &["name"]).unwrap_err();
    assert!(err.is_missing_resource());
    assert_eq!(
        err.to_string(),
        "value for key 'Greeting' was not found in resource bundle `Demo.App.Strings`"
    );
}

#[test]
fn non_string_resources_get_no_accessor() {
    let entries = extract_file(fixture("Strings.resx")).unwrap();
    assert!(entries.iter().all(|entry| entry.name != "Logo"));
    assert_eq!(entries.len(), 4);
}
