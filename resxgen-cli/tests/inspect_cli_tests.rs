use std::fs;
use std::path::PathBuf;
use std::process::Command;
use tempfile::TempDir;

fn resxgen_cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("resxgen"))
}

fn resource_file(temp_dir: &TempDir) -> PathBuf {
    let path = temp_dir.path().join("Strings.resx");
    fs::write(
        &path,
        r#"<?xml version="1.0" encoding="utf-8"?>
<root>
  <data name="Greeting" xml:space="preserve">
    <value>Hello, {name}!</value>
    <comment>Greets someone by name.</comment>
  </data>
  <data name="Order" xml:space="preserve">
    <value>{1} before {0}</value>
  </data>
  <data name="Type" xml:space="preserve">
    <value>A very long value that keeps going well past the fifty column limit of the view</value>
  </data>
</root>
"#,
    )
    .unwrap();
    path
}

#[test]
fn test_render_named_parameter() {
    let temp_dir = TempDir::new().unwrap();
    let input = resource_file(&temp_dir);

    let output = resxgen_cmd()
        .args(["render", "-i", input.to_str().unwrap(), "-k", "Greeting", "--arg", "World"])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "Hello, World!\n");
}

#[test]
fn test_render_positional_parameters() {
    let temp_dir = TempDir::new().unwrap();
    let input = resource_file(&temp_dir);

    let output = resxgen_cmd()
        .args([
            "render",
            "-i",
            input.to_str().unwrap(),
            "-k",
            "Order",
            "-a",
            "first",
            "-a",
            "second",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "second before first\n");
}

#[test]
fn test_render_missing_key_reports_bundle() {
    let temp_dir = TempDir::new().unwrap();
    let input = resource_file(&temp_dir);

    let output = resxgen_cmd()
        .args(["render", "-i", input.to_str().unwrap(), "-k", "Missing"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(
        String::from_utf8_lossy(&output.stderr)
            .contains("value for key 'Missing' was not found in resource bundle `Strings`")
    );
}

#[test]
fn test_view_lists_accessors() {
    let temp_dir = TempDir::new().unwrap();
    let input = resource_file(&temp_dir);

    let output = resxgen_cmd()
        .args(["view", "-i", input.to_str().unwrap()])
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Entries: 3"));
    assert!(stdout.contains("Accessor: greeting()"));
    assert!(stdout.contains("Accessor: r#type()"));
    assert!(stdout.contains("Parameters: named [name]"));
    assert!(stdout.contains("Parameters: positional [0, 1]"));
    assert!(stdout.contains("Comment: Greets someone by name."));
    assert!(stdout.contains("..."));

    let full = resxgen_cmd()
        .args(["view", "-i", input.to_str().unwrap(), "--full"])
        .output()
        .unwrap();
    assert!(String::from_utf8_lossy(&full.stdout).contains("past the fifty column limit of the view"));
}

#[test]
fn test_completions() {
    let output = resxgen_cmd().args(["completions", "bash"]).output().unwrap();
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("resxgen"));
}
