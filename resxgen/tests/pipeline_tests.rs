use resxgen::resx::{DataNode, Format};
use resxgen::{GenerateOptions, Generator, Parser, ProjectManifest, SyncOutcome, WriteStatus};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const PROJECT: &str = "\u{feff}<?xml version=\"1.0\" encoding=\"utf-8\"?>\r
<Project ToolsVersion=\"15.0\" xmlns=\"http://schemas.microsoft.com/developer/msbuild/2003\">\r
  <!-- keep me -->\r
  <PropertyGroup>\r
    <RootNamespace>Contoso.Shop</RootNamespace>\r
  </PropertyGroup>\r
  <ItemGroup>\r
    <Compile Include=\"Program.cs\" />\r
  </ItemGroup>\r
  <ItemGroup>\r
    <EmbeddedResource Include=\"Properties\\Strings.resx\" />\r
    <EmbeddedResource Include=\"Properties\\Errors.resx\" />\r
    <EmbeddedResource Include=\"Properties\\Empty.resx\" />\r
  </ItemGroup>\r
</Project>\r
";

struct Workspace {
    _dir: TempDir,
    project: PathBuf,
    properties: PathBuf,
}

impl Workspace {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let project = dir.path().join("Shop.csproj");
        fs::write(&project, PROJECT).unwrap();
        let properties = dir.path().join("Properties");
        fs::create_dir_all(&properties).unwrap();
        Workspace {
            _dir: dir,
            project,
            properties,
        }
    }

    fn resource(&self, name: &str, entries: &[(&str, &str)]) -> PathBuf {
        let mut format = Format::new();
        for (key, value) in entries {
            format.add(DataNode::new(*key, *value));
        }
        let path = self.properties.join(name);
        format.write_to(&path).unwrap();
        path
    }
}

fn designer(resource: &Path) -> PathBuf {
    let stem = resource.file_stem().unwrap().to_str().unwrap();
    resource.with_file_name(format!("{stem}.designer.rs"))
}

#[test]
fn regeneration_is_idempotent() {
    let ws = Workspace::new();
    let strings = ws.resource("Strings.resx", &[("Greeting", "Hello, {name}!"), ("Order", "{1} {0}")]);
    let generator = Generator::new(GenerateOptions::new().with_namespace(Some("Contoso.Shop".into())));

    let first = generator.run(&ws.project, &[strings.clone()]);
    assert!(first.success(), "{:?}", first.errors);
    assert_eq!(first.manifest_entries_added.len(), 1);
    let generated = fs::read(designer(&strings)).unwrap();
    let manifest = fs::read(&ws.project).unwrap();

    let second = generator.run(&ws.project, &[strings.clone()]);
    assert!(second.success());
    assert!(second.manifest_entries_added.is_empty());
    assert!(!second.manifest_saved);
    assert_eq!(second.generated[0].status, WriteStatus::Unchanged);
    assert_eq!(fs::read(designer(&strings)).unwrap(), generated);
    assert_eq!(fs::read(&ws.project).unwrap(), manifest);
}

#[test]
fn manifest_keeps_unrelated_content_and_bom() {
    let ws = Workspace::new();
    let strings = ws.resource("Strings.resx", &[("Title", "Shop")]);
    let report = Generator::default().run(&ws.project, &[strings]);
    assert!(report.manifest_saved);

    let saved = fs::read_to_string(&ws.project).unwrap();
    assert!(saved.starts_with('\u{feff}'));
    assert!(saved.contains("  <!-- keep me -->\r\n"));
    assert!(saved.contains("<RootNamespace>Contoso.Shop</RootNamespace>"));
    assert!(saved.contains(
        "    <Compile Include=\"Program.cs\" />\r\n    <Compile Include=\"Properties\\Strings.designer.rs\">\r\n      <AutoGen>True</AutoGen>\r\n"
    ));
    assert_eq!(saved.matches("<EmbeddedResource").count(), 3);
}

#[test]
fn several_files_share_one_save() {
    let ws = Workspace::new();
    let strings = ws.resource("Strings.resx", &[("Title", "Shop")]);
    let errors = ws.resource("Errors.resx", &[("NotFound", "{item} was not found")]);

    let report = Generator::default().run(&ws.project, &[strings, errors]);
    assert!(report.success());
    assert_eq!(
        report.manifest_entries_added,
        vec![
            "Properties\\Strings.designer.rs".to_string(),
            "Properties\\Errors.designer.rs".to_string()
        ]
    );

    let manifest = ProjectManifest::load(&ws.project).unwrap();
    assert!(manifest.has_generated_file_for("Strings.resx"));
    assert!(manifest.has_generated_file_for("Errors.resx"));
}

#[test]
fn empty_resource_file_produces_nothing() {
    let ws = Workspace::new();
    let empty = ws.resource("Empty.resx", &[]);

    let report = Generator::default().run(&ws.project, &[empty.clone()]);
    assert!(report.success());
    assert!(report.generated.is_empty());
    assert_eq!(report.skipped.len(), 1);
    assert!(!designer(&empty).exists());
    assert_eq!(fs::read_to_string(&ws.project).unwrap(), PROJECT);
}

#[test]
fn existing_entry_is_never_duplicated() {
    let ws = Workspace::new();
    let strings = ws.resource("Strings.resx", &[("Title", "Shop")]);

    let mut manifest = ProjectManifest::load(&ws.project).unwrap();
    let outcome = manifest.ensure_generated_file(&strings, ".designer.rs").unwrap();
    assert!(outcome.is_change());
    manifest.save(&ws.project).unwrap();

    let report = Generator::default().run(&ws.project, &[strings]);
    assert!(report.manifest_entries_added.is_empty());
    let saved = fs::read_to_string(&ws.project).unwrap();
    assert_eq!(saved.matches("<DependentUpon>Strings.resx</DependentUpon>").count(), 1);

    let mut reloaded = ProjectManifest::load(&ws.project).unwrap();
    assert_eq!(
        reloaded.ensure_generated_file(&ws.properties.join("Strings.resx"), ".designer.rs").unwrap(),
        SyncOutcome::AlreadyPresent
    );
}

#[test]
fn undeclared_resource_still_generates() {
    let ws = Workspace::new();
    let other = ws.resource("Other.resx", &[("Title", "Other")]);

    let report = Generator::default().run(&ws.project, &[other.clone()]);
    assert!(report.success());
    assert!(designer(&other).exists());
    assert!(report.manifest_entries_added.is_empty());
    assert!(!report.manifest_saved);
}

#[cfg(unix)]
#[test]
fn read_only_manifest_is_overwritten() {
    let ws = Workspace::new();
    let strings = ws.resource("Strings.resx", &[("Title", "Shop")]);
    let mut permissions = fs::metadata(&ws.project).unwrap().permissions();
    permissions.set_readonly(true);
    fs::set_permissions(&ws.project, permissions).unwrap();

    let report = Generator::default().run(&ws.project, &[strings]);
    assert!(report.success(), "{:?}", report.errors);
    assert!(report.manifest_saved);
    assert!(!fs::metadata(&ws.project).unwrap().permissions().readonly());
}

#[test]
fn report_serializes_to_json() {
    let ws = Workspace::new();
    let strings = ws.resource("Strings.resx", &[("Title", "Shop")]);
    let report = Generator::default().run(&ws.project, &[strings]);

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["namespace"], "Shop");
    assert_eq!(json["generated"][0]["status"], "written");
    assert_eq!(json["manifest_saved"], true);
}
