//! The generation pipeline: extraction, emission and manifest sync for a
//! batch of resource files.
//!
//! Each resource file is processed on its own; a failure is logged and
//! recorded in the [`GenerateReport`] and the batch carries on. The manifest
//! is loaded once, accumulates insertions in memory and is saved at most once.

use std::{
    fs,
    path::{Component, Path, PathBuf},
};

use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::{
    emitter::{self, DEFAULT_RUNTIME_PATH},
    error::Error,
    extract::extract_file,
    files,
    manifest::{ProjectManifest, SyncOutcome},
    types::AccessorModel,
};

/// Default file-name suffix of generated accessor modules.
pub const DEFAULT_DESIGNER_SUFFIX: &str = ".designer.rs";

/// Generation policies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateOptions {
    /// Target namespace; defaults to the project file's stem.
    pub namespace: Option<String>,
    /// Emit `pub(crate)` accessors.
    pub internalize: bool,
    /// Skip resource files without any string entry.
    pub skip_empty: bool,
    pub designer_suffix: String,
    /// Module path of the runtime support used by generated code.
    pub runtime_path: String,
    /// Compute everything but write nothing.
    pub dry_run: bool,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        GenerateOptions {
            namespace: None,
            internalize: false,
            skip_empty: true,
            designer_suffix: DEFAULT_DESIGNER_SUFFIX.to_string(),
            runtime_path: DEFAULT_RUNTIME_PATH.to_string(),
            dry_run: false,
        }
    }
}

impl GenerateOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_namespace(mut self, namespace: Option<String>) -> Self {
        self.namespace = namespace;
        self
    }

    pub fn with_internalize(mut self, internalize: bool) -> Self {
        self.internalize = internalize;
        self
    }

    pub fn with_skip_empty(mut self, skip_empty: bool) -> Self {
        self.skip_empty = skip_empty;
        self
    }

    pub fn with_designer_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.designer_suffix = suffix.into();
        self
    }

    pub fn with_runtime_path(mut self, runtime_path: impl Into<String>) -> Self {
        self.runtime_path = runtime_path.into();
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

/// What happened to a generated file on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WriteStatus {
    Written,
    /// The file already had the generated content.
    Unchanged,
    /// Dry run; the file would have been written.
    Pending,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedFile {
    pub resource: PathBuf,
    pub path: PathBuf,
    pub entries: usize,
    pub status: WriteStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedFile {
    pub resource: PathBuf,
    pub reason: String,
}

/// A failure attributed to a resource file, or to the project file itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerateFailure {
    pub path: PathBuf,
    pub message: String,
}

/// Outcome of one [`Generator::run`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GenerateReport {
    pub namespace: String,
    pub generated: Vec<GeneratedFile>,
    pub skipped: Vec<SkippedFile>,
    /// Includes of the `Compile` items added to the manifest.
    pub manifest_entries_added: Vec<String>,
    pub manifest_saved: bool,
    pub errors: Vec<GenerateFailure>,
}

impl GenerateReport {
    /// False when any error was recorded, even if other files succeeded.
    pub fn success(&self) -> bool {
        self.errors.is_empty()
    }

    fn fail(&mut self, path: &Path, err: &Error) {
        self.errors.push(GenerateFailure {
            path: path.to_path_buf(),
            message: err.to_string(),
        });
    }
}

/// Runs the pipeline for a project manifest and its resource files.
#[derive(Debug, Clone, Default)]
pub struct Generator {
    options: GenerateOptions,
}

impl Generator {
    pub fn new(options: GenerateOptions) -> Self {
        Generator { options }
    }

    pub fn options(&self) -> &GenerateOptions {
        &self.options
    }

    /// Processes `resources` (or, when empty, the `.resx` embedded resources
    /// declared by the manifest) and returns what was done.
    ///
    /// Failures never escape: a manifest that cannot be loaded or saved and
    /// every per-file failure end up in [`GenerateReport::errors`].
    pub fn run(&self, project: &Path, resources: &[PathBuf]) -> GenerateReport {
        let namespace = self
            .options
            .namespace
            .clone()
            .unwrap_or_else(|| default_namespace(project));
        info!(namespace = %namespace, "using namespace");

        let mut report = GenerateReport {
            namespace: namespace.clone(),
            ..GenerateReport::default()
        };

        let (project, mut manifest) = match std::path::absolute(project)
            .map_err(Error::from)
            .and_then(|project| ProjectManifest::load(&project).map(|m| (project, m)))
        {
            Ok(loaded) => loaded,
            Err(err) => {
                error!(project = %project.display(), error = %err, "failed to load project manifest");
                report.fail(project, &err);
                return report;
            }
        };
        let project_dir = project.parent().unwrap_or(Path::new("")).to_path_buf();

        let resources = if resources.is_empty() {
            let declared: Vec<PathBuf> = manifest
                .embedded_resources()
                .iter()
                .map(|include| project_dir.join(include.replace('\\', "/")))
                .collect();
            debug!(count = declared.len(), "using resources declared by the project");
            declared
        } else {
            resources.to_vec()
        };

        let mut manifest_changed = false;
        for resource in &resources {
            match self.process(resource, &project_dir, &namespace, &mut manifest, &mut report) {
                Ok(changed) => manifest_changed |= changed,
                Err(err) => {
                    error!(resource = %resource.display(), error = %err, "failed to generate accessors");
                    report.fail(resource, &err);
                }
            }
        }

        if manifest_changed && !self.options.dry_run {
            match manifest.save(&project) {
                Ok(()) => {
                    info!(project = %project.display(), "saved project manifest");
                    report.manifest_saved = true;
                }
                Err(err) => {
                    error!(project = %project.display(), error = %err, "failed to save project manifest");
                    report.fail(&project, &err);
                }
            }
        }

        report
    }

    /// Handles one resource file; returns whether the manifest changed.
    fn process(
        &self,
        resource: &Path,
        project_dir: &Path,
        namespace: &str,
        manifest: &mut ProjectManifest,
        report: &mut GenerateReport,
    ) -> Result<bool, Error> {
        info!(resource = %resource.display(), "processing resource file");
        let resource = std::path::absolute(resource)?;
        let entries = extract_file(&resource)?;

        if entries.is_empty() && self.options.skip_empty {
            info!(resource = %resource.display(), "no string resources, skipping");
            report.skipped.push(SkippedFile {
                resource,
                reason: "no string resources".to_string(),
            });
            return Ok(false);
        }

        let resource_file_name = resource
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| Error::InvalidPath(resource.display().to_string()))?
            .to_string();
        let target = designer_path(&resource, &self.options.designer_suffix)?;
        let entry_count = entries.len();

        let model = AccessorModel {
            namespace: namespace.to_string(),
            resource_bundle_name: bundle_name(&resource, project_dir),
            resource_file_name,
            runtime_path: self.options.runtime_path.clone(),
            entries,
            internalize: self.options.internalize,
        };
        let source = emitter::render(&model);
        let status = write_if_changed(&target, source.as_bytes(), self.options.dry_run)?;
        report.generated.push(GeneratedFile {
            resource: resource.clone(),
            path: target,
            entries: entry_count,
            status,
        });

        match manifest.ensure_generated_file(&resource, &self.options.designer_suffix)? {
            SyncOutcome::Added { include } => {
                info!(include = %include, "added designer file to project");
                report.manifest_entries_added.push(include);
                Ok(true)
            }
            SyncOutcome::AlreadyPresent => Ok(false),
            SyncOutcome::NotDeclared => {
                warn!(resource = %resource.display(), "resource file is not an embedded resource of the project");
                Ok(false)
            }
        }
    }
}

/// The project file's stem (`App.csproj` gives `App`).
pub fn default_namespace(project: &Path) -> String {
    project
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Bundle name of `resource` relative to `project_dir`, with directories and
/// file stem joined by `.`; the bare stem for resources outside the project.
pub fn bundle_name(resource: &Path, project_dir: &Path) -> String {
    let stem = resource
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();

    let Ok(relative) = resource.strip_prefix(project_dir) else {
        return stem;
    };
    let mut parts: Vec<String> = relative
        .parent()
        .into_iter()
        .flat_map(Path::components)
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();
    parts.push(stem);
    parts.join(".")
}

/// `Dir/Strings.resx` with suffix `.designer.rs` gives `Dir/Strings.designer.rs`.
pub fn designer_path(resource: &Path, suffix: &str) -> Result<PathBuf, Error> {
    let stem = resource
        .file_stem()
        .and_then(|stem| stem.to_str())
        .ok_or_else(|| Error::InvalidPath(resource.display().to_string()))?;
    Ok(resource.with_file_name(format!("{stem}{suffix}")))
}

fn write_if_changed(path: &Path, bytes: &[u8], dry_run: bool) -> Result<WriteStatus, Error> {
    if fs::read(path).is_ok_and(|existing| existing == bytes) {
        debug!(path = %path.display(), "generated file is up to date");
        return Ok(WriteStatus::Unchanged);
    }
    if dry_run {
        return Ok(WriteStatus::Pending);
    }
    files::write_clearing_readonly(path, bytes)?;
    info!(path = %path.display(), "wrote generated file");
    Ok(WriteStatus::Written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        resx::{DataNode, Format},
        traits::Parser,
    };
    use tempfile::TempDir;

    const PROJECT: &str = r#"<Project xmlns="http://schemas.microsoft.com/developer/msbuild/2003">
  <ItemGroup>
    <Compile Include="Program.cs" />
  </ItemGroup>
  <ItemGroup>
    <EmbeddedResource Include="Properties\Strings.resx" />
  </ItemGroup>
</Project>
"#;

    fn setup(entries: &[(&str, &str)]) -> (TempDir, PathBuf, PathBuf) {
        let dir = TempDir::new().unwrap();
        let project = dir.path().join("App.csproj");
        fs::write(&project, PROJECT).unwrap();

        let properties = dir.path().join("Properties");
        fs::create_dir_all(&properties).unwrap();
        let resource = properties.join("Strings.resx");
        let mut format = Format::new();
        for (name, value) in entries {
            format.add(DataNode::new(*name, *value));
        }
        format.write_to(&resource).unwrap();
        (dir, project, resource)
    }

    #[test]
    fn test_options_defaults() {
        let options = GenerateOptions::new();
        assert!(options.skip_empty);
        assert!(!options.internalize);
        assert_eq!(options.designer_suffix, ".designer.rs");
        assert_eq!(options.runtime_path, "resxgen::runtime");
    }

    #[test]
    fn test_bundle_name() {
        let project_dir = Path::new("/work/App");
        assert_eq!(
            bundle_name(Path::new("/work/App/Properties/Strings.resx"), project_dir),
            "Properties.Strings"
        );
        assert_eq!(
            bundle_name(Path::new("/work/App/Strings.resx"), project_dir),
            "Strings"
        );
        assert_eq!(
            bundle_name(Path::new("/elsewhere/Errors.resx"), project_dir),
            "Errors"
        );
    }

    #[test]
    fn test_designer_path_and_namespace() {
        assert_eq!(
            designer_path(Path::new("a/Strings.resx"), ".designer.rs").unwrap(),
            Path::new("a/Strings.designer.rs")
        );
        assert_eq!(default_namespace(Path::new("src/MyApp.csproj")), "MyApp");
    }

    #[test]
    fn test_run_generates_and_registers() {
        let (_dir, project, resource) = setup(&[("Greeting", "Hello, {name}!")]);
        let report = Generator::default().run(&project, &[resource.clone()]);

        assert!(report.success(), "{:?}", report.errors);
        assert_eq!(report.namespace, "App");
        assert_eq!(report.generated.len(), 1);
        assert_eq!(report.generated[0].status, WriteStatus::Written);
        assert_eq!(report.manifest_entries_added, vec![r"Properties\Strings.designer.rs"]);
        assert!(report.manifest_saved);

        let generated = fs::read_to_string(resource.with_file_name("Strings.designer.rs")).unwrap();
        assert!(generated.contains("pub const BUNDLE_NAME: &str = \"App.Properties.Strings\";"));
        assert!(generated.contains("pub fn greeting(name: impl std::fmt::Display)"));

        let manifest = fs::read_to_string(&project).unwrap();
        assert!(manifest.contains("<DependentUpon>Strings.resx</DependentUpon>"));
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let (_dir, project, resource) = setup(&[("Title", "Hi")]);
        let options = GenerateOptions::new().with_dry_run(true);
        let report = Generator::new(options).run(&project, &[resource.clone()]);

        assert!(report.success());
        assert_eq!(report.generated[0].status, WriteStatus::Pending);
        assert_eq!(report.manifest_entries_added.len(), 1);
        assert!(!report.manifest_saved);
        assert!(!resource.with_file_name("Strings.designer.rs").exists());
        assert_eq!(fs::read_to_string(&project).unwrap(), PROJECT);
    }

    #[test]
    fn test_empty_resource_is_skipped() {
        let (_dir, project, resource) = setup(&[]);
        let report = Generator::default().run(&project, &[resource.clone()]);

        assert!(report.success());
        assert!(report.generated.is_empty());
        assert_eq!(report.skipped.len(), 1);
        assert!(!report.manifest_saved);
        assert!(!resource.with_file_name("Strings.designer.rs").exists());
    }

    #[test]
    fn test_empty_resource_kept_when_not_skipping() {
        let (_dir, project, resource) = setup(&[]);
        let options = GenerateOptions::new().with_skip_empty(false);
        let report = Generator::new(options).run(&project, &[resource.clone()]);

        assert!(report.success());
        assert_eq!(report.generated.len(), 1);
        assert_eq!(report.generated[0].entries, 0);
    }

    #[test]
    fn test_failures_are_isolated_per_file() {
        let (dir, project, resource) = setup(&[("Title", "Hi")]);
        let broken = dir.path().join("Broken.resx");
        fs::write(&broken, "<root><data name=\"A\"></data></root>").unwrap();

        let report = Generator::default().run(&project, &[broken.clone(), resource]);
        assert!(!report.success());
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].path, broken);
        assert_eq!(report.generated.len(), 1);
        assert!(report.manifest_saved);
    }

    #[test]
    fn test_missing_manifest_fails_run() {
        let dir = TempDir::new().unwrap();
        let report = Generator::default().run(&dir.path().join("Missing.csproj"), &[]);
        assert!(!report.success());
        assert!(report.generated.is_empty());
    }

    #[test]
    fn test_resources_default_to_declared_ones() {
        let (_dir, project, resource) = setup(&[("Title", "Hi")]);
        let report = Generator::default().run(&project, &[]);

        assert!(report.success(), "{:?}", report.errors);
        assert_eq!(report.generated.len(), 1);
        assert!(resource.with_file_name("Strings.designer.rs").exists());
    }
}
