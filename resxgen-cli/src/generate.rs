use std::path::PathBuf;

use resxgen::{GenerateOptions, GenerateReport, Generator, WriteStatus};
use tracing::{debug, warn};

use crate::config::{Config, discover_config};
use crate::path_glob::expand_input_globs;
use crate::validation::{
    validate_designer_suffix, validate_file_path, validate_output_path, validate_runtime_path,
};

#[derive(Debug, Clone, Default)]
pub struct GenerateCommand {
    pub project: String,
    pub resources: Vec<String>,
    pub namespace: Option<String>,
    pub internal: bool,
    pub include_empty: bool,
    pub suffix: Option<String>,
    pub runtime_path: Option<String>,
    pub dry_run: bool,
    pub report_json: Option<String>,
    pub config: Option<String>,
}

impl GenerateCommand {
    /// Library options from the flags, falling back to `config` values.
    pub fn options(&self, config: &Config) -> GenerateOptions {
        let mut options = GenerateOptions::new()
            .with_namespace(self.namespace.clone().or_else(|| config.namespace.clone()))
            .with_internalize(self.internal || config.internal.unwrap_or(false))
            .with_skip_empty(!(self.include_empty || config.include_empty.unwrap_or(false)))
            .with_dry_run(self.dry_run);
        if let Some(suffix) = self.suffix.as_ref().or(config.suffix.as_ref()) {
            options = options.with_designer_suffix(suffix.clone());
        }
        if let Some(runtime_path) = self.runtime_path.as_ref().or(config.runtime_path.as_ref()) {
            options = options.with_runtime_path(runtime_path.clone());
        }
        options
    }
}

pub fn run_generate_command(cmd: GenerateCommand) -> Result<(), String> {
    validate_file_path(&cmd.project)?;
    if let Some(report_path) = &cmd.report_json {
        validate_output_path(report_path)?;
    }

    let project = PathBuf::from(&cmd.project);
    let loaded = discover_config(cmd.config.as_deref(), &project)?;
    if let Some(loaded) = &loaded {
        debug!(config = %loaded.path.display(), "loaded config");
    }
    let config = loaded
        .as_ref()
        .map(|loaded| loaded.config.clone())
        .unwrap_or_default();

    let options = cmd.options(&config);
    validate_designer_suffix(&options.designer_suffix)?;
    validate_runtime_path(&options.runtime_path)?;

    let patterns = if cmd.resources.is_empty() {
        loaded
            .as_ref()
            .map(|loaded| loaded.resolved_resources())
            .unwrap_or_default()
    } else {
        cmd.resources.clone()
    };
    let resources = expand_input_globs(&patterns)?;
    debug!(count = resources.len(), "expanded resource inputs");
    for resource in resources.iter().filter(|resource| !resource.is_file()) {
        warn!(resource = %resource.display(), "resource file does not exist");
    }

    let report = Generator::new(options).run(&project, &resources);
    print_report(&report, cmd.dry_run);

    if let Some(report_path) = &cmd.report_json {
        write_report(report_path, &report)?;
        println!("Report JSON written: {}", report_path);
    }

    if report.success() {
        Ok(())
    } else {
        Err(format!(
            "Generation failed for {} file(s)",
            report.errors.len()
        ))
    }
}

fn print_report(report: &GenerateReport, dry_run: bool) {
    println!("Namespace: {}", report.namespace);
    for file in &report.generated {
        let status = match file.status {
            WriteStatus::Written => "✅ Generated",
            WriteStatus::Unchanged => "= Unchanged",
            WriteStatus::Pending => "~ Would write",
        };
        println!(
            "{} {} ({} entries)",
            status,
            file.path.display(),
            file.entries
        );
    }
    for skipped in &report.skipped {
        println!("- Skipped {}: {}", skipped.resource.display(), skipped.reason);
    }
    for include in &report.manifest_entries_added {
        println!("+ Project item: {}", include);
    }
    for failure in &report.errors {
        eprintln!("❌ {}: {}", failure.path.display(), failure.message);
    }
    if dry_run {
        println!("Dry-run mode: no files were written");
    } else if report.manifest_saved {
        println!("✅ Project file updated");
    }
}

fn write_report(path: &str, report: &GenerateReport) -> Result<(), String> {
    let text = serde_json::to_string_pretty(report)
        .map_err(|e| format!("Failed to serialize report JSON: {}", e))?;
    std::fs::write(path, text).map_err(|e| format!("Failed to write report JSON '{}': {}", path, e))
}
