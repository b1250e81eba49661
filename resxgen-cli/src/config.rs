//! `resxgen.toml` configuration.
//!
//! Every setting mirrors a `generate` flag; flags given on the command line
//! win over values from the file.

use std::path::{Path, PathBuf};

use serde::Deserialize;

pub const CONFIG_FILE_NAME: &str = "resxgen.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub namespace: Option<String>,
    pub internal: Option<bool>,
    pub include_empty: Option<bool>,
    pub suffix: Option<String>,
    pub runtime_path: Option<String>,
    /// Resource files or glob patterns, relative to the config file.
    pub resources: Vec<String>,
}

/// A parsed config file and the directory its relative paths start from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedConfig {
    pub path: PathBuf,
    pub config: Config,
}

impl LoadedConfig {
    /// `resources` resolved against the config file's directory.
    pub fn resolved_resources(&self) -> Vec<String> {
        let base = self.path.parent().unwrap_or(Path::new(""));
        self.config
            .resources
            .iter()
            .map(|resource| {
                if Path::new(resource).is_absolute() {
                    resource.clone()
                } else {
                    base.join(resource).to_string_lossy().into_owned()
                }
            })
            .collect()
    }
}

pub fn load_config(path: &Path) -> Result<LoadedConfig, String> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config '{}': {}", path.display(), e))?;
    let config = toml::from_str(&text)
        .map_err(|e| format!("Invalid config '{}': {}", path.display(), e))?;
    Ok(LoadedConfig {
        path: path.to_path_buf(),
        config,
    })
}

/// Loads `explicit` if given, otherwise `resxgen.toml` beside the project
/// file when there is one.
pub fn discover_config(
    explicit: Option<&str>,
    project: &Path,
) -> Result<Option<LoadedConfig>, String> {
    if let Some(path) = explicit {
        return load_config(Path::new(path)).map(Some);
    }
    let candidate = project
        .parent()
        .unwrap_or(Path::new(""))
        .join(CONFIG_FILE_NAME);
    if candidate.is_file() {
        load_config(&candidate).map(Some)
    } else {
        Ok(None)
    }
}
