use std::path::Path;

/// Validate file path exists and is readable
pub fn validate_file_path(path: &str) -> Result<(), String> {
    let path_obj = Path::new(path);

    if !path_obj.exists() {
        return Err(format!("File does not exist: {}", path));
    }

    if !path_obj.is_file() {
        return Err(format!("Path is not a file: {}", path));
    }

    Ok(())
}

/// Validate output directory exists or can be created
pub fn validate_output_path(path: &str) -> Result<(), String> {
    let path_obj = Path::new(path);

    if let Some(parent) = path_obj.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("Cannot create output directory: {}", e))?;
        }
    }

    Ok(())
}

/// Validate the file-name suffix of generated modules (e.g. `.designer.rs`).
pub fn validate_designer_suffix(suffix: &str) -> Result<(), String> {
    if !suffix.ends_with(".rs") {
        return Err(format!(
            "Invalid suffix: {}. Generated modules must end in .rs",
            suffix
        ));
    }
    if suffix.contains(['/', '\\']) {
        return Err(format!("Invalid suffix: {}. Suffix cannot contain a path separator", suffix));
    }
    Ok(())
}

/// Validate a Rust module path such as `resxgen::runtime` or `crate::l10n`.
pub fn validate_runtime_path(path: &str) -> Result<(), String> {
    let valid = !path.is_empty()
        && path.split("::").all(|segment| {
            let mut chars = segment.chars();
            chars
                .next()
                .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        });
    if valid {
        Ok(())
    } else {
        Err(format!("Invalid runtime module path: {}", path))
    }
}
