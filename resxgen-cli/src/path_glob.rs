use std::collections::HashSet;
use std::path::{Path, PathBuf};

use globset::{GlobBuilder, GlobSetBuilder};
use ignore::WalkBuilder;

fn has_glob_meta(s: &str) -> bool {
    s.bytes().any(|b| matches!(b, b'*' | b'?' | b'[' | b'{'))
}

/// Extract a static directory prefix before the first glob meta-character
fn static_prefix_dir(pattern: &str) -> PathBuf {
    let idx = pattern
        .bytes()
        .position(|b| matches!(b, b'*' | b'?' | b'[' | b'{'))
        .unwrap_or(pattern.len());
    let prefix = &pattern[..idx];
    let p = Path::new(prefix);
    if !prefix.is_empty() && p.is_dir() {
        p.to_path_buf()
    } else {
        p.parent()
            .filter(|pp| !pp.as_os_str().is_empty())
            .map(|pp| pp.to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

/// Expand glob patterns among `inputs` into concrete file paths.
///
/// Literal paths are passed through untouched. Patterns are matched with
/// `globset` over an `ignore` walk (so `.gitignore`d files are left out);
/// matches of one pattern come back sorted by path. A pattern that matches
/// nothing is an error. Duplicates are dropped, first occurrence wins.
pub fn expand_input_globs(inputs: &[String]) -> Result<Vec<PathBuf>, String> {
    let mut seen: HashSet<PathBuf> = HashSet::new();
    let mut results: Vec<PathBuf> = Vec::with_capacity(inputs.len());

    for pat in inputs {
        let matches = if has_glob_meta(pat) {
            expand_pattern(pat)?
        } else {
            vec![PathBuf::from(pat)]
        };
        for path in matches {
            if seen.insert(path.clone()) {
                results.push(path);
            }
        }
    }
    Ok(results)
}

fn expand_pattern(pat: &str) -> Result<Vec<PathBuf>, String> {
    // literal_separator keeps `*` from crossing directories
    let glob = GlobBuilder::new(pat)
        .literal_separator(true)
        .build()
        .map_err(|e| format!("Invalid glob pattern '{}': {}", pat, e))?;
    let set = GlobSetBuilder::new()
        .add(glob)
        .build()
        .map_err(|e| format!("Failed to build glob set: {}", e))?;

    let root = static_prefix_dir(pat);
    let walker = WalkBuilder::new(&root)
        .git_ignore(true)
        .git_global(true)
        .git_exclude(true)
        .hidden(false)
        .ignore(true)
        .parents(true)
        .sort_by_file_name(|a, b| a.cmp(b))
        .build();

    let mut out = Vec::new();
    for dent in walker {
        let Ok(dent) = dent else {
            continue;
        };
        if !dent.file_type().is_some_and(|t| t.is_file()) {
            continue;
        }
        // Walking "." yields "./x"; patterns are written without the prefix.
        let candidate = if root == Path::new(".") {
            dent.path().strip_prefix(".").unwrap_or(dent.path())
        } else {
            dent.path()
        };
        if set.is_match(candidate) {
            out.push(candidate.to_path_buf());
        }
    }

    if out.is_empty() {
        return Err(format!("No files match pattern '{}'", pat));
    }
    Ok(out)
}
