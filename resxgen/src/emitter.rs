//! Renders an [`AccessorModel`] into Rust source.
//!
//! Output is a pure function of the model: the same model always renders to
//! the same bytes, so regenerating an unchanged resource file produces no diff.

use std::collections::HashSet;

use indoc::formatdoc;

use crate::types::{AccessorModel, ResourceEntry};

/// Runtime module referenced by generated code unless configured otherwise.
pub const DEFAULT_RUNTIME_PATH: &str = "resxgen::runtime";

/// Name of the private lookup helper emitted into every module.
const LOOKUP_HELPER: &str = "get_string";

const RAW_KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "do",
    "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if", "impl", "in",
    "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref",
    "return", "static", "struct", "trait", "true", "try", "type", "typeof", "unsafe", "unsized",
    "use", "virtual", "where", "while", "yield",
];

/// Keywords that cannot be written as raw identifiers.
const RESERVED_PATH_KEYWORDS: &[&str] = &["crate", "self", "super"];

/// Renders the complete accessor module for `model`.
pub fn render(model: &AccessorModel) -> String {
    let vis = model.visibility();
    let mut out = formatdoc! {"
        // <auto-generated />
        // Generated by resxgen {version} from {file}. Edit the resource file and regenerate instead.

        use std::sync::LazyLock;

        use {runtime}::{{self as runtime, ResxBundle, RuntimeError}};

        /// Fully-qualified name of the resource bundle behind these accessors.
        {vis} const BUNDLE_NAME: &str = {bundle:?};

        static RESOURCES: LazyLock<ResxBundle> =
            LazyLock::new(|| ResxBundle::embedded(BUNDLE_NAME, include_str!({file:?})));
        ",
        version = env!("CARGO_PKG_VERSION"),
        file = model.resource_file_name,
        runtime = model.runtime_path,
        vis = vis,
        bundle = model.qualified_bundle_name(),
    };

    let mut used = HashSet::from([LOOKUP_HELPER.to_string()]);
    for entry in &model.entries {
        let ident = unique_identifier(&to_snake_case(&entry.name), &mut used);
        out.push('\n');
        out.push_str(&render_accessor(entry, &ident, vis));
    }

    out.push('\n');
    out.push_str(&formatdoc! {"
        fn {helper}(name: &str, formatter_names: &[&str]) -> Result<String, RuntimeError> {{
            runtime::get_string(&*RESOURCES, name, formatter_names)
        }}
        ",
        helper = LOOKUP_HELPER,
    });
    out
}

fn render_accessor(entry: &ResourceEntry, ident: &str, vis: &str) -> String {
    let mut out = doc_comment(entry);
    let names = parameter_identifiers(entry);
    let params = names
        .iter()
        .map(|name| format!("{name}: impl std::fmt::Display"))
        .collect::<Vec<_>>()
        .join(", ");

    out.push_str(&format!(
        "{vis} fn {ident}({params}) -> Result<String, RuntimeError> {{\n"
    ));
    if entry.parameters.is_empty() {
        out.push_str(&format!("    {LOOKUP_HELPER}({:?}, &[])\n", entry.name));
    } else {
        let tokens = entry
            .parameters
            .iter()
            .map(|token| format!("{token:?}"))
            .collect::<Vec<_>>()
            .join(", ");
        let args = names
            .iter()
            .map(|name| format!("&{name}"))
            .collect::<Vec<_>>()
            .join(", ");
        out.push_str(&format!(
            "    runtime::format(&{LOOKUP_HELPER}({:?}, &[{tokens}])?, &[{args}])\n",
            entry.name
        ));
    }
    out.push_str("}\n");
    out
}

/// The entry comment, or the raw value when there is no comment.
///
/// Every `\r`, `\n` or `\r\n` starts a new doc line. Leading indentation is
/// dropped and fence markers are escaped so resource text never turns into
/// a doctest.
fn doc_comment(entry: &ResourceEntry) -> String {
    let text = entry
        .comment
        .as_deref()
        .filter(|comment| !comment.trim().is_empty())
        .unwrap_or(entry.value.as_str());

    let text = text.replace("\r\n", "\n").replace('\r', "\n");
    text.lines()
        .map(str::trim)
        .map(|line| {
            if line.is_empty() {
                "///\n".to_string()
            } else if line.starts_with("```") || line.starts_with("~~~") {
                format!("/// \\{line}\n")
            } else {
                format!("/// {line}\n")
            }
        })
        .collect()
}

fn parameter_identifiers(entry: &ResourceEntry) -> Vec<String> {
    if !entry.uses_named_parameters {
        return entry
            .parameters
            .iter()
            .map(|token| format!("arg{token}"))
            .collect();
    }
    let mut used = HashSet::from([LOOKUP_HELPER.to_string()]);
    entry
        .parameters
        .iter()
        .map(|token| unique_identifier(&to_snake_case(token), &mut used))
        .collect()
}

/// The accessor function name generated for a resource called `name`,
/// ignoring collisions with other entries.
pub fn accessor_name(name: &str) -> String {
    escape_keyword(&to_snake_case(name))
}

/// Converts `PascalCase`, `camelCase`, dotted or spaced names to `snake_case`.
///
/// Acronyms stay together (`HTTPError` becomes `http_error`); characters
/// that cannot appear in an identifier become word separators.
pub fn to_snake_case(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if !c.is_ascii_alphanumeric() {
            if !out.is_empty() && !out.ends_with('_') {
                out.push('_');
            }
            continue;
        }
        if c.is_ascii_uppercase() {
            let prev = i.checked_sub(1).map(|j| chars[j]);
            let next = chars.get(i + 1).copied();
            let boundary = match prev {
                Some(p) if p.is_ascii_lowercase() || p.is_ascii_digit() => true,
                Some(p) if p.is_ascii_uppercase() => next.is_some_and(|n| n.is_ascii_lowercase()),
                _ => false,
            };
            if boundary && !out.is_empty() && !out.ends_with('_') {
                out.push('_');
            }
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }

    while out.ends_with('_') {
        out.pop();
    }
    if out.is_empty() {
        out.push_str("resource");
    }
    if out.starts_with(|c: char| c.is_ascii_digit()) {
        out.insert(0, '_');
    }
    out
}

/// Picks `base`, or `base_2`, `base_3`, … when taken, and escapes keywords.
fn unique_identifier(base: &str, used: &mut HashSet<String>) -> String {
    let mut candidate = base.to_string();
    let mut suffix = 2;
    while used.contains(&candidate) {
        candidate = format!("{base}_{suffix}");
        suffix += 1;
    }
    used.insert(candidate.clone());
    escape_keyword(&candidate)
}

fn escape_keyword(ident: &str) -> String {
    if RAW_KEYWORDS.contains(&ident) {
        format!("r#{ident}")
    } else if RESERVED_PATH_KEYWORDS.contains(&ident) {
        format!("{ident}_")
    } else {
        ident.to_string()
    }
}
