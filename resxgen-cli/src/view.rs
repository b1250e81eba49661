use resxgen::emitter::accessor_name;
use resxgen::{ResourceEntry, extract_file};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::validation::validate_file_path;

const VALUE_WIDTH: usize = 50;

/// Truncates `value` to `max` terminal columns, appending `...` when cut.
pub fn truncate_display(value: &str, max: usize) -> String {
    let flat = value.replace(['\r', '\n'], " ");
    if flat.width() <= max {
        return flat;
    }
    let mut out = String::new();
    let mut width = 0;
    for c in flat.chars() {
        let w = c.width().unwrap_or(0);
        if width + w > max.saturating_sub(3) {
            break;
        }
        width += w;
        out.push(c);
    }
    out.push_str("...");
    out
}

fn describe_parameters(entry: &ResourceEntry) -> String {
    if entry.parameters.is_empty() {
        return "none".to_string();
    }
    let style = if entry.uses_named_parameters {
        "named"
    } else {
        "positional"
    };
    format!("{} [{}]", style, entry.parameters.join(", "))
}

/// Print a view of the string entries of a resource file.
pub fn run_view_command(input: String, full: bool) -> Result<(), String> {
    validate_file_path(&input)?;
    let entries = extract_file(&input).map_err(|e| format!("Error reading {}: {}", input, e))?;

    if entries.is_empty() {
        println!("No string resources found in {}", input);
        return Ok(());
    }

    println!("=== {} ===", input);
    println!("Entries: {}", entries.len());

    for (i, entry) in entries.iter().enumerate() {
        println!("\n  Entry {}: {}", i + 1, entry.name);
        println!("    Accessor: {}()", accessor_name(&entry.name));
        println!("    Parameters: {}", describe_parameters(entry));

        if let Some(comment) = &entry.comment {
            println!("    Comment: {}", comment);
        }
        if full {
            println!("    Value: {}", entry.value);
        } else {
            println!("    Value: {}", truncate_display(&entry.value, VALUE_WIDTH));
        }
    }
    Ok(())
}
