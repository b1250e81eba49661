use std::fmt::Display;
use std::path::Path;

use resxgen::runtime::{self, ResourceBundle, ResxBundle};
use resxgen::{ParameterStyle, classify};

use crate::validation::validate_file_path;

/// Formats one resource the way its generated accessor would.
///
/// `args` are matched to the entry's parameters in accessor order: first
/// occurrence for named placeholders, ascending index for positional ones.
pub fn render_resource(
    input: &str,
    key: &str,
    args: &[String],
    bundle_name: Option<&str>,
) -> Result<String, String> {
    validate_file_path(input)?;
    let name = bundle_name.map(str::to_string).unwrap_or_else(|| {
        Path::new(input)
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default()
    });
    let bundle = ResxBundle::from_file(name, input)
        .map_err(|e| format!("Failed to read {}: {}", input, e))?;

    let raw = bundle.get_raw(key).map_err(|e| e.to_string())?;
    let parameters = classify(raw);
    if parameters.len() != args.len() {
        let style = match parameters.style {
            ParameterStyle::Named => "named",
            ParameterStyle::Positional => "positional",
        };
        return Err(format!(
            "'{}' takes {} {} argument(s) [{}], {} given",
            key,
            parameters.len(),
            style,
            parameters.tokens.join(", "),
            args.len()
        ));
    }

    let names: Vec<&str> = parameters.tokens.iter().map(String::as_str).collect();
    let template = runtime::get_string(&bundle, key, &names).map_err(|e| e.to_string())?;
    if names.is_empty() {
        return Ok(template);
    }
    let values: Vec<&dyn Display> = args.iter().map(|arg| arg as &dyn Display).collect();
    runtime::format(&template, &values).map_err(|e| e.to_string())
}

pub fn run_render_command(
    input: String,
    key: String,
    args: Vec<String>,
    bundle_name: Option<String>,
) -> Result<(), String> {
    let rendered = render_resource(&input, &key, &args, bundle_name.as_deref())?;
    println!("{}", rendered);
    Ok(())
}
