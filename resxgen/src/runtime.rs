//! Run-time support for generated accessor modules.
//!
//! Generated code binds a [`ResxBundle`] to its resource file and routes every
//! accessor through [`get_string`] and [`format`]. A key that is absent from
//! the bundle surfaces as [`RuntimeError::MissingResource`], never as an empty
//! string.

use std::{collections::BTreeMap, fmt::Display, path::Path};

use thiserror::Error;

use crate::{error::Error, resx, traits::Parser};

/// A requested key is not present in the resource bundle.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("value for key '{key}' was not found in resource bundle `{bundle}`")]
pub struct MissingResourceError {
    pub bundle: String,
    pub key: String,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuntimeError {
    #[error(transparent)]
    MissingResource(#[from] MissingResourceError),

    #[error("resource bundle `{bundle}` could not be loaded: {message}")]
    BundleLoad { bundle: String, message: String },

    #[error("invalid format string: {0}")]
    InvalidFormat(String),
}

impl RuntimeError {
    pub fn is_missing_resource(&self) -> bool {
        matches!(self, RuntimeError::MissingResource(_))
    }
}

/// Key/value lookup behind generated accessors.
pub trait ResourceBundle {
    /// Fully-qualified bundle identifier, used in error messages.
    fn name(&self) -> &str;

    /// The raw, unformatted string stored under `key`.
    fn get_raw(&self, key: &str) -> Result<&str, RuntimeError>;
}

/// A bundle backed by the string entries of a `.resx` document.
#[derive(Debug, Clone)]
pub struct ResxBundle {
    name: String,
    values: Result<BTreeMap<String, String>, String>,
}

impl ResxBundle {
    /// Builds a bundle from resx text compiled into the binary.
    ///
    /// A parse failure is kept and reported by every lookup, so this can be
    /// used from a `LazyLock` initializer.
    pub fn embedded(name: impl Into<String>, source: &str) -> Self {
        let values = resx::Format::from_str(source)
            .map(|format| collect_values(&format))
            .map_err(|e| e.to_string());
        ResxBundle {
            name: name.into(),
            values,
        }
    }

    /// Loads a bundle from a `.resx` file on disk.
    pub fn from_file<P: AsRef<Path>>(name: impl Into<String>, path: P) -> Result<Self, Error> {
        let format = resx::Format::read_from(path)?;
        Ok(ResxBundle {
            name: name.into(),
            values: Ok(collect_values(&format)),
        })
    }

    pub fn from_entries<I, K, V>(name: impl Into<String>, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        ResxBundle {
            name: name.into(),
            values: Ok(entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect()),
        }
    }

    /// Number of string entries, or zero when the bundle failed to load.
    pub fn len(&self) -> usize {
        self.values.as_ref().map_or(0, BTreeMap::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ResourceBundle for ResxBundle {
    fn name(&self) -> &str {
        &self.name
    }

    fn get_raw(&self, key: &str) -> Result<&str, RuntimeError> {
        let values = self.values.as_ref().map_err(|message| RuntimeError::BundleLoad {
            bundle: self.name.clone(),
            message: message.clone(),
        })?;
        values.get(key).map(String::as_str).ok_or_else(|| {
            MissingResourceError {
                bundle: self.name.clone(),
                key: key.to_string(),
            }
            .into()
        })
    }
}

fn collect_values(format: &resx::Format) -> BTreeMap<String, String> {
    format
        .string_values()
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect()
}

/// Looks up `name` and rewrites each `{token}` in `formatter_names` to its
/// positional index, so the result can be passed to [`format`].
pub fn get_string<B: ResourceBundle + ?Sized>(
    bundle: &B,
    name: &str,
    formatter_names: &[&str],
) -> Result<String, RuntimeError> {
    let value = bundle.get_raw(name)?;
    if formatter_names.is_empty() {
        return Ok(value.to_string());
    }
    Ok(rewrite_tokens(value, formatter_names))
}

/// Single pass over `value`; doubled braces are copied through untouched.
fn rewrite_tokens(value: &str, formatter_names: &[&str]) -> String {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;
    while let Some(pos) = rest.find(['{', '}']) {
        out.push_str(&rest[..pos]);
        rest = &rest[pos..];

        if rest.starts_with("{{") || rest.starts_with("}}") {
            out.push_str(&rest[..2]);
            rest = &rest[2..];
            continue;
        }
        if rest.starts_with('{') {
            if let Some(close) = rest.find('}') {
                let token = &rest[1..close];
                if let Some(index) = formatter_names.iter().position(|name| *name == token) {
                    out.push('{');
                    out.push_str(&index.to_string());
                    out.push('}');
                    rest = &rest[close + 1..];
                    continue;
                }
            }
        }
        out.push_str(&rest[..1]);
        rest = &rest[1..];
    }
    out.push_str(rest);
    out
}

/// Composite formatting in the `{index[,alignment][:format]}` syntax.
///
/// Arguments are rendered with [`Display`]; format strings are accepted and
/// ignored since rendering is culture-invariant.
pub fn format(template: &str, args: &[&dyn Display]) -> Result<String, RuntimeError> {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.char_indices().peekable();

    while let Some((pos, ch)) = chars.next() {
        match ch {
            '{' if chars.peek().map(|(_, c)| *c) == Some('{') => {
                chars.next();
                out.push('{');
            }
            '}' if chars.peek().map(|(_, c)| *c) == Some('}') => {
                chars.next();
                out.push('}');
            }
            '{' => {
                let start = pos + 1;
                let end = loop {
                    match chars.next() {
                        Some((end, '}')) => break end,
                        Some((_, '{')) | None => {
                            return Err(RuntimeError::InvalidFormat(format!(
                                "unclosed placeholder at offset {pos} in \"{template}\""
                            )));
                        }
                        Some(_) => {}
                    }
                };
                let item = parse_format_item(&template[start..end])?;
                let arg = args.get(item.index).ok_or_else(|| {
                    RuntimeError::InvalidFormat(format!(
                        "placeholder {{{}}} has no argument ({} supplied)",
                        item.index,
                        args.len()
                    ))
                })?;
                let rendered = arg.to_string();
                let width = rendered.chars().count();
                let padding = item.alignment.unsigned_abs().saturating_sub(width);
                if item.alignment > 0 {
                    out.extend(std::iter::repeat_n(' ', padding));
                    out.push_str(&rendered);
                } else {
                    out.push_str(&rendered);
                    out.extend(std::iter::repeat_n(' ', padding));
                }
            }
            '}' => {
                return Err(RuntimeError::InvalidFormat(format!(
                    "unmatched '}}' at offset {pos} in \"{template}\""
                )));
            }
            c => out.push(c),
        }
    }

    Ok(out)
}

struct FormatItem {
    index: usize,
    alignment: isize,
}

fn parse_format_item(item: &str) -> Result<FormatItem, RuntimeError> {
    let invalid = || RuntimeError::InvalidFormat(format!("invalid placeholder {{{item}}}"));

    let spec = item.split_once(':').map_or(item, |(spec, _format)| spec);
    let (index, alignment) = match spec.split_once(',') {
        Some((index, alignment)) => (index, Some(alignment)),
        None => (spec, None),
    };

    let index = index.trim().parse::<usize>().map_err(|_| invalid())?;
    let alignment = match alignment {
        Some(alignment) => alignment.trim().parse::<isize>().map_err(|_| invalid())?,
        None => 0,
    };
    Ok(FormatItem { index, alignment })
}
