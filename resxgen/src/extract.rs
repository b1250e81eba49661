//! Resource entry extraction.
//!
//! A [`ResourceSource`] exposes declared resources as name/value/comment
//! triples; [`extract_entries`] turns the string-valued ones into
//! [`ResourceEntry`] values with their parameters classified.

use std::{collections::HashSet, path::Path};

use tracing::debug;

use crate::{error::Error, resx, traits::Parser, types::ResourceEntry};

/// The resolved value of a declared resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceValue<'a> {
    Text(&'a str),
    /// Typed, non-string data; carries the declared type for diagnostics.
    NonString(&'a str),
    /// The source could not produce a value for this resource.
    Unresolved(&'a str),
}

/// One resource as declared by a source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceResource<'a> {
    pub name: &'a str,
    pub value: SourceValue<'a>,
    pub comment: Option<&'a str>,
}

/// A key/value/comment resource source, in declaration order.
pub trait ResourceSource {
    fn resources(&self) -> Vec<SourceResource<'_>>;
}

impl ResourceSource for resx::Format {
    fn resources(&self) -> Vec<SourceResource<'_>> {
        self.data
            .iter()
            .map(|node| {
                let value = match (&node.value, node.is_string()) {
                    (None, _) => SourceValue::Unresolved("no <value> element"),
                    (Some(value), true) => SourceValue::Text(value),
                    (Some(_), false) => SourceValue::NonString(
                        node.type_name
                            .as_deref()
                            .or(node.mime_type.as_deref())
                            .unwrap_or("unknown"),
                    ),
                };
                SourceResource {
                    name: &node.name,
                    value,
                    comment: node.comment.as_deref(),
                }
            })
            .collect()
    }
}

/// Extracts every string resource of `source`.
///
/// Non-string resources are skipped. An unresolved value or a repeated name
/// fails the whole source.
pub fn extract_entries<S: ResourceSource + ?Sized>(source: &S) -> Result<Vec<ResourceEntry>, Error> {
    let mut seen = HashSet::new();
    let mut entries = Vec::new();

    for resource in source.resources() {
        if !seen.insert(resource.name) {
            return Err(Error::DuplicateResource(resource.name.to_string()));
        }
        match resource.value {
            SourceValue::Text(value) => entries.push(ResourceEntry::new(
                resource.name,
                value,
                resource.comment.map(str::to_string),
            )),
            SourceValue::NonString(type_name) => {
                debug!(
                    resource = resource.name,
                    type_name, "skipping non-string resource"
                );
            }
            SourceValue::Unresolved(reason) => {
                return Err(Error::unresolved_value(resource.name, reason));
            }
        }
    }

    Ok(entries)
}

/// Reads a `.resx` file and extracts its string entries.
pub fn extract_file<P: AsRef<Path>>(path: P) -> Result<Vec<ResourceEntry>, Error> {
    let format = resx::Format::read_from(path)?;
    extract_entries(&format)
}
