//! Project manifest synchronization.
//!
//! A [`ProjectManifest`] wraps an MSBuild-style project document and makes
//! sure every generated accessor file is declared as a `Compile` item linked
//! to its resource file through `DependentUpon`. Existing items are never
//! edited or removed; at most one item is added per resource file.

pub mod tree;

use std::{
    io::{BufRead, Write},
    path::Path,
};

use serde::Serialize;

use crate::{error::Error, traits::Parser};
use tree::{Document, Element, Node, NodePath};

/// Namespace of classic MSBuild project files.
pub const MSBUILD_NAMESPACE: &str = "http://schemas.microsoft.com/developer/msbuild/2003";

const COMPILE: &str = "Compile";
const EMBEDDED_RESOURCE: &str = "EmbeddedResource";
const ITEM_GROUP: &str = "ItemGroup";
const DEPENDENT_UPON: &str = "DependentUpon";
const AUTO_GEN: &str = "AutoGen";
const DESIGN_TIME: &str = "DesignTime";
const INCLUDE: &str = "Include";
const INDENT_UNIT: &str = "  ";

/// Result of [`ProjectManifest::ensure_generated_file`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "outcome")]
pub enum SyncOutcome {
    /// A `Compile` item already depends on the resource file.
    AlreadyPresent,
    /// A new `Compile` item was inserted.
    Added { include: String },
    /// The resource file is not an embedded resource of this project.
    NotDeclared,
}

impl SyncOutcome {
    pub fn is_change(&self) -> bool {
        matches!(self, SyncOutcome::Added { .. })
    }
}

#[derive(Debug, Clone)]
pub struct ProjectManifest {
    document: Document,
}

impl ProjectManifest {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        Self::read_from(path)
    }

    /// Writes the manifest back, clearing read-only protection first.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), Error> {
        self.write_to(path)
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Include paths of every `.resx` embedded resource, in document order.
    /// Wildcard patterns are left out.
    pub fn embedded_resources(&self) -> Vec<String> {
        self.items(EMBEDDED_RESOURCE)
            .into_iter()
            .filter_map(|path| self.document.element(&path)?.attribute(INCLUDE))
            .flat_map(|include| split_items(&include))
            .filter(|item| !has_wildcard(item) && item.to_ascii_lowercase().ends_with(".resx"))
            .collect()
    }

    /// Whether a `Compile` item already names `resource_file_name` as its
    /// `DependentUpon`.
    pub fn has_generated_file_for(&self, resource_file_name: &str) -> bool {
        self.items(COMPILE).into_iter().any(|path| {
            self.document
                .element(&path)
                .and_then(dependent_upon)
                .is_some_and(|dependency| {
                    file_name(&dependency).eq_ignore_ascii_case(resource_file_name)
                })
        })
    }

    /// Makes sure the generated file for `resource_path` is declared.
    ///
    /// `resource_path` should be absolute; it is matched against embedded
    /// resource includes by path suffix. The generated include sits in the
    /// same directory as the matched include and is named after the resource
    /// file's stem plus `suffix`.
    pub fn ensure_generated_file(
        &mut self,
        resource_path: &Path,
        suffix: &str,
    ) -> Result<SyncOutcome, Error> {
        let resource_file_name = resource_path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| Error::InvalidPath(resource_path.display().to_string()))?;

        if self.has_generated_file_for(resource_file_name) {
            return Ok(SyncOutcome::AlreadyPresent);
        }

        let full_path = normalize(&resource_path.to_string_lossy());
        let mut target = None;
        'search: for path in self.items(EMBEDDED_RESOURCE) {
            let Some(include) = self.document.element(&path).and_then(|e| e.attribute(INCLUDE))
            else {
                continue;
            };
            for item in split_items(&include) {
                if has_wildcard(&item) || !is_path_suffix(&full_path, &item) {
                    continue;
                }
                // Items without a directory component are never matched.
                let Some((directory, separator, name)) = split_directory(&item) else {
                    continue;
                };
                let stem = name.rsplit_once('.').map_or(name, |(stem, _)| stem);
                let generated = format!("{directory}{separator}{stem}{suffix}");
                target = Some((path, generated, name.to_string()));
                break 'search;
            }
        }

        let Some((embedded_path, include, dependency)) = target else {
            return Ok(SyncOutcome::NotDeclared);
        };
        self.insert_compile(&embedded_path, &include, &dependency)?;
        Ok(SyncOutcome::Added { include })
    }

    fn items(&self, local_name: &str) -> Vec<NodePath> {
        self.document.find_all(|element| is_item(element, local_name))
    }

    fn insert_compile(
        &mut self,
        embedded_path: &[usize],
        include: &str,
        dependency: &str,
    ) -> Result<(), Error> {
        let missing = || Error::InvalidManifest("item vanished during insertion".to_string());

        if let Some(first_compile) = self.items(COMPILE).into_iter().next() {
            let parent = self
                .document
                .element_mut(&first_compile[..first_compile.len() - 1])
                .ok_or_else(missing)?;
            let last = parent
                .children()
                .iter()
                .rposition(|node| node.as_element().is_some_and(|e| is_item(e, COMPILE)))
                .ok_or_else(missing)?;
            let sibling = parent.children()[last].as_element().ok_or_else(missing)?;
            let prefix = sibling.prefix();
            let namespace = sibling.namespace().map(str::to_string);
            let indent = parent.whitespace_before(last).unwrap_or_default().to_string();

            let compile = compile_element(
                prefix.as_deref(),
                namespace.as_deref(),
                include,
                dependency,
                &indent,
            );
            insert_after(parent, last, &indent, compile);
            return Ok(());
        }

        let embedded = self.document.element(embedded_path).ok_or_else(missing)?;
        let prefix = embedded.prefix();
        let namespace = embedded.namespace().map(str::to_string);

        match embedded_path {
            // EmbeddedResource -> ItemGroup -> container: add a fresh ItemGroup
            // after the one holding the resource.
            [container @ .., group, _] if !container.is_empty() => {
                let parent = self.document.element_mut(container).ok_or_else(missing)?;
                let group_indent = parent.whitespace_before(*group).unwrap_or_default().to_string();
                let item_indent = child_indent(&group_indent);

                let compile = compile_element(
                    prefix.as_deref(),
                    namespace.as_deref(),
                    include,
                    dependency,
                    &item_indent,
                );
                let mut item_group = Element::new(&qualify(prefix.as_deref(), ITEM_GROUP), namespace.as_deref());
                if !item_indent.is_empty() {
                    item_group.push(Node::text(&item_indent));
                }
                item_group.push(Node::Element(compile));
                if !group_indent.is_empty() {
                    item_group.push(Node::text(&group_indent));
                }
                insert_after(parent, *group, &group_indent, item_group);
            }
            // The resource sits directly under the root; keep it company.
            [parent_path @ .., index] => {
                let parent = self.document.element_mut(parent_path).ok_or_else(missing)?;
                let indent = parent.whitespace_before(*index).unwrap_or_default().to_string();
                let compile = compile_element(
                    prefix.as_deref(),
                    namespace.as_deref(),
                    include,
                    dependency,
                    &indent,
                );
                insert_after(parent, *index, &indent, compile);
            }
            [] => return Err(missing()),
        }
        Ok(())
    }
}

impl Parser for ProjectManifest {
    fn from_reader<R: BufRead>(reader: R) -> Result<Self, Error> {
        Ok(ProjectManifest {
            document: Document::from_reader(reader)?,
        })
    }

    fn read_from<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        Ok(ProjectManifest {
            document: Document::read_from(path)?,
        })
    }

    fn to_writer<W: Write>(&self, writer: W) -> Result<(), Error> {
        self.document.to_writer(writer)
    }
}

fn is_item(element: &Element, local_name: &str) -> bool {
    element.local_name() == local_name
        && matches!(element.namespace(), None | Some(MSBUILD_NAMESPACE))
}

/// `DependentUpon` metadata, as a child element or as an attribute.
fn dependent_upon(element: &Element) -> Option<String> {
    element
        .child_elements()
        .find(|child| is_item(child, DEPENDENT_UPON))
        .map(|child| child.text().trim().to_string())
        .or_else(|| element.attribute(DEPENDENT_UPON))
        .filter(|value| !value.is_empty())
}

fn split_items(include: &str) -> Vec<String> {
    include
        .split(';')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

fn has_wildcard(item: &str) -> bool {
    item.contains(['*', '?'])
}

fn file_name(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

/// Splits `dir\name` into directory, separator and name. Returns `None` when
/// the directory part is empty.
fn split_directory(item: &str) -> Option<(&str, char, &str)> {
    let index = item.rfind(['/', '\\'])?;
    let directory = &item[..index];
    if directory.is_empty() {
        return None;
    }
    let separator = if item[index..].starts_with('/') { '/' } else { '\\' };
    Some((directory, separator, &item[index + 1..]))
}

fn normalize(path: &str) -> String {
    path.replace('\\', "/").to_ascii_lowercase()
}

/// Whether `item` names the tail of `full_path`, on a segment boundary.
fn is_path_suffix(full_path: &str, item: &str) -> bool {
    let item = normalize(item);
    let item = item.trim_start_matches("./");
    if item.is_empty() {
        return false;
    }
    full_path == item
        || full_path
            .strip_suffix(item)
            .is_some_and(|head| head.ends_with('/'))
}

fn qualify(prefix: Option<&str>, local_name: &str) -> String {
    match prefix {
        Some(prefix) => format!("{prefix}:{local_name}"),
        None => local_name.to_string(),
    }
}

fn child_indent(indent: &str) -> String {
    if indent.is_empty() {
        String::new()
    } else {
        format!("{indent}{INDENT_UNIT}")
    }
}

fn compile_element(
    prefix: Option<&str>,
    namespace: Option<&str>,
    include: &str,
    dependency: &str,
    indent: &str,
) -> Element {
    let metadata_indent = child_indent(indent);
    let mut compile =
        Element::new(&qualify(prefix, COMPILE), namespace).with_attribute(INCLUDE, include);
    for (name, value) in [(AUTO_GEN, "True"), (DESIGN_TIME, "True"), (DEPENDENT_UPON, dependency)] {
        if !metadata_indent.is_empty() {
            compile.push(Node::text(&metadata_indent));
        }
        compile.push(Node::Element(
            Element::new(&qualify(prefix, name), namespace).with_text(value),
        ));
    }
    if !indent.is_empty() {
        compile.push(Node::text(indent));
    }
    compile
}

fn insert_after(parent: &mut Element, index: usize, indent: &str, element: Element) {
    if indent.is_empty() {
        parent.insert(index + 1, Node::Element(element));
    } else {
        parent.insert(index + 1, Node::text(indent));
        parent.insert(index + 2, Node::Element(element));
    }
}
