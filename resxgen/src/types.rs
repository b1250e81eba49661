//! Core types flowing from extraction to emission.

use serde::Serialize;

use crate::parameters::{ParameterStyle, classify};

/// A single localizable string, with its formatting-parameter contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceEntry {
    /// Unique name within the resource file; the accessor is named after it.
    pub name: String,

    /// The raw format string.
    pub value: String,

    /// Optional documentation for the accessor.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,

    /// Distinct placeholder tokens of `value`, in canonical order.
    pub parameters: Vec<String>,

    pub uses_named_parameters: bool,
}

impl ResourceEntry {
    /// Builds an entry, classifying `value` to recover its parameters.
    pub fn new(name: impl Into<String>, value: impl Into<String>, comment: Option<String>) -> Self {
        let value = value.into();
        let parameters = classify(&value);
        ResourceEntry {
            name: name.into(),
            comment,
            uses_named_parameters: parameters.style == ParameterStyle::Named,
            parameters: parameters.tokens,
            value,
        }
    }

    pub fn style(&self) -> ParameterStyle {
        if self.uses_named_parameters {
            ParameterStyle::Named
        } else {
            ParameterStyle::Positional
        }
    }
}

/// Everything needed to render one generated accessor file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessorModel {
    /// Target namespace (`MyCompany.AwesomeApp`).
    pub namespace: String,

    /// Bundle name relative to the namespace (`Properties.Strings`).
    pub resource_bundle_name: String,

    /// File name of the resource file, embedded by the generated module.
    pub resource_file_name: String,

    /// Path of the runtime support module used by the generated code.
    pub runtime_path: String,

    /// Entries in source order.
    pub entries: Vec<ResourceEntry>,

    /// Emit `pub(crate)` items instead of `pub`.
    pub internalize: bool,
}

impl AccessorModel {
    /// The fully-qualified `namespace.resourceBundleName` identifier.
    pub fn qualified_bundle_name(&self) -> String {
        if self.namespace.is_empty() {
            self.resource_bundle_name.clone()
        } else {
            format!("{}.{}", self.namespace, self.resource_bundle_name)
        }
    }

    pub fn visibility(&self) -> &'static str {
        if self.internalize { "pub(crate)" } else { "pub" }
    }
}
