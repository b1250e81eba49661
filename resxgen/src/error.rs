//! All error types for the resxgen crate.
//!
//! These are returned from generation-time operations (parsing resource files,
//! loading and saving project manifests, emitting accessors). Errors raised by
//! generated accessors at run time live in [`crate::runtime`].

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("XML parse error: {0}")]
    XmlParse(#[from] quick_xml::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid resource: {0}")]
    InvalidResource(String),

    #[error("cannot resolve value of resource `{name}`: {reason}")]
    UnresolvedValue { name: String, reason: String },

    #[error("duplicate resource name `{0}`")]
    DuplicateResource(String),

    #[error("invalid project manifest: {0}")]
    InvalidManifest(String),

    #[error("invalid path: {0}")]
    InvalidPath(String),
}

impl Error {
    /// Creates an error for a resource whose value could not be resolved.
    pub fn unresolved_value(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::UnresolvedValue {
            name: name.into(),
            reason: reason.into(),
        }
    }
}
