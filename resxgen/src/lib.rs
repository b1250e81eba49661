#![forbid(unsafe_code)]
//! Strongly-typed Rust accessors for `.resx` string resources.
//!
//! resxgen reads `.resx` resource files, classifies the placeholders of every
//! string (`{name}` or `{0}`), writes a `<Name>.designer.rs` module with one
//! accessor function per resource, and keeps an MSBuild-style project file in
//! sync by declaring each generated module as a `Compile` item that depends
//! on its resource file.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::path::{Path, PathBuf};
//! use resxgen::{GenerateOptions, Generator};
//!
//! let generator = Generator::new(GenerateOptions::new().with_internalize(true));
//! let report = generator.run(
//!     Path::new("App/App.csproj"),
//!     &[PathBuf::from("App/Properties/Strings.resx")],
//! );
//! assert!(report.success());
//! ```
//!
//! Generated modules call into [`runtime`]; for a resource `Greeting` with the
//! value `Hello, {name}!` the accessor reads:
//!
//! ```rust,ignore
//! pub fn greeting(name: impl std::fmt::Display) -> Result<String, RuntimeError> {
//!     runtime::format(&get_string("Greeting", &["name"])?, &[&name])
//! }
//! ```
//!
//! # Modules
//!
//! - [`parameters`]: placeholder classification
//! - [`extract`]: resource entries from a [`extract::ResourceSource`]
//! - [`emitter`]: Rust source for an [`AccessorModel`]
//! - [`manifest`]: project file model and synchronization
//! - [`generator`]: the batch pipeline
//! - [`runtime`]: lookup and formatting used by generated code

pub mod emitter;
pub mod error;
pub mod extract;
pub mod files;
pub mod generator;
pub mod manifest;
pub mod parameters;
pub mod resx;
pub mod runtime;
pub mod traits;
pub mod types;

// Re-export most used types for easy consumption
pub use crate::{
    emitter::render,
    error::Error,
    extract::{ResourceSource, extract_entries, extract_file},
    generator::{GenerateOptions, GenerateReport, Generator, WriteStatus},
    manifest::{MSBUILD_NAMESPACE, ProjectManifest, SyncOutcome},
    parameters::{ParameterList, ParameterStyle, classify},
    runtime::{MissingResourceError, ResourceBundle, ResxBundle, RuntimeError},
    traits::Parser,
    types::{AccessorModel, ResourceEntry},
};
