// <auto-generated />
// Generated by resxgen 0.3.0 from Strings.resx. Edit the resource file and regenerate instead.

use std::sync::LazyLock;

use resxgen::runtime::{self as runtime, ResxBundle, RuntimeError};

/// Fully-qualified name of the resource bundle behind these accessors.
pub const BUNDLE_NAME: &str = "Demo.App.Strings";

static RESOURCES: LazyLock<ResxBundle> =
    LazyLock::new(|| ResxBundle::embedded(BUNDLE_NAME, include_str!("Strings.resx")));

/// Greets someone by name.
pub fn greeting(name: impl std::fmt::Display) -> Result<String, RuntimeError> {
    runtime::format(&get_string("Greeting", &["name"])?, &[&name])
}

/// {name} owes {amount}, {name}!
pub fn debt(name: impl std::fmt::Display, amount: impl std::fmt::Display) -> Result<String, RuntimeError> {
    runtime::format(&get_string("Debt", &["name", "amount"])?, &[&name, &amount])
}

/// {1} before {0}
pub fn order(arg0: impl std::fmt::Display, arg1: impl std::fmt::Display) -> Result<String, RuntimeError> {
    runtime::format(&get_string("Order", &["0", "1"])?, &[&arg0, &arg1])
}

/// Window title.
pub fn title() -> Result<String, RuntimeError> {
    get_string("Title", &[])
}

fn get_string(name: &str, formatter_names: &[&str]) -> Result<String, RuntimeError> {
    runtime::get_string(&*RESOURCES, name, formatter_names)
}
