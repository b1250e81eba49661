//! CLI library for testing purposes

pub mod config;
pub mod generate;
pub mod path_glob;
pub mod render;
pub mod validation;
pub mod view;

pub use config::{Config, LoadedConfig, discover_config};
pub use generate::{GenerateCommand, run_generate_command};
pub use path_glob::expand_input_globs;
pub use render::render_resource;
