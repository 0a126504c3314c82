pub mod config;

pub use config::{ConfigError, ProjectConfig, RenderDefaults, ScaffoldDefaults};
