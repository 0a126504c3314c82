mod application;
pub mod data;
mod reporter;
mod runtime_config;

pub use application::{Application, ApplicationError};
pub use reporter::configure_colors;
pub use runtime_config::{RenderConfig, RuntimeConfig, ScaffoldConfig};
