mod cli;

pub use cli::{Cli, Command, RenderArgs, SCAFFOLD_USAGE, ScaffoldArgs};
