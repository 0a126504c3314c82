use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::application::data::LogLevel;

pub const SCAFFOLD_USAGE: &str = "\
Usage: treemap scaffold <TREEMAP_FILE>

Or pipe treemap content:
cat treemap.txt | treemap scaffold -

Or paste treemap and press Ctrl+D (Unix) or Ctrl+Z (Windows):
treemap scaffold -";

#[derive(Parser, Debug, Clone)]
#[command(
    version,
    about = "Scaffold directories from treemap text, and render directories back into it"
)]
pub struct Cli {
    #[clap(long, short, default_value = "warn", value_enum, global = true)]
    pub log_level: LogLevel,

    /// Project config file (defaults to ./treemap.yaml when present)
    #[clap(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create the directories and empty files described by a treemap
    Scaffold(ScaffoldArgs),
    /// Print a directory as a treemap
    Render(RenderArgs),
}

#[derive(Args, Debug, Clone)]
#[command(after_help = SCAFFOLD_USAGE)]
pub struct ScaffoldArgs {
    /// Treemap file, or `-` for stdin
    pub input: Option<String>,

    /// Directory the structure is created in
    #[clap(long, short)]
    pub base: Option<PathBuf>,

    /// Leave existing files untouched instead of truncating them
    #[clap(long)]
    pub no_clobber: bool,
}

#[derive(Args, Debug, Clone)]
pub struct RenderArgs {
    /// Directory to render
    #[clap(default_value = ".")]
    pub directory: PathBuf,

    /// Write the tree to this file instead of stdout
    #[clap(long, short)]
    pub output: Option<PathBuf>,

    /// Maximum depth to descend into
    #[clap(long)]
    pub max_depth: Option<usize>,

    /// Only include files with these extensions (e.g. .rs .toml)
    #[clap(long = "ext", num_args = 1..)]
    pub extensions: Option<Vec<String>>,

    /// Additional directory names to exclude
    #[clap(long, num_args = 1..)]
    pub exclude_dirs: Vec<String>,

    /// Additional file names to exclude
    #[clap(long, num_args = 1..)]
    pub exclude_files: Vec<String>,
}
