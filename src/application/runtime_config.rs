use std::path::PathBuf;

use crate::cli::{Command, RenderArgs, ScaffoldArgs};
use crate::config::ProjectConfig;
use crate::filesystem::RenderOptions;
use crate::treemap::OverwritePolicy;

const DEFAULT_BASE: &str = ".";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaffoldConfig {
    pub input: Option<String>,
    pub base: PathBuf,
    pub policy: OverwritePolicy,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderConfig {
    pub directory: PathBuf,
    pub output: Option<PathBuf>,
    pub options: RenderOptions,
}

/// A fully resolved command: CLI flags layered over the project file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuntimeConfig {
    Scaffold(ScaffoldConfig),
    Render(RenderConfig),
}

impl RuntimeConfig {
    pub fn resolve(command: Command, project: ProjectConfig) -> Self {
        match command {
            Command::Scaffold(args) => Self::Scaffold(ScaffoldConfig::resolve(args, project)),
            Command::Render(args) => Self::Render(RenderConfig::resolve(args, project)),
        }
    }
}

impl ScaffoldConfig {
    fn resolve(args: ScaffoldArgs, project: ProjectConfig) -> Self {
        let no_clobber = args.no_clobber || project.scaffold.no_clobber.unwrap_or(false);
        Self {
            input: args.input,
            base: args
                .base
                .or(project.scaffold.base)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_BASE)),
            policy: if no_clobber {
                OverwritePolicy::Skip
            } else {
                OverwritePolicy::Truncate
            },
        }
    }
}

impl RenderConfig {
    fn resolve(args: RenderArgs, project: ProjectConfig) -> Self {
        let defaults = project.render;
        let mut options = RenderOptions::default();
        options.exclude_dirs.extend(defaults.exclude_dirs);
        options.exclude_dirs.extend(args.exclude_dirs);
        options.exclude_files.extend(defaults.exclude_files);
        options.exclude_files.extend(args.exclude_files);
        options.exclude_patterns.extend(defaults.exclude_patterns);
        options.include_extensions = args.extensions.or(defaults.include_extensions);
        options.max_depth = args.max_depth.or(defaults.max_depth);

        Self {
            directory: args.directory,
            output: args.output,
            options,
        }
    }
}
