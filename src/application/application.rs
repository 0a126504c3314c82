use std::fs;
use std::io::{self, IsTerminal};

use snafu::prelude::*;
use tracing::{debug, info};

use crate::application::reporter::Reporter;
use crate::application::{RenderConfig, RuntimeConfig, ScaffoldConfig};
use crate::cli::{Cli, SCAFFOLD_USAGE};
use crate::config::{ConfigError, ProjectConfig};
use crate::filesystem::{self, FilesystemNode, RenderError};
use crate::treemap::{InputError, InputSource, MaterializeError, Materializer, parse_treemap};

pub struct Application;

impl Application {
    pub fn run(cli: Cli) -> Result<(), ApplicationError> {
        let project = ProjectConfig::read(cli.config.as_deref()).context(ConfigSnafu)?;
        debug!("Loaded config: {:?}", project);

        match RuntimeConfig::resolve(cli.command, project) {
            RuntimeConfig::Scaffold(config) => Self::scaffold(config),
            RuntimeConfig::Render(config) => Self::render(config),
        }
    }

    fn scaffold(config: ScaffoldConfig) -> Result<(), ApplicationError> {
        let reporter = Reporter;
        let source = InputSource::resolve(config.input.as_deref(), io::stdin().is_terminal())
            .inspect_err(|err| {
                if matches!(err, InputError::UsageError) {
                    eprintln!("{SCAFFOLD_USAGE}");
                }
            })
            .context(InputSnafu)?;
        let content = source.read().context(InputSnafu)?;

        reporter.parsing();
        let entries = parse_treemap(&content);
        ensure!(!entries.is_empty(), EmptyTreemapSnafu);
        reporter.found(entries.len());

        let report = Materializer::new(&config.base)
            .with_policy(config.policy)
            .materialize(&entries, |progress| reporter.progress(progress))
            .context(MaterializeSnafu)?;
        info!("Scaffold complete: {}", report);

        reporter.done(&report);
        Ok(())
    }

    fn render(config: RenderConfig) -> Result<(), ApplicationError> {
        let tree = FilesystemNode::from_directory(&config.directory, &config.options)
            .context(RenderSnafu)?;
        let root_name = filesystem::root_display_name(&config.directory).context(RenderSnafu)?;
        let text = tree.render(&root_name);

        match config.output {
            Some(path) => {
                fs::write(&path, &text)
                    .context(filesystem::WriteSnafu { path: path.clone() })
                    .context(RenderSnafu)?;
                Reporter.saved(&path);
            }
            None => println!("{text}"),
        }

        Ok(())
    }
}

#[derive(Debug, Snafu)]
pub enum ApplicationError {
    #[snafu(display("Critical failure encountered while loading the config"))]
    ConfigError { source: ConfigError },
    #[snafu(display("Could not obtain the treemap"))]
    InputError { source: InputError },
    #[snafu(display("No valid structure found in treemap"))]
    EmptyTreemap,
    #[snafu(display("Failed to create the treemap structure"))]
    MaterializeError { source: MaterializeError },
    #[snafu(display("Failed to render the directory tree"))]
    RenderError { source: RenderError },
}
