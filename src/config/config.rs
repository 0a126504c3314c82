use std::borrow::Cow;
use std::fs;
use std::path::{Path, PathBuf};

use hashlink::LinkedHashMap;
use saphyr::{LoadableYamlNode, Scalar, Yaml};
use snafu::prelude::*;
use tracing::debug;

use crate::ext::BestEffortPathExt;

const CONFIG_FILE_NAME: &str = "treemap.yaml";

type YamlMap<'input> = LinkedHashMap<Yaml<'input>, Yaml<'input>>;

fn key(name: &'static str) -> Yaml<'static> {
    Yaml::Value(Scalar::String(Cow::Borrowed(name)))
}

/// Defaults for `treemap scaffold` read from the project file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScaffoldDefaults {
    pub base: Option<PathBuf>,
    pub no_clobber: Option<bool>,
}

/// Defaults for `treemap render`. List values extend the built-in exclusions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderDefaults {
    pub max_depth: Option<usize>,
    pub include_extensions: Option<Vec<String>>,
    pub exclude_dirs: Vec<String>,
    pub exclude_files: Vec<String>,
    pub exclude_patterns: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectConfig {
    pub scaffold: ScaffoldDefaults,
    pub render: RenderDefaults,
}

impl ProjectConfig {
    /// Reads the explicitly named file, or `treemap.yaml` from the working
    /// directory when present. Only an explicit file is required to exist.
    pub fn read(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::from_path(path),
            None => {
                let path = Path::new(CONFIG_FILE_NAME);
                if path.exists() {
                    Self::from_path(path)
                } else {
                    debug!("No {} found, using built-in defaults", CONFIG_FILE_NAME);
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        debug!("Reading config file: {}", path.best_effort_path_display());
        let contents = fs::read_to_string(path).context(ReadSnafu {
            file_path: path.best_effort_path_display(),
        })?;
        contents.as_str().try_into()
    }

    fn parse_scaffold(section: &YamlMap) -> Result<ScaffoldDefaults, ConfigError> {
        let base = string_value(section, "scaffold.base", "base")?.map(PathBuf::from);
        let no_clobber = match section.get(&key("no_clobber")) {
            None => None,
            Some(value) => Some(value.as_bool().context(InvalidValueSnafu {
                key: "scaffold.no_clobber",
                expected: "a boolean",
            })?),
        };

        Ok(ScaffoldDefaults { base, no_clobber })
    }

    fn parse_render(section: &YamlMap) -> Result<RenderDefaults, ConfigError> {
        let max_depth = match section.get(&key("max_depth")) {
            None => None,
            Some(value) => Some(
                value
                    .as_integer()
                    .and_then(|depth| usize::try_from(depth).ok())
                    .context(InvalidValueSnafu {
                        key: "render.max_depth",
                        expected: "a non-negative integer",
                    })?,
            ),
        };

        Ok(RenderDefaults {
            max_depth,
            include_extensions: string_list(
                section,
                "render.include_extensions",
                "include_extensions",
            )?,
            exclude_dirs: string_list(section, "render.exclude_dirs", "exclude_dirs")?
                .unwrap_or_default(),
            exclude_files: string_list(section, "render.exclude_files", "exclude_files")?
                .unwrap_or_default(),
            exclude_patterns: string_list(section, "render.exclude_patterns", "exclude_patterns")?
                .unwrap_or_default(),
        })
    }
}

/// Looks up a top-level section. A missing or empty (`null`) section yields `None`.
fn section<'a, 'input>(
    top_level: &'a YamlMap<'input>,
    name: &'static str,
) -> Result<Option<&'a YamlMap<'input>>, ConfigError> {
    match top_level.get(&key(name)) {
        None | Some(Yaml::Value(Scalar::Null)) => Ok(None),
        Some(value) => value
            .as_mapping()
            .map(Some)
            .context(SectionNotMapSnafu { section: name }),
    }
}

fn string_value(
    section: &YamlMap,
    full_key: &'static str,
    name: &'static str,
) -> Result<Option<String>, ConfigError> {
    section
        .get(&key(name))
        .map(|value| {
            value.as_str().map(str::to_string).context(InvalidValueSnafu {
                key: full_key,
                expected: "a string",
            })
        })
        .transpose()
}

fn string_list(
    section: &YamlMap,
    full_key: &'static str,
    name: &'static str,
) -> Result<Option<Vec<String>>, ConfigError> {
    let Some(value) = section.get(&key(name)) else {
        return Ok(None);
    };

    let invalid = InvalidValueSnafu {
        key: full_key,
        expected: "a list of strings",
    };
    value
        .as_sequence()
        .context(invalid)?
        .iter()
        .map(|item| item.as_str().map(str::to_string).context(invalid))
        .collect::<Result<Vec<_>, _>>()
        .map(Some)
}

impl TryFrom<&str> for ProjectConfig {
    type Error = ConfigError;

    fn try_from(contents: &str) -> Result<Self, Self::Error> {
        let documents = Yaml::load_from_str(contents).context(ParseSnafu)?;
        let Some(document) = documents.first() else {
            return Ok(Self::default());
        };
        if matches!(document, Yaml::Value(Scalar::Null)) {
            return Ok(Self::default());
        }

        let top_level = document.as_mapping().context(TopLevelNotMapSnafu)?;

        let scaffold = section(top_level, "scaffold")?
            .map(Self::parse_scaffold)
            .transpose()?
            .unwrap_or_default();
        let render = section(top_level, "render")?
            .map(Self::parse_render)
            .transpose()?
            .unwrap_or_default();

        Ok(ProjectConfig { scaffold, render })
    }
}

#[derive(Debug, Snafu)]
pub enum ConfigError {
    #[snafu(display("Failed to read the config file: {}", file_path))]
    ReadError {
        file_path: String,
        source: std::io::Error,
    },
    #[snafu(display("Failed to parse the config file"))]
    ParseError { source: saphyr::ScanError },
    #[snafu(display("Top level of config should be a map"))]
    TopLevelNotMap,
    #[snafu(display("Section '{}' should be a map", section))]
    SectionNotMap { section: &'static str },
    #[snafu(display("Key '{}' should be {}", key, expected))]
    InvalidValue {
        key: &'static str,
        expected: &'static str,
    },
}
