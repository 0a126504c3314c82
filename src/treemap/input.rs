use std::fs;
use std::io::{self, ErrorKind, Read};
use std::path::PathBuf;

use snafu::{ResultExt, Snafu};
use tracing::debug;

use crate::ext::BestEffortPathExt;

const STDIN_MARKER: &str = "-";

/// Where the treemap document comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    Stdin,
    File(PathBuf),
}

impl InputSource {
    /// Picks the input source from the optional positional argument.
    ///
    /// A named file wins over piped input; without an argument, stdin is
    /// only used when it is not an interactive terminal.
    pub fn resolve(argument: Option<&str>, stdin_is_terminal: bool) -> Result<Self, InputError> {
        match argument {
            Some(STDIN_MARKER) => Ok(Self::Stdin),
            Some(path) => Ok(Self::File(PathBuf::from(path))),
            None if !stdin_is_terminal => Ok(Self::Stdin),
            None => Err(InputError::UsageError),
        }
    }

    pub fn read(&self) -> Result<String, InputError> {
        self.read_with_stdin(io::stdin().lock())
    }

    fn read_with_stdin(&self, mut stdin: impl Read) -> Result<String, InputError> {
        match self {
            Self::Stdin => {
                debug!("Reading treemap from stdin");
                let mut content = String::new();
                stdin.read_to_string(&mut content).context(StdinSnafu)?;
                Ok(content)
            }
            Self::File(path) => {
                debug!("Reading treemap from {}", path.best_effort_path_display());
                fs::read_to_string(path).map_err(|source| match source.kind() {
                    ErrorKind::NotFound => InputError::NotFoundError {
                        file_path: path.display().to_string(),
                    },
                    _ => InputError::ReadError {
                        file_path: path.best_effort_path_display(),
                        source,
                    },
                })
            }
        }
    }
}

#[derive(Debug, Snafu)]
pub enum InputError {
    #[snafu(display("No treemap input given"))]
    UsageError,
    #[snafu(display("File '{}' not found", file_path))]
    NotFoundError { file_path: String },
    #[snafu(display("Failed to read the treemap file: {}", file_path))]
    ReadError {
        file_path: String,
        source: std::io::Error,
    },
    #[snafu(display("Failed to read the treemap from stdin"))]
    StdinError { source: std::io::Error },
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;
    use std::io::Cursor;
    use tempfile::TempDir;

    #[rstest]
    #[case(Some("-"), true, InputSource::Stdin)]
    #[case(Some("-"), false, InputSource::Stdin)]
    #[case(None, false, InputSource::Stdin)]
    #[case(Some("tree.txt"), false, InputSource::File(PathBuf::from("tree.txt")))]
    #[case(Some("tree.txt"), true, InputSource::File(PathBuf::from("tree.txt")))]
    fn resolves_input_source(
        #[case] argument: Option<&str>,
        #[case] stdin_is_terminal: bool,
        #[case] expected: InputSource,
    ) {
        let source = InputSource::resolve(argument, stdin_is_terminal).expect("Should resolve");
        assert_eq!(source, expected);
    }

    #[test]
    fn missing_argument_on_terminal_is_usage_error() {
        assert!(matches!(
            InputSource::resolve(None, true),
            Err(InputError::UsageError)
        ));
    }

    #[test]
    fn reads_from_stdin_stream() {
        let content = InputSource::Stdin
            .read_with_stdin(Cursor::new("docs/\n  a.txt"))
            .expect("Should read stdin");
        assert_eq!(content, "docs/\n  a.txt");
    }

    #[test]
    fn reads_named_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("tree.txt");
        fs::write(&path, "src/\n└── main.rs").expect("Failed to write file");

        let content = InputSource::File(path)
            .read_with_stdin(io::empty())
            .expect("Should read file");
        assert_eq!(content, "src/\n└── main.rs");
    }

    #[test]
    fn missing_file_reports_name() {
        let result =
            InputSource::File(PathBuf::from("does-not-exist.txt")).read_with_stdin(io::empty());
        match result {
            Err(err @ InputError::NotFoundError { .. }) => {
                assert_eq!(err.to_string(), "File 'does-not-exist.txt' not found");
            }
            other => panic!("Expected NotFoundError, got {other:?}"),
        }
    }
}
