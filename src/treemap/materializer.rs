use std::fs::{self, File, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use derive_more::Display;
use snafu::{ResultExt, Snafu};
use tracing::{debug, info};

use crate::ext::BestEffortPathExt;
use crate::treemap::TreeEntry;

/// What to do when a file entry points at a file that already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverwritePolicy {
    /// Truncate the existing file to zero length.
    #[default]
    Truncate,
    /// Leave the existing file untouched.
    Skip,
}

/// Counts of filesystem operations performed, not of unique nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display)]
#[display(
    "{directories_created} directories created, {files_created} files created, {files_skipped} files skipped"
)]
pub struct MaterializeReport {
    pub directories_created: usize,
    pub files_created: usize,
    pub files_skipped: usize,
}

/// Emitted once per entry as it lands on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress<'a> {
    CreatedDirectory(&'a Path),
    CreatedFile(&'a Path),
    SkippedFile(&'a Path),
}

pub struct Materializer {
    base: PathBuf,
    policy: OverwritePolicy,
}

impl Materializer {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self {
            base: base.into(),
            policy: OverwritePolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: OverwritePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Creates every entry under the base directory, strictly in order.
    ///
    /// Stops at the first I/O failure. Anything created before it stays on
    /// disk and the counts reached so far travel with the error.
    pub fn materialize<F>(
        &self,
        entries: &[TreeEntry],
        mut on_progress: F,
    ) -> Result<MaterializeReport, MaterializeError>
    where
        F: FnMut(Progress<'_>),
    {
        info!(
            "Materializing {} entries under {}",
            entries.len(),
            self.base.best_effort_path_display()
        );
        let mut report = MaterializeReport::default();

        for entry in entries {
            let full_path = self.base.join(&entry.path);

            if entry.is_directory {
                create_dir_all(&full_path, report)?;
                report.directories_created += 1;
                on_progress(Progress::CreatedDirectory(&full_path));
                continue;
            }

            if let Some(parent) = full_path.parent() {
                create_dir_all(parent, report)?;
            }

            if self.create_file(&full_path, report)? {
                report.files_created += 1;
                on_progress(Progress::CreatedFile(&full_path));
            } else {
                report.files_skipped += 1;
                on_progress(Progress::SkippedFile(&full_path));
            }
        }

        debug!("Materialization finished: {}", report);
        Ok(report)
    }

    /// Returns `false` when the file was left alone because of `OverwritePolicy::Skip`.
    fn create_file(
        &self,
        path: &Path,
        completed: MaterializeReport,
    ) -> Result<bool, MaterializeError> {
        let result = match self.policy {
            OverwritePolicy::Truncate => File::create(path).map(|_| true),
            OverwritePolicy::Skip => {
                match OpenOptions::new().write(true).create_new(true).open(path) {
                    Ok(_) => Ok(true),
                    Err(err) if err.kind() == ErrorKind::AlreadyExists => {
                        debug!("Keeping existing file {}", path.display());
                        Ok(false)
                    }
                    Err(err) => Err(err),
                }
            }
        };

        result.context(CreateFileSnafu {
            path: path.to_path_buf(),
            completed,
        })
    }
}

fn create_dir_all(path: &Path, completed: MaterializeReport) -> Result<(), MaterializeError> {
    fs::create_dir_all(path).context(CreateDirectorySnafu {
        path: path.to_path_buf(),
        completed,
    })
}

#[derive(Debug, Snafu)]
pub enum MaterializeError {
    #[snafu(display(
        "Failed to create directory {} ({})",
        path.best_effort_path_display(),
        completed
    ))]
    CreateDirectoryError {
        path: PathBuf,
        completed: MaterializeReport,
        source: std::io::Error,
    },
    #[snafu(display(
        "Failed to create file {} ({})",
        path.best_effort_path_display(),
        completed
    ))]
    CreateFileError {
        path: PathBuf,
        completed: MaterializeReport,
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[fixture]
    fn temp_dir() -> TempDir {
        TempDir::new().expect("Failed to create temp directory")
    }

    fn materialize_quietly(
        materializer: &Materializer,
        entries: &[TreeEntry],
    ) -> Result<MaterializeReport, MaterializeError> {
        materializer.materialize(entries, |_| {})
    }

    #[rstest]
    #[case(false)]
    #[case(true)]
    fn creates_directory_then_nested_file(temp_dir: TempDir, #[case] pre_existing: bool) {
        if pre_existing {
            fs::create_dir(temp_dir.path().join("docs")).expect("Failed to pre-create dir");
        }
        let entries = vec![
            TreeEntry::directory("docs"),
            TreeEntry::file("docs/readme.txt"),
        ];

        let mut seen = Vec::new();
        let report = Materializer::new(temp_dir.path())
            .materialize(&entries, |progress| {
                seen.push(match progress {
                    Progress::CreatedDirectory(_) => "dir",
                    Progress::CreatedFile(_) => "file",
                    Progress::SkippedFile(_) => "skip",
                })
            })
            .expect("Materialization failed");

        assert_eq!(seen, vec!["dir", "file"]);
        assert_eq!(report.directories_created, 1);
        assert_eq!(report.files_created, 1);
        let file = temp_dir.path().join("docs/readme.txt");
        assert!(temp_dir.path().join("docs").is_dir());
        assert_eq!(fs::metadata(file).expect("Missing file").len(), 0);
    }

    #[rstest]
    fn file_without_directory_entry_gets_parents(temp_dir: TempDir) {
        let entries = vec![TreeEntry::file("a/b/c.txt")];
        let report = materialize_quietly(&Materializer::new(temp_dir.path()), &entries)
            .expect("Materialization failed");

        assert_eq!(report.directories_created, 0);
        assert!(temp_dir.path().join("a/b/c.txt").is_file());
    }

    #[rstest]
    fn existing_file_is_truncated_by_default(temp_dir: TempDir) {
        let path = temp_dir.path().join("notes.txt");
        let mut file = File::create(&path).expect("Failed to create file");
        writeln!(file, "keep me?").expect("Failed to write file");

        materialize_quietly(
            &Materializer::new(temp_dir.path()),
            &[TreeEntry::file("notes.txt")],
        )
        .expect("Materialization failed");

        assert_eq!(fs::read_to_string(&path).expect("Missing file"), "");
    }

    #[rstest]
    fn skip_policy_preserves_existing_file(temp_dir: TempDir) {
        let path = temp_dir.path().join("notes.txt");
        fs::write(&path, "keep me").expect("Failed to write file");

        let report = materialize_quietly(
            &Materializer::new(temp_dir.path()).with_policy(OverwritePolicy::Skip),
            &[TreeEntry::file("notes.txt"), TreeEntry::file("fresh.txt")],
        )
        .expect("Materialization failed");

        assert_eq!(fs::read_to_string(&path).expect("Missing file"), "keep me");
        assert_eq!(report.files_created, 1);
        assert_eq!(report.files_skipped, 1);
        assert!(temp_dir.path().join("fresh.txt").is_file());
    }

    #[rstest]
    fn repeated_paths_count_every_operation(temp_dir: TempDir) {
        let entries = vec![
            TreeEntry::directory("docs"),
            TreeEntry::directory("docs"),
            TreeEntry::file("docs/a.txt"),
            TreeEntry::file("docs/a.txt"),
        ];
        let report = materialize_quietly(&Materializer::new(temp_dir.path()), &entries)
            .expect("Materialization failed");

        assert_eq!(
            report,
            MaterializeReport {
                directories_created: 2,
                files_created: 2,
                files_skipped: 0,
            }
        );
    }

    #[rstest]
    fn failure_aborts_and_keeps_earlier_entries(temp_dir: TempDir) {
        // A file standing where a directory is needed makes create_dir_all fail.
        let entries = vec![
            TreeEntry::file("blocker"),
            TreeEntry::file("blocker/inner.txt"),
            TreeEntry::file("never.txt"),
        ];
        let result = materialize_quietly(&Materializer::new(temp_dir.path()), &entries);

        match result {
            Err(MaterializeError::CreateDirectoryError { completed, .. }) => {
                assert_eq!(completed.files_created, 1);
            }
            other => panic!("Expected CreateDirectoryError, got {other:?}"),
        }
        assert!(temp_dir.path().join("blocker").is_file());
        assert!(!temp_dir.path().join("never.txt").exists());
    }

    #[rstest]
    fn slash_only_directory_keeps_children_under_base(temp_dir: TempDir) {
        let base = temp_dir.path().join("base");
        let entries = crate::treemap::parse_treemap("/\n  child.txt");

        let report = materialize_quietly(&Materializer::new(&base), &entries)
            .expect("Materialization failed");

        assert_eq!(report.directories_created, 1);
        assert_eq!(report.files_created, 1);
        assert!(base.join("child.txt").is_file());
        let outside = fs::read_dir(temp_dir.path())
            .expect("Failed to list dir")
            .filter_map(Result::ok)
            .map(|entry| entry.file_name())
            .collect::<Vec<_>>();
        assert_eq!(outside, vec![std::ffi::OsString::from("base")]);
    }

    #[rstest]
    fn empty_entry_list_touches_nothing(temp_dir: TempDir) {
        let report = materialize_quietly(&Materializer::new(temp_dir.path()), &[])
            .expect("Materialization failed");
        assert_eq!(report, MaterializeReport::default());
        assert_eq!(
            fs::read_dir(temp_dir.path()).expect("Failed to list dir").count(),
            0
        );
    }
}
