use std::path::{Component, Path, PathBuf};

/// Renders a path for humans: canonical when it exists, otherwise made
/// absolute against the working directory and lexically normalized.
pub fn best_effort_path_display(path: &Path) -> String {
    if let Ok(canonical) = path.canonicalize() {
        return canonical.display().to_string();
    }

    let absolute = match std::env::current_dir() {
        Ok(current_dir) if path.is_relative() => current_dir.join(path),
        _ => path.to_path_buf(),
    };
    lexically_normalize(&absolute).display().to_string()
}

/// Drops `.` and folds `..` into its parent without touching the disk.
fn lexically_normalize(path: &Path) -> PathBuf {
    path.components()
        .fold(Vec::new(), |mut kept: Vec<Component>, component| {
            match component {
                Component::CurDir => {}
                Component::ParentDir => {
                    if matches!(kept.last(), Some(Component::Normal(_))) {
                        kept.pop();
                    }
                }
                other => kept.push(other),
            }
            kept
        })
        .iter()
        .collect()
}

pub trait BestEffortPathExt {
    fn best_effort_path_display(&self) -> String;
}

impl<P: AsRef<Path> + ?Sized> BestEffortPathExt for P {
    fn best_effort_path_display(&self) -> String {
        best_effort_path_display(self.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;
    use tempfile::TempDir;

    #[rstest]
    #[case("/a/./b/../c", "/a/c")]
    #[case("/a/b/../../..", "/")]
    #[case("/x/y/.", "/x/y")]
    fn normalizes_without_disk_access(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(lexically_normalize(Path::new(input)), PathBuf::from(expected));
    }

    #[test]
    fn existing_path_is_canonicalized() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let nested = temp_dir.path().join("inner");
        std::fs::create_dir(&nested).expect("Failed to create dir");

        let display = nested.join("..").join("inner").best_effort_path_display();
        assert_eq!(
            display,
            nested.canonicalize().expect("Failed to canonicalize").display().to_string()
        );
    }

    #[test]
    fn missing_relative_path_becomes_absolute() {
        let display = "missing/./file.txt".best_effort_path_display();
        assert!(Path::new(&display).is_absolute());
        assert!(display.ends_with("file.txt"));
        assert!(!display.contains("/./"));
    }
}
