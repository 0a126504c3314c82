use std::cmp::Ordering;
use std::path::{Path, PathBuf};

use hashlink::LinkedHashMap;
use snafu::{ResultExt, Snafu, ensure};
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

use crate::ext::BestEffortPathExt;

const DEFAULT_EXCLUDE_DIRS: &[&str] = &[
    "node_modules",
    "__pycache__",
    ".git",
    ".vscode",
    ".idea",
    "venv",
    "env",
    "dist",
    "build",
    ".next",
    "coverage",
    ".pytest_cache",
    ".mypy_cache",
];

const DEFAULT_EXCLUDE_FILES: &[&str] = &[
    ".DS_Store",
    "Thumbs.db",
    ".gitignore",
    "package-lock.json",
    "yarn.lock",
    ".env",
];

const DEFAULT_EXCLUDE_PATTERNS: &[&str] = &[".pyc", ".pyo", ".log"];

/// Filters applied while walking a directory for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Directory names skipped along with everything below them.
    pub exclude_dirs: Vec<String>,
    /// Exact file names to skip.
    pub exclude_files: Vec<String>,
    /// File name suffixes to skip.
    pub exclude_patterns: Vec<String>,
    /// When set, only files with one of these extensions are kept.
    pub include_extensions: Option<Vec<String>>,
    /// Levels below the root to descend into; `None` means unlimited.
    pub max_depth: Option<usize>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        let owned = |names: &[&str]| names.iter().map(|name| name.to_string()).collect();
        Self {
            exclude_dirs: owned(DEFAULT_EXCLUDE_DIRS),
            exclude_files: owned(DEFAULT_EXCLUDE_FILES),
            exclude_patterns: owned(DEFAULT_EXCLUDE_PATTERNS),
            include_extensions: None,
            max_depth: None,
        }
    }
}

impl RenderOptions {
    fn is_excluded(&self, entry: &DirEntry) -> bool {
        let name = entry.file_name().to_string_lossy();

        if entry.file_type().is_dir() {
            return self.exclude_dirs.iter().any(|dir| *dir == name);
        }

        if self.exclude_files.iter().any(|file| *file == name)
            || self
                .exclude_patterns
                .iter()
                .any(|pattern| name.ends_with(pattern.as_str()))
        {
            return true;
        }

        match &self.include_extensions {
            Some(extensions) => !extensions
                .iter()
                .any(|extension| has_extension(entry.path(), extension)),
            None => false,
        }
    }
}

/// Accepts both `.rs` and `rs` spellings.
fn has_extension(path: &Path, extension: &str) -> bool {
    let wanted = extension.strip_prefix('.').unwrap_or(extension);
    path.extension()
        .is_some_and(|actual| actual.to_string_lossy() == wanted)
}

/// Directories first, then files, each group by case-insensitive name.
fn render_order(a: &DirEntry, b: &DirEntry) -> Ordering {
    let key = |entry: &DirEntry| {
        (
            !entry.file_type().is_dir(),
            entry.file_name().to_string_lossy().to_lowercase(),
        )
    };
    key(a).cmp(&key(b))
}

/// Represents the type of a filesystem node.
///
/// Children keep insertion order, which is the order they are rendered in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilesystemNode {
    File,
    Directory {
        children: LinkedHashMap<String, FilesystemNode>,
    },
}

impl FilesystemNode {
    pub fn root() -> Self {
        FilesystemNode::Directory {
            children: LinkedHashMap::new(),
        }
    }

    /// Walks `root` and collects every entry that survives `options`.
    ///
    /// Unreadable entries are logged and left out rather than failing the walk.
    pub fn from_directory(root: &Path, options: &RenderOptions) -> Result<Self, RenderError> {
        ensure!(
            root.exists(),
            MissingDirectorySnafu {
                path: root.to_path_buf()
            }
        );
        ensure!(
            root.is_dir(),
            NotADirectorySnafu {
                path: root.to_path_buf()
            }
        );

        let mut walker = WalkDir::new(root)
            .min_depth(1)
            .follow_links(false)
            .sort_by(render_order);
        if let Some(depth) = options.max_depth.filter(|depth| *depth > 0) {
            walker = walker.max_depth(depth);
        }

        let mut tree = Self::root();
        for entry in walker.into_iter().filter_entry(|entry| !options.is_excluded(entry)) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    warn!("Skipping unreadable entry: {}", err);
                    continue;
                }
            };

            let Ok(relative) = entry.path().strip_prefix(root) else {
                continue;
            };
            let components = relative
                .components()
                .map(|component| component.as_os_str().to_string_lossy().to_string())
                .collect::<Vec<_>>();

            if let Err(err) = tree.try_insert_path(&components, entry.file_type().is_dir()) {
                warn!("Failed to insert path: {}", err.path.display());
            }
        }

        debug!("Collected directory tree under {}", root.display());
        Ok(tree)
    }

    pub fn try_insert_path(
        &mut self,
        components: &[String],
        is_directory: bool,
    ) -> Result<(), CannotInsertIntoFileError> {
        let mut current = self;

        for (index, name) in components.iter().enumerate() {
            let FilesystemNode::Directory { children } = current else {
                return Err(CannotInsertIntoFileError {
                    path: components.iter().collect(),
                });
            };

            let is_last = index + 1 == components.len();
            current = children.entry(name.clone()).or_insert_with(|| {
                if is_last && !is_directory {
                    FilesystemNode::File
                } else {
                    FilesystemNode::root()
                }
            });
        }

        Ok(())
    }

    /// Renders the tree as treemap text headed by `root_name/`, without a trailing newline.
    pub fn render(&self, root_name: &str) -> String {
        let mut lines = vec![format!("{root_name}/")];
        if let FilesystemNode::Directory { children } = self {
            render_children(children, "", &mut lines);
        }
        lines.join("\n")
    }
}

fn render_children(
    children: &LinkedHashMap<String, FilesystemNode>,
    prefix: &str,
    lines: &mut Vec<String>,
) {
    let last = children.len().saturating_sub(1);

    for (index, (name, node)) in children.iter().enumerate() {
        let (connector, continuation) = if index == last {
            ("└── ", "    ")
        } else {
            ("├── ", "│   ")
        };

        match node {
            FilesystemNode::File => lines.push(format!("{prefix}{connector}{name}")),
            FilesystemNode::Directory { children } => {
                lines.push(format!("{prefix}{connector}{name}/"));
                render_children(children, &format!("{prefix}{continuation}"), lines);
            }
        }
    }
}

/// Name shown on the first rendered line: the last component of the resolved path,
/// or empty for a filesystem root so the header reads `/`.
pub fn root_display_name(root: &Path) -> Result<String, RenderError> {
    let resolved = root.canonicalize().context(ResolveSnafu {
        path: root.to_path_buf(),
    })?;
    Ok(resolved
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_default())
}

#[derive(Debug, Snafu)]
pub enum RenderError {
    #[snafu(display("Directory '{}' does not exist", path.display()))]
    MissingDirectoryError { path: PathBuf },
    #[snafu(display("'{}' is not a directory", path.best_effort_path_display()))]
    NotADirectoryError { path: PathBuf },
    #[snafu(display("Failed to resolve {}", path.best_effort_path_display()))]
    ResolveError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display("Failed to write the tree to {}", path.best_effort_path_display()))]
    #[snafu(visibility(pub))]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
}

#[derive(Debug, Snafu)]
#[snafu(display("Cannot insert a node below a file"))]
pub struct CannotInsertIntoFileError {
    path: PathBuf,
}
