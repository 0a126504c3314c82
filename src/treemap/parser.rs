use derive_more::Display;
use tracing::debug;

/// Glyphs stripped from the start of every line before the name is read.
/// Whitespace is matched separately via `char::is_whitespace`.
const TREE_GLYPHS: &[char] = &[
    '│', '┃', '┆', '├', '└', '┌', '┐', '┤', '┴', '┬', '┼', '─', '━', '┄', '┈', '╌', '╍', '╎', '╏',
    '╭', '╮', '╯', '╰', '╱', '╲', '╳', '▕', '▏', '▎', '▍', '▌', '▋', '▊', '▉', '█', '▓', '▒', '░',
    '■', '□', '▪', '▫',
];

/// Leading characters that mark a line as nested under the current directory.
/// Deliberately narrower than `TREE_GLYPHS`: tabs, `┌`, `┤` and friends do not count.
const INDENT_MARKERS: [char; 4] = [' ', '├', '└', '│'];

/// A single node recovered from a treemap document.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
#[display("{}{}", path, if *is_directory { "/" } else { "" })]
pub struct TreeEntry {
    /// Relative, slash-joined path.
    pub path: String,
    pub is_directory: bool,
}

impl TreeEntry {
    pub fn directory(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            is_directory: true,
        }
    }

    pub fn file(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            is_directory: false,
        }
    }
}

/// State carried across lines of a single parse.
///
/// Only one top-level directory is tracked at a time. There is no directory
/// stack, so anything nested deeper than one level is flattened under the
/// most recent top-level directory.
#[derive(Debug, Default)]
struct ParseContext {
    current_top_level_directory: Option<String>,
}

impl ParseContext {
    fn classify(&mut self, line: &str) -> Option<TreeEntry> {
        if line.trim().is_empty() {
            return None;
        }

        let name = strip_tree_glyphs(line).trim();
        if name.is_empty() {
            debug!("Dropping line without a name: {:?}", line);
            return None;
        }

        let is_indented = line.starts_with(INDENT_MARKERS);
        let is_directory = name.ends_with('/');
        let name = name.trim_end_matches('/');

        let entry = if is_directory && !is_indented {
            // A bare `/` names no directory, so nothing can nest under it.
            self.current_top_level_directory =
                Some(name.to_string()).filter(|name| !name.is_empty());
            TreeEntry::directory(name)
        } else if let (true, Some(current)) = (is_indented, &self.current_top_level_directory) {
            TreeEntry {
                path: format!("{current}/{name}"),
                is_directory,
            }
        } else {
            TreeEntry {
                path: name.to_string(),
                is_directory,
            }
        };

        debug!("Classified {:?} as {} (indented: {})", line, entry, is_indented);
        Some(entry)
    }
}

fn strip_tree_glyphs(line: &str) -> &str {
    line.trim_start_matches(|c: char| c.is_whitespace() || TREE_GLYPHS.contains(&c))
}

/// Parses a treemap document into entries in document order.
///
/// Never fails: unrecognised lines are dropped or treated as top-level files.
pub fn parse_treemap(content: &str) -> Vec<TreeEntry> {
    let mut context = ParseContext::default();
    content
        .trim()
        .split('\n')
        .filter_map(|line| context.classify(line))
        .collect()
}
