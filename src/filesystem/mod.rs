//! In-memory directory trees and their rendering as treemap text.
//!
//! This is the inverse of [`crate::treemap`]: a real directory is walked
//! into a [`FilesystemNode`] and printed with box-drawing connectors.

mod tree;

pub use tree::{FilesystemNode, RenderError, RenderOptions, WriteSnafu, root_display_name};
