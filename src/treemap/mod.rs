//! Treemap documents: turning tree-drawing text into real directories and files.
//!
//! Parsing is deliberately lossy. Only one level of nesting is recognised,
//! and only a handful of leading glyphs count as indentation; see
//! [`parse_treemap`] for the exact rules.

mod input;
mod materializer;
mod parser;

pub use input::{InputError, InputSource};
pub use materializer::{
    MaterializeError, MaterializeReport, Materializer, OverwritePolicy, Progress,
};
pub use parser::{TreeEntry, parse_treemap};
