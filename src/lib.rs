//! copyplate copies a template directory tree to a destination, substituting
//! named variables in file and directory names and in the contents of text
//! files. Binary files are copied verbatim.

/// Content-based binary file detection
pub mod binary;

/// Variable bindings and their loading from files and `KEY=VALUE` pairs
pub mod bindings;

/// Command-line interface module for the copyplate binary
pub mod cli;

/// Fixed delimiters and markers
pub mod constants;

/// Error types and handling for copyplate
pub mod error;

/// Template expansion orchestration
/// Walks the template root and writes the translated tree
pub mod expander;

/// Translation of template-relative paths into output paths
pub mod processor;

/// Delimiter based variable substitution
pub mod substitute;

pub use bindings::{Bindings, Value};
pub use error::{Error, Result};
pub use expander::{expand, expand_blocking, CollisionPolicy, Expander, LineEnding};
