//! Common constants used throughout copyplate.

/// Opening delimiter for variables in file and directory names
pub const PATH_OPEN: &str = "@";

/// Closing delimiter for variables in file and directory names
pub const PATH_CLOSE: &str = "@";

/// Opening delimiter for variables inside text file contents
pub const CONTENT_OPEN: &str = "__";

/// Closing delimiter for variables inside text file contents
pub const CONTENT_CLOSE: &str = "__";

/// Leading marker of a template-relative path that becomes a literal dot
pub const HIDDEN_PREFIX: &str = "__";

/// Number of leading bytes inspected when classifying a file as binary
pub const BINARY_SAMPLE_LEN: usize = 512;
