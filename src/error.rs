//! Error handling for copyplate.
//! Defines custom error types and results used throughout the application.

use std::path::PathBuf;
use thiserror::Error;

/// Custom error types for copyplate operations.
///
/// Every stage of an expansion run maps to one variant, so the first failure
/// reported to the caller says which stage failed and on which path.
#[derive(Error, Debug)]
pub enum Error {
    /// Represents errors that occur during file system operations
    #[error("IO error: {0}.")]
    IoError(#[from] std::io::Error),

    /// The directory walk could not read an entry
    #[error("Failed to walk the template directory: {0}.")]
    WalkError(#[from] walkdir::Error),

    #[error("Template directory '{template_dir}' does not exist or is not a directory.")]
    TemplateDoesNotExistError { template_dir: String },

    #[error("Failed to create directory '{}': {source}.", path.display())]
    CreateDirError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Binary classification could not read the file
    #[error("Failed to inspect '{}': {source}.", path.display())]
    InspectError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to copy '{}': {source}.", path.display())]
    CopyError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A template path is not valid UTF-8 or escapes the template root
    #[error("Invalid template path '{}'.", path.display())]
    InvalidPathError { path: PathBuf },

    /// Two template files translate to the same destination path
    #[error("More than one template file renders to '{path}'.")]
    PathCollisionError { path: String },

    #[error("Output directory '{output_dir}' already exists. Use --force to overwrite it.")]
    OutputDirectoryExistsError { output_dir: String },

    /// Represents errors while loading or parsing variable bindings
    #[error("Bindings error: {0}.")]
    BindingsError(String),

    /// A file task panicked or was cancelled
    #[error("File task failed: {0}.")]
    JoinError(#[from] tokio::task::JoinError),
}

/// Convenience type alias for Results with copyplate's Error as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Default error handler that prints the error and exits the program.
///
/// # Arguments
/// * `err` - The Error to handle
pub fn default_error_handler(err: Error) {
    eprintln!("{err}");
    std::process::exit(1);
}
