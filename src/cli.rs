//! Command-line interface implementation for copyplate.
//! Provides argument parsing and help text formatting using clap.

use clap::{error::ErrorKind, CommandFactory, Parser};
use std::path::PathBuf;

use crate::expander::LineEnding;

/// Command-line arguments structure for copyplate.
#[derive(Parser, Debug)]
#[command(author, version, about = "copyplate: copy a template tree, filling in variables", long_about = None)]
pub struct Args {
    /// Path to the template directory
    #[arg(value_name = "TEMPLATE")]
    pub template: PathBuf,

    /// Directory where the generated files will be written
    #[arg(value_name = "OUTPUT_DIR")]
    pub output_dir: PathBuf,

    /// JSON or YAML file with variable values
    #[arg(short, long, value_name = "FILE")]
    pub data: Option<PathBuf>,

    /// Set a variable; overrides values from --data.
    /// Values that parse as JSON scalars (true, 3, null) keep their type.
    #[arg(short, long = "set", value_name = "KEY=VALUE")]
    pub set: Vec<String>,

    /// Write into the output directory even if it already exists
    #[arg(short, long)]
    pub force: bool,

    /// Line terminator for text files: native, lf or crlf
    #[arg(long, value_name = "STYLE", default_value_t = LineEnding::Native)]
    pub line_ending: LineEnding,

    /// Fail when two template files render to the same output path
    #[arg(long)]
    pub fail_on_collision: bool,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,
}

/// Parses command line arguments and returns the Args structure.
///
/// Missing positional arguments print the full help instead of clap's
/// one-line usage error.
///
/// # Returns
/// * `Args` - Parsed command line arguments
///
/// # Exits
/// * With status code 1 if required arguments are missing
/// * With clap's default error handling for other argument errors
pub fn get_args() -> Args {
    match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            if e.kind() == ErrorKind::MissingRequiredArgument {
                let _ = Args::command()
                    .help_template(
                        r#"{about-section}
{usage-heading} {usage}

{all-args}
{after-help}
"#,
                    )
                    .print_help();
                std::process::exit(1);
            } else {
                e.exit();
            }
        }
    }
}
