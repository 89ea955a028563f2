//! copyplate's main application entry point.
//! Parses arguments, assembles variable bindings and runs the expansion.

use std::path::{Path, PathBuf};

use copyplate::{
    bindings::get_bindings,
    cli::{get_args, Args},
    error::{default_error_handler, Error, Result},
    expander::{CollisionPolicy, Expander},
};

#[tokio::main]
async fn main() {
    let args = get_args();

    env_logger::Builder::new()
        .filter_level(if args.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Warn
        })
        .init();

    if let Err(err) = run(args).await {
        default_error_handler(err);
    }
}

/// Ensures the output directory is safe to write to.
///
/// # Arguments
/// * `output_dir` - Target directory path for generated output
/// * `force` - Whether to write into an existing directory
///
/// # Returns
/// * `Result<PathBuf>` - Validated output directory path
///
/// # Errors
/// * `Error::OutputDirectoryExistsError` if the directory exists and force is false
pub fn get_output_dir<P: AsRef<Path>>(output_dir: P, force: bool) -> Result<PathBuf> {
    let output_dir = output_dir.as_ref();
    if output_dir.exists() && !force {
        return Err(Error::OutputDirectoryExistsError {
            output_dir: output_dir.display().to_string(),
        });
    }
    Ok(output_dir.to_path_buf())
}

async fn run(args: Args) -> Result<()> {
    let output_root = get_output_dir(&args.output_dir, args.force)?;
    let bindings = get_bindings(args.data.as_deref(), &args.set)?;
    let collision_policy = if args.fail_on_collision {
        CollisionPolicy::Error
    } else {
        CollisionPolicy::LastWriteWins
    };

    let mut created = 0usize;
    Expander::new(&args.template, &output_root)
        .bindings(bindings)
        .line_ending(args.line_ending)
        .on_collision(collision_policy)
        .run(|path| {
            created += 1;
            println!("Created: '{}'", output_root.join(path).display());
        })
        .await?;

    println!(
        "Template generation completed successfully: {created} file(s) in {}.",
        output_root.display()
    );
    Ok(())
}
