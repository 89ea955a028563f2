//! Template expansion: walks the template root and writes every file to the
//! output root with translated names and, for text files, translated content.
//!
//! The walk runs on a blocking thread and streams discovered files to a
//! coordinator, which spawns one task per file into a single [`JoinSet`].
//! The coordinator is the only place that calls the file callback, so the
//! first error it sees is returned and nothing is reported after it.

use crate::binary::is_binary_file;
use crate::bindings::Bindings;
use crate::constants::{CONTENT_CLOSE, CONTENT_OPEN};
use crate::error::{Error, Result};
use crate::processor::{
    normalize_translated_path, relative_template_path, resolve_target_path, PathTranslator,
};
use crate::substitute::Substitution;
use log::{debug, warn};
use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, BufWriter};
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use walkdir::WalkDir;

/// Line terminator appended to every line of a text file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LineEnding {
    /// `\r\n` on Windows, `\n` elsewhere
    #[default]
    Native,
    Lf,
    CrLf,
}

impl LineEnding {
    pub fn as_str(&self) -> &'static str {
        match self {
            LineEnding::Native if cfg!(windows) => "\r\n",
            LineEnding::Native | LineEnding::Lf => "\n",
            LineEnding::CrLf => "\r\n",
        }
    }
}

impl FromStr for LineEnding {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "native" => Ok(LineEnding::Native),
            "lf" => Ok(LineEnding::Lf),
            "crlf" => Ok(LineEnding::CrLf),
            other => Err(format!("unknown line ending '{other}' (expected native, lf or crlf)")),
        }
    }
}

impl fmt::Display for LineEnding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineEnding::Native => f.write_str("native"),
            LineEnding::Lf => f.write_str("lf"),
            LineEnding::CrLf => f.write_str("crlf"),
        }
    }
}

/// What to do when two template files translate to the same output path.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CollisionPolicy {
    /// Log a warning; whichever file finishes last is kept
    #[default]
    LastWriteWins,
    /// Fail the run with `Error::PathCollisionError`
    Error,
}

/// Outcome of one unit of work in a run.
enum Completed {
    Walk,
    File(String),
}

/// State shared by every file task of a run.
struct FileContext {
    bindings: Bindings,
    content: Substitution,
    terminator: &'static str,
}

/// Configured expansion of one template root into one output root.
///
/// # Example
/// ```no_run
/// use copyplate::bindings::Bindings;
/// use copyplate::expander::{Expander, LineEnding};
///
/// # async fn demo() -> copyplate::error::Result<()> {
/// let bindings: Bindings = [("name", "demo")].into_iter().collect();
/// Expander::new("templates/app", "out/demo")
///     .bindings(bindings)
///     .line_ending(LineEnding::Lf)
///     .run(|path| println!("created {}", path.display()))
///     .await
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Expander {
    template_root: PathBuf,
    output_root: PathBuf,
    bindings: Bindings,
    line_ending: LineEnding,
    collision_policy: CollisionPolicy,
}

impl Expander {
    pub fn new<P: AsRef<Path>, Q: AsRef<Path>>(template_root: P, output_root: Q) -> Self {
        Self {
            template_root: template_root.as_ref().to_path_buf(),
            output_root: output_root.as_ref().to_path_buf(),
            bindings: Bindings::new(),
            line_ending: LineEnding::default(),
            collision_policy: CollisionPolicy::default(),
        }
    }

    pub fn bindings(mut self, bindings: Bindings) -> Self {
        self.bindings = bindings;
        self
    }

    pub fn line_ending(mut self, line_ending: LineEnding) -> Self {
        self.line_ending = line_ending;
        self
    }

    pub fn on_collision(mut self, policy: CollisionPolicy) -> Self {
        self.collision_policy = policy;
        self
    }

    /// Runs the expansion.
    ///
    /// `on_file` receives each written file's path relative to the output
    /// root once its content is flushed. Files are reported in completion
    /// order. The returned result is the final outcome of the run: `Ok(())`
    /// once every file is written, or the first error encountered, after
    /// which `on_file` is not called again and outstanding tasks are aborted.
    ///
    /// # Errors
    /// * `Error::TemplateDoesNotExistError` if the template root is missing
    /// * `Error::IoError` if the template root cannot be resolved otherwise
    /// * `Error::WalkError` if a directory entry cannot be read
    /// * `Error::CreateDirError`, `Error::InspectError`, `Error::CopyError`
    ///   for failures while writing a file
    /// * `Error::PathCollisionError` under `CollisionPolicy::Error`
    pub async fn run<F>(self, mut on_file: F) -> Result<()>
    where
        F: FnMut(&Path),
    {
        let template_root = resolve_template_root(&self.template_root).await?;
        debug!(
            "Expanding '{}' into '{}'",
            template_root.display(),
            self.output_root.display()
        );

        let translator = PathTranslator::new();
        let context = Arc::new(FileContext {
            bindings: self.bindings,
            content: Substitution::new(CONTENT_OPEN, CONTENT_CLOSE),
            terminator: self.line_ending.as_str(),
        });

        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut tasks: JoinSet<Result<Completed>> = JoinSet::new();
        let walk_root = template_root.clone();
        tasks.spawn_blocking(move || walk_template(&walk_root, tx));

        let mut targets = HashSet::new();
        loop {
            tokio::select! {
                biased;
                Some(source) = rx.recv() => {
                    let relative = relative_template_path(&template_root, &source)?;
                    let translated = translator.translate(&relative, &context.bindings);
                    let translated = normalize_translated_path(&translated).into_owned();
                    debug!("Processing source file: {relative} -> {translated}");

                    let target = resolve_target_path(&self.output_root, &translated);
                    if !targets.insert(target.clone()) {
                        match self.collision_policy {
                            CollisionPolicy::Error => {
                                return Err(Error::PathCollisionError { path: translated });
                            }
                            CollisionPolicy::LastWriteWins => {
                                warn!("More than one template file renders to '{translated}'");
                            }
                        }
                    }

                    tasks.spawn(process_file(Arc::clone(&context), source, target, translated));
                }
                Some(joined) = tasks.join_next() => match joined?? {
                    Completed::File(path) => on_file(Path::new(&path)),
                    Completed::Walk => debug!("Template walk finished"),
                },
                else => break,
            }
        }

        debug!("Expansion of '{}' completed", template_root.display());
        Ok(())
    }
}

/// Expands `template_dir` into `output_dir` with default options.
pub async fn expand<P, Q, F>(
    template_dir: P,
    output_dir: Q,
    bindings: Bindings,
    on_file: F,
) -> Result<()>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
    F: FnMut(&Path),
{
    Expander::new(template_dir, output_dir).bindings(bindings).run(on_file).await
}

/// Blocking form of [`expand`] for callers without a runtime.
pub fn expand_blocking<P, Q, F>(
    template_dir: P,
    output_dir: Q,
    bindings: Bindings,
    on_file: F,
) -> Result<()>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
    F: FnMut(&Path),
{
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(expand(template_dir, output_dir, bindings, on_file))
}

async fn resolve_template_root(template_root: &Path) -> Result<PathBuf> {
    let missing = || Error::TemplateDoesNotExistError {
        template_dir: template_root.display().to_string(),
    };
    let resolve_error = |e: std::io::Error| match e.kind() {
        std::io::ErrorKind::NotFound => missing(),
        _ => Error::IoError(e),
    };
    let resolved = tokio::fs::canonicalize(template_root).await.map_err(resolve_error)?;
    let metadata = tokio::fs::metadata(&resolved).await.map_err(resolve_error)?;
    if !metadata.is_dir() {
        return Err(missing());
    }
    Ok(resolved)
}

/// Sends every regular file under `template_root` as it is discovered.
///
/// Stops early without error once the receiving side has gone away.
fn walk_template(template_root: &Path, tx: mpsc::UnboundedSender<PathBuf>) -> Result<Completed> {
    for entry in WalkDir::new(template_root) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        if tx.send(entry.into_path()).is_err() {
            break;
        }
    }
    Ok(Completed::Walk)
}

async fn process_file(
    context: Arc<FileContext>,
    source: PathBuf,
    target: PathBuf,
    translated: String,
) -> Result<Completed> {
    if let Some(parent) = target.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|source| Error::CreateDirError { path: parent.to_path_buf(), source })?;
    }

    let binary = is_binary_file(&source)
        .await
        .map_err(|e| Error::InspectError { path: source.clone(), source: e })?;

    if binary {
        debug!("Copying file: {}", target.display());
        copy_binary(&source, &target).await?;
    } else {
        debug!("Writing file: {}", target.display());
        copy_text(&context, &source, &target).await?;
    }

    Ok(Completed::File(translated))
}

fn copy_error(path: &Path) -> impl FnOnce(std::io::Error) -> Error {
    let path = path.to_path_buf();
    move |source| Error::CopyError { path, source }
}

async fn copy_binary(source: &Path, target: &Path) -> Result<()> {
    let mut reader = File::open(source).await.map_err(copy_error(source))?;
    let mut writer = File::create(target).await.map_err(copy_error(target))?;
    tokio::io::copy(&mut reader, &mut writer).await.map_err(copy_error(target))?;
    writer.flush().await.map_err(copy_error(target))
}

async fn copy_text(context: &FileContext, source: &Path, target: &Path) -> Result<()> {
    let reader = File::open(source).await.map_err(copy_error(source))?;
    let writer = File::create(target).await.map_err(copy_error(target))?;
    let mut reader = BufReader::new(reader);
    let mut writer = BufWriter::new(writer);

    // Lines are handled as raw bytes so text that is not UTF-8 still copies.
    let mut line = Vec::new();
    loop {
        line.clear();
        let read = reader.read_until(b'\n', &mut line).await.map_err(copy_error(source))?;
        if read == 0 {
            break;
        }
        if line.last() == Some(&b'\n') {
            line.pop();
            if line.last() == Some(&b'\r') {
                line.pop();
            }
        }

        let rendered = context.content.apply_bytes(&line, &context.bindings);
        writer.write_all(&rendered).await.map_err(copy_error(target))?;
        writer
            .write_all(context.terminator.as_bytes())
            .await
            .map_err(copy_error(target))?;
    }
    writer.flush().await.map_err(copy_error(target))
}
