//! Path translation from template-relative paths to destination paths.
//! Translation is pure: it never touches the file system.

use crate::bindings::Bindings;
use crate::constants::{HIDDEN_PREFIX, PATH_CLOSE, PATH_OPEN};
use crate::error::{Error, Result};
use crate::substitute::Substitution;
use std::borrow::Cow;
use std::path::{Component, Path, PathBuf};

/// Returns `file` relative to `template_root`, with `/` separators.
///
/// # Errors
/// * `Error::InvalidPathError` if `file` is outside `template_root` or a
///   component is not valid UTF-8
pub fn relative_template_path(template_root: &Path, file: &Path) -> Result<String> {
    let invalid = || Error::InvalidPathError { path: file.to_path_buf() };
    let relative = file.strip_prefix(template_root).map_err(|_| invalid())?;

    let mut parts = Vec::new();
    for component in relative.components() {
        match component {
            Component::Normal(part) => parts.push(part.to_str().ok_or_else(invalid)?),
            Component::CurDir => {}
            _ => return Err(invalid()),
        }
    }
    Ok(parts.join("/"))
}

/// Rewrites a leading hidden-prefix marker to a single dot.
///
/// Only the start of the whole relative path is considered, so
/// `__gitignore` becomes `.gitignore` while `src/__init__.py` is untouched.
pub fn translate_hidden_prefix(relative_path: &str) -> Cow<'_, str> {
    match relative_path.strip_prefix(HIDDEN_PREFIX) {
        Some(rest) => Cow::Owned(format!(".{rest}")),
        None => Cow::Borrowed(relative_path),
    }
}

/// Translates template-relative paths into destination-relative paths.
#[derive(Debug, Clone)]
pub struct PathTranslator {
    substitution: Substitution,
}

impl PathTranslator {
    pub fn new() -> Self {
        Self { substitution: Substitution::new(PATH_OPEN, PATH_CLOSE) }
    }

    /// Applies the hidden-prefix rewrite, then `@name@` substitution.
    pub fn translate(&self, relative_path: &str, bindings: &Bindings) -> String {
        let unhidden = translate_hidden_prefix(relative_path);
        self.substitution.apply(&unhidden, bindings).into_owned()
    }
}

impl Default for PathTranslator {
    fn default() -> Self {
        PathTranslator::new()
    }
}

/// Drops the empty segments a variable that renders empty leaves behind.
///
/// `@empty@/f.txt` translates to `/f.txt`, which names the same output file
/// as `f.txt`.
pub fn normalize_translated_path(translated: &str) -> Cow<'_, str> {
    if translated.split('/').any(str::is_empty) {
        let parts: Vec<&str> = translated.split('/').filter(|part| !part.is_empty()).collect();
        Cow::Owned(parts.join("/"))
    } else {
        Cow::Borrowed(translated)
    }
}

/// Joins a translated relative path onto the destination root.
pub fn resolve_target_path<P: AsRef<Path>>(output_root: P, translated: &str) -> PathBuf {
    translated
        .split('/')
        .filter(|part| !part.is_empty())
        .fold(output_root.as_ref().to_path_buf(), |path, part| path.join(part))
}
