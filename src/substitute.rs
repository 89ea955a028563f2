//! Delimiter based variable substitution.
//! A variable is written as `open + name + close`; every occurrence is
//! replaced by the string form of the bound value, or removed when unbound.

use crate::bindings::Bindings;
use regex::{bytes, Captures, Regex};
use std::borrow::Cow;

/// A compiled substitution for one open/close delimiter pair.
#[derive(Debug, Clone)]
pub struct Substitution {
    pattern: Regex,
    byte_pattern: bytes::Regex,
}

impl Substitution {
    /// Compiles a substitution for the given delimiters.
    ///
    /// Delimiters are matched literally and may span several characters.
    pub fn new(open: &str, close: &str) -> Self {
        let source = format!("{}(.*?){}", regex::escape(open), regex::escape(close));
        // Escaped literals around a lazy group always form a valid pattern.
        let pattern = Regex::new(&source).unwrap_or_else(|e| unreachable!("{e}"));
        // Any byte but a newline may sit between the delimiters of a raw line.
        let byte_source =
            format!("{}((?-u:.)*?){}", regex::escape(open), regex::escape(close));
        let byte_pattern =
            bytes::Regex::new(&byte_source).unwrap_or_else(|e| unreachable!("{e}"));
        Self { pattern, byte_pattern }
    }

    /// Replaces every non-overlapping variable in `input`.
    ///
    /// Substituted values are not rescanned. Borrows `input` when it holds no
    /// variable.
    pub fn apply<'a>(&self, input: &'a str, bindings: &Bindings) -> Cow<'a, str> {
        self.pattern
            .replace_all(input, |caps: &Captures| bindings.render(&caps[1]).into_owned())
    }

    /// Byte form of [`Substitution::apply`] for content that need not be UTF-8.
    ///
    /// Bytes outside variables are kept as they are. A variable name that is
    /// not valid UTF-8 cannot be bound and renders empty.
    pub fn apply_bytes<'a>(&self, input: &'a [u8], bindings: &Bindings) -> Cow<'a, [u8]> {
        self.byte_pattern.replace_all(input, |caps: &bytes::Captures| {
            std::str::from_utf8(&caps[1])
                .map(|key| bindings.render(key).into_owned().into_bytes())
                .unwrap_or_default()
        })
    }
}

/// One-shot substitution of `open + name + close` variables in `input`.
///
/// # Example
/// ```
/// use copyplate::bindings::Bindings;
/// use copyplate::substitute::replace_vars;
///
/// let bindings: Bindings = [("name", "World")].into_iter().collect();
/// assert_eq!(replace_vars("Hello __name__", &bindings, "__", "__"), "Hello World");
/// ```
pub fn replace_vars(input: &str, bindings: &Bindings, open: &str, close: &str) -> String {
    Substitution::new(open, close).apply(input, bindings).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bindings::Value;

    fn bindings() -> Bindings {
        [
            ("name", Value::from("World")),
            ("count", Value::from(3i64)),
            ("flag", Value::from(false)),
            ("nothing", Value::Null),
            ("nested", Value::from("__name__")),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_replaces_all_occurrences() {
        let sub = Substitution::new("__", "__");
        assert_eq!(sub.apply("__name__ and __name__", &bindings()), "World and World");
        assert_eq!(sub.apply("n=__count__ f=__flag__", &bindings()), "n=3 f=false");
    }

    #[test]
    fn test_missing_and_null_render_empty() {
        let sub = Substitution::new("__", "__");
        assert_eq!(sub.apply("Value: __missing__", &bindings()), "Value: ");
        assert_eq!(sub.apply("Value: __nothing__", &bindings()), "Value: ");
    }

    #[test]
    fn test_is_not_recursive() {
        let sub = Substitution::new("__", "__");
        assert_eq!(sub.apply("__nested__", &bindings()), "__name__");
    }

    #[test]
    fn test_is_non_greedy() {
        let sub = Substitution::new("@", "@");
        assert_eq!(sub.apply("@name@-@count@.txt", &bindings()), "World-3.txt");
    }

    #[test]
    fn test_delimiters_are_literal() {
        let sub = Substitution::new("{{.", ".}}");
        assert_eq!(sub.apply("{{.name.}} {{xname.}}", &bindings()), "World {{xname.}}");
        let sub = Substitution::new("$(", ")");
        assert_eq!(sub.apply("echo $(name)", &bindings()), "echo World");
    }

    #[test]
    fn test_unterminated_variable_is_left_alone() {
        assert_eq!(replace_vars("tail __name", &bindings(), "__", "__"), "tail __name");
    }

    #[test]
    fn test_apply_bytes_keeps_non_utf8_text() {
        let sub = Substitution::new("__", "__");
        assert_eq!(
            sub.apply_bytes(b"caf\xe9 __name__ \xff", &bindings()),
            &b"caf\xe9 World \xff"[..]
        );
        assert_eq!(sub.apply_bytes(b"[__\xe9__]", &bindings()), &b"[]"[..]);
        assert_eq!(sub.apply_bytes(b"__nested__", &bindings()), &b"__name__"[..]);
    }

    #[test]
    fn test_without_variables_borrows() {
        let sub = Substitution::new("__", "__");
        assert!(matches!(sub.apply("plain line", &bindings()), Cow::Borrowed(_)));
    }
}
