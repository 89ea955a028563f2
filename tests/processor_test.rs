use std::path::PathBuf;

use copyplate::bindings::Bindings;
use copyplate::processor::{resolve_target_path, translate_hidden_prefix, PathTranslator};

#[test]
fn test_translate_hidden_prefix_only() {
    let translator = PathTranslator::new();
    assert_eq!(translator.translate("__config.json", &Bindings::new()), ".config.json");
    assert_eq!(translator.translate("__github/workflows/ci.yml", &Bindings::new()), ".github/workflows/ci.yml");
}

#[test]
fn test_translate_variables() {
    let translator = PathTranslator::new();
    let bindings: Bindings = [("name", "report"), ("pkg", "core")].into_iter().collect();

    assert_eq!(translator.translate("@name@.txt", &bindings), "report.txt");
    assert_eq!(translator.translate("src/@pkg@/@name@.rs", &bindings), "src/core/report.rs");
    assert_eq!(translator.translate("__@name@rc", &bindings), ".reportrc");
    assert_eq!(translator.translate("@missing@file", &bindings), "file");
}

#[test]
fn test_hidden_marker_inside_path_is_kept() {
    assert_eq!(translate_hidden_prefix("pkg/__init__.py"), "pkg/__init__.py");
}

#[test]
fn test_resolve_target_path() {
    assert_eq!(
        resolve_target_path("output", "src/main.rs"),
        PathBuf::from("output").join("src").join("main.rs")
    );
    assert_eq!(
        resolve_target_path("output", "empty//name.txt"),
        PathBuf::from("output").join("empty").join("name.txt")
    );
}
