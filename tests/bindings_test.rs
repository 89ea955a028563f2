use copyplate::bindings::{get_bindings, load_bindings_file, parse_bindings, Bindings, Value};
use copyplate::error::Error;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_parse_json_bindings() {
    let bindings = parse_bindings(r#"{"name": "demo", "port": 8080, "ssl": false, "owner": null}"#)
        .unwrap();

    assert_eq!(bindings.get("name"), Some(&Value::from("demo")));
    assert_eq!(bindings.render("port"), "8080");
    assert_eq!(bindings.render("ssl"), "false");
    assert_eq!(bindings.get("owner"), Some(&Value::Null));
    assert_eq!(bindings.render("owner"), "");
}

#[test]
fn test_parse_yaml_bindings() {
    let bindings = parse_bindings("name: demo\nversion: 1.5\nprivate: true\n").unwrap();

    assert_eq!(bindings.len(), 3);
    assert_eq!(bindings.render("name"), "demo");
    assert_eq!(bindings.render("version"), "1.5");
    assert_eq!(bindings.render("private"), "true");
}

#[test]
fn test_parse_empty_bindings() {
    assert!(parse_bindings("").unwrap().is_empty());
    assert!(parse_bindings("  \n").unwrap().is_empty());
}

#[test]
fn test_nested_values_are_rejected() {
    let result = parse_bindings(r#"{"list": [1, 2]}"#);
    assert!(matches!(result, Err(Error::BindingsError(_))));
}

#[test]
fn test_load_bindings_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("answers.json");
    fs::write(&path, r#"{"project": "copyplate"}"#).unwrap();

    let bindings = load_bindings_file(&path).unwrap();
    assert_eq!(bindings.render("project"), "copyplate");

    let missing = load_bindings_file(temp_dir.path().join("nope.json"));
    assert!(matches!(missing, Err(Error::BindingsError(_))));
}

#[test]
fn test_extend_overrides() {
    let mut base: Bindings = [("name", "a"), ("kind", "lib")].into_iter().collect();
    let overrides: Bindings = [("name", "b")].into_iter().collect();
    base.extend(overrides);

    assert_eq!(base.render("name"), "b");
    assert_eq!(base.render("kind"), "lib");
    let keys: Vec<&String> = base.iter().map(|(k, _)| k).collect();
    assert_eq!(keys, vec!["name", "kind"]);
}

#[test]
fn test_get_bindings_assignments_override_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("answers.yml");
    fs::write(&path, "name: from-file\nkind: lib\nport: 80\n").unwrap();

    let bindings = get_bindings(Some(path.as_path()), &["name=from-cli", "port=8080", "extra=yes"]).unwrap();

    assert_eq!(bindings.render("name"), "from-cli");
    assert_eq!(bindings.render("kind"), "lib");
    assert_eq!(bindings.get("port"), Some(&Value::from(8080i64)));
    assert_eq!(bindings.render("extra"), "yes");
}

#[test]
fn test_get_bindings_later_assignment_wins() {
    let bindings = get_bindings(None, &["name=first", "name=second"]).unwrap();
    assert_eq!(bindings.len(), 1);
    assert_eq!(bindings.render("name"), "second");
}

#[test]
fn test_get_bindings_errors() {
    let no_strings: [&str; 0] = [];
    assert!(get_bindings(None, &no_strings).unwrap().is_empty());
    assert!(matches!(get_bindings(None, &["broken"]), Err(Error::BindingsError(_))));

    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("missing.json");
    assert!(matches!(get_bindings(Some(missing.as_path()), &["a=b"]), Err(Error::BindingsError(_))));
}
