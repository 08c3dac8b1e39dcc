//! App scaffolding and registry tests

mod common;

use std::collections::HashMap;
use std::fs;

use recurl::app::{AppRegistry, YamlRegistry};
use tempfile::TempDir;

use common::{recurl_in, ExitStatus};

#[test]
fn test_init_creates_and_registers_app() {
    let dir = TempDir::new().unwrap();
    let home = dir.path().join("home");

    let r = recurl_in(dir.path(), &home, &HashMap::new(), &["init", "shop"]);
    assert_eq!(r.exit_status, ExitStatus::Success, "{}", r.stderr);
    assert!(r.contains("Initialised recurl app in"));

    let root = dir.path().join("shop");
    assert!(root.join(".recurl").is_file());
    assert!(root.join("endpoints").is_dir());
    assert!(fs::read_to_string(root.join("shop.default.yaml")).unwrap().contains("base_url"));

    let registry = YamlRegistry::new(home.join("registry.yaml"));
    assert_eq!(registry.lookup("shop").unwrap(), Some(root.canonicalize().unwrap()));
}

#[test]
fn test_init_with_path_then_list_local() {
    let dir = TempDir::new().unwrap();
    let home = dir.path().join("home");
    let target = dir.path().join("apps");
    fs::create_dir_all(&target).unwrap();

    let r = recurl_in(dir.path(), &home, &HashMap::new(), &["init", "blog", "--path", target.to_str().unwrap()]);
    assert_eq!(r.exit_status, ExitStatus::Success, "{}", r.stderr);
    assert!(target.join("blog").join(".recurl").is_file());

    let r = recurl_in(dir.path(), &home, &HashMap::new(), &["list-local"]);
    assert_eq!(r.exit_status, ExitStatus::Success);
    assert!(r.contains("blog"));
    assert!(r.contains("Created"));
}

#[test]
fn test_list_local_empty() {
    let dir = TempDir::new().unwrap();
    let r = recurl_in(dir.path(), &dir.path().join("home"), &HashMap::new(), &["list-local"]);
    assert_eq!(r.exit_status, ExitStatus::Success);
    assert!(r.contains("(no apps registered)"));
}

#[test]
fn test_run_registered_app_from_anywhere() {
    let dir = TempDir::new().unwrap();
    let home = dir.path().join("home");
    let env = HashMap::new();

    recurl_in(dir.path(), &home, &env, &["init", "shop"]);
    fs::write(
        dir.path().join("shop/endpoints/ping.yaml"),
        "endpoint:\n  path: /ping\n",
    )
    .unwrap();

    let elsewhere = dir.path().join("elsewhere");
    fs::create_dir_all(&elsewhere).unwrap();
    let r = recurl_in(&elsewhere, &home, &env, &["ping", "--app", "shop", "--dry-run"]);

    assert_eq!(r.exit_status, ExitStatus::Success, "{}", r.stderr);
    assert_eq!(r.stdout.trim_end(), "curl -sS -X GET https://example.com/ping");
}

#[test]
fn test_unregistered_app_is_error() {
    let dir = TempDir::new().unwrap();
    let r = recurl_in(dir.path(), &dir.path().join("home"), &HashMap::new(), &["ping", "--app", "ghost"]);
    assert_eq!(r.exit_status, ExitStatus::Error);
    assert!(r.stderr.contains("Unknown app: ghost"));
}
