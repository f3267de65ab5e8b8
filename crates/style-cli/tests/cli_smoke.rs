//! CLI smoke tests for style.
//!
//! These tests run the binary against a temporary project and check the
//! files and exit codes it produces.

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::TempDir;

/// Get a Command for the style binary.
fn style_cmd() -> Command {
    cargo_bin_cmd!("style")
}

/// A project with `js/` as the module base and stylesheets in `scss/`.
fn temp_project() -> TempDir {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    std::fs::create_dir_all(root.join("js")).unwrap();
    std::fs::create_dir_all(root.join("scss")).unwrap();
    std::fs::write(root.join("scss/_theme.scss"), "$ink: #222;\n").unwrap();
    std::fs::write(
        root.join("scss/main.scss"),
        "@import 'theme';\nbody { color: $ink; background: url(img/bg.png); }\n",
    )
    .unwrap();
    std::fs::write(root.join("scss/extra.scss"), ".extra { margin: 0; }\n").unwrap();
    std::fs::write(
        root.join("style.yml"),
        "style:\n  path: ../scss/\n  rootPath: https://cdn.example.com/site/\n",
    )
    .unwrap();
    temp
}

// =============================================================================
// Help & Version
// =============================================================================

#[test]
fn test_help() {
    style_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("build"))
        .stdout(predicate::str::contains("inject"));
}

// =============================================================================
// Build
// =============================================================================

#[test]
fn test_build_writes_bundle() {
    let temp = temp_project();
    let root = temp.path();
    let bundle = root.join("out/styles.js");

    style_cmd()
        .current_dir(root)
        .args(["build", "--config", "style.yml", "--base-dir", "js"])
        .arg("--output")
        .arg(&bundle)
        .args(["main.scss", "extra.scss"])
        .assert()
        .success();

    let content = std::fs::read_to_string(&bundle).unwrap();
    assert_eq!(content.matches("define(").count(), 2);
    assert!(content.contains("define('style!main.scss', ['style']"));
    assert!(content.contains("body{color:#222;background:url(https://cdn.example.com/site/img/bg.png)}"));
    assert!(content.contains("define('style!extra.scss', ['style']"));
}

#[test]
fn test_build_all_skips_partials() {
    let temp = temp_project();

    style_cmd()
        .current_dir(temp.path())
        .args([
            "build",
            "--config",
            "style.yml",
            "--base-dir",
            "js",
            "--all",
            "--plugin-name",
            "css",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("define('css!extra.scss'"))
        .stdout(predicate::str::contains("define('css!main.scss'"))
        .stdout(predicate::str::contains("_theme").not());
}

#[test]
fn test_build_without_root_path_fails() {
    let temp = temp_project();

    style_cmd()
        .current_dir(temp.path())
        .args(["build", "--base-dir", "js", "--path", "../scss/", "main.scss"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("rootPath"));
}

#[test]
fn test_build_reports_compile_errors() {
    let temp = temp_project();
    std::fs::write(temp.path().join("scss/broken.scss"), ".a { color: $nope; }\n").unwrap();

    style_cmd()
        .current_dir(temp.path())
        .args(["build", "--config", "style.yml", "--base-dir", "js", "broken.scss"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to build"));
}

// =============================================================================
// Inject
// =============================================================================

#[test]
fn test_inject_into_page() {
    let temp = temp_project();
    let root = temp.path();
    std::fs::write(
        root.join("index.html"),
        "<html><head><title>x</title></head><body></body></html>",
    )
    .unwrap();

    style_cmd()
        .current_dir(root)
        .args([
            "inject",
            "--config",
            "style.yml",
            "--base-dir",
            "js",
            "--html",
            "index.html",
            "main.scss",
            "main.scss",
        ])
        .assert()
        .success();

    let page = std::fs::read_to_string(root.join("index.html")).unwrap();
    assert_eq!(page.matches("<style>").count(), 2);
    assert!(page.find("<style>").unwrap() < page.find("</head>").unwrap());
    assert!(page.contains("color: #222;"));
}

#[test]
fn test_inject_prints_css_without_page() {
    let temp = temp_project();

    style_cmd()
        .current_dir(temp.path())
        .args(["inject", "--base-dir", "js", "--path", "../scss/", "extra.scss"])
        .assert()
        .success()
        .stdout(predicate::str::contains(".extra {"));
}

#[test]
fn test_inject_missing_stylesheet_fails() {
    let temp = temp_project();

    style_cmd()
        .current_dir(temp.path())
        .args(["inject", "--base-dir", "js", "--path", "../scss/", "nope.scss"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("nope.scss"));
}
