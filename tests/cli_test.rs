//! Integration tests for the packrig binary.
// The cargo_bin function is marked deprecated in favor of cargo_bin! macro,
// but both work correctly. Suppressing until assert_cmd stabilizes the new API.
#![allow(deprecated)]

use assert_cmd::cargo::cargo_bin;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn setup_project(target: &str) -> TempDir {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("packrig.yml"), target).unwrap();
    temp
}

const SIMPLE_TARGET: &str = r#"
entry:
  app: ./src/main.js
public_path: /static/
"#;

fn packrig() -> Command {
    let mut cmd = Command::new(cargo_bin("packrig"));
    cmd.env_remove("PACKRIG_PRODUCTION");
    cmd
}

#[test]
fn cli_no_args_shows_config() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_project(SIMPLE_TARGET);
    let mut cmd = packrig();
    cmd.current_dir(temp.path());
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\"publicPath\": \"/static/\""));
    Ok(())
}

#[test]
fn cli_shows_help() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = packrig();
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("bundler configuration"));
    Ok(())
}

#[test]
fn cli_shows_version() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = packrig();
    cmd.arg("--version");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
    Ok(())
}

#[test]
fn cli_missing_target_exits_two() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    let mut cmd = packrig();
    cmd.current_dir(temp.path());
    cmd.assert()
        .code(2)
        .stderr(predicate::str::contains("No build target found"));
    Ok(())
}

#[test]
fn cli_invalid_target_exits_one() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_project("public_path: /\n");
    let mut cmd = packrig();
    cmd.current_dir(temp.path());
    cmd.assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid build target"));
    Ok(())
}

#[test]
fn cli_project_flag() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_project(SIMPLE_TARGET);
    let mut cmd = packrig();
    cmd.args(["show", "--project"]).arg(temp.path());
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("./src/main.js"));
    Ok(())
}

#[test]
fn cli_target_flag() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    let target = temp.path().join("web.yml");
    fs::write(&target, "entry:\n  web: ./web.js\n")?;

    let mut cmd = packrig();
    cmd.current_dir(temp.path()).arg("--target").arg(&target);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("./web.js"));
    Ok(())
}

#[test]
fn cli_show_yaml() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_project(SIMPLE_TARGET);
    let mut cmd = packrig();
    cmd.current_dir(temp.path()).args(["show", "--format", "yaml"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("publicPath: /static/"));
    Ok(())
}

#[test]
fn cli_production_env() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_project(SIMPLE_TARGET);
    let mut cmd = packrig();
    cmd.current_dir(temp.path())
        .env("PACKRIG_PRODUCTION", "true")
        .arg("show");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("UglifyJsPlugin"))
        .stdout(predicate::str::contains("devtool").not());
    Ok(())
}

#[test]
fn cli_list() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_project(SIMPLE_TARGET);
    let mut cmd = packrig();
    cmd.current_dir(temp.path()).arg("list");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Loaders:"))
        .stdout(predicate::str::contains("Plugins:"))
        .stdout(predicate::str::contains("babel-loader"));
    Ok(())
}

#[test]
fn cli_schema() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = packrig();
    cmd.arg("schema");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\"public_path\""));
    Ok(())
}

#[test]
fn cli_completions_bash() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = packrig();
    cmd.args(["completions", "bash"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("packrig"));
    Ok(())
}
