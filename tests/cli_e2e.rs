#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn changelog_cmd(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("changelog").unwrap();
    cmd.current_dir(dir).env_remove("CHANGELOG_LOG");
    cmd
}

fn project_with_version(version: &str) -> TempDir {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join("Cargo.toml"),
        format!("[package]\nname = \"demo\"\nversion = \"{}\"\n", version),
    )
    .unwrap();
    temp
}

fn read_changelog(dir: &Path) -> String {
    fs::read_to_string(dir.join("changelog.md")).unwrap()
}

const RELEASED: &str = "Changelog
=========

1.0.0 (2023-02-08)
------------------

* First release.
";

#[test]
fn test_init_uses_cargo_version() {
    let temp = project_with_version("1.2.0");

    changelog_cmd(temp.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("changelog.md created"));

    assert_eq!(
        read_changelog(temp.path()),
        "Changelog\n=========\n\n1.2.0 (????-??-??)\n------------------\n\n* New project!\n"
    );
}

#[test]
fn test_init_refuses_to_overwrite() {
    let temp = project_with_version("1.2.0");
    fs::write(temp.path().join("changelog.md"), RELEASED).unwrap();

    changelog_cmd(temp.path())
        .arg("init")
        .assert()
        .failure()
        .stderr(predicate::str::starts_with("Error:"))
        .stderr(predicate::str::contains("already exists"));

    assert_eq!(read_changelog(temp.path()), RELEASED);
}

#[test]
fn test_init_without_manifest_starts_at_fallback() {
    let temp = TempDir::new().unwrap();

    changelog_cmd(temp.path()).arg("init").assert().success();

    assert!(read_changelog(temp.path()).contains("0.0.1 (????-??-??)"));
}

#[test]
fn test_add_to_unreleased_version() {
    let temp = project_with_version("0.1.0");
    changelog_cmd(temp.path()).arg("init").assert().success();

    changelog_cmd(temp.path())
        .args(["add", "Implemented", "the", "'list'", "command."])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 changelogs saved to changelog.md"))
        .stdout(predicate::str::contains("Creating new version").not());

    assert!(read_changelog(temp.path()).ends_with("* New project!\n* Implemented the 'list' command.\n"));
}

#[test]
fn test_add_after_release_creates_version() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("changelog.md"), RELEASED).unwrap();

    changelog_cmd(temp.path())
        .args(["add", "--minor", "-m", "A new feature."])
        .assert()
        .success()
        .stdout(predicate::str::contains("Creating new version: 1.1.0"))
        .stdout(predicate::str::contains("2 changelogs saved to changelog.md"));

    changelog_cmd(temp.path())
        .arg("list")
        .assert()
        .success()
        .stdout("1.1.0\n1.0.0\n");
}

#[test]
fn test_add_requires_message() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("changelog.md"), RELEASED).unwrap();

    changelog_cmd(temp.path())
        .arg("add")
        .assert()
        .failure()
        .stderr(predicate::str::contains("message"));

    assert_eq!(read_changelog(temp.path()), RELEASED);
}

#[test]
fn test_release_stamps_today() {
    let temp = project_with_version("0.3.0");
    changelog_cmd(temp.path()).arg("init").assert().success();

    changelog_cmd(temp.path())
        .args(["release", "--force"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Releasing 0.3.0"));

    let today = chrono::Utc::now().date_naive().format("%Y-%m-%d").to_string();
    assert!(read_changelog(temp.path()).contains(&format!("0.3.0 ({})", today)));
}

#[test]
fn test_release_twice_fails() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("changelog.md"), RELEASED).unwrap();

    changelog_cmd(temp.path())
        .arg("release")
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "previous version \"1.0.0\" already had a release date",
        ));
}

#[test]
fn test_show_and_list() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("changelog.md"), RELEASED).unwrap();
    changelog_cmd(temp.path())
        .args(["add", "Second release."])
        .assert()
        .success();

    changelog_cmd(temp.path())
        .arg("show")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("1.0.1 (????-??-??)"))
        .stdout(predicate::str::contains("First release.").not());

    changelog_cmd(temp.path())
        .args(["show", "1.0.0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("* First release."));

    changelog_cmd(temp.path())
        .args(["show", "--all"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Second release."))
        .stdout(predicate::str::contains("First release."));

    changelog_cmd(temp.path())
        .args(["show", "9.9.9"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "couldn't find version 9.9.9 in the changelog",
        ));

    let output = changelog_cmd(temp.path())
        .args(["--format", "json", "list"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let versions: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(versions[0]["version"], "1.0.1");
    assert!(versions[0]["date"].is_null());
    assert_eq!(versions[1]["date"], "2023-02-08");
}

#[test]
fn test_show_nowrap() {
    let temp = TempDir::new().unwrap();
    let long = "word ".repeat(30);
    let long = long.trim_end();
    fs::write(temp.path().join("changelog.md"), RELEASED).unwrap();
    changelog_cmd(temp.path())
        .args(["add", "-m", long])
        .assert()
        .success();

    changelog_cmd(temp.path())
        .args(["show", "--nowrap"])
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("* {}\n", long)));

    changelog_cmd(temp.path())
        .arg("show")
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("* {}\n", long)).not());
}

#[test]
fn test_format_rewraps_file() {
    let temp = TempDir::new().unwrap();
    let messy = "Changelog\n===\n\n1.0.0 (2023-02-08)\n---\n* A bullet that\n  was wrapped early.\n";
    fs::write(temp.path().join("changelog.md"), messy).unwrap();

    changelog_cmd(temp.path())
        .arg("format")
        .assert()
        .success()
        .stdout(predicate::str::contains("1 changelogs saved to changelog.md"));

    assert_eq!(
        read_changelog(temp.path()),
        "Changelog\n=========\n\n1.0.0 (2023-02-08)\n------------------\n\n* A bullet that was wrapped early.\n"
    );
}

#[test]
fn test_malformed_changelog_is_rejected() {
    let temp = TempDir::new().unwrap();
    let broken = "Changelog\n=========\n\n1.0.0 2023-02-08\n----------------\n";
    fs::write(temp.path().join("changelog.md"), broken).unwrap();

    changelog_cmd(temp.path())
        .arg("format")
        .assert()
        .failure()
        .stderr(predicate::str::contains("parse error on line 4"))
        .stderr(predicate::str::contains("1.0.0 (YYYY-MM-DD)"));

    assert_eq!(read_changelog(temp.path()), broken);
}

#[test]
fn test_missing_changelog() {
    let temp = TempDir::new().unwrap();

    changelog_cmd(temp.path())
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("changelog.md not found"));
}

#[test]
fn test_config_and_file_flag() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join("changelog-tool.toml"),
        "file_name = \"CHANGES.md\"\ndefault_bump = \"major\"\n",
    )
    .unwrap();
    fs::write(temp.path().join("CHANGES.md"), RELEASED).unwrap();

    changelog_cmd(temp.path())
        .args(["add", "Breaking."])
        .assert()
        .success()
        .stdout(predicate::str::contains("Creating new version: 2.0.0"))
        .stdout(predicate::str::contains("saved to CHANGES.md"));

    fs::write(temp.path().join("other.md"), RELEASED).unwrap();
    changelog_cmd(temp.path())
        .args(["--file", "other.md", "list"])
        .assert()
        .success()
        .stdout("1.0.0\n");
}

#[test]
fn test_dir_flag() {
    let temp = TempDir::new().unwrap();
    let project = temp.path().join("project");
    fs::create_dir(&project).unwrap();
    fs::write(project.join("changelog.md"), RELEASED).unwrap();

    changelog_cmd(temp.path())
        .args(["-C", project.to_str().unwrap(), "list"])
        .assert()
        .success()
        .stdout("1.0.0\n");
}
