use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn guard_cmd() -> Command {
    Command::cargo_bin("mcp-fs-guard").unwrap()
}

/// Test CLI help output
#[test]
fn test_cli_help() {
    let assert = guard_cmd().arg("--help").assert();

    assert.success().stdout(predicate::str::contains("Usage"));
}

/// Test CLI version output
#[test]
fn test_cli_version() {
    let assert = guard_cmd().arg("--version").assert();

    assert.success();
}

/// Test at least one directory argument is required
#[test]
fn test_requires_directory_argument() {
    let assert = guard_cmd().assert();

    assert.failure().stderr(predicate::str::contains("Usage"));
}

/// Test a missing directory is rejected at startup
#[test]
fn test_rejects_missing_directory() {
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("not_here");

    let assert = guard_cmd()
        .arg(&missing)
        .arg("--config")
        .arg(temp_dir.path().join("config.json"))
        .assert();

    assert
        .failure()
        .stderr(predicate::str::contains("does not exist"));
}

/// Test a plain file is rejected as a boot directory
#[test]
fn test_rejects_file_as_directory() {
    let temp_dir = TempDir::new().unwrap();
    let file_path = temp_dir.path().join("file.txt");
    std::fs::write(&file_path, "content").unwrap();

    let assert = guard_cmd()
        .arg(&file_path)
        .arg("--config")
        .arg(temp_dir.path().join("config.json"))
        .assert();

    assert
        .failure()
        .stderr(predicate::str::contains("Not a directory"));
}

/// Test the effective allow-list is printed when no checks are requested
#[test]
fn test_prints_allowed_directories() {
    let temp_dir = TempDir::new().unwrap();
    let allowed = temp_dir.path().join("allowed");
    std::fs::create_dir(&allowed).unwrap();
    let canonical = allowed.canonicalize().unwrap();

    let assert = guard_cmd()
        .arg(&allowed)
        .arg("--config")
        .arg(temp_dir.path().join("config.json"))
        .assert();

    assert
        .success()
        .stdout(predicate::str::contains("Allowed directories:"))
        .stdout(predicate::str::contains(canonical.to_str().unwrap()));
}

/// Test startup persists the allow-list to the configuration file
#[test]
fn test_seeds_config_file() {
    let temp_dir = TempDir::new().unwrap();
    let allowed = temp_dir.path().join("allowed");
    std::fs::create_dir(&allowed).unwrap();
    let config_path = temp_dir.path().join("config.json");

    guard_cmd()
        .arg(&allowed)
        .arg("--config")
        .arg(&config_path)
        .assert()
        .success();

    let raw = std::fs::read_to_string(&config_path).unwrap();
    let config: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let canonical = allowed.canonicalize().unwrap();
    assert_eq!(
        config["allowedDirectories"],
        serde_json::json!([canonical.to_str().unwrap()])
    );
}

/// Test a check inside the allow-list passes
#[test]
fn test_check_accepts_inside_path() {
    let temp_dir = TempDir::new().unwrap();
    let allowed = temp_dir.path().join("allowed");
    std::fs::create_dir(&allowed).unwrap();
    std::fs::write(allowed.join("notes.txt"), "hi").unwrap();

    let assert = guard_cmd()
        .arg(&allowed)
        .arg("--config")
        .arg(temp_dir.path().join("config.json"))
        .arg("--check")
        .arg(allowed.join("notes.txt"))
        .assert();

    assert.success().stdout(predicate::str::contains("ok: "));
}

/// Test a check outside the allow-list is denied with a non-zero exit
#[test]
fn test_check_denies_outside_path() {
    let temp_dir = TempDir::new().unwrap();
    let allowed = temp_dir.path().join("allowed");
    let outside = temp_dir.path().join("outside");
    std::fs::create_dir(&allowed).unwrap();
    std::fs::create_dir(&outside).unwrap();
    std::fs::write(outside.join("secret.txt"), "s").unwrap();

    let assert = guard_cmd()
        .arg(&allowed)
        .arg("--config")
        .arg(temp_dir.path().join("config.json"))
        .arg("--check")
        .arg(outside.join("secret.txt"))
        .assert();

    assert
        .failure()
        .stdout(predicate::str::contains("denied:"))
        .stdout(predicate::str::contains("Access denied"));
}

/// Test a check with a missing parent reports the parent
#[test]
fn test_check_reports_missing_parent() {
    let temp_dir = TempDir::new().unwrap();
    let allowed = temp_dir.path().join("allowed");
    std::fs::create_dir(&allowed).unwrap();

    let assert = guard_cmd()
        .arg(&allowed)
        .arg("--config")
        .arg(temp_dir.path().join("config.json"))
        .arg("--check")
        .arg(allowed.join("no/such/file.txt"))
        .assert();

    assert
        .failure()
        .stdout(predicate::str::contains("not-found:"))
        .stdout(predicate::str::contains("Parent directory does not exist"))
        .stdout(predicate::str::contains("denied:").not());
}

/// Test fields owned by other tools survive an allow-list update
#[test]
fn test_preserves_foreign_config_fields() {
    let temp_dir = TempDir::new().unwrap();
    let allowed = temp_dir.path().join("allowed");
    std::fs::create_dir(&allowed).unwrap();
    let config_path = temp_dir.path().join("config.json");
    std::fs::write(
        &config_path,
        r#"{ "mcpServers": { "time": { "command": "mcp-server-time" } }, "theme": "dark" }"#,
    )
    .unwrap();

    guard_cmd()
        .arg(&allowed)
        .arg("--config")
        .arg(&config_path)
        .assert()
        .success();

    let raw = std::fs::read_to_string(&config_path).unwrap();
    let config: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(config["theme"], "dark");
    assert_eq!(config["mcpServers"]["time"]["command"], "mcp-server-time");
    assert!(config["allowedDirectories"].is_array());
}
