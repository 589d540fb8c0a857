//! Integration tests for the `netroster` CLI binary.
//!
//! Every invocation runs against a throwaway config path and database, and
//! the scanner is replaced by `/bin/true` so no real sweep ever happens.
#![allow(clippy::unwrap_used)]
#![cfg(unix)]

use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::TempDir;

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `netroster` binary isolated in `dir`.
fn netroster_cmd(dir: &Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("netroster");
    cmd.env("HOME", dir)
        .env("XDG_CONFIG_HOME", dir.join("config"))
        .env("XDG_DATA_HOME", dir.join("data"))
        .env("NETROSTER_CONFIG", dir.join("config.toml"))
        .env("NETROSTER_SCAN__COMMAND", "/bin/true")
        .env("NETROSTER_STORE__PATH", dir.join("favorites.db"))
        .env_remove("NETROSTER_OUTPUT")
        .env_remove("NETROSTER_SCAN__INTERFACE")
        .env_remove("NETROSTER_SCAN__TIMEOUT_SECS")
        .env_remove("RUST_LOG");
    cmd
}

fn add_favorite(dir: &Path, mac: &str, name: &str) {
    netroster_cmd(dir)
        .args(["favorites", "add", mac, "--name", name])
        .assert()
        .success();
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let dir = TempDir::new().unwrap();
    let output = netroster_cmd(dir.path()).output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = format!(
        "{}{}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_lists_commands() {
    let dir = TempDir::new().unwrap();
    netroster_cmd(dir.path()).arg("--help").assert().success().stdout(
        predicate::str::contains("devices")
            .and(predicate::str::contains("favorites"))
            .and(predicate::str::contains("wake")),
    );
}

#[test]
fn test_version_flag() {
    let dir = TempDir::new().unwrap();
    netroster_cmd(dir.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("netroster"));
}

#[test]
fn test_completions_bash() {
    let dir = TempDir::new().unwrap();
    netroster_cmd(dir.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

// ── Config ──────────────────────────────────────────────────────────

#[test]
fn test_config_path_honors_flag() {
    let dir = TempDir::new().unwrap();
    netroster_cmd(dir.path())
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_config_show_merges_env() {
    let dir = TempDir::new().unwrap();
    netroster_cmd(dir.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("timeout_secs = 30")
                .and(predicate::str::contains("command = \"/bin/true\"")),
        );
}

#[test]
fn test_config_init_refuses_to_overwrite() {
    let dir = TempDir::new().unwrap();
    netroster_cmd(dir.path())
        .args(["config", "init"])
        .assert()
        .success();
    assert!(dir.path().join("config.toml").exists());

    netroster_cmd(dir.path())
        .args(["config", "init"])
        .assert()
        .code(6);
    netroster_cmd(dir.path())
        .args(["config", "init", "--force"])
        .assert()
        .success();
}

// ── Devices / scan ──────────────────────────────────────────────────

#[test]
fn test_watch_exposes_ttl_and_interval() {
    let dir = TempDir::new().unwrap();
    netroster_cmd(dir.path())
        .args(["devices", "watch", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--ttl").and(predicate::str::contains("--interval")));
}

#[test]
fn test_one_shot_list_has_no_cache_knobs() {
    let dir = TempDir::new().unwrap();
    netroster_cmd(dir.path())
        .args(["devices", "list", "--ttl", "10"])
        .assert()
        .code(2);
    netroster_cmd(dir.path())
        .args(["cache", "clear"])
        .assert()
        .code(2);
}

#[test]
fn test_scan_with_no_responders_is_empty() {
    let dir = TempDir::new().unwrap();
    netroster_cmd(dir.path())
        .args(["scan", "-o", "json"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("[]"));
}

#[test]
fn test_failing_scanner_is_not_an_error() {
    let dir = TempDir::new().unwrap();
    netroster_cmd(dir.path())
        .env("NETROSTER_SCAN__COMMAND", "/bin/false")
        .args(["devices", "list", "-o", "json"])
        .assert()
        .success();
}

#[test]
fn test_unknown_device_is_not_found() {
    let dir = TempDir::new().unwrap();
    netroster_cmd(dir.path())
        .args(["devices", "get", "aa:bb:cc:dd:ee:ff"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("not found"));
}

// ── Favorites ───────────────────────────────────────────────────────

#[test]
fn test_favorite_survives_across_runs() {
    let dir = TempDir::new().unwrap();
    add_favorite(dir.path(), "AA-BB-CC-DD-EE-FF", "NAS");

    netroster_cmd(dir.path())
        .args(["devices", "list", "--favorites", "-o", "json"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("\"mac\": \"aabbccddeeff\"")
                .and(predicate::str::contains("\"name\": \"NAS\""))
                .and(predicate::str::contains("\"status\": \"offline\"")),
        );

    netroster_cmd(dir.path())
        .args(["devices", "get", "aabb.ccdd.eeff"])
        .assert()
        .success()
        .stdout(predicate::str::contains("NAS"));
}

#[test]
fn test_invalid_mac_is_usage_error() {
    let dir = TempDir::new().unwrap();
    netroster_cmd(dir.path())
        .args(["favorites", "add", "aa:bb", "--name", "Short"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Invalid"));
}

#[test]
fn test_blank_name_is_usage_error() {
    let dir = TempDir::new().unwrap();
    netroster_cmd(dir.path())
        .args(["favorites", "add", "aabbccddeeff", "--name", "   "])
        .assert()
        .code(2);
}

#[test]
fn test_duplicate_favorite_conflicts() {
    let dir = TempDir::new().unwrap();
    add_favorite(dir.path(), "00:11:22:33:44:55", "Router");

    netroster_cmd(dir.path())
        .args(["favorites", "add", "001122334455", "--name", "Again"])
        .assert()
        .code(6)
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_edit_moves_favorite_to_new_mac() {
    let dir = TempDir::new().unwrap();
    add_favorite(dir.path(), "00:11:22:33:44:55", "Router");

    netroster_cmd(dir.path())
        .args([
            "favorites",
            "edit",
            "00:11:22:33:44:55",
            "--mac",
            "66:77:88:99:aa:bb",
            "--description",
            "closet",
        ])
        .assert()
        .success();

    netroster_cmd(dir.path())
        .args(["devices", "list", "-o", "plain"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("66:77:88:99:aa:bb")
                .and(predicate::str::contains("00:11:22:33:44:55").not()),
        );
}

#[test]
fn test_edit_without_changes_is_usage_error() {
    let dir = TempDir::new().unwrap();
    add_favorite(dir.path(), "00:11:22:33:44:55", "Router");
    netroster_cmd(dir.path())
        .args(["favorites", "edit", "00:11:22:33:44:55"])
        .assert()
        .code(2);
}

#[test]
fn test_remove_unknown_favorite_is_not_found() {
    let dir = TempDir::new().unwrap();
    netroster_cmd(dir.path())
        .args(["favorites", "remove", "00:11:22:33:44:55"])
        .assert()
        .code(4);
}

#[test]
fn test_promote_requires_a_discovered_device() {
    let dir = TempDir::new().unwrap();
    netroster_cmd(dir.path())
        .args(["favorites", "promote", "00:11:22:33:44:55"])
        .assert()
        .code(4);
}

// ── Wake ────────────────────────────────────────────────────────────

#[test]
fn test_wake_resolves_favorite() {
    let dir = TempDir::new().unwrap();
    add_favorite(dir.path(), "aa:bb:cc:dd:ee:ff", "NAS");

    netroster_cmd(dir.path())
        .args(["wake", "aabbccddeeff", "--packet"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("aa:bb:cc:dd:ee:ff")
                .and(predicate::str::contains("ffffffffffffaabbccddeeff")),
        );
}

#[test]
fn test_wake_unknown_device_is_not_found() {
    let dir = TempDir::new().unwrap();
    netroster_cmd(dir.path())
        .args(["wake", "aa:bb:cc:dd:ee:ff"])
        .assert()
        .code(4);
}

// ── Cache ───────────────────────────────────────────────────────────

#[test]
fn test_clear_non_favorites_keeps_favorites() {
    let dir = TempDir::new().unwrap();
    add_favorite(dir.path(), "aa:bb:cc:dd:ee:ff", "NAS");

    netroster_cmd(dir.path())
        .args(["cache", "clear-non-favorites", "-o", "json"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("\"deletedCount\": 0")
                .and(predicate::str::contains("\"name\": \"NAS\"")),
        );
}
