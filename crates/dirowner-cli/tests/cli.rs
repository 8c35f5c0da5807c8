//! End-to-end checks of the `resolve` binary.
//!
//! None of these need a reachable directory service.

use assert_cmd::Command;
use predicates::prelude::*;

fn resolve(config_home: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("resolve").unwrap();
    for var in [
        "LDAP_URL",
        "LDAP_BIND_DN",
        "LDAP_BIND_PASS",
        "LDAP_BASE_DN",
        "DIROWNER_CONFIG",
        "DIROWNER_LOG",
    ] {
        cmd.env_remove(var);
    }
    cmd.env("XDG_CONFIG_HOME", config_home);
    cmd
}

#[test]
fn no_arguments_is_a_usage_error() {
    let home = tempfile::tempdir().unwrap();
    resolve(home.path())
        .assert()
        .code(2)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn conflicting_stages_are_a_usage_error() {
    let home = tempfile::tempdir().unwrap();
    resolve(home.path())
        .args(["--extract-only", "--uid-map", "-"])
        .assert()
        .code(2)
        .stdout(predicate::str::is_empty());
}

#[test]
fn unreachable_directory_exits_before_output() {
    let home = tempfile::tempdir().unwrap();
    let data = tempfile::tempdir().unwrap();

    resolve(home.path())
        .env("LDAP_URL", "ldap://127.0.0.1:1")
        .arg(data.path())
        .assert()
        .code(3)
        .stdout(predicate::str::is_empty());
}

#[test]
fn malformed_uid_map_is_fatal() {
    let home = tempfile::tempdir().unwrap();
    let map = home.path().join("uids.json");
    std::fs::write(&map, r#"{"/data/alice": "alice"}"#).unwrap();

    resolve(home.path())
        .arg("--uid-map")
        .arg(&map)
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty());
}

#[test]
fn malformed_uid_map_on_stdin_is_fatal() {
    let home = tempfile::tempdir().unwrap();
    resolve(home.path())
        .args(["--uid-map", "-"])
        .write_stdin(r#"{"/a": -1}"#)
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty());
}

#[test]
fn uid_map_on_stdin_still_needs_the_directory() {
    let home = tempfile::tempdir().unwrap();
    resolve(home.path())
        .env("LDAP_URL", "ldap://127.0.0.1:1")
        .args(["--uid-map", "-"])
        .write_stdin(r#"{"/a": 5}"#)
        .assert()
        .code(3)
        .stdout(predicate::str::is_empty());
}

#[test]
fn bad_endpoint_is_rejected_before_reading_the_map() {
    let home = tempfile::tempdir().unwrap();
    resolve(home.path())
        .env("LDAP_URL", "http://127.0.0.1:1")
        .args(["--uid-map", "/no/such/uids.json"])
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("unsupported LDAP URL scheme"));
}

#[cfg(unix)]
#[test]
fn extract_only_ignores_directory_settings() {
    let home = tempfile::tempdir().unwrap();
    let data = tempfile::tempdir().unwrap();

    resolve(home.path())
        .env("LDAP_URL", "http://not-a-directory")
        .arg("--extract-only")
        .arg(data.path())
        .assert()
        .success()
        .stdout(predicate::str::contains(data.path().display().to_string()));
}

#[test]
fn unreadable_owner_check_file_aborts_extraction() {
    let home = tempfile::tempdir().unwrap();
    resolve(home.path())
        .args(["--extract-only", "--probe", "/no/such/owner-file", "--probe-uid", "0"])
        .arg(home.path())
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty());
}

#[cfg(unix)]
#[test]
fn extract_only_prints_uid_map_and_skips_bad_paths() {
    use std::os::unix::fs::MetadataExt;

    let home = tempfile::tempdir().unwrap();
    let data = tempfile::tempdir().unwrap();
    let dir = data.path().display().to_string();
    let missing = format!("{dir}/missing");
    let uid = std::fs::metadata(data.path()).unwrap().uid();

    let output = resolve(home.path())
        .args(["--extract-only", "--compact", &missing, &dir])
        .output()
        .unwrap();

    assert!(output.status.success());
    let map: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let object = map.as_object().unwrap();
    assert_eq!(object.len(), 1);
    assert_eq!(object[&dir], uid);
}

#[cfg(unix)]
#[test]
fn probe_mismatch_aborts_extraction() {
    use std::os::unix::fs::MetadataExt;

    let home = tempfile::tempdir().unwrap();
    let probe = tempfile::NamedTempFile::new().unwrap();
    let wrong = std::fs::metadata(probe.path()).unwrap().uid().wrapping_add(100_000);

    resolve(home.path())
        .arg("--extract-only")
        .arg("--probe")
        .arg(probe.path())
        .args(["--probe-uid", &wrong.to_string()])
        .arg(home.path())
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty());
}
