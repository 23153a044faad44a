//! CLI end-to-end tests that invoke the compiled `jx-bootstrap` binary.

use assert_cmd::Command;
use jx_test_utils::ConfigFixture;
use predicates::prelude::*;

/// `jx-bootstrap` pointed at the fixture's executable and application.
fn bootstrap_cmd(fixture: &ConfigFixture) -> Command {
    let exec = fixture.exec_path().display().to_string();
    let mut cmd = Command::cargo_bin("jx-bootstrap").unwrap();
    cmd.env_remove("JX_EXEC_PATH")
        .args(["--exec-path", exec.as_str(), "--platform", "posix"]);
    cmd
}

fn app_argv(fixture: &ConfigFixture) -> Vec<String> {
    vec![
        "--".to_string(),
        fixture.exec_path().display().to_string(),
        fixture.app_location().display().to_string(),
    ]
}

#[test]
fn test_help_exits_zero() {
    Command::cargo_bin("jx-bootstrap")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--exec-path"));
}

#[test]
fn test_defaults_as_json() {
    let fixture = ConfigFixture::new();
    let output = bootstrap_cmd(&fixture)
        .arg("--json")
        .args(app_argv(&fixture))
        .output()
        .unwrap();

    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["record"]["allowMonitoringAPI"], true);
    assert_eq!(report["record"]["allowLocalNativeModules"], true);
    assert!(report["record"]["maxCPU"].is_null());
    assert_eq!(report["appliedSources"].as_array().unwrap().len(), 0);
    assert_eq!(report["watcherStarted"], false);
}

#[test]
fn test_layered_config_as_json() {
    let fixture = ConfigFixture::new();
    fixture.write_global(r#"{"maxCPU": 50, "globalModulePath": "/opt/mods", "npmjxPath": "/opt/npmjx/"}"#);
    fixture.write_app(r#"{"maxCPU": 25, "allowMonitoringAPI": false}"#);

    let output = bootstrap_cmd(&fixture)
        .arg("--json")
        .args(app_argv(&fixture))
        .output()
        .unwrap();

    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["record"]["maxCPU"], 25);
    assert_eq!(report["record"]["globalModulePath"], "/opt/mods/");
    assert_eq!(report["modulePaths"][0], "/opt/mods/node_modules");
    assert_eq!(report["npmjxPath"], "/opt/npmjx");
    assert_eq!(report["watcherStarted"], true);
    assert_eq!(report["monitoringDisabled"], true);
}

#[test]
fn test_corrupt_global_config_exits_one() {
    let fixture = ConfigFixture::new();
    fixture.write_global("{ \"maxCPU\": 50,");

    bootstrap_cmd(&fixture)
        .args(app_argv(&fixture))
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("either corrupted or not accessible"));
}

#[test]
fn test_corrupt_app_config_exits_one() {
    let fixture = ConfigFixture::new();
    fixture.write_app("[1, 2");

    bootstrap_cmd(&fixture)
        .args(app_argv(&fixture))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("server.js.jxcore.config"));
}

#[test]
fn test_embedded_host_skips_bootstrap() {
    let fixture = ConfigFixture::new();
    fixture.write_global("not even json");

    bootstrap_cmd(&fixture)
        .arg("--embedded-host")
        .args(app_argv(&fixture))
        .assert()
        .success()
        .stdout(predicate::str::contains("skipped"));
}

#[test]
fn test_human_summary_lists_sources() {
    let fixture = ConfigFixture::new();
    let global = fixture.write_global(r#"{"maxMemory": 4096}"#);

    bootstrap_cmd(&fixture)
        .env("NO_COLOR", "1")
        .args(app_argv(&fixture))
        .assert()
        .success()
        .stdout(predicate::str::contains(global.display().to_string()))
        .stdout(predicate::str::contains("maxMemory"));
}
