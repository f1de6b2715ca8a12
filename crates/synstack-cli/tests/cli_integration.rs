//! CLI subprocess integration tests.
//!
//! These tests invoke the `synstack` binary as a subprocess and verify exit
//! codes, stdout content, and JSON output stability.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

fn synstack_bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_synstack"))
}

fn write_fixture(root: &Path) -> PathBuf {
    let configure = root.join("configure");
    let install = root.join("install");
    fs::create_dir_all(configure.join("injectionFiles")).unwrap();
    fs::create_dir_all(configure.join("macroFiles")).unwrap();
    fs::write(
        configure.join("INSTALL_CONFIG"),
        format!(
            "\
INSTALL={}

GIT_URL=https://github.com/epics-base/
EPICS_BASE   R7.0.2.2  $(INSTALL)/base          epics-base    YES YES

GIT_URL=https://github.com/epics-modules/
SUPPORT      R6-0      $(INSTALL)/support       support       YES YES
AREA_DETECTOR R3-6     $(SUPPORT)/areaDetector  areaDetector  YES YES
",
            install.display()
        ),
    )
    .unwrap();
    fs::write(
        configure.join("injectionFiles").join("PLUGIN_CONFIG"),
        "__TARGET_LOC__=$(AREA_DETECTOR)/ADCore/iocBoot/commonPlugins.cmd\nstartPVAServer\n",
    )
    .unwrap();
    fs::write(
        configure.join("macroFiles").join("BUILD_FLAG_CONFIG"),
        "JPEG_EXTERNAL=NO\n",
    )
    .unwrap();

    let ad = install.join("support/areaDetector");
    fs::create_dir_all(ad.join("ADCore/iocBoot")).unwrap();
    fs::create_dir_all(ad.join("configure")).unwrap();
    fs::write(ad.join("ADCore/iocBoot/commonPlugins.cmd"), "< envPaths\n").unwrap();
    fs::write(ad.join("configure/CONFIG_SITE.local"), "JPEG_EXTERNAL=YES\n").unwrap();

    configure
}

#[test]
fn cli_version_exits_zero() {
    let output = synstack_bin().arg("--version").output().unwrap();
    assert!(output.status.success(), "synstack --version must exit 0");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("synstack"),
        "version output must contain 'synstack': {stdout}"
    );
}

#[test]
fn cli_help_lists_commands() {
    let output = synstack_bin().arg("--help").output().unwrap();
    assert!(output.status.success(), "synstack --help must exit 0");
    let stdout = String::from_utf8_lossy(&output.stdout);
    for command in ["validate", "inspect", "inject", "update-macros", "apply"] {
        assert!(stdout.contains(command), "help must list '{command}'");
    }
}

#[test]
fn validate_accepts_good_manifest() {
    let tmp = tempfile::tempdir().unwrap();
    let configure = write_fixture(tmp.path());

    let output = synstack_bin()
        .args(["--configure", configure.to_str().unwrap(), "validate"])
        .output()
        .unwrap();
    assert!(output.status.success(), "{output:?}");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("3 module(s)"), "{stdout}");
}

#[test]
fn validate_missing_configure_dir_exits_manifest_error() {
    let tmp = tempfile::tempdir().unwrap();
    let missing = tmp.path().join("nope");

    let output = synstack_bin()
        .args(["--configure", missing.to_str().unwrap(), "validate"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2), "{output:?}");
}

#[test]
fn inspect_json_lists_resolved_modules() {
    let tmp = tempfile::tempdir().unwrap();
    let configure = write_fixture(tmp.path());

    let output = synstack_bin()
        .args([
            "--configure",
            configure.to_str().unwrap(),
            "--json",
            "inspect",
        ])
        .output()
        .unwrap();
    assert!(output.status.success(), "{output:?}");

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let modules = value["modules"].as_array().unwrap();
    assert_eq!(modules.len(), 3);
    assert_eq!(modules[2]["name"], "AREA_DETECTOR");
    assert!(modules[2]["abs_path"]
        .as_str()
        .unwrap()
        .ends_with("support/areaDetector"));
}

#[test]
fn apply_json_injects_and_reports() {
    let tmp = tempfile::tempdir().unwrap();
    let configure = write_fixture(tmp.path());

    let output = synstack_bin()
        .args([
            "--configure",
            configure.to_str().unwrap(),
            "--json",
            "apply",
        ])
        .output()
        .unwrap();
    assert!(output.status.success(), "{output:?}");

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["fragments_injected"][0], "PLUGIN_CONFIG");
    assert_eq!(report["files_rewritten"], 1);

    let plugins = fs::read_to_string(
        tmp.path()
            .join("install/support/areaDetector/ADCore/iocBoot/commonPlugins.cmd"),
    )
    .unwrap();
    assert!(plugins.contains("startPVAServer"));
}

#[test]
fn apply_dry_run_leaves_tree_untouched() {
    let tmp = tempfile::tempdir().unwrap();
    let configure = write_fixture(tmp.path());
    let plugins_path = tmp
        .path()
        .join("install/support/areaDetector/ADCore/iocBoot/commonPlugins.cmd");
    let before = fs::read_to_string(&plugins_path).unwrap();

    let output = synstack_bin()
        .args([
            "--configure",
            configure.to_str().unwrap(),
            "apply",
            "--dry-run",
        ])
        .output()
        .unwrap();
    assert!(output.status.success(), "{output:?}");
    assert_eq!(fs::read_to_string(&plugins_path).unwrap(), before);
}

#[test]
fn inject_unknown_fragment_fails() {
    let tmp = tempfile::tempdir().unwrap();
    let configure = write_fixture(tmp.path());

    let output = synstack_bin()
        .args([
            "--configure",
            configure.to_str().unwrap(),
            "inject",
            "NO_SUCH_FRAGMENT",
        ])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1), "{output:?}");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("NO_SUCH_FRAGMENT"), "{stderr}");
}

#[test]
fn presets_lists_builtin_targets() {
    let output = synstack_bin().arg("presets").output().unwrap();
    assert!(output.status.success(), "{output:?}");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("AD_RELEASE_CONFIG"));
    assert!(stdout.contains("$(AREA_DETECTOR)/configure/RELEASE_PRODS.local"));
}

#[test]
fn completions_generate_for_bash() {
    let output = synstack_bin().args(["completions", "bash"]).output().unwrap();
    assert!(output.status.success(), "{output:?}");
    assert!(!output.stdout.is_empty());
}
