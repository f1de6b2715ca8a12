//! End-to-end tests for the injector engine and macro updater against real
//! temp directories.

use std::fs;
use std::path::Path;
use synstack_inject::{
    inject_fragment, update_macros, InjectError, BACKUP_DIR, INJECT_BEGIN_PREFIX,
    INJECT_END_PREFIX,
};
use synstack_schema::{InjectorFile, InstallConfig, InstallModule, MacroDef, UrlType};

fn module(name: &str, rel_path: &str) -> InstallModule {
    InstallModule::new(
        name,
        "R1-0",
        rel_path,
        UrlType::Git,
        "https://github.com/dummyurl/test/",
        name.to_lowercase(),
        true,
        true,
    )
}

fn config_with_ad(root: &Path) -> InstallConfig {
    let mut cfg = InstallConfig::new(root, root.join("configure"));
    cfg.add_module(module("SUPPORT", "$(INSTALL)/support")).unwrap();
    cfg.add_module(module("AREA_DETECTOR", "$(SUPPORT)/areaDetector"))
        .unwrap();
    cfg
}

fn fragment(name: &str, target: &str, body: &str) -> InjectorFile {
    InjectorFile::parse(name, &format!("__TARGET_LOC__={target}\n{body}")).unwrap()
}

#[test]
fn injection_appends_between_markers() {
    let tmp = tempfile::tempdir().unwrap();
    let cfg = config_with_ad(tmp.path());
    let target_dir = tmp.path().join("support/areaDetector/configure");
    fs::create_dir_all(&target_dir).unwrap();
    let target = target_dir.join("RELEASE_PRODS.local");
    fs::write(&target, "ADCORE=$(AREA_DETECTOR)/ADCore\n").unwrap();

    let frag = fragment(
        "AD_RELEASE_CONFIG",
        "$(AREA_DETECTOR)/configure/RELEASE_PRODS.local",
        "ADURL=$(AREA_DETECTOR)/ADURL\nADSIMDETECTOR=$(AREA_DETECTOR)/ADSimDetector\n",
    );
    let written = inject_fragment(&frag, &cfg).unwrap();
    assert_eq!(written, target);

    let content = fs::read_to_string(&target).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines[0], "ADCORE=$(AREA_DETECTOR)/ADCore");
    assert!(lines[1].starts_with(INJECT_BEGIN_PREFIX));
    assert_eq!(lines[2], "ADURL=$(AREA_DETECTOR)/ADURL");
    assert_eq!(lines[3], "ADSIMDETECTOR=$(AREA_DETECTOR)/ADSimDetector");
    assert!(lines[4].starts_with(INJECT_END_PREFIX));
    assert_eq!(lines.len(), 5);
}

#[test]
fn injection_into_missing_target_fails_without_creating_it() {
    let tmp = tempfile::tempdir().unwrap();
    let cfg = config_with_ad(tmp.path());
    let frag = fragment(
        "PLUGIN_CONFIG",
        "$(AREA_DETECTOR)/ADCore/iocBoot/commonPlugins.cmd",
        "startPVAServer\n",
    );

    let err = inject_fragment(&frag, &cfg).unwrap_err();
    let InjectError::TargetNotFound(path) = err else {
        panic!("expected TargetNotFound, got {err}");
    };
    assert!(!path.exists());
}

#[test]
fn reinjection_replaces_block_instead_of_appending() {
    let tmp = tempfile::tempdir().unwrap();
    let cfg = config_with_ad(tmp.path());
    let target_dir = tmp.path().join("support/areaDetector/ADCore/iocBoot");
    fs::create_dir_all(&target_dir).unwrap();
    let target = target_dir.join("commonPlugins.cmd");
    fs::write(&target, "< envPaths\n").unwrap();

    let frag = fragment(
        "PLUGIN_CONFIG",
        "$(AREA_DETECTOR)/ADCore/iocBoot/commonPlugins.cmd",
        "startPVAServer\n",
    );
    inject_fragment(&frag, &cfg).unwrap();
    let after_first = fs::read_to_string(&target).unwrap();
    inject_fragment(&frag, &cfg).unwrap();
    let after_second = fs::read_to_string(&target).unwrap();

    assert_eq!(after_first, after_second);
    assert_eq!(
        after_second.matches("startPVAServer").count(),
        1,
        "rerun must not duplicate injected content"
    );
}

#[test]
fn unresolved_target_macro_is_an_error() {
    let tmp = tempfile::tempdir().unwrap();
    let cfg = InstallConfig::new(tmp.path(), tmp.path().join("configure"));
    let frag = fragment("PLUGIN_CONFIG", "$(AREA_DETECTOR)/x", "line\n");
    assert!(matches!(
        inject_fragment(&frag, &cfg),
        Err(InjectError::Resolve(_))
    ));
}

#[test]
fn macro_update_rewrites_eligible_and_relocates_rest() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path();
    fs::write(dir.join("CONFIG_SITE.local"), "JPEG_EXTERNAL=YES\nKEEP=1\n").unwrap();
    fs::write(dir.join("README.md"), "docs\n").unwrap();

    let pairs = vec![MacroDef::new("JPEG_EXTERNAL", "NO")];
    let outcome = update_macros(&pairs, dir, "linux-x86_64").unwrap();

    assert_eq!(outcome.rewritten.len(), 1);
    assert_eq!(outcome.relocated.len(), 1);
    let content = fs::read_to_string(dir.join("CONFIG_SITE.local")).unwrap();
    assert_eq!(content, "JPEG_EXTERNAL=NO\n#KEEP=1\n");
    assert!(!dir.join("README.md").exists());
    assert!(dir.join(BACKUP_DIR).join("README.md").is_file());
    assert_eq!(
        fs::read_to_string(dir.join(BACKUP_DIR).join("CONFIG_SITE.local")).unwrap(),
        "JPEG_EXTERNAL=YES\nKEEP=1\n"
    );
}

#[test]
fn double_run_leaves_each_key_exactly_once() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path();
    fs::write(dir.join("RELEASE.local"), "JPEG_EXTERNAL=YES\n").unwrap();

    let pairs = vec![
        MacroDef::new("JPEG_EXTERNAL", "NO"),
        MacroDef::new("TIFF_EXTERNAL", "NO"),
    ];
    update_macros(&pairs, dir, "linux-x86_64").unwrap();
    update_macros(&pairs, dir, "linux-x86_64").unwrap();

    let content = fs::read_to_string(dir.join("RELEASE.local")).unwrap();
    assert_eq!(content.matches("JPEG_EXTERNAL=").count(), 1);
    assert_eq!(content.matches("TIFF_EXTERNAL=").count(), 1);
    // Pristine original survives both runs.
    assert_eq!(
        fs::read_to_string(dir.join(BACKUP_DIR).join("RELEASE.local")).unwrap(),
        "JPEG_EXTERNAL=YES\n"
    );
}

#[test]
fn example_prefix_is_dropped_on_rewrite() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path();
    fs::write(dir.join("EXAMPLE_RELEASE_PRODS.local"), "ADCORE=$(AREA_DETECTOR)/ADCore\n")
        .unwrap();

    let pairs = vec![MacroDef::new("ADCORE", "/epics/support/areaDetector/ADCore")];
    let outcome = update_macros(&pairs, dir, "linux-x86_64").unwrap();

    assert!(!dir.join("EXAMPLE_RELEASE_PRODS.local").exists());
    let content = fs::read_to_string(dir.join("RELEASE_PRODS.local")).unwrap();
    assert_eq!(content, "ADCORE=/epics/support/areaDetector/ADCore\n");
    assert_eq!(outcome.rewritten, vec![dir.join("RELEASE_PRODS.local")]);
    assert!(dir.join(BACKUP_DIR).join("EXAMPLE_RELEASE_PRODS.local").is_file());
}

#[test]
fn arch_suffix_files_are_eligible() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path();
    fs::write(dir.join("CONFIG_SITE.linux-aarch64"), "WITH_PVA=NO\n").unwrap();

    let pairs = vec![MacroDef::new("WITH_PVA", "YES")];
    update_macros(&pairs, dir, "linux-aarch64").unwrap();
    assert_eq!(
        fs::read_to_string(dir.join("CONFIG_SITE.linux-aarch64")).unwrap(),
        "WITH_PVA=YES\n"
    );
}

#[test]
fn missing_target_dir_is_an_error() {
    let err = update_macros(&[], Path::new("/nonexistent/configure"), "linux-x86_64").unwrap_err();
    assert!(matches!(err, InjectError::TargetDirNotFound(_)));
}
