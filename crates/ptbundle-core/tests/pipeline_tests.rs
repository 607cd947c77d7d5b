//! End-to-end bundle runs against real project trees.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use ptbundle_core::BundleError;
use ptbundle_core::BundleSpec;
use ptbundle_core::Bundler;
use ptbundle_core::FixedVersion;
use ptbundle_core::HookResult;
use ptbundle_core::globstar;
use ptbundle_core::pipeline::UNVERSIONED_MARKER;
use ptbundle_core::pipeline::VERSIONED_MARKER;
use ptbundle_core::staging::AllowList;
use ptbundle_core::staging::DenyList;
use ptbundle_core::test_utils::create_plugin_fixture;
use ptbundle_core::test_utils::read_zip_entries;
use std::cell::RefCell;
use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::process::Command;
use std::rc::Rc;
use tempfile::TempDir;

struct Project {
    source: TempDir,
    work: TempDir,
}

impl Project {
    fn new() -> Self {
        let source = TempDir::new().unwrap();
        create_plugin_fixture(source.path());
        Self {
            source,
            work: TempDir::new().unwrap(),
        }
    }

    fn spec(&self) -> BundleSpec {
        BundleSpec::new("test_plugin")
            .unwrap()
            .with_base_dir(self.source.path())
            .unwrap()
            .with_work_dir(self.work.path())
    }

    fn outdir(&self) -> PathBuf {
        self.work.path().join("bundled")
    }
}

fn names(entries: &std::collections::BTreeMap<String, Option<Vec<u8>>>) -> Vec<&str> {
    entries.keys().map(String::as_str).collect()
}

#[test]
fn test_deny_list_bundle() {
    let project = Project::new();
    let strategy = DenyList::new().with_exclude(vec![
        "deleteme".into(),
        "./src/src_file.vue".into(),
        "dist/**/*.min.*".into(),
    ]);

    let report = Bundler::new(project.spec(), strategy)
        .with_version_source(FixedVersion::new("1.0.5"))
        .run()
        .unwrap();

    let entries = read_zip_entries(&report.versioned_archive);
    let names = names(&entries);

    assert!(names.contains(&"test_plugin/src/child/grandchild/some_file.vue"));
    assert!(names.contains(&"test_plugin/dist/assets/css_asset.css"));
    assert!(!names.contains(&"test_plugin/deleteme/"));
    assert!(!names.contains(&"test_plugin/deleteme/tmp.txt"));
    assert!(!names.contains(&"test_plugin/src/src_file.vue"));
    assert!(!names.contains(&"test_plugin/dist/assets/css_asset.min.css"));
    assert!(!names.contains(&"test_plugin/dist/assets/js_asset.min.js"));
    assert!(names.iter().all(|n| n.starts_with("test_plugin/")));

    // the project itself is never modified by exclusions
    assert!(project.source.path().join("deleteme/tmp.txt").exists());
    assert!(project.source.path().join("dist/assets/js_asset.min.js").exists());
}

#[cfg(unix)]
#[test]
fn test_exclusions_do_not_follow_symlinks_out_of_staging() {
    let project = Project::new();
    let outside = TempDir::new().unwrap();
    fs::write(outside.path().join("keep.map"), "{}").unwrap();
    fs::write(outside.path().join("lib.js"), "lib").unwrap();
    std::os::unix::fs::symlink(outside.path(), project.source.path().join("linked")).unwrap();

    let spec = project.spec().with_archive_clean(vec!["linked/*.js".into()]);
    let strategy = DenyList::new().with_exclude(vec!["linked/*.map".into()]);
    let report = Bundler::new(spec, strategy)
        .with_version_source(FixedVersion::new("1.0.0"))
        .run()
        .unwrap();

    assert_eq!(report.cleaned_archive, 1);
    let entries = read_zip_entries(&report.versioned_archive);
    assert!(entries.contains_key("test_plugin/linked/"));
    assert!(!entries.contains_key("test_plugin/linked/keep.map"));
    assert!(!entries.contains_key("test_plugin/linked/lib.js"));

    assert!(outside.path().join("keep.map").exists());
    assert!(outside.path().join("lib.js").exists());
}

#[cfg(unix)]
#[test]
fn test_version_injection_leaves_linked_entry_file_alone() {
    let project = Project::new();
    let outside = TempDir::new().unwrap();
    let real_entry = outside.path().join("main.php");
    fs::write(&real_entry, "Version: %%VERSION%%").unwrap();
    let entry = project.source.path().join("test_plugin.php");
    fs::remove_file(&entry).unwrap();
    std::os::unix::fs::symlink(&real_entry, &entry).unwrap();

    let report = Bundler::new(project.spec(), DenyList::new())
        .with_version_source(FixedVersion::new("9.9.9"))
        .run()
        .unwrap();

    assert!(report.version_injected);
    let entries = read_zip_entries(&report.versioned_archive);
    assert_eq!(
        entries["test_plugin/test_plugin.php"].as_deref(),
        Some(&b"Version: 9.9.9"[..])
    );
    assert_eq!(fs::read_to_string(&real_entry).unwrap(), "Version: %%VERSION%%");
}

#[test]
fn test_allow_list_bundle() {
    let project = Project::new();
    let strategy = AllowList::new()
        .with_folders(vec!["./dist/assets".into()])
        .with_files(vec!["test_plugin.php".into()]);

    let report = Bundler::new(project.spec(), strategy)
        .with_version_source(FixedVersion::new("1.0.0"))
        .run()
        .unwrap();

    let entries = read_zip_entries(&report.unversioned_archive);
    assert_eq!(
        names(&entries),
        vec![
            "test_plugin/",
            "test_plugin/dist/",
            "test_plugin/dist/assets/",
            "test_plugin/dist/assets/css_asset.css",
            "test_plugin/dist/assets/css_asset.min.css",
            "test_plugin/dist/assets/js_asset.min.js",
            "test_plugin/test_plugin.php",
        ]
    );
}

#[test]
fn test_version_is_injected_and_prefix_stripped() {
    let project = Project::new();

    let report = Bundler::new(project.spec(), DenyList::new())
        .with_version_source(FixedVersion::new("v1.2.3"))
        .run()
        .unwrap();

    assert_eq!(report.version, "1.2.3");
    assert!(report.version_injected);
    assert_eq!(
        report.versioned_archive,
        project.outdir().join("test_plugin.1.2.3.zip")
    );

    let entries = read_zip_entries(&report.versioned_archive);
    let entry = entries["test_plugin/test_plugin.php"].as_ref().unwrap();
    let entry = String::from_utf8(entry.clone()).unwrap();
    assert!(entry.contains("Version: 1.2.3"));
    assert!(!entry.contains("%%VERSION%%"));

    // the source entry file keeps its placeholder
    let source = fs::read_to_string(project.source.path().join("test_plugin.php")).unwrap();
    assert!(source.contains("%%VERSION%%"));
}

#[test]
fn test_both_archives_match() {
    let project = Project::new();

    let report = Bundler::new(project.spec(), DenyList::new())
        .with_version_source(FixedVersion::new("2.0.0"))
        .run()
        .unwrap();

    assert_eq!(
        read_zip_entries(&report.versioned_archive),
        read_zip_entries(&report.unversioned_archive)
    );
    assert_eq!(
        fs::read(&report.versioned_archive).unwrap(),
        fs::read(&report.unversioned_archive).unwrap()
    );
}

#[test]
fn test_marker_files() {
    let project = Project::new();

    Bundler::new(project.spec(), DenyList::new())
        .with_version_source(FixedVersion::new("0.9.1"))
        .run()
        .unwrap();

    let outdir = project.outdir();
    assert_eq!(
        fs::read_to_string(outdir.join(VERSIONED_MARKER)).unwrap(),
        "test_plugin.0.9.1.zip"
    );
    assert_eq!(
        fs::read_to_string(outdir.join(UNVERSIONED_MARKER)).unwrap(),
        "test_plugin.zip"
    );
    assert!(outdir.join("test_plugin.0.9.1.zip").is_file());
    assert!(outdir.join("test_plugin.zip").is_file());
    assert!(!project.work.path().join("test_plugin").exists());
}

#[test]
fn test_archive_internal_cleanup() {
    let project = Project::new();
    let spec = project
        .spec()
        .with_archive_clean(vec!["**/*.map".into(), "**/deleteme".into()]);

    let report = Bundler::new(spec, DenyList::new())
        .with_version_source(FixedVersion::new("1.0.0"))
        .run()
        .unwrap();

    assert_eq!(report.cleaned_archive, 5);
    let entries = read_zip_entries(&report.versioned_archive);
    assert!(!entries.keys().any(|n| n.ends_with(".map")));
    assert!(!entries.keys().any(|n| n.contains("deleteme")));
    assert!(project.source.path().join("dist/app.js.map").exists());
}

#[test]
fn test_cleanup_passes_and_hooks_run_in_order() {
    let project = Project::new();
    let base = project.source.path().to_path_buf();
    let log = Rc::new(RefCell::new(Vec::new()));

    let build_log = Rc::clone(&log);
    let build_base = base.clone();
    let cleanup_log = Rc::clone(&log);
    let cleanup_base = base.clone();

    let spec = project
        .spec()
        .with_clean_before_build(vec!["dist".into()])
        .with_clean_after_build(vec!["build-cache".into()])
        .with_build_hook(move || -> HookResult {
            build_log
                .borrow_mut()
                .push(format!("build dist={}", build_base.join("dist").exists()));
            fs::create_dir_all(build_base.join("dist"))?;
            fs::write(build_base.join("dist/bundle.js"), "built")?;
            fs::create_dir_all(build_base.join("build-cache"))?;
            Ok(())
        })
        .with_cleanup_hook(move || -> HookResult {
            cleanup_log.borrow_mut().push(format!(
                "cleanup cache={}",
                cleanup_base.join("build-cache").exists()
            ));
            Ok(())
        });

    let report = Bundler::new(spec, DenyList::new())
        .with_version_source(FixedVersion::new("1.0.0"))
        .run()
        .unwrap();

    assert_eq!(
        *log.borrow(),
        vec!["build dist=false".to_owned(), "cleanup cache=false".to_owned()]
    );
    assert_eq!(report.cleaned_before, 1);
    assert_eq!(report.cleaned_after, 1);

    let entries = read_zip_entries(&report.versioned_archive);
    assert!(entries.contains_key("test_plugin/dist/bundle.js"));
    assert!(!entries.contains_key("test_plugin/dist/app.js.map"));
}

#[test]
fn test_theme_without_entry_file() {
    let project = Project::new();
    fs::remove_file(project.source.path().join("test_plugin.php")).unwrap();

    let report = Bundler::new(project.spec(), DenyList::new())
        .with_version_source(FixedVersion::new("1.0.0"))
        .run()
        .unwrap();

    assert!(!report.version_injected);
    assert!(report.versioned_archive.is_file());
}

#[test]
fn test_custom_outdir_and_extension() {
    let project = Project::new();
    fs::write(
        project.source.path().join("test_plugin.css"),
        "/* Version: %%VERSION%% */",
    )
    .unwrap();
    let spec = project
        .spec()
        .with_outdir("releases/latest")
        .with_entry_extension("css");

    let report = Bundler::new(spec, DenyList::new())
        .with_version_source(FixedVersion::new("4.0.0"))
        .run()
        .unwrap();

    let outdir = project.work.path().join("releases/latest");
    assert_eq!(report.versioned_archive, outdir.join("test_plugin.4.0.0.zip"));
    let entries = read_zip_entries(&report.versioned_archive);
    assert_eq!(
        entries["test_plugin/test_plugin.css"].as_deref(),
        Some(&b"/* Version: 4.0.0 */"[..])
    );
    // php entry is untouched when the extension is css
    let php = entries["test_plugin/test_plugin.php"].as_ref().unwrap();
    assert!(String::from_utf8_lossy(php).contains("%%VERSION%%"));
}

#[test]
fn test_missing_allow_list_source_leaves_no_staging() {
    let project = Project::new();
    let strategy = AllowList::new().with_files(vec!["readme.txt".into()]);

    let result = Bundler::new(project.spec(), strategy)
        .with_version_source(FixedVersion::new("1.0.0"))
        .run();

    assert!(matches!(result, Err(BundleError::SourceNotFound { .. })));
    assert!(!project.work.path().join("test_plugin").exists());
    assert!(!project.outdir().exists());
}

#[test]
fn test_existing_staging_directory_is_an_error() {
    let project = Project::new();
    let occupied = project.work.path().join("test_plugin");
    fs::create_dir(&occupied).unwrap();
    fs::write(occupied.join("keep.txt"), "mine").unwrap();

    let result = Bundler::new(project.spec(), DenyList::new())
        .with_version_source(FixedVersion::new("1.0.0"))
        .run();

    assert!(matches!(result, Err(BundleError::StagingExists { .. })));
    assert!(occupied.join("keep.txt").exists());
}

#[test]
fn test_rerun_replaces_archives() {
    let project = Project::new();
    let bundler = Bundler::new(project.spec(), DenyList::new())
        .with_version_source(FixedVersion::new("1.0.0"));

    let first = bundler.run().unwrap();
    fs::remove_file(project.source.path().join("src/src_file.vue")).unwrap();
    let second = bundler.run().unwrap();

    assert_eq!(first.versioned_archive, second.versioned_archive);
    let entries = read_zip_entries(&second.versioned_archive);
    assert!(!entries.contains_key("test_plugin/src/src_file.vue"));
}

fn git(dir: &Path, args: &[&str]) {
    let output = Command::new("git").args(args).current_dir(dir).output().unwrap();
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
}

#[test]
fn test_version_from_git_tag() {
    let project = Project::new();
    let dir = project.source.path();
    git(dir, &["init"]);
    git(dir, &["config", "user.name", "test-user"]);
    git(dir, &["config", "user.email", "test@example.com"]);
    git(dir, &["add", "."]);
    git(dir, &["commit", "-m", "initial"]);
    git(dir, &["tag", "-a", "V3.4.5", "-m", "release"]);

    let spec = project.spec().with_archive_clean(vec![".git".into()]);
    let report = Bundler::new(spec, DenyList::new()).run().unwrap();

    assert_eq!(report.version, "3.4.5");
    let entries = read_zip_entries(&report.versioned_archive);
    assert!(!entries.keys().any(|n| n.starts_with("test_plugin/.git/")));
}

#[test]
fn test_globstar_depths() {
    let project = Project::new();
    let root = project.source.path().to_str().unwrap();

    let found = globstar(&format!("{root}/src/**/deleteme"));
    assert_eq!(
        found,
        vec![
            PathBuf::from(format!("{root}/src/child/grandchild/deleteme")),
            PathBuf::from(format!("{root}/src/deleteme")),
        ]
    );

    let vue = globstar(&format!("{root}/**/*.vue"));
    assert_eq!(
        vue,
        vec![
            PathBuf::from(format!("{root}/src/child/grandchild/some_file.vue")),
            PathBuf::from(format!("{root}/src/src_file.vue")),
        ]
    );

    assert!(globstar(&format!("{root}/**/*.nothing")).is_empty());
}
