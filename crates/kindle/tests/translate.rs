//! Fixture tests
//!
//! Translates each tests/fixtures/*.yaml document and compares the result with the .json file of the same name.
//! Local files are resolved against tests/files.

use kindle::config::{translate, translate_validated};
use kindle::report::Report;
use kindle::{path, source, target, TranslateOptions};
use pretty_assertions::assert_eq;
use std::path::{Path, PathBuf};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_env("KINDLE_LOG"))
        .with_test_writer()
        .try_init();
}

fn options() -> TranslateOptions {
    TranslateOptions {
        files_dir: Some(Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/files")),
        ..Default::default()
    }
}

fn load(path: &Path) -> source::Config {
    let document = std::fs::read_to_string(path).unwrap();
    serde_yaml::from_str(&document).expect("valid document")
}

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

#[test]
fn fixtures() {
    init_tracing();

    insta::glob!("fixtures/*.yaml", |path| {
        let (out, translations, report) = translate(&load(path), &options());

        assert!(report.is_empty(), "{}:\n{report}", path.display());
        translations
            .debug_verify_coverage(&out)
            .expect("complete translation set");

        let expected: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(path.with_extension("json")).unwrap())
                .unwrap();
        assert_eq!(serde_json::to_value(&out).unwrap(), expected, "{}", path.display());
    });
}

#[test]
fn findings_point_at_the_tree() {
    init_tracing();

    let validator = |config: &target::Config| {
        let mut report = Report::default();
        for (index, file) in config.storage.files.iter().enumerate() {
            if file.path.ends_with(".sh") {
                report.add_error(
                    path!(Target, "storage", "files", index, "contents", "source"),
                    "scripts are not allowed",
                );
            }
        }
        report
    };

    let (out, _, report) =
        translate_validated(&load(&fixture("local.yaml")), &options(), &validator);

    assert_eq!(out, None);
    assert_eq!(
        report.to_string(),
        "error at $.storage.trees.0: scripts are not allowed\n"
    );
}

#[test]
fn report_is_sorted_by_path() {
    init_tracing();

    let document: source::Config = serde_yaml::from_str(
        "\
version: 1.3.0
storage:
  files:
    - path: /escape
      contents:
        local: ../outside
  trees:
    - local: nonexistent
systemd:
  units:
    - name: a.service
",
    )
    .unwrap();
    let validator = |_: &target::Config| {
        let mut report = Report::default();
        report.add_warning(path!(Target, "systemd", "units", 0, "name"), "unit has no contents");
        report.add_warning(path!(Target, "ignition", "version"), "consider a newer version");
        report
    };

    let (_, _, mut report) = translate_validated(&document, &options(), &validator);
    report.sort();

    let lines: Vec<String> = report
        .entries()
        .iter()
        .map(|entry| format!("{} at {}", entry.severity, entry.context))
        .collect();
    assert_eq!(
        lines,
        vec![
            "error at $.storage.files.0.contents.local",
            "error at $.storage.trees.0",
            "warning at $.systemd.units.0.name",
            "warning at $.version",
        ]
    );
    assert!(report.is_fatal());
}

#[test]
fn debug_verification_runs_with_the_translation() {
    init_tracing();

    let options = TranslateOptions {
        debug_print_translations: true,
        ..options()
    };
    let (out, translations, report) = translate_validated(
        &load(&fixture("mount.yaml")),
        &options,
        &|_: &target::Config| Report::default(),
    );

    assert!(report.is_empty(), "{report}");
    assert!(out.is_some());
    assert!(translations.len() > 10);
}
