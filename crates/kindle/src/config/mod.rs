//! document translation
//!
//! [translate] turns a whole authored document into a generated document. The sections are translated in document
//! order by their [Translate] impls in the submodules; trees are expanded as part of the storage section and mount
//! units are added once storage and systemd are both translated.
use crate::mirror::{Mirror, Translate};
use crate::options::TranslateOptions;
use crate::path;
use crate::report::Report;
use crate::translate::Translated;
use crate::{mount_unit, source, target};

mod ignition;
mod passwd;
mod storage;
mod systemd;

/// Translate an authored document
///
/// The result is not validated, see [translate_validated].
#[tracing::instrument(level = "debug", skip_all, fields(version = ?config.version))]
pub fn translate(config: &source::Config, options: &TranslateOptions) -> Translated<target::Config> {
    let mut m = Mirror::new();
    let mut to = target::Config {
        ignition: m.nest("ignition", "ignition", &config.ignition, options),
        passwd: m.nest("passwd", "passwd", &config.passwd, options),
        storage: m.nest("storage", "storage", &config.storage, options),
        systemd: m.nest("systemd", "systemd", &config.systemd, options),
    };

    to.ignition.version = target::VERSION.into();
    m.add(path!(Source, "version"), path!(Target, "ignition", "version"));

    for (index, filesystem) in config.storage.filesystems.iter().enumerate() {
        if filesystem.with_mount_unit != Some(true) {
            continue;
        }
        let Some(translated) = to.storage.filesystems.get(index) else {
            continue;
        };
        let remote = mount_unit::is_remote(&translated.device, &to.storage.luks);
        let translations = mount_unit::synthesize(
            &path!(Source, "storage", "filesystems", index, "with_mount_unit"),
            translated,
            remote,
            &mut to.systemd.units,
        );
        m.splice(&[], &["systemd".into()], ((), translations, Report::default()));
    }

    m.finish(to)
}

/// Schema validation of a generated document
///
/// Entries of the returned [Report] address the generated document.
pub trait Validate {
    fn validate(&self, config: &target::Config) -> Report;
}

impl<F> Validate for F
where
    F: Fn(&target::Config) -> Report,
{
    fn validate(&self, config: &target::Config) -> Report {
        self(config)
    }
}

/// Translate an authored document and validate the result
///
/// Findings of `validator` are moved to the authored field that produced the offending value. The document is only
/// returned if there are no errors.
pub fn translate_validated(
    config: &source::Config,
    options: &TranslateOptions,
    validator: &impl Validate,
) -> Translated<Option<target::Config>> {
    let (translated, translations, mut report) = translate(config, options);

    if options.debug_print_translations {
        eprint!("{translations}");
        if let Err(err) = translations.debug_verify_coverage(&translated) {
            report.add_error(path!(Target), err);
        }
    }

    let validation = validator.validate(&translated);
    report.merge(translations.translate_report(validation));

    if report.is_fatal() {
        (None, translations, report)
    } else {
        (Some(translated), translations, report)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    fn mount_config() -> source::Config {
        source::Config {
            storage: source::Storage {
                filesystems: vec![source::Filesystem {
                    device: "/dev/disk/by-label/foo".into(),
                    format: Some("ext4".into()),
                    path: Some("/var/lib/containers".into()),
                    with_mount_unit: Some(true),
                    ..Default::default()
                }],
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn empty_document() {
        let (out, translations, report) = translate(&source::Config::default(), &TranslateOptions::default());

        assert_eq!(
            out,
            target::Config {
                ignition: target::Ignition {
                    version: "3.2.0".into(),
                    ..Default::default()
                },
                ..Default::default()
            }
        );
        assert!(report.is_empty());
        assert_eq!(translations.to_string(), "yaml $.version -> json $.ignition.version\n");
        translations.debug_verify_coverage(&out).unwrap();
    }

    #[test]
    fn local_mount_unit() {
        let (out, translations, report) = translate(&mount_config(), &TranslateOptions::default());

        assert!(report.is_empty(), "{report}");
        assert_eq!(out.systemd.units.len(), 1);
        let unit = &out.systemd.units[0];
        assert_eq!(unit.name, "var-lib-containers.mount");
        assert_eq!(unit.enabled, Some(true));
        assert!(unit
            .contents
            .as_deref()
            .unwrap()
            .contains("Before=local-fs.target\n"));
        assert_eq!(
            translations
                .get(&path!(Target, "systemd", "units", 0, "contents"))
                .map(|t| &t.from),
            Some(&path!(Source, "storage", "filesystems", 0, "with_mount_unit"))
        );
        translations.debug_verify_coverage(&out).unwrap();
    }

    #[test]
    fn remote_mount_unit() {
        let mut config = mount_config();
        config.storage.filesystems[0].device = "/dev/mapper/foo-bar".into();
        config.storage.luks = vec![source::Luks {
            name: "foo-bar".into(),
            device: Some("/dev/bar".into()),
            clevis: Some(source::Clevis {
                tang: vec![source::Tang {
                    url: "http://example.com".into(),
                    ..Default::default()
                }],
                ..Default::default()
            }),
            ..Default::default()
        }];

        let (out, translations, report) = translate(&config, &TranslateOptions::default());

        assert!(report.is_empty(), "{report}");
        let contents = out.systemd.units[0].contents.as_deref().unwrap();
        assert!(contents.contains("Before=remote-fs.target\nDefaultDependencies=no\n"));
        assert!(contents.contains("Requires=systemd-fsck@dev-mapper-foo\\x2dbar.service\n"));
        assert!(contents.ends_with("RequiredBy=remote-fs.target"));
        translations.debug_verify_coverage(&out).unwrap();
    }

    #[test]
    fn declared_mount_unit_is_completed() {
        let mut config = mount_config();
        config.systemd.units = vec![source::Unit {
            name: "var-lib-containers.mount".into(),
            contents: Some("[Service]\nExecStart=/bin/false\n".into()),
            ..Default::default()
        }];

        let (out, translations, report) = translate(&config, &TranslateOptions::default());

        assert!(report.is_empty(), "{report}");
        assert_eq!(
            out.systemd.units,
            vec![target::Unit {
                name: "var-lib-containers.mount".into(),
                enabled: Some(true),
                contents: Some("[Service]\nExecStart=/bin/false\n".into()),
                ..Default::default()
            }]
        );
        assert_eq!(
            translations
                .get(&path!(Target, "systemd", "units", 0, "contents"))
                .map(|t| &t.from),
            Some(&path!(Source, "systemd", "units", 0, "contents"))
        );
        translations.debug_verify_coverage(&out).unwrap();
    }

    #[test]
    fn without_flag_no_unit() {
        let mut config = mount_config();
        config.storage.filesystems[0].with_mount_unit = Some(false);

        let (out, translations, _) = translate(&config, &TranslateOptions::default());

        assert!(out.systemd.units.is_empty());
        translations.debug_verify_coverage(&out).unwrap();
    }

    #[test]
    fn validation_findings_are_readdressed() {
        let config = source::Config {
            storage: source::Storage {
                files: vec![source::File {
                    path: "/etc/motd".into(),
                    mode: Some(0o7777),
                    ..Default::default()
                }],
                ..Default::default()
            },
            ..Default::default()
        };
        let validator = |config: &target::Config| {
            let mut report = Report::default();
            for (index, file) in config.storage.files.iter().enumerate() {
                if file.mode.is_some_and(|mode| mode > 0o777) {
                    report.add_error(
                        path!(Target, "storage", "files", index, "mode"),
                        "illegal file mode",
                    );
                }
            }
            report.add_warning(path!(Target, "unknown"), "not addressable");
            report
        };

        let (out, _, report) = translate_validated(&config, &TranslateOptions::default(), &validator);

        assert_eq!(out, None);
        assert_eq!(
            report.to_string(),
            "error at $.storage.files.0.mode: illegal file mode\nwarning at $.unknown: not addressable\n"
        );
        assert_eq!(
            report.entries()[0].context.tag(),
            crate::path::Tag::Source
        );
    }

    #[test]
    fn warnings_keep_the_document() {
        let validator = |_: &target::Config| {
            let mut report = Report::default();
            report.add_warning(path!(Target, "ignition", "version"), "old version");
            report
        };

        let (out, _, report) =
            translate_validated(&source::Config::default(), &TranslateOptions::default(), &validator);

        assert!(out.is_some());
        assert_eq!(report.to_string(), "warning at $.version: old version\n");
    }
}
