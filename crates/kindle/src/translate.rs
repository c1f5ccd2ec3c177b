//! provenance records
//!
//! Every value written into the target document gets a [Translation] recording which source field produced it.
//! The [TranslationSet] of a whole translation is what lets diagnostics about the target document be reported at the
//! place the author actually wrote.
use crate::path::{Path, Segment, Tag};
use crate::report::Report;
use crate::visit::VisitLeaves;
use std::fmt::{Display, Formatter};

/// One provenance record: the value at `to` came from `from`
#[derive(derive_new::new, Debug, Clone, PartialEq, Eq)]
pub struct Translation {
    pub from: Path,
    pub to: Path,
}

impl Display for Translation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} -> {} {}", self.from.tag(), self.from, self.to.tag(), self.to)
    }
}

/// Insertion ordered, append-only collection of [Translation]s
///
/// Duplicates are allowed. Paths stored here are relative to whatever structure the set was produced for; merging
/// into a parent set prefixes them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TranslationSet {
    translations: Vec<Translation>,
}

impl TranslationSet {
    pub fn iter(&self) -> impl Iterator<Item = &Translation> {
        self.translations.iter()
    }

    pub fn len(&self) -> usize {
        self.translations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.translations.is_empty()
    }

    pub fn add(&mut self, from: Path, to: Path) {
        tracing::trace!(%from, %to, "translation");
        self.translations.push(Translation::new(from, to));
    }

    /// Add translations for fields that keep their name
    pub fn add_identity(&mut self, keys: &[&str]) {
        for key in keys {
            self.add(crate::path!(Source, *key), crate::path!(Target, *key));
        }
    }

    /// Record `from` as the origin of every populated leaf of `value`, which lives at `to_prefix`
    ///
    /// Used for target structures synthesized from a single source field.
    pub fn add_from_common_source<T: serde::Serialize>(
        &mut self,
        from: &Path,
        to_prefix: &Path,
        value: &T,
    ) {
        let Ok(value) = serde_json::to_value(value) else {
            // not reachable for the target schema; fall back to covering the whole structure
            self.add(from.clone(), to_prefix.clone());
            return;
        };

        let mut leaves = vec![];
        value.visit_leaves(to_prefix, &mut |path: &Path, _: &serde_json::Value| {
            leaves.push(path.clone())
        });
        for leaf in leaves {
            self.add(from.clone(), leaf);
        }
    }

    pub fn merge(&mut self, other: TranslationSet) {
        self.translations.extend(other.translations);
    }

    /// Merge `other` with both sides prefixed by `prefix`
    pub fn merge_p(&mut self, prefix: &[Segment], other: TranslationSet) {
        self.merge_p2(prefix, prefix, other);
    }

    /// Merge `other` with its source paths prefixed by `from_prefix` and target paths by `to_prefix`
    pub fn merge_p2(&mut self, from_prefix: &[Segment], to_prefix: &[Segment], other: TranslationSet) {
        for translation in other.translations {
            self.translations.push(Translation::new(
                prefixed(from_prefix, &translation.from),
                prefixed(to_prefix, &translation.to),
            ));
        }
    }

    /// Returns a copy with both sides of each translation prefixed by `segment`
    pub fn prefix(&self, segment: impl Into<Segment>) -> Self {
        let mut result = Self::default();
        result.merge_p(&[segment.into()], self.clone());
        result
    }

    /// The most recently added translation producing exactly `to`
    pub fn get(&self, to: &Path) -> Option<&Translation> {
        self.translations.iter().rev().find(|t| &t.to == to)
    }

    /// Find the translation whose target is the closest ancestor-or-self of `to`
    fn lookup(&self, to: &Path) -> Option<&Translation> {
        let mut candidate = Some(to.clone());
        while let Some(current) = candidate {
            if let Some(translation) = self.get(&current) {
                return Some(translation);
            }
            candidate = current.parent();
        }
        None
    }

    /// Re-address target document diagnostics to the source document
    ///
    /// Each entry pointing into the target document is moved to the source path of the translation that produced
    /// its path, or the nearest ancestor of it. Entries without any matching translation are kept as they are.
    pub fn translate_report(&self, mut report: Report) -> Report {
        for entry in report.entries_mut() {
            if entry.context.tag() != Tag::Target {
                continue;
            }
            if let Some(translation) = self.lookup(&entry.context) {
                tracing::trace!(from=%entry.context, to=%translation.from, "re-addressing report entry");
                entry.context = translation.from.clone();
            }
        }
        report
    }

    /// Check that every populated leaf of `value` is reached by some translation
    ///
    /// A leaf counts as covered when a translation targets it or any of its ancestors. A failure here is a bug in
    /// a translator, not a problem with the user's document.
    pub fn debug_verify_coverage<T: serde::Serialize>(&self, value: &T) -> Result<(), CoverageError> {
        let value = serde_json::to_value(value).map_err(CoverageError::Serialize)?;

        let mut uncovered = vec![];
        value.visit_leaves(&Path::root(Tag::Target), &mut |leaf: &Path, _: &serde_json::Value| {
            let covered = self.translations.iter().any(|t| leaf.starts_with(&t.to));
            if !covered {
                uncovered.push(leaf.clone());
            }
        });

        match uncovered.into_iter().next() {
            None => Ok(()),
            Some(path) => Err(CoverageError::Uncovered(path)),
        }
    }
}

fn prefixed(prefix: &[Segment], path: &Path) -> Path {
    let mut segments = prefix.to_vec();
    segments.extend(path.segments().iter().cloned());
    Path::new(path.tag(), segments)
}

impl Display for TranslationSet {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for translation in &self.translations {
            writeln!(f, "{translation}")?;
        }
        Ok(())
    }
}

#[derive(thiserror::Error, Debug)]
pub enum CoverageError {
    #[error("translation set doesn't cover {0}")]
    Uncovered(Path),
    #[error("value could not be serialized for inspection")]
    Serialize(#[source] serde_json::Error),
}

/// The triple every translation step produces
pub type Translated<T> = (T, TranslationSet, Report);

#[cfg(test)]
mod test {
    use super::*;
    use crate::error::Error;
    use crate::path;
    use pretty_assertions::assert_eq;

    #[derive(serde::Serialize)]
    struct Unit {
        name: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        enabled: Option<bool>,
        dropins: Vec<String>,
    }

    #[test]
    fn merge_p_prefixes_both_sides() {
        let mut inner = TranslationSet::default();
        inner.add(path!(Source, "inline"), path!(Target, "source"));

        let mut outer = TranslationSet::default();
        outer.merge_p(&["append".into(), 1.into()], inner);

        assert_eq!(
            outer.iter().collect::<Vec<_>>(),
            vec![&Translation::new(
                path!(Source, "append", 1, "inline"),
                path!(Target, "append", 1, "source")
            )]
        );
    }

    #[test]
    fn merge_p2_shifts_index_independently() {
        let mut inner = TranslationSet::default();
        inner.add(path!(Source, "path"), path!(Target, "path"));

        let mut outer = TranslationSet::default();
        outer.merge_p2(&["trees".into(), 0.into()], &["files".into(), 4.into()], inner);

        assert_eq!(
            outer.get(&path!(Target, "files", 4, "path")).map(|t| &t.from),
            Some(&path!(Source, "trees", 0, "path"))
        );
    }

    #[test]
    fn coverage_accepts_ancestors() {
        let unit = Unit {
            name: "foo.mount".into(),
            enabled: Some(true),
            dropins: vec!["a.conf".into()],
        };

        // leaves are checked in field order
        let mut translations = TranslationSet::default();
        translations.add(path!(Source, "name"), path!(Target, "name"));
        assert!(matches!(
            translations.debug_verify_coverage(&unit),
            Err(CoverageError::Uncovered(path)) if path == path!(Target, "enabled")
        ));

        translations.add(path!(Source, "enabled"), path!(Target, "enabled"));
        assert!(matches!(
            translations.debug_verify_coverage(&unit),
            Err(CoverageError::Uncovered(path)) if path == path!(Target, "dropins", 0)
        ));

        translations.add(path!(Source, "dropins"), path!(Target, "dropins"));
        assert!(translations.debug_verify_coverage(&unit).is_ok());
    }

    #[test]
    fn unset_fields_need_no_coverage() {
        let unit = Unit {
            name: "foo.service".into(),
            enabled: None,
            dropins: vec![],
        };
        let mut translations = TranslationSet::default();
        translations.add_identity(&["name"]);

        assert!(translations.debug_verify_coverage(&unit).is_ok());
    }

    #[test]
    fn common_source_covers_every_leaf() {
        let unit = Unit {
            name: "var-lib.mount".into(),
            enabled: Some(true),
            dropins: vec![],
        };
        let from = path!(Source, "storage", "filesystems", 0, "with_mount_unit");

        let mut translations = TranslationSet::default();
        translations.add_from_common_source(&from, &path!(Target, "systemd", "units", 2), &unit);

        insta::assert_snapshot!(translations.to_string(), @r###"
        yaml $.storage.filesystems.0.with_mount_unit -> json $.systemd.units.2.name
        yaml $.storage.filesystems.0.with_mount_unit -> json $.systemd.units.2.enabled
        "###);
    }

    #[test]
    fn report_is_readdressed_to_closest_translation() {
        let mut translations = TranslationSet::default();
        translations.add(path!(Source, "storage", "trees", 1), path!(Target, "storage", "files", 3));
        translations.add(
            path!(Source, "storage", "files", 0, "contents", "local"),
            path!(Target, "storage", "files", 0, "contents", "source"),
        );

        let mut report = Report::default();
        report.add_error(path!(Target, "storage", "files", 3, "mode"), "bad mode");
        report.add_error(
            path!(Target, "storage", "files", 0, "contents", "source"),
            Error::FileType,
        );
        report.add_error(path!(Target, "passwd"), "untranslated");
        report.add_error(path!(Source, "variant"), "already a source path");

        let report = translations.translate_report(report);
        let contexts: Vec<_> = report.entries().iter().map(|e| e.context.clone()).collect();

        assert_eq!(
            contexts,
            vec![
                path!(Source, "storage", "trees", 1),
                path!(Source, "storage", "files", 0, "contents", "local"),
                path!(Target, "passwd"),
                path!(Source, "variant"),
            ]
        );
    }
}
