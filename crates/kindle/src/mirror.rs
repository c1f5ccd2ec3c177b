//! structural translation
//!
//! Each source type implements [Translate] by describing, field by field, how it maps onto its target type. The
//! field-by-field copying is done through a [Mirror], which records a [crate::translate::Translation] for every
//! value it writes and prunes everything that is unset. Types with domain logic (resources, trees, mount units)
//! implement [Translate] by hand instead of mirroring; the mirror then merges their results at the field's position.
//!
//! Provenance is sparse: a field that is absent in the source is absent in the target and has no translation.
use crate::options::TranslateOptions;
use crate::path::{Path, Segment};
use crate::report::Report;
use crate::translate::{Translated, TranslationSet};

/// "Is this value entirely default?"
pub trait IsZero {
    fn is_zero(&self) -> bool;
}

impl<T: Default + PartialEq> IsZero for T {
    fn is_zero(&self) -> bool {
        *self == T::default()
    }
}

/// Free function form of [IsZero::is_zero], usable with `#[serde(skip_serializing_if)]`
pub fn is_zero<T: IsZero>(value: &T) -> bool {
    value.is_zero()
}

/// Translation of a source type into its target type
///
/// Paths in the returned [TranslationSet] and [Report] are relative to the value being translated.
pub trait Translate {
    type Target: Default;

    fn translate(&self, options: &TranslateOptions) -> Translated<Self::Target>;
}

/// Accumulates translations and diagnostics for one structural step
#[derive(Debug, Default)]
pub struct Mirror {
    translations: TranslationSet,
    report: Report,
}

impl Mirror {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy a field that keeps its name
    pub fn copy<T: Clone + IsZero>(&mut self, key: &str, from: &T) -> T {
        self.rename(key, key, from)
    }

    /// Copy a field whose target name differs
    pub fn rename<T: Clone + IsZero>(&mut self, from_key: &str, to_key: &str, from: &T) -> T {
        if !from.is_zero() {
            self.translations
                .add(crate::path!(Source, from_key), crate::path!(Target, to_key));
        }
        from.clone()
    }

    /// Copy a list of scalars element by element
    pub fn copy_list<T: Clone>(&mut self, from_key: &str, to_key: &str, from: &[T]) -> Vec<T> {
        for index in 0..from.len() {
            self.translations.add(
                crate::path!(Source, from_key, index),
                crate::path!(Target, to_key, index),
            );
        }
        from.to_vec()
    }

    /// Translate a nested structure
    ///
    /// An all-default structure produces the default target and no provenance.
    pub fn nest<S: Translate + IsZero>(
        &mut self,
        from_key: &str,
        to_key: &str,
        from: &S,
        options: &TranslateOptions,
    ) -> S::Target {
        if from.is_zero() {
            return S::Target::default();
        }
        let translated = from.translate(options);
        self.splice(&[from_key.into()], &[to_key.into()], translated)
    }

    /// Translate an optional nested structure
    pub fn nest_opt<S: Translate>(
        &mut self,
        from_key: &str,
        to_key: &str,
        from: &Option<S>,
        options: &TranslateOptions,
    ) -> Option<S::Target> {
        let from = from.as_ref()?;
        self.translations
            .add(crate::path!(Source, from_key), crate::path!(Target, to_key));
        let translated = from.translate(options);
        Some(self.splice(&[from_key.into()], &[to_key.into()], translated))
    }

    /// Translate a list of structures element by element, preserving order
    pub fn each<S: Translate>(
        &mut self,
        from_key: &str,
        to_key: &str,
        from: &[S],
        options: &TranslateOptions,
    ) -> Vec<S::Target> {
        from.iter()
            .enumerate()
            .map(|(index, element)| {
                let translated = element.translate(options);
                self.splice(
                    &[from_key.into(), index.into()],
                    &[to_key.into(), index.into()],
                    translated,
                )
            })
            .collect()
    }

    /// Merge the result of a sub-translation placed at the given positions
    pub fn splice<T>(
        &mut self,
        from_prefix: &[Segment],
        to_prefix: &[Segment],
        (value, translations, report): Translated<T>,
    ) -> T {
        self.translations.merge_p2(from_prefix, to_prefix, translations);
        self.report.merge_p(from_prefix, report);
        value
    }

    /// Record a translation directly, paths relative to this step
    pub fn add(&mut self, from: Path, to: Path) {
        self.translations.add(from, to);
    }

    pub fn report_mut(&mut self) -> &mut Report {
        &mut self.report
    }

    pub fn finish<T>(self, value: T) -> Translated<T> {
        (value, self.translations, self.report)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::path;
    use pretty_assertions::assert_eq;

    #[derive(Debug, Default, Clone, PartialEq)]
    struct Inner {
        name: Option<String>,
    }

    #[derive(Debug, Default, Clone, PartialEq, serde::Serialize)]
    struct InnerTarget {
        #[serde(skip_serializing_if = "Option::is_none")]
        name: Option<String>,
    }

    impl Translate for Inner {
        type Target = InnerTarget;

        fn translate(&self, _: &TranslateOptions) -> Translated<InnerTarget> {
            let mut m = Mirror::new();
            let name = m.copy("name", &self.name);
            m.finish(InnerTarget { name })
        }
    }

    #[test]
    fn absent_fields_leave_no_provenance() {
        let mut m = Mirror::new();
        let mode: Option<i64> = m.copy("mode", &None);
        let path = m.copy("path", &String::new());
        let inner = m.nest("inner", "inner", &Inner::default(), &TranslateOptions::default());
        let (_, translations, report) = m.finish(());

        assert_eq!(mode, None);
        assert_eq!(path, "");
        assert_eq!(inner, InnerTarget::default());
        assert!(translations.is_empty());
        assert!(report.is_empty());
    }

    #[test]
    fn lists_keep_post_expansion_positions() {
        let inners = vec![
            Inner {
                name: Some("a".into()),
            },
            Inner::default(),
            Inner {
                name: Some("c".into()),
            },
        ];

        let mut m = Mirror::new();
        let out = m.each("entries", "entries", &inners, &TranslateOptions::default());
        let keys = m.copy_list("no_proxy", "noProxy", &["x".to_string()]);
        let (_, translations, _) = m.finish(());

        assert_eq!(out.len(), 3);
        assert_eq!(keys, vec!["x".to_string()]);
        assert_eq!(
            translations.iter().map(|t| t.to.clone()).collect::<Vec<_>>(),
            vec![
                path!(Target, "entries", 0, "name"),
                path!(Target, "entries", 2, "name"),
                path!(Target, "noProxy", 0),
            ]
        );
        assert_eq!(
            translations.get(&path!(Target, "entries", 2, "name")).map(|t| &t.from),
            Some(&path!(Source, "entries", 2, "name"))
        );
    }

    #[test]
    fn present_optional_structure_is_recorded() {
        let mut m = Mirror::new();
        let out = m.nest_opt(
            "clevis",
            "clevis",
            &Some(Inner::default()),
            &TranslateOptions::default(),
        );
        let (_, translations, _) = m.finish(());

        assert_eq!(out, Some(InnerTarget::default()));
        assert_eq!(
            translations.get(&path!(Target, "clevis")).map(|t| &t.from),
            Some(&path!(Source, "clevis"))
        );
    }
}
