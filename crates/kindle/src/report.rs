//! diagnostics addressed to document paths
use crate::path::{Path, Segment};
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl Display for Severity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => f.write_str("error"),
            Severity::Warning => f.write_str("warning"),
            Severity::Info => f.write_str("info"),
        }
    }
}

#[derive(derive_new::new, Debug, Clone, PartialEq)]
pub struct Entry {
    pub severity: Severity,
    pub context: Path,
    pub message: String,
}

impl Display for Entry {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at {}: {}", self.severity, self.context, self.message)
    }
}

/// Ordered list of diagnostics
///
/// An empty report means success. Order is insertion order until [Report::sort] is called.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Report {
    entries: Vec<Entry>,
}

impl Report {
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `true` if any entry is an error
    pub fn is_fatal(&self) -> bool {
        self.entries
            .iter()
            .any(|entry| entry.severity == Severity::Error)
    }

    pub fn add(&mut self, entry: Entry) {
        tracing::debug!(%entry, "report entry");
        self.entries.push(entry);
    }

    pub fn add_error(&mut self, context: Path, error: impl Display) {
        self.add(Entry::new(Severity::Error, context, error.to_string()));
    }

    pub fn add_warning(&mut self, context: Path, message: impl Display) {
        self.add(Entry::new(Severity::Warning, context, message.to_string()));
    }

    pub fn add_info(&mut self, context: Path, message: impl Display) {
        self.add(Entry::new(Severity::Info, context, message.to_string()));
    }

    pub fn merge(&mut self, other: Report) {
        self.entries.extend(other.entries);
    }

    /// Merge `other`, whose paths are relative to `prefix`
    pub fn merge_p(&mut self, prefix: &[Segment], other: Report) {
        for mut entry in other.entries {
            let mut segments = prefix.to_vec();
            segments.extend(entry.context.segments().iter().cloned());
            entry.context = Path::new(entry.context.tag(), segments);
            self.entries.push(entry);
        }
    }

    /// Stable sort by path
    pub fn sort(&mut self) {
        self.entries.sort_by(|a, b| a.context.cmp(&b.context));
    }

    pub(crate) fn entries_mut(&mut self) -> &mut [Entry] {
        &mut self.entries
    }
}

impl Display for Report {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for entry in &self.entries {
            writeln!(f, "{entry}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::error::Error;
    use crate::path;
    use pretty_assertions::assert_eq;

    #[test]
    fn merge_p_prefixes_context() {
        let mut inner = Report::default();
        inner.add_error(path!(Source, "contents", "local"), Error::NoFilesDir);

        let mut outer = Report::default();
        outer.merge_p(&["storage".into(), "files".into(), 2.into()], inner);

        assert_eq!(
            outer.entries()[0].context,
            path!(Source, "storage", "files", 2, "contents", "local")
        );
        assert!(outer.is_fatal());
    }

    #[test]
    fn warnings_are_not_fatal() {
        let mut report = Report::default();
        report.add_warning(path!(Source, "systemd"), "unused");
        report.add_info(path!(Source), "note");

        assert!(!report.is_empty());
        assert!(!report.is_fatal());
    }

    #[test]
    fn sort_is_stable_and_numeric() {
        let mut report = Report::default();
        report.add_error(path!(Source, "storage", "trees", 10), Error::NodeExists);
        report.add_error(path!(Source, "storage", "trees", 2), "first");
        report.add_error(path!(Source, "storage", "trees", 2), "second");

        report.sort();

        insta::assert_snapshot!(report.to_string(), @r###"
        error at $.storage.trees.2: first
        error at $.storage.trees.2: second
        error at $.storage.trees.10: matching filesystem node has existing contents or different type
        "###);
    }
}
