//! addresses into either document tree
//!
//! A [Path] is a list of [Segment]s (field keys and list indices) plus a [Tag] naming the document it points into.
//! Source paths use the authored (YAML) field names, target paths use the generated (JSON) field names.
use std::fmt::{Display, Formatter};

/// Which document a [Path] addresses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Tag {
    /// the authored document
    Source,
    /// the generated document
    Target,
}

impl Display for Tag {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Tag::Source => f.write_str("yaml"),
            Tag::Target => f.write_str("json"),
        }
    }
}

/// A single step of a [Path]
///
/// Keys order before indices, indices order numerically.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Segment {
    Key(String),
    Index(usize),
}

impl From<&str> for Segment {
    fn from(value: &str) -> Self {
        Segment::Key(value.to_string())
    }
}

impl From<String> for Segment {
    fn from(value: String) -> Self {
        Segment::Key(value)
    }
}

impl From<usize> for Segment {
    fn from(value: usize) -> Self {
        Segment::Index(value)
    }
}

impl Display for Segment {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Segment::Key(key) => f.write_str(key),
            Segment::Index(index) => write!(f, "{index}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Path {
    tag: Tag,
    segments: Vec<Segment>,
}

impl Path {
    pub fn new(tag: Tag, segments: Vec<Segment>) -> Self {
        Self { tag, segments }
    }

    /// The document root
    pub fn root(tag: Tag) -> Self {
        Self::new(tag, vec![])
    }

    pub fn tag(&self) -> Tag {
        self.tag
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns a copy extended by one segment
    pub fn append(&self, segment: impl Into<Segment>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment.into());
        Self::new(self.tag, segments)
    }

    /// Returns `self` followed by all segments of `other`
    ///
    /// The tag of `self` is kept.
    pub fn join(&self, other: &Path) -> Self {
        let mut segments = self.segments.clone();
        segments.extend(other.segments.iter().cloned());
        Self::new(self.tag, segments)
    }

    /// Returns the parent path or `None` for the root
    pub fn parent(&self) -> Option<Self> {
        let (_, head) = self.segments.split_last()?;
        Some(Self::new(self.tag, head.to_vec()))
    }

    /// `true` when `prefix` is `self` or one of its ancestors (same document only)
    pub fn starts_with(&self, prefix: &Path) -> bool {
        self.tag == prefix.tag && self.segments.starts_with(&prefix.segments)
    }
}

impl Display for Path {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("$")?;
        for segment in &self.segments {
            write!(f, ".{segment}")?;
        }
        Ok(())
    }
}

/// Utility macro to create a [Path]
///
/// ```
/// # use kindle::path;
/// let source = path!(Source, "storage", "trees", 0);
/// assert_eq!(source.to_string(), "$.storage.trees.0");
///
/// let root = path!(Target);
/// assert!(root.is_empty());
/// ```
#[macro_export]
macro_rules! path {
    ($tag:ident $(, $segment:expr)* $(,)?) => {
        $crate::path::Path::new(
            $crate::path::Tag::$tag,
            vec![$($crate::path::Segment::from($segment)),*],
        )
    };
}
