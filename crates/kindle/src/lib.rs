//! # kindle - provisioning config translation
//!
//! Translates a human-authored provisioning document (YAML) into the machine-consumed first-boot format (JSON).
//!
//! ## Introduction for developers
//!
//! Read this to understand how `kindle` works internally.
//!
//! ### Two documents
//!
//! - the **source** document is what users write, see [source]
//! - the **target** document is what we generate, see [target]
//!
//! The target format is more verbose and less convenient: there is no inline or local content, no directory trees and
//! no mount unit generation. The translation resolves all of these into plain target vocabulary.
//!
//! Locations in either document are addressed by a [path::Path]:
//!
//! ```
//! # use kindle::path;
//! let source = path!(Source, "storage", "files", 0, "contents", "inline");
//! assert_eq!(source.to_string(), "$.storage.files.0.contents.inline");
//! ```
//!
//! ### Provenance
//!
//! Every step of the translation returns a triple ([translate::Translated]):
//!
//! - the translated value
//! - a [translate::TranslationSet], recording for each value written which source location it came from
//! - a [report::Report] with diagnostics addressed to source locations
//!
//! Steps translate their part relative to their own position; the caller splices the result in, prefixing all paths
//! with the position it was placed at (see [mirror::Mirror::splice]).
//!
//! The translation set is what makes diagnostics about the generated document useful: a validator complaining about
//! `$.storage.files.3.contents.source` can be redirected to `$.storage.trees.0`, which is where that file came from
//! ([translate::TranslationSet::translate_report]).
//!
//! Every populated value of the target document must be explained by some translation. This is checked by
//! [translate::TranslationSet::debug_verify_coverage] in tests and with `--debug`.
//!
//! ### Structural translation
//!
//! Most of the schema maps field by field. Each source type implements [mirror::Translate] using a [mirror::Mirror],
//! which copies fields and records a translation for each one that is set. Unset fields leave no trace.
//!
//! ### Domain translators
//!
//! Three parts do real work:
//!
//! - [resource] turns inline and local content into `data:` URLs, choosing between URL-escaping, base64 and gzip
//! - [tree] walks local directories and merges the found nodes with the declared ones
//! - [mount_unit] writes `.mount` units for filesystems that ask for one
//!
//! ### Errors
//!
//! User errors ([Error]) never abort the translation. They are recorded at the source location that caused them and
//! translation continues with the next field. A document is rejected if its report contains any error.
//!
pub mod config;
mod error;
pub mod mirror;
pub mod mount_unit;
pub mod options;
pub mod path;
pub mod report;
pub mod resource;
pub mod source;
pub mod target;
pub mod translate;
pub mod tree;
mod util;
mod visit;

pub use error::Error;
pub use options::TranslateOptions;
