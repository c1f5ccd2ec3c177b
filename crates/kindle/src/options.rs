//! per-invocation translation settings
use std::path::PathBuf;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TranslateOptions {
    /// Root directory for `local` resources and trees
    ///
    /// `None` disables both; references to local files are then reported as errors.
    pub files_dir: Option<PathBuf>,

    /// Always embed inline and local contents URL-escaped instead of picking the smallest encoding
    pub no_resource_auto_compression: bool,

    /// Print the resulting translation set and check its coverage
    pub debug_print_translations: bool,
}
