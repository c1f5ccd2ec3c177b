//! kindle cli interface

use clap::Parser;
use kindle::TranslateOptions;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Change the work directory
    ///
    /// Can be specified multiple times. Note that all
    /// paths on the way to the final path must exist.
    ///
    /// This is equivalent to running { cd <directory>; kindle ... }
    #[clap(short = 'C', long = "directory")]
    pub directory: Vec<PathBuf>,

    /// Document to translate
    ///
    /// Reads from stdin if omitted
    pub input: Option<PathBuf>,

    /// Write the translated document to a file instead of stdout
    #[clap(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Directory that local files and trees are relative to
    ///
    /// Without it, documents referring to local files are rejected.
    #[clap(short = 'd', long = "files-dir")]
    pub files_dir: Option<PathBuf>,

    /// Embed contents URL-escaped instead of picking the smallest encoding
    #[clap(long = "no-resource-auto-compression")]
    pub no_resource_auto_compression: bool,

    /// Pretty-print the translated document
    #[clap(short = 'p', long = "pretty")]
    pub pretty: bool,

    /// Fail on warnings too
    #[clap(short = 's', long = "strict")]
    pub strict: bool,

    /// Print the translation set to stderr and check that it covers the output
    #[clap(long = "debug")]
    pub debug: bool,
}

impl Cli {
    pub fn translate_options(&self) -> TranslateOptions {
        TranslateOptions {
            files_dir: self.files_dir.clone(),
            no_resource_auto_compression: self.no_resource_auto_compression,
            debug_print_translations: self.debug,
        }
    }
}
