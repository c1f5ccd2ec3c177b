//! translation errors
//!
//! None of these abort a translation. They are recorded in a [crate::report::Report] at the source path of the
//! field that caused them and translation carries on with the next field.
use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("local file paths are relative to a files directory that must be specified with -d/--files-dir")]
    NoFilesDir,
    #[error("local file path traverses outside the files directory")]
    FilesDirEscape,
    #[error("trees may only contain files, directories, and symlinks")]
    FileType,
    #[error("matching filesystem node has existing contents or different type")]
    NodeExists,
    #[error("root of tree must be a directory")]
    TreeNotDirectory,
    #[error("{op} {}: {source}", path.display())]
    Io {
        op: &'static str,
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("compressing contents: {0}")]
    Compress(#[source] std::io::Error),
}

impl Error {
    pub(crate) fn io(op: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            op,
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn io_error_names_operation_and_path() {
        let err = Error::io(
            "open",
            "/srv/files/missing",
            std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        );
        assert_eq!(err.to_string(), "open /srv/files/missing: no such file");
    }
}
