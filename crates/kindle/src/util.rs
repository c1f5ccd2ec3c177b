use crate::error::Error;
use crate::options::TranslateOptions;
use path_clean::PathClean;
use std::path::{Path, PathBuf};

/// Resolve `relative` inside the files directory
///
/// The joined path is cleaned and must stay at or below the (cleaned, absolute) files directory. Absolute
/// `relative` paths replace the base when joined and are rejected the same way. If the path exists, its canonical
/// form must also stay below the canonical files directory, so symlinks can't point out of it. Nothing is read.
pub(crate) fn resolve_in_files_dir(
    options: &TranslateOptions,
    relative: &str,
) -> Result<PathBuf, Error> {
    let files_dir = options.files_dir.as_deref().ok_or(Error::NoFilesDir)?;
    let base = absolute(files_dir)?;

    let resolved = base.join(Path::new(relative)).clean();
    if !resolved.starts_with(&base) {
        tracing::debug!(base=%base.display(), resolved=%resolved.display(), "escapes files directory");
        return Err(Error::FilesDirEscape);
    }

    // missing paths fail later, when they are opened
    if let Ok(canonical) = resolved.canonicalize() {
        let canonical_base = base.canonicalize().map_err(|e| Error::io("stat", &base, e))?;
        if !canonical.starts_with(&canonical_base) {
            tracing::debug!(
                base=%canonical_base.display(),
                resolved=%canonical.display(),
                "links out of files directory"
            );
            return Err(Error::FilesDirEscape);
        }
    }

    Ok(resolved)
}

fn absolute(path: &Path) -> Result<PathBuf, Error> {
    if path.is_absolute() {
        return Ok(path.to_path_buf().clean());
    }
    let cwd = std::env::current_dir().map_err(|e| Error::io("getcwd", path, e))?;
    Ok(cwd.join(path).clean())
}

/// Read a whole file, naming the file in the error
pub(crate) fn read(path: &Path) -> Result<Vec<u8>, Error> {
    std::fs::read(path).map_err(|e| Error::io("open", path, e))
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    fn options(files_dir: &str) -> TranslateOptions {
        TranslateOptions {
            files_dir: Some(files_dir.into()),
            ..Default::default()
        }
    }

    #[test]
    fn resolves_below_files_dir() {
        let resolved = resolve_in_files_dir(&options("/srv/files"), "subdir/../file-1").unwrap();
        assert_eq!(resolved, PathBuf::from("/srv/files/file-1"));

        let root = resolve_in_files_dir(&options("/srv/files/"), ".").unwrap();
        assert_eq!(root, PathBuf::from("/srv/files"));
    }

    #[test]
    fn rejects_escapes() {
        for relative in ["../file-1", "subdir/../../file-1", "/etc/passwd", "../files-sibling"] {
            assert!(
                matches!(
                    resolve_in_files_dir(&options("/srv/files"), relative),
                    Err(Error::FilesDirEscape)
                ),
                "{relative} must not resolve"
            );
        }
    }

    #[cfg(unix)]
    #[test]
    fn rejects_links_out_of_files_dir() {
        let outside = tempfile::TempDir::new().unwrap();
        std::fs::write(outside.path().join("secret"), "secret").unwrap();
        let files_dir = tempfile::TempDir::new().unwrap();
        std::fs::write(files_dir.path().join("file-1"), "file contents\n").unwrap();
        std::os::unix::fs::symlink(outside.path().join("secret"), files_dir.path().join("link"))
            .unwrap();
        std::os::unix::fs::symlink(outside.path(), files_dir.path().join("dir-link")).unwrap();
        std::os::unix::fs::symlink("file-1", files_dir.path().join("inner-link")).unwrap();

        let options = options(files_dir.path().to_str().unwrap());
        for relative in ["link", "dir-link", "dir-link/secret"] {
            assert!(
                matches!(
                    resolve_in_files_dir(&options, relative),
                    Err(Error::FilesDirEscape)
                ),
                "{relative} must not resolve"
            );
        }

        let inner = resolve_in_files_dir(&options, "inner-link").unwrap();
        assert_eq!(read(&inner).unwrap(), b"file contents\n");
    }

    #[test]
    fn requires_files_dir() {
        assert!(matches!(
            resolve_in_files_dir(&TranslateOptions::default(), "file-1"),
            Err(Error::NoFilesDir)
        ));
    }
}
