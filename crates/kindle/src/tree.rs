//! local directory trees
//!
//! A tree imports a directory below the files directory into the target filesystem. Regular files become
//! [target::File]s with their contents embedded, symlinks become [target::Link]s and directories only take part in
//! collision detection, since the target format creates parent directories implicitly.
//!
//! ### Collisions
//!
//! Destination paths are claimed by the author's declarations first, then by trees in order.
//!
//! - A declared file without contents is completed from a tree file at the same path (contents, and the mode if
//!   unset). The same goes for a declared link without a target and a tree symlink.
//! - Apart from that, declared files and links take precedence over tree nodes without complaint.
//! - A declared directory conflicts with any tree node that isn't a directory.
//! - A path claimed by one tree can't be claimed again by a later tree, unless both are directories.
//!
//! Conflicts are reported as [Error::NodeExists] at the later tree; the earlier claim is kept.
use crate::error::Error;
use crate::path;
use crate::report::Report;
use crate::resource::{make_data_url, DataUrl};
use crate::translate::TranslationSet;
use crate::{options::TranslateOptions, source, target, util};
use std::collections::BTreeMap;
use std::path::Path;
use walkdir::{DirEntry, WalkDir};

const MODE_EXECUTABLE: i64 = 0o755;
const MODE_DEFAULT: i64 = 0o644;

/// Where trees are placed when no path is given
const DEFAULT_TREE_PATH: &str = "/";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    File,
    Directory,
    Link,
}

/// Who holds a destination path
#[derive(Debug, Clone, Copy)]
enum Claim {
    /// declared by the author, `index` into the list of that kind
    Declared { kind: Kind, index: usize },
    /// created or completed by a tree
    Tree { kind: Kind },
}

/// A filesystem node found below a tree root
enum TreeEntry {
    Directory,
    File { contents: Vec<u8>, executable: bool },
    Symlink { target: String },
}

impl TreeEntry {
    fn kind(&self) -> Kind {
        match self {
            TreeEntry::Directory => Kind::Directory,
            TreeEntry::File { .. } => Kind::File,
            TreeEntry::Symlink { .. } => Kind::Link,
        }
    }
}

enum Expanded {
    File(target::File),
    Link(target::Link),
}

/// Expand `trees` into files and links of `storage`
///
/// Expects the declared files, directories and links to be translated already. Declared nodes keep their
/// positions; nodes created by trees are appended in ascending order of their destination path.
///
/// Paths in the result are relative to the storage section.
#[tracing::instrument(level = "debug", skip_all, fields(trees = trees.len()))]
pub fn expand(
    trees: &[source::Tree],
    storage: &mut target::Storage,
    options: &TranslateOptions,
) -> (TranslationSet, Report) {
    let mut expander = Expander::new(storage, options);

    for (index, tree) in trees.iter().enumerate() {
        if let Err(err) = expander.walk(index, tree) {
            expander.fail(index, err);
        }
    }

    expander.finish()
}

struct Expander<'a> {
    storage: &'a mut target::Storage,
    options: &'a TranslateOptions,
    claims: BTreeMap<String, Claim>,
    expanded: BTreeMap<String, (usize, Expanded)>,
    translations: TranslationSet,
    report: Report,
}

impl<'a> Expander<'a> {
    fn new(storage: &'a mut target::Storage, options: &'a TranslateOptions) -> Self {
        let mut claims = BTreeMap::new();
        let declared = storage
            .files
            .iter()
            .enumerate()
            .map(|(index, file)| (&file.path, Kind::File, index))
            .chain(
                storage
                    .directories
                    .iter()
                    .enumerate()
                    .map(|(index, directory)| (&directory.path, Kind::Directory, index)),
            )
            .chain(
                storage
                    .links
                    .iter()
                    .enumerate()
                    .map(|(index, link)| (&link.path, Kind::Link, index)),
            );
        for (path, kind, index) in declared {
            claims
                .entry(path.clone())
                .or_insert(Claim::Declared { kind, index });
        }

        Self {
            storage,
            options,
            claims,
            expanded: BTreeMap::new(),
            translations: TranslationSet::default(),
            report: Report::default(),
        }
    }

    fn fail(&mut self, tree: usize, err: Error) {
        self.report.add_error(path!(Source, "trees", tree), err);
    }

    fn walk(&mut self, tree_index: usize, tree: &source::Tree) -> Result<(), Error> {
        let root = util::resolve_in_files_dir(self.options, &tree.local)?;
        let metadata = std::fs::metadata(&root).map_err(|e| Error::io("stat", &root, e))?;
        if !metadata.is_dir() {
            return Err(Error::TreeNotDirectory);
        }
        let base = tree.path.as_deref().unwrap_or(DEFAULT_TREE_PATH);
        tracing::debug!(root=%root.display(), base, "walking tree");

        let mut walker = WalkDir::new(&root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter();
        while let Some(entry) = walker.next() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    self.fail(tree_index, walk_error(err));
                    continue;
                }
            };
            if entry.depth() == 0 {
                continue;
            }
            let Ok(relative) = entry.path().strip_prefix(&root) else {
                continue;
            };
            let destination = destination(base, relative);

            match read_entry(&entry) {
                Ok(found) => {
                    let directory = found.kind() == Kind::Directory;
                    if !self.place(tree_index, destination, found) && directory {
                        walker.skip_current_dir();
                    }
                }
                Err(Error::FileType) => return Err(Error::FileType),
                Err(err) => self.fail(tree_index, err),
            }
        }

        Ok(())
    }

    /// Claim `destination` for a found node, returns whether the node was taken
    ///
    /// A directory that isn't taken must not contribute its contents either.
    fn place(&mut self, tree: usize, destination: String, found: TreeEntry) -> bool {
        let kind = found.kind();
        match self.claims.get(&destination).copied() {
            None => {
                self.claims.insert(destination.clone(), Claim::Tree { kind });
                self.create(tree, destination, found);
                true
            }
            Some(Claim::Tree {
                kind: Kind::Directory,
            }) if kind == Kind::Directory => true,
            Some(Claim::Tree { .. }) => {
                self.collision(tree, &destination);
                false
            }
            Some(Claim::Declared {
                kind: Kind::Directory,
                ..
            }) => {
                if kind != Kind::Directory {
                    self.collision(tree, &destination);
                    return false;
                }
                true
            }
            Some(Claim::Declared { kind: declared, index }) if declared == kind => {
                let completed = self.complete(tree, index, found);
                if completed {
                    self.claims.insert(destination, Claim::Tree { kind });
                } else {
                    tracing::debug!(%destination, "declared node takes precedence");
                }
                completed
            }
            Some(Claim::Declared { .. }) => {
                tracing::debug!(%destination, "declared node takes precedence");
                false
            }
        }
    }

    fn collision(&mut self, tree: usize, destination: &str) {
        tracing::debug!(tree, destination, "node exists");
        self.fail(tree, Error::NodeExists);
    }

    fn create(&mut self, tree: usize, destination: String, found: TreeEntry) {
        let node = match found {
            TreeEntry::Directory => return,
            TreeEntry::File {
                contents,
                executable,
            } => {
                let DataUrl { url, compression } =
                    match make_data_url(&contents, None, self.options) {
                        Ok(encoded) => encoded,
                        Err(err) => return self.fail(tree, err),
                    };
                Expanded::File(target::File {
                    path: destination.clone(),
                    contents: target::Resource {
                        source: Some(url),
                        compression,
                        ..Default::default()
                    },
                    mode: Some(mode(executable)),
                    ..Default::default()
                })
            }
            TreeEntry::Symlink { target } => Expanded::Link(target::Link {
                path: destination.clone(),
                target,
                ..Default::default()
            }),
        };
        self.expanded.insert(destination, (tree, node));
    }

    /// Fill in what the author left out of a declared node, returns whether anything was filled
    fn complete(&mut self, tree: usize, index: usize, found: TreeEntry) -> bool {
        let from = path!(Source, "trees", tree);
        match found {
            TreeEntry::File {
                contents,
                executable,
            } => {
                let Some(file) = self.storage.files.get_mut(index) else {
                    return false;
                };
                if file.contents.source.is_some() {
                    return false;
                }
                match make_data_url(&contents, file.contents.compression.as_deref(), self.options) {
                    Ok(DataUrl { url, compression }) => {
                        file.contents.source = Some(url);
                        self.translations
                            .add(from.clone(), path!(Target, "files", index, "contents", "source"));
                        if let Some(compression) = compression {
                            file.contents.compression = Some(compression);
                            self.translations.add(
                                from.clone(),
                                path!(Target, "files", index, "contents", "compression"),
                            );
                        }
                    }
                    Err(err) => self.report.add_error(from.clone(), err),
                }
                if file.mode.is_none() {
                    file.mode = Some(mode(executable));
                    self.translations
                        .add(from, path!(Target, "files", index, "mode"));
                }
                true
            }
            TreeEntry::Symlink { target } => {
                let Some(link) = self.storage.links.get_mut(index) else {
                    return false;
                };
                if !link.target.is_empty() {
                    return false;
                }
                link.target = target;
                self.translations
                    .add(from, path!(Target, "links", index, "target"));
                true
            }
            TreeEntry::Directory => false,
        }
    }

    fn finish(mut self) -> (TranslationSet, Report) {
        for (_, (tree, node)) in std::mem::take(&mut self.expanded) {
            let from = path!(Source, "trees", tree);
            match node {
                Expanded::File(file) => {
                    let to = path!(Target, "files", self.storage.files.len());
                    self.translations.add_from_common_source(&from, &to, &file);
                    self.storage.files.push(file);
                }
                Expanded::Link(link) => {
                    let to = path!(Target, "links", self.storage.links.len());
                    self.translations.add_from_common_source(&from, &to, &link);
                    self.storage.links.push(link);
                }
            }
        }
        (self.translations, self.report)
    }
}

fn read_entry(entry: &DirEntry) -> Result<TreeEntry, Error> {
    let file_type = entry.file_type();

    if file_type.is_dir() {
        Ok(TreeEntry::Directory)
    } else if file_type.is_symlink() {
        let target =
            std::fs::read_link(entry.path()).map_err(|e| Error::io("readlink", entry.path(), e))?;
        Ok(TreeEntry::Symlink {
            target: target.to_string_lossy().into_owned(),
        })
    } else if file_type.is_file() {
        let metadata = entry.metadata().map_err(walk_error)?;
        let contents = util::read(entry.path())?;
        Ok(TreeEntry::File {
            contents,
            executable: is_executable(&metadata),
        })
    } else {
        Err(Error::FileType)
    }
}

fn walk_error(err: walkdir::Error) -> Error {
    let path = err.path().map(Path::to_path_buf).unwrap_or_default();
    Error::io("open", path, err.into())
}

fn destination(base: &str, relative: &Path) -> String {
    let mut destination = base.trim_end_matches('/').to_string();
    for component in relative.components() {
        destination.push('/');
        destination.push_str(&component.as_os_str().to_string_lossy());
    }
    destination
}

fn mode(executable: bool) -> i64 {
    if executable {
        MODE_EXECUTABLE
    } else {
        MODE_DEFAULT
    }
}

#[cfg(unix)]
fn is_executable(metadata: &std::fs::Metadata) -> bool {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode() & 0o111 != 0
}

#[cfg(not(unix))]
fn is_executable(_: &std::fs::Metadata) -> bool {
    false
}
