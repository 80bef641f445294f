use std::ffi::OsString;
use std::fs;
use std::path::Path;

use walkdir::{DirEntry, WalkDir};

use crate::error::{walk_error, IoResultExt, Result};
use crate::layout::DOT_BAGIT_DIR;

/// depth-first walk over a payload tree
///
/// the `.bagit` tag directory is never descended into. hidden entries
/// (dot files and dot directories) are skipped when `ignore_hidden` is set.
#[derive(Clone, Debug)]
pub struct TreeWalk<'a> {
    root: &'a Path,
    ignore_hidden: bool,
}

impl<'a> TreeWalk<'a> {
    pub fn new(root: &'a Path) -> Self {
        Self {
            root,
            ignore_hidden: false,
        }
    }

    pub fn ignore_hidden(mut self, ignore: bool) -> Self {
        self.ignore_hidden = ignore;
        self
    }

    /// call `on_file` with the path and size of every regular file
    pub fn files<F>(&self, on_file: F) -> Result<()>
    where
        F: FnMut(&Path, u64) -> Result<()>,
    {
        self.run(|_| Ok(()), on_file)
    }

    /// call `on_dir` for every directory below the root and `on_file` for
    /// every regular file (symlinks to files count as files)
    pub fn run<D, F>(&self, mut on_dir: D, mut on_file: F) -> Result<()>
    where
        D: FnMut(&Path) -> Result<()>,
        F: FnMut(&Path, u64) -> Result<()>,
    {
        let walker = WalkDir::new(self.root)
            .min_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !self.skip(e));

        for entry in walker {
            let entry = entry.map_err(|e| walk_error(self.root, e))?;
            let path = entry.path();
            let file_type = entry.file_type();

            if file_type.is_dir() {
                on_dir(path)?;
            } else if file_type.is_file() {
                let size = entry.metadata().map_err(|e| walk_error(self.root, e))?.len();
                on_file(path, size)?;
            } else if file_type.is_symlink() {
                // dangling links are neither files nor directories
                if let Ok(meta) = fs::metadata(path) {
                    if meta.is_file() {
                        on_file(path, meta.len())?;
                    }
                }
            }
        }

        Ok(())
    }

    fn skip(&self, entry: &DirEntry) -> bool {
        let name = entry.file_name();
        if entry.file_type().is_dir() && name == DOT_BAGIT_DIR {
            tracing::debug!("skipping tag directory {}", entry.path().display());
            return true;
        }
        if self.ignore_hidden && is_hidden(&name.to_string_lossy()) {
            tracing::debug!("skipping hidden entry {}", entry.path().display());
            return true;
        }
        false
    }
}

/// unix convention: a leading dot hides an entry
pub fn is_hidden(file_name: &str) -> bool {
    file_name.starts_with('.') && file_name != "." && file_name != ".."
}

/// list the raw entry names of a directory
pub(crate) fn dir_entry_names(dir: &Path) -> Result<Vec<OsString>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(dir).with_path(dir)? {
        let entry = entry.with_path(dir)?;
        names.push(entry.file_name());
    }
    Ok(names)
}
