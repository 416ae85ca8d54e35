//! Filesystem access behind a trait.
//!
//! [`DirectoryModel`](super::DirectoryModel) never touches `std::fs`
//! directly; it goes through a [`FileSystem`] so listings can come from any
//! source. [`LocalFileSystem`] is the real one.

use std::fs;
use std::path::{Path, PathBuf};

use super::error::{FileError, FileResult};

/// One child of a listed directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DirectoryEntry {
    /// Full path of the entry.
    pub path: PathBuf,
    /// File name (last path component).
    pub name: String,
    /// Whether the entry is a directory.
    pub is_directory: bool,
    /// Whether the entry is hidden.
    pub is_hidden: bool,
}

impl DirectoryEntry {
    /// Describe a file.
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::new(path.into(), false)
    }

    /// Describe a directory.
    pub fn directory(path: impl Into<PathBuf>) -> Self {
        Self::new(path.into(), true)
    }

    fn new(path: PathBuf, is_directory: bool) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let is_hidden = is_hidden_name(&name);
        Self {
            path,
            name,
            is_directory,
            is_hidden,
        }
    }
}

/// Hidden files are those whose name starts with a dot.
pub fn is_hidden_name(name: &str) -> bool {
    name.starts_with('.')
}

/// Directory listing and renaming.
pub trait FileSystem: Send + Sync {
    /// Check if `path` is an existing directory.
    fn is_directory(&self, path: &Path) -> bool;

    /// List the children of `dir` in enumeration order.
    ///
    /// Hidden entries are skipped unless `show_hidden` is set.
    fn list_children(&self, dir: &Path, show_hidden: bool) -> FileResult<Vec<DirectoryEntry>>;

    /// Check if `dir` can be navigated into.
    fn is_traversable(&self, dir: &Path) -> bool;

    /// Rename `from` to `to`. An existing `to` is an error.
    fn rename(&self, from: &Path, to: &Path) -> FileResult<()>;
}

/// [`FileSystem`] backed by the local disk.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalFileSystem;

impl LocalFileSystem {
    /// Create a local filesystem handle.
    pub fn new() -> Self {
        Self
    }
}

impl FileSystem for LocalFileSystem {
    fn is_directory(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn list_children(&self, dir: &Path, show_hidden: bool) -> FileResult<Vec<DirectoryEntry>> {
        let read = fs::read_dir(dir).map_err(|e| FileError::from_io(e, dir))?;

        let mut entries = Vec::new();
        for entry in read {
            let entry = entry.map_err(|e| FileError::from_io(e, dir))?;
            let path = entry.path();
            // Follow symlinks so a link to a directory lists as a directory.
            let is_directory = path.is_dir();
            let entry = if is_directory {
                DirectoryEntry::directory(path)
            } else {
                DirectoryEntry::file(path)
            };
            if entry.is_hidden && !show_hidden {
                continue;
            }
            entries.push(entry);
        }
        Ok(entries)
    }

    fn is_traversable(&self, dir: &Path) -> bool {
        fs::read_dir(dir).is_ok()
    }

    fn rename(&self, from: &Path, to: &Path) -> FileResult<()> {
        if !from.exists() {
            return Err(FileError::not_found(from));
        }
        if to.exists() {
            return Err(FileError::already_exists(to));
        }
        fs::rename(from, to).map_err(|e| FileError::from_io(e, from))
    }
}
