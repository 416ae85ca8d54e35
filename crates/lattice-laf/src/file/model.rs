//! Cached directory listing for file choosers.
//!
//! [`DirectoryModel`] holds the filtered children of the current directory.
//! Every [`validate`](DirectoryModel::validate) pass rebuilds the listing
//! from scratch:
//!
//! 1. The cache is cleared.
//! 2. Children are enumerated through the [`FileSystem`], honouring the
//!    hidden-file setting. A missing directory or a failed enumeration
//!    yields an empty listing.
//! 3. Entries are kept if they are directories the user may select or
//!    navigate into, or files while file selection is enabled, and the
//!    active [`FileFilter`] accepts them.
//! 4. Duplicate paths are dropped, keeping the first.
//! 5. Directories move ahead of files; enumeration order is preserved within
//!    each group.
//!
//! The new listing replaces the cache and
//! [`contents_replaced`](DirectoryModel::contents_replaced) fires exactly
//! once per pass, including passes that produce nothing.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use lattice_laf_core::logging::{span_names, targets};
use lattice_laf_core::{PerfSpan, Signal, ThreadAffinity};

use super::filter::FileFilter;
use super::system::{DirectoryEntry, FileSystem, LocalFileSystem};

/// What a file chooser lets the user pick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileSelectionMode {
    /// Only files can be selected.
    #[default]
    FilesOnly,
    /// Only directories can be selected.
    DirectoriesOnly,
    /// Both files and directories can be selected.
    FilesAndDirectories,
}

impl FileSelectionMode {
    /// Check if files can be selected.
    pub fn files_enabled(self) -> bool {
        matches!(self, Self::FilesOnly | Self::FilesAndDirectories)
    }

    /// Check if directories can be selected.
    pub fn directories_enabled(self) -> bool {
        matches!(self, Self::DirectoriesOnly | Self::FilesAndDirectories)
    }
}

/// Inputs of a validation pass.
#[derive(Debug, Clone, Default)]
pub struct ListingOptions {
    /// Directory to list.
    pub directory: Option<PathBuf>,
    /// Active filter, if any.
    pub filter: Option<FileFilter>,
    /// Selection mode.
    pub selection_mode: FileSelectionMode,
    /// Include hidden entries.
    pub show_hidden: bool,
}

/// Cached, filtered listing of one directory.
pub struct DirectoryModel {
    fs: Arc<dyn FileSystem>,
    options: RwLock<ListingOptions>,
    entries: RwLock<Vec<DirectoryEntry>>,
    affinity: ThreadAffinity,

    /// Emitted with the new listing after every validation pass.
    pub contents_replaced: Signal<Vec<DirectoryEntry>>,

    /// Emitted with `(old, new)` after a successful rename.
    pub renamed: Signal<(PathBuf, PathBuf)>,
}

impl DirectoryModel {
    /// Create an empty model over `fs`.
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self {
            fs,
            options: RwLock::new(ListingOptions::default()),
            entries: RwLock::new(Vec::new()),
            affinity: ThreadAffinity::current(),
            contents_replaced: Signal::new(),
            renamed: Signal::new(),
        }
    }

    /// Create an empty model over the local filesystem.
    pub fn local() -> Self {
        Self::new(Arc::new(LocalFileSystem::new()))
    }

    /// Switch UI-thread checks for this model on or off.
    ///
    /// The creating thread is the only one allowed to validate or rename.
    pub fn with_thread_checks(mut self, enabled: bool) -> Self {
        self.affinity = self.affinity.with_checks_enabled(enabled);
        self
    }

    /// Replace the listing options. Does not revalidate.
    pub fn with_options(self, options: ListingOptions) -> Self {
        *self.options.write() = options;
        self
    }

    // =========================================================================
    // Options
    // =========================================================================

    /// A copy of the current listing options.
    pub fn options(&self) -> ListingOptions {
        self.options.read().clone()
    }

    /// The directory being listed.
    pub fn directory(&self) -> Option<PathBuf> {
        self.options.read().directory.clone()
    }

    /// Set the directory to list. Does not revalidate.
    pub fn set_directory(&self, directory: Option<PathBuf>) {
        self.options.write().directory = directory;
    }

    /// Set the filter. Does not revalidate.
    pub fn set_filter(&self, filter: Option<FileFilter>) {
        self.options.write().filter = filter;
    }

    /// Set the selection mode. Does not revalidate.
    pub fn set_selection_mode(&self, mode: FileSelectionMode) {
        self.options.write().selection_mode = mode;
    }

    /// Set hidden-file visibility. Does not revalidate.
    pub fn set_show_hidden(&self, show_hidden: bool) {
        self.options.write().show_hidden = show_hidden;
    }

    // =========================================================================
    // Listing
    // =========================================================================

    /// A snapshot of the cached listing.
    pub fn entries(&self) -> Vec<DirectoryEntry> {
        self.entries.read().clone()
    }

    /// Paths of the cached listing, in order.
    pub fn paths(&self) -> Vec<PathBuf> {
        self.entries.read().iter().map(|e| e.path.clone()).collect()
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Check if the cached listing is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Check if `path` is in the cached listing.
    pub fn contains(&self, path: &Path) -> bool {
        self.entries.read().iter().any(|e| e.path == path)
    }

    /// Rebuild the listing and emit `contents_replaced` once.
    pub fn validate(&self) {
        self.affinity.debug_assert_same_thread();
        let _span = PerfSpan::new(span_names::DIRECTORY_SCAN);

        self.entries.write().clear();
        let options = self.options();
        let listing = self.scan(&options);

        tracing::debug!(
            target: targets::DIRECTORY,
            directory = ?options.directory,
            count = listing.len(),
            "directory listing replaced"
        );
        *self.entries.write() = listing.clone();
        self.contents_replaced.emit(listing);
    }

    /// Hook for dropping cached state ahead of the next validation.
    ///
    /// The listing is always rebuilt in full, so there is nothing to drop.
    pub fn invalidate(&self) {
        tracing::trace!(target: targets::DIRECTORY, "directory listing invalidated");
    }

    /// Rename `old` to `new` and revalidate.
    ///
    /// Returns `false`, leaving the listing untouched, if the rename failed.
    pub fn rename(&self, old: &Path, new: &Path) -> bool {
        self.affinity.debug_assert_same_thread();
        if let Err(err) = self.fs.rename(old, new) {
            tracing::warn!(target: targets::DIRECTORY, %err, ?old, ?new, "rename failed");
            return false;
        }

        tracing::debug!(target: targets::DIRECTORY, ?old, ?new, "renamed");
        self.validate();
        self.renamed.emit((old.to_path_buf(), new.to_path_buf()));
        true
    }

    fn scan(&self, options: &ListingOptions) -> Vec<DirectoryEntry> {
        let Some(dir) = options.directory.as_deref() else {
            return Vec::new();
        };
        if !self.fs.is_directory(dir) {
            tracing::debug!(target: targets::DIRECTORY, ?dir, "not a directory");
            return Vec::new();
        }

        let children = match self.fs.list_children(dir, options.show_hidden) {
            Ok(children) => children,
            Err(err) => {
                tracing::warn!(target: targets::DIRECTORY, %err, "directory enumeration failed");
                return Vec::new();
            }
        };

        let mode = options.selection_mode;
        let mut seen = HashSet::new();
        let (mut directories, files): (Vec<_>, Vec<_>) = children
            .into_iter()
            .filter(|entry| {
                let selectable = if entry.is_directory {
                    mode.directories_enabled() || self.fs.is_traversable(&entry.path)
                } else {
                    mode.files_enabled()
                };
                selectable && options.filter.as_ref().is_none_or(|f| f.accept(entry))
            })
            .filter(|entry| seen.insert(entry.path.clone()))
            .partition(|entry| entry.is_directory);

        directories.extend(files);
        directories
    }
}

impl std::fmt::Debug for DirectoryModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirectoryModel")
            .field("options", &*self.options.read())
            .field("entries", &self.entries.read().len())
            .finish_non_exhaustive()
    }
}
