//! File chooser state.
//!
//! [`FileChooser`] owns the user-facing settings of a file chooser (current
//! directory, filter, selection mode, multi-selection and hidden-file
//! visibility) together with the selected files and the
//! [`DirectoryModel`] that lists the current directory.
//!
//! Every setting change is announced on
//! [`property_changed`](FileChooser::property_changed). The chooser listens
//! to its own signal and revalidates the model on every change, so observers
//! see the refreshed listing before the signal returns.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;

use lattice_laf_core::Signal;
use lattice_laf_core::logging::targets;

use crate::config::LookAndFeelConfig;

use super::filter::FileFilter;
use super::model::{DirectoryModel, FileSelectionMode};
use super::system::{FileSystem, LocalFileSystem};

/// A chooser setting that changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChooserProperty {
    /// The current directory.
    Directory,
    /// The active file filter.
    Filter,
    /// Files, directories or both.
    SelectionMode,
    /// Single or multiple selection.
    MultiSelection,
    /// Hidden-file visibility.
    ShowHidden,
}

#[derive(Debug, Default)]
struct ChooserState {
    multi_selection: bool,
    selected: Vec<PathBuf>,
}

/// State of a file chooser dialog.
pub struct FileChooser {
    model: Arc<DirectoryModel>,
    state: RwLock<ChooserState>,

    /// Emitted after a setting changed.
    pub property_changed: Signal<ChooserProperty>,

    /// Emitted with the new selection.
    pub selection_changed: Signal<Vec<PathBuf>>,
}

impl FileChooser {
    /// Create a chooser listing `fs`.
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        let model = Arc::new(DirectoryModel::new(fs));
        let property_changed = Signal::new();

        let weak_model = Arc::downgrade(&model);
        property_changed.connect(move |property: &ChooserProperty| {
            if let Some(model) = weak_model.upgrade() {
                tracing::trace!(target: targets::DIRECTORY, ?property, "revalidating listing");
                model.validate();
            }
        });

        Self {
            model,
            state: RwLock::new(ChooserState::default()),
            property_changed,
            selection_changed: Signal::new(),
        }
    }

    /// Create a chooser over the local filesystem.
    pub fn local() -> Self {
        Self::new(Arc::new(LocalFileSystem::new()))
    }

    /// Apply hidden-file visibility and selection mode from `config`.
    ///
    /// No signals fire; call [`refresh`](Self::refresh) once a directory is set.
    pub fn with_config(self, config: &LookAndFeelConfig) -> Self {
        self.model.set_show_hidden(config.show_hidden_files);
        self.model.set_selection_mode(config.file_selection_mode);
        self
    }

    /// The listing model.
    pub fn model(&self) -> &Arc<DirectoryModel> {
        &self.model
    }

    /// Rebuild the listing.
    pub fn refresh(&self) {
        self.model.invalidate();
        self.model.validate();
    }

    // =========================================================================
    // Settings
    // =========================================================================

    /// The directory being shown.
    pub fn current_directory(&self) -> Option<PathBuf> {
        self.model.directory()
    }

    /// Show `directory`.
    pub fn set_current_directory(&self, directory: impl Into<PathBuf>) {
        let directory = directory.into();
        if self.model.directory().as_deref() == Some(directory.as_path()) {
            return;
        }
        self.model.set_directory(Some(directory));
        self.property_changed.emit(ChooserProperty::Directory);
    }

    /// The active filter.
    pub fn filter(&self) -> Option<FileFilter> {
        self.model.options().filter
    }

    /// Set or clear the filter.
    pub fn set_filter(&self, filter: Option<FileFilter>) {
        self.model.set_filter(filter);
        self.property_changed.emit(ChooserProperty::Filter);
    }

    /// The selection mode.
    pub fn selection_mode(&self) -> FileSelectionMode {
        self.model.options().selection_mode
    }

    /// Set the selection mode.
    pub fn set_selection_mode(&self, mode: FileSelectionMode) {
        if self.selection_mode() == mode {
            return;
        }
        self.model.set_selection_mode(mode);
        self.property_changed.emit(ChooserProperty::SelectionMode);
    }

    /// Check if several files may be selected.
    pub fn is_multi_selection_enabled(&self) -> bool {
        self.state.read().multi_selection
    }

    /// Allow or forbid selecting several files.
    ///
    /// Turning it off keeps only the first selected file.
    pub fn set_multi_selection_enabled(&self, enabled: bool) {
        let truncated = {
            let mut state = self.state.write();
            if state.multi_selection == enabled {
                return;
            }
            state.multi_selection = enabled;
            if !enabled && state.selected.len() > 1 {
                state.selected.truncate(1);
                Some(state.selected.clone())
            } else {
                None
            }
        };
        self.property_changed.emit(ChooserProperty::MultiSelection);
        if let Some(selection) = truncated {
            self.selection_changed.emit(selection);
        }
    }

    /// Check if hidden files are listed.
    pub fn is_hidden_shown(&self) -> bool {
        self.model.options().show_hidden
    }

    /// List or hide hidden files.
    pub fn set_show_hidden(&self, show: bool) {
        if self.is_hidden_shown() == show {
            return;
        }
        self.model.set_show_hidden(show);
        self.property_changed.emit(ChooserProperty::ShowHidden);
    }

    // =========================================================================
    // Selection
    // =========================================================================

    /// The selected files.
    pub fn selected_files(&self) -> Vec<PathBuf> {
        self.state.read().selected.clone()
    }

    /// The first selected file.
    pub fn selected_file(&self) -> Option<PathBuf> {
        self.state.read().selected.first().cloned()
    }

    /// Replace the selection. Without multi-selection only the first path
    /// is kept.
    pub fn set_selected_files(&self, mut files: Vec<PathBuf>) {
        let selection = {
            let mut state = self.state.write();
            if !state.multi_selection {
                files.truncate(1);
            }
            if state.selected == files {
                return;
            }
            state.selected = files;
            state.selected.clone()
        };
        self.selection_changed.emit(selection);
    }

    /// Select a single file.
    pub fn select(&self, file: impl Into<PathBuf>) {
        self.set_selected_files(vec![file.into()]);
    }

    /// Clear the selection.
    pub fn clear_selection(&self) {
        self.set_selected_files(Vec::new());
    }

    /// Rename `old` to `new` and select the renamed file.
    ///
    /// Returns `false`, leaving listing and selection untouched, if the
    /// rename failed.
    pub fn rename(&self, old: &Path, new: &Path) -> bool {
        if !self.model.rename(old, new) {
            return false;
        }
        self.select(new);
        true
    }
}

impl std::fmt::Debug for FileChooser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileChooser")
            .field("model", &self.model)
            .field("state", &*self.state.read())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::fs;
    use tempfile::TempDir;

    fn populated() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("docs")).unwrap();
        fs::write(dir.path().join("a.rs"), "").unwrap();
        fs::write(dir.path().join("b.txt"), "").unwrap();
        fs::write(dir.path().join(".hidden"), "").unwrap();
        dir
    }

    fn sorted_names(chooser: &FileChooser) -> Vec<String> {
        let mut names: Vec<String> = chooser
            .model()
            .entries()
            .into_iter()
            .map(|e| e.name)
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_directory_change_revalidates() {
        let dir = populated();
        let chooser = FileChooser::local();
        chooser.set_current_directory(dir.path());
        assert_eq!(sorted_names(&chooser), vec!["a.rs", "b.txt", "docs"]);
    }

    #[test]
    fn test_property_changes_revalidate() {
        let dir = populated();
        let chooser = FileChooser::local();
        chooser.set_current_directory(dir.path());

        let count = Arc::new(Mutex::new(0));
        let count_clone = count.clone();
        chooser
            .model()
            .contents_replaced
            .connect(move |_: &Vec<_>| *count_clone.lock() += 1);

        chooser.set_filter(Some(FileFilter::glob("Rust", &["*.rs"]).unwrap()));
        assert_eq!(sorted_names(&chooser), vec!["a.rs", "docs"]);

        chooser.set_show_hidden(true);
        chooser.set_selection_mode(FileSelectionMode::DirectoriesOnly);
        assert_eq!(sorted_names(&chooser), vec!["docs"]);

        chooser.set_multi_selection_enabled(true);
        // Unchanged values do not fire.
        chooser.set_multi_selection_enabled(true);
        chooser.set_show_hidden(true);
        assert_eq!(*count.lock(), 4);
    }

    #[test]
    fn test_single_selection_truncates() {
        let chooser = FileChooser::local();
        chooser.set_multi_selection_enabled(true);
        chooser.set_selected_files(vec![PathBuf::from("/a"), PathBuf::from("/b")]);
        assert_eq!(chooser.selected_files().len(), 2);

        chooser.set_multi_selection_enabled(false);
        assert_eq!(chooser.selected_files(), vec![PathBuf::from("/a")]);

        chooser.set_selected_files(vec![PathBuf::from("/c"), PathBuf::from("/d")]);
        assert_eq!(chooser.selected_file(), Some(PathBuf::from("/c")));
    }

    #[test]
    fn test_rename_selects_new_path() {
        let dir = populated();
        let chooser = FileChooser::local();
        chooser.set_current_directory(dir.path());
        chooser.select(dir.path().join("b.txt"));

        let new = dir.path().join("c.txt");
        assert!(chooser.rename(&dir.path().join("b.txt"), &new));
        assert_eq!(chooser.selected_file(), Some(new.clone()));
        assert!(chooser.model().contains(&new));

        let before = chooser.model().paths();
        assert!(!chooser.rename(&dir.path().join("missing"), &dir.path().join("x")));
        assert_eq!(chooser.selected_file(), Some(new));
        assert_eq!(chooser.model().paths(), before);
    }

    #[test]
    fn test_with_config() {
        let dir = populated();
        let config = LookAndFeelConfig::new().with_show_hidden_files(true);
        let chooser = FileChooser::local().with_config(&config);
        chooser.set_current_directory(dir.path());
        assert!(sorted_names(&chooser).contains(&".hidden".to_string()));
    }
}
