//! Look-and-feel configuration.
//!
//! [`LookAndFeelConfig`] can be built in code or loaded from TOML. Missing
//! keys fall back to their defaults:
//!
//! ```toml
//! route_accelerators = true
//! forward_keys_to_menus = true
//! restore_focus_on_menu_close = true
//! show_hidden_files = false
//! file_selection_mode = "files_and_directories"
//! thread_checks = true
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::file::FileSelectionMode;
use crate::focus::CoordinatorOptions;

/// Errors raised while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The TOML text could not be parsed.
    #[error("invalid look-and-feel configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// The configuration could not be serialized.
    #[error("failed to serialize look-and-feel configuration: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// The configuration file could not be read.
    #[error("failed to read configuration '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Behaviour switches for menus, focus and file choosers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LookAndFeelConfig {
    /// Offer key events to menu accelerators before normal dispatch.
    pub route_accelerators: bool,
    /// Forward keys to open menus from windows without a menu bar.
    pub forward_keys_to_menus: bool,
    /// Give focus back to its previous owner when a menu closes.
    pub restore_focus_on_menu_close: bool,
    /// List hidden files in file choosers.
    pub show_hidden_files: bool,
    /// Default file chooser selection mode.
    pub file_selection_mode: FileSelectionMode,
    /// Check UI-thread affinity in debug builds. Applies only to the
    /// toolkit (and its menu and focus helpers) built from this config.
    pub thread_checks: bool,
}

impl Default for LookAndFeelConfig {
    fn default() -> Self {
        Self {
            route_accelerators: true,
            forward_keys_to_menus: true,
            restore_focus_on_menu_close: true,
            show_hidden_files: false,
            file_selection_mode: FileSelectionMode::FilesOnly,
            thread_checks: true,
        }
    }
}

impl LookAndFeelConfig {
    /// Create the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Read and parse a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Serialize to a TOML document.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string(self)?)
    }

    /// Set accelerator routing.
    pub fn with_route_accelerators(mut self, enabled: bool) -> Self {
        self.route_accelerators = enabled;
        self
    }

    /// Set key forwarding into open menus.
    pub fn with_forward_keys_to_menus(mut self, enabled: bool) -> Self {
        self.forward_keys_to_menus = enabled;
        self
    }

    /// Set focus restoration after menus close.
    pub fn with_restore_focus_on_menu_close(mut self, enabled: bool) -> Self {
        self.restore_focus_on_menu_close = enabled;
        self
    }

    /// Set hidden-file visibility.
    pub fn with_show_hidden_files(mut self, show: bool) -> Self {
        self.show_hidden_files = show;
        self
    }

    /// Set the default file selection mode.
    pub fn with_file_selection_mode(mut self, mode: FileSelectionMode) -> Self {
        self.file_selection_mode = mode;
        self
    }

    /// Set UI-thread checks.
    pub fn with_thread_checks(mut self, enabled: bool) -> Self {
        self.thread_checks = enabled;
        self
    }

    /// The menu focus coordinator options implied by this configuration.
    pub fn coordinator_options(&self) -> CoordinatorOptions {
        CoordinatorOptions {
            forward_keys_to_menus: self.forward_keys_to_menus,
            restore_focus_on_menu_close: self.restore_focus_on_menu_close,
            thread_checks: self.thread_checks,
        }
    }
}
