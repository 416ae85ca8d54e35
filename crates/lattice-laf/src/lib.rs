//! Look-and-feel delegates for Lattice.
//!
//! This crate implements the cross-cutting behaviour a look-and-feel layer
//! installs into a widget toolkit:
//!
//! - **Menu accelerators**: key events are offered to menu items bound to
//!   the same [`KeyChord`] before normal dispatch, searching the source
//!   window's menu bar first and then each owner window outward
//! - **Menu focus coordination**: while a menu is open, focus moves into the
//!   window owning it and comes back to its previous owner afterwards
//! - **Directory listings**: cached, filtered, directories-first listings for
//!   file choosers
//!
//! Everything hangs off an explicitly created [`Toolkit`].
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use lattice_laf::{Action, Key, KeyChord, KeyEvent, MenuBar, MenuItem, SubMenu, Toolkit};
//!
//! let toolkit = Toolkit::new();
//! let _laf = toolkit.install_look_and_feel();
//!
//! let window = toolkit.create_window("editor");
//! let text = toolkit.create_focusable(window, "text").unwrap();
//!
//! let save = Arc::new(Action::new("Save"));
//! save.triggered.connect(|event| println!("saving via {}", event.chord));
//! toolkit
//!     .set_menu_bar(
//!         window,
//!         MenuBar::new().with_menu(SubMenu::new("File").with_item(
//!             MenuItem::new("Save")
//!                 .with_accelerator(KeyChord::ctrl(Key::S))
//!                 .with_action(save),
//!         )),
//!     )
//!     .unwrap();
//!
//! let mut event = KeyEvent::new(KeyChord::ctrl(Key::S), text);
//! assert!(toolkit.dispatch_key_event(&mut event));
//! ```

pub mod config;
pub mod file;
pub mod focus;
#[cfg(feature = "winit")]
pub mod keyboard;
pub mod keys;
pub mod menu;
mod toolkit;

pub use lattice_laf_core::*;

pub use config::{ConfigError, LookAndFeelConfig};
pub use file::{DirectoryEntry, DirectoryModel, FileChooser, FileFilter, FileSelectionMode};
pub use focus::{CoordinatorHandle, FocusHost, FocusManager, FocusReason, MenuFocusCoordinator};
#[cfg(feature = "winit")]
pub use keyboard::KeyboardInputHandler;
pub use keys::{Key, KeyChord, KeyChordParseError, KeyEvent, KeyPhase, KeyboardModifiers};
pub use menu::{
    Action, ActionEvent, MenuAcceleratorRouter, MenuBar, MenuElement, MenuElementKind, MenuItem,
    MenuNode, MenuSelectionManager, SubMenu,
};
pub use toolkit::{FocusChange, Toolkit};

// Toolkit state is shared across threads behind Arc; keep it thread-safe.
static_assertions::assert_impl_all!(Toolkit: Send, Sync);
static_assertions::assert_impl_all!(DirectoryModel: Send, Sync);
static_assertions::assert_impl_all!(MenuFocusCoordinator: Send, Sync);
