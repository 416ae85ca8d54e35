//! The menu selection path.
//!
//! While a menu is open, the toolkit tracks the chain of open menu elements,
//! outermost first: `[menu bar, "File" popup, "Recent" popup, item]`. An
//! empty path means no menu is open.
//!
//! [`MenuSelectionManager`] owns that path and announces every change on
//! [`state_changed`](MenuSelectionManager::state_changed). While the path is
//! active it also takes keyboard input: Escape closes everything, Left closes
//! the innermost submenu, and every other key is re-emitted on
//! [`key_forwarded`](MenuSelectionManager::key_forwarded) for the menu
//! delegates to interpret.

use parking_lot::Mutex;

use lattice_laf_core::logging::targets;
use lattice_laf_core::{ComponentId, ComponentKind, Signal, ThreadAffinity};

use crate::keys::{Key, KeyEvent, KeyPhase};

/// What kind of menu element sits at a position in the selection path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenuElementKind {
    /// A window's menu bar.
    MenuBar,
    /// An open popup menu.
    PopupMenu,
    /// A highlighted menu item.
    MenuItem,
    /// Anything else (custom menu-like components).
    Other,
}

impl From<ComponentKind> for MenuElementKind {
    fn from(kind: ComponentKind) -> Self {
        match kind {
            ComponentKind::MenuBar => MenuElementKind::MenuBar,
            ComponentKind::PopupMenu => MenuElementKind::PopupMenu,
            ComponentKind::MenuItem => MenuElementKind::MenuItem,
            ComponentKind::Window | ComponentKind::Widget => MenuElementKind::Other,
        }
    }
}

/// One element of the selection path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MenuElement {
    /// The component for this element.
    pub component: ComponentId,
    /// Its kind, resolved when the element was created.
    pub kind: MenuElementKind,
}

impl MenuElement {
    /// Create a path element.
    pub fn new(component: ComponentId, kind: MenuElementKind) -> Self {
        Self { component, kind }
    }

    /// Check if this is a menu bar, popup menu or menu item.
    pub fn is_menu(&self) -> bool {
        self.kind != MenuElementKind::Other
    }
}

/// Owner of the menu selection path.
pub struct MenuSelectionManager {
    path: Mutex<Vec<MenuElement>>,
    affinity: ThreadAffinity,

    /// Emitted with the new path whenever it changes.
    pub state_changed: Signal<Vec<MenuElement>>,

    /// Emitted with keys that arrive while a menu is open and that the
    /// manager does not handle itself.
    pub key_forwarded: Signal<KeyEvent>,
}

impl MenuSelectionManager {
    /// Create a manager with an empty path.
    pub fn new() -> Self {
        Self::with_thread_checks(true)
    }

    /// Create a manager whose UI-thread checks are switched on or off.
    pub fn with_thread_checks(enabled: bool) -> Self {
        Self {
            path: Mutex::new(Vec::new()),
            affinity: ThreadAffinity::current().with_checks_enabled(enabled),
            state_changed: Signal::new(),
            key_forwarded: Signal::new(),
        }
    }

    /// A snapshot of the current path.
    pub fn selected_path(&self) -> Vec<MenuElement> {
        self.path.lock().clone()
    }

    /// Check if any menu is open.
    pub fn is_active(&self) -> bool {
        !self.path.lock().is_empty()
    }

    /// Replace the path.
    ///
    /// Emits `state_changed` only if the path actually differs.
    pub fn set_selected_path(&self, path: Vec<MenuElement>) {
        self.affinity.debug_assert_same_thread();
        {
            let mut current = self.path.lock();
            if *current == path {
                return;
            }
            tracing::debug!(
                target: targets::MENU_SELECTION,
                old_len = current.len(),
                new_len = path.len(),
                "menu selection path changed"
            );
            *current = path.clone();
        }
        self.state_changed.emit(path);
    }

    /// Close every open menu.
    pub fn clear_selected_path(&self) {
        self.set_selected_path(Vec::new());
    }

    /// Handle a key while a menu is open.
    ///
    /// Returns `false` (leaving the event untouched) if no menu is open.
    /// Otherwise the event is consumed and `true` returned.
    pub fn process_key_event(&self, event: &mut KeyEvent) -> bool {
        let path = self.selected_path();
        if path.is_empty() {
            return false;
        }
        event.consume();

        let pressed = event.chord.phase == KeyPhase::Pressed;
        match event.key() {
            Key::Escape if pressed => {
                tracing::trace!(target: targets::MENU_SELECTION, "escape closes menu path");
                self.clear_selected_path();
            }
            Key::ArrowLeft if pressed && path.len() > 1 => {
                let mut shorter = path;
                shorter.pop();
                self.set_selected_path(shorter);
            }
            _ => self.key_forwarded.emit(event.clone()),
        }
        true
    }
}

impl Default for MenuSelectionManager {
    fn default() -> Self {
        Self::new()
    }
}
