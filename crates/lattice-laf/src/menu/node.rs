//! Menu trees: menu bars, submenus and items.
//!
//! A [`MenuBar`] owns its top-level [`SubMenu`]s in display order; each
//! submenu owns an ordered list of [`MenuNode`]s. The tree is plain data:
//! the accelerator router only reads it.
//!
//! ```
//! use std::sync::Arc;
//! use lattice_laf::keys::{Key, KeyChord};
//! use lattice_laf::menu::{Action, MenuBar, MenuItem, SubMenu};
//!
//! let save = Arc::new(Action::new("Save"));
//! let bar = MenuBar::new().with_menu(
//!     SubMenu::new("File")
//!         .with_item(MenuItem::new("Save").with_accelerator(KeyChord::ctrl(Key::S)).with_action(save))
//!         .with_submenu(SubMenu::new("Recent")),
//! );
//! assert_eq!(bar.menus().len(), 1);
//! ```

use std::sync::Arc;

use crate::keys::KeyChord;

use super::action::Action;

// ============================================================================
// MenuItem
// ============================================================================

/// A leaf entry in a menu.
///
/// An item may carry an accelerator, an action, both, or neither. Only items
/// with both (and an enabled action) can be activated from the keyboard.
#[derive(Clone, Debug)]
pub struct MenuItem {
    text: String,
    accelerator: Option<KeyChord>,
    action: Option<Arc<Action>>,
}

impl MenuItem {
    /// Create an item with the given text and no accelerator or action.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            accelerator: None,
            action: None,
        }
    }

    /// Builder pattern for setting the accelerator.
    pub fn with_accelerator(mut self, chord: KeyChord) -> Self {
        self.accelerator = Some(chord);
        self
    }

    /// Builder pattern for setting the action.
    pub fn with_action(mut self, action: Arc<Action>) -> Self {
        self.action = Some(action);
        self
    }

    /// The item's text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The accelerator bound to this item.
    pub fn accelerator(&self) -> Option<KeyChord> {
        self.accelerator
    }

    /// Set or clear the accelerator.
    pub fn set_accelerator(&mut self, chord: Option<KeyChord>) {
        self.accelerator = chord;
    }

    /// The action invoked by this item.
    pub fn action(&self) -> Option<&Arc<Action>> {
        self.action.as_ref()
    }

    /// Set or clear the action.
    pub fn set_action(&mut self, action: Option<Arc<Action>>) {
        self.action = action;
    }

    /// The action to run if `chord` activates this item right now.
    ///
    /// Requires a matching accelerator and a present, enabled action.
    pub fn activation_target(&self, chord: &KeyChord) -> Option<&Arc<Action>> {
        if !self.accelerator.is_some_and(|accel| accel.matches(chord)) {
            return None;
        }
        self.action.as_ref().filter(|action| action.is_enabled())
    }
}

// ============================================================================
// SubMenu / MenuNode
// ============================================================================

/// A titled menu containing items and nested submenus.
#[derive(Clone, Debug)]
pub struct SubMenu {
    title: String,
    children: Vec<MenuNode>,
}

/// A child of a [`SubMenu`].
#[derive(Clone, Debug)]
pub enum MenuNode {
    /// A nested submenu.
    SubMenu(SubMenu),
    /// A leaf item.
    Item(MenuItem),
}

impl SubMenu {
    /// Create an empty submenu.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            children: Vec::new(),
        }
    }

    /// Builder pattern for appending an item.
    pub fn with_item(mut self, item: MenuItem) -> Self {
        self.children.push(MenuNode::Item(item));
        self
    }

    /// Builder pattern for appending a nested submenu.
    pub fn with_submenu(mut self, submenu: SubMenu) -> Self {
        self.children.push(MenuNode::SubMenu(submenu));
        self
    }

    /// Append an item.
    pub fn add_item(&mut self, item: MenuItem) {
        self.children.push(MenuNode::Item(item));
    }

    /// Append a nested submenu.
    pub fn add_submenu(&mut self, submenu: SubMenu) {
        self.children.push(MenuNode::SubMenu(submenu));
    }

    /// The submenu's title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Children in declared order.
    pub fn children(&self) -> &[MenuNode] {
        &self.children
    }

    /// Check if the submenu has no children.
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Visit every leaf item in pre-order, children in declared order.
    ///
    /// The visitor returns `Some` to stop the walk early.
    pub fn find_item<'a, T>(&'a self, visit: &mut impl FnMut(&'a MenuItem) -> Option<T>) -> Option<T> {
        for child in &self.children {
            let found = match child {
                MenuNode::Item(item) => visit(item),
                MenuNode::SubMenu(submenu) => submenu.find_item(visit),
            };
            if found.is_some() {
                return found;
            }
        }
        None
    }
}

// ============================================================================
// MenuBar
// ============================================================================

/// The menu bar of a window: an ordered list of top-level submenus.
#[derive(Clone, Debug, Default)]
pub struct MenuBar {
    menus: Vec<SubMenu>,
}

impl MenuBar {
    /// Create an empty menu bar.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder pattern for appending a top-level menu.
    pub fn with_menu(mut self, menu: SubMenu) -> Self {
        self.menus.push(menu);
        self
    }

    /// Append a top-level menu.
    pub fn add_menu(&mut self, menu: SubMenu) {
        self.menus.push(menu);
    }

    /// Top-level menus in display order.
    pub fn menus(&self) -> &[SubMenu] {
        &self.menus
    }

    /// Visit every leaf item of every menu in pre-order.
    pub fn find_item<'a, T>(&'a self, mut visit: impl FnMut(&'a MenuItem) -> Option<T>) -> Option<T> {
        self.menus.iter().find_map(|menu| menu.find_item(&mut visit))
    }

    /// Collect all leaf items in traversal order.
    pub fn items(&self) -> Vec<&MenuItem> {
        let mut items = Vec::new();
        let _ = self.find_item(|item| {
            items.push(item);
            None::<()>
        });
        items
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::Key;

    #[test]
    fn test_items_in_preorder() {
        let bar = MenuBar::new()
            .with_menu(
                SubMenu::new("File")
                    .with_item(MenuItem::new("New"))
                    .with_submenu(
                        SubMenu::new("Recent")
                            .with_item(MenuItem::new("a.txt"))
                            .with_submenu(SubMenu::new("Empty")),
                    )
                    .with_item(MenuItem::new("Quit")),
            )
            .with_menu(SubMenu::new("Edit").with_item(MenuItem::new("Undo")));

        let texts: Vec<&str> = bar.items().iter().map(|item| item.text()).collect();
        assert_eq!(texts, vec!["New", "a.txt", "Quit", "Undo"]);
    }

    #[test]
    fn test_activation_target() {
        let chord = KeyChord::ctrl(Key::S);
        let action = Arc::new(Action::new("Save"));

        let no_action = MenuItem::new("Save").with_accelerator(chord);
        assert!(no_action.activation_target(&chord).is_none());

        let item = MenuItem::new("Save")
            .with_accelerator(chord)
            .with_action(action.clone());
        assert!(item.activation_target(&chord).is_some());
        assert!(item.activation_target(&KeyChord::ctrl(Key::D)).is_none());

        action.set_enabled(false);
        assert!(item.activation_target(&chord).is_none());
    }
}
