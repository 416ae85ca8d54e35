//! Keyboard focus tracking.
//!
//! [`FocusManager`] records which component owns keyboard focus and which
//! window is active, and moves focus around a [`ComponentTree`].
//!
//! # Tab Order
//!
//! Tab order is the depth-first pre-order traversal of the focus owner's
//! window, keeping only components that can accept focus (focusable,
//! effectively visible and enabled). Navigation wraps at both ends.

use lattice_laf_core::logging::targets;
use lattice_laf_core::{ComponentId, ComponentTree};

/// Why focus moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FocusReason {
    /// Tab key navigation.
    Tab,
    /// Shift+Tab navigation.
    Backtab,
    /// A window was activated.
    ActiveWindow,
    /// A menu closed and focus went back to where it was.
    MenuRestore,
    /// Focus changed programmatically.
    #[default]
    Other,
}

/// Tracks the focus owner and the active window.
#[derive(Debug, Default)]
pub struct FocusManager {
    focused: Option<ComponentId>,
    active_window: Option<ComponentId>,
}

impl FocusManager {
    /// Create a focus manager with nothing focused.
    pub fn new() -> Self {
        Self::default()
    }

    /// The focus owner, if it still exists in `tree`.
    pub fn focus_owner(&self, tree: &ComponentTree) -> Option<ComponentId> {
        self.focused.filter(|&id| tree.contains(id))
    }

    /// The active window, if it still exists in `tree`.
    pub fn active_window(&self, tree: &ComponentTree) -> Option<ComponentId> {
        self.active_window.filter(|&id| tree.contains(id))
    }

    /// Check if a specific component has focus.
    #[inline]
    pub fn has_focus(&self, id: ComponentId) -> bool {
        self.focused == Some(id)
    }

    /// Give focus to `id`.
    ///
    /// Returns `false` (focus unchanged) if the component cannot accept focus.
    pub fn set_focus(&mut self, tree: &ComponentTree, id: ComponentId, reason: FocusReason) -> bool {
        if !tree.can_accept_focus(id) {
            tracing::trace!(target: targets::FOCUS, ?id, "focus refused");
            return false;
        }
        if self.focused == Some(id) {
            return true;
        }

        tracing::debug!(target: targets::FOCUS, old = ?self.focused, new = ?id, ?reason, "focus changed");
        self.focused = Some(id);
        self.active_window = tree.root_pane_of(id);
        true
    }

    /// Move focus into `window` itself and make it the active window.
    ///
    /// The window must exist and be visible and enabled.
    pub fn request_window_focus(&mut self, tree: &ComponentTree, window: ComponentId) -> bool {
        if !tree.can_activate_window(window) {
            tracing::trace!(target: targets::FOCUS, ?window, "window focus refused");
            return false;
        }
        if self.focused != Some(window) {
            tracing::debug!(target: targets::FOCUS, old = ?self.focused, ?window, "window focus granted");
        }
        self.focused = Some(window);
        self.active_window = Some(window);
        true
    }

    /// Clear focus. The active window is kept.
    pub fn clear_focus(&mut self) {
        if let Some(old) = self.focused.take() {
            tracing::debug!(target: targets::FOCUS, ?old, "focus cleared");
        }
    }

    /// Move focus to the next focusable component in tab order, wrapping.
    ///
    /// Returns `false` if there is nothing to focus.
    pub fn focus_next(&mut self, tree: &ComponentTree) -> bool {
        let order = self.tab_order(tree);
        if order.is_empty() {
            return false;
        }

        let next = match self.focused.and_then(|current| order.iter().position(|&id| id == current)) {
            Some(pos) => order[(pos + 1) % order.len()],
            None => order[0],
        };
        self.set_focus(tree, next, FocusReason::Tab)
    }

    /// Move focus to the previous focusable component in tab order, wrapping.
    pub fn focus_previous(&mut self, tree: &ComponentTree) -> bool {
        let order = self.tab_order(tree);
        let Some(&last) = order.last() else {
            return false;
        };

        let previous = match self.focused.and_then(|current| order.iter().position(|&id| id == current)) {
            Some(0) | None => last,
            Some(pos) => order[pos - 1],
        };
        self.set_focus(tree, previous, FocusReason::Backtab)
    }

    /// The tab order of the window that currently owns focus (or the active window).
    pub fn tab_order(&self, tree: &ComponentTree) -> Vec<ComponentId> {
        let root = self
            .focus_owner(tree)
            .and_then(|id| tree.root_pane_of(id))
            .or_else(|| self.active_window(tree));
        let Some(root) = root else {
            return Vec::new();
        };

        tree.depth_first_preorder(root)
            .map(|all| all.into_iter().filter(|&id| tree.can_accept_focus(id)).collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lattice_laf_core::ComponentKind;

    struct Fixture {
        tree: ComponentTree,
        window: ComponentId,
        a: ComponentId,
        b: ComponentId,
        c: ComponentId,
    }

    fn fixture() -> Fixture {
        let mut tree = ComponentTree::new();
        let window = tree.create_window("main");
        let panel = tree
            .create_child(window, ComponentKind::Widget, "panel")
            .unwrap();
        let a = tree.create_child(panel, ComponentKind::Widget, "a").unwrap();
        let b = tree.create_child(panel, ComponentKind::Widget, "b").unwrap();
        let c = tree.create_child(window, ComponentKind::Widget, "c").unwrap();
        for id in [a, b, c] {
            tree.set_focusable(id, true).unwrap();
        }
        Fixture { tree, window, a, b, c }
    }

    #[test]
    fn test_set_focus_requires_focusable() {
        let f = fixture();
        let mut manager = FocusManager::new();

        assert!(!manager.set_focus(&f.tree, f.window, FocusReason::Other));
        assert!(manager.set_focus(&f.tree, f.a, FocusReason::Other));
        assert_eq!(manager.focus_owner(&f.tree), Some(f.a));
        assert_eq!(manager.active_window(&f.tree), Some(f.window));
    }

    #[test]
    fn test_focus_next_wraps() {
        let f = fixture();
        let mut manager = FocusManager::new();
        manager.set_focus(&f.tree, f.a, FocusReason::Other);

        assert!(manager.focus_next(&f.tree));
        assert!(manager.has_focus(f.b));
        assert!(manager.focus_next(&f.tree));
        assert!(manager.has_focus(f.c));
        assert!(manager.focus_next(&f.tree));
        assert!(manager.has_focus(f.a));
    }

    #[test]
    fn test_focus_previous_wraps() {
        let f = fixture();
        let mut manager = FocusManager::new();
        manager.set_focus(&f.tree, f.a, FocusReason::Other);

        assert!(manager.focus_previous(&f.tree));
        assert!(manager.has_focus(f.c));
    }

    #[test]
    fn test_tab_order_skips_hidden_and_disabled() {
        let mut f = fixture();
        f.tree.set_enabled(f.b, false).unwrap();
        let mut manager = FocusManager::new();
        manager.set_focus(&f.tree, f.a, FocusReason::Other);

        assert_eq!(manager.tab_order(&f.tree), vec![f.a, f.c]);
        f.tree.set_visible(f.c, false).unwrap();
        assert_eq!(manager.tab_order(&f.tree), vec![f.a]);
    }

    #[test]
    fn test_window_focus_then_next() {
        let f = fixture();
        let mut manager = FocusManager::new();

        assert!(manager.request_window_focus(&f.tree, f.window));
        assert_eq!(manager.focus_owner(&f.tree), Some(f.window));
        assert!(manager.focus_next(&f.tree));
        assert!(manager.has_focus(f.a));
    }

    #[test]
    fn test_window_focus_refused_when_hidden() {
        let mut f = fixture();
        f.tree.set_visible(f.window, false).unwrap();
        let mut manager = FocusManager::new();
        assert!(!manager.request_window_focus(&f.tree, f.window));
    }

    #[test]
    fn test_destroyed_owner_reads_as_none() {
        let mut f = fixture();
        let mut manager = FocusManager::new();
        manager.set_focus(&f.tree, f.c, FocusReason::Other);
        f.tree.destroy(f.c).unwrap();
        assert_eq!(manager.focus_owner(&f.tree), None);
    }

    #[test]
    fn test_focus_next_empty() {
        let tree = ComponentTree::new();
        let mut manager = FocusManager::new();
        assert!(!manager.focus_next(&tree));
    }
}
