//! Component tree for the look-and-feel layer.
//!
//! Every widget the delegates care about (windows, menu bars, popup menus,
//! menu items and plain widgets) is registered in a [`ComponentTree`]. The
//! tree answers the ancestry questions the menu and focus subsystems need:
//!
//! - the enclosing root pane (window) of any component
//! - the next enclosing root pane outward (a dialog's owner, a popup's invoker window)
//! - effective visibility and enabled state, following parent links
//! - depth-first traversal for tab order
//!
//! # Handles
//!
//! [`ComponentId`] is a generational key. Once a component is destroyed its
//! id never resolves again, even if the slot is reused, so holders of an id
//! can keep it as a non-owning handle and re-validate it before use.
//!
//! ```
//! use lattice_laf_core::{ComponentKind, ComponentTree};
//!
//! let mut tree = ComponentTree::new();
//! let main = tree.create_window("main");
//! let dialog = tree.create_owned_window(main, "find").unwrap();
//! let field = tree.create_child(dialog, ComponentKind::Widget, "query").unwrap();
//!
//! assert_eq!(tree.window_chain(field), vec![dialog, main]);
//!
//! tree.destroy(dialog).unwrap();
//! assert!(!tree.contains(field));
//! ```

use slotmap::{new_key_type, SlotMap};

use crate::error::{ComponentError, ComponentResult};
use crate::logging::targets;

new_key_type! {
    /// A unique identifier for a component in a [`ComponentTree`].
    ///
    /// Ids stay valid while the component exists and never alias another
    /// component after it is destroyed.
    pub struct ComponentId;
}

impl ComponentId {
    /// Convert the id to a raw u64 value.
    #[inline]
    pub fn as_raw(self) -> u64 {
        use slotmap::Key;
        self.data().as_ffi()
    }

    /// Create an id from a raw u64 value.
    ///
    /// This does not check that the component exists.
    #[inline]
    pub fn from_raw(raw: u64) -> Self {
        Self::from(slotmap::KeyData::from_ffi(raw))
    }
}

/// The structural role of a component.
///
/// The menu subsystems branch on this once, when a component is looked up,
/// instead of probing concrete widget types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    /// A top-level root pane.
    Window,
    /// A window's menu bar.
    MenuBar,
    /// A popup menu (context menu or an open submenu).
    PopupMenu,
    /// A single entry inside a menu.
    MenuItem,
    /// Any other widget.
    Widget,
}

impl ComponentKind {
    /// Check if this is a window.
    pub fn is_window(self) -> bool {
        matches!(self, ComponentKind::Window)
    }

    /// Check if this kind can start a menu selection path.
    pub fn is_menu_element(self) -> bool {
        matches!(
            self,
            ComponentKind::MenuBar | ComponentKind::PopupMenu | ComponentKind::MenuItem
        )
    }
}

/// Per-component flags, not taking ancestors into account.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ComponentState {
    /// Whether the component is visible.
    pub visible: bool,
    /// Whether the component is enabled.
    pub enabled: bool,
    /// Whether the component accepts keyboard focus.
    pub focusable: bool,
}

impl Default for ComponentState {
    fn default() -> Self {
        Self {
            visible: true,
            enabled: true,
            focusable: false,
        }
    }
}

struct ComponentData {
    name: String,
    kind: ComponentKind,
    parent: Option<ComponentId>,
    children: Vec<ComponentId>,
    /// For windows: the window that owns this one.
    owner: Option<ComponentId>,
    state: ComponentState,
}

impl ComponentData {
    fn new(kind: ComponentKind, name: String) -> Self {
        Self {
            name,
            kind,
            parent: None,
            children: Vec::new(),
            owner: None,
            state: ComponentState::default(),
        }
    }
}

/// Arena of components and their parent/child and owner relationships.
///
/// Windows are roots: they have no parent, but may have an *owner* window.
/// Destroying a component destroys its children and, for windows, the
/// windows it owns.
pub struct ComponentTree {
    components: SlotMap<ComponentId, ComponentData>,
}

impl ComponentTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self {
            components: SlotMap::with_key(),
        }
    }

    /// Create a top-level window with no owner.
    pub fn create_window(&mut self, name: impl Into<String>) -> ComponentId {
        let id = self
            .components
            .insert(ComponentData::new(ComponentKind::Window, name.into()));
        tracing::trace!(target: targets::COMPONENT, ?id, "created window");
        id
    }

    /// Create a window owned by `owner` (a dialog, or the window hosting a popup).
    pub fn create_owned_window(
        &mut self,
        owner: ComponentId,
        name: impl Into<String>,
    ) -> ComponentResult<ComponentId> {
        self.require_window(owner)?;
        let mut data = ComponentData::new(ComponentKind::Window, name.into());
        data.owner = Some(owner);
        let id = self.components.insert(data);
        tracing::trace!(target: targets::COMPONENT, ?id, ?owner, "created owned window");
        Ok(id)
    }

    /// Create a non-window component as the last child of `parent`.
    pub fn create_child(
        &mut self,
        parent: ComponentId,
        kind: ComponentKind,
        name: impl Into<String>,
    ) -> ComponentResult<ComponentId> {
        if kind.is_window() {
            return Err(ComponentError::WindowParent(parent));
        }
        if !self.components.contains_key(parent) {
            return Err(ComponentError::InvalidComponent(parent));
        }

        let mut data = ComponentData::new(kind, name.into());
        data.parent = Some(parent);
        let id = self.components.insert(data);
        if let Some(parent_data) = self.components.get_mut(parent) {
            parent_data.children.push(id);
        }
        tracing::trace!(target: targets::COMPONENT, ?id, ?parent, ?kind, "created component");
        Ok(id)
    }

    /// Destroy a component, its descendants, and any windows it owns.
    pub fn destroy(&mut self, id: ComponentId) -> ComponentResult<()> {
        let doomed = self.collect_doomed(id)?;

        if let Some(parent_id) = self.components.get(id).and_then(|d| d.parent)
            && let Some(parent_data) = self.components.get_mut(parent_id)
        {
            parent_data.children.retain(|&child| child != id);
        }

        for doomed_id in &doomed {
            self.components.remove(*doomed_id);
        }
        tracing::trace!(target: targets::COMPONENT, ?id, destroyed = doomed.len(), "destroyed component tree");
        Ok(())
    }

    /// Collect `id`, its descendants and owned windows (recursively).
    fn collect_doomed(&self, id: ComponentId) -> ComponentResult<Vec<ComponentId>> {
        if !self.components.contains_key(id) {
            return Err(ComponentError::InvalidComponent(id));
        }
        let mut result = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let Some(data) = self.components.get(current) else {
                continue;
            };
            result.push(current);
            stack.extend(data.children.iter().copied());
            if data.kind.is_window() {
                stack.extend(
                    self.components
                        .iter()
                        .filter(|(_, d)| d.owner == Some(current))
                        .map(|(owned, _)| owned),
                );
            }
        }
        Ok(result)
    }

    /// Check if a component exists.
    pub fn contains(&self, id: ComponentId) -> bool {
        self.components.contains_key(id)
    }

    /// Move a non-window component under a new parent.
    pub fn set_parent(&mut self, id: ComponentId, new_parent: ComponentId) -> ComponentResult<()> {
        let data = self
            .components
            .get(id)
            .ok_or(ComponentError::InvalidComponent(id))?;
        if data.kind.is_window() {
            return Err(ComponentError::WindowParent(new_parent));
        }
        if !self.components.contains_key(new_parent) {
            return Err(ComponentError::InvalidComponent(new_parent));
        }

        // The new parent must not be the component itself or one of its descendants.
        let mut current = Some(new_parent);
        while let Some(ancestor) = current {
            if ancestor == id {
                return Err(ComponentError::CircularParentage(id));
            }
            current = self.components.get(ancestor).and_then(|d| d.parent);
        }

        let old_parent = data.parent;
        if let Some(old) = old_parent
            && let Some(old_data) = self.components.get_mut(old)
        {
            old_data.children.retain(|&child| child != id);
        }
        if let Some(parent_data) = self.components.get_mut(new_parent) {
            parent_data.children.push(id);
        }
        if let Some(data) = self.components.get_mut(id) {
            data.parent = Some(new_parent);
        }
        Ok(())
    }

    /// Get the parent of a component. Windows have no parent.
    pub fn parent(&self, id: ComponentId) -> ComponentResult<Option<ComponentId>> {
        self.data(id).map(|d| d.parent)
    }

    /// Get the children of a component in insertion order.
    pub fn children(&self, id: ComponentId) -> ComponentResult<&[ComponentId]> {
        self.data(id).map(|d| d.children.as_slice())
    }

    /// Get the kind of a component.
    pub fn kind(&self, id: ComponentId) -> Option<ComponentKind> {
        self.components.get(id).map(|d| d.kind)
    }

    /// Get the name of a component.
    pub fn name(&self, id: ComponentId) -> ComponentResult<&str> {
        self.data(id).map(|d| d.name.as_str())
    }

    /// Get the owner of a window.
    pub fn owner(&self, window: ComponentId) -> ComponentResult<Option<ComponentId>> {
        self.require_window(window)?;
        self.data(window).map(|d| d.owner)
    }

    /// Get the component's own flags.
    pub fn state(&self, id: ComponentId) -> ComponentResult<ComponentState> {
        self.data(id).map(|d| d.state)
    }

    /// Show or hide a component.
    pub fn set_visible(&mut self, id: ComponentId, visible: bool) -> ComponentResult<()> {
        self.data_mut(id)?.state.visible = visible;
        Ok(())
    }

    /// Enable or disable a component.
    pub fn set_enabled(&mut self, id: ComponentId, enabled: bool) -> ComponentResult<()> {
        self.data_mut(id)?.state.enabled = enabled;
        Ok(())
    }

    /// Set whether a component accepts keyboard focus.
    pub fn set_focusable(&mut self, id: ComponentId, focusable: bool) -> ComponentResult<()> {
        self.data_mut(id)?.state.focusable = focusable;
        Ok(())
    }

    /// Check visibility of a component and all of its ancestors.
    ///
    /// Destroyed components are never visible.
    pub fn is_effectively_visible(&self, id: ComponentId) -> bool {
        self.all_up_the_chain(id, |state| state.visible)
    }

    /// Check enabled state of a component and all of its ancestors.
    pub fn is_effectively_enabled(&self, id: ComponentId) -> bool {
        self.all_up_the_chain(id, |state| state.enabled)
    }

    fn all_up_the_chain(&self, id: ComponentId, flag: impl Fn(&ComponentState) -> bool) -> bool {
        let mut current = Some(id);
        let mut seen_any = false;
        while let Some(current_id) = current {
            let Some(data) = self.components.get(current_id) else {
                return false;
            };
            if !flag(&data.state) {
                return false;
            }
            seen_any = true;
            current = data.parent;
        }
        seen_any
    }

    /// Check if a component can take keyboard focus right now.
    ///
    /// The component must exist, be focusable, and be effectively visible and enabled.
    pub fn can_accept_focus(&self, id: ComponentId) -> bool {
        self.components.get(id).is_some_and(|d| d.state.focusable)
            && self.is_effectively_visible(id)
            && self.is_effectively_enabled(id)
    }

    /// Check if a window can be activated (receive a window-level focus request).
    pub fn can_activate_window(&self, window: ComponentId) -> bool {
        self.components
            .get(window)
            .is_some_and(|d| d.kind.is_window() && d.state.visible && d.state.enabled)
    }

    /// Get all ancestors of a component, from immediate parent to the window.
    pub fn ancestors(&self, id: ComponentId) -> ComponentResult<Vec<ComponentId>> {
        let mut result = Vec::new();
        let mut current = self.data(id)?.parent;
        while let Some(current_id) = current {
            result.push(current_id);
            current = self.components.get(current_id).and_then(|d| d.parent);
        }
        Ok(result)
    }

    /// Find the root pane (window) enclosing a component.
    ///
    /// A window is its own root pane.
    pub fn root_pane_of(&self, id: ComponentId) -> Option<ComponentId> {
        let mut current = Some(id);
        while let Some(current_id) = current {
            let data = self.components.get(current_id)?;
            if data.kind.is_window() {
                return Some(current_id);
            }
            current = data.parent;
        }
        None
    }

    /// Find the next root pane outward from a window (its owner's root pane).
    pub fn outer_root_pane(&self, root_pane: ComponentId) -> Option<ComponentId> {
        let data = self.components.get(root_pane)?;
        if !data.kind.is_window() {
            return None;
        }
        data.owner.and_then(|owner| self.root_pane_of(owner))
    }

    /// The root panes from the component's own window outward.
    pub fn window_chain(&self, id: ComponentId) -> Vec<ComponentId> {
        let mut chain = Vec::new();
        let mut current = self.root_pane_of(id);
        while let Some(window) = current {
            // An owner cycle would be a malformed tree; stop rather than spin.
            if chain.contains(&window) {
                break;
            }
            chain.push(window);
            current = self.outer_root_pane(window);
        }
        chain
    }

    /// Depth-first pre-order traversal starting at `id` (the node itself first).
    pub fn depth_first_preorder(&self, id: ComponentId) -> ComponentResult<Vec<ComponentId>> {
        let mut result = Vec::new();
        self.preorder_recursive(id, &mut result)?;
        Ok(result)
    }

    fn preorder_recursive(
        &self,
        id: ComponentId,
        result: &mut Vec<ComponentId>,
    ) -> ComponentResult<()> {
        let data = self.data(id)?;
        result.push(id);
        for &child_id in &data.children {
            self.preorder_recursive(child_id, result)?;
        }
        Ok(())
    }

    /// Number of live components.
    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    /// Iterate over all windows.
    pub fn windows(&self) -> impl Iterator<Item = ComponentId> + '_ {
        self.components
            .iter()
            .filter(|(_, d)| d.kind.is_window())
            .map(|(id, _)| id)
    }

    fn data(&self, id: ComponentId) -> ComponentResult<&ComponentData> {
        self.components
            .get(id)
            .ok_or(ComponentError::InvalidComponent(id))
    }

    fn data_mut(&mut self, id: ComponentId) -> ComponentResult<&mut ComponentData> {
        self.components
            .get_mut(id)
            .ok_or(ComponentError::InvalidComponent(id))
    }

    fn require_window(&self, id: ComponentId) -> ComponentResult<()> {
        if self.data(id)?.kind.is_window() {
            Ok(())
        } else {
            Err(ComponentError::NotAWindow(id))
        }
    }
}

impl Default for ComponentTree {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tree() -> (ComponentTree, ComponentId, ComponentId, ComponentId) {
        let mut tree = ComponentTree::new();
        let window = tree.create_window("main");
        let panel = tree
            .create_child(window, ComponentKind::Widget, "panel")
            .unwrap();
        let button = tree
            .create_child(panel, ComponentKind::Widget, "button")
            .unwrap();
        (tree, window, panel, button)
    }

    #[test]
    fn test_root_pane_of() {
        let (tree, window, panel, button) = sample_tree();
        assert_eq!(tree.root_pane_of(button), Some(window));
        assert_eq!(tree.root_pane_of(panel), Some(window));
        assert_eq!(tree.root_pane_of(window), Some(window));
    }

    #[test]
    fn test_window_chain_follows_owners() {
        let (mut tree, window, _, _) = sample_tree();
        let dialog = tree.create_owned_window(window, "dialog").unwrap();
        let nested = tree.create_owned_window(dialog, "nested").unwrap();
        let field = tree
            .create_child(nested, ComponentKind::Widget, "field")
            .unwrap();

        assert_eq!(tree.window_chain(field), vec![nested, dialog, window]);
        assert_eq!(tree.outer_root_pane(window), None);
    }

    #[test]
    fn test_owned_window_requires_window_owner() {
        let (mut tree, _, panel, _) = sample_tree();
        assert_eq!(
            tree.create_owned_window(panel, "bad"),
            Err(ComponentError::NotAWindow(panel))
        );
    }

    #[test]
    fn test_destroy_cascades_to_children_and_owned_windows() {
        let (mut tree, window, panel, button) = sample_tree();
        let dialog = tree.create_owned_window(window, "dialog").unwrap();

        tree.destroy(window).unwrap();

        assert!(!tree.contains(window));
        assert!(!tree.contains(panel));
        assert!(!tree.contains(button));
        assert!(!tree.contains(dialog));
        assert_eq!(tree.component_count(), 0);
    }

    #[test]
    fn test_stale_id_does_not_alias() {
        let (mut tree, window, _, button) = sample_tree();
        tree.destroy(button).unwrap();
        let replacement = tree
            .create_child(window, ComponentKind::Widget, "replacement")
            .unwrap();

        assert_ne!(button, replacement);
        assert!(!tree.contains(button));
        assert!(!tree.can_accept_focus(button));
    }

    #[test]
    fn test_effective_visibility_and_enabled() {
        let (mut tree, _, panel, button) = sample_tree();
        assert!(tree.is_effectively_visible(button));

        tree.set_visible(panel, false).unwrap();
        assert!(!tree.is_effectively_visible(button));

        tree.set_visible(panel, true).unwrap();
        tree.set_enabled(panel, false).unwrap();
        assert!(!tree.is_effectively_enabled(button));
    }

    #[test]
    fn test_can_accept_focus() {
        let (mut tree, _, panel, button) = sample_tree();
        assert!(!tree.can_accept_focus(button));

        tree.set_focusable(button, true).unwrap();
        assert!(tree.can_accept_focus(button));

        tree.set_enabled(panel, false).unwrap();
        assert!(!tree.can_accept_focus(button));
    }

    #[test]
    fn test_set_parent_rejects_cycles() {
        let (mut tree, _, panel, button) = sample_tree();
        assert_eq!(
            tree.set_parent(panel, button),
            Err(ComponentError::CircularParentage(panel))
        );
        assert_eq!(
            tree.set_parent(panel, panel),
            Err(ComponentError::CircularParentage(panel))
        );
    }

    #[test]
    fn test_set_parent_moves_child() {
        let (mut tree, window, panel, button) = sample_tree();
        tree.set_parent(button, window).unwrap();
        assert_eq!(tree.parent(button).unwrap(), Some(window));
        assert!(tree.children(panel).unwrap().is_empty());
        assert_eq!(tree.children(window).unwrap(), &[panel, button]);
    }

    #[test]
    fn test_windows_cannot_be_children() {
        let (mut tree, window, panel, _) = sample_tree();
        assert!(tree.create_child(panel, ComponentKind::Window, "w").is_err());
        assert_eq!(
            tree.set_parent(window, panel),
            Err(ComponentError::WindowParent(panel))
        );
    }

    #[test]
    fn test_depth_first_preorder() {
        let (mut tree, window, panel, button) = sample_tree();
        let other = tree
            .create_child(window, ComponentKind::Widget, "other")
            .unwrap();
        assert_eq!(
            tree.depth_first_preorder(window).unwrap(),
            vec![window, panel, button, other]
        );
    }

    #[test]
    fn test_raw_round_trip() {
        let (tree, window, _, _) = sample_tree();
        let raw = window.as_raw();
        assert!(tree.contains(ComponentId::from_raw(raw)));
    }
}
