//! The focus capability the menu focus coordinator drives.

use std::sync::Arc;

use lattice_laf_core::ComponentId;
use slotmap::new_key_type;

use crate::keys::KeyEvent;

new_key_type! {
    /// Identifies an installed key listener.
    pub struct KeyListenerId;
}

/// A key listener attached to a component.
///
/// Listeners run during key dispatch and may consume the event.
pub type KeyListener = Arc<dyn Fn(&mut KeyEvent) + Send + Sync>;

/// Focus management operations used by
/// [`MenuFocusCoordinator`](super::MenuFocusCoordinator).
///
/// Implementations must not hold internal locks while calling back into
/// listeners or signal slots.
pub trait FocusHost: Send + Sync {
    /// The component that currently owns keyboard focus.
    fn focus_owner(&self) -> Option<ComponentId>;

    /// The window (root pane) containing `component`.
    fn window_of(&self, component: ComponentId) -> Option<ComponentId>;

    /// Ask for focus to move into `window`. Returns `false` if refused.
    fn request_window_focus(&self, window: ComponentId) -> bool;

    /// Check if `window` has a menu bar installed.
    fn has_menu_bar(&self, window: ComponentId) -> bool;

    /// Check if `component` still exists and can take focus
    /// (focusable, effectively visible and enabled).
    fn can_restore_focus(&self, component: ComponentId) -> bool;

    /// Give focus to `component`. Returns `false` if refused.
    fn request_focus(&self, component: ComponentId) -> bool;

    /// Move focus to the next focusable component in tab order.
    fn focus_next(&self) -> bool;

    /// Attach a key listener to `component`.
    fn add_key_listener(&self, component: ComponentId, listener: KeyListener) -> KeyListenerId;

    /// Detach a key listener. Returns `false` if it was already gone.
    fn remove_key_listener(&self, id: KeyListenerId) -> bool;
}
