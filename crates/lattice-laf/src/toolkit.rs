//! The toolkit context.
//!
//! A [`Toolkit`] owns the component tree, the menu bars installed on
//! windows, key listeners, the focus manager, the menu selection manager and
//! the shared [`MenuFocusCoordinator`]. It is created explicitly and shared
//! as an `Arc`; there is no global instance.
//!
//! # Key Dispatch
//!
//! [`dispatch_key_event`](Toolkit::dispatch_key_event) delivers an event in
//! two stages:
//!
//! 1. Menu accelerators. The [`MenuAcceleratorRouter`] searches the window
//!    chain of the event's source; a match triggers its action and consumes
//!    the event.
//! 2. Key listeners on the source component, then on each ancestor, until a
//!    listener consumes the event.
//!
//! # Locking
//!
//! Component state is locked before the focus manager. Neither lock is held
//! while action slots, key listeners or `focus_changed` slots run, so those
//! may call back into the toolkit.

use std::sync::{Arc, Weak};

use parking_lot::{Mutex, RwLock};
use slotmap::{SecondaryMap, SlotMap};

use lattice_laf_core::logging::targets;
use lattice_laf_core::{
    ComponentError, ComponentId, ComponentKind, ComponentResult, ComponentTree, Signal,
    ThreadAffinity,
};

use crate::config::LookAndFeelConfig;
use crate::focus::{
    CoordinatorHandle, FocusHost, FocusManager, FocusReason, KeyListener, KeyListenerId,
    MenuFocusCoordinator,
};
use crate::keys::KeyEvent;
use crate::menu::{MenuAcceleratorRouter, MenuBar, MenuHost, MenuSelectionManager};

/// A change of focus owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FocusChange {
    /// The previous focus owner.
    pub old: Option<ComponentId>,
    /// The new focus owner.
    pub new: Option<ComponentId>,
    /// Why focus moved.
    pub reason: FocusReason,
}

struct RegisteredListener {
    component: ComponentId,
    sequence: u64,
    listener: KeyListener,
}

#[derive(Default)]
struct ToolkitState {
    tree: ComponentTree,
    menu_bars: SecondaryMap<ComponentId, Arc<MenuBar>>,
    key_listeners: SlotMap<KeyListenerId, RegisteredListener>,
    next_listener_sequence: u64,
}

impl ToolkitState {
    /// Drop menu bars and listeners of destroyed components.
    fn prune(&mut self) {
        let tree = &self.tree;
        self.menu_bars.retain(|window, _| tree.contains(window));
        self.key_listeners.retain(|_, entry| tree.contains(entry.component));
    }
}

impl MenuHost for ToolkitState {
    fn root_pane_of(&self, component: ComponentId) -> Option<ComponentId> {
        self.tree.root_pane_of(component)
    }

    fn outer_root_pane(&self, root_pane: ComponentId) -> Option<ComponentId> {
        self.tree.outer_root_pane(root_pane)
    }

    fn menu_bar(&self, root_pane: ComponentId) -> Option<Arc<MenuBar>> {
        self.menu_bars.get(root_pane).cloned()
    }
}

/// Application context for menus, focus and key dispatch.
pub struct Toolkit {
    state: RwLock<ToolkitState>,
    focus: Mutex<FocusManager>,
    selection: Arc<MenuSelectionManager>,
    coordinator: Arc<MenuFocusCoordinator>,
    router: MenuAcceleratorRouter,
    config: LookAndFeelConfig,
    affinity: ThreadAffinity,

    /// Emitted after the focus owner changed.
    pub focus_changed: Signal<FocusChange>,
}

impl Toolkit {
    /// Create a toolkit with the default configuration.
    pub fn new() -> Arc<Self> {
        Self::with_config(LookAndFeelConfig::default())
    }

    /// Create a toolkit with `config`.
    ///
    /// The calling thread becomes the UI thread. `config.thread_checks`
    /// applies to this toolkit only.
    pub fn with_config(config: LookAndFeelConfig) -> Arc<Self> {
        Arc::new_cyclic(|weak: &Weak<Toolkit>| {
            let selection = Arc::new(MenuSelectionManager::with_thread_checks(config.thread_checks));
            let host: Weak<dyn FocusHost> = weak.clone();
            let coordinator =
                MenuFocusCoordinator::new(selection.clone(), host, config.coordinator_options());
            let affinity = ThreadAffinity::current().with_checks_enabled(config.thread_checks);
            Self {
                state: RwLock::new(ToolkitState::default()),
                focus: Mutex::new(FocusManager::new()),
                selection,
                coordinator,
                router: MenuAcceleratorRouter::new(),
                config,
                affinity,
                focus_changed: Signal::new(),
            }
        })
    }

    /// The configuration this toolkit was created with.
    pub fn config(&self) -> &LookAndFeelConfig {
        &self.config
    }

    /// The menu selection manager.
    pub fn selection_manager(&self) -> &Arc<MenuSelectionManager> {
        &self.selection
    }

    /// The shared menu focus coordinator.
    pub fn focus_coordinator(&self) -> &Arc<MenuFocusCoordinator> {
        &self.coordinator
    }

    /// Register a look-and-feel installation with the focus coordinator.
    ///
    /// The installation lasts until the returned handle is dropped.
    pub fn install_look_and_feel(&self) -> CoordinatorHandle {
        self.coordinator.acquire()
    }

    // =========================================================================
    // Component Tree
    // =========================================================================

    /// Read the component tree.
    pub fn with_tree<R>(&self, f: impl FnOnce(&ComponentTree) -> R) -> R {
        f(&self.state.read().tree)
    }

    /// Mutate the component tree.
    ///
    /// Menu bars and key listeners of components destroyed by `f` are dropped.
    pub fn with_tree_mut<R>(&self, f: impl FnOnce(&mut ComponentTree) -> R) -> R {
        self.affinity.debug_assert_same_thread();
        let mut state = self.state.write();
        let result = f(&mut state.tree);
        state.prune();
        result
    }

    /// Create a top-level window.
    pub fn create_window(&self, name: impl Into<String>) -> ComponentId {
        self.with_tree_mut(|tree| tree.create_window(name))
    }

    /// Create a window owned by `owner`.
    pub fn create_owned_window(
        &self,
        owner: ComponentId,
        name: impl Into<String>,
    ) -> ComponentResult<ComponentId> {
        self.with_tree_mut(|tree| tree.create_owned_window(owner, name))
    }

    /// Create a component under `parent`.
    pub fn create_child(
        &self,
        parent: ComponentId,
        kind: ComponentKind,
        name: impl Into<String>,
    ) -> ComponentResult<ComponentId> {
        self.with_tree_mut(|tree| tree.create_child(parent, kind, name))
    }

    /// Create a focusable widget under `parent`.
    pub fn create_focusable(
        &self,
        parent: ComponentId,
        name: impl Into<String>,
    ) -> ComponentResult<ComponentId> {
        self.with_tree_mut(|tree| {
            let id = tree.create_child(parent, ComponentKind::Widget, name)?;
            tree.set_focusable(id, true)?;
            Ok(id)
        })
    }

    /// Destroy a component with its descendants and owned windows.
    pub fn destroy(&self, id: ComponentId) -> ComponentResult<()> {
        self.with_tree_mut(|tree| tree.destroy(id))
    }

    // =========================================================================
    // Menu Bars
    // =========================================================================

    /// Install `bar` on `window`, replacing any previous one.
    pub fn set_menu_bar(&self, window: ComponentId, bar: MenuBar) -> ComponentResult<Arc<MenuBar>> {
        let mut state = self.state.write();
        match state.tree.kind(window) {
            Some(kind) if kind.is_window() => {}
            Some(_) => return Err(ComponentError::NotAWindow(window)),
            None => return Err(ComponentError::InvalidComponent(window)),
        }
        let bar = Arc::new(bar);
        state.menu_bars.insert(window, bar.clone());
        tracing::debug!(target: targets::ACCELERATOR, ?window, "menu bar installed");
        Ok(bar)
    }

    /// Remove the menu bar of `window`.
    pub fn remove_menu_bar(&self, window: ComponentId) -> Option<Arc<MenuBar>> {
        self.state.write().menu_bars.remove(window)
    }

    /// The menu bar installed on `window`.
    pub fn menu_bar(&self, window: ComponentId) -> Option<Arc<MenuBar>> {
        self.state.read().menu_bars.get(window).cloned()
    }

    // =========================================================================
    // Key Dispatch
    // =========================================================================

    /// Attach a key listener to `component`.
    pub fn on_key<F>(&self, component: ComponentId, listener: F) -> KeyListenerId
    where
        F: Fn(&mut KeyEvent) + Send + Sync + 'static,
    {
        self.insert_key_listener(component, Arc::new(listener))
    }

    /// Detach a key listener.
    pub fn remove_listener(&self, id: KeyListenerId) -> bool {
        self.state.write().key_listeners.remove(id).is_some()
    }

    /// Number of installed key listeners.
    pub fn key_listener_count(&self) -> usize {
        self.state.read().key_listeners.len()
    }

    fn insert_key_listener(&self, component: ComponentId, listener: KeyListener) -> KeyListenerId {
        let mut state = self.state.write();
        let sequence = state.next_listener_sequence;
        state.next_listener_sequence += 1;
        state.key_listeners.insert(RegisteredListener {
            component,
            sequence,
            listener,
        })
    }

    /// The component key events should be dispatched to: the focus owner,
    /// or the active window when nothing is focused.
    pub fn key_target(&self) -> Option<ComponentId> {
        let state = self.state.read();
        let focus = self.focus.lock();
        focus
            .focus_owner(&state.tree)
            .or_else(|| focus.active_window(&state.tree))
    }

    /// Deliver a key event. Returns `true` if something consumed it.
    pub fn dispatch_key_event(&self, event: &mut KeyEvent) -> bool {
        self.affinity.debug_assert_same_thread();
        if event.is_consumed() {
            return true;
        }

        if self.config.route_accelerators {
            let target = {
                let state = self.state.read();
                self.router.find_target(&*state, &event.chord, event.source)
            };
            if let Some(target) = target
                && self.router.activate(target, event)
            {
                return true;
            }
        }

        for listener in self.listener_chain(event.source) {
            listener(event);
            if event.is_consumed() {
                tracing::trace!(target: targets::KEYS, chord = %event.chord, "key event consumed by listener");
                return true;
            }
        }
        tracing::trace!(target: targets::KEYS, chord = %event.chord, source = ?event.source, "key event unhandled");
        false
    }

    /// Listeners of `source` and its ancestors, innermost first, each
    /// component's listeners in registration order.
    fn listener_chain(&self, source: ComponentId) -> Vec<KeyListener> {
        let state = self.state.read();
        let Ok(ancestors) = state.tree.ancestors(source) else {
            return Vec::new();
        };

        let mut chain = Vec::new();
        for component in std::iter::once(source).chain(ancestors) {
            let mut here: Vec<&RegisteredListener> = state
                .key_listeners
                .values()
                .filter(|entry| entry.component == component)
                .collect();
            here.sort_by_key(|entry| entry.sequence);
            chain.extend(here.into_iter().map(|entry| entry.listener.clone()));
        }
        chain
    }

    // =========================================================================
    // Focus
    // =========================================================================

    /// The component that owns keyboard focus.
    pub fn focus_owner(&self) -> Option<ComponentId> {
        let state = self.state.read();
        self.focus.lock().focus_owner(&state.tree)
    }

    /// The active window.
    pub fn active_window(&self) -> Option<ComponentId> {
        let state = self.state.read();
        self.focus.lock().active_window(&state.tree)
    }

    /// Give focus to `id`. Returns `false` if it cannot accept focus.
    pub fn set_focus(&self, id: ComponentId) -> bool {
        self.update_focus(FocusReason::Other, |focus, tree| {
            focus.set_focus(tree, id, FocusReason::Other)
        })
    }

    /// Move focus into `window` and activate it.
    pub fn request_window_focus(&self, window: ComponentId) -> bool {
        self.update_focus(FocusReason::ActiveWindow, |focus, tree| {
            focus.request_window_focus(tree, window)
        })
    }

    /// Move focus forward in tab order.
    pub fn focus_next(&self) -> bool {
        self.update_focus(FocusReason::Tab, |focus, tree| focus.focus_next(tree))
    }

    /// Move focus backward in tab order.
    pub fn focus_previous(&self) -> bool {
        self.update_focus(FocusReason::Backtab, |focus, tree| focus.focus_previous(tree))
    }

    /// Clear keyboard focus.
    pub fn clear_focus(&self) {
        self.update_focus(FocusReason::Other, |focus, _| {
            focus.clear_focus();
            true
        });
    }

    fn update_focus(
        &self,
        reason: FocusReason,
        f: impl FnOnce(&mut FocusManager, &ComponentTree) -> bool,
    ) -> bool {
        self.affinity.debug_assert_same_thread();
        let (accepted, old, new) = {
            let state = self.state.read();
            let mut focus = self.focus.lock();
            let old = focus.focus_owner(&state.tree);
            let accepted = f(&mut focus, &state.tree);
            (accepted, old, focus.focus_owner(&state.tree))
        };
        if old != new {
            self.focus_changed.emit(FocusChange { old, new, reason });
        }
        accepted
    }
}

impl MenuHost for Toolkit {
    fn root_pane_of(&self, component: ComponentId) -> Option<ComponentId> {
        self.state.read().root_pane_of(component)
    }

    fn outer_root_pane(&self, root_pane: ComponentId) -> Option<ComponentId> {
        self.state.read().outer_root_pane(root_pane)
    }

    fn menu_bar(&self, root_pane: ComponentId) -> Option<Arc<MenuBar>> {
        Toolkit::menu_bar(self, root_pane)
    }
}

impl FocusHost for Toolkit {
    fn focus_owner(&self) -> Option<ComponentId> {
        Toolkit::focus_owner(self)
    }

    fn window_of(&self, component: ComponentId) -> Option<ComponentId> {
        self.state.read().tree.root_pane_of(component)
    }

    fn request_window_focus(&self, window: ComponentId) -> bool {
        Toolkit::request_window_focus(self, window)
    }

    fn has_menu_bar(&self, window: ComponentId) -> bool {
        self.state.read().menu_bars.contains_key(window)
    }

    fn can_restore_focus(&self, component: ComponentId) -> bool {
        self.state.read().tree.can_accept_focus(component)
    }

    fn request_focus(&self, component: ComponentId) -> bool {
        self.update_focus(FocusReason::MenuRestore, |focus, tree| {
            focus.set_focus(tree, component, FocusReason::MenuRestore)
        })
    }

    fn focus_next(&self) -> bool {
        Toolkit::focus_next(self)
    }

    fn add_key_listener(&self, component: ComponentId, listener: KeyListener) -> KeyListenerId {
        self.insert_key_listener(component, listener)
    }

    fn remove_key_listener(&self, id: KeyListenerId) -> bool {
        self.remove_listener(id)
    }
}

impl std::fmt::Debug for Toolkit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.read();
        f.debug_struct("Toolkit")
            .field("components", &state.tree.component_count())
            .field("menu_bars", &state.menu_bars.len())
            .field("key_listeners", &state.key_listeners.len())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
