//! Focus coordination while menus are open.
//!
//! When a menu opens (the selection path goes from empty to nonempty with a
//! menu element first) the coordinator remembers who owned focus and pulls
//! focus into the window owning the menu. If that window has no menu bar of
//! its own, keyboard input there would never reach the menu, so a key
//! listener is installed that forwards events to
//! [`MenuSelectionManager::process_key_event`]. When the path empties again
//! focus goes back to the previous owner, or to the next focusable component
//! if the previous owner can no longer take it.
//!
//! The coordinator is shared by every look-and-feel installation in a
//! toolkit. Installations call [`attach`](MenuFocusCoordinator::attach) and
//! [`detach`](MenuFocusCoordinator::detach) (or hold a [`CoordinatorHandle`]);
//! only the first attach subscribes to the selection manager and only the
//! last detach unsubscribes.

use std::sync::{Arc, Weak};

use parking_lot::Mutex;

use lattice_laf_core::logging::{span_names, targets};
use lattice_laf_core::{ComponentId, ConnectionId, ThreadAffinity};

use crate::keys::KeyEvent;
use crate::menu::{MenuElement, MenuSelectionManager};

use super::host::{FocusHost, KeyListener, KeyListenerId};

/// Behaviour switches for [`MenuFocusCoordinator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoordinatorOptions {
    /// Install a key forwarder on grabbed windows without a menu bar.
    pub forward_keys_to_menus: bool,
    /// Give focus back when the menu closes.
    pub restore_focus_on_menu_close: bool,
    /// Assert UI-thread affinity in debug builds.
    pub thread_checks: bool,
}

impl Default for CoordinatorOptions {
    fn default() -> Self {
        Self {
            forward_keys_to_menus: true,
            restore_focus_on_menu_close: true,
            thread_checks: true,
        }
    }
}

/// Whether the coordinator currently holds focus for an open menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CoordinatorPhase {
    /// No menu-driven focus grab.
    Idle,
    /// Focus was moved into a window for an open menu.
    Grabbed,
}

#[derive(Debug, Default)]
struct CoordinatorState {
    install_count: usize,
    subscription: Option<ConnectionId>,
    previous_focus_owner: Option<ComponentId>,
    grabbed_window: Option<ComponentId>,
    key_forwarder: Option<KeyListenerId>,
    last_path_len: usize,
    /// Set while `grab` waits on the host's focus request.
    grab_pending: bool,
}

/// Reference-counted listener on the menu selection path that moves focus
/// in and out of menus.
pub struct MenuFocusCoordinator {
    selection: Arc<MenuSelectionManager>,
    host: Weak<dyn FocusHost>,
    options: CoordinatorOptions,
    state: Mutex<CoordinatorState>,
    affinity: ThreadAffinity,
    weak_self: Weak<MenuFocusCoordinator>,
}

impl MenuFocusCoordinator {
    /// Create a detached coordinator.
    ///
    /// The host is held weakly; once it is dropped the coordinator does
    /// nothing.
    pub fn new(
        selection: Arc<MenuSelectionManager>,
        host: Weak<dyn FocusHost>,
        options: CoordinatorOptions,
    ) -> Arc<Self> {
        Arc::new_cyclic(|weak_self| Self {
            selection,
            host,
            options,
            state: Mutex::new(CoordinatorState::default()),
            affinity: ThreadAffinity::current().with_checks_enabled(options.thread_checks),
            weak_self: weak_self.clone(),
        })
    }

    /// The options this coordinator was created with.
    pub fn options(&self) -> CoordinatorOptions {
        self.options
    }

    // =========================================================================
    // Installation
    // =========================================================================

    /// Register one installation. The first one subscribes to the selection
    /// manager.
    pub fn attach(&self) {
        self.affinity.debug_assert_same_thread();
        let mut state = self.state.lock();
        state.install_count += 1;
        if state.install_count > 1 {
            return;
        }

        let weak = self.weak_self.clone();
        let id = self.selection.state_changed.connect(move |path: &Vec<MenuElement>| {
            if let Some(coordinator) = weak.upgrade() {
                coordinator.on_path_changed(path);
            }
        });
        state.subscription = Some(id);
        state.last_path_len = self.selection.selected_path().len();
        tracing::debug!(target: targets::FOCUS, "menu focus coordinator subscribed");
    }

    /// Unregister one installation. The last one unsubscribes, releasing any
    /// active grab first. Detaching with nothing attached does nothing.
    pub fn detach(&self) {
        self.affinity.debug_assert_same_thread();
        let last = {
            let mut state = self.state.lock();
            if state.install_count == 0 {
                return;
            }
            state.install_count -= 1;
            state.install_count == 0
        };
        if !last {
            return;
        }

        if self.is_grabbed() {
            self.release();
        }
        let subscription = {
            let mut state = self.state.lock();
            state.last_path_len = 0;
            state.subscription.take()
        };
        if let Some(id) = subscription {
            self.selection.state_changed.disconnect(id);
        }
        tracing::debug!(target: targets::FOCUS, "menu focus coordinator unsubscribed");
    }

    /// Attach and return a guard that detaches when dropped.
    pub fn acquire(self: &Arc<Self>) -> CoordinatorHandle {
        self.attach();
        CoordinatorHandle {
            coordinator: Arc::clone(self),
        }
    }

    /// Number of live installations.
    pub fn install_count(&self) -> usize {
        self.state.lock().install_count
    }

    /// Check if the coordinator listens to the selection manager.
    pub fn is_attached(&self) -> bool {
        self.state.lock().subscription.is_some()
    }

    // =========================================================================
    // Grab state
    // =========================================================================

    /// Current phase.
    pub fn phase(&self) -> CoordinatorPhase {
        if self.is_grabbed() {
            CoordinatorPhase::Grabbed
        } else {
            CoordinatorPhase::Idle
        }
    }

    /// Check if focus is currently held for an open menu.
    pub fn is_grabbed(&self) -> bool {
        self.state.lock().grabbed_window.is_some()
    }

    /// The window that received focus for the open menu.
    pub fn grabbed_window(&self) -> Option<ComponentId> {
        self.state.lock().grabbed_window
    }

    /// The focus owner recorded when the menu opened.
    pub fn previous_focus_owner(&self) -> Option<ComponentId> {
        self.state.lock().previous_focus_owner
    }

    /// Check if a key forwarder is installed on the grabbed window.
    pub fn has_key_forwarder(&self) -> bool {
        self.state.lock().key_forwarder.is_some()
    }

    fn on_path_changed(&self, path: &[MenuElement]) {
        self.affinity.debug_assert_same_thread();
        let old_len = std::mem::replace(&mut self.state.lock().last_path_len, path.len());

        if old_len == 0 && !path.is_empty() {
            if path[0].is_menu() {
                self.grab(path);
            }
        } else if old_len != 0 && path.is_empty() && self.is_grabbed() {
            self.release();
        }
    }

    fn grab(&self, path: &[MenuElement]) {
        let Some(host) = self.host.upgrade() else {
            return;
        };
        let _span =
            tracing::debug_span!(target: targets::FOCUS, span_names::FOCUS_COORDINATION, phase = "grab")
                .entered();

        let previous = host.focus_owner();
        {
            let mut state = self.state.lock();
            if state.grab_pending {
                return;
            }
            state.grab_pending = true;
        }

        // Focus requests notify focus listeners, which may close the menu
        // or detach the coordinator before the grab is recorded.
        let window = path.iter().find_map(|element| {
            let window = host.window_of(element.component)?;
            host.request_window_focus(window).then_some(window)
        });
        self.state.lock().grab_pending = false;
        let Some(window) = window else {
            tracing::debug!(target: targets::FOCUS, "no window accepted focus for the open menu");
            return;
        };
        if !self.selection.is_active() || !self.is_attached() {
            tracing::debug!(target: targets::FOCUS, ?window, "menu closed while focus moved into it");
            self.restore_focus(&*host, previous);
            return;
        }

        let forwarder = (self.options.forward_keys_to_menus && !host.has_menu_bar(window)).then(|| {
            let selection = Arc::downgrade(&self.selection);
            let listener: KeyListener = Arc::new(move |event: &mut KeyEvent| {
                if let Some(selection) = selection.upgrade() {
                    selection.process_key_event(event);
                }
            });
            host.add_key_listener(window, listener)
        });

        tracing::debug!(
            target: targets::FOCUS,
            ?previous,
            ?window,
            forwarding = forwarder.is_some(),
            "menu grabbed focus"
        );
        let mut state = self.state.lock();
        state.previous_focus_owner = previous;
        state.grabbed_window = Some(window);
        state.key_forwarder = forwarder;
    }

    fn release(&self) {
        let (previous, forwarder) = {
            let mut state = self.state.lock();
            state.grabbed_window = None;
            (state.previous_focus_owner.take(), state.key_forwarder.take())
        };
        let Some(host) = self.host.upgrade() else {
            return;
        };
        let _span =
            tracing::debug_span!(target: targets::FOCUS, span_names::FOCUS_COORDINATION, phase = "release")
                .entered();

        self.restore_focus(&*host, previous);
        if let Some(id) = forwarder {
            host.remove_key_listener(id);
        }
    }

    fn restore_focus(&self, host: &dyn FocusHost, previous: Option<ComponentId>) {
        if !self.options.restore_focus_on_menu_close {
            return;
        }
        match previous {
            Some(owner) if host.can_restore_focus(owner) => {
                tracing::debug!(target: targets::FOCUS, ?owner, "restoring focus after menu");
                host.request_focus(owner);
            }
            _ => {
                tracing::debug!(target: targets::FOCUS, ?previous, "previous focus owner gone, advancing focus");
                host.focus_next();
            }
        }
    }
}

impl std::fmt::Debug for MenuFocusCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MenuFocusCoordinator")
            .field("options", &self.options)
            .field("state", &*self.state.lock())
            .finish_non_exhaustive()
    }
}

/// Keeps a coordinator attached for as long as it lives.
#[must_use = "the coordinator detaches as soon as the handle is dropped"]
pub struct CoordinatorHandle {
    coordinator: Arc<MenuFocusCoordinator>,
}

impl CoordinatorHandle {
    /// The coordinator this handle keeps attached.
    pub fn coordinator(&self) -> &Arc<MenuFocusCoordinator> {
        &self.coordinator
    }
}

impl Drop for CoordinatorHandle {
    fn drop(&mut self) {
        self.coordinator.detach();
    }
}

impl std::fmt::Debug for CoordinatorHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoordinatorHandle").finish_non_exhaustive()
    }
}
