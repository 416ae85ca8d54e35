//! Routing of key events to menu accelerators.
//!
//! Before a key event reaches the focused component, the router checks
//! whether it activates a menu item somewhere up the window chain:
//!
//! 1. Start at the root pane (window) of the event's source component.
//! 2. If that window has a menu bar, search it depth-first in pre-order,
//!    children in declared order, for a leaf whose accelerator equals the
//!    event's chord and whose action is present and enabled.
//! 3. Otherwise (or without a match) move outward to the owner's root pane
//!    and repeat.
//!
//! The first match wins: its action is triggered and the event consumed.
//! Items that match but have no action, or a disabled one, are skipped and
//! the search continues.

use std::sync::Arc;

use lattice_laf_core::logging::{span_names, targets};
use lattice_laf_core::{ComponentId, PerfSpan};

use crate::keys::{KeyChord, KeyEvent};

use super::action::{Action, ActionEvent};
use super::node::MenuBar;

/// What the router needs to know about the widget hierarchy.
pub trait MenuHost {
    /// The window enclosing `component` (a window is its own root pane).
    fn root_pane_of(&self, component: ComponentId) -> Option<ComponentId>;

    /// The next root pane outward from `root_pane`, if it has an owner.
    fn outer_root_pane(&self, root_pane: ComponentId) -> Option<ComponentId>;

    /// The menu bar installed on `root_pane`.
    fn menu_bar(&self, root_pane: ComponentId) -> Option<Arc<MenuBar>>;
}

/// A menu item selected for activation.
#[derive(Debug, Clone)]
pub struct AcceleratorMatch {
    /// The window whose menu bar held the item.
    pub window: ComponentId,
    /// Text of the matched item.
    pub item_text: String,
    /// The enabled action to trigger.
    pub action: Arc<Action>,
}

impl AcceleratorMatch {
    /// Trigger the matched action on behalf of `event`.
    ///
    /// Returns `false` if the action was disabled in the meantime.
    pub fn activate(&self, event: &KeyEvent) -> bool {
        self.action
            .trigger(ActionEvent::new(event.chord, event.source, self.item_text.clone()))
    }
}

/// Pre-dispatch hook that activates menu accelerators.
#[derive(Debug, Default, Clone, Copy)]
pub struct MenuAcceleratorRouter;

impl MenuAcceleratorRouter {
    /// Create a router.
    pub fn new() -> Self {
        Self
    }

    /// The root panes from `source`'s window outward.
    pub fn window_chain<H: MenuHost + ?Sized>(&self, host: &H, source: ComponentId) -> Vec<ComponentId> {
        let mut chain = Vec::new();
        let mut current = host.root_pane_of(source);
        while let Some(window) = current {
            if chain.contains(&window) {
                break;
            }
            chain.push(window);
            current = host.outer_root_pane(window);
        }
        chain
    }

    /// Find the item `chord` would activate for a key event from `source`.
    ///
    /// Windows are searched innermost first; within a window the first leaf
    /// in pre-order wins.
    pub fn find_target<H: MenuHost + ?Sized>(
        &self,
        host: &H,
        chord: &KeyChord,
        source: ComponentId,
    ) -> Option<AcceleratorMatch> {
        let _span = PerfSpan::new(span_names::ACCELERATOR);

        for window in self.window_chain(host, source) {
            let Some(bar) = host.menu_bar(window) else {
                continue;
            };
            let found = bar.find_item(|item| {
                item.activation_target(chord).map(|action| AcceleratorMatch {
                    window,
                    item_text: item.text().to_string(),
                    action: action.clone(),
                })
            });
            if found.is_some() {
                return found;
            }
        }
        None
    }

    /// Route `event` to a menu accelerator.
    ///
    /// Returns `true` and marks the event consumed if an action was
    /// triggered. Already-consumed events are ignored.
    pub fn route<H: MenuHost + ?Sized>(&self, host: &H, event: &mut KeyEvent) -> bool {
        if event.is_consumed() {
            return false;
        }

        let Some(target) = self.find_target(host, &event.chord, event.source) else {
            return false;
        };
        self.activate(target, event)
    }

    /// Trigger a match found by [`find_target`](Self::find_target) and
    /// consume the event if the action ran.
    pub fn activate(&self, target: AcceleratorMatch, event: &mut KeyEvent) -> bool {
        if !target.activate(event) {
            return false;
        }
        tracing::debug!(
            target: targets::ACCELERATOR,
            chord = %event.chord,
            item = %target.item_text,
            window = ?target.window,
            "accelerator activated menu item"
        );
        event.consume();
        true
    }
}
