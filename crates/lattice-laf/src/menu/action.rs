//! Actions invoked by menu items.
//!
//! An [`Action`] is the command behind a menu item. It is shared (`Arc`)
//! between the item that displays it and whoever reacts to it. Triggering a
//! disabled action does nothing.
//!
//! ```
//! use std::sync::Arc;
//! use lattice_laf::menu::{Action, ActionEvent};
//!
//! let save = Arc::new(Action::new("Save"));
//! save.triggered.connect(|event: &ActionEvent| {
//!     println!("save via {}", event.chord);
//! });
//! ```

use parking_lot::RwLock;

use lattice_laf_core::{ComponentId, Signal};

use crate::keys::{KeyChord, KeyboardModifiers};

/// Describes why an action fired.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionEvent {
    /// The chord that matched the accelerator.
    pub chord: KeyChord,
    /// The component the key event was dispatched to.
    pub source: ComponentId,
    /// Text of the menu item whose accelerator matched.
    pub item_text: String,
    /// Modifiers held when the key was pressed.
    pub modifiers: KeyboardModifiers,
}

impl ActionEvent {
    /// Create an event for `chord` dispatched to `source` via the item `item_text`.
    pub fn new(chord: KeyChord, source: ComponentId, item_text: impl Into<String>) -> Self {
        Self {
            chord,
            source,
            item_text: item_text.into(),
            modifiers: chord.modifiers,
        }
    }
}

struct ActionState {
    text: String,
    enabled: bool,
}

/// A user command attached to menu items.
///
/// # Signals
///
/// - [`triggered`](Action::triggered): emitted when the action is activated
/// - [`changed`](Action::changed): emitted when text or enabled state changes
pub struct Action {
    state: RwLock<ActionState>,

    /// Signal emitted when the action is activated.
    pub triggered: Signal<ActionEvent>,

    /// Signal emitted when any action property changes.
    pub changed: Signal<()>,
}

impl Action {
    /// Create a new enabled action with the given text.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            state: RwLock::new(ActionState {
                text: text.into(),
                enabled: true,
            }),
            triggered: Signal::new(),
            changed: Signal::new(),
        }
    }

    /// Get the action's text.
    pub fn text(&self) -> String {
        self.state.read().text.clone()
    }

    /// Set the action's text.
    pub fn set_text(&self, text: impl Into<String>) {
        let text = text.into();
        {
            let mut state = self.state.write();
            if state.text == text {
                return;
            }
            state.text = text;
        }
        self.changed.emit(());
    }

    /// Check if the action is enabled.
    pub fn is_enabled(&self) -> bool {
        self.state.read().enabled
    }

    /// Set whether the action is enabled.
    pub fn set_enabled(&self, enabled: bool) {
        {
            let mut state = self.state.write();
            if state.enabled == enabled {
                return;
            }
            state.enabled = enabled;
        }
        self.changed.emit(());
    }

    /// Builder pattern for setting enabled state.
    pub fn with_enabled(self, enabled: bool) -> Self {
        self.set_enabled(enabled);
        self
    }

    /// Activate the action.
    ///
    /// Returns `false` (and emits nothing) if the action is disabled.
    pub fn trigger(&self, event: ActionEvent) -> bool {
        if !self.is_enabled() {
            return false;
        }
        self.triggered.emit(event);
        true
    }
}

impl std::fmt::Debug for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.read();
        f.debug_struct("Action")
            .field("text", &state.text)
            .field("enabled", &state.enabled)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::Key;
    use parking_lot::Mutex;
    use std::sync::Arc;

    fn event() -> ActionEvent {
        ActionEvent::new(KeyChord::ctrl(Key::S), ComponentId::default(), "Save")
    }

    #[test]
    fn test_trigger_emits_event() {
        let action = Action::new("Save");
        let received = Arc::new(Mutex::new(Vec::new()));

        let received_clone = received.clone();
        action.triggered.connect(move |e: &ActionEvent| {
            received_clone.lock().push(e.clone());
        });

        assert!(action.trigger(event()));
        let received = received.lock();
        assert_eq!(received.len(), 1);
        assert_eq!(received[0].item_text, "Save");
        assert_eq!(received[0].modifiers, KeyboardModifiers::CTRL);
    }

    #[test]
    fn test_disabled_action_does_not_trigger() {
        let action = Action::new("Save").with_enabled(false);
        let fired = Arc::new(Mutex::new(false));

        let fired_clone = fired.clone();
        action.triggered.connect(move |_| *fired_clone.lock() = true);

        assert!(!action.trigger(event()));
        assert!(!*fired.lock());
    }

    #[test]
    fn test_changed_only_on_real_change() {
        let action = Action::new("Save");
        let count = Arc::new(Mutex::new(0));

        let count_clone = count.clone();
        action.changed.connect(move |_| *count_clone.lock() += 1);

        action.set_enabled(true);
        action.set_enabled(false);
        action.set_text("Save");
        action.set_text("Save As");

        assert_eq!(*count.lock(), 2);
        assert_eq!(action.text(), "Save As");
    }
}
