//! Conversion of winit keyboard input into [`KeyEvent`]s.
//!
//! [`KeyboardInputHandler`] tracks modifier state between winit events and
//! turns each keyboard input into a `KeyEvent` addressed to a component
//! (normally the current focus owner), ready for
//! [`Toolkit::dispatch_key_event`](crate::Toolkit::dispatch_key_event).
//!
//! ```ignore
//! let mut handler = KeyboardInputHandler::new();
//!
//! match event {
//!     WindowEvent::ModifiersChanged(m) => handler.update_modifiers(&m),
//!     WindowEvent::KeyboardInput { event, .. } => {
//!         if let Some(target) = toolkit.key_target() {
//!             let mut key_event = handler.key_event(
//!                 &event.logical_key,
//!                 &event.physical_key,
//!                 event.state,
//!                 event.text.as_deref(),
//!                 event.repeat,
//!                 target,
//!             );
//!             toolkit.dispatch_key_event(&mut key_event);
//!         }
//!     }
//!     _ => {}
//! }
//! ```

use lattice_laf_core::ComponentId;
use winit::event::{ElementState, Modifiers};
use winit::keyboard::{Key as WinitKey, KeyCode, NamedKey, PhysicalKey};

use crate::keys::{Key, KeyChord, KeyEvent, KeyboardModifiers};

/// Converts a winit logical key to a [`Key`].
pub fn from_winit_key(key: &WinitKey) -> Key {
    match key {
        WinitKey::Named(named) => from_winit_named_key(named),
        WinitKey::Character(c) => from_character(c),
        WinitKey::Unidentified(_) | WinitKey::Dead(_) => Key::Unknown(0),
    }
}

fn from_winit_named_key(key: &NamedKey) -> Key {
    match key {
        NamedKey::ArrowUp => Key::ArrowUp,
        NamedKey::ArrowDown => Key::ArrowDown,
        NamedKey::ArrowLeft => Key::ArrowLeft,
        NamedKey::ArrowRight => Key::ArrowRight,
        NamedKey::Home => Key::Home,
        NamedKey::End => Key::End,
        NamedKey::PageUp => Key::PageUp,
        NamedKey::PageDown => Key::PageDown,

        NamedKey::Backspace => Key::Backspace,
        NamedKey::Delete => Key::Delete,
        NamedKey::Insert => Key::Insert,
        NamedKey::Enter => Key::Enter,
        NamedKey::Tab => Key::Tab,
        NamedKey::Space => Key::Space,
        NamedKey::Escape => Key::Escape,

        NamedKey::Shift => Key::ShiftLeft,
        NamedKey::Control => Key::ControlLeft,
        NamedKey::Alt => Key::AltLeft,
        NamedKey::Super => Key::MetaLeft,

        NamedKey::F1 => Key::F1,
        NamedKey::F2 => Key::F2,
        NamedKey::F3 => Key::F3,
        NamedKey::F4 => Key::F4,
        NamedKey::F5 => Key::F5,
        NamedKey::F6 => Key::F6,
        NamedKey::F7 => Key::F7,
        NamedKey::F8 => Key::F8,
        NamedKey::F9 => Key::F9,
        NamedKey::F10 => Key::F10,
        NamedKey::F11 => Key::F11,
        NamedKey::F12 => Key::F12,

        _ => Key::Unknown(0),
    }
}

fn from_character(c: &str) -> Key {
    let mut chars = c.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) => Key::from_char(ch)
            .unwrap_or_else(|| Key::Unknown(u16::try_from(u32::from(ch)).unwrap_or(0))),
        _ => Key::Unknown(0),
    }
}

/// Converts a winit physical key to a [`Key`].
///
/// Physical keys are layout independent, so accelerators keep working on
/// non-QWERTY layouts.
pub fn from_winit_physical_key(physical: &PhysicalKey) -> Key {
    match physical {
        PhysicalKey::Code(code) => from_winit_key_code(code),
        PhysicalKey::Unidentified(_) => Key::Unknown(0),
    }
}

fn from_winit_key_code(code: &KeyCode) -> Key {
    match code {
        KeyCode::KeyA => Key::A,
        KeyCode::KeyB => Key::B,
        KeyCode::KeyC => Key::C,
        KeyCode::KeyD => Key::D,
        KeyCode::KeyE => Key::E,
        KeyCode::KeyF => Key::F,
        KeyCode::KeyG => Key::G,
        KeyCode::KeyH => Key::H,
        KeyCode::KeyI => Key::I,
        KeyCode::KeyJ => Key::J,
        KeyCode::KeyK => Key::K,
        KeyCode::KeyL => Key::L,
        KeyCode::KeyM => Key::M,
        KeyCode::KeyN => Key::N,
        KeyCode::KeyO => Key::O,
        KeyCode::KeyP => Key::P,
        KeyCode::KeyQ => Key::Q,
        KeyCode::KeyR => Key::R,
        KeyCode::KeyS => Key::S,
        KeyCode::KeyT => Key::T,
        KeyCode::KeyU => Key::U,
        KeyCode::KeyV => Key::V,
        KeyCode::KeyW => Key::W,
        KeyCode::KeyX => Key::X,
        KeyCode::KeyY => Key::Y,
        KeyCode::KeyZ => Key::Z,

        KeyCode::Digit0 => Key::Digit0,
        KeyCode::Digit1 => Key::Digit1,
        KeyCode::Digit2 => Key::Digit2,
        KeyCode::Digit3 => Key::Digit3,
        KeyCode::Digit4 => Key::Digit4,
        KeyCode::Digit5 => Key::Digit5,
        KeyCode::Digit6 => Key::Digit6,
        KeyCode::Digit7 => Key::Digit7,
        KeyCode::Digit8 => Key::Digit8,
        KeyCode::Digit9 => Key::Digit9,

        KeyCode::F1 => Key::F1,
        KeyCode::F2 => Key::F2,
        KeyCode::F3 => Key::F3,
        KeyCode::F4 => Key::F4,
        KeyCode::F5 => Key::F5,
        KeyCode::F6 => Key::F6,
        KeyCode::F7 => Key::F7,
        KeyCode::F8 => Key::F8,
        KeyCode::F9 => Key::F9,
        KeyCode::F10 => Key::F10,
        KeyCode::F11 => Key::F11,
        KeyCode::F12 => Key::F12,

        KeyCode::ArrowUp => Key::ArrowUp,
        KeyCode::ArrowDown => Key::ArrowDown,
        KeyCode::ArrowLeft => Key::ArrowLeft,
        KeyCode::ArrowRight => Key::ArrowRight,
        KeyCode::Home => Key::Home,
        KeyCode::End => Key::End,
        KeyCode::PageUp => Key::PageUp,
        KeyCode::PageDown => Key::PageDown,

        KeyCode::Backspace => Key::Backspace,
        KeyCode::Delete => Key::Delete,
        KeyCode::Insert => Key::Insert,
        KeyCode::Enter | KeyCode::NumpadEnter => Key::Enter,
        KeyCode::Tab => Key::Tab,
        KeyCode::Space => Key::Space,
        KeyCode::Escape => Key::Escape,

        KeyCode::ShiftLeft => Key::ShiftLeft,
        KeyCode::ShiftRight => Key::ShiftRight,
        KeyCode::ControlLeft => Key::ControlLeft,
        KeyCode::ControlRight => Key::ControlRight,
        KeyCode::AltLeft => Key::AltLeft,
        KeyCode::AltRight => Key::AltRight,
        KeyCode::SuperLeft => Key::MetaLeft,
        KeyCode::SuperRight => Key::MetaRight,

        KeyCode::Minus => Key::Minus,
        KeyCode::Equal => Key::Equal,
        KeyCode::BracketLeft => Key::BracketLeft,
        KeyCode::BracketRight => Key::BracketRight,
        KeyCode::Backslash => Key::Backslash,
        KeyCode::Semicolon => Key::Semicolon,
        KeyCode::Quote => Key::Quote,
        KeyCode::Comma => Key::Comma,
        KeyCode::Period => Key::Period,
        KeyCode::Slash => Key::Slash,
        KeyCode::Backquote => Key::Grave,

        _ => Key::Unknown(0),
    }
}

/// Converts winit modifiers to [`KeyboardModifiers`].
pub fn from_winit_modifiers(modifiers: &Modifiers) -> KeyboardModifiers {
    let state = modifiers.state();
    KeyboardModifiers {
        shift: state.shift_key(),
        control: state.control_key(),
        alt: state.alt_key(),
        meta: state.super_key(),
    }
}

/// Tracks modifier state and builds [`KeyEvent`]s from winit input.
#[derive(Debug, Default)]
pub struct KeyboardInputHandler {
    modifiers: KeyboardModifiers,
}

impl KeyboardInputHandler {
    /// Creates a new handler with no modifiers pressed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets the current modifier key state.
    pub fn modifiers(&self) -> KeyboardModifiers {
        self.modifiers
    }

    /// Updates the modifier state from a winit `ModifiersChanged` event.
    pub fn update_modifiers(&mut self, modifiers: &Modifiers) {
        self.modifiers = from_winit_modifiers(modifiers);
    }

    /// Sets the modifier state directly.
    pub fn set_modifiers(&mut self, modifiers: KeyboardModifiers) {
        self.modifiers = modifiers;
    }

    /// Builds a key event for `target` from winit keyboard input.
    ///
    /// The physical key is preferred; the logical key is used when the
    /// physical key is not recognised. Release events carry no text.
    pub fn key_event(
        &self,
        logical_key: &WinitKey,
        physical_key: &PhysicalKey,
        state: ElementState,
        text: Option<&str>,
        is_repeat: bool,
        target: ComponentId,
    ) -> KeyEvent {
        let key = match from_winit_physical_key(physical_key) {
            Key::Unknown(_) => from_winit_key(logical_key),
            key => key,
        };

        let chord = KeyChord::new(key, self.modifiers);
        match state {
            ElementState::Pressed => KeyEvent::new(chord, target)
                .with_text(text.unwrap_or(""))
                .with_repeat(is_repeat),
            ElementState::Released => KeyEvent::new(chord.on_release(), target),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::KeyPhase;
    use winit::keyboard::SmolStr;

    #[test]
    fn test_character_conversion() {
        assert_eq!(from_character("a"), Key::A);
        assert_eq!(from_character("A"), Key::A);
        assert_eq!(from_character("0"), Key::Digit0);
        assert_eq!(from_character(" "), Key::Space);
        assert!(matches!(from_character("ab"), Key::Unknown(_)));
        assert!(matches!(from_character(""), Key::Unknown(_)));
        assert_eq!(from_character("é"), Key::Unknown(0xE9));
        // Outside the basic plane there is no code to carry.
        assert_eq!(from_character("\u{1F600}"), Key::Unknown(0));
        assert_eq!(from_character("\u{1F389}"), Key::Unknown(0));
    }

    #[test]
    fn test_key_code_conversion() {
        assert_eq!(from_winit_key_code(&KeyCode::KeyA), Key::A);
        assert_eq!(from_winit_key_code(&KeyCode::Enter), Key::Enter);
        assert_eq!(from_winit_key_code(&KeyCode::F1), Key::F1);
        assert_eq!(from_winit_key_code(&KeyCode::ShiftRight), Key::ShiftRight);
    }

    #[test]
    fn test_named_key_conversion() {
        assert_eq!(from_winit_named_key(&NamedKey::Escape), Key::Escape);
        assert_eq!(from_winit_named_key(&NamedKey::ArrowLeft), Key::ArrowLeft);
    }

    #[test]
    fn test_key_event_pressed_and_released() {
        let mut handler = KeyboardInputHandler::new();
        handler.set_modifiers(KeyboardModifiers::CTRL);
        let target = ComponentId::default();

        let pressed = handler.key_event(
            &WinitKey::Character(SmolStr::new("s")),
            &PhysicalKey::Code(KeyCode::KeyS),
            ElementState::Pressed,
            Some("s"),
            false,
            target,
        );
        assert_eq!(pressed.chord, KeyChord::ctrl(Key::S));
        assert_eq!(pressed.text, "s");

        let released = handler.key_event(
            &WinitKey::Character(SmolStr::new("s")),
            &PhysicalKey::Code(KeyCode::KeyS),
            ElementState::Released,
            None,
            false,
            target,
        );
        assert_eq!(released.chord.phase, KeyPhase::Released);
        assert!(released.text.is_empty());
    }

    #[test]
    fn test_logical_key_fallback() {
        let handler = KeyboardInputHandler::new();
        let event = handler.key_event(
            &WinitKey::Named(NamedKey::Escape),
            &PhysicalKey::Code(KeyCode::Fn),
            ElementState::Pressed,
            None,
            false,
            ComponentId::default(),
        );
        assert_eq!(event.key(), Key::Escape);
    }
}
