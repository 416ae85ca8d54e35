//! Keys, key chords and key events.
//!
//! A [`KeyChord`] is the value an accelerator binding is compared against: a
//! key, the modifiers held, and whether the chord fires on press or release.
//! Chords compare by plain equality; there is no partial or fuzzy matching.
//!
//! Chords can be written the way menus display them:
//!
//! ```
//! use lattice_laf::keys::{Key, KeyChord, KeyboardModifiers};
//!
//! let save: KeyChord = "Ctrl+S".parse().unwrap();
//! assert_eq!(save, KeyChord::ctrl(Key::S));
//! assert_eq!(save.to_string(), "Ctrl+S");
//!
//! let close: KeyChord = "alt+f4".parse().unwrap();
//! assert_eq!(close.modifiers, KeyboardModifiers::ALT);
//! ```

use std::fmt;
use std::str::FromStr;

use lattice_laf_core::ComponentId;
use thiserror::Error;

// =============================================================================
// Modifiers
// =============================================================================

/// Keyboard modifiers that may be held during key input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct KeyboardModifiers {
    /// The Shift key is held.
    pub shift: bool,
    /// The Control key is held.
    pub control: bool,
    /// The Alt key is held (Option on macOS).
    pub alt: bool,
    /// The Meta/Super key is held (Windows key, Cmd on macOS).
    pub meta: bool,
}

impl KeyboardModifiers {
    /// No modifiers pressed.
    pub const NONE: Self = Self {
        shift: false,
        control: false,
        alt: false,
        meta: false,
    };

    /// Shift modifier only.
    pub const SHIFT: Self = Self {
        shift: true,
        control: false,
        alt: false,
        meta: false,
    };

    /// Control modifier only.
    pub const CTRL: Self = Self {
        shift: false,
        control: true,
        alt: false,
        meta: false,
    };

    /// Alt modifier only.
    pub const ALT: Self = Self {
        shift: false,
        control: false,
        alt: true,
        meta: false,
    };

    /// Meta modifier only.
    pub const META: Self = Self {
        shift: false,
        control: false,
        alt: false,
        meta: true,
    };

    /// Control + Shift modifiers.
    pub const CTRL_SHIFT: Self = Self {
        shift: true,
        control: true,
        alt: false,
        meta: false,
    };

    /// Check if any modifier is pressed.
    pub fn any(&self) -> bool {
        self.shift || self.control || self.alt || self.meta
    }

    /// Check if no modifiers are pressed.
    pub fn none(&self) -> bool {
        !self.any()
    }
}

// =============================================================================
// Keys
// =============================================================================

/// Keyboard key codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[rustfmt::skip]
pub enum Key {
    // Letters
    A, B, C, D, E, F, G, H, I, J, K, L, M,
    N, O, P, Q, R, S, T, U, V, W, X, Y, Z,

    // Numbers (main keyboard)
    Digit0, Digit1, Digit2, Digit3, Digit4,
    Digit5, Digit6, Digit7, Digit8, Digit9,

    // Function keys
    F1, F2, F3, F4, F5, F6, F7, F8, F9, F10, F11, F12,

    // Navigation
    ArrowUp, ArrowDown, ArrowLeft, ArrowRight,
    Home, End, PageUp, PageDown,

    // Editing
    Backspace, Delete, Insert,
    Enter, Tab, Space, Escape,

    // Modifiers
    ShiftLeft, ShiftRight,
    ControlLeft, ControlRight,
    AltLeft, AltRight,
    MetaLeft, MetaRight,

    // Punctuation and symbols
    Minus, Equal,
    BracketLeft, BracketRight, Backslash,
    Semicolon, Quote,
    Comma, Period, Slash,
    Grave,

    /// Unknown/unmapped key.
    Unknown(u16),
}

impl Key {
    /// Check if this is a modifier key.
    pub fn is_modifier(&self) -> bool {
        matches!(
            self,
            Key::ShiftLeft
                | Key::ShiftRight
                | Key::ControlLeft
                | Key::ControlRight
                | Key::AltLeft
                | Key::AltRight
                | Key::MetaLeft
                | Key::MetaRight
        )
    }

    /// Check if this is a navigation key.
    pub fn is_navigation(&self) -> bool {
        matches!(
            self,
            Key::ArrowUp
                | Key::ArrowDown
                | Key::ArrowLeft
                | Key::ArrowRight
                | Key::Home
                | Key::End
                | Key::PageUp
                | Key::PageDown
        )
    }

    /// Map a typed character to its key (letters case-insensitively).
    pub fn from_char(ch: char) -> Option<Key> {
        let upper = ch.to_ascii_uppercase();
        if upper.is_ascii_uppercase() {
            return Some(LETTER_KEYS[(upper as u8 - b'A') as usize]);
        }
        if ch.is_ascii_digit() {
            return Some(DIGIT_KEYS[(ch as u8 - b'0') as usize]);
        }
        match ch {
            '-' => Some(Key::Minus),
            '=' => Some(Key::Equal),
            '[' => Some(Key::BracketLeft),
            ']' => Some(Key::BracketRight),
            '\\' => Some(Key::Backslash),
            ';' => Some(Key::Semicolon),
            '\'' => Some(Key::Quote),
            ',' => Some(Key::Comma),
            '.' => Some(Key::Period),
            '/' => Some(Key::Slash),
            '`' => Some(Key::Grave),
            ' ' => Some(Key::Space),
            _ => None,
        }
    }

    /// The display name used by [`KeyChord`]'s `Display` impl.
    pub fn name(&self) -> &'static str {
        const LETTERS: [&str; 26] = [
            "A", "B", "C", "D", "E", "F", "G", "H", "I", "J", "K", "L", "M", "N", "O", "P",
            "Q", "R", "S", "T", "U", "V", "W", "X", "Y", "Z",
        ];
        if let Some(index) = LETTER_KEYS.iter().position(|k| k == self) {
            return LETTERS[index];
        }
        match self {
            Key::Digit0 => "0",
            Key::Digit1 => "1",
            Key::Digit2 => "2",
            Key::Digit3 => "3",
            Key::Digit4 => "4",
            Key::Digit5 => "5",
            Key::Digit6 => "6",
            Key::Digit7 => "7",
            Key::Digit8 => "8",
            Key::Digit9 => "9",
            Key::F1 => "F1",
            Key::F2 => "F2",
            Key::F3 => "F3",
            Key::F4 => "F4",
            Key::F5 => "F5",
            Key::F6 => "F6",
            Key::F7 => "F7",
            Key::F8 => "F8",
            Key::F9 => "F9",
            Key::F10 => "F10",
            Key::F11 => "F11",
            Key::F12 => "F12",
            Key::ArrowUp => "Up",
            Key::ArrowDown => "Down",
            Key::ArrowLeft => "Left",
            Key::ArrowRight => "Right",
            Key::Home => "Home",
            Key::End => "End",
            Key::PageUp => "PageUp",
            Key::PageDown => "PageDown",
            Key::Backspace => "Backspace",
            Key::Delete => "Delete",
            Key::Insert => "Insert",
            Key::Enter => "Enter",
            Key::Tab => "Tab",
            Key::Space => "Space",
            Key::Escape => "Escape",
            Key::Minus => "-",
            Key::Equal => "=",
            Key::BracketLeft => "[",
            Key::BracketRight => "]",
            Key::Backslash => "\\",
            Key::Semicolon => ";",
            Key::Quote => "'",
            Key::Comma => "Comma",
            Key::Period => ".",
            Key::Slash => "/",
            Key::Grave => "`",
            Key::ShiftLeft | Key::ShiftRight => "Shift",
            Key::ControlLeft | Key::ControlRight => "Ctrl",
            Key::AltLeft | Key::AltRight => "Alt",
            Key::MetaLeft | Key::MetaRight => "Meta",
            _ => "Unknown",
        }
    }
}

#[rustfmt::skip]
const LETTER_KEYS: [Key; 26] = [
    Key::A, Key::B, Key::C, Key::D, Key::E, Key::F, Key::G, Key::H, Key::I,
    Key::J, Key::K, Key::L, Key::M, Key::N, Key::O, Key::P, Key::Q, Key::R,
    Key::S, Key::T, Key::U, Key::V, Key::W, Key::X, Key::Y, Key::Z,
];

#[rustfmt::skip]
const DIGIT_KEYS: [Key; 10] = [
    Key::Digit0, Key::Digit1, Key::Digit2, Key::Digit3, Key::Digit4,
    Key::Digit5, Key::Digit6, Key::Digit7, Key::Digit8, Key::Digit9,
];

#[rustfmt::skip]
const FUNCTION_KEYS: [Key; 12] = [
    Key::F1, Key::F2, Key::F3, Key::F4, Key::F5, Key::F6,
    Key::F7, Key::F8, Key::F9, Key::F10, Key::F11, Key::F12,
];

// =============================================================================
// Key Chord
// =============================================================================

/// Whether a chord fires when the key goes down or when it comes back up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum KeyPhase {
    /// Key press (including auto-repeat).
    #[default]
    Pressed,
    /// Key release.
    Released,
}

/// A single key combination: key, modifiers and phase.
///
/// This is both the accelerator stored on a menu item and the chord carried by
/// every [`KeyEvent`]. Two chords match iff they are equal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct KeyChord {
    /// The primary key.
    pub key: Key,
    /// The modifier keys that must be held.
    pub modifiers: KeyboardModifiers,
    /// Press or release.
    pub phase: KeyPhase,
}

impl KeyChord {
    /// Create a pressed chord from a key and modifiers.
    pub fn new(key: Key, modifiers: KeyboardModifiers) -> Self {
        Self {
            key,
            modifiers,
            phase: KeyPhase::Pressed,
        }
    }

    /// Create a pressed chord with no modifiers.
    pub fn key_only(key: Key) -> Self {
        Self::new(key, KeyboardModifiers::NONE)
    }

    /// Create a Ctrl+key chord.
    pub fn ctrl(key: Key) -> Self {
        Self::new(key, KeyboardModifiers::CTRL)
    }

    /// Create an Alt+key chord.
    pub fn alt(key: Key) -> Self {
        Self::new(key, KeyboardModifiers::ALT)
    }

    /// Create a Shift+key chord.
    pub fn shift(key: Key) -> Self {
        Self::new(key, KeyboardModifiers::SHIFT)
    }

    /// Create a Ctrl+Shift+key chord.
    pub fn ctrl_shift(key: Key) -> Self {
        Self::new(key, KeyboardModifiers::CTRL_SHIFT)
    }

    /// The same chord, firing on release instead of press.
    pub fn on_release(self) -> Self {
        Self {
            phase: KeyPhase::Released,
            ..self
        }
    }

    /// Check if `other` is the same chord.
    #[inline]
    pub fn matches(&self, other: &KeyChord) -> bool {
        self == other
    }
}

impl fmt::Display for KeyChord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.phase == KeyPhase::Released {
            f.write_str("released ")?;
        }

        let mut parts = Vec::new();
        if self.modifiers.control {
            parts.push("Ctrl");
        }
        if self.modifiers.alt {
            parts.push("Alt");
        }
        if self.modifiers.shift {
            parts.push("Shift");
        }
        if self.modifiers.meta {
            parts.push("Meta");
        }
        parts.push(self.key.name());

        write!(f, "{}", parts.join("+"))
    }
}

/// Error type for parsing key chords.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyChordParseError {
    /// The string is empty.
    #[error("empty key chord")]
    Empty,
    /// No key was specified (only modifiers).
    #[error("no key specified (only modifiers)")]
    NoKey,
    /// More than one non-modifier key.
    #[error("more than one key in chord: {0}")]
    MultipleKeys(String),
    /// Unknown key name.
    #[error("unknown key: {0}")]
    UnknownKey(String),
}

impl FromStr for KeyChord {
    type Err = KeyChordParseError;

    /// Parse a chord like `"Ctrl+S"`, `"Alt+F4"` or `"released Shift+Tab"`.
    ///
    /// Modifier and key names are case-insensitive. `Cmd`, `Super` and `Win`
    /// are accepted as aliases of `Meta`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut s = s.trim();
        if s.is_empty() {
            return Err(KeyChordParseError::Empty);
        }

        let mut phase = KeyPhase::Pressed;
        if let Some((prefix, rest)) = s.split_once(char::is_whitespace)
            && prefix.eq_ignore_ascii_case("released")
        {
            phase = KeyPhase::Released;
            s = rest.trim();
        }

        let mut modifiers = KeyboardModifiers::NONE;
        let mut key: Option<Key> = None;

        for part in s.split('+') {
            let part = part.trim();
            match part.to_lowercase().as_str() {
                "ctrl" | "control" => modifiers.control = true,
                "alt" | "option" => modifiers.alt = true,
                "shift" => modifiers.shift = true,
                "meta" | "cmd" | "command" | "win" | "windows" | "super" => modifiers.meta = true,
                _ => {
                    if key.is_some() {
                        return Err(KeyChordParseError::MultipleKeys(s.to_string()));
                    }
                    key = Some(parse_key(part)?);
                }
            }
        }

        match key {
            Some(key) => Ok(KeyChord {
                key,
                modifiers,
                phase,
            }),
            None => Err(KeyChordParseError::NoKey),
        }
    }
}

/// Parse a key name to a [`Key`].
fn parse_key(s: &str) -> Result<Key, KeyChordParseError> {
    let mut chars = s.chars();
    if let (Some(ch), None) = (chars.next(), chars.next())
        && let Some(key) = Key::from_char(ch)
    {
        return Ok(key);
    }

    let lower = s.to_lowercase();
    if let Some(number) = lower.strip_prefix('f')
        && let Ok(n) = number.parse::<usize>()
        && (1..=12).contains(&n)
    {
        return Ok(FUNCTION_KEYS[n - 1]);
    }

    match lower.as_str() {
        "up" | "arrowup" => Ok(Key::ArrowUp),
        "down" | "arrowdown" => Ok(Key::ArrowDown),
        "left" | "arrowleft" => Ok(Key::ArrowLeft),
        "right" | "arrowright" => Ok(Key::ArrowRight),
        "home" => Ok(Key::Home),
        "end" => Ok(Key::End),
        "pageup" | "pgup" => Ok(Key::PageUp),
        "pagedown" | "pgdn" => Ok(Key::PageDown),

        "backspace" | "back" => Ok(Key::Backspace),
        "delete" | "del" => Ok(Key::Delete),
        "insert" | "ins" => Ok(Key::Insert),
        "enter" | "return" => Ok(Key::Enter),
        "tab" => Ok(Key::Tab),
        "space" | "spacebar" => Ok(Key::Space),
        "escape" | "esc" => Ok(Key::Escape),

        "minus" | "-" => Ok(Key::Minus),
        "equal" | "equals" | "=" => Ok(Key::Equal),
        "bracketleft" | "[" => Ok(Key::BracketLeft),
        "bracketright" | "]" => Ok(Key::BracketRight),
        "backslash" | "\\" => Ok(Key::Backslash),
        "semicolon" | ";" => Ok(Key::Semicolon),
        "quote" | "'" => Ok(Key::Quote),
        "comma" | "," => Ok(Key::Comma),
        "period" | "." => Ok(Key::Period),
        "slash" | "/" => Ok(Key::Slash),
        "grave" | "`" => Ok(Key::Grave),

        _ => Err(KeyChordParseError::UnknownKey(s.to_string())),
    }
}

// =============================================================================
// Key Event
// =============================================================================

/// A key event travelling through [`Toolkit::dispatch_key_event`](crate::Toolkit::dispatch_key_event).
///
/// The event starts unconsumed. Whoever handles it (an accelerator, the menu
/// selection manager, a key listener) marks it consumed, which stops further
/// delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    /// The key, modifiers and phase.
    pub chord: KeyChord,
    /// The component the event was dispatched to (usually the focus owner).
    pub source: ComponentId,
    /// The text input from this key press, if any.
    pub text: String,
    /// Whether this is a key repeat event (key held down).
    pub is_repeat: bool,
    consumed: bool,
}

impl KeyEvent {
    /// Create an unconsumed event for `chord` originating at `source`.
    pub fn new(chord: KeyChord, source: ComponentId) -> Self {
        Self {
            chord,
            source,
            text: String::new(),
            is_repeat: false,
            consumed: false,
        }
    }

    /// Create a key press event.
    pub fn pressed(key: Key, modifiers: KeyboardModifiers, source: ComponentId) -> Self {
        Self::new(KeyChord::new(key, modifiers), source)
    }

    /// Create a key release event.
    pub fn released(key: Key, modifiers: KeyboardModifiers, source: ComponentId) -> Self {
        Self::new(KeyChord::new(key, modifiers).on_release(), source)
    }

    /// Set the text produced by the key.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Mark the event as an auto-repeat.
    pub fn with_repeat(mut self, is_repeat: bool) -> Self {
        self.is_repeat = is_repeat;
        self
    }

    /// The key of the chord.
    pub fn key(&self) -> Key {
        self.chord.key
    }

    /// The modifiers of the chord.
    pub fn modifiers(&self) -> KeyboardModifiers {
        self.chord.modifiers
    }

    /// Mark the event as handled.
    pub fn consume(&mut self) {
        self.consumed = true;
    }

    /// Check if the event has been handled.
    pub fn is_consumed(&self) -> bool {
        self.consumed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_chords() {
        assert_eq!("Ctrl+S".parse::<KeyChord>(), Ok(KeyChord::ctrl(Key::S)));
        assert_eq!("alt+f4".parse::<KeyChord>(), Ok(KeyChord::alt(Key::F4)));
        assert_eq!("F12".parse::<KeyChord>(), Ok(KeyChord::key_only(Key::F12)));
        assert_eq!(
            "Ctrl + Shift + Z".parse::<KeyChord>(),
            Ok(KeyChord::ctrl_shift(Key::Z))
        );
        assert_eq!("Esc".parse::<KeyChord>(), Ok(KeyChord::key_only(Key::Escape)));
        assert_eq!("7".parse::<KeyChord>(), Ok(KeyChord::key_only(Key::Digit7)));
    }

    #[test]
    fn test_parse_meta_aliases() {
        for text in ["Cmd+Q", "Super+Q", "Meta+Q", "win+q"] {
            let chord: KeyChord = text.parse().unwrap();
            assert_eq!(chord.modifiers, KeyboardModifiers::META, "{text}");
            assert_eq!(chord.key, Key::Q);
        }
    }

    #[test]
    fn test_parse_released_prefix() {
        let chord: KeyChord = "released Shift+Tab".parse().unwrap();
        assert_eq!(chord, KeyChord::shift(Key::Tab).on_release());
        assert_eq!(chord.to_string(), "released Shift+Tab");
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!("".parse::<KeyChord>(), Err(KeyChordParseError::Empty));
        assert_eq!("Ctrl+Shift".parse::<KeyChord>(), Err(KeyChordParseError::NoKey));
        assert_eq!(
            "Ctrl+Banana".parse::<KeyChord>(),
            Err(KeyChordParseError::UnknownKey("Banana".to_string()))
        );
        assert!(matches!(
            "A+B".parse::<KeyChord>(),
            Err(KeyChordParseError::MultipleKeys(_))
        ));
        assert!("F13".parse::<KeyChord>().is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(KeyChord::ctrl_shift(Key::N).to_string(), "Ctrl+Shift+N");
        assert_eq!(KeyChord::key_only(Key::ArrowLeft).to_string(), "Left");
        let all = KeyboardModifiers {
            shift: true,
            control: true,
            alt: true,
            meta: true,
        };
        assert_eq!(KeyChord::new(Key::X, all).to_string(), "Ctrl+Alt+Shift+Meta+X");
    }

    #[test]
    fn test_display_parses_back() {
        for chord in [
            KeyChord::ctrl(Key::Comma),
            KeyChord::alt(Key::F4),
            KeyChord::shift(Key::Tab).on_release(),
        ] {
            assert_eq!(chord.to_string().parse::<KeyChord>(), Ok(chord));
        }
    }

    #[test]
    fn test_matches_requires_exact_modifiers_and_phase() {
        let accel = KeyChord::ctrl(Key::S);
        assert!(accel.matches(&KeyChord::ctrl(Key::S)));
        assert!(!accel.matches(&KeyChord::ctrl_shift(Key::S)));
        assert!(!accel.matches(&KeyChord::key_only(Key::S)));
        assert!(!accel.matches(&KeyChord::ctrl(Key::S).on_release()));
    }

    #[test]
    fn test_key_event_consume() {
        let source = ComponentId::default();
        let mut event = KeyEvent::pressed(Key::A, KeyboardModifiers::NONE, source).with_text("a");
        assert!(!event.is_consumed());
        assert_eq!(event.text, "a");
        event.consume();
        assert!(event.is_consumed());
    }
}
