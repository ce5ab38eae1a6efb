#![forbid(unsafe_code)]

//! Canonical input and layout event types.
//!
//! The popover engine never sees raw DOM events. Hosts translate them into
//! the types below so the state machine can be driven (and tested) without
//! a browser.
//!
//! # Design Notes
//!
//! - Keys are mapped from the DOM `KeyboardEvent.key` string
//! - `Modifiers` use bitflags for easy combination
//! - [`EventKind`] names the DOM event types a popover listens for

use bitflags::bitflags;

/// A keyboard event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    /// The key that was pressed.
    pub code: KeyCode,

    /// Modifier keys held during the event.
    pub modifiers: Modifiers,
}

impl KeyEvent {
    /// Create a new key event with no modifiers.
    #[must_use]
    pub const fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::NONE,
        }
    }

    /// Create a key event with modifiers.
    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Build a key event from a DOM `key` value and modifier state.
    #[must_use]
    pub fn from_dom(key: &str, shift: bool, ctrl: bool, alt: bool, meta: bool) -> Self {
        let mut modifiers = Modifiers::NONE;
        modifiers.set(Modifiers::SHIFT, shift);
        modifiers.set(Modifiers::CTRL, ctrl);
        modifiers.set(Modifiers::ALT, alt);
        modifiers.set(Modifiers::SUPER, meta);
        Self::new(KeyCode::from_dom_key(key)).with_modifiers(modifiers)
    }

    /// Check if Shift modifier is held.
    #[must_use]
    pub const fn shift(&self) -> bool {
        self.modifiers.contains(Modifiers::SHIFT)
    }
}

/// Key codes the popover reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A regular character key.
    Char(char),

    /// Escape key.
    Escape,

    /// Tab key.
    Tab,

    /// Enter/Return key.
    Enter,

    /// Any other named key.
    Other,
}

impl KeyCode {
    /// Map a DOM `KeyboardEvent.key` value.
    ///
    /// Legacy `"Esc"` (old Edge/IE) maps to [`KeyCode::Escape`].
    #[must_use]
    pub fn from_dom_key(key: &str) -> Self {
        match key {
            "Escape" | "Esc" => Self::Escape,
            "Tab" => Self::Tab,
            "Enter" => Self::Enter,
            _ => {
                let mut chars = key.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Self::Char(c),
                    _ => Self::Other,
                }
            }
        }
    }
}

bitflags! {
    /// Modifier keys that can be held during a key event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        /// No modifiers.
        const NONE  = 0b0000;
        /// Shift key.
        const SHIFT = 0b0001;
        /// Alt/Option key.
        const ALT   = 0b0010;
        /// Control key.
        const CTRL  = 0b0100;
        /// Super/Meta/Command key.
        const SUPER = 0b1000;
    }
}

/// DOM event types a popover binds listeners for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// `scroll` on an overflow ancestor or the document.
    Scroll,
    /// `resize` on the window.
    Resize,
    /// `pointerdown` on the document (outside-click dismissal).
    PointerDown,
    /// `keydown` on the document (Escape and focus trap).
    KeyDown,
}

impl EventKind {
    /// The DOM event type string.
    #[must_use]
    pub const fn dom_name(self) -> &'static str {
        match self {
            Self::Scroll => "scroll",
            Self::Resize => "resize",
            Self::PointerDown => "pointerdown",
            Self::KeyDown => "keydown",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dom_keys_map_to_codes() {
        assert_eq!(KeyCode::from_dom_key("Escape"), KeyCode::Escape);
        assert_eq!(KeyCode::from_dom_key("Esc"), KeyCode::Escape);
        assert_eq!(KeyCode::from_dom_key("Tab"), KeyCode::Tab);
        assert_eq!(KeyCode::from_dom_key("a"), KeyCode::Char('a'));
        assert_eq!(KeyCode::from_dom_key("é"), KeyCode::Char('é'));
        assert_eq!(KeyCode::from_dom_key("ArrowUp"), KeyCode::Other);
        assert_eq!(KeyCode::from_dom_key(""), KeyCode::Other);
    }

    #[test]
    fn from_dom_sets_modifiers() {
        let event = KeyEvent::from_dom("Tab", true, false, false, true);
        assert_eq!(event.code, KeyCode::Tab);
        assert!(event.shift());
        assert!(event.modifiers.contains(Modifiers::SUPER));
        assert!(!event.modifiers.contains(Modifiers::CTRL));
    }

    #[test]
    fn event_kind_names() {
        assert_eq!(EventKind::PointerDown.dom_name(), "pointerdown");
        assert_eq!(EventKind::Scroll.dom_name(), "scroll");
    }
}
