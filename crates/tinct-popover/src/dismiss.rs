#![forbid(unsafe_code)]

//! Outside-click dismissal and the focus trap.
//!
//! These rules decide; the popover acts. Keeping them free of state makes
//! them easy to test against any [`Host`].

use tinct_core::event::{KeyCode, KeyEvent};

use crate::host::Host;

/// What a keydown should do to an open popover.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Not ours.
    None,
    /// Escape: close.
    Close,
    /// Tab ran off an end of the floating element: send focus back to the
    /// reference element and suppress the default tab move.
    FocusReference,
}

/// Whether a pointer-down on `target` should close the popover.
///
/// Presses inside the floating element, on the anchor (or inside it), or on
/// one of the associated labels keep it open.
pub fn pointer_down_dismisses<H: Host>(
    host: &H,
    target: &H::Node,
    anchor: &H::Node,
    floating: &H::Node,
    labels: &[H::Node],
) -> bool {
    if host.contains(floating, target) || host.contains(anchor, target) {
        return false;
    }
    !labels.iter().any(|label| host.contains(label, target))
}

/// Classify a keydown while the popover is open.
///
/// `active` is the element that had focus when the key went down.
pub fn key_action<H: Host>(
    host: &H,
    key: &KeyEvent,
    active: Option<&H::Node>,
    floating: &H::Node,
) -> KeyAction {
    match key.code {
        KeyCode::Escape => KeyAction::Close,
        KeyCode::Tab => {
            let Some(active) = active else {
                return KeyAction::None;
            };
            let focusables = host.focusables(floating);
            let edge = if key.shift() {
                focusables.first()
            } else {
                focusables.last()
            };
            if edge == Some(active) {
                KeyAction::FocusReference
            } else {
                KeyAction::None
            }
        }
        _ => KeyAction::None,
    }
}
