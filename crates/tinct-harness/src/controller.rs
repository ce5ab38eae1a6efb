#![forbid(unsafe_code)]

//! A [`Controller`] that records every request.
//!
//! It applies the same guards a color-picker widget would: unforced
//! requests are ignored while disabled, and unforced closes are ignored in
//! always-open (`toggle: false`) mode.

use std::cell::RefCell;
use std::rc::Rc;

use tinct_popover::host::Controller;

/// One `toggle` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToggleCall {
    pub open: bool,
    pub forced: bool,
}

#[derive(Debug, Default)]
struct ControllerState {
    open: bool,
    toggle_enabled: bool,
    disabled: bool,
    calls: Vec<ToggleCall>,
}

/// Clonable handle; clones share state so a test can keep one while the
/// popover owns another.
#[derive(Debug, Clone)]
pub struct RecordingController {
    inner: Rc<RefCell<ControllerState>>,
}

impl Default for RecordingController {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingController {
    /// Closed, toggleable, enabled.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(ControllerState {
                toggle_enabled: true,
                ..ControllerState::default()
            })),
        }
    }

    /// Start open.
    #[must_use]
    pub fn opened(self) -> Self {
        self.inner.borrow_mut().open = true;
        self
    }

    /// Always-open mode (`toggle: false`).
    #[must_use]
    pub fn always_open(self) -> Self {
        self.inner.borrow_mut().toggle_enabled = false;
        self
    }

    /// Disabled widget.
    #[must_use]
    pub fn disabled(self) -> Self {
        self.inner.borrow_mut().disabled = true;
        self
    }

    /// Open or close directly, as a user click on the widget would.
    pub fn set_open(&self, open: bool) {
        self.inner.borrow_mut().open = open;
    }

    /// Every `toggle` call so far.
    #[must_use]
    pub fn calls(&self) -> Vec<ToggleCall> {
        self.inner.borrow().calls.clone()
    }
}

impl Controller for RecordingController {
    fn is_open(&self) -> bool {
        self.inner.borrow().open
    }

    fn toggle(&mut self, open: bool, forced: bool) {
        let mut state = self.inner.borrow_mut();
        state.calls.push(ToggleCall { open, forced });
        if !forced && (state.disabled || (!open && !state.toggle_enabled)) {
            return;
        }
        state.open = open;
    }
}
