#![forbid(unsafe_code)]

//! One popover shared by several widgets.
//!
//! Widgets that share a floating element each hold a [`SharedPopover`]
//! handle. The popover lives as long as any handle does and detaches when
//! the last one drops. Hosts that dispatch DOM events keep a
//! [`WeakPopover`] so their listeners never keep a popover alive.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::host::{Controller, Host};
use crate::popover::{Popover, PopoverEvent};
use crate::position::Position;

/// Reference-counted owner of a [`Popover`].
pub struct SharedPopover<H: Host, C: Controller> {
    inner: Rc<RefCell<Popover<H, C>>>,
}

impl<H: Host, C: Controller> Clone for SharedPopover<H, C> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<H: Host, C: Controller> SharedPopover<H, C> {
    /// Take ownership of `popover`.
    pub fn new(popover: Popover<H, C>) -> Self {
        Self {
            inner: Rc::new(RefCell::new(popover)),
        }
    }

    /// Another owning handle.
    #[must_use]
    pub fn acquire(&self) -> Self {
        self.clone()
    }

    /// Number of live owning handles.
    #[must_use]
    pub fn owners(&self) -> usize {
        Rc::strong_count(&self.inner)
    }

    /// A non-owning handle for event dispatch.
    #[must_use]
    pub fn downgrade(&self) -> WeakPopover<H, C> {
        WeakPopover {
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// Run `f` with exclusive access to the popover.
    ///
    /// # Panics
    ///
    /// Panics if called re-entrantly from inside another `with`.
    pub fn with<R>(&self, f: impl FnOnce(&mut Popover<H, C>) -> R) -> R {
        f(&mut self.inner.borrow_mut())
    }

    /// Like [`with`](Self::with), but returns `None` instead of panicking
    /// when the popover is already borrowed. That happens when a
    /// controller's `toggle` calls back into the popover it was called from.
    pub fn try_with<R>(&self, f: impl FnOnce(&mut Popover<H, C>) -> R) -> Option<R> {
        match self.inner.try_borrow_mut() {
            Ok(mut popover) => Some(f(&mut popover)),
            Err(_) => {
                tinct_core::warn!("re-entrant popover call dropped");
                None
            }
        }
    }

    /// Reposition now; see [`Popover::update`]. A re-entrant call is dropped
    /// and returns `None`.
    pub fn update(&self) -> Option<Position> {
        self.try_with(Popover::update).flatten()
    }

    /// Attach the shared popover to the widget whose anchor is `anchor`.
    /// A re-entrant call is dropped.
    pub fn retarget(&self, anchor: H::Node) {
        self.try_with(|popover| popover.retarget(anchor));
    }

    /// Unbind everything now instead of when the last owner drops. A
    /// re-entrant call is dropped; the popover still detaches on drop.
    pub fn detach(&self) {
        self.try_with(Popover::detach);
    }

    /// Dispatch an event; see [`Popover::handle_event`].
    ///
    /// An event that arrives while the popover is already borrowed (a DOM
    /// event fired synchronously by our own focus or style change) is
    /// dropped.
    pub fn handle_event(&self, event: PopoverEvent<H::Node>) -> bool {
        self.try_with(|popover| popover.handle_event(event))
            .unwrap_or(false)
    }
}

/// Non-owning handle to a [`SharedPopover`].
pub struct WeakPopover<H: Host, C: Controller> {
    inner: Weak<RefCell<Popover<H, C>>>,
}

impl<H: Host, C: Controller> Clone for WeakPopover<H, C> {
    fn clone(&self) -> Self {
        Self {
            inner: Weak::clone(&self.inner),
        }
    }
}

impl<H: Host, C: Controller> WeakPopover<H, C> {
    /// Upgrade to an owning handle if the popover is still alive.
    #[must_use]
    pub fn upgrade(&self) -> Option<SharedPopover<H, C>> {
        self.inner.upgrade().map(|inner| SharedPopover { inner })
    }

    /// Dispatch an event if the popover is still alive.
    pub fn handle_event(&self, event: PopoverEvent<H::Node>) -> bool {
        self.upgrade()
            .is_some_and(|popover| popover.handle_event(event))
    }
}
