#![forbid(unsafe_code)]

//! Listener bookkeeping.
//!
//! A [`ListenerSet`] is filled once at attach time and then switched on or
//! off through a single [`toggle`](ListenerSet::toggle). Binding and
//! unbinding walk the same list, so what gets removed is always exactly
//! what was added.

use tinct_core::event::EventKind;

use crate::host::{Host, Target};

/// The listeners one popover needs.
#[derive(Debug, Clone)]
pub struct ListenerSet<N> {
    bindings: Vec<(Target<N>, EventKind)>,
    bound: bool,
}

impl<N> Default for ListenerSet<N> {
    fn default() -> Self {
        Self {
            bindings: Vec::new(),
            bound: false,
        }
    }
}

impl<N: Clone + PartialEq> ListenerSet<N> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a binding. Duplicates are ignored.
    ///
    /// Only allowed while unbound; bindings added later would never be
    /// removed by a matching toggle.
    pub fn add(&mut self, target: Target<N>, kind: EventKind) {
        debug_assert!(!self.bound, "ListenerSet::add while bound");
        if !self
            .bindings
            .iter()
            .any(|(t, k)| *t == target && *k == kind)
        {
            self.bindings.push((target, kind));
        }
    }

    /// Bind (`true`) or unbind (`false`) every registered listener.
    ///
    /// Returns `false` when the set was already in the requested state.
    pub fn toggle<H: Host<Node = N>>(&mut self, host: &H, bind: bool) -> bool {
        if self.bound == bind {
            return false;
        }
        for (target, kind) in &self.bindings {
            if bind {
                host.listen(target, *kind);
            } else {
                host.unlisten(target, *kind);
            }
        }
        self.bound = bind;
        true
    }

    /// Whether the listeners are currently bound.
    #[must_use]
    pub const fn is_bound(&self) -> bool {
        self.bound
    }

    /// Registered bindings in registration order.
    pub fn bindings(&self) -> impl Iterator<Item = &(Target<N>, EventKind)> {
        self.bindings.iter()
    }

    /// Number of registered bindings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// True when nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicates_are_ignored() {
        let mut set: ListenerSet<u32> = ListenerSet::new();
        set.add(Target::Window, EventKind::Resize);
        set.add(Target::Window, EventKind::Resize);
        set.add(Target::Element(3), EventKind::Scroll);
        set.add(Target::Element(4), EventKind::Scroll);
        assert_eq!(set.len(), 3);
        assert!(!set.is_bound());
    }
}
