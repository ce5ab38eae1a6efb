#![forbid(unsafe_code)]

//! The popover state machine.
//!
//! A [`Popover`] ties one anchor to one floating element. It owns the
//! listener bindings and the visibility tracker for that pair and reacts to
//! host events:
//!
//! | Event | Effect |
//! |-------|--------|
//! | scroll / resize | anchor hidden → force-close; open → reposition, then force-close on scroll when `close_on_scroll` |
//! | visibility false | force-close, even in always-open mode |
//! | visibility true | always-open mode → force-open and reposition |
//! | pointer-down outside | request close |
//! | Escape | request close, return focus to the reference element |
//! | Tab off either end | focus the reference element |
//!
//! # Invariants
//!
//! 1. Every reposition measures anchor, floating element and viewport anew,
//!    after removing any height it forced on the previous pass.
//! 2. Nothing is repositioned while the anchor is hidden.
//! 3. [`detach`](Popover::detach) unbinds exactly what
//!    [`attach`](Popover::attach) bound, and is a no-op when detached.
//!    Dropping a popover detaches it.

use tinct_core::event::{EventKind, KeyEvent};
use tinct_core::{debug, debug_span, trace};

use crate::config::{PopoverConfig, ResolvedConfig};
use crate::dismiss::{self, KeyAction};
use crate::host::{Controller, Host, Target};
use crate::listeners::ListenerSet;
use crate::overflow::overflow_ancestors;
use crate::position::{OVERFLOW_GAP, Position, compute_position};
use crate::visibility::VisibilityTracker;

/// Observable popover state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PopoverState {
    /// The anchor intersects the viewport through every clipping ancestor.
    pub anchor_visible: bool,
    /// The controller reports the floating element as open.
    pub floating_visible: bool,
}

impl Default for PopoverState {
    fn default() -> Self {
        Self {
            anchor_visible: true,
            floating_visible: false,
        }
    }
}

/// Which layout change triggered an update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewportChange {
    Scroll,
    Resize,
}

/// Host events, already translated out of the DOM.
#[derive(Debug, Clone, PartialEq)]
pub enum PopoverEvent<N> {
    /// A tracked overflow ancestor or the document scrolled.
    Scroll,
    /// The window resized.
    Resize,
    /// The intersection observer reported a crossing.
    Visibility(bool),
    /// A pointer went down on `N`.
    PointerDown(N),
    /// A key went down while `active` had focus.
    Key { key: KeyEvent, active: Option<N> },
}

/// Positions one floating element against one anchor.
pub struct Popover<H: Host, C: Controller> {
    host: H,
    controller: C,
    anchor: H::Node,
    floating: H::Node,
    reference: Option<H::Node>,
    labels: Vec<H::Node>,
    config: ResolvedConfig,
    gap: f64,
    ancestors: Vec<Target<H::Node>>,
    listeners: ListenerSet<H::Node>,
    tracker: VisibilityTracker,
    state: PopoverState,
    last_position: Option<Position>,
    attached: bool,
}

impl<H: Host, C: Controller> Popover<H, C> {
    /// Create a detached popover. Call [`attach`](Self::attach) to start it.
    pub fn new(
        host: H,
        anchor: H::Node,
        floating: H::Node,
        controller: C,
        config: &PopoverConfig,
    ) -> Self {
        Self {
            host,
            controller,
            anchor,
            floating,
            reference: None,
            labels: Vec::new(),
            config: config.resolve(),
            gap: OVERFLOW_GAP,
            ancestors: Vec::new(),
            listeners: ListenerSet::new(),
            tracker: VisibilityTracker::new(),
            state: PopoverState::default(),
            last_position: None,
            attached: false,
        }
    }

    /// Element that receives focus when Tab leaves the floating element.
    /// Defaults to the anchor.
    #[must_use]
    pub fn with_reference(mut self, reference: H::Node) -> Self {
        self.reference = Some(reference);
        self
    }

    /// Labels whose clicks must not dismiss the popover.
    #[must_use]
    pub fn with_labels(mut self, labels: Vec<H::Node>) -> Self {
        self.labels = labels;
        self
    }

    /// Gap kept on each side of a height-clamped floating element.
    #[must_use]
    pub fn with_gap(mut self, gap: f64) -> Self {
        self.gap = gap.max(0.0);
        self
    }

    /// Bind listeners, start visibility tracking and position once.
    pub fn attach(&mut self) {
        if self.attached {
            return;
        }
        self.ancestors = overflow_ancestors(&self.host, &self.anchor);
        self.tracker = VisibilityTracker::new();
        self.tracker.start(&self.host, &self.anchor);

        self.listeners = ListenerSet::new();
        for target in &self.ancestors {
            self.listeners.add(target.clone(), EventKind::Scroll);
        }
        self.listeners.add(Target::Window, EventKind::Resize);
        self.listeners.add(Target::Document, EventKind::PointerDown);
        self.listeners.add(Target::Document, EventKind::KeyDown);
        self.listeners.toggle(&self.host, true);
        self.attached = true;

        self.tracker
            .evaluate(&self.host, &self.anchor, &self.ancestors);
        self.state.anchor_visible = self.tracker.is_visible();
        if !self.state.anchor_visible {
            // The observer will not report a state the tracker already holds.
            self.apply_visibility(false);
        }
        self.sync_open_state();
        debug!(
            scroll_targets = self.ancestors.len(),
            observing = self.tracker.is_observing(),
            anchor_visible = self.state.anchor_visible,
            "popover attached"
        );

        if self.state.anchor_visible {
            self.reposition();
        }
    }

    /// Disconnect tracking, unbind listeners and clear inline styles.
    pub fn detach(&mut self) {
        if !self.attached {
            return;
        }
        self.tracker.stop(&self.host, &self.anchor);
        self.listeners.toggle(&self.host, false);
        self.host.set_style(&self.floating, "transform", None);
        self.host.set_style(&self.floating, "height", None);
        self.ancestors.clear();
        self.last_position = None;
        self.attached = false;
        debug!("popover detached");
    }

    /// Move the popover to a different anchor.
    pub fn retarget(&mut self, anchor: H::Node) {
        let was_attached = self.attached;
        self.detach();
        self.anchor = anchor;
        if was_attached {
            self.attach();
        }
    }

    /// Reposition if the floating element is open and the anchor visible.
    pub fn update(&mut self) -> Option<Position> {
        self.sync_open_state();
        if !self.attached || !self.state.floating_visible || !self.state.anchor_visible {
            return None;
        }
        Some(self.reposition())
    }

    /// Feed a host event.
    ///
    /// Returns `true` when the caller should prevent the event's default
    /// action (the focus trap moved focus itself).
    pub fn handle_event(&mut self, event: PopoverEvent<H::Node>) -> bool {
        if !self.attached {
            return false;
        }
        match event {
            PopoverEvent::Scroll => {
                self.on_viewport_change(ViewportChange::Scroll);
                false
            }
            PopoverEvent::Resize => {
                self.on_viewport_change(ViewportChange::Resize);
                false
            }
            PopoverEvent::Visibility(visible) => {
                self.on_visibility(visible);
                false
            }
            PopoverEvent::PointerDown(target) => {
                self.on_pointer_down(&target);
                false
            }
            PopoverEvent::Key { key, active } => self.on_key(&key, active.as_ref()),
        }
    }

    fn on_viewport_change(&mut self, change: ViewportChange) {
        let _span = debug_span!("popover_update", change = ?change).entered();

        if !self.tracker.is_observing()
            && let Some(visible) =
                self.tracker
                    .evaluate(&self.host, &self.anchor, &self.ancestors)
        {
            self.apply_visibility(visible);
        }
        self.sync_open_state();

        if !self.state.anchor_visible {
            if self.state.floating_visible {
                debug!("anchor hidden, closing");
                self.force_close();
            }
            return;
        }
        if self.state.floating_visible {
            self.reposition();
            if self.config.close_on_scroll && change == ViewportChange::Scroll {
                debug!("closing on scroll");
                self.force_close();
            }
        }
    }

    fn on_visibility(&mut self, visible: bool) {
        let Some(visible) = self.tracker.notify(visible) else {
            return;
        };
        self.apply_visibility(visible);
        self.sync_open_state();
        if visible && self.state.floating_visible {
            self.reposition();
        }
    }

    fn apply_visibility(&mut self, visible: bool) {
        debug!(visible, "anchor visibility changed");
        self.state.anchor_visible = visible;
        if !visible {
            if self.controller.is_open() {
                debug!("anchor left viewport, closing");
                self.force_close();
            }
        } else if self.config.always_open() && !self.controller.is_open() {
            self.controller.toggle(true, true);
        }
    }

    fn on_pointer_down(&mut self, target: &H::Node) {
        if !self.controller.is_open() {
            return;
        }
        if dismiss::pointer_down_dismisses(
            &self.host,
            target,
            &self.anchor,
            &self.floating,
            &self.labels,
        ) {
            trace!("pointer down outside popover");
            self.controller.toggle(false, false);
            self.sync_open_state();
        }
    }

    fn on_key(&mut self, key: &KeyEvent, active: Option<&H::Node>) -> bool {
        if !self.controller.is_open() {
            return false;
        }
        match dismiss::key_action(&self.host, key, active, &self.floating) {
            KeyAction::None => false,
            KeyAction::Close => {
                self.controller.toggle(false, false);
                self.sync_open_state();
                if !self.state.floating_visible {
                    self.host.focus(self.reference());
                }
                false
            }
            KeyAction::FocusReference => {
                self.host.focus(self.reference());
                true
            }
        }
    }

    fn force_close(&mut self) {
        self.controller.toggle(false, true);
        self.sync_open_state();
    }

    fn sync_open_state(&mut self) {
        self.state.floating_visible = self.controller.is_open();
    }

    /// Measure, compute and apply. Always uses fresh geometry.
    fn reposition(&mut self) -> Position {
        // A height forced on the previous pass would skew the measurement.
        self.host.set_style(&self.floating, "height", None);

        let anchor = self.host.bounds(&self.anchor);
        let floating = self.host.bounds(&self.floating);
        let viewport = self.host.viewport();
        let position = compute_position(
            &anchor,
            &floating,
            &viewport,
            &self.config.request,
            self.gap,
        );

        if let Some(height) = position.clamped_height {
            self.host
                .set_style(&self.floating, "height", Some(&format!("{height}px")));
        }
        let origin = self.host.positioning_offset(&self.floating);
        let offset = position.translation(origin);
        self.host.set_style(
            &self.floating,
            "transform",
            Some(&format!("translate({}px, {}px)", offset.x, offset.y)),
        );
        trace!(
            x = position.x,
            y = position.y,
            side = ?position.side,
            alignment = ?position.alignment,
            "popover positioned"
        );

        self.last_position = Some(position);
        position
    }

    fn reference(&self) -> &H::Node {
        self.reference.as_ref().unwrap_or(&self.anchor)
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> PopoverState {
        self.state
    }

    /// Result of the most recent reposition.
    #[must_use]
    pub const fn last_position(&self) -> Option<Position> {
        self.last_position
    }

    /// Whether listeners are bound.
    #[must_use]
    pub const fn is_attached(&self) -> bool {
        self.attached
    }

    /// The normalized configuration.
    #[must_use]
    pub const fn config(&self) -> &ResolvedConfig {
        &self.config
    }

    /// Scroll targets found at attach time, nearest first.
    #[must_use]
    pub fn scroll_targets(&self) -> &[Target<H::Node>] {
        &self.ancestors
    }

    /// The anchor element.
    #[must_use]
    pub const fn anchor(&self) -> &H::Node {
        &self.anchor
    }

    /// The floating element.
    #[must_use]
    pub const fn floating(&self) -> &H::Node {
        &self.floating
    }

    /// The host.
    #[must_use]
    pub const fn host(&self) -> &H {
        &self.host
    }

    /// The controller.
    #[must_use]
    pub const fn controller(&self) -> &C {
        &self.controller
    }

    /// Mutable access to the controller.
    pub fn controller_mut(&mut self) -> &mut C {
        &mut self.controller
    }
}

impl<H: Host, C: Controller> Drop for Popover<H, C> {
    fn drop(&mut self) {
        self.detach();
    }
}

impl<H: Host, C: Controller> std::fmt::Debug for Popover<H, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Popover")
            .field("anchor", &self.anchor)
            .field("floating", &self.floating)
            .field("config", &self.config)
            .field("state", &self.state)
            .field("attached", &self.attached)
            .finish_non_exhaustive()
    }
}
