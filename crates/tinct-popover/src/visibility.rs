#![forbid(unsafe_code)]

//! Anchor visibility.
//!
//! Two ways in, one state:
//!
//! - Hosts with an intersection observer push crossings through
//!   [`VisibilityTracker::notify`].
//! - Hosts without one (or callers that want a synchronous answer) measure
//!   with [`VisibilityTracker::evaluate`], which intersects the anchor with
//!   every clipping ancestor.
//!
//! Either way the tracker only reports transitions, so a stream of identical
//! observations produces a single change.

use tinct_core::geometry::Rect;

use crate::host::{Host, Target};

/// True when `target` overlaps every rect in `ancestors`.
///
/// An anchor inside nested scroll containers is visible only if it shows
/// through all of them. With no ancestors the answer is `true`.
#[must_use]
pub fn is_in_viewport(target: &Rect, ancestors: &[Rect]) -> bool {
    ancestors.iter().all(|ancestor| target.overlaps(ancestor))
}

/// Clip rect of a scroll target: its bounds, or the viewport for the
/// document and window.
pub fn clip_rect<H: Host>(host: &H, target: &Target<H::Node>) -> Rect {
    match target {
        Target::Element(node) => host.bounds(node),
        Target::Window | Target::Document => host.viewport(),
    }
}

/// Deduplicating visibility state for one anchor.
#[derive(Debug, Clone, Default)]
pub struct VisibilityTracker {
    visible: Option<bool>,
    observing: bool,
}

impl VisibilityTracker {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            visible: None,
            observing: false,
        }
    }

    /// Ask the host to observe `anchor`. Returns whether an observer exists.
    pub fn start<H: Host>(&mut self, host: &H, anchor: &H::Node) -> bool {
        self.observing = host.observe(anchor);
        self.observing
    }

    /// Disconnect observation.
    pub fn stop<H: Host>(&mut self, host: &H, anchor: &H::Node) {
        if self.observing {
            host.unobserve(anchor);
            self.observing = false;
        }
    }

    /// Whether a host observer is feeding this tracker.
    #[must_use]
    pub const fn is_observing(&self) -> bool {
        self.observing
    }

    /// Last known visibility. Unknown counts as visible.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible.unwrap_or(true)
    }

    /// Record an observation; returns the new value if it changed.
    pub fn notify(&mut self, visible: bool) -> Option<bool> {
        if self.visible == Some(visible) {
            return None;
        }
        self.visible = Some(visible);
        Some(visible)
    }

    /// Measure visibility now and record it.
    pub fn evaluate<H: Host>(
        &mut self,
        host: &H,
        anchor: &H::Node,
        ancestors: &[Target<H::Node>],
    ) -> Option<bool> {
        let anchor_rect = host.bounds(anchor);
        let clips: Vec<Rect> = ancestors.iter().map(|t| clip_rect(host, t)).collect();
        self.notify(is_in_viewport(&anchor_rect, &clips))
    }
}
