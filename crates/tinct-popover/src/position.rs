#![forbid(unsafe_code)]

//! The placement search.
//!
//! [`compute_position`] is a pure function of three freshly measured rects
//! and a [`PositionRequest`]. It never fails: when no side has room, or no
//! alignment fits on the cross axis, the affected coordinate is centered in
//! the viewport instead.
//!
//! # Algorithm
//!
//! For each side in the requested side's fallback order:
//!
//! 1. `available = |viewport.edge(side) - anchor.edge(side)|`
//! 2. `required = margin + floating.size(side.axis())`
//! 3. If `required > available` the side fails. Otherwise the main-axis
//!    coordinate is `anchor.edge(side) - required` on a near side (top, left)
//!    or `anchor.edge(side) + margin` on a far side (bottom, right).
//! 4. On the cross axis the alignments are tried in their own fallback
//!    order; the first that keeps the floating element on screen wins.
//!
//! Unresolved axes are centered: `(viewport.end(axis) - floating.size(axis)) / 2`.
//! A floating element taller than the viewport is clamped to
//! `viewport.height - 2 * gap` before it is centered vertically.
//!
//! # Invariants
//!
//! 1. When a side resolves, the gap between the anchor edge and the facing
//!    floating edge is exactly `margin`.
//! 2. The chosen side always satisfies `required <= available`.
//! 3. The result depends only on the inputs; repeated calls agree.

use tinct_core::geometry::{Axis, Point, Rect, Side};

use crate::placement::{Alignment, Placement};

/// Space kept between a clamped floating element and the viewport edges.
pub const OVERFLOW_GAP: f64 = 10.0;

/// What the user asked for.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PositionRequest {
    pub placement: Placement,
    /// Gap between anchor and floating element along the chosen side. `>= 0`.
    pub margin: f64,
}

impl PositionRequest {
    #[must_use]
    pub const fn new(placement: Placement, margin: f64) -> Self {
        Self { placement, margin }
    }
}

/// Per-axis coordinates during the search; `None` means unresolved.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Coordinates {
    pub x: Option<f64>,
    pub y: Option<f64>,
}

impl Coordinates {
    fn get(&self, axis: Axis) -> Option<f64> {
        match axis {
            Axis::Horizontal => self.x,
            Axis::Vertical => self.y,
        }
    }

    fn set(&mut self, axis: Axis, value: f64) {
        match axis {
            Axis::Horizontal => self.x = Some(value),
            Axis::Vertical => self.y = Some(value),
        }
    }
}

/// Final placement of the floating element, in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    /// Left edge of the floating element.
    pub x: f64,
    /// Top edge of the floating element.
    pub y: f64,
    /// Side that had room, if any.
    pub side: Option<Side>,
    /// Cross-axis alignment that fit, if any.
    pub alignment: Option<Alignment>,
    /// Inline height forced on the floating element, if it overflowed.
    pub clamped_height: Option<f64>,
}

impl Position {
    /// The resolved placement, when both side and alignment fit.
    #[must_use]
    pub fn placement(&self) -> Option<Placement> {
        Some(Placement::new(self.side?, self.alignment?))
    }

    /// Top-left corner.
    #[must_use]
    pub const fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Translation to apply given the floating element's positioning origin.
    #[must_use]
    pub fn translation(&self, origin: Point) -> Point {
        Point::new(self.x - origin.x, self.y - origin.y)
    }
}

/// Try to attach the floating element to `side`.
///
/// Returns the main-axis coordinate when the side has room.
fn place_on_side(
    anchor: &Rect,
    floating: &Rect,
    viewport: &Rect,
    side: Side,
    margin: f64,
) -> Option<f64> {
    let axis = side.axis();
    let available = (viewport.edge(side) - anchor.edge(side)).abs();
    let required = margin + floating.size(axis);
    if required > available {
        return None;
    }
    Some(if side.is_near() {
        anchor.edge(side) - required
    } else {
        anchor.edge(side) + margin
    })
}

/// Try one alignment on the cross axis.
fn align_on_axis(
    anchor: &Rect,
    floating: &Rect,
    viewport: &Rect,
    axis: Axis,
    alignment: Alignment,
) -> Option<f64> {
    let size = floating.size(axis);
    let anchor_start = anchor.start(axis);
    let anchor_end = anchor.end(axis);
    // Room from the anchor's start edge to the far edge of the viewport.
    let room = viewport.end(axis) - anchor_start;

    match alignment {
        Alignment::Start => (size <= room).then_some(anchor_start),
        Alignment::Center => {
            let offset = (size + anchor.size(axis)) / 2.0;
            (offset <= anchor_end && offset <= room).then_some(anchor_end - offset)
        }
        Alignment::End => (size <= anchor_end).then_some(anchor_end - size),
    }
}

/// Compute where the floating element goes.
///
/// `floating` must be measured at its natural size (any previously forced
/// height removed); only its width and height are read.
#[must_use]
pub fn compute_position(
    anchor: &Rect,
    floating: &Rect,
    viewport: &Rect,
    request: &PositionRequest,
    gap: f64,
) -> Position {
    let Placement { side, alignment } = request.placement;
    let margin = request.margin;
    let mut coords = Coordinates::default();
    let mut chosen_side = None;
    let mut chosen_alignment = None;

    let first_fit = side.fallback_order().into_iter().find_map(|candidate| {
        place_on_side(anchor, floating, viewport, candidate, margin).map(|main| (candidate, main))
    });

    if let Some((candidate, main)) = first_fit {
        let axis = candidate.axis();
        coords.set(axis, main);
        chosen_side = Some(candidate);

        let cross = axis.cross();
        let aligned = alignment.fallback_order().into_iter().find_map(|align| {
            align_on_axis(anchor, floating, viewport, cross, align).map(|value| (align, value))
        });
        if let Some((align, value)) = aligned {
            coords.set(cross, value);
            chosen_alignment = Some(align);
        }
    }

    // Finalize: center whatever is still unresolved.
    let x = coords
        .get(Axis::Horizontal)
        .unwrap_or((viewport.right() - floating.width) / 2.0);

    let mut clamped_height = None;
    let y = match coords.get(Axis::Vertical) {
        Some(y) => y,
        None => {
            let mut height = floating.height;
            if height > viewport.height {
                height = (viewport.height - 2.0 * gap).max(0.0);
                clamped_height = Some(height);
            }
            (viewport.bottom() - height) / 2.0
        }
    };

    Position {
        x,
        y,
        side: chosen_side,
        alignment: chosen_alignment,
        clamped_height,
    }
}
