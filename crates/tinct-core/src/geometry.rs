#![forbid(unsafe_code)]

//! Geometric primitives in viewport space.
//!
//! All values are CSS pixels relative to the top-left corner of the layout
//! viewport, the same space `getBoundingClientRect` reports in.
//!
//! # Invariants
//!
//! 1. `right() == x + width` and `bottom() == y + height` for every [`Rect`];
//!    the far edges are derived, never stored.
//! 2. Rects are snapshots. Callers re-query them for every layout pass
//!    because layout may change between two event callbacks.

/// One of the two layout axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// The x axis (left/right).
    Horizontal = 0,
    /// The y axis (top/bottom).
    Vertical = 1,
}

impl Axis {
    /// The perpendicular axis.
    #[inline]
    #[must_use]
    pub const fn cross(self) -> Self {
        match self {
            Self::Horizontal => Self::Vertical,
            Self::Vertical => Self::Horizontal,
        }
    }
}

/// An edge of a box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Side {
    Top,
    Right,
    #[default]
    Bottom,
    Left,
}

impl Side {
    /// All sides in clockwise order starting at the top.
    pub const ALL: [Side; 4] = [Side::Top, Side::Right, Side::Bottom, Side::Left];

    /// Axis along which a box attached to this side is offset.
    #[inline]
    #[must_use]
    pub const fn axis(self) -> Axis {
        match self {
            Self::Left | Self::Right => Axis::Horizontal,
            Self::Top | Self::Bottom => Axis::Vertical,
        }
    }

    /// The side across the box.
    #[inline]
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Top => Self::Bottom,
            Self::Bottom => Self::Top,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// True for the start-edge sides (top and left).
    ///
    /// A box placed on a near side grows towards the origin, so its offset is
    /// measured back from the anchor edge instead of forward from it.
    #[inline]
    #[must_use]
    pub const fn is_near(self) -> bool {
        matches!(self, Self::Top | Self::Left)
    }

    /// Sides to try, in order, when this side was requested.
    ///
    /// The requested side comes first, then its opposite, then the two
    /// perpendicular sides.
    #[must_use]
    pub const fn fallback_order(self) -> [Side; 4] {
        match self {
            Self::Top => [Self::Top, Self::Bottom, Self::Right, Self::Left],
            Self::Bottom => [Self::Bottom, Self::Top, Self::Right, Self::Left],
            Self::Left => [Self::Left, Self::Right, Self::Top, Self::Bottom],
            Self::Right => [Self::Right, Self::Left, Self::Top, Self::Bottom],
        }
    }

    /// Lowercase CSS-style name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Right => "right",
            Self::Bottom => "bottom",
            Self::Left => "left",
        }
    }
}

/// A point (or offset) in viewport space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// The origin.
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    #[inline]
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Component along `axis`.
    #[inline]
    #[must_use]
    pub const fn along(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Horizontal => self.x,
            Axis::Vertical => self.y,
        }
    }
}

/// An axis-aligned bounding box in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
}

impl Rect {
    /// The degenerate rect reported for detached elements.
    pub const ZERO: Rect = Rect::new(0.0, 0.0, 0.0, 0.0);

    /// Create a new rectangle.
    #[inline]
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a rectangle anchored at the origin, e.g. the viewport.
    #[inline]
    #[must_use]
    pub const fn from_size(width: f64, height: f64) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    /// Create a rectangle from its four edges.
    #[inline]
    #[must_use]
    pub fn from_edges(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self::new(left, top, right - left, bottom - top)
    }

    /// Right edge (`x + width`).
    #[inline]
    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge (`y + height`).
    #[inline]
    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// The six-number form `(x, y, width, height, right, bottom)`.
    #[must_use]
    pub fn to_tuple(&self) -> (f64, f64, f64, f64, f64, f64) {
        (
            self.x,
            self.y,
            self.width,
            self.height,
            self.right(),
            self.bottom(),
        )
    }

    /// Coordinate of the given edge.
    #[inline]
    #[must_use]
    pub fn edge(&self, side: Side) -> f64 {
        match side {
            Side::Top => self.y,
            Side::Right => self.right(),
            Side::Bottom => self.bottom(),
            Side::Left => self.x,
        }
    }

    /// Extent along `axis` (width or height).
    #[inline]
    #[must_use]
    pub fn size(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Horizontal => self.width,
            Axis::Vertical => self.height,
        }
    }

    /// Start edge along `axis` (left or top).
    #[inline]
    #[must_use]
    pub fn start(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Horizontal => self.x,
            Axis::Vertical => self.y,
        }
    }

    /// End edge along `axis` (right or bottom).
    #[inline]
    #[must_use]
    pub fn end(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Horizontal => self.right(),
            Axis::Vertical => self.bottom(),
        }
    }

    /// Copy of this rect with a different height.
    #[inline]
    #[must_use]
    pub fn with_height(mut self, height: f64) -> Self {
        self.height = height;
        self
    }

    /// True when either dimension is zero, negative, or not a number.
    #[inline]
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    /// Range overlap on both axes.
    ///
    /// Edges that merely touch do not count as overlap.
    #[must_use]
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Check if a point is inside the rectangle (far edges exclusive).
    #[inline]
    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x && point.x < self.right() && point.y >= self.y && point.y < self.bottom()
    }
}

impl From<(f64, f64, f64, f64)> for Rect {
    fn from((x, y, width, height): (f64, f64, f64, f64)) -> Self {
        Self::new(x, y, width, height)
    }
}
