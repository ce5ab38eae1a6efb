#![forbid(unsafe_code)]

//! The seams between the positioner and its environment.
//!
//! [`Host`] is the document: geometry queries, computed styles, inline style
//! writes, focus, listener registration and intersection observation.
//! [`Controller`] is the widget that owns the open/closed state.
//!
//! Host methods take `&self`. DOM handles mutate through shared references,
//! and in-memory hosts use interior mutability the same way.

use std::fmt::Debug;

use tinct_core::event::EventKind;
use tinct_core::geometry::{Point, Rect};

/// Something a listener can be bound to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Target<N> {
    /// The window (`resize`).
    Window,
    /// The document; also stands for the root viewport when scrolling.
    Document,
    /// A specific element.
    Element(N),
}

impl<N> Target<N> {
    /// The element, if this target is one.
    pub fn element(&self) -> Option<&N> {
        match self {
            Self::Element(node) => Some(node),
            Self::Window | Self::Document => None,
        }
    }
}

/// Document access needed by the positioner.
pub trait Host {
    /// Element handle.
    type Node: Clone + PartialEq + Debug;

    /// Bounding box of `node` in viewport coordinates, measured now.
    ///
    /// Detached nodes report [`Rect::ZERO`].
    fn bounds(&self, node: &Self::Node) -> Rect;

    /// The viewport as `(0, 0, width, height)`.
    fn viewport(&self) -> Rect;

    /// Parent element, or `None` at the document root.
    fn parent(&self, node: &Self::Node) -> Option<Self::Node>;

    /// True for the `<body>` element (and the root element).
    fn is_body(&self, node: &Self::Node) -> bool;

    /// Computed value of a CSS property, empty when unavailable.
    fn computed_style(&self, node: &Self::Node, property: &str) -> String;

    /// Viewport offset of the box `node` is positioned against.
    ///
    /// Deciding which ancestor establishes the containing block (positioned
    /// ancestors, or ones with a transform, filter, `contain`, ...) depends
    /// on the engine, so hosts answer this themselves.
    fn positioning_offset(&self, node: &Self::Node) -> Point;

    /// Set (`Some`) or remove (`None`) an inline style property.
    fn set_style(&self, node: &Self::Node, property: &str, value: Option<&str>);

    /// True when `node` is `ancestor` or one of its descendants.
    fn contains(&self, ancestor: &Self::Node, node: &Self::Node) -> bool;

    /// Focusable descendants of `node` in tab order.
    fn focusables(&self, node: &Self::Node) -> Vec<Self::Node>;

    /// Move keyboard focus to `node`.
    fn focus(&self, node: &Self::Node);

    /// Bind the popover's handler for `kind` on `target`.
    fn listen(&self, target: &Target<Self::Node>, kind: EventKind);

    /// Remove the handler bound by [`listen`](Host::listen).
    fn unlisten(&self, target: &Target<Self::Node>, kind: EventKind);

    /// Start reporting viewport intersection changes of `node`.
    ///
    /// Returns `false` when the host has no observer; the positioner then
    /// measures visibility itself on every scroll and resize.
    fn observe(&self, node: &Self::Node) -> bool;

    /// Stop observing `node`.
    fn unobserve(&self, node: &Self::Node);
}

/// The widget that owns open/closed state.
pub trait Controller {
    /// Whether the floating element is currently shown.
    fn is_open(&self) -> bool;

    /// Request a state change.
    ///
    /// `forced` requests bypass the widget's own guards (`disabled`,
    /// always-open mode); unforced ones may be ignored.
    fn toggle(&mut self, open: bool, forced: bool);
}
