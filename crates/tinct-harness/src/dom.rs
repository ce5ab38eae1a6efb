#![forbid(unsafe_code)]

//! An in-memory document.
//!
//! [`FakeDom`] is a tree of boxes with explicit viewport rects and computed
//! styles. It implements [`Host`] so popovers can be driven through real
//! scroll, resize and visibility scenarios without a browser.
//!
//! Layout is whatever the test says it is: moving the anchor is a
//! [`set_rect`](FakeDom::set_rect) away. One piece of layout is emulated: an
//! inline `height` style overrides the stored height in
//! [`bounds`](Host::bounds), the way a browser would report a clamped box.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use tinct_core::event::EventKind;
use tinct_core::geometry::{Point, Rect};
use tinct_popover::host::{Host, Target};

/// Handle to a node in a [`FakeDom`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
struct NodeData {
    parent: Option<NodeId>,
    rect: Rect,
    computed: BTreeMap<String, String>,
    inline: BTreeMap<String, String>,
    focusable: bool,
    connected: bool,
    positioning_offset: Point,
}

impl NodeData {
    fn new(parent: Option<NodeId>, rect: Rect) -> Self {
        Self {
            parent,
            rect,
            computed: BTreeMap::new(),
            inline: BTreeMap::new(),
            focusable: false,
            connected: true,
            positioning_offset: Point::ZERO,
        }
    }
}

#[derive(Debug)]
struct DomState {
    nodes: Vec<NodeData>,
    viewport: (f64, f64),
    listeners: Vec<(Target<NodeId>, EventKind)>,
    listen_calls: usize,
    unlisten_calls: usize,
    observer_available: bool,
    observed: Vec<NodeId>,
    focused: Option<NodeId>,
}

/// Shared, clonable in-memory document.
#[derive(Debug, Clone)]
pub struct FakeDom {
    inner: Rc<RefCell<DomState>>,
}

const ROOT: NodeId = NodeId(0);
const BODY: NodeId = NodeId(1);

impl FakeDom {
    /// A document with `<html>` and `<body>` filling a `width × height`
    /// viewport, and no intersection observer.
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        let page = Rect::from_size(width, height);
        let state = DomState {
            nodes: vec![NodeData::new(None, page), NodeData::new(Some(ROOT), page)],
            viewport: (width, height),
            listeners: Vec::new(),
            listen_calls: 0,
            unlisten_calls: 0,
            observer_available: false,
            observed: Vec::new(),
            focused: None,
        };
        Self {
            inner: Rc::new(RefCell::new(state)),
        }
    }

    /// Pretend the host has an intersection observer.
    #[must_use]
    pub fn with_observer(self) -> Self {
        self.inner.borrow_mut().observer_available = true;
        self
    }

    /// The `<html>` element.
    #[must_use]
    pub const fn root(&self) -> NodeId {
        ROOT
    }

    /// The `<body>` element.
    #[must_use]
    pub const fn body(&self) -> NodeId {
        BODY
    }

    /// Append an element under `parent` laid out at `rect`.
    pub fn element(&self, parent: NodeId, rect: Rect) -> NodeId {
        let mut state = self.inner.borrow_mut();
        let id = NodeId(state.nodes.len());
        state.nodes.push(NodeData::new(Some(parent), rect));
        id
    }

    /// Append a scroll container (`overflow: auto`) under `parent`.
    pub fn scroller(&self, parent: NodeId, rect: Rect) -> NodeId {
        let id = self.element(parent, rect);
        self.set_computed(id, "overflow", "auto");
        id
    }

    /// Resize the viewport.
    pub fn set_viewport(&self, width: f64, height: f64) {
        self.inner.borrow_mut().viewport = (width, height);
    }

    /// Move or resize a node.
    pub fn set_rect(&self, node: NodeId, rect: Rect) {
        self.inner.borrow_mut().nodes[node.0].rect = rect;
    }

    /// Translate a node and all its descendants, as scrolling their
    /// container would.
    pub fn scroll_contents(&self, container: NodeId, dx: f64, dy: f64) {
        let mut state = self.inner.borrow_mut();
        let ids: Vec<NodeId> = (0..state.nodes.len())
            .map(NodeId)
            .filter(|id| *id != container && is_descendant(&state, container, *id))
            .collect();
        for id in ids {
            let rect = &mut state.nodes[id.0].rect;
            rect.x -= dx;
            rect.y -= dy;
        }
    }

    /// Set a computed style value.
    pub fn set_computed(&self, node: NodeId, property: &str, value: &str) {
        self.inner.borrow_mut().nodes[node.0]
            .computed
            .insert(property.to_owned(), value.to_owned());
    }

    /// Current inline style value.
    #[must_use]
    pub fn inline_style(&self, node: NodeId, property: &str) -> Option<String> {
        self.inner.borrow().nodes[node.0].inline.get(property).cloned()
    }

    /// Mark a node as focusable.
    pub fn set_focusable(&self, node: NodeId, focusable: bool) {
        self.inner.borrow_mut().nodes[node.0].focusable = focusable;
    }

    /// The focused node, if any.
    #[must_use]
    pub fn focused(&self) -> Option<NodeId> {
        self.inner.borrow().focused
    }

    /// Offset reported by [`Host::positioning_offset`] for `node`.
    pub fn set_positioning_offset(&self, node: NodeId, offset: Point) {
        self.inner.borrow_mut().nodes[node.0].positioning_offset = offset;
    }

    /// Remove a node from the document; it then measures as [`Rect::ZERO`].
    pub fn disconnect(&self, node: NodeId) {
        self.inner.borrow_mut().nodes[node.0].connected = false;
    }

    /// Listeners currently bound.
    #[must_use]
    pub fn listeners(&self) -> Vec<(Target<NodeId>, EventKind)> {
        self.inner.borrow().listeners.clone()
    }

    /// Total `(listen, unlisten)` calls so far.
    #[must_use]
    pub fn listener_calls(&self) -> (usize, usize) {
        let state = self.inner.borrow();
        (state.listen_calls, state.unlisten_calls)
    }

    /// Nodes currently observed for intersection.
    #[must_use]
    pub fn observed(&self) -> Vec<NodeId> {
        self.inner.borrow().observed.clone()
    }
}

fn is_descendant(state: &DomState, ancestor: NodeId, node: NodeId) -> bool {
    let mut current = Some(node);
    while let Some(id) = current {
        if id == ancestor {
            return true;
        }
        current = state.nodes[id.0].parent;
    }
    false
}

fn parse_px(value: &str) -> Option<f64> {
    value.trim().trim_end_matches("px").parse().ok()
}

impl Host for FakeDom {
    type Node = NodeId;

    fn bounds(&self, node: &NodeId) -> Rect {
        let state = self.inner.borrow();
        let data = &state.nodes[node.0];
        if !data.connected {
            return Rect::ZERO;
        }
        match data.inline.get("height").and_then(|h| parse_px(h)) {
            Some(height) => data.rect.with_height(height),
            None => data.rect,
        }
    }

    fn viewport(&self) -> Rect {
        let (width, height) = self.inner.borrow().viewport;
        Rect::from_size(width, height)
    }

    fn parent(&self, node: &NodeId) -> Option<NodeId> {
        self.inner.borrow().nodes[node.0].parent
    }

    fn is_body(&self, node: &NodeId) -> bool {
        *node == BODY || *node == ROOT
    }

    fn computed_style(&self, node: &NodeId, property: &str) -> String {
        let state = self.inner.borrow();
        match state.nodes[node.0].computed.get(property) {
            Some(value) => value.clone(),
            None if property == "display" => "block".to_owned(),
            None => String::new(),
        }
    }

    fn positioning_offset(&self, node: &NodeId) -> Point {
        self.inner.borrow().nodes[node.0].positioning_offset
    }

    fn set_style(&self, node: &NodeId, property: &str, value: Option<&str>) {
        let mut state = self.inner.borrow_mut();
        let inline = &mut state.nodes[node.0].inline;
        match value {
            Some(value) => {
                inline.insert(property.to_owned(), value.to_owned());
            }
            None => {
                inline.remove(property);
            }
        }
    }

    fn contains(&self, ancestor: &NodeId, node: &NodeId) -> bool {
        is_descendant(&self.inner.borrow(), *ancestor, *node)
    }

    fn focusables(&self, node: &NodeId) -> Vec<NodeId> {
        let state = self.inner.borrow();
        (0..state.nodes.len())
            .map(NodeId)
            .filter(|id| {
                *id != *node && state.nodes[id.0].focusable && is_descendant(&state, *node, *id)
            })
            .collect()
    }

    fn focus(&self, node: &NodeId) {
        self.inner.borrow_mut().focused = Some(*node);
    }

    fn listen(&self, target: &Target<NodeId>, kind: EventKind) {
        let mut state = self.inner.borrow_mut();
        state.listen_calls += 1;
        let binding = (target.clone(), kind);
        if !state.listeners.contains(&binding) {
            state.listeners.push(binding);
        }
    }

    fn unlisten(&self, target: &Target<NodeId>, kind: EventKind) {
        let mut state = self.inner.borrow_mut();
        state.unlisten_calls += 1;
        state
            .listeners
            .retain(|(t, k)| !(t == target && *k == kind));
    }

    fn observe(&self, node: &NodeId) -> bool {
        let mut state = self.inner.borrow_mut();
        if state.observer_available && !state.observed.contains(node) {
            state.observed.push(*node);
        }
        state.observer_available
    }

    fn unobserve(&self, node: &NodeId) {
        self.inner.borrow_mut().observed.retain(|id| id != node);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn inline_height_overrides_measured_height() {
        let dom = FakeDom::new(800.0, 600.0);
        let node = dom.element(dom.body(), Rect::new(0.0, 0.0, 100.0, 900.0));
        dom.set_style(&node, "height", Some("580px"));
        assert_eq!(dom.bounds(&node).height, 580.0);
        dom.set_style(&node, "height", None);
        assert_eq!(dom.bounds(&node).height, 900.0);
    }

    #[test]
    fn disconnected_nodes_measure_zero() {
        let dom = FakeDom::new(800.0, 600.0);
        let node = dom.element(dom.body(), Rect::new(5.0, 5.0, 10.0, 10.0));
        dom.disconnect(node);
        assert_eq!(dom.bounds(&node), Rect::ZERO);
    }

    #[test]
    fn scroll_contents_moves_descendants_only() {
        let dom = FakeDom::new(800.0, 600.0);
        let scroller = dom.scroller(dom.body(), Rect::new(0.0, 0.0, 200.0, 200.0));
        let child = dom.element(scroller, Rect::new(10.0, 50.0, 20.0, 20.0));
        dom.scroll_contents(scroller, 0.0, 30.0);
        assert_eq!(dom.bounds(&child), Rect::new(10.0, 20.0, 20.0, 20.0));
        assert_eq!(dom.bounds(&scroller), Rect::new(0.0, 0.0, 200.0, 200.0));
    }

    #[test]
    fn focusables_are_descendants_in_document_order() {
        let dom = FakeDom::new(800.0, 600.0);
        let panel = dom.element(dom.body(), Rect::ZERO);
        let first = dom.element(panel, Rect::ZERO);
        let outside = dom.element(dom.body(), Rect::ZERO);
        let second = dom.element(panel, Rect::ZERO);
        for id in [first, outside, second] {
            dom.set_focusable(id, true);
        }
        assert_eq!(dom.focusables(&panel), vec![first, second]);
    }
}
