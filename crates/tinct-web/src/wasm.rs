#![forbid(unsafe_code)]

//! `web-sys` implementation of the popover host.
//!
//! [`WebHost`] answers geometry and style queries from the live DOM and
//! turns listener bindings into real `addEventListener` registrations. Every
//! registered closure forwards into the popover through a [`WeakPopover`],
//! so the DOM never keeps a destroyed popover alive.

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::{Array, Function};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    Document, Element, Event, EventTarget, HtmlElement, IntersectionObserver,
    IntersectionObserverEntry, KeyboardEvent, Window,
};

use tinct_core::event::{EventKind, KeyEvent};
use tinct_core::geometry::{Point, Rect};
use tinct_popover::host::{Controller, Host, Target};
use tinct_popover::{Popover, PopoverEvent, SharedPopover, WeakPopover};

use crate::error::HostError;
use crate::options::config_from_json;
use crate::style::{FOCUSABLE_SELECTOR, creates_containing_block, is_static};

type Sink = Rc<RefCell<Option<WeakPopover<WebHost, JsController>>>>;

struct Binding {
    target: Target<Element>,
    kind: EventKind,
    callback: Closure<dyn FnMut(Event)>,
}

struct Observation {
    observer: IntersectionObserver,
    _callback: Closure<dyn FnMut(Array, IntersectionObserver)>,
}

/// The browser document as a popover [`Host`].
pub struct WebHost {
    window: Window,
    document: Document,
    sink: Sink,
    bindings: RefCell<Vec<Binding>>,
    observation: RefCell<Option<Observation>>,
}

impl WebHost {
    /// Host for the current window.
    pub fn new() -> Result<Self, HostError> {
        let window = web_sys::window().ok_or(HostError::NoWindow)?;
        let document = window.document().ok_or(HostError::NoDocument)?;
        Ok(Self {
            window,
            document,
            sink: Rc::new(RefCell::new(None)),
            bindings: RefCell::new(Vec::new()),
            observation: RefCell::new(None),
        })
    }

    fn event_target(&self, target: &Target<Element>) -> EventTarget {
        match target {
            Target::Window => self.window.clone().into(),
            Target::Document => self.document.clone().into(),
            Target::Element(element) => element.clone().into(),
        }
    }

    fn new_observation(&self) -> Result<Observation, HostError> {
        let sink = Rc::clone(&self.sink);
        let callback = Closure::<dyn FnMut(Array, IntersectionObserver)>::new(
            move |entries: Array, _observer: IntersectionObserver| {
                // Only the latest crossing matters.
                let latest = entries
                    .iter()
                    .filter_map(|entry| entry.dyn_into::<IntersectionObserverEntry>().ok())
                    .last();
                if let Some(entry) = latest {
                    forward(&sink, PopoverEvent::Visibility(entry.is_intersecting()));
                }
            },
        );
        let observer = IntersectionObserver::new(callback.as_ref().unchecked_ref())
            .map_err(|err| HostError::Js(format!("{err:?}")))?;
        Ok(Observation {
            observer,
            _callback: callback,
        })
    }

    /// Top-left of the initial containing block in viewport coordinates.
    fn document_origin(&self) -> Point {
        self.document
            .document_element()
            .map_or(Point::ZERO, |root| {
                let rect = self.bounds(&root);
                Point::new(rect.x, rect.y)
            })
    }

    /// Walk up from `node` to the first ancestor that captures
    /// `position: fixed` descendants.
    fn fixed_containing_block(&self, node: &Element) -> Option<Element> {
        let mut current = node.parent_element();
        while let Some(element) = current {
            if self.is_body(&element) {
                return None;
            }
            if creates_containing_block(|property| self.computed_style(&element, property)) {
                return Some(element);
            }
            current = element.parent_element();
        }
        None
    }

    fn padding_box_origin(&self, element: &Element) -> Point {
        let rect = self.bounds(element);
        Point::new(
            rect.x + f64::from(element.client_left()),
            rect.y + f64::from(element.client_top()),
        )
    }
}

fn forward(sink: &Sink, event: PopoverEvent<Element>) -> bool {
    let popover = sink.borrow().clone();
    popover.is_some_and(|popover| popover.handle_event(event))
}

fn translate(document: &Document, kind: EventKind, event: &Event) -> Option<PopoverEvent<Element>> {
    match kind {
        EventKind::Scroll => Some(PopoverEvent::Scroll),
        EventKind::Resize => Some(PopoverEvent::Resize),
        EventKind::PointerDown => event
            .target()
            .and_then(|target| target.dyn_into::<Element>().ok())
            .or_else(|| document.document_element())
            .map(PopoverEvent::PointerDown),
        EventKind::KeyDown => {
            let key = event.dyn_ref::<KeyboardEvent>()?;
            Some(PopoverEvent::Key {
                key: KeyEvent::from_dom(
                    &key.key(),
                    key.shift_key(),
                    key.ctrl_key(),
                    key.alt_key(),
                    key.meta_key(),
                ),
                active: document.active_element(),
            })
        }
    }
}

fn rect_from_dom(rect: &web_sys::DomRect) -> Rect {
    Rect::new(rect.x(), rect.y(), rect.width(), rect.height())
}

impl Host for WebHost {
    type Node = Element;

    fn bounds(&self, node: &Element) -> Rect {
        if !node.is_connected() {
            return Rect::ZERO;
        }
        rect_from_dom(&node.get_bounding_client_rect())
    }

    fn viewport(&self) -> Rect {
        self.document.document_element().map_or(Rect::ZERO, |root| {
            Rect::from_size(f64::from(root.client_width()), f64::from(root.client_height()))
        })
    }

    fn parent(&self, node: &Element) -> Option<Element> {
        node.parent_element()
    }

    fn is_body(&self, node: &Element) -> bool {
        let is_body = self
            .document
            .body()
            .is_some_and(|body| AsRef::<Element>::as_ref(&body) == node);
        is_body || self.document.document_element().as_ref() == Some(node)
    }

    fn computed_style(&self, node: &Element, property: &str) -> String {
        self.window
            .get_computed_style(node)
            .ok()
            .flatten()
            .and_then(|style| style.get_property_value(property).ok())
            .unwrap_or_default()
    }

    fn positioning_offset(&self, node: &Element) -> Point {
        let position = self.computed_style(node, "position");
        if position.trim() == "fixed" {
            return self
                .fixed_containing_block(node)
                .map_or(Point::ZERO, |block| self.padding_box_origin(&block));
        }
        let offset_parent = node
            .dyn_ref::<HtmlElement>()
            .and_then(HtmlElement::offset_parent);
        match offset_parent {
            Some(parent)
                if !(self.is_body(&parent)
                    && is_static(&self.computed_style(&parent, "position"))) =>
            {
                self.padding_box_origin(&parent)
            }
            _ => self.document_origin(),
        }
    }

    fn set_style(&self, node: &Element, property: &str, value: Option<&str>) {
        let Some(element) = node.dyn_ref::<HtmlElement>() else {
            return;
        };
        let style = element.style();
        let result = match value {
            Some(value) => style.set_property(property, value),
            None => style.remove_property(property).map(drop),
        };
        if let Err(_err) = result {
            tinct_core::warn!(property, error = ?_err, "inline style write failed");
        }
    }

    fn contains(&self, ancestor: &Element, node: &Element) -> bool {
        let node: &web_sys::Node = node;
        ancestor.contains(Some(node))
    }

    fn focusables(&self, node: &Element) -> Vec<Element> {
        let Ok(list) = node.query_selector_all(FOCUSABLE_SELECTOR) else {
            return Vec::new();
        };
        (0..list.length())
            .filter_map(|i| list.item(i))
            .filter_map(|item| item.dyn_into::<Element>().ok())
            .collect()
    }

    fn focus(&self, node: &Element) {
        if let Some(element) = node.dyn_ref::<HtmlElement>()
            && let Err(_err) = element.focus()
        {
            tinct_core::warn!(error = ?_err, "focus failed");
        }
    }

    fn listen(&self, target: &Target<Element>, kind: EventKind) {
        let mut bindings = self.bindings.borrow_mut();
        if bindings
            .iter()
            .any(|binding| binding.target == *target && binding.kind == kind)
        {
            return;
        }
        let sink = Rc::clone(&self.sink);
        let document = self.document.clone();
        let callback = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            let Some(translated) = translate(&document, kind, &event) else {
                return;
            };
            if forward(&sink, translated) {
                event.prevent_default();
            }
        });
        let registered = self
            .event_target(target)
            .add_event_listener_with_callback(kind.dom_name(), callback.as_ref().unchecked_ref());
        if let Err(_err) = registered {
            tinct_core::warn!(event = kind.dom_name(), error = ?_err, "addEventListener failed");
            return;
        }
        bindings.push(Binding {
            target: target.clone(),
            kind,
            callback,
        });
    }

    fn unlisten(&self, target: &Target<Element>, kind: EventKind) {
        let mut bindings = self.bindings.borrow_mut();
        let Some(index) = bindings
            .iter()
            .position(|binding| binding.target == *target && binding.kind == kind)
        else {
            return;
        };
        let binding = bindings.remove(index);
        if let Err(_err) = self.event_target(&binding.target).remove_event_listener_with_callback(
            kind.dom_name(),
            binding.callback.as_ref().unchecked_ref(),
        ) {
            tinct_core::warn!(event = kind.dom_name(), error = ?_err, "removeEventListener failed");
        }
    }

    fn observe(&self, node: &Element) -> bool {
        let mut observation = self.observation.borrow_mut();
        if observation.is_none() {
            match self.new_observation() {
                Ok(created) => *observation = Some(created),
                Err(_err) => {
                    tinct_core::warn!(error = %_err, "no intersection observer, measuring instead");
                    return false;
                }
            }
        }
        if let Some(observation) = observation.as_ref() {
            observation.observer.observe(node);
        }
        true
    }

    fn unobserve(&self, node: &Element) {
        if let Some(observation) = self.observation.borrow_mut().take() {
            observation.observer.unobserve(node);
            observation.observer.disconnect();
        }
    }
}

/// The widget's open state, reached through two JS callbacks.
pub struct JsController {
    is_open: Function,
    toggle: Function,
}

impl JsController {
    /// `is_open()` returns a truthy value while shown; `toggle(open,
    /// forced)` requests a change.
    pub fn new(is_open: Function, toggle: Function) -> Self {
        Self { is_open, toggle }
    }
}

impl Controller for JsController {
    fn is_open(&self) -> bool {
        self.is_open
            .call0(&JsValue::NULL)
            .is_ok_and(|value| value.is_truthy())
    }

    fn toggle(&mut self, open: bool, forced: bool) {
        let result = self.toggle.call2(
            &JsValue::NULL,
            &JsValue::from_bool(open),
            &JsValue::from_bool(forced),
        );
        if let Err(_err) = result {
            tinct_core::warn!(open, forced, error = ?_err, "toggle callback threw");
        }
    }
}

impl From<HostError> for JsValue {
    fn from(err: HostError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

/// A popover bound to DOM elements, exported to JavaScript.
#[wasm_bindgen]
pub struct TinctPopover {
    shared: Option<SharedPopover<WebHost, JsController>>,
}

#[wasm_bindgen]
impl TinctPopover {
    /// Attach a popover.
    ///
    /// `options` is a plain object (`{ margin, position, toggle,
    /// closeOnScroll, disabled }`) or `undefined`. `reference` receives
    /// focus when Tab leaves the floating element (defaults to the anchor).
    /// Clicks on any element in `labels` do not dismiss the popover.
    #[wasm_bindgen(constructor)]
    pub fn new(
        anchor: Element,
        floating: Element,
        is_open: Function,
        toggle: Function,
        options: JsValue,
        reference: Option<Element>,
        labels: Option<Array>,
    ) -> Result<TinctPopover, JsValue> {
        let json = if options.is_undefined() || options.is_null() {
            String::new()
        } else {
            String::from(js_sys::JSON::stringify(&options)?)
        };
        let config = config_from_json(&json)?;
        let host = WebHost::new()?;
        let sink = Rc::clone(&host.sink);

        let labels: Vec<Element> = labels
            .map(|labels| {
                labels
                    .iter()
                    .filter_map(|label| label.dyn_into::<Element>().ok())
                    .collect()
            })
            .unwrap_or_default();
        let mut popover = Popover::new(
            host,
            anchor,
            floating,
            JsController::new(is_open, toggle),
            &config,
        )
        .with_labels(labels);
        if let Some(reference) = reference {
            popover = popover.with_reference(reference);
        }

        let shared = SharedPopover::new(popover);
        *sink.borrow_mut() = Some(shared.downgrade());
        shared.with(Popover::attach);
        Ok(Self {
            shared: Some(shared),
        })
    }

    /// Recompute the position now. Returns `false` when nothing was placed
    /// (closed, anchor hidden, destroyed, or called from inside `toggle`).
    pub fn update(&self) -> bool {
        self.shared
            .as_ref()
            .is_some_and(|shared| shared.update().is_some())
    }

    /// Move the popover to a new anchor element.
    pub fn retarget(&self, anchor: Element) {
        if let Some(shared) = &self.shared {
            shared.retarget(anchor);
        }
    }

    /// Detach listeners and the observer and clear inline styles. Safe to
    /// call more than once.
    pub fn destroy(&mut self) {
        if let Some(shared) = self.shared.take() {
            shared.detach();
        }
    }
}
